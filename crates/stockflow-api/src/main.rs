//! 재고 관리 API 서버.
//!
//! Axum 기반 REST API 서버를 시작합니다.
//! 인증, 상품/카테고리/공급업체 관리, 발주 주문, 재고 이동 기록 등의
//! 엔드포인트를 제공합니다.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{http::StatusCode, middleware, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use stockflow_api::auth::hash_password;
use stockflow_api::metrics::setup_metrics_recorder;
use stockflow_api::middleware::metrics_layer;
use stockflow_api::openapi::swagger_ui_router;
use stockflow_api::repository::{NewUser, UserRepository};
use stockflow_api::routes::create_api_router;
use stockflow_api::state::AppState;
use stockflow_core::logging::{init_logging, LogConfig};
use stockflow_core::{AppConfig, BootstrapConfig, Role};

/// 설정 파일과 환경 변수에서 애플리케이션 설정 로드.
///
/// JWT 시크릿 우선순위:
/// 1. `STOCKFLOW__AUTH__JWT_SECRET` 환경 변수 (또는 설정 파일)
/// 2. `JWT_SECRET` 환경 변수
/// 3. 개발용 기본값 (경고 로그)
fn load_config() -> Result<AppConfig, Box<dyn std::error::Error>> {
    let mut config = AppConfig::load_default()?;

    if config.auth.jwt_secret.is_empty() {
        config.auth.jwt_secret = match std::env::var("JWT_SECRET") {
            Ok(secret) => secret,
            Err(_) => {
                warn!("JWT secret not set, using default (INSECURE for development only)");
                "dev-secret-key-change-in-production".to_string()
            }
        };
    }

    Ok(config)
}

/// 데이터베이스 연결 풀 생성 및 연결 확인.
///
/// `DATABASE_URL` 환경 변수는 필수입니다. 연결 후 `SELECT 1`로 검증하고
/// 마이그레이션을 적용합니다.
async fn connect_database(config: &AppConfig) -> Result<PgPool, Box<dyn std::error::Error>> {
    let database_url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            error!("DATABASE_URL 환경변수가 필요합니다");
            return Err("DATABASE_URL not set".into());
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(Duration::from_secs(config.database.connection_timeout_secs))
        .idle_timeout(Duration::from_secs(config.database.idle_timeout_secs))
        .connect(&database_url)
        .await?;

    // 연결 테스트
    sqlx::query("SELECT 1").fetch_one(&pool).await?;
    info!("Connected to PostgreSQL successfully");

    sqlx::migrate!("../../migrations").run(&pool).await?;
    info!("Database migrations applied");

    Ok(pool)
}

/// 초기 관리자 계정 부트스트랩.
///
/// ADMIN 역할 사용자가 하나도 없고 부트스트랩 자격 증명이 설정되어 있으면
/// 관리자를 생성합니다. 패스워드는 이 시점에 해시되며, 재기동 시 ADMIN이
/// 이미 존재하면 아무 것도 하지 않습니다.
async fn bootstrap_admin(
    pool: &PgPool,
    bootstrap: &BootstrapConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    if UserRepository::has_admin(pool).await? {
        return Ok(());
    }

    let Some((email, password)) = bootstrap.credentials() else {
        warn!(
            "ADMIN 사용자가 없습니다. STOCKFLOW__BOOTSTRAP__ADMIN_EMAIL / \
             STOCKFLOW__BOOTSTRAP__ADMIN_PASSWORD 설정 시 초기 관리자를 생성합니다"
        );
        return Ok(());
    };

    let password_hash = hash_password(password)?;
    let admin = UserRepository::create(
        pool,
        NewUser {
            email: email.to_string(),
            password_hash,
            name: "Administrator".to_string(),
            role: Role::Admin,
        },
    )
    .await?;

    info!(email = %admin.email, "초기 관리자 계정 생성 완료");
    Ok(())
}

/// CORS 미들웨어 구성.
///
/// CORS_ORIGINS 환경변수가 설정되어 있으면 해당 origin만 허용합니다.
/// 설정되지 않으면 개발 모드로 간주하여 모든 origin을 허용합니다.
///
/// # 환경변수
///
/// - `CORS_ORIGINS`: 쉼표로 구분된 허용 origin 목록
///   예: `https://inventory.example.com,https://admin.example.com`
fn cors_layer() -> CorsLayer {
    let allow_origin = match std::env::var("CORS_ORIGINS") {
        Ok(origins) if !origins.is_empty() => {
            let origins: Vec<_> = origins
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();

            if origins.is_empty() {
                warn!("CORS_ORIGINS is set but contains no valid origins, allowing any");
                AllowOrigin::any()
            } else {
                info!("CORS configured with {} allowed origins", origins.len());
                AllowOrigin::list(origins)
            }
        }
        _ => {
            warn!("CORS_ORIGINS not set, allowing any origin (development mode)");
            AllowOrigin::any()
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
            axum::http::header::ACCEPT,
        ])
        .allow_credentials(std::env::var("CORS_ORIGINS").is_ok())
        .max_age(Duration::from_secs(3600))
}

/// /metrics 엔드포인트 핸들러.
async fn metrics_handler(
    axum::extract::State(handle): axum::extract::State<PrometheusHandle>,
) -> String {
    handle.render()
}

/// 전체 라우터 생성.
fn create_router(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    // 메트릭 라우터 (별도 상태)
    let metrics_router = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metrics_handle);

    Router::new()
        .merge(metrics_router)
        .merge(create_api_router().with_state(state))
        // OpenAPI 문서 및 Swagger UI
        .merge(swagger_ui_router())
        // 메트릭 미들웨어 (모든 요청에 적용)
        .layer(middleware::from_fn(metrics_layer))
        .layer(TraceLayer::new_for_http())
        // 전역 타임아웃 (30초) - 408 상태 코드 반환
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(cors_layer())
}

/// OpenAPI 스펙 내보내기 처리.
///
/// `--export-openapi` 플래그 또는 `EXPORT_OPENAPI` 환경변수가 설정된 경우
/// OpenAPI JSON 스펙을 stdout으로 출력하고 종료합니다.
fn handle_export_openapi() -> Result<(), Box<dyn std::error::Error>> {
    use stockflow_api::openapi::ApiDoc;
    use utoipa::OpenApi as _;

    let export_flag = std::env::args().any(|arg| arg == "--export-openapi");
    let export_env = std::env::var("EXPORT_OPENAPI")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    if export_flag || export_env {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_string_pretty(&spec)?;
        println!("{}", json);
        std::process::exit(0);
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    // OpenAPI 내보내기 처리 (서버 시작 전)
    handle_export_openapi()?;

    // 설정 로드
    let config = load_config()?;

    // tracing 초기화 (RUST_LOG가 설정 파일 값을 오버라이드)
    init_logging(LogConfig::from(&config.logging))?;

    info!("Starting StockFlow API server...");

    // Prometheus 메트릭 레코더 설정
    let metrics_handle = setup_metrics_recorder();
    info!("Prometheus metrics recorder initialized");

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| {
            error!(
                host = %config.server.host,
                port = config.server.port,
                "소켓 주소 설정이 유효하지 않습니다. STOCKFLOW__SERVER__HOST, \
                 STOCKFLOW__SERVER__PORT 환경변수를 확인하세요."
            );
            e
        })?;

    // 데이터베이스 연결 및 마이그레이션
    let pool = connect_database(&config).await?;

    // 초기 관리자 부트스트랩 (ADMIN이 없을 때만)
    bootstrap_admin(&pool, &config.bootstrap).await?;

    // AppState 생성
    let state = Arc::new(AppState::new(pool.clone(), config.auth.clone()));
    info!(version = %state.version, "Application state initialized");

    // 라우터 생성
    let app = create_router(state, metrics_handle);

    // 서버 시작
    info!(%addr, "API server listening");
    info!("Swagger UI available at http://{}/swagger-ui", addr);
    info!("OpenAPI spec at http://{}/api-docs/openapi.json", addr);
    info!("Metrics available at http://{}/metrics", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // 진행 중인 쿼리를 마무리하고 연결 정리
    info!("Server shutdown initiated, closing database pool...");
    pool.close().await;

    info!("Server stopped gracefully");

    Ok(())
}

/// Graceful shutdown 시그널 대기.
///
/// Ctrl+C 또는 SIGTERM 시그널을 수신하면 서버 종료를 시작합니다.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
