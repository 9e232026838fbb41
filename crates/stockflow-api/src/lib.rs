//! 재고 관리 REST API 서버.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - Axum 기반 REST API (상품, 카테고리, 공급업체, 주문, 재고 이동)
//! - JWT 인증 및 역할 기반 접근 제어
//! - 헬스 체크 엔드포인트
//! - Prometheus 메트릭
//! - OpenAPI 문서 및 Swagger UI
//!
//! # 모듈 구성
//!
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`routes`]: REST API 엔드포인트
//! - [`repository`]: PostgreSQL 저장소 계층
//! - [`auth`]: JWT 인증 및 권한 관리
//! - [`metrics`]: Prometheus 메트릭 수집
//! - [`middleware`]: HTTP 미들웨어
//! - [`openapi`]: OpenAPI 문서 및 Swagger UI

pub mod auth;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod openapi;
pub mod repository;
pub mod routes;
pub mod state;

pub use auth::{
    hash_password, validate_password_strength, verify_password, Claims, PasswordError,
    TokenService,
};
pub use error::{ApiError, ApiResult};
pub use metrics::setup_metrics_recorder;
pub use middleware::metrics_layer;
pub use routes::*;
pub use state::AppState;

#[cfg(any(test, feature = "test-utils"))]
pub use state::{create_test_state, create_test_state_with_auth};
