//! 인증 API 라우트
//!
//! 가입, 로그인, 토큰 갱신, 현재 사용자 조회를 제공합니다.
//!
//! # 엔드포인트
//!
//! - `POST /api/v1/auth/register` - 가입 (기본 역할 USER)
//! - `POST /api/v1/auth/login` - 로그인
//! - `POST /api/v1/auth/refresh` - 토큰 갱신
//! - `GET /api/v1/auth/me` - 현재 사용자 조회
//!
//! 로그인 실패 메시지는 이메일 미존재/패스워드 불일치 구분 없이 동일합니다.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::{hash_password, validate_password_strength, verify_password, AuthUser};
use crate::error::{map_unique_violation, ApiError, ApiResult};
use crate::repository::{NewUser, UserRepository};
use crate::state::AppState;
use stockflow_core::{Role, User};

// ================================================================================================
// Request/Response Types
// ================================================================================================

/// 가입 요청.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// 이메일 (고유)
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    /// 패스워드 (8자 이상, 영문자와 숫자 포함)
    pub password: String,
    /// 표시 이름
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
}

/// 로그인 요청.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// 토큰 갱신 요청.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// 인증 응답 (사용자 + 토큰 쌍).
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}

/// 토큰 갱신 응답.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
}

/// 현재 사용자 응답.
#[derive(Debug, Serialize, ToSchema)]
pub struct MeResponse {
    pub user: User,
}

// ================================================================================================
// Handlers
// ================================================================================================

fn issue_token_pair(state: &AppState, user: &User) -> Result<(String, String), ApiError> {
    let access = state
        .token_service
        .issue_access_token(user.id, &user.email, user.role)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    let refresh = state
        .token_service
        .issue_refresh_token(user.id, &user.email, user.role)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok((access, refresh))
}

/// POST /api/v1/auth/register - 가입
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "가입 성공", body = AuthResponse),
        (status = 400, description = "유효성 검사 실패"),
        (status = 409, description = "이미 등록된 이메일")
    )
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    info!("가입 요청: {}", request.email);

    request.validate()?;
    validate_password_strength(&request.password)
        .map_err(|message| ApiError::Validation(message.to_string()))?;

    let password_hash =
        hash_password(&request.password).map_err(|e| ApiError::Internal(e.to_string()))?;

    let user = UserRepository::create(
        &state.db_pool,
        NewUser {
            email: request.email,
            password_hash,
            name: request.name,
            role: Role::User,
        },
    )
    .await
    .map_err(|e| map_unique_violation(e, "users_email_key", "Email already registered"))?;

    let (access_token, refresh_token) = issue_token_pair(&state, &user)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user,
            access_token,
            refresh_token,
        }),
    ))
}

/// POST /api/v1/auth/login - 로그인
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "로그인 성공", body = AuthResponse),
        (status = 401, description = "이메일 또는 패스워드 불일치")
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    debug!("로그인 요청: {}", request.email);

    // 미존재 이메일과 패스워드 불일치는 동일한 메시지로 응답
    let user = UserRepository::find_by_email(&state.db_pool, &request.email)
        .await?
        .ok_or_else(|| ApiError::Unauthenticated("Invalid email or password".to_string()))?;

    verify_password(&request.password, &user.password_hash)
        .map_err(|_| ApiError::Unauthenticated("Invalid email or password".to_string()))?;

    let (access_token, refresh_token) = issue_token_pair(&state, &user)?;

    info!("로그인 성공: {}", user.email);

    Ok(Json(AuthResponse {
        user,
        access_token,
        refresh_token,
    }))
}

/// POST /api/v1/auth/refresh - 토큰 갱신
#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh",
    tag = "auth",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "갱신 성공", body = TokenResponse),
        (status = 401, description = "유효하지 않은 리프레시 토큰")
    )
)]
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RefreshRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let claims = state
        .token_service
        .verify_refresh(&request.refresh_token)
        .map_err(|_| ApiError::Unauthenticated("Invalid or expired token".to_string()))?;

    // 역할 변경이 즉시 반영되도록 저장된 사용자 기준으로 재발급
    let user = UserRepository::find_by_id(&state.db_pool, claims.user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthenticated("Invalid or expired token".to_string()))?;

    let (access_token, refresh_token) = issue_token_pair(&state, &user)?;

    Ok(Json(TokenResponse {
        access_token,
        refresh_token,
    }))
}

/// GET /api/v1/auth/me - 현재 사용자 조회
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "현재 사용자", body = MeResponse),
        (status = 401, description = "인증 필요")
    )
)]
pub async fn me(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
) -> ApiResult<Json<MeResponse>> {
    let user = UserRepository::find_by_id(&state.db_pool, claims.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(MeResponse { user }))
}

/// 인증 라우터 생성.
pub fn auth_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/me", get(me))
}
