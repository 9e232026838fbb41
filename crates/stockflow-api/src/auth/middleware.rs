//! Axum용 JWT 인증 미들웨어.
//!
//! Axum 핸들러에서 사용할 인증 추출기 및 역할 게이트.
//!
//! 검증 키는 항상 AppState의 토큰 서비스에서 가져옵니다. 전역 변수나
//! 요청 시점의 환경 변수 조회는 사용하지 않습니다.

use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use stockflow_core::Role;

use super::Claims;
use crate::error::ApiError;
use crate::state::AppState;

/// ADMIN 전용 작업의 허용 역할.
pub const ADMIN_ROLES: &[Role] = &[Role::Admin];

/// 상품/카테고리/공급업체 관리 작업의 허용 역할.
pub const MANAGER_ROLES: &[Role] = &[Role::Admin, Role::Manager];

/// 재고 이동 및 주문 생성 작업의 허용 역할.
pub const STAFF_ROLES: &[Role] = &[Role::Admin, Role::Manager, Role::Staff];

/// 역할 집합 게이트.
///
/// 신원의 역할이 허용 집합에 정확히 포함되는지 확인합니다.
/// 빈 집합은 모든 역할을 거부합니다. 역할 간 상하 관계는 없습니다.
pub fn require_any_role(allowed: &[Role], claims: &Claims) -> Result<(), ApiError> {
    if allowed.contains(&claims.role) {
        Ok(())
    } else {
        Err(ApiError::Forbidden("Insufficient permissions".to_string()))
    }
}

/// Authorization 헤더에서 Bearer 토큰을 추출합니다.
///
/// 스킴은 대소문자를 구분합니다. `bearer`(소문자)는 토큰 없음과
/// 동일하게 취급됩니다.
fn bearer_token(header: &str) -> Option<&str> {
    header.strip_prefix("Bearer ")
}

/// JWT 인증 추출기.
///
/// Axum 핸들러에서 인증된 사용자 정보를 추출합니다.
///
/// # 사용 예시
///
/// ```rust,ignore
/// async fn protected_handler(
///     AuthUser(claims): AuthUser,
/// ) -> impl IntoResponse {
///     format!("Authenticated user: {}", claims.email)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl<S> FromRequestParts<S> for AuthUser
where
    Arc<AppState>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = Arc::<AppState>::from_ref(state);

        // Authorization 헤더에서 토큰 추출
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| ApiError::Unauthenticated("No token provided".to_string()))?;

        // Bearer 스킴 확인 (대소문자 구분)
        let token = bearer_token(auth_header)
            .ok_or_else(|| ApiError::Unauthenticated("No token provided".to_string()))?;

        // 토큰 검증 - 실패 원인은 구분하지 않음
        let claims = state
            .token_service
            .verify(token)
            .map_err(|_| ApiError::Unauthenticated("Invalid or expired token".to_string()))?;

        Ok(AuthUser(claims))
    }
}

/// ADMIN 역할을 요구하는 추출기.
#[derive(Debug, Clone)]
pub struct AdminUser(pub Claims);

impl<S> FromRequestParts<S> for AdminUser
where
    Arc<AppState>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(claims) = AuthUser::from_request_parts(parts, state).await?;
        require_any_role(ADMIN_ROLES, &claims)?;
        Ok(AdminUser(claims))
    }
}

/// ADMIN 또는 MANAGER 역할을 요구하는 추출기.
#[derive(Debug, Clone)]
pub struct ManagerUser(pub Claims);

impl<S> FromRequestParts<S> for ManagerUser
where
    Arc<AppState>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(claims) = AuthUser::from_request_parts(parts, state).await?;
        require_any_role(MANAGER_ROLES, &claims)?;
        Ok(ManagerUser(claims))
    }
}

/// ADMIN, MANAGER 또는 STAFF 역할을 요구하는 추출기.
#[derive(Debug, Clone)]
pub struct StaffUser(pub Claims);

impl<S> FromRequestParts<S> for StaffUser
where
    Arc<AppState>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(claims) = AuthUser::from_request_parts(parts, state).await?;
        require_any_role(STAFF_ROLES, &claims)?;
        Ok(StaffUser(claims))
    }
}
