//! 사용자 관리 API 라우트
//!
//! 관리자 전용 사용자 목록 조회와 역할 변경을 제공합니다.
//!
//! # 엔드포인트
//!
//! - `GET /api/v1/users` - 전체 사용자 목록 (ADMIN)
//! - `PUT /api/v1/users/{id}/role` - 역할 변경 (ADMIN)

use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::AdminUser;
use crate::error::{ApiError, ApiResult};
use crate::repository::UserRepository;
use crate::state::AppState;
use stockflow_core::{Role, User};

// ================================================================================================
// Request/Response Types
// ================================================================================================

/// 사용자 목록 응답.
#[derive(Debug, Serialize, ToSchema)]
pub struct UsersListResponse {
    /// 사용자 목록
    pub users: Vec<User>,
    /// 총 개수
    pub total: usize,
}

/// 역할 변경 요청.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRoleRequest {
    /// 새 역할
    pub role: Role,
}

/// 단일 사용자 응답.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub user: User,
}

// ================================================================================================
// Handlers
// ================================================================================================

/// GET /api/v1/users - 전체 사용자 목록 (ADMIN)
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "사용자 목록", body = UsersListResponse),
        (status = 401, description = "인증 필요"),
        (status = 403, description = "권한 없음")
    )
)]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> ApiResult<Json<UsersListResponse>> {
    let users = UserRepository::list(&state.db_pool).await?;
    let total = users.len();

    Ok(Json(UsersListResponse { users, total }))
}

/// PUT /api/v1/users/{id}/role - 역할 변경 (ADMIN)
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}/role",
    tag = "users",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "사용자 ID")
    ),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "역할 변경 성공", body = UserResponse),
        (status = 404, description = "사용자 없음")
    )
)]
pub async fn update_user_role(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateRoleRequest>,
) -> ApiResult<Json<UserResponse>> {
    info!("역할 변경: {} -> {}", id, request.role);

    let user = UserRepository::update_role(&state.db_pool, id, request.role)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(UserResponse { user }))
}

/// 사용자 관리 라우터 생성.
pub fn users_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_users))
        .route("/{id}/role", put(update_user_role))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::create_test_state;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_list_users_requires_token() {
        let app = users_router().with_state(Arc::new(create_test_state()));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_list_users_rejects_non_admin() {
        let state = Arc::new(create_test_state());
        let token = state
            .token_service
            .issue_access_token(Uuid::new_v4(), "user@test.local", Role::User)
            .unwrap();

        // USER 역할 토큰은 게이트에서 거부되어 DB에 닿지 않음
        let response = users_router()
            .with_state(state)
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Insufficient permissions");
    }

    #[tokio::test]
    #[ignore] // DB 연결 필요
    async fn test_admin_can_change_role() {
        use crate::repository::NewUser;

        let state = Arc::new(create_test_state());

        let target = UserRepository::create(
            &state.db_pool,
            NewUser {
                email: format!("promote-{}@test.local", Uuid::new_v4().simple()),
                password_hash: "$argon2id$fake".to_string(),
                name: "승진대상".to_string(),
                role: Role::User,
            },
        )
        .await
        .unwrap();

        let admin_token = state
            .token_service
            .issue_access_token(Uuid::new_v4(), "admin@test.local", Role::Admin)
            .unwrap();

        let response = users_router()
            .with_state(state)
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri(format!("/{}/role", target.id))
                    .header(header::AUTHORIZATION, format!("Bearer {admin_token}"))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"role":"MANAGER"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["user"]["role"], "MANAGER");
    }
}
