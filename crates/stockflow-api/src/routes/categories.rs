//! 카테고리 API 라우트
//!
//! 상품 분류용 카테고리 CRUD를 제공합니다. 조회는 모든 인증 사용자,
//! 생성/수정/삭제는 {ADMIN, MANAGER}로 제한됩니다.
//!
//! # 엔드포인트
//!
//! - `GET /api/v1/categories` - 카테고리 목록
//! - `GET /api/v1/categories/{id}` - 카테고리 조회
//! - `POST /api/v1/categories` - 카테고리 생성 (ADMIN, MANAGER)
//! - `PUT /api/v1/categories/{id}` - 카테고리 수정 (ADMIN, MANAGER)
//! - `DELETE /api/v1/categories/{id}` - 카테고리 삭제 (ADMIN, MANAGER)
//!
//! 카테고리를 삭제해도 소속 상품은 삭제되지 않고 분류만 해제됩니다.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::auth::{AuthUser, ManagerUser};
use crate::error::{map_unique_violation, ApiError, ApiResult};
use crate::repository::{CategoryRepository, NewCategory, UpdateCategory};
use crate::state::AppState;
use stockflow_core::Category;

// ================================================================================================
// Request/Response Types
// ================================================================================================

/// 카테고리 생성 요청.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    /// 카테고리명 (고유)
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    /// 설명
    pub description: Option<String>,
}

/// 카테고리 수정 요청.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryRequest {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
}

/// 카테고리 목록 응답.
#[derive(Debug, Serialize, ToSchema)]
pub struct CategoriesListResponse {
    pub categories: Vec<Category>,
    pub total: usize,
}

/// 단일 카테고리 응답.
#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryResponse {
    pub category: Category,
}

// ================================================================================================
// Handlers
// ================================================================================================

/// GET /api/v1/categories - 카테고리 목록 조회
#[utoipa::path(
    get,
    path = "/api/v1/categories",
    tag = "categories",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "카테고리 목록", body = CategoriesListResponse),
        (status = 401, description = "인증 필요")
    )
)]
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
) -> ApiResult<Json<CategoriesListResponse>> {
    let categories = CategoryRepository::list(&state.db_pool).await?;
    let total = categories.len();

    Ok(Json(CategoriesListResponse { categories, total }))
}

/// GET /api/v1/categories/{id} - 카테고리 조회
#[utoipa::path(
    get,
    path = "/api/v1/categories/{id}",
    tag = "categories",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "카테고리 ID")
    ),
    responses(
        (status = 200, description = "카테고리 상세", body = CategoryResponse),
        (status = 404, description = "카테고리 없음")
    )
)]
pub async fn get_category(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<CategoryResponse>> {
    let category = CategoryRepository::find_by_id(&state.db_pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Category not found".to_string()))?;

    Ok(Json(CategoryResponse { category }))
}

/// POST /api/v1/categories - 카테고리 생성 (ADMIN, MANAGER)
#[utoipa::path(
    post,
    path = "/api/v1/categories",
    tag = "categories",
    security(("bearer_auth" = [])),
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "카테고리 생성 성공", body = CategoryResponse),
        (status = 400, description = "유효성 검사 실패"),
        (status = 409, description = "이미 존재하는 카테고리명")
    )
)]
pub async fn create_category(
    State(state): State<Arc<AppState>>,
    _manager: ManagerUser,
    Json(request): Json<CreateCategoryRequest>,
) -> ApiResult<(StatusCode, Json<CategoryResponse>)> {
    info!("카테고리 생성: {}", request.name);

    request.validate()?;

    let category = CategoryRepository::create(
        &state.db_pool,
        NewCategory {
            name: request.name,
            description: request.description,
        },
    )
    .await
    .map_err(|e| map_unique_violation(e, "categories_name_key", "Category name already exists"))?;

    Ok((StatusCode::CREATED, Json(CategoryResponse { category })))
}

/// PUT /api/v1/categories/{id} - 카테고리 수정 (ADMIN, MANAGER)
#[utoipa::path(
    put,
    path = "/api/v1/categories/{id}",
    tag = "categories",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "카테고리 ID")
    ),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "카테고리 수정 성공", body = CategoryResponse),
        (status = 404, description = "카테고리 없음"),
        (status = 409, description = "이미 존재하는 카테고리명")
    )
)]
pub async fn update_category(
    State(state): State<Arc<AppState>>,
    _manager: ManagerUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCategoryRequest>,
) -> ApiResult<Json<CategoryResponse>> {
    request.validate()?;

    let category = CategoryRepository::update(
        &state.db_pool,
        id,
        UpdateCategory {
            name: request.name,
            description: request.description,
        },
    )
    .await
    .map_err(|e| map_unique_violation(e, "categories_name_key", "Category name already exists"))?
    .ok_or_else(|| ApiError::NotFound("Category not found".to_string()))?;

    Ok(Json(CategoryResponse { category }))
}

/// DELETE /api/v1/categories/{id} - 카테고리 삭제 (ADMIN, MANAGER)
#[utoipa::path(
    delete,
    path = "/api/v1/categories/{id}",
    tag = "categories",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "카테고리 ID")
    ),
    responses(
        (status = 204, description = "카테고리 삭제 성공"),
        (status = 404, description = "카테고리 없음")
    )
)]
pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    _manager: ManagerUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    info!("카테고리 삭제: {}", id);

    let deleted = CategoryRepository::delete(&state.db_pool, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Category not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// 카테고리 라우터 생성.
pub fn categories_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route(
            "/{id}",
            get(get_category)
                .put(update_category)
                .delete(delete_category),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::create_test_state;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use serde_json::json;
    use stockflow_core::Role;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_create_rejects_plain_user() {
        let state = Arc::new(create_test_state());
        let token = state
            .token_service
            .issue_access_token(Uuid::new_v4(), "user@test.local", Role::User)
            .unwrap();

        let response = categories_router()
            .with_state(state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(json!({"name": "전자기기"}).to_string()))
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
    async fn test_create_rejects_empty_name() {
        let state = Arc::new(create_test_state());
        let token = state
            .token_service
            .issue_access_token(Uuid::new_v4(), "manager@test.local", Role::Manager)
            .unwrap();

        let response = categories_router()
            .with_state(state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(json!({"name": ""}).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    #[ignore] // DB 연결 필요
    async fn test_delete_missing_category_returns_404() {
        let state = Arc::new(create_test_state());
        let token = state
            .token_service
            .issue_access_token(Uuid::new_v4(), "admin@test.local", Role::Admin)
            .unwrap();

        let response = categories_router()
            .with_state(state)
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/{}", Uuid::new_v4()))
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
