//! 상품 API 라우트
//!
//! 상품 CRUD와 재고 부족 조회를 제공합니다. 모든 엔드포인트는 인증이
//! 필요하며, 생성/수정은 {ADMIN, MANAGER}, 삭제는 {ADMIN}으로 제한됩니다.
//!
//! # 엔드포인트
//!
//! - `GET /api/v1/products` - 상품 목록 (필터: categoryId, active, search)
//! - `GET /api/v1/products/low-stock` - 재고 부족 상품 목록
//! - `GET /api/v1/products/{id}` - 상품 상세 조회
//! - `POST /api/v1/products` - 상품 생성 (ADMIN, MANAGER)
//! - `PUT /api/v1/products/{id}` - 상품 수정 (ADMIN, MANAGER)
//! - `DELETE /api/v1/products/{id}` - 상품 비활성화 (ADMIN)
//!
//! 삭제는 이동 이력 보존을 위해 `is_active = false` 비활성화로 처리됩니다.
//! 상품 수량은 여기서 변경할 수 없습니다. 재고 이동 API를 사용하세요.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::auth::{AdminUser, AuthUser, ManagerUser};
use crate::error::{map_unique_violation, ApiError, ApiResult};
use crate::repository::{NewProduct, ProductFilter, ProductRepository, UpdateProduct};
use crate::state::AppState;
use stockflow_core::Product;

// ================================================================================================
// Request/Response Types
// ================================================================================================

/// 가격 검증 (0 이상)
fn validate_non_negative_price(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() {
        return Err(ValidationError::new("negative_price")
            .with_message("Price must not be negative".into()));
    }
    Ok(())
}

/// 상품 목록 조회 쿼리 파라미터.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListProductsQuery {
    /// 카테고리 필터
    pub category_id: Option<Uuid>,
    /// 활성 여부 필터
    pub active: Option<bool>,
    /// 이름/SKU 부분 일치 검색
    pub search: Option<String>,
    /// 페이지 크기 (기본 50, 최대 200)
    pub limit: Option<i64>,
    /// 오프셋 (기본 0)
    pub offset: Option<i64>,
}

/// 상품 생성 요청.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    /// 재고 관리 코드 (고유)
    #[validate(length(min = 1, message = "SKU is required"))]
    pub sku: String,
    /// 상품명
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    /// 상품 설명
    pub description: Option<String>,
    /// 초기 수량 (기본 0)
    #[serde(default)]
    #[validate(range(min = 0, message = "Initial quantity must not be negative"))]
    pub quantity: i32,
    /// 최소 재고 수준 (기본 0)
    #[serde(default)]
    #[validate(range(min = 0, message = "Minimum stock must not be negative"))]
    pub min_stock: i32,
    /// 최대 재고 수준
    #[validate(range(min = 0, message = "Maximum stock must not be negative"))]
    pub max_stock: Option<i32>,
    /// 판매 가격
    #[validate(custom(function = "validate_non_negative_price"))]
    pub price: Decimal,
    /// 매입 원가
    #[validate(custom(function = "validate_non_negative_price"))]
    pub cost_price: Decimal,
    /// 소속 카테고리
    pub category_id: Option<Uuid>,
    /// 공급업체
    pub supplier_id: Option<Uuid>,
}

/// 상품 수정 요청.
///
/// 생략된 필드는 기존 값을 유지합니다. `quantity`는 수정할 수 없습니다.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, message = "SKU must not be empty"))]
    pub sku: Option<String>,
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0, message = "Minimum stock must not be negative"))]
    pub min_stock: Option<i32>,
    #[validate(range(min = 0, message = "Maximum stock must not be negative"))]
    pub max_stock: Option<i32>,
    #[validate(custom(function = "validate_non_negative_price"))]
    pub price: Option<Decimal>,
    #[validate(custom(function = "validate_non_negative_price"))]
    pub cost_price: Option<Decimal>,
    pub category_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
    pub is_active: Option<bool>,
}

/// 상품 목록 응답.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProductsListResponse {
    /// 상품 목록
    pub products: Vec<Product>,
    /// 총 개수
    pub total: usize,
}

/// 단일 상품 응답.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProductResponse {
    pub product: Product,
}

// ================================================================================================
// Handlers
// ================================================================================================

/// GET /api/v1/products - 상품 목록 조회
#[utoipa::path(
    get,
    path = "/api/v1/products",
    tag = "products",
    security(("bearer_auth" = [])),
    params(
        ("categoryId" = Option<Uuid>, Query, description = "카테고리 필터"),
        ("active" = Option<bool>, Query, description = "활성 여부 필터"),
        ("search" = Option<String>, Query, description = "이름/SKU 검색"),
        ("limit" = Option<i64>, Query, description = "페이지 크기 (기본 50, 최대 200)"),
        ("offset" = Option<i64>, Query, description = "오프셋")
    ),
    responses(
        (status = 200, description = "상품 목록", body = ProductsListResponse),
        (status = 401, description = "인증 필요")
    )
)]
pub async fn list_products(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Query(query): Query<ListProductsQuery>,
) -> ApiResult<Json<ProductsListResponse>> {
    debug!("상품 목록 조회");

    let filter = ProductFilter {
        category_id: query.category_id,
        active: query.active,
        search: query.search,
        limit: query.limit,
        offset: query.offset,
    };

    let products = ProductRepository::list(&state.db_pool, filter).await?;
    let total = products.len();

    Ok(Json(ProductsListResponse { products, total }))
}

/// GET /api/v1/products/low-stock - 재고 부족 상품 목록
#[utoipa::path(
    get,
    path = "/api/v1/products/low-stock",
    tag = "products",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "재고 부족 상품 목록", body = ProductsListResponse),
        (status = 401, description = "인증 필요")
    )
)]
pub async fn list_low_stock(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
) -> ApiResult<Json<ProductsListResponse>> {
    let products = ProductRepository::list_low_stock(&state.db_pool).await?;
    let total = products.len();

    Ok(Json(ProductsListResponse { products, total }))
}

/// GET /api/v1/products/{id} - 상품 상세 조회
#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    tag = "products",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "상품 ID")
    ),
    responses(
        (status = 200, description = "상품 상세", body = ProductResponse),
        (status = 404, description = "상품 없음")
    )
)]
pub async fn get_product(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ProductResponse>> {
    let product = ProductRepository::find_by_id(&state.db_pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

    Ok(Json(ProductResponse { product }))
}

/// POST /api/v1/products - 상품 생성 (ADMIN, MANAGER)
#[utoipa::path(
    post,
    path = "/api/v1/products",
    tag = "products",
    security(("bearer_auth" = [])),
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "상품 생성 성공", body = ProductResponse),
        (status = 400, description = "유효성 검사 실패"),
        (status = 409, description = "이미 존재하는 SKU")
    )
)]
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    _manager: ManagerUser,
    Json(request): Json<CreateProductRequest>,
) -> ApiResult<(StatusCode, Json<ProductResponse>)> {
    info!("상품 생성: {}", request.sku);

    request.validate()?;

    let product = ProductRepository::create(
        &state.db_pool,
        NewProduct {
            sku: request.sku,
            name: request.name,
            description: request.description,
            quantity: request.quantity,
            min_stock: request.min_stock,
            max_stock: request.max_stock,
            price: request.price,
            cost_price: request.cost_price,
            category_id: request.category_id,
            supplier_id: request.supplier_id,
        },
    )
    .await
    .map_err(|e| map_unique_violation(e, "products_sku_key", "SKU already exists"))?;

    Ok((StatusCode::CREATED, Json(ProductResponse { product })))
}

/// PUT /api/v1/products/{id} - 상품 수정 (ADMIN, MANAGER)
#[utoipa::path(
    put,
    path = "/api/v1/products/{id}",
    tag = "products",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "상품 ID")
    ),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "상품 수정 성공", body = ProductResponse),
        (status = 404, description = "상품 없음"),
        (status = 409, description = "이미 존재하는 SKU")
    )
)]
pub async fn update_product(
    State(state): State<Arc<AppState>>,
    _manager: ManagerUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateProductRequest>,
) -> ApiResult<Json<ProductResponse>> {
    info!("상품 수정: {}", id);

    request.validate()?;

    let product = ProductRepository::update(
        &state.db_pool,
        id,
        UpdateProduct {
            sku: request.sku,
            name: request.name,
            description: request.description,
            min_stock: request.min_stock,
            max_stock: request.max_stock,
            price: request.price,
            cost_price: request.cost_price,
            category_id: request.category_id,
            supplier_id: request.supplier_id,
            is_active: request.is_active,
        },
    )
    .await
    .map_err(|e| map_unique_violation(e, "products_sku_key", "SKU already exists"))?
    .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

    Ok(Json(ProductResponse { product }))
}

/// DELETE /api/v1/products/{id} - 상품 비활성화 (ADMIN)
#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}",
    tag = "products",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "상품 ID")
    ),
    responses(
        (status = 200, description = "비활성화 성공", body = ProductResponse),
        (status = 404, description = "상품 없음")
    )
)]
pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ProductResponse>> {
    info!("상품 비활성화: {}", id);

    let product = ProductRepository::deactivate(&state.db_pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

    Ok(Json(ProductResponse { product }))
}

/// 상품 라우터 생성.
pub fn products_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/low-stock", get(list_low_stock))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
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
    async fn test_list_requires_token() {
        let app = products_router().with_state(Arc::new(create_test_state()));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_rejects_staff_role() {
        let state = Arc::new(create_test_state());
        let token = state
            .token_service
            .issue_access_token(Uuid::new_v4(), "staff@test.local", Role::Staff)
            .unwrap();

        let response = products_router()
            .with_state(state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({"sku": "SKU-001", "name": "노트북", "price": "1000", "costPrice": "700"})
                            .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_create_rejects_negative_quantity() {
        let state = Arc::new(create_test_state());
        let token = state
            .token_service
            .issue_access_token(Uuid::new_v4(), "manager@test.local", Role::Manager)
            .unwrap();

        // 유효성 검사 실패는 DB 접근 전에 발생
        let response = products_router()
            .with_state(state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({
                            "sku": "SKU-001",
                            "name": "노트북",
                            "quantity": -5,
                            "price": "1000",
                            "costPrice": "700"
                        })
                        .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    #[ignore] // DB 연결 필요
    async fn test_create_get_deactivate_flow() {
        let state = Arc::new(create_test_state());
        let token = state
            .token_service
            .issue_access_token(Uuid::new_v4(), "admin@test.local", Role::Admin)
            .unwrap();
        let sku = format!("SKU-{}", Uuid::new_v4().simple());

        let response = products_router()
            .with_state(state.clone())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({"sku": sku, "name": "통합테스트 상품", "price": "5000", "costPrice": "3000"})
                            .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let created: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let id = created["product"]["id"].as_str().unwrap().to_string();

        let response = products_router()
            .with_state(state)
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/{id}"))
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let deactivated: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(deactivated["product"]["isActive"], false);
    }
}
