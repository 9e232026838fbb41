//! 발주 주문 API 라우트
//!
//! 공급업체 발주 주문의 생성, 조회, 상태 변경을 제공합니다.
//!
//! # 엔드포인트
//!
//! - `GET /api/v1/orders` - 주문 목록 (필터: status)
//! - `GET /api/v1/orders/{id}` - 주문 상세 (항목 포함)
//! - `POST /api/v1/orders` - 주문 생성 (ADMIN, MANAGER, STAFF)
//! - `PUT /api/v1/orders/{id}/status` - 주문 상태 변경 (ADMIN, MANAGER)
//!
//! 주문은 재고를 변경하지 않습니다. 실제 입고는 재고 이동 API로 기록합니다.
//! COMPLETED/CANCELLED 주문의 상태는 더 이상 변경할 수 없습니다.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::{AuthUser, ManagerUser, StaffUser};
use crate::error::{ApiError, ApiResult};
use crate::repository::{NewOrder, NewOrderItem, OrderFilter, OrderItemDetail, OrderRepository};
use crate::state::AppState;
use stockflow_core::{Order, OrderStatus};

// ================================================================================================
// Request/Response Types
// ================================================================================================

/// 주문 목록 조회 쿼리 파라미터.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListOrdersQuery {
    /// 상태 필터 (PENDING, COMPLETED, CANCELLED)
    pub status: Option<OrderStatus>,
    /// 페이지 크기 (기본 50, 최대 200)
    pub limit: Option<i64>,
    /// 오프셋 (기본 0)
    pub offset: Option<i64>,
}

/// 주문 생성 요청.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    /// 공급업체 (선택)
    pub supplier_id: Option<Uuid>,
    /// 비고
    pub notes: Option<String>,
    /// 주문 항목 (최소 1개)
    pub items: Vec<CreateOrderItemRequest>,
}

/// 주문 항목 생성 요청.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderItemRequest {
    pub product_id: Uuid,
    pub quantity: i32,
    /// 단가 (생략 시 상품 매입 원가 적용)
    pub unit_price: Option<Decimal>,
}

/// 주문 상태 변경 요청.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

/// 주문 항목 응답.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemResponse {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub product_name: String,
    pub product_sku: String,
}

impl From<OrderItemDetail> for OrderItemResponse {
    fn from(item: OrderItemDetail) -> Self {
        Self {
            id: item.id,
            order_id: item.order_id,
            product_id: item.product_id,
            quantity: item.quantity,
            unit_price: item.unit_price,
            product_name: item.product_name,
            product_sku: item.product_sku,
        }
    }
}

/// 주문 목록 응답.
#[derive(Debug, Serialize, ToSchema)]
pub struct OrdersListResponse {
    pub orders: Vec<Order>,
    pub total: usize,
}

/// 주문 상세 응답 (항목 포함).
#[derive(Debug, Serialize, ToSchema)]
pub struct OrderDetailResponse {
    pub order: Order,
    pub items: Vec<OrderItemResponse>,
}

/// 단일 주문 응답.
#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub order: Order,
}

// ================================================================================================
// Handlers
// ================================================================================================

/// GET /api/v1/orders - 주문 목록 조회
#[utoipa::path(
    get,
    path = "/api/v1/orders",
    tag = "orders",
    security(("bearer_auth" = [])),
    params(
        ("status" = Option<String>, Query, description = "상태 필터 (PENDING, COMPLETED, CANCELLED)"),
        ("limit" = Option<i64>, Query, description = "페이지 크기 (기본 50, 최대 200)"),
        ("offset" = Option<i64>, Query, description = "오프셋")
    ),
    responses(
        (status = 200, description = "주문 목록", body = OrdersListResponse),
        (status = 401, description = "인증 필요")
    )
)]
pub async fn list_orders(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Query(query): Query<ListOrdersQuery>,
) -> ApiResult<Json<OrdersListResponse>> {
    debug!("주문 목록 조회");

    let orders = OrderRepository::list(
        &state.db_pool,
        OrderFilter {
            status: query.status,
            limit: query.limit,
            offset: query.offset,
        },
    )
    .await?;
    let total = orders.len();

    Ok(Json(OrdersListResponse { orders, total }))
}

/// GET /api/v1/orders/{id} - 주문 상세 조회
#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    tag = "orders",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "주문 ID")
    ),
    responses(
        (status = 200, description = "주문 상세", body = OrderDetailResponse),
        (status = 404, description = "주문 없음")
    )
)]
pub async fn get_order(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<OrderDetailResponse>> {
    let order = OrderRepository::find_by_id(&state.db_pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Order not found".to_string()))?;

    let items = OrderRepository::items(&state.db_pool, id)
        .await?
        .into_iter()
        .map(OrderItemResponse::from)
        .collect();

    Ok(Json(OrderDetailResponse { order, items }))
}

/// POST /api/v1/orders - 주문 생성 (ADMIN, MANAGER, STAFF)
#[utoipa::path(
    post,
    path = "/api/v1/orders",
    tag = "orders",
    security(("bearer_auth" = [])),
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "주문 생성 성공", body = OrderDetailResponse),
        (status = 400, description = "유효성 검사 실패"),
        (status = 404, description = "상품 또는 공급업체 없음")
    )
)]
pub async fn create_order(
    State(state): State<Arc<AppState>>,
    StaffUser(claims): StaffUser,
    Json(request): Json<CreateOrderRequest>,
) -> ApiResult<(StatusCode, Json<OrderDetailResponse>)> {
    info!("주문 생성: 항목 {}건, 요청자 {}", request.items.len(), claims.email);

    let (order, items) = OrderRepository::create(
        &state.db_pool,
        claims.user_id,
        NewOrder {
            supplier_id: request.supplier_id,
            notes: request.notes,
            items: request
                .items
                .into_iter()
                .map(|item| NewOrderItem {
                    product_id: item.product_id,
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                })
                .collect(),
        },
    )
    .await?;

    crate::metrics::record_order_created();

    let items = items.into_iter().map(OrderItemResponse::from).collect();

    Ok((
        StatusCode::CREATED,
        Json(OrderDetailResponse { order, items }),
    ))
}

/// PUT /api/v1/orders/{id}/status - 주문 상태 변경 (ADMIN, MANAGER)
#[utoipa::path(
    put,
    path = "/api/v1/orders/{id}/status",
    tag = "orders",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "주문 ID")
    ),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "상태 변경 성공", body = OrderResponse),
        (status = 404, description = "주문 없음"),
        (status = 409, description = "이미 확정된 주문")
    )
)]
pub async fn update_order_status(
    State(state): State<Arc<AppState>>,
    _manager: ManagerUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateOrderStatusRequest>,
) -> ApiResult<Json<OrderResponse>> {
    info!("주문 상태 변경: {} -> {}", id, request.status);

    let order = OrderRepository::update_status(&state.db_pool, id, request.status).await?;

    Ok(Json(OrderResponse { order }))
}

/// 주문 라우터 생성.
pub fn orders_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route("/{id}", get(get_order))
        .route("/{id}/status", put(update_order_status))
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

        let response = orders_router()
            .with_state(state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({"items": [{"productId": Uuid::new_v4(), "quantity": 1}]})
                            .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_status_update_rejects_staff_role() {
        let state = Arc::new(create_test_state());
        let token = state
            .token_service
            .issue_access_token(Uuid::new_v4(), "staff@test.local", Role::Staff)
            .unwrap();

        let response = orders_router()
            .with_state(state)
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri(format!("/{}/status", Uuid::new_v4()))
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(json!({"status": "COMPLETED"}).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    #[ignore] // DB 연결 필요
    async fn test_staff_creates_order_with_camel_case_body() {
        use crate::repository::{NewProduct, ProductRepository};
        use rust_decimal_macros::dec;

        let state = Arc::new(create_test_state());

        let product = ProductRepository::create(
            &state.db_pool,
            NewProduct {
                sku: format!("SKU-{}", Uuid::new_v4().simple()),
                name: "주문 라우트 테스트 상품".to_string(),
                description: None,
                quantity: 0,
                min_stock: 0,
                max_stock: None,
                price: dec!(20000),
                cost_price: dec!(12000),
                category_id: None,
                supplier_id: None,
            },
        )
        .await
        .unwrap();

        // 발주 담당자는 users 테이블에 있어야 외래 키가 성립
        let staff = crate::repository::UserRepository::create(
            &state.db_pool,
            crate::repository::NewUser {
                email: format!("staff-{}@test.local", Uuid::new_v4().simple()),
                password_hash: "$argon2id$fake".to_string(),
                name: "창고담당".to_string(),
                role: Role::Staff,
            },
        )
        .await
        .unwrap();
        let token = state
            .token_service
            .issue_access_token(staff.id, &staff.email, Role::Staff)
            .unwrap();

        let response = orders_router()
            .with_state(state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({
                            "notes": "라우트 통합 테스트",
                            "items": [{"productId": product.id, "quantity": 3, "unitPrice": "11000"}]
                        })
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
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json["order"]["orderNumber"].as_str().unwrap().starts_with("ORD-"));
        assert_eq!(json["order"]["status"], "PENDING");
        assert_eq!(json["items"][0]["unitPrice"], "11000");
        assert_eq!(json["items"][0]["productSku"], product.sku);
    }
}
