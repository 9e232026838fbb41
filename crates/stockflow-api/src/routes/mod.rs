//! API 라우트.
//!
//! 모든 REST API 엔드포인트를 정의하고 라우터를 구성합니다.
//!
//! # 라우트 구조
//!
//! - `/health` - 헬스 체크 (liveness)
//! - `/health/ready` - 상세 헬스 체크 (readiness)
//! - `/api/v1/auth` - 회원가입, 로그인, 토큰 갱신, 내 정보
//! - `/api/v1/users` - 사용자 관리 (ADMIN)
//! - `/api/v1/products` - 상품 관리
//! - `/api/v1/categories` - 카테고리 관리
//! - `/api/v1/suppliers` - 공급업체 관리
//! - `/api/v1/orders` - 발주 주문 관리
//! - `/api/v1/stock-movements` - 재고 이동 기록/이력

pub mod auth;
pub mod categories;
pub mod health;
pub mod orders;
pub mod products;
pub mod stock_movements;
pub mod suppliers;
pub mod users;

pub use auth::{auth_router, AuthResponse, LoginRequest, RegisterRequest, TokenResponse};
pub use categories::{categories_router, CategoriesListResponse, CategoryResponse};
pub use health::{health_router, ComponentHealth, ComponentStatus, HealthResponse};
pub use orders::{orders_router, OrderDetailResponse, OrderResponse, OrdersListResponse};
pub use products::{products_router, ProductResponse, ProductsListResponse};
pub use stock_movements::{
    stock_movements_router, MovementCreatedResponse, MovementResponse, MovementsListResponse,
};
pub use suppliers::{suppliers_router, SupplierResponse, SuppliersListResponse};
pub use users::{users_router, UpdateRoleRequest, UsersListResponse};

use axum::Router;
use std::sync::Arc;

use crate::state::AppState;

/// 전체 API 라우터 생성.
///
/// 모든 서브 라우터를 조합하여 하나의 라우터로 반환합니다.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        // 헬스 체크 엔드포인트
        .nest("/health", health_router())
        // API v1 엔드포인트
        .nest("/api/v1/auth", auth_router())
        .nest("/api/v1/users", users_router())
        .nest("/api/v1/products", products_router())
        .nest("/api/v1/categories", categories_router())
        .nest("/api/v1/suppliers", suppliers_router())
        .nest("/api/v1/orders", orders_router())
        .nest("/api/v1/stock-movements", stock_movements_router())
}
