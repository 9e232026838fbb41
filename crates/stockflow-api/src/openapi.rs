//! OpenAPI 문서화 설정.
//!
//! utoipa를 사용하여 REST API의 OpenAPI 3.0 스펙을 생성합니다.
//! Swagger UI는 `/swagger-ui` 경로에서 사용 가능합니다.
//!
//! # 자동 생성 구조
//!
//! 각 라우트 모듈은 자체 스키마를 정의하고, 중앙 `ApiDoc`에서 집계합니다.
//! 새로운 엔드포인트를 추가할 때:
//!
//! 1. 응답/요청 타입에 `#[derive(ToSchema)]` 추가
//! 2. 핸들러에 `#[utoipa::path(...)]` 어노테이션 추가
//! 3. 이 파일의 `components(schemas(...))` 및 `paths(...)` 섹션에 추가

use axum::Router;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

// ==================== 각 모듈에서 스키마 Import ====================

use crate::routes::{
    auth::{MeResponse, RefreshRequest},
    categories::{CreateCategoryRequest, UpdateCategoryRequest},
    orders::{
        CreateOrderItemRequest, CreateOrderRequest, OrderItemResponse, UpdateOrderStatusRequest,
    },
    products::{CreateProductRequest, UpdateProductRequest},
    stock_movements::{CreateMovementRequest, ProductSummary, UserSummary},
    suppliers::{CreateSupplierRequest, UpdateSupplierRequest},
    users::UserResponse,
    AuthResponse, CategoriesListResponse, CategoryResponse, ComponentHealth, ComponentStatus,
    HealthResponse, LoginRequest, MovementCreatedResponse, MovementResponse,
    MovementsListResponse, OrderDetailResponse, OrderResponse, OrdersListResponse,
    ProductResponse, ProductsListResponse, RegisterRequest, SupplierResponse,
    SuppliersListResponse, TokenResponse, UpdateRoleRequest, UsersListResponse,
};
use stockflow_core::{
    Category, MovementType, Order, OrderStatus, Product, Role, StockMovement, Supplier, User,
};

// ==================== OpenAPI 문서 정의 ====================

/// StockFlow API 문서.
///
/// 모든 엔드포인트와 스키마를 포함하는 OpenAPI 3.0 스펙입니다.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "StockFlow Inventory API",
        version = "0.1.0",
        description = r#"
# StockFlow 재고 관리 REST API

상품, 카테고리, 공급업체, 발주 주문, 재고 이동을 관리하는 REST API입니다.

## 주요 기능

- **상품 관리**: SKU 기반 상품 CRUD 및 재고 부족 조회
- **재고 이동**: 입고/출고/조정/반품/폐기 기록 (수량 변경과 원자적 처리)
- **발주 주문**: 공급업체 발주 생성 및 상태 추적
- **사용자 관리**: 역할 기반 접근 제어 (USER, STAFF, MANAGER, ADMIN)

## 인증

`/api/v1/auth`와 헬스 체크를 제외한 모든 엔드포인트는 JWT Bearer 토큰
인증이 필요합니다. `Authorization: Bearer <token>` 헤더를 포함하세요.

## 역할별 권한

- **USER**: 조회 전용
- **STAFF**: 조회 + 재고 이동 기록 + 주문 생성
- **MANAGER**: STAFF 권한 + 상품/카테고리/공급업체 관리 + 주문 상태 변경
- **ADMIN**: 전체 권한 + 사용자 관리 + 상품 비활성화
"#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "로컬 개발 서버"),
    ),
    tags(
        (name = "health", description = "헬스 체크 - 서버 상태 확인"),
        (name = "auth", description = "인증 - 회원가입, 로그인, 토큰 갱신"),
        (name = "users", description = "사용자 관리 - 역할 변경 (ADMIN)"),
        (name = "products", description = "상품 관리 - 상품 CRUD 및 재고 부족 조회"),
        (name = "categories", description = "카테고리 관리 - 상품 분류"),
        (name = "suppliers", description = "공급업체 관리 - 매입처 정보"),
        (name = "orders", description = "발주 주문 - 공급업체 발주 및 상태 추적"),
        (name = "stock-movements", description = "재고 이동 - 입출고 기록 및 이력")
    ),
    modifiers(&SecurityAddon),
    // ==================== 스키마 등록 ====================
    components(
        schemas(
            // ===== 도메인 엔티티 =====
            User,
            Role,
            Product,
            Category,
            Supplier,
            StockMovement,
            MovementType,
            Order,
            OrderStatus,

            // ===== Health =====
            HealthResponse,
            ComponentHealth,
            ComponentStatus,

            // ===== Auth =====
            RegisterRequest,
            LoginRequest,
            RefreshRequest,
            AuthResponse,
            TokenResponse,
            MeResponse,

            // ===== Users =====
            UsersListResponse,
            UpdateRoleRequest,
            UserResponse,

            // ===== Products =====
            CreateProductRequest,
            UpdateProductRequest,
            ProductsListResponse,
            ProductResponse,

            // ===== Categories =====
            CreateCategoryRequest,
            UpdateCategoryRequest,
            CategoriesListResponse,
            CategoryResponse,

            // ===== Suppliers =====
            CreateSupplierRequest,
            UpdateSupplierRequest,
            SuppliersListResponse,
            SupplierResponse,

            // ===== Orders =====
            CreateOrderRequest,
            CreateOrderItemRequest,
            UpdateOrderStatusRequest,
            OrderItemResponse,
            OrdersListResponse,
            OrderDetailResponse,
            OrderResponse,

            // ===== Stock Movements =====
            CreateMovementRequest,
            ProductSummary,
            UserSummary,
            MovementResponse,
            MovementsListResponse,
            MovementCreatedResponse,
        )
    ),
    // ==================== 경로 등록 ====================
    paths(
        // ===== Health =====
        crate::routes::health::health_check,
        crate::routes::health::health_ready,

        // ===== Auth =====
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::refresh,
        crate::routes::auth::me,

        // ===== Users =====
        crate::routes::users::list_users,
        crate::routes::users::update_user_role,

        // ===== Products =====
        crate::routes::products::list_products,
        crate::routes::products::list_low_stock,
        crate::routes::products::get_product,
        crate::routes::products::create_product,
        crate::routes::products::update_product,
        crate::routes::products::delete_product,

        // ===== Categories =====
        crate::routes::categories::list_categories,
        crate::routes::categories::get_category,
        crate::routes::categories::create_category,
        crate::routes::categories::update_category,
        crate::routes::categories::delete_category,

        // ===== Suppliers =====
        crate::routes::suppliers::list_suppliers,
        crate::routes::suppliers::get_supplier,
        crate::routes::suppliers::create_supplier,
        crate::routes::suppliers::update_supplier,
        crate::routes::suppliers::delete_supplier,

        // ===== Orders =====
        crate::routes::orders::list_orders,
        crate::routes::orders::get_order,
        crate::routes::orders::create_order,
        crate::routes::orders::update_order_status,

        // ===== Stock Movements =====
        crate::routes::stock_movements::list_movements,
        crate::routes::stock_movements::create_movement,
    )
)]
pub struct ApiDoc;

/// Bearer 토큰 보안 스킴 등록.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

// ==================== Swagger UI 라우터 ====================

/// Swagger UI 라우터 생성.
///
/// 다음 경로에 문서 UI를 마운트합니다:
/// - `/swagger-ui` - Swagger UI 대화형 문서
/// - `/api-docs/openapi.json` - OpenAPI JSON 스펙
pub fn swagger_ui_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}

// ==================== 테스트 ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_valid() {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_string_pretty(&spec).unwrap();

        // 기본 정보 확인
        assert!(json.contains("StockFlow Inventory API"));

        // 태그 확인
        assert!(json.contains("health"));
        assert!(json.contains("auth"));
        assert!(json.contains("products"));
        assert!(json.contains("stock-movements"));

        // 경로 확인
        assert!(json.contains("/health"));
        assert!(json.contains("/health/ready"));
        assert!(json.contains("/api/v1/auth/register"));
        assert!(json.contains("/api/v1/products/low-stock"));
        assert!(json.contains("/api/v1/stock-movements"));
        assert!(json.contains("/api/v1/orders/{id}/status"));
    }

    #[test]
    fn test_swagger_ui_router_creates() {
        let _router: Router<()> = swagger_ui_router();
    }

    #[test]
    fn test_openapi_contains_schemas() {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_string(&spec).unwrap();

        // 스키마 확인
        assert!(json.contains("HealthResponse"));
        assert!(json.contains("CreateMovementRequest"));
        assert!(json.contains("MovementType"));
        assert!(json.contains("OrderStatus"));
        assert!(json.contains("AuthResponse"));
    }

    #[test]
    fn test_openapi_registers_bearer_scheme() {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_string(&spec).unwrap();

        assert!(json.contains("bearer_auth"));
        assert!(json.contains("JWT"));
    }
}
