//! 공급업체 API 라우트
//!
//! 매입처 관리 CRUD를 제공합니다. 조회는 모든 인증 사용자,
//! 생성/수정/삭제는 {ADMIN, MANAGER}로 제한됩니다.
//!
//! # 엔드포인트
//!
//! - `GET /api/v1/suppliers` - 공급업체 목록
//! - `GET /api/v1/suppliers/{id}` - 공급업체 조회
//! - `POST /api/v1/suppliers` - 공급업체 등록 (ADMIN, MANAGER)
//! - `PUT /api/v1/suppliers/{id}` - 공급업체 수정 (ADMIN, MANAGER)
//! - `DELETE /api/v1/suppliers/{id}` - 공급업체 삭제 (ADMIN, MANAGER)

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
use crate::error::{ApiError, ApiResult};
use crate::repository::{NewSupplier, SupplierRepository, UpdateSupplier};
use crate::state::AppState;
use stockflow_core::Supplier;

// ================================================================================================
// Request/Response Types
// ================================================================================================

/// 공급업체 등록 요청.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSupplierRequest {
    /// 업체명
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    /// 담당자명
    pub contact_name: Option<String>,
    /// 담당자 이메일
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    /// 연락처
    pub phone: Option<String>,
    /// 주소
    pub address: Option<String>,
}

/// 공급업체 수정 요청.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSupplierRequest {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: Option<String>,
    pub contact_name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub is_active: Option<bool>,
}

/// 공급업체 목록 응답.
#[derive(Debug, Serialize, ToSchema)]
pub struct SuppliersListResponse {
    pub suppliers: Vec<Supplier>,
    pub total: usize,
}

/// 단일 공급업체 응답.
#[derive(Debug, Serialize, ToSchema)]
pub struct SupplierResponse {
    pub supplier: Supplier,
}

// ================================================================================================
// Handlers
// ================================================================================================

/// GET /api/v1/suppliers - 공급업체 목록 조회
#[utoipa::path(
    get,
    path = "/api/v1/suppliers",
    tag = "suppliers",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "공급업체 목록", body = SuppliersListResponse),
        (status = 401, description = "인증 필요")
    )
)]
pub async fn list_suppliers(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
) -> ApiResult<Json<SuppliersListResponse>> {
    let suppliers = SupplierRepository::list(&state.db_pool).await?;
    let total = suppliers.len();

    Ok(Json(SuppliersListResponse { suppliers, total }))
}

/// GET /api/v1/suppliers/{id} - 공급업체 조회
#[utoipa::path(
    get,
    path = "/api/v1/suppliers/{id}",
    tag = "suppliers",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "공급업체 ID")
    ),
    responses(
        (status = 200, description = "공급업체 상세", body = SupplierResponse),
        (status = 404, description = "공급업체 없음")
    )
)]
pub async fn get_supplier(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SupplierResponse>> {
    let supplier = SupplierRepository::find_by_id(&state.db_pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Supplier not found".to_string()))?;

    Ok(Json(SupplierResponse { supplier }))
}

/// POST /api/v1/suppliers - 공급업체 등록 (ADMIN, MANAGER)
#[utoipa::path(
    post,
    path = "/api/v1/suppliers",
    tag = "suppliers",
    security(("bearer_auth" = [])),
    request_body = CreateSupplierRequest,
    responses(
        (status = 201, description = "공급업체 등록 성공", body = SupplierResponse),
        (status = 400, description = "유효성 검사 실패")
    )
)]
pub async fn create_supplier(
    State(state): State<Arc<AppState>>,
    _manager: ManagerUser,
    Json(request): Json<CreateSupplierRequest>,
) -> ApiResult<(StatusCode, Json<SupplierResponse>)> {
    info!("공급업체 등록: {}", request.name);

    request.validate()?;

    let supplier = SupplierRepository::create(
        &state.db_pool,
        NewSupplier {
            name: request.name,
            contact_name: request.contact_name,
            email: request.email,
            phone: request.phone,
            address: request.address,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(SupplierResponse { supplier })))
}

/// PUT /api/v1/suppliers/{id} - 공급업체 수정 (ADMIN, MANAGER)
#[utoipa::path(
    put,
    path = "/api/v1/suppliers/{id}",
    tag = "suppliers",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "공급업체 ID")
    ),
    request_body = UpdateSupplierRequest,
    responses(
        (status = 200, description = "공급업체 수정 성공", body = SupplierResponse),
        (status = 404, description = "공급업체 없음")
    )
)]
pub async fn update_supplier(
    State(state): State<Arc<AppState>>,
    _manager: ManagerUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateSupplierRequest>,
) -> ApiResult<Json<SupplierResponse>> {
    request.validate()?;

    let supplier = SupplierRepository::update(
        &state.db_pool,
        id,
        UpdateSupplier {
            name: request.name,
            contact_name: request.contact_name,
            email: request.email,
            phone: request.phone,
            address: request.address,
            is_active: request.is_active,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Supplier not found".to_string()))?;

    Ok(Json(SupplierResponse { supplier }))
}

/// DELETE /api/v1/suppliers/{id} - 공급업체 삭제 (ADMIN, MANAGER)
#[utoipa::path(
    delete,
    path = "/api/v1/suppliers/{id}",
    tag = "suppliers",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "공급업체 ID")
    ),
    responses(
        (status = 204, description = "공급업체 삭제 성공"),
        (status = 404, description = "공급업체 없음")
    )
)]
pub async fn delete_supplier(
    State(state): State<Arc<AppState>>,
    _manager: ManagerUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    info!("공급업체 삭제: {}", id);

    let deleted = SupplierRepository::delete(&state.db_pool, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Supplier not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// 공급업체 라우터 생성.
pub fn suppliers_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_suppliers).post(create_supplier))
        .route(
            "/{id}",
            get(get_supplier)
                .put(update_supplier)
                .delete(delete_supplier),
        )
}
