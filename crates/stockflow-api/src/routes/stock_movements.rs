//! 재고 이동 API 라우트
//!
//! 입고/출고/조정/반품/폐기 이동의 기록과 이력 조회를 제공합니다.
//!
//! # 엔드포인트
//!
//! - `GET /api/v1/stock-movements` - 이동 이력 (필터: productId, type)
//! - `POST /api/v1/stock-movements` - 이동 기록 (ADMIN, MANAGER, STAFF)
//!
//! 이동 기록은 상품 수량 변경과 하나의 트랜잭션으로 처리됩니다.
//! 수량 부호 규칙(출고 초과, 음수 입고 등)은 서버에서 검증합니다.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::{AuthUser, StaffUser};
use crate::error::ApiResult;
use crate::metrics;
use crate::repository::{MovementFilter, MovementRecord, MovementRepository, NewMovement};
use crate::state::AppState;
use stockflow_core::MovementType;

// ================================================================================================
// Request/Response Types
// ================================================================================================

/// 이동 이력 조회 쿼리 파라미터.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListMovementsQuery {
    /// 상품 필터
    pub product_id: Option<Uuid>,
    /// 이동 유형 필터 (IN, OUT, ADJUSTMENT, RETURN, DAMAGED)
    #[serde(rename = "type")]
    pub movement_type: Option<MovementType>,
    /// 페이지 크기 (기본 50, 최대 200)
    pub limit: Option<i64>,
    /// 오프셋 (기본 0)
    pub offset: Option<i64>,
}

/// 재고 이동 생성 요청.
///
/// `quantity`의 부호 규칙은 이동 유형별로 다르므로 여기서 범위 검증을
/// 하지 않습니다. IN/OUT/RETURN/DAMAGED는 양수 요구, ADJUSTMENT는
/// 0 이상의 절대 수량을 받습니다.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMovementRequest {
    /// 이동 유형
    #[serde(rename = "type")]
    pub movement_type: MovementType,
    /// 수량 (유형별 해석)
    pub quantity: i32,
    /// 대상 상품
    pub product_id: Uuid,
    /// 사유
    pub reason: Option<String>,
    /// 참조 번호 (발주서, 송장 등)
    pub reference: Option<String>,
}

/// 이동 레코드에 내장되는 상품 요약.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProductSummary {
    pub id: Uuid,
    pub name: String,
    pub sku: String,
}

/// 이동 레코드에 내장되는 사용자 요약.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// 재고 이동 응답.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovementResponse {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub movement_type: MovementType,
    pub quantity: i32,
    pub reason: Option<String>,
    pub reference: Option<String>,
    pub product_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub product: ProductSummary,
    pub user: UserSummary,
}

impl From<MovementRecord> for MovementResponse {
    fn from(record: MovementRecord) -> Self {
        Self {
            id: record.id,
            movement_type: record.movement_type,
            quantity: record.quantity,
            reason: record.reason,
            reference: record.reference,
            product_id: record.product_id,
            user_id: record.user_id,
            created_at: record.created_at,
            product: ProductSummary {
                id: record.product_id,
                name: record.product_name,
                sku: record.product_sku,
            },
            user: UserSummary {
                id: record.user_id,
                name: record.user_name,
                email: record.user_email,
            },
        }
    }
}

/// 이동 이력 응답.
#[derive(Debug, Serialize, ToSchema)]
pub struct MovementsListResponse {
    pub movements: Vec<MovementResponse>,
    pub total: usize,
}

/// 단일 이동 응답.
#[derive(Debug, Serialize, ToSchema)]
pub struct MovementCreatedResponse {
    pub movement: MovementResponse,
}

// ================================================================================================
// Handlers
// ================================================================================================

/// GET /api/v1/stock-movements - 이동 이력 조회
#[utoipa::path(
    get,
    path = "/api/v1/stock-movements",
    tag = "stock-movements",
    security(("bearer_auth" = [])),
    params(
        ("productId" = Option<Uuid>, Query, description = "상품 필터"),
        ("type" = Option<String>, Query, description = "이동 유형 필터 (IN, OUT, ADJUSTMENT, RETURN, DAMAGED)"),
        ("limit" = Option<i64>, Query, description = "페이지 크기 (기본 50, 최대 200)"),
        ("offset" = Option<i64>, Query, description = "오프셋")
    ),
    responses(
        (status = 200, description = "이동 이력 (최신순)", body = MovementsListResponse),
        (status = 401, description = "인증 필요")
    )
)]
pub async fn list_movements(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Query(query): Query<ListMovementsQuery>,
) -> ApiResult<Json<MovementsListResponse>> {
    debug!("재고 이동 이력 조회");

    let records = MovementRepository::list(
        &state.db_pool,
        MovementFilter {
            product_id: query.product_id,
            movement_type: query.movement_type,
            limit: query.limit,
            offset: query.offset,
        },
    )
    .await?;

    let movements: Vec<MovementResponse> =
        records.into_iter().map(MovementResponse::from).collect();
    let total = movements.len();

    Ok(Json(MovementsListResponse { movements, total }))
}

/// POST /api/v1/stock-movements - 재고 이동 기록 (ADMIN, MANAGER, STAFF)
#[utoipa::path(
    post,
    path = "/api/v1/stock-movements",
    tag = "stock-movements",
    security(("bearer_auth" = [])),
    request_body = CreateMovementRequest,
    responses(
        (status = 201, description = "이동 기록 성공", body = MovementCreatedResponse),
        (status = 400, description = "재고 부족 또는 유효성 검사 실패"),
        (status = 404, description = "상품 없음")
    )
)]
pub async fn create_movement(
    State(state): State<Arc<AppState>>,
    StaffUser(claims): StaffUser,
    Json(request): Json<CreateMovementRequest>,
) -> ApiResult<(StatusCode, Json<MovementCreatedResponse>)> {
    info!(
        "재고 이동 기록: {} {} x{}, 요청자 {}",
        request.movement_type, request.product_id, request.quantity, claims.email
    );

    let record = MovementRepository::record(
        &state.db_pool,
        claims.user_id,
        NewMovement {
            movement_type: request.movement_type,
            quantity: request.quantity,
            product_id: request.product_id,
            reason: request.reason,
            reference: request.reference,
        },
    )
    .await
    .inspect_err(|err| {
        if matches!(err, crate::error::ApiError::InsufficientStock) {
            metrics::record_insufficient_stock();
        }
    })?;

    metrics::record_stock_movement(record.movement_type.as_str());

    Ok((
        StatusCode::CREATED,
        Json(MovementCreatedResponse {
            movement: record.into(),
        }),
    ))
}

/// 재고 이동 라우터 생성.
pub fn stock_movements_router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(list_movements).post(create_movement))
}
