//! 발주 주문 타입.
//!
//! 이 모듈은 공급업체 발주 관련 타입을 정의합니다:
//! - `OrderStatus` - 주문 상태
//! - `Order` - 주문 엔티티
//! - `OrderItem` - 주문 항목

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 주문 상태.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx-support", sqlx(rename_all = "UPPERCASE"))]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    /// 대기 중
    Pending,
    /// 완료됨
    Completed,
    /// 취소됨
    Cancelled,
}

impl OrderStatus {
    /// 상태의 와이어 표현을 반환합니다.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    /// 주문이 최종 상태인지 확인합니다.
    ///
    /// 최종 상태의 주문은 더 이상 상태를 변경할 수 없습니다.
    pub fn is_final(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 발주 주문 엔티티.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// 주문 ID
    pub id: Uuid,
    /// 주문 번호 (고유)
    pub order_number: String,
    /// 현재 상태
    pub status: OrderStatus,
    /// 공급업체
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier_id: Option<Uuid>,
    /// 주문 생성 사용자
    pub user_id: Uuid,
    /// 총 금액 (항목 합계)
    pub total_amount: Decimal,
    /// 비고
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// 생성 타임스탬프
    pub created_at: DateTime<Utc>,
    /// 마지막 업데이트 타임스탬프
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// 새 주문 번호를 생성합니다.
    ///
    /// 형식: `ORD-` + UUID 앞 12자리 (대문자). 고유성은 데이터베이스
    /// 제약으로 보장됩니다.
    pub fn generate_order_number() -> String {
        let id = Uuid::new_v4().simple().to_string();
        format!("ORD-{}", id[..12].to_uppercase())
    }
}

/// 주문 항목.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// 항목 ID
    pub id: Uuid,
    /// 소속 주문
    pub order_id: Uuid,
    /// 주문 상품
    pub product_id: Uuid,
    /// 주문 수량
    pub quantity: i32,
    /// 단가
    pub unit_price: Decimal,
}

impl OrderItem {
    /// 항목의 금액(수량 x 단가)을 계산합니다.
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}
