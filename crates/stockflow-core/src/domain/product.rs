//! 상품, 카테고리, 공급업체 타입.
//!
//! 이 모듈은 재고 시스템의 상품 관련 타입을 정의합니다:
//! - `Product` - 상품 엔티티 (수량 불변식 포함)
//! - `Category` - 상품 분류
//! - `Supplier` - 공급업체

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 상품 엔티티.
///
/// `quantity`는 재고 이동 트랜잭션을 통해서만 변경되며 절대 음수가 되지
/// 않습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// 상품 ID
    pub id: Uuid,
    /// 재고 관리 코드 (고유)
    pub sku: String,
    /// 상품명
    pub name: String,
    /// 상품 설명
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// 현재 수량 (0 이상)
    pub quantity: i32,
    /// 최소 재고 수준 (이하이면 재주문 대상)
    pub min_stock: i32,
    /// 최대 재고 수준
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_stock: Option<i32>,
    /// 판매 가격
    pub price: Decimal,
    /// 매입 원가
    pub cost_price: Decimal,
    /// 소속 카테고리
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
    /// 공급업체
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier_id: Option<Uuid>,
    /// 활성 여부 (삭제는 비활성화로 처리)
    pub is_active: bool,
    /// 생성 타임스탬프
    pub created_at: DateTime<Utc>,
    /// 마지막 업데이트 타임스탬프
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// 재고가 최소 수준 이하인지 확인합니다.
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.min_stock
    }
}

/// 상품 카테고리.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// 카테고리 ID
    pub id: Uuid,
    /// 카테고리명 (고유)
    pub name: String,
    /// 설명
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// 생성 타임스탬프
    pub created_at: DateTime<Utc>,
    /// 마지막 업데이트 타임스탬프
    pub updated_at: DateTime<Utc>,
}

/// 공급업체.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    /// 공급업체 ID
    pub id: Uuid,
    /// 업체명
    pub name: String,
    /// 담당자 이름
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    /// 담당자 이메일
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// 전화번호
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// 주소
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// 활성 여부
    pub is_active: bool,
    /// 생성 타임스탬프
    pub created_at: DateTime<Utc>,
    /// 마지막 업데이트 타임스탬프
    pub updated_at: DateTime<Utc>,
}
