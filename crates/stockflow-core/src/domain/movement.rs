//! 재고 이동 타입 및 수량 계산 규칙.
//!
//! 이 모듈은 재고 시스템의 핵심 계약을 정의합니다:
//! - `MovementType` - 이동 유형과 유형별 수량 계산 규칙
//! - `StockMovement` - 불변 이동 원장 항목
//!
//! 수량 계산은 순수 함수 [`MovementType::apply`]로 수행되며, 저장소의
//! 트랜잭션과 테스트가 동일한 함수를 공유합니다.

use crate::error::StockError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 재고 이동 유형.
///
/// 유형별 수량 효과:
///
/// | 유형 | 효과 | 검증 |
/// |---|---|---|
/// | IN | 수량 증가 | 입력 ≥ 0 |
/// | OUT | 수량 감소 | 결과 ≥ 0 |
/// | RETURN | 수량 증가 | 입력 ≥ 0 |
/// | DAMAGED | 수량 감소 | 결과 ≥ 0 |
/// | ADJUSTMENT | 수량을 입력값으로 설정 | 입력 ≥ 0 |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx-support", sqlx(rename_all = "UPPERCASE"))]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "UPPERCASE")]
pub enum MovementType {
    /// 입고
    In,
    /// 출고
    Out,
    /// 반품 입고
    Return,
    /// 파손 차감
    Damaged,
    /// 절대값 조정 (실사 재고 반영)
    Adjustment,
}

impl MovementType {
    /// 이동 유형의 와이어 표현을 반환합니다.
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::In => "IN",
            MovementType::Out => "OUT",
            MovementType::Return => "RETURN",
            MovementType::Damaged => "DAMAGED",
            MovementType::Adjustment => "ADJUSTMENT",
        }
    }

    /// 현재 수량에 이동을 적용한 결과 수량을 계산합니다.
    ///
    /// - `IN`/`RETURN`: 음수 입력은 `InvalidInput`
    /// - `OUT`/`DAMAGED`: 음수 입력은 `InvalidInput`, 결과가 음수면
    ///   `InsufficientStock`
    /// - `ADJUSTMENT`: 음수 입력은 `InsufficientStock`, 그 외에는 입력값으로
    ///   설정
    ///
    /// 실패 시 수량은 변경되지 않은 것으로 간주합니다.
    pub fn apply(&self, current: i32, input: i32) -> Result<i32, StockError> {
        match self {
            MovementType::In | MovementType::Return => {
                if input < 0 {
                    return Err(StockError::InvalidInput(
                        "quantity must not be negative".to_string(),
                    ));
                }
                current.checked_add(input).ok_or_else(|| {
                    StockError::InvalidInput("quantity out of range".to_string())
                })
            }
            MovementType::Out | MovementType::Damaged => {
                if input < 0 {
                    return Err(StockError::InvalidInput(
                        "quantity must not be negative".to_string(),
                    ));
                }
                let next = current - input;
                if next < 0 {
                    return Err(StockError::InsufficientStock(
                        "Insufficient stock".to_string(),
                    ));
                }
                Ok(next)
            }
            MovementType::Adjustment => {
                if input < 0 {
                    return Err(StockError::InsufficientStock(
                        "Insufficient stock".to_string(),
                    ));
                }
                Ok(input)
            }
        }
    }
}

impl std::fmt::Display for MovementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 재고 이동 원장 항목.
///
/// 생성 이후 수정되지 않는 append-only 레코드입니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct StockMovement {
    /// 이동 ID
    pub id: Uuid,
    /// 이동 유형 (와이어 필드명: `type`)
    #[serde(rename = "type")]
    pub movement_type: MovementType,
    /// 요청 수량 (유형에 따라 증감 또는 절대값)
    pub quantity: i32,
    /// 사유
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// 참조 번호 (발주서, 송장 등)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// 대상 상품
    pub product_id: Uuid,
    /// 요청 사용자
    pub user_id: Uuid,
    /// 생성 타임스탬프
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_adds_quantity() {
        assert_eq!(MovementType::In.apply(100, 50).unwrap(), 150);
        assert_eq!(MovementType::In.apply(0, 0).unwrap(), 0);
    }

    #[test]
    fn test_out_subtracts_quantity() {
        assert_eq!(MovementType::Out.apply(100, 100).unwrap(), 0);
        assert_eq!(MovementType::Out.apply(100, 30).unwrap(), 70);
    }

    #[test]
    fn test_out_underflow_is_insufficient_stock() {
        let err = MovementType::Out.apply(100, 200).unwrap_err();
        assert!(matches!(err, StockError::InsufficientStock(_)));

        let err = MovementType::Damaged.apply(0, 1).unwrap_err();
        assert!(matches!(err, StockError::InsufficientStock(_)));
    }

    #[test]
    fn test_return_adds_quantity() {
        assert_eq!(MovementType::Return.apply(10, 5).unwrap(), 15);
    }

    #[test]
    fn test_adjustment_sets_absolute_value() {
        assert_eq!(MovementType::Adjustment.apply(100, 42).unwrap(), 42);
        assert_eq!(MovementType::Adjustment.apply(0, 0).unwrap(), 0);

        let err = MovementType::Adjustment.apply(100, -1).unwrap_err();
        assert!(matches!(err, StockError::InsufficientStock(_)));
    }

    #[test]
    fn test_negative_input_is_invalid() {
        for movement in [
            MovementType::In,
            MovementType::Out,
            MovementType::Return,
            MovementType::Damaged,
        ] {
            let err = movement.apply(100, -5).unwrap_err();
            assert!(matches!(err, StockError::InvalidInput(_)));
        }
    }

    #[test]
    fn test_in_overflow_is_rejected() {
        let err = MovementType::In.apply(i32::MAX, 1).unwrap_err();
        assert!(matches!(err, StockError::InvalidInput(_)));
    }

    #[test]
    fn test_movement_type_serde_uppercase() {
        let json = serde_json::to_string(&MovementType::Adjustment).unwrap();
        assert_eq!(json, "\"ADJUSTMENT\"");

        let movement: MovementType = serde_json::from_str("\"DAMAGED\"").unwrap();
        assert_eq!(movement, MovementType::Damaged);
    }

    #[test]
    fn test_stock_movement_wire_field_names() {
        let movement = StockMovement {
            id: Uuid::new_v4(),
            movement_type: MovementType::In,
            quantity: 10,
            reason: None,
            reference: None,
            product_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            created_at: chrono::Utc::now(),
        };

        let json = serde_json::to_value(&movement).unwrap();
        assert_eq!(json.get("type").unwrap(), "IN");
        assert!(json.get("productId").is_some());
        assert!(json.get("movement_type").is_none());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// IN 후 동일 수량 OUT은 원래 수량을 복원한다.
            #[test]
            fn in_then_out_restores_quantity(
                current in 0..1_000_000i32,
                q in 0..1_000_000i32,
            ) {
                let after_in = MovementType::In.apply(current, q).unwrap();
                let after_out = MovementType::Out.apply(after_in, q).unwrap();
                prop_assert_eq!(after_out, current);
            }

            /// 현재 수량을 초과하는 OUT은 항상 실패한다.
            #[test]
            fn out_exceeding_stock_always_fails(
                current in 0..1_000_000i32,
                excess in 1..1_000_000i32,
            ) {
                let result = MovementType::Out.apply(current, current + excess);
                prop_assert!(matches!(result, Err(StockError::InsufficientStock(_))));
            }

            /// ADJUSTMENT는 이전 수량과 무관하게 정확히 입력값으로 설정한다.
            #[test]
            fn adjustment_sets_exactly(
                current in 0..1_000_000i32,
                q in 0..1_000_000i32,
            ) {
                prop_assert_eq!(MovementType::Adjustment.apply(current, q).unwrap(), q);
            }

            /// 음수 ADJUSTMENT는 항상 실패한다.
            #[test]
            fn negative_adjustment_always_fails(
                current in 0..1_000_000i32,
                q in i32::MIN..0i32,
            ) {
                let result = MovementType::Adjustment.apply(current, q);
                prop_assert!(matches!(result, Err(StockError::InsufficientStock(_))));
            }
        }
    }
}
