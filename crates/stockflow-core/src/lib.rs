//! # StockFlow Core
//!
//! 재고 관리 플랫폼의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 재고 시스템 전반에서 사용되는 기본 타입을 제공합니다:
//! - 사용자 및 역할 정의
//! - 상품, 카테고리, 공급업체 타입
//! - 재고 이동 유형 및 수량 계산 규칙
//! - 주문 및 주문 항목 타입
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
