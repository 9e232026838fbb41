//! 재고 시스템의 에러 타입.
//!
//! 이 모듈은 재고 시스템 전반에서 사용되는 에러 타입을 정의합니다.

use thiserror::Error;

/// 핵심 재고 에러.
#[derive(Debug, Error)]
pub enum StockError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 인증 에러
    #[error("인증 에러: {0}")]
    Auth(String),

    /// 권한 에러
    #[error("권한 에러: {0}")]
    Permission(String),

    /// 재고 부족
    #[error("재고 부족: {0}")]
    InsufficientStock(String),

    /// 잘못된 입력
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 찾을 수 없음
    #[error("찾을 수 없음: {0}")]
    NotFound(String),

    /// 중복 에러
    #[error("중복 에러: {0}")]
    Duplicate(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),

    /// 데이터베이스 에러
    #[error("데이터베이스 에러: {0}")]
    Database(String),

    /// 내부 에러
    #[error("내부 에러: {0}")]
    Internal(String),
}

/// 재고 작업을 위한 Result 타입.
pub type StockResult<T> = Result<T, StockError>;

impl StockError {
    /// 클라이언트 입력에서 비롯된 에러인지 확인합니다.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            StockError::Auth(_)
                | StockError::Permission(_)
                | StockError::InsufficientStock(_)
                | StockError::InvalidInput(_)
                | StockError::NotFound(_)
                | StockError::Duplicate(_)
        )
    }

    /// 치명적인 에러인지 확인합니다.
    pub fn is_critical(&self) -> bool {
        matches!(self, StockError::Database(_) | StockError::Internal(_))
    }
}

impl From<serde_json::Error> for StockError {
    fn from(err: serde_json::Error) -> Self {
        StockError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_client_classification() {
        let stock_err = StockError::InsufficientStock("insufficient".to_string());
        assert!(stock_err.is_client_error());

        let db_err = StockError::Database("connection refused".to_string());
        assert!(!db_err.is_client_error());
    }

    #[test]
    fn test_error_critical() {
        let internal_err = StockError::Internal("poisoned".to_string());
        assert!(internal_err.is_critical());

        let not_found = StockError::NotFound("product".to_string());
        assert!(!not_found.is_critical());
    }
}
