//! API 에러 타입 및 응답 변환.
//!
//! 모든 실패는 `{"error": "<메시지>"}` JSON 본문과 해당 상태 코드로
//! 직렬화됩니다. 내부 에러의 상세 내용은 로그에만 남기고 클라이언트에는
//! 일반 메시지만 노출합니다.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use stockflow_core::StockError;
use thiserror::Error;

/// API 핸들러 에러.
#[derive(Debug, Error)]
pub enum ApiError {
    /// 인증 실패 (토큰 없음/무효/만료)
    #[error("{0}")]
    Unauthenticated(String),

    /// 권한 부족
    #[error("{0}")]
    Forbidden(String),

    /// 리소스 없음
    #[error("{0}")]
    NotFound(String),

    /// 재고 부족 (수량 불변식 위반)
    #[error("Insufficient stock")]
    InsufficientStock,

    /// 잘못된 요청 형식
    #[error("{0}")]
    Validation(String),

    /// 고유 제약 위반
    #[error("{0}")]
    Conflict(String),

    /// 내부 에러 (상세 내용은 로그 전용)
    #[error("Internal server error")]
    Internal(String),
}

/// API 핸들러를 위한 Result 타입.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// 에러에 해당하는 HTTP 상태 코드를 반환합니다.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InsufficientStock | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(detail) = &self {
            tracing::error!(detail = %detail, "Internal server error");
        }
        let status = self.status_code();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<StockError> for ApiError {
    fn from(err: StockError) -> Self {
        match err {
            StockError::Auth(msg) => ApiError::Unauthenticated(msg),
            StockError::Permission(msg) => ApiError::Forbidden(msg),
            StockError::NotFound(msg) => ApiError::NotFound(msg),
            StockError::InsufficientStock(_) => ApiError::InsufficientStock,
            StockError::InvalidInput(msg) => ApiError::Validation(msg),
            StockError::Duplicate(msg) => ApiError::Conflict(msg),
            StockError::Config(msg)
            | StockError::Serialization(msg)
            | StockError::Database(msg)
            | StockError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return ApiError::Conflict("Duplicate value".to_string());
            }
        }
        ApiError::Internal(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        // 필드 검증 실패 중 첫 메시지를 그대로 응답 본문으로 사용
        let message = err
            .field_errors()
            .into_values()
            .flat_map(|errors| errors.iter())
            .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| "Validation failed".to_string());
        ApiError::Validation(message)
    }
}

/// 고유 제약 위반을 지정한 Conflict 메시지로 매핑합니다.
///
/// 제약 이름이 일치하지 않는 에러는 그대로 일반 변환을 따릅니다.
pub fn map_unique_violation(err: sqlx::Error, constraint: &str, message: &str) -> ApiError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() && db_err.constraint() == Some(constraint) {
            return ApiError::Conflict(message.to_string());
        }
    }
    ApiError::from(err)
}
