//! JWT 토큰 처리.
//!
//! Access Token 및 Refresh Token 발급/검증 로직.
//!
//! 검증 실패는 원인(서명 불일치, 만료, 형식 오류)과 무관하게 단일
//! [`JwtError::InvalidToken`]으로 통일됩니다. 만료 여부를 구분하는
//! 응답은 의도적으로 제공하지 않습니다.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use stockflow_core::{AuthConfig, Role};
use uuid::Uuid;

/// JWT Access Token 페이로드.
///
/// 사용자 인증 정보와 권한을 포함합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 사용자 ID
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    /// 사용자 이메일
    pub email: String,
    /// 사용자 역할
    pub role: Role,
    /// Issued At - 토큰 발급 시간 (Unix timestamp)
    pub iat: i64,
    /// Expiration - 토큰 만료 시간 (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// 새로운 Claims 생성.
    pub fn new(user_id: Uuid, email: impl Into<String>, role: Role, expires_in_days: i64) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            email: email.into(),
            role,
            iat: now.timestamp(),
            exp: (now + Duration::days(expires_in_days)).timestamp(),
        }
    }
}

/// Refresh Token 페이로드.
///
/// Access Token과 동일한 신원 정보에 `token_type` 마커가 추가됩니다.
/// 마커가 없는 토큰(액세스 토큰)은 리프레시 검증에서 거부됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// 사용자 ID
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    /// 사용자 이메일
    pub email: String,
    /// 사용자 역할
    pub role: Role,
    /// Issued At
    pub iat: i64,
    /// Expiration
    pub exp: i64,
    /// 토큰 타입 (항상 "refresh")
    pub token_type: String,
}

impl RefreshClaims {
    /// 새로운 Refresh Claims 생성.
    pub fn new(user_id: Uuid, email: impl Into<String>, role: Role, expires_in_days: i64) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            email: email.into(),
            role,
            iat: now.timestamp(),
            exp: (now + Duration::days(expires_in_days)).timestamp(),
            token_type: "refresh".to_string(),
        }
    }
}

/// JWT 토큰 에러.
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("토큰 인코딩 실패: {0}")]
    EncodingError(#[from] jsonwebtoken::errors::Error),
    #[error("Invalid or expired token")]
    InvalidToken,
}

/// 토큰 발급/검증 서비스.
///
/// 서명 시크릿과 만료 설정을 보유하며, AppState를 통해 핸들러에
/// 주입됩니다.
#[derive(Clone)]
pub struct TokenService {
    secret: String,
    access_expiry_days: i64,
    refresh_expiry_days: i64,
}

impl TokenService {
    /// 인증 설정으로 서비스를 생성합니다.
    pub fn new(config: AuthConfig) -> Self {
        Self {
            secret: config.jwt_secret,
            access_expiry_days: config.access_token_expiry_days,
            refresh_expiry_days: config.refresh_token_expiry_days,
        }
    }

    /// Access Token을 발급합니다.
    ///
    /// 매 호출마다 발급 시각(iat)이 포함됩니다.
    pub fn issue_access_token(
        &self,
        user_id: Uuid,
        email: &str,
        role: Role,
    ) -> Result<String, JwtError> {
        let claims = Claims::new(user_id, email, role, self.access_expiry_days);
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(JwtError::from)
    }

    /// Refresh Token을 발급합니다.
    pub fn issue_refresh_token(
        &self,
        user_id: Uuid,
        email: &str,
        role: Role,
    ) -> Result<String, JwtError> {
        let claims = RefreshClaims::new(user_id, email, role, self.refresh_expiry_days);
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(JwtError::from)
    }

    /// Access Token을 검증하고 Claims를 반환합니다.
    ///
    /// 서명 불일치, 만료, 형식 오류 모두 동일한 에러를 반환합니다.
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::default();
        validation.validate_exp = true;

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|_| JwtError::InvalidToken)
    }

    /// Refresh Token을 검증하고 RefreshClaims를 반환합니다.
    ///
    /// `token_type` 마커가 "refresh"가 아닌 토큰은 거부됩니다.
    pub fn verify_refresh(&self, token: &str) -> Result<RefreshClaims, JwtError> {
        let mut validation = Validation::default();
        validation.validate_exp = true;

        let claims = decode::<RefreshClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|_| JwtError::InvalidToken)?;

        if claims.token_type != "refresh" {
            return Err(JwtError::InvalidToken);
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "test-secret-key-for-jwt-testing-minimum-32-chars";

    fn test_service() -> TokenService {
        TokenService::new(AuthConfig {
            jwt_secret: TEST_SECRET.to_string(),
            access_token_expiry_days: 7,
            refresh_token_expiry_days: 30,
        })
    }

    #[test]
    fn test_issue_and_verify_access_token() {
        let service = test_service();
        let user_id = Uuid::new_v4();

        let token = service
            .issue_access_token(user_id, "user@example.com", Role::Staff)
            .unwrap();
        assert!(!token.is_empty());

        let claims = service.verify(&token).unwrap();
        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.email, "user@example.com");
        assert_eq!(claims.role, Role::Staff);
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
    }

    #[test]
    fn test_refresh_token_expires_after_access_token() {
        let service = test_service();
        let user_id = Uuid::new_v4();

        let access = service
            .issue_access_token(user_id, "a@b.com", Role::User)
            .unwrap();
        let refresh = service
            .issue_refresh_token(user_id, "a@b.com", Role::User)
            .unwrap();

        let access_claims = service.verify(&access).unwrap();
        let refresh_claims = service.verify_refresh(&refresh).unwrap();
        assert!(refresh_claims.exp > access_claims.exp);
        assert_eq!(refresh_claims.token_type, "refresh");
    }

    #[test]
    fn test_verify_rejects_garbage_token() {
        let service = test_service();
        let result = service.verify("invalid.token.here");
        assert!(matches!(result, Err(JwtError::InvalidToken)));
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let service = test_service();
        let other = TokenService::new(AuthConfig {
            jwt_secret: "another-secret-key-for-testing-minimum-32-chars".to_string(),
            access_token_expiry_days: 7,
            refresh_token_expiry_days: 30,
        });

        let token = service
            .issue_access_token(Uuid::new_v4(), "a@b.com", Role::User)
            .unwrap();
        assert!(matches!(other.verify(&token), Err(JwtError::InvalidToken)));
    }

    #[test]
    fn test_verify_rejects_expired_token() {
        // 만료일이 과거인 토큰을 직접 발급
        let expired = TokenService::new(AuthConfig {
            jwt_secret: TEST_SECRET.to_string(),
            access_token_expiry_days: -1,
            refresh_token_expiry_days: 30,
        });
        let service = test_service();

        let token = expired
            .issue_access_token(Uuid::new_v4(), "a@b.com", Role::Admin)
            .unwrap();
        assert!(matches!(service.verify(&token), Err(JwtError::InvalidToken)));
    }

    #[test]
    fn test_refresh_verification_rejects_access_token() {
        let service = test_service();
        let access = service
            .issue_access_token(Uuid::new_v4(), "a@b.com", Role::User)
            .unwrap();

        assert!(matches!(
            service.verify_refresh(&access),
            Err(JwtError::InvalidToken)
        ));
    }

    #[test]
    fn test_repeated_issuance_embeds_issue_time() {
        let service = test_service();
        let user_id = Uuid::new_v4();

        let token = service
            .issue_access_token(user_id, "a@b.com", Role::User)
            .unwrap();
        let claims = service.verify(&token).unwrap();
        let now = Utc::now().timestamp();
        assert!((claims.iat - now).abs() <= 5);
    }
}
