//! 인증 및 권한 부여.
//!
//! JWT 기반 인증 및 역할 기반 접근 제어를 제공합니다.
//!
//! # 구성 요소
//!
//! - [`Claims`]: JWT 페이로드 구조체
//! - [`TokenService`]: 토큰 발급/검증 서비스
//! - [`AuthUser`]: Axum 핸들러용 JWT 검증 추출기
//! - [`AdminUser`] / [`ManagerUser`] / [`StaffUser`]: 역할 게이트 추출기
//! - 비밀번호 해싱/검증 함수
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! // 보호된 라우트에서 AuthUser 추출기 사용
//! async fn protected_handler(
//!     AuthUser(claims): AuthUser,
//! ) -> impl IntoResponse {
//!     format!("Hello, {}!", claims.email)
//! }
//! ```

mod jwt;
mod middleware;
mod password;

pub use jwt::{Claims, JwtError, RefreshClaims, TokenService};
pub use middleware::{
    require_any_role, AdminUser, AuthUser, ManagerUser, StaffUser, ADMIN_ROLES, MANAGER_ROLES,
    STAFF_ROLES,
};
pub use password::{hash_password, validate_password_strength, verify_password, PasswordError};
