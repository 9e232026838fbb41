//! 사용자 및 역할 타입.
//!
//! 이 모듈은 인증 시스템의 사용자 관련 타입을 정의합니다:
//! - `Role` - 사용자 역할 (권한 등급)
//! - `User` - 사용자 엔티티

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 사용자 역할.
///
/// 역할 검사는 허용 집합에 대한 정확한 일치로 수행됩니다.
/// 역할 간 상하 관계는 없습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx-support", sqlx(rename_all = "UPPERCASE"))]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// 일반 사용자 (조회 전용)
    User,
    /// 관리자 (모든 작업 가능)
    Admin,
    /// 창고 직원 (재고 이동 및 주문 생성)
    Staff,
    /// 매니저 (상품/카테고리/공급업체/주문 관리)
    Manager,
}

impl Role {
    /// 역할의 와이어 표현을 반환합니다.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
            Role::Staff => "STAFF",
            Role::Manager => "MANAGER",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 사용자 엔티티.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// 사용자 ID
    pub id: Uuid,
    /// 이메일 (고유)
    pub email: String,
    /// Argon2 패스워드 해시 (직렬화 제외)
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// 표시 이름
    pub name: String,
    /// 역할
    pub role: Role,
    /// 생성 타임스탬프
    pub created_at: DateTime<Utc>,
    /// 마지막 업데이트 타임스탬프
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// 새 사용자를 생성합니다.
    ///
    /// 역할은 기본값(`USER`)으로 시작하며 관리자만 변경할 수 있습니다.
    pub fn new(
        email: impl Into<String>,
        password_hash: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            password_hash: password_hash.into(),
            name: name.into(),
            role: Role::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// 역할을 설정합니다.
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_representation() {
        assert_eq!(Role::Admin.as_str(), "ADMIN");
        assert_eq!(Role::User.as_str(), "USER");
        assert_eq!(Role::Staff.as_str(), "STAFF");
        assert_eq!(Role::Manager.as_str(), "MANAGER");
    }

    #[test]
    fn test_role_serde_uppercase() {
        let json = serde_json::to_string(&Role::Manager).unwrap();
        assert_eq!(json, "\"MANAGER\"");

        let role: Role = serde_json::from_str("\"STAFF\"").unwrap();
        assert_eq!(role, Role::Staff);

        // 소문자 역할 문자열은 유효하지 않음
        assert!(serde_json::from_str::<Role>("\"admin\"").is_err());
    }

    #[test]
    fn test_new_user_defaults_to_user_role() {
        let user = User::new("a@b.com", "hash", "Alice");
        assert_eq!(user.role, Role::User);

        let admin = User::new("c@d.com", "hash", "Carol").with_role(Role::Admin);
        assert_eq!(admin.role, Role::Admin);
    }
}
