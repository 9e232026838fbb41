//! 설정 관리.
//!
//! 이 모듈은 애플리케이션 설정을 정의하고 관리합니다.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// 서버 설정
    #[serde(default)]
    pub server: ServerConfig,
    /// 데이터베이스 설정
    #[serde(default)]
    pub database: DatabaseConfig,
    /// 인증 설정
    #[serde(default)]
    pub auth: AuthConfig,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
    /// 관리자 부트스트랩 설정
    #[serde(default)]
    pub bootstrap: BootstrapConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// 데이터베이스 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// 최대 연결 수
    pub max_connections: u32,
    /// 연결 타임아웃 (초)
    pub connection_timeout_secs: u64,
    /// 유휴 타임아웃 (초)
    pub idle_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            connection_timeout_secs: 30,
            idle_timeout_secs: 300,
        }
    }
}

/// 인증 설정.
///
/// 리프레시 토큰 만료는 액세스 토큰 만료보다 길어야 합니다.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT 서명 시크릿 (비어 있으면 환경 변수에서 주입)
    #[serde(default)]
    pub jwt_secret: String,
    /// 액세스 토큰 만료 (일)
    #[serde(default = "default_access_expiry_days")]
    pub access_token_expiry_days: i64,
    /// 리프레시 토큰 만료 (일)
    #[serde(default = "default_refresh_expiry_days")]
    pub refresh_token_expiry_days: i64,
}

fn default_access_expiry_days() -> i64 {
    7
}
fn default_refresh_expiry_days() -> i64 {
    30
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            access_token_expiry_days: default_access_expiry_days(),
            refresh_token_expiry_days: default_refresh_expiry_days(),
        }
    }
}

impl AuthConfig {
    /// 토큰 만료 설정의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.access_token_expiry_days < 1 {
            return Err(config::ConfigError::Message(
                "auth.access_token_expiry_days는 1 이상이어야 합니다".to_string(),
            ));
        }
        if self.refresh_token_expiry_days <= self.access_token_expiry_days {
            return Err(config::ConfigError::Message(
                "auth.refresh_token_expiry_days는 액세스 토큰 만료보다 길어야 합니다".to_string(),
            ));
        }
        Ok(())
    }
}

/// 관리자 부트스트랩 설정.
///
/// ADMIN 사용자가 없고 아래 자격 증명이 모두 설정되어 있으면 서버 기동 시
/// 관리자를 생성합니다. 패스워드는 기동 시점에 해시됩니다.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BootstrapConfig {
    /// 부트스트랩 관리자 이메일
    #[serde(default)]
    pub admin_email: Option<String>,
    /// 부트스트랩 관리자 패스워드
    #[serde(default)]
    pub admin_password: Option<String>,
}

impl BootstrapConfig {
    /// 부트스트랩 자격 증명이 모두 설정되어 있는지 확인합니다.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.admin_email, &self.admin_password) {
            (Some(email), Some(password)) => Some((email.as_str(), password.as_str())),
            _ => None,
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 기본값과 환경 변수만 사용합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // 기본값으로 시작
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            // 파일에서 로드 (선택)
            .add_source(config::File::from(path.as_ref()).required(false))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("STOCKFLOW")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.auth.validate()?;
        Ok(config)
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        Self::load("config/default.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_config_defaults() {
        let auth = AuthConfig::default();
        assert_eq!(auth.access_token_expiry_days, 7);
        assert_eq!(auth.refresh_token_expiry_days, 30);
        assert!(auth.validate().is_ok());
    }

    #[test]
    fn test_refresh_expiry_must_exceed_access() {
        let auth = AuthConfig {
            jwt_secret: String::new(),
            access_token_expiry_days: 30,
            refresh_token_expiry_days: 30,
        };
        assert!(auth.validate().is_err());

        let auth = AuthConfig {
            jwt_secret: String::new(),
            access_token_expiry_days: 30,
            refresh_token_expiry_days: 7,
        };
        assert!(auth.validate().is_err());
    }

    #[test]
    fn test_access_expiry_must_be_positive() {
        let auth = AuthConfig {
            jwt_secret: String::new(),
            access_token_expiry_days: 0,
            refresh_token_expiry_days: 30,
        };
        assert!(auth.validate().is_err());
    }

    #[test]
    fn test_bootstrap_credentials_require_both_fields() {
        let bootstrap = BootstrapConfig::default();
        assert!(bootstrap.credentials().is_none());

        let partial = BootstrapConfig {
            admin_email: Some("admin@stockflow.local".to_string()),
            admin_password: None,
        };
        assert!(partial.credentials().is_none());

        let full = BootstrapConfig {
            admin_email: Some("admin@stockflow.local".to_string()),
            admin_password: Some("changeme123".to_string()),
        };
        assert_eq!(
            full.credentials(),
            Some(("admin@stockflow.local", "changeme123"))
        );
    }
}
