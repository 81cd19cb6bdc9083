/*
 * Responsibility
 * - 環境変数や設定の読み込み (PORT, CORS 許可, identity service 設定など)
 * - 設定値のバリデーション (形式不正なら起動失敗)
 * - identity service の設定不足は起動失敗にしない (起動時にログで知らせる)
 */
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::services::auth::credential::CookieNames;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<&str>) -> Self {
        match raw.unwrap_or("development").to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Hosted identity service settings.
///
/// Every field is optional so a misconfigured deployment still boots;
/// `missing()` tells the operator what to fix.
#[derive(Clone, Default)]
pub struct IdentityConfig {
    pub service_url: Option<Url>,
    pub anon_key: Option<String>,
    // privileged key, never sent by the resolver
    pub service_role_key: Option<String>,
}

impl std::fmt::Debug for IdentityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("IdentityConfig")
            .field("service_url", &self.service_url.as_ref().map(Url::as_str))
            .field("anon_key", &self.anon_key.as_ref().map(|_| "<set>"))
            .field(
                "service_role_key",
                &self.service_role_key.as_ref().map(|_| "<set>"),
            )
            .finish()
    }
}

impl IdentityConfig {
    pub const URL_KEY: &'static str = "IDENTITY_SERVICE_URL";
    pub const ANON_KEY: &'static str = "IDENTITY_ANON_KEY";
    pub const SERVICE_ROLE_KEY: &'static str = "IDENTITY_SERVICE_ROLE_KEY";

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let service_url = match non_empty(lookup(Self::URL_KEY)) {
            Some(raw) => {
                Some(Url::parse(&raw).map_err(|_| ConfigError::Invalid(Self::URL_KEY))?)
            }
            None => None,
        };

        Ok(Self {
            service_url,
            anon_key: non_empty(lookup(Self::ANON_KEY)),
            service_role_key: non_empty(lookup(Self::SERVICE_ROLE_KEY)),
        })
    }

    /// Keys that are absent (or empty) in this configuration.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.service_url.is_none() {
            missing.push(Self::URL_KEY);
        }
        if self.anon_key.is_none() {
            missing.push(Self::ANON_KEY);
        }
        if self.service_role_key.is_none() {
            missing.push(Self::SERVICE_ROLE_KEY);
        }
        missing
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    pub request_timeout: Duration,
    pub body_limit_bytes: usize,

    pub identity: IdentityConfig,
    pub cookie_names: CookieNames,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the process env in production, a map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port: u16 = match lookup("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV").as_deref());

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let request_timeout = match lookup("REQUEST_TIMEOUT_SECONDS") {
            Some(raw) => Duration::from_secs(
                raw.trim()
                    .parse()
                    .map_err(|_| ConfigError::Invalid("REQUEST_TIMEOUT_SECONDS"))?,
            ),
            None => Duration::from_secs(30),
        };

        let body_limit_bytes = match lookup("BODY_LIMIT_BYTES") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid("BODY_LIMIT_BYTES"))?,
            None => 64 * 1024,
        };

        let identity = IdentityConfig::from_lookup(&lookup)?;

        let defaults = CookieNames::default();
        let cookie_names = CookieNames {
            access_token: non_empty(lookup("ACCESS_TOKEN_COOKIE")).unwrap_or(defaults.access_token),
            auth_token: non_empty(lookup("AUTH_TOKEN_COOKIE")).unwrap_or(defaults.auth_token),
        };

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            request_timeout,
            body_limit_bytes,
            identity,
            cookie_names,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
