//! Effective configuration as shown on the debug page.
//!
//! Secrets are reported as "set (N chars)" / "missing", never echoed.
use serde::Serialize;

use crate::config::{Config, IdentityConfig};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EnvEntry {
    pub name: &'static str,
    pub value: String,
    pub secret: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnvReport {
    pub app_env: &'static str,
    pub entries: Vec<EnvEntry>,
    pub missing: Vec<&'static str>,
}

impl EnvReport {
    pub fn from_config(config: &Config) -> Self {
        let identity = &config.identity;

        let entries = vec![
            plain("PORT", config.addr.port().to_string()),
            plain(
                "CORS_ALLOWED_ORIGINS",
                config.cors_allowed_origins.join(","),
            ),
            plain(
                IdentityConfig::URL_KEY,
                identity
                    .service_url
                    .as_ref()
                    .map(|u| u.to_string())
                    .unwrap_or_else(|| "missing".into()),
            ),
            secret(IdentityConfig::ANON_KEY, identity.anon_key.as_deref()),
            secret(
                IdentityConfig::SERVICE_ROLE_KEY,
                identity.service_role_key.as_deref(),
            ),
            plain("ACCESS_TOKEN_COOKIE", config.cookie_names.access_token.clone()),
            plain("AUTH_TOKEN_COOKIE", config.cookie_names.auth_token.clone()),
        ];

        Self {
            app_env: if config.app_env.is_production() {
                "production"
            } else {
                "development"
            },
            entries,
            missing: identity.missing(),
        }
    }
}

fn plain(name: &'static str, value: String) -> EnvEntry {
    EnvEntry {
        name,
        value,
        secret: false,
    }
}

fn secret(name: &'static str, value: Option<&str>) -> EnvEntry {
    let value = match value {
        Some(v) => format!("set ({} chars)", v.chars().count()),
        None => "missing".to_string(),
    };
    EnvEntry {
        name,
        value,
        secret: true,
    }
}
