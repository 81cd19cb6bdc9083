//! Factory: build the identity client from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::identity::{HttpIdentityClient, IdentityClient};

pub fn build_identity_client(config: &Config) -> Arc<dyn IdentityClient> {
    let missing = config.identity.missing();
    if !missing.is_empty() {
        // Not fatal: every resolution will come back as "no user" until this is fixed.
        tracing::error!(
            missing = ?missing,
            "identity service configuration is incomplete"
        );
    }

    Arc::new(HttpIdentityClient::new(
        config.identity.service_url.clone(),
        config.identity.anon_key.clone(),
    ))
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, HeaderValue, header};

    use super::*;
    use crate::services::auth::resolver::tests::CapturedLogs;
    use crate::services::auth::{CookieNames, ResolvedUser, UserResolver};

    #[tokio::test]
    async fn incomplete_config_is_logged_and_resolves_absent() {
        let logs = CapturedLogs::default();
        let _guard = tracing::subscriber::set_default(logs.subscriber());

        let config = Config::from_lookup(|_: &str| None).unwrap();
        let resolver = UserResolver::new(build_identity_client(&config), CookieNames::default());

        let printed = logs.printed();
        assert!(printed.contains("ERROR"));
        assert!(printed.contains("identity service configuration is incomplete"));
        assert!(printed.contains("IDENTITY_SERVICE_URL"));

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer T"));
        assert_eq!(
            resolver.resolve_server_user(&headers).await,
            ResolvedUser::Absent
        );
    }
}
