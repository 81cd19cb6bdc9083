//! Request → optional user identity.
//!
//! Every failure mode (no credential, rejected credential, service fault)
//! collapses to `ResolvedUser::Absent`. Faults are logged here and go no further.

use std::sync::Arc;

use axum::http::HeaderMap;

use crate::services::auth::credential::{self, CookieNames};
use crate::services::auth::fingerprint::token_fingerprint;
use crate::services::identity::{IdentityClient, IdentityResult, UserIdentity};

/// Outcome of a resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedUser {
    Identity(UserIdentity),
    Absent,
}

impl ResolvedUser {
    pub fn into_option(self) -> Option<UserIdentity> {
        match self {
            Self::Identity(user) => Some(user),
            Self::Absent => None,
        }
    }
}

/// Resolves the current user through an injected identity client.
///
/// Holds no per-call state; safe to share across requests.
#[derive(Clone)]
pub struct UserResolver {
    client: Arc<dyn IdentityClient>,
    cookie_names: CookieNames,
}

impl std::fmt::Debug for UserResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserResolver")
            .field("backend", &self.client.backend_name())
            .field("cookie_names", &self.cookie_names)
            .finish()
    }
}

impl UserResolver {
    pub fn new(client: Arc<dyn IdentityClient>, cookie_names: CookieNames) -> Self {
        Self {
            client,
            cookie_names,
        }
    }

    /// Server-side resolution from request headers (cookies + `Authorization`).
    ///
    /// Makes at most one call to the identity service and never returns an error.
    pub async fn resolve_server_user(&self, headers: &HeaderMap) -> ResolvedUser {
        let Some(cred) = credential::extract(headers, &self.cookie_names) else {
            return ResolvedUser::Absent;
        };

        let fingerprint = token_fingerprint(cred.token());
        let outcome = self.client.get_user(cred.token()).await;

        self.settle(outcome, cred.source().as_str(), &fingerprint)
    }

    /// Client-side resolution from the session the identity client holds.
    ///
    /// Only meaningful with a client that tracks a signed-in session.
    pub async fn resolve_client_user(&self) -> ResolvedUser {
        let outcome = self.client.current_user().await;
        self.settle(outcome, "client_session", "-")
    }

    fn settle(
        &self,
        outcome: IdentityResult<Option<UserIdentity>>,
        source: &'static str,
        fingerprint: &str,
    ) -> ResolvedUser {
        match outcome {
            Ok(Some(user)) => {
                tracing::debug!(
                    source,
                    token = %fingerprint,
                    user_id = user.id().unwrap_or("-"),
                    "user resolved"
                );
                ResolvedUser::Identity(user)
            }
            Ok(None) => {
                tracing::debug!(source, token = %fingerprint, "identity service returned no user");
                ResolvedUser::Absent
            }
            Err(err) if err.is_rejection() => {
                tracing::debug!(source, token = %fingerprint, error = %err, "credential rejected");
                ResolvedUser::Absent
            }
            Err(err) => {
                tracing::error!(
                    backend = self.client.backend_name(),
                    source,
                    token = %fingerprint,
                    error = %err,
                    "user resolution failed"
                );
                ResolvedUser::Absent
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::io;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use axum::http::{HeaderValue, header};
    use serde_json::json;

    use super::*;
    use crate::services::identity::IdentityError;

    /// What the fake service answers with.
    #[derive(Clone)]
    pub(crate) enum Behavior {
        User(serde_json::Value),
        NoUser,
        Reject,
        Fault,
    }

    /// Identity client double that records every token it is asked about.
    pub(crate) struct FakeIdentityClient {
        behavior: Behavior,
        session: Option<String>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeIdentityClient {
        pub(crate) fn new(behavior: Behavior) -> Arc<Self> {
            Arc::new(Self {
                behavior,
                session: None,
                calls: Mutex::new(Vec::new()),
            })
        }

        pub(crate) fn with_session(behavior: Behavior, token: &str) -> Arc<Self> {
            Arc::new(Self {
                behavior,
                session: Some(token.to_string()),
                calls: Mutex::new(Vec::new()),
            })
        }

        pub(crate) fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn answer(&self, token: &str) -> IdentityResult<Option<UserIdentity>> {
            self.calls.lock().unwrap().push(token.to_string());
            match &self.behavior {
                Behavior::User(v) => Ok(Some(UserIdentity::from_value(v.clone()))),
                Behavior::NoUser => Ok(None),
                Behavior::Reject => Err(IdentityError::Rejected {
                    status: 401,
                    message: "invalid JWT".into(),
                }),
                Behavior::Fault => Err(IdentityError::Transport("connection reset".into())),
            }
        }
    }

    #[async_trait]
    impl IdentityClient for FakeIdentityClient {
        fn backend_name(&self) -> &'static str {
            "fake"
        }

        async fn get_user(&self, token: &str) -> IdentityResult<Option<UserIdentity>> {
            self.answer(token)
        }

        async fn current_user(&self) -> IdentityResult<Option<UserIdentity>> {
            match &self.session {
                Some(token) => self.answer(token),
                None => Ok(None),
            }
        }
    }

    fn resolver(client: Arc<FakeIdentityClient>) -> UserResolver {
        UserResolver::new(client, CookieNames::default())
    }

    fn request(cookie: Option<&str>, authorization: Option<&str>) -> HeaderMap {
        let mut map = HeaderMap::new();
        if let Some(c) = cookie {
            map.insert(header::COOKIE, HeaderValue::from_str(c).unwrap());
        }
        if let Some(a) = authorization {
            map.insert(header::AUTHORIZATION, HeaderValue::from_str(a).unwrap());
        }
        map
    }

    fn member() -> serde_json::Value {
        json!({
            "id": "0b6f7e2a-1c1d-4d38-9a43-2f7f0d6f1e11",
            "email": "member@example.org",
            "app_metadata": { "provider": "email" }
        })
    }

    #[tokio::test]
    async fn no_credential_means_no_call() {
        let client = FakeIdentityClient::new(Behavior::User(member()));
        let resolver = resolver(client.clone());

        let out = resolver
            .resolve_server_user(&request(Some("theme=dark"), None))
            .await;

        assert_eq!(out, ResolvedUser::Absent);
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn access_cookie_token_is_sent() {
        let client = FakeIdentityClient::new(Behavior::User(member()));
        let resolver = resolver(client.clone());

        resolver
            .resolve_server_user(&request(Some("sb-access-token=T"), None))
            .await;

        assert_eq!(client.calls(), vec!["T"]);
    }

    #[tokio::test]
    async fn access_cookie_wins_over_auth_cookie() {
        let client = FakeIdentityClient::new(Behavior::User(member()));
        let resolver = resolver(client.clone());

        resolver
            .resolve_server_user(&request(
                Some("auth-token=generic; sb-access-token=primary"),
                Some("Bearer header"),
            ))
            .await;

        assert_eq!(client.calls(), vec!["primary"]);
    }

    #[tokio::test]
    async fn bearer_header_token_is_sent_without_prefix() {
        let client = FakeIdentityClient::new(Behavior::User(member()));
        let resolver = resolver(client.clone());

        resolver
            .resolve_server_user(&request(None, Some("Bearer T2")))
            .await;

        assert_eq!(client.calls(), vec!["T2"]);
    }

    #[tokio::test]
    async fn identity_is_returned_unmodified() {
        let client = FakeIdentityClient::new(Behavior::User(member()));
        let resolver = resolver(client);

        let out = resolver
            .resolve_server_user(&request(None, Some("Bearer T")))
            .await;

        assert_eq!(out, ResolvedUser::Identity(UserIdentity::from_value(member())));
    }

    #[tokio::test]
    async fn rejection_and_empty_answers_are_absent() {
        for behavior in [Behavior::Reject, Behavior::NoUser] {
            let client = FakeIdentityClient::new(behavior);
            let out = resolver(client.clone())
                .resolve_server_user(&request(Some("auth-token=old"), None))
                .await;

            assert_eq!(out, ResolvedUser::Absent);
            assert_eq!(client.calls(), vec!["old"]);
        }
    }

    /// In-memory log sink for asserting on what a subscriber printed.
    #[derive(Clone, Default)]
    pub(crate) struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        pub(crate) fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync + use<> {
            let writer = self.clone();
            tracing_subscriber::fmt()
                .with_writer(move || writer.clone())
                .with_ansi(false)
                .finish()
        }

        pub(crate) fn printed(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn fault_is_absorbed_and_logged() {
        let logs = CapturedLogs::default();
        let _guard = tracing::subscriber::set_default(logs.subscriber());

        let client = FakeIdentityClient::new(Behavior::Fault);
        let out = resolver(client.clone())
            .resolve_server_user(&request(None, Some("Bearer secret-token")))
            .await;

        assert_eq!(out, ResolvedUser::Absent);
        assert_eq!(client.calls().len(), 1);

        let printed = logs.printed();
        assert!(printed.contains("user resolution failed"));
        assert!(printed.contains("connection reset"));
        assert!(!printed.contains("secret-token"));
    }

    #[tokio::test]
    async fn same_input_same_result() {
        let client = FakeIdentityClient::new(Behavior::User(member()));
        let resolver = resolver(client.clone());
        let req = request(Some("sb-access-token=T"), None);

        let first = resolver.resolve_server_user(&req).await;
        let second = resolver.resolve_server_user(&req).await;

        assert_eq!(first, second);
        assert_eq!(client.calls(), vec!["T", "T"]);
    }

    #[tokio::test]
    async fn client_user_follows_held_session() {
        let signed_out = FakeIdentityClient::new(Behavior::User(member()));
        assert_eq!(
            resolver(signed_out.clone()).resolve_client_user().await,
            ResolvedUser::Absent
        );
        assert!(signed_out.calls().is_empty());

        let signed_in = FakeIdentityClient::with_session(Behavior::User(member()), "S");
        let out = resolver(signed_in.clone()).resolve_client_user().await;
        let user = out.into_option().unwrap();
        assert_eq!(user.id(), Some("0b6f7e2a-1c1d-4d38-9a43-2f7f0d6f1e11"));
        assert_eq!(signed_in.calls(), vec!["S"]);

        let faulty = FakeIdentityClient::with_session(Behavior::Fault, "S");
        assert_eq!(
            resolver(faulty).resolve_client_user().await,
            ResolvedUser::Absent
        );
    }
}
