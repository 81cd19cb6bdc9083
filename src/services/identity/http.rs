use async_trait::async_trait;
use reqwest::{StatusCode, header};
use url::Url;

use crate::services::identity::client::{
    IdentityClient, IdentityError, IdentityResult, UserIdentity,
};

const USER_PATH: &str = "auth/v1/user";

/// Statuses the service uses to say "this credential is not valid".
const REJECTION_STATUSES: [StatusCode; 4] = [
    StatusCode::BAD_REQUEST,
    StatusCode::UNAUTHORIZED,
    StatusCode::FORBIDDEN,
    StatusCode::UNPROCESSABLE_ENTITY,
];

/// HTTP client for the hosted identity service (`GET /auth/v1/user`).
///
/// No timeout or retry is configured here; whatever reqwest does by default applies.
/// `session_token` is the "current session" a client-side caller signed in with.
#[derive(Clone)]
pub struct HttpIdentityClient {
    http: reqwest::Client,
    base_url: Option<Url>,
    anon_key: Option<String>,
    session_token: Option<String>,
}

impl std::fmt::Debug for HttpIdentityClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("HttpIdentityClient")
            .field("base_url", &self.base_url.as_ref().map(Url::as_str))
            .field("has_session", &self.session_token.is_some())
            .finish()
    }
}

impl HttpIdentityClient {
    pub fn new(base_url: Option<Url>, anon_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            anon_key,
            session_token: None,
        }
    }

    /// Same client, holding `token` as the current session.
    pub fn with_session(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    fn user_endpoint(&self) -> IdentityResult<Url> {
        let base = self.base_url.as_ref().ok_or(IdentityError::NotConfigured)?;

        // `join` drops the last segment unless the base ends with '/'
        let mut base = base.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        base.join(USER_PATH).map_err(|e| {
            tracing::debug!(error = %e, "identity service url cannot take a path");
            IdentityError::NotConfigured
        })
    }

    async fn fetch_user(&self, token: &str) -> IdentityResult<Option<UserIdentity>> {
        let endpoint = self.user_endpoint()?;

        let mut req = self.http.get(endpoint).bearer_auth(token);
        if let Some(key) = &self.anon_key {
            req = req.header("apikey", key);
        }

        let resp = req
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| IdentityError::Transport(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .bytes()
            .await
            .map_err(|e| IdentityError::Transport(e.to_string()))?;

        if REJECTION_STATUSES.contains(&status) {
            return Err(IdentityError::Rejected {
                status: status.as_u16(),
                message: rejection_message(status, &body),
            });
        }
        // 404 / 429 / 5xx: the service is misaddressed or unhealthy, not the credential
        if status.is_client_error() || status.is_server_error() {
            return Err(IdentityError::Upstream {
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            return Err(IdentityError::MalformedResponse(format!(
                "unexpected status {status}"
            )));
        }

        let value: serde_json::Value = if body.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&body)
                .map_err(|e| IdentityError::MalformedResponse(e.to_string()))?
        };

        parse_user(value)
    }
}

/// Accepts either a bare user object or a `{ "user": ... }` envelope.
fn parse_user(value: serde_json::Value) -> IdentityResult<Option<UserIdentity>> {
    use serde_json::Value;

    match value {
        Value::Null => Ok(None),
        Value::Object(mut obj) => {
            if let Some(inner) = obj.remove("user") {
                return parse_user(inner);
            }
            let has_id = obj
                .get("id")
                .and_then(Value::as_str)
                .is_some_and(|id| !id.trim().is_empty());
            if has_id {
                Ok(Some(UserIdentity::from_value(Value::Object(obj))))
            } else {
                Err(IdentityError::MalformedResponse(
                    "user object without id".into(),
                ))
            }
        }
        other => Err(IdentityError::MalformedResponse(format!(
            "expected object, got {}",
            json_kind(&other)
        ))),
    }
}

fn rejection_message(status: StatusCode, body: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            ["msg", "error_description", "message", "error"]
                .iter()
                .find_map(|k| v.get(*k).and_then(|m| m.as_str()).map(str::to_string))
        })
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("rejected").to_string())
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[async_trait]
impl IdentityClient for HttpIdentityClient {
    fn backend_name(&self) -> &'static str {
        "hosted-identity"
    }

    async fn get_user(&self, token: &str) -> IdentityResult<Option<UserIdentity>> {
        self.fetch_user(token).await
    }

    async fn current_user(&self) -> IdentityResult<Option<UserIdentity>> {
        match self.session_token.as_deref() {
            Some(token) => self.fetch_user(token).await,
            None => Ok(None),
        }
    }
}
