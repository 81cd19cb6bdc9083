//! Identity service interface used by the user resolver.
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for identity service calls.
pub type IdentityResult<T> = Result<T, IdentityError>;

/// Errors surfaced by an identity client.
///
/// Note:
/// - `Rejected` is the service saying "this credential is not valid"; every other
///   variant is a fault on the way there (config, network, upstream, decoding).
/// - Kept independent from `AppError` so the resolver decides how to collapse them.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("credential rejected by identity service ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("identity service is not configured")]
    NotConfigured,
    #[error("identity service transport error: {0}")]
    Transport(String),
    // 5xx, or a 4xx that is not about the credential (404, 429, ...)
    #[error("identity service upstream error ({status})")]
    Upstream { status: u16 },
    #[error("malformed identity service response: {0}")]
    MalformedResponse(String),
}

impl IdentityError {
    /// Whether this is an expected outcome (bad/expired credential) rather than a fault.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

/// User record as returned by the identity service.
///
/// Opaque: the payload is forwarded untouched. `id()` exists for logs only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserIdentity(serde_json::Value);

impl UserIdentity {
    pub fn from_value(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(|v| v.as_str())
    }
}

/// Handle to the hosted identity service.
///
/// Implementations are shared behind `Arc<dyn IdentityClient>` and must be
/// safe to call concurrently.
#[async_trait]
pub trait IdentityClient: Send + Sync + 'static {
    // Returns the backend name (for logging).
    fn backend_name(&self) -> &'static str;

    // Validate `token` and return the user it belongs to.
    //
    // Returns:
    // - `Ok(Some(_))` token is valid
    // - `Ok(None)`    service answered successfully but without a user
    // - `Err(_)`      rejection or fault
    async fn get_user(&self, token: &str) -> IdentityResult<Option<UserIdentity>>;

    // User of the session this client currently holds (client context only).
    async fn current_user(&self) -> IdentityResult<Option<UserIdentity>>;
}
