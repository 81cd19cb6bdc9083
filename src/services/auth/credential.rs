//! Bearer credential extraction from an inbound request.
//!
//! Precedence (first non-empty source wins):
//! 1. access-token cookie
//! 2. generic auth-token cookie
//! 3. `Authorization: Bearer <token>`

use axum::http::{HeaderMap, header};

/// Names of the two cookies that may carry the credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieNames {
    pub access_token: String,
    pub auth_token: String,
}

impl Default for CookieNames {
    fn default() -> Self {
        Self {
            access_token: "sb-access-token".to_string(),
            auth_token: "auth-token".to_string(),
        }
    }
}

/// Where a credential was found (for logs).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    AccessTokenCookie,
    AuthTokenCookie,
    BearerHeader,
}

impl CredentialSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccessTokenCookie => "access_token_cookie",
            Self::AuthTokenCookie => "auth_token_cookie",
            Self::BearerHeader => "bearer_header",
        }
    }
}

/// Opaque bearer token plus the place it came from.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
    source: CredentialSource,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print the token
        f.debug_struct("Credential")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl Credential {
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn source(&self) -> CredentialSource {
        self.source
    }
}

/// Pick the credential for this request, if any.
pub fn extract(headers: &HeaderMap, names: &CookieNames) -> Option<Credential> {
    let from_cookie = |name: &str, source| {
        cookie_value(headers, name).map(|token| Credential { token, source })
    };

    from_cookie(&names.access_token, CredentialSource::AccessTokenCookie)
        .or_else(|| from_cookie(&names.auth_token, CredentialSource::AuthTokenCookie))
        .or_else(|| {
            bearer_token(headers).map(|token| Credential {
                token,
                source: CredentialSource::BearerHeader,
            })
        })
}

/// First non-empty value of cookie `name` across all `Cookie` headers.
fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.split_once('='))
        .filter(|(k, _)| k.trim() == name)
        .map(|(_, v)| v.trim().trim_matches('"'))
        .find(|v| !v.is_empty())
        .map(str::to_string)
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())?;

    let token = auth.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_string())
}
