use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use sha2::{Digest, Sha256};

const FINGERPRINT_LEN: usize = 12;

/// Short, non-reversible token id for log correlation: base64url(SHA-256(token)) prefix.
///
/// Raw tokens never go to logs.
pub fn token_fingerprint(token: &str) -> String {
    let mut h = Sha256::new();
    h.update(token.as_bytes());
    let mut encoded = URL_SAFE_NO_PAD.encode(h.finalize());
    encoded.truncate(FINGERPRINT_LEN);
    encoded
}
