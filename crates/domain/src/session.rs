//! Session gate over an externally-issued bearer token.
//!
//! The gate only reads the token's expiry claim; issuing, storing and
//! discarding tokens belongs to the caller.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Claims {
    exp: i64,
}

/// True when `token` carries an `exp` claim strictly later than `now`.
///
/// Absent, malformed and expired tokens are all treated the same way:
/// the session is simply invalid, nothing is raised.
pub fn is_session_valid(token: Option<&str>, now_epoch_secs: i64) -> bool {
    token
        .and_then(expiry_claim)
        .map_or(false, |exp| now_epoch_secs < exp)
}

/// Expiry claim from the token's payload segment, if it decodes.
fn expiry_claim(token: &str) -> Option<i64> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    let claims: Claims = serde_json::from_slice(&bytes).ok()?;
    Some(claims.exp)
}
