//! Cryptographic primitives for init data verification.
//!
//! HMAC-SHA256 is used twice: once to derive the per-bot secret key from the
//! token under a fixed label, and once to sign the canonical check string
//! with that derived key.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::error::{AuthError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Compute raw HMAC-SHA256 over `message` keyed with `key`.
///
/// HMAC accepts keys of any length, so the error path only exists to avoid
/// panicking if the underlying implementation ever refuses a key.
pub fn hmac_sha256(key: &[u8], message: &[u8]) -> Result<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| AuthError::Unexpected(format!("hmac key rejected: {e}")))?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Compute HMAC-SHA256 and return the lowercase hex-encoded result.
///
/// The output is always 64 characters long.
pub fn hmac_sha256_hex(key: &[u8], message: &[u8]) -> Result<String> {
    hmac_sha256(key, message).map(hex::encode)
}

/// Constant-time string comparison.
///
/// Strings of different length compare unequal immediately; digest length is
/// public for hex-encoded SHA-256, so the early return leaks nothing useful.
#[must_use]
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}
