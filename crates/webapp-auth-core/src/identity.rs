//! Identity extraction and sanitization.
//!
//! The `user` field of verified init data holds a URL-encoded JSON object.
//! This module decodes it and turns it into a [`NormalizedIdentity`] whose
//! `id` is always a positive integer and whose text fields are trimmed,
//! length-capped and, for `username`, restricted to a safe charset.

use std::fmt;
use std::num::NonZeroU64;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{AuthError, Result};
use crate::referral::{extract_referral_code, generate_referral_code};

/// Name of the init data field carrying the identity JSON.
pub const USER_FIELD: &str = "user";

/// Maximum length, in characters, of the optional name fields.
pub const MAX_NAME_CHARS: usize = 255;

/// Language used when the identity carries none.
pub const DEFAULT_LANGUAGE_CODE: &str = "en";

/// A positive numeric user identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(NonZeroU64);

impl UserId {
    /// Create an identifier, returning `None` for zero.
    #[must_use]
    pub const fn new(id: u64) -> Option<Self> {
        match NonZeroU64::new(id) {
            Some(id) => Some(Self(id)),
            None => None,
        }
    }

    /// Return the numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl FromStr for UserId {
    type Err = AuthError;

    /// Parse a non-empty string of ASCII decimal digits.
    ///
    /// Signs, whitespace and non-ASCII digits are rejected.
    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AuthError::InvalidIdentifier);
        }
        s.parse::<u64>()
            .ok()
            .and_then(Self::new)
            .ok_or(AuthError::InvalidIdentifier)
    }
}

impl TryFrom<&Value> for UserId {
    type Error = AuthError;

    /// Accept a JSON integer or a string of decimal digits.
    fn try_from(value: &Value) -> Result<Self> {
        match value {
            Value::Number(n) => n
                .as_u64()
                .and_then(Self::new)
                .ok_or(AuthError::InvalidIdentifier),
            Value::String(s) => s.parse(),
            _ => Err(AuthError::InvalidIdentifier),
        }
    }
}

impl fmt::Debug for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserId({})", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A verified, sanitized identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedIdentity {
    /// The platform user ID.
    pub id: UserId,
    /// Handle, restricted to ASCII letters, digits, `_` and `-`.
    pub username: Option<String>,
    /// First name.
    pub first_name: Option<String>,
    /// Last name.
    pub last_name: Option<String>,
    /// Whether the account is a bot.
    #[serde(default)]
    pub is_bot: bool,
    /// IETF language tag reported by the client.
    pub language_code: String,
    /// Authentication timestamp (epoch seconds) as received.
    pub auth_date: Option<String>,
    /// Start parameter the app was opened with.
    pub start_param: Option<String>,
}

impl NormalizedIdentity {
    /// Referral code of this user.
    #[must_use]
    pub fn referral_code(&self) -> String {
        generate_referral_code(self.id.get())
    }

    /// Referral code of the inviting user, taken from `start_param`.
    ///
    /// An empty code after `ref_` counts as no referral.
    #[must_use]
    pub fn referred_by(&self) -> Option<String> {
        extract_referral_code(self.start_param.as_deref()).filter(|code| !code.is_empty())
    }
}

/// Decode the raw `user` field into a JSON object.
///
/// The value is percent-decoded once more on top of the query string
/// decoding, then parsed as JSON.
pub fn parse_identity_field(raw: Option<&str>) -> Result<Value> {
    let raw = raw
        .filter(|s| !s.is_empty())
        .ok_or(AuthError::MissingIdentity)?;

    let decoded = urlencoding::decode(raw)
        .map_err(|e| AuthError::InvalidIdentityFormat(e.to_string()))?;

    let value: Value = serde_json::from_str(&decoded)
        .map_err(|e| AuthError::InvalidIdentityFormat(e.to_string()))?;

    if !value.is_object() {
        return Err(AuthError::InvalidIdentityFormat(
            "expected a JSON object".into(),
        ));
    }

    Ok(value)
}

/// Normalize a decoded identity object.
///
/// Only a missing or unusable `id` is fatal. Every other field is cleaned up
/// or defaulted: a `username` with disallowed characters is dropped, not
/// rejected.
pub fn normalize_identity(value: &Value, default_language: &str) -> Result<NormalizedIdentity> {
    let obj = value
        .as_object()
        .ok_or_else(|| AuthError::InvalidIdentityFormat("expected a JSON object".into()))?;

    let id = obj
        .get("id")
        .ok_or(AuthError::InvalidIdentifier)
        .and_then(UserId::try_from)?;

    let username = clean_text(obj, "username").filter(|name| {
        let valid = is_valid_username(name);
        if !valid {
            tracing::debug!(user_id = %id, "Discarding username with disallowed characters");
        }
        valid
    });

    let language_code = obj
        .get("language_code")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(default_language)
        .to_string();

    Ok(NormalizedIdentity {
        id,
        username,
        first_name: clean_text(obj, "first_name"),
        last_name: clean_text(obj, "last_name"),
        is_bot: obj.get("is_bot").and_then(Value::as_bool).unwrap_or(false),
        language_code,
        auth_date: scalar_to_string(obj.get("auth_date")),
        start_param: scalar_to_string(obj.get("start_param")),
    })
}

/// Trim, cap at [`MAX_NAME_CHARS`], and treat empty as absent.
fn clean_text(obj: &Map<String, Value>, key: &str) -> Option<String> {
    let trimmed = obj.get(key)?.as_str()?.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(MAX_NAME_CHARS).collect())
}

fn is_valid_username(name: &str) -> bool {
    name.bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

fn scalar_to_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
