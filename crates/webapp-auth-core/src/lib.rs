//! Core verification logic for mini-app init data.
//!
//! A client hands the backend an opaque, URL-encoded string of key/value
//! pairs signed by the platform with a secret derived from the bot token.
//! This crate turns that string into a trusted identity:
//!
//! - **Canonicalization**: `InitData`, `CanonicalForm`, `canonicalize`
//! - **Signature verification**: `InitDataVerifier`, `VerifierConfig`, `SharedSecret`
//! - **Identity normalization**: `NormalizedIdentity`, `UserId`, `normalize_identity`
//! - **Referral codes**: `extract_referral_code`, `generate_referral_code`
//!
//! # Example
//!
//! ```
//! use webapp_auth_core::{sign_init_data, InitDataVerifier, SharedSecret, VerifierConfig};
//!
//! let secret = SharedSecret::new("123456:bot-token");
//! let now = chrono::Utc::now().timestamp().to_string();
//! let raw = sign_init_data(
//!     &[("auth_date", now.as_str()), ("user", r#"{"id":42,"first_name":"Ann"}"#)],
//!     &secret,
//! )?;
//!
//! let verifier = InitDataVerifier::new(&secret, VerifierConfig::default())?;
//! let identity = verifier.verify_and_extract_identity(&raw)?;
//! assert_eq!(identity.id.get(), 42);
//! assert_eq!(identity.referral_code(), "CG0000426");
//! # Ok::<(), webapp_auth_core::AuthError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod canonical;
pub mod crypto;
pub mod error;
pub mod identity;
pub mod referral;
pub mod verify;

pub use canonical::{canonicalize, CanonicalForm, InitData, HASH_FIELD};
pub use error::{AuthError, ErrorClass, Result};
pub use identity::{
    normalize_identity, parse_identity_field, NormalizedIdentity, UserId, DEFAULT_LANGUAGE_CODE,
    MAX_NAME_CHARS, USER_FIELD,
};
pub use referral::{extract_referral_code, generate_referral_code, REFERRAL_PREFIX};
pub use verify::{
    derive_secret_key, sign_init_data, InitDataVerifier, SharedSecret, VerifierConfig,
    AUTH_DATE_FIELD, DEFAULT_MAX_AGE_SECONDS,
};
