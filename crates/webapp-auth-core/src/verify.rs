//! Init data signature verification.
//!
//! The signing key is `HMAC-SHA256(key = "WebAppData", message = bot_token)`.
//! The signature is `hex(HMAC-SHA256(key = signing_key, message = check_string))`.
//!
//! Verification runs as a chain of fallible steps:
//!
//! 1. canonicalize (missing `hash` fails here)
//! 2. compare signatures in constant time
//! 3. check `auth_date` freshness
//! 4. decode and normalize the `user` identity
//!
//! The signature is checked before anything else reads field values, so a
//! forged payload always fails with [`AuthError::SignatureMismatch`].

use std::fmt;

use chrono::{DateTime, Utc};

use crate::canonical::{canonicalize, CanonicalForm, InitData, HASH_FIELD};
use crate::crypto::{constant_time_eq, hmac_sha256, hmac_sha256_hex};
use crate::error::{AuthError, Result};
use crate::identity::{
    normalize_identity, parse_identity_field, NormalizedIdentity, DEFAULT_LANGUAGE_CODE,
    USER_FIELD,
};

/// Name of the field holding the signing timestamp (epoch seconds).
pub const AUTH_DATE_FIELD: &str = "auth_date";

/// Name of the top-level start parameter field.
const START_PARAM_FIELD: &str = "start_param";

/// Default maximum payload age (24 hours).
pub const DEFAULT_MAX_AGE_SECONDS: u64 = 86_400;

/// Domain-separation label mixed into key derivation.
const KEY_DERIVATION_LABEL: &[u8] = b"WebAppData";

/// The shared secret (bot token) init data is signed with.
///
/// `Debug` output never contains the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct SharedSecret(String);

impl SharedSecret {
    /// Wrap a secret.
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Raw secret bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Whether the secret is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for SharedSecret {
    fn from(secret: String) -> Self {
        Self(secret)
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedSecret(<redacted>)")
    }
}

/// Verification policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifierConfig {
    /// Maximum accepted age of `auth_date`, in seconds. A payload exactly
    /// this old is still accepted.
    pub max_age_seconds: u64,

    /// Reject payloads without `auth_date` instead of skipping the
    /// freshness check.
    pub require_auth_date: bool,

    /// Language code used when the identity carries none.
    pub default_language: String,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            max_age_seconds: DEFAULT_MAX_AGE_SECONDS,
            require_auth_date: false,
            default_language: DEFAULT_LANGUAGE_CODE.into(),
        }
    }
}

/// Derive the signing key from the shared secret.
pub fn derive_secret_key(secret: &SharedSecret) -> Result<Vec<u8>> {
    hmac_sha256(KEY_DERIVATION_LABEL, secret.as_bytes())
}

/// Build a signed init data query string from `fields`.
///
/// Any `hash` entry in `fields` is replaced by the computed signature.
pub fn sign_init_data(fields: &[(&str, &str)], secret: &SharedSecret) -> Result<String> {
    let mut data: InitData = fields.iter().copied().collect();
    data.remove(HASH_FIELD);

    let key = derive_secret_key(secret)?;
    let hash = hmac_sha256_hex(&key, data.check_string().as_bytes())?;
    data.insert(HASH_FIELD, hash);

    Ok(data.to_query_string())
}

/// Verifies init data against one shared secret.
///
/// The signing key is derived once at construction and never changes, so a
/// verifier can be shared freely across threads.
#[derive(Clone)]
pub struct InitDataVerifier {
    secret_key: Vec<u8>,
    config: VerifierConfig,
}

impl fmt::Debug for InitDataVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InitDataVerifier")
            .field("secret_key", &"<redacted>")
            .field("config", &self.config)
            .finish()
    }
}

impl InitDataVerifier {
    /// Create a verifier for `secret`.
    pub fn new(secret: &SharedSecret, config: VerifierConfig) -> Result<Self> {
        Ok(Self {
            secret_key: derive_secret_key(secret)?,
            config,
        })
    }

    /// The active policy.
    #[must_use]
    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Check the supplied hash against the one computed over the check string.
    pub fn verify_signature(&self, form: &CanonicalForm) -> Result<()> {
        let expected = hmac_sha256_hex(&self.secret_key, form.check_string.as_bytes())?;
        if constant_time_eq(&expected, &form.hash) {
            Ok(())
        } else {
            Err(AuthError::SignatureMismatch)
        }
    }

    /// Enforce the maximum payload age.
    ///
    /// An absent or empty `auth_date` skips the check unless
    /// `require_auth_date` is set. Timestamps in the future are accepted.
    pub fn check_freshness(&self, auth_date: Option<&str>, now: DateTime<Utc>) -> Result<()> {
        let Some(raw) = auth_date.filter(|s| !s.is_empty()) else {
            return if self.config.require_auth_date {
                Err(AuthError::MissingTimestamp)
            } else {
                Ok(())
            };
        };

        let auth_timestamp: i64 = raw.parse().map_err(|_| AuthError::MalformedTimestamp)?;
        let age_seconds = now.timestamp().saturating_sub(auth_timestamp);
        let max_age = i64::try_from(self.config.max_age_seconds).unwrap_or(i64::MAX);

        if age_seconds > max_age {
            return Err(AuthError::StalePayload {
                age_seconds,
                max_age_seconds: self.config.max_age_seconds,
            });
        }

        Ok(())
    }

    /// Verify signature and freshness, returning the authenticated fields.
    pub fn verify_at(&self, raw: &str, now: DateTime<Utc>) -> Result<InitData> {
        let form = canonicalize(raw)?;
        self.verify_signature(&form)?;
        self.check_freshness(form.fields.get(AUTH_DATE_FIELD), now)?;
        Ok(form.fields)
    }

    /// Verify `raw` and extract the identity it carries, using the current time.
    pub fn verify_and_extract_identity(&self, raw: &str) -> Result<NormalizedIdentity> {
        self.verify_and_extract_identity_at(raw, Utc::now())
    }

    /// Verify `raw` as of `now` and extract the identity it carries.
    pub fn verify_and_extract_identity_at(
        &self,
        raw: &str,
        now: DateTime<Utc>,
    ) -> Result<NormalizedIdentity> {
        self.extract_identity(raw, now).map_err(|e| {
            tracing::debug!(code = e.code(), "Init data rejected");
            e
        })
    }

    fn extract_identity(&self, raw: &str, now: DateTime<Utc>) -> Result<NormalizedIdentity> {
        let fields = self.verify_at(raw, now)?;

        let value = parse_identity_field(fields.get(USER_FIELD))?;
        let mut identity = normalize_identity(&value, &self.config.default_language)?;

        // The platform puts these next to `user`, not inside it.
        if identity.auth_date.is_none() {
            identity.auth_date = fields.get(AUTH_DATE_FIELD).map(str::to_string);
        }
        if identity.start_param.is_none() {
            identity.start_param = fields.get(START_PARAM_FIELD).map(str::to_string);
        }

        tracing::debug!(user_id = %identity.id, "Init data verified");

        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    const TOKEN: &str = "123456:TEST-token";
    const NOW: i64 = 1_700_000_000;

    fn at(ts: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(ts, 0).single().unwrap()
    }

    fn secret() -> SharedSecret {
        SharedSecret::new(TOKEN)
    }

    fn verifier() -> InitDataVerifier {
        InitDataVerifier::new(&secret(), VerifierConfig::default()).unwrap()
    }

    fn signed(auth_date: i64, user: &str) -> String {
        let auth_date = auth_date.to_string();
        sign_init_data(
            &[
                ("query_id", "AAHdF6IQAAAAAN0XohDhrOrc"),
                ("auth_date", auth_date.as_str()),
                ("user", user),
            ],
            &secret(),
        )
        .unwrap()
    }

    #[test]
    fn derived_key_matches_known_value() {
        assert_eq!(
            hex::encode(derive_secret_key(&secret()).unwrap()),
            "a7e9cbbf3b12ed9f17e47987df5127299fd56f19e61a9fd3b91937b2f7b3397c"
        );
    }

    #[test]
    fn verifies_known_payload() {
        let raw = "query_id=AAHdF6IQAAAAAN0XohDhrOrc\
            &user=%7B%22id%22%3A279058397%2C%22first_name%22%3A%22Vladislav%22%2C\
            %22username%22%3A%22vdkfrost%22%2C%22language_code%22%3A%22ru%22%7D\
            &auth_date=1700000000\
            &hash=8d066ec0b9d75ce7323c79896ffaf0c340efeb499070b5e5b565717c10217d8c";

        let identity = verifier()
            .verify_and_extract_identity_at(raw, at(NOW + 100))
            .unwrap();

        assert_eq!(identity.id.get(), 279_058_397);
        assert_eq!(identity.first_name.as_deref(), Some("Vladislav"));
        assert_eq!(identity.username.as_deref(), Some("vdkfrost"));
        assert_eq!(identity.language_code, "ru");
        assert_eq!(identity.auth_date.as_deref(), Some("1700000000"));
    }

    #[test]
    fn signed_payload_round_trips() {
        let raw = signed(NOW, r#"{"id":12345,"first_name":"Ann","username":"ann_b"}"#);
        let identity = verifier()
            .verify_and_extract_identity_at(&raw, at(NOW))
            .unwrap();
        assert_eq!(identity.id.get(), 12345);
        assert_eq!(identity.username.as_deref(), Some("ann_b"));
        assert!(!identity.is_bot);
    }

    #[test]
    fn tampered_fields_fail_with_signature_mismatch() {
        let raw = signed(NOW, r#"{"id":12345,"first_name":"Ann"}"#);
        let original = InitData::parse(&raw);
        let verifier = verifier();

        for (key, value) in original.iter() {
            if key == HASH_FIELD {
                continue;
            }
            let mut chars: Vec<char> = value.chars().collect();
            chars[0] = if chars[0] == '1' { '2' } else { '1' };
            let mut tampered = original.clone();
            tampered.insert(key, chars.into_iter().collect::<String>());

            assert_eq!(
                verifier.verify_and_extract_identity_at(&tampered.to_query_string(), at(NOW)),
                Err(AuthError::SignatureMismatch),
                "tampered field {key}"
            );
        }
    }

    #[test]
    fn tampered_hash_fails_with_signature_mismatch() {
        let raw = signed(NOW, r#"{"id":12345}"#);
        let mut data = InitData::parse(&raw);
        let hash = data.get(HASH_FIELD).unwrap().to_string();
        let flipped = if hash.starts_with('0') { "1" } else { "0" };
        data.insert(HASH_FIELD, format!("{flipped}{}", &hash[1..]));

        assert_eq!(
            verifier().verify_at(&data.to_query_string(), at(NOW)),
            Err(AuthError::SignatureMismatch)
        );

        data.insert(HASH_FIELD, &hash[..10]);
        assert_eq!(
            verifier().verify_at(&data.to_query_string(), at(NOW)),
            Err(AuthError::SignatureMismatch)
        );
    }

    #[test]
    fn added_field_fails_with_signature_mismatch() {
        let raw = format!("{}&extra=1", signed(NOW, r#"{"id":1}"#));
        assert_eq!(
            verifier().verify_at(&raw, at(NOW)),
            Err(AuthError::SignatureMismatch)
        );
    }

    #[test]
    fn wrong_secret_fails() {
        let other = InitDataVerifier::new(
            &SharedSecret::new("654321:other"),
            VerifierConfig::default(),
        )
        .unwrap();
        assert_eq!(
            other.verify_at(&signed(NOW, r#"{"id":1}"#), at(NOW)),
            Err(AuthError::SignatureMismatch)
        );
    }

    #[test]
    fn staleness_boundary() {
        let verifier = verifier();
        let user = r#"{"id":1}"#;

        assert!(verifier.verify_at(&signed(NOW - 86_399, user), at(NOW)).is_ok());
        assert!(verifier.verify_at(&signed(NOW - 86_400, user), at(NOW)).is_ok());
        assert_eq!(
            verifier.verify_at(&signed(NOW - 86_401, user), at(NOW)),
            Err(AuthError::StalePayload {
                age_seconds: 86_401,
                max_age_seconds: 86_400
            })
        );
    }

    #[test]
    fn custom_max_age_is_honored() {
        let config = VerifierConfig {
            max_age_seconds: 60,
            ..VerifierConfig::default()
        };
        let verifier = InitDataVerifier::new(&secret(), config).unwrap();
        assert!(matches!(
            verifier.verify_at(&signed(NOW - 61, r#"{"id":1}"#), at(NOW)),
            Err(AuthError::StalePayload { .. })
        ));
    }

    #[test]
    fn future_auth_date_is_accepted() {
        assert!(verifier()
            .verify_at(&signed(NOW + 30, r#"{"id":1}"#), at(NOW))
            .is_ok());
    }

    #[test]
    fn malformed_auth_date_fails_after_signature_check() {
        let raw = sign_init_data(&[("auth_date", "yesterday"), ("user", r#"{"id":1}"#)], &secret())
            .unwrap();
        assert_eq!(
            verifier().verify_at(&raw, at(NOW)),
            Err(AuthError::MalformedTimestamp)
        );
    }

    #[test]
    fn missing_auth_date_is_tolerated_by_default() {
        let raw = sign_init_data(&[("user", r#"{"id":1}"#)], &secret()).unwrap();
        let identity = verifier()
            .verify_and_extract_identity_at(&raw, at(NOW))
            .unwrap();
        assert_eq!(identity.auth_date, None);
    }

    #[test]
    fn missing_auth_date_fails_when_required() {
        let config = VerifierConfig {
            require_auth_date: true,
            ..VerifierConfig::default()
        };
        let verifier = InitDataVerifier::new(&secret(), config).unwrap();
        let raw = sign_init_data(&[("user", r#"{"id":1}"#)], &secret()).unwrap();
        assert_eq!(
            verifier.verify_at(&raw, at(NOW)),
            Err(AuthError::MissingTimestamp)
        );
    }

    #[test]
    fn missing_hash_fails() {
        assert_eq!(
            verifier().verify_and_extract_identity_at("auth_date=1&user=%7B%7D", at(NOW)),
            Err(AuthError::MissingSignature)
        );
        assert_eq!(
            verifier().verify_and_extract_identity_at("", at(NOW)),
            Err(AuthError::MissingSignature)
        );
    }

    #[test]
    fn identity_failures_surface_after_verification() {
        let verifier = verifier();
        let now = NOW.to_string();

        let raw = sign_init_data(&[("auth_date", now.as_str())], &secret()).unwrap();
        assert_eq!(
            verifier.verify_and_extract_identity_at(&raw, at(NOW)),
            Err(AuthError::MissingIdentity)
        );

        let raw = sign_init_data(&[("auth_date", now.as_str()), ("user", "not-json")], &secret()).unwrap();
        assert!(matches!(
            verifier.verify_and_extract_identity_at(&raw, at(NOW)),
            Err(AuthError::InvalidIdentityFormat(_))
        ));

        let raw = sign_init_data(&[("auth_date", now.as_str()), ("user", r#"{"id":"abc"}"#)], &secret())
            .unwrap();
        assert_eq!(
            verifier.verify_and_extract_identity_at(&raw, at(NOW)),
            Err(AuthError::InvalidIdentifier)
        );
    }

    #[test]
    fn top_level_start_param_is_carried() {
        let now = NOW.to_string();
        let raw = sign_init_data(
            &[
                ("auth_date", now.as_str()),
                ("start_param", "ref_ABC123"),
                ("user", r#"{"id":5,"username":"john doe!"}"#),
            ],
            &secret(),
        )
        .unwrap();

        let identity = verifier()
            .verify_and_extract_identity_at(&raw, at(NOW))
            .unwrap();
        assert_eq!(identity.start_param.as_deref(), Some("ref_ABC123"));
        assert_eq!(identity.referred_by().as_deref(), Some("ABC123"));
        assert_eq!(identity.username, None);
    }

    #[test]
    fn sign_replaces_existing_hash() {
        let raw = sign_init_data(&[("a", "1"), ("hash", "bogus")], &secret()).unwrap();
        assert!(verifier().verify_at(&raw, at(NOW)).is_ok());
    }

    #[test]
    fn debug_output_hides_secrets() {
        let secret = secret();
        assert!(!format!("{secret:?}").contains(TOKEN));
        let verifier = verifier();
        let rendered = format!("{verifier:?}");
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("a7e9cbbf"));
    }
}
