//! Error types for init data verification.

/// Result type for verification operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Coarse outcome class of an [`AuthError`].
///
/// The transport layer maps each class to a response status; the kind itself
/// is still carried alongside so callers can tell malformed input apart from
/// a forged or replayed payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The caller sent malformed or incomplete input.
    ClientInput,
    /// The payload is well formed but not authentic or no longer fresh.
    Authentication,
    /// Something failed that the caller cannot fix.
    Internal,
}

/// Errors that can occur while verifying init data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The payload carries no `hash` field (or an empty one).
    #[error("missing hash parameter")]
    MissingSignature,

    /// `auth_date` is present but not a base-10 integer.
    #[error("invalid auth_date format")]
    MalformedTimestamp,

    /// `auth_date` is absent and the verifier requires it.
    #[error("missing auth_date parameter")]
    MissingTimestamp,

    /// The payload is older than the configured maximum age.
    #[error("auth data is too old: age={age_seconds}s, max={max_age_seconds}s")]
    StalePayload {
        /// Observed age in seconds.
        age_seconds: i64,
        /// Configured maximum age in seconds.
        max_age_seconds: u64,
    },

    /// The computed signature does not match the supplied one.
    #[error("invalid hash signature")]
    SignatureMismatch,

    /// The payload carries no `user` field.
    #[error("missing user data")]
    MissingIdentity,

    /// The `user` field could not be decoded into a JSON object.
    #[error("invalid user data format: {0}")]
    InvalidIdentityFormat(String),

    /// The identity has no usable positive numeric `id`.
    #[error("invalid user id")]
    InvalidIdentifier,

    /// An unanticipated failure. The detail is for logs only.
    #[error("unexpected verification failure: {0}")]
    Unexpected(String),
}

impl AuthError {
    /// Return the outcome class for this error.
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::MissingSignature
            | Self::MalformedTimestamp
            | Self::MissingTimestamp
            | Self::MissingIdentity
            | Self::InvalidIdentityFormat(_)
            | Self::InvalidIdentifier => ErrorClass::ClientInput,
            Self::StalePayload { .. } | Self::SignatureMismatch => ErrorClass::Authentication,
            Self::Unexpected(_) => ErrorClass::Internal,
        }
    }

    /// Stable machine-readable code for this error kind.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingSignature => "missing_signature",
            Self::MalformedTimestamp => "malformed_timestamp",
            Self::MissingTimestamp => "missing_timestamp",
            Self::StalePayload { .. } => "stale_payload",
            Self::SignatureMismatch => "signature_mismatch",
            Self::MissingIdentity => "missing_identity",
            Self::InvalidIdentityFormat(_) => "invalid_identity_format",
            Self::InvalidIdentifier => "invalid_identifier",
            Self::Unexpected(_) => "unexpected_failure",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classes_match_kinds() {
        assert_eq!(AuthError::MissingSignature.class(), ErrorClass::ClientInput);
        assert_eq!(AuthError::MalformedTimestamp.class(), ErrorClass::ClientInput);
        assert_eq!(AuthError::InvalidIdentifier.class(), ErrorClass::ClientInput);
        assert_eq!(AuthError::SignatureMismatch.class(), ErrorClass::Authentication);
        assert_eq!(
            AuthError::StalePayload {
                age_seconds: 90_000,
                max_age_seconds: 86_400
            }
            .class(),
            ErrorClass::Authentication
        );
        assert_eq!(
            AuthError::Unexpected("boom".into()).class(),
            ErrorClass::Internal
        );
    }

    #[test]
    fn codes_are_distinct() {
        let all = [
            AuthError::MissingSignature,
            AuthError::MalformedTimestamp,
            AuthError::MissingTimestamp,
            AuthError::StalePayload {
                age_seconds: 1,
                max_age_seconds: 0,
            },
            AuthError::SignatureMismatch,
            AuthError::MissingIdentity,
            AuthError::InvalidIdentityFormat(String::new()),
            AuthError::InvalidIdentifier,
            AuthError::Unexpected(String::new()),
        ];
        let mut codes: Vec<_> = all.iter().map(AuthError::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), all.len());
    }
}
