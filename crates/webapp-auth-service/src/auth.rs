//! Authentication extractor.
//!
//! Clients authenticate each request by sending the raw init data string in
//! the `Authorization` header:
//!
//! ```text
//! Authorization: tma query_id=...&user=...&auth_date=...&hash=...
//! ```

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use webapp_auth_core::NormalizedIdentity;

use crate::error::ApiError;
use crate::state::AppState;

/// Authorization scheme carrying raw init data.
pub const INIT_DATA_SCHEME: &str = "tma ";

/// An authenticated user extracted from verified init data.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The verified, normalized identity.
    pub identity: NormalizedIdentity,
}

#[async_trait::async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;

        #[cfg(feature = "dev-auth")]
        if let Some(user_id) = auth_header.strip_prefix(dev::DEV_SCHEME) {
            return dev::dev_identity(user_id, state)
                .map(|identity| AuthUser { identity })
                .ok_or(ApiError::Unauthorized);
        }

        let init_data = auth_header
            .strip_prefix(INIT_DATA_SCHEME)
            .ok_or(ApiError::Unauthorized)?;

        let identity = state.verifier.verify_and_extract_identity(init_data)?;

        Ok(AuthUser { identity })
    }
}

/// Unsigned development identities.
///
/// Compiled only with the `dev-auth` feature. A request using the `dev`
/// scheme names the user ID it wants; anything that is not a valid ID is
/// rejected rather than replaced with a stand-in user.
#[cfg(feature = "dev-auth")]
pub mod dev {
    use webapp_auth_core::{NormalizedIdentity, UserId};

    use crate::state::AppState;

    /// Authorization scheme for development identities.
    pub const DEV_SCHEME: &str = "dev ";

    /// Build an identity for `user_id` without any verification.
    #[must_use]
    pub fn dev_identity(user_id: &str, state: &AppState) -> Option<NormalizedIdentity> {
        let id: UserId = user_id.trim().parse().ok()?;

        tracing::warn!(user_id = %id, "Accepting unsigned development identity");

        Some(NormalizedIdentity {
            id,
            username: None,
            first_name: None,
            last_name: None,
            is_bot: false,
            language_code: state.config.default_language.clone(),
            auth_date: None,
            start_param: None,
        })
    }
}
