//! User handlers.

use axum::Json;

use webapp_auth_core::NormalizedIdentity;

use crate::auth::AuthUser;

/// Return the identity the request authenticated as.
pub async fn current_user(auth: AuthUser) -> Json<NormalizedIdentity> {
    Json(auth.identity)
}
