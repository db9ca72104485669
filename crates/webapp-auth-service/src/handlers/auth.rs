//! Init data login handler.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use webapp_auth_core::NormalizedIdentity;

use crate::error::ApiError;
use crate::state::AppState;

/// Login request.
#[derive(Debug, Deserialize)]
pub struct AuthRequest {
    /// Raw init data string exactly as the client received it.
    pub init_data: String,
}

/// Login response.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// Always `true`; failures are reported as error responses.
    pub success: bool,
    /// The verified user.
    pub user: NormalizedIdentity,
    /// The user's own referral code.
    pub referral_code: String,
    /// Referral code of the inviting user, if the app was opened with one.
    pub referred_by: Option<String>,
}

/// Verify init data and return the identity it carries.
pub async fn authenticate(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AuthRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    if body.init_data.trim().is_empty() {
        return Err(ApiError::BadRequest("init_data is required".into()));
    }

    let user = state.verifier.verify_and_extract_identity(&body.init_data)?;

    let referral_code = user.referral_code();
    let referred_by = user.referred_by();

    tracing::info!(
        user_id = %user.id,
        referred = referred_by.is_some(),
        "User authenticated"
    );

    Ok(Json(AuthResponse {
        success: true,
        user,
        referral_code,
        referred_by,
    }))
}
