//! Request and response types for the webapp-auth client.

use serde::{Deserialize, Serialize};

pub use webapp_auth_core::NormalizedIdentity;

/// Login request body.
#[derive(Debug, Clone, Serialize)]
pub struct AuthRequest {
    /// Raw init data string.
    pub init_data: String,
}

/// Login response.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    /// Whether verification succeeded.
    pub success: bool,
    /// The verified user.
    pub user: NormalizedIdentity,
    /// The user's own referral code.
    pub referral_code: String,
    /// Referral code of the inviting user.
    #[serde(default)]
    pub referred_by: Option<String>,
}

/// Health check response.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service name.
    pub service: String,
    /// Service version.
    pub version: String,
}

/// API error response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    /// Error details.
    pub error: ApiErrorBody,
}

/// API error details.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    /// Error code.
    pub code: String,
    /// Error message.
    pub message: String,
}
