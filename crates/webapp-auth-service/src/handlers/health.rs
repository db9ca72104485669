//! Liveness endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

const SERVICE_NAME: &str = "webapp-auth";

/// Liveness report with the verification policy in force.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"`.
    pub status: &'static str,
    /// Service name.
    pub service: &'static str,
    /// Crate version.
    pub version: &'static str,
    /// Oldest accepted init data, in seconds.
    pub max_age_seconds: u64,
    /// Whether init data without `auth_date` is rejected.
    pub require_auth_date: bool,
}

/// `GET /health`. The verifier is built before the router, so reaching this
/// handler means a bot token is loaded.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let policy = state.verifier.config();

    Json(HealthResponse {
        status: "ok",
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        max_age_seconds: policy.max_age_seconds,
        require_auth_date: policy.require_auth_date,
    })
}
