//! Application state.

use std::sync::Arc;

use webapp_auth_core::InitDataVerifier;

use crate::config::{ConfigError, ServiceConfig};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration.
    pub config: ServiceConfig,

    /// Init data verifier, keyed once from the bot token.
    pub verifier: Arc<InitDataVerifier>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Fails when no bot token is configured: the service never runs
    /// without signature verification.
    pub fn new(config: ServiceConfig) -> Result<Self, ConfigError> {
        let secret = config
            .bot_token
            .as_ref()
            .ok_or(ConfigError::MissingBotToken)?;

        let verifier = InitDataVerifier::new(secret, config.verifier_config())?;

        tracing::info!(
            max_age_seconds = config.max_age_seconds,
            require_auth_date = config.require_auth_date,
            "Init data verifier ready"
        );

        Ok(Self {
            config,
            verifier: Arc::new(verifier),
        })
    }
}
