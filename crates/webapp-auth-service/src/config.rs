//! Service configuration.

use serde::Deserialize;
use std::path::Path;

use webapp_auth_core::{
    SharedSecret, VerifierConfig, DEFAULT_LANGUAGE_CODE, DEFAULT_MAX_AGE_SECONDS,
};

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address to listen on (default: "0.0.0.0:8080").
    pub listen_addr: String,

    /// Bot token init data is signed with. Required to start.
    pub bot_token: Option<SharedSecret>,

    /// Maximum accepted init data age in seconds (default: 86400).
    pub max_age_seconds: u64,

    /// Reject init data without `auth_date` (default: false).
    pub require_auth_date: bool,

    /// Language code for users that report none (default: "en").
    pub default_language: String,

    /// CORS allowed origins.
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    pub request_timeout_seconds: u64,
}

/// Errors raised while turning configuration into a running service.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No bot token was found in the secrets file or environment.
    #[error("bot token not configured (set BOT_TOKEN or provide .secrets/bot.json)")]
    MissingBotToken,

    /// The verifier could not be built from the configured secret.
    #[error("verifier setup failed: {0}")]
    Verifier(#[from] webapp_auth_core::AuthError),
}

/// Bot secrets file structure.
#[derive(Debug, Deserialize)]
struct BotSecrets {
    bot_token: String,
}

impl ServiceConfig {
    /// Load configuration from environment variables and secrets files.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            listen_addr: std::env::var("LISTEN_ADDR").unwrap_or(defaults.listen_addr),
            bot_token: load_bot_token(),
            max_age_seconds: env_parse("AUTH_MAX_AGE_SECONDS").unwrap_or(defaults.max_age_seconds),
            require_auth_date: std::env::var("AUTH_REQUIRE_AUTH_DATE")
                .ok()
                .map_or(defaults.require_auth_date, |v| parse_flag(&v)),
            default_language: std::env::var("DEFAULT_LANGUAGE")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.default_language),
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".into())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            max_body_bytes: env_parse("MAX_BODY_BYTES").unwrap_or(defaults.max_body_bytes),
            request_timeout_seconds: env_parse("REQUEST_TIMEOUT_SECONDS")
                .unwrap_or(defaults.request_timeout_seconds),
        }
    }

    /// Verification policy derived from this configuration.
    #[must_use]
    pub fn verifier_config(&self) -> VerifierConfig {
        VerifierConfig {
            max_age_seconds: self.max_age_seconds,
            require_auth_date: self.require_auth_date,
            default_language: self.default_language.clone(),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".into(),
            bot_token: None,
            max_age_seconds: DEFAULT_MAX_AGE_SECONDS,
            require_auth_date: false,
            default_language: DEFAULT_LANGUAGE_CODE.into(),
            cors_origins: vec!["*".into()],
            max_body_bytes: 64 * 1024,
            request_timeout_seconds: 30,
        }
    }
}

/// Load the bot token from a secrets file, falling back to `BOT_TOKEN`.
fn load_bot_token() -> Option<SharedSecret> {
    let secret_paths = [
        ".secrets/bot.json",
        "webapp-auth/.secrets/bot.json",
        "../.secrets/bot.json",
    ];

    for path in &secret_paths {
        if let Ok(secrets) = load_secrets_file::<BotSecrets>(path) {
            tracing::info!(path = %path, "Loaded bot token from file");
            return Some(SharedSecret::new(secrets.bot_token)).filter(|s| !s.is_empty());
        }
    }

    tracing::debug!("Bot secrets file not found, using environment variables");
    std::env::var("BOT_TOKEN")
        .ok()
        .filter(|s| !s.is_empty())
        .map(SharedSecret::new)
}

/// Load secrets from a JSON file.
fn load_secrets_file<T: serde::de::DeserializeOwned>(path: &str) -> Result<T, std::io::Error> {
    let path = Path::new(path);
    if !path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Secrets file not found",
        ));
    }
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
