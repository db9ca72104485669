//! Webapp-auth HTTP client implementation.

use reqwest::Client;
use std::time::Duration;

use crate::error::ClientError;
use crate::types::{ApiErrorResponse, AuthRequest, AuthResponse, HealthResponse, NormalizedIdentity};

/// Webapp-auth API client.
#[derive(Debug, Clone)]
pub struct AuthClient {
    client: Client,
    base_url: String,
}

impl AuthClient {
    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the service (e.g., `"http://webapp-auth:8080"`)
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is empty or the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_options(base_url, ClientOptions::default())
    }

    /// Create a new client with custom options.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is empty or the HTTP client cannot be built.
    pub fn with_options(
        base_url: impl Into<String>,
        options: ClientOptions,
    ) -> Result<Self, ClientError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ClientError::Configuration("base_url must not be empty".into()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Verify init data and log the user in.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects the init data.
    pub async fn authenticate(&self, init_data: &str) -> Result<AuthResponse, ClientError> {
        let url = format!("{}/v1/auth/telegram", self.base_url);
        let request = AuthRequest {
            init_data: init_data.to_string(),
        };

        let response = self.client.post(&url).json(&request).send().await?;

        self.handle_response(response).await
    }

    /// Fetch the identity `init_data` authenticates as.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects the init data.
    pub async fn current_user(&self, init_data: &str) -> Result<NormalizedIdentity, ClientError> {
        let url = format!("{}/v1/users/me", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("authorization", format!("tma {init_data}"))
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Check service health.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service is unhealthy.
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let url = format!("{}/health", self.base_url);
        let response = self.client.get(&url).send().await?;
        self.handle_response(response).await
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            return Ok(serde_json::from_str(&body)?);
        }

        match serde_json::from_str::<ApiErrorResponse>(&body) {
            Ok(api_error) => {
                tracing::debug!(
                    status = status.as_u16(),
                    code = %api_error.error.code,
                    "Request rejected"
                );
                Err(ClientError::Api {
                    code: api_error.error.code,
                    message: api_error.error.message,
                    status: status.as_u16(),
                })
            }
            Err(_) => Err(ClientError::Api {
                code: "unknown".to_string(),
                message: format!("HTTP {status}"),
                status: status.as_u16(),
            }),
        }
    }
}

/// Client options for customization.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Request timeout in seconds (default: 10).
    pub timeout_seconds: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 10,
        }
    }
}
