//! Common test utilities for webapp-auth integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use axum::Router;
use axum_test::TestServer;

use webapp_auth_core::{sign_init_data, SharedSecret};
use webapp_auth_service::{create_router, AppState, ServiceConfig};

/// Bot token the harness signs and verifies with.
pub const BOT_TOKEN: &str = "7000000001:AAH-test-token";

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// The secret init data is signed with.
    pub secret: SharedSecret,
}

impl TestHarness {
    /// Create a new test harness with the default verification policy.
    pub fn new() -> Self {
        Self::with_config(ServiceConfig::default())
    }

    /// Create a harness from `config`, with the test bot token filled in.
    pub fn with_config(config: ServiceConfig) -> Self {
        let secret = SharedSecret::new(BOT_TOKEN);

        let config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            bot_token: Some(secret.clone()),
            ..config
        };

        let state = AppState::new(config).expect("Failed to build app state");
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");

        Self { server, secret }
    }

    /// Sign `fields` with the harness secret.
    pub fn sign(&self, fields: &[(&str, &str)]) -> String {
        sign_init_data(fields, &self.secret).expect("Failed to sign init data")
    }

    /// Signed init data for `user_json`, dated now.
    pub fn init_data_for(&self, user_json: &str) -> String {
        let now = chrono::Utc::now().timestamp().to_string();
        self.sign(&[
            ("query_id", "AAHdF6IQAAAAAN0XohDhrOrc"),
            ("auth_date", now.as_str()),
            ("user", user_json),
        ])
    }

    /// Authorization header value carrying `init_data`.
    pub fn auth_header(init_data: &str) -> String {
        format!("tma {init_data}")
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
