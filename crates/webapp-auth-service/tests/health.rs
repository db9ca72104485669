//! Health endpoint integration tests.

mod common;

use common::TestHarness;
use webapp_auth_service::ServiceConfig;

#[tokio::test]
async fn health_check_returns_ok() {
    let harness = TestHarness::new();

    let response = harness.server.get("/health").await;

    response.assert_status_ok();
}

#[tokio::test]
async fn health_check_returns_json() {
    let harness = TestHarness::new();

    let response = harness.server.get("/health").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "webapp-auth");
}

#[tokio::test]
async fn health_reports_verification_policy() {
    let harness = TestHarness::with_config(ServiceConfig {
        max_age_seconds: 3600,
        require_auth_date: true,
        ..ServiceConfig::default()
    });

    let body: serde_json::Value = harness.server.get("/health").await.json();
    assert_eq!(body["max_age_seconds"], 3600);
    assert_eq!(body["require_auth_date"], true);
}
