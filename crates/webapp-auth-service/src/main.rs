//! Init data authentication service.
//!
//! This is the main entry point for the webapp-auth service.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use webapp_auth_service::{create_router, AppState, ServiceConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,webapp_auth=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting webapp-auth service");

    #[cfg(feature = "dev-auth")]
    tracing::warn!("Built with dev-auth: unsigned `dev` identities are accepted");

    let config = ServiceConfig::from_env();

    tracing::info!(
        listen_addr = %config.listen_addr,
        bot_token_configured = %config.bot_token.is_some(),
        max_age_seconds = config.max_age_seconds,
        require_auth_date = config.require_auth_date,
        "Service configuration loaded"
    );

    let state = AppState::new(config.clone())?;

    let app = create_router(state);

    tracing::info!(listen_addr = %config.listen_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
