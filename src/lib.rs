//! Booth Showcase - BOOTH shop listing scraper and gallery API
//!
//! Fetches the configured shop pages concurrently, parses item cards, tracks
//! per-shop freshness, and serves the combined list from a TTL cache. Any shop
//! that cannot be scraped is replaced by static placeholder listings.

// Module declarations
pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::application::AppState;
use crate::infrastructure::config::AppConfig;

/// Serve the gallery API until `shutdown` is cancelled
pub async fn serve(config: AppConfig, shutdown: CancellationToken) -> anyhow::Result<()> {
    let bind = config.server.bind.clone();
    let state = AppState::from_config(config).context("failed to build application state")?;
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;
    info!("🚀 Listening on http://{}", bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .context("server shutdown")?;

    info!("Server stopped");
    Ok(())
}

/// Load configuration, initialize logging and run until Ctrl-C
pub async fn run() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    infrastructure::init_logging_with_config(&config.logging)?;
    infrastructure::logging::log_system_info();

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("🛑 Shutdown signal received"),
            Err(e) => error!("Failed to listen for shutdown signal: {}", e),
        }
        signal_token.cancel();
    });

    serve(config, shutdown).await
}
