//! # fw-server
//!
//! Firmware download server for auto-updating routers. Rewrites legacy
//! firmware filenames to the current build and serves it under the name the
//! client asked for.

mod api;
mod services;

use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

/// Shared application state available to all handlers.
pub struct AppState {
    pub config: fw_common::AppConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Load configuration
    let config = fw_common::AppConfig::load()?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level)),
        )
        .json()
        .init();

    tracing::info!(
        root = %config.firmware.root.display(),
        expose_reasons = config.firmware.expose_reasons,
        "Starting firmware rewrite server..."
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = Arc::new(AppState { config });

    // Build router
    let app = Router::new()
        .merge(api::router(state))
        .layer(TraceLayer::new_for_http());

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install CTRL+C handler: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
