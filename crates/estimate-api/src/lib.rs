//! # Estimate API
//!
//! HTTP interface over the estimate domain: order validation, calculators, the menu catalog, the
//! language-model experts and saved estimates. Built on axum; every error is a JSON `{error, detail, timestamp}` body.

pub mod cleanup;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use anyhow::Context;
use axum::middleware::map_response_with_state;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub use cleanup::{run_cleanup, spawn_periodic_cleanup, CleanupReport, CLEANUP_INTERVAL};
pub use config::ServerConfig;
pub use error::{ApiError, ErrorBody};
pub use state::AppState;

pub fn create_app(state: AppState) -> Router {
    let debug = state.config.debug;
    Router::new()
        .merge(routes::root::router())
        .nest("/api", routes::api_router())
        .with_state(state)
        .layer(map_response_with_state(debug, error::hide_internal_details))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Serves until Ctrl+C.
pub async fn serve(state: AppState) -> anyhow::Result<()> {
    let address = state.config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!(address = %address, environment = %state.config.environment, "API server listening");

    axum::serve(listener, create_app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("API server failed")?;

    info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
