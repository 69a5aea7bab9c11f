//! Data Model API Server
//!
//! This crate provides the HTTP server that stores trace models and objective
//! models. Every write goes through the validation engine in [`shared`]
//! before it reaches a store.
//!
//! # Architecture
//!
//! The API server is built on Axum and Tokio, providing:
//! - Batch create, get, list, update and delete for trace models
//! - The same surface for objective models
//! - A health endpoint for load balancers
//!
//! # Example
//!
//! ```no_run
//! use api::run_server;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     run_server().await
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod config;
mod routes;
mod state;

pub use config::Config;
pub use routes::{ErrorResponse, MAX_LIST_LIMIT};
pub use state::AppState;

use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Runs the data-model API server.
///
/// This function initializes the server with configuration from environment variables
/// and starts listening for incoming connections. It handles graceful shutdown on
/// SIGTERM/SIGINT signals.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration cannot be loaded from environment
/// - The server fails to bind to the configured address
/// - A fatal error occurs during operation
pub async fn run_server() -> Result<()> {
    let config = Config::from_env()?;
    run_server_with_config(config).await
}

/// Runs the data-model API server with the provided configuration.
///
/// # Errors
///
/// Returns an error if:
/// - The configured address is invalid or cannot be bound
/// - A fatal error occurs during operation
pub async fn run_server_with_config(config: Config) -> Result<()> {
    let addr = config.socket_addr()?;

    tracing::info!(
        host = %config.host,
        port = %config.port,
        body_limit_bytes = config.body_limit_bytes,
        "Data model API server starting"
    );

    let app = create_router_with_config(AppState::with_in_memory_store(), &config);
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(%addr, "Listening for connections");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Creates the main application router with default configuration.
///
/// This function is public to allow testing the router without starting a full server.
pub fn create_router(state: AppState) -> Router {
    create_router_with_config(state, &Config::default())
}

/// Creates the main application router with all routes and middleware.
pub fn create_router_with_config(state: AppState, config: &Config) -> Router {
    Router::new()
        .merge(routes::health_routes(state.clone()))
        .merge(routes::trace_model_routes(state.clone()))
        .merge(routes::objective_model_routes(state))
        .layer(RequestBodyLimitLayer::new(config.body_limit_bytes))
        .layer(TraceLayer::new_for_http())
}

/// Waits for a shutdown signal (SIGTERM or SIGINT).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
