//! Server initialization and routing
//!
//! This module handles the Axum server setup including:
//! - Router configuration for collections and `/env`
//! - Middleware stack (request id, logging, timeout, body limit)
//! - Graceful shutdown handling

use crate::config::ServerConfig;
use crate::middleware::{log_requests, request_id};
use crate::routes::{collections, env, not_found};
use crate::state::ServerState;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::routing::{any, get};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Build the Axum router with all routes and middleware
///
/// Middleware stack (outermost first):
/// 1. Tracing
/// 2. Request ID tracking
/// 3. Request logging
/// 4. Timeout handling
/// 5. Body size limit
pub fn build_router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/", get(collections::list_collections))
        .route("/env", any(env::env))
        .route(
            "/{collection}",
            get(collections::list_documents).post(collections::create_document),
        )
        .route("/{collection}/{uid}", get(collections::get_document))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(state.config.max_body_size()))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            state.config.timeout(),
        ))
        .layer(from_fn(log_requests))
        .layer(from_fn(request_id))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the docgate HTTP server
///
/// Installs JSON logging, connects the configured store, runs the startup
/// reset and serves until SIGTERM or Ctrl+C. The store is shut down once the
/// last request has drained.
///
/// # Example
///
/// ```rust,no_run
/// use server::ServerConfig;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let config = ServerConfig::load()?;
///     server::start_server(config).await?;
///     Ok(())
/// }
/// ```
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(&config.log_level)
        .with_target(false)
        .with_thread_ids(true)
        .with_thread_names(true)
        .json()
        .init();

    let addr: SocketAddr = config.socket_addr()?;

    tracing::info!(
        backend = config.store.backend.as_str(),
        reserved_marker = %config.reserved_marker,
        "Opening document store"
    );

    let state = Arc::new(ServerState::open(config.clone()).await?);
    let app = build_router(state.clone());

    tracing::info!("Starting docgate server on {}", addr);
    tracing::info!(
        "Timeout: {}s, Max body: {}MB",
        config.timeout_secs,
        config.max_body_size_mb
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    match Arc::try_unwrap(state).ok().and_then(|state| Arc::try_unwrap(state.gateway).ok()) {
        Some(gateway) => gateway.shutdown().await?,
        None => tracing::warn!("Gateway still shared at shutdown, skipping store shutdown"),
    }

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Shutdown signal handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
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
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}
