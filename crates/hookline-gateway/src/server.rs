// SPDX-FileCopyrightText: 2026 Hookline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderName,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use hookline_core::{HooklineError, ObservabilityAdapter, StorageAdapter};
use hookline_ingest::IngestPipeline;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::request_log;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Verify/validate/store pipeline for `POST /webhook`.
    pub pipeline: Arc<IngestPipeline>,
    /// Read side: listing, statistics and readiness.
    pub store: Arc<dyn StorageAdapter>,
    /// Counter sink for per-request metrics.
    pub metrics: Arc<dyn ObservabilityAdapter>,
    /// Renders the Prometheus text exposition for `GET /metrics`.
    pub prometheus_render: Arc<dyn Fn() -> String + Send + Sync>,
    /// Header carrying the webhook signature.
    pub signature_header: HeaderName,
}

/// Listener configuration (mirrors `[server]` from hookline-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Largest accepted request body, in bytes.
    pub body_limit_bytes: usize,
}

/// Build the application router with all routes and middleware.
///
/// Routes:
/// - POST /webhook
/// - GET /messages
/// - GET /stats
/// - GET /health/live
/// - GET /health/ready
/// - GET /metrics
pub fn build_router(state: GatewayState, body_limit_bytes: usize) -> Router {
    Router::new()
        .route("/webhook", post(handlers::post_webhook))
        .route("/messages", get(handlers::get_messages))
        .route("/stats", get(handlers::get_stats))
        .route("/health/live", get(handlers::get_live))
        .route("/health/ready", get(handlers::get_ready))
        .route("/metrics", get(handlers::get_metrics))
        .layer(DefaultBodyLimit::max(body_limit_bytes))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            request_log,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `host:port` and serve until `shutdown` is cancelled.
///
/// In-flight requests are allowed to finish before this returns.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: CancellationToken,
) -> Result<(), HooklineError> {
    let app = build_router(state, config.body_limit_bytes);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| HooklineError::Server {
            message: format!("failed to bind to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| HooklineError::Server {
            message: format!("server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("server stopped");
    Ok(())
}
