// SPDX-FileCopyrightText: 2026 Hookline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `hookline serve`: wire storage, metrics, the ingestion pipeline and the
//! HTTP gateway, then serve until a shutdown signal arrives.

use std::sync::Arc;

use axum::http::HeaderName;
use hookline_config::model::{LogFormat, LoggingConfig};
use hookline_config::HooklineConfig;
use hookline_core::{HooklineError, StorageAdapter};
use hookline_gateway::{start_server, GatewayState, ServerConfig};
use hookline_ingest::IngestPipeline;
use hookline_prometheus::PrometheusAdapter;
use hookline_storage::SqliteStorage;
use tracing::{info, warn};

use crate::shutdown::install_signal_handler;

/// Run the service until SIGINT/SIGTERM, then close the store.
pub async fn run_serve(config: HooklineConfig) -> Result<(), HooklineError> {
    init_tracing(&config.logging);

    let secret = config
        .webhook
        .secret
        .clone()
        .ok_or_else(|| HooklineError::Config("webhook.secret is not set".to_string()))?;
    let signature_header = HeaderName::from_bytes(config.webhook.signature_header.as_bytes())
        .map_err(|e| HooklineError::Config(format!("invalid webhook.signature_header: {e}")))?;

    let storage = Arc::new(SqliteStorage::new(config.storage.clone()));
    storage.initialize().await?;
    info!(
        database = %config.storage.database_path().unwrap_or_default(),
        "message store ready"
    );

    let metrics = Arc::new(PrometheusAdapter::new());
    let pipeline = Arc::new(IngestPipeline::new(
        secret,
        storage.clone(),
        metrics.clone(),
    ));

    let render_handle = metrics.clone();
    let state = GatewayState {
        pipeline,
        store: storage.clone(),
        metrics,
        prometheus_render: Arc::new(move || render_handle.render()),
        signature_header,
    };
    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        body_limit_bytes: config.server.body_limit_bytes,
    };

    let shutdown = install_signal_handler();
    let result = start_server(&server_config, state, shutdown).await;

    if let Err(e) = storage.close().await {
        warn!(error = %e, "failed to close message store cleanly");
    } else {
        info!("message store closed");
    }

    result
}

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(logging: &LoggingConfig) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "hookline={},tower_http=warn,warn",
            logging.level
        ))
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false);

    match logging.format {
        LogFormat::Json => builder.json().flatten_event(true).init(),
        LogFormat::Pretty => builder.pretty().init(),
    }
}
