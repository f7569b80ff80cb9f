// SPDX-FileCopyrightText: 2026 Hookline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles the same router `hookline serve` runs, backed by a
//! temp SQLite database and a private metrics recorder. Requests are driven
//! through `tower::ServiceExt::oneshot`, so no socket is bound.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{HeaderMap, HeaderName, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use hookline_config::model::StorageConfig;
use hookline_core::{HooklineError, StorageAdapter};
use hookline_gateway::{build_router, GatewayState};
use hookline_ingest::IngestPipeline;
use hookline_prometheus::PrometheusAdapter;
use hookline_security::{sign, WebhookSecret};
use hookline_storage::SqliteStorage;

/// Secret used when none is configured on the builder.
pub const DEFAULT_TEST_SECRET: &str = "testsecret";

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    secret: String,
    body_limit_bytes: usize,
    store: Option<Arc<dyn StorageAdapter>>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            secret: DEFAULT_TEST_SECRET.to_string(),
            body_limit_bytes: 1024 * 1024,
            store: None,
        }
    }

    /// Use a different webhook secret.
    pub fn with_secret(mut self, secret: &str) -> Self {
        self.secret = secret.to_string();
        self
    }

    /// Cap request bodies at `bytes`.
    pub fn with_body_limit(mut self, bytes: usize) -> Self {
        self.body_limit_bytes = bytes;
        self
    }

    /// Replace the temp SQLite store, e.g. with a [`MockStore`](crate::MockStore).
    ///
    /// The store must already be initialized.
    pub fn with_store(mut self, store: Arc<dyn StorageAdapter>) -> Self {
        self.store = Some(store);
        self
    }

    /// Build the test harness, creating all required subsystems.
    pub async fn build(self) -> Result<TestHarness, HooklineError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| HooklineError::Storage { source: e.into() })?;

        let storage: Arc<dyn StorageAdapter> = match self.store {
            Some(store) => store,
            None => {
                let db_path = temp_dir.path().join("test.db");
                let storage = SqliteStorage::new(StorageConfig {
                    database_url: Some(db_path.to_string_lossy().to_string()),
                    wal_mode: true,
                });
                storage.initialize().await?;
                Arc::new(storage)
            }
        };

        let metrics = Arc::new(PrometheusAdapter::new());
        let pipeline = Arc::new(IngestPipeline::new(
            WebhookSecret::new(self.secret.clone()),
            storage.clone(),
            metrics.clone(),
        ));
        let render_handle = metrics.clone();
        let state = GatewayState {
            pipeline,
            store: storage.clone(),
            metrics: metrics.clone(),
            prometheus_render: Arc::new(move || render_handle.render()),
            signature_header: HeaderName::from_static("x-signature"),
        };
        let router = build_router(state, self.body_limit_bytes);

        Ok(TestHarness {
            router,
            storage,
            metrics,
            secret: self.secret,
            _temp_dir: temp_dir,
        })
    }
}

/// A buffered HTTP response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// Parse the body as JSON.
    ///
    /// # Panics
    ///
    /// Panics if the body is not valid JSON.
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body)
            .unwrap_or_else(|e| panic!("response body is not JSON ({e}): {}", self.body))
    }
}

/// A complete test environment: router, storage and metrics.
pub struct TestHarness {
    router: Router,
    /// Store behind the router (temp SQLite unless replaced).
    pub storage: Arc<dyn StorageAdapter>,
    /// Metrics recorder private to this harness.
    pub metrics: Arc<PrometheusAdapter>,
    secret: String,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Sign `body` with the harness secret.
    pub fn sign_body(&self, body: &str) -> String {
        sign(self.secret.as_bytes(), body.as_bytes())
    }

    /// Send an arbitrary request through the router.
    ///
    /// # Panics
    ///
    /// Panics if the router fails or the body cannot be read.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read response body");
        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).to_string(),
        }
    }

    /// POST `body` to /webhook with the given signature header, if any.
    pub async fn post_webhook(&self, body: &str, signature: Option<&str>) -> TestResponse {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/webhook")
            .header("content-type", "application/json");
        if let Some(sig) = signature {
            builder = builder.header("x-signature", sig);
        }
        let request = builder
            .body(Body::from(body.to_string()))
            .expect("valid request");
        self.send(request).await
    }

    /// POST `body` to /webhook signed with the harness secret.
    pub async fn post_signed(&self, body: &str) -> TestResponse {
        let sig = self.sign_body(body);
        self.post_webhook(body, Some(&sig)).await
    }

    /// GET `uri`.
    pub async fn get(&self, uri: &str) -> TestResponse {
        let request = Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("valid request");
        self.send(request).await
    }
}

/// Build a webhook JSON body.
pub fn webhook_body(message_id: &str, from: &str, ts: &str, text: Option<&str>) -> String {
    serde_json::json!({
        "message_id": message_id,
        "from": from,
        "to": "+14155550100",
        "ts": ts,
        "text": text,
    })
    .to_string()
}
