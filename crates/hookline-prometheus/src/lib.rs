// SPDX-FileCopyrightText: 2026 Hookline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prometheus metrics adapter for the Hookline ingestion service.
//!
//! Uses the metrics-rs facade with the Prometheus exporter. Metrics are
//! rendered as Prometheus text format via [`PrometheusAdapter::render`],
//! which is exposed through the gateway's /metrics endpoint.

mod recording;

use async_trait::async_trait;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle, PrometheusRecorder};

use hookline_core::traits::adapter::PluginAdapter;
use hookline_core::traits::observability::ObservabilityAdapter;
use hookline_core::types::{AdapterType, HealthStatus, MetricEvent};
use hookline_core::HooklineError;

/// Prometheus metrics adapter.
///
/// Owns its recorder instead of installing it globally, so every adapter
/// instance keeps an independent set of counters. All increments are routed
/// to that recorder with [`metrics::with_local_recorder`].
pub struct PrometheusAdapter {
    recorder: PrometheusRecorder,
    handle: PrometheusHandle,
}

impl PrometheusAdapter {
    /// Create a new PrometheusAdapter with metric descriptions registered.
    pub fn new() -> Self {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        metrics::with_local_recorder(&recorder, recording::register_metrics);

        tracing::info!("prometheus metrics recorder created");

        Self { recorder, handle }
    }

    /// Render all collected metrics in Prometheus text format.
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

impl Default for PrometheusAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for PrometheusAdapter {
    fn name(&self) -> &str {
        "prometheus"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Observability
    }

    async fn health_check(&self) -> Result<HealthStatus, HooklineError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), HooklineError> {
        Ok(())
    }
}

#[async_trait]
impl ObservabilityAdapter for PrometheusAdapter {
    async fn record(&self, event: MetricEvent) -> Result<(), HooklineError> {
        match event {
            MetricEvent::Counter {
                name,
                value,
                labels,
            } => {
                let label_pairs: Vec<metrics::Label> = labels
                    .into_iter()
                    .map(|(k, v)| metrics::Label::new(k, v))
                    .collect();
                metrics::with_local_recorder(&self.recorder, || {
                    metrics::counter!(name, label_pairs).increment(value);
                });
            }
        }
        Ok(())
    }
}
