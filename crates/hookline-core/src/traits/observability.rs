// SPDX-FileCopyrightText: 2026 Hookline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Observability adapter trait for metrics.

use async_trait::async_trait;

use crate::error::HooklineError;
use crate::traits::adapter::PluginAdapter;
use crate::types::MetricEvent;

/// Adapter for recording metric events.
///
/// Implementations must be safe to call from many requests at once without
/// losing increments.
#[async_trait]
pub trait ObservabilityAdapter: PluginAdapter {
    /// Records a metric event.
    async fn record(&self, event: MetricEvent) -> Result<(), HooklineError>;
}
