// SPDX-FileCopyrightText: 2026 Hookline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-request ingestion state machine.
//!
//! ```text
//! raw bytes -> signature check -> parse/validate -> store insert
//!                  |                    |                |
//!          InvalidSignature         Malformed      Created | Duplicate
//! ```

use std::sync::Arc;

use hookline_core::types::{InsertOutcome, MetricEvent, WebhookOutcome};
use hookline_core::{ObservabilityAdapter, StorageAdapter};
use hookline_security::{verify, WebhookSecret};
use tracing::{debug, error, warn};

use crate::error::IngestError;
use crate::payload::parse_payload;

/// A message the store accepted, either newly written or already present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accepted {
    pub message_id: String,
    pub outcome: InsertOutcome,
}

impl Accepted {
    /// True when the message had already been stored.
    pub fn is_duplicate(&self) -> bool {
        self.outcome == InsertOutcome::Duplicate
    }
}

/// Verifies, validates and stores webhook deliveries.
///
/// Cheap to share behind an `Arc`; holds no per-request state.
pub struct IngestPipeline {
    secret: WebhookSecret,
    store: Arc<dyn StorageAdapter>,
    metrics: Arc<dyn ObservabilityAdapter>,
}

impl IngestPipeline {
    pub fn new(
        secret: WebhookSecret,
        store: Arc<dyn StorageAdapter>,
        metrics: Arc<dyn ObservabilityAdapter>,
    ) -> Self {
        Self {
            secret,
            store,
            metrics,
        }
    }

    /// Process one delivery.
    ///
    /// `raw_body` must be the exact bytes received. A missing signature is
    /// checked as an empty one and therefore fails. The body is only parsed
    /// after the signature matches.
    pub async fn ingest(
        &self,
        raw_body: &[u8],
        signature: Option<&str>,
    ) -> Result<Accepted, IngestError> {
        let presented = signature.unwrap_or_default();
        if !verify(self.secret.as_bytes(), raw_body, presented) {
            warn!(
                signature_present = signature.is_some(),
                body_len = raw_body.len(),
                "webhook signature mismatch"
            );
            self.report(WebhookOutcome::InvalidSignature).await;
            return Err(IngestError::InvalidSignature);
        }

        let message = match parse_payload(raw_body) {
            Ok(message) => message,
            Err(errors) => {
                debug!(?errors, "webhook payload rejected");
                self.report(WebhookOutcome::ValidationError).await;
                return Err(IngestError::Malformed(errors));
            }
        };

        match self.store.insert_message(&message).await {
            Ok(outcome) => {
                self.report(outcome.into()).await;
                Ok(Accepted {
                    message_id: message.message_id,
                    outcome,
                })
            }
            Err(e) => {
                error!(message_id = %message.message_id, error = %e, "failed to store message");
                self.report(WebhookOutcome::StorageError).await;
                Err(IngestError::Storage(e))
            }
        }
    }

    async fn report(&self, outcome: WebhookOutcome) {
        if let Err(e) = self.metrics.record(MetricEvent::webhook(outcome)).await {
            warn!(error = %e, result = %outcome, "failed to record webhook metric");
        }
    }
}
