// SPDX-FileCopyrightText: 2026 Hookline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Hookline workspace.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Name of the per-route HTTP request counter.
pub const HTTP_REQUESTS_TOTAL: &str = "http_requests_total";

/// Name of the per-outcome webhook counter.
pub const WEBHOOK_REQUESTS_TOTAL: &str = "webhook_requests_total";

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Storage,
    Observability,
    Gateway,
}

/// A validated message that has not been persisted yet.
///
/// Produced by the ingestion pipeline after field validation. The store
/// assigns `received_at` when it writes the row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMessage {
    pub message_id: String,
    pub from: String,
    pub to: String,
    /// Caller-supplied event time, `Z`-suffixed.
    pub ts: String,
    pub text: Option<String>,
}

/// A persisted message row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message_id: String,
    pub from: String,
    pub to: String,
    pub ts: String,
    pub text: Option<String>,
    /// Server-assigned ingestion time (UTC, `Z`-suffixed).
    pub received_at: String,
}

/// Result of an idempotent insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum InsertOutcome {
    /// No row existed for the id; one was written.
    Created,
    /// A row already existed for the id; nothing was written.
    Duplicate,
}

/// Terminal outcome of one webhook request, as reported to metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum WebhookOutcome {
    Created,
    Duplicate,
    InvalidSignature,
    ValidationError,
    StorageError,
}

impl From<InsertOutcome> for WebhookOutcome {
    fn from(outcome: InsertOutcome) -> Self {
        match outcome {
            InsertOutcome::Created => Self::Created,
            InsertOutcome::Duplicate => Self::Duplicate,
        }
    }
}

/// One page of messages plus the row count of the whole table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagePage {
    pub data: Vec<Message>,
    pub total: i64,
}

/// Message count for a single sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderCount {
    pub from: String,
    pub count: i64,
}

/// Aggregate statistics over the message table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageStats {
    pub total: i64,
    /// Number of entries in `top_senders` (at most 10), not the number of
    /// distinct senders in the table.
    pub senders_count: usize,
    pub top_senders: Vec<SenderCount>,
    pub first_ts: Option<String>,
    pub last_ts: Option<String>,
}

/// A metric event recorded through an [`ObservabilityAdapter`](crate::ObservabilityAdapter).
#[derive(Debug, Clone, PartialEq)]
pub enum MetricEvent {
    /// Monotonic counter increment.
    Counter {
        name: String,
        value: u64,
        labels: Vec<(String, String)>,
    },
}

impl MetricEvent {
    /// One webhook request finished with `outcome`.
    pub fn webhook(outcome: WebhookOutcome) -> Self {
        Self::Counter {
            name: WEBHOOK_REQUESTS_TOTAL.to_string(),
            value: 1,
            labels: vec![("result".to_string(), outcome.as_ref().to_string())],
        }
    }

    /// One HTTP request to `path` finished with `status`.
    pub fn http_request(path: &str, status: u16) -> Self {
        Self::Counter {
            name: HTTP_REQUESTS_TOTAL.to_string(),
            value: 1,
            labels: vec![
                ("path".to_string(), path.to_string()),
                ("status".to_string(), status.to_string()),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn webhook_outcome_labels_are_snake_case() {
        assert_eq!(WebhookOutcome::Created.as_ref(), "created");
        assert_eq!(WebhookOutcome::Duplicate.as_ref(), "duplicate");
        assert_eq!(WebhookOutcome::InvalidSignature.as_ref(), "invalid_signature");
        assert_eq!(WebhookOutcome::ValidationError.as_ref(), "validation_error");
        assert_eq!(WebhookOutcome::StorageError.to_string(), "storage_error");
    }

    #[test]
    fn insert_outcome_maps_to_webhook_outcome() {
        assert_eq!(
            WebhookOutcome::from(InsertOutcome::Created),
            WebhookOutcome::Created
        );
        assert_eq!(
            WebhookOutcome::from(InsertOutcome::Duplicate),
            WebhookOutcome::Duplicate
        );
    }

    #[test]
    fn http_request_event_carries_path_and_status() {
        let event = MetricEvent::http_request("/webhook", 401);
        let MetricEvent::Counter { name, value, labels } = event;
        assert_eq!(name, HTTP_REQUESTS_TOTAL);
        assert_eq!(value, 1);
        assert_eq!(
            labels,
            vec![
                ("path".to_string(), "/webhook".to_string()),
                ("status".to_string(), "401".to_string()),
            ]
        );
    }

    #[test]
    fn message_text_is_nullable_in_json() {
        let json = r#"{"message_id":"m1","from":"+1","to":"+2","ts":"2024-01-01T00:00:00Z","text":null,"received_at":"2024-01-01T00:00:01.000000Z"}"#;
        let msg: Message = serde_json::from_str(json).unwrap();
        assert!(msg.text.is_none());
    }
}
