// SPDX-FileCopyrightText: 2026 Hookline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers.
//!
//! Handles POST /webhook, GET /messages, GET /stats, the health probes and
//! GET /metrics.

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use hookline_core::types::{HealthStatus, Message, MessageStats, SenderCount};
use hookline_ingest::IngestError;
use serde::{Deserialize, Serialize};

use crate::server::GatewayState;

/// Prometheus text exposition content type.
pub const METRICS_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

const DEFAULT_LIMIT: i64 = 50;

/// Body for successful or informational responses.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

/// Body for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
    /// Individual validation failures, only for 422.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

fn error_response(status: StatusCode, detail: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            detail: detail.to_string(),
            errors: None,
        }),
    )
        .into_response()
}

/// Query string for GET /messages.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

/// One entry of GET /messages. `received_at` is not exposed.
#[derive(Debug, Serialize)]
pub struct MessageView {
    pub message_id: String,
    pub from: String,
    pub to: String,
    pub ts: String,
    pub text: Option<String>,
}

impl From<Message> for MessageView {
    fn from(m: Message) -> Self {
        Self {
            message_id: m.message_id,
            from: m.from,
            to: m.to,
            ts: m.ts,
            text: m.text,
        }
    }
}

/// Response body for GET /messages.
#[derive(Debug, Serialize)]
pub struct MessagesResponse {
    pub data: Vec<MessageView>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Response body for GET /stats.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_messages: i64,
    pub senders_count: usize,
    pub messages_per_sender: Vec<SenderCount>,
    pub first_message_ts: Option<String>,
    pub last_message_ts: Option<String>,
}

impl From<MessageStats> for StatsResponse {
    fn from(s: MessageStats) -> Self {
        Self {
            total_messages: s.total,
            senders_count: s.senders_count,
            messages_per_sender: s.top_senders,
            first_message_ts: s.first_ts,
            last_message_ts: s.last_ts,
        }
    }
}

/// POST /webhook
///
/// The body is taken as raw bytes so the signature is checked over exactly
/// what was sent.
pub async fn post_webhook(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let signature = headers
        .get(&state.signature_header)
        .and_then(|v| v.to_str().ok());

    match state.pipeline.ingest(&body, signature).await {
        Ok(accepted) => {
            tracing::info!(
                message_id = %accepted.message_id,
                dup = accepted.is_duplicate(),
                result = %accepted.outcome,
                "webhook accepted"
            );
            (StatusCode::OK, Json(StatusResponse { status: "ok" })).into_response()
        }
        Err(IngestError::InvalidSignature) => {
            tracing::info!(result = "invalid_signature", "webhook rejected");
            error_response(StatusCode::UNAUTHORIZED, "invalid signature")
        }
        Err(IngestError::Malformed(errors)) => {
            tracing::info!(result = "validation_error", "webhook rejected");
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorResponse {
                    detail: "invalid payload".to_string(),
                    errors: Some(errors),
                }),
            )
                .into_response()
        }
        Err(IngestError::Storage(_)) => {
            tracing::info!(result = "storage_error", "webhook failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "storage unavailable")
        }
    }
}

/// GET /messages?limit=&offset=
pub async fn get_messages(
    State(state): State<GatewayState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Response {
    let Query(params) = match params {
        Ok(params) => params,
        Err(rejection) => {
            return error_response(StatusCode::BAD_REQUEST, &rejection.body_text());
        }
    };
    if params.limit < 0 || params.offset < 0 {
        return error_response(
            StatusCode::BAD_REQUEST,
            "limit and offset must be non-negative",
        );
    }

    match state.store.list_messages(params.limit, params.offset).await {
        Ok(page) => Json(MessagesResponse {
            data: page.data.into_iter().map(MessageView::from).collect(),
            total: page.total,
            limit: params.limit,
            offset: params.offset,
        })
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to list messages");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "storage unavailable")
        }
    }
}

/// GET /stats
pub async fn get_stats(State(state): State<GatewayState>) -> Response {
    match state.store.message_stats().await {
        Ok(stats) => Json(StatsResponse::from(stats)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to compute stats");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "storage unavailable")
        }
    }
}

/// GET /health/live
pub async fn get_live() -> Json<StatusResponse> {
    Json(StatusResponse { status: "alive" })
}

/// GET /health/ready
///
/// Ready only while the store answers a trivial query.
pub async fn get_ready(State(state): State<GatewayState>) -> Response {
    match state.store.health_check().await {
        Ok(HealthStatus::Healthy) | Ok(HealthStatus::Degraded(_)) => {
            Json(StatusResponse { status: "ready" }).into_response()
        }
        Ok(HealthStatus::Unhealthy(reason)) => {
            tracing::warn!(%reason, "readiness check failed");
            error_response(StatusCode::SERVICE_UNAVAILABLE, "not ready")
        }
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            error_response(StatusCode::SERVICE_UNAVAILABLE, "not ready")
        }
    }
}

/// GET /metrics
pub async fn get_metrics(State(state): State<GatewayState>) -> Response {
    (
        [(header::CONTENT_TYPE, METRICS_CONTENT_TYPE)],
        (state.prometheus_render)(),
    )
        .into_response()
}
