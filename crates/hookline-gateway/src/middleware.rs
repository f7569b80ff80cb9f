// SPDX-FileCopyrightText: 2026 Hookline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-request logging and HTTP metrics.

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request, State},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use hookline_core::types::MetricEvent;
use tracing::Instrument;

use crate::server::GatewayState;

/// Response header echoing the generated request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Metric path label for requests that matched no route.
pub const UNMATCHED_PATH_LABEL: &str = "unmatched";

/// Log one line per request and count it in `http_requests_total`.
///
/// A fresh UUID v4 request id is attached to a span around the handler, so
/// events emitted while handling the request carry it too, and returned in
/// the `x-request-id` header.
///
/// The metric is labelled with the route template, never the raw URI, so
/// the series count stays bounded by the route table.
pub async fn request_log(
    State(state): State<GatewayState>,
    request: Request,
    next: Next,
) -> Response {
    let started = Instant::now();
    let request_id = uuid::Uuid::new_v4().to_string();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_PATH_LABEL.to_string());

    let span = tracing::info_span!("request", request_id = %request_id);
    let mut response = next.run(request).instrument(span).await;

    let status = response.status().as_u16();
    let latency_ms = started.elapsed().as_secs_f64() * 1000.0;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    if let Err(e) = state
        .metrics
        .record(MetricEvent::http_request(&route, status))
        .await
    {
        tracing::warn!(error = %e, "failed to record http metric");
    }

    tracing::info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        status,
        latency_ms,
        "request completed"
    );

    response
}
