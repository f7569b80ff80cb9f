// SPDX-FileCopyrightText: 2026 Hookline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric descriptions.
//!
//! Registered into whichever recorder is current; the adapter scopes the call
//! to its own recorder.

use hookline_core::types::{HTTP_REQUESTS_TOTAL, WEBHOOK_REQUESTS_TOTAL};
use metrics::describe_counter;

/// Register all Hookline metric descriptions.
pub(crate) fn register_metrics() {
    describe_counter!(HTTP_REQUESTS_TOTAL, "Total HTTP requests by path and status");
    describe_counter!(
        WEBHOOK_REQUESTS_TOTAL,
        "Total webhook requests by processing result"
    );
}
