// SPDX-FileCopyrightText: 2026 Hookline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook ingestion pipeline for the Hookline service.
//!
//! A request moves through signature verification, payload validation and
//! the idempotent store insert. Every terminal outcome is counted exactly
//! once through the observability adapter.

pub mod error;
pub mod payload;
pub mod pipeline;

pub use error::IngestError;
pub use payload::{parse_payload, WebhookPayload, MAX_TEXT_CHARS};
pub use pipeline::{Accepted, IngestPipeline};
