// SPDX-FileCopyrightText: 2026 Hookline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook authenticity checks for the Hookline ingestion service.
//!
//! Provides HMAC-SHA256 signing and constant-time verification over raw
//! request bodies, plus a redacting wrapper for the shared secret.

pub mod signature;

pub use signature::{sign, verify, WebhookSecret};
