// SPDX-FileCopyrightText: 2026 Hookline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ingestion failure kinds.

use hookline_core::HooklineError;
use thiserror::Error;

/// Why a webhook request was not accepted.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The presented signature did not match the body, or none was given.
    #[error("invalid signature")]
    InvalidSignature,

    /// The body was not valid JSON or violated a field rule.
    #[error("malformed payload: {}", .0.join("; "))]
    Malformed(Vec<String>),

    /// The store could not be used.
    #[error(transparent)]
    Storage(#[from] HooklineError),
}
