// SPDX-FileCopyrightText: 2026 Hookline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for storage entities.
//!
//! The canonical types live in `hookline-core::types` so they can cross the
//! adapter trait boundary; this module re-exports them for the storage crate.

pub use hookline_core::types::{
    InsertOutcome, Message, MessagePage, MessageStats, NewMessage, SenderCount,
};
