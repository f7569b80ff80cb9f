// SPDX-FileCopyrightText: 2026 Hookline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for the message store.

use async_trait::async_trait;

use crate::error::HooklineError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{InsertOutcome, Message, MessagePage, MessageStats, NewMessage};

/// Adapter for the durable, uniquely-keyed message store.
///
/// The store is the sole writer of messages. Uniqueness of `message_id` is
/// enforced by the backend itself, so `insert_message` is safe to call
/// concurrently with the same id.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Opens the backend and applies pending migrations.
    async fn initialize(&self) -> Result<(), HooklineError>;

    /// Closes the backend, flushing pending writes.
    async fn close(&self) -> Result<(), HooklineError>;

    /// Idempotently inserts a message, stamping `received_at`.
    ///
    /// Returns [`InsertOutcome::Duplicate`] without touching the stored row
    /// when the id already exists. The write is committed before returning.
    async fn insert_message(&self, message: &NewMessage) -> Result<InsertOutcome, HooklineError>;

    /// Looks up a single message by id.
    async fn get_message(&self, message_id: &str) -> Result<Option<Message>, HooklineError>;

    /// Lists messages ordered by `(ts, message_id)` ascending.
    async fn list_messages(&self, limit: i64, offset: i64) -> Result<MessagePage, HooklineError>;

    /// Computes aggregate statistics over all messages.
    async fn message_stats(&self) -> Result<MessageStats, HooklineError>;
}
