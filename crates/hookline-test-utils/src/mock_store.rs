// SPDX-FileCopyrightText: 2026 Hookline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock message store for deterministic testing.
//!
//! `MockStore` keeps messages in memory with the same ordering and
//! duplicate semantics as the SQLite store, and can be switched into an
//! outage where every call fails with a storage error.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use hookline_core::traits::adapter::PluginAdapter;
use hookline_core::traits::storage::StorageAdapter;
use hookline_core::types::{
    AdapterType, HealthStatus, InsertOutcome, Message, MessagePage, MessageStats, NewMessage,
    SenderCount,
};
use hookline_core::HooklineError;

/// An in-memory message store for testing.
pub struct MockStore {
    messages: Mutex<BTreeMap<String, Message>>,
    down: AtomicBool,
}

impl MockStore {
    /// Create an empty, healthy store.
    pub fn new() -> Self {
        Self {
            messages: Mutex::new(BTreeMap::new()),
            down: AtomicBool::new(false),
        }
    }

    /// Make every subsequent call fail (`true`) or succeed again (`false`).
    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    /// Number of stored messages.
    pub async fn len(&self) -> usize {
        self.messages.lock().await.len()
    }

    /// True if nothing has been stored.
    pub async fn is_empty(&self) -> bool {
        self.messages.lock().await.is_empty()
    }

    fn check(&self) -> Result<(), HooklineError> {
        if self.down.load(Ordering::SeqCst) {
            return Err(HooklineError::Storage {
                source: "mock store is down".into(),
            });
        }
        Ok(())
    }

    fn sorted(messages: &BTreeMap<String, Message>) -> Vec<Message> {
        let mut all: Vec<Message> = messages.values().cloned().collect();
        all.sort_by(|a, b| (&a.ts, &a.message_id).cmp(&(&b.ts, &b.message_id)));
        all
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockStore {
    fn name(&self) -> &str {
        "mock-store"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, HooklineError> {
        if self.down.load(Ordering::SeqCst) {
            return Ok(HealthStatus::Unhealthy("mock store is down".to_string()));
        }
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), HooklineError> {
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for MockStore {
    async fn initialize(&self) -> Result<(), HooklineError> {
        self.check()
    }

    async fn close(&self) -> Result<(), HooklineError> {
        Ok(())
    }

    async fn insert_message(&self, message: &NewMessage) -> Result<InsertOutcome, HooklineError> {
        self.check()?;
        let mut messages = self.messages.lock().await;
        if messages.contains_key(&message.message_id) {
            return Ok(InsertOutcome::Duplicate);
        }
        messages.insert(
            message.message_id.clone(),
            Message {
                message_id: message.message_id.clone(),
                from: message.from.clone(),
                to: message.to.clone(),
                ts: message.ts.clone(),
                text: message.text.clone(),
                received_at: chrono::Utc::now()
                    .format("%Y-%m-%dT%H:%M:%S%.6fZ")
                    .to_string(),
            },
        );
        Ok(InsertOutcome::Created)
    }

    async fn get_message(&self, message_id: &str) -> Result<Option<Message>, HooklineError> {
        self.check()?;
        Ok(self.messages.lock().await.get(message_id).cloned())
    }

    async fn list_messages(&self, limit: i64, offset: i64) -> Result<MessagePage, HooklineError> {
        self.check()?;
        let messages = self.messages.lock().await;
        let data = Self::sorted(&messages)
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect();
        Ok(MessagePage {
            data,
            total: messages.len() as i64,
        })
    }

    async fn message_stats(&self) -> Result<MessageStats, HooklineError> {
        self.check()?;
        let messages = self.messages.lock().await;
        let mut counts: BTreeMap<&str, i64> = BTreeMap::new();
        for m in messages.values() {
            *counts.entry(m.from.as_str()).or_default() += 1;
        }
        let mut top: Vec<SenderCount> = counts
            .into_iter()
            .map(|(from, count)| SenderCount {
                from: from.to_string(),
                count,
            })
            .collect();
        // BTreeMap iteration is already sorted by sender, so a stable sort keeps ties lexical.
        top.sort_by(|a, b| b.count.cmp(&a.count));
        top.truncate(10);
        Ok(MessageStats {
            total: messages.len() as i64,
            senders_count: top.len(),
            top_senders: top,
            first_ts: messages.values().map(|m| m.ts.clone()).min(),
            last_ts: messages.values().map(|m| m.ts.clone()).max(),
        })
    }
}
