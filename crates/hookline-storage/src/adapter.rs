// SPDX-FileCopyrightText: 2026 Hookline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the StorageAdapter trait.

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use hookline_config::model::StorageConfig;
use hookline_core::types::{InsertOutcome, Message, MessagePage, MessageStats, NewMessage};
use hookline_core::{AdapterType, HealthStatus, HooklineError, PluginAdapter, StorageAdapter};

use crate::database::Database;
use crate::queries;

/// SQLite-backed message store.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is opened by
/// [`StorageAdapter::initialize`] and released by [`StorageAdapter::close`];
/// a closed store can be initialized again.
pub struct SqliteStorage {
    config: StorageConfig,
    db: RwLock<Option<Database>>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage with the given configuration.
    ///
    /// The database connection is not opened until [`initialize`] is called.
    ///
    /// [`initialize`]: StorageAdapter::initialize
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: RwLock::new(None),
        }
    }

    /// Returns a handle to the open Database, or an error if it is not open.
    async fn db(&self) -> Result<Database, HooklineError> {
        self.db.read().await.clone().ok_or_else(|| HooklineError::Storage {
            source: "storage is not open -- call initialize() first".into(),
        })
    }

    async fn checkpoint(db: &Database) -> Result<(), HooklineError> {
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, HooklineError> {
        let db = self.db().await?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(|e| HooklineError::HealthCheckFailed {
                name: "sqlite".to_string(),
                source: Box::new(e),
            })?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), HooklineError> {
        if let Some(db) = self.db.read().await.clone() {
            Self::checkpoint(&db).await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), HooklineError> {
        let path = self.config.database_path().ok_or_else(|| {
            HooklineError::Config("storage.database_url is not set".to_string())
        })?;
        let mut slot = self.db.write().await;
        if slot.is_some() {
            return Err(HooklineError::Storage {
                source: "storage already initialized".into(),
            });
        }
        *slot = Some(Database::open_with(&path, self.config.wal_mode).await?);
        debug!(path = %path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), HooklineError> {
        let Some(db) = self.db.write().await.take() else {
            return Ok(());
        };
        db.close().await?;
        debug!("SQLite storage closed");
        Ok(())
    }

    async fn insert_message(&self, message: &NewMessage) -> Result<InsertOutcome, HooklineError> {
        queries::messages::insert_message(&self.db().await?, message).await
    }

    async fn get_message(&self, message_id: &str) -> Result<Option<Message>, HooklineError> {
        queries::messages::get_message(&self.db().await?, message_id).await
    }

    async fn list_messages(&self, limit: i64, offset: i64) -> Result<MessagePage, HooklineError> {
        queries::messages::list_messages(&self.db().await?, limit, offset).await
    }

    async fn message_stats(&self) -> Result<MessageStats, HooklineError> {
        queries::messages::message_stats(&self.db().await?).await
    }
}
