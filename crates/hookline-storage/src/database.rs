// SPDX-FileCopyrightText: 2026 Hookline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management.
//!
//! All access goes through one `tokio_rusqlite::Connection`, which owns a
//! background thread and serializes every call. Separate processes sharing
//! the file rely on SQLite locking plus the busy timeout set here.

use std::path::Path;
use std::time::Duration;

use hookline_core::HooklineError;

use crate::migrations::run_migrations;

/// How long a writer waits on a locked database before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Convert a `tokio_rusqlite` call error into a storage error.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> HooklineError {
    HooklineError::Storage {
        source: Box::new(e),
    }
}

/// Handle to the message database.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (or create) the database at `path` in WAL mode and run migrations.
    pub async fn open(path: &str) -> Result<Self, HooklineError> {
        Self::open_with(path, true).await
    }

    /// Open the database, choosing whether to switch the journal to WAL.
    ///
    /// Parent directories are created when missing. Schema setup runs on a
    /// blocking thread before the async connection is handed out, so the
    /// table and indexes always exist once this returns.
    pub async fn open_with(path: &str, wal_mode: bool) -> Result<Self, HooklineError> {
        let owned = path.to_string();
        tokio::task::spawn_blocking(move || prepare_schema(&owned, wal_mode))
            .await
            .map_err(|e| HooklineError::Internal(format!("schema setup task failed: {e}")))??;

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| HooklineError::Storage {
                source: Box::new(e),
            })?;

        conn.call(|conn| {
            conn.busy_timeout(BUSY_TIMEOUT)?;
            conn.execute_batch("PRAGMA synchronous = FULL; PRAGMA foreign_keys = ON;")?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        tracing::debug!(path, wal_mode, "database opened");
        Ok(Self { conn })
    }

    /// The underlying async connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoint the WAL into the main file and close the connection.
    pub async fn close(self) -> Result<(), HooklineError> {
        self.conn
            .call(|conn| {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        self.conn.close().await.map_err(|e| HooklineError::Storage {
            source: Box::new(e),
        })
    }
}

/// Create parent directories, set the journal mode and apply migrations.
fn prepare_schema(path: &str, wal_mode: bool) -> Result<(), HooklineError> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| HooklineError::Storage {
                source: Box::new(e),
            })?;
        }
    }

    let storage_err = |e: rusqlite::Error| HooklineError::Storage {
        source: Box::new(e),
    };
    let mut conn = rusqlite::Connection::open(path).map_err(storage_err)?;
    conn.busy_timeout(BUSY_TIMEOUT).map_err(storage_err)?;
    if wal_mode {
        // Journal mode is persistent in the file; later connections inherit it.
        conn.execute_batch("PRAGMA journal_mode = WAL;")
            .map_err(storage_err)?;
    }
    run_migrations(&mut conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn open_creates_file_and_schema() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/dir/app.db");
        let db = Database::open(path.to_str().unwrap()).await.unwrap();
        assert!(path.exists());

        let count: i64 = db
            .connection()
            .call(|conn| {
                Ok(conn.query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND name = 'idx_messages_ts_id'",
                    [],
                    |row| row.get(0),
                )?)
            })
            .await
            .map_err(map_tr_err)
            .unwrap();
        assert_eq!(count, 1);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn open_enables_wal_and_full_sync() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wal.db");
        let db = Database::open(path.to_str().unwrap()).await.unwrap();

        let (mode, sync): (String, i64) = db
            .connection()
            .call(|conn| {
                let mode = conn.query_row("PRAGMA journal_mode", [], |row| row.get(0))?;
                let sync = conn.query_row("PRAGMA synchronous", [], |row| row.get(0))?;
                Ok((mode, sync))
            })
            .await
            .map_err(map_tr_err)
            .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");
        // FULL = 2
        assert_eq!(sync, 2);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn reopen_keeps_existing_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reopen.db");
        let path_str = path.to_str().unwrap();

        let db = Database::open(path_str).await.unwrap();
        db.connection()
            .call(|conn| {
                conn.execute(
                    "INSERT INTO messages (message_id, from_msisdn, to_msisdn, ts, text, received_at) \
                     VALUES ('m1', '+1', '+2', '2025-01-15T10:00:00Z', NULL, '2025-01-15T10:00:01.000000Z')",
                    [],
                )?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
            .unwrap();
        db.close().await.unwrap();

        let db = Database::open(path_str).await.unwrap();
        let count: i64 = db
            .connection()
            .call(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM messages", [], |row| row.get(0))?))
            .await
            .map_err(map_tr_err)
            .unwrap();
        assert_eq!(count, 1);
        db.close().await.unwrap();
    }
}
