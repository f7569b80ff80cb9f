// SPDX-FileCopyrightText: 2026 Hookline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message insert, lookup, listing and aggregate queries.

use chrono::Utc;
use hookline_core::HooklineError;
use rusqlite::OptionalExtension;

use crate::database::{map_tr_err, Database};
use crate::models::{InsertOutcome, Message, MessagePage, MessageStats, NewMessage, SenderCount};

/// Maximum number of senders returned by [`message_stats`].
pub const TOP_SENDERS_LIMIT: i64 = 10;

/// Layout of `received_at`: UTC, microsecond precision, `Z` suffix.
const RECEIVED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

const SELECT_COLUMNS: &str =
    "SELECT message_id, from_msisdn, to_msisdn, ts, text, received_at FROM messages";

fn row_to_message(row: &rusqlite::Row<'_>) -> rusqlite::Result<Message> {
    Ok(Message {
        message_id: row.get(0)?,
        from: row.get(1)?,
        to: row.get(2)?,
        ts: row.get(3)?,
        text: row.get(4)?,
        received_at: row.get(5)?,
    })
}

/// True for a primary-key or unique constraint violation.
fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, _) => {
            e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        }
        _ => false,
    }
}

/// Insert a message unless one with the same id already exists.
///
/// The primary key decides: a constraint violation is reported as
/// [`InsertOutcome::Duplicate`] and the stored row is left untouched. No
/// existence check runs first, so concurrent inserts of one id yield exactly
/// one `Created`.
pub async fn insert_message(
    db: &Database,
    msg: &NewMessage,
) -> Result<InsertOutcome, HooklineError> {
    let msg = msg.clone();
    let received_at = Utc::now().format(RECEIVED_AT_FORMAT).to_string();
    db.connection()
        .call(move |conn| {
            let result = conn.execute(
                "INSERT INTO messages (message_id, from_msisdn, to_msisdn, ts, text, received_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![msg.message_id, msg.from, msg.to, msg.ts, msg.text, received_at],
            );
            match result {
                Ok(_) => Ok(InsertOutcome::Created),
                Err(e) if is_unique_violation(&e) => Ok(InsertOutcome::Duplicate),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Fetch a single message by id.
pub async fn get_message(db: &Database, message_id: &str) -> Result<Option<Message>, HooklineError> {
    let id = message_id.to_string();
    db.connection()
        .call(move |conn| {
            let sql = format!("{SELECT_COLUMNS} WHERE message_id = ?1");
            let msg = conn
                .query_row(&sql, rusqlite::params![id], row_to_message)
                .optional()?;
            Ok(msg)
        })
        .await
        .map_err(map_tr_err)
}

/// List messages ordered by `(ts, message_id)` ascending.
///
/// The page and the table-wide `total` are read in one transaction so they
/// agree with each other. Negative arguments are treated as zero.
pub async fn list_messages(
    db: &Database,
    limit: i64,
    offset: i64,
) -> Result<MessagePage, HooklineError> {
    let limit = limit.max(0);
    let offset = offset.max(0);
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let total: i64 = tx.query_row("SELECT COUNT(*) FROM messages", [], |row| row.get(0))?;
            let data = {
                let sql =
                    format!("{SELECT_COLUMNS} ORDER BY ts ASC, message_id ASC LIMIT ?1 OFFSET ?2");
                let mut stmt = tx.prepare(&sql)?;
                let rows = stmt.query_map(rusqlite::params![limit, offset], row_to_message)?;
                rows.collect::<Result<Vec<_>, _>>()?
            };
            tx.commit()?;
            Ok(MessagePage { data, total })
        })
        .await
        .map_err(map_tr_err)
}

/// Aggregate statistics over the whole table, read in one transaction.
///
/// Senders are ranked by count descending with ties broken by sender
/// ascending, truncated to [`TOP_SENDERS_LIMIT`].
pub async fn message_stats(db: &Database) -> Result<MessageStats, HooklineError> {
    db.connection()
        .call(|conn| {
            let tx = conn.transaction()?;
            let total: i64 = tx.query_row("SELECT COUNT(*) FROM messages", [], |row| row.get(0))?;
            let top_senders = {
                let mut stmt = tx.prepare(
                    "SELECT from_msisdn, COUNT(*) AS n FROM messages \
                     GROUP BY from_msisdn ORDER BY n DESC, from_msisdn ASC LIMIT ?1",
                )?;
                let rows = stmt.query_map(rusqlite::params![TOP_SENDERS_LIMIT], |row| {
                    Ok(SenderCount {
                        from: row.get(0)?,
                        count: row.get(1)?,
                    })
                })?;
                rows.collect::<Result<Vec<_>, _>>()?
            };
            let (first_ts, last_ts): (Option<String>, Option<String>) =
                tx.query_row("SELECT MIN(ts), MAX(ts) FROM messages", [], |row| {
                    Ok((row.get(0)?, row.get(1)?))
                })?;
            tx.commit()?;
            Ok(MessageStats {
                total,
                senders_count: top_senders.len(),
                top_senders,
                first_ts,
                last_ts,
            })
        })
        .await
        .map_err(map_tr_err)
}
