// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! SQLite-backed persistent action queue.
//!
//! The [`ActionQueue`] stores [`PendingAction`] records durably so that
//! mutations made while offline survive restarts. Records are kept in
//! insertion order (an autoincrement `seq` column) and replayed FIFO.
//!
//! The "last sync time" scalar lives in a `meta` table in the same database
//! so both are committed through the same connection.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

use crate::action::{NewAction, PendingAction};
use crate::error::{Error, Result};
use crate::id::generate_unique_id;

/// SQL schema for the action queue database.
pub const SCHEMA: &str = r#"
-- Pending mutations, replayed in seq order
CREATE TABLE IF NOT EXISTS actions (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT NOT NULL UNIQUE,
    action_type TEXT NOT NULL,
    endpoint TEXT NOT NULL,
    method TEXT NOT NULL,
    payload TEXT,                -- JSON body, NULL for DELETE
    entity_type TEXT NOT NULL,
    entity_id TEXT,
    retry_count INTEGER NOT NULL DEFAULT 0,
    max_retries INTEGER NOT NULL,
    last_error TEXT,
    created_at TEXT NOT NULL
);

-- Scalars persisted alongside the queue
CREATE TABLE IF NOT EXISTS meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_actions_entity ON actions(entity_type, entity_id);
"#;

const LAST_SYNC_TIME_KEY: &str = "last_sync_time";

const SELECT_COLUMNS: &str = "id, action_type, endpoint, method, payload, entity_type, entity_id,
     retry_count, max_retries, last_error, created_at";

/// Parse a string value from the database, returning a rusqlite error on parse failure.
fn parse_db<T: std::str::FromStr>(
    value: &str,
    column: &str,
) -> std::result::Result<T, rusqlite::Error> {
    value.parse().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(Error::CorruptedData(format!(
                "invalid value '{value}' in column '{column}'"
            ))),
        )
    })
}

/// Parse an RFC3339 timestamp from the database.
fn parse_timestamp(
    value: &str,
    column: &str,
) -> std::result::Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                Box::new(Error::CorruptedData(format!(
                    "invalid timestamp '{value}' in column '{column}'"
                ))),
            )
        })
}

/// Parse an optional JSON payload column.
fn parse_payload(
    value: Option<String>,
) -> std::result::Result<Option<serde_json::Value>, rusqlite::Error> {
    match value {
        None => Ok(None),
        Some(s) => serde_json::from_str(&s).map(Some).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                Box::new(Error::CorruptedData(format!("invalid payload JSON: {e}"))),
            )
        }),
    }
}

fn row_to_action(row: &Row<'_>) -> std::result::Result<PendingAction, rusqlite::Error> {
    let action_type: String = row.get(1)?;
    let method: String = row.get(3)?;
    let entity_type: String = row.get(5)?;
    let created_at: String = row.get(10)?;

    Ok(PendingAction {
        id: row.get(0)?,
        action_type: parse_db(&action_type, "action_type")?,
        endpoint: row.get(2)?,
        method: parse_db(&method, "method")?,
        payload: parse_payload(row.get(4)?)?,
        entity_type: parse_db(&entity_type, "entity_type")?,
        entity_id: row.get(6)?,
        retry_count: row.get(7)?,
        max_retries: row.get(8)?,
        last_error: row.get(9)?,
        created_at: parse_timestamp(&created_at, "created_at")?,
    })
}

/// Durable, ordered storage for pending actions.
pub struct ActionQueue {
    conn: Connection,
}

impl ActionQueue {
    /// Open a queue database at the given path, creating it if needed.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )?;
        conn.execute_batch(SCHEMA)?;
        Ok(ActionQueue { conn })
    }

    /// Open an in-memory queue (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(ActionQueue { conn })
    }

    /// Store a new action and return its freshly assigned ID.
    ///
    /// The action starts with `retry_count = 0`.
    pub fn add(&self, action: NewAction) -> Result<String> {
        self.add_at(action, Utc::now())
    }

    /// Store a new action with an explicit enqueue time.
    pub fn add_at(&self, action: NewAction, created_at: DateTime<Utc>) -> Result<String> {
        let action = action.normalized()?;
        let id = generate_unique_id(&action, &created_at, |candidate| self.exists(candidate))?;
        let payload = action
            .payload
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        self.conn.execute(
            "INSERT INTO actions (id, action_type, endpoint, method, payload, entity_type,
             entity_id, retry_count, max_retries, last_error, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, ?8, NULL, ?9)",
            params![
                id,
                action.action_type.as_str(),
                action.endpoint,
                action.method.as_str(),
                payload,
                action.entity_type.as_str(),
                action.entity_id,
                action.max_retries,
                created_at.to_rfc3339(),
            ],
        )?;
        Ok(id)
    }

    /// Delete an action. Removing an unknown ID is not an error.
    ///
    /// Returns true if a record was deleted.
    pub fn remove(&self, id: &str) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM actions WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }

    /// Check whether an action with this ID is queued.
    pub fn exists(&self, id: &str) -> Result<bool> {
        let found: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM actions WHERE id = ?1)",
            params![id],
            |row| row.get(0),
        )?;
        Ok(found)
    }

    /// Get a single action by ID.
    pub fn get(&self, id: &str) -> Result<Option<PendingAction>> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM actions WHERE id = ?1");
        let action = self
            .conn
            .query_row(&sql, params![id], row_to_action)
            .optional()?;
        Ok(action)
    }

    /// All queued actions in insertion order.
    pub fn list_all(&self) -> Result<Vec<PendingAction>> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM actions ORDER BY seq");
        let mut stmt = self.conn.prepare(&sql)?;
        let actions = stmt
            .query_map([], row_to_action)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(actions)
    }

    /// Actions that have used up their delivery attempts, in insertion order.
    pub fn failed(&self) -> Result<Vec<PendingAction>> {
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM actions WHERE retry_count >= max_retries ORDER BY seq"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let actions = stmt
            .query_map([], row_to_action)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(actions)
    }

    /// Number of queued actions, without loading the records.
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM actions", [], |row| row.get(0))?;
        usize::try_from(count)
            .map_err(|_| Error::CorruptedData(format!("negative action count: {count}")))
    }

    /// Record a failed delivery attempt.
    ///
    /// Increments `retry_count` and stores `error` in a single statement.
    /// Returns the updated record, or `None` if it was removed concurrently.
    pub fn increment_retry(&self, id: &str, error: &str) -> Result<Option<PendingAction>> {
        let affected = self.conn.execute(
            "UPDATE actions SET retry_count = retry_count + 1, last_error = ?2 WHERE id = ?1",
            params![id, error],
        )?;
        if affected == 0 {
            return Ok(None);
        }
        self.get(id)
    }

    /// Give an action `extra` more delivery attempts.
    ///
    /// The retry count itself never goes down; the ceiling is raised to
    /// `retry_count + extra` instead. Returns the updated record, or `None`
    /// if the action is not queued.
    pub fn grant_retries(&self, id: &str, extra: u32) -> Result<Option<PendingAction>> {
        if extra == 0 {
            return Err(Error::InvalidInput(
                "must grant at least one retry".to_string(),
            ));
        }
        let affected = self.conn.execute(
            "UPDATE actions SET max_retries = retry_count + ?2, last_error = NULL WHERE id = ?1",
            params![id, extra],
        )?;
        if affected == 0 {
            return Ok(None);
        }
        self.get(id)
    }

    /// Remove every queued action. Returns how many were removed.
    pub fn clear(&self) -> Result<usize> {
        let affected = self.conn.execute("DELETE FROM actions", [])?;
        Ok(affected)
    }

    /// Timestamp (ms since epoch) of the last completed sync attempt.
    pub fn last_sync_time(&self) -> Result<Option<i64>> {
        let value: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM meta WHERE key = ?1",
                params![LAST_SYNC_TIME_KEY],
                |row| row.get(0),
            )
            .optional()?;

        match value {
            None => Ok(None),
            Some(v) => v.trim().parse().map(Some).map_err(|_| {
                Error::CorruptedData(format!("invalid {LAST_SYNC_TIME_KEY} '{v}'"))
            }),
        }
    }

    /// Persist the last sync time; `None` stores the current time.
    ///
    /// Returns the stored timestamp.
    pub fn set_last_sync_time(&self, timestamp: Option<i64>) -> Result<i64> {
        let timestamp = timestamp.unwrap_or_else(|| Utc::now().timestamp_millis());
        self.conn.execute(
            "INSERT INTO meta (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![LAST_SYNC_TIME_KEY, timestamp.to_string()],
        )?;
        Ok(timestamp)
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
