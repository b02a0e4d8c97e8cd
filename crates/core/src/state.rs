// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Observable sync state and run results.
//!
//! [`SyncState`] is what UI-facing consumers render. Only the
//! [`PersistedSyncState`] slice of it survives a restart, so a reload never
//! resurrects a stuck "syncing" indicator.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Engine state machine position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    /// Nothing running.
    #[default]
    Idle,
    /// A drain is in progress.
    Syncing,
    /// The last drain had a permanent failure or was aborted.
    Error,
    /// No connectivity.
    Offline,
}

impl SyncStatus {
    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStatus::Idle => "idle",
            SyncStatus::Syncing => "syncing",
            SyncStatus::Error => "error",
            SyncStatus::Offline => "offline",
        }
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SyncStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "idle" => Ok(SyncStatus::Idle),
            "syncing" => Ok(SyncStatus::Syncing),
            "error" => Ok(SyncStatus::Error),
            "offline" => Ok(SyncStatus::Offline),
            _ => Err(Error::InvalidStatus(s.to_string())),
        }
    }
}

/// The action currently being delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentAction {
    pub id: String,
    pub label: String,
}

/// Observable state of the sync core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncState {
    pub status: SyncStatus,
    pub is_online: bool,
    /// Set on an offline → online transition, cleared on the next one.
    pub was_offline: bool,
    pub pending_count: usize,
    /// Milliseconds since epoch of the last completed drain attempt.
    pub last_sync_time: Option<i64>,
    pub last_error: Option<String>,
    pub is_syncing: bool,
    pub current_action: Option<CurrentAction>,
    /// Progress of the active drain, 0-100.
    pub sync_progress: u8,
}

impl Default for SyncState {
    fn default() -> Self {
        SyncState {
            status: SyncStatus::Idle,
            is_online: true,
            was_offline: false,
            pending_count: 0,
            last_sync_time: None,
            last_error: None,
            is_syncing: false,
            current_action: None,
            sync_progress: 0,
        }
    }
}

impl SyncState {
    /// Build the initial state from the persisted slice.
    pub fn from_persisted(persisted: &PersistedSyncState, is_online: bool) -> Self {
        let mut state = SyncState {
            pending_count: persisted.pending_count,
            last_sync_time: persisted.last_sync_time,
            ..SyncState::default()
        };
        state.set_online(is_online);
        state
    }

    /// The slice of this state that is persisted across sessions.
    pub fn persisted(&self) -> PersistedSyncState {
        PersistedSyncState {
            last_sync_time: self.last_sync_time,
            pending_count: self.pending_count,
        }
    }

    /// Apply a connectivity change.
    ///
    /// Going offline moves the status to `offline` unless a drain is active
    /// (the drain settles the status when it finishes). Coming back online
    /// from `offline` returns to `idle`.
    pub fn set_online(&mut self, is_online: bool) {
        self.was_offline = !self.is_online && is_online;
        self.is_online = is_online;
        if !is_online && !self.is_syncing {
            self.status = SyncStatus::Offline;
        } else if is_online && self.status == SyncStatus::Offline {
            self.status = SyncStatus::Idle;
        }
    }

    /// Enter the `syncing` state at 0% progress.
    pub fn begin_sync(&mut self) {
        self.status = SyncStatus::Syncing;
        self.is_syncing = true;
        self.current_action = None;
        self.sync_progress = 0;
    }

    /// Record progress before delivering the action at `index` of `total`.
    pub fn set_progress(&mut self, current: CurrentAction, index: usize, total: usize) {
        self.current_action = Some(current);
        self.sync_progress = progress_percent(index, total);
    }

    /// Leave the `syncing` state.
    ///
    /// `error` is the run's failure summary; `None` means the run was clean.
    pub fn finish_sync(&mut self, error: Option<String>) {
        self.is_syncing = false;
        self.current_action = None;
        self.sync_progress = 0;
        self.status = if !self.is_online {
            SyncStatus::Offline
        } else if error.is_some() {
            SyncStatus::Error
        } else {
            SyncStatus::Idle
        };
        self.last_error = error;
    }
}

/// `round(index / total * 100)`, clamped to 0-100.
pub fn progress_percent(index: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (index as f64 / total as f64 * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}

/// A permanently failed action reported by a sync run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncFailure {
    pub action_id: String,
    pub error: String,
}

/// Outcome of one drain of the queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncResult {
    /// False iff an action reached its retry ceiling in this run, or the run
    /// did not happen (offline, already running).
    pub success: bool,
    pub synced: usize,
    pub failed: usize,
    pub errors: Vec<SyncFailure>,
}

impl SyncResult {
    /// Result of a run that found nothing to do, or did everything.
    pub fn empty() -> Self {
        SyncResult {
            success: true,
            synced: 0,
            failed: 0,
            errors: Vec::new(),
        }
    }

    /// Result of a run that was refused (offline or another run in flight).
    pub fn skipped() -> Self {
        SyncResult {
            success: false,
            synced: 0,
            failed: 0,
            errors: Vec::new(),
        }
    }

    /// Record a permanently failed action.
    pub fn record_failure(&mut self, action_id: impl Into<String>, error: impl Into<String>) {
        self.failed += 1;
        self.success = false;
        self.errors.push(SyncFailure {
            action_id: action_id.into(),
            error: error.into(),
        });
    }

    /// One-line summary for `last_error`, or `None` if nothing failed.
    pub fn error_summary(&self) -> Option<String> {
        match self.errors.as_slice() {
            [] => None,
            [only] => Some(format!("{}: {}", only.action_id, only.error)),
            [first, rest @ ..] => Some(format!(
                "{} actions failed to sync; first {}: {}",
                rest.len() + 1,
                first.action_id,
                first.error
            )),
        }
    }
}

/// State persisted across sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSyncState {
    pub last_sync_time: Option<i64>,
    pub pending_count: usize,
}

impl PersistedSyncState {
    /// Read the persisted slice, returning the default if the file is missing.
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(content) if content.trim().is_empty() => Ok(Self::default()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write the persisted slice.
    ///
    /// The JSON goes to a sibling temp file which is synced and then renamed
    /// over `path`, so readers see either the old slice or the new one.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string(self)?;
        let temp_path = path.with_extension("json.tmp");
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        drop(file);
        fs::rename(&temp_path, path)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
