// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// All possible errors that can occur in the ordo CLI.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("host error: {0}")]
    Daemon(String),

    #[error("ordod is not running\n  hint: start it with 'ordo host start'")]
    HostNotRunning,

    #[error("action not found: {0}\n  hint: list queued actions with 'ordo pending'")]
    ActionNotFound(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ordo_core::Error> for Error {
    fn from(e: ordo_core::Error) -> Self {
        Error::InvalidInput(e.to_string())
    }
}

impl From<ordo_sync::SyncError> for Error {
    fn from(e: ordo_sync::SyncError) -> Self {
        Error::Config(e.to_string())
    }
}

/// Result type alias for ordo CLI operations.
pub type Result<T> = std::result::Result<T, Error>;
