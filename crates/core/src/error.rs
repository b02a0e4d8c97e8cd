// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for ordo-core operations.

use thiserror::Error;

/// All possible errors that can occur in ordo-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("action not found: {0}")]
    ActionNotFound(String),

    #[error("invalid action type: '{0}'\n  hint: valid types are: CREATE, UPDATE, DELETE")]
    InvalidActionType(String),

    #[error("invalid method: '{0}'\n  hint: valid methods are: POST, PUT, PATCH, DELETE")]
    InvalidMethod(String),

    #[error(
        "invalid entity type: '{0}'\n  hint: valid types are: task, project, comment, timer_session, habit, workspace"
    )]
    InvalidEntityType(String),

    #[error("invalid sync status: '{0}'")]
    InvalidStatus(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupted data: {0}")]
    CorruptedData(String),
}

/// A specialized Result type for ordo-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
