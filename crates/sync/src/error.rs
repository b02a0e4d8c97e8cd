// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

use crate::transport::TransportError;

/// Errors surfaced by the sync core.
///
/// Expected conditions (offline, a run already in flight, a single action
/// failing delivery) are reported through [`SyncState`](ordo_core::SyncState)
/// and [`SyncResult`](ordo_core::SyncResult) instead.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("queue error: {0}")]
    Queue(#[from] ordo_core::Error),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;
