// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! ordo-core: Shared library for the Ordo offline sync core
//!
//! This crate provides the queued-action model, the SQLite-backed action
//! queue, and the observable sync state types used by `ordo-sync`, the
//! `ordod` host process, and the `ordo` CLI.

pub mod action;
pub mod clock;
pub mod error;
pub mod id;
pub mod queue;
pub mod state;

pub use action::{ActionType, EntityType, HttpMethod, NewAction, PendingAction, DEFAULT_MAX_RETRIES};
pub use clock::{ClockSource, ManualClock, SystemClock};
pub use error::{Error, Result};
pub use queue::ActionQueue;
pub use state::{
    CurrentAction, PersistedSyncState, SyncFailure, SyncResult, SyncState, SyncStatus,
};
