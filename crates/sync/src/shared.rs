// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The observable state cell shared by the engine and the store.

use std::path::PathBuf;

use ordo_core::SyncState;
use tokio::sync::watch;
use tracing::warn;

/// Holds the current [`SyncState`] and fans out every update.
///
/// Only the persisted slice is written to disk, and only on
/// [`SharedState::persist`].
#[derive(Debug)]
pub struct SharedState {
    tx: watch::Sender<SyncState>,
    persist_path: Option<PathBuf>,
}

impl SharedState {
    pub fn new(initial: SyncState, persist_path: Option<PathBuf>) -> Self {
        let (tx, _rx) = watch::channel(initial);
        SharedState { tx, persist_path }
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> SyncState {
        self.tx.borrow().clone()
    }

    /// Mutate the state in place and notify subscribers.
    pub fn update<F: FnOnce(&mut SyncState)>(&self, f: F) {
        self.tx.send_modify(f);
    }

    pub fn subscribe(&self) -> watch::Receiver<SyncState> {
        self.tx.subscribe()
    }

    /// Write the persisted slice. Failures are logged, not returned.
    pub fn persist(&self) {
        let Some(path) = &self.persist_path else {
            return;
        };
        let persisted = self.tx.borrow().persisted();
        if let Err(e) = persisted.save(path) {
            warn!("failed to persist sync state to {}: {e}", path.display());
        }
    }
}
