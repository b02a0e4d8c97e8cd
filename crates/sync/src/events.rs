// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Fire-and-forget notifications for UI consumers.

use ordo_core::{ActionType, EntityType, SyncResult};
use tokio::sync::broadcast;

use crate::monitor::Connectivity;

/// Events buffered per subscriber before the oldest are dropped.
pub const EVENT_CAPACITY: usize = 64;

/// Something observers may want to react to.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    /// An action was written to the queue.
    ActionQueued {
        id: String,
        action_type: ActionType,
        entity_type: EntityType,
    },
    /// A drain finished (not emitted for skipped or aborted runs).
    SyncComplete(SyncResult),
    /// The connectivity monitor published a change.
    ConnectivityChanged(Connectivity),
}

/// Broadcasts [`SyncEvent`]s to any number of subscribers.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<SyncEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(EVENT_CAPACITY);
        EventBus { tx }
    }

    /// Publish an event. Having no subscribers is not an error.
    pub fn emit(&self, event: SyncEvent) {
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
