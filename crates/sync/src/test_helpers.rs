// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for sync tests.

#![allow(clippy::unwrap_used)]

use std::path::Path;
use std::sync::{Arc, Mutex};

use ordo_core::{
    ActionQueue, ActionType, EntityType, HttpMethod, ManualClock, NewAction, SyncState,
};
use serde_json::json;

use crate::engine::{SharedQueue, SyncEngine};
use crate::events::EventBus;
use crate::monitor::ConnectivityMonitor;
use crate::shared::SharedState;
use crate::store::{StoreOptions, SyncStore};
use crate::transport_tests::MockTransport;

/// Wall clock reading used by test clocks.
pub const NOW_MS: i64 = 1_700_000_000_000;

pub fn create_task(title: &str) -> NewAction {
    NewAction::new(ActionType::Create, "/tasks", HttpMethod::Post, EntityType::Task)
        .with_payload(json!({ "title": title }))
}

pub fn update_task(id: &str) -> NewAction {
    NewAction::new(
        ActionType::Update,
        format!("/tasks/{id}"),
        HttpMethod::Patch,
        EntityType::Task,
    )
    .with_entity_id(id)
    .with_payload(json!({ "status": "done" }))
}

pub fn delete_task(id: &str) -> NewAction {
    NewAction::new(
        ActionType::Delete,
        format!("/tasks/{id}"),
        HttpMethod::Delete,
        EntityType::Task,
    )
    .with_entity_id(id)
}

/// An engine wired to in-memory parts the test can inspect.
pub struct EngineHarness {
    pub engine: SyncEngine<MockTransport>,
    pub transport: MockTransport,
    pub queue: SharedQueue,
    pub monitor: Arc<ConnectivityMonitor>,
    pub state: Arc<SharedState>,
    pub events: EventBus,
    pub clock: Arc<ManualClock>,
}

impl EngineHarness {
    pub fn new(transport: MockTransport) -> Self {
        Self::with_queue(transport, ActionQueue::open_in_memory().unwrap())
    }

    /// A harness over a queue file that other connections can reach.
    pub fn on_disk(transport: MockTransport, path: &Path) -> Self {
        Self::with_queue(transport, ActionQueue::open(path).unwrap())
    }

    fn with_queue(transport: MockTransport, queue: ActionQueue) -> Self {
        let queue: SharedQueue = Arc::new(Mutex::new(queue));
        let monitor = Arc::new(ConnectivityMonitor::new(true));
        let state = Arc::new(SharedState::new(SyncState::default(), None));
        let events = EventBus::new();
        let clock = Arc::new(ManualClock::new(NOW_MS));
        let engine = SyncEngine::new(
            Arc::clone(&queue),
            transport.clone(),
            Arc::clone(&monitor),
            Arc::clone(&state),
            events.clone(),
            clock.clone(),
        );
        EngineHarness {
            engine,
            transport,
            queue,
            monitor,
            state,
            events,
            clock,
        }
    }

    pub fn add(&self, action: NewAction) -> String {
        self.queue.lock().unwrap().add(action).unwrap()
    }

    pub fn queued_ids(&self) -> Vec<String> {
        self.queue
            .lock()
            .unwrap()
            .list_all()
            .unwrap()
            .into_iter()
            .map(|a| a.id)
            .collect()
    }
}

/// An online in-memory store with a fixed clock.
pub fn store_with(transport: MockTransport) -> SyncStore<MockTransport> {
    store_with_options(transport, StoreOptions::default())
}

pub fn store_with_options(
    transport: MockTransport,
    options: StoreOptions,
) -> SyncStore<MockTransport> {
    let options = StoreOptions {
        clock: Arc::new(ManualClock::new(NOW_MS)),
        ..options
    };
    SyncStore::with_transport(ActionQueue::open_in_memory().unwrap(), transport, options).unwrap()
}

/// Let spawned tasks run until they block.
pub async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}
