// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The sync engine: drains the action queue against the remote API.
//!
//! A run takes one snapshot of the queue and replays it in FIFO order. Each
//! action is either removed (2xx), left queued with its retry count bumped,
//! or reported as permanently failed once it reaches its ceiling. Permanent
//! failures stay queued; only the caller removes them.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use ordo_core::{ActionQueue, ClockSource, CurrentAction, PendingAction, SyncResult};
use tracing::{debug, error, info, warn};

use crate::error::Result;
use crate::events::{EventBus, SyncEvent};
use crate::monitor::ConnectivityMonitor;
use crate::shared::SharedState;
use crate::transport::{ApiRequest, Transport};

/// The queue as shared between the engine and the store.
pub type SharedQueue = Arc<Mutex<ActionQueue>>;

/// Lock the queue, recovering from a poisoned mutex.
///
/// Every queue call is a complete SQLite statement, so a panic elsewhere
/// cannot leave the connection half-updated.
pub(crate) fn lock_queue(queue: &SharedQueue) -> MutexGuard<'_, ActionQueue> {
    queue.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Holds the single-flight flag for the duration of a run.
struct RunGuard<'a> {
    running: &'a AtomicBool,
    state: &'a SharedState,
}

impl<'a> RunGuard<'a> {
    fn acquire(running: &'a AtomicBool, state: &'a SharedState) -> Option<Self> {
        running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RunGuard { running, state })
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        // A run dropped mid-drain must not leave the UI stuck on "syncing".
        self.state.update(|s| {
            if s.is_syncing {
                s.finish_sync(Some("sync interrupted".to_string()));
            }
        });
        self.running.store(false, Ordering::Release);
    }
}

/// Replays queued actions through a [`Transport`].
pub struct SyncEngine<T: Transport> {
    queue: SharedQueue,
    transport: T,
    monitor: Arc<ConnectivityMonitor>,
    state: Arc<SharedState>,
    events: EventBus,
    clock: Arc<dyn ClockSource>,
    auth_token: RwLock<Option<String>>,
    running: AtomicBool,
}

impl<T: Transport> SyncEngine<T> {
    pub fn new(
        queue: SharedQueue,
        transport: T,
        monitor: Arc<ConnectivityMonitor>,
        state: Arc<SharedState>,
        events: EventBus,
        clock: Arc<dyn ClockSource>,
    ) -> Self {
        SyncEngine {
            queue,
            transport,
            monitor,
            state,
            events,
            clock,
            auth_token: RwLock::new(None),
            running: AtomicBool::new(false),
        }
    }

    /// Set (or clear) the bearer token sent with every request.
    pub fn set_auth_token(&self, token: Option<String>) {
        let mut guard = self
            .auth_token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = token.filter(|t| !t.trim().is_empty());
    }

    pub fn auth_token(&self) -> Option<String> {
        self.auth_token
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn has_auth_token(&self) -> bool {
        self.auth_token().is_some()
    }

    /// True while a run holds the single-flight flag.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn with_queue<R>(
        &self,
        f: impl FnOnce(&ActionQueue) -> ordo_core::Result<R>,
    ) -> ordo_core::Result<R> {
        let queue = lock_queue(&self.queue);
        f(&queue)
    }

    /// Drain the queue once.
    ///
    /// Returns a skipped result without touching the network when offline
    /// or when another run is in flight. Returns `Err` only if the queue
    /// snapshot cannot be read.
    pub async fn sync_all(&self) -> Result<SyncResult> {
        if !self.monitor.is_online() {
            debug!("offline, skipping sync");
            return Ok(SyncResult::skipped());
        }
        let Some(_guard) = RunGuard::acquire(&self.running, &self.state) else {
            debug!("sync already in progress, skipping");
            return Ok(SyncResult::skipped());
        };

        self.state.update(|s| s.begin_sync());

        let snapshot = match self.with_queue(|q| q.list_all()) {
            Ok(actions) => actions,
            Err(e) => {
                error!("sync aborted, could not read queue: {e}");
                let message = format!("failed to read queue: {e}");
                self.state.update(|s| s.finish_sync(Some(message)));
                return Err(e.into());
            }
        };

        let total = snapshot.len();
        if total > 0 {
            info!(total, "sync started");
        }

        let token = self.auth_token();
        let mut result = SyncResult::empty();

        for (index, action) in snapshot.iter().enumerate() {
            if !self.monitor.is_online() {
                info!(remaining = total - index, "connectivity lost, stopping sync");
                break;
            }

            let current = CurrentAction {
                id: action.id.clone(),
                label: action.label(),
            };
            self.state.update(|s| s.set_progress(current, index, total));

            let request = ApiRequest::from_action(action);
            match self.transport.send(&request, token.as_deref()).await {
                Ok(status) => self.record_delivered(action, status, &mut result),
                Err(err) => self.record_delivery_failure(action, &err.to_string(), &mut result),
            }
        }

        self.finish_run(&result);
        Ok(result)
    }

    fn record_delivered(&self, action: &PendingAction, status: u16, result: &mut SyncResult) {
        match self.with_queue(|q| q.remove(&action.id)) {
            Ok(_) => {
                debug!(id = %action.id, status, "synced {}", action.label());
                result.synced += 1;
            }
            Err(e) => {
                // Delivered but still queued: it will be sent again next run.
                warn!(id = %action.id, "delivered but could not remove from queue: {e}");
                result.record_failure(&action.id, format!("delivered but not removed: {e}"));
            }
        }
    }

    fn record_delivery_failure(
        &self,
        action: &PendingAction,
        message: &str,
        result: &mut SyncResult,
    ) {
        match self.with_queue(|q| q.increment_retry(&action.id, message)) {
            Ok(Some(updated)) if updated.is_exhausted() => {
                warn!(
                    id = %action.id,
                    retries = updated.retry_count,
                    "action failed permanently: {message}"
                );
                result.record_failure(&action.id, message);
            }
            Ok(Some(updated)) => {
                warn!(
                    id = %action.id,
                    attempt = updated.retry_count,
                    max = updated.max_retries,
                    "delivery failed, will retry: {message}"
                );
            }
            Ok(None) => {
                debug!(id = %action.id, "action removed during sync");
            }
            Err(e) => {
                warn!(id = %action.id, "could not record retry: {e}");
                result.record_failure(&action.id, format!("{message} (retry not recorded: {e})"));
            }
        }
    }

    /// Stamp the sync time, refresh the count, settle the status.
    fn finish_run(&self, result: &SyncResult) {
        let now = self.clock.now_ms();
        let last_sync_time = match self.with_queue(|q| q.set_last_sync_time(Some(now))) {
            Ok(stored) => stored,
            Err(e) => {
                warn!("failed to store last sync time: {e}");
                now
            }
        };
        let pending = match self.with_queue(|q| q.count()) {
            Ok(count) => Some(count),
            Err(e) => {
                warn!("failed to count pending actions: {e}");
                None
            }
        };

        let summary = result.error_summary();
        self.state.update(|s| {
            s.last_sync_time = Some(last_sync_time);
            if let Some(count) = pending {
                s.pending_count = count;
            }
            s.finish_sync(summary);
        });
        self.state.persist();

        if result.synced > 0 || result.failed > 0 {
            info!(
                synced = result.synced,
                failed = result.failed,
                "sync finished"
            );
        }
        self.events.emit(SyncEvent::SyncComplete(result.clone()));
    }
}
