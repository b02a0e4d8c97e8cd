// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The facade UI and host code talk to.
//!
//! [`SyncStore`] wires the queue, the engine, the connectivity monitor and
//! the observable state together. It is cheap to clone; clones share state.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use ordo_core::{
    ActionQueue, ActionType, ClockSource, EntityType, HttpMethod, NewAction, PendingAction,
    PersistedSyncState, SyncResult, SyncState, SystemClock, DEFAULT_MAX_RETRIES,
};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::{SyncConfig, QUEUE_FILE_NAME, STATE_FILE_NAME};
use crate::engine::{lock_queue, SharedQueue, SyncEngine};
use crate::error::{Result, SyncError};
use crate::events::{EventBus, SyncEvent};
use crate::monitor::{Connectivity, ConnectivityMonitor, ConnectivityProbe};
use crate::shared::SharedState;
use crate::transport::{HttpTransport, Transport};

/// Construction options for [`SyncStore::with_transport`].
pub struct StoreOptions {
    /// Retry ceiling applied to actions queued through the store.
    pub max_retries: u32,
    pub initial_online: bool,
    /// Where the persisted state slice lives; `None` keeps it in memory.
    pub state_path: Option<PathBuf>,
    pub clock: Arc<dyn ClockSource>,
    pub auth_token: Option<String>,
}

impl Default for StoreOptions {
    fn default() -> Self {
        StoreOptions {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_online: true,
            state_path: None,
            clock: Arc::new(SystemClock),
            auth_token: None,
        }
    }
}

struct Inner<T: Transport> {
    engine: SyncEngine<T>,
    queue: SharedQueue,
    monitor: Arc<ConnectivityMonitor>,
    state: Arc<SharedState>,
    events: EventBus,
    max_retries: u32,
    monitor_task: Mutex<Option<JoinHandle<()>>>,
    auto_sync: Mutex<Option<CancellationToken>>,
    connectivity_watch: Mutex<Option<CancellationToken>>,
}

impl<T: Transport> Drop for Inner<T> {
    fn drop(&mut self) {
        for slot in [&self.auto_sync, &self.connectivity_watch] {
            if let Some(token) = take(slot) {
                token.cancel();
            }
        }
        if let Some(handle) = take(&self.monitor_task) {
            handle.abort();
        }
    }
}

fn take<V>(slot: &Mutex<Option<V>>) -> Option<V> {
    slot.lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .take()
}

/// Offline-first store for queued mutations.
pub struct SyncStore<T: Transport = HttpTransport> {
    inner: Arc<Inner<T>>,
}

impl<T: Transport> Clone for SyncStore<T> {
    fn clone(&self) -> Self {
        SyncStore {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl SyncStore<HttpTransport> {
    /// Open the store in `data_dir`, delivering over HTTP.
    pub fn open(data_dir: &Path, config: &SyncConfig) -> Result<Self> {
        config.validate()?;
        let queue = ActionQueue::open(&data_dir.join(QUEUE_FILE_NAME))?;
        let transport = HttpTransport::new(&config.base_url, config.request_timeout())?;
        Self::with_transport(
            queue,
            transport,
            StoreOptions {
                max_retries: config.max_retries,
                state_path: Some(data_dir.join(STATE_FILE_NAME)),
                auth_token: config.auth_token.clone(),
                ..StoreOptions::default()
            },
        )
    }
}

impl<T: Transport + 'static> SyncStore<T> {
    /// Build a store over an existing queue and transport.
    ///
    /// The persisted slice (if any) seeds the state, then the pending count
    /// and last sync time are refreshed from the queue.
    pub fn with_transport(queue: ActionQueue, transport: T, options: StoreOptions) -> Result<Self> {
        if options.max_retries == 0 {
            return Err(SyncError::Config(
                "max_retries must be at least 1".to_string(),
            ));
        }

        let persisted = match &options.state_path {
            Some(path) => PersistedSyncState::load(path).unwrap_or_else(|e| {
                warn!("ignoring unreadable sync state {}: {e}", path.display());
                PersistedSyncState::default()
            }),
            None => PersistedSyncState::default(),
        };

        let monitor = Arc::new(ConnectivityMonitor::new(options.initial_online));
        let state = Arc::new(SharedState::new(
            SyncState::from_persisted(&persisted, options.initial_online),
            options.state_path,
        ));
        let events = EventBus::new();
        let queue: SharedQueue = Arc::new(Mutex::new(queue));

        let engine = SyncEngine::new(
            Arc::clone(&queue),
            transport,
            Arc::clone(&monitor),
            Arc::clone(&state),
            events.clone(),
            options.clock,
        );
        engine.set_auth_token(options.auth_token);

        let store = SyncStore {
            inner: Arc::new(Inner {
                engine,
                queue,
                monitor,
                state,
                events,
                max_retries: options.max_retries,
                monitor_task: Mutex::new(None),
                auto_sync: Mutex::new(None),
                connectivity_watch: Mutex::new(None),
            }),
        };
        store.refresh_pending_count()?;
        store.refresh_last_sync_time()?;
        Ok(store)
    }

    fn from_weak(weak: &Weak<Inner<T>>) -> Option<Self> {
        weak.upgrade().map(|inner| SyncStore { inner })
    }

    /// Queue a mutation for delivery and return its id.
    ///
    /// The action uses the store's retry ceiling. The pending count is
    /// refreshed before this returns.
    pub fn queue_action(
        &self,
        action_type: ActionType,
        endpoint: &str,
        method: HttpMethod,
        payload: Option<serde_json::Value>,
        entity_type: EntityType,
        entity_id: Option<&str>,
    ) -> Result<String> {
        let mut action = NewAction::new(action_type, endpoint, method, entity_type)
            .with_max_retries(self.inner.max_retries);
        if let Some(payload) = payload {
            action = action.with_payload(payload);
        }
        if let Some(entity_id) = entity_id {
            action = action.with_entity_id(entity_id);
        }
        self.enqueue(action)
    }

    /// Queue a fully built action as-is.
    pub fn enqueue(&self, action: NewAction) -> Result<String> {
        let action_type = action.action_type;
        let entity_type = action.entity_type;
        let id = lock_queue(&self.inner.queue).add(action)?;
        info!(id = %id, "queued {} {}", action_type, entity_type);

        self.refresh_pending_count()?;
        self.inner.events.emit(SyncEvent::ActionQueued {
            id: id.clone(),
            action_type,
            entity_type,
        });
        Ok(id)
    }

    /// Drop an action from the queue. Unknown ids are ignored.
    ///
    /// Returns true if something was removed.
    pub fn remove_action(&self, id: &str) -> Result<bool> {
        let removed = lock_queue(&self.inner.queue).remove(id)?;
        if removed {
            info!(id, "discarded action");
        }
        self.refresh_pending_count()?;
        Ok(removed)
    }

    pub fn get_action(&self, id: &str) -> Result<Option<PendingAction>> {
        Ok(lock_queue(&self.inner.queue).get(id)?)
    }

    /// All queued actions, oldest first.
    pub fn list_actions(&self) -> Result<Vec<PendingAction>> {
        Ok(lock_queue(&self.inner.queue).list_all()?)
    }

    /// Queued actions that have reached their retry ceiling.
    pub fn failed_actions(&self) -> Result<Vec<PendingAction>> {
        Ok(lock_queue(&self.inner.queue).failed()?)
    }

    /// Give a failed action another round of delivery attempts.
    ///
    /// Returns the updated action, or `None` if the id is unknown.
    pub fn retry_action(&self, id: &str) -> Result<Option<PendingAction>> {
        let updated = lock_queue(&self.inner.queue).grant_retries(id, self.inner.max_retries)?;
        if let Some(action) = &updated {
            info!(
                id,
                max_retries = action.max_retries,
                "granted {} more attempts",
                self.inner.max_retries
            );
        }
        Ok(updated)
    }

    /// Drain the queue once. See [`SyncEngine::sync_all`].
    pub async fn sync_all(&self) -> Result<SyncResult> {
        self.inner.engine.sync_all().await
    }

    /// User-triggered sync; same semantics as [`SyncStore::sync_all`].
    pub async fn force_sync(&self) -> Result<SyncResult> {
        self.sync_all().await
    }

    /// Report connectivity from the platform or a manual override.
    pub fn set_online(&self, is_online: bool) -> Connectivity {
        self.inner.state.update(|s| s.set_online(is_online));
        let change = self.inner.monitor.set_online(is_online);
        self.inner
            .events
            .emit(SyncEvent::ConnectivityChanged(change));
        change
    }

    pub fn is_online(&self) -> bool {
        self.inner.monitor.is_online()
    }

    /// Recount the queue and publish the result.
    pub fn refresh_pending_count(&self) -> Result<usize> {
        let count = lock_queue(&self.inner.queue).count()?;
        self.inner.state.update(|s| s.pending_count = count);
        self.inner.state.persist();
        Ok(count)
    }

    /// Reload the last sync time from storage and publish it.
    pub fn refresh_last_sync_time(&self) -> Result<Option<i64>> {
        let time = lock_queue(&self.inner.queue).last_sync_time()?;
        if time.is_some() {
            self.inner.state.update(|s| s.last_sync_time = time);
            self.inner.state.persist();
        }
        Ok(self.inner.state.snapshot().last_sync_time)
    }

    /// The current observable state.
    pub fn state(&self) -> SyncState {
        self.inner.state.snapshot()
    }

    /// Watch state changes.
    pub fn subscribe(&self) -> watch::Receiver<SyncState> {
        self.inner.state.subscribe()
    }

    /// Receive [`SyncEvent`]s emitted from now on.
    pub fn events(&self) -> broadcast::Receiver<SyncEvent> {
        self.inner.events.subscribe()
    }

    pub fn connectivity(&self) -> watch::Receiver<Connectivity> {
        self.inner.monitor.subscribe()
    }

    /// Set or clear the bearer token; blank tokens clear it.
    pub fn set_auth_token(&self, token: Option<String>) {
        self.inner.engine.set_auth_token(token);
    }

    pub fn has_auth_token(&self) -> bool {
        self.inner.engine.has_auth_token()
    }

    pub fn transport(&self) -> &T {
        self.inner.engine.transport()
    }

    /// Sync automatically whenever connectivity returns with work pending.
    ///
    /// Idempotent; the listener lives until the store is dropped or
    /// [`SyncStore::shutdown`] is called.
    pub fn attach_monitor(&self) {
        let mut slot = self
            .inner
            .monitor_task
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if slot.is_some() {
            return;
        }

        let mut rx = self.inner.monitor.subscribe();
        let weak = Arc::downgrade(&self.inner);
        *slot = Some(tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let change = *rx.borrow_and_update();
                if !change.was_offline {
                    continue;
                }
                let Some(store) = Self::from_weak(&weak) else {
                    break;
                };
                let pending = store.state().pending_count;
                if pending == 0 {
                    continue;
                }
                info!(pending, "back online, syncing");
                if let Err(e) = store.sync_all().await {
                    warn!("reconnect sync failed: {e}");
                }
            }
        }));
    }

    /// Ask `probe` whether the API is reachable and report the answer.
    ///
    /// Only a changed answer reaches [`SyncStore::set_online`], so an
    /// unchanged probe neither emits nor disturbs a pending reconnect.
    pub async fn check_connectivity(&self, probe: &dyn ConnectivityProbe) -> bool {
        let is_online = probe.probe().await;
        if is_online != self.is_online() {
            self.set_online(is_online);
        }
        is_online
    }

    /// Re-run `probe` every `interval`, replacing any previous watch.
    ///
    /// The reconnect listener installed by [`SyncStore::attach_monitor`]
    /// turns a probed offline → online change into a sync.
    pub fn watch_connectivity(
        &self,
        probe: Arc<dyn ConnectivityProbe>,
        interval: Duration,
    ) -> Result<()> {
        if interval.is_zero() {
            return Err(SyncError::Config(
                "connectivity check interval must be greater than zero".to_string(),
            ));
        }

        let token = CancellationToken::new();
        let previous = self
            .inner
            .connectivity_watch
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .replace(token.clone());
        if let Some(previous) = previous {
            previous.cancel();
        }

        let weak = Arc::downgrade(&self.inner);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        let Some(store) = Self::from_weak(&weak) else {
                            break;
                        };
                        store.check_connectivity(probe.as_ref()).await;
                    }
                }
            }
        });
        info!(interval_ms = interval.as_millis() as u64, "connectivity watch started");
        Ok(())
    }

    /// Run [`SyncStore::sync_all`] every `interval`, replacing any
    /// previous schedule. The first run happens one interval from now.
    pub fn start_auto_sync(&self, interval: Duration) -> Result<()> {
        if interval.is_zero() {
            return Err(SyncError::Config(
                "auto-sync interval must be greater than zero".to_string(),
            ));
        }

        let token = CancellationToken::new();
        let previous = self
            .inner
            .auto_sync
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .replace(token.clone());
        if let Some(previous) = previous {
            previous.cancel();
        }

        let weak = Arc::downgrade(&self.inner);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        let Some(store) = Self::from_weak(&weak) else {
                            break;
                        };
                        if let Err(e) = store.sync_all().await {
                            warn!("auto-sync failed: {e}");
                        }
                    }
                }
            }
        });
        info!(interval_ms = interval.as_millis() as u64, "auto-sync started");
        Ok(())
    }

    /// Stop periodic syncing. Returns false if it was not running.
    pub fn stop_auto_sync(&self) -> bool {
        match take(&self.inner.auto_sync) {
            Some(token) => {
                token.cancel();
                info!("auto-sync stopped");
                true
            }
            None => false,
        }
    }

    pub fn is_auto_syncing(&self) -> bool {
        self.inner
            .auto_sync
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .is_some()
    }

    /// Stop background tasks. Queued actions stay on disk.
    pub fn shutdown(&self) {
        self.stop_auto_sync();
        if let Some(token) = take(&self.inner.connectivity_watch) {
            token.cancel();
        }
        if let Some(handle) = take(&self.inner.monitor_task) {
            handle.abort();
        }
        self.inner.state.persist();
    }
}
