// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Bridge adapter for the sync host.
//!
//! Thin wrapper over [`SyncStore`] that dispatches bridge requests,
//! converting results and errors at the boundary.

use std::time::{Duration, Instant};

use ordo_ipc::{BridgeRequest, BridgeResponse, HostStatus};
use ordo_sync::{SyncStore, Transport};

/// Dispatches bridge requests to the store it owns.
pub struct Host<T: Transport + 'static> {
    store: SyncStore<T>,
    base_url: String,
    started: Instant,
}

impl<T: Transport + 'static> Host<T> {
    pub fn new(store: SyncStore<T>, base_url: impl Into<String>) -> Self {
        Host {
            store,
            base_url: base_url.into(),
            started: Instant::now(),
        }
    }

    pub fn store(&self) -> &SyncStore<T> {
        &self.store
    }

    /// Execute one request. Failures become [`BridgeResponse::Error`].
    pub async fn handle(&self, request: BridgeRequest) -> BridgeResponse {
        match request {
            BridgeRequest::Ping => BridgeResponse::Pong,
            BridgeRequest::Hello { version } => {
                if version != env!("CARGO_PKG_VERSION") {
                    tracing::warn!("client version {} differs from host", version);
                }
                BridgeResponse::Hello {
                    version: env!("CARGO_PKG_VERSION").to_string(),
                }
            }
            BridgeRequest::Shutdown => {
                self.store.shutdown();
                BridgeResponse::ShuttingDown
            }
            BridgeRequest::Initialize => {
                let refreshed = self
                    .store
                    .refresh_pending_count()
                    .and_then(|_| self.store.refresh_last_sync_time());
                match refreshed {
                    Ok(_) => BridgeResponse::State(self.store.state()),
                    Err(e) => BridgeResponse::error(e),
                }
            }
            BridgeRequest::GetState => BridgeResponse::Status(self.status()),
            BridgeRequest::ForceSync => match self.store.force_sync().await {
                Ok(result) => BridgeResponse::Synced(result),
                Err(e) => BridgeResponse::error(e),
            },
            BridgeRequest::SetAuthToken { token } => {
                self.store.set_auth_token(token);
                BridgeResponse::Ok
            }
            BridgeRequest::StartAutoSync { interval_ms } => {
                match self
                    .store
                    .start_auto_sync(Duration::from_millis(interval_ms))
                {
                    Ok(()) => BridgeResponse::Ok,
                    Err(e) => BridgeResponse::error(e),
                }
            }
            BridgeRequest::StopAutoSync => {
                self.store.stop_auto_sync();
                BridgeResponse::Ok
            }
            BridgeRequest::SetOnline { is_online } => {
                self.store.set_online(is_online);
                BridgeResponse::State(self.store.state())
            }
            BridgeRequest::QueueAction { action } => {
                // The host's configured ceiling applies, not the client's.
                match self.store.queue_action(
                    action.action_type,
                    &action.endpoint,
                    action.method,
                    action.payload,
                    action.entity_type,
                    action.entity_id.as_deref(),
                ) {
                    Ok(id) => BridgeResponse::Queued { id },
                    Err(e) => BridgeResponse::error(e),
                }
            }
            BridgeRequest::RemoveAction { id } => match self.store.remove_action(&id) {
                Ok(removed) => BridgeResponse::Removed { removed },
                Err(e) => BridgeResponse::error(e),
            },
            BridgeRequest::ListActions { failed_only } => {
                let actions = if failed_only {
                    self.store.failed_actions()
                } else {
                    self.store.list_actions()
                };
                match actions {
                    Ok(actions) => BridgeResponse::Actions { actions },
                    Err(e) => BridgeResponse::error(e),
                }
            }
            BridgeRequest::RetryAction { id } => match self.store.retry_action(&id) {
                Ok(action) => BridgeResponse::Retried { action },
                Err(e) => BridgeResponse::error(e),
            },
        }
    }

    fn status(&self) -> HostStatus {
        HostStatus {
            pid: std::process::id(),
            uptime_secs: self.started.elapsed().as_secs(),
            base_url: self.base_url.clone(),
            auto_sync: self.store.is_auto_syncing(),
            has_auth_token: self.store.has_auth_token(),
            state: self.store.state(),
        }
    }
}

#[cfg(test)]
#[path = "host_tests.rs"]
mod tests;
