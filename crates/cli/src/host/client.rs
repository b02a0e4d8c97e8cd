// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Bridge client for the ordod host.
//!
//! ordod answers one request per connection, so every call opens a fresh
//! stream to the socket.

use std::os::unix::net::UnixStream;
use std::path::PathBuf;
use std::time::Duration;

use ordo_core::{NewAction, PendingAction, SyncResult, SyncState};
use ordo_ipc::{framing, BridgeRequest, BridgeResponse, HostStatus};

use crate::error::{Error, Result};

/// Timeout for ordinary requests.
const TIMEOUT_SECS: u64 = 5;
/// A forced sync waits on the network for every queued action.
const SYNC_TIMEOUT_SECS: u64 = 300;

/// Sends bridge requests to the host listening on a socket.
#[derive(Debug, Clone)]
pub struct BridgeClient {
    socket_path: PathBuf,
}

impl BridgeClient {
    pub fn new(socket_path: impl Into<PathBuf>) -> Self {
        BridgeClient {
            socket_path: socket_path.into(),
        }
    }

    fn connect(&self, timeout: Duration) -> Result<UnixStream> {
        let stream = UnixStream::connect(&self.socket_path)
            .map_err(|e| Error::Daemon(format!("failed to connect to ordod: {}", e)))?;

        stream
            .set_read_timeout(Some(timeout))
            .map_err(|e| Error::Daemon(format!("failed to set read timeout: {}", e)))?;
        stream
            .set_write_timeout(Some(Duration::from_secs(TIMEOUT_SECS)))
            .map_err(|e| Error::Daemon(format!("failed to set write timeout: {}", e)))?;

        Ok(stream)
    }

    /// Send a request and receive its response.
    ///
    /// An [`BridgeResponse::Error`] from the host is returned as
    /// [`Error::Daemon`].
    pub fn request(&self, request: &BridgeRequest) -> Result<BridgeResponse> {
        let timeout = match request {
            BridgeRequest::ForceSync | BridgeRequest::SetOnline { .. } => SYNC_TIMEOUT_SECS,
            _ => TIMEOUT_SECS,
        };
        let mut stream = self.connect(Duration::from_secs(timeout))?;
        framing::write_request(&mut stream, request)?;
        match framing::read_response(&mut stream)? {
            BridgeResponse::Error { message } => Err(Error::Daemon(message)),
            response => Ok(response),
        }
    }

    pub fn ping(&self) -> Result<()> {
        match self.request(&BridgeRequest::Ping)? {
            BridgeResponse::Pong => Ok(()),
            other => Err(unexpected(other)),
        }
    }

    /// Version handshake. Returns the host's version.
    pub fn hello(&self) -> Result<String> {
        let request = BridgeRequest::Hello {
            version: env!("CARGO_PKG_VERSION").to_string(),
        };
        match self.request(&request)? {
            BridgeResponse::Hello { version } => Ok(version),
            other => Err(unexpected(other)),
        }
    }

    pub fn shutdown(&self) -> Result<()> {
        match self.request(&BridgeRequest::Shutdown)? {
            BridgeResponse::ShuttingDown => Ok(()),
            other => Err(unexpected(other)),
        }
    }

    /// Refresh counts from storage and return the resulting state.
    pub fn initialize(&self) -> Result<SyncState> {
        match self.request(&BridgeRequest::Initialize)? {
            BridgeResponse::State(state) => Ok(state),
            other => Err(unexpected(other)),
        }
    }

    pub fn status(&self) -> Result<HostStatus> {
        match self.request(&BridgeRequest::GetState)? {
            BridgeResponse::Status(status) => Ok(status),
            other => Err(unexpected(other)),
        }
    }

    pub fn force_sync(&self) -> Result<SyncResult> {
        match self.request(&BridgeRequest::ForceSync)? {
            BridgeResponse::Synced(result) => Ok(result),
            other => Err(unexpected(other)),
        }
    }

    pub fn set_auth_token(&self, token: Option<String>) -> Result<()> {
        self.expect_ok(&BridgeRequest::SetAuthToken { token })
    }

    pub fn start_auto_sync(&self, interval_ms: u64) -> Result<()> {
        self.expect_ok(&BridgeRequest::StartAutoSync { interval_ms })
    }

    pub fn stop_auto_sync(&self) -> Result<()> {
        self.expect_ok(&BridgeRequest::StopAutoSync)
    }

    pub fn set_online(&self, is_online: bool) -> Result<SyncState> {
        match self.request(&BridgeRequest::SetOnline { is_online })? {
            BridgeResponse::State(state) => Ok(state),
            other => Err(unexpected(other)),
        }
    }

    /// Queue an action. Returns the id the host assigned.
    pub fn queue_action(&self, action: NewAction) -> Result<String> {
        match self.request(&BridgeRequest::QueueAction { action })? {
            BridgeResponse::Queued { id } => Ok(id),
            other => Err(unexpected(other)),
        }
    }

    pub fn remove_action(&self, id: &str) -> Result<bool> {
        let request = BridgeRequest::RemoveAction { id: id.to_string() };
        match self.request(&request)? {
            BridgeResponse::Removed { removed } => Ok(removed),
            other => Err(unexpected(other)),
        }
    }

    pub fn list_actions(&self, failed_only: bool) -> Result<Vec<PendingAction>> {
        match self.request(&BridgeRequest::ListActions { failed_only })? {
            BridgeResponse::Actions { actions } => Ok(actions),
            other => Err(unexpected(other)),
        }
    }

    pub fn retry_action(&self, id: &str) -> Result<Option<PendingAction>> {
        let request = BridgeRequest::RetryAction { id: id.to_string() };
        match self.request(&request)? {
            BridgeResponse::Retried { action } => Ok(action),
            other => Err(unexpected(other)),
        }
    }

    fn expect_ok(&self, request: &BridgeRequest) -> Result<()> {
        match self.request(request)? {
            BridgeResponse::Ok => Ok(()),
            other => Err(unexpected(other)),
        }
    }
}

fn unexpected(response: BridgeResponse) -> Error {
    Error::Daemon(format!("unexpected response: {:?}", response))
}
