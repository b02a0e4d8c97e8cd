// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Bridge protocol between UI hosts and the `ordod` sync host.
//!
//! This crate defines the message types and framing used between the
//! `ordo` CLI (or any other UI shell) and the `ordod` process that owns the
//! sync store. Messages are serialized as JSON with length-prefixed framing.
//! Each connection carries exactly one request and one response.

use ordo_core::{NewAction, PendingAction, SyncResult, SyncState};
use serde::{Deserialize, Serialize};

// ============================================================================
// Protocol types
// ============================================================================

/// Request sent from a UI host to `ordod`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum BridgeRequest {
    /// Ping to check if the host is alive.
    Ping,
    /// Version handshake request.
    Hello { version: String },
    /// Graceful shutdown.
    Shutdown,
    /// Refresh counts from storage and return the state.
    Initialize,
    /// Host status and current sync state.
    GetState,
    /// Drain the queue now.
    ForceSync,
    /// Set or clear the bearer token.
    SetAuthToken { token: Option<String> },
    /// Sync every `interval_ms` milliseconds.
    StartAutoSync { interval_ms: u64 },
    StopAutoSync,
    /// Connectivity report or manual override.
    SetOnline { is_online: bool },
    /// Queue a mutation for delivery.
    QueueAction { action: NewAction },
    /// Discard a queued action.
    RemoveAction { id: String },
    /// List queued actions, optionally only those past their retry ceiling.
    ListActions {
        #[serde(default)]
        failed_only: bool,
    },
    /// Grant a failed action more delivery attempts.
    RetryAction { id: String },
}

/// Response sent from `ordod` back to the UI host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum BridgeResponse {
    /// Pong response.
    Pong,
    /// Version handshake response.
    Hello { version: String },
    /// Shutdown acknowledged.
    ShuttingDown,
    /// Current sync state.
    State(SyncState),
    /// Host status.
    Status(HostStatus),
    /// Outcome of a sync run.
    Synced(SyncResult),
    /// Action accepted into the queue.
    Queued { id: String },
    /// Whether a removal found the action.
    Removed { removed: bool },
    /// Queued actions, oldest first.
    Actions { actions: Vec<PendingAction> },
    /// The retried action, if it exists.
    Retried { action: Option<PendingAction> },
    /// Request applied, nothing to report.
    Ok,
    /// Error response.
    Error { message: String },
}

impl BridgeResponse {
    /// Build an error response from anything displayable.
    pub fn error(err: impl std::fmt::Display) -> Self {
        BridgeResponse::Error {
            message: err.to_string(),
        }
    }
}

/// `ordod` status information.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HostStatus {
    /// Current host PID.
    pub pid: u32,
    /// Uptime in seconds.
    pub uptime_secs: u64,
    /// Base URL actions are delivered to.
    pub base_url: String,
    pub auto_sync: bool,
    pub has_auth_token: bool,
    pub state: SyncState,
}

// ============================================================================
// Message framing
// ============================================================================

/// Bridge message framing.
///
/// Messages are framed as:
/// - 4 bytes: message length (big-endian u32)
/// - N bytes: JSON-encoded message
pub mod framing {
    use std::io::{Read, Write};

    use serde::de::DeserializeOwned;
    use serde::Serialize;

    use super::{BridgeRequest, BridgeResponse};

    /// Maximum message size (1MB) to prevent malformed messages from causing hangs.
    pub const MAX_MESSAGE_SIZE: usize = 1024 * 1024;

    /// Write a serializable message to the given writer.
    pub fn write_message<W: Write, T: Serialize>(
        writer: &mut W,
        message: &T,
    ) -> std::io::Result<()> {
        let json = serde_json::to_vec(message)
            .map_err(|e| std::io::Error::other(format!("serialize error: {}", e)))?;
        if json.len() > MAX_MESSAGE_SIZE {
            return Err(std::io::Error::other(format!(
                "message too large: {} bytes (max {})",
                json.len(),
                MAX_MESSAGE_SIZE
            )));
        }
        let len =
            u32::try_from(json.len()).map_err(|_| std::io::Error::other("message too large"))?;
        writer.write_all(&len.to_be_bytes())?;
        writer.write_all(&json)?;
        writer.flush()?;
        Ok(())
    }

    /// Read a deserializable message from the given reader.
    pub fn read_message<R: Read, T: DeserializeOwned>(reader: &mut R) -> std::io::Result<T> {
        let mut len_buf = [0u8; 4];
        reader.read_exact(&mut len_buf)?;
        let len = u32::from_be_bytes(len_buf) as usize;

        if len > MAX_MESSAGE_SIZE {
            return Err(std::io::Error::other(format!(
                "message too large: {} bytes (max {})",
                len, MAX_MESSAGE_SIZE
            )));
        }

        let mut buf = vec![0u8; len];
        reader.read_exact(&mut buf)?;

        serde_json::from_slice(&buf)
            .map_err(|e| std::io::Error::other(format!("deserialize error: {}", e)))
    }

    pub fn read_request<R: Read>(reader: &mut R) -> std::io::Result<BridgeRequest> {
        read_message(reader)
    }

    pub fn write_request<W: Write>(writer: &mut W, request: &BridgeRequest) -> std::io::Result<()> {
        write_message(writer, request)
    }

    pub fn read_response<R: Read>(reader: &mut R) -> std::io::Result<BridgeResponse> {
        read_message(reader)
    }

    pub fn write_response<W: Write>(
        writer: &mut W,
        response: &BridgeResponse,
    ) -> std::io::Result<()> {
        write_message(writer, response)
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
