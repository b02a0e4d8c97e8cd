// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! ordo-sync: Offline-first sync core.
//!
//! Mutations made while offline are queued on disk and replayed against the
//! remote API, in order, once connectivity returns.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │    Store    │────►│   Engine    │────►│  Transport  │────► Remote API
//! │ (SyncStore) │     │(SyncEngine) │     │   (trait)   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!    │      ▲                │
//!    │      │                ▼
//!    │ ┌─────────────┐ ┌─────────────┐
//!    │ │   Monitor   │ │    Queue    │  (SQLite, survives restarts)
//!    │ │(online flag)│ │(ActionQueue)│
//!    │ └─────────────┘ └─────────────┘
//!    ▼
//!  SyncState (watch) + SyncEvent (broadcast)
//! ```
//!
//! # Features
//!
//! - Durable FIFO queue of pending HTTP mutations
//! - Single-flight drains with per-action retry ceilings
//! - Automatic sync on reconnect and on an optional interval
//! - Observable state for UI badges and progress
//! - Injectable transport trait for testing

pub mod config;
pub mod engine;
mod error;
pub mod events;
pub mod monitor;
pub mod shared;
pub mod store;
pub mod transport;

pub use config::{resolve_data_dir, SyncConfig};
pub use engine::SyncEngine;
pub use error::{Result, SyncError};
pub use events::{EventBus, SyncEvent};
pub use monitor::{AssumeOnline, Connectivity, ConnectivityMonitor, ConnectivityProbe, TcpProbe};
pub use store::{StoreOptions, SyncStore};
pub use transport::{ApiRequest, HttpTransport, Transport, TransportError};

#[cfg(test)]
mod test_helpers;
