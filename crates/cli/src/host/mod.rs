// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connection to the ordod sync host.
//!
//! The CLI never touches the queue directly. It talks to the ordod process
//! that owns the data directory over a Unix socket, starting it on demand.

mod client;
mod lifecycle;

pub use client::BridgeClient;
pub use lifecycle::{detect_host, ensure_host, get_socket_path, spawn_host, stop_host};


#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod lifecycle_tests;
