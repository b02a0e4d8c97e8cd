// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for CLI tests.

#![allow(clippy::unwrap_used)]

use std::os::unix::net::UnixListener;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use crate::host::BridgeClient;
use ordo_ipc::{framing, BridgeRequest, BridgeResponse};

/// A stand-in for ordod that answers a fixed number of connections.
pub struct FakeHost {
    pub socket_path: PathBuf,
    pub received: Arc<Mutex<Vec<BridgeRequest>>>,
    handle: Option<JoinHandle<()>>,
}

impl FakeHost {
    pub fn serve<F>(dir: &Path, connections: usize, respond: F) -> Self
    where
        F: Fn(&BridgeRequest) -> BridgeResponse + Send + 'static,
    {
        let socket_path = dir.join("ordod.sock");
        let listener = UnixListener::bind(&socket_path).unwrap();
        let received = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&received);
        let handle = std::thread::spawn(move || {
            for stream in listener.incoming().take(connections) {
                let mut stream = stream.unwrap();
                let request = framing::read_request(&mut stream).unwrap();
                let response = respond(&request);
                log.lock().unwrap().push(request);
                framing::write_response(&mut stream, &response).unwrap();
            }
        });
        FakeHost {
            socket_path,
            received,
            handle: Some(handle),
        }
    }

    pub fn client(&self) -> BridgeClient {
        BridgeClient::new(&self.socket_path)
    }

    /// Wait for the scripted connections to finish and return what arrived.
    pub fn finish(mut self) -> Vec<BridgeRequest> {
        if let Some(handle) = self.handle.take() {
            handle.join().unwrap();
        }
        self.received.lock().unwrap().clone()
    }
}
