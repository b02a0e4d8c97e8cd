// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use std::fs;

use super::lifecycle::HostInfo;
use super::*;
use crate::test_helpers::FakeHost;
use ordo_ipc::{BridgeRequest, BridgeResponse};
use tempfile::TempDir;

#[test]
fn socket_lives_in_data_dir() {
    let dir = TempDir::new().unwrap();
    assert_eq!(get_socket_path(dir.path()), dir.path().join("ordod.sock"));
}

#[test]
fn detect_without_socket_removes_stale_pid() {
    let dir = TempDir::new().unwrap();
    let pid_path = dir.path().join("ordod.pid");
    fs::write(&pid_path, "4242").unwrap();

    assert_eq!(detect_host(dir.path()), None);
    assert!(!pid_path.exists());
}

#[test]
fn detect_with_dead_socket_cleans_up() {
    let dir = TempDir::new().unwrap();
    let socket_path = get_socket_path(dir.path());
    // A plain file where the socket should be: nothing can answer.
    fs::write(&socket_path, "").unwrap();
    fs::write(dir.path().join("ordod.pid"), "4242").unwrap();

    assert_eq!(detect_host(dir.path()), None);
    assert!(!socket_path.exists());
    assert!(!dir.path().join("ordod.pid").exists());
}

#[test]
fn detect_live_host_reads_pid() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("ordod.pid"), "4242\n").unwrap();
    let host = FakeHost::serve(dir.path(), 1, |_| BridgeResponse::Pong);

    assert_eq!(detect_host(dir.path()), Some(HostInfo { pid: 4242 }));
    assert_eq!(host.finish(), vec![BridgeRequest::Ping]);
}

#[test]
fn stop_without_host_reports_not_running() {
    let dir = TempDir::new().unwrap();
    assert!(!stop_host(dir.path()).unwrap());
}

#[test]
fn stop_sends_shutdown() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("ordod.pid"), "4242").unwrap();
    let host = FakeHost::serve(dir.path(), 2, |request| match request {
        BridgeRequest::Shutdown => BridgeResponse::ShuttingDown,
        _ => BridgeResponse::Pong,
    });
    let socket_path = host.socket_path.clone();
    let stopped = std::thread::spawn({
        let dir = dir.path().to_path_buf();
        move || stop_host(&dir).unwrap()
    });

    let received = host.finish();
    // The fake host does not remove its socket; ordod does on exit.
    fs::remove_file(&socket_path).unwrap();

    assert!(stopped.join().unwrap());
    assert_eq!(received, vec![BridgeRequest::Ping, BridgeRequest::Shutdown]);
}
