// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::test_helpers::FakeHost;
use clap::Parser;
use ordo_ipc::{BridgeRequest, BridgeResponse};
use tempfile::TempDir;

fn command(args: &[&str]) -> Command {
    let mut argv = vec!["ordo"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap().command
}

#[test]
fn dispatch_routes_queue_listing() {
    let dir = TempDir::new().unwrap();
    let host = FakeHost::serve(dir.path(), 2, |_| BridgeResponse::Actions {
        actions: Vec::new(),
    });
    let client = host.client();

    dispatch(&client, command(&["pending"])).unwrap();
    dispatch(&client, command(&["failed", "-o", "json"])).unwrap();

    assert_eq!(
        host.finish(),
        vec![
            BridgeRequest::ListActions { failed_only: false },
            BridgeRequest::ListActions { failed_only: true },
        ]
    );
}

#[test]
fn dispatch_routes_connectivity() {
    let dir = TempDir::new().unwrap();
    let host = FakeHost::serve(dir.path(), 2, |request| match request {
        BridgeRequest::SetOnline { is_online } => {
            let mut state = ordo_core::SyncState::default();
            state.set_online(*is_online);
            BridgeResponse::State(state)
        }
        _ => BridgeResponse::Ok,
    });
    let client = host.client();

    dispatch(&client, command(&["offline"])).unwrap();
    dispatch(&client, command(&["online"])).unwrap();

    assert_eq!(
        host.finish(),
        vec![
            BridgeRequest::SetOnline { is_online: false },
            BridgeRequest::SetOnline { is_online: true },
        ]
    );
}

#[test]
fn dispatch_refuses_host_commands() {
    let dir = TempDir::new().unwrap();
    let client = BridgeClient::new(dir.path().join("ordod.sock"));

    let err = dispatch(&client, command(&["host", "stop"])).unwrap_err();

    assert!(matches!(err, Error::InvalidInput(_)));
}

#[test]
fn host_status_without_host_does_not_spawn() {
    let dir = TempDir::new().unwrap();
    let data_dir = dir.path().to_str().unwrap();

    run(Cli::try_parse_from(["ordo", "--data-dir", data_dir, "host", "status"]).unwrap()).unwrap();
    run(Cli::try_parse_from(["ordo", "--data-dir", data_dir, "host", "stop"]).unwrap()).unwrap();

    assert!(!dir.path().join("ordod.sock").exists());
    assert!(!dir.path().join("ordod.pid").exists());
}

#[test]
fn completion_needs_no_data_dir() {
    run(Cli::try_parse_from(["ordo", "completion", "bash"]).unwrap()).unwrap();
}
