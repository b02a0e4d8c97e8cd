// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for bridge protocol types and framing.

#![allow(clippy::unwrap_used)]

use std::io::Cursor;

use chrono::Utc;
use ordo_core::{
    ActionType, EntityType, HttpMethod, NewAction, PendingAction, SyncResult, SyncState,
    SyncStatus,
};
use serde_json::json;

use super::*;
use yare::parameterized;

fn pending() -> PendingAction {
    PendingAction {
        id: "act-1a2b3c4d".to_string(),
        action_type: ActionType::Update,
        endpoint: "/tasks/t-1".to_string(),
        method: HttpMethod::Patch,
        payload: Some(json!({ "status": "done" })),
        entity_type: EntityType::Task,
        entity_id: Some("t-1".to_string()),
        retry_count: 1,
        max_retries: 3,
        last_error: Some("HTTP 500".to_string()),
        created_at: Utc::now(),
    }
}

fn syncing_state() -> SyncState {
    SyncState {
        status: SyncStatus::Syncing,
        is_syncing: true,
        pending_count: 2,
        sync_progress: 50,
        ..SyncState::default()
    }
}

#[parameterized(
    ping = { BridgeRequest::Ping },
    hello = { BridgeRequest::Hello { version: "0.1.0".to_string() } },
    initialize = { BridgeRequest::Initialize },
    force_sync = { BridgeRequest::ForceSync },
    set_token = { BridgeRequest::SetAuthToken { token: Some("tok".to_string()) } },
    clear_token = { BridgeRequest::SetAuthToken { token: None } },
    start_auto = { BridgeRequest::StartAutoSync { interval_ms: 30_000 } },
    set_online = { BridgeRequest::SetOnline { is_online: false } },
    queue = { BridgeRequest::QueueAction { action: NewAction::new(ActionType::Create, "/tasks", HttpMethod::Post, EntityType::Task).with_payload(json!({ "title": "X" })) } },
    list_failed = { BridgeRequest::ListActions { failed_only: true } },
    retry = { BridgeRequest::RetryAction { id: "act-1".to_string() } },
)]
fn bridge_request_serialization(request: BridgeRequest) {
    let json = serde_json::to_string(&request).unwrap();
    let parsed: BridgeRequest = serde_json::from_str(&json).unwrap();
    assert_eq!(request, parsed);
}

#[parameterized(
    state = { BridgeResponse::State(syncing_state()) },
    synced = { BridgeResponse::Synced(SyncResult::empty()) },
    actions = { BridgeResponse::Actions { actions: vec![pending()] } },
    retried_none = { BridgeResponse::Retried { action: None } },
    error = { BridgeResponse::Error { message: "test error".to_string() } },
)]
fn bridge_response_serialization(response: BridgeResponse) {
    let json = serde_json::to_string(&response).unwrap();
    let parsed: BridgeResponse = serde_json::from_str(&json).unwrap();
    assert_eq!(response, parsed);
}

#[test]
fn request_wire_format_is_tagged() {
    let json = serde_json::to_value(BridgeRequest::StartAutoSync { interval_ms: 5000 }).unwrap();
    assert_eq!(json, json!({ "type": "StartAutoSync", "interval_ms": 5000 }));
}

#[test]
fn list_actions_defaults_to_all() {
    let parsed: BridgeRequest = serde_json::from_str(r#"{"type":"ListActions"}"#).unwrap();
    assert_eq!(parsed, BridgeRequest::ListActions { failed_only: false });
}

#[test]
fn status_carries_state() {
    let status = HostStatus {
        pid: 42,
        uptime_secs: 7,
        base_url: "http://localhost:3001/api/v1".to_string(),
        auto_sync: true,
        has_auth_token: false,
        state: syncing_state(),
    };
    let json = serde_json::to_string(&BridgeResponse::Status(status.clone())).unwrap();
    let parsed: BridgeResponse = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, BridgeResponse::Status(status));
}

#[test]
fn error_helper_uses_display() {
    assert_eq!(
        BridgeResponse::error("queue error: boom"),
        BridgeResponse::Error {
            message: "queue error: boom".to_string()
        }
    );
}

#[test]
fn framing_request_then_response() {
    let mut buf = Vec::new();
    framing::write_request(&mut buf, &BridgeRequest::ForceSync).unwrap();
    framing::write_response(&mut buf, &BridgeResponse::Synced(SyncResult::skipped())).unwrap();

    let mut cursor = Cursor::new(buf);
    assert_eq!(
        framing::read_request(&mut cursor).unwrap(),
        BridgeRequest::ForceSync
    );
    assert_eq!(
        framing::read_response(&mut cursor).unwrap(),
        BridgeResponse::Synced(SyncResult::skipped())
    );
}

#[test]
fn framing_length_prefix_is_big_endian() {
    let mut buf = Vec::new();
    framing::write_request(&mut buf, &BridgeRequest::Ping).unwrap();
    let body = br#"{"type":"Ping"}"#;
    assert_eq!(&buf[..4], &(body.len() as u32).to_be_bytes());
    assert_eq!(&buf[4..], body);
}

#[test]
fn framing_rejects_oversized_message() {
    let mut buf = Vec::new();
    buf.extend_from_slice(&((framing::MAX_MESSAGE_SIZE as u32) + 1).to_be_bytes());
    let mut cursor = Cursor::new(buf);
    let err = framing::read_request(&mut cursor).unwrap_err();
    assert!(err.to_string().contains("message too large"));
}

#[test]
fn framing_truncated_message_is_error() {
    let mut buf = Vec::new();
    buf.extend_from_slice(&100u32.to_be_bytes());
    buf.extend_from_slice(b"{\"type\"");
    let mut cursor = Cursor::new(buf);
    assert!(framing::read_request(&mut cursor).is_err());
}

#[test]
fn framing_invalid_json_is_error() {
    let body = b"not json";
    let mut buf = Vec::new();
    buf.extend_from_slice(&(body.len() as u32).to_be_bytes());
    buf.extend_from_slice(body);
    let mut cursor = Cursor::new(buf);
    let err = framing::read_request(&mut cursor).unwrap_err();
    assert!(err.to_string().contains("deserialize error"));
}
