// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use super::*;
use crate::test_helpers::FakeHost;
use chrono::Utc;
use ordo_core::PendingAction;
use ordo_ipc::{BridgeRequest, BridgeResponse};
use serde_json::json;
use tempfile::TempDir;
use yare::parameterized;

fn args(action_type: ActionType, endpoint: &str) -> QueueArgs {
    QueueArgs {
        action_type,
        endpoint: endpoint.to_string(),
        method: None,
        entity_type: EntityType::Task,
        entity_id: None,
        payload: None,
    }
}

fn pending(id: &str, retry_count: u32) -> PendingAction {
    PendingAction {
        id: id.to_string(),
        action_type: ActionType::Create,
        endpoint: "/tasks".to_string(),
        method: HttpMethod::Post,
        payload: None,
        entity_type: EntityType::Task,
        entity_id: None,
        retry_count,
        max_retries: 3,
        last_error: None,
        created_at: Utc::now(),
    }
}

#[parameterized(
    create = { ActionType::Create, HttpMethod::Post },
    update = { ActionType::Update, HttpMethod::Patch },
    delete = { ActionType::Delete, HttpMethod::Delete },
)]
fn method_follows_action_type(action_type: ActionType, expected: HttpMethod) {
    assert_eq!(default_method(action_type), expected);
}

#[test]
fn explicit_method_wins() {
    let action = build_action(QueueArgs {
        method: Some(HttpMethod::Put),
        ..args(ActionType::Update, "/tasks/t-1")
    })
    .unwrap();
    assert_eq!(action.method, HttpMethod::Put);
}

#[test]
fn delete_drops_payload() {
    let action = build_action(QueueArgs {
        payload: Some(json!({ "ignored": true })),
        entity_id: Some("t-1".into()),
        ..args(ActionType::Delete, "/tasks/t-1")
    })
    .unwrap();
    assert_eq!(action.payload, None);
    assert_eq!(action.entity_id.as_deref(), Some("t-1"));
}

#[test]
fn relative_endpoint_is_rejected_before_sending() {
    let err = build_action(args(ActionType::Create, "tasks")).unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
    assert!(err.to_string().contains("endpoint"));
}

#[test]
fn add_forwards_normalized_action() {
    let dir = TempDir::new().unwrap();
    let host = FakeHost::serve(dir.path(), 1, |_| BridgeResponse::Queued {
        id: "act-1".into(),
    });

    add(
        &host.client(),
        QueueArgs {
            payload: Some(json!({ "title": "X" })),
            ..args(ActionType::Create, " /tasks ")
        },
        OutputFormat::Json,
    )
    .unwrap();

    match host.finish().as_slice() {
        [BridgeRequest::QueueAction { action }] => {
            assert_eq!(action.endpoint, "/tasks");
            assert_eq!(action.method, HttpMethod::Post);
            assert_eq!(action.payload, Some(json!({ "title": "X" })));
        }
        other => panic!("unexpected requests: {other:?}"),
    }
}

#[test]
fn list_requests_failed_only() {
    let dir = TempDir::new().unwrap();
    let host = FakeHost::serve(dir.path(), 1, |_| BridgeResponse::Actions {
        actions: vec![pending("act-1", 3)],
    });

    list(&host.client(), true, OutputFormat::Text).unwrap();

    assert_eq!(
        host.finish(),
        vec![BridgeRequest::ListActions { failed_only: true }]
    );
}

#[test]
fn discard_unknown_action_fails() {
    let dir = TempDir::new().unwrap();
    let host = FakeHost::serve(dir.path(), 1, |_| BridgeResponse::Removed { removed: false });

    let err = discard(&host.client(), "act-missing").unwrap_err();

    assert!(matches!(err, Error::ActionNotFound(id) if id == "act-missing"));
    host.finish();
}

#[test]
fn retry_reports_granted_attempts() {
    let dir = TempDir::new().unwrap();
    let host = FakeHost::serve(dir.path(), 2, |request| match request {
        BridgeRequest::RetryAction { id } if id == "act-1" => BridgeResponse::Retried {
            action: Some(pending("act-1", 3)),
        },
        _ => BridgeResponse::Retried { action: None },
    });
    let client = host.client();

    retry(&client, "act-1").unwrap();
    let err = retry(&client, "act-2").unwrap_err();

    assert!(matches!(err, Error::ActionNotFound(_)));
    assert_eq!(host.finish().len(), 2);
}
