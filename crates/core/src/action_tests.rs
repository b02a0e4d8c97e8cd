// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use serde_json::json;
use yare::parameterized;

#[parameterized(
    create = { "CREATE", ActionType::Create },
    update_lower = { "update", ActionType::Update },
    delete_mixed = { "Delete", ActionType::Delete },
)]
fn action_type_from_str(input: &str, expected: ActionType) {
    assert_eq!(input.parse::<ActionType>().unwrap(), expected);
}

#[parameterized(
    post = { "post", HttpMethod::Post },
    put = { "PUT", HttpMethod::Put },
    patch = { "Patch", HttpMethod::Patch },
    delete = { "DELETE", HttpMethod::Delete },
)]
fn method_from_str(input: &str, expected: HttpMethod) {
    assert_eq!(input.parse::<HttpMethod>().unwrap(), expected);
}

#[test]
fn method_get_is_rejected() {
    let err = "GET".parse::<HttpMethod>().unwrap_err();
    assert!(matches!(err, Error::InvalidMethod(_)));
}

#[parameterized(
    task = { "task", EntityType::Task },
    timer_snake = { "timer_session", EntityType::TimerSession },
    timer_kebab = { "timer-session", EntityType::TimerSession },
    project_upper = { "PROJECT", EntityType::Project },
)]
fn entity_type_from_str(input: &str, expected: EntityType) {
    assert_eq!(input.parse::<EntityType>().unwrap(), expected);
}

#[test]
fn entity_type_serializes_snake_case() {
    let json = serde_json::to_string(&EntityType::TimerSession).unwrap();
    assert_eq!(json, "\"timer_session\"");
}

#[test]
fn method_has_body() {
    assert!(HttpMethod::Post.has_body());
    assert!(HttpMethod::Patch.has_body());
    assert!(!HttpMethod::Delete.has_body());
}

#[test]
fn normalized_drops_delete_payload() {
    let action = NewAction::new(
        ActionType::Delete,
        "/tasks/t-1",
        HttpMethod::Delete,
        EntityType::Task,
    )
    .with_payload(json!({"ignored": true}))
    .normalized()
    .unwrap();

    assert!(action.payload.is_none());
}

#[test]
fn normalized_keeps_post_payload() {
    let action = NewAction::new(ActionType::Create, " /tasks ", HttpMethod::Post, EntityType::Task)
        .with_payload(json!({"title": "X"}))
        .normalized()
        .unwrap();

    assert_eq!(action.endpoint, "/tasks");
    assert_eq!(action.payload, Some(json!({"title": "X"})));
}

#[parameterized(
    empty = { "" },
    absolute_url = { "https://api.example.com/tasks" },
    no_slash = { "tasks" },
)]
fn normalized_rejects_bad_endpoint(endpoint: &str) {
    let err = NewAction::new(ActionType::Create, endpoint, HttpMethod::Post, EntityType::Task)
        .normalized()
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}

#[test]
fn normalized_rejects_zero_retry_ceiling() {
    let err = NewAction::new(ActionType::Create, "/tasks", HttpMethod::Post, EntityType::Task)
        .with_max_retries(0)
        .normalized()
        .unwrap_err();
    assert!(err.to_string().contains("max_retries"));
}

#[test]
fn normalized_clears_blank_entity_id() {
    let action = NewAction::new(ActionType::Update, "/tasks", HttpMethod::Put, EntityType::Task)
        .with_entity_id("  ")
        .normalized()
        .unwrap();
    assert!(action.entity_id.is_none());
}

fn pending(retry_count: u32, entity_id: Option<&str>) -> PendingAction {
    PendingAction {
        id: "act-00000001".to_string(),
        action_type: ActionType::Update,
        endpoint: "/tasks/t-42".to_string(),
        method: HttpMethod::Patch,
        payload: Some(json!({"done": true})),
        entity_type: EntityType::Task,
        entity_id: entity_id.map(String::from),
        retry_count,
        max_retries: 3,
        last_error: None,
        created_at: Utc::now(),
    }
}

#[test]
fn is_exhausted_at_ceiling() {
    assert!(!pending(2, None).is_exhausted());
    assert!(pending(3, None).is_exhausted());
}

#[test]
fn label_includes_entity_id() {
    assert_eq!(pending(0, Some("t-42")).label(), "UPDATE task t-42");
    assert_eq!(pending(0, None).label(), "UPDATE task");
}
