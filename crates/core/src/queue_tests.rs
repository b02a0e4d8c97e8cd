// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for the persistent action queue.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use crate::action::{ActionType, EntityType, HttpMethod};
use chrono::TimeZone;
use serde_json::json;
use tempfile::tempdir;

fn create_task(title: &str) -> NewAction {
    NewAction::new(ActionType::Create, "/tasks", HttpMethod::Post, EntityType::Task)
        .with_payload(json!({ "title": title }))
}

fn update_task(id: &str) -> NewAction {
    NewAction::new(
        ActionType::Update,
        format!("/tasks/{id}"),
        HttpMethod::Patch,
        EntityType::Task,
    )
    .with_entity_id(id)
    .with_payload(json!({ "status": "done" }))
}

#[test]
fn test_add_assigns_id_and_zero_retries() {
    let queue = ActionQueue::open_in_memory().unwrap();
    let id = queue.add(create_task("X")).unwrap();

    assert!(id.starts_with("act-"));
    let action = queue.get(&id).unwrap().unwrap();
    assert_eq!(action.retry_count, 0);
    assert_eq!(action.max_retries, crate::action::DEFAULT_MAX_RETRIES);
    assert_eq!(action.payload, Some(json!({ "title": "X" })));
    assert!(action.last_error.is_none());
}

#[test]
fn test_add_rejects_invalid_action() {
    let queue = ActionQueue::open_in_memory().unwrap();
    let bad = NewAction::new(ActionType::Create, "tasks", HttpMethod::Post, EntityType::Task);
    assert!(queue.add(bad).is_err());
    assert_eq!(queue.count().unwrap(), 0);
}

#[test]
fn test_list_all_preserves_insertion_order() {
    let queue = ActionQueue::open_in_memory().unwrap();
    let first = queue.add(create_task("first")).unwrap();
    let second = queue.add(update_task("t-1")).unwrap();
    let third = queue.add(create_task("third")).unwrap();

    let ids: Vec<String> = queue.list_all().unwrap().into_iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![first, second, third]);
}

#[test]
fn test_same_action_same_instant_gets_distinct_ids() {
    let queue = ActionQueue::open_in_memory().unwrap();
    let at = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap();

    let a = queue.add_at(create_task("X"), at).unwrap();
    let b = queue.add_at(create_task("X"), at).unwrap();

    assert_ne!(a, b);
    assert!(b.ends_with("-2"));
    assert_eq!(queue.count().unwrap(), 2);
}

#[test]
fn test_remove_is_idempotent() {
    let queue = ActionQueue::open_in_memory().unwrap();
    let id = queue.add(create_task("X")).unwrap();

    assert!(queue.remove(&id).unwrap());
    assert!(!queue.remove(&id).unwrap());
    assert!(!queue.remove("act-missing").unwrap());
    assert_eq!(queue.count().unwrap(), 0);
}

#[test]
fn test_count_tracks_adds_and_removes() {
    let queue = ActionQueue::open_in_memory().unwrap();
    assert_eq!(queue.count().unwrap(), 0);

    let a = queue.add(create_task("a")).unwrap();
    queue.add(create_task("b")).unwrap();
    assert_eq!(queue.count().unwrap(), 2);

    queue.remove(&a).unwrap();
    assert_eq!(queue.count().unwrap(), 1);
}

#[test]
fn test_increment_retry_updates_record() {
    let queue = ActionQueue::open_in_memory().unwrap();
    let id = queue.add(create_task("X")).unwrap();

    let updated = queue.increment_retry(&id, "HTTP 500").unwrap().unwrap();
    assert_eq!(updated.retry_count, 1);
    assert_eq!(updated.last_error.as_deref(), Some("HTTP 500"));

    let updated = queue.increment_retry(&id, "connection refused").unwrap().unwrap();
    assert_eq!(updated.retry_count, 2);
    assert_eq!(updated.last_error.as_deref(), Some("connection refused"));
}

#[test]
fn test_increment_retry_on_removed_action_returns_none() {
    let queue = ActionQueue::open_in_memory().unwrap();
    let id = queue.add(create_task("X")).unwrap();
    queue.remove(&id).unwrap();

    assert!(queue.increment_retry(&id, "HTTP 500").unwrap().is_none());
}

#[test]
fn test_failed_lists_exhausted_actions_only() {
    let queue = ActionQueue::open_in_memory().unwrap();
    let stuck = queue.add(create_task("stuck").with_max_retries(1)).unwrap();
    let fine = queue.add(create_task("fine")).unwrap();

    queue.increment_retry(&stuck, "HTTP 422").unwrap();
    queue.increment_retry(&fine, "HTTP 503").unwrap();

    let failed = queue.failed().unwrap();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].id, stuck);
}

#[test]
fn test_grant_retries_raises_ceiling_without_resetting_count() {
    let queue = ActionQueue::open_in_memory().unwrap();
    let id = queue.add(create_task("X").with_max_retries(2)).unwrap();
    queue.increment_retry(&id, "HTTP 500").unwrap();
    queue.increment_retry(&id, "HTTP 500").unwrap();
    assert!(queue.get(&id).unwrap().unwrap().is_exhausted());

    let updated = queue.grant_retries(&id, 3).unwrap().unwrap();
    assert_eq!(updated.retry_count, 2);
    assert_eq!(updated.max_retries, 5);
    assert!(updated.last_error.is_none());
    assert!(!updated.is_exhausted());
}

#[test]
fn test_grant_retries_unknown_or_zero() {
    let queue = ActionQueue::open_in_memory().unwrap();
    assert!(queue.grant_retries("act-missing", 1).unwrap().is_none());

    let id = queue.add(create_task("X")).unwrap();
    assert!(queue.grant_retries(&id, 0).is_err());
}

#[test]
fn test_clear() {
    let queue = ActionQueue::open_in_memory().unwrap();
    queue.add(create_task("a")).unwrap();
    queue.add(create_task("b")).unwrap();

    assert_eq!(queue.clear().unwrap(), 2);
    assert_eq!(queue.count().unwrap(), 0);
}

#[test]
fn test_last_sync_time_roundtrip() {
    let queue = ActionQueue::open_in_memory().unwrap();
    assert!(queue.last_sync_time().unwrap().is_none());

    queue.set_last_sync_time(Some(1_700_000_000_000)).unwrap();
    assert_eq!(queue.last_sync_time().unwrap(), Some(1_700_000_000_000));

    queue.set_last_sync_time(Some(1_700_000_000_500)).unwrap();
    assert_eq!(queue.last_sync_time().unwrap(), Some(1_700_000_000_500));
}

#[test]
fn test_set_last_sync_time_defaults_to_now() {
    let queue = ActionQueue::open_in_memory().unwrap();
    let before = Utc::now().timestamp_millis();
    let stored = queue.set_last_sync_time(None).unwrap();
    assert!(stored >= before);
    assert_eq!(queue.last_sync_time().unwrap(), Some(stored));
}

#[test]
fn test_persistence_across_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("queue.db");

    let id = {
        let queue = ActionQueue::open(&path).unwrap();
        queue.set_last_sync_time(Some(42)).unwrap();
        queue.add(create_task("survives")).unwrap()
    };

    let queue = ActionQueue::open(&path).unwrap();
    let actions = queue.list_all().unwrap();
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].id, id);
    assert_eq!(queue.last_sync_time().unwrap(), Some(42));
}

#[test]
fn test_corrupted_method_is_reported() {
    let queue = ActionQueue::open_in_memory().unwrap();
    let id = queue.add(create_task("X")).unwrap();
    queue
        .conn
        .execute("UPDATE actions SET method = 'GET' WHERE id = ?1", params![id])
        .unwrap();

    assert!(queue.list_all().is_err());
}
