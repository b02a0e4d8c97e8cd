// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Plain-text rendering of queue and sync state.

use chrono::{DateTime, Utc};
use ordo_core::{PendingAction, SyncResult, SyncState};
use ordo_ipc::HostStatus;

/// Format a millisecond timestamp, or `never`.
pub fn format_sync_time(ms: Option<i64>) -> String {
    match ms.and_then(DateTime::<Utc>::from_timestamp_millis) {
        Some(time) => time.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => "never".to_string(),
    }
}

/// Format one queued action as a single line.
///
/// ```text
/// act-1f3a  UPDATE task t-1  PATCH /tasks/t-1  1/3 attempts: HTTP 500
/// ```
pub fn format_action_line(action: &PendingAction) -> String {
    let mut line = format!(
        "{}  {}  {} {}  {}/{} attempts",
        action.id,
        action.label(),
        action.method,
        action.endpoint,
        action.retry_count,
        action.max_retries
    );
    if let Some(error) = &action.last_error {
        line.push_str(": ");
        line.push_str(error);
    }
    if action.is_exhausted() {
        line.push_str(" (failed)");
    }
    line
}

/// Format a list of actions, one per line.
pub fn format_actions(actions: &[PendingAction], empty: &str) -> Vec<String> {
    if actions.is_empty() {
        return vec![empty.to_string()];
    }
    actions.iter().map(format_action_line).collect()
}

/// Format the observable sync state.
pub fn format_state(state: &SyncState) -> Vec<String> {
    let mut lines = vec![
        format!("Status: {}", state.status),
        format!(
            "Network: {}",
            if state.is_online { "online" } else { "offline" }
        ),
        format!("Pending: {}", state.pending_count),
        format!("Last sync: {}", format_sync_time(state.last_sync_time)),
    ];
    if state.is_syncing {
        let current = state
            .current_action
            .as_ref()
            .map(|c| format!(" ({})", c.label))
            .unwrap_or_default();
        lines.push(format!("Progress: {}%{}", state.sync_progress, current));
    }
    if let Some(error) = &state.last_error {
        lines.push(format!("Last error: {}", error));
    }
    lines
}

/// Format host status followed by its sync state.
pub fn format_host_status(status: &HostStatus) -> Vec<String> {
    let mut lines = vec![
        format!("Host: running (PID: {}, uptime {}s)", status.pid, status.uptime_secs),
        format!("API: {}", status.base_url),
        format!(
            "Auto-sync: {}",
            if status.auto_sync { "on" } else { "off" }
        ),
        format!(
            "Token: {}",
            if status.has_auth_token { "set" } else { "none" }
        ),
    ];
    lines.extend(format_state(&status.state));
    lines
}

/// Summarize a sync run.
pub fn format_sync_result(result: &SyncResult) -> Vec<String> {
    if result == &SyncResult::skipped() {
        return vec!["Sync skipped: offline or already running.".to_string()];
    }
    let mut lines = vec![format!(
        "Synced {} action{}, {} failed.",
        result.synced,
        if result.synced == 1 { "" } else { "s" },
        result.failed
    )];
    for failure in &result.errors {
        lines.push(format!("  {}: {}", failure.action_id, failure.error));
    }
    lines
}

#[cfg(test)]
#[path = "display_tests.rs"]
mod tests;
