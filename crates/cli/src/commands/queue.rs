// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Offline queue commands.

use ordo_core::{ActionType, EntityType, HttpMethod, NewAction};
use serde::Serialize;

use super::{print_json, print_lines};
use crate::cli::OutputFormat;
use crate::display;
use crate::error::{Error, Result};
use crate::host::BridgeClient;

/// Arguments of `ordo queue`.
#[derive(Debug, Clone)]
pub struct QueueArgs {
    pub action_type: ActionType,
    pub endpoint: String,
    pub method: Option<HttpMethod>,
    pub entity_type: EntityType,
    pub entity_id: Option<String>,
    pub payload: Option<serde_json::Value>,
}

#[derive(Serialize)]
struct Queued<'a> {
    id: &'a str,
}

/// Method implied by an action type when none is given.
pub fn default_method(action_type: ActionType) -> HttpMethod {
    match action_type {
        ActionType::Create => HttpMethod::Post,
        ActionType::Update => HttpMethod::Patch,
        ActionType::Delete => HttpMethod::Delete,
    }
}

/// Build the action to queue. Validation happens here so a malformed
/// action never reaches the host.
pub fn build_action(args: QueueArgs) -> Result<NewAction> {
    let method = args
        .method
        .unwrap_or_else(|| default_method(args.action_type));
    let mut action = NewAction::new(args.action_type, args.endpoint, method, args.entity_type);
    if let Some(entity_id) = args.entity_id {
        action = action.with_entity_id(entity_id);
    }
    if let Some(payload) = args.payload {
        action = action.with_payload(payload);
    }
    Ok(action.normalized()?)
}

pub fn add(client: &BridgeClient, args: QueueArgs, output: OutputFormat) -> Result<()> {
    let action = build_action(args)?;
    let id = client.queue_action(action)?;
    match output {
        OutputFormat::Text => println!("Queued {}", id),
        OutputFormat::Json => print_json(&Queued { id: &id })?,
    }
    Ok(())
}

pub fn list(client: &BridgeClient, failed_only: bool, output: OutputFormat) -> Result<()> {
    let actions = client.list_actions(failed_only)?;
    match output {
        OutputFormat::Text => {
            let empty = if failed_only {
                "No failed actions."
            } else {
                "Queue is empty."
            };
            print_lines(&display::format_actions(&actions, empty));
        }
        OutputFormat::Json => print_json(&actions)?,
    }
    Ok(())
}

pub fn retry(client: &BridgeClient, id: &str) -> Result<()> {
    let action = client
        .retry_action(id)?
        .ok_or_else(|| Error::ActionNotFound(id.to_string()))?;
    println!(
        "Retrying {} ({}/{} attempts)",
        action.id, action.retry_count, action.max_retries
    );
    Ok(())
}

pub fn discard(client: &BridgeClient, id: &str) -> Result<()> {
    if !client.remove_action(id)? {
        return Err(Error::ActionNotFound(id.to_string()));
    }
    println!("Discarded {}", id);
    Ok(())
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
