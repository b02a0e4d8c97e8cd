// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::action::NewAction;
use crate::error::Result;

/// Prefix for every queued action ID.
pub const ACTION_ID_PREFIX: &str = "act";

/// Generate an action ID from the action's identity and enqueue time.
/// Format: act-{hash} where hash is first 8 hex chars of
/// SHA256(method + endpoint + entity + timestamp)
pub fn generate_id(action: &NewAction, created_at: &DateTime<Utc>) -> String {
    let input = format!(
        "{}{}{}{}{}",
        action.method,
        action.endpoint,
        action.entity_type,
        action.entity_id.as_deref().unwrap_or_default(),
        created_at.to_rfc3339()
    );
    let hash = Sha256::digest(input.as_bytes());
    let short_hash = hex::encode(&hash[..4]);
    format!("{}-{}", ACTION_ID_PREFIX, short_hash)
}

/// Generate a unique ID, handling collisions by appending incrementing suffix.
///
/// `exists` is consulted for every candidate; lookup errors propagate.
pub fn generate_unique_id<F>(
    action: &NewAction,
    created_at: &DateTime<Utc>,
    mut exists: F,
) -> Result<String>
where
    F: FnMut(&str) -> Result<bool>,
{
    let base_id = generate_id(action, created_at);

    if !exists(&base_id)? {
        return Ok(base_id);
    }

    let mut suffix = 2;
    loop {
        let id = format!("{}-{}", base_id, suffix);
        if !exists(&id)? {
            return Ok(id);
        }
        suffix += 1;
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
