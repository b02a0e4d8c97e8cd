// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Queued mutation types.
//!
//! A [`PendingAction`] is a mutation the client made locally that the remote
//! API has not confirmed yet. Actions are created from a [`NewAction`] when
//! enqueued and carry their delivery history (`retry_count`, `last_error`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Default ceiling of failed delivery attempts before an action is
/// considered permanently failed.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Kind of mutation an action represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    Create,
    Update,
    Delete,
}

impl ActionType {
    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Create => "CREATE",
            ActionType::Update => "UPDATE",
            ActionType::Delete => "DELETE",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ActionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "CREATE" => Ok(ActionType::Create),
            "UPDATE" => Ok(ActionType::Update),
            "DELETE" => Ok(ActionType::Delete),
            _ => Err(Error::InvalidActionType(s.to_string())),
        }
    }
}

/// HTTP method used to replay an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Returns the string representation used in storage and on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Returns true if requests with this method carry a JSON body.
    pub fn has_body(&self) -> bool {
        !matches!(self, HttpMethod::Delete)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "PATCH" => Ok(HttpMethod::Patch),
            "DELETE" => Ok(HttpMethod::Delete),
            _ => Err(Error::InvalidMethod(s.to_string())),
        }
    }
}

/// Domain kind an action targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Task,
    Project,
    Comment,
    TimerSession,
    Habit,
    Workspace,
}

impl EntityType {
    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Task => "task",
            EntityType::Project => "project",
            EntityType::Comment => "comment",
            EntityType::TimerSession => "timer_session",
            EntityType::Habit => "habit",
            EntityType::Workspace => "workspace",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "task" => Ok(EntityType::Task),
            "project" => Ok(EntityType::Project),
            "comment" => Ok(EntityType::Comment),
            "timer_session" | "timersession" => Ok(EntityType::TimerSession),
            "habit" => Ok(EntityType::Habit),
            "workspace" => Ok(EntityType::Workspace),
            _ => Err(Error::InvalidEntityType(s.to_string())),
        }
    }
}

/// The caller-supplied part of an action, before the queue assigns an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAction {
    pub action_type: ActionType,
    pub endpoint: String,
    pub method: HttpMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
    pub entity_type: EntityType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
    pub max_retries: u32,
}

impl NewAction {
    /// Creates a new action with the default retry ceiling.
    pub fn new(
        action_type: ActionType,
        endpoint: impl Into<String>,
        method: HttpMethod,
        entity_type: EntityType,
    ) -> Self {
        NewAction {
            action_type,
            endpoint: endpoint.into(),
            method,
            payload: None,
            entity_type,
            entity_id: None,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Sets the JSON body sent with the request.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Sets the id of the entity the action affects.
    pub fn with_entity_id(mut self, entity_id: impl Into<String>) -> Self {
        self.entity_id = Some(entity_id.into());
        self
    }

    /// Overrides the retry ceiling.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Checks the action is well-formed and strips fields the method ignores.
    ///
    /// DELETE requests never carry a body, so any payload is dropped.
    pub fn normalized(mut self) -> Result<Self> {
        let endpoint = self.endpoint.trim();
        if endpoint.is_empty() {
            return Err(Error::InvalidInput("endpoint cannot be empty".to_string()));
        }
        if !endpoint.starts_with('/') {
            return Err(Error::InvalidInput(format!(
                "endpoint must be a relative path starting with '/': {endpoint}"
            )));
        }
        if self.max_retries == 0 {
            return Err(Error::InvalidInput(
                "max_retries must be at least 1".to_string(),
            ));
        }
        self.endpoint = endpoint.to_string();
        if !self.method.has_body() {
            self.payload = None;
        }
        if let Some(id) = &self.entity_id {
            if id.trim().is_empty() {
                self.entity_id = None;
            }
        }
        Ok(self)
    }
}

/// A queued mutation awaiting confirmation by the remote API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingAction {
    pub id: String,
    pub action_type: ActionType,
    pub endpoint: String,
    pub method: HttpMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
    pub entity_type: EntityType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
    pub retry_count: u32,
    pub max_retries: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl PendingAction {
    /// Returns true once the action has used up its delivery attempts.
    pub fn is_exhausted(&self) -> bool {
        self.retry_count >= self.max_retries
    }

    /// Short human-readable label, e.g. `UPDATE task t-42`.
    pub fn label(&self) -> String {
        match &self.entity_id {
            Some(id) => format!("{} {} {}", self.action_type, self.entity_type, id),
            None => format!("{} {}", self.action_type, self.entity_type),
        }
    }
}

#[cfg(test)]
#[path = "action_tests.rs"]
mod tests;
