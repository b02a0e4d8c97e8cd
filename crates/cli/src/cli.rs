// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use crate::colors;
use crate::help;
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use ordo_core::{ActionType, EntityType, HttpMethod};

/// Parse anything with a `FromStr` impl, keeping its error message.
fn parse_from_str<T>(s: &str) -> Result<T, String>
where
    T: FromStr,
    T::Err: Display,
{
    s.parse().map_err(|e: T::Err| e.to_string())
}

/// Parse a string that must not be empty or whitespace-only.
fn non_empty_string(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("cannot be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}

/// Parse a JSON request body.
fn json_value(s: &str) -> Result<serde_json::Value, String> {
    serde_json::from_str(s).map_err(|e| format!("invalid JSON: {e}"))
}

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "ordo")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(disable_version_flag = true)]
#[command(about = "Offline-first sync queue for Ordo Todo")]
#[command(
    long_about = "Offline-first sync queue for Ordo Todo.\n\n\
    Mutations made without a network are queued on disk and replayed in order \
    by the ordod host once the API is reachable again."
)]
#[command(help_template = help::template())]
#[command(before_help = help::commands())]
#[command(after_help = help::quickstart())]
#[command(styles = help::styles())]
#[allow(clippy::manual_non_exhaustive)]
pub struct Cli {
    /// Data directory holding the queue and host socket
    #[arg(short = 'D', long = "data-dir", global = true, value_name = "path")]
    pub data_dir: Option<PathBuf>,

    /// Print version
    #[arg(short = 'v', short_alias = 'V', long = "version", action = clap::ArgAction::Version)]
    version: (),

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    // ─────────────────────────────────────────────────────────────────────────
    // Offline queue
    // ─────────────────────────────────────────────────────────────────────────
    /// Queue a mutation for delivery
    #[command(after_help = colors::examples("\
Examples:
  ordo queue create /tasks -e task -d '{\"title\":\"X\"}'     Create a task
  ordo queue update /tasks/t-1 -e task -i t-1 -d '{}'    Update a task (PATCH)
  ordo queue update /habits/h-1 -m put -e habit -i h-1   Replace a habit (PUT)
  ordo queue delete /tasks/t-1 -e task -i t-1            Delete a task"))]
    Queue {
        /// Action type (create, update, delete)
        #[arg(value_parser = parse_from_str::<ActionType>)]
        action_type: ActionType,

        /// API path relative to the base URL, e.g. /tasks/t-1
        #[arg(value_parser = non_empty_string)]
        endpoint: String,

        /// HTTP method (defaults to POST, PATCH or DELETE by action type)
        #[arg(long, short, value_parser = parse_from_str::<HttpMethod>)]
        method: Option<HttpMethod>,

        /// Entity type (task, project, comment, timer_session, habit, workspace)
        #[arg(long, short, value_parser = parse_from_str::<EntityType>)]
        entity: EntityType,

        /// Identifier of the entity the action targets
        #[arg(long, short = 'i', value_parser = non_empty_string)]
        entity_id: Option<String>,

        /// JSON request body
        #[arg(long, short, value_name = "JSON", value_parser = json_value)]
        data: Option<serde_json::Value>,

        /// Output format (text, json)
        #[arg(long, short, value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// List queued actions, oldest first
    Pending {
        /// Output format (text, json)
        #[arg(long, short, value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// List actions that reached their retry ceiling
    Failed {
        /// Output format (text, json)
        #[arg(long, short, value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Grant a failed action more delivery attempts
    Retry {
        /// Action ID
        id: String,
    },

    /// Drop a queued action without sending it
    Discard {
        /// Action ID
        id: String,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Sync
    // ─────────────────────────────────────────────────────────────────────────
    /// Drain the queue now
    Sync {
        /// Output format (text, json)
        #[arg(long, short, value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Show connectivity and sync state
    Status {
        /// Output format (text, json)
        #[arg(long, short, value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Mark the host online (syncs if actions are waiting)
    Online,

    /// Mark the host offline
    Offline,

    /// Start or stop periodic syncing
    #[command(subcommand)]
    AutoSync(AutoSyncCommand),

    /// Set or clear the API bearer token
    #[command(subcommand)]
    Token(TokenCommand),

    // ─────────────────────────────────────────────────────────────────────────
    // Host
    // ─────────────────────────────────────────────────────────────────────────
    /// Manage the ordod sync host
    #[command(subcommand)]
    Host(HostCommand),

    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum AutoSyncCommand {
    /// Sync on a fixed interval
    Start {
        /// Interval in milliseconds
        #[arg(default_value_t = 30_000, value_parser = clap::value_parser!(u64).range(1..))]
        interval_ms: u64,
    },

    /// Stop periodic syncing
    Stop,
}

#[derive(Subcommand)]
pub enum TokenCommand {
    /// Use a bearer token for API requests
    Set {
        /// Token value
        #[arg(value_parser = non_empty_string)]
        token: String,
    },

    /// Send requests without a token
    Clear,
}

#[derive(Subcommand)]
pub enum HostCommand {
    /// Start ordod for the data directory
    Start,

    /// Stop the running ordod
    Stop,

    /// Show whether ordod is running
    Status,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
