// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! ordo_cli - Command-line front end for the ordo sync host.
//!
//! The `ordo` binary is a thin UI shell. Every queue and sync command is
//! forwarded over the bridge protocol to the `ordod` process that owns the
//! data directory, which is started on demand.
//!
//! ```rust,ignore
//! use clap::Parser;
//! use ordo_cli::Cli;
//!
//! let cli = Cli::parse_from(["ordo", "offline"]);
//! ordo_cli::run(cli)?;
//! ```

mod cli;
mod colors;
mod commands;
mod display;
mod env;
mod help;
mod host;

pub mod error;

pub use cli::{AutoSyncCommand, Cli, Command, HostCommand, OutputFormat, TokenCommand};
pub use error::{Error, Result};

use clap::CommandFactory;
use clap_complete::generate;

use commands::queue::QueueArgs;
use host::BridgeClient;

/// Execute a parsed command line. This is the main entry point for library
/// users and provides a testable way to run commands without process execution.
pub fn run(cli: Cli) -> Result<()> {
    if let Command::Completion { shell } = cli.command {
        generate(shell, &mut Cli::command(), "ordo", &mut std::io::stdout());
        return Ok(());
    }

    let data_dir = ordo_sync::resolve_data_dir(cli.data_dir.as_deref())?;
    match cli.command {
        Command::Host(HostCommand::Start) => commands::host::start(&data_dir),
        Command::Host(HostCommand::Stop) => commands::host::stop(&data_dir),
        Command::Host(HostCommand::Status) => commands::host::status(&data_dir),
        command => {
            let client = host::ensure_host(&data_dir)?;
            dispatch(&client, command)
        }
    }
}

/// Run a queue or sync command against a connected host.
fn dispatch(client: &BridgeClient, command: Command) -> Result<()> {
    match command {
        Command::Queue {
            action_type,
            endpoint,
            method,
            entity,
            entity_id,
            data,
            output,
        } => commands::queue::add(
            client,
            QueueArgs {
                action_type,
                endpoint,
                method,
                entity_type: entity,
                entity_id,
                payload: data,
            },
            output,
        ),
        Command::Pending { output } => commands::queue::list(client, false, output),
        Command::Failed { output } => commands::queue::list(client, true, output),
        Command::Retry { id } => commands::queue::retry(client, &id),
        Command::Discard { id } => commands::queue::discard(client, &id),
        Command::Sync { output } => commands::sync::sync(client, output),
        Command::Status { output } => commands::sync::status(client, output),
        Command::Online => commands::sync::set_online(client, true),
        Command::Offline => commands::sync::set_online(client, false),
        Command::AutoSync(command) => commands::sync::auto_sync(client, command),
        Command::Token(command) => commands::sync::token(client, command),
        Command::Host(_) | Command::Completion { .. } => Err(Error::InvalidInput(
            "command does not need a running host".to_string(),
        )),
    }
}

#[cfg(test)]
mod test_helpers;

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
