// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sync and connectivity commands.

use super::{print_json, print_lines};
use crate::cli::{AutoSyncCommand, OutputFormat, TokenCommand};
use crate::display;
use crate::error::Result;
use crate::host::BridgeClient;

pub fn sync(client: &BridgeClient, output: OutputFormat) -> Result<()> {
    let result = client.force_sync()?;
    match output {
        OutputFormat::Text => print_lines(&display::format_sync_result(&result)),
        OutputFormat::Json => print_json(&result)?,
    }
    Ok(())
}

pub fn status(client: &BridgeClient, output: OutputFormat) -> Result<()> {
    let status = client.status()?;
    match output {
        OutputFormat::Text => print_lines(&display::format_host_status(&status)),
        OutputFormat::Json => print_json(&status)?,
    }
    Ok(())
}

/// Report connectivity. Going online drains the queue if it holds anything.
pub fn set_online(client: &BridgeClient, is_online: bool) -> Result<()> {
    let state = client.set_online(is_online)?;
    if is_online {
        println!("Online ({} pending)", state.pending_count);
    } else {
        println!("Offline. Actions will be queued until reconnected.");
    }
    Ok(())
}

pub fn auto_sync(client: &BridgeClient, command: AutoSyncCommand) -> Result<()> {
    match command {
        AutoSyncCommand::Start { interval_ms } => {
            client.start_auto_sync(interval_ms)?;
            println!("Auto-sync every {}ms", interval_ms);
        }
        AutoSyncCommand::Stop => {
            client.stop_auto_sync()?;
            println!("Auto-sync stopped");
        }
    }
    Ok(())
}

pub fn token(client: &BridgeClient, command: TokenCommand) -> Result<()> {
    match command {
        TokenCommand::Set { token } => {
            client.set_auth_token(Some(token))?;
            println!("Token set");
        }
        TokenCommand::Clear => {
            client.set_auth_token(None)?;
            println!("Token cleared");
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
