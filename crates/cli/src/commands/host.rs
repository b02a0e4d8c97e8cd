// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Host management commands.

use std::path::Path;

use crate::error::Result;
use crate::host;

/// Show whether ordod is running for the data directory.
pub fn status(data_dir: &Path) -> Result<()> {
    match host::detect_host(data_dir) {
        Some(info) => {
            let client = host::BridgeClient::new(host::get_socket_path(data_dir));
            let version = client.hello()?;
            println!("Status: running");
            println!("PID: {}", info.pid);
            println!("Version: {}", version);
        }
        None => println!("Status: not running"),
    }
    println!("Data directory: {}", data_dir.display());
    Ok(())
}

pub fn start(data_dir: &Path) -> Result<()> {
    if let Some(info) = host::detect_host(data_dir) {
        println!("ordod is already running (PID: {})", info.pid);
        return Ok(());
    }
    let info = host::spawn_host(data_dir)?;
    let state = host::BridgeClient::new(host::get_socket_path(data_dir)).initialize()?;
    println!(
        "ordod started (PID: {}, {} pending)",
        info.pid, state.pending_count
    );
    Ok(())
}

pub fn stop(data_dir: &Path) -> Result<()> {
    if host::stop_host(data_dir)? {
        println!("ordod stopped.");
    } else {
        println!("ordod is not running.");
    }
    Ok(())
}
