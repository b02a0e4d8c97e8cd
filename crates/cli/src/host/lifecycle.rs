// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Host lifecycle management: spawn, detect, stop.
//!
//! ordod is spawned as a background process per data directory. Its PID and
//! socket files live next to the queue database.

use std::fs;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use crate::env;
use crate::error::{Error, Result};

use super::BridgeClient;

/// Socket filename within the data directory.
const SOCKET_NAME: &str = "ordod.sock";
/// PID filename within the data directory.
const PID_NAME: &str = "ordod.pid";
/// Name of the host binary.
const HOST_BINARY: &str = "ordod";

/// Information about a running host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostInfo {
    /// Process ID of the host.
    pub pid: u32,
}

/// Get the socket path for the given data directory.
pub fn get_socket_path(data_dir: &Path) -> PathBuf {
    data_dir.join(SOCKET_NAME)
}

fn get_pid_path(data_dir: &Path) -> PathBuf {
    data_dir.join(PID_NAME)
}

/// Detect if a host is running for the given data directory.
///
/// Returns `None` if nothing answers a ping. Stale PID and socket files
/// left by a dead host are removed.
pub fn detect_host(data_dir: &Path) -> Option<HostInfo> {
    let socket_path = get_socket_path(data_dir);
    let pid_path = get_pid_path(data_dir);

    if !socket_path.exists() {
        let _ = fs::remove_file(&pid_path);
        return None;
    }

    if BridgeClient::new(&socket_path).ping().is_err() {
        cleanup_stale_files(data_dir);
        return None;
    }

    // A missing PID file means the host is still starting up.
    read_pid_file(&pid_path).map(|pid| HostInfo { pid })
}

/// Find the ordod binary.
fn find_host_binary() -> PathBuf {
    if let Some(path) = env::host_binary() {
        return path;
    }

    if let Ok(exe) = std::env::current_exe() {
        let sibling = exe.with_file_name(HOST_BINARY);
        if sibling.exists() {
            return sibling;
        }
    }

    PathBuf::from(HOST_BINARY)
}

/// Spawn ordod for the given data directory and wait until it answers.
pub fn spawn_host(data_dir: &Path) -> Result<HostInfo> {
    if let Some(info) = detect_host(data_dir) {
        return Ok(info);
    }

    fs::create_dir_all(data_dir)?;
    let binary = find_host_binary();
    tracing::debug!("spawning {}", binary.display());

    let mut child = Command::new(&binary)
        .arg("--data-dir")
        .arg(data_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| {
            Error::Daemon(format!(
                "failed to start ordod ({}): {}",
                binary.display(),
                e
            ))
        })?;

    // ordod prints READY once its socket is bound.
    if let Some(stdout) = child.stdout.take() {
        for line in BufReader::new(stdout).lines() {
            match line {
                Ok(line) if line == "READY" => break,
                Ok(_) => continue,
                Err(_) => break,
            }
        }
    }

    for _ in 0..150 {
        if let Ok(Some(status)) = child.try_wait() {
            let mut output = String::new();
            if let Some(mut stderr) = child.stderr.take() {
                let _ = stderr.read_to_string(&mut output);
            }
            return Err(Error::Daemon(format!(
                "ordod exited with status: {}\n{}",
                status,
                output.trim()
            )));
        }

        if let Some(info) = detect_host(data_dir) {
            return Ok(info);
        }
        std::thread::sleep(Duration::from_millis(10));
    }

    Err(Error::Daemon(
        "ordod failed to start: could not connect after multiple attempts".to_string(),
    ))
}

/// Return a client for the host of `data_dir`, starting one if needed.
pub fn ensure_host(data_dir: &Path) -> Result<BridgeClient> {
    spawn_host(data_dir)?;
    Ok(BridgeClient::new(get_socket_path(data_dir)))
}

/// Ask the host to shut down and wait for its socket to go away.
///
/// Returns false if no host was running.
pub fn stop_host(data_dir: &Path) -> Result<bool> {
    if detect_host(data_dir).is_none() {
        return Ok(false);
    }

    let socket_path = get_socket_path(data_dir);
    BridgeClient::new(&socket_path).shutdown()?;

    let deadline = Instant::now() + Duration::from_secs(2);
    while socket_path.exists() && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(20));
    }
    Ok(true)
}

fn cleanup_stale_files(data_dir: &Path) {
    let _ = fs::remove_file(get_socket_path(data_dir));
    let _ = fs::remove_file(get_pid_path(data_dir));
}

fn read_pid_file(pid_path: &Path) -> Option<u32> {
    fs::read_to_string(pid_path)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .filter(|pid| *pid > 0)
}
