// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! ordod - The ordo sync host.
//!
//! Owns the offline action queue and the sync engine for one data directory.
//! Listens on a Unix socket for bridge requests from `ordo` and other UI
//! shells, re-probes the API host on an interval, and drains the queue
//! whenever connectivity returns.
//!
//! Usage:
//!   ordod --data-dir <path>

use std::fs;
use std::io::Write;
use std::os::unix::net::UnixListener;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use ordo_ipc::{framing, BridgeResponse};
use ordo_sync::{AssumeOnline, ConnectivityProbe, SyncConfig, SyncStore, TcpProbe};

mod host;

use host::Host;

/// Socket filename within the data directory.
const SOCKET_NAME: &str = "ordod.sock";
/// PID filename within the data directory.
const PID_NAME: &str = "ordod.pid";
/// Lock filename for single instance guarantee.
const LOCK_NAME: &str = "ordod.lock";
/// Log filename within the data directory.
const LOG_NAME: &str = "ordod.log";

/// How long one connectivity probe may take.
const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let data_dir = match ordo_sync::resolve_data_dir(parse_data_dir(&args).as_deref()) {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("ordod: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = fs::create_dir_all(&data_dir) {
        eprintln!("ordod: failed to create {}: {e}", data_dir.display());
        std::process::exit(1);
    }

    setup_logging(&data_dir.join(LOG_NAME));

    tracing::info!("ordod starting, data_dir={}", data_dir.display());

    // Acquire file lock for single instance
    let lock_path = data_dir.join(LOCK_NAME);
    let lock_file = match acquire_lock(&lock_path) {
        Ok(f) => f,
        Err(e) => {
            tracing::error!("failed to acquire lock: {}", e);
            std::process::exit(1);
        }
    };

    let pid_path = data_dir.join(PID_NAME);
    if let Err(e) = write_pid_file(&pid_path) {
        tracing::error!("failed to write PID file: {}", e);
        std::process::exit(1);
    }

    let socket_path = data_dir.join(SOCKET_NAME);
    let code = match run(&data_dir, &socket_path) {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!("{}", e);
            1
        }
    };

    cleanup(&pid_path, &socket_path);
    drop(lock_file);
    tracing::info!("ordod stopped");
    std::process::exit(code);
}

fn run(data_dir: &Path, socket_path: &Path) -> Result<(), String> {
    let config = SyncConfig::load_or_default(data_dir).map_err(|e| e.to_string())?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to start runtime: {e}"))?;

    let store = SyncStore::open(data_dir, &config).map_err(|e| e.to_string())?;

    let probe = connectivity_probe(&config.base_url);
    runtime
        .block_on(async {
            // Background tasks spawned here keep running on the runtime.
            store.attach_monitor();
            let is_online = store.check_connectivity(probe.as_ref()).await;
            tracing::info!(is_online, "initial connectivity");

            if let Some(interval) = config.connectivity_check_interval() {
                store.watch_connectivity(Arc::clone(&probe), interval)?;
            }
            match config.auto_sync_interval() {
                Some(interval) => store.start_auto_sync(interval),
                None => Ok(()),
            }
        })
        .map_err(|e| e.to_string())?;

    let host = Host::new(store, config.base_url.clone());

    // Remove stale socket if it exists
    let _ = fs::remove_file(socket_path);
    let listener = UnixListener::bind(socket_path)
        .map_err(|e| format!("failed to bind socket: {e}"))?;

    tracing::info!("listening on {}", socket_path.display());

    // Signal readiness to parent process
    println!("READY");
    let _ = std::io::stdout().flush();

    for stream in listener.incoming() {
        match stream {
            Ok(mut stream) => {
                let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
                let _ = stream.set_write_timeout(Some(Duration::from_secs(5)));

                match framing::read_request(&mut stream) {
                    Ok(request) => {
                        tracing::debug!("request: {:?}", request);
                        let response = runtime.block_on(host.handle(request));
                        let should_shutdown = matches!(response, BridgeResponse::ShuttingDown);
                        if let Err(e) = framing::write_response(&mut stream, &response) {
                            tracing::warn!("failed to write response: {}", e);
                        }
                        if should_shutdown {
                            tracing::info!("shutting down");
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::warn!("failed to read request: {}", e);
                    }
                }
            }
            Err(e) => {
                tracing::warn!("failed to accept connection: {}", e);
            }
        }
    }

    host.store().shutdown();
    Ok(())
}

/// Probe the API host, or assume online when the URL names no host.
fn connectivity_probe(base_url: &str) -> Arc<dyn ConnectivityProbe> {
    match TcpProbe::for_url(base_url, PROBE_TIMEOUT) {
        Some(probe) => Arc::new(probe),
        None => {
            tracing::warn!("no host in {base_url}, assuming online");
            Arc::new(AssumeOnline)
        }
    }
}

fn parse_data_dir(args: &[String]) -> Option<PathBuf> {
    args.iter()
        .position(|arg| arg == "--data-dir")
        .and_then(|i| args.get(i + 1))
        .map(PathBuf::from)
}

fn setup_logging(log_path: &Path) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Try to open log file, fall back to stderr
    if let Ok(file) = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
    {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(file)
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn acquire_lock(lock_path: &Path) -> std::io::Result<fs::File> {
    use fs2::FileExt;

    let file = fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(lock_path)?;
    file.try_lock_exclusive()
        .map_err(|_| std::io::Error::other("another ordod instance is already running"))?;
    Ok(file)
}

fn write_pid_file(pid_path: &Path) -> std::io::Result<()> {
    fs::write(pid_path, format!("{}", std::process::id()))
}

fn cleanup(pid_path: &Path, socket_path: &Path) {
    let _ = fs::remove_file(pid_path);
    let _ = fs::remove_file(socket_path);
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
