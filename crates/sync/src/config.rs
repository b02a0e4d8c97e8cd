// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sync configuration and on-disk layout.
//!
//! Configuration lives in `<data_dir>/config.toml`. Every field has a
//! default, so a missing or partial file is valid:
//! - `base_url`: API root that action endpoints are appended to
//! - `max_retries`: delivery attempts before an action is reported failed
//! - `request_timeout_secs`: per-request HTTP timeout
//! - `auto_sync_interval_ms`: periodic sync interval, 0 to disable
//! - `connectivity_check_interval_ms`: how often the host re-probes the API,
//!   0 to disable
//! - `auth_token`: bearer token sent with every request

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ordo_core::DEFAULT_MAX_RETRIES;

use crate::error::{Result, SyncError};
use crate::transport::DEFAULT_TIMEOUT_SECS;

pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const QUEUE_FILE_NAME: &str = "queue.db";
pub const STATE_FILE_NAME: &str = "sync_state.json";
const APP_DIR_NAME: &str = "ordo";

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "ORDO_DATA_DIR";

pub const DEFAULT_BASE_URL: &str = "http://localhost:3001/api/v1";

pub const DEFAULT_CONNECTIVITY_CHECK_INTERVAL_MS: u64 = 15_000;

/// Sync configuration stored in `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// 0 = disabled.
    #[serde(default)]
    pub auto_sync_interval_ms: u64,
    /// 0 = disabled.
    #[serde(default = "default_connectivity_check_interval_ms")]
    pub connectivity_check_interval_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_connectivity_check_interval_ms() -> u64 {
    DEFAULT_CONNECTIVITY_CHECK_INTERVAL_MS
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            base_url: default_base_url(),
            max_retries: default_max_retries(),
            request_timeout_secs: default_request_timeout_secs(),
            auto_sync_interval_ms: 0,
            connectivity_check_interval_ms: default_connectivity_check_interval_ms(),
            auth_token: None,
        }
    }
}

impl SyncConfig {
    /// Load the config from `<data_dir>/config.toml`.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(CONFIG_FILE_NAME);
        let content = fs::read_to_string(&path)?;
        let config: SyncConfig = toml::from_str(&content)
            .map_err(|e| SyncError::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Load the config, or return defaults if the file does not exist.
    pub fn load_or_default(data_dir: &Path) -> Result<Self> {
        if data_dir.join(CONFIG_FILE_NAME).exists() {
            Self::load(data_dir)
        } else {
            Ok(Self::default())
        }
    }

    /// Write the config to `<data_dir>/config.toml`.
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        fs::create_dir_all(data_dir)?;
        let content =
            toml::to_string_pretty(self).map_err(|e| SyncError::Config(e.to_string()))?;
        fs::write(data_dir.join(CONFIG_FILE_NAME), content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let url = self.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(SyncError::Config(format!(
                "base_url must start with http:// or https://: {url}"
            )));
        }
        if self.max_retries == 0 {
            return Err(SyncError::Config(
                "max_retries must be at least 1".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(SyncError::Config(
                "request_timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// The periodic sync interval, or `None` when disabled.
    pub fn auto_sync_interval(&self) -> Option<Duration> {
        (self.auto_sync_interval_ms > 0).then(|| Duration::from_millis(self.auto_sync_interval_ms))
    }

    /// The connectivity re-probe interval, or `None` when disabled.
    pub fn connectivity_check_interval(&self) -> Option<Duration> {
        (self.connectivity_check_interval_ms > 0)
            .then(|| Duration::from_millis(self.connectivity_check_interval_ms))
    }
}

/// Resolve the data directory.
///
/// Order: the explicit path, then `ORDO_DATA_DIR`, then the platform's local
/// data directory joined with `ordo`.
pub fn resolve_data_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    dirs::data_local_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or_else(|| SyncError::Config("could not determine a data directory".to_string()))
}
