// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connectivity tracking.
//!
//! The monitor holds the current online flag and publishes each change.
//! It never drives a sync itself; the store listens for an offline → online
//! transition and decides whether to drain the queue.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::info;

/// A connectivity change as published by [`ConnectivityMonitor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connectivity {
    pub is_online: bool,
    /// True only for the change that moved offline → online.
    pub was_offline: bool,
}

/// Boxed future returned by [`ConnectivityProbe::probe`].
pub type ProbeFuture<'a> = Pin<Box<dyn Future<Output = bool> + Send + 'a>>;

/// The platform's answer to "are we online right now?".
pub trait ConnectivityProbe: Send + Sync {
    fn probe(&self) -> ProbeFuture<'_>;
}

/// Probe for hosts without a connectivity signal.
#[derive(Debug, Default, Clone, Copy)]
pub struct AssumeOnline;

impl ConnectivityProbe for AssumeOnline {
    fn probe(&self) -> ProbeFuture<'_> {
        Box::pin(async { true })
    }
}

/// Probe that reports online when a TCP connection to the API host opens.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    addr: String,
    timeout: Duration,
}

impl TcpProbe {
    /// Build a probe for the host and port of `url`.
    ///
    /// Returns `None` if the URL has no host.
    pub fn for_url(url: &str, timeout: Duration) -> Option<Self> {
        let parsed = reqwest::Url::parse(url).ok()?;
        let host = parsed.host_str()?;
        let port = parsed.port_or_known_default()?;
        Some(TcpProbe {
            addr: format!("{host}:{port}"),
            timeout,
        })
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }
}

impl ConnectivityProbe for TcpProbe {
    fn probe(&self) -> ProbeFuture<'_> {
        Box::pin(async move {
            matches!(
                tokio::time::timeout(self.timeout, tokio::net::TcpStream::connect(&self.addr))
                    .await,
                Ok(Ok(_))
            )
        })
    }
}

/// Tracks whether the network is reachable.
#[derive(Debug)]
pub struct ConnectivityMonitor {
    tx: watch::Sender<Connectivity>,
}

impl ConnectivityMonitor {
    /// Create a monitor with a known initial state.
    pub fn new(is_online: bool) -> Self {
        let (tx, _rx) = watch::channel(Connectivity {
            is_online,
            was_offline: false,
        });
        ConnectivityMonitor { tx }
    }

    pub fn is_online(&self) -> bool {
        self.tx.borrow().is_online
    }

    pub fn current(&self) -> Connectivity {
        *self.tx.borrow()
    }

    /// Record a connectivity report, publishing it only if the flag changed.
    ///
    /// A repeated report leaves the published value alone, so a pending
    /// offline → online edge is never overwritten before subscribers see it.
    pub fn set_online(&self, is_online: bool) -> Connectivity {
        let mut report = Connectivity {
            is_online,
            was_offline: false,
        };
        self.tx.send_if_modified(|current| {
            if current.is_online == is_online {
                return false;
            }
            info!(is_online, "connectivity changed");
            report.was_offline = is_online;
            *current = report;
            true
        });
        report
    }

    /// Receive published changes.
    pub fn subscribe(&self) -> watch::Receiver<Connectivity> {
        self.tx.subscribe()
    }
}
