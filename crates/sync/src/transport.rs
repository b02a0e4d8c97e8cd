// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Transport abstraction for replaying actions against the remote API.
//!
//! Provides a trait-based transport layer that enables:
//! - Real HTTP delivery for production ([`HttpTransport`])
//! - Mock transports for unit testing

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use ordo_core::{HttpMethod, PendingAction};
use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};

/// Error type for transport operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The request never got a response (DNS, refused, timeout, TLS).
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// The request could not be built.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// One HTTP call derived from a queued action.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub endpoint: String,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    /// Build the request that replays `action`.
    ///
    /// Only methods that carry a body send the payload.
    pub fn from_action(action: &PendingAction) -> Self {
        ApiRequest {
            method: action.method,
            endpoint: action.endpoint.clone(),
            body: if action.method.has_body() {
                action.payload.clone()
            } else {
                None
            },
        }
    }
}

/// Boxed future returned by [`Transport::send`].
pub type SendFuture<'a> = Pin<Box<dyn Future<Output = TransportResult<u16>> + Send + 'a>>;

/// Transport trait for delivering queued actions.
///
/// This trait abstracts over the actual transport mechanism, allowing
/// for easy testing with mock implementations.
pub trait Transport: Send + Sync {
    /// Deliver a request, authenticating with `token` when present.
    ///
    /// Resolves to the 2xx status code on success.
    fn send<'a>(&'a self, request: &'a ApiRequest, token: Option<&'a str>) -> SendFuture<'a>;
}

/// Default timeout for API requests.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HTTP transport implementation using reqwest.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a transport for the API rooted at `base_url`.
    ///
    /// Cookies returned by the API are kept and resent, so session-cookie
    /// authentication works alongside bearer tokens.
    pub fn new(base_url: &str, timeout: Duration) -> TransportResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .build()
            .map_err(|e| TransportError::InvalidRequest(format!("failed to build client: {e}")))?;

        Ok(HttpTransport {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// The API base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }
}

fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

impl Transport for HttpTransport {
    fn send<'a>(&'a self, request: &'a ApiRequest, token: Option<&'a str>) -> SendFuture<'a> {
        Box::pin(async move {
            let url = self.url_for(&request.endpoint);
            let mut builder = self
                .client
                .request(to_reqwest_method(request.method), &url)
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));

            if let Some(token) = token {
                let value = HeaderValue::from_str(&format!("Bearer {token}"))
                    .map_err(|_| TransportError::InvalidRequest("invalid auth token".into()))?;
                builder = builder.header(AUTHORIZATION, value);
            }

            if let Some(body) = &request.body {
                let bytes = serde_json::to_vec(body)
                    .map_err(|e| TransportError::Serialization(e.to_string()))?;
                builder = builder.body(bytes);
            }

            let response = builder
                .send()
                .await
                .map_err(|e| TransportError::Network(e.to_string()))?;

            let status = response.status();
            if status.is_success() {
                tracing::debug!("{} {} -> {}", request.method, url, status.as_u16());
                return Ok(status.as_u16());
            }

            // An unreadable error body still carries the status.
            let body = response.text().await.unwrap_or_default();
            Err(TransportError::Http {
                status: status.as_u16(),
                message: error_message(status.as_u16(), &body),
            })
        })
    }
}

/// Extract a human-readable error from a non-2xx response body.
///
/// Uses the JSON `message` field (a string, or a list of strings joined with
/// `", "`), falling back to `HTTP <status>`.
pub fn error_message(status: u16, body: &str) -> String {
    let fallback = || format!("HTTP {status}");

    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return fallback();
    };

    match value.get("message") {
        Some(serde_json::Value::String(msg)) if !msg.trim().is_empty() => msg.clone(),
        Some(serde_json::Value::Array(items)) => {
            let parts: Vec<&str> = items
                .iter()
                .filter_map(|item| item.as_str())
                .filter(|s| !s.trim().is_empty())
                .collect();
            if parts.is_empty() {
                fallback()
            } else {
                parts.join(", ")
            }
        }
        _ => fallback(),
    }
}
