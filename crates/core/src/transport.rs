//! HTTP transport behind a trait
//!
//! The executor only sees [`Transport`]: issue one GET, return status plus body
//! text, or a [`TransportError`]. [`HttpTransport`] is the reqwest implementation;
//! tests drive the executor with scripted doubles.

use std::error::Error as StdError;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use thiserror::Error;

use crate::config::BenchConfig;
use crate::error::{NetBenchError, Result};

/// User agent sent on every attempt
pub const USER_AGENT_VALUE: &str = "NetBench/1.0";

/// Headers sent on every attempt, in wire order
pub const REQUEST_HEADERS: [(&str, &str); 3] = [
    ("User-Agent", USER_AGENT_VALUE),
    ("Cache-Control", "no-cache"),
    ("Accept", "application/json"),
];

/// A received response: status and body text, read regardless of status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Normalised low-level failure of a single attempt
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("request cancelled")]
    Cancelled,

    /// Connect, send or receive deadline expired
    #[error("timed out: {0}")]
    Timeout(String),

    /// Connection refused, DNS failure, unreachable host
    #[error("connect failed: {0}")]
    Connect(String),

    /// Socket error after the connection was established
    #[error("i/o error: {0}")]
    Io(String),

    /// Response body could not be decoded
    #[error("decode failed: {0}")]
    Decode(String),

    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let message = err.to_string();
        if err.is_timeout() {
            TransportError::Timeout(message)
        } else if err.is_connect() {
            TransportError::Connect(message)
        } else if err.is_decode() {
            TransportError::Decode(message)
        } else if has_io_source(&err) || err.is_body() || err.is_request() {
            TransportError::Io(message)
        } else {
            TransportError::Other(message)
        }
    }
}

/// Walk the source chain looking for a socket-level error
fn has_io_source(err: &(dyn StdError + 'static)) -> bool {
    let mut source = err.source();
    while let Some(cause) = source {
        if cause.is::<std::io::Error>() {
            return true;
        }
        source = cause.source();
    }
    false
}

/// [`REQUEST_HEADERS`] as a header map
fn request_headers() -> Result<HeaderMap> {
    let mut headers = HeaderMap::with_capacity(REQUEST_HEADERS.len());
    for (name, value) in REQUEST_HEADERS {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| NetBenchError::transport(format!("invalid header name {name}: {e}")))?;
        headers.insert(name, HeaderValue::from_static(value));
    }
    Ok(headers)
}

/// Issues GET requests for one run
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one GET against `path` and read the whole body
    async fn get(&self, path: &str) -> std::result::Result<RawResponse, TransportError>;
}

/// Builds one transport per run from its configuration
pub trait TransportFactory: Send + Sync {
    type Transport: Transport;

    fn build(&self, config: &BenchConfig) -> Result<Self::Transport>;
}

/// reqwest-backed transport; owns one client for the lifetime of a run
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Build a client with the configured timeouts and fixed request headers
    pub fn new(config: &BenchConfig) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .default_headers(request_headers()?)
            .connect_timeout(config.connect_timeout())
            .timeout(config.send_timeout())
            .read_timeout(config.receive_timeout())
            .build()
            .map_err(|e| {
                tracing::error!("Failed to create HTTP client: {}", e);
                NetBenchError::transport(e.to_string())
            })?;

        tracing::debug!(
            base_url = %config.base_url,
            connect_ms = config.connect_timeout_ms,
            send_ms = config.send_timeout_ms,
            receive_ms = config.receive_timeout_ms,
            "HTTP transport created"
        );

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str) -> std::result::Result<RawResponse, TransportError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.get(&url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(RawResponse { status, body })
    }
}

impl Drop for HttpTransport {
    fn drop(&mut self) {
        tracing::debug!(base_url = %self.base_url, "HTTP transport released");
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Factory producing [`HttpTransport`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpTransportFactory;

impl TransportFactory for HttpTransportFactory {
    type Transport = HttpTransport;

    fn build(&self, config: &BenchConfig) -> Result<HttpTransport> {
        HttpTransport::new(config)
    }
}
