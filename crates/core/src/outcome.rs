//! Outcome model shared by the executor, aggregator and exporters

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Closed error taxonomy. Every failed logical fetch maps to exactly one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Client-side connect/send/receive deadline exceeded
    Timeout,
    /// Transport-level connectivity failure (refused, DNS, socket error)
    NoInternet,
    /// Server answered 400-499
    Http4xx,
    /// Server answered 500-599
    Http5xx,
    /// Operation cancelled by its caller
    Cancel,
    /// Decode failure, unexpected status class, or unrecognised failure
    Unknown,
}

impl ErrorKind {
    /// All kinds, in counter order
    pub const ALL: [ErrorKind; 6] = [
        ErrorKind::Timeout,
        ErrorKind::NoInternet,
        ErrorKind::Http4xx,
        ErrorKind::Http5xx,
        ErrorKind::Cancel,
        ErrorKind::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Timeout => "Timeout",
            ErrorKind::NoInternet => "NoInternet",
            ErrorKind::Http4xx => "Http4xx",
            ErrorKind::Http5xx => "Http5xx",
            ErrorKind::Cancel => "Cancel",
            ErrorKind::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown error kind: {}", s))
    }
}

/// Decoded response body. Every field is optional; absent, null or
/// oddly-shaped fields decode to `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplePayload {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub body: Option<String>,
}

/// A classified failure of one logical fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkError {
    pub kind: ErrorKind,
    /// Present when a response was received
    pub status_code: Option<u16>,
    /// Response body text, or the transport failure description
    pub message: Option<String>,
    pub duration_ms: u64,
}

impl NetworkError {
    pub fn new(kind: ErrorKind, duration_ms: u64) -> Self {
        Self {
            kind,
            status_code: None,
            message: None,
            duration_ms,
        }
    }

    pub fn with_status(mut self, status_code: u16) -> Self {
        self.status_code = Some(status_code);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Result of a cancelled attempt or retry delay
    pub fn cancelled(duration_ms: u64) -> Self {
        Self::new(ErrorKind::Cancel, duration_ms).with_message("cancelled")
    }

    /// Fallback when the attempt loop produced nothing
    pub fn no_result() -> Self {
        Self::new(ErrorKind::Unknown, 0).with_message("No result")
    }
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(status) = self.status_code {
            write!(f, " (HTTP {})", status)?;
        }
        write!(f, " after {}ms", self.duration_ms)
    }
}

/// Final result of one logical fetch, after retries are exhausted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum AttemptOutcome<T> {
    #[serde(rename_all = "camelCase")]
    Success {
        payload: T,
        status_code: u16,
        duration_ms: u64,
    },
    NetworkError(NetworkError),
}

impl<T> AttemptOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, AttemptOutcome::Success { .. })
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            AttemptOutcome::Success { .. } => None,
            AttemptOutcome::NetworkError(err) => Some(err.kind),
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            AttemptOutcome::Success { status_code, .. } => Some(*status_code),
            AttemptOutcome::NetworkError(err) => err.status_code,
        }
    }

    pub fn duration_ms(&self) -> u64 {
        match self {
            AttemptOutcome::Success { duration_ms, .. } => *duration_ms,
            AttemptOutcome::NetworkError(err) => err.duration_ms,
        }
    }

    pub fn payload(&self) -> Option<&T> {
        match self {
            AttemptOutcome::Success { payload, .. } => Some(payload),
            AttemptOutcome::NetworkError(_) => None,
        }
    }
}

/// One retained sample for aggregation. `kind == None` means success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchEntry {
    pub duration_ms: u64,
    pub status_code: Option<u16>,
    pub kind: Option<ErrorKind>,
}

impl BenchEntry {
    pub fn success(duration_ms: u64, status_code: u16) -> Self {
        Self {
            duration_ms,
            status_code: Some(status_code),
            kind: None,
        }
    }

    pub fn failure(kind: ErrorKind, duration_ms: u64, status_code: Option<u16>) -> Self {
        Self {
            duration_ms,
            status_code,
            kind: Some(kind),
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind.is_none()
    }
}

impl<T> From<&AttemptOutcome<T>> for BenchEntry {
    fn from(outcome: &AttemptOutcome<T>) -> Self {
        Self {
            duration_ms: outcome.duration_ms(),
            status_code: outcome.status_code(),
            kind: outcome.kind(),
        }
    }
}
