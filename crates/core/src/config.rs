// Benchmark configuration
//
// BenchConfig is immutable per request and supplied fresh for each run.
// BenchPlan adds what the run driver needs on top (path, run count, warm-up).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{NetBenchError, Result};

/// Base URL used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

/// Default connect/send/receive timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 8000;

/// Default path for a single benchmark run
pub const DEFAULT_PATH: &str = "/todos/1";

/// Default number of logical fetches per run
pub const DEFAULT_RUNS: u32 = 20;

/// Transport configuration for one benchmark run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchConfig {
    /// Endpoint prefix; request URL is `base_url + path`
    pub base_url: String,

    /// TCP/TLS connect timeout
    #[serde(default = "default_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// Whole-request deadline
    #[serde(default = "default_timeout_ms")]
    pub send_timeout_ms: u64,

    /// Maximum idle time while reading the response
    #[serde(default = "default_timeout_ms")]
    pub receive_timeout_ms: u64,

    /// Permit one retry (two attempts) per logical fetch
    #[serde(default)]
    pub enable_retry: bool,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout_ms: DEFAULT_TIMEOUT_MS,
            send_timeout_ms: DEFAULT_TIMEOUT_MS,
            receive_timeout_ms: DEFAULT_TIMEOUT_MS,
            enable_retry: false,
        }
    }
}

impl BenchConfig {
    /// Create a configuration for the given base URL with default timeouts
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the connect timeout (minimum 1 ms)
    pub fn with_connect_timeout_ms(mut self, ms: u64) -> Self {
        self.connect_timeout_ms = ms.max(1);
        self
    }

    /// Set the send timeout (minimum 1 ms)
    pub fn with_send_timeout_ms(mut self, ms: u64) -> Self {
        self.send_timeout_ms = ms.max(1);
        self
    }

    /// Set the receive timeout (minimum 1 ms)
    pub fn with_receive_timeout_ms(mut self, ms: u64) -> Self {
        self.receive_timeout_ms = ms.max(1);
        self
    }

    /// Set all three timeouts at once (minimum 1 ms each)
    pub fn with_timeouts_ms(self, connect: u64, send: u64, receive: u64) -> Self {
        self.with_connect_timeout_ms(connect)
            .with_send_timeout_ms(send)
            .with_receive_timeout_ms(receive)
    }

    /// Enable or disable the single retry
    pub fn with_retry(mut self, enable_retry: bool) -> Self {
        self.enable_retry = enable_retry;
        self
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms.max(1))
    }

    pub fn send_timeout(&self) -> Duration {
        Duration::from_millis(self.send_timeout_ms.max(1))
    }

    pub fn receive_timeout(&self) -> Duration {
        Duration::from_millis(self.receive_timeout_ms.max(1))
    }

    /// Full request URL for a path
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Check that the configuration can drive a transport
    pub fn validate(&self) -> Result<()> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(NetBenchError::config(format!(
                "base URL must start with http:// or https:// (got {:?})",
                self.base_url
            )));
        }
        Ok(())
    }
}

/// One single-path benchmark run: configuration plus run shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchPlan {
    #[serde(flatten)]
    pub config: BenchConfig,

    /// Path appended to the base URL
    pub path: String,

    /// Number of logical fetches to perform (minimum 1)
    pub runs: u32,

    /// Discard the first measurement
    pub warmup: bool,
}

impl Default for BenchPlan {
    fn default() -> Self {
        Self {
            config: BenchConfig::default(),
            path: DEFAULT_PATH.to_string(),
            runs: DEFAULT_RUNS,
            warmup: true,
        }
    }
}

impl BenchPlan {
    pub fn new(config: BenchConfig, path: impl Into<String>) -> Self {
        Self {
            config,
            path: path.into(),
            ..Default::default()
        }
    }

    /// Set the number of runs (minimum 1)
    pub fn with_runs(mut self, runs: u32) -> Self {
        self.runs = runs.max(1);
        self
    }

    pub fn with_warmup(mut self, warmup: bool) -> Self {
        self.warmup = warmup;
        self
    }
}
