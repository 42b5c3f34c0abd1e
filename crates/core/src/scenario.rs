//! Fixed scenario catalog
//!
//! Six named presets, compiled in and never mutated. Batch runs process them
//! in this order.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::config::BenchConfig;
use crate::error::NetBenchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[allow(non_camel_case_types)]
pub enum ScenarioId {
    S1_SMALL,
    S2_LIST,
    S3_ERROR,
    S4_TIMEOUT,
    S5_OFFLINE,
    S6_HEADERS,
}

impl ScenarioId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioId::S1_SMALL => "S1_SMALL",
            ScenarioId::S2_LIST => "S2_LIST",
            ScenarioId::S3_ERROR => "S3_ERROR",
            ScenarioId::S4_TIMEOUT => "S4_TIMEOUT",
            ScenarioId::S5_OFFLINE => "S5_OFFLINE",
            ScenarioId::S6_HEADERS => "S6_HEADERS",
        }
    }
}

impl fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScenarioId {
    type Err = NetBenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        find_scenario(s)
            .map(|preset| preset.id)
            .ok_or_else(|| NetBenchError::UnknownScenario(s.to_string()))
    }
}

/// A named, fixed endpoint + timeout/retry combination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioPreset {
    pub id: ScenarioId,
    pub title: &'static str,
    pub base_url: &'static str,
    pub path: &'static str,
    pub connect_timeout_ms: u64,
    pub send_timeout_ms: u64,
    pub receive_timeout_ms: u64,
    pub enable_retry: bool,
    pub note: &'static str,
}

impl ScenarioPreset {
    /// Configuration a run of this preset uses
    pub fn config(&self) -> BenchConfig {
        BenchConfig::new(self.base_url)
            .with_timeouts_ms(
                self.connect_timeout_ms,
                self.send_timeout_ms,
                self.receive_timeout_ms,
            )
            .with_retry(self.enable_retry)
    }
}

const DUMMYJSON: &str = "https://dummyjson.com";
const HTTPBINGO: &str = "https://httpbingo.org";

/// The catalog, in batch order
pub const SCENARIOS: [ScenarioPreset; 6] = [
    preset(ScenarioId::S1_SMALL, "S1 Small", DUMMYJSON, "/posts/1", 8000, "Latency single small payload"),
    preset(ScenarioId::S2_LIST, "S2 List", DUMMYJSON, "/posts?limit=100", 8000, "List parsing"),
    preset(ScenarioId::S3_ERROR, "S3 Error", HTTPBINGO, "/status/500", 8000, "Deterministic 500"),
    preset(ScenarioId::S4_TIMEOUT, "S4 Timeout", HTTPBINGO, "/delay/10", 1000, "200 delayed -> timeout"),
    preset(ScenarioId::S5_OFFLINE, "S5 Offline", DUMMYJSON, "/posts/1", 8000, "Enable airplane mode"),
    preset(ScenarioId::S6_HEADERS, "S6 Headers", HTTPBINGO, "/headers", 8000, "Echo headers (httpbin)"),
];

const fn preset(
    id: ScenarioId,
    title: &'static str,
    base_url: &'static str,
    path: &'static str,
    timeout_ms: u64,
    note: &'static str,
) -> ScenarioPreset {
    ScenarioPreset {
        id,
        title,
        base_url,
        path,
        connect_timeout_ms: timeout_ms,
        send_timeout_ms: timeout_ms,
        receive_timeout_ms: timeout_ms,
        enable_retry: false,
        note,
    }
}

/// Look up a preset by id (case-insensitive)
pub fn find_scenario(id: &str) -> Option<&'static ScenarioPreset> {
    SCENARIOS
        .iter()
        .find(|preset| preset.id.as_str().eq_ignore_ascii_case(id))
}
