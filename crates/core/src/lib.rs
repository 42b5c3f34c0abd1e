// HTTP Latency Benchmark Engine
//
// This crate measures request latency against configurable HTTP endpoints,
// classifies every failure into a fixed taxonomy, and summarises runs.
//
// Key design decisions:
// - Engine operations return classified outcomes (AttemptOutcome), never errors
// - Transport sits behind a trait (Transport, TransportFactory) so the executor can be scripted in tests
// - Each run owns one transport; requests within a run are strictly sequential
// - Retry is a fixed policy: at most one extra attempt after 500 ms
// - Cancellation is a CancellationToken checked at every suspension point
// - Aggregation and exports are pure functions of their inputs

// Configuration and errors
pub mod config;
pub mod error;

// Request path
pub mod classify;
pub mod decode;
pub mod executor;
pub mod outcome;
pub mod retry;
pub mod transport;

// Runs, statistics and reports
pub mod bench;
pub mod export;
pub mod scenario;
pub mod stats;

// Re-exports for convenience
pub use config::{BenchConfig, BenchPlan};
pub use error::{NetBenchError, Result};
pub use outcome::{AttemptOutcome, BenchEntry, ErrorKind, NetworkError, SamplePayload};
pub use retry::RetryPolicy;

pub use classify::{classify, classify_status};
pub use decode::{decode_sample, decode_sample_list};
pub use executor::RequestExecutor;
pub use transport::{
    HttpTransport, HttpTransportFactory, RawResponse, Transport, TransportError,
    TransportFactory,
};

pub use bench::{BenchRun, BenchRunner, ScenarioReport};
pub use export::{to_delimited_table, to_single_run_csv, to_single_run_markdown, ExportMeta};
pub use scenario::{find_scenario, ScenarioId, ScenarioPreset, SCENARIOS};
pub use stats::{aggregate, Aggregates};
