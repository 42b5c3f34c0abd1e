//! Benchmark run drivers
//!
//! [`BenchRunner`] owns a transport factory and a cancellation token and
//! exposes the engine's public operations: single fetches, one benchmark run,
//! one scenario, or the whole catalog back-to-back.
//!
//! Requests inside a run are strictly sequential and each run builds (and
//! drops) its own transport. A run's entries and aggregates belong to the
//! driver until the finished [`BenchRun`] is returned.

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::config::{BenchConfig, BenchPlan};
use crate::error::{NetBenchError, Result};
use crate::executor::RequestExecutor;
use crate::outcome::{AttemptOutcome, BenchEntry, ErrorKind, NetworkError, SamplePayload};
use crate::scenario::{ScenarioId, ScenarioPreset};
use crate::stats::{aggregate, Aggregates};
use crate::transport::{HttpTransportFactory, Transport, TransportFactory};

/// Maximum characters kept from the last successful payload
const PREVIEW_CHARS: usize = 200;

/// Result of one benchmark run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchRun {
    pub plan: BenchPlan,
    /// Preset this run came from, if any
    pub scenario: Option<ScenarioId>,
    /// Retained entries (warm-up excluded), failures included
    pub entries: Vec<BenchEntry>,
    pub aggregates: Aggregates,
    /// Logical fetches actually executed, warm-up included
    pub executed: u32,
    pub cancelled: bool,
    pub last_payload_preview: Option<String>,
}

impl BenchRun {
    /// A run whose transport could not be built: every retained slot is `Unknown`
    fn unavailable(plan: BenchPlan, scenario: Option<ScenarioId>) -> Self {
        let retained = if plan.warmup {
            plan.runs.saturating_sub(1)
        } else {
            plan.runs
        };
        let entries = vec![BenchEntry::failure(ErrorKind::Unknown, 0, None); retained as usize];
        let aggregates = aggregate(&entries);
        Self {
            plan,
            scenario,
            entries,
            aggregates,
            executed: 0,
            cancelled: false,
            last_payload_preview: None,
        }
    }
}

/// One row of a batch: the preset and its run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioReport {
    pub preset: ScenarioPreset,
    pub run: BenchRun,
}

impl ScenarioReport {
    pub fn aggregates(&self) -> &Aggregates {
        &self.run.aggregates
    }
}

/// Drives benchmark runs through transports built by `F`
pub struct BenchRunner<F = HttpTransportFactory> {
    factory: F,
    cancel: CancellationToken,
}

impl BenchRunner<HttpTransportFactory> {
    /// Runner backed by real HTTP
    pub fn http() -> Self {
        Self::new(HttpTransportFactory)
    }
}

impl<F: TransportFactory> BenchRunner<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            cancel: CancellationToken::new(),
        }
    }

    /// Observe an external cancellation token
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Token that cancels whatever this runner is doing
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// One logical single-item fetch with its own transport
    pub async fn fetch(&self, config: &BenchConfig, path: &str) -> AttemptOutcome<SamplePayload> {
        match self.factory.build(config) {
            Ok(transport) => self.executor(transport, config).fetch(path).await,
            Err(e) => unavailable_outcome(&e),
        }
    }

    /// One logical collection fetch with its own transport
    pub async fn fetch_list(
        &self,
        config: &BenchConfig,
        path: &str,
    ) -> AttemptOutcome<Vec<SamplePayload>> {
        match self.factory.build(config) {
            Ok(transport) => self.executor(transport, config).fetch_list(path).await,
            Err(e) => unavailable_outcome(&e),
        }
    }

    /// Run `plan.runs` sequential fetches and aggregate them
    ///
    /// Fails only when the transport cannot be built from `plan.config`.
    pub async fn run_benchmark(&self, plan: &BenchPlan) -> Result<BenchRun> {
        let transport = self.factory.build(&plan.config)?;
        Ok(self.drive(transport, plan.clone(), None).await)
    }

    /// Run one preset; never fails, a broken transport yields `Unknown` entries
    pub async fn run_scenario(&self, preset: &ScenarioPreset, runs: u32, warmup: bool) -> BenchRun {
        let plan = BenchPlan::new(preset.config(), preset.path)
            .with_runs(runs)
            .with_warmup(warmup);

        info!(scenario = %preset.id, path = preset.path, runs = plan.runs, "Scenario starting");

        match self.factory.build(&plan.config) {
            Ok(transport) => self.drive(transport, plan, Some(preset.id)).await,
            Err(e) => {
                error!(scenario = %preset.id, error = %e, "Transport unavailable, recording failures");
                BenchRun::unavailable(plan, Some(preset.id))
            }
        }
    }

    /// Run presets strictly in order, one at a time
    ///
    /// A failing preset still yields its report. Cancellation stops the batch
    /// before the next preset starts.
    pub async fn run_all(
        &self,
        presets: &[ScenarioPreset],
        runs_per_scenario: u32,
        warmup: bool,
    ) -> Vec<ScenarioReport> {
        let mut reports = Vec::with_capacity(presets.len());

        for preset in presets {
            if self.cancel.is_cancelled() {
                warn!(remaining = presets.len() - reports.len(), "Batch cancelled");
                break;
            }
            let run = self.run_scenario(preset, runs_per_scenario, warmup).await;
            reports.push(ScenarioReport {
                preset: *preset,
                run,
            });
        }

        reports
    }

    fn executor<T: Transport>(&self, transport: T, config: &BenchConfig) -> RequestExecutor<T> {
        RequestExecutor::new(transport, config).with_cancellation(self.cancel.clone())
    }

    async fn drive<T: Transport>(
        &self,
        transport: T,
        plan: BenchPlan,
        scenario: Option<ScenarioId>,
    ) -> BenchRun {
        let executor = self.executor(transport, &plan.config);
        let runs = plan.runs.max(1);
        let mut entries = Vec::with_capacity(runs as usize);
        let mut executed = 0;
        let mut last_payload_preview = None;

        for idx in 0..runs {
            let outcome = executor.fetch(&plan.path).await;
            executed += 1;

            if let Some(payload) = outcome.payload() {
                last_payload_preview = Some(preview(payload));
            }

            if !(plan.warmup && idx == 0) {
                entries.push(BenchEntry::from(&outcome));
            }

            if self.cancel.is_cancelled() {
                warn!(executed, runs, "Run cancelled");
                break;
            }
        }

        // Release the transport before publishing the snapshot
        drop(executor);

        let aggregates = aggregate(&entries);
        info!(
            path = %plan.path,
            count = aggregates.count,
            median = aggregates.median,
            p95 = aggregates.p95,
            errors = aggregates.errors(),
            "Run complete"
        );

        BenchRun {
            plan,
            scenario,
            entries,
            aggregates,
            executed,
            cancelled: self.cancel.is_cancelled(),
            last_payload_preview,
        }
    }
}

fn unavailable_outcome<P>(err: &NetBenchError) -> AttemptOutcome<P> {
    error!(error = %err, "Transport unavailable");
    AttemptOutcome::NetworkError(NetworkError::new(ErrorKind::Unknown, 0).with_message(err.to_string()))
}

fn preview(payload: &SamplePayload) -> String {
    serde_json::to_string(payload)
        .unwrap_or_default()
        .chars()
        .take(PREVIEW_CHARS)
        .collect()
}
