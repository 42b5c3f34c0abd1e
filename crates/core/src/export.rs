//! Flat-text exports
//!
//! Pure functions of their inputs: identical entries, aggregates and plan
//! always render byte-identical text. Nothing here touches the clock or disk.

use crate::bench::{BenchRun, ScenarioReport};
use crate::config::BenchPlan;
use crate::outcome::BenchEntry;
use crate::scenario::ScenarioId;
use crate::stats::Aggregates;
use crate::transport::USER_AGENT_VALUE;

/// Tool name written into export headers
pub const TOOL_NAME: &str = "netbench";

/// Identifies who produced an export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportMeta<'a> {
    pub tool: &'a str,
    pub platform: &'a str,
}

impl ExportMeta<'static> {
    /// This tool on the current operating system
    pub fn current() -> Self {
        Self {
            tool: TOOL_NAME,
            platform: std::env::consts::OS,
        }
    }
}

const MARKDOWN_COLUMNS: [&str; 17] = [
    "tool", "platform", "scenario", "baseUrl", "path", "runs", "warmup", "median", "p95", "min",
    "max", "timeouts", "noNet", "4xx", "5xx", "cancel", "unknown",
];

fn scenario_label(scenario: Option<ScenarioId>) -> &'static str {
    scenario.map(|id| id.as_str()).unwrap_or("null")
}

/// Single run as CSV: header comment, one row per entry, aggregates comment
pub fn to_single_run_csv(
    meta: &ExportMeta<'_>,
    entries: &[BenchEntry],
    aggregates: &Aggregates,
    plan: &BenchPlan,
    scenario: Option<ScenarioId>,
) -> String {
    let config = &plan.config;
    let mut out = String::new();

    out.push_str(&format!(
        "# tool={} platform={} baseUrl={} path={} runs={} warmup={} timeouts={}/{}/{} retry={} ua={}\n",
        meta.tool,
        meta.platform,
        config.base_url,
        plan.path,
        plan.runs,
        plan.warmup,
        config.connect_timeout_ms,
        config.send_timeout_ms,
        config.receive_timeout_ms,
        config.enable_retry,
        USER_AGENT_VALUE,
    ));

    out.push_str("index,status,errorKind,durationMs\n");

    for (index, entry) in entries.iter().enumerate() {
        let status = entry.status_code.map(|s| s.to_string()).unwrap_or_default();
        let kind = entry.kind.map(|k| k.as_str()).unwrap_or("");
        out.push_str(&format!(
            "{},{},{},{}\n",
            index, status, kind, entry.duration_ms
        ));
    }

    out.push_str(&format!(
        "# aggregates count={} median={} p95={} min={} max={} timeouts={} noInternet={} http4xx={} http5xx={} cancel={} unknown={} scenario={}\n",
        aggregates.count,
        aggregates.median,
        aggregates.p95,
        aggregates.min,
        aggregates.max,
        aggregates.timeout,
        aggregates.no_internet,
        aggregates.http4xx,
        aggregates.http5xx,
        aggregates.cancel,
        aggregates.unknown,
        scenario_label(scenario),
    ));

    out
}

/// Single run as a one-row Markdown table
pub fn to_single_run_markdown(
    meta: &ExportMeta<'_>,
    aggregates: &Aggregates,
    plan: &BenchPlan,
    scenario: Option<ScenarioId>,
) -> String {
    let mut out = String::new();

    out.push('|');
    for column in MARKDOWN_COLUMNS {
        out.push_str(column);
        out.push('|');
    }
    out.push('\n');

    out.push('|');
    out.push_str(&"---|".repeat(MARKDOWN_COLUMNS.len()));
    out.push('\n');

    let row = [
        meta.tool.to_string(),
        meta.platform.to_string(),
        scenario_label(scenario).to_string(),
        plan.config.base_url.clone(),
        plan.path.clone(),
        plan.runs.to_string(),
        plan.warmup.to_string(),
        aggregates.median.to_string(),
        aggregates.p95.to_string(),
        aggregates.min.to_string(),
        aggregates.max.to_string(),
        aggregates.timeout.to_string(),
        aggregates.no_internet.to_string(),
        aggregates.http4xx.to_string(),
        aggregates.http5xx.to_string(),
        aggregates.cancel.to_string(),
        aggregates.unknown.to_string(),
    ];
    out.push('|');
    for cell in &row {
        out.push_str(cell);
        out.push('|');
    }
    out.push('\n');

    out
}

/// Batch summary, one row per scenario in the given order
pub fn to_delimited_table(reports: &[ScenarioReport]) -> String {
    let mut out = String::from("scenario,N,median,p95,min,max,errors\n");

    for report in reports {
        let aggs = report.aggregates();
        out.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            report.preset.title,
            aggs.count,
            aggs.median,
            aggs.p95,
            aggs.min,
            aggs.max,
            aggs.errors()
        ));
    }

    out
}

impl BenchRun {
    pub fn to_csv(&self, meta: &ExportMeta<'_>) -> String {
        to_single_run_csv(meta, &self.entries, &self.aggregates, &self.plan, self.scenario)
    }

    pub fn to_markdown(&self, meta: &ExportMeta<'_>) -> String {
        to_single_run_markdown(meta, &self.aggregates, &self.plan, self.scenario)
    }
}
