// Single benchmark run command

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use netbench_core::config::{DEFAULT_PATH, DEFAULT_RUNS};
use netbench_core::{
    find_scenario, BenchConfig, BenchPlan, BenchRun, BenchRunner, ExportMeta, ScenarioId,
    TransportFactory,
};

use crate::output::{print_aggregates, print_field, OutputFormat};
use crate::report;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Md,
}

#[derive(Args, Debug)]
pub struct BenchArgs {
    /// Request path, appended to the base URL (ignored with --scenario)
    #[arg(long, default_value = DEFAULT_PATH)]
    pub path: String,

    /// Number of sequential fetches
    #[arg(long, short = 'n', default_value_t = DEFAULT_RUNS)]
    pub runs: u32,

    /// Keep the first measurement instead of discarding it
    #[arg(long)]
    pub no_warmup: bool,

    /// Run a catalog preset (S1_SMALL .. S6_HEADERS) with its own endpoint and timeouts
    #[arg(long, short)]
    pub scenario: Option<ScenarioId>,

    /// Print the run as a flat export instead of a summary (text output only)
    #[arg(long, value_enum)]
    pub format: Option<ExportFormat>,

    /// Directory to write CSV and Markdown reports into
    #[arg(long)]
    pub save: Option<PathBuf>,
}

/// How a finished run is shown on stdout
#[derive(Debug, PartialEq, Eq)]
enum Presentation {
    /// Flat export text, printed verbatim
    Export(String),
    /// Human-readable fields
    Summary,
    /// JSON or YAML of the whole run
    Structured,
}

fn presentation(
    run: &BenchRun,
    format: Option<ExportFormat>,
    output: OutputFormat,
    meta: &ExportMeta<'_>,
) -> Presentation {
    if !output.is_text() {
        return Presentation::Structured;
    }
    match format {
        Some(ExportFormat::Csv) => Presentation::Export(run.to_csv(meta)),
        Some(ExportFormat::Md) => Presentation::Export(run.to_markdown(meta)),
        None => Presentation::Summary,
    }
}

/// Perform the run the arguments describe: a catalog preset or a plan on `config`
async fn execute<F: TransportFactory>(
    args: &BenchArgs,
    runner: &BenchRunner<F>,
    config: &BenchConfig,
) -> Result<BenchRun> {
    let warmup = !args.no_warmup;

    match args.scenario {
        Some(id) => {
            let preset = find_scenario(id.as_str())
                .with_context(|| format!("Scenario {} is not in the catalog", id))?;
            Ok(runner.run_scenario(preset, args.runs, warmup).await)
        }
        None => {
            let plan = BenchPlan::new(config.clone(), args.path.clone())
                .with_runs(args.runs)
                .with_warmup(warmup);
            runner
                .run_benchmark(&plan)
                .await
                .context("Failed to start benchmark")
        }
    }
}

fn print_summary(run: &BenchRun) {
    print_field("URL", &run.plan.config.url_for(&run.plan.path));
    if let Some(id) = run.scenario {
        print_field("Scenario", id.as_str());
    }
    print_field("Executed", &run.executed.to_string());
    print_aggregates(&run.aggregates);
    if let Some(preview) = &run.last_payload_preview {
        print_field("Last payload", preview);
    }
}

pub async fn run<F: TransportFactory>(
    args: BenchArgs,
    runner: &BenchRunner<F>,
    config: &BenchConfig,
    output: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let run = execute(&args, runner, config).await?;
    let meta = ExportMeta::current();

    match presentation(&run, args.format, output, &meta) {
        Presentation::Export(text) => print!("{}", text),
        Presentation::Summary => print_summary(&run),
        Presentation::Structured => output.print_value(&run)?,
    }

    if run.cancelled {
        tracing::warn!(executed = run.executed, "Run cancelled, results are partial");
    }

    if let Some(dir) = &args.save {
        let paths = report::save_run(dir, &run, &meta)?;
        if !quiet {
            for path in paths {
                eprintln!("Saved {}", path.display());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::static_runner;
    use std::sync::atomic::Ordering;

    const POST: &str = r#"{"id":1,"title":"t","body":"b"}"#;

    fn args() -> BenchArgs {
        BenchArgs {
            path: "/posts/1".to_string(),
            runs: 4,
            no_warmup: false,
            scenario: None,
            format: None,
            save: None,
        }
    }

    #[tokio::test]
    async fn test_plan_run_uses_configured_endpoint() {
        let (runner, calls) = static_runner(200, POST);
        let config = BenchConfig::new("http://bench.test");

        let run = execute(&args(), &runner, &config).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(run.scenario, None);
        assert_eq!(run.plan.config.base_url, "http://bench.test");
        assert_eq!(run.plan.path, "/posts/1");
        assert_eq!(run.aggregates.count, 3);
    }

    #[tokio::test]
    async fn test_scenario_run_ignores_configured_endpoint() {
        let (runner, _) = static_runner(500, "");
        let args = BenchArgs {
            scenario: Some(ScenarioId::S3_ERROR),
            no_warmup: true,
            ..args()
        };

        let run = execute(&args, &runner, &BenchConfig::default()).await.unwrap();

        assert_eq!(run.scenario, Some(ScenarioId::S3_ERROR));
        assert_eq!(run.plan.config.base_url, "https://httpbingo.org");
        assert_eq!(run.plan.path, "/status/500");
        assert_eq!(run.aggregates.http5xx, 4);
    }

    #[tokio::test]
    async fn test_presentation_branches() {
        let (runner, _) = static_runner(200, POST);
        let run = execute(&args(), &runner, &BenchConfig::default()).await.unwrap();
        let meta = ExportMeta::current();

        assert_eq!(
            presentation(&run, Some(ExportFormat::Csv), OutputFormat::Text, &meta),
            Presentation::Export(run.to_csv(&meta))
        );
        assert_eq!(
            presentation(&run, Some(ExportFormat::Md), OutputFormat::Text, &meta),
            Presentation::Export(run.to_markdown(&meta))
        );
        assert_eq!(
            presentation(&run, None, OutputFormat::Text, &meta),
            Presentation::Summary
        );
        // structured output wins over an export format
        assert_eq!(
            presentation(&run, Some(ExportFormat::Csv), OutputFormat::Yaml, &meta),
            Presentation::Structured
        );
    }

    #[tokio::test]
    async fn test_run_saves_reports() {
        let dir = tempfile::tempdir().unwrap();
        let (runner, _) = static_runner(200, POST);
        let args = BenchArgs {
            scenario: Some(ScenarioId::S1_SMALL),
            format: Some(ExportFormat::Csv),
            save: Some(dir.path().to_path_buf()),
            ..args()
        };

        run(args, &runner, &BenchConfig::default(), OutputFormat::Text, true)
            .await
            .unwrap();

        let mut names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names.len(), 2);
        assert!(names[0].starts_with("netbench_S1_SMALL_") && names[0].ends_with(".csv"));
        assert!(names[1].starts_with("netbench_S1_SMALL_") && names[1].ends_with(".md"));
    }

    #[tokio::test]
    async fn test_cancelled_run_is_partial() {
        let (runner, calls) = static_runner(200, POST);
        runner.cancellation().cancel();

        let run = execute(&args(), &runner, &BenchConfig::default()).await.unwrap();

        assert!(run.cancelled);
        assert_eq!(run.executed, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(run.aggregates.count, 0);
    }
}
