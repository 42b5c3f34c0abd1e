// Scenario catalog commands

use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;
use netbench_core::config::DEFAULT_RUNS;
use netbench_core::{to_delimited_table, BenchRunner, ScenarioReport, TransportFactory, SCENARIOS};

use crate::output::{print_table_header, print_table_row, OutputFormat};
use crate::report;

#[derive(Subcommand)]
pub enum ScenariosCommand {
    /// List the scenario catalog
    List,

    /// Run every scenario in order and print the summary table
    Run {
        /// Fetches per scenario
        #[arg(long, short = 'n', default_value_t = DEFAULT_RUNS)]
        runs: u32,

        /// Keep the first measurement of each scenario
        #[arg(long)]
        no_warmup: bool,

        /// Directory to write the batch CSV into
        #[arg(long)]
        save: Option<PathBuf>,
    },
}

pub async fn run<F: TransportFactory>(
    command: ScenariosCommand,
    runner: &BenchRunner<F>,
    output: OutputFormat,
    quiet: bool,
) -> Result<()> {
    match command {
        ScenariosCommand::List => list(output),
        ScenariosCommand::Run {
            runs,
            no_warmup,
            save,
        } => run_all(runner, output, quiet, runs, !no_warmup, save).await,
    }
}

fn list(output: OutputFormat) -> Result<()> {
    if !output.is_text() {
        return output.print_value(&SCENARIOS);
    }

    print_table_header(&[
        ("ID", 10),
        ("TITLE", 10),
        ("BASE URL", 22),
        ("PATH", 16),
        ("TIMEOUT", 7),
        ("RETRY", 5),
        ("NOTE", 30),
    ]);

    for preset in &SCENARIOS {
        print_table_row(&[
            (preset.id.as_str(), 10),
            (preset.title, 10),
            (preset.base_url, 22),
            (preset.path, 16),
            (&format!("{}ms", preset.receive_timeout_ms), 7),
            (if preset.enable_retry { "yes" } else { "no" }, 5),
            (preset.note, 30),
        ]);
    }

    Ok(())
}

/// A batch is partial when it stopped early or any run inside it was cancelled
fn is_partial(reports: &[ScenarioReport], total: usize) -> bool {
    reports.len() < total || reports.iter().any(|r| r.run.cancelled)
}

async fn run_all<F: TransportFactory>(
    runner: &BenchRunner<F>,
    output: OutputFormat,
    quiet: bool,
    runs: u32,
    warmup: bool,
    save: Option<PathBuf>,
) -> Result<()> {
    let reports = runner.run_all(&SCENARIOS, runs, warmup).await;

    if output.is_text() {
        print!("{}", to_delimited_table(&reports));
    } else {
        output.print_value(&reports)?;
    }

    if is_partial(&reports, SCENARIOS.len()) {
        tracing::warn!(
            completed = reports.len(),
            total = SCENARIOS.len(),
            "Batch cancelled, results are partial"
        );
    }

    if let Some(dir) = save {
        let paths = report::save_batch(&dir, &reports)?;
        if !quiet {
            for path in paths {
                eprintln!("Saved {}", path.display());
            }
        }
    }

    Ok(())
}
