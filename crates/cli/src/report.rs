// Report files written by --save
//
// File names follow netbench_<label>_<YYYYmmdd_HHMMSS>.<ext>. Contents come
// straight from the core exporters, so saved and printed reports are identical.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use netbench_core::{to_delimited_table, BenchRun, ExportMeta, ScenarioReport};

/// Build a report file name for a label and timestamp
pub fn report_file_name(label: &str, at: DateTime<Local>, extension: &str) -> String {
    format!(
        "netbench_{}_{}.{}",
        label,
        at.format("%Y%m%d_%H%M%S"),
        extension
    )
}

/// Label for a single run: the scenario id, or "run"
pub fn run_label(run: &BenchRun) -> String {
    run.scenario
        .map(|id| id.as_str().to_string())
        .unwrap_or_else(|| "run".to_string())
}

/// Write the CSV and Markdown exports of one run; returns the written paths
pub fn save_run(dir: &Path, run: &BenchRun, meta: &ExportMeta<'_>) -> Result<Vec<PathBuf>> {
    let now = Local::now();
    let label = run_label(run);

    let files = [
        (report_file_name(&label, now, "csv"), run.to_csv(meta)),
        (report_file_name(&label, now, "md"), run.to_markdown(meta)),
    ];

    write_all(dir, &files)
}

/// Write the batch summary table; returns the written path
pub fn save_batch(dir: &Path, reports: &[ScenarioReport]) -> Result<Vec<PathBuf>> {
    let files = [(
        report_file_name("batch", Local::now(), "csv"),
        to_delimited_table(reports),
    )];

    write_all(dir, &files)
}

fn write_all(dir: &Path, files: &[(String, String)]) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create report directory {}", dir.display()))?;

    let mut written = Vec::with_capacity(files.len());
    for (name, contents) in files {
        let path = dir.join(name);
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "Report saved");
        written.push(path);
    }
    Ok(written)
}
