// Output formatting for CLI

use anyhow::{Context, Result};
use clap::ValueEnum;
use netbench_core::{AttemptOutcome, Aggregates};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Yaml,
}

impl OutputFormat {
    /// Print a value as JSON or YAML; text rendering is left to each command
    pub fn print_value<T: Serialize>(&self, value: &T) -> Result<()> {
        match self {
            OutputFormat::Json => {
                let rendered =
                    serde_json::to_string_pretty(value).context("Failed to render JSON")?;
                println!("{}", rendered);
            }
            OutputFormat::Yaml => {
                let rendered = serde_yaml::to_string(value).context("Failed to render YAML")?;
                print!("{}", rendered);
            }
            OutputFormat::Text => {}
        }
        Ok(())
    }

    pub fn is_text(&self) -> bool {
        matches!(self, OutputFormat::Text)
    }
}

/// Print a simple key-value pair for text output
pub fn print_field(label: &str, value: &str) {
    println!("{:<14} {}", format!("{}:", label), value);
}

/// Print a table header
pub fn print_table_header(columns: &[(&str, usize)]) {
    let header: String = columns
        .iter()
        .map(|(name, width)| format!("{:<width$}", name, width = width))
        .collect::<Vec<_>>()
        .join("  ");
    println!("{}", header.trim_end());
}

/// Print a table row, truncating cells wider than their column
pub fn print_table_row(values: &[(&str, usize)]) {
    let row: String = values
        .iter()
        .map(|(val, width)| format!("{:<width$}", truncate(val, *width), width = width))
        .collect::<Vec<_>>()
        .join("  ");
    println!("{}", row.trim_end());
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width || width < 4 {
        return value.to_string();
    }
    let kept: String = value.chars().take(width - 3).collect();
    format!("{}...", kept)
}

/// Status and duration lines shared by every outcome
pub fn print_outcome_summary<T>(outcome: &AttemptOutcome<T>) {
    let status = outcome
        .status_code()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "-".to_string());
    print_field("Status", &status);
    print_field("Duration", &format!("{} ms", outcome.duration_ms()));

    if let AttemptOutcome::NetworkError(err) = outcome {
        print_field("Error", err.kind.as_str());
        if let Some(message) = &err.message {
            print_field("Message", &truncate(message.trim(), 120));
        }
    }
}

/// Key statistics of one run
pub fn print_aggregates(aggregates: &Aggregates) {
    print_field("Count", &aggregates.count.to_string());
    print_field("Median", &format!("{} ms", aggregates.median));
    print_field("P95", &format!("{} ms", aggregates.p95));
    print_field(
        "Min/Max",
        &format!("{} / {} ms", aggregates.min, aggregates.max),
    );
    print_field(
        "Errors",
        &format!(
            "{} (timeout {}, noInternet {}, 4xx {}, 5xx {}, cancel {}, unknown {})",
            aggregates.errors(),
            aggregates.timeout,
            aggregates.no_internet,
            aggregates.http4xx,
            aggregates.http5xx,
            aggregates.cancel,
            aggregates.unknown
        ),
    );
}
