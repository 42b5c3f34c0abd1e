// Single-shot fetch commands

use anyhow::Result;
use netbench_core::{BenchConfig, BenchRunner, SamplePayload, TransportFactory};

use crate::output::{
    print_field, print_outcome_summary, print_table_header, print_table_row, OutputFormat,
};

/// Fetch one item and print it, or its classified error
pub async fn run_fetch<F: TransportFactory>(
    runner: &BenchRunner<F>,
    config: &BenchConfig,
    path: &str,
    output: OutputFormat,
) -> Result<()> {
    let outcome = runner.fetch(config, path).await;

    if output.is_text() {
        print_field("URL", &config.url_for(path));
        print_outcome_summary(&outcome);
        if let Some(payload) = outcome.payload() {
            print_payload(payload);
        }
    } else {
        output.print_value(&outcome)?;
    }

    Ok(())
}

/// Fetch a collection and print it as a table
pub async fn run_list<F: TransportFactory>(
    runner: &BenchRunner<F>,
    config: &BenchConfig,
    path: &str,
    output: OutputFormat,
) -> Result<()> {
    let outcome = runner.fetch_list(config, path).await;

    if !output.is_text() {
        return output.print_value(&outcome);
    }

    print_field("URL", &config.url_for(path));
    print_outcome_summary(&outcome);

    let Some(items) = outcome.payload() else {
        return Ok(());
    };
    print_field("Items", &items.len().to_string());
    if items.is_empty() {
        return Ok(());
    }

    println!();
    print_table_header(&[("ID", 8), ("TITLE", 60)]);
    for item in items {
        print_table_row(&[(&display_id(item), 8), (&single_line(item.title.as_deref()), 60)]);
    }

    Ok(())
}

fn print_payload(payload: &SamplePayload) {
    print_field("ID", &display_id(payload));
    print_field("Title", &single_line(payload.title.as_deref()));
    print_field("Body", &single_line(payload.body.as_deref()));
}

fn display_id(payload: &SamplePayload) -> String {
    payload
        .id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn single_line(value: Option<&str>) -> String {
    match value {
        Some(text) => text.split_whitespace().collect::<Vec<_>>().join(" "),
        None => "-".to_string(),
    }
}
