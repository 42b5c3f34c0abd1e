// NetBench CLI
//
// Design Decision: Use clap derive for ergonomic argument parsing.
// Design Decision: Support text/json/yaml output formats for scripting.
// Design Decision: Logs go to stderr so exports on stdout can be piped.
// Design Decision: Ctrl-C cancels the current run; partial results are still printed.

mod commands;
mod output;
mod report;
#[cfg(test)]
mod testing;

use clap::{Parser, Subcommand};
use netbench_core::config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_MS};
use netbench_core::{BenchConfig, BenchRunner};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "netbench")]
#[command(about = "NetBench - HTTP latency benchmarks with classified failures")]
#[command(version)]
pub struct Cli {
    /// Endpoint base URL
    #[arg(long, env = "NETBENCH_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Connect timeout in ms
    #[arg(long, env = "NETBENCH_CONNECT_TIMEOUT_MS", default_value_t = DEFAULT_TIMEOUT_MS)]
    pub connect_timeout_ms: u64,

    /// Whole-request timeout in ms
    #[arg(long, env = "NETBENCH_SEND_TIMEOUT_MS", default_value_t = DEFAULT_TIMEOUT_MS)]
    pub send_timeout_ms: u64,

    /// Read idle timeout in ms
    #[arg(long, env = "NETBENCH_RECEIVE_TIMEOUT_MS", default_value_t = DEFAULT_TIMEOUT_MS)]
    pub receive_timeout_ms: u64,

    /// Allow one retry per fetch (`--retry`, `--retry=false`)
    #[arg(
        long,
        env = "NETBENCH_ENABLE_RETRY",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub retry: Option<bool>,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Configuration from flags, their environment fallbacks, then defaults
    fn config(&self) -> anyhow::Result<BenchConfig> {
        let config = BenchConfig::new(self.base_url.clone())
            .with_timeouts_ms(
                self.connect_timeout_ms,
                self.send_timeout_ms,
                self.receive_timeout_ms,
            )
            .with_retry(self.retry.unwrap_or(false));

        config.validate()?;
        Ok(config)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch a single item once
    Fetch {
        /// Request path, appended to the base URL
        path: String,
    },

    /// Fetch a collection once
    List {
        /// Request path, appended to the base URL
        path: String,
    },

    /// Benchmark one path, or one scenario preset
    Bench(commands::bench::BenchArgs),

    /// Inspect or run the scenario catalog
    Scenarios {
        #[command(subcommand)]
        command: commands::scenarios::ScenariosCommand,
    },
}

fn init_tracing(quiet: bool) {
    let default_filter = if quiet {
        "netbench=warn,netbench_core=warn"
    } else {
        "netbench=info,netbench_core=info"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.quiet);

    let config = cli.config()?;
    let output_format = cli.output;

    let cancel = CancellationToken::new();
    let runner = BenchRunner::http().with_cancellation(cancel.clone());

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Received interrupt, cancelling");
            cancel.cancel();
        }
    });

    match cli.command {
        Commands::Fetch { path } => {
            commands::fetch::run_fetch(&runner, &config, &path, output_format).await
        }
        Commands::List { path } => {
            commands::fetch::run_list(&runner, &config, &path, output_format).await
        }
        Commands::Bench(args) => {
            commands::bench::run(args, &runner, &config, output_format, cli.quiet).await
        }
        Commands::Scenarios { command } => {
            commands::scenarios::run(command, &runner, output_format, cli.quiet).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use netbench_core::ScenarioId;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_bench_with_scenario() {
        let cli = Cli::try_parse_from([
            "netbench",
            "--output",
            "json",
            "bench",
            "--scenario",
            "s3_error",
            "--runs",
            "5",
            "--no-warmup",
        ])
        .unwrap();

        assert_eq!(cli.output, OutputFormat::Json);
        match cli.command {
            Commands::Bench(args) => {
                assert_eq!(args.scenario, Some(ScenarioId::S3_ERROR));
                assert_eq!(args.runs, 5);
                assert!(args.no_warmup);
            }
            _ => panic!("expected bench"),
        }
    }

    #[test]
    fn test_overrides_apply_on_top_of_defaults() {
        let cli = Cli::try_parse_from([
            "netbench",
            "--base-url",
            "http://127.0.0.1:9",
            "--connect-timeout-ms",
            "0",
            "--receive-timeout-ms",
            "250",
            "--retry",
            "fetch",
            "/posts/1",
        ])
        .unwrap();

        let config = cli.config().unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:9");
        assert_eq!(config.connect_timeout_ms, 1);
        assert_eq!(config.receive_timeout_ms, 250);
        assert!(config.enable_retry);
    }

    #[test]
    fn test_retry_flag_forms() {
        let parse = |args: &[&str]| Cli::try_parse_from(args).unwrap().config().unwrap();

        assert!(parse(&["netbench", "--retry", "fetch", "/x"]).enable_retry);
        assert!(parse(&["netbench", "--retry=true", "fetch", "/x"]).enable_retry);
        assert!(!parse(&["netbench", "--retry=false", "fetch", "/x"]).enable_retry);
    }

    #[test]
    fn test_retry_from_env_can_be_switched_off() {
        std::env::set_var("NETBENCH_ENABLE_RETRY", "true");
        let from_env = Cli::try_parse_from(["netbench", "fetch", "/x"]);
        let overridden = Cli::try_parse_from(["netbench", "--retry=false", "fetch", "/x"]);
        std::env::remove_var("NETBENCH_ENABLE_RETRY");

        assert!(from_env.unwrap().config().unwrap().enable_retry);
        assert!(!overridden.unwrap().config().unwrap().enable_retry);
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let cli = Cli::try_parse_from(["netbench", "--base-url", "example.com", "list", "/posts"])
            .unwrap();
        assert!(cli.config().is_err());
    }

    #[test]
    fn test_unknown_scenario_rejected() {
        assert!(Cli::try_parse_from(["netbench", "bench", "--scenario", "S9_NOPE"]).is_err());
    }
}
