use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{ArgAction, Parser};
use fare_core::{EstimatorConfig, TimeZonePolicy};
use fare_estimator::{run_estimation, OutputFormat, RunOptions};
use log::{error, info, LevelFilter};

#[derive(Parser)]
#[command(
    name = "fare_estimator",
    about = "Estimate per-ride fares from GPS pings",
    long_about = "Reads headerless `ride_id,lat,lng,timestamp` rows ordered by ride and time,\n\
                  groups consecutive pings into rides and writes one fare per ride."
)]
struct Cli {
    /// Ping file to read
    input: PathBuf,
    /// Output file [default: estimated_fares.csv, or .json with --format json]
    output: Option<PathBuf>,
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,
    /// JSON file overriding tariff, filter and time-zone settings
    #[arg(long, env = "FARE_ESTIMATOR_CONFIG")]
    config: Option<PathBuf>,
    /// Zone for tariff hours: `local`, `utc` or an offset such as `+03:00`
    #[arg(long)]
    timezone: Option<TimeZonePolicy>,
    /// Show a progress spinner while reading pings
    #[arg(long)]
    progress: bool,
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    // RUST_LOG still wins when set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level.as_str()))
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => EstimatorConfig::from_json_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => EstimatorConfig::default(),
    };
    if let Some(timezone) = cli.timezone {
        config = config.with_timezone(timezone);
    }

    let output = cli
        .output
        .unwrap_or_else(|| cli.format.default_output());
    let options = RunOptions::new(cli.input, output)
        .with_format(cli.format)
        .with_config(config)
        .with_progress(cli.progress);

    let report = run_estimation(&options)
        .with_context(|| format!("failed to estimate fares from {}", options.input.display()))?;
    info!(
        "Total estimated fares: {:.4} over {} rides",
        report.telemetry.total_fare, report.telemetry.rides_emitted
    );
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
