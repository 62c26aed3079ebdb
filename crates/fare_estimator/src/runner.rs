//! Batch estimation: input file in, one fare per ride out.

use std::path::{Path, PathBuf};

use fare_core::{
    DistanceProvider, EstimatorConfig, FareEstimate, FareEstimates, HaversineDistance,
    RunTelemetry,
};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};

use crate::error::FareError;
use crate::export::{export, OutputFormat};
use crate::input::open_pings;

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    pub format: OutputFormat,
    pub config: EstimatorConfig,
    pub show_progress: bool,
}

impl RunOptions {
    /// Options for a CSV run with the default configuration.
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            format: OutputFormat::Csv,
            config: EstimatorConfig::default(),
            show_progress: false,
        }
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_config(mut self, config: EstimatorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub estimates: Vec<FareEstimate>,
    pub telemetry: RunTelemetry,
    pub output: PathBuf,
}

/// Run the estimator with great-circle distances.
pub fn run_estimation(options: &RunOptions) -> Result<RunReport, FareError> {
    run_estimation_with(options, HaversineDistance)
}

/// Run the estimator with a custom distance provider.
///
/// Nothing is written when the input contains a malformed record.
pub fn run_estimation_with<D: DistanceProvider>(
    options: &RunOptions,
    distance: D,
) -> Result<RunReport, FareError> {
    options.config.validate()?;
    info!(
        "Estimating fares from {} (time zone: {})",
        options.input.display(),
        options.config.timezone
    );

    let progress = options.show_progress.then(ping_spinner);
    let pings = open_pings(&options.input)?.inspect(|_| {
        if let Some(bar) = &progress {
            bar.inc(1);
        }
    });

    let mut rides = FareEstimates::new(pings, distance, options.config);
    let mut estimates = Vec::new();
    for estimate in rides.by_ref() {
        let estimate = match estimate {
            Ok(estimate) => estimate,
            Err(err) => {
                if let Some(bar) = &progress {
                    bar.abandon_with_message("aborted");
                }
                return Err(err);
            }
        };
        info!("Ride with ID: {} Fare: {}", estimate.ride_id, estimate.fare_text());
        estimates.push(estimate);
    }
    let telemetry = rides.telemetry().clone();
    if let Some(bar) = &progress {
        bar.finish_with_message(format!("{} rides", telemetry.rides_emitted));
    }

    if estimates.is_empty() {
        warn!("No pings in {}; writing an empty result", options.input.display());
    }
    export(&estimates, options.format, &options.output)?;
    log_summary(&telemetry, &options.output);

    Ok(RunReport {
        estimates,
        telemetry,
        output: options.output.clone(),
    })
}

fn ping_spinner() -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {pos} pings {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar
}

fn log_summary(telemetry: &RunTelemetry, output: &Path) {
    info!(
        "Wrote {} rides to {} ({} pings, {} segments kept, {} dropped: {} zero/negative duration, {} too fast, {} out of range; {} at minimum fare)",
        telemetry.rides_emitted,
        output.display(),
        telemetry.pings_read,
        telemetry.segments_accepted,
        telemetry.segments_rejected(),
        telemetry.rejected_non_positive_duration,
        telemetry.rejected_implausible_speed,
        telemetry.rejected_unrepresentable_duration,
        telemetry.rides_at_minimum_fare,
    );
}
