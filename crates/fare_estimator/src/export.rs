//! Estimate export.
//!
//! CSV is the billing contract: one `ride_id,fare` row per ride, no header,
//! fares fixed to four decimals. JSON carries the full estimates, including
//! fare breakdowns, for inspection.

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use fare_core::FareEstimate;
use serde::{Deserialize, Serialize};

use crate::error::FareError;

#[path = "export/csv.rs"]
mod csv;
#[path = "export/json.rs"]
mod json;
#[path = "export/writer_utils.rs"]
mod writer_utils;

/// File name used when no output path is given.
pub const DEFAULT_CSV_OUTPUT: &str = "estimated_fares.csv";
pub const DEFAULT_JSON_OUTPUT: &str = "estimated_fares.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

impl OutputFormat {
    pub fn default_output(self) -> PathBuf {
        match self {
            OutputFormat::Csv => PathBuf::from(DEFAULT_CSV_OUTPUT),
            OutputFormat::Json => PathBuf::from(DEFAULT_JSON_OUTPUT),
        }
    }
}

/// Export estimates to CSV.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn export_to_csv(estimates: &[FareEstimate], path: impl AsRef<Path>) -> Result<(), FareError> {
    let file = writer_utils::create_output_file(path)?;
    csv::export_to_csv_impl(estimates, file)
}

/// Export estimates with their breakdowns to JSON.
///
/// # Errors
///
/// Returns an error if the file cannot be created or serialization fails.
pub fn export_to_json(estimates: &[FareEstimate], path: impl AsRef<Path>) -> Result<(), FareError> {
    let file = writer_utils::create_output_file(path)?;
    json::export_to_json_impl(estimates, file)
}

pub fn export(
    estimates: &[FareEstimate],
    format: OutputFormat,
    path: impl AsRef<Path>,
) -> Result<(), FareError> {
    match format {
        OutputFormat::Csv => export_to_csv(estimates, path),
        OutputFormat::Json => export_to_json(estimates, path),
    }
}

/// Write the CSV rows to any writer (e.g. stdout).
pub fn write_csv<W: std::io::Write>(estimates: &[FareEstimate], writer: W) -> Result<(), FareError> {
    csv::export_to_csv_impl(estimates, writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fare_core::test_helpers::{fixed_distance, ping_at, utc_instant};
    use fare_core::{estimate_ride_fares, EstimatorConfig, TimeZonePolicy};
    use tempfile::NamedTempFile;

    fn sample_estimates() -> Vec<FareEstimate> {
        let noon = utc_instant(2014, 7, 17, 12, 0, 0);
        let pings = vec![
            ping_at(1, noon),
            ping_at(1, noon + 600),
            ping_at(12, noon + 700),
        ];
        let config = EstimatorConfig::default().with_timezone(TimeZonePolicy::Utc);
        estimate_ride_fares(pings, fixed_distance(8.0), config)
    }

    #[test]
    fn test_export_to_csv() {
        let file = NamedTempFile::new().unwrap();
        export_to_csv(&sample_estimates(), file.path()).unwrap();

        let contents = std::fs::read_to_string(file.path()).unwrap();
        // 8 km in ten minutes at noon: 1.30 + 0.74 * 8.
        assert_eq!(contents, "1,7.2200\n12,3.4700\n");
    }

    #[test]
    fn test_export_to_json() {
        let file = NamedTempFile::new().unwrap();
        export_to_json(&sample_estimates(), file.path()).unwrap();

        let contents = std::fs::read_to_string(file.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
        let rides = value.as_array().unwrap();
        assert_eq!(rides.len(), 2);
        assert_eq!(rides[1]["ride_id"], 12);
        assert_eq!(rides[1]["breakdown"]["minimum_applied"], true);
    }

    #[test]
    fn empty_estimates_write_an_empty_csv() {
        let mut buffer = Vec::new();
        write_csv(&[], &mut buffer).unwrap();
        assert!(buffer.is_empty());
    }

    #[test]
    fn default_output_follows_format() {
        assert_eq!(OutputFormat::Csv.default_output(), PathBuf::from("estimated_fares.csv"));
        assert_eq!(OutputFormat::Json.default_output(), PathBuf::from("estimated_fares.json"));
    }
}
