//! Batch fare estimation over ping files.
//!
//! - [`input`]: headerless CSV ping decoding with line-numbered errors
//! - [`export`]: CSV (`ride_id,fare`) and JSON result export
//! - [`runner`]: the end-to-end run used by the `fare_estimator` binary

pub mod error;
pub mod export;
pub mod input;
pub mod runner;

pub use error::FareError;
pub use export::{export_to_csv, export_to_json, OutputFormat, DEFAULT_CSV_OUTPUT};
pub use input::{open_pings, read_pings};
pub use runner::{run_estimation, run_estimation_with, RunOptions, RunReport};
