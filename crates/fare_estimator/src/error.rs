use std::fmt;

use fare_core::{ConfigError, MalformedRecord};

/// Failure of an estimation run. Every variant is fatal.
#[derive(Debug)]
pub enum FareError {
    /// A row that does not decode into a ping, with its 1-based line number.
    MalformedRecord { line: u64, source: MalformedRecord },
    Io(std::io::Error),
    Csv(csv::Error),
    Json(serde_json::Error),
    Config(ConfigError),
}

impl fmt::Display for FareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FareError::MalformedRecord { line, source } => {
                write!(f, "malformed record on line {line}: {source}")
            }
            FareError::Io(err) => write!(f, "i/o error: {err}"),
            FareError::Csv(err) => write!(f, "csv error: {err}"),
            FareError::Json(err) => write!(f, "json error: {err}"),
            FareError::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for FareError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FareError::MalformedRecord { source, .. } => Some(source),
            FareError::Io(err) => Some(err),
            FareError::Csv(err) => Some(err),
            FareError::Json(err) => Some(err),
            FareError::Config(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for FareError {
    fn from(err: std::io::Error) -> Self {
        FareError::Io(err)
    }
}

impl From<csv::Error> for FareError {
    fn from(err: csv::Error) -> Self {
        FareError::Csv(err)
    }
}

impl From<serde_json::Error> for FareError {
    fn from(err: serde_json::Error) -> Self {
        FareError::Json(err)
    }
}

impl From<ConfigError> for FareError {
    fn from(err: ConfigError) -> Self {
        FareError::Config(err)
    }
}
