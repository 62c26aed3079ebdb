//! Error types shared by the fare pipeline.
//!
//! Only two things can go wrong inside the core: an input row that does not
//! decode into a ping, and a configuration that cannot produce sane fares.
//! Rejected segments are a normal filtering outcome and live in
//! [`crate::segment::SegmentRejection`] instead.

use std::fmt;

/// Column of a ping record, in input order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordField {
    RideId,
    Lat,
    Lng,
    Timestamp,
}

impl RecordField {
    pub fn name(self) -> &'static str {
        match self {
            RecordField::RideId => "ride_id",
            RecordField::Lat => "lat",
            RecordField::Lng => "lng",
            RecordField::Timestamp => "timestamp",
        }
    }
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A row that failed field-level parsing. Fatal to the whole run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedRecord {
    FieldCount {
        expected: usize,
        found: usize,
    },
    InvalidField {
        field: RecordField,
        value: String,
        reason: String,
    },
}

impl MalformedRecord {
    pub(crate) fn invalid(field: RecordField, value: &str, reason: impl fmt::Display) -> Self {
        MalformedRecord::InvalidField {
            field,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    /// The offending column, if the failure is tied to one.
    pub fn field(&self) -> Option<RecordField> {
        match self {
            MalformedRecord::FieldCount { .. } => None,
            MalformedRecord::InvalidField { field, .. } => Some(*field),
        }
    }
}

impl fmt::Display for MalformedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedRecord::FieldCount { expected, found } => {
                write!(f, "expected {expected} fields, found {found}")
            }
            MalformedRecord::InvalidField {
                field,
                value,
                reason,
            } => write!(f, "invalid {field} {value:?}: {reason}"),
        }
    }
}

impl std::error::Error for MalformedRecord {}

/// Invalid estimator configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Invalid(String),
}

impl ConfigError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        ConfigError::Invalid(message.into())
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "failed to read config: {err}"),
            ConfigError::Json(err) => write!(f, "failed to parse config: {err}"),
            ConfigError::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            ConfigError::Json(err) => Some(err),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Json(err)
    }
}
