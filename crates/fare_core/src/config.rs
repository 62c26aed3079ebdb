//! Estimator configuration: tariff, segment filter and time-zone policy.
//!
//! Every field has a default, so a JSON file only needs the values it
//! overrides:
//!
//! ```json
//! { "tariff": { "night_rate_per_km": 1.45 }, "timezone": { "kind": "utc" } }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::clock::TimeZonePolicy;
use crate::error::ConfigError;
use crate::pricing::TariffSchedule;
use crate::segment::SegmentFilter;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EstimatorConfig {
    pub tariff: TariffSchedule,
    pub filter: SegmentFilter,
    pub timezone: TimeZonePolicy,
}

impl EstimatorConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn with_timezone(mut self, timezone: TimeZonePolicy) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn with_tariff(mut self, tariff: TariffSchedule) -> Self {
        self.tariff = tariff;
        self
    }

    pub fn with_max_speed_kmh(mut self, max_speed_kmh: f64) -> Self {
        self.filter.max_speed_kmh = max_speed_kmh;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tariff.validate()?;
        self.timezone.validate()?;

        let max_speed = self.filter.max_speed_kmh;
        if !max_speed.is_finite() || max_speed <= self.tariff.idle_speed_kmh {
            return Err(ConfigError::invalid(format!(
                "max_speed_kmh ({max_speed}) must exceed idle_speed_kmh ({})",
                self.tariff.idle_speed_kmh
            )));
        }
        Ok(())
    }
}
