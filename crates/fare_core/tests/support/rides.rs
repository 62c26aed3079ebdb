use fare_core::{EstimatorConfig, FareEstimate, Ping, TimeZonePolicy};
use fare_core::test_helpers::fixed_distance;

pub const EPSILON: f64 = 1e-8;

/// Default tariff read in UTC so tests do not depend on the host zone.
pub fn utc_config() -> EstimatorConfig {
    EstimatorConfig::default().with_timezone(TimeZonePolicy::Utc)
}

/// Run pings through the estimator with every pair `km` apart.
pub fn estimate_with_fixed_distance(pings: Vec<Ping>, km: f64) -> Vec<FareEstimate> {
    fare_core::estimate_ride_fares(pings, fixed_distance(km), utc_config())
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPSILON,
        "expected {expected}, got {actual}"
    );
}
