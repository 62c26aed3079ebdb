//! Fare estimation from vehicle GPS pings.
//!
//! Pings are grouped into rides by consecutive ride id, turned into
//! segments, filtered for GPS noise and priced under a day/night tariff:
//!
//! - [`ping`]: typed pings parsed from raw record fields
//! - [`segment`]: kinematics between consecutive pings and the speed filter
//! - [`pricing`]: idle, day and night charges, flag and minimum fare
//! - [`accumulator`]: the ride state machine producing [`FareEstimate`]s
//! - [`clock`]: the time-zone policy used to read tariff hours
//!
//! ```
//! use fare_core::{estimate_ride_fares, EstimatorConfig, HaversineDistance, Ping, TimeZonePolicy};
//!
//! let pings = [
//!     Ping::new(1, 37.966660, 23.728308, 1405594957),
//!     Ping::new(1, 37.966627, 23.728263, 1405594966),
//!     Ping::new(2, 37.946545, 23.754918, 1405591065),
//! ];
//! let config = EstimatorConfig::default().with_timezone(TimeZonePolicy::Utc);
//! let estimates = estimate_ride_fares(pings, HaversineDistance, config);
//! assert_eq!(estimates.len(), 2);
//! assert!(estimates.iter().all(|e| e.fare >= fare_core::pricing::MINIMUM_FARE));
//! ```

pub mod accumulator;
pub mod clock;
pub mod config;
pub mod error;
pub mod ping;
pub mod pricing;
pub mod segment;
pub mod spatial;
pub mod telemetry;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use accumulator::{estimate_fares, estimate_ride_fares, FareEstimate, FareEstimates, RideAccumulator};
pub use clock::TimeZonePolicy;
pub use config::EstimatorConfig;
pub use error::{ConfigError, MalformedRecord, RecordField};
pub use ping::Ping;
pub use pricing::{ride_fare, segment_fare, FareBreakdown, TariffSchedule};
pub use segment::{build_segment, Segment, SegmentFilter, SegmentRejection};
pub use spatial::{DistanceProvider, GeoPoint, HaversineDistance};
pub use telemetry::RunTelemetry;
