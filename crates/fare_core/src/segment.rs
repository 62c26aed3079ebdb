//! Segments: the kinematics between two consecutive pings of one ride.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ping::Ping;
use crate::spatial::DistanceProvider;

/// Average speed at or above which a segment is treated as GPS noise.
pub const MAX_PLAUSIBLE_SPEED_KMH: f64 = 100.0;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Distance, duration and speed between two pings of the same ride.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub distance_km: f64,
    pub duration_secs: i64,
    pub average_speed_kmh: f64,
    /// Epoch seconds of the earlier ping.
    pub started_at: i64,
    /// Epoch seconds of the later ping.
    pub ended_at: i64,
}

impl Segment {
    /// Build a segment directly from its endpoints and distance.
    ///
    /// Fails when `ended_at` does not follow `started_at`, or when the gap
    /// between them does not fit in `i64` seconds.
    pub fn between(
        started_at: i64,
        ended_at: i64,
        distance_km: f64,
    ) -> Result<Self, SegmentRejection> {
        let duration_secs = ended_at
            .checked_sub(started_at)
            .ok_or(SegmentRejection::UnrepresentableDuration)?;
        if duration_secs <= 0 {
            return Err(SegmentRejection::NonPositiveDuration { duration_secs });
        }
        Ok(Self {
            distance_km,
            duration_secs,
            average_speed_kmh: distance_km / (duration_secs as f64 / SECONDS_PER_HOUR),
            started_at,
            ended_at,
        })
    }

    pub fn duration_hours(&self) -> f64 {
        self.duration_secs as f64 / SECONDS_PER_HOUR
    }
}

/// Plausibility filter applied to every candidate segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentFilter {
    pub max_speed_kmh: f64,
}

impl Default for SegmentFilter {
    fn default() -> Self {
        Self {
            max_speed_kmh: MAX_PLAUSIBLE_SPEED_KMH,
        }
    }
}

/// Why a pair of pings did not become a segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentRejection {
    /// The later ping is not after the earlier one.
    NonPositiveDuration { duration_secs: i64 },
    /// Timestamps so far apart that their difference overflows.
    UnrepresentableDuration,
    /// Average speed reached the filter ceiling.
    ImplausibleSpeed { speed_kmh: f64 },
}

impl fmt::Display for SegmentRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentRejection::NonPositiveDuration { duration_secs } => {
                write!(f, "non-positive duration ({duration_secs} s)")
            }
            SegmentRejection::UnrepresentableDuration => f.write_str("duration out of range"),
            SegmentRejection::ImplausibleSpeed { speed_kmh } => {
                write!(f, "implausible speed ({speed_kmh:.1} km/h)")
            }
        }
    }
}

/// Turn two chronologically adjacent pings of one ride into a segment.
///
/// Input order is trusted; the caller guarantees both pings share a ride id.
pub fn build_segment<D: DistanceProvider + ?Sized>(
    previous: &Ping,
    current: &Ping,
    distance: &D,
    filter: &SegmentFilter,
) -> Result<Segment, SegmentRejection> {
    debug_assert_eq!(
        previous.ride_id, current.ride_id,
        "segments are only built within one ride"
    );

    let distance_km = distance.distance_km(previous.position(), current.position());
    let segment = Segment::between(previous.timestamp_secs, current.timestamp_secs, distance_km)?;

    if segment.average_speed_kmh >= filter.max_speed_kmh {
        return Err(SegmentRejection::ImplausibleSpeed {
            speed_kmh: segment.average_speed_kmh,
        });
    }

    Ok(segment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::GeoPoint;

    fn fixed(km: f64) -> impl Fn(GeoPoint, GeoPoint) -> f64 {
        move |_, _| km
    }

    #[test]
    fn builds_segment_with_speed_and_instants() {
        let a = Ping::new(1, 37.0, 23.0, 1_000);
        let b = Ping::new(1, 37.0, 23.0, 1_360);
        let segment = build_segment(&a, &b, &fixed(2.0), &SegmentFilter::default()).unwrap();

        assert_eq!(segment.duration_secs, 360);
        assert_eq!(segment.started_at, 1_000);
        assert_eq!(segment.ended_at, 1_360);
        assert!((segment.average_speed_kmh - 20.0).abs() < 1e-9);
        assert!((segment.duration_hours() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn rejects_zero_and_negative_duration() {
        let a = Ping::new(1, 37.0, 23.0, 1_000);
        let same_instant = Ping::new(1, 37.1, 23.0, 1_000);
        let earlier = Ping::new(1, 37.1, 23.0, 990);
        let filter = SegmentFilter::default();

        assert_eq!(
            build_segment(&a, &same_instant, &fixed(0.5), &filter),
            Err(SegmentRejection::NonPositiveDuration { duration_secs: 0 })
        );
        assert_eq!(
            build_segment(&a, &earlier, &fixed(0.5), &filter),
            Err(SegmentRejection::NonPositiveDuration { duration_secs: -10 })
        );
    }

    #[test]
    fn extreme_timestamps_do_not_overflow() {
        let filter = SegmentFilter::default();
        let earliest = Ping::new(1, 37.0, 23.0, i64::MIN);
        let latest = Ping::new(1, 37.0, 23.0, i64::MAX);

        assert_eq!(
            build_segment(&earliest, &latest, &fixed(0.5), &filter),
            Err(SegmentRejection::UnrepresentableDuration)
        );
        assert_eq!(
            build_segment(&latest, &earliest, &fixed(0.5), &filter),
            Err(SegmentRejection::UnrepresentableDuration)
        );
        assert_eq!(
            Segment::between(-1, i64::MAX, 0.5),
            Err(SegmentRejection::UnrepresentableDuration)
        );
    }

    #[test]
    fn speed_filter_boundary_is_inclusive() {
        let a = Ping::new(1, 37.0, 23.0, 0);
        let b = Ping::new(1, 37.0, 23.0, 36);
        let filter = SegmentFilter::default();

        // 1 km in 36 s is exactly 100 km/h.
        assert!(matches!(
            build_segment(&a, &b, &fixed(1.0), &filter),
            Err(SegmentRejection::ImplausibleSpeed { .. })
        ));
        assert!(build_segment(&a, &b, &fixed(0.99), &filter).is_ok());
    }
}
