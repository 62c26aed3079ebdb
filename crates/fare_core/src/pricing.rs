//! Day/night tariff: prices segments and folds them into one ride fare.
//!
//! A segment slow enough to count as idle is billed by time. Anything faster
//! is billed by distance, apportioned between the day and night rates by the
//! share of its wall-clock duration spent in each tariff window.

use serde::{Deserialize, Serialize};

use crate::clock::TimeZonePolicy;
use crate::error::ConfigError;
use crate::segment::Segment;

/// One-time charge applied to every ride.
pub const FLAG: f64 = 1.30;

/// Lowest fare a ride can be charged.
pub const MINIMUM_FARE: f64 = 3.47;

/// Charge per hour while idle.
pub const IDLE_RATE_PER_HOUR: f64 = 11.90;

/// Per-kilometre rate between 05:00 and midnight.
pub const DAY_RATE_PER_KM: f64 = 0.74;

/// Per-kilometre rate between midnight and 05:00.
pub const NIGHT_RATE_PER_KM: f64 = 1.30;

/// Segments at or below this average speed are billed as idle time.
pub const IDLE_SPEED_KMH: f64 = 10.0;

/// Local hour at which the day window opens; night runs from midnight until then.
pub const DAY_START_HOUR: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TariffSchedule {
    pub flag: f64,
    pub minimum_fare: f64,
    pub idle_rate_per_hour: f64,
    pub day_rate_per_km: f64,
    pub night_rate_per_km: f64,
    pub idle_speed_kmh: f64,
    pub day_start_hour: u32,
}

impl Default for TariffSchedule {
    fn default() -> Self {
        Self {
            flag: FLAG,
            minimum_fare: MINIMUM_FARE,
            idle_rate_per_hour: IDLE_RATE_PER_HOUR,
            day_rate_per_km: DAY_RATE_PER_KM,
            night_rate_per_km: NIGHT_RATE_PER_KM,
            idle_speed_kmh: IDLE_SPEED_KMH,
            day_start_hour: DAY_START_HOUR,
        }
    }
}

impl TariffSchedule {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let amounts = [
            ("flag", self.flag),
            ("minimum_fare", self.minimum_fare),
            ("idle_rate_per_hour", self.idle_rate_per_hour),
            ("day_rate_per_km", self.day_rate_per_km),
            ("night_rate_per_km", self.night_rate_per_km),
            ("idle_speed_kmh", self.idle_speed_kmh),
        ];
        for (name, value) in amounts {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::invalid(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        if !(1..=23).contains(&self.day_start_hour) {
            return Err(ConfigError::invalid(format!(
                "day_start_hour must be between 1 and 23, got {}",
                self.day_start_hour
            )));
        }
        Ok(())
    }
}

/// How a single segment was billed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentCharge {
    Idle {
        hours: f64,
        amount: f64,
    },
    Distance {
        day_ratio: f64,
        night_ratio: f64,
        day_amount: f64,
        night_amount: f64,
    },
}

impl SegmentCharge {
    pub fn amount(&self) -> f64 {
        match self {
            SegmentCharge::Idle { amount, .. } => *amount,
            SegmentCharge::Distance {
                day_amount,
                night_amount,
                ..
            } => day_amount + night_amount,
        }
    }
}

/// Price one segment under `schedule`, reading wall-clock hours in `tz`.
pub fn charge_segment(segment: &Segment, schedule: &TariffSchedule, tz: &TimeZonePolicy) -> SegmentCharge {
    if segment.average_speed_kmh <= schedule.idle_speed_kmh {
        let hours = segment.duration_hours();
        return SegmentCharge::Idle {
            hours,
            amount: schedule.idle_rate_per_hour * hours,
        };
    }

    let duration = segment.duration_secs as f64;
    let night_secs = tz.seconds_in_daily_window(
        segment.started_at,
        segment.ended_at,
        0,
        schedule.day_start_hour,
    );
    let day_secs = segment.duration_secs - night_secs;
    let day_ratio = day_secs as f64 / duration;
    let night_ratio = night_secs as f64 / duration;

    SegmentCharge::Distance {
        day_ratio,
        night_ratio,
        day_amount: schedule.day_rate_per_km * segment.distance_km * day_ratio,
        night_amount: schedule.night_rate_per_km * segment.distance_km * night_ratio,
    }
}

pub fn segment_fare(segment: &Segment, schedule: &TariffSchedule, tz: &TimeZonePolicy) -> f64 {
    charge_segment(segment, schedule, tz).amount()
}

/// Where a ride's fare came from.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FareBreakdown {
    pub flag: f64,
    pub idle_hours: f64,
    pub idle_charge: f64,
    pub day_distance_km: f64,
    pub night_distance_km: f64,
    pub day_charge: f64,
    pub night_charge: f64,
    /// Flag plus every segment charge, before the minimum floor.
    pub subtotal: f64,
    pub minimum_applied: bool,
    pub total: f64,
}

impl FareBreakdown {
    /// Distance covered by non-idle segments.
    pub fn billed_distance_km(&self) -> f64 {
        self.day_distance_km + self.night_distance_km
    }
}

/// Fold a ride's segments, in chronological order, into a fare breakdown.
pub fn ride_fare_breakdown(
    segments: &[Segment],
    schedule: &TariffSchedule,
    tz: &TimeZonePolicy,
) -> FareBreakdown {
    let mut breakdown = FareBreakdown {
        flag: schedule.flag,
        subtotal: schedule.flag,
        ..Default::default()
    };

    for segment in segments {
        let charge = charge_segment(segment, schedule, tz);
        match charge {
            SegmentCharge::Idle { hours, amount } => {
                breakdown.idle_hours += hours;
                breakdown.idle_charge += amount;
            }
            SegmentCharge::Distance {
                day_ratio,
                night_ratio,
                day_amount,
                night_amount,
            } => {
                breakdown.day_distance_km += segment.distance_km * day_ratio;
                breakdown.night_distance_km += segment.distance_km * night_ratio;
                breakdown.day_charge += day_amount;
                breakdown.night_charge += night_amount;
            }
        }
        breakdown.subtotal += charge.amount();
    }

    breakdown.minimum_applied = breakdown.subtotal < schedule.minimum_fare;
    breakdown.total = if breakdown.minimum_applied {
        schedule.minimum_fare
    } else {
        breakdown.subtotal
    };
    breakdown
}

/// Flag plus every segment charge, floored at the minimum fare.
pub fn ride_fare(segments: &[Segment], schedule: &TariffSchedule, tz: &TimeZonePolicy) -> f64 {
    ride_fare_breakdown(segments, schedule, tz).total
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-8;

    // 2014-08-16 00:00:00 UTC
    const MIDNIGHT: i64 = 1_408_147_200;
    const FIVE_AM: i64 = MIDNIGHT + 5 * 3600;

    fn segment(started_at: i64, ended_at: i64, distance_km: f64) -> Segment {
        Segment::between(started_at, ended_at, distance_km).expect("positive duration")
    }

    fn fare(segment: &Segment) -> f64 {
        segment_fare(segment, &TariffSchedule::default(), &TimeZonePolicy::Utc)
    }

    #[test]
    fn idle_segment_is_billed_by_time() {
        let idle = segment(MIDNIGHT - 20, MIDNIGHT - 10, 0.0);
        assert!((fare(&idle) - IDLE_RATE_PER_HOUR * (10.0 / 3600.0)).abs() < EPSILON);

        // Exactly at the idle threshold still counts as idle: 0.1 km in 36 s.
        let threshold = segment(FIVE_AM + 100, FIVE_AM + 136, 0.1);
        assert!((threshold.average_speed_kmh - IDLE_SPEED_KMH).abs() < 1e-9);
        assert!(matches!(
            charge_segment(&threshold, &TariffSchedule::default(), &TimeZonePolicy::Utc),
            SegmentCharge::Idle { .. }
        ));
    }

    #[test]
    fn whole_day_and_whole_night_segments() {
        let day = segment(MIDNIGHT - 20, MIDNIGHT - 10, 0.056);
        assert!((fare(&day) - DAY_RATE_PER_KM * 0.056).abs() < EPSILON);

        let night = segment(MIDNIGHT + 10, MIDNIGHT + 20, 0.056);
        assert!((fare(&night) - NIGHT_RATE_PER_KM * 0.056).abs() < EPSILON);
    }

    #[test]
    fn five_am_boundary_endpoints() {
        let ending_at_five = segment(FIVE_AM - 10, FIVE_AM, 0.056);
        assert!((fare(&ending_at_five) - NIGHT_RATE_PER_KM * 0.056).abs() < EPSILON);

        let starting_at_five = segment(FIVE_AM, FIVE_AM + 10, 0.056);
        assert!((fare(&starting_at_five) - DAY_RATE_PER_KM * 0.056).abs() < EPSILON);

        // Entirely inside 05:00-05:59 is plain daytime, not a zero charge.
        let inside_five = segment(FIVE_AM + 10, FIVE_AM + 20, 0.056);
        assert!((fare(&inside_five) - DAY_RATE_PER_KM * 0.056).abs() < EPSILON);
    }

    #[test]
    fn midnight_crossing_splits_evenly() {
        let crossing = segment(MIDNIGHT - 10, MIDNIGHT + 10, 0.100);
        let expected = DAY_RATE_PER_KM * 0.100 * 0.5 + NIGHT_RATE_PER_KM * 0.100 * 0.5;
        assert!((fare(&crossing) - expected).abs() < EPSILON);
        assert!((expected - 0.102).abs() < EPSILON);
    }

    #[test]
    fn five_am_crossing_splits_evenly() {
        let crossing = segment(FIVE_AM - 10, FIVE_AM + 10, 0.100);
        let expected = DAY_RATE_PER_KM * 0.100 * 0.5 + NIGHT_RATE_PER_KM * 0.100 * 0.5;
        assert!((fare(&crossing) - expected).abs() < EPSILON);
    }

    #[test]
    fn unequal_midnight_split() {
        let crossing = segment(MIDNIGHT - 10, MIDNIGHT + 20, 0.100);
        let expected =
            DAY_RATE_PER_KM * 0.100 * (1.0 / 3.0) + NIGHT_RATE_PER_KM * 0.100 * (2.0 / 3.0);
        assert!((fare(&crossing) - expected).abs() < EPSILON);

        match charge_segment(&crossing, &TariffSchedule::default(), &TimeZonePolicy::Utc) {
            SegmentCharge::Distance {
                day_ratio,
                night_ratio,
                ..
            } => assert!((day_ratio + night_ratio - 1.0).abs() < EPSILON),
            other => panic!("expected a distance charge, got {other:?}"),
        }
    }

    #[test]
    fn time_zone_policy_moves_the_windows() {
        // 23:59:50 to 00:00:00 UTC is 01:59:50 to 02:00:00 at +02:00, i.e. night.
        let late = segment(MIDNIGHT - 10, MIDNIGHT, 0.056);
        let tz = TimeZonePolicy::fixed_hours(2);
        let charged = segment_fare(&late, &TariffSchedule::default(), &tz);
        assert!((charged - NIGHT_RATE_PER_KM * 0.056).abs() < EPSILON);
    }

    #[test]
    fn empty_ride_is_floored_to_minimum() {
        let breakdown = ride_fare_breakdown(&[], &TariffSchedule::default(), &TimeZonePolicy::Utc);
        assert_eq!(breakdown.subtotal, FLAG);
        assert!(breakdown.minimum_applied);
        assert_eq!(breakdown.total, MINIMUM_FARE);
    }

    #[test]
    fn ride_fare_sums_flag_and_segments() {
        let long_day = segment(MIDNIGHT - 3600, MIDNIGHT - 1800, 10.0);
        let idle = segment(MIDNIGHT - 1800, MIDNIGHT - 1200, 0.5);
        let schedule = TariffSchedule::default();

        let expected = FLAG + DAY_RATE_PER_KM * 10.0 + IDLE_RATE_PER_HOUR * (600.0 / 3600.0);
        let breakdown = ride_fare_breakdown(&[long_day, idle], &schedule, &TimeZonePolicy::Utc);
        assert!((breakdown.total - expected).abs() < EPSILON);
        assert!(!breakdown.minimum_applied);
        assert!((breakdown.billed_distance_km() - 10.0).abs() < EPSILON);
        assert_eq!(
            ride_fare(&[long_day, idle], &schedule, &TimeZonePolicy::Utc),
            breakdown.total
        );
    }

    #[test]
    fn schedule_validation() {
        assert!(TariffSchedule::default().validate().is_ok());

        let negative = TariffSchedule {
            day_rate_per_km: -0.1,
            ..Default::default()
        };
        assert!(negative.validate().is_err());

        let midnight_day = TariffSchedule {
            day_start_hour: 0,
            ..Default::default()
        };
        assert!(midnight_day.validate().is_err());
    }
}
