//! Test helpers for building pings and instants without boilerplate.

use chrono::{NaiveDate, TimeZone, Utc};

use crate::ping::Ping;
use crate::spatial::GeoPoint;

/// Latitude/longitude of central Athens, used as a neutral default position.
pub const TEST_LAT: f64 = 37.9755;
pub const TEST_LNG: f64 = 23.7348;

/// Epoch seconds of a UTC wall-clock instant.
///
/// # Panics
///
/// Panics if the date or time is invalid.
pub fn utc_instant(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> i64 {
    let naive = NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, second))
        .expect("valid test instant");
    Utc.from_utc_datetime(&naive).timestamp()
}

/// A ping at the default test position.
pub fn ping_at(ride_id: i64, timestamp_secs: i64) -> Ping {
    Ping::new(ride_id, TEST_LAT, TEST_LNG, timestamp_secs)
}

/// Distance provider returning the same distance for every pair.
pub fn fixed_distance(km: f64) -> impl Fn(GeoPoint, GeoPoint) -> f64 + Copy {
    move |_, _| km
}

/// `count` pings of one ride, `step_secs` apart, heading north by `step_deg`.
pub fn straight_ride(ride_id: i64, start: i64, step_secs: i64, step_deg: f64, count: usize) -> Vec<Ping> {
    (0..count)
        .map(|i| {
            Ping::new(
                ride_id,
                TEST_LAT + step_deg * i as f64,
                TEST_LNG,
                start + step_secs * i as i64,
            )
        })
        .collect()
}
