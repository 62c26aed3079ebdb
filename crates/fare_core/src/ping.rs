//! GPS pings: one typed observation per input row.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{MalformedRecord, RecordField};
use crate::spatial::GeoPoint;

/// Number of columns in a ping record: ride id, lat, lng, epoch seconds.
pub const PING_FIELD_COUNT: usize = 4;

/// One GPS observation of a vehicle on a ride.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ping {
    pub ride_id: i64,
    pub lat: f64,
    pub lng: f64,
    /// Unix epoch seconds.
    pub timestamp_secs: i64,
}

impl Ping {
    pub fn new(ride_id: i64, lat: f64, lng: f64, timestamp_secs: i64) -> Self {
        Self {
            ride_id,
            lat,
            lng,
            timestamp_secs,
        }
    }

    /// Parse the four text columns of one input row.
    ///
    /// Integer columns reject fractional text (`"9.3"` is not a ride id) and
    /// coordinates must be finite decimals.
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Result<Self, MalformedRecord> {
        let [ride_id, lat, lng, timestamp] = fields else {
            return Err(MalformedRecord::FieldCount {
                expected: PING_FIELD_COUNT,
                found: fields.len(),
            });
        };

        Ok(Self {
            ride_id: parse_integer(ride_id.as_ref(), RecordField::RideId)?,
            lat: parse_coordinate(lat.as_ref(), RecordField::Lat)?,
            lng: parse_coordinate(lng.as_ref(), RecordField::Lng)?,
            timestamp_secs: parse_integer(timestamp.as_ref(), RecordField::Timestamp)?,
        })
    }

    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }
}

fn parse_integer(raw: &str, field: RecordField) -> Result<i64, MalformedRecord> {
    let value = raw.trim();
    i64::from_str(value).map_err(|err| MalformedRecord::invalid(field, value, err))
}

fn parse_coordinate(raw: &str, field: RecordField) -> Result<f64, MalformedRecord> {
    let value = raw.trim();
    let parsed = f64::from_str(value).map_err(|err| MalformedRecord::invalid(field, value, err))?;
    if !parsed.is_finite() {
        return Err(MalformedRecord::invalid(field, value, "coordinate must be finite"));
    }
    Ok(parsed)
}
