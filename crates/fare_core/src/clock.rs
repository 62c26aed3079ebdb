//! Wall-clock policy: how epoch seconds map onto the local hours the tariff
//! schedule is written in.
//!
//! The tariff is a recurring daily schedule, so only the local clock hour
//! matters. Which zone "local" means is an explicit configuration choice.

use std::fmt;
use std::str::FromStr;

use chrono::{FixedOffset, Local, NaiveDate, Offset, TimeDelta, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Largest accepted UTC offset, matching chrono's own limit.
const MAX_OFFSET_SECS: i32 = 86_399;

/// Zone used to read local hours from epoch seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimeZonePolicy {
    /// The zone of the machine running the estimator.
    #[default]
    Local,
    Utc,
    /// A fixed offset east of UTC, in seconds.
    FixedOffset { offset_secs: i32 },
}

impl TimeZonePolicy {
    pub fn fixed_hours(hours: i32) -> Self {
        TimeZonePolicy::FixedOffset {
            offset_secs: hours * 3600,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            TimeZonePolicy::FixedOffset { offset_secs } if offset_secs.abs() > MAX_OFFSET_SECS => {
                Err(ConfigError::invalid(format!(
                    "utc offset {offset_secs} s is out of range"
                )))
            }
            _ => Ok(()),
        }
    }

    /// Local calendar date containing `epoch_secs`.
    pub fn local_date(&self, epoch_secs: i64) -> Option<NaiveDate> {
        match *self {
            TimeZonePolicy::Local => local_date_in(&Local, epoch_secs),
            TimeZonePolicy::Utc => local_date_in(&Utc, epoch_secs),
            TimeZonePolicy::FixedOffset { offset_secs } => {
                local_date_in(&FixedOffset::east_opt(offset_secs)?, epoch_secs)
            }
        }
    }

    /// Local clock hour (0–23) of `epoch_secs`.
    pub fn local_hour(&self, epoch_secs: i64) -> Option<u32> {
        match *self {
            TimeZonePolicy::Local => local_hour_in(&Local, epoch_secs),
            TimeZonePolicy::Utc => local_hour_in(&Utc, epoch_secs),
            TimeZonePolicy::FixedOffset { offset_secs } => {
                local_hour_in(&FixedOffset::east_opt(offset_secs)?, epoch_secs)
            }
        }
    }

    /// Epoch seconds of `hour:00:00` local time on `date`.
    pub fn instant_at(&self, date: NaiveDate, hour: u32) -> Option<i64> {
        match *self {
            TimeZonePolicy::Local => instant_at_in(&Local, date, hour),
            TimeZonePolicy::Utc => instant_at_in(&Utc, date, hour),
            TimeZonePolicy::FixedOffset { offset_secs } => {
                instant_at_in(&FixedOffset::east_opt(offset_secs)?, date, hour)
            }
        }
    }

    /// Seconds of `[start, end]` that fall inside the daily local window
    /// `[from_hour:00, to_hour:00)`, summed over every day the interval touches.
    ///
    /// Requires `from_hour < to_hour <= 23`. Instants chrono cannot represent
    /// contribute nothing.
    pub fn seconds_in_daily_window(&self, start: i64, end: i64, from_hour: u32, to_hour: u32) -> i64 {
        if end <= start || from_hour >= to_hour {
            return 0;
        }
        let Some(mut date) = self.local_date(start) else {
            return 0;
        };

        let mut total = 0;
        loop {
            let (Some(window_start), Some(window_end)) =
                (self.instant_at(date, from_hour), self.instant_at(date, to_hour))
            else {
                break;
            };
            if window_start >= end {
                break;
            }
            total += (end.min(window_end) - start.max(window_start)).max(0);
            match date.succ_opt() {
                Some(next) => date = next,
                None => break,
            }
        }
        total
    }
}

fn local_date_in<Tz: TimeZone>(tz: &Tz, epoch_secs: i64) -> Option<NaiveDate> {
    tz.timestamp_opt(epoch_secs, 0)
        .single()
        .map(|dt| dt.date_naive())
}

fn local_hour_in<Tz: TimeZone>(tz: &Tz, epoch_secs: i64) -> Option<u32> {
    tz.timestamp_opt(epoch_secs, 0).single().map(|dt| dt.hour())
}

fn instant_at_in<Tz: TimeZone>(tz: &Tz, date: NaiveDate, hour: u32) -> Option<i64> {
    let naive = date.and_hms_opt(hour, 0, 0)?;
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.timestamp())
        .or_else(|| {
            // Hour skipped by a DST jump: read it with the offset of the day
            // before, which lands on the transition instant.
            let before = naive.checked_sub_signed(TimeDelta::days(1))?;
            let offset = tz.offset_from_utc_datetime(&before).fix();
            Some(naive.and_utc().timestamp() - i64::from(offset.local_minus_utc()))
        })
}

impl FromStr for TimeZonePolicy {
    type Err = ConfigError;

    /// Accepts `local`, `utc` and signed offsets such as `+02:00`, `-0330` or `+3`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        match value.to_ascii_lowercase().as_str() {
            "local" => return Ok(TimeZonePolicy::Local),
            "utc" | "z" => return Ok(TimeZonePolicy::Utc),
            _ => {}
        }

        let invalid = || ConfigError::invalid(format!("unrecognised time zone {value:?}"));
        let (sign, rest) = match value.as_bytes().first() {
            Some(b'+') => (1, &value[1..]),
            Some(b'-') => (-1, &value[1..]),
            _ => return Err(invalid()),
        };
        if !rest.bytes().all(|b| b.is_ascii_digit() || b == b':') {
            return Err(invalid());
        }
        let (hours, minutes) = match rest.split_once(':') {
            Some((h, m)) => (h, m),
            None if rest.len() == 4 => rest.split_at(2),
            None => (rest, "0"),
        };
        let hours: i32 = hours.parse().map_err(|_| invalid())?;
        let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
        if !(0..=24).contains(&hours) || !(0..60).contains(&minutes) {
            return Err(invalid());
        }

        let policy = TimeZonePolicy::FixedOffset {
            offset_secs: sign * (hours * 3600 + minutes * 60),
        };
        policy.validate()?;
        Ok(policy)
    }
}

impl fmt::Display for TimeZonePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeZonePolicy::Local => f.write_str("local"),
            TimeZonePolicy::Utc => f.write_str("utc"),
            TimeZonePolicy::FixedOffset { offset_secs } => {
                let sign = if *offset_secs < 0 { '-' } else { '+' };
                let abs = offset_secs.abs();
                write!(f, "{sign}{:02}:{:02}", abs / 3600, (abs % 3600) / 60)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{LocalResult, NaiveDateTime};

    // 2014-08-15 23:59:50 UTC
    const BEFORE_MIDNIGHT: i64 = 1_408_147_190;

    #[test]
    fn utc_hours_and_dates() {
        let tz = TimeZonePolicy::Utc;
        assert_eq!(tz.local_hour(BEFORE_MIDNIGHT), Some(23));
        assert_eq!(tz.local_hour(BEFORE_MIDNIGHT + 10), Some(0));
        assert_eq!(
            tz.local_date(BEFORE_MIDNIGHT),
            NaiveDate::from_ymd_opt(2014, 8, 15)
        );
    }

    #[test]
    fn fixed_offset_shifts_wall_clock() {
        let athens_summer = TimeZonePolicy::fixed_hours(3);
        assert_eq!(athens_summer.local_hour(BEFORE_MIDNIGHT), Some(2));

        let date = NaiveDate::from_ymd_opt(2014, 8, 16).unwrap();
        let utc_midnight = TimeZonePolicy::Utc.instant_at(date, 0).unwrap();
        assert_eq!(athens_summer.instant_at(date, 0), Some(utc_midnight - 3 * 3600));
    }

    #[test]
    fn window_overlap_spans_days() {
        let tz = TimeZonePolicy::Utc;
        let midnight = BEFORE_MIDNIGHT + 10;

        assert_eq!(tz.seconds_in_daily_window(BEFORE_MIDNIGHT, midnight + 20, 0, 5), 20);
        assert_eq!(tz.seconds_in_daily_window(midnight, midnight + 100, 0, 5), 100);
        assert_eq!(tz.seconds_in_daily_window(midnight + 5 * 3600, midnight + 6 * 3600, 0, 5), 0);
        // Two full nights inside a 48 h interval.
        assert_eq!(
            tz.seconds_in_daily_window(midnight + 6 * 3600, midnight + 54 * 3600, 0, 5),
            2 * 5 * 3600
        );
    }

    /// UTC until 2014-03-30 01:00, then UTC+1: local 01:00-02:00 that day never happens.
    #[derive(Debug, Clone, Copy)]
    struct SpringForward;

    // 2014-03-30 01:00:00 UTC
    const JUMP: i64 = 1_396_141_200;

    impl SpringForward {
        fn offset_at(utc_secs: i64) -> FixedOffset {
            let secs = if utc_secs < JUMP { 0 } else { 3600 };
            FixedOffset::east_opt(secs).unwrap()
        }
    }

    impl TimeZone for SpringForward {
        type Offset = FixedOffset;

        fn from_offset(_: &FixedOffset) -> Self {
            SpringForward
        }

        fn offset_from_local_date(&self, local: &NaiveDate) -> LocalResult<FixedOffset> {
            self.offset_from_local_datetime(&local.and_hms_opt(0, 0, 0).unwrap())
        }

        fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> LocalResult<FixedOffset> {
            let wall = local.and_utc().timestamp();
            if wall < JUMP {
                LocalResult::Single(Self::offset_at(JUMP - 1))
            } else if wall >= JUMP + 3600 {
                LocalResult::Single(Self::offset_at(JUMP))
            } else {
                LocalResult::None
            }
        }

        fn offset_from_utc_date(&self, utc: &NaiveDate) -> FixedOffset {
            self.offset_from_utc_datetime(&utc.and_hms_opt(0, 0, 0).unwrap())
        }

        fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> FixedOffset {
            Self::offset_at(utc.and_utc().timestamp())
        }
    }

    #[test]
    fn skipped_hour_resolves_to_the_jump() {
        let date = NaiveDate::from_ymd_opt(2014, 3, 30).unwrap();

        assert_eq!(instant_at_in(&SpringForward, date, 0), Some(JUMP - 3600));
        assert_eq!(instant_at_in(&SpringForward, date, 1), Some(JUMP));
        // 02:00 local is already UTC+1.
        assert_eq!(instant_at_in(&SpringForward, date, 2), Some(JUMP));
        assert_eq!(instant_at_in(&SpringForward, date, 5), Some(JUMP + 3 * 3600));
    }

    #[test]
    fn parses_policies_from_text() {
        assert_eq!("local".parse::<TimeZonePolicy>().unwrap(), TimeZonePolicy::Local);
        assert_eq!("UTC".parse::<TimeZonePolicy>().unwrap(), TimeZonePolicy::Utc);
        assert_eq!(
            "+02:00".parse::<TimeZonePolicy>().unwrap(),
            TimeZonePolicy::FixedOffset { offset_secs: 7200 }
        );
        assert_eq!(
            "-0330".parse::<TimeZonePolicy>().unwrap(),
            TimeZonePolicy::FixedOffset { offset_secs: -12_600 }
        );
        assert!("+25:00".parse::<TimeZonePolicy>().is_err());
        assert!("Europe/Athens".parse::<TimeZonePolicy>().is_err());
        assert!("+1é1".parse::<TimeZonePolicy>().is_err());
        assert!("-é".parse::<TimeZonePolicy>().is_err());
    }

    #[test]
    fn display_round_trips_offsets() {
        let policy = TimeZonePolicy::FixedOffset { offset_secs: -12_600 };
        assert_eq!(policy.to_string(), "-03:30");
        assert_eq!(policy.to_string().parse::<TimeZonePolicy>().unwrap(), policy);
    }

    #[test]
    fn serde_uses_kind_tag() {
        let json = serde_json::to_string(&TimeZonePolicy::fixed_hours(2)).unwrap();
        assert_eq!(json, r#"{"kind":"fixed_offset","offset_secs":7200}"#);
        let back: TimeZonePolicy = serde_json::from_str(r#"{"kind":"utc"}"#).unwrap();
        assert_eq!(back, TimeZonePolicy::Utc);
    }
}
