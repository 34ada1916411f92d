//! Time-of-day handling for timetables and planning requests.
//!
//! Timetables store departure starts as "HH:MM" strings. Planning works in
//! plain minutes since midnight, and estimated times may run past midnight
//! (a 23:50 service reaching the boarding stop at 24:05).

use std::fmt;

use chrono::Weekday;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Minutes in one day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A time of day with minute precision.
///
/// # Examples
///
/// ```
/// use transit_planner::domain::TimeOfDay;
///
/// let t = TimeOfDay::parse("06:30").unwrap();
/// assert_eq!(t.minutes(), 390);
/// assert_eq!(t.to_string(), "06:30");
///
/// // Seconds are accepted and dropped
/// assert_eq!(TimeOfDay::parse("06:30:00").unwrap(), t);
///
/// assert!(TimeOfDay::parse("24:00").is_err());
/// assert!(TimeOfDay::parse("6:30").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeOfDay(u32);

impl TimeOfDay {
    /// Create a time from minutes since midnight.
    pub fn from_minutes(minutes: u32) -> Result<Self, TimeError> {
        if minutes >= MINUTES_PER_DAY {
            return Err(TimeError::new("minutes must be below 1440"));
        }
        Ok(Self(minutes))
    }

    /// Parse "HH:MM" or "HH:MM:SS".
    pub fn parse(s: &str) -> Result<Self, TimeError> {
        let bytes = s.as_bytes();
        match bytes.len() {
            5 => {}
            8 => {
                if bytes[5] != b':' {
                    return Err(TimeError::new("expected colon at position 5"));
                }
                let second = parse_two_digits(&bytes[6..8])
                    .ok_or_else(|| TimeError::new("invalid second digits"))?;
                if second > 59 {
                    return Err(TimeError::new("second must be 0-59"));
                }
            }
            _ => return Err(TimeError::new("expected HH:MM format")),
        }

        if bytes[2] != b':' {
            return Err(TimeError::new("expected colon at position 2"));
        }

        let hour =
            parse_two_digits(&bytes[0..2]).ok_or_else(|| TimeError::new("invalid hour digits"))?;
        if hour > 23 {
            return Err(TimeError::new("hour must be 0-23"));
        }

        let minute = parse_two_digits(&bytes[3..5])
            .ok_or_else(|| TimeError::new("invalid minute digits"))?;
        if minute > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }

        Ok(Self(hour * 60 + minute))
    }

    /// Minutes since midnight.
    pub fn minutes(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        TimeOfDay::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Format a minute count as "HH:MM", truncating fractions.
///
/// Values past midnight are not wrapped, so 1445 formats as "24:05".
pub fn format_clock(minutes: f64) -> String {
    let whole = minutes.max(0.0).floor() as u64;
    format!("{:02}:{:02}", whole / 60, whole % 60)
}

/// Format minutes since midnight as "HH:MM:SS", the form the load model expects.
pub fn format_clock_seconds(minutes: i64) -> String {
    let minutes = minutes.rem_euclid(MINUTES_PER_DAY as i64);
    format!("{:02}:{:02}:00", minutes / 60, minutes % 60)
}

/// Full English weekday name.
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Parse two ASCII digits.
fn parse_two_digits(bytes: &[u8]) -> Option<u32> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = (bytes[0] as char).to_digit(10)?;
    let d2 = (bytes[1] as char).to_digit(10)?;
    Some(d1 * 10 + d2)
}
