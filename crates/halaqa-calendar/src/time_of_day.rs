//! Wall-clock time at which a recurring session starts.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, TimeDelta, Timelike};

use crate::error::SpecViolation;

/// A 24-hour `HH:MM` time of day, minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    /// Returns `None` when `hour` or `minute` is out of range.
    #[must_use]
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    /// `hour:00`; hours past 23 wrap around midnight.
    #[must_use]
    pub fn on_the_hour(hour: u32) -> Self {
        Self(NaiveTime::MIN + TimeDelta::hours(i64::from(hour % 24)))
    }

    #[must_use]
    pub const fn as_naive(self) -> NaiveTime {
        self.0
    }

    #[must_use]
    pub fn hour(self) -> u32 {
        self.0.hour()
    }

    #[must_use]
    pub fn minute(self) -> u32 {
        self.0.minute()
    }
}

impl FromStr for TimeOfDay {
    type Err = SpecViolation;

    /// ## Summary
    /// Parses `H:MM` or `HH:MM` (00:00 through 23:59). Surrounding whitespace
    /// is ignored; seconds, AM/PM suffixes and anything else are rejected.
    ///
    /// ## Errors
    /// Returns `SpecViolation::InvalidTimeOfDay` for any other shape.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid = || SpecViolation::InvalidTimeOfDay(input.to_string());

        let (hour, minute) = input.trim().split_once(':').ok_or_else(invalid)?;

        let digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        if !digits(hour) || hour.len() > 2 || !digits(minute) || minute.len() != 2 {
            return Err(invalid());
        }

        let hour: u32 = hour.parse().map_err(|_err| invalid())?;
        let minute: u32 = minute.parse().map_err(|_err| invalid())?;

        Self::new(hour, minute).ok_or_else(invalid)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl From<TimeOfDay> for NaiveTime {
    fn from(value: TimeOfDay) -> Self {
        value.0
    }
}
