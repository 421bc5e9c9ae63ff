//! Time-of-day parsing.

use chrono::{NaiveTime, Timelike};
use std::fmt;
use std::str::FromStr;

use crate::ScheduleError;

/// A daily run time, in local time, with minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunTime(NaiveTime);

impl RunTime {
    /// Creates a run time from hour and minute.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::InvalidTime`] if either component is out of range.
    pub fn new(hour: u32, minute: u32) -> Result<Self, ScheduleError> {
        NaiveTime::from_hms_opt(hour, minute, 0)
            .map(Self)
            .ok_or_else(|| ScheduleError::InvalidTime(format!("{hour}:{minute}")))
    }

    /// Returns the time of day.
    #[must_use]
    pub const fn time(self) -> NaiveTime {
        self.0
    }

    /// Returns the hour component.
    #[must_use]
    pub fn hour(self) -> u32 {
        self.0.hour()
    }

    /// Returns the minute component.
    #[must_use]
    pub fn minute(self) -> u32 {
        self.0.minute()
    }
}

impl Default for RunTime {
    /// 09:00, before the US market opens.
    fn default() -> Self {
        Self(NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN))
    }
}

impl FromStr for RunTime {
    type Err = ScheduleError;

    /// Parses `HH:MM` in 24-hour form. A single-digit hour is accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ScheduleError::InvalidTime(s.to_string());

        let (hour, minute) = s.trim().split_once(':').ok_or_else(invalid)?;
        let is_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if !(1..=2).contains(&hour.len()) || minute.len() != 2 || !is_digits(hour) || !is_digits(minute) {
            return Err(invalid());
        }

        let hour: u32 = hour.parse().map_err(|_| invalid())?;
        let minute: u32 = minute.parse().map_err(|_| invalid())?;
        Self::new(hour, minute).map_err(|_| invalid())
    }
}

impl fmt::Display for RunTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

/// Parses a run time string.
///
/// # Errors
///
/// Returns [`ScheduleError::InvalidTime`] if `s` is not a valid `HH:MM` time.
pub fn parse_run_time(s: &str) -> Result<RunTime, ScheduleError> {
    s.parse()
}
