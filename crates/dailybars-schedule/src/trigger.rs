//! Daily trigger bookkeeping.

use chrono::{Days, Local, NaiveDateTime};

use crate::RunTime;

/// Source of the current local time.
pub trait Clock: Send + Sync {
    /// Returns the current local date and time.
    fn now(&self) -> NaiveDateTime;
}

/// The system clock in the local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A trigger that fires once per day at a fixed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyTrigger {
    at: RunTime,
    next_run: NaiveDateTime,
}

impl DailyTrigger {
    /// Registers a trigger, scheduling the first firing after `now`.
    ///
    /// If today's run time has already passed (or is exactly now), the first
    /// firing is tomorrow.
    #[must_use]
    pub fn new(at: RunTime, now: NaiveDateTime) -> Self {
        Self {
            at,
            next_run: next_occurrence(at, now),
        }
    }

    /// Returns the configured time of day.
    #[must_use]
    pub const fn at(&self) -> RunTime {
        self.at
    }

    /// Returns when the trigger fires next.
    #[must_use]
    pub const fn next_run(&self) -> NaiveDateTime {
        self.next_run
    }

    /// Returns true once `now` has reached the next firing.
    #[must_use]
    pub fn is_due(&self, now: NaiveDateTime) -> bool {
        now >= self.next_run
    }

    /// Moves the next firing to the first occurrence after `now`.
    ///
    /// Missed days are not replayed.
    pub fn advance(&mut self, now: NaiveDateTime) {
        self.next_run = next_occurrence(self.at, now);
    }
}

fn next_occurrence(at: RunTime, now: NaiveDateTime) -> NaiveDateTime {
    let today = now.date().and_time(at.time());
    if today > now {
        today
    } else {
        today
            .checked_add_days(Days::new(1))
            .unwrap_or(NaiveDateTime::MAX)
    }
}
