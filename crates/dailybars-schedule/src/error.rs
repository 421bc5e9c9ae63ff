//! Error types for scheduling.

use thiserror::Error;

/// Errors that can occur while configuring the scheduler.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// The run time is not a valid 24-hour `HH:MM` string.
    #[error("Invalid time format '{0}': use HH:MM (24-hour), e.g. 09:00 or 18:30")]
    InvalidTime(String),
}
