//! Scheduling for the dailybars pipeline.
//!
//! - [`RunTime`] - A validated `HH:MM` time of day
//! - [`DailyTrigger`] - When the job fires next, and whether it is due
//! - [`Scheduler`] - Immediate runs and the cancellable daily wait loop
//! - [`shutdown_on_ctrl_c`] - A shutdown flag wired to the interrupt signal

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod scheduler;
mod signal;
mod time;
mod trigger;

pub use error::ScheduleError;
pub use scheduler::{DEFAULT_CHECK_INTERVAL, ScheduleReport, Scheduler, SchedulerConfig};
pub use signal::shutdown_on_ctrl_c;
pub use time::{RunTime, parse_run_time};
pub use trigger::{Clock, DailyTrigger, LocalClock};
