//! Core types for the dailybars quote pipeline.
//!
//! This crate provides the fundamental data structures used throughout dailybars:
//!
//! - [`RecordCandidate`] - Unvalidated field values for one trading day
//! - [`DailyRecord`] - A validated trading-day observation
//! - [`ValidationError`] - The field and rule a candidate violated
//! - [`compute_daily_change`] - Derived open-to-close change percentage
//! - [`ConfigError`] - Fatal startup configuration errors

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod change;
mod error;
mod record;

pub use change::compute_daily_change;
pub use error::{ConfigError, Field, Rule, ValidationError};
pub use record::{DailyRecord, MAX_SYMBOL_LEN, RecordCandidate};
