//! Transformation stage for the dailybars pipeline.
//!
//! - [`parse_series`] - Raw payload to date-sorted [`ParsedRow`]s
//! - [`compute_daily_change`] - Fills in the derived change percentage
//! - [`validate_all`] - Validates rows, counting but not propagating failures
//! - [`transform_all`] - Runs the three steps per artifact with failure isolation

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod parse;
mod transform;
mod validate;

pub use error::TransformError;
pub use parse::{CLOSE_KEY, HIGH_KEY, LOW_KEY, OPEN_KEY, ParsedRow, VOLUME_KEY, parse_series};
pub use transform::{SymbolBatch, transform_all, transform_artifact};
pub use validate::{Validated, compute_daily_change, validate_all};
