//! Load stage for the dailybars pipeline.
//!
//! - [`Store`] - One exclusively owned SQLite connection and its record table
//! - [`TableName`] - A destination table name safe to splice into SQL
//! - [`load_all`] - Loads a run's batches and reports statistics
//! - [`StoreStats`] - Table-wide row counts and date range

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod load;
mod store;
mod table;

pub use error::{Result, StoreError};
pub use load::{LoadReport, VERIFY_ROWS, load_all, load_batches};
pub use store::{Store, StoreStats, StoredRow};
pub use table::{DEFAULT_TABLE, TableName};
