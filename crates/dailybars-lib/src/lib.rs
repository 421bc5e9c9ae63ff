//! Daily stock price ETL.
//!
//! This is a facade crate that re-exports functionality from the dailybars
//! workspace crates and ties the stages together.
//!
//! # Quick Start
//!
//! ```ignore
//! use dailybars_lib::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = Settings::from_env()?;
//!     let pipeline = Pipeline::from_settings(&settings)?;
//!
//!     let summary = pipeline.run_once().await?;
//!     println!("Inserted {} new rows", summary.rows_inserted);
//!
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod pipeline;

pub use config::{
    API_KEY_VAR, BASE_URL_VAR, CALL_DELAY_VAR, DATA_DIR_VAR, DB_PATH_VAR, DEFAULT_CALL_DELAY,
    DEFAULT_SYMBOLS, SYMBOLS_VAR, Settings, TABLE_VAR, default_data_dir,
};
pub use pipeline::{Pipeline, PipelineError, RunSummary};

// Re-export core types
pub use dailybars_types::*;

// Re-export extraction
pub use dailybars_fetch::{
    AlphaVantageClient, Artifact, ArtifactError, ArtifactStore, ClientConfig, Extractor,
    ExtractorConfig, FetchOutcome, QuoteSource, RawPayload, classify_body,
};

// Re-export transformation
pub use dailybars_transform::{SymbolBatch, TransformError, transform_all, transform_artifact};

// Re-export storage
pub use dailybars_store::{
    LoadReport, Store, StoreError, StoreStats, StoredRow, TableName, VERIFY_ROWS, load_all,
};

// Re-export scheduling
#[cfg(feature = "schedule")]
pub use dailybars_schedule::{
    RunTime, ScheduleError, ScheduleReport, Scheduler, SchedulerConfig, parse_run_time,
    shutdown_on_ctrl_c,
};

/// Prelude module for convenient imports.
///
/// ```
/// use dailybars_lib::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{Pipeline, PipelineError, RunSummary, Settings};

    pub use dailybars_types::{ConfigError, DailyRecord, RecordCandidate, ValidationError};

    pub use dailybars_fetch::{FetchOutcome, QuoteSource};

    pub use dailybars_store::{Store, StoreStats, TableName};

    #[cfg(feature = "schedule")]
    pub use dailybars_schedule::{RunTime, Scheduler, SchedulerConfig, shutdown_on_ctrl_c};
}
