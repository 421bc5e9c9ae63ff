//! One extract, transform and load pass.

use chrono::{DateTime, Utc};
use dailybars_fetch::{AlphaVantageClient, ArtifactError, ArtifactStore, Extractor, QuoteSource};
use dailybars_store::{StoreError, StoreStats, TableName, load_all};
use dailybars_transform::transform_all;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{Instrument, error, info, info_span};
use uuid::Uuid;

use crate::Settings;

/// Errors that fail a pipeline run as a whole.
///
/// Per-symbol and per-row problems are logged and skipped, never raised.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// No symbol produced a raw payload.
    #[error("No data extracted for any symbol")]
    NothingExtracted,

    /// No symbol survived transformation.
    #[error("No data transformed for any symbol")]
    NothingTransformed,

    /// The load phase failed and the affected batch was rolled back.
    #[error("Load failed: {0}")]
    Load(#[from] StoreError),

    /// The HTTP client could not be built.
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    /// The raw artifact directory could not be prepared.
    #[error(transparent)]
    Artifacts(#[from] ArtifactError),
}

/// What one successful run did.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Identifier attached to every log line of the run.
    pub run_id: Uuid,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Symbols configured for the run.
    pub symbols_requested: usize,
    /// Symbols with a saved raw payload.
    pub symbols_extracted: usize,
    /// Symbols with at least one valid record.
    pub symbols_transformed: usize,
    /// Valid records across all symbols.
    pub records_transformed: usize,
    /// Rows newly inserted into the store.
    pub rows_inserted: usize,
    /// Rows dropped by validation.
    pub rejected_rows: usize,
    /// Store statistics after the load.
    pub stats: StoreStats,
}

/// The extract, transform and load sequence over a fixed symbol list.
#[derive(Debug)]
pub struct Pipeline<S> {
    extractor: Extractor<S>,
    symbols: Vec<String>,
    db_path: PathBuf,
    table: TableName,
}

impl Pipeline<AlphaVantageClient> {
    /// Builds a pipeline against the live provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or the artifact directory cannot
    /// be set up.
    pub fn from_settings(settings: &Settings) -> Result<Self, PipelineError> {
        let client = AlphaVantageClient::new(settings.api_key(), settings.client_config())?;
        Self::with_source(client, settings)
    }
}

impl<S: QuoteSource> Pipeline<S> {
    /// Builds a pipeline over any quote source.
    ///
    /// # Errors
    ///
    /// Returns an error if the artifact directory cannot be created.
    pub fn with_source(source: S, settings: &Settings) -> Result<Self, PipelineError> {
        let artifacts = ArtifactStore::new(settings.raw_data_dir())?;
        Ok(Self {
            extractor: Extractor::new(source, artifacts, settings.extractor_config()),
            symbols: settings.symbols().to_vec(),
            db_path: settings.db_path().to_path_buf(),
            table: settings.table().clone(),
        })
    }

    /// Returns the symbols each run fetches.
    #[must_use]
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Runs extract, transform and load once.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::NothingExtracted`] or
    /// [`PipelineError::NothingTransformed`] when a stage yields nothing, and
    /// [`PipelineError::Load`] when storage fails.
    pub async fn run_once(&self) -> Result<RunSummary, PipelineError> {
        let run_id = Uuid::new_v4();
        let span = info_span!("pipeline", %run_id);
        self.run(run_id).instrument(span).await
    }

    async fn run(&self, run_id: Uuid) -> Result<RunSummary, PipelineError> {
        let started_at = Utc::now();
        info!(symbols = ?self.symbols, "starting pipeline");

        let artifacts = self.extractor.fetch_all(&self.symbols).await;
        if artifacts.is_empty() {
            error!("no data extracted, stopping");
            return Err(PipelineError::NothingExtracted);
        }

        let batches = transform_all(&artifacts);
        if batches.is_empty() {
            error!("no data transformed, stopping");
            return Err(PipelineError::NothingTransformed);
        }

        let report = load_all(&self.db_path, &self.table, &batches).inspect_err(|e| {
            error!(error = %e, "load failed");
        })?;

        let summary = RunSummary {
            run_id,
            started_at,
            symbols_requested: self.symbols.len(),
            symbols_extracted: artifacts.len(),
            symbols_transformed: batches.len(),
            records_transformed: batches.iter().map(|b| b.len()).sum(),
            rows_inserted: report.inserted,
            rejected_rows: batches.iter().map(|b| b.rejected).sum(),
            stats: report.stats,
        };

        let elapsed = Utc::now() - started_at;
        info!(
            extracted = summary.symbols_extracted,
            transformed = summary.symbols_transformed,
            inserted = summary.rows_inserted,
            rejected = summary.rejected_rows,
            elapsed_ms = elapsed.num_milliseconds(),
            "pipeline completed"
        );
        Ok(summary)
    }
}
