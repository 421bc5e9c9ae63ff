//! Per-symbol transformation of raw artifacts.

use chrono::{DateTime, Utc};
use dailybars_fetch::{Artifact, ArtifactStore};
use dailybars_types::DailyRecord;
use tracing::{info, warn};

use crate::{TransformError, compute_daily_change, parse_series, validate_all};

/// Validated, date-ordered records for one symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolBatch {
    /// The symbol the records belong to.
    pub symbol: String,
    /// Validated records, strictly ascending by date.
    pub records: Vec<DailyRecord>,
    /// Rows dropped by validation.
    pub rejected: usize,
}

impl SymbolBatch {
    /// Returns the number of records.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no record survived validation.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the mean daily change across records that carry one.
    #[must_use]
    pub fn average_daily_change(&self) -> Option<f64> {
        let changes: Vec<f64> = self
            .records
            .iter()
            .filter_map(DailyRecord::daily_change_percentage)
            .collect();
        if changes.is_empty() {
            return None;
        }
        Some(changes.iter().sum::<f64>() / changes.len() as f64)
    }
}

/// Reads one artifact and runs parse, daily change and validation in turn.
///
/// The returned batch may be empty when no row passes validation.
///
/// # Errors
///
/// Returns an error if the artifact cannot be read or its series cannot be
/// parsed.
pub fn transform_artifact(
    artifact: &Artifact,
    extracted_at: DateTime<Utc>,
) -> Result<SymbolBatch, TransformError> {
    let symbol = artifact.symbol.as_str();
    info!(symbol, path = %artifact.path.display(), "transforming");

    let payload = ArtifactStore::read(&artifact.path)?;
    let mut rows = parse_series(&payload, symbol)?;
    info!(symbol, rows = rows.len(), "parsed rows");

    compute_daily_change(&mut rows);
    let validated = validate_all(rows, symbol, extracted_at);
    info!(
        symbol,
        valid = validated.records.len(),
        errors = validated.rejected,
        "validated records"
    );

    Ok(SymbolBatch {
        symbol: symbol.to_string(),
        records: validated.records,
        rejected: validated.rejected,
    })
}

/// Transforms every artifact, isolating failures per symbol.
///
/// Symbols whose artifact fails to read or parse, and symbols left with no
/// valid rows, are logged and excluded. Order follows the input.
#[must_use]
pub fn transform_all(artifacts: &[Artifact]) -> Vec<SymbolBatch> {
    info!(symbols = artifacts.len(), "starting transformation");

    let mut batches = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        match transform_artifact(artifact, Utc::now()) {
            Ok(batch) if batch.is_empty() => {
                warn!(symbol = %batch.symbol, rejected = batch.rejected, "no valid records after validation");
            }
            Ok(batch) => {
                log_summary(&batch);
                batches.push(batch);
            }
            Err(e) => warn!(symbol = %artifact.symbol, error = %e, "failed to transform"),
        }
    }

    info!(
        transformed = batches.len(),
        total = artifacts.len(),
        "transformation complete"
    );
    batches
}

fn log_summary(batch: &SymbolBatch) {
    let (Some(first), Some(last)) = (batch.records.first(), batch.records.last()) else {
        return;
    };
    info!(
        symbol = %batch.symbol,
        rows = batch.len(),
        rejected = batch.rejected,
        from = %first.date(),
        to = %last.date(),
        avg_daily_change = batch.average_daily_change().unwrap_or_default(),
        "transform summary"
    );
}
