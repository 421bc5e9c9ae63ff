//! Derived fields and row validation.

use chrono::{DateTime, Utc};
use dailybars_types::{DailyRecord, RecordCandidate};
use tracing::{debug, warn};

use crate::ParsedRow;

/// Fills in the daily change percentage of every row.
///
/// Must run before [`validate_all`], which only checks the field.
pub fn compute_daily_change(rows: &mut [ParsedRow]) {
    for row in rows.iter_mut() {
        row.daily_change_percentage =
            Some(dailybars_types::compute_daily_change(row.open, row.close));
    }
    debug!(rows = rows.len(), "daily change calculated");
}

/// The outcome of validating one symbol's rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Validated {
    /// Rows that passed every rule, in input order.
    pub records: Vec<DailyRecord>,
    /// Number of rows that failed a rule.
    pub rejected: usize,
}

/// Runs every row through the validator, keeping the valid ones.
///
/// A failing row is logged and counted; it never aborts the batch.
#[must_use]
pub fn validate_all(
    rows: Vec<ParsedRow>,
    symbol: &str,
    extracted_at: DateTime<Utc>,
) -> Validated {
    let mut records = Vec::with_capacity(rows.len());
    let mut rejected = 0;

    for row in rows {
        let date = row.date;
        let candidate = RecordCandidate {
            symbol: symbol.to_string(),
            date,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
            daily_change_percentage: row.daily_change_percentage,
            extracted_at,
        };

        match candidate.validate() {
            Ok(record) => records.push(record),
            Err(e) => {
                rejected += 1;
                warn!(symbol, %date, error = %e, "validation error");
            }
        }
    }

    debug!(symbol, valid = records.len(), rejected, "validated rows");
    Validated { records, rejected }
}
