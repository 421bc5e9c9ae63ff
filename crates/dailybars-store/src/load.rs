//! Whole-run loading of transformed batches.

use dailybars_transform::SymbolBatch;
use std::path::Path;
use tracing::{info, warn};

use crate::{Result, Store, StoreStats, TableName};

/// Rows read back after each upsert to confirm what was stored.
pub const VERIFY_ROWS: usize = 5;

/// Outcome of loading one run's batches.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoadReport {
    /// Rows newly inserted across all symbols.
    pub inserted: usize,
    /// Rows newly inserted per symbol, in load order.
    pub per_symbol_inserted: Vec<(String, usize)>,
    /// Table statistics after the load.
    pub stats: StoreStats,
}

/// Opens the database at `path`, loads every batch and reports statistics.
///
/// The connection lives for the duration of this call and is closed on
/// every exit path.
///
/// # Errors
///
/// Returns the first storage error. The failing symbol's batch is rolled
/// back; batches committed before it remain.
pub fn load_all(path: &Path, table: &TableName, batches: &[SymbolBatch]) -> Result<LoadReport> {
    let mut store = Store::open(path, table.clone())?;
    load_batches(&mut store, batches)
}

/// Loads every batch into an already open store.
///
/// # Errors
///
/// Returns the first storage error.
pub fn load_batches(store: &mut Store, batches: &[SymbolBatch]) -> Result<LoadReport> {
    store.ensure_schema()?;

    let mut report = LoadReport::default();
    for batch in batches {
        let inserted = store.upsert(&batch.symbol, &batch.records).inspect_err(|e| {
            warn!(symbol = %batch.symbol, error = %e, "load failed, batch rolled back");
        })?;

        let skipped = batch.records.len().saturating_sub(inserted);
        if skipped > 0 {
            info!(symbol = %batch.symbol, skipped, "duplicate rows skipped");
        }

        verify(store, &batch.symbol)?;

        report.inserted += inserted;
        report.per_symbol_inserted.push((batch.symbol.clone(), inserted));
    }

    report.stats = store.stats()?;
    info!(
        inserted = report.inserted,
        total_rows = report.stats.total_rows,
        symbols = report.stats.per_symbol.len(),
        earliest = ?report.stats.earliest,
        latest = ?report.stats.latest,
        "load complete"
    );
    Ok(report)
}

fn verify(store: &Store, symbol: &str) -> Result<()> {
    for row in store.recent(symbol, VERIFY_ROWS)? {
        info!(
            symbol,
            date = %row.date,
            open = row.open,
            high = row.high,
            low = row.low,
            close = row.close,
            volume = row.volume,
            change = ?row.daily_change_percentage,
            "stored"
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StoreError;
    use chrono::{NaiveDate, Utc};
    use dailybars_types::RecordCandidate;
    use tempfile::TempDir;

    fn batch(symbol: &str, days: std::ops::RangeInclusive<u32>) -> SymbolBatch {
        let records = days
            .map(|day| {
                RecordCandidate {
                    symbol: symbol.to_string(),
                    date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
                    open: 50.0,
                    high: 55.0,
                    low: 48.0,
                    close: 52.0,
                    volume: 10_000,
                    daily_change_percentage: None,
                    extracted_at: Utc::now(),
                }
                .with_daily_change()
                .validate()
                .unwrap()
            })
            .collect();
        SymbolBatch {
            symbol: symbol.to_string(),
            records,
            rejected: 0,
        }
    }

    #[test]
    fn test_load_all_reports_counts() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("stock_data.db");
        let batches = vec![batch("AAPL", 1..=5), batch("MSFT", 1..=3)];

        let report = load_all(&path, &TableName::default(), &batches).unwrap();
        assert_eq!(report.inserted, 8);
        assert_eq!(
            report.per_symbol_inserted,
            vec![("AAPL".to_string(), 5), ("MSFT".to_string(), 3)]
        );
        assert_eq!(report.stats.total_rows, 8);
        assert_eq!(report.stats.earliest, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(report.stats.latest, NaiveDate::from_ymd_opt(2024, 3, 5));
    }

    #[test]
    fn test_load_all_twice_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("database").join("stock_data.db");
        let batches = vec![batch("AAPL", 1..=5)];

        load_all(&path, &TableName::default(), &batches).unwrap();
        let second = load_all(&path, &TableName::default(), &batches).unwrap();
        assert_eq!(second.inserted, 0);
        assert_eq!(second.per_symbol_inserted, vec![("AAPL".to_string(), 0)]);
        assert_eq!(second.stats.total_rows, 5);
    }

    #[test]
    fn test_load_empty_run() {
        let mut store = Store::open_in_memory(TableName::default()).unwrap();
        let report = load_batches(&mut store, &[]).unwrap();
        assert_eq!(report, LoadReport::default());
    }

    #[test]
    fn test_load_stops_at_failing_batch() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("stock_data.db");
        Store::open(&path, TableName::default())
            .unwrap()
            .ensure_schema()
            .unwrap();
        let conn = rusqlite::Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TRIGGER reject_msft BEFORE INSERT ON stock_daily_data
             WHEN NEW.symbol = 'MSFT'
             BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
        )
        .unwrap();
        drop(conn);

        let batches = vec![batch("AAPL", 1..=2), batch("MSFT", 1..=2), batch("GOOG", 1..=2)];
        let result = load_all(&path, &TableName::default(), &batches);
        assert!(matches!(result, Err(StoreError::Database(_))));

        let store = Store::open(&path, TableName::default()).unwrap();
        let stats = store.stats().unwrap();
        assert_eq!(stats.per_symbol, vec![("AAPL".to_string(), 2)]);
    }
}
