//! SQLite-backed record store.

use chrono::{NaiveDate, NaiveDateTime};
use dailybars_types::DailyRecord;
use rusqlite::types::{Type, Value};
use rusqlite::{Connection, params, params_from_iter};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::{Result, StoreError, TableName};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Columns bound per inserted row.
const INSERT_COLUMNS: usize = 9;

/// Rows per `INSERT` statement, keeping bound parameters under SQLite's
/// historical limit of 999.
const ROWS_PER_STATEMENT: usize = 100;

/// A persisted record with its surrogate id.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRow {
    /// Surrogate id assigned by the store.
    pub id: i64,
    /// Ticker symbol.
    pub symbol: String,
    /// Market date.
    pub date: NaiveDate,
    /// Opening price.
    pub open: f64,
    /// Highest price.
    pub high: f64,
    /// Lowest price.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Traded volume.
    pub volume: i64,
    /// Open-to-close change in percent.
    pub daily_change_percentage: Option<f64>,
    /// When the pipeline produced the record (UTC).
    pub extracted_at: NaiveDateTime,
}

/// Aggregate statistics over the whole table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StoreStats {
    /// Total number of rows.
    pub total_rows: u64,
    /// Row count per symbol, ordered by symbol.
    pub per_symbol: Vec<(String, u64)>,
    /// Earliest stored market date.
    pub earliest: Option<NaiveDate>,
    /// Latest stored market date.
    pub latest: Option<NaiveDate>,
}

/// An open connection to the record table.
///
/// The connection is owned exclusively and closed when the store is dropped.
#[derive(Debug)]
pub struct Store {
    conn: Connection,
    table: TableName,
}

impl Store {
    /// Opens (or creates) the database file at `path`.
    ///
    /// Creates the parent directory if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or the database cannot be opened.
    pub fn open(path: &Path, table: TableName) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty())
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| StoreError::CreateDir {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let conn = Connection::open(path)?;
        info!(path = %path.display(), "database connection established");
        Ok(Self { conn, table })
    }

    /// Opens a private in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if SQLite cannot allocate the database.
    pub fn open_in_memory(table: TableName) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn, table })
    }

    /// Returns the destination table.
    #[must_use]
    pub const fn table(&self) -> &TableName {
        &self.table
    }

    /// Creates the table and its indexes if they do not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if any DDL statement fails.
    pub fn ensure_schema(&self) -> Result<()> {
        let table = &self.table;
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                symbol TEXT NOT NULL,
                date DATE NOT NULL,
                open_price REAL NOT NULL,
                high_price REAL NOT NULL,
                low_price REAL NOT NULL,
                close_price REAL NOT NULL,
                volume INTEGER NOT NULL,
                daily_change_percentage REAL,
                extraction_timestamp TIMESTAMP NOT NULL,
                UNIQUE(symbol, date)
            );
            CREATE INDEX IF NOT EXISTS {idx_symbol} ON {table}(symbol);
            CREATE INDEX IF NOT EXISTS {idx_date} ON {table}(date);
            CREATE INDEX IF NOT EXISTS {idx_symbol_date} ON {table}(symbol, date);",
            idx_symbol = table.index_name("symbol"),
            idx_date = table.index_name("date"),
            idx_symbol_date = table.index_name("symbol_date"),
        );

        self.conn.execute_batch(&sql)?;
        debug!(table = %table, "schema ready");
        Ok(())
    }

    /// Returns the number of rows in the table.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn row_count(&self) -> Result<u64> {
        count_rows(&self.conn, &self.table)
    }

    /// Inserts a symbol's records, skipping keys that already exist.
    ///
    /// All statements run in one transaction. Returns the number of rows
    /// actually added, measured as the table size after minus before. On
    /// failure the transaction is rolled back and nothing from this batch
    /// remains.
    ///
    /// # Errors
    ///
    /// Returns an error if any statement fails.
    pub fn upsert(&mut self, symbol: &str, records: &[DailyRecord]) -> Result<usize> {
        info!(symbol, rows = records.len(), "inserting records");

        let tx = self.conn.transaction()?;
        let before = count_rows(&tx, &self.table)?;

        for chunk in records.chunks(ROWS_PER_STATEMENT) {
            let sql = insert_sql(&self.table, chunk.len());
            let values = chunk.iter().flat_map(record_values);
            tx.prepare_cached(&sql)?.execute(params_from_iter(values))?;
        }

        let after = count_rows(&tx, &self.table)?;
        tx.commit()?;

        let inserted = usize::try_from(after.saturating_sub(before)).unwrap_or(usize::MAX);
        info!(
            symbol,
            inserted,
            duplicates = records.len().saturating_sub(inserted),
            "insert complete"
        );
        Ok(inserted)
    }

    /// Returns the latest `limit` rows stored for `symbol`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored value is malformed.
    pub fn recent(&self, symbol: &str, limit: usize) -> Result<Vec<StoredRow>> {
        let sql = format!(
            "SELECT id, symbol, date, open_price, high_price, low_price, close_price,
                    volume, daily_change_percentage, extraction_timestamp
             FROM {}
             WHERE symbol = ?1
             ORDER BY date DESC
             LIMIT ?2",
            self.table
        );
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![symbol, limit], |row| {
                let date: String = row.get(2)?;
                let extracted_at: String = row.get(9)?;
                Ok(StoredRow {
                    id: row.get(0)?,
                    symbol: row.get(1)?,
                    date: parse_column(2, &date, |s| NaiveDate::parse_from_str(s, DATE_FORMAT))?,
                    open: row.get(3)?,
                    high: row.get(4)?,
                    low: row.get(5)?,
                    close: row.get(6)?,
                    volume: row.get(7)?,
                    daily_change_percentage: row.get(8)?,
                    extracted_at: parse_column(9, &extracted_at, |s| {
                        NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
                    })?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Computes table-wide statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails or a stored date is malformed.
    pub fn stats(&self) -> Result<StoreStats> {
        let table = &self.table;
        let total_rows = self.row_count()?;

        let mut stmt = self.conn.prepare(&format!(
            "SELECT symbol, COUNT(*) FROM {table} GROUP BY symbol ORDER BY symbol"
        ))?;
        let per_symbol = stmt
            .query_map([], |row| {
                let count: i64 = row.get(1)?;
                Ok((row.get::<_, String>(0)?, u64::try_from(count).unwrap_or_default()))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let (earliest, latest): (Option<String>, Option<String>) = self.conn.query_row(
            &format!("SELECT MIN(date), MAX(date) FROM {table}"),
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        let parse = |idx: usize, raw: Option<String>| -> rusqlite::Result<Option<NaiveDate>> {
            raw.map(|s| parse_column(idx, &s, |s| NaiveDate::parse_from_str(s, DATE_FORMAT)))
                .transpose()
        };

        Ok(StoreStats {
            total_rows,
            per_symbol,
            earliest: parse(0, earliest)?,
            latest: parse(1, latest)?,
        })
    }
}

impl Drop for Store {
    fn drop(&mut self) {
        debug!(table = %self.table, "database connection closed");
    }
}

fn count_rows(conn: &Connection, table: &TableName) -> Result<u64> {
    let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
        row.get(0)
    })?;
    Ok(u64::try_from(count).unwrap_or_default())
}

/// Builds a multi-row `INSERT OR IGNORE` for `rows` records.
fn insert_sql(table: &TableName, rows: usize) -> String {
    let placeholders = format!("({})", vec!["?"; INSERT_COLUMNS].join(", "));
    let values = vec![placeholders.as_str(); rows].join(", ");
    format!(
        "INSERT OR IGNORE INTO {table}
            (symbol, date, open_price, high_price, low_price, close_price,
             volume, daily_change_percentage, extraction_timestamp)
         VALUES {values}"
    )
}

fn record_values(record: &DailyRecord) -> [Value; INSERT_COLUMNS] {
    [
        Value::Text(record.symbol().to_string()),
        Value::Text(record.date().format(DATE_FORMAT).to_string()),
        Value::Real(record.open()),
        Value::Real(record.high()),
        Value::Real(record.low()),
        Value::Real(record.close()),
        Value::Integer(record.volume()),
        record
            .daily_change_percentage()
            .map_or(Value::Null, Value::Real),
        Value::Text(record.extracted_at().format(TIMESTAMP_FORMAT).to_string()),
    ]
}

fn parse_column<T>(
    idx: usize,
    raw: &str,
    parse: impl FnOnce(&str) -> chrono::ParseResult<T>,
) -> rusqlite::Result<T> {
    parse(raw).map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
