//! Daily series parsing.

use chrono::NaiveDate;
use dailybars_fetch::TIME_SERIES_KEY;
use serde_json::{Map, Value};

use crate::TransformError;

/// Provider label of the opening price.
pub const OPEN_KEY: &str = "1. open";
/// Provider label of the high price.
pub const HIGH_KEY: &str = "2. high";
/// Provider label of the low price.
pub const LOW_KEY: &str = "3. low";
/// Provider label of the closing price.
pub const CLOSE_KEY: &str = "4. close";
/// Provider label of the traded volume.
pub const VOLUME_KEY: &str = "5. volume";

/// One parsed, not yet validated, series entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRow {
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
    /// Derived change percentage, once computed.
    pub daily_change_percentage: Option<f64>,
}

/// Parses a payload's daily series into rows sorted ascending by date.
///
/// The provider does not guarantee key order, so rows are always sorted here.
///
/// # Errors
///
/// Returns [`TransformError::EmptySeries`] if the series is missing or empty,
/// and a parse error if any key or field is malformed.
pub fn parse_series(payload: &Value, symbol: &str) -> Result<Vec<ParsedRow>, TransformError> {
    let series = payload
        .get(TIME_SERIES_KEY)
        .and_then(Value::as_object)
        .filter(|series| !series.is_empty())
        .ok_or_else(|| TransformError::EmptySeries {
            symbol: symbol.to_string(),
        })?;

    let mut rows = series
        .iter()
        .map(|(key, entry)| parse_entry(symbol, key, entry))
        .collect::<Result<Vec<_>, _>>()?;

    rows.sort_by_key(|row| row.date);
    rows.dedup_by_key(|row| row.date);
    Ok(rows)
}

fn parse_entry(symbol: &str, key: &str, entry: &Value) -> Result<ParsedRow, TransformError> {
    let date =
        NaiveDate::parse_from_str(key, "%Y-%m-%d").map_err(|_| TransformError::InvalidDate {
            symbol: symbol.to_string(),
            value: key.to_string(),
        })?;

    let empty = Map::new();
    let fields = entry.as_object().unwrap_or(&empty);
    let field = |label: &'static str| FieldReader {
        symbol,
        date,
        label,
        value: fields.get(label),
    };

    Ok(ParsedRow {
        date,
        open: field(OPEN_KEY).float()?,
        high: field(HIGH_KEY).float()?,
        low: field(LOW_KEY).float()?,
        close: field(CLOSE_KEY).float()?,
        volume: field(VOLUME_KEY).integer()?,
        daily_change_percentage: None,
    })
}

/// Reads one labeled field, accepting quoted or bare numbers.
struct FieldReader<'a> {
    symbol: &'a str,
    date: NaiveDate,
    label: &'static str,
    value: Option<&'a Value>,
}

impl FieldReader<'_> {
    fn float(&self) -> Result<f64, TransformError> {
        match self.value {
            Some(Value::String(s)) => s.trim().parse().map_err(|_| self.invalid()),
            Some(Value::Number(n)) => n.as_f64().ok_or_else(|| self.invalid()),
            _ => Err(self.invalid()),
        }
    }

    fn integer(&self) -> Result<i64, TransformError> {
        match self.value {
            Some(Value::String(s)) => s.trim().parse().map_err(|_| self.invalid()),
            Some(Value::Number(n)) => n.as_i64().ok_or_else(|| self.invalid()),
            _ => Err(self.invalid()),
        }
    }

    fn invalid(&self) -> TransformError {
        TransformError::InvalidField {
            symbol: self.symbol.to_string(),
            date: self.date,
            field: self.label,
            value: self
                .value
                .map_or_else(|| "missing".to_string(), ToString::to_string),
        }
    }
}
