//! Daily price record and its validation rules.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{Field, Rule, ValidationError, compute_daily_change};

/// Maximum symbol length in characters.
pub const MAX_SYMBOL_LEN: usize = 10;

/// Unvalidated field values for one trading day.
///
/// Turn a candidate into a [`DailyRecord`] with [`RecordCandidate::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordCandidate {
    /// Ticker symbol.
    pub symbol: String,
    /// Market date of the observation.
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
    /// Derived open-to-close change in percent, if already computed.
    pub daily_change_percentage: Option<f64>,
    /// When the pipeline produced this row.
    pub extracted_at: DateTime<Utc>,
}

impl RecordCandidate {
    /// Fills in the derived daily change percentage from open and close.
    #[must_use]
    pub fn with_daily_change(mut self) -> Self {
        self.daily_change_percentage = Some(compute_daily_change(self.open, self.close));
        self
    }

    /// Checks every rule and produces a validated record.
    ///
    /// The high/low relation is a single check on the pair, so the outcome
    /// does not depend on which of the two fields was supplied first. A
    /// violation is always reported on [`Field::High`] (`high_price`). The
    /// daily change is only checked for finiteness when present; it is never
    /// computed here.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule together with the offending field.
    pub fn validate(self) -> Result<DailyRecord, ValidationError> {
        let symbol_len = self.symbol.chars().count();
        if symbol_len == 0 || symbol_len > MAX_SYMBOL_LEN {
            return Err(ValidationError::new(
                Field::Symbol,
                Rule::SymbolLength,
                format!("{:?} has {symbol_len} characters", self.symbol),
            ));
        }

        for (field, value) in [
            (Field::Open, self.open),
            (Field::High, self.high),
            (Field::Low, self.low),
            (Field::Close, self.close),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ValidationError::new(field, Rule::Positive, value.to_string()));
            }
        }

        if self.volume < 0 {
            return Err(ValidationError::new(
                Field::Volume,
                Rule::NonNegative,
                self.volume.to_string(),
            ));
        }

        if self.high < self.low {
            return Err(ValidationError::new(
                Field::High,
                Rule::HighBelowLow,
                format!("high {} < low {}", self.high, self.low),
            ));
        }

        if let Some(change) = self.daily_change_percentage
            && !change.is_finite()
        {
            return Err(ValidationError::new(
                Field::DailyChange,
                Rule::Finite,
                change.to_string(),
            ));
        }

        Ok(DailyRecord {
            symbol: self.symbol,
            date: self.date,
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            volume: self.volume,
            daily_change_percentage: self.daily_change_percentage,
            extracted_at: self.extracted_at,
        })
    }
}

/// One validated trading-day observation.
///
/// Only [`RecordCandidate::validate`] constructs this type, so every value
/// satisfies `high >= low`, strictly positive prices, and non-negative volume.
/// `(symbol, date)` is the natural key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyRecord {
    symbol: String,
    date: NaiveDate,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: i64,
    daily_change_percentage: Option<f64>,
    extracted_at: DateTime<Utc>,
}

impl DailyRecord {
    /// Returns the ticker symbol.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Returns the market date.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// Returns the opening price.
    #[must_use]
    pub const fn open(&self) -> f64 {
        self.open
    }

    /// Returns the highest price.
    #[must_use]
    pub const fn high(&self) -> f64 {
        self.high
    }

    /// Returns the lowest price.
    #[must_use]
    pub const fn low(&self) -> f64 {
        self.low
    }

    /// Returns the closing price.
    #[must_use]
    pub const fn close(&self) -> f64 {
        self.close
    }

    /// Returns the traded volume.
    #[must_use]
    pub const fn volume(&self) -> i64 {
        self.volume
    }

    /// Returns the open-to-close change in percent, if it was computed.
    #[must_use]
    pub const fn daily_change_percentage(&self) -> Option<f64> {
        self.daily_change_percentage
    }

    /// Returns when the pipeline produced this record.
    #[must_use]
    pub const fn extracted_at(&self) -> DateTime<Utc> {
        self.extracted_at
    }
}
