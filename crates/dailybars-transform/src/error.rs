//! Error types for the transform stage.

use chrono::NaiveDate;
use dailybars_fetch::ArtifactError;
use thiserror::Error;

/// Errors that abort the transformation of one symbol.
#[derive(Error, Debug)]
pub enum TransformError {
    /// The payload has no daily series, or the series is empty.
    #[error("No time series data found for {symbol}")]
    EmptySeries {
        /// The symbol being transformed.
        symbol: String,
    },

    /// A series key is not an ISO date.
    #[error("Invalid date key '{value}' for {symbol}")]
    InvalidDate {
        /// The symbol being transformed.
        symbol: String,
        /// The rejected key.
        value: String,
    },

    /// A series entry lacks a field or holds a non-numeric value.
    #[error("Invalid '{field}' on {date} for {symbol}: {value}")]
    InvalidField {
        /// The symbol being transformed.
        symbol: String,
        /// Market date of the entry.
        date: NaiveDate,
        /// The provider's label for the field.
        field: &'static str,
        /// The rejected value, or `missing`.
        value: String,
    },

    /// The raw artifact could not be read.
    #[error(transparent)]
    Artifact(#[from] ArtifactError),
}
