//! Error types for dailybars.

use std::fmt;
use thiserror::Error;

/// A field of a daily record that a validation rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Ticker symbol.
    Symbol,
    /// Opening price.
    Open,
    /// Highest price of the day.
    High,
    /// Lowest price of the day.
    Low,
    /// Closing price.
    Close,
    /// Traded volume.
    Volume,
    /// Derived daily change percentage.
    DailyChange,
}

impl Field {
    /// Returns the field name as used in the stored table.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Symbol => "symbol",
            Self::Open => "open_price",
            Self::High => "high_price",
            Self::Low => "low_price",
            Self::Close => "close_price",
            Self::Volume => "volume",
            Self::DailyChange => "daily_change_percentage",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A business rule that a record field can violate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    /// Symbol must be between 1 and 10 characters.
    SymbolLength,
    /// Price must be a finite number strictly greater than zero.
    Positive,
    /// Volume must not be negative.
    NonNegative,
    /// High price must not be below the low price. Reported on
    /// [`Field::High`] whichever side is out of range.
    HighBelowLow,
    /// Derived values must be finite.
    Finite,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = match self {
            Self::SymbolLength => "length must be between 1 and 10 characters",
            Self::Positive => "must be greater than 0",
            Self::NonNegative => "must be greater than or equal to 0",
            Self::HighBelowLow => "high price cannot be less than low price",
            Self::Finite => "must be a finite number",
        };
        f.write_str(rule)
    }
}

/// A record failed one of its field-level or cross-field rules.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Invalid {field}: {rule} ({detail})")]
pub struct ValidationError {
    /// The offending field.
    pub field: Field,
    /// The rule that was violated.
    pub rule: Rule,
    /// The offending value(s), rendered for logs.
    pub detail: String,
}

impl ValidationError {
    /// Creates a new validation error.
    #[must_use]
    pub fn new(field: Field, rule: Rule, detail: impl Into<String>) -> Self {
        Self {
            field,
            rule,
            detail: detail.into(),
        }
    }
}

/// Errors raised while building the process configuration.
///
/// All of these are fatal at startup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The provider API key is not set.
    #[error("ALPHA_VANTAGE_API_KEY not found, add it to your environment or .env file")]
    MissingApiKey,

    /// The configured symbol list contains no symbols.
    #[error("Symbol list is empty")]
    NoSymbols,

    /// A variable holds a value that cannot be parsed.
    #[error("Invalid value for {key}: {value}")]
    InvalidValue {
        /// The environment variable name.
        key: &'static str,
        /// The rejected value.
        value: String,
    },

    /// The data directory could not be determined or created.
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}
