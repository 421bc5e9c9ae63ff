//! Destination table naming.

use std::fmt;
use std::str::FromStr;

use crate::StoreError;

/// Default destination table.
pub const DEFAULT_TABLE: &str = "stock_daily_data";

const MAX_TABLE_NAME_LEN: usize = 64;

/// A table name that is safe to splice into SQL.
///
/// SQLite cannot bind identifiers as parameters, so the name is restricted to
/// `[A-Za-z_][A-Za-z0-9_]*`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableName(String);

impl TableName {
    /// Validates and wraps a table name.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidTableName`] for anything but a plain identifier.
    pub fn new(name: impl Into<String>) -> Result<Self, StoreError> {
        let name = name.into();
        let mut chars = name.chars();
        let valid_start = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
        let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

        if valid_start && valid_rest && name.len() <= MAX_TABLE_NAME_LEN {
            Ok(Self(name))
        } else {
            Err(StoreError::InvalidTableName(name))
        }
    }

    /// Returns the name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the name of an index on this table for the given suffix.
    #[must_use]
    pub fn index_name(&self, suffix: &str) -> String {
        format!("idx_{}_{suffix}", self.0)
    }
}

impl Default for TableName {
    fn default() -> Self {
        Self(DEFAULT_TABLE.to_string())
    }
}

impl FromStr for TableName {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
