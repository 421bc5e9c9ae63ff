//! Error types for the store.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while persisting or querying records.
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite reported an error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Failed to create the database directory.
    #[error("Failed to create directory '{path}': {source}")]
    CreateDir {
        /// The path that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The table name is not a plain SQL identifier.
    #[error("Invalid table name '{0}': use letters, digits and underscores, not starting with a digit")]
    InvalidTableName(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
