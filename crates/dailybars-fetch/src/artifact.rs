//! On-disk storage of raw provider payloads.

use chrono::NaiveDate;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while writing or reading raw artifacts.
#[derive(Error, Debug)]
pub enum ArtifactError {
    /// Failed to create the artifact directory.
    #[error("Failed to create directory '{path}': {source}")]
    CreateDir {
        /// The path that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to write an artifact.
    #[error("Failed to write artifact '{path}': {source}")]
    WriteFile {
        /// The path that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to read an artifact.
    #[error("Failed to read artifact '{path}': {source}")]
    ReadFile {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// An artifact does not hold valid JSON.
    #[error("Invalid JSON in '{path}': {source}")]
    ParseJson {
        /// The path that could not be parsed.
        path: PathBuf,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// The symbol cannot be used in a file name.
    #[error("Invalid symbol {0:?}: use letters, digits, '.' and '-'")]
    InvalidSymbol(String),

    /// Failed to serialize a payload.
    #[error("Failed to serialize payload: {0}")]
    SerializeJson(#[from] serde_json::Error),
}

/// Result type for artifact operations.
pub(crate) type Result<T> = std::result::Result<T, ArtifactError>;

/// Returns true if `symbol` is non-empty and made only of ASCII letters,
/// digits, `.` and `-`, so it cannot name a path outside the artifact
/// directory.
#[must_use]
pub fn is_valid_symbol(symbol: &str) -> bool {
    !symbol.is_empty()
        && symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
}

/// An unmodified success payload for one symbol as of one fetch date.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPayload {
    /// Symbol the payload was fetched for.
    pub symbol: String,
    /// Local calendar date of the fetch.
    pub fetch_date: NaiveDate,
    /// The provider response, untouched.
    pub body: Map<String, Value>,
}

/// A raw payload written to disk by the extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Symbol the payload was fetched for.
    pub symbol: String,
    /// Local calendar date of the fetch.
    pub fetch_date: NaiveDate,
    /// Location of the payload file.
    pub path: PathBuf,
}

/// Directory of raw payload files, one per symbol and fetch date.
///
/// Files are named `{SYMBOL}_{YYYY-MM-DD}.json`; fetching the same symbol
/// twice on one day overwrites the earlier file.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    /// Creates a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| ArtifactError::CreateDir {
                path: dir.clone(),
                source: e,
            })?;
        }
        Ok(Self { dir })
    }

    /// Returns the artifact directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the deterministic path for a symbol and fetch date.
    #[must_use]
    pub fn path_for(&self, symbol: &str, fetch_date: NaiveDate) -> PathBuf {
        self.dir
            .join(format!("{symbol}_{}.json", fetch_date.format("%Y-%m-%d")))
    }

    /// Writes a payload as indented JSON, replacing any same-day artifact.
    ///
    /// # Errors
    ///
    /// Returns an error if the symbol is not a valid file name component, or
    /// the payload cannot be serialized or written.
    pub fn write(&self, payload: &RawPayload) -> Result<Artifact> {
        if !is_valid_symbol(&payload.symbol) {
            return Err(ArtifactError::InvalidSymbol(payload.symbol.clone()));
        }
        let path = self.path_for(&payload.symbol, payload.fetch_date);
        let json = serde_json::to_string_pretty(&payload.body)?;

        fs::write(&path, json).map_err(|e| ArtifactError::WriteFile {
            path: path.clone(),
            source: e,
        })?;

        Ok(Artifact {
            symbol: payload.symbol.clone(),
            fetch_date: payload.fetch_date,
            path,
        })
    }

    /// Reads a payload file back as a JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn read(path: &Path) -> Result<Value> {
        let content = fs::read_to_string(path).map_err(|e| ArtifactError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        serde_json::from_str(&content).map_err(|e| ArtifactError::ParseJson {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn payload(close: &str) -> RawPayload {
        let Value::Object(body) = json!({
            "Meta Data": {"2. Symbol": "AAPL"},
            "Time Series (Daily)": {"2024-01-02": {"4. close": close}}
        }) else {
            unreachable!()
        };
        RawPayload {
            symbol: "AAPL".to_string(),
            fetch_date: NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
            body,
        }
    }

    #[test]
    fn test_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("raw_data");
        let store = ArtifactStore::new(&dir).unwrap();
        assert!(dir.is_dir());
        assert_eq!(store.dir(), dir.as_path());
    }

    #[test]
    fn test_path_for() {
        let temp_dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(temp_dir.path()).unwrap();
        let path = store.path_for("MSFT", NaiveDate::from_ymd_opt(2024, 2, 9).unwrap());
        assert_eq!(path, temp_dir.path().join("MSFT_2024-02-09.json"));
    }

    #[test]
    fn test_write_is_indented_and_unmodified() {
        let temp_dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(temp_dir.path()).unwrap();

        let artifact = store.write(&payload("185.64")).unwrap();
        let text = fs::read_to_string(&artifact.path).unwrap();
        assert!(text.contains("\n  \"Meta Data\""));

        let value = ArtifactStore::read(&artifact.path).unwrap();
        assert_eq!(value, Value::Object(payload("185.64").body));
    }

    #[test]
    fn test_same_day_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(temp_dir.path()).unwrap();

        let first = store.write(&payload("1.00")).unwrap();
        let second = store.write(&payload("2.00")).unwrap();
        assert_eq!(first.path, second.path);

        let value = ArtifactStore::read(&second.path).unwrap();
        assert_eq!(value["Time Series (Daily)"]["2024-01-02"]["4. close"], "2.00");
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_valid_symbols() {
        for symbol in ["AAPL", "BRK.B", "RDS-A", "7203", "msft"] {
            assert!(is_valid_symbol(symbol), "{symbol}");
        }
        for symbol in ["", "../etc/passwd", "a/b", "..\\x", "AA PL", "A_B"] {
            assert!(!is_valid_symbol(symbol), "{symbol}");
        }
    }

    #[test]
    fn test_write_rejects_path_like_symbol() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path().join("raw_data")).unwrap();
        let payload = RawPayload {
            symbol: "../escape".to_string(),
            fetch_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            body: Map::new(),
        };

        let err = store.write(&payload).unwrap_err();
        assert!(matches!(err, ArtifactError::InvalidSymbol(ref s) if s == "../escape"));
        assert!(!dir.path().join("escape_2024-01-10.json").exists());
        assert_eq!(fs::read_dir(store.dir()).unwrap().count(), 0);
    }

    #[test]
    fn test_read_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = ArtifactStore::read(&temp_dir.path().join("nope.json"));
        assert!(matches!(result, Err(ArtifactError::ReadFile { .. })));
    }

    #[test]
    fn test_read_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            ArtifactStore::read(&path),
            Err(ArtifactError::ParseJson { .. })
        ));
    }
}
