//! Process configuration.

use dailybars_fetch::url::BASE_URL;
use dailybars_fetch::{ClientConfig, ExtractorConfig, is_valid_symbol};
use dailybars_store::TableName;
use dailybars_types::ConfigError;
use directories::ProjectDirs;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Provider API key (required).
pub const API_KEY_VAR: &str = "ALPHA_VANTAGE_API_KEY";
/// Comma-separated symbol list.
pub const SYMBOLS_VAR: &str = "STOCKS";
/// Seconds between provider calls.
pub const CALL_DELAY_VAR: &str = "API_CALL_DELAY";
/// Root directory for raw artifacts and the database.
pub const DATA_DIR_VAR: &str = "DAILYBARS_DATA_DIR";
/// SQLite database file.
pub const DB_PATH_VAR: &str = "DAILYBARS_DB_PATH";
/// Destination table name.
pub const TABLE_VAR: &str = "DAILYBARS_TABLE";
/// Provider endpoint.
pub const BASE_URL_VAR: &str = "ALPHA_VANTAGE_BASE_URL";

/// Symbols fetched when none are configured.
pub const DEFAULT_SYMBOLS: &str = "AAPL,GOOG,MSFT";
/// Default spacing between provider calls, matching the free tier's
/// five requests per minute.
pub const DEFAULT_CALL_DELAY: Duration = Duration::from_secs(12);

/// Configuration for one process, built once at startup.
#[derive(Clone)]
pub struct Settings {
    api_key: String,
    symbols: Vec<String>,
    call_delay: Duration,
    data_dir: PathBuf,
    db_path: PathBuf,
    table: TableName,
    base_url: String,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &"<redacted>")
            .field("symbols", &self.symbols)
            .field("call_delay", &self.call_delay)
            .field("data_dir", &self.data_dir)
            .field("db_path", &self.db_path)
            .field("table", &self.table)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Settings {
    /// Loads settings from the process environment, after reading an
    /// optional `.env` file from the working directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing or a value is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup.
    ///
    /// Unset and blank values fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing or a value is malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = get(API_KEY_VAR).ok_or(ConfigError::MissingApiKey)?;

        let symbols = parse_symbols(&get(SYMBOLS_VAR).unwrap_or_else(|| DEFAULT_SYMBOLS.into()))?;
        if symbols.is_empty() {
            return Err(ConfigError::NoSymbols);
        }

        let call_delay = get(CALL_DELAY_VAR)
            .map(|raw| {
                raw.parse::<u64>()
                    .map(Duration::from_secs)
                    .map_err(|_| ConfigError::InvalidValue {
                        key: CALL_DELAY_VAR,
                        value: raw,
                    })
            })
            .transpose()?
            .unwrap_or(DEFAULT_CALL_DELAY);

        let data_dir = get(DATA_DIR_VAR).map_or_else(default_data_dir, PathBuf::from);
        let db_path = get(DB_PATH_VAR).map_or_else(
            || data_dir.join("database").join("stock_data.db"),
            PathBuf::from,
        );

        let table = get(TABLE_VAR)
            .map(|raw| {
                TableName::new(raw.clone()).map_err(|_| ConfigError::InvalidValue {
                    key: TABLE_VAR,
                    value: raw,
                })
            })
            .transpose()?
            .unwrap_or_default();

        let base_url = get(BASE_URL_VAR).unwrap_or_else(|| BASE_URL.to_string());

        Ok(Self {
            api_key,
            symbols,
            call_delay,
            data_dir,
            db_path,
            table,
            base_url,
        })
    }

    /// Returns the provider API key.
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Returns the symbols to fetch, upper-cased and deduplicated.
    #[must_use]
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Returns the delay between provider calls.
    #[must_use]
    pub const fn call_delay(&self) -> Duration {
        self.call_delay
    }

    /// Returns the data root.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Returns the directory for raw payload artifacts.
    #[must_use]
    pub fn raw_data_dir(&self) -> PathBuf {
        self.data_dir.join("raw_data")
    }

    /// Returns the SQLite database path.
    #[must_use]
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Returns the destination table.
    #[must_use]
    pub const fn table(&self) -> &TableName {
        &self.table
    }

    /// Returns the provider endpoint.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Replaces the symbol list.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for a symbol that is not usable
    /// in a file name and [`ConfigError::NoSymbols`] for an empty list.
    pub fn with_symbols<I, T>(mut self, symbols: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let joined: Vec<String> = symbols.into_iter().map(|s| s.as_ref().to_string()).collect();
        let symbols = parse_symbols(&joined.join(","))?;
        if symbols.is_empty() {
            return Err(ConfigError::NoSymbols);
        }
        self.symbols = symbols;
        Ok(self)
    }

    /// Returns the HTTP client configuration.
    #[must_use]
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            ..ClientConfig::default()
        }
    }

    /// Returns the extractor configuration.
    #[must_use]
    pub const fn extractor_config(&self) -> ExtractorConfig {
        ExtractorConfig {
            call_delay: self.call_delay,
        }
    }
}

/// Splits a comma-separated list, trimming, upper-casing and dropping
/// empties and repeats. Symbols end up in artifact file names, so anything
/// outside letters, digits, `.` and `-` is rejected.
fn parse_symbols(raw: &str) -> Result<Vec<String>, ConfigError> {
    let mut symbols: Vec<String> = Vec::new();
    for symbol in raw.split(',').map(|s| s.trim().to_uppercase()) {
        if symbol.is_empty() || symbols.contains(&symbol) {
            continue;
        }
        if !is_valid_symbol(&symbol) {
            return Err(ConfigError::InvalidValue { key: SYMBOLS_VAR, value: symbol });
        }
        symbols.push(symbol);
    }
    Ok(symbols)
}

/// Returns the platform data directory for dailybars.
///
/// - Linux: `~/.local/share/dailybars/`
/// - macOS: `~/Library/Application Support/dailybars/`
/// - Windows: `C:\Users\<User>\AppData\Roaming\dailybars\`
///
/// Falls back to `~/.dailybars/`.
#[must_use]
pub fn default_data_dir() -> PathBuf {
    ProjectDirs::from("", "", "dailybars")
        .map_or_else(dirs_fallback, |proj_dirs| proj_dirs.data_dir().to_path_buf())
}

fn dirs_fallback() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".dailybars")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_missing_api_key() {
        assert!(matches!(settings(&[]), Err(ConfigError::MissingApiKey)));
        assert!(matches!(
            settings(&[(API_KEY_VAR, "   ")]),
            Err(ConfigError::MissingApiKey)
        ));
    }

    #[test]
    fn test_defaults() {
        let settings = settings(&[(API_KEY_VAR, "demo"), (DATA_DIR_VAR, "/srv/dailybars")]).unwrap();
        assert_eq!(settings.api_key(), "demo");
        assert_eq!(settings.symbols(), ["AAPL", "GOOG", "MSFT"]);
        assert_eq!(settings.call_delay(), Duration::from_secs(12));
        assert_eq!(settings.raw_data_dir(), PathBuf::from("/srv/dailybars/raw_data"));
        assert_eq!(
            settings.db_path(),
            Path::new("/srv/dailybars/database/stock_data.db")
        );
        assert_eq!(settings.table().as_str(), "stock_daily_data");
        assert_eq!(settings.base_url(), BASE_URL);
    }

    #[test]
    fn test_symbols_normalized() {
        let settings = settings(&[(API_KEY_VAR, "k"), (SYMBOLS_VAR, " msft, ,ibm,MSFT,tsla ")]).unwrap();
        assert_eq!(settings.symbols(), ["MSFT", "IBM", "TSLA"]);
    }

    #[test]
    fn test_blank_symbol_list_uses_default() {
        let settings = settings(&[(API_KEY_VAR, "k"), (SYMBOLS_VAR, "")]).unwrap();
        assert_eq!(settings.symbols().len(), 3);
    }

    #[test]
    fn test_only_separators_is_error() {
        assert!(matches!(
            settings(&[(API_KEY_VAR, "k"), (SYMBOLS_VAR, " , ,")]),
            Err(ConfigError::NoSymbols)
        ));
    }

    #[test]
    fn test_call_delay() {
        let settings = settings(&[(API_KEY_VAR, "k"), (CALL_DELAY_VAR, "0")]).unwrap();
        assert_eq!(settings.call_delay(), Duration::ZERO);
        assert_eq!(settings.extractor_config().call_delay, Duration::ZERO);

        let err = settings_err(&[(API_KEY_VAR, "k"), (CALL_DELAY_VAR, "twelve")]);
        assert!(matches!(
            err,
            ConfigError::InvalidValue { key: CALL_DELAY_VAR, ref value } if value == "twelve"
        ));
    }

    #[test]
    fn test_invalid_table() {
        let err = settings_err(&[(API_KEY_VAR, "k"), (TABLE_VAR, "daily data")]);
        assert!(matches!(err, ConfigError::InvalidValue { key: TABLE_VAR, .. }));
    }

    #[test]
    fn test_overrides() {
        let settings = settings(&[
            (API_KEY_VAR, "k"),
            (DATA_DIR_VAR, "/data"),
            (DB_PATH_VAR, "/elsewhere/prices.db"),
            (TABLE_VAR, "quotes"),
            (BASE_URL_VAR, "http://127.0.0.1:8080/query"),
        ])
        .unwrap();
        assert_eq!(settings.db_path(), Path::new("/elsewhere/prices.db"));
        assert_eq!(settings.table().as_str(), "quotes");
        assert_eq!(settings.client_config().base_url, "http://127.0.0.1:8080/query");
        assert_eq!(settings.client_config().timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let settings = settings(&[(API_KEY_VAR, "supersecret")]).unwrap();
        let debug = format!("{settings:?}");
        assert!(!debug.contains("supersecret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_with_symbols() {
        let s = settings(&[(API_KEY_VAR, "k")]).unwrap().with_symbols(["nvda", "amd"]).unwrap();
        assert_eq!(s.symbols(), ["NVDA", "AMD"]);

        let err = settings(&[(API_KEY_VAR, "k")]).unwrap().with_symbols(["a/b"]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: SYMBOLS_VAR, .. }));
    }

    #[test]
    fn test_path_like_symbol_rejected() {
        let err = settings_err(&[(API_KEY_VAR, "k"), (SYMBOLS_VAR, "AAPL,../etc")]);
        assert!(matches!(
            err,
            ConfigError::InvalidValue { key: SYMBOLS_VAR, ref value } if value == "../ETC"
        ));

        let settings = settings(&[(API_KEY_VAR, "k"), (SYMBOLS_VAR, "brk.b, rds-a")]).unwrap();
        assert_eq!(settings.symbols(), ["BRK.B", "RDS-A"]);
    }

    #[test]
    fn test_default_data_dir_named() {
        assert!(default_data_dir().to_string_lossy().contains("dailybars"));
    }

    fn settings_err(vars: &[(&str, &str)]) -> ConfigError {
        settings(vars).unwrap_err()
    }
}
