//! Classification of quote API responses.

use serde_json::{Map, Value};

/// Key of the metadata section in a successful reply.
pub const META_DATA_KEY: &str = "Meta Data";

/// Key of the date-keyed daily series in a successful reply.
pub const TIME_SERIES_KEY: &str = "Time Series (Daily)";

/// Key carrying an explicit provider error.
pub const ERROR_MESSAGE_KEY: &str = "Error Message";

/// Advisory keys sent when a call consumed quota without returning data.
pub const RATE_LIMIT_KEYS: [&str; 2] = ["Note", "Information"];

/// The result of one quote API call, classified into exactly one case.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// Well-formed payload with metadata and daily series sections.
    Success(Map<String, Value>),
    /// The provider answered with an explicit error message.
    ProviderError(String),
    /// The provider answered with a quota advisory instead of data.
    SoftRateLimit(String),
    /// The request did not complete within the client timeout.
    Timeout,
    /// Any other network-level failure, including non-success HTTP status.
    TransportFailure(String),
    /// The reply lacks the required top-level sections.
    SchemaMismatch(String),
}

impl FetchOutcome {
    /// Returns a short label for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Success(_) => "success",
            Self::ProviderError(_) => "provider_error",
            Self::SoftRateLimit(_) => "soft_rate_limit",
            Self::Timeout => "timeout",
            Self::TransportFailure(_) => "transport_failure",
            Self::SchemaMismatch(_) => "schema_mismatch",
        }
    }

    /// Returns true for [`FetchOutcome::Success`].
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns the provider or transport message, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::ProviderError(m)
            | Self::SoftRateLimit(m)
            | Self::TransportFailure(m)
            | Self::SchemaMismatch(m) => Some(m),
            Self::Success(_) | Self::Timeout => None,
        }
    }
}

/// Classifies a response body.
///
/// Explicit error and advisory fields win over the shape check, so a reply
/// carrying both a note and partial data is still a soft rate limit.
#[must_use]
pub fn classify_body(body: &str) -> FetchOutcome {
    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => return FetchOutcome::SchemaMismatch(format!("response is not JSON: {e}")),
    };

    let Value::Object(map) = value else {
        return FetchOutcome::SchemaMismatch("response is not a JSON object".to_string());
    };

    if let Some(message) = map.get(ERROR_MESSAGE_KEY) {
        return FetchOutcome::ProviderError(text_of(message));
    }

    if let Some(note) = RATE_LIMIT_KEYS.iter().find_map(|key| map.get(*key)) {
        return FetchOutcome::SoftRateLimit(text_of(note));
    }

    for key in [META_DATA_KEY, TIME_SERIES_KEY] {
        match map.get(key) {
            Some(Value::Object(_)) => {}
            Some(_) => {
                return FetchOutcome::SchemaMismatch(format!("'{key}' is not an object"));
            }
            None => return FetchOutcome::SchemaMismatch(format!("missing '{key}'")),
        }
    }

    FetchOutcome::Success(map)
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
