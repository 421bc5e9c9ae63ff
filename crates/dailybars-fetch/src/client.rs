//! HTTP client for the quote API.

use async_trait::async_trait;
use reqwest::Client;
use std::fmt;
use std::time::Duration;
use tracing::debug;

use crate::url::{BASE_URL, daily_series_url};
use crate::{FetchOutcome, QuoteSource, classify_body};

/// Configuration for the quote API client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Endpoint of the quote API.
    pub base_url: String,
    /// Request timeout, covering connect through body read.
    pub timeout: Duration,
    /// User agent string.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
            user_agent: format!("dailybars/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// HTTP client for the daily series endpoint.
///
/// Requests are never retried: a retry spends provider quota just like the
/// original call.
#[derive(Clone)]
pub struct AlphaVantageClient {
    client: Client,
    api_key: String,
    config: ClientConfig,
}

impl fmt::Debug for AlphaVantageClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlphaVantageClient")
            .field("api_key", &"<redacted>")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AlphaVantageClient {
    /// Creates a new client with the given API key and configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(api_key: impl Into<String>, config: ClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .user_agent(&config.user_agent)
            .gzip(true)
            .build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            config,
        })
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn request(&self, symbol: &str) -> FetchOutcome {
        let url = match daily_series_url(&self.config.base_url, symbol, &self.api_key) {
            Ok(url) => url,
            Err(e) => return FetchOutcome::TransportFailure(format!("invalid base URL: {e}")),
        };

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => return transport_outcome(&e),
        };

        let status = response.status();
        if !status.is_success() {
            return FetchOutcome::TransportFailure(format!("HTTP status {status}"));
        }

        match response.text().await {
            Ok(body) => {
                debug!(symbol, bytes = body.len(), "received response body");
                classify_body(&body)
            }
            Err(e) => transport_outcome(&e),
        }
    }
}

#[async_trait]
impl QuoteSource for AlphaVantageClient {
    async fn fetch_daily(&self, symbol: &str) -> FetchOutcome {
        self.request(symbol).await
    }
}

/// Maps a reqwest error to its outcome, stripping the URL so the API key
/// never reaches the logs.
fn transport_outcome(error: &reqwest::Error) -> FetchOutcome {
    if error.is_timeout() {
        return FetchOutcome::Timeout;
    }
    let kind = if error.is_connect() {
        "connection failed"
    } else if error.is_body() || error.is_decode() {
        "failed to read response body"
    } else {
        "request failed"
    };
    FetchOutcome::TransportFailure(format!("{kind}: {}", error_chain(error)))
}

fn error_chain(error: &reqwest::Error) -> String {
    let mut message = String::new();
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        if !message.is_empty() {
            message.push_str(": ");
        }
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    if message.is_empty() {
        message.push_str("unknown error");
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, timeout: Duration) -> AlphaVantageClient {
        let config = ClientConfig {
            base_url: format!("{}/query", server.uri()),
            timeout,
            ..Default::default()
        };
        AlphaVantageClient::new("test-key", config).unwrap()
    }

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.base_url, BASE_URL);
        assert!(config.user_agent.starts_with("dailybars/"));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let client = AlphaVantageClient::new("super-secret", ClientConfig::default()).unwrap();
        let rendered = format!("{client:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[tokio::test]
    async fn test_success_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("function", "TIME_SERIES_DAILY"))
            .and(query_param("symbol", "IBM"))
            .and(query_param("apikey", "test-key"))
            .and(query_param("outputsize", "compact"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Meta Data": {"2. Symbol": "IBM"},
                "Time Series (Daily)": {
                    "2024-03-01": {"1. open": "185.49", "2. high": "188.38", "3. low": "185.18", "4. close": "188.20", "5. volume": "4018354"}
                }
            })))
            .mount(&server)
            .await;

        let outcome = client_for(&server, Duration::from_secs(5))
            .fetch_daily("IBM")
            .await;
        let FetchOutcome::Success(body) = outcome else {
            panic!("expected success, got {outcome:?}");
        };
        assert!(body.contains_key("Time Series (Daily)"));
    }

    #[tokio::test]
    async fn test_note_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"Note": "call frequency exceeded"})),
            )
            .mount(&server)
            .await;

        let outcome = client_for(&server, Duration::from_secs(5))
            .fetch_daily("MSFT")
            .await;
        assert_eq!(
            outcome,
            FetchOutcome::SoftRateLimit("call frequency exceeded".to_string())
        );
    }

    #[tokio::test]
    async fn test_error_message_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"Error Message": "Invalid API call."})),
            )
            .mount(&server)
            .await;

        let outcome = client_for(&server, Duration::from_secs(5))
            .fetch_daily("NOPE")
            .await;
        assert!(matches!(outcome, FetchOutcome::ProviderError(_)));
    }

    #[tokio::test]
    async fn test_server_error_is_transport_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let outcome = client_for(&server, Duration::from_secs(5))
            .fetch_daily("AAPL")
            .await;
        let FetchOutcome::TransportFailure(message) = outcome else {
            panic!("expected transport failure, got {outcome:?}");
        };
        assert!(message.contains("503"));
    }

    #[tokio::test]
    async fn test_slow_response_is_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"Meta Data": {}, "Time Series (Daily)": {}}))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let outcome = client_for(&server, Duration::from_millis(200))
            .fetch_daily("AAPL")
            .await;
        assert_eq!(outcome, FetchOutcome::Timeout);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_failure() {
        let config = ClientConfig {
            // Port 9 (discard) on localhost is closed on test machines.
            base_url: "http://127.0.0.1:9/query".to_string(),
            timeout: Duration::from_secs(2),
            ..Default::default()
        };
        let client = AlphaVantageClient::new("k", config).unwrap();
        let outcome = client.fetch_daily("AAPL").await;
        assert!(
            matches!(
                outcome,
                FetchOutcome::TransportFailure(_) | FetchOutcome::Timeout
            ),
            "got {outcome:?}"
        );
    }

    #[tokio::test]
    async fn test_transport_message_hides_api_key() {
        let config = ClientConfig {
            base_url: "http://127.0.0.1:9/query".to_string(),
            timeout: Duration::from_secs(2),
            ..Default::default()
        };
        let client = AlphaVantageClient::new("hidden-key-123", config).unwrap();
        let outcome = client.fetch_daily("AAPL").await;
        if let Some(message) = outcome.message() {
            assert!(!message.contains("hidden-key-123"));
        }
    }
}
