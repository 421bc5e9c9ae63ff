//! Quote API URL construction.

use url::Url;

/// Default endpoint of the quote API.
pub const BASE_URL: &str = "https://www.alphavantage.co/query";

/// API function returning the daily open/high/low/close/volume series.
pub const DAILY_FUNCTION: &str = "TIME_SERIES_DAILY";

/// Output size selecting the provider's recent window (about 100 days).
pub const COMPACT_OUTPUT: &str = "compact";

/// Builds the request URL for a symbol's daily series.
///
/// # Example
///
/// ```
/// use dailybars_fetch::url::daily_series_url;
///
/// let url = daily_series_url("https://www.alphavantage.co/query", "MSFT", "demo").unwrap();
/// assert_eq!(
///     url.as_str(),
///     "https://www.alphavantage.co/query?function=TIME_SERIES_DAILY&symbol=MSFT&apikey=demo&outputsize=compact"
/// );
/// ```
///
/// # Errors
///
/// Returns an error if `base` is not an absolute URL.
pub fn daily_series_url(base: &str, symbol: &str, api_key: &str) -> Result<Url, url::ParseError> {
    Url::parse_with_params(
        base,
        &[
            ("function", DAILY_FUNCTION),
            ("symbol", symbol),
            ("apikey", api_key),
            ("outputsize", COMPACT_OUTPUT),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daily_series_url_params() {
        let url = daily_series_url(BASE_URL, "AAPL", "secret").unwrap();
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        assert_eq!(url.host_str(), Some("www.alphavantage.co"));
        assert!(pairs.contains(&("function".into(), "TIME_SERIES_DAILY".into())));
        assert!(pairs.contains(&("symbol".into(), "AAPL".into())));
        assert!(pairs.contains(&("apikey".into(), "secret".into())));
        assert!(pairs.contains(&("outputsize".into(), "compact".into())));
    }

    #[test]
    fn test_symbol_is_escaped() {
        let url = daily_series_url(BASE_URL, "BRK B", "k").unwrap();
        assert!(url.as_str().contains("symbol=BRK+B"));
    }

    #[test]
    fn test_relative_base_rejected() {
        assert!(daily_series_url("/query", "AAPL", "k").is_err());
    }
}
