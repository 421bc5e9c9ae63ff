//! Quote source abstraction.

use async_trait::async_trait;

use crate::FetchOutcome;

/// A provider of raw daily series, one symbol per call.
///
/// [`crate::AlphaVantageClient`] is the network implementation. Tests and
/// offline replays can supply canned outcomes instead.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Fetches and classifies one symbol's daily series.
    ///
    /// Never fails: every failure mode is a [`FetchOutcome`] variant.
    async fn fetch_daily(&self, symbol: &str) -> FetchOutcome;
}

#[async_trait]
impl<S: QuoteSource + ?Sized> QuoteSource for &S {
    async fn fetch_daily(&self, symbol: &str) -> FetchOutcome {
        (**self).fetch_daily(symbol).await
    }
}

#[async_trait]
impl<S: QuoteSource + ?Sized> QuoteSource for Box<S> {
    async fn fetch_daily(&self, symbol: &str) -> FetchOutcome {
        (**self).fetch_daily(symbol).await
    }
}
