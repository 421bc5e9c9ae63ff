//! Sequential, rate-limited extraction across symbols.

use chrono::{Local, NaiveDate};
use std::time::Duration;
use tracing::{info, warn};

use crate::{Artifact, ArtifactStore, FetchOutcome, QuoteSource, RawPayload};

/// Configuration for the extractor.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Pause between consecutive provider calls.
    pub call_delay: Duration,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            call_delay: Duration::from_secs(12),
        }
    }
}

/// Fetches symbols one at a time and persists successful payloads.
#[derive(Debug)]
pub struct Extractor<S> {
    source: S,
    artifacts: ArtifactStore,
    config: ExtractorConfig,
}

impl<S: QuoteSource> Extractor<S> {
    /// Creates a new extractor.
    #[must_use]
    pub const fn new(source: S, artifacts: ArtifactStore, config: ExtractorConfig) -> Self {
        Self {
            source,
            artifacts,
            config,
        }
    }

    /// Returns the artifact store payloads are written to.
    #[must_use]
    pub const fn artifacts(&self) -> &ArtifactStore {
        &self.artifacts
    }

    /// Fetches one symbol and writes its payload dated today.
    ///
    /// Returns `None` for every non-success outcome and when the payload
    /// cannot be written; the reason is logged.
    pub async fn fetch_one(&self, symbol: &str) -> Option<Artifact> {
        self.fetch_one_on(symbol, Local::now().date_naive()).await
    }

    /// Fetches one symbol and writes its payload under `fetch_date`.
    pub async fn fetch_one_on(&self, symbol: &str, fetch_date: NaiveDate) -> Option<Artifact> {
        info!(symbol, "fetching daily series");

        let body = match self.source.fetch_daily(symbol).await {
            FetchOutcome::Success(body) => body,
            FetchOutcome::ProviderError(message) => {
                warn!(symbol, %message, "provider returned an error");
                return None;
            }
            FetchOutcome::SoftRateLimit(message) => {
                warn!(symbol, %message, "rate limit advisory, no data returned");
                return None;
            }
            FetchOutcome::Timeout => {
                warn!(symbol, "request timed out");
                return None;
            }
            FetchOutcome::TransportFailure(message) => {
                warn!(symbol, %message, "request failed");
                return None;
            }
            FetchOutcome::SchemaMismatch(message) => {
                warn!(symbol, %message, "unexpected response shape");
                return None;
            }
        };

        let payload = RawPayload {
            symbol: symbol.to_string(),
            fetch_date,
            body,
        };

        match self.artifacts.write(&payload) {
            Ok(artifact) => {
                info!(symbol, path = %artifact.path.display(), "saved raw payload");
                Some(artifact)
            }
            Err(e) => {
                warn!(symbol, error = %e, "failed to save raw payload");
                None
            }
        }
    }

    /// Fetches every symbol in order, pausing between calls.
    ///
    /// Symbols that fail are absent from the result. The delay follows every
    /// call except the last, whatever its outcome, since failed calls also
    /// count against the provider quota.
    pub async fn fetch_all<T: AsRef<str>>(&self, symbols: &[T]) -> Vec<Artifact> {
        let fetch_date = Local::now().date_naive();
        let total = symbols.len();
        info!(
            total,
            delay_secs = self.config.call_delay.as_secs_f64(),
            "starting extraction"
        );

        let mut artifacts = Vec::with_capacity(total);
        for (i, symbol) in symbols.iter().enumerate() {
            let symbol = symbol.as_ref();
            info!(symbol, position = i + 1, total, "processing symbol");

            match self.fetch_one_on(symbol, fetch_date).await {
                Some(artifact) => artifacts.push(artifact),
                None => info!(symbol, "skipping symbol, no data received"),
            }

            if i + 1 < total && !self.config.call_delay.is_zero() {
                info!(
                    delay_secs = self.config.call_delay.as_secs_f64(),
                    "waiting before next request"
                );
                tokio::time::sleep(self.config.call_delay).await;
            }
        }

        info!(saved = artifacts.len(), total, "extraction complete");
        for artifact in &artifacts {
            info!(symbol = %artifact.symbol, path = %artifact.path.display(), "artifact");
        }
        artifacts
    }
}
