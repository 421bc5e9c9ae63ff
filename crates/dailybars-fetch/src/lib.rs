//! Quote extraction for the dailybars pipeline.
//!
//! This crate provides the extraction stage:
//!
//! - [`url::daily_series_url`] - Constructs quote API request URLs
//! - [`AlphaVantageClient`] - HTTP client with a bounded timeout
//! - [`classify_body`] - Tags a response as one [`FetchOutcome`]
//! - [`ArtifactStore`] - Raw payload files keyed by symbol and fetch date
//! - [`Extractor`] - Sequential, rate-limited fetching across symbols

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod artifact;
mod client;
mod extract;
mod outcome;
mod source;
pub mod url;

pub use artifact::{Artifact, ArtifactError, ArtifactStore, RawPayload, is_valid_symbol};
pub use client::{AlphaVantageClient, ClientConfig};
pub use extract::{Extractor, ExtractorConfig};
pub use outcome::{
    ERROR_MESSAGE_KEY, FetchOutcome, META_DATA_KEY, RATE_LIMIT_KEYS, TIME_SERIES_KEY,
    classify_body,
};
pub use source::QuoteSource;
