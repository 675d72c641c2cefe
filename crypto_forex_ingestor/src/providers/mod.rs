//! Provider abstraction for the aggregates data source.
//!
//! [`AggsProvider`] is the seam between the acquisition pipeline and the
//! remote endpoint: one bounded window in, one raw bar array out. The trait
//! is async and dyn-capable so the chunked fetcher can be driven by test
//! doubles.
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use crypto_forex_ingestor::models::request_params::AggsRequestParams;
//! use crypto_forex_ingestor::providers::{AggsProvider, ProviderError, WindowData};
//!
//! struct MyProvider;
//!
//! #[async_trait]
//! impl AggsProvider for MyProvider {
//!     async fn fetch_window(
//!         &self,
//!         _params: &AggsRequestParams,
//!     ) -> Result<WindowData, ProviderError> {
//!         Ok(WindowData::default())
//!     }
//! }
//! ```

pub mod polygon_rest;

use async_trait::async_trait;
use snafu::{Backtrace, Snafu};

use crate::models::{bar::RawBar, request_params::AggsRequestParams};
use crate::utils::env::MissingEnvVarError;

/// One bounded window's worth of raw aggregates.
#[derive(Clone, Debug, Default)]
pub struct WindowData {
    /// Raw bars in the endpoint's sort order.
    pub results: Vec<RawBar>,

    /// Result count the endpoint reported for this window.
    pub results_count: u64,
}

/// Trait for fetching one bounded window of aggregate bars.
#[async_trait]
pub trait AggsProvider {
    /// Fetch aggregate bars for the given window.
    ///
    /// A non-success response status is an error; an empty result set is
    /// not — the caller decides what emptiness means for its span.
    async fn fetch_window(&self, params: &AggsRequestParams) -> Result<WindowData, ProviderError>;
}

/// Errors that can occur while creating a provider instance.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderInitError {
    /// The API key environment variable is not set.
    #[snafu(display("Missing environment variable: {source}"))]
    MissingEnvVar {
        source: MissingEnvVarError,
        backtrace: Backtrace,
    },

    /// Failed to build the HTTP client.
    #[snafu(display("Failed to build HTTP client: {source}"))]
    ClientBuild {
        source: reqwest::Error,
        backtrace: Backtrace,
    },
}

/// Errors that can occur within an `AggsProvider` implementation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderError {
    /// An error during an API request (e.g., network failure, timeout).
    #[snafu(display("API request failed: {source}"))]
    Reqwest {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// The endpoint answered with a non-success status.
    #[snafu(display("API error: {message}"))]
    Api {
        message: String,
        backtrace: Backtrace,
    },

    /// The request parameters were invalid for this provider.
    #[snafu(display("Invalid parameters for provider: {message}"))]
    Validation {
        message: String,
        backtrace: Backtrace,
    },

    /// An error during provider configuration or initialization.
    #[snafu(display("Provider initialization error: {source}"))]
    Init {
        #[snafu(backtrace)]
        source: ProviderInitError,
    },
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::NaiveDate;

    use super::*;
    use crate::models::{
        instrument::Ticker,
        request_params::{AggsRequestParams, MAX_LIMIT},
        timespan::{SortOrder, Timespan},
    };

    struct EmptyProvider;

    #[async_trait]
    impl AggsProvider for EmptyProvider {
        async fn fetch_window(
            &self,
            _params: &AggsRequestParams,
        ) -> Result<WindowData, ProviderError> {
            Ok(WindowData::default())
        }
    }

    // The chunked fetcher holds a `&dyn AggsProvider`; make sure the trait
    // stays object safe.
    #[tokio::test]
    async fn trait_is_dyn_capable() {
        let provider: Box<dyn AggsProvider> = Box::new(EmptyProvider);
        let params = AggsRequestParams {
            ticker: Ticker::crypto("BTCUSD"),
            multiplier: 1,
            timespan: Timespan::Day,
            from: NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
            to: NaiveDate::from_ymd_opt(2021, 1, 31).unwrap(),
            sort: SortOrder::Asc,
            limit: MAX_LIMIT,
            adjusted: true,
        };
        let data = provider.fetch_window(&params).await.unwrap();
        assert!(data.results.is_empty());
    }
}
