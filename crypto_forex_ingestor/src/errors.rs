use thiserror::Error;

use crate::fetch::chunked::FetchError;
use crate::io::{normalize::NormalizeError, sink::SinkError};
use crate::models::catalog::CatalogError;
use crate::providers::{ProviderError, ProviderInitError};

/// The unified error type for the `crypto_forex_ingestor` crate.
#[derive(Debug, Error)]
pub enum Error {
    /// An error from the aggregates provider (API error, validation).
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The provider could not be constructed (missing key, bad client).
    #[error("provider setup error: {0}")]
    ProviderInit(#[from] ProviderInitError),

    /// An error during a chunked instrument fetch.
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// An error while normalizing artifacts into flat records.
    #[error("normalize error: {0}")]
    Normalize(#[from] NormalizeError),

    /// An error from the time-series sink (missing database, failed write).
    #[error("sink error: {0}")]
    Sink(#[from] SinkError),

    /// An error loading the instrument catalog.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// An error in run parameters (dates, units, markets).
    #[error("configuration error: {0}")]
    Config(String),

    /// A generic I/O error.
    #[error("I/O error")]
    Io(#[from] std::io::Error),
}
