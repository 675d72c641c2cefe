//! Sink abstraction for the time-series store.

use async_trait::async_trait;
use snafu::{Backtrace, Snafu};

use crate::models::bar::FlatBar;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum SinkError {
    /// The configured database does not exist on the target host.
    #[snafu(display("database {database:?} not found on the target store"))]
    MissingDatabase {
        database: String,
        backtrace: Backtrace,
    },

    /// The store rejected or failed a bulk write.
    #[snafu(display("failed to write batch: {message}"))]
    Write {
        message: String,
        backtrace: Backtrace,
    },

    /// Transport-level failure talking to the store.
    #[snafu(display("store request failed: {source}"))]
    Transport {
        source: reqwest::Error,
        backtrace: Backtrace,
    },
}

/// A bulk-write target for normalized bar records.
///
/// Implementations own one store connection for the duration of a load
/// run; nothing here is shared across tasks.
#[async_trait]
pub trait PointSink {
    /// Verify the write target exists. Called once, before any batch; a
    /// failure here must abort the load with zero writes.
    async fn ensure_target(&self) -> Result<(), SinkError>;

    /// Write one batch of records in a single bulk call.
    async fn write_batch(&self, records: &[FlatBar]) -> Result<(), SinkError>;
}
