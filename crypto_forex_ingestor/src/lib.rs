//! Bulk acquisition of historical crypto and forex OHLCV bars from a
//! rate-limited aggregates API, with normalization and batched loading
//! into a time-series store.
//!
//! The pipeline runs in two phases bridged by on-disk artifacts:
//!
//! 1. **Fetch** — [`fetch::run_fleet`] walks an instrument catalog and, per
//!    instrument, [`fetch::fetch_pair_history`] splits the span into
//!    calendar windows that respect the endpoint's 50 000-result ceiling,
//!    persisting each dataset as one JSON artifact.
//! 2. **Load** — [`io::normalize`] flattens artifacts into line-delimited
//!    records, which [`io::load::load_records`] writes to InfluxDB in
//!    10 000-point batches.
//!
//! The artifact is a deliberate durability checkpoint: normalization and
//! loading re-run without re-fetching.

pub mod cli;
pub mod errors;
pub mod fetch;
pub mod io;
pub mod models;
pub mod providers;
pub mod utils;
