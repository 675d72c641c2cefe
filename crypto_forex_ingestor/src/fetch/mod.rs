//! Acquisition pipeline: span windowing, chunked per-instrument fetches,
//! and whole-catalog fleet runs.

pub mod chunked;
pub mod fleet;
pub mod windows;

pub use chunked::{FetchError, FetchOutcome, PairFetchParams, fetch_pair_history};
pub use fleet::{FleetParams, FleetReport, Pacing, run_fleet};
