//! Chunked acquisition of one instrument's full span.
//!
//! The endpoint caps every response at 50 000 results, so an arbitrary span
//! is split into calendar windows, fetched strictly in order, and streamed
//! into a single artifact. Emptiness is tracked per window: one empty
//! window marks the dataset incomplete, all-empty means the source does
//! not carry the pair at all.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, info};

use crate::fetch::windows::{granularity_for, partition};
use crate::io::artifact::{self, ArtifactWriter};
use crate::models::{
    instrument::Ticker,
    request_params::{AggsRequestParams, MAX_LIMIT},
    timespan::{SortOrder, Timespan},
};
use crate::providers::{AggsProvider, ProviderError};

#[derive(Debug, Error)]
pub enum FetchError {
    /// Every window came back empty; the source does not carry this pair.
    #[error("source does not support pair {ticker}")]
    UnsupportedPair { ticker: String },

    /// The requested span produced no windows.
    #[error("empty span: start {start} is not before end {end}")]
    EmptySpan { start: NaiveDate, end: NaiveDate },

    /// A window fetch failed hard; the whole instrument is abandoned.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("failed to persist artifact")]
    Artifact(#[from] std::io::Error),
}

/// Parameters for one instrument-span acquisition.
#[derive(Clone, Debug)]
pub struct PairFetchParams {
    pub ticker: Ticker,
    pub multiplier: u32,
    pub timespan: Timespan,
    /// Inclusive start of the span.
    pub start: NaiveDate,
    /// Exclusive end of the span.
    pub end: NaiveDate,
    pub adjusted: bool,
}

/// Outcome of one instrument-span acquisition.
#[derive(Clone, Debug)]
pub struct FetchOutcome {
    pub ticker: Ticker,

    /// Where the concatenated dataset was persisted.
    pub artifact: PathBuf,

    /// Total bars across all windows.
    pub bar_count: u64,

    /// True when at least one window returned zero results.
    pub incomplete: bool,
}

/// Fetch one instrument over `[start, end)`, window by window, persisting
/// the concatenated dataset as a single artifact under `out_dir`.
///
/// Windows are fetched in order with ascending sort, so the concatenated
/// sequence stays chronologically ordered. A hard provider error aborts
/// the instrument; the artifact writer's drop guard then discards the
/// partial file, as it does when every window is empty.
pub async fn fetch_pair_history(
    provider: &dyn AggsProvider,
    params: &PairFetchParams,
    out_dir: &Path,
) -> Result<FetchOutcome, FetchError> {
    let windows = partition(params.start, params.end, granularity_for(params.timespan));
    if windows.is_empty() {
        return Err(FetchError::EmptySpan {
            start: params.start,
            end: params.end,
        });
    }

    let stem = artifact::artifact_stem(
        &params.ticker,
        params.start,
        params.end,
        params.multiplier,
        params.timespan,
    );
    let mut writer = ArtifactWriter::create(out_dir, &stem)?;

    let mut incomplete = false;
    let mut bar_count = 0u64;
    for window in &windows {
        let request = AggsRequestParams {
            ticker: params.ticker.clone(),
            multiplier: params.multiplier,
            timespan: params.timespan,
            from: window.from,
            to: window.request_end(),
            sort: SortOrder::Asc,
            limit: MAX_LIMIT,
            adjusted: params.adjusted,
        };
        let data = provider.fetch_window(&request).await?;
        if data.results.is_empty() {
            debug!(ticker = %params.ticker, from = %window.from, "window returned no results");
            incomplete = true;
            continue;
        }
        bar_count += data.results.len() as u64;
        writer.append_bars(&data.results)?;
    }

    if !writer.wrote_any() {
        // dropping the writer discards the empty artifact
        return Err(FetchError::UnsupportedPair {
            ticker: params.ticker.code(),
        });
    }
    let artifact = writer.commit()?;

    if incomplete {
        info!(ticker = %params.ticker, bars = bar_count, "fetch finished, but dataset is incomplete");
    } else {
        info!(ticker = %params.ticker, bars = bar_count, "fetch finished");
    }

    Ok(FetchOutcome {
        ticker: params.ticker.clone(),
        artifact,
        bar_count,
        incomplete,
    })
}
