//! Fleet runs: the whole instrument catalog over one span.
//!
//! The fleet runner is the top-level failure boundary: a pair that fails is
//! logged and skipped, never allowed to end the run. FX pairs get a second
//! attempt with the reversed ordering before they count as failed.

use std::path::Path;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use nonzero_ext::nonzero;
use tracing::{error, info, warn};

use crate::fetch::chunked::{FetchError, FetchOutcome, PairFetchParams, fetch_pair_history};
use crate::models::{catalog::InstrumentCatalog, instrument::Ticker, timespan::Timespan};
use crate::providers::AggsProvider;

/// Delay between successive instrument fetches. A policy constant for the
/// shared upstream rate limit, not derived from response headers.
pub const DEFAULT_PACING: Duration = Duration::from_secs(30);

/// Spaces out instrument fetches with a single-permit rate limiter; the
/// first fetch goes through immediately.
pub struct Pacing {
    limiter: DefaultDirectRateLimiter,
}

impl Pacing {
    pub fn new(period: Duration) -> Self {
        let quota = Quota::with_period(period).unwrap_or_else(|| Quota::per_second(nonzero!(1u32)));
        Self {
            limiter: RateLimiter::direct(quota),
        }
    }

    async fn throttle(&self) {
        self.limiter.until_ready().await;
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self::new(DEFAULT_PACING)
    }
}

/// Parameters for one whole-catalog acquisition run.
#[derive(Clone, Debug)]
pub struct FleetParams {
    /// Inclusive start of the span.
    pub start: NaiveDate,
    /// Exclusive end of the span.
    pub end: NaiveDate,
    pub multiplier: u32,
    pub timespan: Timespan,
    pub adjusted: bool,
}

/// What happened to each instrument in a fleet run.
#[derive(Debug, Default)]
pub struct FleetReport {
    /// Successful acquisitions, in catalog order. For FX pairs the ticker
    /// records whichever ordering succeeded.
    pub outcomes: Vec<FetchOutcome>,

    /// Market-prefixed codes that failed every attempt. FX pairs record
    /// their preferred ordering.
    pub failed: Vec<String>,

    /// Wall-clock duration of the run.
    pub elapsed: Duration,
}

/// Run the chunked fetcher over every instrument in `catalog`.
///
/// Strictly sequential: one instrument at a time, paced between requests.
pub async fn run_fleet(
    provider: &dyn AggsProvider,
    catalog: &InstrumentCatalog,
    params: &FleetParams,
    out_dir: &Path,
    pacing: &Pacing,
) -> FleetReport {
    let started = Instant::now();
    let mut report = FleetReport::default();

    for ticker in catalog.crypto_tickers() {
        pacing.throttle().await;
        match fetch_one(provider, ticker.clone(), params, out_dir).await {
            Ok(outcome) => report.outcomes.push(outcome),
            Err(e) => {
                error!(ticker = %ticker, error = %e, "instrument failed");
                report.failed.push(ticker.code());
            }
        }
    }

    for code in catalog.fx_codes() {
        let candidates = catalog.fx_candidates(code);
        let preferred = candidates[0].code();
        let mut succeeded = false;
        for ticker in candidates {
            pacing.throttle().await;
            match fetch_one(provider, ticker.clone(), params, out_dir).await {
                Ok(outcome) => {
                    report.outcomes.push(outcome);
                    succeeded = true;
                    break;
                }
                Err(e) => {
                    warn!(ticker = %ticker, error = %e, "pair ordering failed");
                }
            }
        }
        if !succeeded {
            error!(code, "both pair orderings failed");
            report.failed.push(preferred);
        }
    }

    report.elapsed = started.elapsed();
    info!(
        succeeded = report.outcomes.len(),
        failed = report.failed.len(),
        elapsed_secs = report.elapsed.as_secs(),
        "fleet run finished"
    );
    report
}

async fn fetch_one(
    provider: &dyn AggsProvider,
    ticker: Ticker,
    params: &FleetParams,
    out_dir: &Path,
) -> Result<FetchOutcome, FetchError> {
    let pair_params = PairFetchParams {
        ticker,
        multiplier: params.multiplier,
        timespan: params.timespan,
        start: params.start,
        end: params.end,
        adjusted: params.adjusted,
    };
    fetch_pair_history(provider, &pair_params, out_dir).await
}
