//! Parameters for one bounded-window aggregates request.

use chrono::NaiveDate;

use crate::models::{
    instrument::Ticker,
    timespan::{SortOrder, Timespan},
};

/// Documented hard ceiling on results per aggregates request.
pub const MAX_LIMIT: u32 = 50_000;

/// Everything one ranged aggregates call needs.
///
/// Both date bounds are inclusive on the wire; callers working with
/// half-open windows convert before building one of these.
#[derive(Clone, Debug)]
pub struct AggsRequestParams {
    pub ticker: Ticker,

    /// How many `timespan` units one bar spans (e.g. 5 with `Minute`).
    pub multiplier: u32,

    pub timespan: Timespan,

    /// First date included in the window.
    pub from: NaiveDate,

    /// Last date included in the window.
    pub to: NaiveDate,

    pub sort: SortOrder,

    /// Result cap for this request; must not exceed [`MAX_LIMIT`].
    pub limit: u32,

    /// Whether results are adjusted for splits.
    pub adjusted: bool,
}
