//! Span partitioning that keeps every request under the endpoint's
//! 50 000-result ceiling.
//!
//! Windows sit on calendar boundaries in UTC. The width tracks expected
//! point density: minute bars get monthly windows (a 31-day month holds
//! 44 640 one-minute bars), everything coarser gets yearly windows (a leap
//! year holds 8 784 hourly bars). Unit tests below pin both worst cases.

use chrono::{Datelike, NaiveDate};

use crate::models::timespan::Timespan;

/// One half-open `[from, to)` sub-range of a requested span.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl FetchWindow {
    /// Last date the request should cover. The endpoint treats both bounds
    /// as inclusive, so adjacent windows must not share a date.
    pub fn request_end(&self) -> NaiveDate {
        self.to.pred_opt().expect("window end after epoch")
    }
}

/// Calendar width of one fetch window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowGranularity {
    Monthly,
    Yearly,
}

/// Window width for a bar unit.
pub fn granularity_for(timespan: Timespan) -> WindowGranularity {
    match timespan {
        Timespan::Minute => WindowGranularity::Monthly,
        _ => WindowGranularity::Yearly,
    }
}

/// Partition `[start, end)` into contiguous, non-overlapping windows cut on
/// calendar boundaries. The first and last windows may be partial so the
/// whole span is covered. Empty or inverted spans produce no windows.
pub fn partition(
    start: NaiveDate,
    end: NaiveDate,
    granularity: WindowGranularity,
) -> Vec<FetchWindow> {
    if start >= end {
        return Vec::new();
    }

    let mut bounds = vec![start];
    let mut cursor = next_boundary(start, granularity);
    while cursor < end {
        bounds.push(cursor);
        cursor = next_boundary(cursor, granularity);
    }
    bounds.push(end);

    bounds
        .windows(2)
        .map(|pair| FetchWindow {
            from: pair[0],
            to: pair[1],
        })
        .collect()
}

/// First calendar boundary strictly after `date`.
fn next_boundary(date: NaiveDate, granularity: WindowGranularity) -> NaiveDate {
    match granularity {
        WindowGranularity::Monthly => {
            let (year, month) = (date.year(), date.month());
            if month == 12 {
                NaiveDate::from_ymd_opt(year + 1, 1, 1)
            } else {
                NaiveDate::from_ymd_opt(year, month + 1, 1)
            }
            .expect("first of month is always valid")
        }
        WindowGranularity::Yearly => {
            NaiveDate::from_ymd_opt(date.year() + 1, 1, 1).expect("first of year is always valid")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::request_params::MAX_LIMIT;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn covers_the_span_with_contiguous_windows() {
        let windows = partition(date(2020, 11, 15), date(2021, 3, 10), WindowGranularity::Monthly);
        assert_eq!(windows.first().unwrap().from, date(2020, 11, 15));
        assert_eq!(windows.last().unwrap().to, date(2021, 3, 10));
        for pair in windows.windows(2) {
            assert_eq!(pair[0].to, pair[1].from, "windows must be contiguous");
        }
    }

    #[test]
    fn cuts_on_month_boundaries() {
        let windows = partition(date(2021, 1, 1), date(2021, 4, 1), WindowGranularity::Monthly);
        assert_eq!(
            windows,
            vec![
                FetchWindow { from: date(2021, 1, 1), to: date(2021, 2, 1) },
                FetchWindow { from: date(2021, 2, 1), to: date(2021, 3, 1) },
                FetchWindow { from: date(2021, 3, 1), to: date(2021, 4, 1) },
            ]
        );
    }

    #[test]
    fn request_ends_never_overlap_the_next_window() {
        let windows = partition(date(2021, 1, 1), date(2021, 4, 1), WindowGranularity::Monthly);
        assert_eq!(windows[0].request_end(), date(2021, 1, 31));
        assert_eq!(windows[1].request_end(), date(2021, 2, 28));
        for pair in windows.windows(2) {
            assert!(pair[0].request_end() < pair[1].from);
        }
    }

    #[test]
    fn span_inside_one_boundary_yields_one_window() {
        let windows = partition(date(2021, 6, 3), date(2021, 6, 20), WindowGranularity::Monthly);
        assert_eq!(
            windows,
            vec![FetchWindow { from: date(2021, 6, 3), to: date(2021, 6, 20) }]
        );
    }

    #[test]
    fn empty_and_inverted_spans_yield_nothing() {
        assert!(partition(date(2021, 1, 1), date(2021, 1, 1), WindowGranularity::Monthly).is_empty());
        assert!(partition(date(2021, 2, 1), date(2021, 1, 1), WindowGranularity::Yearly).is_empty());
    }

    #[test]
    fn yearly_windows_cut_on_january_first() {
        let windows = partition(date(2019, 7, 1), date(2022, 2, 1), WindowGranularity::Yearly);
        assert_eq!(
            windows.iter().map(|w| w.from).collect::<Vec<_>>(),
            vec![date(2019, 7, 1), date(2020, 1, 1), date(2021, 1, 1), date(2022, 1, 1)]
        );
    }

    #[test]
    fn minute_bars_get_monthly_windows_under_the_ceiling() {
        assert_eq!(granularity_for(Timespan::Minute), WindowGranularity::Monthly);
        // worst case: a 31-day month of one-minute bars
        let windows = partition(date(2024, 1, 1), date(2025, 1, 1), WindowGranularity::Monthly);
        for window in windows {
            let minutes = (window.to - window.from).num_days() as u32 * 24 * 60;
            assert!(minutes <= MAX_LIMIT, "{minutes} minute bars exceed the ceiling");
        }
    }

    #[test]
    fn hourly_and_coarser_bars_get_yearly_windows_under_the_ceiling() {
        assert_eq!(granularity_for(Timespan::Hour), WindowGranularity::Yearly);
        assert_eq!(granularity_for(Timespan::Day), WindowGranularity::Yearly);
        assert_eq!(granularity_for(Timespan::Year), WindowGranularity::Yearly);
        // worst case: a leap year of hourly bars
        let windows = partition(date(2024, 1, 1), date(2025, 1, 1), WindowGranularity::Yearly);
        for window in windows {
            let hours = (window.to - window.from).num_days() as u32 * 24;
            assert!(hours <= MAX_LIMIT, "{hours} hourly bars exceed the ceiling");
        }
    }
}
