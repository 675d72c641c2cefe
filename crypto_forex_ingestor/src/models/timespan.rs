//! Bar interval units and sort orders accepted by the aggregates endpoint.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("invalid timespan unit: {0:?}")]
pub struct ParseTimespanError(pub String);

/// The time unit one bar spans, spelled the way the endpoint spells them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timespan {
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl Timespan {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timespan::Minute => "minute",
            Timespan::Hour => "hour",
            Timespan::Day => "day",
            Timespan::Week => "week",
            Timespan::Month => "month",
            Timespan::Quarter => "quarter",
            Timespan::Year => "year",
        }
    }
}

impl fmt::Display for Timespan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timespan {
    type Err = ParseTimespanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "m" | "min" | "minute" => Ok(Timespan::Minute),
            "h" | "hr" | "hour" => Ok(Timespan::Hour),
            "d" | "day" => Ok(Timespan::Day),
            "w" | "wk" | "week" => Ok(Timespan::Week),
            "mo" | "month" => Ok(Timespan::Month),
            "q" | "quarter" => Ok(Timespan::Quarter),
            "y" | "yr" | "year" => Ok(Timespan::Year),
            other => Err(ParseTimespanError(other.to_string())),
        }
    }
}

/// Sort order for bars within one response.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Oldest bars first.
    #[default]
    Asc,
    /// Newest bars first.
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_and_short_unit_names() {
        assert_eq!("minute".parse::<Timespan>().unwrap(), Timespan::Minute);
        assert_eq!("m".parse::<Timespan>().unwrap(), Timespan::Minute);
        assert_eq!("hr".parse::<Timespan>().unwrap(), Timespan::Hour);
        assert_eq!("quarter".parse::<Timespan>().unwrap(), Timespan::Quarter);
        assert_eq!("Y".parse::<Timespan>().unwrap(), Timespan::Year);
    }

    #[test]
    fn rejects_unknown_units() {
        assert!("fortnight".parse::<Timespan>().is_err());
        assert!("".parse::<Timespan>().is_err());
    }

    #[test]
    fn display_matches_endpoint_spelling() {
        assert_eq!(Timespan::Minute.to_string(), "minute");
        assert_eq!(Timespan::Year.to_string(), "year");
        assert_eq!(SortOrder::Asc.as_str(), "asc");
        assert_eq!(SortOrder::Desc.as_str(), "desc");
    }
}
