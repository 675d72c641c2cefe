//! Bar records at the two stages of the pipeline.
//!
//! [`RawBar`] is the wire/artifact shape with the endpoint's short field
//! codes; [`FlatBar`] is the flat, self-describing record written one per
//! line for the load phase.

use serde::{Deserialize, Serialize};

/// One OHLCV aggregate as the endpoint returns it.
///
/// `vwap` rides along in fetch artifacts and is dropped at normalization.
/// `trade_count` is nominally always present for these markets, but the
/// endpoint omits it on some historical forex bars, so it stays optional
/// here and is enforced by the normalizer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawBar {
    /// Bar timestamp, milliseconds since the Unix epoch (UTC).
    #[serde(rename = "t")]
    pub timestamp: i64,

    #[serde(rename = "o")]
    pub open: f64,

    #[serde(rename = "h")]
    pub high: f64,

    #[serde(rename = "l")]
    pub low: f64,

    #[serde(rename = "c")]
    pub close: f64,

    #[serde(rename = "v")]
    pub volume: f64,

    /// Count of trades aggregated into this bar.
    #[serde(rename = "n", default, skip_serializing_if = "Option::is_none")]
    pub trade_count: Option<u64>,

    /// Volume-weighted average price.
    #[serde(rename = "vw", default, skip_serializing_if = "Option::is_none")]
    pub vwap: Option<f64>,
}

/// One flat record of the normalized, line-delimited output.
///
/// Field order is the output order: `{p, t, v, o, c, h, l, n}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlatBar {
    /// Market-prefixed pair code, e.g. `X:BTCUSD`.
    pub p: String,
    /// Milliseconds since the Unix epoch (UTC).
    pub t: i64,
    /// Traded volume.
    pub v: f64,
    /// Open price.
    pub o: f64,
    /// Close price.
    pub c: f64,
    /// High price.
    pub h: f64,
    /// Low price.
    pub l: f64,
    /// Trade count.
    pub n: u64,
}
