use serde::Deserialize;

use crate::models::bar::RawBar;

/// Body of one ranged aggregates response.
///
/// `results` is absent entirely when a window has no data, so it defaults
/// to empty rather than failing deserialization.
#[derive(Debug, Deserialize)]
pub struct AggsResponse {
    pub status: String,

    #[serde(rename = "resultsCount")]
    pub results_count: u64,

    #[serde(default)]
    pub results: Vec<RawBar>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_documented_response_body() {
        let json = r#"{
            "ticker": "X:BTCUSD",
            "status": "OK",
            "queryCount": 2,
            "resultsCount": 2,
            "adjusted": true,
            "results": [
                {"v": 303067.65, "vw": 9874.55, "o": 9557.9, "c": 10094.75,
                 "h": 10429.26, "l": 9490, "t": 1590984000000, "n": 1},
                {"v": 260.55, "vw": 9953.85, "o": 10094.75, "c": 9910.21,
                 "h": 10143.0, "l": 9870.0, "t": 1591070400000, "n": 2}
            ],
            "request_id": "0cf72b6da685bcd386548ffe2895904a"
        }"#;
        let body: AggsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(body.status, "OK");
        assert_eq!(body.results_count, 2);
        assert_eq!(body.results.len(), 2);
        assert_eq!(body.results[0].timestamp, 1_590_984_000_000);
    }

    #[test]
    fn empty_window_omits_results_array() {
        let json = r#"{"ticker":"C:EURUSD","status":"OK","queryCount":0,"resultsCount":0}"#;
        let body: AggsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(body.results_count, 0);
        assert!(body.results.is_empty());
    }
}
