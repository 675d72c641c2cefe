use snafu::ensure;

use crate::models::request_params::{AggsRequestParams, MAX_LIMIT};
use crate::providers::{ProviderError, ValidationSnafu};

/// Path segment for one ranged aggregates request.
pub(crate) fn aggs_path(params: &AggsRequestParams) -> String {
    format!(
        "/v2/aggs/ticker/{}/range/{}/{}/{}/{}",
        params.ticker.code(),
        params.multiplier,
        params.timespan,
        params.from,
        params.to
    )
}

/// Query parameters shared by every ranged aggregates request.
pub(crate) fn query(params: &AggsRequestParams) -> Vec<(String, String)> {
    vec![
        ("adjusted".to_string(), params.adjusted.to_string()),
        ("sort".to_string(), params.sort.as_str().to_string()),
        ("limit".to_string(), params.limit.to_string()),
    ]
}

pub(crate) fn validate(params: &AggsRequestParams) -> Result<(), ProviderError> {
    ensure!(
        params.limit <= MAX_LIMIT,
        ValidationSnafu {
            message: format!(
                "limit {} exceeds the endpoint maximum {MAX_LIMIT}",
                params.limit
            ),
        }
    );
    ensure!(
        params.multiplier >= 1,
        ValidationSnafu {
            message: "multiplier must be a positive integer",
        }
    );
    ensure!(
        params.from <= params.to,
        ValidationSnafu {
            message: format!("window start {} is after end {}", params.from, params.to),
        }
    );
    Ok(())
}
