use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use snafu::ResultExt;

use crate::models::{instrument::Market, request_params::AggsRequestParams};
use crate::providers::polygon_rest::{params, response::AggsResponse};
use crate::providers::{
    AggsProvider, ApiSnafu, ClientBuildSnafu, MissingEnvVarSnafu, ProviderError,
    ProviderInitError, ReqwestSnafu, WindowData,
};
use crate::utils::env::get_env_var;

const BASE_URL: &str = "https://api.polygon.io";

pub struct PolygonProvider {
    client: Client,
    api_key: SecretString,
    base_url: String,
}

impl PolygonProvider {
    /// Creates a new Polygon provider.
    ///
    /// Reads the API key from the `POLYGON_API_KEY` environment variable.
    pub fn new() -> Result<Self, ProviderInitError> {
        let api_key = SecretString::new(
            get_env_var("POLYGON_API_KEY")
                .context(MissingEnvVarSnafu)?
                .into(),
        );
        let client = Client::builder().build().context(ClientBuildSnafu)?;

        Ok(Self {
            client,
            api_key,
            base_url: BASE_URL.to_string(),
        })
    }

    /// Point the provider at a different host (tests, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Whole-market daily OHLC snapshot for `market` on `date`.
    ///
    /// The body is kept as raw JSON; grouped snapshots are persisted
    /// untouched rather than normalized.
    pub async fn fetch_grouped_daily(
        &self,
        market: Market,
        date: NaiveDate,
        adjusted: bool,
    ) -> Result<serde_json::Value, ProviderError> {
        let url = format!(
            "{}/v2/aggs/grouped/locale/global/market/{}/{}",
            self.base_url,
            market.as_str(),
            date
        );
        let response = self
            .client
            .get(&url)
            .query(&[
                ("adjusted", adjusted.to_string().as_str()),
                ("apiKey", self.api_key.expose_secret()),
            ])
            .send()
            .await
            .context(ReqwestSnafu)?;

        if !response.status().is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown API error".to_string());
            return ApiSnafu { message }.fail();
        }

        let body: serde_json::Value = response.json().await.context(ReqwestSnafu)?;
        let status = body.get("status").and_then(|s| s.as_str()).unwrap_or("");
        if status != "OK" {
            return ApiSnafu {
                message: format!(
                    "grouped daily returned status {status:?} for {} on {date}",
                    market.as_str()
                ),
            }
            .fail();
        }
        Ok(body)
    }
}

#[async_trait]
impl AggsProvider for PolygonProvider {
    async fn fetch_window(&self, request: &AggsRequestParams) -> Result<WindowData, ProviderError> {
        params::validate(request)?;

        let url = format!("{}{}", self.base_url, params::aggs_path(request));
        let mut query = params::query(request);
        query.push((
            "apiKey".to_string(),
            self.api_key.expose_secret().to_string(),
        ));

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .context(ReqwestSnafu)?;

        if !response.status().is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown API error".to_string());
            return ApiSnafu { message }.fail();
        }

        let body = response.json::<AggsResponse>().await.context(ReqwestSnafu)?;

        // A non-OK body status is fatal for this window; empty data is the
        // caller's concern, a bad status is not.
        if body.status != "OK" {
            return ApiSnafu {
                message: format!(
                    "endpoint returned status {:?} for {} from {} to {}",
                    body.status, request.ticker, request.from, request.to
                ),
            }
            .fail();
        }

        Ok(WindowData {
            results: body.results,
            results_count: body.results_count,
        })
    }
}
