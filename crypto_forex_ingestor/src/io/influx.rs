//! InfluxDB sink speaking the v1 HTTP API.
//!
//! Points go out as line protocol with millisecond precision: measurement
//! [`MEASUREMENT`], a `pair` tag for filtering, and the numeric bar fields
//! as the payload.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use snafu::ResultExt;

use crate::io::sink::{MissingDatabaseSnafu, PointSink, SinkError, TransportSnafu, WriteSnafu};
use crate::models::bar::FlatBar;

/// Measurement every point is written under.
pub const MEASUREMENT: &str = "crypto_forex";

/// Connection settings for one InfluxDB host.
#[derive(Clone, Debug)]
pub struct InfluxConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: Option<String>,
    pub password: Option<SecretString>,
}

pub struct InfluxSink {
    client: Client,
    base_url: String,
    config: InfluxConfig,
}

impl InfluxSink {
    pub fn new(config: InfluxConfig) -> Self {
        let base_url = format!("http://{}:{}", config.host, config.port);
        Self {
            client: Client::new(),
            base_url,
            config,
        }
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match (&self.config.username, &self.config.password) {
            (Some(user), Some(pass)) => request.basic_auth(user, Some(pass.expose_secret())),
            (Some(user), None) => request.basic_auth(user, None::<&str>),
            _ => request,
        }
    }
}

#[async_trait]
impl PointSink for InfluxSink {
    async fn ensure_target(&self) -> Result<(), SinkError> {
        let response = self
            .authorized(
                self.client
                    .get(format!("{}/query", self.base_url))
                    .query(&[("q", "SHOW DATABASES")]),
            )
            .send()
            .await
            .context(TransportSnafu)?;

        if !response.status().is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown store error".to_string());
            return WriteSnafu { message }.fail();
        }

        let body: Value = response.json().await.context(TransportSnafu)?;
        if database_names(&body)
            .iter()
            .any(|name| name == &self.config.database)
        {
            Ok(())
        } else {
            MissingDatabaseSnafu {
                database: self.config.database.clone(),
            }
            .fail()
        }
    }

    async fn write_batch(&self, records: &[FlatBar]) -> Result<(), SinkError> {
        let mut body = String::with_capacity(records.len() * 96);
        for record in records {
            body.push_str(&line(record));
            body.push('\n');
        }

        let response = self
            .authorized(
                self.client
                    .post(format!("{}/write", self.base_url))
                    .query(&[
                        ("db", self.config.database.as_str()),
                        ("precision", "ms"),
                    ])
                    .body(body),
            )
            .send()
            .await
            .context(TransportSnafu)?;

        if !response.status().is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown store error".to_string());
            return WriteSnafu { message }.fail();
        }
        Ok(())
    }
}

/// `SHOW DATABASES` answers
/// `{"results":[{"series":[{"values":[["_internal"],["crypto_forex"],...]}]}]}`.
fn database_names(body: &Value) -> Vec<String> {
    body.pointer("/results/0/series/0/values")
        .and_then(Value::as_array)
        .map(|rows| {
            rows.iter()
                .filter_map(|row| row.get(0).and_then(Value::as_str).map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// One record in line protocol with a millisecond timestamp. The trade
/// count goes out as a float like every other numeric field.
fn line(record: &FlatBar) -> String {
    format!(
        "{},pair={} p=\"{}\",v={},o={},c={},h={},l={},n={} {}",
        MEASUREMENT,
        escape_tag(&record.p),
        escape_field(&record.p),
        record.v,
        record.o,
        record.c,
        record.h,
        record.l,
        record.n as f64,
        record.t
    )
}

/// Escape the characters line protocol treats specially in tag values.
fn escape_tag(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace(',', "\\,")
        .replace(' ', "\\ ")
        .replace('=', "\\=")
}

/// Escape the characters line protocol treats specially in string field
/// values.
fn escape_field(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn formats_line_protocol_with_millisecond_timestamp() {
        let record = FlatBar {
            p: "X:BTCUSD".to_string(),
            t: 1_590_984_000_000,
            v: 303067.65,
            o: 9557.9,
            c: 10094.75,
            h: 10429.26,
            l: 9490.0,
            n: 42,
        };
        assert_eq!(
            line(&record),
            "crypto_forex,pair=X:BTCUSD p=\"X:BTCUSD\",v=303067.65,o=9557.9,c=10094.75,h=10429.26,l=9490,n=42 1590984000000"
        );
    }

    #[test]
    fn escapes_tag_metacharacters() {
        assert_eq!(escape_tag("a b,c=d"), "a\\ b\\,c\\=d");
        assert_eq!(escape_tag("X:BTCUSD"), "X:BTCUSD");
    }

    #[test]
    fn escapes_quotes_and_backslashes_in_the_pair_field() {
        let record = FlatBar {
            p: "X:A\"B\\C".to_string(),
            t: 0,
            v: 1.0,
            o: 1.0,
            c: 1.0,
            h: 1.0,
            l: 1.0,
            n: 1,
        };
        let line = line(&record);
        assert!(line.contains("p=\"X:A\\\"B\\\\C\""));
    }

    #[test]
    fn extracts_database_names_from_show_databases() {
        let body = json!({
            "results": [{
                "statement_id": 0,
                "series": [{
                    "name": "databases",
                    "columns": ["name"],
                    "values": [["_internal"], ["crypto_forex"]]
                }]
            }]
        });
        assert_eq!(database_names(&body), ["_internal", "crypto_forex"]);
    }

    #[test]
    fn missing_series_yields_no_names() {
        assert!(database_names(&json!({"results": []})).is_empty());
    }
}
