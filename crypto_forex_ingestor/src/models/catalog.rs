//! The instrument catalog: which pairs a fleet run acquires.
//!
//! The catalog is configuration data handed to the fleet runner, not a
//! module constant, so tests and operators can substitute their own lists.
//! `Default` reproduces the project's standard catalog; a TOML file with the
//! same shape overrides it.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::instrument::Ticker;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file")]
    Io(#[from] std::io::Error),

    #[error("failed to parse catalog file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Instruments for one acquisition run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InstrumentCatalog {
    /// Currency every FX code is paired against.
    pub base_currency: String,

    /// Crypto pair codes, already joined (e.g. `BTCUSD`).
    pub crypto: Vec<String>,

    /// FX currency codes grouped by region; regions keep their file order.
    pub fx: IndexMap<String, Vec<String>>,
}

impl InstrumentCatalog {
    /// Load a catalog from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Crypto instruments as market-prefixed tickers.
    pub fn crypto_tickers(&self) -> impl Iterator<Item = Ticker> + '_ {
        self.crypto.iter().map(|pair| Ticker::crypto(pair.clone()))
    }

    /// FX currency codes flattened in region order.
    pub fn fx_codes(&self) -> impl Iterator<Item = &str> {
        self.fx.values().flatten().map(String::as_str)
    }

    /// Ordered candidate identifiers for one FX code: `CODE+BASE` first,
    /// then the reversed `BASE+CODE`. The source may only carry one of the
    /// two orderings for a given pair.
    pub fn fx_candidates(&self, code: &str) -> [Ticker; 2] {
        [
            Ticker::fx(format!("{code}{}", self.base_currency)),
            Ticker::fx(format!("{}{code}", self.base_currency)),
        ]
    }
}

impl Default for InstrumentCatalog {
    fn default() -> Self {
        let crypto = [
            "BTCUSD", "ETHUSD", "USDTUSD", "BNBUSD", "ADAUSD", "XRPUSD",
            "LTCUSD", "LINKUSD", "USDCUSD", "BCHUSD", "XLMUSD", "DOGEUSD",
        ]
        .map(String::from)
        .to_vec();

        let mut fx = IndexMap::new();
        let mut region = |name: &str, codes: &[&str]| {
            fx.insert(
                name.to_string(),
                codes.iter().map(|c| c.to_string()).collect::<Vec<_>>(),
            );
        };
        region("north_america", &["CAD", "MXN"]);
        region("south_america", &["BRL", "ARS", "BOB", "CLP", "COP"]);
        region("worldwide", &["EUR", "AUD", "NZD"]);
        region("europe", &["GBP", "SEK", "CHF", "HUF", "RUB"]);
        region("asia", &["JPY", "CNY", "HKD", "KRW", "INR"]);
        region("africa", &["ZAR", "LYD", "TND", "MAD", "GHS"]);

        Self {
            base_currency: "USD".to_string(),
            crypto,
            fx,
        }
    }
}
