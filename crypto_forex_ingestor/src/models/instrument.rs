//! Market-prefixed instrument identifiers.
//!
//! The aggregates endpoint distinguishes forex from crypto by a ticker
//! prefix (`C:` vs `X:`). [`Ticker`] makes that prefix part of the type so a
//! request can never go out without a market class.

use std::{fmt, str::FromStr};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TickerError {
    #[error("ticker must start with \"X:\" (crypto) or \"C:\" (forex), got {0:?}")]
    MissingMarketPrefix(String),

    #[error("ticker {0:?} has an empty pair code")]
    EmptyPair(String),

    #[error("unknown market: {0:?} (expected \"crypto\" or \"fx\")")]
    UnknownMarket(String),
}

/// Market class served by the aggregates endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Market {
    Crypto,
    Fx,
}

impl Market {
    /// Ticker prefix for this market.
    pub fn prefix(&self) -> &'static str {
        match self {
            Market::Crypto => "X:",
            Market::Fx => "C:",
        }
    }

    /// Single-letter form used in artifact names.
    pub fn letter(&self) -> char {
        match self {
            Market::Crypto => 'X',
            Market::Fx => 'C',
        }
    }

    /// Path segment used by the grouped-daily endpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            Market::Crypto => "crypto",
            Market::Fx => "fx",
        }
    }
}

impl FromStr for Market {
    type Err = TickerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "crypto" | "x" => Ok(Market::Crypto),
            "fx" | "forex" | "c" => Ok(Market::Fx),
            other => Err(TickerError::UnknownMarket(other.to_string())),
        }
    }
}

/// A market-prefixed currency pair, e.g. `X:BTCUSD` or `C:EURUSD`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Ticker {
    market: Market,
    pair: String,
}

impl Ticker {
    pub fn new(market: Market, pair: impl Into<String>) -> Self {
        Self {
            market,
            pair: pair.into(),
        }
    }

    pub fn crypto(pair: impl Into<String>) -> Self {
        Self::new(Market::Crypto, pair)
    }

    pub fn fx(pair: impl Into<String>) -> Self {
        Self::new(Market::Fx, pair)
    }

    /// Parse a prefixed code like `X:BTCUSD`.
    pub fn parse(code: &str) -> Result<Self, TickerError> {
        let market = if code.starts_with("X:") {
            Market::Crypto
        } else if code.starts_with("C:") {
            Market::Fx
        } else {
            return Err(TickerError::MissingMarketPrefix(code.to_string()));
        };
        let pair = &code[2..];
        if pair.is_empty() {
            return Err(TickerError::EmptyPair(code.to_string()));
        }
        Ok(Self::new(market, pair))
    }

    pub fn market(&self) -> Market {
        self.market
    }

    /// The bare pair code without the market prefix, e.g. `BTCUSD`.
    pub fn pair(&self) -> &str {
        &self.pair
    }

    /// The full prefixed code, e.g. `X:BTCUSD`.
    pub fn code(&self) -> String {
        format!("{}{}", self.market.prefix(), self.pair)
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.market.prefix(), self.pair)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_prefixed_codes() {
        let t = Ticker::parse("X:BTCUSD").unwrap();
        assert_eq!(t.market(), Market::Crypto);
        assert_eq!(t.pair(), "BTCUSD");
        assert_eq!(t.code(), "X:BTCUSD");

        let t = Ticker::parse("C:EURUSD").unwrap();
        assert_eq!(t.market(), Market::Fx);
        assert_eq!(t.to_string(), "C:EURUSD");
    }

    #[test]
    fn rejects_unprefixed_or_empty_codes() {
        assert!(matches!(
            Ticker::parse("BTCUSD"),
            Err(TickerError::MissingMarketPrefix(_))
        ));
        assert!(matches!(Ticker::parse("X:"), Err(TickerError::EmptyPair(_))));
    }

    #[test]
    fn market_from_str() {
        assert_eq!("crypto".parse::<Market>().unwrap(), Market::Crypto);
        assert_eq!("fx".parse::<Market>().unwrap(), Market::Fx);
        assert!("equity".parse::<Market>().is_err());
    }
}
