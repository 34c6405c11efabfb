//! Core types shared by the poller, correlator and notifier

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Full price snapshot: pair ticker -> price string as sent by the feed
pub type PriceSnapshot = BTreeMap<String, String>;

/// One tracked asset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetEntry {
    /// Base asset, e.g. `ETH`
    pub symbol: String,
    /// Pair used to query the feed, e.g. `ETHBTC`
    pub quote_ticker: String,
    pub last_price: Decimal,
    /// Running sentiment, reset every poll cycle
    pub sentiment: f64,
}

impl AssetEntry {
    pub fn new(symbol: impl Into<String>, quote_ticker: impl Into<String>, price: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            quote_ticker: quote_ticker.into(),
            last_price: price,
            sentiment: 0.0,
        }
    }

    /// Fold one score into the accumulator with a 0.5 decay.
    ///
    /// This is not a running mean: two scores `a` then `b` give
    /// `((s0 + a) / 2 + b) / 2`.
    pub fn absorb(&mut self, score: f64) {
        self.sentiment = (self.sentiment + score) / 2.0;
    }
}

/// Parse a feed price, accepting only finite positive values
pub fn parse_price(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    let price = Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()?;
    (price > Decimal::ZERO).then_some(price)
}

/// Growth alert for one asset in one poll cycle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub symbol: String,
    pub quote_asset: String,
    pub price: Decimal,
    /// Percent, rounded to 2 dp
    pub growth: Decimal,
    pub sentiment: f64,
}

/// One item from the social text stream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextEvent {
    pub id: Option<String>,
    pub text: String,
    pub received_at: DateTime<Utc>,
}

impl TextEvent {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: None,
            text: text.into(),
            received_at: Utc::now(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}
