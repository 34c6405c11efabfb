//! Binance spot ticker client

use super::PriceFeed;
use crate::config::BinanceConfig;
use crate::error::{BotError, Result};
use crate::types::PriceSnapshot;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const API_KEY_HEADER: &str = "X-MBX-APIKEY";

#[derive(Debug, Deserialize)]
struct TickerPrice {
    symbol: String,
    price: String,
}

/// Fetches `/api/v3/ticker/price` for every pair
#[derive(Clone)]
pub struct BinanceClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl BinanceClient {
    pub fn new(config: &BinanceConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
        })
    }

    fn into_snapshot(tickers: Vec<TickerPrice>) -> PriceSnapshot {
        tickers.into_iter().map(|t| (t.symbol, t.price)).collect()
    }
}

#[async_trait]
impl PriceFeed for BinanceClient {
    async fn fetch_prices(&self) -> Result<PriceSnapshot> {
        let url = format!("{}/api/v3/ticker/price", self.base_url);

        let mut req = self.http.get(&url);
        if let Some(key) = &self.api_key {
            req = req.header(API_KEY_HEADER, key);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| BotError::Fetch(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(BotError::Fetch(format!("{} returned {}: {}", url, status, body)));
        }

        let tickers: Vec<TickerPrice> = resp
            .json()
            .await
            .map_err(|e| BotError::Fetch(format!("bad ticker payload: {}", e)))?;

        debug!("Fetched {} tickers", tickers.len());

        Ok(Self::into_snapshot(tickers))
    }
}
