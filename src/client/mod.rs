//! Price feed clients

mod binance;

pub use binance::BinanceClient;

use crate::error::Result;
use crate::types::PriceSnapshot;
use async_trait::async_trait;

/// Source of full price snapshots
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PriceFeed: Send + Sync {
    /// Fetch the latest price of every listed pair
    async fn fetch_prices(&self) -> Result<PriceSnapshot>;
}
