//! Price poller
//!
//! Fetch a full snapshot, settle every tracked asset against it, alert on
//! growth above the threshold, sleep, repeat.

#[cfg(test)]
mod tests;

use crate::client::PriceFeed;
use crate::config::{FailurePolicy, WatcherConfig};
use crate::error::Result;
use crate::notify::Notifier;
use crate::registry::{AssetRegistry, Settlement};
use crate::types::{Alert, PriceSnapshot};
use rust_decimal::{Decimal, RoundingStrategy};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Percent change from `previous` to `price`, rounded to 2 dp.
///
/// Growth beyond what a `Decimal` can hold saturates at `Decimal::MAX`.
pub fn growth_pct(previous: Decimal, price: Decimal) -> Decimal {
    price
        .checked_div(previous)
        .and_then(|ratio| (ratio - Decimal::ONE).checked_mul(Decimal::ONE_HUNDRED))
        .map(|g| g.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
        .unwrap_or(Decimal::MAX)
}

#[derive(Debug, Clone)]
pub struct PollerSettings {
    pub interval: Duration,
    pub initial_delay: Duration,
    /// Alert when growth is strictly greater than this percentage
    pub threshold: Decimal,
    pub failure_policy: FailurePolicy,
}

impl Default for PollerSettings {
    fn default() -> Self {
        Self::from(&WatcherConfig::default())
    }
}

impl From<&WatcherConfig> for PollerSettings {
    fn from(config: &WatcherConfig) -> Self {
        Self {
            interval: Duration::from_millis(config.poll_interval_ms),
            initial_delay: Duration::from_millis(config.initial_delay_ms),
            threshold: config.growth_threshold_pct,
            failure_policy: config.failure_policy,
        }
    }
}

pub struct PricePoller {
    feed: Arc<dyn PriceFeed>,
    registry: AssetRegistry,
    notifier: Notifier,
    settings: PollerSettings,
}

impl PricePoller {
    pub fn new(
        feed: Arc<dyn PriceFeed>,
        registry: AssetRegistry,
        notifier: Notifier,
        settings: PollerSettings,
    ) -> Self {
        Self {
            feed,
            registry,
            notifier,
            settings,
        }
    }

    /// Poll until an error the failure policy treats as fatal
    pub async fn run(&self) -> Result<()> {
        info!(
            "Price poller starting: {} assets, every {:?}, threshold {}%",
            self.registry.len(),
            self.settings.interval,
            self.settings.threshold
        );

        tokio::time::sleep(self.settings.initial_delay).await;

        loop {
            match self.poll_once().await {
                Ok(alerts) => {
                    debug!("Poll cycle complete, {} alerts", alerts.len());
                }
                Err(e)
                    if self.settings.failure_policy == FailurePolicy::SkipFailedCycle
                        && e.is_cycle_error() =>
                {
                    warn!("Poll cycle failed, waiting for the next one: {}", e);
                    self.notifier.record_error(&e).await;
                }
                Err(e) => return Err(e),
            }

            tokio::time::sleep(self.settings.interval).await;
        }
    }

    /// One Fetching -> Evaluating pass, then hand alerts to the notifier
    pub async fn poll_once(&self) -> Result<Vec<Alert>> {
        let snapshot = self.feed.fetch_prices().await?;
        let alerts = self.evaluate(&snapshot)?;

        for alert in &alerts {
            self.notifier.notify(alert).await?;
        }

        Ok(alerts)
    }

    /// Settle the registry against `snapshot` and pick out the alerts.
    ///
    /// Every entry takes the new price and a zero sentiment whether or not
    /// it alerts.
    pub fn evaluate(&self, snapshot: &PriceSnapshot) -> Result<Vec<Alert>> {
        let settlements = self.registry.settle(snapshot)?;

        Ok(settlements
            .into_iter()
            .filter_map(|s| self.check(s))
            .collect())
    }

    fn check(&self, settlement: Settlement) -> Option<Alert> {
        let growth = growth_pct(settlement.previous_price, settlement.price);

        if growth <= self.settings.threshold {
            return None;
        }

        debug!(
            "{} up {}% ({} -> {}), sentiment {:.2}",
            settlement.symbol,
            growth,
            settlement.previous_price,
            settlement.price,
            settlement.sentiment
        );

        Some(Alert {
            symbol: settlement.symbol,
            quote_asset: self.registry.quote_asset().to_string(),
            price: settlement.price,
            growth,
            sentiment: settlement.sentiment,
        })
    }
}
