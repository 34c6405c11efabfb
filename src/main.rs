//! Sentiment watch
//!
//! Watches Binance prices against a quote asset and reports growth spikes
//! together with live Twitter sentiment.

use sentiment_watch::{config::Config, supervisor};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::load()?;

    tracing::info!(
        "Starting sentiment watch: quote {}, threshold {}%, every {}ms",
        config.watcher.quote_asset,
        config.watcher.growth_threshold_pct,
        config.watcher.poll_interval_ms
    );

    supervisor::run(config).await?;

    tracing::info!("Stopped");
    Ok(())
}
