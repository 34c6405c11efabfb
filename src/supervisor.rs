//! Task supervision
//!
//! Builds the registry from a startup snapshot, then runs the text source,
//! the correlator and the price poller side by side. The first task to end
//! decides the outcome: it is recorded through the notifier and returned.

use crate::client::{BinanceClient, PriceFeed};
use crate::config::{Config, WatcherConfig};
use crate::error::{BotError, Result};
use crate::ingester::{Correlator, TextSource, TwitterStream};
use crate::notify::{AuditLog, ChatChannel, Console, Notifier, TelegramChannel};
use crate::poller::{PollerSettings, PricePoller};
use crate::registry::AssetRegistry;
use crate::sentiment::{LexiconScorer, SentimentScorer};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinError;
use tracing::{info, warn};

pub struct Supervisor {
    feed: Arc<dyn PriceFeed>,
    scorer: Arc<dyn SentimentScorer>,
    notifier: Notifier,
    quote_asset: String,
    settings: PollerSettings,
}

impl Supervisor {
    pub fn new(
        feed: Arc<dyn PriceFeed>,
        scorer: Arc<dyn SentimentScorer>,
        notifier: Notifier,
        watcher: &WatcherConfig,
    ) -> Self {
        Self {
            feed,
            scorer,
            notifier,
            quote_asset: watcher.quote_asset.clone(),
            settings: PollerSettings::from(watcher),
        }
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Fetch the startup snapshot and build the registry from it
    pub async fn start(&self) -> Result<AssetRegistry> {
        let result = self.bootstrap().await;
        if let Err(e) = &result {
            self.notifier.record_error(e).await;
        }
        result
    }

    async fn bootstrap(&self) -> Result<AssetRegistry> {
        let snapshot = self.feed.fetch_prices().await?;
        let registry = AssetRegistry::build(&snapshot, &self.quote_asset)?;
        self.notifier.started(registry.watchlist()).await?;
        Ok(registry)
    }

    /// Run until a task fails or Ctrl-C arrives
    pub async fn watch(&self, registry: AssetRegistry, source: Arc<dyn TextSource>) -> Result<()> {
        self.watch_until(registry, source, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Unable to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Run the three tasks until one of them ends or `shutdown` resolves.
    ///
    /// A shutdown is a clean exit. Anything else is an error, recorded once.
    pub async fn watch_until<F>(
        &self,
        registry: AssetRegistry,
        source: Arc<dyn TextSource>,
        shutdown: F,
    ) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let source_name = source.name().to_string();

        let mut source_task = tokio::spawn(async move { source.run(tx).await });

        let correlator = Correlator::new(registry.clone(), self.scorer.clone());
        let mut correlator_task = tokio::spawn(async move { correlator.run(rx).await });

        let poller = PricePoller::new(
            self.feed.clone(),
            registry,
            self.notifier.clone(),
            self.settings.clone(),
        );
        let mut poller_task = tokio::spawn(async move { poller.run().await });

        info!("Watching with {} text source", source_name);

        // source first: its failure also closes the correlator's channel
        let outcome = tokio::select! {
            biased;
            res = &mut source_task => match joined(&source_name, res) {
                Ok(()) => Err(BotError::Stream(format!("{} source stopped", source_name))),
                Err(e) => Err(e),
            },
            res = &mut correlator_task => joined("correlator", res),
            res = &mut poller_task => joined("poller", res),
            () = shutdown => {
                info!("Shutdown requested");
                Ok(())
            }
        };

        source_task.abort();
        correlator_task.abort();
        poller_task.abort();

        if let Err(e) = &outcome {
            self.notifier.record_error(e).await;
        }
        outcome
    }
}

fn joined(task: &str, res: std::result::Result<Result<()>, JoinError>) -> Result<()> {
    res.map_err(|e| BotError::Task(format!("{}: {}", task, e)))?
}

/// Build the notifier described by `config`
pub fn build_notifier(config: &Config) -> Notifier {
    let chat = config.telegram.as_ref().map(|tg| {
        info!("Telegram notifications enabled for chat {}", tg.chat_id);
        Arc::new(TelegramChannel::new(tg)) as Arc<dyn ChatChannel>
    });
    if chat.is_none() {
        warn!("Telegram not configured, chat notifications disabled");
    }

    Notifier::new(
        AuditLog::new(config.watcher.expanded_log_path()),
        Console::default(),
        chat,
    )
}

/// Wire up the live Binance, Twitter and Telegram components and run
pub async fn run(config: Config) -> Result<()> {
    let notifier = build_notifier(&config);

    let feed: Arc<dyn PriceFeed> = match BinanceClient::new(&config.binance) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            notifier.record_error(&e).await;
            return Err(e);
        }
    };

    let supervisor = Supervisor::new(
        feed,
        Arc::new(LexiconScorer::new()),
        notifier,
        &config.watcher,
    );
    let registry = supervisor.start().await?;

    let source: Arc<dyn TextSource> =
        match TwitterStream::new(&config.twitter, registry.watchlist()) {
            Ok(stream) => Arc::new(stream),
            Err(e) => {
                supervisor.notifier().record_error(&e).await;
                return Err(e);
            }
        };

    supervisor.watch(registry, source).await
}
