//! Text-stream correlator

use crate::error::{BotError, Result};
use crate::registry::AssetRegistry;
use crate::sentiment::SentimentScorer;
use crate::types::TextEvent;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

/// Folds the sentiment of incoming text into the registry
pub struct Correlator {
    registry: AssetRegistry,
    scorer: Arc<dyn SentimentScorer>,
}

impl Correlator {
    pub fn new(registry: AssetRegistry, scorer: Arc<dyn SentimentScorer>) -> Self {
        Self { registry, scorer }
    }

    /// Apply one event; returns the symbols it touched
    pub fn handle(&self, event: &TextEvent) -> Vec<String> {
        if event.text.trim().is_empty() {
            return Vec::new();
        }

        let matched = self.registry.apply_text(&event.text, self.scorer.as_ref());
        if !matched.is_empty() {
            debug!(
                "Text {} matched {}",
                event.id.as_deref().unwrap_or("-"),
                matched.join(",")
            );
        }
        matched
    }

    /// Drain events in arrival order until every sender is gone.
    ///
    /// The source is not restartable, so a closed channel is a stream error.
    pub async fn run(&self, mut rx: mpsc::UnboundedReceiver<TextEvent>) -> Result<()> {
        let mut processed: u64 = 0;

        while let Some(event) = rx.recv().await {
            self.handle(&event);
            processed += 1;
        }

        Err(BotError::Stream(format!(
            "text stream closed after {} events",
            processed
        )))
    }
}
