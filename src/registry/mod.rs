//! Asset registry
//!
//! The closed set of tracked assets, built once from the startup snapshot
//! and shared by the poller and the correlator. Every read-modify-write runs
//! as one critical section on a single mutex; the lock is never held across
//! an `.await`.


use crate::error::{BotError, Result};
use crate::sentiment::SentimentScorer;
use crate::types::{parse_price, AssetEntry, PriceSnapshot};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use std::sync::Arc;

/// Price and sentiment read out of one entry when a poll settles
#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    pub symbol: String,
    pub previous_price: Decimal,
    pub price: Decimal,
    pub sentiment: f64,
}

#[derive(Clone)]
pub struct AssetRegistry {
    entries: Arc<Mutex<Vec<AssetEntry>>>,
    quote_asset: String,
    watchlist: String,
}

impl AssetRegistry {
    /// Build the registry from the first snapshot.
    ///
    /// Keys ending in `quote_asset` are tracked under the stripped symbol;
    /// everything else is ignored.
    pub fn build(snapshot: &PriceSnapshot, quote_asset: &str) -> Result<Self> {
        if snapshot.is_empty() {
            return Err(BotError::MalformedSnapshot("snapshot is empty".into()));
        }

        let mut entries: Vec<AssetEntry> = Vec::new();
        for (ticker, raw_price) in snapshot {
            let Some(symbol) = ticker.strip_suffix(quote_asset) else {
                continue;
            };
            if symbol.is_empty() {
                continue;
            }

            let price = parse_price(raw_price).ok_or_else(|| {
                BotError::MalformedSnapshot(format!("{} has unusable price {:?}", ticker, raw_price))
            })?;

            entries.push(AssetEntry::new(symbol, ticker.as_str(), price));
        }

        if entries.is_empty() {
            return Err(BotError::MalformedSnapshot(format!(
                "no pairs quoted in {}",
                quote_asset
            )));
        }

        let watchlist = build_watchlist(quote_asset, &entries);

        tracing::info!(
            "Registry built: {} assets quoted in {}",
            entries.len(),
            quote_asset
        );

        Ok(Self {
            entries: Arc::new(Mutex::new(entries)),
            quote_asset: quote_asset.to_string(),
            watchlist,
        })
    }

    /// Comma-joined symbols for the stream subscription filter
    pub fn watchlist(&self) -> &str {
        &self.watchlist
    }

    pub fn quote_asset(&self) -> &str {
        &self.quote_asset
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn symbols(&self) -> Vec<String> {
        self.entries.lock().iter().map(|e| e.symbol.clone()).collect()
    }

    /// Copy of the current entries
    pub fn entries(&self) -> Vec<AssetEntry> {
        self.entries.lock().clone()
    }

    pub fn get(&self, symbol: &str) -> Option<AssetEntry> {
        self.entries.lock().iter().find(|e| e.symbol == symbol).cloned()
    }

    /// Fold a text's score into every entry whose symbol it mentions.
    ///
    /// Matching is plain substring containment on the lower-cased text, so
    /// `eth` also matches inside `method`. The score is computed at most once
    /// per text. Returns the symbols that were updated.
    pub fn apply_text(&self, text: &str, scorer: &dyn SentimentScorer) -> Vec<String> {
        let lowered = text.to_lowercase();
        let mut score: Option<f64> = None;
        let mut matched = Vec::new();

        let mut entries = self.entries.lock();
        for entry in entries.iter_mut() {
            if !lowered.contains(&entry.symbol.to_lowercase()) {
                continue;
            }
            let s = *score.get_or_insert_with(|| scorer.score(text));
            entry.absorb(s);
            matched.push(entry.symbol.clone());
        }

        matched
    }

    /// Read every entry against a new snapshot and reset it.
    ///
    /// All-or-nothing: if any tracked ticker is missing (`MissingTicker`) or
    /// carries an unusable price (`Fetch`) the registry is left untouched. Otherwise
    /// each entry takes the new price and its sentiment goes back to zero.
    pub fn settle(&self, snapshot: &PriceSnapshot) -> Result<Vec<Settlement>> {
        let mut entries = self.entries.lock();

        let mut prices = Vec::with_capacity(entries.len());
        for entry in entries.iter() {
            let raw = snapshot
                .get(&entry.quote_ticker)
                .ok_or_else(|| BotError::MissingTicker(entry.quote_ticker.clone()))?;
            let price = parse_price(raw).ok_or_else(|| {
                BotError::Fetch(format!("{} has unusable price {:?}", entry.quote_ticker, raw))
            })?;
            prices.push(price);
        }

        let settlements = entries
            .iter_mut()
            .zip(prices)
            .map(|(entry, price)| {
                let settlement = Settlement {
                    symbol: entry.symbol.clone(),
                    previous_price: entry.last_price,
                    price,
                    sentiment: entry.sentiment,
                };
                entry.last_price = price;
                entry.sentiment = 0.0;
                settlement
            })
            .collect();

        Ok(settlements)
    }
}

/// Quote asset first, then each tracked symbol once
fn build_watchlist(quote_asset: &str, entries: &[AssetEntry]) -> String {
    let mut symbols: Vec<&str> = vec![quote_asset];
    for entry in entries {
        if !symbols.contains(&entry.symbol.as_str()) {
            symbols.push(&entry.symbol);
        }
    }
    symbols.join(",")
}
