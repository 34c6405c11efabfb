//! Sentiment scoring for social text
//!
//! Any scorer that maps text to a polarity number can drive the correlator.
//! The default [`LexiconScorer`] sums AFINN-style word valences.

mod lexicon;

pub use lexicon::{LexiconScorer, SentimentAnalysis};

/// Pure text -> polarity mapping.
///
/// Must be deterministic and infallible; text with nothing to score
/// yields `0.0`.
pub trait SentimentScorer: Send + Sync {
    fn score(&self, text: &str) -> f64;

    /// Scorer name for logging
    fn name(&self) -> &str {
        "custom"
    }
}
