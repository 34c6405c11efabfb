//! Social text ingestion
//!
//! A [`TextSource`] pushes raw text events into an unbounded channel; the
//! [`Correlator`] drains it in arrival order and feeds the asset registry.

pub mod correlator;
pub mod twitter;

pub use correlator::Correlator;
pub use twitter::TwitterStream;

use crate::error::Result;
use crate::types::TextEvent;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Live, non-restartable text stream
#[async_trait]
pub trait TextSource: Send + Sync {
    fn name(&self) -> &str;

    /// Forward events until the stream fails or closes.
    ///
    /// Returns `Ok(())` only when the receiving side has gone away.
    async fn run(&self, tx: mpsc::UnboundedSender<TextEvent>) -> Result<()>;
}
