//! Crypto growth watcher with social sentiment
//!
//! Polls exchange prices on a fixed interval and alerts when an asset grows
//! past a threshold, attaching the sentiment of everything said about it on
//! a live text stream since the previous poll.
//!
//! ## Architecture
//!
//! ```text
//! TextSource (Twitter) → Correlator ─┐
//!                                    ├→ AssetRegistry
//! PriceFeed (Binance) → PricePoller ─┘        ↓
//!                                          Notifier → Console / AuditLog / Telegram
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod ingester;
pub mod notify;
pub mod poller;
pub mod registry;
pub mod sentiment;
pub mod supervisor;
pub mod types;

#[cfg(test)]
mod types_tests;
