//! Line formats shared by console, audit log and chat
//!
//! All three carry the same fields; only decoration differs.

use crate::types::Alert;
use chrono::{DateTime, TimeZone};
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt::Display;

/// Symbols are padded to this width in console and audit lines
const SYMBOL_WIDTH: usize = 10;

/// Alert fields rendered with fixed precision
#[derive(Debug, Clone, PartialEq)]
pub struct AlertFields {
    pub price: String,
    pub growth: String,
    pub sentiment: String,
    pub padding: String,
}

impl AlertFields {
    pub fn from_alert(alert: &Alert) -> Self {
        Self {
            price: format!("{:.8}", round_half_away(alert.price, 8)),
            growth: format!("{:.2}", round_half_away(alert.growth, 2)),
            sentiment: fixed_f64(alert.sentiment, 2),
            padding: padding(&alert.symbol),
        }
    }
}

fn round_half_away(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Fixed-point rendering of a float, rounding its exact binary value half
/// away from zero
pub fn fixed_f64(value: f64, dp: u32) -> String {
    match Decimal::from_f64_retain(value) {
        Some(d) => format!("{:.*}", dp as usize, round_half_away(d, dp)),
        None => format!("{:.*}", dp as usize, value),
    }
}

pub fn timestamp<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    at.format("%a %b %d %Y %H:%M:%S GMT%z").to_string()
}

pub fn padding(symbol: &str) -> String {
    " ".repeat(SYMBOL_WIDTH.saturating_sub(symbol.chars().count()))
}

/// `[ts][ETH]         @ 0.05060000 | 1.20% | 2.00 <3`
pub fn audit_line(ts: &str, alert: &Alert) -> String {
    let f = AlertFields::from_alert(alert);
    format!(
        "[{}][{}] {} @ {} | {}% | {} <3",
        ts, alert.symbol, f.padding, f.price, f.growth, f.sentiment
    )
}

/// `[ETH] 💰 0.05060000 BTC | 1.20% | 2.00 ❤️`
pub fn chat_message(alert: &Alert) -> String {
    let f = AlertFields::from_alert(alert);
    format!(
        "[{}] 💰 {} {} | {}% | {} ❤️",
        alert.symbol, f.price, alert.quote_asset, f.growth, f.sentiment
    )
}

pub fn error_line(ts: &str, err: &dyn Display) -> String {
    format!("[{}]Error: {}", ts, err)
}

pub fn started_line(ts: &str) -> String {
    format!("[{}]Bot started...", ts)
}
