//! Operator console mirror

use super::format::AlertFields;
use crate::types::Alert;
use crossterm::style::Stylize;

/// Prints alert, error and startup lines to stdout
#[derive(Debug, Clone, Copy)]
pub struct Console {
    styled: bool,
    enabled: bool,
}

impl Default for Console {
    fn default() -> Self {
        Self {
            styled: true,
            enabled: true,
        }
    }
}

impl Console {
    /// Plain text, no ANSI styling
    pub fn plain() -> Self {
        Self {
            styled: false,
            enabled: true,
        }
    }

    /// Swallows everything
    pub fn silent() -> Self {
        Self {
            styled: false,
            enabled: false,
        }
    }

    pub fn render_alert(&self, ts: &str, alert: &Alert) -> String {
        let f = AlertFields::from_alert(alert);
        let price = format!("{} {}", f.price, alert.quote_asset);
        let growth = format!("{}%", f.growth);
        let sentiment = format!("{} <3", f.sentiment);

        if !self.styled {
            return format!(
                "[{}][{}] {} @ {} | {} | {}",
                ts, alert.symbol, f.padding, price, growth, sentiment
            );
        }

        let line = format!(
            "[{}][{}] {} @ {} | {} | {}",
            ts,
            alert.symbol.as_str().bold(),
            f.padding,
            price.on_blue(),
            growth.on_green(),
            sentiment.on_red()
        );
        line.white().to_string()
    }

    pub fn alert(&self, ts: &str, alert: &Alert) {
        if self.enabled {
            println!("{}", self.render_alert(ts, alert));
        }
    }

    pub fn error(&self, line: &str) {
        if !self.enabled {
            return;
        }
        if self.styled {
            println!("{}", line.red());
        } else {
            println!("{}", line);
        }
    }

    pub fn info(&self, line: &str) {
        if !self.enabled {
            return;
        }
        if self.styled {
            println!("{}", line.green());
        } else {
            println!("{}", line);
        }
    }
}
