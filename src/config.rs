//! Configuration
//!
//! Layered with the `config` crate: built-in defaults, an optional
//! `sentiment-watch.toml`, `WATCH__SECTION__KEY` variables, and finally the
//! flat credential variables (`BINANCE_API_KEY`, `TELEGRAM_BOT`, ...).

use crate::error::{BotError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;

/// Optional config file looked up next to the working directory
pub const CONFIG_FILE: &str = "sentiment-watch";

/// Flat environment names mapped onto config keys
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("BINANCE_API_KEY", "binance.api_key"),
    ("BINANCE_API_SECRET", "binance.api_secret"),
    ("TWITTER_BEARER_TOKEN", "twitter.bearer_token"),
    ("TELEGRAM_BOT", "telegram.bot_token"),
    ("TELEGRAM_CHAT_ID", "telegram.chat_id"),
    ("LOG_PATH", "watcher.log_path"),
];

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub binance: BinanceConfig,
    #[serde(default)]
    pub twitter: TwitterConfig,
    pub telegram: Option<TelegramConfig>,
    #[serde(default)]
    pub watcher: WatcherConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BinanceConfig {
    pub api_key: Option<String>,
    /// Only public endpoints are used; kept for parity with the key pair
    pub api_secret: Option<String>,
    #[serde(default = "default_binance_url")]
    pub base_url: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for BinanceConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_secret: None,
            base_url: default_binance_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TwitterConfig {
    #[serde(default)]
    pub bearer_token: String,
    #[serde(default = "default_twitter_url")]
    pub api_url: String,
    /// Tag marking the stream rules this bot owns
    #[serde(default = "default_rule_tag")]
    pub rule_tag: String,
}

impl Default for TwitterConfig {
    fn default() -> Self {
        Self {
            bearer_token: String::new(),
            api_url: default_twitter_url(),
            rule_tag: default_rule_tag(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
    #[serde(default = "default_telegram_url")]
    pub api_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WatcherConfig {
    #[serde(default = "default_quote_asset")]
    pub quote_asset: String,
    #[serde(default = "default_growth_threshold")]
    pub growth_threshold_pct: Decimal,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_initial_delay")]
    pub initial_delay_ms: u64,
    #[serde(default = "default_log_path")]
    pub log_path: String,
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            quote_asset: default_quote_asset(),
            growth_threshold_pct: default_growth_threshold(),
            poll_interval_ms: default_poll_interval(),
            initial_delay_ms: default_initial_delay(),
            log_path: default_log_path(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

/// What the supervisor does when a task reports an error
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// No retries: the first error from any task ends the process
    #[default]
    FailFast,
    /// A failed poll cycle is recorded and the next interval runs as usual.
    /// Stream errors stay fatal.
    SkipFailedCycle,
}

fn default_binance_url() -> String {
    "https://api.binance.com".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_twitter_url() -> String {
    "https://api.twitter.com".to_string()
}

fn default_rule_tag() -> String {
    "sentiment-watch".to_string()
}

fn default_telegram_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_quote_asset() -> String {
    "BTC".to_string()
}

fn default_growth_threshold() -> Decimal {
    Decimal::ONE
}

fn default_poll_interval() -> u64 {
    60_000
}

fn default_initial_delay() -> u64 {
    1_000
}

fn default_log_path() -> String {
    "sentiment-watch.log".to_string()
}

impl Config {
    /// Load from `.env`, the optional config file and the environment
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut builder = config::Config::builder()
            .add_source(config::File::with_name(CONFIG_FILE).required(false))
            .add_source(
                config::Environment::with_prefix("WATCH")
                    .separator("__")
                    .try_parsing(true),
            );

        for (var, key) in ENV_OVERRIDES {
            builder = builder.set_override_option(*key, std::env::var(var).ok())?;
        }

        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.watcher.quote_asset.trim().is_empty() {
            return Err(BotError::Config("watcher.quote_asset is empty".into()));
        }
        if self.watcher.poll_interval_ms == 0 {
            return Err(BotError::Config("watcher.poll_interval_ms must be > 0".into()));
        }
        if self.watcher.growth_threshold_pct.is_sign_negative() {
            return Err(BotError::Config(
                "watcher.growth_threshold_pct must not be negative".into(),
            ));
        }
        if self.twitter.bearer_token.is_empty() {
            return Err(BotError::Config("TWITTER_BEARER_TOKEN is not set".into()));
        }
        Ok(())
    }
}

impl WatcherConfig {
    /// Log path with `~` expanded
    pub fn expanded_log_path(&self) -> String {
        shellexpand::tilde(&self.log_path).into_owned()
    }
}
