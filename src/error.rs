//! Error types

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BotError>;

#[derive(Debug, Error)]
pub enum BotError {
    /// Price feed unreachable or returned something we can't read
    #[error("Price fetch failed: {0}")]
    Fetch(String),

    /// Social stream transport failure, error payload or remote close
    #[error("Text stream failed: {0}")]
    Stream(String),

    /// Audit log could not be appended
    #[error("Audit log write failed: {0}")]
    LogWrite(String),

    /// A tracked ticker is absent from a mid-run snapshot
    #[error("Ticker missing from snapshot: {0}")]
    MissingTicker(String),

    /// Startup snapshot unusable for building the registry
    #[error("Malformed price snapshot: {0}")]
    MalformedSnapshot(String),

    #[error("Notification dispatch failed: {0}")]
    Notify(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// A supervised task panicked or was cancelled
    #[error("Task failed: {0}")]
    Task(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<config::ConfigError> for BotError {
    fn from(e: config::ConfigError) -> Self {
        BotError::Config(e.to_string())
    }
}

impl BotError {
    /// Errors that abort a single poll cycle rather than a stream
    pub fn is_cycle_error(&self) -> bool {
        matches!(
            self,
            BotError::Fetch(_) | BotError::MissingTicker(_) | BotError::LogWrite(_)
        )
    }
}
