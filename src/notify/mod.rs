//! Alert fan-out and error audit
//!
//! Every alert goes to the operator console, the audit log and (when
//! configured) a chat channel. Chat delivery runs on its own task so a slow
//! or failing channel never holds up a poll cycle.

pub mod audit;
pub mod console;
pub mod format;
mod telegram;

pub use audit::AuditLog;
pub use console::Console;
pub use telegram::TelegramChannel;

use crate::error::{BotError, Result};
use crate::types::Alert;
use async_trait::async_trait;
use chrono::Local;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Remote destination for alert messages
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatChannel: Send + Sync {
    async fn send(&self, text: &str) -> Result<()>;

    fn name(&self) -> &str {
        "chat"
    }
}

#[derive(Clone)]
pub struct Notifier {
    audit: AuditLog,
    console: Console,
    chat: Option<Arc<dyn ChatChannel>>,
}

impl Notifier {
    pub fn new(audit: AuditLog, console: Console, chat: Option<Arc<dyn ChatChannel>>) -> Self {
        Self {
            audit,
            console,
            chat,
        }
    }

    pub fn has_chat(&self) -> bool {
        self.chat.is_some()
    }

    /// Print, dispatch and record one alert.
    ///
    /// Only the audit append can fail here; chat errors are recorded by the
    /// dispatch task.
    pub async fn notify(&self, alert: &Alert) -> Result<()> {
        let ts = format::timestamp(&Local::now());

        self.console.alert(&ts, alert);
        self.dispatch(format::chat_message(alert));
        self.audit.append(&format::audit_line(&ts, alert)).await
    }

    /// Fire-and-forget chat delivery
    pub fn dispatch(&self, message: String) -> Option<JoinHandle<()>> {
        let chat = self.chat.clone()?;
        let notifier = self.clone();

        Some(tokio::spawn(async move {
            if let Err(e) = chat.send(&message).await {
                tracing::warn!("Failed to deliver alert via {}: {}", chat.name(), e);
                notifier.record_error(&e).await;
            }
        }))
    }

    /// Write an error to console and audit log.
    ///
    /// If the audit append itself fails, that failure is printed once to the
    /// console and nothing else is attempted.
    pub async fn record_error(&self, err: &BotError) {
        let ts = format::timestamp(&Local::now());
        let line = format::error_line(&ts, err);

        self.console.error(&line);
        tracing::error!("{}", err);

        if let Err(write_err) = self.audit.append(&line).await {
            self.console.error(&format::error_line(&ts, &write_err));
            tracing::error!("Audit log unavailable: {}", write_err);
        }
    }

    /// Startup banner to console and audit log
    pub async fn started(&self, watchlist: &str) -> Result<()> {
        let ts = format::timestamp(&Local::now());
        let line = format::started_line(&ts);

        self.console.info(&line);
        tracing::info!("Watching {}", watchlist);
        self.audit.append(&line).await
    }
}
