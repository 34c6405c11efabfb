//! Telegram Bot API chat channel

use super::ChatChannel;
use crate::config::TelegramConfig;
use crate::error::{BotError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

pub struct TelegramChannel {
    http: Client,
    api_url: String,
    bot_token: String,
    chat_id: String,
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
}

impl TelegramChannel {
    pub fn new(config: &TelegramConfig) -> Self {
        Self {
            http: Client::new(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            bot_token: config.bot_token.clone(),
            chat_id: config.chat_id.clone(),
        }
    }
}

#[async_trait]
impl ChatChannel for TelegramChannel {
    async fn send(&self, text: &str) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", self.api_url, self.bot_token);

        let request = SendMessageRequest {
            chat_id: &self.chat_id,
            text,
        };

        // the URL carries the bot token, keep it out of error messages
        let resp = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| BotError::Notify(e.without_url().to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(BotError::Notify(format!("Telegram returned {}: {}", status, body)));
        }

        Ok(())
    }

    fn name(&self) -> &str {
        "telegram"
    }
}
