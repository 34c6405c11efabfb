//! Twitter filtered stream
//!
//! Installs OR-joined watch-list rules under our tag, then reads the
//! newline-delimited JSON stream and forwards each tweet's text.

use super::TextSource;
use crate::config::TwitterConfig;
use crate::error::{BotError, Result};
use crate::types::TextEvent;
use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Longest rule value the filtered stream accepts
pub const MAX_RULE_LEN: usize = 512;

#[derive(Debug, Serialize)]
struct NewRule<'a> {
    value: String,
    tag: &'a str,
}

#[derive(Debug, Deserialize)]
struct RulesResponse {
    data: Option<Vec<ExistingRule>>,
}

#[derive(Debug, Deserialize)]
struct ExistingRule {
    id: String,
    tag: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamItem {
    data: Option<TweetData>,
    errors: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct TweetData {
    id: String,
    text: String,
}

/// Pack watch-list symbols into as few `A OR B OR ...` rules as fit
pub fn build_rules(watchlist: &str, max_len: usize) -> Vec<String> {
    let mut rules = Vec::new();
    let mut current = String::new();

    for symbol in watchlist.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if current.is_empty() {
            current.push_str(symbol);
        } else if current.len() + " OR ".len() + symbol.len() <= max_len {
            current.push_str(" OR ");
            current.push_str(symbol);
        } else {
            rules.push(std::mem::take(&mut current));
            current.push_str(symbol);
        }
    }

    if !current.is_empty() {
        rules.push(current);
    }
    rules
}

/// Longest partial line held while waiting for its newline
pub const MAX_LINE_BYTES: usize = 1024 * 1024;

/// Splits a byte stream into complete, non-blank lines
#[derive(Debug)]
pub struct LineBuffer {
    buf: Vec<u8>,
    limit: usize,
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::with_limit(MAX_LINE_BYTES)
    }
}

impl LineBuffer {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            buf: Vec::new(),
            limit,
        }
    }

    /// Append a chunk and take every line it completes.
    ///
    /// Fails once an unterminated line grows past the limit.
    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<String>> {
        self.buf.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.buf.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&raw);
            let line = line.trim();
            // blank lines are keep-alives
            if !line.is_empty() {
                lines.push(line.to_string());
            }
        }

        if self.buf.len() > self.limit {
            let held = self.buf.len();
            self.buf.clear();
            return Err(BotError::Stream(format!(
                "unterminated line exceeds {} bytes ({} buffered)",
                self.limit, held
            )));
        }
        Ok(lines)
    }
}

/// Decode one stream line.
///
/// Error payloads end the stream; lines we can't decode are skipped.
pub fn parse_line(line: &str) -> Result<Option<TextEvent>> {
    let item: StreamItem = match serde_json::from_str(line) {
        Ok(item) => item,
        Err(e) => {
            warn!("Skipping undecodable stream line: {}", e);
            return Ok(None);
        }
    };

    match (item.data, item.errors) {
        (Some(tweet), _) => Ok(Some(TextEvent::new(tweet.text).with_id(tweet.id))),
        (None, Some(errors)) if !errors.is_empty() => {
            let detail = errors
                .iter()
                .map(|e| {
                    e["title"]
                        .as_str()
                        .or_else(|| e["detail"].as_str())
                        .unwrap_or("unknown")
                        .to_string()
                })
                .collect::<Vec<_>>()
                .join("; ");
            Err(BotError::Stream(detail))
        }
        _ => Ok(None),
    }
}

pub struct TwitterStream {
    http: Client,
    api_url: String,
    bearer_token: String,
    rule_tag: String,
    watchlist: String,
}

impl TwitterStream {
    pub fn new(config: &TwitterConfig, watchlist: &str) -> Result<Self> {
        // no overall timeout, the stream stays open indefinitely
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            bearer_token: config.bearer_token.clone(),
            rule_tag: config.rule_tag.clone(),
            watchlist: watchlist.to_string(),
        })
    }

    fn rules_url(&self) -> String {
        format!("{}/2/tweets/search/stream/rules", self.api_url)
    }

    /// Replace our tagged rules with the current watch-list
    async fn sync_rules(&self) -> Result<()> {
        let existing: RulesResponse = check(
            self.http
                .get(self.rules_url())
                .bearer_auth(&self.bearer_token)
                .send()
                .await
                .map_err(stream_err)?,
        )
        .await?
        .json()
        .await
        .map_err(stream_err)?;

        let stale: Vec<String> = existing
            .data
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.tag.as_deref() == Some(self.rule_tag.as_str()))
            .map(|r| r.id)
            .collect();

        if !stale.is_empty() {
            debug!("Deleting {} stale stream rules", stale.len());
            check(
                self.http
                    .post(self.rules_url())
                    .bearer_auth(&self.bearer_token)
                    .json(&serde_json::json!({ "delete": { "ids": stale } }))
                    .send()
                    .await
                    .map_err(stream_err)?,
            )
            .await?;
        }

        let add: Vec<NewRule> = build_rules(&self.watchlist, MAX_RULE_LEN)
            .into_iter()
            .map(|value| NewRule {
                value,
                tag: &self.rule_tag,
            })
            .collect();

        info!("Installing {} stream rules for {}", add.len(), self.watchlist);

        check(
            self.http
                .post(self.rules_url())
                .bearer_auth(&self.bearer_token)
                .json(&serde_json::json!({ "add": add }))
                .send()
                .await
                .map_err(stream_err)?,
        )
        .await?;

        Ok(())
    }
}

#[async_trait]
impl TextSource for TwitterStream {
    fn name(&self) -> &str {
        "twitter"
    }

    async fn run(&self, tx: mpsc::UnboundedSender<TextEvent>) -> Result<()> {
        self.sync_rules().await?;

        let url = format!("{}/2/tweets/search/stream", self.api_url);
        let resp = check(
            self.http
                .get(&url)
                .bearer_auth(&self.bearer_token)
                .send()
                .await
                .map_err(stream_err)?,
        )
        .await?;

        info!("Connected to Twitter filtered stream");

        let mut body = resp.bytes_stream();
        let mut lines = LineBuffer::default();

        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(stream_err)?;
            for line in lines.push(&chunk)? {
                if let Some(event) = parse_line(&line)? {
                    if tx.send(event).is_err() {
                        warn!("Text channel closed, stopping stream");
                        return Ok(());
                    }
                }
            }
        }

        Err(BotError::Stream("stream closed by remote".into()))
    }
}

fn stream_err(e: reqwest::Error) -> BotError {
    BotError::Stream(e.to_string())
}

async fn check(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let url = resp.url().path().to_string();
    let body = resp.text().await.unwrap_or_default();
    Err(BotError::Stream(format!("{} returned {}: {}", url, status, body)))
}
