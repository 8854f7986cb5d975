//! Bot API client over HTTPS.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{debug, info};

use super::message::{ApiResponse, InboundMessage, latest_for_chat};
use super::{MessageSource, Publisher};
use crate::config::{PUBLISH_TIMEOUT, TelegramConfig};

/// Errors that can occur during Telegram operations.
#[derive(Debug, Error)]
pub enum TelegramError {
    /// Transport failure. The URL is stripped since it embeds the bot token.
    #[error("Telegram request failed: {0}")]
    Http(reqwest::Error),

    #[error("Telegram API returned not ok: {0}")]
    Api(String),

    #[error("Telegram response is missing {0}")]
    MissingField(&'static str),
}

impl From<reqwest::Error> for TelegramError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.without_url())
    }
}

#[derive(Debug, Deserialize)]
struct FileInfo {
    file_path: Option<String>,
}

/// Telegram Bot API client bound to a single chat.
#[derive(Clone)]
pub struct TelegramClient {
    http: Client,
    config: TelegramConfig,
}

impl TelegramClient {
    /// Creates a client with a fixed per-call timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: TelegramConfig, timeout: Duration) -> Result<Self, TelegramError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, config })
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{method}",
            self.config.api_base.trim_end_matches('/'),
            self.config.bot_token
        )
    }

    fn file_url(&self, file_path: &str) -> String {
        format!(
            "{}/file/bot{}/{file_path}",
            self.config.api_base.trim_end_matches('/'),
            self.config.bot_token
        )
    }
}

/// Unwraps a Bot API envelope.
fn into_result<T>(response: ApiResponse<T>) -> Result<T, TelegramError> {
    if !response.ok {
        return Err(TelegramError::Api(
            response
                .description
                .unwrap_or_else(|| "no description".to_owned()),
        ));
    }
    response.result.ok_or(TelegramError::MissingField("result"))
}

#[async_trait]
impl MessageSource for TelegramClient {
    async fn latest_message(&self) -> Result<Option<InboundMessage>, TelegramError> {
        let response: ApiResponse<Vec<Value>> = self
            .http
            .get(self.method_url("getUpdates"))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        // An empty or not-ok poll just means there is nothing to act on.
        if !response.ok {
            debug!("getUpdates returned not ok: {:?}", response.description);
            return Ok(None);
        }
        let updates = response.result.unwrap_or_default();
        debug!("Fetched {} updates", updates.len());

        Ok(latest_for_chat(&updates, &self.config.chat_id))
    }

    async fn download_file(&self, file_id: &str) -> Result<Vec<u8>, TelegramError> {
        let info: ApiResponse<FileInfo> = self
            .http
            .get(self.method_url("getFile"))
            .query(&[("file_id", file_id)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let file_path = into_result(info)?
            .file_path
            .ok_or(TelegramError::MissingField("file_path"))?;

        let bytes = self
            .http
            .get(self.file_url(&file_path))
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        debug!("Downloaded {} ({} bytes)", file_path, bytes.len());
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl Publisher for TelegramClient {
    async fn send_html(&self, text: &str) -> Result<(), TelegramError> {
        let payload = json!({
            "chat_id": self.config.chat_id,
            "text": text,
            "parse_mode": "HTML",
        });

        let response: ApiResponse<Value> = self
            .http
            .post(self.method_url("sendMessage"))
            .timeout(PUBLISH_TIMEOUT)
            .json(&payload)
            .send()
            .await?
            .json()
            .await?;

        into_result(response)?;
        info!("Message sent to chat {}", self.config.chat_id);
        Ok(())
    }
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
