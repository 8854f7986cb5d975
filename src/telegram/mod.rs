//! Telegram Bot API integration.
//!
//! Reads the latest inbound message for the configured chat and publishes
//! verse posts to it.

mod client;
mod format;
mod message;

use async_trait::async_trait;

pub use client::{TelegramClient, TelegramError};
pub use format::{escape_html, format_verse_post};
pub use message::{Chat, InboundMessage, MessageContent, PhotoSize, latest_for_chat};

/// Source of the most recent inbound message.
#[async_trait]
pub trait MessageSource: Send + Sync {
    /// Latest message or channel post from the configured chat, if any.
    async fn latest_message(&self) -> Result<Option<InboundMessage>, TelegramError>;

    /// Downloads an attached file.
    async fn download_file(&self, file_id: &str) -> Result<Vec<u8>, TelegramError>;
}

/// Destination for verse posts.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Sends HTML-formatted text. Succeeds only on a confirmed `ok` response.
    async fn send_html(&self, text: &str) -> Result<(), TelegramError>;
}
