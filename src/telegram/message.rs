//! Bot API update and message types.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Envelope of every Bot API response.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct Update {
    message: Option<InboundMessage>,
    channel_post: Option<InboundMessage>,
}

/// Chat a message belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// One size variant of a photo. Telegram lists them smallest first.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PhotoSize {
    pub file_id: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

/// An inbound message or channel post.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InboundMessage {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub photo: Vec<PhotoSize>,
}

/// Where the text of a message comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageContent<'a> {
    Text(&'a str),
    Caption(&'a str),
    /// Highest resolution photo; its text needs OCR.
    Photo { file_id: &'a str },
    Empty,
}

impl InboundMessage {
    /// Picks the text source: text, then caption, then the largest photo.
    #[must_use]
    pub fn content(&self) -> MessageContent<'_> {
        if let Some(text) = &self.text {
            MessageContent::Text(text)
        } else if let Some(caption) = &self.caption {
            MessageContent::Caption(caption)
        } else if let Some(photo) = self.photo.last() {
            MessageContent::Photo {
                file_id: &photo.file_id,
            }
        } else {
            MessageContent::Empty
        }
    }
}

/// Returns the most recent message or channel post from `chat_id`.
///
/// Updates that do not deserialize are skipped.
#[must_use]
pub fn latest_for_chat(updates: &[Value], chat_id: &str) -> Option<InboundMessage> {
    let chat_id = chat_id.trim();
    updates.iter().rev().find_map(|raw| {
        let update: Update = match serde_json::from_value(raw.clone()) {
            Ok(u) => u,
            Err(e) => {
                debug!("Skipping unparseable update: {}", e);
                return None;
            }
        };
        update
            .message
            .or(update.channel_post)
            .filter(|m| m.chat.id.to_string() == chat_id)
    })
}
