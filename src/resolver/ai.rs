//! AI fallback for verse identification.
//!
//! The fallback is a capability: [`NoopIdentifier`] when no API key is
//! configured, [`GeminiIdentifier`] otherwise. Either way a malformed answer
//! is "no match", never an error for the run.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{debug, info};

use crate::quran::VerseRef;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

const SYSTEM_PROMPT: &str = "You are a Quranic verse identification expert. \
Analyze the given text and identify which surah (chapter) and ayah (verse) \
from the Quran is referenced. \
Return ONLY a JSON object with this exact format: \
{\"surah\": <number or null>, \"ayah\": <number or null>}. \
If you cannot identify a verse, return null for both fields.";

/// Errors from an AI identification call.
#[derive(Debug, Error)]
pub enum IdentifyError {
    #[error("AI request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("AI response had no text candidate")]
    EmptyResponse,

    #[error("AI response was not the expected JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Identifies a verse reference in free text.
#[async_trait]
pub trait VerseIdentifier: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Returns the referenced verse, `Ok(None)` when none was identified.
    async fn identify(&self, text: &str) -> Result<Option<VerseRef>, IdentifyError>;
}

/// Identifier used when no AI backend is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopIdentifier;

#[async_trait]
impl VerseIdentifier for NoopIdentifier {
    fn name(&self) -> &'static str {
        "none"
    }

    async fn identify(&self, _text: &str) -> Result<Option<VerseRef>, IdentifyError> {
        Ok(None)
    }
}

/// Gemini `generateContent` backed identifier.
#[derive(Clone)]
pub struct GeminiIdentifier {
    http: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiIdentifier {
    /// Creates an identifier for `model`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, IdentifyError> {
        Ok(Self {
            http: Client::builder().timeout(timeout).build()?,
            api_key: api_key.into(),
            model: model.into(),
            base_url: GEMINI_API_BASE.to_owned(),
        })
    }

    fn request_body(text: &str) -> Value {
        let nullable_int = json!({ "type": "INTEGER", "nullable": true });
        json!({
            "systemInstruction": { "parts": [{ "text": SYSTEM_PROMPT }] },
            "contents": [{ "role": "user", "parts": [{ "text": text }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": { "surah": nullable_int, "ayah": nullable_int }
                }
            }
        })
    }
}

impl std::fmt::Debug for GeminiIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiIdentifier")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl VerseIdentifier for GeminiIdentifier {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn identify(&self, text: &str) -> Result<Option<VerseRef>, IdentifyError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        debug!("Asking {} to identify a verse", self.model);

        let body: Value = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&Self::request_body(text))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let answer = candidate_text(&body).ok_or(IdentifyError::EmptyResponse)?;
        let verse = parse_identification(answer)?;
        if let Some(v) = verse {
            info!("Gemini parse -> Surah {}, Ayah {}", v.surah, v.ayah);
        }
        Ok(verse)
    }
}

/// Extracts the first candidate's text part.
fn candidate_text(body: &Value) -> Option<&str> {
    body.get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .as_array()?
        .iter()
        .find_map(|part| part.get("text").and_then(Value::as_str))
}

#[derive(Debug, Deserialize)]
struct Identification {
    surah: Option<i64>,
    ayah: Option<i64>,
}

/// Parses `{"surah": int|null, "ayah": int|null}`.
///
/// Both fields must be present, non-null, and in range.
pub(crate) fn parse_identification(answer: &str) -> Result<Option<VerseRef>, IdentifyError> {
    let id: Identification = serde_json::from_str(answer.trim())?;
    Ok(match (id.surah, id.ayah) {
        (Some(surah), Some(ayah)) => VerseRef::from_parts(surah, ayah),
        _ => None,
    })
}
