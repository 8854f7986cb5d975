//! Quran content API client.
//!
//! Responses are normalized into [`SurahInfo`] and [`VerseContent`] right at
//! this boundary; both the `{code, data}` envelope and the flat `{text, surah}`
//! shape are accepted.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use super::{SurahInfo, VerseContent, VerseRef, VerseSource};

/// Keys that different Quran APIs use for a surah's ayah count.
const AYAH_COUNT_KEYS: [&str; 3] = ["numberOfAyahs", "number_of_ayahs", "ayahs_count"];

/// Errors that can occur while talking to the Quran API.
#[derive(Debug, Error)]
pub enum QuranApiError {
    #[error("Quran API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unrecognized Quran API response for {what}")]
    UnrecognizedShape { what: String },

    #[error("Surah {0} does not report an ayah count")]
    MissingAyahCount(u16),
}

/// HTTP client for an alquran.cloud compatible API.
#[derive(Debug, Clone)]
pub struct QuranClient {
    http: Client,
    base_url: String,
}

impl QuranClient {
    /// Creates a client for `base_url` with a fixed per-call timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, QuranApiError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        })
    }

    async fn get_json(&self, path: &str) -> Result<Value, QuranApiError> {
        let url = format!("{}/{path}", self.base_url);
        debug!("GET {}", url);

        let body = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;
        Ok(body)
    }
}

#[async_trait]
impl VerseSource for QuranClient {
    async fn surah_info(&self, surah: u16) -> Result<SurahInfo, QuranApiError> {
        let body = self.get_json(&format!("surah/{surah}")).await?;
        parse_surah_info(surah, &body).ok_or_else(|| QuranApiError::UnrecognizedShape {
            what: format!("surah {surah}"),
        })
    }

    async fn fetch_verse(&self, verse: VerseRef) -> Result<VerseContent, QuranApiError> {
        let body = self
            .get_json(&format!("ayah/{}:{}", verse.surah, verse.ayah))
            .await?;
        parse_verse(verse, &body).ok_or_else(|| QuranApiError::UnrecognizedShape {
            what: format!("ayah {verse}"),
        })
    }
}

/// Unwraps the `{code: 200, data}` envelope.
fn ok_envelope(body: &Value) -> Option<&Value> {
    if body.get("code").and_then(Value::as_i64) == Some(200) {
        body.get("data")
    } else {
        None
    }
}

/// Normalizes a surah response.
pub(crate) fn parse_surah_info(surah: u16, body: &Value) -> Option<SurahInfo> {
    let data = ok_envelope(body)
        .or_else(|| body.get("data").filter(|d| d.get("ayahs").is_some()))
        .filter(|d| d.is_object())?;

    let ayah_count = AYAH_COUNT_KEYS
        .iter()
        .find_map(|key| data.get(*key).and_then(as_count))
        .or_else(|| {
            data.get("ayahs")
                .and_then(Value::as_array)
                .and_then(|ayahs| u16::try_from(ayahs.len()).ok())
        });

    Some(SurahInfo {
        number: surah,
        name: data.get("name").and_then(Value::as_str).map(str::to_owned),
        ayah_count,
    })
}

/// Reads a count that may be encoded as a number or a numeric string.
fn as_count(value: &Value) -> Option<u16> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Normalizes a single-ayah response.
pub(crate) fn parse_verse(verse: VerseRef, body: &Value) -> Option<VerseContent> {
    let data = ok_envelope(body).or_else(|| {
        (body.get("text").is_some() && body.get("surah").is_some()).then_some(body)
    })?;

    let text = data
        .get("text")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty())?;

    let surah_name = match data.get("surah") {
        Some(Value::Object(surah)) => surah.get("name").and_then(Value::as_str),
        Some(Value::String(name)) => Some(name.as_str()),
        _ => None,
    }
    .filter(|n| !n.trim().is_empty())
    .map_or_else(|| format!("Surah {}", verse.surah), str::to_owned);

    Some(VerseContent {
        verse,
        text: text.to_owned(),
        surah_name,
    })
}
