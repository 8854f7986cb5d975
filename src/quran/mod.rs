//! Quran content: verse references, progression, and the content API.

mod api;
mod verse;

use async_trait::async_trait;
use tracing::warn;

pub use api::{QuranApiError, QuranClient};
pub use verse::{SURAH_COUNT, VerseRef, next_verse};

/// Surah metadata in canonical form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurahInfo {
    pub number: u16,
    pub name: Option<String>,
    pub ayah_count: Option<u16>,
}

/// Verse text in canonical form, whatever shape the API answered with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerseContent {
    pub verse: VerseRef,
    pub text: String,
    pub surah_name: String,
}

/// Source of surah metadata and verse text.
#[async_trait]
pub trait VerseSource: Send + Sync {
    /// Fetches metadata for `surah`.
    async fn surah_info(&self, surah: u16) -> Result<SurahInfo, QuranApiError>;

    /// Fetches the text of a single verse.
    async fn fetch_verse(&self, verse: VerseRef) -> Result<VerseContent, QuranApiError>;

    /// Number of ayahs in `surah`.
    async fn ayah_count(&self, surah: u16) -> Result<u16, QuranApiError> {
        self.surah_info(surah)
            .await?
            .ayah_count
            .ok_or(QuranApiError::MissingAyahCount(surah))
    }
}

/// Computes the verse after `(surah, ayah)` using the source's ayah count.
///
/// Never fails: when the count is unavailable the position advances within
/// the same surah.
pub async fn compute_next(source: &dyn VerseSource, surah: u16, ayah: u16) -> VerseRef {
    let total = match source.ayah_count(surah).await {
        Ok(total) => Some(total),
        Err(e) => {
            warn!("Could not get ayah count for surah {}: {}", surah, e);
            None
        }
    };
    next_verse(surah, ayah, total)
}
