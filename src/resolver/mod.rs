//! Verse reference resolution from free text.
//!
//! Local patterns run first; the AI identifier is consulted only when they
//! find nothing. "No reference" is a normal outcome, not an error.

mod ai;
mod local;

use std::sync::Arc;

use tracing::{debug, error};

pub use ai::{GeminiIdentifier, IdentifyError, NoopIdentifier, VerseIdentifier};
pub use local::{normalize_digits, parse_verse_reference};

use crate::quran::VerseRef;

/// Which method produced a resolved reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedBy {
    Pattern,
    Ai,
}

/// Resolves verse references with patterns and an optional AI fallback.
#[derive(Clone)]
pub struct VerseResolver {
    identifier: Arc<dyn VerseIdentifier>,
}

impl VerseResolver {
    /// Creates a resolver using `identifier` as the fallback.
    #[must_use]
    pub fn new(identifier: Arc<dyn VerseIdentifier>) -> Self {
        Self { identifier }
    }

    /// Creates a resolver with local patterns only.
    #[must_use]
    pub fn local_only() -> Self {
        Self::new(Arc::new(NoopIdentifier))
    }

    /// Resolves `text` to a verse reference, if any.
    pub async fn resolve(&self, text: &str) -> Option<(VerseRef, ResolvedBy)> {
        if let Some(verse) = parse_verse_reference(text) {
            return Some((verse, ResolvedBy::Pattern));
        }

        debug!("No local pattern matched, trying {} identifier", self.identifier.name());
        match self.identifier.identify(text).await {
            Ok(verse) => verse.map(|v| (v, ResolvedBy::Ai)),
            Err(e) => {
                error!("{} identification failed: {}", self.identifier.name(), e);
                None
            }
        }
    }
}

impl Default for VerseResolver {
    fn default() -> Self {
        Self::local_only()
    }
}

impl std::fmt::Debug for VerseResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerseResolver")
            .field("identifier", &self.identifier.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;

    struct FixedIdentifier(Result<Option<VerseRef>, ()>);

    #[async_trait]
    impl VerseIdentifier for FixedIdentifier {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn identify(&self, _text: &str) -> Result<Option<VerseRef>, IdentifyError> {
            self.0.map_err(|()| IdentifyError::EmptyResponse)
        }
    }

    #[tokio::test]
    async fn test_pattern_wins_over_ai() {
        let resolver = VerseResolver::new(Arc::new(FixedIdentifier(Ok(VerseRef::new(1, 1)))));
        let resolved = resolver.resolve("2:255").await;
        assert_eq!(resolved, Some((VerseRef { surah: 2, ayah: 255 }, ResolvedBy::Pattern)));
    }

    #[tokio::test]
    async fn test_ai_fallback_used_when_no_pattern() {
        let resolver = VerseResolver::new(Arc::new(FixedIdentifier(Ok(VerseRef::new(2, 255)))));
        let resolved = resolver.resolve("آية الكرسي").await;
        assert_eq!(resolved, Some((VerseRef { surah: 2, ayah: 255 }, ResolvedBy::Ai)));
    }

    #[tokio::test]
    async fn test_ai_failure_is_no_match() {
        let resolver = VerseResolver::new(Arc::new(FixedIdentifier(Err(()))));
        assert_eq!(resolver.resolve("آية الكرسي").await, None);
    }

    #[tokio::test]
    async fn test_local_only_no_match() {
        assert_eq!(VerseResolver::local_only().resolve("hello").await, None);
    }
}
