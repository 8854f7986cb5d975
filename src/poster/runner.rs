//! Single-pass verse posting run.
//!
//! A run moves through these steps in order, never going back:
//! 1. Load the last posted verse (default 1:0 when missing or corrupt)
//! 2. Check the latest chat message for a verse reference
//!    - text, caption, or OCR of the largest photo
//!    - a resolved reference replaces the loaded position
//! 3. Compute the next verse from the (possibly replaced) position
//! 4. Fetch the verse text. Failure ends the run here
//! 5. Publish it. Failure ends the run here
//! 6. On SUCCESS only: save state, then commit it if enabled
//!
//! Every run writes a run log, whatever the outcome. Nothing here returns an
//! error: failures are logged and reflected in [`RunOutcome`].

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::ocr::OcrEngine;
use crate::poster::StateCommitter;
use crate::quran::{VerseRef, VerseSource, compute_next};
use crate::resolver::{ResolvedBy, VerseResolver};
use crate::state::{PosterState, RunLog, RunLogWriter, RunStep, StateStore, preview};
use crate::telegram::{MessageContent, MessageSource, Publisher, format_verse_post};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Verse published and state advanced.
    Posted(VerseRef),
    /// The verse text could not be fetched; nothing was published.
    FetchFailed(VerseRef),
    /// The verse was fetched but publishing failed.
    PublishFailed(VerseRef),
}

impl RunOutcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Posted(_))
    }
}

/// External collaborators of a run, constructed once by the entry point.
#[derive(Clone)]
pub struct PosterServices {
    pub messages: Arc<dyn MessageSource>,
    pub publisher: Arc<dyn Publisher>,
    pub verses: Arc<dyn VerseSource>,
    pub ocr: Arc<dyn OcrEngine>,
    pub resolver: VerseResolver,
    pub committer: Arc<dyn StateCommitter>,
}

/// Posts the next verse once per invocation.
pub struct DailyPoster {
    services: PosterServices,
    store: StateStore,
    run_logs: RunLogWriter,
}

impl DailyPoster {
    /// Creates a poster.
    #[must_use]
    pub fn new(services: PosterServices, store: StateStore, run_logs: RunLogWriter) -> Self {
        Self {
            services,
            store,
            run_logs,
        }
    }

    /// Performs one full run and writes its run log.
    pub async fn run_once(&self) -> RunOutcome {
        info!("{}", "=".repeat(60));
        info!("Starting Quran verse poster run");
        info!("{}", "=".repeat(60));

        let mut log = RunLog::start();
        let outcome = self.execute(&mut log).await;
        log.success = outcome.is_success();

        if let Err(e) = self.run_logs.write(&log) {
            error!("Failed to save run log: {}", e);
        }

        info!("Run completed: {:?}", outcome);
        outcome
    }

    async fn execute(&self, log: &mut RunLog) -> RunOutcome {
        // Step 1: Load state
        let state = self.store.load();
        log.push(RunStep::LoadedState {
            surah: state.last_surah,
            ayah: state.last_ayah,
        });
        let (mut surah, mut ayah) = (state.last_surah, state.last_ayah);

        // Step 2: Jump to a verse referenced in the latest message
        if let Some((verse, by)) = self.check_override(log).await {
            info!("Following message reference {} ({:?})", verse, by);
            surah = verse.surah;
            ayah = verse.ayah;
            log.push(RunStep::UpdatedFromTelegram {
                surah,
                ayah,
                method: match by {
                    ResolvedBy::Pattern => "pattern",
                    ResolvedBy::Ai => "ai",
                }
                .to_owned(),
            });
        }

        // Step 3: Compute the next verse
        let next = compute_next(self.services.verses.as_ref(), surah, ayah).await;
        log.push(RunStep::NextVerseComputed {
            next_surah: next.surah,
            next_ayah: next.ayah,
        });
        debug!("Next verse: {}", next);

        // Step 4: Fetch verse text
        let content = match self.services.verses.fetch_verse(next).await {
            Ok(content) => content,
            Err(e) => {
                error!("Failed to fetch verse {}: {}", next, e);
                log.push(RunStep::FetchVerseFailed {
                    error: e.to_string(),
                });
                return RunOutcome::FetchFailed(next);
            }
        };

        let post = format_verse_post(&content);
        log.push(RunStep::PreparedMessage {
            preview: preview(&post),
        });

        // Step 5: Publish
        if let Err(e) = self.services.publisher.send_html(&post).await {
            error!("Failed to post to Telegram: {}", e);
            log.push(RunStep::TelegramPostFailed {
                error: e.to_string(),
            });
            return RunOutcome::PublishFailed(next);
        }
        log.push(RunStep::PostedToTelegram {
            surah: next.surah,
            ayah: next.ayah,
        });
        info!("Posted Surah {} Ayah {}", next.surah, next.ayah);

        // Step 6: Persist, only after a confirmed publish
        self.persist(next, log).await;
        RunOutcome::Posted(next)
    }

    async fn check_override(&self, log: &mut RunLog) -> Option<(VerseRef, ResolvedBy)> {
        let text = self.latest_message_text().await?;
        log.push(RunStep::TelegramMessageText {
            text_preview: preview(&text),
        });
        self.services.resolver.resolve(&text).await
    }

    /// Extracts text from the latest message: directly, from the caption, or
    /// by OCR of the attached photo.
    async fn latest_message_text(&self) -> Option<String> {
        let message = match self.services.messages.latest_message().await {
            Ok(Some(message)) => message,
            Ok(None) => {
                debug!("No recent message in the configured chat");
                return None;
            }
            Err(e) => {
                error!("Failed to fetch Telegram updates: {}", e);
                return None;
            }
        };

        let text = match message.content() {
            MessageContent::Text(text) | MessageContent::Caption(text) => text.to_owned(),
            MessageContent::Photo { file_id } => self.ocr_photo(file_id).await?,
            MessageContent::Empty => return None,
        };

        (!text.trim().is_empty()).then_some(text)
    }

    async fn ocr_photo(&self, file_id: &str) -> Option<String> {
        let image = match self.services.messages.download_file(file_id).await {
            Ok(bytes) => bytes,
            Err(e) => {
                error!("Failed to download photo: {}", e);
                return None;
            }
        };

        match self.services.ocr.extract_text(&image).await {
            Ok(text) => Some(text),
            Err(e) => {
                error!("Failed to extract text from image: {}", e);
                None
            }
        }
    }

    async fn persist(&self, verse: VerseRef, log: &mut RunLog) {
        if let Err(e) = self.store.save(&PosterState::from(verse)) {
            error!("Failed to save state: {}", e);
            log.push(RunStep::StateSaveFailed {
                error: e.to_string(),
            });
            return;
        }

        match self.services.committer.commit(self.store.path(), verse).await {
            Ok(true) => {
                info!("State committed and pushed");
                log.push(RunStep::StateCommitted);
            }
            Ok(false) => {}
            Err(e) => {
                warn!("Failed to commit state: {}", e);
                log.push(RunStep::StateCommitFailed {
                    error: e.to_string(),
                });
            }
        }
    }
}

impl std::fmt::Debug for DailyPoster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DailyPoster")
            .field("store", &self.store)
            .field("run_logs", &self.run_logs)
            .field("resolver", &self.services.resolver)
            .finish_non_exhaustive()
    }
}
