//! Per-run diagnostic log.
//!
//! One JSON file per execution. The poster never reads these back.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::info;

use super::StateError;

/// Maximum characters kept in text previews.
pub const PREVIEW_CHARS: usize = 120;

/// A single step recorded during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum RunStep {
    LoadedState { surah: u16, ayah: u16 },
    TelegramMessageText { text_preview: String },
    UpdatedFromTelegram { surah: u16, ayah: u16, method: String },
    NextVerseComputed { next_surah: u16, next_ayah: u16 },
    FetchVerseFailed { error: String },
    PreparedMessage { preview: String },
    PostedToTelegram { surah: u16, ayah: u16 },
    TelegramPostFailed { error: String },
    StateSaveFailed { error: String },
    StateCommitted,
    StateCommitFailed { error: String },
}

/// Record of a single execution.
#[derive(Debug, Clone, Serialize)]
pub struct RunLog {
    pub timestamp: DateTime<Local>,
    pub steps: Vec<RunStep>,
    pub success: bool,
}

impl RunLog {
    /// Starts a log stamped with the current local time.
    #[must_use]
    pub fn start() -> Self {
        Self {
            timestamp: Local::now(),
            steps: Vec::new(),
            success: false,
        }
    }

    /// Appends a step.
    pub fn push(&mut self, step: RunStep) {
        self.steps.push(step);
    }

    /// File name for this run, `run_YYYYmmdd_HHMMSS.json`.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("run_{}.json", self.timestamp.format("%Y%m%d_%H%M%S"))
    }
}

/// Writes run logs into a directory, creating it on demand.
#[derive(Debug, Clone)]
pub struct RunLogWriter {
    dir: PathBuf,
}

impl RunLogWriter {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes `log` and returns the file path.
    pub fn write(&self, log: &RunLog) -> Result<PathBuf, StateError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(log.file_name());
        std::fs::write(&path, serde_json::to_string_pretty(log)?)?;
        info!("Run log saved: {}", path.display());
        Ok(path)
    }
}

/// Truncates a string to [`PREVIEW_CHARS`] characters.
#[must_use]
pub fn preview(s: &str) -> String {
    s.chars().take(PREVIEW_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_step_serialization() {
        let step = RunStep::LoadedState { surah: 2, ayah: 74 };
        let json = serde_json::to_value(&step).unwrap();
        assert_eq!(json, serde_json::json!({ "step": "loaded_state", "surah": 2, "ayah": 74 }));

        let json = serde_json::to_value(RunStep::StateCommitted).unwrap();
        assert_eq!(json, serde_json::json!({ "step": "state_committed" }));
    }

    #[test]
    fn test_file_name_uses_timestamp() {
        let mut log = RunLog::start();
        log.timestamp = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(log.file_name(), "run_20240309_070501.json");
    }

    #[test]
    fn test_write_creates_directory() {
        let dir = TempDir::new().unwrap();
        let writer = RunLogWriter::new(dir.path().join("logs"));
        let mut log = RunLog::start();
        log.push(RunStep::FetchVerseFailed { error: "timeout".to_owned() });

        let path = writer.write(&log).unwrap();
        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(raw["success"], false);
        assert_eq!(raw["steps"][0]["step"], "fetch_verse_failed");
    }

    #[test]
    fn test_preview_counts_chars() {
        let long = "آ".repeat(200);
        assert_eq!(preview(&long).chars().count(), PREVIEW_CHARS);
        assert_eq!(preview("short"), "short");
    }
}
