//! Persistent record of the last posted verse.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

use crate::quran::{SURAH_COUNT, VerseRef};

/// Errors that can occur reading or writing the state file.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("Failed to access state file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse state file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Stored surah {0} is outside 1..=114")]
    SurahOutOfRange(u16),
}

/// Last successfully posted verse.
///
/// `last_ayah` is 0 before anything has been posted, so the first run posts
/// the opening verse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosterState {
    #[serde(default = "default_surah")]
    pub last_surah: u16,
    #[serde(default)]
    pub last_ayah: u16,
}

const fn default_surah() -> u16 {
    1
}

impl Default for PosterState {
    fn default() -> Self {
        Self {
            last_surah: default_surah(),
            last_ayah: 0,
        }
    }
}

impl From<VerseRef> for PosterState {
    fn from(verse: VerseRef) -> Self {
        Self {
            last_surah: verse.surah,
            last_ayah: verse.ayah,
        }
    }
}

/// Reads and writes [`PosterState`] as pretty-printed JSON.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    /// Creates a store backed by `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the state file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the state file. `Ok(None)` when it does not exist.
    pub fn try_load(&self) -> Result<Option<PosterState>, StateError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let state: PosterState = serde_json::from_str(&raw)?;
        if !(1..=SURAH_COUNT).contains(&state.last_surah) {
            return Err(StateError::SurahOutOfRange(state.last_surah));
        }
        Ok(Some(state))
    }

    /// Loads state, falling back to the default when missing or unreadable.
    pub fn load(&self) -> PosterState {
        match self.try_load() {
            Ok(Some(state)) => state,
            Ok(None) => {
                info!("No state file at {}, starting from the beginning", self.path.display());
                PosterState::default()
            }
            Err(e) => {
                error!("Failed to read state file {}: {}", self.path.display(), e);
                PosterState::default()
            }
        }
    }

    /// Overwrites the state file.
    pub fn save(&self, state: &PosterState) -> Result<(), StateError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(state)?;
        std::fs::write(&self.path, json)?;
        info!("State saved: Surah {}, Ayah {}", state.last_surah, state.last_ayah);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_missing_file_defaults() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path().join("state.json"));
        assert!(store.try_load().unwrap().is_none());
        assert_eq!(store.load(), PosterState { last_surah: 1, last_ayah: 0 });
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path().join("nested").join("state.json"));
        let state = PosterState { last_surah: 2, last_ayah: 75 };
        store.save(&state).unwrap();
        assert_eq!(store.load(), state);

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"last_surah\": 2"));
        assert!(raw.contains("\"last_ayah\": 75"));
    }

    #[test]
    fn test_corrupt_file_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{ not json").unwrap();
        let store = StateStore::new(&path);
        assert!(matches!(store.try_load(), Err(StateError::Parse(_))));
        assert_eq!(store.load(), PosterState::default());
    }

    #[test]
    fn test_out_of_range_surah_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, r#"{"last_surah": 140, "last_ayah": 3}"#).unwrap();
        let store = StateStore::new(&path);
        assert!(matches!(store.try_load(), Err(StateError::SurahOutOfRange(140))));
        assert_eq!(store.load(), PosterState::default());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, r#"{"last_surah": 5}"#).unwrap();
        assert_eq!(
            StateStore::new(&path).load(),
            PosterState { last_surah: 5, last_ayah: 0 }
        );
    }
}
