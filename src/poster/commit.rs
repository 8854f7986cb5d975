//! Best-effort publication of the state file to a git remote.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

use crate::quran::VerseRef;

/// Errors from committing or pushing the state file.
#[derive(Debug, Error)]
pub enum CommitError {
    #[error("Failed to run git: {0}")]
    Io(#[from] std::io::Error),

    #[error("git {command} failed: {stderr}")]
    Git { command: String, stderr: String },
}

/// Publishes the state file after a successful post.
#[async_trait]
pub trait StateCommitter: Send + Sync {
    /// Returns `Ok(false)` when committing is disabled.
    async fn commit(&self, state_path: &Path, verse: VerseRef) -> Result<bool, CommitError>;
}

/// Committer used when `COMMIT_STATE` is off.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCommitter;

#[async_trait]
impl StateCommitter for NoopCommitter {
    async fn commit(&self, _state_path: &Path, _verse: VerseRef) -> Result<bool, CommitError> {
        Ok(false)
    }
}

/// Runs `git add`, `git commit` and `git push` for the state file, from
/// the directory containing it.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitCommitter;

impl GitCommitter {
    async fn git(dir: &Path, args: &[&str]) -> Result<(), CommitError> {
        debug!("git {}", args.join(" "));
        let output = Command::new("git").args(args).current_dir(dir).output().await?;
        if output.status.success() {
            Ok(())
        } else {
            Err(CommitError::Git {
                command: args.first().copied().unwrap_or_default().to_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            })
        }
    }
}

/// Commit message for a posted verse.
#[must_use]
pub fn commit_message(verse: VerseRef) -> String {
    format!("Update verse state: Surah {} Ayah {}", verse.surah, verse.ayah)
}

#[async_trait]
impl StateCommitter for GitCommitter {
    async fn commit(&self, state_path: &Path, verse: VerseRef) -> Result<bool, CommitError> {
        let dir = state_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        let file = state_path.file_name().map_or_else(
            || state_path.to_string_lossy().into_owned(),
            |f| f.to_string_lossy().into_owned(),
        );

        Self::git(&dir, &["add", &file]).await?;
        Self::git(&dir, &["commit", "-m", &commit_message(verse)]).await?;
        Self::git(&dir, &["push"]).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::process::Command as StdCommand;

    use tempfile::TempDir;

    use super::*;

    fn init_git_repo(dir: &Path) {
        for args in [
            vec!["init", "--initial-branch=main"],
            vec!["config", "user.email", "test@test.local"],
            vec!["config", "user.name", "Test User"],
        ] {
            StdCommand::new("git").args(&args).current_dir(dir).output().unwrap();
        }
    }

    #[test]
    fn test_commit_message() {
        assert_eq!(
            commit_message(VerseRef { surah: 2, ayah: 75 }),
            "Update verse state: Surah 2 Ayah 75"
        );
    }

    #[tokio::test]
    async fn test_noop_committer() {
        let committed = NoopCommitter
            .commit(Path::new("state.json"), VerseRef { surah: 1, ayah: 1 })
            .await
            .unwrap();
        assert!(!committed);
    }

    #[tokio::test]
    async fn test_git_committer_commits_then_fails_push_without_remote() {
        let dir = TempDir::new().unwrap();
        init_git_repo(dir.path());
        let state = dir.path().join("state.json");
        std::fs::write(&state, r#"{"last_surah": 1, "last_ayah": 1}"#).unwrap();

        let result = GitCommitter
            .commit(&state, VerseRef { surah: 1, ayah: 1 })
            .await;
        assert!(matches!(result, Err(CommitError::Git { ref command, .. }) if command == "push"));

        let log = StdCommand::new("git")
            .args(["log", "--format=%s"])
            .current_dir(dir.path())
            .output()
            .unwrap();
        assert_eq!(
            String::from_utf8_lossy(&log.stdout).trim(),
            "Update verse state: Surah 1 Ayah 1"
        );
    }
}
