//! Text extraction from photos.
//!
//! The live engine pipes image bytes through the `tesseract` CLI.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Upper bound on a single OCR invocation.
const OCR_TIMEOUT: Duration = Duration::from_secs(60);

/// Errors that can occur during OCR.
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("OCR is disabled")]
    Disabled,

    #[error("Failed to run OCR command: {0}")]
    Io(#[from] std::io::Error),

    #[error("OCR command failed: {0}")]
    Failed(String),

    #[error("OCR timed out after {0:?}")]
    TimedOut(Duration),
}

/// Extracts text from image bytes.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    async fn extract_text(&self, image: &[u8]) -> Result<String, OcrError>;
}

/// Engine used when OCR is unavailable.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledOcr;

#[async_trait]
impl OcrEngine for DisabledOcr {
    async fn extract_text(&self, _image: &[u8]) -> Result<String, OcrError> {
        Err(OcrError::Disabled)
    }
}

/// `tesseract stdin stdout -l <lang>`.
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    command: String,
    lang: String,
}

impl TesseractOcr {
    #[must_use]
    pub fn new(command: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            lang: lang.into(),
        }
    }

    async fn run(&self, image: &[u8]) -> Result<String, OcrError> {
        let mut child = Command::new(&self.command)
            .args(["stdin", "stdout", "-l", &self.lang])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(image).await?;
            drop(stdin);
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::Failed(stderr.trim().to_owned()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_owned())
    }
}

#[async_trait]
impl OcrEngine for TesseractOcr {
    async fn extract_text(&self, image: &[u8]) -> Result<String, OcrError> {
        let text = tokio::time::timeout(OCR_TIMEOUT, self.run(image))
            .await
            .map_err(|_| OcrError::TimedOut(OCR_TIMEOUT))??;

        debug!(
            "OCR extracted (cut): {}",
            text.chars().take(120).collect::<String>()
        );
        Ok(text)
    }
}
