//! Poster settings and Telegram configuration.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Telegram Bot API configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot token issued by `@BotFather`.
    pub bot_token: String,

    /// Chat (or channel) the bot reads overrides from and posts verses to.
    pub chat_id: String,

    /// Base URL of the Bot API.
    #[serde(default = "default_telegram_api_base")]
    pub api_base: String,
}

fn default_telegram_api_base() -> String {
    "https://api.telegram.org".to_owned()
}

impl TelegramConfig {
    /// Creates a new Telegram configuration.
    #[must_use]
    pub fn new(bot_token: String, chat_id: String) -> Self {
        Self {
            bot_token,
            chat_id,
            api_base: default_telegram_api_base(),
        }
    }

    /// Creates configuration from environment variables.
    ///
    /// Expects `TELEGRAM_BOT_TOKEN` and `TELEGRAM_CHAT_ID` to be set.
    ///
    /// # Errors
    ///
    /// Returns an error if either variable is missing or empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bot_token = required_var("TELEGRAM_BOT_TOKEN")?;
        let chat_id = required_var("TELEGRAM_CHAT_ID")?;

        let api_base = std::env::var("TELEGRAM_API_BASE")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(default_telegram_api_base);

        Ok(Self {
            bot_token,
            chat_id,
            api_base,
        })
    }
}

impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .field("api_base", &self.api_base)
            .finish()
    }
}

fn required_var(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .ok_or(ConfigError::MissingEnvVar(name))
}

/// Poster settings, all with usable defaults.
#[derive(Clone, Serialize, Deserialize)]
pub struct PosterSettings {
    /// Base URL of the Quran content API.
    #[serde(default = "default_quran_api_base")]
    pub quran_api_base: String,

    /// Path of the persisted last-posted verse.
    #[serde(default = "default_state_path")]
    pub state_path: PathBuf,

    /// Directory receiving one JSON run log per execution.
    #[serde(default = "default_logs_dir")]
    pub logs_dir: PathBuf,

    /// Gemini API key. When absent the AI fallback is disabled.
    #[serde(default)]
    pub gemini_api_key: Option<String>,

    /// Gemini model used for verse identification.
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,

    /// OCR executable (tesseract compatible).
    #[serde(default = "default_ocr_command")]
    pub ocr_command: String,

    /// OCR language pack.
    #[serde(default = "default_ocr_lang")]
    pub ocr_lang: String,

    /// Commit and push the state file after a successful post.
    #[serde(default)]
    pub commit_state: bool,

    /// Timeout for fetch calls in seconds.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,
}

fn default_quran_api_base() -> String {
    "https://api.alquran.cloud/v1".to_owned()
}

fn default_state_path() -> PathBuf {
    PathBuf::from("state.json")
}

fn default_logs_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash".to_owned()
}

fn default_ocr_command() -> String {
    "tesseract".to_owned()
}

fn default_ocr_lang() -> String {
    "ara".to_owned()
}

fn default_http_timeout() -> u64 {
    10
}

/// Timeout used when publishing to Telegram.
pub const PUBLISH_TIMEOUT: Duration = Duration::from_secs(15);

impl Default for PosterSettings {
    fn default() -> Self {
        Self {
            quran_api_base: default_quran_api_base(),
            state_path: default_state_path(),
            logs_dir: default_logs_dir(),
            gemini_api_key: None,
            gemini_model: default_gemini_model(),
            ocr_command: default_ocr_command(),
            ocr_lang: default_ocr_lang(),
            commit_state: false,
            http_timeout_secs: default_http_timeout(),
        }
    }
}

impl PosterSettings {
    /// Creates poster settings from environment variables with defaults.
    #[must_use]
    pub fn from_env_with_defaults() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|s| !s.trim().is_empty());

        Self {
            quran_api_base: var("QURAN_API_BASE")
                .map_or_else(default_quran_api_base, |s| s.trim_end_matches('/').to_owned()),
            state_path: var("STATE_PATH").map_or_else(default_state_path, PathBuf::from),
            logs_dir: var("LOGS_DIR").map_or_else(default_logs_dir, PathBuf::from),
            gemini_api_key: var("GEMINI_API_KEY"),
            gemini_model: var("GEMINI_MODEL").unwrap_or_else(default_gemini_model),
            ocr_command: var("OCR_COMMAND").unwrap_or_else(default_ocr_command),
            ocr_lang: var("OCR_LANG").unwrap_or_else(default_ocr_lang),
            commit_state: var("COMMIT_STATE").is_some_and(|s| parse_flag(&s)),
            http_timeout_secs: var("HTTP_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_http_timeout),
        }
    }

    /// Timeout applied to every fetch call.
    #[must_use]
    pub const fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

impl fmt::Debug for PosterSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PosterSettings")
            .field("quran_api_base", &self.quran_api_base)
            .field("state_path", &self.state_path)
            .field("logs_dir", &self.logs_dir)
            .field("gemini_enabled", &self.gemini_api_key.is_some())
            .field("gemini_model", &self.gemini_model)
            .field("ocr_command", &self.ocr_command)
            .field("ocr_lang", &self.ocr_lang)
            .field("commit_state", &self.commit_state)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .finish()
    }
}

/// Parses a boolean-ish environment flag.
fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = PosterSettings::default();
        assert_eq!(settings.quran_api_base, "https://api.alquran.cloud/v1");
        assert_eq!(settings.state_path, PathBuf::from("state.json"));
        assert_eq!(settings.logs_dir, PathBuf::from("logs"));
        assert!(settings.gemini_api_key.is_none());
        assert!(!settings.commit_state);
        assert_eq!(settings.http_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_telegram_config_new() {
        let config = TelegramConfig::new("123:abc".to_owned(), "-10042".to_owned());
        assert_eq!(config.chat_id, "-10042");
        assert_eq!(config.api_base, "https://api.telegram.org");
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = TelegramConfig::new("123:secret".to_owned(), "1".to_owned());
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag(" YES "));
        assert!(parse_flag("1"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("maybe"));
    }
}
