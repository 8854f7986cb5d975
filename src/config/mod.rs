//! Configuration module for the verse poster.
//!
//! Handles loading Telegram credentials and poster settings from the
//! environment.

mod settings;

pub use settings::{ConfigError, PUBLISH_TIMEOUT, PosterSettings, TelegramConfig};
