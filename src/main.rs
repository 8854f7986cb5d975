//! Quran Verse Poster - Main Entry Point
//!
//! Posts the next Quran verse to a Telegram chat and exits. Intended to be
//! invoked by an external scheduler, e.g. once a day.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use quran_verse_poster::config::{PosterSettings, TelegramConfig};
use quran_verse_poster::ocr::TesseractOcr;
use quran_verse_poster::poster::{
    DailyPoster, GitCommitter, NoopCommitter, PosterServices, StateCommitter,
};
use quran_verse_poster::quran::QuranClient;
use quran_verse_poster::resolver::{GeminiIdentifier, VerseIdentifier, VerseResolver};
use quran_verse_poster::state::{RunLogWriter, StateStore};
use quran_verse_poster::telegram::TelegramClient;

/// Posts the next Quran verse to Telegram.
#[derive(Parser, Debug)]
#[command(name = "quran_poster")]
#[command(about = "Post the next Quran verse to a Telegram chat")]
#[command(version)]
struct Args {
    /// Path to the .env file for environment variables.
    #[arg(long, default_value = ".env")]
    env_file: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    init_logging(&args.log_level);

    // Load environment variables
    if let Err(e) = dotenvy::from_filename(&args.env_file) {
        debug!("Could not load .env file ({}): {}", args.env_file, e);
    }

    // Missing credentials end the run before anything is touched
    let tg_config = match TelegramConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Telegram credentials not configured: {}", e);
            return Ok(());
        }
    };

    let settings = PosterSettings::from_env_with_defaults();
    debug!("Settings: {:?}", settings);

    let telegram = Arc::new(
        TelegramClient::new(tg_config, settings.http_timeout())
            .context("Failed to build Telegram client")?,
    );
    let quran = Arc::new(
        QuranClient::new(settings.quran_api_base.clone(), settings.http_timeout())
            .context("Failed to build Quran API client")?,
    );

    let resolver = match &settings.gemini_api_key {
        Some(key) => {
            let gemini: Arc<dyn VerseIdentifier> = Arc::new(
                GeminiIdentifier::new(key.clone(), settings.gemini_model.clone(), settings.http_timeout())
                    .context("Failed to build Gemini client")?,
            );
            info!("AI verse identification enabled ({})", settings.gemini_model);
            VerseResolver::new(gemini)
        }
        None => VerseResolver::local_only(),
    };

    let committer: Arc<dyn StateCommitter> = if settings.commit_state {
        Arc::new(GitCommitter)
    } else {
        Arc::new(NoopCommitter)
    };

    let services = PosterServices {
        messages: telegram.clone(),
        publisher: telegram,
        verses: quran,
        ocr: Arc::new(TesseractOcr::new(
            settings.ocr_command.clone(),
            settings.ocr_lang.clone(),
        )),
        resolver,
        committer,
    };

    let poster = DailyPoster::new(
        services,
        StateStore::new(settings.state_path.clone()),
        RunLogWriter::new(settings.logs_dir.clone()),
    );

    let outcome = poster.run_once().await;
    if outcome.is_success() {
        info!("Run finished successfully");
    } else {
        error!("Run finished without posting: {:?}", outcome);
    }

    Ok(())
}

/// Initializes the logging subsystem.
fn init_logging(level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
