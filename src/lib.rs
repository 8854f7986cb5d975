//! Quran Verse Poster Library
//!
//! A scheduled Telegram poster that publishes the Quran one verse per run.
//!
//! This crate provides the core functionality for:
//! - Persisting the last posted verse between runs
//! - Reading verse references from the latest chat message (text, caption, or OCR)
//! - Computing the next verse in canonical order
//! - Fetching verse text from a Quran API and posting it to Telegram

pub mod config;
pub mod ocr;
pub mod poster;
pub mod quran;
pub mod resolver;
pub mod state;
pub mod telegram;
