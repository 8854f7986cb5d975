//! Standalone checker for verse references.
//!
//! Shows what a chat message would resolve to, and optionally which verse
//! would be posted next, without publishing anything or touching state.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;

use quran_verse_poster::quran::{QuranClient, compute_next};
use quran_verse_poster::resolver::{normalize_digits, parse_verse_reference};

/// Verse reference checker.
#[derive(Parser, Debug)]
#[command(name = "resolve_reference")]
#[command(about = "Checks which Quran verse a message refers to")]
#[command(version)]
struct Args {
    /// Message text to resolve.
    #[arg(required = true)]
    text: Vec<String>,

    /// Also compute the verse that would be posted next (queries the Quran API).
    #[arg(long)]
    with_next: bool,

    /// Quran API base URL.
    #[arg(long, env = "QURAN_API_BASE", default_value = "https://api.alquran.cloud/v1")]
    api_base: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    let text = args.text.join(" ");

    println!("Input:      {text}");
    println!("Normalized: {}", normalize_digits(&text));

    let Some(verse) = parse_verse_reference(&text) else {
        println!("✗ No verse reference found");
        return ExitCode::FAILURE;
    };
    println!("✓ Resolved: Surah {}, Ayah {}", verse.surah, verse.ayah);

    if args.with_next {
        let client = match QuranClient::new(args.api_base, Duration::from_secs(10)) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("✗ Failed to build Quran API client: {e}");
                return ExitCode::FAILURE;
            }
        };
        let next = compute_next(&client, verse.surah, verse.ayah).await;
        println!("  Next post: Surah {}, Ayah {}", next.surah, next.ayah);
    }

    ExitCode::SUCCESS
}
