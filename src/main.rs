//! Companions - find subtitle and audio tracks next to media files
//!
//! `companions detect <file>` prints the companions found for one media
//! file; `companions list <dir>` prints a directory as a playlist with
//! companions attached. Output is JSON on stdout, logs go to stderr.

mod cli;

use anyhow::{Context, Result};

use librarian_companions::config::Config;
use librarian_companions::services::logging::init_tracing;
use librarian_companions::services::{detect, list_directory, AsciiCollator, WalkDirReader};

use crate::cli::{CliOptions, Command};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let options = CliOptions::from_args()?;
    init_tracing(options.log_format)?;

    let config = Config::from_env();
    tracing::debug!(?config, "Configuration loaded");

    let reader = WalkDirReader::default();

    let output = match options.command {
        Command::Detect {
            media_path,
            show_rejected,
        } => {
            let request = config.search_request(&media_path);
            let mut detection = detect(&request, &reader).with_context(|| {
                format!("Companion detection failed for {}", media_path.display())
            })?;
            tracing::info!(
                media = %media_path.display(),
                found = detection.candidates.len(),
                rejected = detection.rejected.len(),
                "Companion detection complete"
            );
            if !show_rejected {
                detection.rejected.clear();
            }
            serde_json::to_string_pretty(&detection)?
        }
        Command::List { dir } => {
            let playlist = list_directory(&dir, &reader, &config.listing_options(), &AsciiCollator)
                .with_context(|| format!("Unable to read directory {}", dir.display()))?;
            tracing::info!(
                dir = %dir.display(),
                items = playlist.items.len(),
                "Directory listing complete"
            );
            serde_json::to_string_pretty(&playlist)?
        }
    };

    println!("{}", output);
    Ok(())
}
