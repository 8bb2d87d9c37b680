//! Track Numberer - prefix MP3 file names with their track numbers.
//!
//! Walks a music library, skips directories that are excluded or already
//! numbered, cleans up bandcamp download names, and renames everything else
//! to `NN-Title.mp3` using the track number stored in the file's tags.

pub mod classifier;
pub mod cli;
pub mod config;
pub mod error;
pub mod library;
pub mod metadata;
pub mod organizer;
pub mod scanner;
#[cfg(test)]
pub mod test_utils;

use anyhow::Context;
use clap::Parser;
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Explicit config must load; a broken default one falls back to defaults
    let (config, config_error) = match &args.config {
        Some(path) => (config::load_from(path)?, None),
        None => match config::load_default() {
            Ok(config) => (config, None),
            Err(e) => (config::Config::default(), Some(e)),
        },
    };

    if let Some(output_file) = &config.logging.output_file {
        eprintln!("Console logs will be written to {}", output_file.display());
    }
    init_logging(config.logging.output_file.as_deref())?;

    if let Some(e) = config_error {
        tracing::error!("{}", e);
        tracing::warn!("Using default configuration");
    }

    cli::run_command(&args, &config)
}

/// Initialize logging to the terminal, or to `output_file` when set.
fn init_logging(output_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = EnvFilter::from_default_env().add_directive("track_numberer=info".parse()?);
    let registry = tracing_subscriber::registry().with(filter);

    match output_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file: {:?}", path))?;
            registry
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .init();
        }
        None => registry.with(fmt::layer().with_target(true)).init(),
    }
    Ok(())
}
