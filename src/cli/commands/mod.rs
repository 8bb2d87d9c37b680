//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `number`: Rename files in a library
//! - `classify`: Report how each directory would be handled
//! - `settings`: Show or create the config file

mod classify;
mod number;
mod settings;

use anyhow::bail;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::config::Config;

pub use classify::cmd_classify;
pub use number::cmd_run;
pub use settings::cmd_config;

/// Track numberer CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true, env = "TRACK_NUMBERER_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Prefix file names with their track numbers
    Run {
        /// Library root (defaults to library.music_dir from the config)
        path: Option<PathBuf>,
        /// Dry run - show what would be done without renaming files
        #[arg(long)]
        dry_run: bool,
        /// Summary format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show how each directory would be handled, without renaming
    Classify {
        /// Library root (defaults to library.music_dir from the config)
        path: Option<PathBuf>,
        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show the effective configuration
    Config {
        /// Write a default config file if none exists
        #[arg(long)]
        init: bool,
    },
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli, config: &Config) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Run {
            path,
            dry_run,
            format,
        } => {
            let root = music_dir(path.as_deref(), config)?;
            cmd_run(&root, config, *dry_run, format)
        }
        Commands::Classify { path, format } => {
            let root = music_dir(path.as_deref(), config)?;
            cmd_classify(&root, config, format)
        }
        Commands::Config { init } => cmd_config(cli.config.as_deref(), config, *init),
    }
}

/// The library root: the command-line path if given, else the configured
/// one.
fn music_dir(path: Option<&Path>, config: &Config) -> anyhow::Result<PathBuf> {
    let Some(root) = path.or(config.library.music_dir.as_deref()) else {
        bail!("No music directory given; pass a PATH or set library.music_dir in the config");
    };
    if !root.is_dir() {
        bail!("Music directory {:?} does not exist or is not a directory", root);
    }
    Ok(root.to_path_buf())
}
