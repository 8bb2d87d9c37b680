//! Command-line interface for track-numberer.
//!
//! Provides commands to number a library, preview how its directories are
//! classified, and inspect the configuration.

mod commands;

pub use commands::{Cli, Commands, run_command};
