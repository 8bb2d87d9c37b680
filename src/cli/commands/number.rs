//! Library numbering command.

use anyhow::bail;
use std::path::Path;

use crate::classifier::FileRenameClassifier;
use crate::config::Config;
use crate::library::{self, LibrarySummary};
use crate::metadata::LoftyTagReader;
use crate::organizer::{DryRunRenamer, FileRenamer, FsRenamer};

/// Number every directory below `root`
pub fn cmd_run(root: &Path, config: &Config, dry_run: bool, format: &str) -> anyhow::Result<()> {
    if !matches!(format, "text" | "json") {
        bail!("Unknown format {:?} (expected text or json)", format);
    }

    let summary = if dry_run {
        run_with(root, config, DryRunRenamer::new())?
    } else {
        run_with(root, config, FsRenamer)?
    };

    println!("{}", render_summary(&summary, format, dry_run)?);
    Ok(())
}

fn run_with<R: FileRenamer>(
    root: &Path,
    config: &Config,
    renamer: R,
) -> anyhow::Result<LibrarySummary> {
    let classifier = FileRenameClassifier::with_rules(LoftyTagReader, renamer, &config.rules)?;
    Ok(library::process_library(root, &classifier, &config.library.extension)?)
}

fn render_summary(summary: &LibrarySummary, format: &str, dry_run: bool) -> anyhow::Result<String> {
    if format == "json" {
        return Ok(serde_json::to_string_pretty(summary)?);
    }
    let banner = if dry_run {
        "[DRY RUN MODE - No files were renamed]\n\n"
    } else {
        ""
    };
    Ok(format!("{}{}", banner, summary))
}
