//! Classification report command.

use anyhow::bail;
use std::path::Path;

use crate::classifier::FileRenameClassifier;
use crate::config::Config;
use crate::library;
use crate::metadata::LoftyTagReader;
use crate::organizer::DryRunRenamer;

/// Print how each directory below `root` would be handled
pub fn cmd_classify(root: &Path, config: &Config, format: &str) -> anyhow::Result<()> {
    let classifier =
        FileRenameClassifier::with_rules(LoftyTagReader, DryRunRenamer::new(), &config.rules)?;
    let reports = library::classify_library(root, &classifier, &config.library.extension)?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&reports)?),
        "text" => {
            for report in &reports {
                let rel = report.path.strip_prefix(root).unwrap_or(&report.path);
                println!(
                    "{:<16} {:>4}  {}",
                    report.classification.to_string(),
                    report.files,
                    rel.display()
                );
            }
            println!("\n{} directories", reports.len());
        }
        other => bail!("Unknown format {:?} (expected text or json)", other),
    }
    Ok(())
}
