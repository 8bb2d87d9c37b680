//! Per-directory renaming decisions.
//!
//! [`FileRenameClassifier`] decides what to do with the mp3 files of one
//! directory and carries out the chosen rename:
//!
//! 1. [`skip_directory`](FileRenameClassifier::skip_directory): the path
//!    contains an excluded segment such as `__MACOSX`.
//! 2. [`is_bandcamp`](FileRenameClassifier::is_bandcamp): bandcamp downloads
//!    are cleaned up by [`fix_bandcamp_file_names`](FileRenameClassifier::fix_bandcamp_file_names),
//!    which strips the `Artist - Album - ` prefix.
//! 3. [`skip_files`](FileRenameClassifier::skip_files): the files already
//!    carry their track number.
//! 4. Otherwise [`prepend_number_to_files`](FileRenameClassifier::prepend_number_to_files)
//!    renames `Title.mp3` to `NN-Title.mp3` using the tagged track number.
//!
//! Path segments are matched exactly on either separator, so `BBBT2` is not
//! `BBBT` and Windows-style paths classify the same on every platform.

use regex::Regex;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::config::RulesConfig;
use crate::error::{Error, Result};
use crate::metadata::TagReader;
use crate::organizer::{FileRenamer, RenameOutcome, SkipReason, file_name};

/// Two digits then a space or hyphen at the very start of the name.
static LEADING_TRACK_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}[ -]").expect("valid regex"));

/// First two-digit group followed by a space or hyphen.
static EMBEDDED_TRACK_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{2})[ -]").expect("valid regex"));

/// `NN Title.mp3` tail following a ` - ` separator.
static BANDCAMP_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" - (\d{2} .+\.mp3)$").expect("valid regex"));

/// How a directory's files are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// Excluded directory, files not looked at
    SkipDirectory,
    /// Files already numbered
    SkipFiles,
    /// Bandcamp download needing prefix removal
    Bandcamp,
    /// Files get the track number prepended
    NeedsNumbering,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::SkipDirectory => "skip directory",
            Self::SkipFiles => "already numbered",
            Self::Bandcamp => "bandcamp",
            Self::NeedsNumbering => "needs numbering",
        };
        f.write_str(s)
    }
}

/// Regex matching any of `segments` as a whole path component.
///
/// Returns `None` when there is nothing to match.
fn segment_regex(segments: &[String]) -> Result<Option<Regex>> {
    let alternatives: Vec<String> = segments
        .iter()
        .filter(|s| !s.is_empty())
        .map(|s| regex::escape(s))
        .collect();
    if alternatives.is_empty() {
        return Ok(None);
    }

    let pattern = format!(r"(?:^|[/\\])(?:{})(?:[/\\]|$)", alternatives.join("|"));
    Regex::new(&pattern)
        .map(Some)
        .map_err(|e| Error::config(format!("invalid directory rule: {e}")))
}

/// Format a track number as at least two zero-padded digits.
///
/// Numbers of 100 and above keep all their digits.
pub fn format_track_number(track: u32) -> String {
    format!("{track:02}")
}

/// Decides and applies renames for one directory at a time.
///
/// Tag reading and renaming are delegated to the injected capabilities.
pub struct FileRenameClassifier<T, R> {
    tags: T,
    renamer: R,
    excluded_dirs: Option<Regex>,
    bandcamp_dir: Option<Regex>,
}

impl<T: TagReader, R: FileRenamer> FileRenameClassifier<T, R> {
    /// Classifier with the built-in directory rules.
    pub fn new(tags: T, renamer: R) -> Self {
        Self::with_rules(tags, renamer, &RulesConfig::default())
            .expect("default directory rules are valid")
    }

    /// Classifier using the configured directory rules.
    pub fn with_rules(tags: T, renamer: R, rules: &RulesConfig) -> Result<Self> {
        Ok(Self {
            tags,
            renamer,
            excluded_dirs: segment_regex(&rules.excluded_dirs)?,
            bandcamp_dir: segment_regex(std::slice::from_ref(&rules.bandcamp_dir))?,
        })
    }

    /// True if the directory contains an excluded path segment.
    pub fn skip_directory(&self, path: &Path) -> bool {
        matches_segment(self.excluded_dirs.as_ref(), path)
    }

    /// True if the directory lies under a bandcamp segment.
    pub fn is_bandcamp(&self, path: &Path) -> bool {
        matches_segment(self.bandcamp_dir.as_ref(), path)
    }

    /// True if the files already carry their track numbers and must not be
    /// renamed. An empty list is vacuously skipped.
    pub fn skip_files(&self, files: &[PathBuf]) -> bool {
        let names: Vec<Cow<'_, str>> = files.iter().map(|f| lossy_name(f)).collect();
        all_start_with_track_number(&names) || self.all_contain_track_number(files, &names)
    }

    /// Classify a directory and its mp3 files without renaming anything.
    ///
    /// Bandcamp directories are recognised before the numbering check so
    /// prefixed downloads get cleaned up even when the number they embed is
    /// already right.
    pub fn classify(&self, dir: &Path, files: &[PathBuf]) -> Classification {
        if self.skip_directory(dir) {
            Classification::SkipDirectory
        } else if self.is_bandcamp(dir) {
            Classification::Bandcamp
        } else if self.skip_files(files) {
            Classification::SkipFiles
        } else {
            Classification::NeedsNumbering
        }
    }

    /// Rename `Artist - Album - NN Title.mp3` to `NN Title.mp3`.
    ///
    /// Names that don't fit are skipped. A failed rename aborts the batch;
    /// renames already done are kept.
    pub fn fix_bandcamp_file_names(&self, files: &[PathBuf]) -> Result<Vec<RenameOutcome>> {
        let mut outcomes = Vec::with_capacity(files.len());

        for path in files {
            let Some(name) = file_name(path) else {
                outcomes.push(skipped(path, SkipReason::UnreadableName));
                continue;
            };
            let Some(new_name) = bandcamp_file_name(name) else {
                tracing::warn!("Skipping bandcamp file {}", name);
                outcomes.push(skipped(path, SkipReason::NoBandcampMatch));
                continue;
            };

            let to = self.renamer.rename_file(path, new_name)?;
            tracing::info!("Renamed {} to {}", name, new_name);
            outcomes.push(RenameOutcome::Renamed {
                from: path.clone(),
                to,
            });
        }

        Ok(outcomes)
    }

    /// Rename `Title.mp3` to `NN-Title.mp3` from the tagged track number.
    ///
    /// Files without a track number are skipped. A failed rename aborts the
    /// batch; renames already done are kept.
    pub fn prepend_number_to_files(&self, files: &[PathBuf]) -> Result<Vec<RenameOutcome>> {
        let mut outcomes = Vec::with_capacity(files.len());

        for path in files {
            let Some(name) = file_name(path) else {
                outcomes.push(skipped(path, SkipReason::UnreadableName));
                continue;
            };
            let Some(track) = self.tags.track_number(path) else {
                tracing::warn!("Skipping {}; file is missing track number", name);
                outcomes.push(skipped(path, SkipReason::MissingTrackNumber));
                continue;
            };

            let new_name = format!("{}-{}", format_track_number(track), name);
            let to = self.renamer.rename_file(path, &new_name)?;
            tracing::info!("Renamed {} to {}", name, new_name);
            outcomes.push(RenameOutcome::Renamed {
                from: path.clone(),
                to,
            });
        }

        Ok(outcomes)
    }

    /// Every name has a `NN ` or `NN-` group somewhere and the first one
    /// equals the file's tagged track number.
    fn all_contain_track_number(&self, files: &[PathBuf], names: &[Cow<'_, str>]) -> bool {
        let embedded: Option<Vec<&str>> = names
            .iter()
            .map(|name| {
                EMBEDDED_TRACK_NUMBER
                    .captures(name)
                    .and_then(|c| c.get(1))
                    .map(|m| m.as_str())
            })
            .collect();
        let Some(embedded) = embedded else {
            return false;
        };

        files.iter().zip(embedded).all(|(path, digits)| {
            let tagged = self.tags.track_number(path);
            digits.parse::<u32>().ok().is_some_and(|n| tagged == Some(n))
        })
    }
}

fn all_start_with_track_number(names: &[Cow<'_, str>]) -> bool {
    names.iter().all(|n| LEADING_TRACK_NUMBER.is_match(n))
}

/// The `NN Title.mp3` part of a bandcamp download name.
pub fn bandcamp_file_name(name: &str) -> Option<&str> {
    BANDCAMP_NAME
        .captures(name)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

fn matches_segment(rule: Option<&Regex>, path: &Path) -> bool {
    rule.is_some_and(|re| re.is_match(&path.to_string_lossy()))
}

fn lossy_name(path: &Path) -> Cow<'_, str> {
    path.file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or(Cow::Borrowed(""))
}

fn skipped(path: &Path, reason: SkipReason) -> RenameOutcome {
    RenameOutcome::Skipped {
        path: path.to_path_buf(),
        reason,
    }
}
