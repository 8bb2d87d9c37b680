//! File renaming.
//!
//! Provides the [`FileRenamer`] capability the classifier renames through,
//! a real filesystem implementation, and a dry-run implementation that only
//! reports what would change.
//!
//! # Features
//! - Same-directory renames that never overwrite an existing file
//! - Preview mode to see changes before applying
//! - Per-file [`RenameOutcome`] records for reporting

use crate::error::{Error, Result};
use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Renames a file to a new base name inside its current directory.
pub trait FileRenamer {
    /// Rename `path` to `new_name` and return the resulting path.
    ///
    /// Fails when the target already exists or the filesystem refuses.
    fn rename_file(&self, path: &Path, new_name: &str) -> Result<PathBuf>;
}

impl<R: FileRenamer + ?Sized> FileRenamer for &R {
    fn rename_file(&self, path: &Path, new_name: &str) -> Result<PathBuf> {
        (**self).rename_file(path, new_name)
    }
}

/// Renames files on disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsRenamer;

impl FileRenamer for FsRenamer {
    fn rename_file(&self, path: &Path, new_name: &str) -> Result<PathBuf> {
        let target = renamed_path(path, new_name)?;

        // fs::rename silently replaces the target on Unix
        if target.exists() {
            return Err(Error::TargetExists(target));
        }

        fs::rename(path, &target).map_err(|e| Error::rename(path, &target, e))?;
        Ok(target)
    }
}

/// Reports the rename without touching the file.
///
/// Remembers the renames it has reported, so a later file claiming the same
/// target fails the way it would on disk, and a name vacated by an earlier
/// rename counts as free.
#[derive(Debug, Default)]
pub struct DryRunRenamer {
    claimed: RefCell<HashSet<PathBuf>>,
    vacated: RefCell<HashSet<PathBuf>>,
}

impl DryRunRenamer {
    pub fn new() -> Self {
        Self::default()
    }

    fn is_taken(&self, target: &Path) -> bool {
        self.claimed.borrow().contains(target)
            || (target.exists() && !self.vacated.borrow().contains(target))
    }
}

impl FileRenamer for DryRunRenamer {
    fn rename_file(&self, path: &Path, new_name: &str) -> Result<PathBuf> {
        let target = renamed_path(path, new_name)?;
        if self.is_taken(&target) {
            return Err(Error::TargetExists(target));
        }

        self.claimed.borrow_mut().remove(path);
        self.vacated.borrow_mut().insert(path.to_path_buf());
        self.vacated.borrow_mut().remove(&target);
        self.claimed.borrow_mut().insert(target.clone());

        tracing::info!("WOULD RENAME: {:?} -> {:?}", path, target);
        Ok(target)
    }
}

/// Path `path` would have after being renamed to `new_name`.
pub fn renamed_path(path: &Path, new_name: &str) -> Result<PathBuf> {
    if new_name.is_empty() || new_name.contains(['/', '\\']) {
        return Err(Error::invalid_file_name(new_name));
    }
    let dir = path
        .parent()
        .ok_or_else(|| Error::invalid_file_name(path))?;
    Ok(dir.join(new_name))
}

/// Base name of `path` as UTF-8, if it has one.
pub fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}

/// Why a file was left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No track number in the tags
    MissingTrackNumber,
    /// Bandcamp download whose name lacks the ` - NN Title.mp3` tail
    NoBandcampMatch,
    /// Name is not valid UTF-8
    UnreadableName,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTrackNumber => write!(f, "file is missing track number"),
            Self::NoBandcampMatch => write!(f, "name does not match bandcamp pattern"),
            Self::UnreadableName => write!(f, "file name is not valid UTF-8"),
        }
    }
}

/// What happened to a single file during a rename pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    Renamed { from: PathBuf, to: PathBuf },
    Skipped { path: PathBuf, reason: SkipReason },
}

impl RenameOutcome {
    pub fn is_renamed(&self) -> bool {
        matches!(self, Self::Renamed { .. })
    }
}
