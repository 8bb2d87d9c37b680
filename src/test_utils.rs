//! Test utilities and fixtures for track-numberer tests.
//!
//! Provides in-memory implementations of the [`TagReader`] and
//! [`FileRenamer`] capabilities so classifier tests never touch real audio
//! files, plus the file name fixtures shared between test modules.
//!
//! # Example
//!
//! ```ignore
//! let tags = FakeTagReader::new().with(&files[0], 1);
//! let renamer = RecordingRenamer::default();
//! let classifier = FileRenameClassifier::new(&tags, &renamer);
//! classifier.prepend_number_to_files(&files)?;
//! assert_eq!(renamer.renames(), vec![(files[0].clone(), "01-...".into())]);
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::metadata::TagReader;
use crate::organizer::{FileRenamer, renamed_path};

/// Tag reader backed by a path → track number map.
///
/// Paths without an entry report no track number.
#[derive(Debug, Default)]
pub struct FakeTagReader {
    tracks: HashMap<PathBuf, u32>,
}

impl FakeTagReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style helper to register a track number.
    pub fn with(mut self, path: impl Into<PathBuf>, track: u32) -> Self {
        self.tracks.insert(path.into(), track);
        self
    }

    /// Register `1..=n` for the given paths in order.
    pub fn numbered(paths: &[PathBuf]) -> Self {
        paths
            .iter()
            .zip(1u32..)
            .fold(Self::new(), |tags, (path, n)| tags.with(path.clone(), n))
    }
}

impl TagReader for FakeTagReader {
    fn track_number(&self, path: &Path) -> Option<u32> {
        self.tracks.get(path).copied().filter(|&n| n > 0)
    }
}

/// Renamer that records every call instead of touching the filesystem.
///
/// Targets listed via [`RecordingRenamer::with_existing`] fail with
/// [`Error::TargetExists`], mirroring the real renamer.
#[derive(Debug, Default)]
pub struct RecordingRenamer {
    calls: RefCell<Vec<(PathBuf, String)>>,
    existing: Vec<String>,
}

impl RecordingRenamer {
    pub fn with_existing(names: &[&str]) -> Self {
        Self {
            calls: RefCell::default(),
            existing: names.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Successful renames as `(original path, new base name)`.
    pub fn renames(&self) -> Vec<(PathBuf, String)> {
        self.calls.borrow().clone()
    }
}

impl FileRenamer for RecordingRenamer {
    fn rename_file(&self, path: &Path, new_name: &str) -> Result<PathBuf> {
        let target = renamed_path(path, new_name)?;
        if self.existing.iter().any(|n| n == new_name) {
            return Err(Error::TargetExists(target));
        }
        self.calls
            .borrow_mut()
            .push((path.to_path_buf(), new_name.to_string()));
        Ok(target)
    }
}

/// Build full paths for `names` inside `dir`.
pub fn paths_in(dir: &str, names: &[&str]) -> Vec<PathBuf> {
    names.iter().map(|n| Path::new(dir).join(n)).collect()
}

pub fn files_starting_with_track_numbers_and_spaces() -> Vec<PathBuf> {
    paths_in(
        "/music/Big Star/#1 Record-Radio City [Bonus Tracks]",
        &["01 Feel.mp3", "02 The Ballad of el Goodo.mp3"],
    )
}

pub fn files_starting_with_track_numbers_and_dashes() -> Vec<PathBuf> {
    paths_in(
        "/music/Buffalo Springfield/Buffalo Springfield [Collection]",
        &[
            "01-For What It's Worth.mp3",
            "02-Sit Down I Think I Love You.mp3",
            "03-Nowadays Clancy Can't Even Sing.mp3",
        ],
    )
}

pub fn files_containing_track_numbers() -> Vec<PathBuf> {
    paths_in(
        "/music/The Beths/Expert In A Dying Field",
        &[
            "The Beths - Expert In A Dying Field - 01 Expert In A Dying Field.mp3",
            "The Beths - Expert In A Dying Field - 02 Knees Deep.mp3",
        ],
    )
}

pub fn files_without_track_numbers() -> Vec<PathBuf> {
    paths_in(
        "/music/Buffalo Springfield/Buffalo Springfield [Collection]",
        &[
            "For What It's Worth.mp3",
            "Sit Down I Think I Love You.mp3",
            "Nowadays Clancy Can't Even Sing.mp3",
        ],
    )
}

pub fn bandcamp_files() -> Vec<PathBuf> {
    paths_in(
        "/music/bandcamp/Martha/Please Don't Take Me Back",
        &[
            "Martha - Please Don't Take Me Back - 01 Beat, Perpetual.mp3",
            "Martha - Please Don't Take Me Back - 02 Hope Gets Harder.mp3",
        ],
    )
}
