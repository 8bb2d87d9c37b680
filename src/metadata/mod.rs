//! Audio file metadata reading.
//!
//! Uses the lofty crate for format-independent tag access. The classifier
//! only ever needs the track number, so that is the one field exposed
//! through [`TagReader`].

use anyhow::{Context, Result};
use lofty::file::TaggedFileExt;
use lofty::probe::Probe;
use lofty::tag::Accessor;
use std::path::Path;

/// Source of embedded track numbers.
///
/// Implement this trait to substitute in-memory tag data in tests.
pub trait TagReader {
    /// Track number stored in the file's tags.
    ///
    /// `None` when the tag is absent, zero, or the file cannot be read.
    fn track_number(&self, path: &Path) -> Option<u32>;
}

impl<T: TagReader + ?Sized> TagReader for &T {
    fn track_number(&self, path: &Path) -> Option<u32> {
        (**self).track_number(path)
    }
}

/// Reads track numbers from the file's primary tag (ID3v2 for MP3).
#[derive(Debug, Clone, Copy, Default)]
pub struct LoftyTagReader;

impl TagReader for LoftyTagReader {
    fn track_number(&self, path: &Path) -> Option<u32> {
        match read_track_number(path) {
            Ok(track) => track.filter(|&n| n > 0),
            Err(e) => {
                tracing::warn!("Failed to read tags from {:?}: {:#}", path, e);
                None
            }
        }
    }
}

/// Probe the file and return the track number of its primary tag, falling
/// back to the first tag found.
pub fn read_track_number(path: &Path) -> Result<Option<u32>> {
    let tagged_file = Probe::open(path)
        .context("Failed to open file for probing")?
        .read()
        .context("Failed to read file metadata")?;

    let tag = tagged_file
        .primary_tag()
        .or_else(|| tagged_file.first_tag());

    Ok(tag.and_then(|t| t.track()))
}
