use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::Result;

/// Lists every directory below `root`, recursively, excluding `root` itself.
///
/// Entries are sorted by name within each directory so runs are
/// reproducible. Any traversal error aborts the listing.
pub fn directories(root: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_dir() {
            dirs.push(entry.into_path());
        }
    }
    Ok(dirs)
}

/// Lists the files directly inside `dir` with the given extension
/// (case-insensitive), sorted by name. Symlinks to files are included.
pub fn audio_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        // path().is_file() follows symlinks, file_type() does not
        if entry.path().is_file() && has_extension(entry.path(), extension) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Checks the extension case-insensitively; a leading dot in `extension`
/// is ignored.
pub fn has_extension(path: &Path, extension: &str) -> bool {
    let wanted = extension.trim_start_matches('.');
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(wanted))
}
