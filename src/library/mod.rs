//! Library-wide processing.
//!
//! Walks a music library one directory at a time and hands each directory's
//! mp3 files to the [`FileRenameClassifier`]. Processing is sequential and
//! stops at the first failed rename.

use serde::Serialize;
use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::classifier::{Classification, FileRenameClassifier};
use crate::error::{Result, ResultExt};
use crate::metadata::TagReader;
use crate::organizer::{FileRenamer, RenameOutcome};
use crate::scanner;

/// Totals for one pass over a library.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LibrarySummary {
    /// Directories skipped by name
    pub skipped_directories: usize,
    /// Directories whose files were already numbered
    pub already_numbered: usize,
    /// Bandcamp directories cleaned up
    pub bandcamp: usize,
    /// Directories whose files got track numbers
    pub numbered: usize,
    /// Files renamed (or that would be, in a dry run)
    pub files_renamed: usize,
    /// Files left alone inside processed directories
    pub files_skipped: usize,
}

impl LibrarySummary {
    fn record(&mut self, classification: Classification) {
        match classification {
            Classification::SkipDirectory => self.skipped_directories += 1,
            Classification::SkipFiles => self.already_numbered += 1,
            Classification::Bandcamp => self.bandcamp += 1,
            Classification::NeedsNumbering => self.numbered += 1,
        }
    }

    fn add_outcomes(&mut self, outcomes: &[RenameOutcome]) {
        let renamed = outcomes.iter().filter(|o| o.is_renamed()).count();
        self.files_renamed += renamed;
        self.files_skipped += outcomes.len() - renamed;
    }
}

impl fmt::Display for LibrarySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Directories skipped:          {}", self.skipped_directories)?;
        writeln!(f, "Directories already numbered: {}", self.already_numbered)?;
        writeln!(f, "Bandcamp directories:         {}", self.bandcamp)?;
        writeln!(f, "Directories numbered:         {}", self.numbered)?;
        writeln!(f, "Files renamed:                {}", self.files_renamed)?;
        write!(f, "Files skipped:                {}", self.files_skipped)
    }
}

/// Classification of a single directory, as reported by `classify`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryReport {
    pub path: PathBuf,
    pub classification: Classification,
    /// Number of matching files; 0 for skipped directories, whose files are
    /// never listed
    pub files: usize,
}

fn dir_name(dir: &Path) -> Cow<'_, str> {
    dir.file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_else(|| dir.to_string_lossy())
}

/// Number, clean up or skip every directory below `root`.
///
/// Directories without matching files are ignored. The first rename
/// failure is returned; earlier renames stay in place.
pub fn process_library<T: TagReader, R: FileRenamer>(
    root: &Path,
    classifier: &FileRenameClassifier<T, R>,
    extension: &str,
) -> Result<LibrarySummary> {
    let mut summary = LibrarySummary::default();

    for dir in scanner::directories(root)? {
        if classifier.skip_directory(&dir) {
            tracing::info!("Skipping {}", dir_name(&dir));
            summary.record(Classification::SkipDirectory);
            continue;
        }

        let files = scanner::audio_files(&dir, extension)?;
        if files.is_empty() {
            continue;
        }

        let classification = classifier.classify(&dir, &files);
        let outcomes = match classification {
            Classification::SkipDirectory => Ok(Vec::new()),
            Classification::Bandcamp => classifier.fix_bandcamp_file_names(&files),
            Classification::SkipFiles => {
                tracing::info!(
                    "Skipping {} {} files in {}",
                    files.len(),
                    extension,
                    dir_name(&dir)
                );
                Ok(Vec::new())
            }
            Classification::NeedsNumbering => {
                let outcomes = classifier.prepend_number_to_files(&files);
                if outcomes.is_ok() {
                    tracing::info!(
                        "Successfully processed {} {} files in {}",
                        files.len(),
                        extension,
                        dir_name(&dir)
                    );
                }
                outcomes
            }
        }
        .with_context(format!("processing {}", dir.display()))?;

        summary.record(classification);
        summary.add_outcomes(&outcomes);
    }

    Ok(summary)
}

/// Classify every directory below `root` without renaming anything.
pub fn classify_library<T: TagReader, R: FileRenamer>(
    root: &Path,
    classifier: &FileRenameClassifier<T, R>,
    extension: &str,
) -> Result<Vec<DirectoryReport>> {
    let mut reports = Vec::new();

    for dir in scanner::directories(root)? {
        if classifier.skip_directory(&dir) {
            reports.push(DirectoryReport {
                path: dir,
                classification: Classification::SkipDirectory,
                files: 0,
            });
            continue;
        }

        let files = scanner::audio_files(&dir, extension)?;
        if files.is_empty() {
            continue;
        }

        reports.push(DirectoryReport {
            classification: classifier.classify(&dir, &files),
            files: files.len(),
            path: dir,
        });
    }

    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::organizer::{DryRunRenamer, FsRenamer};
    use crate::test_utils::FakeTagReader;
    use std::fs::File;
    use tempfile::{TempDir, tempdir};

    /// A small library:
    ///
    /// ```text
    /// Alvvays/Alvvays/Archie, Marry Me.mp3        tag 2
    /// Alvvays/Alvvays/Adult Diversion.mp3         tag 1
    /// Alvvays/Alvvays/Untagged.mp3                no tag
    /// Amazon MP3/Belle And Sebastian/Dirty Dream Number Two.mp3
    /// bandcamp/Martha/Album/Martha - Album - 01 Beat, Perpetual.mp3
    /// Big Star/Radio City/01 O My Soul.mp3
    /// Big Star/Radio City/02 Life Is White.mp3
    /// Empty/notes.txt
    /// ```
    struct Library {
        dir: TempDir,
        tags: FakeTagReader,
    }

    impl Library {
        fn root(&self) -> &Path {
            self.dir.path()
        }

        fn path(&self, rel: &str) -> PathBuf {
            rel.split('/').fold(self.root().to_path_buf(), |p, s| p.join(s))
        }
    }

    fn library() -> Library {
        let dir = tempdir().unwrap();
        let files = [
            "Alvvays/Alvvays/Archie, Marry Me.mp3",
            "Alvvays/Alvvays/Adult Diversion.mp3",
            "Alvvays/Alvvays/Untagged.mp3",
            "Amazon MP3/Belle And Sebastian/Dirty Dream Number Two.mp3",
            "bandcamp/Martha/Album/Martha - Album - 01 Beat, Perpetual.mp3",
            "Big Star/Radio City/01 O My Soul.mp3",
            "Big Star/Radio City/02 Life Is White.mp3",
            "Empty/notes.txt",
        ];
        let mut lib = Library {
            dir,
            tags: FakeTagReader::new(),
        };
        for rel in files {
            let path = lib.path(rel);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            File::create(&path).unwrap();
        }
        lib.tags = FakeTagReader::new()
            .with(lib.path("Alvvays/Alvvays/Archie, Marry Me.mp3"), 2)
            .with(lib.path("Alvvays/Alvvays/Adult Diversion.mp3"), 1)
            .with(lib.path("Amazon MP3/Belle And Sebastian/Dirty Dream Number Two.mp3"), 5);
        lib
    }

    #[test]
    fn test_process_library_renames_and_skips() {
        let lib = library();
        let classifier = FileRenameClassifier::new(&lib.tags, FsRenamer);

        let summary = process_library(lib.root(), &classifier, "mp3").unwrap();

        assert_eq!(
            summary,
            LibrarySummary {
                skipped_directories: 2,
                already_numbered: 1,
                bandcamp: 1,
                numbered: 1,
                files_renamed: 3,
                files_skipped: 1,
            }
        );
        assert!(lib.path("Alvvays/Alvvays/02-Archie, Marry Me.mp3").exists());
        assert!(lib.path("Alvvays/Alvvays/01-Adult Diversion.mp3").exists());
        assert!(lib.path("Alvvays/Alvvays/Untagged.mp3").exists());
        assert!(lib.path("bandcamp/Martha/Album/01 Beat, Perpetual.mp3").exists());
        assert!(lib.path("Big Star/Radio City/01 O My Soul.mp3").exists());
        assert!(
            lib.path("Amazon MP3/Belle And Sebastian/Dirty Dream Number Two.mp3")
                .exists()
        );
    }

    #[test]
    fn test_process_library_second_run_renames_nothing() {
        let lib = library();
        std::fs::remove_file(lib.path("Alvvays/Alvvays/Untagged.mp3")).unwrap();
        let classifier = FileRenameClassifier::new(&lib.tags, FsRenamer);
        process_library(lib.root(), &classifier, "mp3").unwrap();

        let summary = process_library(lib.root(), &classifier, "mp3").unwrap();

        // the cleaned bandcamp name no longer fits and is reported as skipped
        assert_eq!(
            summary,
            LibrarySummary {
                skipped_directories: 2,
                already_numbered: 2,
                bandcamp: 1,
                numbered: 0,
                files_renamed: 0,
                files_skipped: 1,
            }
        );
        assert!(lib.path("Alvvays/Alvvays/02-Archie, Marry Me.mp3").exists());
        assert!(lib.path("bandcamp/Martha/Album/01 Beat, Perpetual.mp3").exists());
    }

    #[test]
    fn test_process_library_dry_run_leaves_files() {
        let lib = library();
        let classifier = FileRenameClassifier::new(&lib.tags, DryRunRenamer::new());

        let summary = process_library(lib.root(), &classifier, "mp3").unwrap();

        assert_eq!(summary.files_renamed, 3);
        assert!(lib.path("Alvvays/Alvvays/Archie, Marry Me.mp3").exists());
        assert!(!lib.path("Alvvays/Alvvays/02-Archie, Marry Me.mp3").exists());
        assert!(
            lib.path("bandcamp/Martha/Album/Martha - Album - 01 Beat, Perpetual.mp3")
                .exists()
        );
    }

    #[test]
    fn test_dry_run_reports_same_collision_as_real_run() {
        let dir = tempdir().unwrap();
        let split = dir.path().join("bandcamp").join("Split");
        std::fs::create_dir_all(&split).unwrap();
        File::create(split.join("A - Split - 01 Intro.mp3")).unwrap();
        File::create(split.join("B - Split - 01 Intro.mp3")).unwrap();
        let tags = FakeTagReader::new();

        let preview = FileRenameClassifier::new(&tags, DryRunRenamer::new());
        let dry = process_library(dir.path(), &preview, "mp3").unwrap_err();
        assert!(split.join("A - Split - 01 Intro.mp3").exists());

        let real = process_library(dir.path(), &FileRenameClassifier::new(&tags, FsRenamer), "mp3")
            .unwrap_err();

        for err in [&dry, &real] {
            assert!(matches!(
                err,
                Error::WithContext { source, .. } if matches!(**source, Error::TargetExists(_))
            ));
        }
        assert_eq!(dry.to_string(), real.to_string());
    }

    #[test]
    fn test_process_library_rename_failure_is_fatal() {
        let lib = library();
        File::create(lib.path("Alvvays/Alvvays/01-Adult Diversion.mp3")).unwrap();
        let tags = FakeTagReader::new()
            .with(lib.path("Alvvays/Alvvays/Adult Diversion.mp3"), 1)
            .with(lib.path("Alvvays/Alvvays/Archie, Marry Me.mp3"), 2)
            .with(lib.path("Alvvays/Alvvays/Untagged.mp3"), 3);
        let classifier = FileRenameClassifier::new(&tags, FsRenamer);

        let err = process_library(lib.root(), &classifier, "mp3").unwrap_err();

        assert!(matches!(
            err,
            Error::WithContext { ref source, .. } if matches!(**source, Error::TargetExists(_))
        ));
        assert!(err.to_string().contains("Alvvays"));
    }

    #[test]
    fn test_classify_library_reports_without_renaming() {
        let lib = library();
        let classifier = FileRenameClassifier::new(&lib.tags, FsRenamer);

        let reports = classify_library(lib.root(), &classifier, "mp3").unwrap();

        let find = |rel: &str| {
            let path = lib.path(rel);
            reports.iter().find(|r| r.path == path).cloned()
        };
        assert_eq!(
            find("Alvvays/Alvvays").map(|r| (r.classification, r.files)),
            Some((Classification::NeedsNumbering, 3))
        );
        assert_eq!(
            find("Amazon MP3").map(|r| r.classification),
            Some(Classification::SkipDirectory)
        );
        assert_eq!(
            find("bandcamp/Martha/Album").map(|r| r.classification),
            Some(Classification::Bandcamp)
        );
        assert_eq!(
            find("Big Star/Radio City").map(|r| r.classification),
            Some(Classification::SkipFiles)
        );
        assert!(find("Empty").is_none());
        assert!(find("Alvvays").is_none());
        assert!(lib.path("Alvvays/Alvvays/Archie, Marry Me.mp3").exists());
    }

    #[test]
    fn test_summary_display() {
        let summary = LibrarySummary {
            files_renamed: 12,
            ..Default::default()
        };
        assert!(summary.to_string().contains("Files renamed:                12"));
    }
}
