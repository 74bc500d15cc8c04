/// Sorting the files of one directory into category subdirectories.
///
/// A pass looks only at the immediate entries of the source directory. Every
/// regular file whose extension has a rule is moved into
/// `source/<category>/<file name>`; everything else stays where it is.
/// Per-file failures are reported and skipped, so one locked file never
/// stops the rest of the pass.
use crate::fs_ops::{FileSystem, StdFs};
use crate::reporter::Reporter;
use crate::rules::{RuleTable, normalize_extension};
use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that abort a pass before any file is touched.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// The source path is missing or is not a directory.
    #[error("Source path does not exist or is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// The source directory could not be listed.
    #[error("Error reading directory {}: {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Why a single file could not be moved.
#[derive(Debug, Error)]
pub enum MoveError {
    #[error("could not create category folder {}: {source}", .path.display())]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Moves never overwrite; the file stays in the source directory.
    #[error("destination already exists: {}", .0.display())]
    DestinationExists(PathBuf),

    #[error(transparent)]
    Rename(#[from] io::Error),
}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Outcome counts of one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Files moved (or, in a dry run, that would have been moved).
    pub moved: usize,
    /// Files left in place because no rule matched their extension.
    pub unmatched: usize,
    /// Files that matched a rule but could not be moved.
    pub failed: usize,
    /// Moved files per category.
    pub by_category: BTreeMap<String, usize>,
}

impl PassReport {
    fn record_move(&mut self, category: &str) {
        self.moved += 1;
        *self.by_category.entry(category.to_string()).or_insert(0) += 1;
    }
}

/// Returns the normalized extension used for rule lookup.
///
/// Follows [`Path::extension`]: the text after the last `.`, where a leading
/// dot alone does not start an extension. Files without one get `""`.
/// Only a single leading dot is skipped: `..bashrc` has the extension `bashrc`.
///
/// ```
/// use smartsort::file_organizer::file_extension;
/// use std::path::Path;
///
/// assert_eq!(file_extension(Path::new("Report.PDF")), "pdf");
/// assert_eq!(file_extension(Path::new("backup.tar.gz")), "gz");
/// assert_eq!(file_extension(Path::new("Makefile")), "");
/// assert_eq!(file_extension(Path::new(".bashrc")), "");
/// ```
pub fn file_extension(path: &Path) -> String {
    path.extension()
        .map(|ext| normalize_extension(&ext.to_string_lossy()))
        .unwrap_or_default()
}

/// Moves files into category subdirectories according to a [`RuleTable`].
pub struct FileOrganizer<F = StdFs> {
    rules: RuleTable,
    fs: F,
    dry_run: bool,
}

impl FileOrganizer<StdFs> {
    /// Creates an organizer that works on the real filesystem.
    pub fn new(rules: RuleTable) -> Self {
        Self::with_fs(rules, StdFs)
    }
}

impl<F: FileSystem> FileOrganizer<F> {
    /// Creates an organizer over any [`FileSystem`] implementation.
    pub fn with_fs(rules: RuleTable, fs: F) -> Self {
        Self {
            rules,
            fs,
            dry_run: false,
        }
    }

    /// In a dry run nothing is created or moved; planned moves are reported
    /// as "Would move" and still counted.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Runs one pass over the immediate entries of `source`.
    ///
    /// Returns [`OrganizeError::NotADirectory`] without touching anything if
    /// `source` is not an existing directory. Otherwise every file is handled
    /// independently and the returned report counts what happened; files in
    /// subdirectories (including earlier category folders) are never visited.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use smartsort::file_organizer::FileOrganizer;
    /// use smartsort::reporter::TracingReporter;
    /// use smartsort::rules::RuleTable;
    /// use std::path::Path;
    ///
    /// let organizer = FileOrganizer::new(RuleTable::default());
    /// match organizer.organize(Path::new("/home/user/Downloads"), &TracingReporter) {
    ///     Ok(report) => println!("Moved {} files", report.moved),
    ///     Err(e) => eprintln!("Nothing organized: {}", e),
    /// }
    /// ```
    pub fn organize(&self, source: &Path, reporter: &dyn Reporter) -> OrganizeResult<PassReport> {
        if !self.fs.is_dir(source) {
            let err = OrganizeError::NotADirectory(source.to_path_buf());
            reporter.error(&err.to_string());
            return Err(err);
        }

        reporter.info(&format!(
            "Starting file organization in: {}",
            source.display()
        ));

        let entries = self.fs.list_dir(source).map_err(|e| {
            let err = OrganizeError::ReadDir {
                path: source.to_path_buf(),
                source: e,
            };
            reporter.error(&err.to_string());
            err
        })?;

        let mut report = PassReport::default();

        for path in entries {
            if !self.fs.is_file(&path) {
                continue;
            }
            let Some(file_name) = path.file_name() else {
                continue;
            };
            let display_name = file_name.to_string_lossy();
            let ext = file_extension(&path);

            let Some(category) = self.rules.category_for(&ext) else {
                reporter.debug(&format!("No rule for extension {ext}: {display_name}"));
                report.unmatched += 1;
                continue;
            };

            if self.dry_run {
                reporter.info(&format!("Would move: {display_name} -> {category}/"));
                report.record_move(category);
                continue;
            }

            match self.move_to_category(source, &path, file_name, category) {
                Ok(_) => {
                    reporter.info(&format!("Moved: {display_name} -> {category}/"));
                    report.record_move(category);
                }
                Err(e) => {
                    reporter.error(&format!("Error moving {display_name}: {e}"));
                    report.failed += 1;
                }
            }
        }

        reporter.info(&format!(
            "Finished organizing files. Moved {} files.",
            report.moved
        ));
        Ok(report)
    }

    /// Moves one file into `base/category/`, creating the folder if needed.
    /// Returns the destination path.
    fn move_to_category(
        &self,
        base_path: &Path,
        file_path: &Path,
        file_name: &OsStr,
        category: &str,
    ) -> Result<PathBuf, MoveError> {
        let category_path = base_path.join(category);

        self.fs
            .create_dir_all(&category_path)
            .map_err(|source| MoveError::DirectoryCreationFailed {
                path: category_path.clone(),
                source,
            })?;

        let destination_path = category_path.join(file_name);
        if self.fs.exists(&destination_path) {
            return Err(MoveError::DestinationExists(destination_path));
        }

        self.fs.rename(file_path, &destination_path)?;
        Ok(destination_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::NullReporter;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension(Path::new("photo.JPG")), "jpg");
        assert_eq!(file_extension(Path::new("archive.tar.gz")), "gz");
        assert_eq!(file_extension(Path::new("README")), "");
        assert_eq!(file_extension(Path::new("trailing.")), "");
        assert_eq!(file_extension(Path::new(".hidden")), "");
        assert_eq!(file_extension(Path::new(".hidden.txt")), "txt");
        assert_eq!(file_extension(Path::new("..bashrc")), "bashrc");
    }

    #[test]
    fn test_move_creates_category_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        let file_path = base_path.join("test.pdf");
        fs::write(&file_path, "test content").expect("Failed to write test file");

        let organizer = FileOrganizer::new(RuleTable::default());
        let destination = organizer
            .move_to_category(base_path, &file_path, OsStr::new("test.pdf"), "Documents")
            .expect("Failed to move file");

        assert_eq!(destination, base_path.join("Documents").join("test.pdf"));
        assert!(destination.is_file());
        assert!(!file_path.exists());
    }

    #[test]
    fn test_move_uses_existing_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        fs::create_dir(base_path.join("Images")).expect("Failed to create category directory");
        let file_path = base_path.join("test.png");
        fs::write(&file_path, "test content").expect("Failed to write test file");

        let organizer = FileOrganizer::new(RuleTable::default());
        organizer
            .move_to_category(base_path, &file_path, OsStr::new("test.png"), "Images")
            .expect("Failed to move file");

        assert!(base_path.join("Images").join("test.png").exists());
    }

    #[test]
    fn test_move_never_overwrites() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        fs::create_dir(base_path.join("Documents")).expect("Failed to create category directory");
        fs::write(base_path.join("Documents").join("cv.pdf"), "old").expect("write");
        let file_path = base_path.join("cv.pdf");
        fs::write(&file_path, "new").expect("write");

        let organizer = FileOrganizer::new(RuleTable::default());
        let result =
            organizer.move_to_category(base_path, &file_path, OsStr::new("cv.pdf"), "Documents");

        assert!(matches!(result, Err(MoveError::DestinationExists(_))));
        assert_eq!(fs::read_to_string(&file_path).expect("read"), "new");
        assert_eq!(
            fs::read_to_string(base_path.join("Documents").join("cv.pdf")).expect("read"),
            "old"
        );
    }

    #[test]
    fn test_category_blocked_by_regular_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        // A file without extension named like the category folder.
        fs::write(base_path.join("Images"), "not a folder").expect("write");
        fs::write(base_path.join("a.png"), "png").expect("write");

        let organizer = FileOrganizer::new(RuleTable::default());
        let report = organizer
            .organize(base_path, &NullReporter)
            .expect("source is a directory");

        assert_eq!(report.moved, 0);
        assert_eq!(report.failed, 1);
        assert_eq!(report.unmatched, 1);
        assert!(base_path.join("a.png").is_file());
    }

    #[test]
    fn test_dry_run_touches_nothing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        fs::write(base_path.join("a.pdf"), "pdf").expect("write");
        fs::write(base_path.join("b.mp3"), "mp3").expect("write");

        let organizer = FileOrganizer::new(RuleTable::default()).dry_run(true);
        let report = organizer
            .organize(base_path, &NullReporter)
            .expect("source is a directory");

        assert_eq!(report.moved, 2);
        assert_eq!(report.by_category.get("Documents"), Some(&1));
        assert_eq!(report.by_category.get("Audio"), Some(&1));
        assert!(base_path.join("a.pdf").is_file());
        assert!(!base_path.join("Documents").exists());
        assert!(!base_path.join("Audio").exists());
    }

    #[test]
    fn test_non_directory_source() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let file_path = temp_dir.path().join("plain.pdf");
        fs::write(&file_path, "pdf").expect("write");

        let organizer = FileOrganizer::new(RuleTable::default());
        let result = organizer.organize(&file_path, &NullReporter);

        assert!(matches!(result, Err(OrganizeError::NotADirectory(_))));
        assert!(file_path.is_file());
    }
}
