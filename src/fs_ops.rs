//! Filesystem primitives used by the organizer.
//!
//! Kept behind a trait so a pass can be exercised against a filesystem that
//! fails on demand.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// The fallible operations an organize pass needs.
pub trait FileSystem {
    /// True if `path` exists and is a directory (symlinks followed).
    fn is_dir(&self, path: &Path) -> bool;

    /// True if `path` exists and is a regular file (symlinks followed).
    fn is_file(&self, path: &Path) -> bool;

    /// True if anything, including a dangling symlink, exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Immediate entries of a directory, taken as a single snapshot.
    fn list_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;

    /// Creates a directory and its parents; an existing directory is fine.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;
}

/// [`FileSystem`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFs;

impl FileSystem for StdFs {
    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn exists(&self, path: &Path) -> bool {
        fs::symlink_metadata(path).is_ok()
    }

    fn list_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let mut entries = fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<io::Result<Vec<_>>>()?;
        entries.sort();
        Ok(entries)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }
}
