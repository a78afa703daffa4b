//! Driven (output) ports - implemented by infrastructure.
//!
//! The core never touches `std::fs`. Everything it needs from a disk goes
//! through [`Filesystem`]; the `sourcecraft-adapters` crate provides the
//! implementations.

use std::path::Path;

use crate::error::CraftResult;

/// Kind of a directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// One entry returned by [`Filesystem::read_dir`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub kind: EntryKind,
}

impl DirEntry {
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::File,
        }
    }

    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Directory,
        }
    }
}

/// Port for filesystem operations.
///
/// Implemented by:
/// - `sourcecraft_adapters::filesystem::LocalFilesystem` (production)
/// - `sourcecraft_adapters::filesystem::MemoryFilesystem` (tests, dry runs)
///
/// Failures are reported as `ApplicationError::FilesystemError` carrying the
/// path and the operation that failed.
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Check if path exists and is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// List a directory, sorted by name. Entries that are neither regular
    /// files nor directories (sockets, broken links) are skipped.
    fn read_dir(&self, path: &Path) -> CraftResult<Vec<DirEntry>>;

    /// Read a whole file.
    fn read_file(&self, path: &Path) -> CraftResult<Vec<u8>>;

    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> CraftResult<()>;

    /// Create or overwrite a file.
    fn write_file(&self, path: &Path, content: &[u8]) -> CraftResult<()>;

    /// Remove a single file.
    fn remove_file(&self, path: &Path) -> CraftResult<()>;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> CraftResult<()>;
}
