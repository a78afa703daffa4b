//! Local filesystem adapter using std::fs.

use std::fs;
use std::io;
use std::path::Path;

use sourcecraft_core::{
    application::{
        ApplicationError,
        ports::{DirEntry, EntryKind, Filesystem},
    },
    error::{CraftError, CraftResult},
};
use tracing::{debug, trace};
use walkdir::WalkDir;

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read_dir(&self, path: &Path) -> CraftResult<Vec<DirEntry>> {
        let mut entries = Vec::new();
        let walker = WalkDir::new(path)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();

        for walk_entry in walker {
            let walk_entry = walk_entry.map_err(|e| {
                let at = e.path().unwrap_or(path).to_path_buf();
                match e.into_io_error() {
                    Some(io) => map_io_error(&at, io, "list directory"),
                    None => map_io_error(&at, io::Error::other("filesystem loop"), "list directory"),
                }
            })?;

            let Some(kind) = kind_of(walk_entry.path(), walk_entry.file_type()) else {
                trace!(path = %walk_entry.path().display(), "skipping entry");
                continue;
            };
            let name = walk_entry.file_name().to_str().ok_or_else(|| {
                CraftError::from(ApplicationError::FilesystemError {
                    path: walk_entry.path().to_path_buf(),
                    operation: "list directory",
                    reason: "file name is not valid UTF-8".into(),
                })
            })?;
            entries.push(DirEntry {
                name: name.to_string(),
                kind,
            });
        }
        Ok(entries)
    }

    fn read_file(&self, path: &Path) -> CraftResult<Vec<u8>> {
        fs::read(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn create_dir_all(&self, path: &Path) -> CraftResult<()> {
        fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn write_file(&self, path: &Path, content: &[u8]) -> CraftResult<()> {
        fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn remove_file(&self, path: &Path) -> CraftResult<()> {
        fs::remove_file(path).map_err(|e| map_io_error(path, e, "remove file"))
    }

    fn remove_dir_all(&self, path: &Path) -> CraftResult<()> {
        fs::remove_dir_all(path).map_err(|e| map_io_error(path, e, "remove directory"))
    }
}

/// Symlinks to files are followed. Symlinked directories are skipped, so a
/// link back to an ancestor cannot turn a read into an endless tree. Broken
/// links and special files are skipped too.
fn kind_of(path: &Path, file_type: fs::FileType) -> Option<EntryKind> {
    if file_type.is_symlink() {
        let target = fs::metadata(path).ok()?;
        if target.is_dir() {
            debug!(path = %path.display(), "not following symlinked directory");
            return None;
        }
        return kind_of(path, target.file_type());
    }
    if file_type.is_dir() {
        Some(EntryKind::Directory)
    } else if file_type.is_file() {
        Some(EntryKind::File)
    } else {
        None
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &'static str) -> CraftError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        operation,
        reason: e.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn read_dir_is_sorted_and_typed() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("b.txt"), "b").unwrap();
        fs::write(temp.path().join("a.txt"), "a").unwrap();
        fs::create_dir(temp.path().join("sub")).unwrap();

        let entries = LocalFilesystem::new().read_dir(temp.path()).unwrap();
        assert_eq!(
            entries,
            vec![
                DirEntry::file("a.txt"),
                DirEntry::file("b.txt"),
                DirEntry::directory("sub"),
            ]
        );
    }

    #[test]
    fn io_failures_carry_path_and_operation() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.txt");

        let err = LocalFilesystem::new().read_file(&missing).unwrap_err();
        match err {
            CraftError::Application(ApplicationError::FilesystemError {
                path, operation, ..
            }) => {
                assert_eq!(path, missing);
                assert_eq!(operation, "read file");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn write_then_remove() {
        let temp = TempDir::new().unwrap();
        let fs_ = LocalFilesystem::new();
        let dir = temp.path().join("a/b");
        fs_.create_dir_all(&dir).unwrap();
        fs_.write_file(&dir.join("f.bin"), &[0, 159, 146, 150]).unwrap();
        assert_eq!(fs_.read_file(&dir.join("f.bin")).unwrap(), vec![0, 159, 146, 150]);

        fs_.remove_file(&dir.join("f.bin")).unwrap();
        assert!(!fs_.exists(&dir.join("f.bin")));
        fs_.remove_dir_all(&temp.path().join("a")).unwrap();
        assert!(!fs_.is_dir(&dir));
    }

    #[cfg(unix)]
    #[test]
    fn broken_symlinks_are_skipped() {
        let temp = TempDir::new().unwrap();
        std::os::unix::fs::symlink(temp.path().join("gone"), temp.path().join("link")).unwrap();
        fs::write(temp.path().join("real.txt"), "x").unwrap();

        let entries = LocalFilesystem::new().read_dir(temp.path()).unwrap();
        assert_eq!(entries, vec![DirEntry::file("real.txt")]);
    }

    #[cfg(unix)]
    #[test]
    fn file_symlinks_are_followed_directory_symlinks_are_not() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("src")).unwrap();
        fs::write(temp.path().join("src/a.txt"), "a").unwrap();
        std::os::unix::fs::symlink(temp.path(), temp.path().join("src/loop")).unwrap();
        std::os::unix::fs::symlink(temp.path().join("src/a.txt"), temp.path().join("src/alias.txt"))
            .unwrap();

        let entries = LocalFilesystem::new().read_dir(&temp.path().join("src")).unwrap();
        assert_eq!(entries, vec![DirEntry::file("a.txt"), DirEntry::file("alias.txt")]);
    }
}
