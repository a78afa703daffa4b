//! In-memory filesystem adapter for tests and previews.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use sourcecraft_core::{
    application::{
        ApplicationError,
        ports::{DirEntry, EntryKind, Filesystem},
    },
    error::CraftResult,
};

/// In-memory filesystem. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    nodes: BTreeMap<PathBuf, Node>,
}

#[derive(Debug, Clone)]
enum Node {
    File(Vec<u8>),
    Directory,
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, creating its parent directories (testing helper).
    pub fn with_file(self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) -> Self {
        let path = path.as_ref();
        if let Ok(mut inner) = self.inner.write() {
            if let Some(parent) = path.parent() {
                inner.add_dirs(parent);
            }
            inner.nodes.insert(path.to_path_buf(), Node::File(content.into()));
        }
        self
    }

    /// A file's content as text, if it exists and is UTF-8.
    pub fn file_text(&self, path: impl AsRef<Path>) -> Option<String> {
        let inner = self.inner.read().ok()?;
        match inner.nodes.get(path.as_ref())? {
            Node::File(bytes) => String::from_utf8(bytes.clone()).ok(),
            Node::Directory => None,
        }
    }

    /// All file paths, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| {
                inner
                    .nodes
                    .iter()
                    .filter(|(_, n)| matches!(n, Node::File(_)))
                    .map(|(p, _)| p.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn read(&self) -> CraftResult<RwLockReadGuard<'_, Inner>> {
        Ok(self
            .inner
            .read()
            .map_err(|_| ApplicationError::LockPoisoned)?)
    }

    fn write(&self) -> CraftResult<RwLockWriteGuard<'_, Inner>> {
        Ok(self
            .inner
            .write()
            .map_err(|_| ApplicationError::LockPoisoned)?)
    }
}

impl Inner {
    fn add_dirs(&mut self, path: &Path) {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            self.nodes.entry(current.clone()).or_insert(Node::Directory);
        }
    }

    fn kind(&self, path: &Path) -> Option<EntryKind> {
        self.nodes.get(path).map(|n| match n {
            Node::File(_) => EntryKind::File,
            Node::Directory => EntryKind::Directory,
        })
    }
}

fn failure(path: &Path, operation: &'static str, reason: &str) -> ApplicationError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        operation,
        reason: reason.into(),
    }
}

impl Filesystem for MemoryFilesystem {
    fn exists(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.nodes.contains_key(path))
            .unwrap_or(false)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.kind(path) == Some(EntryKind::Directory))
            .unwrap_or(false)
    }

    fn read_dir(&self, path: &Path) -> CraftResult<Vec<DirEntry>> {
        let inner = self.read()?;
        if inner.kind(path) != Some(EntryKind::Directory) {
            return Err(failure(path, "list directory", "not a directory").into());
        }

        let mut entries: Vec<DirEntry> = inner
            .nodes
            .iter()
            .filter(|(p, _)| p.parent() == Some(path))
            .filter_map(|(p, node)| {
                let name = p.file_name()?.to_str()?.to_string();
                Some(match node {
                    Node::File(_) => DirEntry::file(name),
                    Node::Directory => DirEntry::directory(name),
                })
            })
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn read_file(&self, path: &Path) -> CraftResult<Vec<u8>> {
        match self.read()?.nodes.get(path) {
            Some(Node::File(bytes)) => Ok(bytes.clone()),
            Some(Node::Directory) => Err(failure(path, "read file", "is a directory").into()),
            None => Err(failure(path, "read file", "no such file").into()),
        }
    }

    fn create_dir_all(&self, path: &Path) -> CraftResult<()> {
        let mut inner = self.write()?;
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            if inner.kind(&current) == Some(EntryKind::File) {
                return Err(failure(&current, "create directory", "a file is in the way").into());
            }
        }
        inner.add_dirs(path);
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &[u8]) -> CraftResult<()> {
        let mut inner = self.write()?;

        // Ensure parent exists
        let parent_missing = path.parent().is_some_and(|parent| {
            !parent.as_os_str().is_empty() && inner.kind(parent) != Some(EntryKind::Directory)
        });
        if parent_missing {
            return Err(failure(path, "write file", "parent directory does not exist").into());
        }
        if inner.kind(path) == Some(EntryKind::Directory) {
            return Err(failure(path, "write file", "is a directory").into());
        }

        inner
            .nodes
            .insert(path.to_path_buf(), Node::File(content.to_vec()));
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> CraftResult<()> {
        let mut inner = self.write()?;
        match inner.kind(path) {
            Some(EntryKind::File) => {
                inner.nodes.remove(path);
                Ok(())
            }
            Some(EntryKind::Directory) => Err(failure(path, "remove file", "is a directory").into()),
            None => Err(failure(path, "remove file", "no such file").into()),
        }
    }

    fn remove_dir_all(&self, path: &Path) -> CraftResult<()> {
        let mut inner = self.write()?;
        if inner.kind(path) != Some(EntryKind::Directory) {
            return Err(failure(path, "remove directory", "not a directory").into());
        }
        inner.nodes.retain(|p, _| !p.starts_with(path));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_file_creates_parents() {
        let fs = MemoryFilesystem::new().with_file("/r/a/b.txt", "hi");
        assert!(fs.is_dir(Path::new("/r/a")));
        assert_eq!(fs.file_text("/r/a/b.txt").as_deref(), Some("hi"));
        assert_eq!(
            fs.read_dir(Path::new("/r")).unwrap(),
            vec![DirEntry::directory("a")]
        );
    }

    #[test]
    fn write_requires_parent() {
        let fs = MemoryFilesystem::new();
        assert!(fs.write_file(Path::new("/nope/x"), b"x").is_err());
        fs.create_dir_all(Path::new("/nope")).unwrap();
        fs.write_file(Path::new("/nope/x"), b"x").unwrap();
        assert_eq!(fs.list_files(), vec![PathBuf::from("/nope/x")]);
    }

    #[test]
    fn remove_dir_all_takes_descendants() {
        let fs = MemoryFilesystem::new()
            .with_file("/r/a/one", "1")
            .with_file("/r/a/deep/two", "2")
            .with_file("/r/ab", "kept");
        fs.remove_dir_all(Path::new("/r/a")).unwrap();
        assert_eq!(fs.list_files(), vec![PathBuf::from("/r/ab")]);
    }

    #[test]
    fn clones_share_state() {
        let fs = MemoryFilesystem::new();
        let other = fs.clone();
        other.create_dir_all(Path::new("/x")).unwrap();
        assert!(fs.is_dir(Path::new("/x")));
    }
}
