//! The in-memory tree model.
//!
//! A [`TreeNode`] mirrors a real filesystem subtree: directories map entry
//! names to child nodes, files carry their content. Children live in a
//! `BTreeMap`, so every walk over a tree (and everything derived from it)
//! visits entries in the same lexicographic order.

use std::collections::BTreeMap;

use crate::domain::error::DomainError;

/// One node of a source tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
    Directory(Directory),
    File(File),
}

/// A directory: a name-to-node mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directory {
    children: BTreeMap<String, TreeNode>,
}

/// A file and its content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    pub content: Content,
}

/// File content.
///
/// Anything that does not decode as UTF-8 is carried as an opaque blob and
/// is never parameterized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    Binary(Vec<u8>),
}

impl Content {
    /// Classify raw bytes read from disk.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        match String::from_utf8(bytes) {
            Ok(text) => Self::Text(text),
            Err(e) => Self::Binary(e.into_bytes()),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Text(text) => text.as_bytes(),
            Self::Binary(bytes) => bytes,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Binary(_) => None,
        }
    }
}

/// Check that `name` is usable as a single path component.
pub fn validate_entry_name(name: &str) -> Result<(), DomainError> {
    let reason = if name.is_empty() {
        "name is empty"
    } else if name == "." || name == ".." {
        "'.' and '..' are not entry names"
    } else if name.contains(['/', '\\']) {
        "name contains a path separator"
    } else if name.contains('\0') {
        "name contains a NUL byte"
    } else {
        return Ok(());
    };

    Err(DomainError::InvalidName {
        name: name.to_string(),
        reason: reason.into(),
    })
}

impl TreeNode {
    pub fn directory() -> Self {
        Self::Directory(Directory::default())
    }

    pub fn file(text: impl Into<String>) -> Self {
        Self::File(File {
            content: Content::Text(text.into()),
        })
    }

    pub fn binary(bytes: impl Into<Vec<u8>>) -> Self {
        Self::File(File {
            content: Content::Binary(bytes.into()),
        })
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Self::Directory(_))
    }

    pub fn as_directory(&self) -> Option<&Directory> {
        match self {
            Self::Directory(dir) => Some(dir),
            Self::File(_) => None,
        }
    }

    pub fn as_file(&self) -> Option<&File> {
        match self {
            Self::File(file) => Some(file),
            Self::Directory(_) => None,
        }
    }

    /// Follow a `/`-separated relative path.
    pub fn get_path(&self, path: &str) -> Option<&TreeNode> {
        path.split('/')
            .filter(|part| !part.is_empty())
            .try_fold(self, |node, part| node.as_directory()?.get(part))
    }

    /// Number of files in this subtree.
    pub fn file_count(&self) -> usize {
        match self {
            Self::File(_) => 1,
            Self::Directory(dir) => dir.children.values().map(TreeNode::file_count).sum(),
        }
    }

    /// Depth-first, lexicographically ordered listing of every node below
    /// this one, paired with its `/`-separated relative path.
    pub fn walk(&self) -> Vec<(String, &TreeNode)> {
        let mut out = Vec::new();
        if let Self::Directory(dir) = self {
            dir.walk_into("", &mut out);
        }
        out
    }
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a child, replacing any previous entry with the same name.
    pub fn insert(&mut self, name: impl Into<String>, node: TreeNode) -> Result<(), DomainError> {
        let name = name.into();
        validate_entry_name(&name)?;
        self.children.insert(name, node);
        Ok(())
    }

    /// Builder-style [`Directory::insert`].
    pub fn with(mut self, name: impl Into<String>, node: TreeNode) -> Result<Self, DomainError> {
        self.insert(name, node)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&TreeNode> {
        self.children.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.children.contains_key(name)
    }

    /// Children in lexicographic name order.
    pub fn children(&self) -> impl Iterator<Item = (&str, &TreeNode)> {
        self.children.iter().map(|(name, node)| (name.as_str(), node))
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    fn walk_into<'a>(&'a self, prefix: &str, out: &mut Vec<(String, &'a TreeNode)>) {
        for (name, node) in &self.children {
            let path = join(prefix, name);
            out.push((path.clone(), node));
            if let TreeNode::Directory(dir) = node {
                dir.walk_into(&path, out);
            }
        }
    }
}

impl From<Directory> for TreeNode {
    fn from(dir: Directory) -> Self {
        Self::Directory(dir)
    }
}

/// Join two `/`-separated relative path fragments.
pub(crate) fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}/{name}")
    }
}
