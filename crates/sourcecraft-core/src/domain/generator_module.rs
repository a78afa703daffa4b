//! On-disk layout of a compiled generator.
//!
//! A generator module is itself a [`TreeNode`], so it is written and read by
//! the same tree sync code as any other directory. It mirrors the shape of
//! the source tree:
//!
//! ```text
//! generator/
//! ├── _generator.toml      ← index: params + one record per entry
//! ├── Cargo.toml.tpl       ← text file, body in template source syntax
//! ├── logo.png.bin         ← binary file, bytes verbatim
//! └── src/
//!     ├── _generator.toml
//!     └── main.rs.tpl
//! ```
//!
//! # `_generator.toml` format
//!
//! ```toml
//! format = 1
//! params = ["app", "entry"]
//!
//! [[entries]]
//! source = "main.rs"        # entry name in the source tree
//! name   = "main.rs"        # name template, may contain ${param}
//! kind   = "text"           # text | binary | directory
//! params = ["app"]
//! ```
//!
//! Decoding re-derives every parameter set and rejects a module whose index
//! disagrees with its files, so a hand-edited module fails loudly instead of
//! generating a partial tree.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::{
    entities::{
        compiled::{CompiledDirectory, CompiledEntry, CompiledFile, CompiledNode, FileBody},
        template::Template,
        tree::{Content, Directory, TreeNode, join},
    },
    error::DomainError,
    value_objects::ParamSet,
};

/// Name of the per-directory index file.
pub const INDEX_FILE: &str = "_generator.toml";
/// Current index format version.
pub const FORMAT_VERSION: u32 = 1;

const TEXT_SUFFIX: &str = ".tpl";
const BINARY_SUFFIX: &str = ".bin";

#[derive(Debug, Serialize, Deserialize)]
struct Index {
    format: u32,
    #[serde(default)]
    params: ParamSet,
    #[serde(default)]
    entries: Vec<IndexEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct IndexEntry {
    source: String,
    name: String,
    kind: EntryKind,
    #[serde(default)]
    params: ParamSet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum EntryKind {
    Text,
    Binary,
    Directory,
}

impl EntryKind {
    fn of(node: &CompiledNode) -> Self {
        match node {
            CompiledNode::Directory(_) => Self::Directory,
            CompiledNode::File(file) => match file.body {
                FileBody::Text(_) => Self::Text,
                FileBody::Binary(_) => Self::Binary,
            },
        }
    }

    fn stored_name(&self, source: &str) -> String {
        match self {
            Self::Text => format!("{source}{TEXT_SUFFIX}"),
            Self::Binary => format!("{source}{BINARY_SUFFIX}"),
            Self::Directory => source.to_string(),
        }
    }
}

// ── Encoding ──────────────────────────────────────────────────────────────────

/// Lay a compiled generator out as a tree ready to be written to disk.
///
/// # Errors
///
/// [`DomainError::InvalidModule`] if the root is not a directory, an entry is
/// called `_generator.toml`, or two entries would be stored under one name.
#[instrument(skip_all)]
pub fn encode(compiled: &CompiledNode) -> Result<TreeNode, DomainError> {
    match compiled {
        CompiledNode::Directory(dir) => encode_directory("", dir).map(TreeNode::Directory),
        CompiledNode::File(_) => Err(DomainError::InvalidModule {
            path: ".".into(),
            reason: "a generator module must be compiled from a directory".into(),
        }),
    }
}

fn encode_directory(path: &str, dir: &CompiledDirectory) -> Result<Directory, DomainError> {
    let mut out = Directory::new();
    let mut index = Index {
        format: FORMAT_VERSION,
        params: dir.params().clone(),
        entries: Vec::with_capacity(dir.len()),
    };

    for (source, entry) in dir.entries() {
        let entry_path = join(path, source);
        let kind = EntryKind::of(&entry.node);
        let stored = kind.stored_name(source);

        if stored == INDEX_FILE || out.contains(&stored) {
            return Err(DomainError::InvalidModule {
                path: entry_path,
                reason: format!("'{stored}' is reserved or already used in this directory"),
            });
        }

        let node = match &entry.node {
            CompiledNode::Directory(child) => {
                TreeNode::Directory(encode_directory(&entry_path, child)?)
            }
            CompiledNode::File(file) => match &file.body {
                FileBody::Text(template) => TreeNode::file(template.to_source()),
                FileBody::Binary(bytes) => TreeNode::binary(bytes.clone()),
            },
        };
        out.insert(stored, node)?;

        index.entries.push(IndexEntry {
            source: source.to_string(),
            name: entry.name.to_source(),
            kind,
            params: entry.params.clone(),
        });
    }

    let index_text = toml::to_string(&index).map_err(|e| DomainError::InvalidModule {
        path: display(path),
        reason: format!("failed to serialize index: {e}"),
    })?;
    out.insert(INDEX_FILE, TreeNode::file(index_text))?;

    Ok(out)
}

// ── Decoding ──────────────────────────────────────────────────────────────────

/// Rebuild a compiled generator from its on-disk layout.
///
/// # Errors
///
/// - [`DomainError::InvalidModule`] for a missing or unreadable index, an
///   unsupported format, missing or unexpected entries, or kind mismatches.
/// - [`DomainError::MalformedTemplate`] for a name or body that does not parse.
/// - [`DomainError::ParamMismatch`] when a declared parameter list disagrees
///   with what the files actually use.
#[instrument(skip_all)]
pub fn decode(module: &TreeNode) -> Result<CompiledNode, DomainError> {
    let dir = module.as_directory().ok_or_else(|| DomainError::InvalidModule {
        path: ".".into(),
        reason: "a generator module must be a directory".into(),
    })?;
    let compiled = decode_directory("", dir)?;
    debug!(params = %compiled.params(), "generator module decoded");
    Ok(CompiledNode::Directory(compiled))
}

fn decode_directory(path: &str, dir: &Directory) -> Result<CompiledDirectory, DomainError> {
    let invalid = |reason: String| DomainError::InvalidModule {
        path: display(path),
        reason,
    };

    let index_text = dir
        .get(INDEX_FILE)
        .and_then(TreeNode::as_file)
        .and_then(|f| f.content.as_text())
        .ok_or_else(|| invalid(format!("missing {INDEX_FILE}")))?;
    let index: Index =
        toml::from_str(index_text).map_err(|e| invalid(format!("unreadable {INDEX_FILE}: {e}")))?;

    if index.format != FORMAT_VERSION {
        return Err(invalid(format!(
            "unsupported format {} (expected {FORMAT_VERSION})",
            index.format
        )));
    }

    let mut compiled = CompiledDirectory::new();
    let mut expected = vec![INDEX_FILE.to_string()];

    for record in &index.entries {
        let entry_path = join(path, &record.source);
        let stored = record.kind.stored_name(&record.source);
        let stored_node = dir
            .get(&stored)
            .ok_or_else(|| invalid(format!("missing entry '{stored}'")))?;

        let node = match (record.kind, stored_node) {
            (EntryKind::Directory, TreeNode::Directory(child)) => {
                CompiledNode::Directory(decode_directory(&entry_path, child)?)
            }
            (EntryKind::Text, TreeNode::File(file)) => {
                let source = file
                    .content
                    .as_text()
                    .ok_or_else(|| invalid(format!("'{stored}' is not valid UTF-8")))?;
                CompiledNode::File(CompiledFile::text(Template::parse(source)?))
            }
            (EntryKind::Binary, TreeNode::File(file)) => {
                let bytes = match &file.content {
                    Content::Binary(bytes) => bytes.clone(),
                    Content::Text(text) => text.clone().into_bytes(),
                };
                CompiledNode::File(CompiledFile::binary(bytes))
            }
            (kind, _) => {
                return Err(invalid(format!("'{stored}' is not a {kind:?} entry")));
            }
        };

        let entry = CompiledEntry::new(Template::parse(&record.name)?, node);
        if entry.params != record.params {
            return Err(DomainError::ParamMismatch {
                path: entry_path,
                declared: record.params.to_string(),
                derived: entry.params.to_string(),
            });
        }

        compiled.insert(record.source.clone(), entry);
        expected.push(stored);
    }

    if let Some((stray, _)) = dir
        .children()
        .find(|(name, _)| !expected.iter().any(|e| e.as_str() == *name))
    {
        return Err(invalid(format!("unexpected entry '{stray}'")));
    }

    if compiled.params() != &index.params {
        return Err(DomainError::ParamMismatch {
            path: display(path),
            declared: index.params.to_string(),
            derived: compiled.params().to_string(),
        });
    }

    Ok(compiled)
}

fn display(path: &str) -> String {
    if path.is_empty() { ".".into() } else { path.to_string() }
}
