//! Compiled generators and the generator runtime.
//!
//! A [`CompiledNode`] has the same shape as the [`TreeNode`] it was compiled
//! from, but every file body and entry name is a [`Template`]. Each node
//! knows the exact set of parameters it needs; for directories that set is
//! the union of its entries' sets.
//!
//! [`CompiledNode::generate`] is the runtime: a pure function from a compiled
//! tree and a set of [`Bindings`] to a fresh [`TreeNode`].

use std::collections::{BTreeMap, BTreeSet};

use tracing::trace;

use crate::domain::{
    entities::{
        template::Template,
        tree::{Content, Directory, File, TreeNode, join, validate_entry_name},
    },
    error::DomainError,
    value_objects::{Bindings, ParamSet},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompiledNode {
    Directory(CompiledDirectory),
    File(CompiledFile),
}

/// A compiled directory, keyed by the entry names of the source tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledDirectory {
    entries: BTreeMap<String, CompiledEntry>,
    params: ParamSet,
}

/// One directory entry: its (possibly parameterized) name and its node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledEntry {
    pub name: Template,
    pub node: CompiledNode,
    /// Union of the name's and the node's parameters.
    pub params: ParamSet,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledFile {
    pub body: FileBody,
    params: ParamSet,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileBody {
    Text(Template),
    /// Opaque bytes, copied through untouched.
    Binary(Vec<u8>),
}

impl CompiledFile {
    pub fn text(template: Template) -> Self {
        let params = template.params();
        Self {
            body: FileBody::Text(template),
            params,
        }
    }

    pub fn binary(bytes: Vec<u8>) -> Self {
        Self {
            body: FileBody::Binary(bytes),
            params: ParamSet::new(),
        }
    }

    pub fn params(&self) -> &ParamSet {
        &self.params
    }
}

impl CompiledEntry {
    pub fn new(name: Template, node: CompiledNode) -> Self {
        let mut params = name.params();
        params.union(node.params());
        Self { name, node, params }
    }
}

impl CompiledDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry under its source name, folding its parameters into the
    /// directory's set.
    pub fn insert(&mut self, source_name: impl Into<String>, entry: CompiledEntry) {
        self.entries.insert(source_name.into(), entry);
        self.recompute_params();
    }

    pub fn get(&self, source_name: &str) -> Option<&CompiledEntry> {
        self.entries.get(source_name)
    }

    /// Entries in lexicographic source-name order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &CompiledEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn params(&self) -> &ParamSet {
        &self.params
    }

    /// Union of entry parameter sets, in first-seen order over sorted entries.
    fn derive_params(&self) -> ParamSet {
        let mut params = ParamSet::new();
        for entry in self.entries.values() {
            params.union(&entry.params);
        }
        params
    }

    fn recompute_params(&mut self) {
        self.params = self.derive_params();
    }
}

impl CompiledNode {
    /// Parameters this node needs to be generated.
    pub fn params(&self) -> &ParamSet {
        match self {
            Self::Directory(dir) => dir.params(),
            Self::File(file) => file.params(),
        }
    }

    pub fn as_directory(&self) -> Option<&CompiledDirectory> {
        match self {
            Self::Directory(dir) => Some(dir),
            Self::File(_) => None,
        }
    }

    /// Number of compiled files in this subtree.
    pub fn file_count(&self) -> usize {
        match self {
            Self::File(_) => 1,
            Self::Directory(dir) => dir.entries.values().map(|e| e.node.file_count()).sum(),
        }
    }

    /// Check that every directory's parameter set equals the union of its
    /// entries' sets, and every entry's set equals name ∪ node.
    pub fn check_invariants(&self) -> Result<(), DomainError> {
        self.check_at("")
    }

    fn check_at(&self, path: &str) -> Result<(), DomainError> {
        match self {
            Self::File(file) => {
                let derived = match &file.body {
                    FileBody::Text(template) => template.params(),
                    FileBody::Binary(_) => ParamSet::new(),
                };
                ensure_params(path, &file.params, &derived)
            }
            Self::Directory(dir) => {
                for (name, entry) in &dir.entries {
                    let child_path = join(path, name);
                    entry.node.check_at(&child_path)?;
                    let mut derived = entry.name.params();
                    derived.union(entry.node.params());
                    ensure_params(&child_path, &entry.params, &derived)?;
                }
                ensure_params(path, &dir.params, &dir.derive_params())
            }
        }
    }

    /// Materialize a tree from `bindings`.
    ///
    /// Every parameter this node needs is checked before anything is built,
    /// so a missing key fails without producing any partial tree. Unused keys
    /// are ignored.
    ///
    /// # Errors
    ///
    /// - [`DomainError::MissingParameter`] naming the first missing key.
    /// - [`DomainError::InvalidName`] if a generated entry name is not a
    ///   plain file name (empty, or containing a path separator).
    /// - [`DomainError::NameCollision`] if two entries generate one name.
    pub fn generate(&self, bindings: &Bindings) -> Result<TreeNode, DomainError> {
        if let Some(name) = bindings.first_missing(self.params()) {
            return Err(DomainError::MissingParameter {
                name: name.to_string(),
                path: self.first_user_of(name),
            });
        }
        self.generate_at("", bindings)
    }

    fn generate_at(&self, path: &str, bindings: &Bindings) -> Result<TreeNode, DomainError> {
        match self {
            Self::File(file) => {
                let content = match &file.body {
                    FileBody::Text(template) => {
                        Content::Text(template.render(bindings, display_path(path))?)
                    }
                    FileBody::Binary(bytes) => Content::Binary(bytes.clone()),
                };
                Ok(TreeNode::File(File { content }))
            }
            Self::Directory(dir) => {
                let mut out = Directory::new();
                let mut produced = BTreeSet::new();

                for (source_name, entry) in &dir.entries {
                    let sub = bindings.restrict(&entry.params);
                    let child_path = join(path, source_name);
                    let name = entry.name.render(&sub, &child_path)?;

                    validate_entry_name(&name)?;
                    if !produced.insert(name.clone()) {
                        return Err(DomainError::NameCollision {
                            name,
                            path: display_path(path).to_string(),
                        });
                    }

                    trace!(entry = %child_path, generated = %name, "generating entry");
                    out.insert(name, entry.node.generate_at(&child_path, &sub)?)?;
                }

                Ok(TreeNode::Directory(out))
            }
        }
    }

    /// Path of the first node (in walk order) whose own template uses
    /// `param`; used to give missing-parameter errors a location.
    fn first_user_of(&self, param: &str) -> String {
        fn search(node: &CompiledNode, path: &str, param: &str) -> Option<String> {
            match node {
                CompiledNode::File(file) => file
                    .params
                    .contains(param)
                    .then(|| display_path(path).to_string()),
                CompiledNode::Directory(dir) => dir.entries.iter().find_map(|(name, entry)| {
                    let child_path = join(path, name);
                    if entry.name.params().contains(param) {
                        Some(child_path)
                    } else {
                        search(&entry.node, &child_path, param)
                    }
                }),
            }
        }
        search(self, "", param).unwrap_or_else(|| ".".into())
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() { "." } else { path }
}

fn ensure_params(path: &str, declared: &ParamSet, derived: &ParamSet) -> Result<(), DomainError> {
    if declared == derived {
        Ok(())
    } else {
        Err(DomainError::ParamMismatch {
            path: display_path(path).to_string(),
            declared: declared.to_string(),
            derived: derived.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::template::Placeholder;

    fn templated(text: &str, literal: &str, param: &str) -> Template {
        let mut t = Template::literal(text);
        t.substitute(literal, &Placeholder::new(param, None));
        t
    }

    /// `{app}/main.rs` using `app` and `entry`, plus a static README.
    fn sample() -> CompiledNode {
        let mut body = templated("app=my_app entry=Post", "my_app", "app");
        body.substitute("Post", &Placeholder::new("entry", None));

        let mut inner = CompiledDirectory::new();
        inner.insert(
            "main.rs",
            CompiledEntry::new(
                Template::literal("main.rs"),
                CompiledNode::File(CompiledFile::text(body)),
            ),
        );

        let mut root = CompiledDirectory::new();
        root.insert(
            "my_app",
            CompiledEntry::new(
                templated("my_app", "my_app", "app"),
                CompiledNode::Directory(inner),
            ),
        );
        root.insert(
            "README.md",
            CompiledEntry::new(
                Template::literal("README.md"),
                CompiledNode::File(CompiledFile::text(Template::literal("hi"))),
            ),
        );
        CompiledNode::Directory(root)
    }

    #[test]
    fn directory_params_are_union_of_entries() {
        let node = sample();
        assert_eq!(node.params().iter().collect::<Vec<_>>(), vec!["app", "entry"]);
        node.check_invariants().unwrap();
    }

    #[test]
    fn generate_renders_names_and_bodies() {
        let bindings: Bindings = [("app", "blog"), ("entry", "Comment"), ("unused", "x")]
            .into_iter()
            .collect();
        let tree = sample().generate(&bindings).unwrap();
        assert_eq!(
            tree.get_path("blog/main.rs"),
            Some(&TreeNode::file("app=blog entry=Comment"))
        );
        assert_eq!(tree.get_path("README.md"), Some(&TreeNode::file("hi")));
        assert!(tree.get_path("my_app").is_none());
    }

    #[test]
    fn missing_parameter_fails_before_output() {
        let bindings: Bindings = [("app", "blog")].into_iter().collect();
        let err = sample().generate(&bindings).unwrap_err();
        assert_eq!(
            err,
            DomainError::MissingParameter {
                name: "entry".into(),
                path: "my_app/main.rs".into(),
            }
        );
    }

    #[test]
    fn rejects_generated_names_with_separators() {
        let bindings: Bindings = [("app", "a/b"), ("entry", "E")].into_iter().collect();
        assert!(matches!(
            sample().generate(&bindings),
            Err(DomainError::InvalidName { .. })
        ));
    }

    #[test]
    fn rejects_name_collisions() {
        let bindings: Bindings = [("app", "README.md"), ("entry", "E")]
            .into_iter()
            .collect();
        assert!(matches!(
            sample().generate(&bindings),
            Err(DomainError::NameCollision { .. })
        ));
    }

    #[test]
    fn binary_files_copy_through() {
        let node = CompiledNode::File(CompiledFile::binary(vec![0, 159, 146, 150]));
        assert!(node.params().is_empty());
        assert_eq!(
            node.generate(&Bindings::new()).unwrap(),
            TreeNode::binary(vec![0, 159, 146, 150])
        );
    }
}
