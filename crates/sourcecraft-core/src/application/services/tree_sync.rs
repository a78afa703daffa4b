//! Tree Sync - moves [`TreeNode`]s between memory and a [`Filesystem`].
//!
//! - [`TreeSync::read`] loads a directory recursively, honouring
//!   `.gitignore`-style rules. Ignore files found in a directory apply to it
//!   and to everything below it; a subdirectory adds to its ancestors' rules
//!   and never drops them.
//! - [`TreeSync::write`] makes a directory match a tree exactly: it creates
//!   and updates what the tree holds, then deletes whatever it does not.
//!   Files that already hold the right bytes are left alone, so writing the
//!   same tree twice changes nothing the second time.
//!
//! A failing write is reported as-is. There is no retry and no rollback, so
//! the target may be left partially updated; writing again converges.

use std::path::Path;

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use tracing::{debug, instrument, trace};

use crate::{
    application::{
        ApplicationError,
        ports::{DirEntry, EntryKind, Filesystem},
    },
    domain::{Content, Directory, File, TreeNode},
    error::CraftResult,
};

/// Options for [`TreeSync::read`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOptions {
    /// Files read as ignore rules wherever they appear, e.g. `.gitignore`.
    pub ignore_file_names: Vec<String>,
    /// Extra `.gitignore`-syntax patterns applied from the root down.
    pub ignore_patterns: Vec<String>,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            ignore_file_names: vec![".gitignore".into()],
            ignore_patterns: Vec::new(),
        }
    }
}

impl ReadOptions {
    /// Read everything: no ignore files, no patterns.
    pub fn everything() -> Self {
        Self {
            ignore_file_names: Vec::new(),
            ignore_patterns: Vec::new(),
        }
    }

    pub fn with_patterns(mut self, patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.ignore_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }
}

/// What a write did (or, for [`TreeSync::plan`], would do). Paths are
/// relative to the write root and `/`-separated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteReport {
    pub created: Vec<String>,
    pub updated: Vec<String>,
    pub unchanged: Vec<String>,
    pub removed: Vec<String>,
}

impl WriteReport {
    /// `true` if the write touched nothing.
    pub fn is_noop(&self) -> bool {
        self.created.is_empty() && self.updated.is_empty() && self.removed.is_empty()
    }

    pub fn changes(&self) -> usize {
        self.created.len() + self.updated.len() + self.removed.len()
    }
}

/// Reads and writes trees through a [`Filesystem`] port.
pub struct TreeSync<'a> {
    fs: &'a dyn Filesystem,
}

impl<'a> TreeSync<'a> {
    pub fn new(fs: &'a dyn Filesystem) -> Self {
        Self { fs }
    }

    // ── read ──────────────────────────────────────────────────────────────

    /// Load the directory at `root` into a tree.
    ///
    /// Non-UTF-8 files are loaded as binary content.
    #[instrument(skip_all, fields(root = %root.display()))]
    pub fn read(&self, root: &Path, options: &ReadOptions) -> CraftResult<TreeNode> {
        if !self.fs.exists(root) {
            return Err(ApplicationError::NotFound {
                path: root.to_path_buf(),
            }
            .into());
        }
        if !self.fs.is_dir(root) {
            return Err(ApplicationError::NotADirectory {
                path: root.to_path_buf(),
            }
            .into());
        }

        let mut base = GitignoreBuilder::new("");
        for pattern in &options.ignore_patterns {
            base.add_line(None, pattern)
                .map_err(|e| invalid_pattern(pattern, e))?;
        }
        let mut stack = vec![base.build().map_err(|e| invalid_pattern("<patterns>", e))?];

        let dir = self.read_dir(root, Path::new(""), options, &mut stack)?;
        let tree = TreeNode::Directory(dir);
        debug!(files = tree.file_count(), "tree read");
        Ok(tree)
    }

    fn read_dir(
        &self,
        path: &Path,
        rel: &Path,
        options: &ReadOptions,
        stack: &mut Vec<Gitignore>,
    ) -> CraftResult<Directory> {
        let entries = self.fs.read_dir(path)?;

        let own_rules = self.load_ignore_files(path, rel, &entries, options)?;
        let pushed = own_rules.is_some();
        stack.extend(own_rules);

        let mut dir = Directory::new();
        for entry in &entries {
            let child_rel = rel.join(&entry.name);
            let is_dir = entry.kind == EntryKind::Directory;
            if is_ignored(stack, &child_rel, is_dir) {
                trace!(path = %child_rel.display(), "ignored");
                continue;
            }

            let child_path = path.join(&entry.name);
            let node = if is_dir {
                TreeNode::Directory(self.read_dir(&child_path, &child_rel, options, stack)?)
            } else {
                TreeNode::File(File {
                    content: Content::from_bytes(self.fs.read_file(&child_path)?),
                })
            };
            dir.insert(entry.name.clone(), node)?;
        }

        if pushed {
            stack.pop();
        }
        Ok(dir)
    }

    fn load_ignore_files(
        &self,
        path: &Path,
        rel: &Path,
        entries: &[DirEntry],
        options: &ReadOptions,
    ) -> CraftResult<Option<Gitignore>> {
        let mut builder = GitignoreBuilder::new(rel);
        let mut found = false;

        for name in &options.ignore_file_names {
            if !entries
                .iter()
                .any(|e| e.kind == EntryKind::File && &e.name == name)
            {
                continue;
            }
            let file = path.join(name);
            let bytes = self.fs.read_file(&file)?;
            for line in String::from_utf8_lossy(&bytes).lines() {
                builder
                    .add_line(Some(file.clone()), line)
                    .map_err(|e| invalid_pattern(line, e))?;
            }
            debug!(file = %file.display(), "loaded ignore rules");
            found = true;
        }

        if !found {
            return Ok(None);
        }
        let matcher = builder
            .build()
            .map_err(|e| invalid_pattern(&rel.display().to_string(), e))?;
        Ok(Some(matcher))
    }

    // ── write ─────────────────────────────────────────────────────────────

    /// Make `root` hold exactly `tree`.
    #[instrument(skip_all, fields(root = %root.display()))]
    pub fn write(&self, root: &Path, tree: &TreeNode) -> CraftResult<WriteReport> {
        let mut report = WriteReport::default();
        self.sync_node(root, "", tree, true, &mut report)?;
        debug!(
            created = report.created.len(),
            updated = report.updated.len(),
            unchanged = report.unchanged.len(),
            removed = report.removed.len(),
            "tree written"
        );
        Ok(report)
    }

    /// Report what [`TreeSync::write`] would do, without touching anything.
    #[instrument(skip_all, fields(root = %root.display()))]
    pub fn plan(&self, root: &Path, tree: &TreeNode) -> CraftResult<WriteReport> {
        let mut report = WriteReport::default();
        self.sync_node(root, "", tree, false, &mut report)?;
        Ok(report)
    }

    fn sync_node(
        &self,
        path: &Path,
        rel: &str,
        node: &TreeNode,
        apply: bool,
        report: &mut WriteReport,
    ) -> CraftResult<()> {
        match node {
            TreeNode::File(file) => self.sync_file(path, rel, file, apply, report),
            TreeNode::Directory(dir) => self.sync_dir(path, rel, dir, apply, report),
        }
    }

    fn sync_dir(
        &self,
        path: &Path,
        rel: &str,
        dir: &Directory,
        apply: bool,
        report: &mut WriteReport,
    ) -> CraftResult<()> {
        let exists = self.fs.exists(path);
        let is_dir = exists && self.fs.is_dir(path);

        if exists && !is_dir {
            report.removed.push(display(rel));
            if apply {
                self.fs.remove_file(path)?;
            }
        }
        if !is_dir && apply {
            self.fs.create_dir_all(path)?;
        }

        for (name, child) in dir.children() {
            let child_rel = join(rel, name);
            self.sync_node(&path.join(name), &child_rel, child, apply, report)?;
        }

        // Reconcile: anything on disk the tree does not name goes away.
        if is_dir {
            for entry in self.fs.read_dir(path)? {
                if dir.contains(&entry.name) {
                    continue;
                }
                let stale = path.join(&entry.name);
                report.removed.push(join(rel, &entry.name));
                if apply {
                    match entry.kind {
                        EntryKind::Directory => self.fs.remove_dir_all(&stale)?,
                        EntryKind::File => self.fs.remove_file(&stale)?,
                    }
                }
            }
        }
        Ok(())
    }

    fn sync_file(
        &self,
        path: &Path,
        rel: &str,
        file: &File,
        apply: bool,
        report: &mut WriteReport,
    ) -> CraftResult<()> {
        let bytes = file.content.as_bytes();

        if self.fs.is_dir(path) {
            report.removed.push(display(rel));
            if apply {
                self.fs.remove_dir_all(path)?;
            }
        } else if self.fs.exists(path) {
            if self.fs.read_file(path)? == bytes {
                report.unchanged.push(display(rel));
                return Ok(());
            }
            report.updated.push(display(rel));
            if apply {
                self.fs.write_file(path, bytes)?;
            }
            return Ok(());
        }

        report.created.push(display(rel));
        if apply {
            self.fs.write_file(path, bytes)?;
        }
        Ok(())
    }
}

/// Deepest matcher with an opinion wins; `!pattern` re-includes.
fn is_ignored(stack: &[Gitignore], rel: &Path, is_dir: bool) -> bool {
    for matcher in stack.iter().rev() {
        let m = matcher.matched(rel, is_dir);
        if m.is_ignore() {
            return true;
        }
        if m.is_whitelist() {
            return false;
        }
    }
    false
}

fn invalid_pattern(pattern: &str, e: ignore::Error) -> crate::error::CraftError {
    ApplicationError::InvalidIgnorePattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    }
    .into()
}

fn join(rel: &str, name: &str) -> String {
    if rel.is_empty() {
        name.to_string()
    } else {
        format!("{rel}/{name}")
    }
}

fn display(rel: &str) -> String {
    if rel.is_empty() { ".".into() } else { rel.to_string() }
}
