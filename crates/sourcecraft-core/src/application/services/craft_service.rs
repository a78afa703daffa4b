//! Craft Service - main application orchestrator.
//!
//! Two workflows:
//! 1. **compile**: read a source directory → extract literals → encode as a
//!    generator module (or emit TypeScript) → write with reconciliation
//! 2. **generate**: read a generator module → decode → render with bindings
//!    → write with reconciliation
//!
//! Both support a dry run that plans the write without touching the output.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::Filesystem,
        services::tree_sync::{ReadOptions, TreeSync, WriteReport},
    },
    domain::{
        Bindings, CompileReport, CompiledNode, Compiler, ParamSet, RuleSet, TreeNode,
        emit_typescript, generator_module,
    },
    error::CraftResult,
};

/// Output flavour of `compile`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Emit {
    /// A generator module that `generate` can load back.
    #[default]
    Native,
    /// Standalone TypeScript modules.
    TypeScript,
}

#[derive(Debug, Clone)]
pub struct CompileRequest {
    pub source: PathBuf,
    pub output: PathBuf,
    pub rules: RuleSet,
    pub read: ReadOptions,
    pub emit: Emit,
    pub dry_run: bool,
}

#[derive(Debug, Clone)]
pub struct CompileSummary {
    pub report: CompileReport,
    /// Parameters the root of the compiled generator requires.
    pub params: ParamSet,
    pub write: WriteReport,
}

#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub generator: PathBuf,
    pub output: PathBuf,
    pub bindings: Bindings,
    pub dry_run: bool,
}

#[derive(Debug, Clone)]
pub struct GenerateSummary {
    pub files: usize,
    pub write: WriteReport,
}

/// Main compile / generate service.
pub struct CraftService {
    filesystem: Box<dyn Filesystem>,
}

impl CraftService {
    /// Create a new service backed by the given filesystem adapter.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use sourcecraft_core::application::CraftService;
    /// # fn fs() -> Box<dyn sourcecraft_core::application::Filesystem> { unimplemented!() }
    ///
    /// let service = CraftService::new(fs());
    /// ```
    pub fn new(filesystem: Box<dyn Filesystem>) -> Self {
        Self { filesystem }
    }

    fn sync(&self) -> TreeSync<'_> {
        TreeSync::new(self.filesystem.as_ref())
    }

    /// Turn the directory at `request.source` into a generator.
    #[instrument(
        skip_all,
        fields(
            source = %request.source.display(),
            output = %request.output.display(),
            emit = ?request.emit,
        )
    )]
    pub fn compile(&self, request: &CompileRequest) -> CraftResult<CompileSummary> {
        ensure_disjoint(&request.source, &request.output)?;

        let tree = self.sync().read(&request.source, &request.read)?;
        debug!(files = tree.file_count(), "source read");

        let (compiled, report) = Compiler::new(&request.rules).run(&tree);
        let params = compiled.params().clone();

        let artifact = match request.emit {
            Emit::Native => generator_module::encode(&compiled)?,
            Emit::TypeScript => emit_typescript(&compiled)?,
        };

        let write = self.write(&request.output, &artifact, request.dry_run)?;
        info!(
            params = %params,
            replacements = report.total_replacements(),
            changes = write.changes(),
            dry_run = request.dry_run,
            "Compile completed"
        );

        Ok(CompileSummary {
            report,
            params,
            write,
        })
    }

    /// Read and validate the generator module stored at `dir`.
    #[instrument(skip_all, fields(generator = %dir.display()))]
    pub fn load_generator(&self, dir: &Path) -> CraftResult<CompiledNode> {
        let module = self.sync().read(dir, &ReadOptions::everything())?;
        let compiled = generator_module::decode(&module)?;
        debug!(params = %compiled.params(), "generator loaded");
        Ok(compiled)
    }

    /// Parameters a stored generator requires, in declaration order.
    pub fn params(&self, dir: &Path) -> CraftResult<ParamSet> {
        Ok(self.load_generator(dir)?.params().clone())
    }

    /// Render the generator at `request.generator` into `request.output`.
    #[instrument(
        skip_all,
        fields(
            generator = %request.generator.display(),
            output = %request.output.display(),
        )
    )]
    pub fn generate(&self, request: &GenerateRequest) -> CraftResult<GenerateSummary> {
        ensure_disjoint(&request.generator, &request.output)?;

        let compiled = self.load_generator(&request.generator)?;
        let tree = compiled.generate(&request.bindings)?;
        let files = tree.file_count();

        let write = self.write(&request.output, &tree, request.dry_run)?;
        info!(
            files,
            changes = write.changes(),
            dry_run = request.dry_run,
            "Generate completed"
        );

        Ok(GenerateSummary { files, write })
    }

    fn write(&self, output: &Path, tree: &TreeNode, dry_run: bool) -> CraftResult<WriteReport> {
        if dry_run {
            self.sync().plan(output, tree)
        } else {
            self.sync().write(output, tree)
        }
    }
}

/// Reconciling the output deletes anything not produced, so it must not
/// contain (or sit inside) the input.
fn ensure_disjoint(input: &Path, output: &Path) -> CraftResult<()> {
    let input_abs = absolute(input);
    let output_abs = absolute(output);
    if input_abs.starts_with(&output_abs) || output_abs.starts_with(&input_abs) {
        return Err(ApplicationError::OverlappingPaths {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
        }
        .into());
    }
    Ok(())
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
