//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "sourcecraft",
    bin_name = "sourcecraft",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Turn a working example project into a reusable generator",
    long_about = "SourceCraft replaces chosen literals in an example directory \
                  with named parameters, stores the result as a generator, and \
                  renders new projects from it.",
    after_help = "EXAMPLES:\n\
        \x20 sourcecraft compile ./todo-app ./gen --rule todo_app=app_name\n\
        \x20 sourcecraft params ./gen\n\
        \x20 sourcecraft generate ./gen ./shop --set app_name=shop\n\
        \x20 sourcecraft completions bash > /usr/share/bash-completion/completions/sourcecraft",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Compile an example directory into a generator.
    #[command(
        visible_alias = "c",
        about = "Compile a directory into a generator",
        after_help = "EXAMPLES:\n\
            \x20 sourcecraft compile ./example ./gen --rules rules.toml\n\
            \x20 sourcecraft compile ./example ./gen --rule my_app=app_name --ignore dist/\n\
            \x20 sourcecraft compile ./example ./gen-ts --rule my_app=app_name --emit typescript"
    )]
    Compile(CompileArgs),

    /// Render a generator into a directory.
    #[command(
        visible_alias = "g",
        about = "Generate a directory from a generator",
        after_help = "EXAMPLES:\n\
            \x20 sourcecraft generate ./gen ./out --set app_name=shop\n\
            \x20 sourcecraft generate ./gen ./out --values values.toml --dry-run"
    )]
    Generate(GenerateArgs),

    /// Show the parameters a generator needs.
    #[command(
        about = "List a generator's parameters",
        after_help = "EXAMPLES:\n\
            \x20 sourcecraft params ./gen\n\
            \x20 sourcecraft params ./gen --format json"
    )]
    Params(ParamsArgs),

    /// Initialise a SourceCraft configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 sourcecraft init           # platform config location\n\
            \x20 sourcecraft init --force   # overwrite an existing file"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 sourcecraft completions bash > ~/.local/share/bash-completion/completions/sourcecraft\n\
            \x20 sourcecraft completions zsh  > ~/.zfunc/_sourcecraft\n\
            \x20 sourcecraft completions fish > ~/.config/fish/completions/sourcecraft.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the SourceCraft configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 sourcecraft config get ignore.patterns\n\
            \x20 sourcecraft config list\n\
            \x20 sourcecraft config path"
    )]
    Config(ConfigCommands),
}

// ── compile ───────────────────────────────────────────────────────────────────

/// Arguments for `sourcecraft compile`.
#[derive(Debug, Args)]
pub struct CompileArgs {
    /// Example directory to compile.
    #[arg(value_name = "SOURCE", help = "Example directory to compile")]
    pub source: PathBuf,

    /// Where the generator is written. Its contents are replaced.
    #[arg(value_name = "OUTPUT", help = "Generator output directory")]
    pub output: PathBuf,

    /// TOML file with `[[rules]]` tables.
    #[arg(
        short = 'r',
        long = "rules",
        value_name = "FILE",
        help = "Rules file (TOML)"
    )]
    pub rules: Option<PathBuf>,

    /// Extra rules, applied after those from `--rules`.
    #[arg(
        long = "rule",
        value_name = "LITERAL=PARAM",
        help = "Replace LITERAL with parameter PARAM (repeatable)"
    )]
    pub rule: Vec<String>,

    /// Extra `.gitignore`-style patterns.
    #[arg(
        short = 'i',
        long = "ignore",
        value_name = "PATTERN",
        help = "Ignore paths matching PATTERN (repeatable)"
    )]
    pub ignore: Vec<String>,

    /// Read files even if an ignore file excludes them.
    #[arg(long = "no-ignore-files", help = "Do not read .gitignore files")]
    pub no_ignore_files: bool,

    /// Output flavour.
    #[arg(
        long = "emit",
        value_enum,
        default_value = "native",
        help = "Generator format"
    )]
    pub emit: EmitFormat,

    /// Preview what would be written without writing any files.
    #[arg(long = "dry-run", help = "Show changes without writing")]
    pub dry_run: bool,
}

/// Generator formats `compile` can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EmitFormat {
    /// Generator module readable by `sourcecraft generate`.
    Native,
    /// TypeScript modules.
    #[value(alias = "ts")]
    Typescript,
}

// ── generate ──────────────────────────────────────────────────────────────────

/// Arguments for `sourcecraft generate`.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Generator directory, as written by `compile`.
    #[arg(value_name = "GENERATOR", help = "Generator directory")]
    pub generator: PathBuf,

    /// Where the generated tree is written. Its contents are replaced.
    #[arg(value_name = "OUTPUT", help = "Output directory")]
    pub output: PathBuf,

    /// TOML file of parameter values.
    #[arg(long = "values", value_name = "FILE", help = "Values file (TOML)")]
    pub values: Option<PathBuf>,

    /// Parameter values, overriding `--values`.
    #[arg(
        short = 's',
        long = "set",
        value_name = "KEY=VALUE",
        help = "Set a parameter (repeatable)"
    )]
    pub set: Vec<String>,

    /// Prompt for parameters that have no value.
    #[arg(short = 'I', long = "interactive", help = "Prompt for missing values")]
    pub interactive: bool,

    /// Preview what would be written without writing any files.
    #[arg(long = "dry-run", help = "Show changes without writing")]
    pub dry_run: bool,
}

// ── params ────────────────────────────────────────────────────────────────────

/// Arguments for `sourcecraft params`.
#[derive(Debug, Args)]
pub struct ParamsArgs {
    /// Generator directory.
    #[arg(value_name = "GENERATOR", help = "Generator directory")]
    pub generator: PathBuf,

    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for the `params` command.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One name per line.
    List,
    /// JSON array.
    Json,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `sourcecraft init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write here instead of the platform config location.
    #[arg(long = "path", value_name = "FILE", help = "Config file to create")]
    pub path: Option<PathBuf>,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `sourcecraft completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `sourcecraft config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `ignore.patterns`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
