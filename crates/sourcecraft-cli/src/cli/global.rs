//! Flags shared by every subcommand, flattened into [`super::Cli`].

use std::path::PathBuf;

use clap::{ArgAction, Args, ValueEnum};

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Increase verbosity (-v, -vv, -vvv)
    ///
    /// With no flag only warnings and errors are logged. `-v` adds stage
    /// summaries and unused rules, `-vv` per-stage detail, `-vvv` every file
    /// and ignore decision. `RUST_LOG` overrides all of these.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output (also set by NO_COLOR)
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Read configuration from FILE instead of the platform location
    #[arg(short, long, global = true, value_name = "FILE", env = "SOURCECRAFT_CONFIG")]
    pub config: Option<PathBuf>,

    /// How results are printed on stdout
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Auto)]
    pub output_format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human on a terminal, plain otherwise
    #[default]
    Auto,
    /// Colored, with spinners
    Human,
    /// No colors, no spinners
    Plain,
    /// One JSON document per command
    Json,
}
