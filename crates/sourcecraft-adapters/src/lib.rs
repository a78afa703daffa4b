//! Infrastructure adapters for SourceCraft.
//!
//! This crate implements the ports defined in `sourcecraft-core::application::ports`
//! and the file formats the CLI reads. It contains all `std::fs` access.

pub mod filesystem;
pub mod rules_file;
pub mod values_file;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use rules_file::{load_rules, parse_rule_arg};
pub use values_file::{load_values, parse_set_arg};
