//! Application layer for SourceCraft.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (CraftService, TreeSync)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! compile or generate logic itself. That lives in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    CompileRequest, CompileSummary, CraftService, Emit, GenerateRequest, GenerateSummary,
    ReadOptions, TreeSync, WriteReport,
};

// Re-export port traits (for adapter implementation)
pub use ports::{DirEntry, EntryKind, Filesystem};

pub use error::ApplicationError;
