//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "compile a directory" or "generate a project".

pub mod craft_service;
pub mod tree_sync;

pub use craft_service::{
    CompileRequest, CompileSummary, CraftService, Emit, GenerateRequest, GenerateSummary,
};
pub use tree_sync::{ReadOptions, TreeSync, WriteReport};
