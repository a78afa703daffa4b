//! SourceCraft Core - Hexagonal Architecture Implementation
//!
//! Turns a working example project into a reusable generator, and runs
//! generators to produce new projects.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │        sourcecraft-cli (CLI)            │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │       (CraftService, TreeSync)          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     Application Ports (Filesystem)      │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    sourcecraft-adapters (local, memory) │
//! └─────────────────────────────────────────┘
//!
//!          Domain Layer (pure, no I/O)
//!   TreeNode · RuleSet · Compiler · CompiledNode
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use sourcecraft_core::domain::{Bindings, Directory, LiteralRule, RuleSet, TreeNode, compile};
//!
//! let source: TreeNode = Directory::new()
//!     .with("my_app.txt", TreeNode::file("hello my_app"))
//!     .unwrap()
//!     .into();
//! let rules = RuleSet::new(vec![LiteralRule::new("my_app", "name")]).unwrap();
//!
//! let generator = compile(&source, &rules);
//! let bindings: Bindings = [("name", "shop")].into_iter().collect();
//! let out = generator.generate(&bindings).unwrap();
//!
//! assert_eq!(out.get_path("shop.txt"), Some(&TreeNode::file("hello shop")));
//! ```

pub mod application;
pub mod domain;
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        CompileRequest, CraftService, Emit, GenerateRequest, ReadOptions, TreeSync, WriteReport,
        ports::{DirEntry, EntryKind, Filesystem},
    };
    pub use crate::domain::{
        Bindings, CaseStyle, CompiledNode, Content, Directory, LiteralRule, ParamSet, RuleSet,
        TreeNode,
    };
    pub use crate::error::{CraftError, CraftResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
