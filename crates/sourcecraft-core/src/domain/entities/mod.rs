pub mod compiled;
pub mod rule;
pub mod template;
pub mod tree;

pub use crate::domain::DomainError;
pub use compiled::{CompiledDirectory, CompiledEntry, CompiledFile, CompiledNode, FileBody};
pub use rule::{LiteralRule, RuleSet};
pub use template::{Placeholder, Segment, Template};
pub use tree::{Content, Directory, File, TreeNode};
