//! Core domain layer for SourceCraft.
//!
//! This module contains pure logic with no I/O. Trees come in from and go
//! out to the filesystem through ports defined in the application layer.
//!
//! ## Pieces
//!
//! - **Tree model**: [`TreeNode`], an in-memory directory tree
//! - **Rules**: [`LiteralRule`] / [`RuleSet`], which literal becomes which parameter
//! - **Compiler**: tree + rules → [`CompiledNode`] (a generator)
//! - **Runtime**: [`CompiledNode::generate`], generator + bindings → tree
//! - **Codecs**: [`generator_module`] (persisted form) and [`emit_typescript`]
//!
// Public API - what the world sees
pub mod compiler;
pub mod entities;
pub mod error;
pub mod generator_module;
pub mod typescript;
pub mod value_objects;

// Re-exports for convenience
pub use compiler::{CompileReport, Compiler, compile};
pub use entities::{
    compiled::{CompiledDirectory, CompiledEntry, CompiledFile, CompiledNode, FileBody},
    rule::{LiteralRule, RuleSet},
    template::{Placeholder, Segment, Template},
    tree::{Content, Directory, File, TreeNode, validate_entry_name},
};

pub use error::{DomainError, ErrorCategory};

pub use typescript::emit_typescript;

pub use value_objects::{Bindings, CaseStyle, ParamSet};

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> TreeNode {
        let src = Directory::new()
            .with(
                "my_app.rs",
                TreeNode::file("pub struct MyApp;\nconst NAME: &str = \"my_app\";\n"),
            )
            .unwrap()
            .with("blog_post.rs", TreeNode::file("// post for my_app"))
            .unwrap();
        Directory::new()
            .with("Cargo.toml", TreeNode::file("[package]\nname = \"my_app\"\n"))
            .unwrap()
            .with("src", src.into())
            .unwrap()
            .with("logo.png", TreeNode::binary(vec![0x89, b'P', b'N', b'G', 0xff]))
            .unwrap()
            .into()
    }

    fn rules() -> RuleSet {
        RuleSet::new(vec![
            LiteralRule::new("my_app", "app_name"),
            LiteralRule::new("MyApp", "AppName"),
            LiteralRule::new("blog_post", "entry"),
        ])
        .unwrap()
    }

    // ========================================================================
    // Whole-pipeline properties
    // ========================================================================

    #[test]
    fn identity_bindings_reproduce_the_source() {
        let tree = source();
        let compiled = compile(&tree, &rules());
        let bindings: Bindings = [
            ("app_name", "my_app"),
            ("AppName", "MyApp"),
            ("entry", "blog_post"),
        ]
        .into_iter()
        .collect();

        assert_eq!(compiled.generate(&bindings).unwrap(), tree);
    }

    #[test]
    fn new_bindings_rename_names_and_contents() {
        let compiled = compile(&source(), &rules());
        let bindings: Bindings = [("app_name", "shop"), ("AppName", "Shop"), ("entry", "order")]
            .into_iter()
            .collect();
        let out = compiled.generate(&bindings).unwrap();

        assert_eq!(
            out.get_path("src/shop.rs"),
            Some(&TreeNode::file(
                "pub struct Shop;\nconst NAME: &str = \"shop\";\n"
            ))
        );
        assert_eq!(
            out.get_path("src/order.rs"),
            Some(&TreeNode::file("// post for shop"))
        );
    }

    #[test]
    fn every_directory_declares_the_union_of_its_children() {
        let compiled = compile(&source(), &rules());
        compiled.check_invariants().unwrap();

        let root = compiled.as_directory().unwrap();
        let names: Vec<&str> = root.params().iter().collect();
        assert_eq!(names, vec!["app_name", "entry", "AppName"]);
        assert!(root.get("logo.png").unwrap().params.is_empty());
    }

    #[test]
    fn generating_is_deterministic() {
        let compiled = compile(&source(), &rules());
        let bindings: Bindings = [("app_name", "shop"), ("AppName", "Shop"), ("entry", "order")]
            .into_iter()
            .collect();
        assert_eq!(
            compiled.generate(&bindings).unwrap(),
            compiled.generate(&bindings).unwrap()
        );
    }

    #[test]
    fn persisted_module_decodes_to_the_same_generator() {
        let compiled = compile(&source(), &rules());
        let module = generator_module::encode(&compiled).unwrap();
        assert_eq!(generator_module::decode(&module).unwrap(), compiled);
    }

    #[test]
    fn missing_binding_names_parameter_and_path() {
        let compiled = compile(&source(), &rules());
        let bindings: Bindings = [("app_name", "shop"), ("AppName", "Shop")]
            .into_iter()
            .collect();
        let err = compiled.generate(&bindings).unwrap_err();
        assert!(matches!(
            err,
            DomainError::MissingParameter { ref name, ref path }
                if name == "entry" && path == "src/blog_post.rs"
        ));
    }
}
