//! Literal extractor: turns a concrete [`TreeNode`] into a [`CompiledNode`].
//!
//! For every file, rules are applied strictly in caller order over a running
//! template. Each rule only sees raw text that no earlier rule has claimed,
//! so with `[profile -> a, profiles -> b]` the content `profiles` becomes
//! `${a}s` and `b` is never used. Entry names go through the same process,
//! which is how a directory named after a module becomes `${module}`.
//!
//! Compilation is post-order and deterministic: children are visited in
//! lexicographic order and parameter sets keep first-seen order, so the same
//! `(tree, rules)` always compiles to the same result.

use tracing::{debug, info, instrument};

use crate::domain::{
    entities::{
        compiled::{CompiledDirectory, CompiledEntry, CompiledFile, CompiledNode},
        rule::{LiteralRule, RuleSet},
        template::{Placeholder, Template},
        tree::{Content, TreeNode, join},
    },
    value_objects::CaseStyle,
};

/// Per-rule replacement counts from one compile run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileReport {
    /// `(literal, template, replacements)` in rule order.
    pub usage: Vec<(String, String, usize)>,
    pub files: usize,
    pub parameterized_files: usize,
}

impl CompileReport {
    /// Rules that matched nothing anywhere in the tree.
    pub fn unused(&self) -> impl Iterator<Item = (&str, &str)> {
        self.usage
            .iter()
            .filter(|(_, _, n)| *n == 0)
            .map(|(literal, template, _)| (literal.as_str(), template.as_str()))
    }

    pub fn total_replacements(&self) -> usize {
        self.usage.iter().map(|(_, _, n)| n).sum()
    }
}

/// Compile `tree` with `rules`.
pub fn compile(tree: &TreeNode, rules: &RuleSet) -> CompiledNode {
    Compiler::new(rules).run(tree).0
}

/// Stateful form of [`compile`] that also reports rule usage.
pub struct Compiler<'r> {
    rules: &'r RuleSet,
    report: CompileReport,
}

impl<'r> Compiler<'r> {
    pub fn new(rules: &'r RuleSet) -> Self {
        let usage = rules
            .rules()
            .iter()
            .map(|r| (r.literal.clone(), r.template.clone(), 0))
            .collect();
        Self {
            rules,
            report: CompileReport {
                usage,
                ..CompileReport::default()
            },
        }
    }

    #[instrument(skip_all, fields(rules = self.rules.len()))]
    pub fn run(mut self, tree: &TreeNode) -> (CompiledNode, CompileReport) {
        let compiled = self.compile_node("", None, tree);

        for (literal, template) in self.report.unused() {
            info!(literal, template, "literal rule matched nothing");
        }
        debug!(
            files = self.report.files,
            parameterized = self.report.parameterized_files,
            replacements = self.report.total_replacements(),
            "compile finished"
        );

        (compiled, self.report)
    }

    fn compile_node(&mut self, path: &str, name: Option<&str>, node: &TreeNode) -> CompiledNode {
        match node {
            TreeNode::File(file) => {
                self.report.files += 1;
                match &file.content {
                    Content::Binary(bytes) => {
                        debug!(path, "binary file copied through");
                        CompiledNode::File(CompiledFile::binary(bytes.clone()))
                    }
                    Content::Text(text) => {
                        let template = self.extract(text, |rule| name.and_then(|n| rule.case_for(n)));
                        if !template.is_static() {
                            self.report.parameterized_files += 1;
                        }
                        CompiledNode::File(CompiledFile::text(template))
                    }
                }
            }
            TreeNode::Directory(dir) => {
                let mut compiled = CompiledDirectory::new();
                for (child_name, child) in dir.children() {
                    let child_path = join(path, child_name);
                    let node = self.compile_node(&child_path, Some(child_name), child);
                    let name_template = match child {
                        TreeNode::File(_) => self.extract(child_name, |rule| rule.case_for(child_name)),
                        TreeNode::Directory(_) => self.extract(child_name, |_| None),
                    };
                    compiled.insert(child_name, CompiledEntry::new(name_template, node));
                }
                CompiledNode::Directory(compiled)
            }
        }
    }

    /// Apply every rule, in order, to `text`.
    fn extract(
        &mut self,
        text: &str,
        case_for: impl Fn(&LiteralRule) -> Option<CaseStyle>,
    ) -> Template {
        let mut template = Template::literal(text);
        for (index, rule) in self.rules.rules().iter().enumerate() {
            if !text.contains(rule.literal.as_str()) {
                continue;
            }
            let placeholder = Placeholder::new(rule.template.clone(), case_for(rule));
            let replaced = template.substitute(&rule.literal, &placeholder);
            self.report.usage[index].2 += replaced;
        }
        template
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        entities::{rule::LiteralRule, template::Segment, tree::Directory},
        value_objects::Bindings,
    };

    fn rules(pairs: &[(&str, &str)]) -> RuleSet {
        RuleSet::new(pairs.iter().map(|(l, t)| LiteralRule::new(*l, *t)).collect()).unwrap()
    }

    fn tree() -> TreeNode {
        let entry = Directory::new()
            .with("post.rs", TreeNode::file("pub struct Post;\n// my_app"))
            .unwrap();
        let src = Directory::new()
            .with("post", entry.into())
            .unwrap()
            .with("main.rs", TreeNode::file("fn main() { my_app::run() }"))
            .unwrap();
        Directory::new()
            .with("src", src.into())
            .unwrap()
            .with("logo.png", TreeNode::binary(vec![0x89, 0x50, 0xff]))
            .unwrap()
            .with("LICENSE", TreeNode::file("MIT"))
            .unwrap()
            .into()
    }

    #[test]
    fn overlapping_rules_earlier_wins() {
        let compiled = compile(
            &TreeNode::file("profiles"),
            &rules(&[("profile", "a"), ("profiles", "b")]),
        );
        let CompiledNode::File(file) = &compiled else {
            panic!("expected file");
        };
        let crate::domain::entities::compiled::FileBody::Text(t) = &file.body else {
            panic!("expected text");
        };
        assert_eq!(
            t.segments(),
            &[
                Segment::Placeholder(Placeholder::new("a", None)),
                Segment::Text("s".into())
            ]
        );
        assert_eq!(compiled.params().iter().collect::<Vec<_>>(), vec!["a"]);
    }

    #[test]
    fn names_are_parameterized() {
        let compiled = compile(&tree(), &rules(&[("post", "entry"), ("my_app", "app")]));
        let src = compiled.as_directory().unwrap().get("src").unwrap();
        let post = src.node.as_directory().unwrap().get("post").unwrap();
        assert_eq!(post.name.to_source(), "${entry}");
        let file = post.node.as_directory().unwrap().get("post.rs").unwrap();
        assert_eq!(file.name.to_source(), "${entry}.rs");
        // "Post" differs in case from the literal and stays untouched.
        assert_eq!(file.params.iter().collect::<Vec<_>>(), vec!["entry", "app"]);
    }

    #[test]
    fn directory_params_follow_sorted_entries() {
        let compiled = compile(&tree(), &rules(&[("post", "entry"), ("my_app", "app")]));
        // "src/main.rs" (app) sorts before "src/post" (entry, app).
        assert_eq!(
            compiled.params().iter().collect::<Vec<_>>(),
            vec!["app", "entry"]
        );
        compiled.check_invariants().unwrap();
    }

    #[test]
    fn round_trip_with_literal_bindings() {
        let rules = rules(&[("post", "entry"), ("my_app", "app"), ("MIT", "license")]);
        let source = tree();
        let generated = compile(&source, &rules)
            .generate(&rules.literal_bindings())
            .unwrap();
        assert_eq!(generated, source);
    }

    #[test]
    fn compile_is_deterministic() {
        let rules = rules(&[("post", "entry"), ("my_app", "app")]);
        let a = compile(&tree(), &rules);
        let b = compile(&tree(), &rules);
        assert_eq!(a, b);
        assert_eq!(
            a.params().iter().collect::<Vec<_>>(),
            b.params().iter().collect::<Vec<_>>()
        );
    }

    #[test]
    fn case_by_extension_applies_per_file() {
        let rule = LiteralRule::new("MyModule", "module").with_case("rs", CaseStyle::SnakeCase);
        let rules = RuleSet::new(vec![rule]).unwrap();
        let source: TreeNode = Directory::new()
            .with("lib.rs", TreeNode::file("mod MyModule;"))
            .unwrap()
            .with("index.ts", TreeNode::file("import MyModule"))
            .unwrap()
            .into();

        let bindings: Bindings = [("module", "MyModule")].into_iter().collect();
        let out = compile(&source, &rules).generate(&bindings).unwrap();
        assert_eq!(out.get_path("lib.rs"), Some(&TreeNode::file("mod my_module;")));
        assert_eq!(out.get_path("index.ts"), Some(&TreeNode::file("import MyModule")));
    }

    #[test]
    fn binary_files_are_not_scanned() {
        let rules = rules(&[("P", "p")]);
        let (compiled, report) = Compiler::new(&rules).run(&tree());
        let logo = compiled.as_directory().unwrap().get("logo.png").unwrap();
        assert!(logo.params.is_empty());
        assert_eq!(report.files, 4);
    }

    #[test]
    fn reports_unused_rules() {
        let rules = rules(&[("my_app", "app"), ("nowhere", "ghost")]);
        let (_, report) = Compiler::new(&rules).run(&tree());
        assert_eq!(report.unused().collect::<Vec<_>>(), vec![("nowhere", "ghost")]);
        assert_eq!(report.total_replacements(), 2);
    }
}
