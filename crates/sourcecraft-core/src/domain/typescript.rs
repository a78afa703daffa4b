//! TypeScript emitter for compiled generators.
//!
//! Produces a tree of `.ts` modules that JavaScript tooling can import and
//! call directly. Every directory gets an `index.ts` whose default export
//! takes exactly the directory's parameters and returns an `ScDirectory`;
//! every text file `x` becomes `x.ts` exporting a function that returns an
//! `ScFile` built from a backtick template literal.
//!
//! The root also receives `_types.ts` with the node types and `_case.ts`
//! with the case helpers, so the output has no runtime dependencies. The
//! helpers split words the way the native runtime does (`heck`): boundaries
//! at non-alphanumerics, at lower→upper, and before the last capital of an
//! acronym (`HTTPServer` → `http_server`); digits never start a word
//! (`Module2` → `module2`).
//!
//! Import names never reuse a parameter name, so a directory named after its
//! own parameter still calls the right module.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use heck::ToLowerCamelCase;
use tracing::instrument;

use crate::domain::{
    entities::{
        compiled::{CompiledDirectory, CompiledNode, FileBody},
        template::{Placeholder, Segment, Template, escape},
        tree::{Directory, TreeNode},
    },
    error::DomainError,
    value_objects::{CaseStyle, ParamSet},
};

const TYPES_MODULE: &str = "_types";

const TYPES_SOURCE: &str = "\
export type ScFile = { type: 'file'; content: string | Uint8Array };
export type ScDirectory = { type: 'directory'; children: Record<string, ScNode> };
export type ScNode = ScFile | ScDirectory;
";

const CASE_MODULE: &str = "_case";

const CASE_SOURCE: &str = r#"const isLower = (c: string): boolean => c !== c.toUpperCase();
const isUpper = (c: string): boolean => c !== c.toLowerCase();

function words(value: string): string[] {
  const out: string[] = [];
  for (const word of value.split(/[^\p{L}\p{N}]/u)) {
    const chars = Array.from(word);
    let start = 0;
    let mode: 'boundary' | 'lower' | 'upper' = 'boundary';
    for (let i = 0; i < chars.length; i++) {
      const c = chars[i];
      const next = chars[i + 1];
      if (next === undefined) {
        out.push(chars.slice(start).join(''));
        break;
      }
      const nextMode = isLower(c) ? 'lower' : isUpper(c) ? 'upper' : mode;
      if (nextMode === 'lower' && isUpper(next)) {
        out.push(chars.slice(start, i + 1).join(''));
        start = i + 1;
        mode = 'boundary';
      } else if (mode === 'upper' && isUpper(c) && isLower(next)) {
        out.push(chars.slice(start, i).join(''));
        start = i;
        mode = 'boundary';
      } else {
        mode = nextMode;
      }
    }
  }
  return out.filter((w) => w.length > 0);
}

const capitalize = (w: string): string => {
  const [first = '', ...rest] = Array.from(w);
  return first.toUpperCase() + rest.join('').toLowerCase();
};

export const snakeCase = (v: string): string => words(v).map((w) => w.toLowerCase()).join('_');
export const kebabCase = (v: string): string => words(v).map((w) => w.toLowerCase()).join('-');
export const screamingSnakeCase = (v: string): string =>
  words(v).map((w) => w.toUpperCase()).join('_');
export const titleCase = (v: string): string => words(v).map(capitalize).join(' ');
export const pascalCase = (v: string): string => words(v).map(capitalize).join('');
export const camelCase = (v: string): string =>
  words(v).map((w, i) => (i === 0 ? w.toLowerCase() : capitalize(w))).join('');
"#;

/// Names an import must never take: the type imports and JS keywords.
const RESERVED: &[&str] = &[
    "ScDirectory", "ScFile", "await", "break", "case", "catch", "class", "const",
    "continue", "debugger", "default", "delete", "do", "else", "enum", "export",
    "extends", "false", "finally", "for", "function", "if", "import", "in",
    "instanceof", "let", "new", "null", "return", "static", "super", "switch",
    "this", "throw", "true", "try", "typeof", "var", "void", "while", "with",
    "yield",
];

/// Emit `compiled` as a tree of TypeScript modules.
///
/// # Errors
///
/// [`DomainError::InvalidModule`] if the root is not a directory or an entry
/// clashes with a generated module name.
#[instrument(skip_all)]
pub fn emit_typescript(compiled: &CompiledNode) -> Result<TreeNode, DomainError> {
    let CompiledNode::Directory(dir) = compiled else {
        return Err(DomainError::InvalidModule {
            path: ".".into(),
            reason: "only directories can be emitted as TypeScript".into(),
        });
    };

    let mut root = emit_directory(dir, 0)?;
    root.insert(format!("{TYPES_MODULE}.ts"), TreeNode::file(TYPES_SOURCE))?;
    root.insert(format!("{CASE_MODULE}.ts"), TreeNode::file(CASE_SOURCE))?;
    Ok(root.into())
}

fn emit_directory(dir: &CompiledDirectory, depth: usize) -> Result<Directory, DomainError> {
    let mut out = Directory::new();
    let cases = helper_namespace(dir.params());
    let mut idents: BTreeSet<String> = dir.params().iter().map(str::to_string).collect();
    idents.insert(cases.clone());
    let mut imports = String::new();
    let mut children = String::new();

    for (source, entry) in dir.entries() {
        let (module, node) = match &entry.node {
            CompiledNode::Directory(child) => (
                source.to_string(),
                TreeNode::Directory(emit_directory(child, depth + 1)?),
            ),
            CompiledNode::File(file) => (
                format!("{source}.ts"),
                TreeNode::file(emit_file(&file.body, file.params(), depth)),
            ),
        };
        let generated = [
            "index.ts".to_string(),
            format!("{TYPES_MODULE}.ts"),
            format!("{CASE_MODULE}.ts"),
        ];
        if generated.contains(&module) || out.contains(&module) {
            return Err(DomainError::InvalidModule {
                path: source.to_string(),
                reason: format!("'{module}' clashes with a generated module"),
            });
        }
        out.insert(module, node)?;

        let ident = unique_ident(source, &mut idents);
        let _ = writeln!(imports, "import {ident} from './{}';", quoted_path(source));
        let node_params = entry.node.params();
        let _ = writeln!(
            children,
            "    [`{}`]: {ident}({}),",
            template_literal_body(&entry.name, &cases),
            call_args(node_params),
        );
    }

    let mut index = String::new();
    let _ = writeln!(
        index,
        "import type {{ ScDirectory }} from '{}{TYPES_MODULE}';",
        up(depth)
    );
    if needs_helpers(dir.entries().map(|(_, e)| &e.name)) {
        index.push_str(&helper_import(&cases, depth));
    }
    index.push_str(&imports);
    let _ = write!(
        index,
        "\nexport default ({}): ScDirectory => ({{\n  type: 'directory',\n  children: {{\n{children}  }},\n}});\n",
        signature(dir.params()),
    );
    out.insert("index.ts", TreeNode::file(index))?;

    Ok(out)
}

fn emit_file(body: &FileBody, params: &ParamSet, depth: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "import type {{ ScFile }} from '{}{TYPES_MODULE}';",
        up(depth)
    );

    let content = match body {
        FileBody::Text(template) => {
            let cases = helper_namespace(params);
            if needs_helpers(std::iter::once(template)) {
                out.push_str(&helper_import(&cases, depth));
            }
            format!("`{}`", template_literal_body(template, &cases))
        }
        FileBody::Binary(bytes) => {
            let list: Vec<String> = bytes.iter().map(u8::to_string).collect();
            format!("new Uint8Array([{}])", list.join(", "))
        }
    };

    let _ = write!(
        out,
        "\nexport default ({}): ScFile => ({{\n  type: 'file',\n  content: {content},\n}});\n",
        signature(params),
    );
    out
}

/// Namespace the case helpers are imported under; never one of `params`.
fn helper_namespace(params: &ParamSet) -> String {
    let mut ns = String::from("cases");
    while params.contains(&ns) {
        ns.push('_');
    }
    ns
}

fn helper_import(ns: &str, depth: usize) -> String {
    format!("import * as {ns} from '{}{CASE_MODULE}';\n", up(depth))
}

fn needs_helpers<'a>(mut templates: impl Iterator<Item = &'a Template>) -> bool {
    templates.any(|t| {
        t.placeholders().any(|p| {
            !matches!(
                p.case,
                None | Some(CaseStyle::Lowercase | CaseStyle::Uppercase)
            )
        })
    })
}

/// Body of a backtick literal: escaped text plus `${expr}` interpolations.
fn template_literal_body(template: &Template, cases: &str) -> String {
    let mut out = String::new();
    for segment in template.segments() {
        match segment {
            Segment::Text(text) => out.push_str(&escape_literal_text(text)),
            Segment::Placeholder(p) => {
                let _ = write!(out, "${{{}}}", case_expr(p, cases));
            }
        }
    }
    out
}

/// [`escape`] plus the line terminators JavaScript would otherwise rewrite
/// or reject inside a template literal (a raw CR or CRLF reads back as LF).
fn escape_literal_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in escape(text).chars() {
        match c {
            '\r' => out.push_str("\\r"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            other => out.push(other),
        }
    }
    out
}

/// `source` escaped for a single-quoted module specifier.
fn quoted_path(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    for c in source.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            other => out.push(other),
        }
    }
    out
}

fn case_expr(p: &Placeholder, cases: &str) -> String {
    let v = &p.param;
    match p.case {
        None => v.clone(),
        Some(CaseStyle::SnakeCase) => format!("{cases}.snakeCase({v})"),
        Some(CaseStyle::CamelCase) => format!("{cases}.camelCase({v})"),
        Some(CaseStyle::PascalCase) => format!("{cases}.pascalCase({v})"),
        Some(CaseStyle::KebabCase) => format!("{cases}.kebabCase({v})"),
        Some(CaseStyle::TitleCase) => format!("{cases}.titleCase({v})"),
        Some(CaseStyle::ScreamingSnakeCase) => format!("{cases}.screamingSnakeCase({v})"),
        Some(CaseStyle::Lowercase) => format!("{v}.toLowerCase()"),
        Some(CaseStyle::Uppercase) => format!("{v}.toUpperCase()"),
    }
}

fn signature(params: &ParamSet) -> String {
    if params.is_empty() {
        return String::new();
    }
    let names: Vec<&str> = params.iter().collect();
    let types: Vec<String> = names.iter().map(|n| format!("{n}: string")).collect();
    format!("{{ {} }}: {{ {} }}", names.join(", "), types.join("; "))
}

fn call_args(params: &ParamSet) -> String {
    if params.is_empty() {
        String::new()
    } else {
        format!("{{ {} }}", params.iter().collect::<Vec<_>>().join(", "))
    }
}

fn up(depth: usize) -> String {
    if depth == 0 {
        "./".into()
    } else {
        "../".repeat(depth)
    }
}

/// camelCase identifier for an import, unique within one `index.ts`.
fn unique_ident(source: &str, taken: &mut BTreeSet<String>) -> String {
    let mut base = source.to_lower_camel_case();
    base.retain(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if base.is_empty()
        || base.starts_with(|c: char| c.is_ascii_digit())
        || RESERVED.contains(&base.as_str())
    {
        base.insert(0, '_');
    }

    let mut ident = base.clone();
    let mut n = 2;
    while !taken.insert(ident.clone()) {
        ident = format!("{base}{n}");
        n += 1;
    }
    ident
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        compiler::compile,
        entities::rule::{LiteralRule, RuleSet},
    };

    fn emitted() -> TreeNode {
        let src = Directory::new()
            .with(
                "blog.rs",
                TreeNode::file("mod blog; // `quoted` ${kept}"),
            )
            .unwrap();
        let tree: TreeNode = Directory::new()
            .with("src", src.into())
            .unwrap()
            .with("README.md", TreeNode::file("# Docs"))
            .unwrap()
            .into();
        let rule = LiteralRule::new("blog", "app").with_case("rs", CaseStyle::PascalCase);
        let rules = RuleSet::new(vec![rule]).unwrap();
        emit_typescript(&compile(&tree, &rules)).unwrap()
    }

    fn text<'a>(tree: &'a TreeNode, path: &str) -> &'a str {
        tree.get_path(path)
            .and_then(TreeNode::as_file)
            .and_then(|f| f.content.as_text())
            .unwrap()
    }

    #[test]
    fn emits_index_per_directory_and_module_per_file() {
        let out = emitted();
        assert!(out.get_path("index.ts").is_some());
        assert!(out.get_path("_types.ts").is_some());
        assert!(out.get_path("_case.ts").is_some());
        assert!(out.get_path("README.md.ts").is_some());
        assert!(out.get_path("src/index.ts").is_some());
        assert!(out.get_path("src/blog.rs.ts").is_some());
    }

    #[test]
    fn file_module_escapes_text_and_interpolates_params() {
        let out = emitted();
        let module = text(&out, "src/blog.rs.ts");
        assert!(module.contains("import type { ScFile } from '../_types';"));
        assert!(module.contains("import * as cases from '../_case';"));
        assert!(module.contains(r"`mod ${cases.pascalCase(app)}; // \`quoted\` \${kept}`"));
        assert!(module.contains("export default ({ app }: { app: string }): ScFile"));
    }

    #[test]
    fn directory_index_wires_children() {
        let out = emitted();
        let index = text(&out, "src/index.ts");
        assert!(index.contains("import blogRs from './blog.rs';"));
        assert!(index.contains("[`${cases.pascalCase(app)}.rs`]: blogRs({ app }),"));

        let root = text(&out, "index.ts");
        assert!(root.contains("import readmeMd from './README.md';"));
        assert!(root.contains("[`README.md`]: readmeMd(),"));
        assert!(root.contains("[`src`]: src({ app }),"));
        assert!(!root.contains("_case"));
    }

    #[test]
    fn imports_never_shadow_a_parameter() {
        let post = Directory::new()
            .with("post.rs", TreeNode::file("struct Post;"))
            .unwrap();
        let tree: TreeNode = Directory::new().with("post", post.into()).unwrap().into();
        let rules = RuleSet::new(vec![LiteralRule::new("post", "post")]).unwrap();
        let out = emit_typescript(&compile(&tree, &rules)).unwrap();

        let root = text(&out, "index.ts");
        assert!(root.contains("import post2 from './post';"));
        assert!(root.contains("[`${post}`]: post2({ post }),"));
        assert!(root.contains("export default ({ post }: { post: string }): ScDirectory"));

        let inner = text(&out, "post/index.ts");
        assert!(inner.contains("import postRs from './post.rs';"));
    }

    #[test]
    fn helper_namespace_steps_around_a_parameter_called_cases() {
        let tree: TreeNode = Directory::new()
            .with("cases.txt", TreeNode::file("cases"))
            .unwrap()
            .into();
        let rule = LiteralRule::new("cases", "cases").with_case("txt", CaseStyle::SnakeCase);
        let rules = RuleSet::new(vec![rule]).unwrap();
        let out = emit_typescript(&compile(&tree, &rules)).unwrap();

        let root = text(&out, "index.ts");
        assert!(root.contains("import * as cases_ from './_case';"));
        assert!(root.contains("[`${cases_.snakeCase(cases)}.txt`]"));
    }

    #[test]
    fn carriage_returns_and_separators_are_escaped() {
        let tree: TreeNode = Directory::new()
            .with("notes.txt", TreeNode::file("q\r\ny\u{2028}z\u{2029}"))
            .unwrap()
            .with("a\rb", TreeNode::file(""))
            .unwrap()
            .into();
        let rules = RuleSet::new(vec![LiteralRule::new("q", "q")]).unwrap();
        let out = emit_typescript(&compile(&tree, &rules)).unwrap();

        let module = text(&out, "notes.txt.ts");
        assert!(module.contains("`${q}\\r\ny\\u2028z\\u2029`"));
        assert!(!module.contains('\r'));
        assert!(!module.contains('\u{2028}'));

        let root = text(&out, "index.ts");
        assert!(root.contains("import aB from './a\\rb';"));
        assert!(root.contains("[`a\\rb`]: aB(),"));
        assert!(!root.contains('\r'));
    }

    #[test]
    fn case_helpers_follow_native_word_splitting() {
        let out = emitted();
        let helpers = text(&out, "_case.ts");
        for name in [
            "snakeCase",
            "camelCase",
            "pascalCase",
            "kebabCase",
            "titleCase",
            "screamingSnakeCase",
        ] {
            assert!(helpers.contains(&format!("export const {name} =")), "{name}");
        }
        assert!(!helpers.contains("import"));
        // acronym boundary: `HTTPServer` splits before the last capital
        assert!(helpers.contains("mode === 'upper' && isUpper(c) && isLower(next)"));
    }

    #[test]
    fn generated_module_names_are_reserved() {
        let tree: TreeNode = Directory::new()
            .with("_case", TreeNode::file(""))
            .unwrap()
            .into();
        let rules = RuleSet::new(vec![]).unwrap();
        assert!(matches!(
            emit_typescript(&compile(&tree, &rules)),
            Err(DomainError::InvalidModule { .. })
        ));
    }

    #[test]
    fn identifiers_are_unique() {
        let mut taken = BTreeSet::new();
        assert_eq!(unique_ident("a-b", &mut taken), "aB");
        assert_eq!(unique_ident("a_b", &mut taken), "aB2");
        assert_eq!(unique_ident("1st.txt", &mut taken), "_1stTxt");
        assert_eq!(unique_ident("default", &mut taken), "_default");
    }
}
