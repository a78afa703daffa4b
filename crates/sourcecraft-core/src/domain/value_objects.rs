//! Domain value objects: CaseStyle, ParamSet, Bindings.
//!
//! # Design
//!
//! These are pure value types with equality-by-value and no identity.
//! `CaseStyle` is the only place that knows how a bound value is re-cased;
//! placeholders carry the style they need instead of consulting any shared
//! registry.

use std::fmt;
use std::str::FromStr;

use heck::{
    ToKebabCase, ToLowerCamelCase, ToShoutySnakeCase, ToSnakeCase, ToTitleCase, ToUpperCamelCase,
};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

// ── CaseStyle ────────────────────────────────────────────────────────────────

/// A deterministic string transform applied to a bound value before it is
/// substituted into a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaseStyle {
    #[serde(rename = "snake_case", alias = "snake")]
    SnakeCase,
    #[serde(rename = "camelCase", alias = "camel")]
    CamelCase,
    #[serde(rename = "PascalCase", alias = "pascal")]
    PascalCase,
    #[serde(rename = "kebab-case", alias = "kebab")]
    KebabCase,
    #[serde(rename = "Title Case", alias = "title")]
    TitleCase,
    #[serde(rename = "SCREAMING_SNAKE_CASE", alias = "screaming")]
    ScreamingSnakeCase,
    #[serde(rename = "lowercase", alias = "lower")]
    Lowercase,
    #[serde(rename = "UPPERCASE", alias = "upper")]
    Uppercase,
}

impl CaseStyle {
    pub const ALL: [CaseStyle; 8] = [
        Self::SnakeCase,
        Self::CamelCase,
        Self::PascalCase,
        Self::KebabCase,
        Self::TitleCase,
        Self::ScreamingSnakeCase,
        Self::Lowercase,
        Self::Uppercase,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SnakeCase => "snake_case",
            Self::CamelCase => "camelCase",
            Self::PascalCase => "PascalCase",
            Self::KebabCase => "kebab-case",
            Self::TitleCase => "Title Case",
            Self::ScreamingSnakeCase => "SCREAMING_SNAKE_CASE",
            Self::Lowercase => "lowercase",
            Self::Uppercase => "UPPERCASE",
        }
    }

    /// Short, whitespace-free name used inside placeholder syntax.
    pub const fn short_name(&self) -> &'static str {
        match self {
            Self::SnakeCase => "snake",
            Self::CamelCase => "camel",
            Self::PascalCase => "pascal",
            Self::KebabCase => "kebab",
            Self::TitleCase => "title",
            Self::ScreamingSnakeCase => "screaming",
            Self::Lowercase => "lower",
            Self::Uppercase => "upper",
        }
    }

    /// Transform `value` into this case.
    pub fn apply(&self, value: &str) -> String {
        match self {
            Self::SnakeCase => value.to_snake_case(),
            Self::CamelCase => value.to_lower_camel_case(),
            Self::PascalCase => value.to_upper_camel_case(),
            Self::KebabCase => value.to_kebab_case(),
            Self::TitleCase => value.to_title_case(),
            Self::ScreamingSnakeCase => value.to_shouty_snake_case(),
            Self::Lowercase => value.to_lowercase(),
            Self::Uppercase => value.to_uppercase(),
        }
    }
}

impl fmt::Display for CaseStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CaseStyle {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|style| style.as_str() == s || style.short_name() == s)
            .ok_or_else(|| DomainError::UnknownCaseStyle(s.to_string()))
    }
}

// ── Parameter names ──────────────────────────────────────────────────────────

/// Whether `name` can be used as a parameter name: `[A-Za-z_$][A-Za-z0-9_$]*`.
pub fn is_parameter_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

// ── ParamSet ─────────────────────────────────────────────────────────────────

/// Ordered, deduplicated set of parameter names.
///
/// Insertion order is the first-seen order, which keeps generated indexes and
/// emitted code stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamSet(IndexSet<String>);

impl ParamSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the name was not already present.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.0.insert(name.into())
    }

    /// Append every name of `other` not already present, keeping order.
    pub fn union(&mut self, other: &ParamSet) {
        for name in other.iter() {
            if !self.0.contains(name) {
                self.0.insert(name.to_string());
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ParamSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().collect();
        f.write_str(&names.join(", "))
    }
}

impl<S: Into<String>> FromIterator<S> for ParamSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

// ── Bindings ─────────────────────────────────────────────────────────────────

/// Concrete values for a generator's parameters.
///
/// Passed explicitly down the generator recursion; each level hands its
/// children only the subset they declare.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bindings(IndexMap<String, String>);

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// First parameter of `required` that has no value, in `required` order.
    pub fn first_missing<'a>(&self, required: &'a ParamSet) -> Option<&'a str> {
        required.iter().find(|name| !self.0.contains_key(*name))
    }

    /// Sub-binding holding only the names in `params`; unknown keys are dropped.
    pub fn restrict(&self, params: &ParamSet) -> Bindings {
        params
            .iter()
            .filter_map(|name| self.0.get(name).map(|value| (name, value.as_str())))
            .collect()
    }

    /// Merge `other` over `self`; values from `other` win.
    pub fn merge(&mut self, other: Bindings) {
        self.0.extend(other.0);
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Bindings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snake_case_of_pascal_input() {
        assert_eq!(CaseStyle::SnakeCase.apply("MyModule"), "my_module");
    }

    #[test]
    fn case_styles_transform_words() {
        let value = "blog post";
        assert_eq!(CaseStyle::CamelCase.apply(value), "blogPost");
        assert_eq!(CaseStyle::PascalCase.apply(value), "BlogPost");
        assert_eq!(CaseStyle::KebabCase.apply(value), "blog-post");
        assert_eq!(CaseStyle::TitleCase.apply(value), "Blog Post");
        assert_eq!(CaseStyle::ScreamingSnakeCase.apply(value), "BLOG_POST");
        assert_eq!(CaseStyle::Uppercase.apply(value), "BLOG POST");
    }

    #[test]
    fn case_style_parses_names_and_aliases() {
        assert_eq!("snake_case".parse::<CaseStyle>().unwrap(), CaseStyle::SnakeCase);
        assert_eq!("kebab".parse::<CaseStyle>().unwrap(), CaseStyle::KebabCase);
        assert_eq!("Title Case".parse::<CaseStyle>().unwrap(), CaseStyle::TitleCase);
        assert!(matches!(
            "Sponge".parse::<CaseStyle>(),
            Err(DomainError::UnknownCaseStyle(_))
        ));
    }

    #[test]
    fn case_style_display_round_trips() {
        for style in CaseStyle::ALL {
            assert_eq!(style.to_string().parse::<CaseStyle>().unwrap(), style);
            assert_eq!(style.short_name().parse::<CaseStyle>().unwrap(), style);
        }
    }

    #[test]
    fn parameter_names() {
        assert!(is_parameter_name("app_name"));
        assert!(is_parameter_name("$entry2"));
        assert!(is_parameter_name("_"));
        assert!(!is_parameter_name(""));
        assert!(!is_parameter_name("2fast"));
        assert!(!is_parameter_name("app-name"));
        assert!(!is_parameter_name("a:b"));
    }

    #[test]
    fn param_set_union_keeps_first_seen_order() {
        let mut a: ParamSet = ["x", "y"].into_iter().collect();
        let b: ParamSet = ["z", "x", "w"].into_iter().collect();
        a.union(&b);
        assert_eq!(a.iter().collect::<Vec<_>>(), vec!["x", "y", "z", "w"]);
    }

    #[test]
    fn param_set_equality_is_set_equality() {
        let a: ParamSet = ["x", "y"].into_iter().collect();
        let b: ParamSet = ["y", "x"].into_iter().collect();
        assert_eq!(a, b);
        assert_ne!(a.iter().collect::<Vec<_>>(), b.iter().collect::<Vec<_>>());
    }

    #[test]
    fn restrict_drops_unrequested_keys() {
        let bindings: Bindings = [("a", "1"), ("b", "2"), ("c", "3")].into_iter().collect();
        let wanted: ParamSet = ["c", "a", "missing"].into_iter().collect();
        let sub = bindings.restrict(&wanted);
        assert_eq!(sub.len(), 2);
        assert_eq!(sub.get("a"), Some("1"));
        assert_eq!(sub.get("b"), None);
    }

    #[test]
    fn first_missing_follows_required_order() {
        let bindings: Bindings = [("b", "2")].into_iter().collect();
        let required: ParamSet = ["a", "b", "c"].into_iter().collect();
        assert_eq!(bindings.first_missing(&required), Some("a"));
    }
}
