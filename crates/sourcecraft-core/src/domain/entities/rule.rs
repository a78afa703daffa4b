//! Literal rules: which text becomes which parameter.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::domain::{
    error::DomainError,
    value_objects::{Bindings, CaseStyle, is_parameter_name},
};

/// Replace every occurrence of `literal` with the parameter `template`.
///
/// `case_by_extension` re-cases the bound value for files with a matching
/// extension (`rs = "snake_case"` turns `MyModule` into `my_module` inside
/// `.rs` files only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiteralRule {
    pub literal: String,
    pub template: String,
    #[serde(default, alias = "caseByExtension", skip_serializing_if = "IndexMap::is_empty")]
    pub case_by_extension: IndexMap<String, CaseStyle>,
}

impl LiteralRule {
    pub fn new(literal: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            literal: literal.into(),
            template: template.into(),
            case_by_extension: IndexMap::new(),
        }
    }

    /// Add a per-extension case style.
    pub fn with_case(mut self, extension: impl Into<String>, style: CaseStyle) -> Self {
        self.case_by_extension.insert(extension.into(), style);
        self
    }

    /// Case style for a file called `file_name`, if its extension is mapped.
    pub fn case_for(&self, file_name: &str) -> Option<CaseStyle> {
        let ext = extension(file_name)?;
        self.case_by_extension.get(ext).copied()
    }
}

/// Text after the last `.`, ignoring a leading dot (`.gitignore` has none).
pub fn extension(file_name: &str) -> Option<&str> {
    match file_name.rfind('.') {
        Some(0) | None => None,
        Some(i) => Some(&file_name[i + 1..]),
    }
}

/// An ordered, validated list of [`LiteralRule`]s.
///
/// Order is significant: when literals overlap, the earlier rule claims the
/// text first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<LiteralRule>,
}

impl RuleSet {
    /// Validate `rules` before anything is compiled with them.
    ///
    /// # Errors
    ///
    /// - [`DomainError::EmptyLiteral`] for a rule with an empty literal.
    /// - [`DomainError::InvalidParameterName`] for a template that is not an
    ///   identifier.
    /// - [`DomainError::DuplicateParameterName`] when one template is mapped
    ///   from two different literals.
    pub fn new(rules: Vec<LiteralRule>) -> Result<Self, DomainError> {
        let mut seen: IndexMap<&str, &str> = IndexMap::new();

        for rule in &rules {
            if rule.literal.is_empty() {
                return Err(DomainError::EmptyLiteral {
                    template: rule.template.clone(),
                });
            }
            if !is_parameter_name(&rule.template) {
                return Err(DomainError::InvalidParameterName {
                    name: rule.template.clone(),
                });
            }
            match seen.get(rule.template.as_str()) {
                Some(first) if *first != rule.literal => {
                    return Err(DomainError::DuplicateParameterName {
                        name: rule.template.clone(),
                        first: (*first).to_string(),
                        second: rule.literal.clone(),
                    });
                }
                Some(_) => {}
                None => {
                    seen.insert(&rule.template, &rule.literal);
                }
            }
        }

        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[LiteralRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Bindings that map every parameter back to its original literal.
    ///
    /// Generating a compiled tree with these reproduces the source tree.
    pub fn literal_bindings(&self) -> Bindings {
        self.rules
            .iter()
            .map(|rule| (rule.template.as_str(), rule.literal.as_str()))
            .collect()
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a LiteralRule;
    type IntoIter = std::slice::Iter<'a, LiteralRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
