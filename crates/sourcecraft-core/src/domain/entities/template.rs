//! Parameterized text.
//!
//! A [`Template`] is raw text interleaved with placeholders. Two steps are
//! kept apart:
//!
//! - **Substitution** ([`Template::substitute`]) only ever splits raw text
//!   segments. A placeholder, once inserted, is never rescanned, so a later
//!   rule cannot match inside it.
//! - **Escaping** ([`escape`], [`Template::to_source`]) only applies to raw
//!   text when the template is written out. Placeholder syntax is emitted
//!   verbatim.
//!
//! # Source syntax
//!
//! ```text
//! raw text with \` \\ and \${ escaped, ${param} and ${param:snake}
//! ```
//!
//! This is the body syntax of a backtick template literal, so the same text
//! can be pasted into generated TypeScript.

use std::fmt::Write as _;

use crate::domain::{
    error::DomainError,
    value_objects::{Bindings, CaseStyle, ParamSet, is_parameter_name},
};

/// A reference to a parameter, optionally re-cased on substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub param: String,
    pub case: Option<CaseStyle>,
}

impl Placeholder {
    pub fn new(param: impl Into<String>, case: Option<CaseStyle>) -> Self {
        Self {
            param: param.into(),
            case,
        }
    }

    /// The value this placeholder expands to for a bound `value`.
    pub fn expand(&self, value: &str) -> String {
        match self.case {
            Some(style) => style.apply(value),
            None => value.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Unescaped text, copied as-is.
    Text(String),
    Placeholder(Placeholder),
}

/// Text with parameter placeholders.
///
/// Normalized: no empty text segments and no two text segments in a row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// A template with no placeholders.
    pub fn literal(text: impl Into<String>) -> Self {
        let mut template = Self::default();
        template.push_text(text.into());
        template
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Parameters referenced, deduplicated, in order of appearance.
    pub fn params(&self) -> ParamSet {
        self.placeholders().map(|p| p.param.as_str()).collect()
    }

    pub fn placeholders(&self) -> impl Iterator<Item = &Placeholder> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder(p) => Some(p),
            Segment::Text(_) => None,
        })
    }

    pub fn is_static(&self) -> bool {
        self.placeholders().next().is_none()
    }

    /// The full text when the template has no placeholders.
    pub fn static_text(&self) -> Option<&str> {
        match self.segments.as_slice() {
            [] => Some(""),
            [Segment::Text(text)] => Some(text),
            _ => None,
        }
    }

    /// Replace every occurrence of `literal` in the remaining raw text with
    /// `placeholder`, scanning left to right. Returns the number of
    /// replacements made.
    pub fn substitute(&mut self, literal: &str, placeholder: &Placeholder) -> usize {
        if literal.is_empty() {
            return 0;
        }

        let mut count = 0;
        let mut out = Template::default();

        for segment in std::mem::take(&mut self.segments) {
            match segment {
                Segment::Text(text) => {
                    let mut rest = text.as_str();
                    while let Some(at) = rest.find(literal) {
                        out.push_text(rest[..at].to_string());
                        out.segments.push(Segment::Placeholder(placeholder.clone()));
                        rest = &rest[at + literal.len()..];
                        count += 1;
                    }
                    out.push_text(rest.to_string());
                }
                placeholder @ Segment::Placeholder(_) => out.segments.push(placeholder),
            }
        }

        *self = out;
        count
    }

    /// Expand the template with `bindings`.
    ///
    /// `at` names the node being rendered and only appears in errors.
    pub fn render(&self, bindings: &Bindings, at: &str) -> Result<String, DomainError> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Placeholder(p) => {
                    let value =
                        bindings
                            .get(&p.param)
                            .ok_or_else(|| DomainError::MissingParameter {
                                name: p.param.clone(),
                                path: at.to_string(),
                            })?;
                    out.push_str(&p.expand(value));
                }
            }
        }
        Ok(out)
    }

    /// Serialize to source syntax.
    pub fn to_source(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(&escape(text)),
                Segment::Placeholder(p) => {
                    let _ = match p.case {
                        Some(style) => write!(out, "${{{}:{}}}", p.param, style.short_name()),
                        None => write!(out, "${{{}}}", p.param),
                    };
                }
            }
        }
        out
    }

    /// Parse source syntax produced by [`Template::to_source`].
    ///
    /// # Errors
    ///
    /// [`DomainError::MalformedTemplate`] on an unknown or dangling escape,
    /// an unescaped backtick, an unterminated placeholder, a bad parameter
    /// name or an unknown case style.
    pub fn parse(source: &str) -> Result<Self, DomainError> {
        let malformed = |reason: String| DomainError::MalformedTemplate { reason };

        let mut template = Template::default();
        let mut text = String::new();
        let mut chars = source.char_indices().peekable();

        while let Some((at, c)) = chars.next() {
            match c {
                '\\' => match chars.next() {
                    Some((_, e @ ('\\' | '`' | '$'))) => text.push(e),
                    Some((_, other)) => {
                        return Err(malformed(format!("unknown escape '\\{other}' at byte {at}")));
                    }
                    None => return Err(malformed("dangling '\\' at end of input".into())),
                },
                '`' => return Err(malformed(format!("unescaped '`' at byte {at}"))),
                '$' if matches!(chars.peek(), Some((_, '{'))) => {
                    chars.next();
                    let mut body = String::new();
                    let mut closed = false;
                    for (_, c) in chars.by_ref() {
                        if c == '}' {
                            closed = true;
                            break;
                        }
                        body.push(c);
                    }
                    if !closed {
                        return Err(malformed(format!("unterminated placeholder at byte {at}")));
                    }

                    let (param, case) = match body.split_once(':') {
                        Some((param, case)) => (
                            param,
                            Some(case.parse::<CaseStyle>().map_err(|e| malformed(e.to_string()))?),
                        ),
                        None => (body.as_str(), None),
                    };
                    if !is_parameter_name(param) {
                        return Err(malformed(format!("'{param}' is not a parameter name")));
                    }

                    template.push_text(std::mem::take(&mut text));
                    template
                        .segments
                        .push(Segment::Placeholder(Placeholder::new(param, case)));
                }
                other => text.push(other),
            }
        }
        template.push_text(text);

        Ok(template)
    }

    fn push_text(&mut self, text: String) {
        if text.is_empty() {
            return;
        }
        if let Some(Segment::Text(last)) = self.segments.last_mut() {
            last.push_str(&text);
        } else {
            self.segments.push(Segment::Text(text));
        }
    }
}

/// Escape raw text for the body of a backtick template literal.
///
/// Only `\`, `` ` `` and the `${` interpolation sentinel are touched.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            '`' => out.push_str("\\`"),
            '$' if chars.peek() == Some(&'{') => out.push_str("\\$"),
            other => out.push(other),
        }
    }
    out
}
