//! fOS Style System
//!
//! Declared CSS → computed style: rule parsing, shorthand expansion,
//! cascade merge and computed-value resolution.

mod acceptors;
mod cascade;
mod computed;
mod config;
mod parser;
mod properties;
mod sheet;
mod shorthand;
mod values;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub use acceptors::{
    color, font_size, font_style, font_weight, length, length_percentage, split_units, AcceptError,
    Accepted, Acceptor,
};
pub use cascade::{cascade, join_styles};
pub use computed::{StyleResolver, TagStyle};
pub use config::{StyleConfig, Viewport};
pub use parser::{fix_up_value, parse_important, CssParser, ParseContext};
pub use properties::{
    abs_default_style, element_defaults, registry, Registry, StyleAttr, PRIORITY_PROPERTIES,
};
pub use sheet::{MediaRule, Rule, SourceSheet, StyleRule};
pub use shorthand::{expand, expand_property, process, split_value, MAX_EXPANSION_PASSES};
pub use values::{Color, ComputedStyle, ComputedValue, FontStyle};

/// Parse a CSS stylesheet
pub fn parse_sheet(css: &str, context: &ParseContext) -> Result<SourceSheet, CssError> {
    CssParser::with_context(context.clone()).parse(css)
}

/// Parse the contents of a `style` attribute
pub fn parse_inline_style(css: &str, context: &ParseContext) -> Style {
    CssParser::with_context(context.clone()).parse_inline(css)
}

/// Read and parse a stylesheet from disk
pub fn parse_file(path: impl AsRef<Path>) -> Result<SourceSheet, CssError> {
    parser::parse_file(path.as_ref())
}

/// Raw declared value with its importance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredValue {
    pub raw: String,
    pub important: bool,
}

impl DeclaredValue {
    pub fn new(raw: impl Into<String>, important: bool) -> Self {
        Self { raw: raw.into(), important }
    }

    pub fn normal(raw: impl Into<String>) -> Self {
        Self::new(raw, false)
    }

    pub fn important(raw: impl Into<String>) -> Self {
        Self::new(raw, true)
    }
}

/// Declared style: canonical property name → declared value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Style {
    declarations: HashMap<&'static str, DeclaredValue>,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&DeclaredValue> {
        self.declarations.get(name)
    }

    /// Raw text of a declaration
    pub fn raw(&self, name: &str) -> Option<&str> {
        self.get(name).map(|decl| decl.raw.as_str())
    }

    pub fn insert(&mut self, name: &'static str, value: DeclaredValue) -> Option<DeclaredValue> {
        self.declarations.insert(name, value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.declarations.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &DeclaredValue)> {
        self.declarations.iter().map(|(name, value)| (*name, value))
    }
}

impl FromIterator<(&'static str, DeclaredValue)> for Style {
    fn from_iter<I: IntoIterator<Item = (&'static str, DeclaredValue)>>(iter: I) -> Self {
        Self { declarations: iter.into_iter().collect() }
    }
}

/// Expanded declarations of one importance group: canonical name → raw value
pub type StyleInput = HashMap<&'static str, String>;

/// CSS parsing error
#[derive(Debug, thiserror::Error)]
pub enum CssError {
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: u32, message: String },

    #[error("Unsupported at-rule {0}")]
    UnsupportedAtRule(String),

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A single declaration that is skipped
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeclarationError {
    #[error("Malformed declaration {0:?}")]
    Malformed(String),

    #[error("Unknown property {0}")]
    UnknownProperty(String),

    #[error("Invalid value {value:?} for {property}")]
    InvalidValue { property: String, value: String },

    #[error("Too many values ({count}, at most {max})")]
    TooManyValues { count: usize, max: usize },

    #[error("Invalid key(s): {}", .0.join(", "))]
    UnassignedSubProperties(Vec<String>),

    #[error("Unbalanced parentheses in {0:?}")]
    UnbalancedParens(String),

    #[error("{0} still names a shorthand after expansion")]
    ExpansionLimit(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_map() {
        let mut style = Style::new();
        assert!(style.is_empty());
        style.insert("width", DeclaredValue::normal("10px"));
        style.insert("color", DeclaredValue::important("red"));

        assert_eq!(style.len(), 2);
        assert_eq!(style.raw("width"), Some("10px"));
        assert!(style.get("color").unwrap().important);
        assert!(!style.contains("height"));
    }

    #[test]
    fn test_error_messages() {
        let err = DeclarationError::UnassignedSubProperties(vec!["border-color".into()]);
        assert_eq!(err.to_string(), "Invalid key(s): border-color");

        let err = DeclarationError::TooManyValues { count: 5, max: 4 };
        assert_eq!(err.to_string(), "Too many values (5, at most 4)");
    }
}
