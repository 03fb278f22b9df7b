//! CSS Parser using lightningcss
//!
//! Converts lightningcss rule trees into [`SourceSheet`]s of raw declared
//! values, and parses inline `style` attributes.

use std::path::Path;
use std::sync::Arc;

use lightningcss::declaration::DeclarationBlock;
use lightningcss::error::{Error, PrinterErrorKind};
use lightningcss::rules::CssRule;
use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::traits::ToCss;
use tracing::{debug, warn};

use crate::sheet::{MediaRule, Rule, SourceSheet, StyleRule};
use crate::shorthand;
use crate::{CssError, DeclarationError, DeclaredValue, Style};

const IMPORTANT: &str = "!important";

/// Where the CSS being parsed came from. Carried into every diagnostic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseContext {
    pub source: Option<String>,
}

impl ParseContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_file(name: impl Into<String>) -> Self {
        Self { source: Some(name.into()) }
    }

    pub fn label(&self) -> &str {
        self.source.as_deref().unwrap_or("<inline>")
    }

    /// Log a skipped declaration
    pub(crate) fn report(&self, err: &DeclarationError, declaration: &str) {
        warn!(file = self.label(), "CSS: {err} ({declaration})");
    }
}

/// CSS Parser
#[derive(Debug, Default)]
pub struct CssParser {
    context: ParseContext,
}

impl CssParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_context(context: ParseContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &ParseContext {
        &self.context
    }

    /// Parse a CSS stylesheet
    pub fn parse(&self, css: &str) -> Result<SourceSheet, CssError> {
        let options = ParserOptions {
            filename: self.context.label().to_string(),
            error_recovery: true,
            ..ParserOptions::default()
        };

        let stylesheet = StyleSheet::parse(css, options).map_err(|e| CssError::ParseError {
            line: e.loc.map_or(0, |loc| loc.line + 1),
            message: e.kind.to_string(),
        })?;

        let sheet = self.convert_rules(css, &stylesheet.rules.0)?;
        debug!(file = self.context.label(), rules = sheet.len(), "Parsed stylesheet");
        Ok(sheet)
    }

    /// Parse an inline style such as `color: red; width: 10px`
    pub fn parse_inline(&self, css: &str) -> Style {
        let body = css.trim();
        let body = body.strip_prefix('{').unwrap_or(body);
        let body = body.strip_suffix('}').unwrap_or(body);
        self.parse_declarations(body)
    }

    /// Parse `;`-separated declarations as written in the source
    fn parse_declarations(&self, body: &str) -> Style {
        let mut decls = Vec::new();
        for chunk in split_declarations(body) {
            let chunk = chunk.trim();
            if chunk.is_empty() {
                continue;
            }
            match chunk.split_once(':') {
                Some((name, value)) => {
                    decls.push((name.trim().to_ascii_lowercase(), parse_important(value)))
                }
                None => self
                    .context
                    .report(&DeclarationError::Malformed(chunk.to_string()), chunk),
            }
        }
        shorthand::process(decls, &self.context)
    }

    fn convert_rules(&self, css: &str, rules: &[CssRule<'_>]) -> Result<SourceSheet, CssError> {
        let mut converted = Vec::with_capacity(rules.len());

        for rule in rules {
            match rule {
                CssRule::Style(style_rule) => {
                    let selector = style_rule
                        .selectors
                        .to_css_string(PrinterOptions::default())
                        .map_err(printer_error)?;
                    if !style_rule.rules.0.is_empty() {
                        warn!(
                            file = self.context.label(),
                            selector = %selector,
                            "CSS: nested rules are not supported, skipped"
                        );
                    }
                    let loc = style_rule.loc;
                    let style = match source_block(css, loc.line, loc.column) {
                        Some(body) => self.parse_declarations(&body),
                        None => self.convert_declarations(&style_rule.declarations)?,
                    };
                    converted.push(Rule::Style(Arc::new(StyleRule::new(selector, style))));
                }
                CssRule::Media(media_rule) => {
                    let media = media_rule
                        .query
                        .to_css_string(PrinterOptions::default())
                        .map_err(printer_error)?;
                    let rules = self.convert_rules(css, &media_rule.rules.0)?;
                    converted.push(Rule::Media(MediaRule { media, rules }));
                }
                // Placeholders left behind by lightningcss
                CssRule::Ignored => {}
                other => return Err(CssError::UnsupportedAtRule(at_rule_name(other))),
            }
        }

        Ok(SourceSheet::new(converted))
    }

    /// Declarations as re-serialized by lightningcss, used when the source
    /// block of a rule cannot be located
    fn convert_declarations(&self, block: &DeclarationBlock<'_>) -> Result<Style, CssError> {
        let normal = block.declarations.iter().map(|property| (property, false));
        let important = block.important_declarations.iter().map(|property| (property, true));

        let mut decls = Vec::new();
        for (property, important) in normal.chain(important) {
            let name = property.property_id().name().to_string();
            let value = property
                .value_to_css_string(PrinterOptions::default())
                .map_err(printer_error)?;
            decls.push((name, fix_up_value(&value, important)));
        }

        Ok(shorthand::process(decls, &self.context))
    }
}

/// Strip a trailing `!important` marker
pub fn parse_important(value: &str) -> DeclaredValue {
    let value = value.trim();
    match value.strip_suffix(IMPORTANT) {
        Some(rest) => DeclaredValue::important(rest.trim_end()),
        None => DeclaredValue::normal(value),
    }
}

/// Serialized value plus the importance the upstream parser reported.
/// A leftover `!important` in the text also counts.
pub fn fix_up_value(value: &str, important: bool) -> DeclaredValue {
    let parsed = parse_important(value);
    DeclaredValue::new(parsed.raw, important || parsed.important)
}

/// Split a declaration list on `;` outside strings and parentheses
fn split_declarations(body: &str) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut depth = 0usize;
    let mut quote = None;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in body.char_indices() {
        if let Some(q) = quote {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                _ if c == q => quote = None,
                _ => {}
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ';' if depth == 0 => {
                chunks.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    chunks.push(&body[start..]);
    chunks
}

/// Byte offset of a lightningcss location: a 0-based line and a 1-based
/// column counted in UTF-16 units
fn byte_offset(css: &str, line: u32, column: u32) -> Option<usize> {
    let mut line_start = 0;
    let mut lines = 0;
    let mut chars = css.char_indices().peekable();
    while lines < line {
        let (i, c) = chars.next()?;
        match c {
            '\r' if matches!(chars.peek(), Some((_, '\n'))) => continue,
            '\n' | '\r' | '\x0C' => {
                lines += 1;
                line_start = i + 1;
            }
            _ => {}
        }
    }

    let mut units = 1;
    for (i, c) in css[line_start..].char_indices() {
        if units >= column {
            return Some(line_start + i);
        }
        units += c.len_utf16() as u32;
    }
    (units >= column).then_some(css.len())
}

/// Text of the declaration block of the rule starting at `line`/`column`,
/// with comments blanked out. A nested block is cut and ends the
/// declaration before it.
fn source_block(css: &str, line: u32, column: u32) -> Option<String> {
    let start = byte_offset(css, line, column)?;
    let text = &css[start..];
    let mut body = String::new();
    let mut depth = 0usize;
    let mut quote = None;
    let mut escaped = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                _ if c == q => quote = None,
                _ => {}
            }
            if depth == 1 {
                body.push(c);
            }
            continue;
        }
        match c {
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut last = '\0';
                for c in chars.by_ref() {
                    if last == '*' && c == '/' {
                        break;
                    }
                    last = c;
                }
                if depth == 1 {
                    body.push(' ');
                }
            }
            '{' => depth += 1,
            '}' if depth == 0 => return None,
            '}' => {
                depth -= 1;
                match depth {
                    0 => return Some(body),
                    1 => body.push(';'),
                    _ => {}
                }
            }
            _ => {
                if c == '"' || c == '\'' {
                    quote = Some(c);
                }
                if depth == 1 {
                    body.push(c);
                }
            }
        }
    }
    // lightningcss closes an unterminated last block at end of input
    (depth == 1).then_some(body)
}

pub(crate) fn parse_file(path: &Path) -> Result<SourceSheet, CssError> {
    let css = std::fs::read_to_string(path).map_err(|source| CssError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    CssParser::with_context(ParseContext::for_file(path.display().to_string())).parse(&css)
}

fn printer_error(e: Error<PrinterErrorKind>) -> CssError {
    CssError::ParseError {
        line: e.loc.map_or(0, |loc| loc.line + 1),
        message: e.kind.to_string(),
    }
}

fn at_rule_name(rule: &CssRule<'_>) -> String {
    let name = match rule {
        CssRule::Import(_) => "@import",
        CssRule::Namespace(_) => "@namespace",
        CssRule::Keyframes(_) => "@keyframes",
        CssRule::FontFace(_) => "@font-face",
        CssRule::Page(_) => "@page",
        CssRule::Supports(_) => "@supports",
        CssRule::Unknown(rule) => return format!("@{}", &*rule.name),
        _ => "at-rule",
    };
    name.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Viewport;

    #[test]
    fn test_parse_simple() {
        let css = r#"
            .foo { display: block; }
            #bar { color: red; }
        "#;

        let result = CssParser::new().parse(css);
        assert!(result.is_ok(), "Parse error: {:?}", result.err());

        let sheet = result.unwrap();
        assert_eq!(sheet.len(), 2);
        let rules = sheet.all_rules(Viewport::default());
        assert_eq!(rules[0].selector, ".foo");
        assert_eq!(rules[0].style.raw("display"), Some("block"));
        assert_eq!(rules[1].selector, "#bar");
        assert!(rules[1].style.contains("color"));
    }

    #[test]
    fn test_parse_important() {
        assert_eq!(parse_important("red !important"), DeclaredValue::important("red"));
        assert_eq!(parse_important("red!important"), DeclaredValue::important("red"));
        assert_eq!(parse_important(" red "), DeclaredValue::normal("red"));
        assert_eq!(fix_up_value("red", true), DeclaredValue::important("red"));
        assert_eq!(fix_up_value("red !important", false), DeclaredValue::important("red"));
    }

    #[test]
    fn test_important_declarations() {
        let sheet = CssParser::new()
            .parse("p { width: 10px !important; height: 5px }")
            .unwrap();
        let rules = sheet.all_rules(Viewport::default());
        let style = &rules[0].style;
        assert_eq!(style.get("width"), Some(&DeclaredValue::important("10px")));
        assert_eq!(style.get("height"), Some(&DeclaredValue::normal("5px")));
    }

    #[test]
    fn test_media_rule() {
        let sheet = CssParser::new()
            .parse("@media screen { p { width: 1px } } div { width: 2px }")
            .unwrap();
        assert_eq!(sheet.len(), 2);
        let Rule::Media(media) = &sheet.rules()[0] else {
            panic!("expected a media rule");
        };
        assert_eq!(media.media, "screen");
        assert_eq!(media.rules.len(), 1);
        assert_eq!(sheet.all_rules(Viewport::default()).len(), 2);
    }

    #[test]
    fn test_unsupported_at_rule() {
        let result = CssParser::new().parse("@font-face { font-family: Foo; }");
        assert!(matches!(result, Err(CssError::UnsupportedAtRule(name)) if name == "@font-face"));
    }

    #[test]
    fn test_parse_inline() {
        let style = CssParser::new().parse_inline("{ color: blue; margin: 1px; bogus }");
        assert_eq!(style.raw("color"), Some("blue"));
        assert_eq!(style.raw("margin-left"), Some("1px"));
        assert!(!style.contains("margin"));
        assert_eq!(style.len(), 5);
    }

    #[test]
    fn test_values_keep_source_text() {
        let sheet = CssParser::new()
            .parse("p { color: rgba(1, 2, 3, 128); border: medium solid currentcolor }")
            .unwrap();
        let rules = sheet.all_rules(Viewport::default());
        let style = &rules[0].style;
        assert_eq!(style.raw("color"), Some("rgba(1, 2, 3, 128)"));
        assert_eq!(style.raw("border-top-width"), Some("medium"));
        assert_eq!(style.raw("border-left-color"), Some("currentcolor"));
        assert_eq!(style.len(), 13);
    }

    #[test]
    fn test_source_block() {
        let css = "a { x: 1 }\n  p { color: red; /* } */ width: 1px }";
        assert_eq!(source_block(css, 0, 1).as_deref(), Some(" x: 1 "));
        assert_eq!(
            source_block(css, 1, 3).as_deref(),
            Some(" color: red;   width: 1px ")
        );
        assert_eq!(source_block("p { a: b; &.x { c: d } e: f }", 0, 1).as_deref(), Some(" a: b; &.x ; e: f "));
        assert_eq!(source_block("p { a: \"}\" }", 0, 1).as_deref(), Some(" a: \"}\" "));
        assert_eq!(source_block("p { a: b", 0, 1).as_deref(), Some(" a: b"));
        assert_eq!(source_block("} p { }", 0, 1), None);
    }

    #[test]
    fn test_byte_offset() {
        assert_eq!(byte_offset("a\nbc", 1, 2), Some(3));
        assert_eq!(byte_offset("a\r\nbc", 1, 1), Some(3));
        assert_eq!(byte_offset("\u{e9} p", 0, 3), Some(3));
        assert_eq!(byte_offset("a", 4, 1), None);
    }

    #[test]
    fn test_split_declarations() {
        assert_eq!(
            split_declarations("a: url(x;y); b: \"c;d\"; e: f"),
            ["a: url(x;y)", " b: \"c;d\"", " e: f"]
        );
    }

    #[test]
    fn test_context_label() {
        assert_eq!(ParseContext::new().label(), "<inline>");
        assert_eq!(ParseContext::for_file("main.css").label(), "main.css");
    }
}
