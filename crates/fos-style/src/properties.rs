//! CSS Property Definitions
//!
//! All longhand properties the engine computes: initial value, literal
//! keywords, the acceptor for everything else, and whether it inherits.
//! To add a property, describe it here and implement it in layout/paint.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::acceptors::{AcceptError, Accepted, Acceptor};
use crate::config::{StyleConfig, ABS_BORDER_WIDTH, ABS_FONT_WEIGHT};
use crate::values::{ComputedStyle, ComputedValue};

/// Keyword table whose entries compute to themselves
macro_rules! keywords {
    ($($kw:literal),* $(,)?) => {
        &[$(($kw, ComputedValue::Keyword($kw))),*]
    };
}

/// Descriptor of one property
#[derive(Debug)]
pub struct StyleAttr {
    /// Raw initial value
    pub initial: &'static str,
    /// Literal keywords and the values they compute to
    pub kws: &'static [(&'static str, ComputedValue)],
    pub accept: Acceptor,
    pub inherits: bool,
}

impl StyleAttr {
    /// Inherits unless the acceptor is [`Acceptor::LengthPercentage`]
    pub const fn new(
        initial: &'static str,
        kws: &'static [(&'static str, ComputedValue)],
        accept: Acceptor,
    ) -> Self {
        Self {
            initial,
            kws,
            accept,
            inherits: !matches!(accept, Acceptor::LengthPercentage),
        }
    }

    pub const fn with_inherits(mut self, inherits: bool) -> Self {
        self.inherits = inherits;
        self
    }

    /// Exact, case-sensitive keyword lookup
    pub fn keyword(&self, value: &str) -> Option<&'static ComputedValue> {
        self.kws.iter().find(|(kw, _)| *kw == value).map(|(_, v)| v)
    }

    pub fn has_keyword(&self, value: &str) -> bool {
        self.keyword(value).is_some()
    }

    /// Keywords first, then the acceptor
    pub fn convert(&self, value: &str, parent: &ComputedStyle, config: &StyleConfig) -> Accepted {
        match self.keyword(value) {
            Some(kw) => Ok(kw.clone()),
            None => self.accept.accept(value, parent, config),
        }
    }

    /// Validity only, checked against an empty parent style. A value that
    /// merely needs a parent property (`2em`, `currentcolor`) is valid.
    pub fn is_valid(&self, value: &str) -> bool {
        if self.has_keyword(value) {
            return true;
        }
        match self.accept.accept(value, &ComputedStyle::new(), &StyleConfig::default()) {
            Ok(_) | Err(AcceptError::MissingParent(_)) => true,
            Err(_) => false,
        }
    }
}

const NO_KEYWORDS: &[(&str, ComputedValue)] = &[];
const AUTO: &[(&str, ComputedValue)] = &[("auto", ComputedValue::Auto)];
const NORMAL: &[(&str, ComputedValue)] = &[("normal", ComputedValue::Normal)];
const DISPLAY_KEYWORDS: &[(&str, ComputedValue)] = keywords!["inline", "block", "none"];
const POSITION_KEYWORDS: &[(&str, ComputedValue)] =
    keywords!["static", "relative", "absolute", "sticky", "fixed"];
const BOX_SIZING_KEYWORDS: &[(&str, ComputedValue)] = keywords!["content-box", "border-box"];
const BORDER_STYLE_KEYWORDS: &[(&str, ComputedValue)] = keywords![
    "none", "hidden", "dotted", "dashed", "solid", "double", "groove", "ridge", "inset", "outset",
];

pub static COLOR: StyleAttr = StyleAttr::new("canvastext", NO_KEYWORDS, Acceptor::Color);
pub static FONT_WEIGHT: StyleAttr = StyleAttr::new("normal", ABS_FONT_WEIGHT, Acceptor::FontWeight);
pub static FONT_FAMILY: StyleAttr = StyleAttr::new("Arial", NO_KEYWORDS, Acceptor::PassThrough);
pub static FONT_SIZE: StyleAttr = StyleAttr::new("medium", NO_KEYWORDS, Acceptor::FontSize);
pub static FONT_STYLE: StyleAttr = StyleAttr::new("normal", NO_KEYWORDS, Acceptor::FontStyle);
pub static LINE_HEIGHT: StyleAttr =
    StyleAttr::new("normal", NORMAL, Acceptor::LengthPercentage).with_inherits(true);
pub static WORD_SPACING: StyleAttr =
    StyleAttr::new("normal", NORMAL, Acceptor::LengthPercentage).with_inherits(true);
pub static LETTER_SPACING: StyleAttr = StyleAttr::new("normal", NORMAL, Acceptor::Length);
// The `with_inherits(false)` overrides below depart from the derived rule of
// `StyleAttr::new`, which would make these inherit. They follow CSS instead.
pub static DISPLAY: StyleAttr =
    StyleAttr::new("inline", DISPLAY_KEYWORDS, Acceptor::KeywordsOnly).with_inherits(false);
pub static BACKGROUND_COLOR: StyleAttr =
    StyleAttr::new("transparent", NO_KEYWORDS, Acceptor::Color).with_inherits(false);
pub static POSITION: StyleAttr =
    StyleAttr::new("static", POSITION_KEYWORDS, Acceptor::KeywordsOnly).with_inherits(false);
pub static BOX_SIZING: StyleAttr =
    StyleAttr::new("content-box", BOX_SIZING_KEYWORDS, Acceptor::KeywordsOnly).with_inherits(false);

/// Shared by width, height, every inset side, every margin and padding side
pub static AUTO_LENGTH_PERCENTAGE: StyleAttr = StyleAttr::new("auto", AUTO, Acceptor::LengthPercentage);
pub static BORDER_WIDTH: StyleAttr =
    StyleAttr::new("medium", ABS_BORDER_WIDTH, Acceptor::LengthPercentage);
pub static BORDER_STYLE: StyleAttr =
    StyleAttr::new("none", BORDER_STYLE_KEYWORDS, Acceptor::KeywordsOnly).with_inherits(false);
pub static BORDER_COLOR: StyleAttr =
    StyleAttr::new("currentcolor", NO_KEYWORDS, Acceptor::Color).with_inherits(false);

/// Registration order is the iteration order of [`Registry::properties`]
static PROPERTIES: &[(&str, &StyleAttr)] = &[
    ("color", &COLOR),
    ("font-weight", &FONT_WEIGHT),
    ("font-family", &FONT_FAMILY),
    ("font-size", &FONT_SIZE),
    ("font-style", &FONT_STYLE),
    ("line-height", &LINE_HEIGHT),
    ("word-spacing", &WORD_SPACING),
    ("letter-spacing", &LETTER_SPACING),
    ("display", &DISPLAY),
    ("background-color", &BACKGROUND_COLOR),
    ("width", &AUTO_LENGTH_PERCENTAGE),
    ("height", &AUTO_LENGTH_PERCENTAGE),
    ("position", &POSITION),
    ("box-sizing", &BOX_SIZING),
    ("top", &AUTO_LENGTH_PERCENTAGE),
    ("right", &AUTO_LENGTH_PERCENTAGE),
    ("bottom", &AUTO_LENGTH_PERCENTAGE),
    ("left", &AUTO_LENGTH_PERCENTAGE),
    ("padding-top", &AUTO_LENGTH_PERCENTAGE),
    ("padding-right", &AUTO_LENGTH_PERCENTAGE),
    ("padding-bottom", &AUTO_LENGTH_PERCENTAGE),
    ("padding-left", &AUTO_LENGTH_PERCENTAGE),
    ("margin-top", &AUTO_LENGTH_PERCENTAGE),
    ("margin-right", &AUTO_LENGTH_PERCENTAGE),
    ("margin-bottom", &AUTO_LENGTH_PERCENTAGE),
    ("margin-left", &AUTO_LENGTH_PERCENTAGE),
    ("border-top-width", &BORDER_WIDTH),
    ("border-right-width", &BORDER_WIDTH),
    ("border-bottom-width", &BORDER_WIDTH),
    ("border-left-width", &BORDER_WIDTH),
    ("border-top-color", &BORDER_COLOR),
    ("border-right-color", &BORDER_COLOR),
    ("border-bottom-color", &BORDER_COLOR),
    ("border-left-color", &BORDER_COLOR),
    ("border-top-style", &BORDER_STYLE),
    ("border-right-style", &BORDER_STYLE),
    ("border-bottom-style", &BORDER_STYLE),
    ("border-left-style", &BORDER_STYLE),
];

/// Computed before everything else, so that `em` and `currentcolor` in the
/// remaining properties refer to the element itself
pub const PRIORITY_PROPERTIES: &[&str] = &["font-size", "color"];

/// Canonical property name → descriptor
#[derive(Debug)]
pub struct Registry {
    index: HashMap<&'static str, &'static StyleAttr>,
}

/// The process-wide registry, built on first use
pub fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(|| Registry {
        index: PROPERTIES.iter().copied().collect(),
    })
}

impl Registry {
    pub fn get(&self, name: &str) -> Option<&'static StyleAttr> {
        self.index.get(name).copied()
    }

    /// The registry's own `'static` spelling of `name`
    pub fn canonical_name(&self, name: &str) -> Option<&'static str> {
        self.index.get_key_value(name).map(|(key, _)| *key)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn properties(&self) -> impl Iterator<Item = (&'static str, &'static StyleAttr)> {
        PROPERTIES.iter().copied()
    }

    pub fn len(&self) -> usize {
        PROPERTIES.len()
    }

    pub fn is_empty(&self) -> bool {
        PROPERTIES.is_empty()
    }
}

/// Fallback raw value of every property, just like `unset`:
/// `"inherit"` for inheriting properties, the initial value otherwise
pub fn abs_default_style() -> &'static HashMap<&'static str, &'static str> {
    static DEFAULTS: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    DEFAULTS.get_or_init(|| {
        PROPERTIES
            .iter()
            .map(|(name, attr)| (*name, if attr.inherits { "inherit" } else { attr.initial }))
            .collect()
    })
}

const HIDDEN_TAGS: &[&str] = &["head", "comment", "script", "style", "link", "meta", "title"];

const BLOCK_TAGS: &[&str] = &[
    "body", "div", "p", "h1", "h2", "h3", "h4", "h5", "h6", "ul", "ol", "li", "form", "header",
    "footer", "section", "article", "nav", "aside", "main",
];

fn element_styles() -> &'static HashMap<&'static str, HashMap<&'static str, &'static str>> {
    static STYLES: OnceLock<HashMap<&'static str, HashMap<&'static str, &'static str>>> =
        OnceLock::new();
    STYLES.get_or_init(|| {
        let mut styles = HashMap::new();

        // The root seeds every inherited property
        let mut root: HashMap<&'static str, &'static str> = PROPERTIES
            .iter()
            .filter(|(_, attr)| attr.inherits)
            .map(|(name, attr)| (*name, attr.initial))
            .collect();
        root.insert("display", "block");
        styles.insert("html", root);

        for tag in HIDDEN_TAGS {
            styles.insert(*tag, HashMap::from([("display", "none")]));
        }
        for tag in BLOCK_TAGS {
            styles.insert(*tag, HashMap::from([("display", "block")]));
        }
        styles
    })
}

/// Forced defaults for an element type, if it has any
pub fn element_defaults(tag: &str) -> Option<&'static HashMap<&'static str, &'static str>> {
    element_styles().get(tag)
}
