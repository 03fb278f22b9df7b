//! Computed Style Resolution
//!
//! Turns the cascaded declared [`Style`] of an element into a
//! [`ComputedStyle`]. Tag defaults fill undeclared properties, CSS-wide
//! keywords are resolved and every value goes through its acceptor.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::acceptors::Accepted;
use crate::config::{StyleConfig, Viewport};
use crate::properties::{
    abs_default_style, element_defaults, registry, StyleAttr, PRIORITY_PROPERTIES,
};
use crate::values::{ComputedStyle, ComputedValue};
use crate::Style;

const ROOT_TAG: &str = "html";

/// Default raw values of one tag: its forced overrides, then the
/// absolute defaults
#[derive(Debug, Clone)]
pub struct TagStyle {
    tag: String,
    overrides: Option<&'static HashMap<&'static str, &'static str>>,
    defaults: &'static HashMap<&'static str, &'static str>,
}

impl TagStyle {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            overrides: element_defaults(tag),
            defaults: abs_default_style(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Raw default of a property, walking the chain
    pub fn get(&self, name: &str) -> Option<&'static str> {
        self.overrides
            .and_then(|overrides| overrides.get(name).copied())
            .or_else(|| self.defaults.get(name).copied())
    }

    pub fn overrides(&self) -> Option<&'static HashMap<&'static str, &'static str>> {
        self.overrides
    }

    pub fn is_overridden(&self, name: &str) -> bool {
        self.overrides.is_some_and(|overrides| overrides.contains_key(name))
    }
}

/// Computed-style resolver
#[derive(Debug, Default)]
pub struct StyleResolver {
    config: StyleConfig,
    /// Tag defaults never change, so entries are never invalidated
    tag_styles: HashMap<String, Arc<TagStyle>>,
}

impl StyleResolver {
    pub fn new(config: StyleConfig) -> Self {
        Self { config, tag_styles: HashMap::new() }
    }

    pub fn config(&self) -> &StyleConfig {
        &self.config
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.config.viewport = viewport;
    }

    /// Font size `rem` scales by. [`compute`](Self::compute) records it for
    /// the root element.
    pub fn set_root_font_size(&mut self, size: f32) {
        self.config.root_font_size = size;
    }

    /// Default style of a tag, built once per distinct tag
    pub fn get_style(&mut self, tag: &str) -> Arc<TagStyle> {
        if let Some(style) = self.tag_styles.get(tag) {
            return Arc::clone(style);
        }
        debug!(tag, "Building tag default style");
        let style = Arc::new(TagStyle::new(tag));
        self.tag_styles.insert(tag.to_string(), Arc::clone(&style));
        style
    }

    pub fn cache_len(&self) -> usize {
        self.tag_styles.len()
    }

    /// Compute every registered property of an element.
    ///
    /// `font-size` and `color` are computed first, against the parent. All
    /// other properties are converted with those two replaced by the
    /// element's own values, so `em` and `currentcolor` refer to the element.
    /// Computing `html` sets the root font size used by `rem`.
    pub fn compute(&mut self, tag: &str, declared: &Style, parent: &ComputedStyle) -> ComputedStyle {
        let defaults = self.get_style(tag);
        let reg = registry();
        let mut computed = ComputedStyle::new();

        for name in PRIORITY_PROPERTIES {
            if let (Some(name), Some(attr)) = (reg.canonical_name(name), reg.get(name)) {
                let value = self.compute_value(name, attr, declared, &defaults, parent, parent);
                computed.insert(name, value);
            }
        }

        if tag == ROOT_TAG {
            if let Some(size) = computed.font_size() {
                self.set_root_font_size(size);
            }
        }

        let mut context = parent.clone();
        for (name, value) in computed.iter() {
            context.insert(name, value.clone());
        }

        for (name, attr) in reg.properties() {
            if PRIORITY_PROPERTIES.contains(&name) {
                continue;
            }
            let value = self.compute_value(name, attr, declared, &defaults, parent, &context);
            computed.insert(name, value);
        }

        computed
    }

    /// Declared value, else the tag default, else the initial value
    fn compute_value(
        &self,
        name: &'static str,
        attr: &StyleAttr,
        declared: &Style,
        defaults: &TagStyle,
        parent: &ComputedStyle,
        context: &ComputedStyle,
    ) -> ComputedValue {
        if let Some(raw) = declared.raw(name) {
            match self.resolve(name, attr, raw, parent, context) {
                Ok(value) => return value,
                Err(err) => warn!(
                    tag = defaults.tag(),
                    property = name,
                    value = raw,
                    "CSS: invalid value, using default: {err}"
                ),
            }
        }

        defaults
            .get(name)
            .and_then(|raw| self.resolve(name, attr, raw, parent, context).ok())
            .unwrap_or_else(|| self.initial(attr, context))
    }

    fn resolve(
        &self,
        name: &'static str,
        attr: &StyleAttr,
        raw: &str,
        parent: &ComputedStyle,
        context: &ComputedStyle,
    ) -> Accepted {
        match raw {
            "inherit" => Ok(self.inherited(name, attr, parent, context)),
            "unset" | "revert" if attr.inherits => Ok(self.inherited(name, attr, parent, context)),
            "initial" | "unset" | "revert" => Ok(self.initial(attr, context)),
            raw => attr.convert(raw, context, &self.config),
        }
    }

    fn inherited(
        &self,
        name: &'static str,
        attr: &StyleAttr,
        parent: &ComputedStyle,
        context: &ComputedStyle,
    ) -> ComputedValue {
        parent
            .get(name)
            .cloned()
            .unwrap_or_else(|| self.initial(attr, context))
    }

    fn initial(&self, attr: &StyleAttr, context: &ComputedStyle) -> ComputedValue {
        attr.convert(attr.initial, context, &self.config)
            .unwrap_or(ComputedValue::Keyword(attr.initial))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::{Color, FontStyle};
    use crate::DeclaredValue;

    fn declared(decls: &[(&'static str, &str)]) -> Style {
        decls
            .iter()
            .map(|(name, raw)| (*name, DeclaredValue::normal(*raw)))
            .collect()
    }

    #[test]
    fn test_tag_style_chain() {
        let mut resolver = StyleResolver::default();
        let head = resolver.get_style("head");
        assert_eq!(head.get("display"), Some("none"));
        assert_eq!(head.get("width"), Some("auto"));
        assert!(head.is_overridden("display"));

        let unknown = resolver.get_style("x-widget");
        assert!(unknown.overrides().is_none());
        assert_eq!(unknown.get("display"), Some("inline"));
        assert_eq!(unknown.get("color"), Some("inherit"));
        assert_eq!(unknown.get("float"), None);
    }

    #[test]
    fn test_tag_style_cache() {
        let mut resolver = StyleResolver::default();
        let first = resolver.get_style("div");
        let second = resolver.get_style("div");
        assert!(Arc::ptr_eq(&first, &second));
        resolver.get_style("span");
        assert_eq!(resolver.cache_len(), 2);
    }

    #[test]
    fn test_root_defaults() {
        let mut resolver = StyleResolver::default();
        let root = resolver.compute("html", &Style::new(), &ComputedStyle::new());

        assert_eq!(root.len(), registry().len());
        assert_eq!(root.font_size(), Some(16.0));
        assert_eq!(root.font_weight(), Some(400.0));
        assert_eq!(root.color(), Some(Color::BLACK));
        assert_eq!(root.get("display"), Some(&ComputedValue::Keyword("block")));
        assert_eq!(root.get("font-family"), Some(&ComputedValue::Text("Arial".into())));
        assert_eq!(root.get("font-style"), Some(&ComputedValue::FontStyle(FontStyle::Normal)));
        assert_eq!(root.get("line-height"), Some(&ComputedValue::Normal));
        assert_eq!(root.get("width"), Some(&ComputedValue::Auto));
        assert_eq!(root.get("border-top-width"), Some(&ComputedValue::Number(3.0)));
        assert_eq!(root.get("border-top-color"), Some(&ComputedValue::Color(Color::BLACK)));
        assert_eq!(root.get("background-color"), Some(&ComputedValue::Color(Color::TRANSPARENT)));
    }

    #[test]
    fn test_inheritance() {
        let mut resolver = StyleResolver::default();
        let root = resolver.compute(
            "html",
            &declared(&[("color", "red"), ("font-size", "20px"), ("width", "100px")]),
            &ComputedStyle::new(),
        );
        let child = resolver.compute("span", &Style::new(), &root);

        assert_eq!(child.color(), Some(Color::rgb(255, 0, 0)));
        assert_eq!(child.font_size(), Some(20.0));
        assert_eq!(child.get("width"), Some(&ComputedValue::Auto));
        assert_eq!(child.get("display"), Some(&ComputedValue::Keyword("inline")));
    }

    #[test]
    fn test_em_and_currentcolor_refer_to_element() {
        let mut resolver = StyleResolver::default();
        let parent = resolver.compute("html", &Style::new(), &ComputedStyle::new());
        let style = declared(&[
            ("font-size", "2em"),
            ("color", "blue"),
            ("margin-top", "1em"),
            ("border-top-color", "currentcolor"),
        ]);
        let child = resolver.compute("div", &style, &parent);

        assert_eq!(child.font_size(), Some(32.0));
        assert_eq!(child.get("margin-top"), Some(&ComputedValue::Number(32.0)));
        assert_eq!(child.get("border-top-color"), Some(&ComputedValue::Color(Color::rgb(0, 0, 255))));
        // initial border colors follow the element's color as well
        assert_eq!(child.get("border-left-color"), Some(&ComputedValue::Color(Color::rgb(0, 0, 255))));
    }

    #[test]
    fn test_global_keywords() {
        let mut resolver = StyleResolver::default();
        let parent: ComputedStyle = [
            ("width", ComputedValue::Number(50.0)),
            ("font-size", ComputedValue::Number(10.0)),
        ]
        .into_iter()
        .collect();
        let style = declared(&[("width", "inherit"), ("font-size", "initial"), ("height", "unset")]);
        let child = resolver.compute("div", &style, &parent);

        assert_eq!(child.get("width"), Some(&ComputedValue::Number(50.0)));
        assert_eq!(child.font_size(), Some(16.0));
        assert_eq!(child.get("height"), Some(&ComputedValue::Auto));

        let child = resolver.compute("div", &declared(&[("font-size", "unset")]), &parent);
        assert_eq!(child.font_size(), Some(10.0));
    }

    #[test]
    fn test_invalid_value_falls_back() {
        let mut resolver = StyleResolver::default();
        let parent = resolver.compute("html", &Style::new(), &ComputedStyle::new());
        let child = resolver.compute("div", &declared(&[("display", "grid"), ("width", "3furlongs")]), &parent);

        assert_eq!(child.get("display"), Some(&ComputedValue::Keyword("block")));
        assert_eq!(child.get("width"), Some(&ComputedValue::Auto));
    }

    #[test]
    fn test_rem_follows_root_font_size() {
        let mut resolver = StyleResolver::default();
        let root = resolver.compute(
            "html",
            &declared(&[("font-size", "20px"), ("padding-top", "1rem")]),
            &ComputedStyle::new(),
        );
        assert_eq!(root.get("padding-top"), Some(&ComputedValue::Number(20.0)));
        assert_eq!(resolver.config().root_font_size, 20.0);

        let child = resolver.compute("div", &declared(&[("width", "2rem"), ("font-size", "10px")]), &root);
        assert_eq!(child.get("width"), Some(&ComputedValue::Number(40.0)));

        resolver.set_root_font_size(8.0);
        let child = resolver.compute("div", &declared(&[("width", "2rem")]), &root);
        assert_eq!(child.get("width"), Some(&ComputedValue::Number(16.0)));
    }

    #[test]
    fn test_viewport_units() {
        let mut resolver = StyleResolver::new(StyleConfig::default());
        resolver.set_viewport(Viewport::new(1000, 500));
        let child = resolver.compute("div", &declared(&[("width", "50vw"), ("height", "10vh")]), &ComputedStyle::new());

        assert_eq!(child.get("width"), Some(&ComputedValue::Number(500.0)));
        assert_eq!(child.get("height"), Some(&ComputedValue::Number(50.0)));
        assert_eq!(resolver.config().viewport, Viewport::new(1000, 500));
    }
}
