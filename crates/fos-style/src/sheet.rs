//! Source Sheets
//!
//! Immutable rule trees produced by the parser. Media rules are flattened
//! into a plain list of style rules, cached for the last viewport asked for.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use crate::config::Viewport;
use crate::Style;

/// Style rule: selector text and its expanded declarations
#[derive(Debug, Clone, PartialEq)]
pub struct StyleRule {
    pub selector: String,
    pub style: Style,
}

impl StyleRule {
    pub fn new(selector: impl Into<String>, style: Style) -> Self {
        Self { selector: selector.into(), style }
    }
}

/// `@media` rule wrapping a nested sheet
#[derive(Debug, Clone)]
pub struct MediaRule {
    pub media: String,
    pub rules: SourceSheet,
}

impl MediaRule {
    /// Media conditions are not evaluated: every media rule applies
    pub fn matches(&self, _viewport: Viewport) -> bool {
        true
    }
}

#[derive(Debug, Clone)]
pub enum Rule {
    Style(Arc<StyleRule>),
    Media(MediaRule),
}

type Flattened = Arc<[Arc<StyleRule>]>;

/// Ordered, immutable sequence of rules
#[derive(Debug, Default)]
pub struct SourceSheet {
    rules: Vec<Rule>,
    flattened: Mutex<Option<(Viewport, Flattened)>>,
}

impl SourceSheet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules, flattened: Mutex::new(None) }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    /// Every style rule that applies under `viewport`, in source order, with
    /// matching media rules expanded in place
    pub fn all_rules(&self, viewport: Viewport) -> Flattened {
        let mut slot = self.flattened.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some((cached, rules)) = slot.as_ref() {
            if *cached == viewport {
                return Arc::clone(rules);
            }
        }

        let mut out = Vec::new();
        self.collect(viewport, &mut out);
        debug!(
            rules = out.len(),
            width = viewport.width,
            height = viewport.height,
            "Flattened source sheet"
        );
        let rules: Flattened = out.into();
        *slot = Some((viewport, Arc::clone(&rules)));
        rules
    }

    fn collect(&self, viewport: Viewport, out: &mut Vec<Arc<StyleRule>>) {
        for rule in &self.rules {
            match rule {
                Rule::Style(rule) => out.push(Arc::clone(rule)),
                Rule::Media(media) if media.matches(viewport) => media.rules.collect(viewport, out),
                Rule::Media(_) => {}
            }
        }
    }

    /// Viewport the cached flattening was computed for
    pub fn cached_media(&self) -> Option<Viewport> {
        self.flattened
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|(viewport, _)| *viewport)
    }

    /// New sheet with the rules of `self` followed by those of `other`
    pub fn join(&self, other: &SourceSheet) -> SourceSheet {
        SourceSheet::new(self.rules.iter().chain(&other.rules).cloned().collect())
    }
}

impl Clone for SourceSheet {
    fn clone(&self) -> Self {
        SourceSheet::new(self.rules.clone())
    }
}

impl<'a> IntoIterator for &'a SourceSheet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
