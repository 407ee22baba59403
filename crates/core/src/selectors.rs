// ABOUTME: Extracts the set of class names a stylesheet defines selectors for.
// ABOUTME: Regex scan over raw CSS text with escaped-colon and pseudo-class normalization.

//! Stylesheet class selector extraction.
//!
//! This is a pattern scan, not a CSS parser. It over-approximates on purpose:
//! anything that looks like `.name` counts, including numbers such as `.5em`
//! and both halves of a compound selector like `.card.active`. Extra names only
//! make the rewriter keep more tokens, never remove a styled one.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

// Period followed by letters, digits, underscore, hyphen, period, colon or backslash
static CLASS_SELECTOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.([a-zA-Z0-9_\\:.-]+)").unwrap());

/// Normalized class names known to have a style rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorSet {
    names: HashSet<String>,
}

impl SelectorSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `class` is defined.
    pub fn contains(&self, class: &str) -> bool {
        self.names.contains(class)
    }

    /// Adds a class name, returning false if it was already present.
    pub fn insert(&mut self, class: impl Into<String>) -> bool {
        self.names.insert(class.into())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterates over the names in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for SelectorSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Scans stylesheet text and returns every class name it defines a selector for.
///
/// Each match is normalized:
/// - `\:` is unescaped to `:` (utility frameworks escape variant prefixes such
///   as `hover\:underline`, while the markup spells them `hover:underline`);
/// - a remaining colon starts a pseudo-class, so the name is cut there;
/// - what is left is split on periods, so `.a.b` registers `a` and `b`.
///
/// An empty or selector-free stylesheet yields an empty set.
pub fn extract_selectors(css: &str) -> SelectorSet {
    let mut set = SelectorSet::new();
    for caps in CLASS_SELECTOR_RE.captures_iter(css) {
        let raw = &caps[1];
        for name in normalize_selector(raw) {
            set.insert(name);
        }
    }
    tracing::debug!(count = set.len(), "extracted class selectors");
    set
}

/// Normalizes one raw selector match into zero or more class names.
fn normalize_selector(raw: &str) -> Vec<String> {
    let unescaped = raw.replace("\\:", ":");
    let base = match unescaped.split_once(':') {
        Some((head, _)) => head,
        None => unescaped.as_str(),
    };
    base.split('.')
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}
