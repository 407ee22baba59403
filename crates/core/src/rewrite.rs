// ABOUTME: Rewrites class="..." attributes, dropping tokens with no matching selector.
// ABOUTME: Applies rename rules first and passes attributes inside exempt ranges through verbatim.

//! Class attribute rewriting.
//!
//! Only double-quoted `class="..."` attributes are recognized. The pattern has
//! no attribute-name boundary, so `data-class="..."` is rewritten as well.

use std::borrow::Cow;
use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{PruneError, Result};
use crate::exempt::ExemptRanges;
use crate::report::RemovalReport;
use crate::selectors::SelectorSet;

static CLASS_ATTR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"class="([^"]*)""#).unwrap());
static BLANK_CLASS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"class="\s+""#).unwrap());

/// Replace one class token with another before filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameRule {
    pub old: String,
    pub new: String,
}

impl RenameRule {
    pub fn new(old: impl Into<String>, new: impl Into<String>) -> Self {
        Self {
            old: old.into(),
            new: new.into(),
        }
    }

    /// Parses `old=new`. Both sides are trimmed and must be non-empty
    /// single tokens.
    pub fn parse(spec: &str) -> Result<Self> {
        let (old, new) = spec
            .split_once('=')
            .ok_or_else(|| PruneError::InvalidRename(spec.to_string()))?;
        let rule = Self::new(old.trim(), new.trim());
        rule.validate()?;
        Ok(rule)
    }

    /// Checks that both names are single class tokens.
    pub fn validate(&self) -> Result<()> {
        let is_token = |s: &str| !s.is_empty() && !s.contains(char::is_whitespace);
        if is_token(&self.old) && is_token(&self.new) {
            Ok(())
        } else {
            Err(PruneError::InvalidRename(format!("{}={}", self.old, self.new)))
        }
    }
}

/// Lookup table built from rename rules. A later rule for the same old name
/// replaces an earlier one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameRules {
    map: HashMap<String, String>,
}

impl RenameRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, rule: RenameRule) {
        self.map.insert(rule.old, rule.new);
    }

    /// Returns the renamed token, or the token itself. Renames do not chain.
    pub fn apply<'a>(&'a self, token: &'a str) -> &'a str {
        self.map.get(token).map(String::as_str).unwrap_or(token)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl FromIterator<RenameRule> for RenameRules {
    fn from_iter<I: IntoIterator<Item = RenameRule>>(iter: I) -> Self {
        let mut rules = RenameRules::new();
        for rule in iter {
            rules.insert(rule);
        }
        rules
    }
}

/// Result of rewriting one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rewrite {
    /// The transformed markup.
    pub html: String,
    /// Tokens dropped because no selector defines them.
    pub report: RemovalReport,
    /// Class attributes rewritten (exempt ones are not counted).
    pub processed: usize,
}

/// Rewrites every class attribute outside `exempt`.
///
/// Each attribute value is split on whitespace, renamed, filtered against
/// `selectors` and re-joined with single spaces. Attributes that filter down to
/// nothing become `class=""`. Everything else, including attributes whose
/// start lies in an exempt range, is copied unchanged.
pub fn rewrite_classes(
    html: &str,
    selectors: &SelectorSet,
    exempt: &ExemptRanges,
    renames: &RenameRules,
) -> Rewrite {
    let mut out = String::with_capacity(html.len());
    let mut report = RemovalReport::new();
    let mut processed = 0;
    let mut last = 0;

    for caps in CLASS_ATTR_RE.captures_iter(html) {
        let whole = caps.get(0).unwrap();
        out.push_str(&html[last..whole.start()]);
        last = whole.end();

        if exempt.contains(whole.start()) {
            out.push_str(whole.as_str());
            continue;
        }
        processed += 1;

        let kept = filter_tokens(&caps[1], selectors, renames, &mut report);
        let attr = format!("class=\"{}\"", kept.join(" "));
        out.push_str(&normalize_blank_class(&attr));
    }
    out.push_str(&html[last..]);

    tracing::debug!(
        processed,
        removed = report.total(),
        distinct = report.distinct(),
        "rewrote class attributes"
    );

    Rewrite {
        html: out,
        report,
        processed,
    }
}

fn filter_tokens<'a>(
    value: &'a str,
    selectors: &SelectorSet,
    renames: &'a RenameRules,
    report: &mut RemovalReport,
) -> Vec<&'a str> {
    let mut kept = Vec::new();
    for token in value.split_whitespace() {
        let token = renames.apply(token);
        if selectors.contains(token) {
            kept.push(token);
        } else {
            report.record(token);
        }
    }
    kept
}

/// Collapses a whitespace-only class value to `class=""`.
// Unreachable through `filter_tokens` + `join`; kept so the canonical empty form
// survives changes to reassembly.
fn normalize_blank_class(attr: &str) -> Cow<'_, str> {
    BLANK_CLASS_RE.replace_all(attr, r#"class="""#)
}
