// ABOUTME: Pruner facade wiring selector extraction, exempt ranges and rewriting together.
// ABOUTME: PrunerBuilder offers a fluent API; file helpers handle reading, decoding and writing.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{PruneConfig, UnterminatedPolicy};
use crate::decode::decode_text;
use crate::error::{PruneError, Result};
use crate::exempt::{
    find_unterminated, locate_exempt_ranges, UnterminatedTag, DEFAULT_PROTECTED_TAGS,
};
use crate::report::RemovalReport;
use crate::rewrite::{rewrite_classes, RenameRule, RenameRules};
use crate::selectors::extract_selectors;

/// Everything one pruning pass produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneOutcome {
    /// The cleaned markup.
    pub html: String,
    pub report: RemovalReport,
    /// Class attributes rewritten outside exempt ranges.
    pub processed: usize,
    /// Distinct class names the stylesheet defines.
    pub selectors: usize,
    pub exempt_ranges: usize,
    /// Protected tags left unprotected because they never close.
    pub unterminated: Vec<UnterminatedTag>,
    /// Inputs that contained malformed byte sequences.
    pub lossy_inputs: Vec<PathBuf>,
}

/// Result of [`run`]: the outcome plus where it was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PruneSummary {
    pub outcome: PruneOutcome,
    pub output: PathBuf,
}

/// Configured pruning pipeline.
#[derive(Debug, Clone)]
pub struct Pruner {
    renames: RenameRules,
    protected_tags: Vec<String>,
    unterminated: UnterminatedPolicy,
    encoding: Option<String>,
}

impl Default for Pruner {
    fn default() -> Self {
        PrunerBuilder::new().build()
    }
}

impl Pruner {
    pub fn builder() -> PrunerBuilder {
        PrunerBuilder::new()
    }

    /// Builds a pruner from the non-path parts of a config.
    pub fn from_config(config: &PruneConfig) -> Self {
        let mut builder = PrunerBuilder::new()
            .renames(config.renames.iter().cloned())
            .protected_tags(config.protected_tags.iter().cloned())
            .unterminated(config.unterminated);
        if let Some(label) = &config.encoding {
            builder = builder.encoding(label.clone());
        }
        builder.build()
    }

    /// Prunes `html` against the class selectors defined in `css`.
    ///
    /// Fails only under [`UnterminatedPolicy::Fail`], when a protected tag
    /// never closes.
    pub fn prune(&self, css: &str, html: &str) -> Result<PruneOutcome> {
        let selectors = extract_selectors(css);
        let exempt = locate_exempt_ranges(html, self.protected_tags.as_slice());
        let unterminated = find_unterminated(html, self.protected_tags.as_slice(), &exempt);

        if let Some(first) = unterminated.first() {
            match self.unterminated {
                UnterminatedPolicy::Fail => {
                    return Err(PruneError::UnterminatedProtectedTag {
                        tag: first.tag.clone(),
                        offset: first.offset,
                    });
                }
                UnterminatedPolicy::BestEffort => {
                    for open in &unterminated {
                        tracing::warn!(
                            tag = %open.tag,
                            offset = open.offset,
                            "protected tag is never closed; its content will be rewritten"
                        );
                    }
                }
            }
        }

        let rewrite = rewrite_classes(html, &selectors, &exempt, &self.renames);
        Ok(PruneOutcome {
            html: rewrite.html,
            report: rewrite.report,
            processed: rewrite.processed,
            selectors: selectors.len(),
            exempt_ranges: exempt.len(),
            unterminated,
            lossy_inputs: Vec::new(),
        })
    }

    /// Reads and decodes both inputs, then prunes. Nothing is written.
    pub fn prune_files(&self, stylesheet: &Path, markup: &Path) -> Result<PruneOutcome> {
        let mut lossy = Vec::new();
        let css = self.read_text(stylesheet, &mut lossy)?;
        let html = self.read_text(markup, &mut lossy)?;
        let mut outcome = self.prune(&css, &html)?;
        outcome.lossy_inputs = lossy;
        Ok(outcome)
    }

    fn read_text(&self, path: &Path, lossy: &mut Vec<PathBuf>) -> Result<String> {
        let bytes = fs::read(path).map_err(|e| PruneError::read(path, e))?;
        let decoded = decode_text(&bytes, self.encoding.as_deref())?;
        if decoded.had_errors {
            tracing::warn!(
                path = %path.display(),
                encoding = decoded.encoding,
                "malformed byte sequences replaced while decoding"
            );
            lossy.push(path.to_path_buf());
        }
        Ok(decoded.text)
    }
}

/// Builder for [`Pruner`].
#[derive(Debug, Clone)]
pub struct PrunerBuilder {
    renames: Vec<RenameRule>,
    protected_tags: Vec<String>,
    unterminated: UnterminatedPolicy,
    encoding: Option<String>,
}

impl PrunerBuilder {
    /// Starts with no renames, `pre`/`code` protected and the best-effort policy.
    pub fn new() -> Self {
        Self {
            renames: Vec::new(),
            protected_tags: DEFAULT_PROTECTED_TAGS.iter().map(|t| t.to_string()).collect(),
            unterminated: UnterminatedPolicy::default(),
            encoding: None,
        }
    }

    /// Adds one rename rule.
    pub fn rename(mut self, old: impl Into<String>, new: impl Into<String>) -> Self {
        self.renames.push(RenameRule::new(old, new));
        self
    }

    /// Adds several rename rules.
    pub fn renames(mut self, rules: impl IntoIterator<Item = RenameRule>) -> Self {
        self.renames.extend(rules);
        self
    }

    /// Replaces the protected tag list.
    pub fn protected_tags<S: Into<String>>(mut self, tags: impl IntoIterator<Item = S>) -> Self {
        self.protected_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn unterminated(mut self, policy: UnterminatedPolicy) -> Self {
        self.unterminated = policy;
        self
    }

    /// Sets the encoding label used when reading files.
    pub fn encoding(mut self, label: impl Into<String>) -> Self {
        self.encoding = Some(label.into());
        self
    }

    pub fn build(self) -> Pruner {
        Pruner {
            renames: self.renames.into_iter().collect(),
            protected_tags: self.protected_tags,
            unterminated: self.unterminated,
            encoding: self.encoding,
        }
    }
}

impl Default for PrunerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Writes the cleaned markup, replacing any existing file.
pub fn write_output(path: &Path, html: &str) -> Result<()> {
    fs::write(path, html).map_err(|e| PruneError::write(path, e))
}

/// Runs a full configured pass: validate, read, prune, write.
pub fn run(config: &PruneConfig) -> Result<PruneSummary> {
    config.validate()?;
    let output = config.output_path()?;
    let outcome =
        Pruner::from_config(config).prune_files(config.stylesheet()?, config.markup()?)?;
    write_output(&output, &outcome.html)?;
    tracing::info!(path = %output.display(), "wrote cleaned markup");
    Ok(PruneSummary { outcome, output })
}
