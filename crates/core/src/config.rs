// ABOUTME: Run configuration: input/output paths, rename rules, protected tags, policies.
// ABOUTME: Loadable from a JSON file with paths resolved relative to the file's directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PruneError, Result};
use crate::exempt::{is_valid_tag_name, DEFAULT_PROTECTED_TAGS};
use crate::rewrite::RenameRule;

/// Suffix appended to the markup path when no output path is configured.
pub const DEFAULT_OUTPUT_SUFFIX: &str = ".cleaned";

/// What to do with a protected tag that has no closing tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnterminatedPolicy {
    /// Leave the content unprotected and log a warning.
    #[default]
    BestEffort,
    /// Abort before rewriting anything.
    Fail,
}

/// Everything one run needs.
///
/// ```json
/// {
///   "stylesheet": "dist/site.css",
///   "markup": "pages/layout-grid.html",
///   "renames": [{ "old": "bg-color-primary-light", "new": "bg-secondary-lighter" }]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PruneConfig {
    pub stylesheet: Option<PathBuf>,
    pub markup: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub renames: Vec<RenameRule>,
    pub protected_tags: Vec<String>,
    pub unterminated: UnterminatedPolicy,
    /// Encoding label for both inputs; UTF-8 when unset.
    pub encoding: Option<String>,
}

impl Default for PruneConfig {
    fn default() -> Self {
        Self {
            stylesheet: None,
            markup: None,
            output: None,
            renames: Vec::new(),
            protected_tags: DEFAULT_PROTECTED_TAGS.iter().map(|t| t.to_string()).collect(),
            unterminated: UnterminatedPolicy::default(),
            encoding: None,
        }
    }
}

impl PruneConfig {
    /// Reads a JSON config file. Relative paths inside it are resolved against
    /// the directory containing the file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| PruneError::read(path, e))?;
        let mut config: PruneConfig =
            serde_json::from_str(&raw).map_err(|source| PruneError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        if let Some(base) = path.parent() {
            config.resolve_relative_to(base);
        }
        Ok(config)
    }

    fn resolve_relative_to(&mut self, base: &Path) {
        for slot in [&mut self.stylesheet, &mut self.markup, &mut self.output] {
            if let Some(p) = slot.as_mut() {
                if p.is_relative() {
                    *p = base.join(&*p);
                }
            }
        }
    }

    /// Path of the stylesheet, or a Config error if none was given.
    pub fn stylesheet(&self) -> Result<&Path> {
        self.stylesheet
            .as_deref()
            .ok_or_else(|| PruneError::config("no stylesheet path given"))
    }

    /// Path of the markup, or a Config error if none was given.
    pub fn markup(&self) -> Result<&Path> {
        self.markup
            .as_deref()
            .ok_or_else(|| PruneError::config("no markup path given"))
    }

    /// Where the cleaned markup goes: the configured output, or the markup
    /// path with `.cleaned` appended.
    pub fn output_path(&self) -> Result<PathBuf> {
        if let Some(out) = &self.output {
            return Ok(out.clone());
        }
        let mut name = self.markup()?.as_os_str().to_os_string();
        name.push(DEFAULT_OUTPUT_SUFFIX);
        Ok(PathBuf::from(name))
    }

    /// Checks that the config can drive a run.
    pub fn validate(&self) -> Result<()> {
        self.stylesheet()?;
        let markup = self.markup()?;
        if let Some(tag) = self.protected_tags.iter().find(|t| !is_valid_tag_name(t)) {
            return Err(PruneError::config(format!("invalid protected tag {:?}", tag)));
        }
        for rule in &self.renames {
            rule.validate()?;
        }
        if same_file(&self.output_path()?, markup) {
            return Err(PruneError::config("output path must differ from markup path"));
        }
        Ok(())
    }
}

/// True if both paths name the same file, however they are spelled.
fn same_file(a: &Path, b: &Path) -> bool {
    a == b || comparable_path(a) == comparable_path(b)
}

// Canonical form of `path`. A file that does not exist yet is resolved through
// its parent directory; if that fails too the path is used as given.
fn comparable_path(path: &Path) -> PathBuf {
    if let Ok(canonical) = fs::canonicalize(path) {
        return canonical;
    }
    let (Some(parent), Some(name)) = (path.parent(), path.file_name()) else {
        return path.to_path_buf();
    };
    let parent = if parent.as_os_str().is_empty() {
        Path::new(".")
    } else {
        parent
    };
    fs::canonicalize(parent)
        .map(|dir| dir.join(name))
        .unwrap_or_else(|_| path.to_path_buf())
}
