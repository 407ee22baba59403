// ABOUTME: Library entry point for classprune, which strips unstyled class names from HTML.
// ABOUTME: Re-exports the pipeline stages, the Pruner facade, config, report and error types.

//! classprune - remove class names that no stylesheet rule defines.
//!
//! The pipeline has three stages:
//! 1. [`extract_selectors`] collects the class names a stylesheet defines;
//! 2. [`locate_exempt_ranges`] finds `<pre>`/`<code>` blocks to leave alone;
//! 3. [`rewrite_classes`] filters every other `class="..."` attribute.
//!
//! # Example
//!
//! ```
//! use classprune_core::Pruner;
//!
//! let outcome = Pruner::default()
//!     .prune(".foo{} .bar{}", r#"<p class="foo baz bar">hi</p>"#)
//!     .unwrap();
//! assert_eq!(outcome.html, r#"<p class="foo bar">hi</p>"#);
//! assert_eq!(outcome.report.count("baz"), 1);
//! ```

pub mod config;
pub mod decode;
pub mod error;
pub mod exempt;
pub mod pruner;
pub mod report;
pub mod rewrite;
pub mod selectors;

pub use crate::config::{PruneConfig, UnterminatedPolicy, DEFAULT_OUTPUT_SUFFIX};
pub use crate::decode::{decode_text, DecodedText};
pub use crate::error::{PruneError, Result};
pub use crate::exempt::{
    find_unterminated, locate_exempt_ranges, ExemptRange, ExemptRanges, UnterminatedTag,
    DEFAULT_PROTECTED_TAGS,
};
pub use crate::pruner::{run, write_output, PruneOutcome, PruneSummary, Pruner, PrunerBuilder};
pub use crate::report::{RemovalReport, RemovedClass};
pub use crate::rewrite::{rewrite_classes, RenameRule, RenameRules, Rewrite};
pub use crate::selectors::{extract_selectors, SelectorSet};
