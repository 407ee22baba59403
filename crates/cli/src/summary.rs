// ABOUTME: Console summary for a pruning run, as plain text or JSON.
// ABOUTME: Lists processed attributes and removed classes by descending frequency.

use std::fmt::Write as _;
use std::path::Path;

use classprune_core::{PruneOutcome, RemovalReport};
use serde::Serialize;

/// Where the cleaned markup ended up.
#[derive(Debug, Clone, Copy)]
pub enum Destination<'a> {
    File(&'a Path),
    DryRun(&'a Path),
    Stdout,
}

#[derive(Serialize)]
struct JsonSummary<'a> {
    processed: usize,
    unique_removed: usize,
    removed: &'a RemovalReport,
    output: Option<String>,
    written: bool,
    lossy_inputs: Vec<String>,
}

/// Plain-text summary.
pub fn render_text(outcome: &PruneOutcome, dest: Destination<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Processed class attributes: {}", outcome.processed);
    let _ = writeln!(out, "Unique removed classes: {}", outcome.report.distinct());
    for entry in outcome.report.by_frequency() {
        let _ = writeln!(out, "{}: {}", entry.class, entry.count);
    }
    for path in &outcome.lossy_inputs {
        let _ = writeln!(out, "Replaced malformed bytes in: {}", path.display());
    }
    match dest {
        Destination::File(path) => {
            let _ = write!(out, "\nWrote cleaned file to: {}", path.display());
        }
        Destination::DryRun(path) => {
            let _ = write!(out, "\nDry run, not written: {}", path.display());
        }
        Destination::Stdout => {}
    }
    out
}

/// JSON summary.
pub fn render_json(outcome: &PruneOutcome, dest: Destination<'_>) -> serde_json::Result<String> {
    let (output, written) = match dest {
        Destination::File(path) => (Some(path.display().to_string()), true),
        Destination::DryRun(path) => (Some(path.display().to_string()), false),
        Destination::Stdout => (None, true),
    };
    serde_json::to_string_pretty(&JsonSummary {
        processed: outcome.processed,
        unique_removed: outcome.report.distinct(),
        removed: &outcome.report,
        output,
        written,
        lossy_inputs: outcome
            .lossy_inputs
            .iter()
            .map(|p| p.display().to_string())
            .collect(),
    })
}
