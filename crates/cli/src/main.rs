// ABOUTME: CLI for stripping class names that a stylesheet does not define from an HTML file.
// ABOUTME: Merges flags with an optional JSON config, runs the pruner and prints a summary.

mod summary;

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use classprune_core::{run, PruneConfig, Pruner, RenameRule, UnterminatedPolicy};
use tracing_subscriber::EnvFilter;

use summary::{render_json, render_text, Destination};

/// Remove class names with no matching CSS selector from an HTML document.
#[derive(Parser, Debug)]
#[command(name = "classprune")]
#[command(about = "Strip class names that the stylesheet does not define", long_about = None)]
struct Args {
    /// Stylesheet whose class selectors are kept.
    #[arg(long = "css")]
    css: Option<PathBuf>,

    /// HTML document to clean.
    #[arg(long = "html")]
    html: Option<PathBuf>,

    /// Output path (default: <html>.cleaned).
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Rename a class before filtering, as old=new. Repeatable.
    #[arg(long = "rename", value_parser = parse_rename)]
    renames: Vec<RenameRule>,

    /// Tag whose contents are never rewritten. Repeatable; replaces the default pre/code.
    #[arg(long = "protect")]
    protect: Vec<String>,

    /// JSON config file; flags override its values.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Input text encoding label (default: utf-8).
    #[arg(long = "encoding")]
    encoding: Option<String>,

    /// Fail if a protected tag is never closed instead of rewriting its content.
    #[arg(long = "strict")]
    strict: bool,

    /// Print the summary as JSON.
    #[arg(long = "json")]
    json_output: bool,

    /// Compute the summary without writing the output file.
    #[arg(long = "dry-run")]
    dry_run: bool,

    /// Write the cleaned markup to stdout; the summary goes to stderr.
    #[arg(long = "stdout", conflicts_with = "dry_run")]
    to_stdout: bool,

    /// Enable debug logging.
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// Print elapsed time in ms to stderr.
    #[arg(long = "timing")]
    timing: bool,
}

fn parse_rename(s: &str) -> std::result::Result<RenameRule, String> {
    RenameRule::parse(s).map_err(|e| e.to_string())
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "classprune=debug,classprune_core=debug"
    } else {
        "classprune=info,classprune_core=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Builds the run configuration: config file first, then flag overrides.
fn build_config(args: &Args) -> Result<PruneConfig> {
    let mut config = match &args.config {
        Some(path) => PruneConfig::from_json_file(path)?,
        None => PruneConfig::default(),
    };

    if args.css.is_some() {
        config.stylesheet = args.css.clone();
    }
    if args.html.is_some() {
        config.markup = args.html.clone();
    }
    if args.output.is_some() {
        config.output = args.output.clone();
    }
    if !args.protect.is_empty() {
        config.protected_tags = args.protect.clone();
    }
    if args.encoding.is_some() {
        config.encoding = args.encoding.clone();
    }
    if args.strict {
        config.unterminated = UnterminatedPolicy::Fail;
    }
    config.renames.extend(args.renames.iter().cloned());

    if config.stylesheet.is_none() || config.markup.is_none() {
        bail!("--css and --html are required unless a --config provides them");
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = build_config(&args)?;
    let start = Instant::now();

    let (outcome, output) = if args.dry_run || args.to_stdout {
        let outcome = Pruner::from_config(&config)
            .prune_files(config.stylesheet()?, config.markup()?)?;
        (outcome, config.output_path()?)
    } else {
        let summary = run(&config)?;
        (summary.outcome, summary.output)
    };

    let dest = if args.to_stdout {
        Destination::Stdout
    } else if args.dry_run {
        Destination::DryRun(&output)
    } else {
        Destination::File(&output)
    };

    let report = if args.json_output {
        render_json(&outcome, dest).context("failed to serialize summary")?
    } else {
        render_text(&outcome, dest)
    };

    if args.to_stdout {
        io::stdout()
            .write_all(outcome.html.as_bytes())
            .context("failed to write markup to stdout")?;
        eprintln!("{}", report);
    } else {
        println!("{}", report);
    }

    if args.timing {
        let _ = writeln!(io::stderr(), "elapsed: {}ms", start.elapsed().as_millis());
    }

    Ok(())
}
