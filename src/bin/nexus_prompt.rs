//! nexus-prompt CLI
//!
//! Formats and lints Prompt DSL front matter in Markdown files.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use prompt_dsl::config::PromptConfig;
use prompt_dsl::format::{format_document, unified_diff};
use prompt_dsl::lint::{lint_files, LintStatus};
use prompt_dsl::walk::collect_files;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "nexus-prompt")]
#[command(about = "Format and lint Prompt DSL front matter")]
struct Cli {
    /// Extra configuration file layered over the defaults
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Format Markdown front matter (YAML)
    Fmt {
        /// Only report files that need formatting
        #[arg(short = 'c', long)]
        check: bool,
        /// With --check, print a unified diff per file
        #[arg(long)]
        diff: bool,
        /// Files or directories (defaults to .)
        paths: Vec<PathBuf>,
    },

    /// Lint Markdown front matter (Prompt DSL)
    Lint {
        /// Files or directories (defaults to .)
        paths: Vec<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("[nexus-prompt] Fatal error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Returns whether the command succeeded
fn run(cli: Cli) -> anyhow::Result<bool> {
    let config = match &cli.config {
        Some(path) => {
            let path = path.to_string_lossy();
            PromptConfig::load_from(Some(&*path))
        }
        None => PromptConfig::load(),
    }
    .context("loading configuration")?;

    match cli.command {
        Commands::Fmt { check, diff, paths } => {
            fmt(&config, with_default_target(paths), check, diff || config.format.show_diff)
        }
        Commands::Lint { paths } => lint(&config, with_default_target(paths)),
    }
}

fn with_default_target(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    if paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        paths
    }
}

fn fmt(config: &PromptConfig, targets: Vec<PathBuf>, check: bool, show_diff: bool) -> anyhow::Result<bool> {
    let files = collect_files(&targets, &config.walk);
    if files.is_empty() {
        println!("[nexus-prompt] No files to format.");
        return Ok(true);
    }

    let mut checked = 0;
    let mut needs_format = Vec::new();

    for file in &files {
        checked += 1;
        let display = file.display().to_string();
        let original = match std::fs::read_to_string(file) {
            Ok(text) => text,
            Err(e) => {
                eprintln!("[nexus-prompt][fmt] Skipped {}: {}", display, e);
                continue;
            }
        };
        let outcome = match format_document(&original) {
            Ok(outcome) => outcome,
            Err(e) => {
                eprintln!("[nexus-prompt][fmt] Invalid YAML front matter in {}: {}", display, e);
                continue;
            }
        };
        if !outcome.changed {
            continue;
        }

        let why = outcome
            .reasons
            .iter()
            .map(|r| r.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        if check {
            if show_diff {
                print!("{}", unified_diff(&display, &original, &outcome.output));
            }
            needs_format.push((display, why));
        } else {
            std::fs::write(file, &outcome.output).with_context(|| format!("writing {}", display))?;
            println!("[nexus-prompt][fmt] Updated {}: {}", display, why);
            needs_format.push((display, why));
        }
    }

    if check {
        if needs_format.is_empty() {
            println!("[nexus-prompt] All files are properly formatted.");
            return Ok(true);
        }
        eprintln!("[nexus-prompt] Formatting required for the following file(s):");
        for (file, why) in &needs_format {
            eprintln!("  - {}  ({})", file, why);
        }
        eprintln!(
            "[nexus-prompt] {} file(s) need formatting. Run: nexus-prompt fmt [paths]",
            needs_format.len()
        );
        return Ok(false);
    }

    println!(
        "[nexus-prompt] Formatted {} file(s), updated {}.",
        checked,
        needs_format.len()
    );
    Ok(true)
}

fn lint(config: &PromptConfig, targets: Vec<PathBuf>) -> anyhow::Result<bool> {
    let files = collect_files(&targets, &config.walk);
    if files.is_empty() {
        println!("[nexus-prompt] No files to lint.");
        return Ok(true);
    }

    let results = lint_files(&files, &config.lint);
    let mut error_count = 0;
    let mut warn_count = 0;

    for result in &results {
        if result.status == LintStatus::UnreadableFile {
            eprintln!("[nexus-prompt][lint] Skipped {}: unreadable", result.document_id);
            continue;
        }
        for error in &result.errors {
            eprintln!("[nexus-prompt][lint] {}: {} [{}]", result.document_id, error.message, error.code);
        }
        for warning in &result.warnings {
            eprintln!("[nexus-prompt][lint] {}: {} [{}]", result.document_id, warning.message, warning.code);
        }
        error_count += result.errors.len();
        warn_count += result.warnings.len();
    }

    println!(
        "[nexus-prompt] Lint complete. {} error(s), {} warning(s), checked {} file(s).",
        error_count,
        warn_count,
        results.len()
    );
    Ok(error_count == 0)
}
