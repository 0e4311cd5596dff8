//! CLI entry point for compose-lint
//!
//! Provides a command-line interface for validating compose files,
//! listing sequences, printing statistics and auto-tagging comments.

use clap::{Parser, Subcommand};
use colored::*;
use compose_lint::config::{
    self, expand_path, tagger::retag_file, validator::ComposeValidator, ComposeFile,
    ComposeTransaction, ConfigError,
};
use compose_lint::core::stats::{classify_with, Statistics};
use compose_lint::core::{DetectorSettings, Finding, SequenceTable, Severity};
use compose_lint::ValidationReport;
use std::path::Path;
use tracing::Level;

#[derive(Parser)]
#[command(name = "compose-lint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Show detailed findings and debug logs
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a compose file (exit code reflects the failure class)
    Check {
        /// Path to compose file
        #[arg(default_value = "~/.XCompose")]
        file: String,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Only print errors and the verdict
        #[arg(short, long)]
        quiet: bool,

        /// Hide warnings
        #[arg(long)]
        no_warnings: bool,

        /// Hide statistics
        #[arg(long)]
        no_stats: bool,

        /// Skip comment format checks
        #[arg(long)]
        no_comment_checks: bool,
    },

    /// List all sequences by category
    List {
        /// Path to compose file
        #[arg(default_value = "~/.XCompose")]
        file: String,
    },

    /// Print usage statistics
    Stats {
        /// Path to compose file
        #[arg(default_value = "~/.XCompose")]
        file: String,

        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add [ICONIC]/[MNEMONIC] tags to untagged comments
    Tag {
        /// Path to compose file
        #[arg(default_value = "~/.XCompose")]
        file: String,

        /// Show what would change without writing
        #[arg(long)]
        dry_run: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = DetectorSettings {
        verbose: cli.verbose,
        ..DetectorSettings::default()
    };

    match cli.command {
        Commands::Check {
            file,
            json,
            quiet,
            no_warnings,
            no_stats,
            no_comment_checks,
        } => {
            let settings = DetectorSettings {
                check_comments: !no_comment_checks,
                ..settings
            };
            let options = CheckOptions {
                json,
                quiet,
                show_warnings: !no_warnings && !quiet,
                show_stats: !no_stats && !quiet,
                verbose: cli.verbose,
            };
            let code = check(&file, settings, &options)?;
            std::process::exit(code);
        }
        Commands::List { file } => list_sequences(&file)?,
        Commands::Stats { file, json } => print_stats(&file, &settings, json)?,
        Commands::Tag { file, dry_run } => tag_comments(&file, dry_run)?,
    }

    Ok(())
}

/// Logs go to stderr so stdout stays machine-readable
fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();
}

struct CheckOptions {
    json: bool,
    quiet: bool,
    show_warnings: bool,
    show_stats: bool,
    verbose: bool,
}

/// Validates a compose file and returns the process exit code
fn check(file: &str, settings: DetectorSettings, options: &CheckOptions) -> anyhow::Result<i32> {
    let path = expand_path(file);
    let report = ComposeValidator::with_settings(settings).validate_file(&path);

    if options.json {
        println!("{}", serde_json::to_string_pretty(&report.to_json())?);
        return Ok(report.exit_code());
    }

    if !options.quiet {
        println!("{} Validating: {}\n", "→".cyan(), path.display());
    }

    print_findings(&report, options);

    if options.show_stats {
        if let Some(stats) = &report.statistics {
            print_summary_stats(stats);
        }
    }

    print_verdict(&report);
    Ok(report.exit_code())
}

fn print_findings(report: &ValidationReport, options: &CheckOptions) {
    let errors: Vec<&Finding> = report.findings.iter().filter(|f| f.severity.is_failure()).collect();
    let warnings: Vec<&Finding> = report
        .findings
        .iter()
        .filter(|f| f.severity == Severity::Warning)
        .collect();
    let info: Vec<&Finding> = report
        .findings
        .iter()
        .filter(|f| f.severity == Severity::Info)
        .collect();

    if !errors.is_empty() {
        println!("{}", format!("✗ {} error(s):", errors.len()).red().bold());
        for finding in errors {
            println!("  {} {}", format!("[{}]", finding.kind).red(), finding);
        }
        println!();
    }

    if options.show_warnings && !warnings.is_empty() {
        println!("{}", format!("⚠ {} warning(s):", warnings.len()).yellow().bold());
        for finding in warnings {
            println!("  {} {}", format!("[{}]", finding.kind).yellow(), finding);
        }
        println!();
    }

    if options.verbose && !options.quiet && !info.is_empty() {
        println!("{}", format!("ℹ {} note(s):", info.len()).blue().bold());
        for finding in info {
            println!("  {}", finding.to_string().dimmed());
        }
        println!();
    }
}

fn print_summary_stats(stats: &Statistics) {
    println!("{}", "Statistics".bold());
    println!("  Sequences:        {} ({} distinct)", stats.total_sequences, stats.distinct_sequences);
    println!("  Unique symbols:   {}", stats.unique_symbols);
    println!("  Unique prefixes:  {}", stats.unique_prefixes);
    println!(
        "  Length:           {}–{} keys (avg {:.1})",
        stats.length.min, stats.length.max, stats.length.avg
    );
    if !stats.top_prefixes.is_empty() {
        println!("  Top prefixes:");
        for prefix in stats.top_prefixes.iter().take(5) {
            println!("     <{}>: {} sequences", prefix.prefix, prefix.count);
        }
    }
    println!();
}

fn print_verdict(report: &ValidationReport) {
    if report.passed() {
        println!(
            "{} {} ({} warning(s))",
            "✓".green().bold(),
            "Validation passed".bold(),
            report.warning_count()
        );
    } else {
        println!(
            "{} {}: {} error(s), {} warning(s)",
            "✗".red().bold(),
            "Validation failed".bold(),
            report.error_count(),
            report.warning_count()
        );
    }
}

/// Loads a file, exiting with the matching exit code if it cannot be read
fn load_table(file: &str) -> SequenceTable {
    match config::parse(file) {
        Ok(table) => table,
        Err(e) => exit_on_error(&e),
    }
}

fn exit_on_error(error: &ConfigError) -> ! {
    eprintln!("{} {}", "✗".red().bold(), error);
    std::process::exit(error.exit_status().code());
}

/// List all sequences in the compose file
fn list_sequences(file: &str) -> anyhow::Result<()> {
    let table = load_table(file);

    println!("{}", format!("Sequences from: {}\n", expand_path(file).display()).bold());

    for (category, sequences) in table.by_category() {
        println!("{}", category.magenta().bold());

        for sequence in sequences {
            let keys = sequence.key_string().cyan();
            let comment = sequence.comment.as_deref().unwrap_or("");
            println!("  {} → {}  {}", keys, sequence.symbol.green().bold(), comment.dimmed());
        }
        println!();
    }

    println!("{} Total: {} sequences", "✓".green(), table.len());

    Ok(())
}

/// Print usage statistics
fn print_stats(file: &str, settings: &DetectorSettings, json: bool) -> anyhow::Result<()> {
    let table = load_table(file);
    let stats = classify_with(&table, settings);

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    print_summary_stats(&stats);

    println!("{}", "Access modes".bold());
    println!("  ASCII shortcut:   {}", stats.access_modes.ascii_shortcut);
    println!("  Mnemonic:         {}", stats.access_modes.mnemonic);
    println!("  Variant:          {}", stats.access_modes.variant);
    println!(
        "  Dual access:      {}/{} symbols ({:.1}%)",
        stats.dual_access.both.len(),
        stats.unique_symbols,
        stats.dual_access.coverage_percent
    );
    println!();

    if !stats.confusing_prefixes.is_empty() {
        println!("{}", "Crowded prefixes".yellow().bold());
        for prefix in &stats.confusing_prefixes {
            println!("  <{}>: {} sequences", prefix.prefix, prefix.count);
        }
        println!();
    }

    if !stats.long_sequences.is_empty() {
        println!("{}", "Long sequences".yellow().bold());
        for sequence in &stats.long_sequences {
            println!("  {} → {} ({} keys)", sequence.keys.cyan(), sequence.symbol, sequence.length);
        }
        println!();
    }

    if !stats.typo_prone.is_empty() {
        println!("{}", "Repeated keys".yellow().bold());
        for sequence in &stats.typo_prone {
            println!("  {} → {} (line {})", sequence.keys.cyan(), sequence.symbol, sequence.line);
        }
        println!();
    }

    if !stats.heavy_shift.is_empty() {
        println!("{}", "Shift-heavy sequences".yellow().bold());
        for burden in &stats.heavy_shift {
            println!(
                "  {} → {} ({} shifted)",
                burden.sequence.keys.cyan(),
                burden.sequence.symbol,
                burden.shifted_keys
            );
        }
        println!();
    }

    Ok(())
}

/// Tag untagged comments, backing the file up first
fn tag_comments(file: &str, dry_run: bool) -> anyhow::Result<()> {
    let path = expand_path(file);
    let outcome = match retag_file(&path) {
        Ok(outcome) => outcome,
        Err(e) => exit_on_error(&e),
    };

    println!("{}", "Auto-Tagging Summary".bold());
    println!("  [ICONIC] tags added:   {}", outcome.counts.iconic);
    println!("  [MNEMONIC] tags added: {}", outcome.counts.mnemonic);
    println!("  Already tagged:        {}", outcome.counts.already_tagged);
    println!("  Left untagged:         {}", outcome.counts.unclassified);
    println!();

    if dry_run {
        println!("{}", "DRY RUN - no changes written".yellow());
        for change in outcome.changes.iter().take(10) {
            println!("\n  line {}", change.line_number);
            println!("  {} {}", "BEFORE:".dimmed(), change.before);
            println!("  {} {}", "AFTER: ".green(), change.after);
        }
        return Ok(());
    }

    if outcome.is_unchanged() {
        println!("{} Nothing to tag", "✓".green());
        return Ok(());
    }

    // Only the write path may create the backup directory
    let compose = match ComposeFile::new(path.clone()) {
        Ok(compose) => compose,
        Err(e) => exit_on_error(&e),
    };
    let written = ComposeTransaction::begin(&compose).and_then(|tx| {
        let backup = tx.backup_path().map(Path::to_path_buf);
        tx.commit_preserving(&outcome.content)?;
        Ok(backup)
    });
    let backup = match written {
        Ok(backup) => backup,
        Err(e) => exit_on_error(&e),
    };

    println!("{} File updated: {}", "✓".green().bold(), path.display());
    if let Some(backup) = backup {
        println!("  Backup: {}", backup.display());
    }
    println!("\n{}", "⚠ Please review the new tags and run `compose-lint check`".yellow());

    Ok(())
}
