use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};

use schemadoc_core::{Config, Document, NoMatchPolicy, RewriteReport};
use schemadoc_engine::DocumentRewriter;
use schemadoc_rules::migration_rules;

/// SchemaDoc - rule-based rewriter for database design documents
#[derive(Parser)]
#[command(name = "schemadoc")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: schemadoc.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite the document in place
    Apply {
        /// Design document to rewrite
        document: PathBuf,

        /// Write a JSON report of rule outcomes
        #[arg(short, long)]
        report: Option<PathBuf>,

        /// Keep a .bak copy of the original document
        #[arg(long)]
        backup: bool,
    },

    /// Apply the rules in memory and report what would change, without writing
    Check {
        /// Design document to check
        document: PathBuf,

        /// Write a JSON report of rule outcomes
        #[arg(short, long)]
        report: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config if specified
    let config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else if Path::new("schemadoc.toml").exists() {
        Config::from_file(Path::new("schemadoc.toml"))?
    } else {
        if cli.verbose {
            eprintln!("{}", "No config file found, using defaults".yellow());
        }
        Config::default()
    };

    match cli.command {
        Commands::Apply {
            document,
            report,
            backup,
        } => apply_command(&config, &document, report.as_deref(), backup, cli.verbose),
        Commands::Check { document, report } => {
            check_command(&config, &document, report.as_deref(), cli.verbose)
        }
    }
}

/// Apply command - rewrite the document in place
fn apply_command(
    config: &Config,
    document_path: &Path,
    report_path: Option<&Path>,
    backup_flag: bool,
    verbose: bool,
) -> Result<()> {
    let (original, rewritten, report) = run_rules(document_path, verbose)?;

    enforce_no_match_policy(config, &report)?;

    // Nothing is written until every rule has succeeded in memory
    if config.backup || backup_flag {
        let backup_path = backup_path_for(document_path);
        original.save(&backup_path)?;
        if verbose {
            eprintln!("{} {}", "Backup written to:".cyan(), backup_path.display());
        }
    }

    rewritten.save(document_path)?;

    if let Some(path) = report_path {
        report.save_to_file(path)?;
        if verbose {
            eprintln!("{} {}", "Report saved to:".green(), path.display());
        }
    }

    print_summary(&report, document_path);

    if report.has_changes() {
        println!("{}", "Document updated successfully!".green().bold());
    } else {
        println!("{}", "Document already up to date.".green());
    }

    Ok(())
}

/// Check command - dry run; non-zero exit if the document would change
fn check_command(
    config: &Config,
    document_path: &Path,
    report_path: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    let (_, _, report) = run_rules(document_path, verbose)?;

    enforce_no_match_policy(config, &report)?;

    if let Some(path) = report_path {
        report.save_to_file(path)?;
        if verbose {
            eprintln!("{} {}", "Report saved to:".green(), path.display());
        }
    }

    print_summary(&report, document_path);

    if report.has_changes() {
        println!("{}", "Document is out of date; run 'schemadoc apply'.".red().bold());
        for outcome in report.outcomes.iter().filter(|o| o.changed) {
            println!("  {} {}/{}", "would change".yellow(), outcome.group, outcome.rule);
        }
        std::process::exit(1);
    }

    println!("{}", "✓ Document is already migrated.".green().bold());
    Ok(())
}

/// Load the document and run the full rule set over it in memory
fn run_rules(
    document_path: &Path,
    verbose: bool,
) -> Result<(Document, Document, RewriteReport)> {
    let rules = migration_rules();

    if verbose {
        eprintln!(
            "{} {} rules in {} groups",
            "Compiling".cyan(),
            rules.len(),
            rules.groups.len()
        );
    }

    // Compile before reading anything; a malformed rule aborts here
    let rewriter = DocumentRewriter::new(&rules)?;

    if verbose {
        eprintln!("{} {}", "Loading document from:".cyan(), document_path.display());
    }

    let original = Document::load(document_path)?;
    let outcome = rewriter.apply(original.as_str());
    let rewritten = Document::new(outcome.text);

    let report = RewriteReport::from_outcomes(
        original.checksum(),
        rewritten.checksum(),
        outcome.outcomes,
    );

    Ok((original, rewritten, report))
}

/// Surface zero-match rules according to the configured policy
fn enforce_no_match_policy(config: &Config, report: &RewriteReport) -> Result<()> {
    let no_match: Vec<_> = report.no_match_rules().collect();
    if no_match.is_empty() {
        return Ok(());
    }

    match config.no_match {
        NoMatchPolicy::Ignore => {}
        NoMatchPolicy::Warn => {
            for outcome in &no_match {
                eprintln!(
                    "{} rule {}/{} matched nothing",
                    "warning:".yellow().bold(),
                    outcome.group,
                    outcome.rule
                );
            }
        }
        NoMatchPolicy::Fail => {
            let names: Vec<_> = no_match
                .iter()
                .map(|o| format!("{}/{}", o.group, o.rule))
                .collect();
            anyhow::bail!(
                "{} rule(s) matched nothing and no_match policy is 'fail': {}",
                names.len(),
                names.join(", ")
            );
        }
    }

    Ok(())
}

fn backup_path_for(document_path: &Path) -> PathBuf {
    let mut name = document_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".bak");
    document_path.with_file_name(name)
}

/// Print a run summary to stdout
fn print_summary(report: &RewriteReport, document_path: &Path) {
    println!("\n{}", "=".repeat(60).bright_blue());
    println!("{}", "Design Document Rewrite".bold().bright_blue());
    println!("{}", "=".repeat(60).bright_blue());
    println!();

    println!("Document: {}", document_path.display());
    println!("Version: {}", report.version);
    println!();

    println!("{}", "Summary:".bold());
    println!("  Rules applied:   {}", report.summary.rules_total);

    if report.summary.rules_changed > 0 {
        println!(
            "  Rules changed:   {}",
            report.summary.rules_changed.to_string().green()
        );
    } else {
        println!("  Rules changed:   {}", report.summary.rules_changed);
    }

    if report.summary.rules_no_match > 0 {
        println!(
            "  Rules no match:  {}",
            report.summary.rules_no_match.to_string().yellow()
        );
    } else {
        println!("  Rules no match:  {}", report.summary.rules_no_match);
    }

    println!("  Replacements:    {}", report.summary.replacements);
    println!();
    println!("{}", "=".repeat(60).bright_blue());
}
