// SPDX-License-Identifier: PMPL-1.0-or-later
//! Keyreachbot CLI - keyboard reachability audit and remediation bot
//!
//! Part of the gitbot-fleet ecosystem.

use clap::{Parser, Subcommand, ValueEnum};
use keyreachbot::report::{generate_report, OutputFormat};
use keyreachbot::scanner::{self, FixMode};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Keyboard reachability audit and remediation bot for gitbot-fleet
#[derive(Parser)]
#[command(name = "keyreachbot")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Audit every HTML document in a directory
    Check {
        /// Directory to scan
        dir: PathBuf,

        /// Output format
        #[arg(long, default_value = "text")]
        format: FormatArg,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Enable verbose logging
        #[arg(long, short)]
        verbose: bool,
    },

    /// Audit a single HTML document
    Analyze {
        /// File to analyze
        file: PathBuf,

        /// Output format
        #[arg(long, default_value = "text")]
        format: FormatArg,

        /// Enable verbose logging
        #[arg(long, short)]
        verbose: bool,
    },

    /// Patch keyboard support onto flagged elements
    Fix {
        /// HTML file or directory to fix
        path: PathBuf,

        /// Rewrite files in place (default is a dry run)
        #[arg(long)]
        write: bool,

        /// Write patched copies under this directory instead
        #[arg(long, conflicts_with = "write")]
        output: Option<PathBuf>,

        /// Output format for the accompanying report
        #[arg(long, default_value = "text")]
        format: FormatArg,

        /// Enable verbose logging
        #[arg(long, short)]
        verbose: bool,
    },

    /// Generate a SARIF report for a directory
    Report {
        /// Directory to scan
        dir: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Enable verbose logging
        #[arg(long, short)]
        verbose: bool,
    },

    /// Run as a fleet member (machine-readable output)
    Fleet {
        /// Directory to scan
        dir: PathBuf,

        /// Enable verbose logging
        #[arg(long, short)]
        verbose: bool,
    },
}

/// Output format CLI argument
#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Human-readable text
    Text,
    /// Structured JSON
    Json,
    /// SARIF for IDE/CI
    Sarif,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Sarif => OutputFormat::Sarif,
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("keyreachbot=debug")
    } else {
        EnvFilter::new("keyreachbot=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { dir, format, output, verbose } => {
            init_logging(verbose);
            let findings = scanner::scan_directory(&dir)?;
            let report = generate_report(&findings, format.into());
            write_output(&report, output.as_deref())?;

            if findings.has_errors() {
                std::process::exit(1);
            }
        }

        Commands::Analyze { file, format, verbose } => {
            init_logging(verbose);
            let findings = scanner::scan_file(&file)?;
            let report = generate_report(&findings, format.into());
            println!("{}", report);

            if findings.has_errors() {
                std::process::exit(1);
            }
        }

        Commands::Fix { path, write, output, format, verbose } => {
            init_logging(verbose);
            let mode = if write {
                FixMode::InPlace
            } else if let Some(dir) = output {
                FixMode::OutputDir(dir)
            } else {
                FixMode::DryRun
            };
            let findings = scanner::fix_path(&path, &mode)?;
            let report = generate_report(&findings, format.into());
            println!("{}", report);

            if matches!(mode, FixMode::DryRun) && !findings.fixed().is_empty() {
                eprintln!(
                    "Dry run: {} finding(s) would be fixed. Pass --write or --output to apply.",
                    findings.fixed().len()
                );
            }
            if findings.blocks_release() {
                std::process::exit(1);
            }
        }

        Commands::Report { dir, output, verbose } => {
            init_logging(verbose);
            let findings = scanner::scan_directory(&dir)?;
            let report = generate_report(&findings, OutputFormat::Sarif);
            write_output(&report, output.as_deref())?;
        }

        Commands::Fleet { dir, verbose } => {
            init_logging(verbose);
            let findings = scanner::scan_directory(&dir)?;
            let report = generate_report(&findings, OutputFormat::Json);
            println!("{}", report);

            if findings.blocks_release() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

/// Write output to file or stdout
fn write_output(content: &str, path: Option<&std::path::Path>) -> anyhow::Result<()> {
    match path {
        Some(p) => {
            std::fs::write(p, content)?;
            eprintln!("Report written to {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
