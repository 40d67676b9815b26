//! Command-line entry point. Thin by design: the analysis kernel lives in
//! `acidtest-scan`; this binary only parses flags, wires up logging, runs
//! one of two commands, and translates the result into an exit code.

use std::path::PathBuf;
use std::process::ExitCode;

use acidtest_core::Status;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::error;

mod validate;

#[derive(Parser)]
#[command(name = "acidtest", version, about = "Security scanner for AI-agent code bundles")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan a bundle directory and print the JSON verdict report to stdout.
    Scan {
        /// Path to the bundle directory (contains SKILL.md or an alternate manifest).
        path: PathBuf,
        /// Directory of pattern bundle JSON files.
        #[arg(long, default_value = "patterns")]
        patterns_dir: PathBuf,
    },
    /// Validate a directory of pattern bundle JSON files without running a scan.
    ValidatePatterns {
        /// Directory of pattern bundle JSON files.
        dir: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    let cli = Cli::parse();
    let outcome = match cli.command {
        Command::Scan { path, patterns_dir } => run_scan_command(&path, &patterns_dir),
        Command::ValidatePatterns { dir } => Ok(validate::run(&dir)),
    };
    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run_scan_command(path: &PathBuf, patterns_dir: &PathBuf) -> Result<bool> {
    let config = acidtest_scan::ScanConfig { patterns_dir: patterns_dir.clone() };
    let result = acidtest_scan::run_scan(path, &config, env!("CARGO_PKG_VERSION"));

    let json = serde_json::to_string_pretty(&result).context("failed to serialize scan result")?;
    println!("{json}");

    Ok(matches!(result.status, Status::Pass | Status::Warn))
}
