//! The `analyze` subcommand: batch analysis, reporting and auto-fixing.

use crate::analyzer;
use crate::cli::AnalyzeArgs;
use crate::config::Config;
use crate::fix;
use crate::report::{self, ReportFormat};
use crate::shellcheck;
use crate::vulnerability::{Vulnerability, VulnerabilityType};
use anyhow::{Context, Result};
use colored::Colorize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::str::FromStr;

/// Runs the analysis and returns the process exit code.
///
/// # Errors
/// Returns an error for unreadable configuration, an unsupported format,
/// or a failed report/fix write.
pub fn run(args: &AnalyzeArgs) -> Result<i32> {
    let format = ReportFormat::from_str(&args.format)?;

    let config_dir = if args.path.is_dir() {
        args.path.clone()
    } else {
        args.path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), PathBuf::from)
    };
    let mut config = Config::load(&config_dir)?;
    if args.no_shellcheck {
        config.shellcheck = false;
    }

    if args.verbose && config.shellcheck && !shellcheck::available() {
        eprintln!(
            "{}",
            "shellcheck not found; skipping the external syntax gate".yellow()
        );
    }

    let result = analyzer::analyze_path(&args.path, &config);

    if args.verbose {
        eprintln!("Analyzed {} file(s)", result.files_seen);
    }
    for (file, reason) in &result.failures {
        eprintln!("{} {}: {reason}", "skipped".yellow(), file.display());
    }

    let rendered = report::render(&result.vulnerabilities, format)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            if args.verbose {
                eprintln!("Report written to {}", path.display());
            }
        }
        None => print!("{rendered}"),
    }

    if args.fix {
        apply_fixes(&result.vulnerabilities, &config)?;
    }

    Ok(i32::from(!result.vulnerabilities.is_empty()))
}

/// Writes auto-quoted copies for every file with unquoted-expansion
/// findings. Originals are never modified.
fn apply_fixes(vulnerabilities: &[Vulnerability], config: &Config) -> Result<()> {
    let mut by_file: BTreeMap<PathBuf, Vec<&Vulnerability>> = BTreeMap::new();
    for vuln in vulnerabilities {
        if vuln.kind == VulnerabilityType::UnquotedExpansion {
            by_file.entry(vuln.file.clone()).or_default().push(vuln);
        }
    }

    for (file, vulns) in by_file {
        let owned: Vec<Vulnerability> = vulns.into_iter().cloned().collect();
        let written = fix::fix_file(&file, &owned, &config.fixed_suffix)
            .with_context(|| format!("Failed to fix {}", file.display()))?;
        println!("{} {}", "fixed:".green(), written.display());
    }
    Ok(())
}
