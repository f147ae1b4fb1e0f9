//! Command-line interface definition.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Static analyzer for shell scripts: finds injection-class
/// vulnerabilities and can auto-quote unsafe expansions.
#[derive(Debug, Parser)]
#[command(name = "bashguard", version, about)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Analyze a script or a directory of scripts
    Analyze(AnalyzeArgs),
}

/// Arguments for the `analyze` subcommand.
#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Script file or directory to analyze
    pub path: PathBuf,

    /// Report format: text, json or html
    #[arg(long, default_value = "text")]
    pub format: String,

    /// Write the report to a file instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Write auto-quoted copies of files with unquoted expansions
    #[arg(long)]
    pub fix: bool,

    /// Skip the external shellcheck syntax gate
    #[arg(long)]
    pub no_shellcheck: bool,

    /// Print per-file progress and skipped-file reasons
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn analyze_defaults() {
        let cli = Cli::try_parse_from(["bashguard", "analyze", "script.sh"]).unwrap();
        let Commands::Analyze(args) = cli.command;
        assert_eq!(args.format, "text");
        assert!(!args.fix);
        assert!(!args.no_shellcheck);
        assert!(args.output.is_none());
    }

    #[test]
    fn analyze_flags_parse() {
        let cli = Cli::try_parse_from([
            "bashguard",
            "analyze",
            "scripts/",
            "--format",
            "json",
            "--fix",
            "--no-shellcheck",
            "-v",
        ])
        .unwrap();
        let Commands::Analyze(args) = cli.command;
        assert_eq!(args.format, "json");
        assert!(args.fix);
        assert!(args.no_shellcheck);
        assert!(args.verbose);
    }
}
