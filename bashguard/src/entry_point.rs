//! Shared entry point for all binaries.

use crate::cli::{Cli, Commands};
use crate::commands;
use anyhow::Result;
use clap::Parser;

/// Parses arguments and dispatches to the selected subcommand, returning
/// the process exit code: 0 for a clean run, 1 when findings exist, 2 for
/// usage errors.
///
/// # Errors
/// Returns an error for operational failures (unreadable config, bad
/// output path); usage errors are printed and mapped to exit code 2.
pub fn run_with_args(args: Vec<String>) -> Result<i32> {
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => {
            // clap renders its own help/usage text.
            err.print()?;
            return Ok(2);
        }
    };

    match cli.command {
        Commands::Analyze(args) => commands::analyze::run(&args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_error_maps_to_exit_code_2() {
        let code = run_with_args(vec!["bashguard".to_string()]).unwrap();
        assert_eq!(code, 2);
    }

    #[test]
    fn unknown_subcommand_maps_to_exit_code_2() {
        let args = vec!["bashguard".to_string(), "frobnicate".to_string()];
        assert_eq!(run_with_args(args).unwrap(), 2);
    }
}
