//! Out-of-process shellcheck integration.
//!
//! Semantic analysis over a broken parse tree produces meaningless
//! results, so callers run shellcheck first and skip files it reports
//! hard errors for. Only `(error):` findings count; style and warning
//! level diagnostics never block analysis.

use std::path::Path;
use std::process::Command;

/// Result of the external syntax check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellcheckOutcome {
    /// The shellcheck binary is not installed or could not be spawned
    Unavailable,
    /// No hard errors reported
    Clean,
    /// Hard errors, one block of shellcheck output per finding
    HardErrors(Vec<String>),
}

/// Whether the shellcheck binary can be spawned at all.
#[must_use]
pub fn available() -> bool {
    Command::new("shellcheck")
        .arg("--version")
        .output()
        .is_ok()
}

/// Runs `shellcheck` on the given script.
///
/// A missing binary degrades to [`ShellcheckOutcome::Unavailable`] rather
/// than failing the analysis.
#[must_use]
pub fn check(path: &Path) -> ShellcheckOutcome {
    let output = match Command::new("shellcheck").arg(path).output() {
        Ok(output) => output,
        Err(_) => return ShellcheckOutcome::Unavailable,
    };

    let stdout = String::from_utf8_lossy(&output.stdout);
    let errors = parse_output(&stdout);
    if errors.is_empty() {
        ShellcheckOutcome::Clean
    } else {
        ShellcheckOutcome::HardErrors(errors)
    }
}

/// Splits shellcheck's textual output into per-finding blocks and keeps
/// only hard errors. Blocks start at `In <file> line <n>:` headers; the
/// trailing `For more information:` section is ignored.
#[must_use]
pub fn parse_output(stdout: &str) -> Vec<String> {
    let mut blocks: Vec<String> = Vec::new();
    let mut current = String::new();

    for line in stdout.lines() {
        if line.starts_with("For more information") {
            break;
        }
        if line.starts_with("In ") && line.contains(" line ") {
            if !current.trim().is_empty() {
                blocks.push(current.trim_end().to_string());
            }
            current = String::new();
        }
        current.push_str(line);
        current.push('\n');
    }
    if !current.trim().is_empty() {
        blocks.push(current.trim_end().to_string());
    }

    blocks
        .into_iter()
        .filter(|block| block.contains("(error):"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
In deploy.sh line 3:
eval $cmd
     ^--^ SC2086 (info): Double quote to prevent globbing and word splitting.

In deploy.sh line 7:
if [ $x -eq 1 ]
^-- SC1073 (error): Couldn't parse this if expression. Fix to allow more checks.

For more information:
  https://www.shellcheck.net/wiki/SC1073
";

    #[test]
    fn keeps_only_error_blocks() {
        let errors = parse_output(SAMPLE);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("SC1073"));
        assert!(errors[0].contains("line 7"));
    }

    #[test]
    fn trailing_information_section_is_dropped() {
        let errors = parse_output(SAMPLE);
        assert!(!errors[0].contains("shellcheck.net"));
    }

    #[test]
    fn clean_output_yields_no_blocks() {
        assert!(parse_output("").is_empty());
        assert!(parse_output("no findings at all\n").is_empty());
    }
}
