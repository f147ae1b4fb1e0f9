//! `sh -c` / `bash -c` on a bare tainted expansion.

use crate::constants::exact_expansion_re;
use crate::facts::Facts;
use crate::rules::{sort_findings, Detector, DetectorContext};
use crate::taint::{sources, TaintContext};
use crate::vulnerability::{Severity, Vulnerability, VulnerabilityType};

/// Flags `sh -c`/`bash -c` where the argument after `-c` is *exactly* one
/// bare `$name` or `${name}` expansion of a tainted variable. Mixed
/// strings like `sh -c "echo $x"` are left to the unquoted-expansion
/// check; the exact-match rule keeps the two detectors from overlapping.
pub struct InterpreterInjection;

impl Detector for InterpreterInjection {
    fn name(&self) -> &'static str {
        "interpreter-injection"
    }

    fn check(
        &self,
        facts: &Facts,
        taint: &TaintContext,
        ctx: &DetectorContext<'_>,
    ) -> Vec<Vulnerability> {
        let mut findings = Vec::new();

        for cmd in &facts.commands {
            let base = cmd.name.rsplit('/').next().unwrap_or(&cmd.name);
            if !matches!(base, "sh" | "bash") {
                continue;
            }
            let Some(script_arg) = cmd
                .arguments
                .iter()
                .position(|a| a == "-c")
                .and_then(|i| cmd.arguments.get(i + 1))
            else {
                continue;
            };

            let unquoted = strip_matching_quotes(script_arg);
            let Some(caps) = exact_expansion_re().captures(unquoted) else {
                continue;
            };
            let Some(name) = caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str()) else {
                continue;
            };
            if !sources::name_is_tainted(name, taint) {
                continue;
            }

            findings.push(
                Vulnerability::new(
                    VulnerabilityType::InterpreterInjection,
                    Severity::Critical,
                    format!(
                        "'{base} -c' executes tainted variable '{name}' as a script"
                    ),
                    ctx.file,
                    cmd.position.row + 1,
                )
                .with_column(cmd.position.column + 1)
                .with_line_text(ctx.lines.get(cmd.position.row).copied().unwrap_or(""))
                .with_recommendation(
                    "Pass externally influenced data as positional arguments \
                     (`sh -c '...' -- \"$arg\"`) instead of as the script text",
                ),
            );
        }

        sort_findings(&mut findings);
        findings
    }
}

/// Strips one pair of matching surrounding quotes, if present.
fn strip_matching_quotes(text: &str) -> &str {
    let bytes = text.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &text[1..text.len() - 1];
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::strip_matching_quotes;
    use crate::test_utils::analyze_source;
    use crate::vulnerability::{Severity, VulnerabilityType};

    fn interpreter_findings(source: &str) -> Vec<crate::vulnerability::Vulnerability> {
        analyze_source(source)
            .into_iter()
            .filter(|v| v.kind == VulnerabilityType::InterpreterInjection)
            .collect()
    }

    #[test]
    fn bare_tainted_expansion_after_dash_c() {
        let hits = interpreter_findings("payload=$1\nsh -c \"$payload\"\n");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].severity, Severity::Critical);
    }

    #[test]
    fn braced_form_is_recognized() {
        let hits = interpreter_findings("payload=$1\nbash -c \"${payload}\"\n");
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn mixed_string_is_not_exact() {
        let hits = interpreter_findings("payload=$1\nsh -c \"echo $payload\"\n");
        assert!(hits.is_empty());
    }

    #[test]
    fn untainted_variable_is_quiet() {
        let hits = interpreter_findings("payload=ls\nsh -c \"$payload\"\n");
        assert!(hits.is_empty());
    }

    #[test]
    fn path_qualified_interpreter() {
        let hits = interpreter_findings("payload=$1\n/bin/bash -c \"$payload\"\n");
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn quote_stripping_requires_matching_pair() {
        assert_eq!(strip_matching_quotes("\"$x\""), "$x");
        assert_eq!(strip_matching_quotes("'$x'"), "$x");
        assert_eq!(strip_matching_quotes("\"$x'"), "\"$x'");
        assert_eq!(strip_matching_quotes("$x"), "$x");
    }
}
