//! Direct command injection: a tainted variable expanded in command-name
//! position.

use crate::constants::safe_commands;
use crate::facts::Facts;
use crate::rules::{sort_findings, Detector, DetectorContext};
use crate::taint::{sources, TaintContext};
use crate::vulnerability::{Severity, Vulnerability, VulnerabilityType};

/// Flags commands whose head, stripped of expansion syntax, names a
/// tainted variable.
pub struct CommandInjection;

impl Detector for CommandInjection {
    fn name(&self) -> &'static str {
        "command-injection"
    }

    fn check(
        &self,
        facts: &Facts,
        taint: &TaintContext,
        ctx: &DetectorContext<'_>,
    ) -> Vec<Vulnerability> {
        let mut findings = Vec::new();

        for cmd in &facts.commands {
            let stripped =
                cmd.name.trim_matches(|c| matches!(c, '$' | '"' | '\'' | '{' | '}'));
            if stripped.is_empty() || safe_commands().contains(stripped) {
                continue;
            }
            if !sources::name_is_tainted(stripped, taint) {
                continue;
            }

            let line_text = ctx.lines.get(cmd.position.row).copied().unwrap_or("");
            let trimmed = line_text.trim();
            // Noise suppression: shebang/blank lines, the assignment line of
            // the variable itself, and a lone bare-word self-reference.
            if trimmed.is_empty() || trimmed.starts_with("#!") {
                continue;
            }
            if trimmed.starts_with(&format!("{stripped}=")) {
                continue;
            }
            if trimmed == stripped && cmd.arguments.is_empty() {
                continue;
            }

            findings.push(
                Vulnerability::new(
                    VulnerabilityType::CommandInjection,
                    Severity::High,
                    format!(
                        "Command name expands tainted variable '{stripped}'; an attacker \
                         controlling its value can execute arbitrary commands"
                    ),
                    ctx.file,
                    cmd.position.row + 1,
                )
                .with_column(cmd.position.column + 1)
                .with_line_text(line_text)
                .with_recommendation(
                    "Do not use externally influenced data as a command name; \
                     dispatch through a fixed allow-list instead",
                ),
            );
        }

        sort_findings(&mut findings);
        findings
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils::analyze_source;
    use crate::vulnerability::{Severity, VulnerabilityType};

    #[test]
    fn tainted_command_head_is_flagged() {
        let vulns = analyze_source("cmd=$1\n$cmd --version\n");
        let hit = vulns
            .iter()
            .find(|v| v.kind == VulnerabilityType::CommandInjection)
            .unwrap();
        assert_eq!(hit.severity, Severity::High);
        assert_eq!(hit.line, 2);
    }

    #[test]
    fn untainted_command_head_is_not_flagged() {
        let vulns = analyze_source("cmd=ls\n$cmd --version\n");
        assert!(!vulns
            .iter()
            .any(|v| v.kind == VulnerabilityType::CommandInjection));
    }

    #[test]
    fn allow_listed_names_are_skipped() {
        // A tainted variable named like a common command stays quiet.
        let vulns = analyze_source("cat=$1\ncat file\n");
        assert!(!vulns
            .iter()
            .any(|v| v.kind == VulnerabilityType::CommandInjection));
    }

    #[test]
    fn lone_bare_word_self_reference_is_skipped() {
        let vulns = analyze_source("cmd=$1\ncmd\n");
        assert!(!vulns
            .iter()
            .any(|v| v.kind == VulnerabilityType::CommandInjection));
    }
}
