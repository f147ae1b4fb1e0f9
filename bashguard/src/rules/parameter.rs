//! Expansion of the zeroth positional parameter.

use crate::facts::Facts;
use crate::rules::{sort_findings, Detector, DetectorContext};
use crate::taint::TaintContext;
use crate::vulnerability::{Severity, Vulnerability, VulnerabilityType};

/// Flags every `$0`/`${0}` use. The script path is attacker-influenced
/// under `bash <script>`, symlinks and `exec -a`.
pub struct ZerothParameter;

impl Detector for ZerothParameter {
    fn name(&self) -> &'static str {
        "zeroth-parameter"
    }

    fn check(
        &self,
        facts: &Facts,
        _taint: &TaintContext,
        ctx: &DetectorContext<'_>,
    ) -> Vec<Vulnerability> {
        let mut findings = Vec::new();

        for used in &facts.uses {
            if used.name != "0" {
                continue;
            }
            findings.push(
                Vulnerability::new(
                    VulnerabilityType::ParameterExpansion,
                    Severity::Medium,
                    "Expansion of $0; the invocation name is externally controllable",
                    ctx.file,
                    used.position.row + 1,
                )
                .with_column(used.position.column + 1)
                .with_line_text(ctx.lines.get(used.position.row).copied().unwrap_or(""))
                .with_recommendation(
                    "Derive the script name with a fixed literal or `basename -- \"$0\"` \
                     guarded against unexpected values",
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
    fn zeroth_parameter_use_is_medium() {
        let hits: Vec<_> = analyze_source("echo \"$0\"\n")
            .into_iter()
            .filter(|v| v.kind == VulnerabilityType::ParameterExpansion)
            .collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].severity, Severity::Medium);
    }

    #[test]
    fn other_positionals_are_not_this_detector() {
        let hits: Vec<_> = analyze_source("echo \"$1\"\n")
            .into_iter()
            .filter(|v| v.kind == VulnerabilityType::ParameterExpansion)
            .collect();
        assert!(hits.is_empty());
    }
}
