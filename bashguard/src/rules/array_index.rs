//! Tainted variables inside array subscript index expressions.
//!
//! Bash evaluates subscript indices arithmetically, and arithmetic
//! evaluation performs command substitution, so `${arr[$x]}` with
//! attacker-controlled `x` reaches code execution.

use crate::constants::{expansion_token_re, numeric_guard_re};
use crate::facts::Facts;
use crate::rules::{sort_findings, Detector, DetectorContext};
use crate::taint::{sources, TaintContext};
use crate::vulnerability::{Severity, Vulnerability, VulnerabilityType};

/// Flags subscripts whose index expression references a tainted variable,
/// unless the surrounding line shows the index safely brace-quoted or
/// guarded by a numeric comparison (those are plain quoting issues).
pub struct ArrayIndexInjection;

impl Detector for ArrayIndexInjection {
    fn name(&self) -> &'static str {
        "array-index-injection"
    }

    fn check(
        &self,
        facts: &Facts,
        taint: &TaintContext,
        ctx: &DetectorContext<'_>,
    ) -> Vec<Vulnerability> {
        let mut findings = Vec::new();

        for subscript in &facts.subscripts {
            let line = ctx.lines.get(subscript.position.row).copied().unwrap_or("");

            let tainted_name = expansion_token_re()
                .captures_iter(&subscript.index_expression)
                .filter_map(|c| c.get(1))
                .map(|m| m.as_str())
                .find(|name| {
                    sources::name_is_tainted(name, taint)
                        && !line.contains(&format!("\"${{{name}"))
                        && !numeric_guard_re(name).is_match(line)
                });

            if let Some(name) = tainted_name {
                findings.push(
                    Vulnerability::new(
                        VulnerabilityType::ArrayIndexInjection,
                        Severity::High,
                        format!(
                            "Array index of '{}' expands tainted variable '{name}'; \
                             subscript arithmetic can execute embedded commands",
                            subscript.array_name
                        ),
                        ctx.file,
                        subscript.position.row + 1,
                    )
                    .with_column(subscript.position.column + 1)
                    .with_line_text(line)
                    .with_recommendation(
                        "Validate the index as a number before use, e.g. \
                         `[[ $i =~ ^[0-9]+$ ]]`",
                    ),
                );
            }
        }

        sort_findings(&mut findings);
        findings
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils::analyze_source;
    use crate::vulnerability::VulnerabilityType;

    fn index_findings(source: &str) -> Vec<crate::vulnerability::Vulnerability> {
        analyze_source(source)
            .into_iter()
            .filter(|v| v.kind == VulnerabilityType::ArrayIndexInjection)
            .collect()
    }

    #[test]
    fn tainted_environment_index_is_flagged() {
        let hits = index_findings("echo \"${arr[$USER]}\"\n");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].line, 1);
    }

    #[test]
    fn tainted_assignment_index_is_flagged() {
        let hits = index_findings("i=$1\narr[$i]=value\n");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].line, 2);
    }

    #[test]
    fn untainted_index_is_quiet() {
        assert!(index_findings("i=3\necho \"${arr[$i]}\"\n").is_empty());
    }

    #[test]
    fn brace_quoted_index_variable_is_reclassified() {
        // The line shows the index itself safely brace-quoted.
        let hits = index_findings("i=$1\necho \"${i}\" \"${arr[$i]}\"\n");
        assert!(hits.is_empty());
    }

    #[test]
    fn numeric_comparison_guard_is_reclassified() {
        let hits = index_findings("i=$1\n[ $i -eq ${arr[$i]} ] && echo ok\n");
        assert!(hits.is_empty());
    }

    #[test]
    fn literal_index_is_quiet() {
        assert!(index_findings("echo \"${arr[2]}\"\n").is_empty());
    }
}
