//! Unquoted variable and parameter expansions.

use crate::facts::Facts;
use crate::rules::{sort_findings, Detector, DetectorContext};
use crate::taint::TaintContext;
use crate::vulnerability::{Severity, Vulnerability, VulnerabilityType};

/// Flags every expansion occurrence that is not immediately enclosed by a
/// matching pair of quote characters.
///
/// The rule is purely lexical: the byte just before the `$` and the byte
/// just after the expansion text must be the same quote character. It
/// deliberately does not reason about the enclosing quoting context, so
/// `"prefix $x"` is still reported.
pub struct UnquotedExpansion;

impl Detector for UnquotedExpansion {
    fn name(&self) -> &'static str {
        "unquoted-expansion"
    }

    fn check(
        &self,
        facts: &Facts,
        _taint: &TaintContext,
        ctx: &DetectorContext<'_>,
    ) -> Vec<Vulnerability> {
        let mut findings = Vec::new();

        for used in &facts.uses {
            let line = ctx.lines.get(used.position.row).copied().unwrap_or("");
            let bytes = line.as_bytes();
            let column = used.position.column;

            let before = column.checked_sub(1).and_then(|i| bytes.get(i));
            let after = bytes.get(column + used.text.len());
            let quoted = matches!(
                (before, after),
                (Some(b), Some(a)) if b == a && (*b == b'"' || *b == b'\'')
            );
            if quoted {
                continue;
            }

            findings.push(
                Vulnerability::new(
                    VulnerabilityType::UnquotedExpansion,
                    Severity::High,
                    format!(
                        "Unquoted expansion '{}' is subject to word splitting and \
                         pathname globbing",
                        used.text
                    ),
                    ctx.file,
                    used.position.row + 1,
                )
                .with_column(column + 1)
                .with_line_text(line)
                .with_recommendation(format!("Quote the expansion: \"{}\"", used.text)),
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

    fn unquoted_findings(source: &str) -> Vec<crate::vulnerability::Vulnerability> {
        analyze_source(source)
            .into_iter()
            .filter(|v| v.kind == VulnerabilityType::UnquotedExpansion)
            .collect()
    }

    #[test]
    fn no_expansions_means_no_findings() {
        assert!(unquoted_findings("echo hello world\nls -l\n").is_empty());
    }

    #[test]
    fn double_quoted_expansion_is_quiet() {
        assert!(unquoted_findings("x=1\necho \"$x\"\n").is_empty());
    }

    #[test]
    fn bare_expansion_is_flagged_with_position() {
        let hits = unquoted_findings("x=1\necho $x\n");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].severity, Severity::High);
        assert_eq!(hits[0].line, 2);
        // 1-based column of the `$`.
        assert_eq!(hits[0].column, Some(6));
    }

    #[test]
    fn removing_either_quote_makes_it_non_empty() {
        assert_eq!(unquoted_findings("echo \"$x\n").len(), 1);
        assert_eq!(unquoted_findings("echo $x\"\n").len(), 1);
    }

    #[test]
    fn mismatched_quote_pair_is_flagged() {
        let hits = unquoted_findings("echo \"$x'\n");
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn embedded_expansion_inside_string_is_flagged() {
        // Lexical rule: the byte before `$` is a space, not a quote.
        let hits = unquoted_findings("echo \"prefix $x\"\n");
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn braced_quoted_expansion_is_quiet() {
        assert!(unquoted_findings("echo \"${x}\"\n").is_empty());
    }
}
