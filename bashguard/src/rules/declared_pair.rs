//! Co-declared variable pairs where either side is tainted.
//!
//! Disabled by default; kept for stricter audit modes where any tainted
//! variable declared alongside another is worth a look.

use crate::facts::Facts;
use crate::rules::{sort_findings, Detector, DetectorContext};
use crate::taint::TaintContext;
use crate::vulnerability::{Severity, Vulnerability, VulnerabilityType};
use rustc_hash::FxHashMap;

/// Flags lines that declare two or more variables where at least one of
/// them is tainted.
pub struct DeclaredPair;

impl Detector for DeclaredPair {
    fn name(&self) -> &'static str {
        "declared-pair"
    }

    fn check(
        &self,
        facts: &Facts,
        taint: &TaintContext,
        ctx: &DetectorContext<'_>,
    ) -> Vec<Vulnerability> {
        let mut by_line: FxHashMap<usize, Vec<&crate::facts::AssignedVariable>> =
            FxHashMap::default();
        for assignment in &facts.assignments {
            by_line
                .entry(assignment.position.row)
                .or_default()
                .push(assignment);
        }

        let mut findings = Vec::new();
        for (row, assignments) in by_line {
            if assignments.len() < 2 {
                continue;
            }
            let Some(tainted) = assignments
                .iter()
                .find(|a| taint.is_bare_tainted(a.bare_name()))
            else {
                continue;
            };

            findings.push(
                Vulnerability::new(
                    VulnerabilityType::TaintedPair,
                    Severity::Low,
                    format!(
                        "Variable '{}' is tainted and co-declared with {} other \
                         variable(s) on the same line",
                        tainted.bare_name(),
                        assignments.len() - 1
                    ),
                    ctx.file,
                    row + 1,
                )
                .with_column(tainted.position.column + 1)
                .with_line_text(ctx.lines.get(row).copied().unwrap_or("")),
            );
        }

        sort_findings(&mut findings);
        findings
    }
}
