//! `eval`/`source` invoked on tainted data.

use crate::constants::expansion_token_re;
use crate::facts::Facts;
use crate::rules::{sort_findings, Detector, DetectorContext};
use crate::taint::{sources, TaintContext};
use crate::vulnerability::{Severity, Vulnerability, VulnerabilityType};

/// Flags `eval` and `source` whose first argument references a tainted
/// variable anywhere inside it. Unlike the interpreter `-c` check this is
/// a substring rule: `eval "$cmd" extra` is still an injection, because
/// `eval` concatenates and re-parses all of its arguments.
pub struct EvalSourceInjection;

impl Detector for EvalSourceInjection {
    fn name(&self) -> &'static str {
        "eval-source-injection"
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
            if !matches!(base, "eval" | "source" | ".") {
                continue;
            }
            let Some(first) = cmd.arguments.first() else {
                continue;
            };

            let tainted_name = expansion_token_re()
                .captures_iter(first)
                .filter_map(|c| c.get(1))
                .map(|m| m.as_str())
                .find(|name| sources::name_is_tainted(name, taint));

            if let Some(name) = tainted_name {
                findings.push(
                    Vulnerability::new(
                        VulnerabilityType::EvalSourceInjection,
                        Severity::Critical,
                        format!(
                            "'{base}' evaluates tainted variable '{name}'; its value is \
                             executed as shell code"
                        ),
                        ctx.file,
                        cmd.position.row + 1,
                    )
                    .with_column(cmd.position.column + 1)
                    .with_line_text(ctx.lines.get(cmd.position.row).copied().unwrap_or(""))
                    .with_recommendation(
                        "Never pass externally influenced data to eval or source; \
                         restructure to avoid re-parsing, or validate against a strict \
                         allow-list first",
                    ),
                );
            }
        }

        sort_findings(&mut findings);
        findings
    }
}
