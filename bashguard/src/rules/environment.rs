//! Missing `PATH` declaration.

use crate::facts::Facts;
use crate::rules::{Detector, DetectorContext};
use crate::taint::TaintContext;
use crate::vulnerability::{Severity, Vulnerability, VulnerabilityType};

/// Flags scripts that never assign `PATH`: every bare command lookup then
/// trusts whatever search path the caller provides.
pub struct PathDeclaration;

impl Detector for PathDeclaration {
    fn name(&self) -> &'static str {
        "path-declaration"
    }

    fn check(
        &self,
        facts: &Facts,
        _taint: &TaintContext,
        ctx: &DetectorContext<'_>,
    ) -> Vec<Vulnerability> {
        let declares_path = facts.assignments.iter().any(|a| a.bare_name() == "PATH");
        if declares_path {
            return Vec::new();
        }

        // Whole-file finding: line 0, no column, no line text.
        vec![Vulnerability::new(
            VulnerabilityType::Environment,
            Severity::Medium,
            "Script does not set PATH; command lookup trusts the caller's environment",
            ctx.file,
            0,
        )
        .with_recommendation(
            "Set an explicit PATH near the top of the script, e.g. \
             PATH=/usr/local/bin:/usr/bin:/bin",
        )]
    }
}

#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::test_utils::analyze_source_with_config;
    use crate::vulnerability::{Severity, VulnerabilityType};

    fn env_config() -> Config {
        let mut config = Config::default();
        config.detectors.environment = true;
        config
    }

    #[test]
    fn missing_path_is_reported_as_whole_file_finding() {
        let vulns = analyze_source_with_config("echo hello\n", &env_config());
        let hit = vulns
            .iter()
            .find(|v| v.kind == VulnerabilityType::Environment)
            .unwrap();
        assert_eq!(hit.severity, Severity::Medium);
        assert_eq!(hit.line, 0);
        assert_eq!(hit.column, None);
        assert_eq!(hit.line_text, None);
    }

    #[test]
    fn declared_path_is_quiet() {
        let vulns =
            analyze_source_with_config("PATH=/usr/bin:/bin\necho hello\n", &env_config());
        assert!(!vulns.iter().any(|v| v.kind == VulnerabilityType::Environment));
    }
}
