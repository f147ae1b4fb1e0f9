//! Vulnerability record types shared by detectors, the reporter and the fixer.

use serde::Serialize;
use std::path::PathBuf;

/// Severity levels for findings, ordered from most to least severe.
/// Serializes in the same uppercase spelling `Display` uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Critical severity - immediate exploitation risk
    Critical,
    /// High severity - significant security risk
    High,
    /// Medium severity - potential security risk
    Medium,
    /// Low severity - minor security concern
    Low,
}

impl Severity {
    /// All severities, most severe first. Used for report grouping.
    pub const ALL: [Severity; 4] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ];
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Critical => write!(f, "CRITICAL"),
            Severity::High => write!(f, "HIGH"),
            Severity::Medium => write!(f, "MEDIUM"),
            Severity::Low => write!(f, "LOW"),
        }
    }
}

/// Vulnerability classes detected by the analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum VulnerabilityType {
    /// A tainted variable expanded in command-name position.
    CommandInjection,
    /// `eval`/`source` invoked on tainted data.
    EvalSourceInjection,
    /// `sh -c`/`bash -c` invoked on a bare tainted expansion.
    InterpreterInjection,
    /// Tainted variable inside an array subscript index expression.
    ArrayIndexInjection,
    /// Variable or parameter expansion not enclosed in quotes.
    UnquotedExpansion,
    /// Expansion of the zeroth positional parameter.
    ParameterExpansion,
    /// Two co-declared variables where either side is tainted.
    TaintedPair,
    /// Script never declares `PATH`.
    Environment,
}

impl std::fmt::Display for VulnerabilityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VulnerabilityType::CommandInjection => write!(f, "Command Injection"),
            VulnerabilityType::EvalSourceInjection => write!(f, "Eval/Source Injection"),
            VulnerabilityType::InterpreterInjection => write!(f, "Interpreter -c Injection"),
            VulnerabilityType::ArrayIndexInjection => write!(f, "Array Index Injection"),
            VulnerabilityType::UnquotedExpansion => write!(f, "Unquoted Expansion"),
            VulnerabilityType::ParameterExpansion => write!(f, "Parameter Expansion"),
            VulnerabilityType::TaintedPair => write!(f, "Tainted Variable Pair"),
            VulnerabilityType::Environment => write!(f, "Environment"),
        }
    }
}

/// A single vulnerability found in a script.
///
/// Line and column are 1-based at this boundary; whole-file findings (such as
/// a missing `PATH` declaration) carry line `0` and no column.
#[derive(Debug, Clone, Serialize)]
pub struct Vulnerability {
    /// Vulnerability class.
    #[serde(rename = "type")]
    pub kind: VulnerabilityType,
    /// Severity level.
    pub severity: Severity,
    /// Human-readable description.
    pub description: String,
    /// File where the vulnerability was found.
    pub file: PathBuf,
    /// 1-based line number (0 for whole-file findings).
    pub line: usize,
    /// 1-based column of the offending token, when known.
    pub column: Option<usize>,
    /// Source text of the offending line, when available.
    pub line_text: Option<String>,
    /// Suggested remediation.
    pub recommendation: Option<String>,
    /// Reference URLs.
    pub references: Vec<String>,
}

impl Vulnerability {
    /// Creates a new vulnerability with the mandatory fields set.
    #[must_use]
    pub fn new(
        kind: VulnerabilityType,
        severity: Severity,
        description: impl Into<String>,
        file: impl Into<PathBuf>,
        line: usize,
    ) -> Self {
        Self {
            kind,
            severity,
            description: description.into(),
            file: file.into(),
            line,
            column: None,
            line_text: None,
            recommendation: None,
            references: Vec::new(),
        }
    }

    /// Sets the 1-based column.
    #[must_use]
    pub fn with_column(mut self, column: usize) -> Self {
        self.column = Some(column);
        self
    }

    /// Sets the offending line's source text.
    #[must_use]
    pub fn with_line_text(mut self, text: impl Into<String>) -> Self {
        self.line_text = Some(text.into());
        self
    }

    /// Sets the remediation advice.
    #[must_use]
    pub fn with_recommendation(mut self, rec: impl Into<String>) -> Self {
        self.recommendation = Some(rec.into());
        self
    }

    /// Adds a reference URL.
    #[must_use]
    pub fn with_reference(mut self, url: impl Into<String>) -> Self {
        self.references.push(url.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_orders_most_severe_first() {
        assert!(Severity::Critical < Severity::High);
        assert!(Severity::High < Severity::Medium);
        assert!(Severity::Medium < Severity::Low);
    }

    #[test]
    fn severity_display_is_uppercase() {
        assert_eq!(Severity::Critical.to_string(), "CRITICAL");
        assert_eq!(Severity::Low.to_string(), "LOW");
    }

    #[test]
    fn builder_sets_optional_fields() {
        let v = Vulnerability::new(
            VulnerabilityType::UnquotedExpansion,
            Severity::High,
            "unquoted",
            "script.sh",
            3,
        )
        .with_column(7)
        .with_line_text("echo $x")
        .with_recommendation("quote it");

        assert_eq!(v.column, Some(7));
        assert_eq!(v.line_text.as_deref(), Some("echo $x"));
        assert!(v.references.is_empty());
    }
}
