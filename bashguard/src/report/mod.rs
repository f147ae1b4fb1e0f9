//! Report rendering in text, JSON and HTML formats.

use crate::vulnerability::{Severity, Vulnerability};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use serde::Serialize;
use std::fmt::Write as _;
use std::str::FromStr;
use thiserror::Error;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Human-readable colored text
    Text,
    /// Structured JSON
    Json,
    /// Self-contained HTML page
    Html,
}

/// Error during report rendering.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Requested format is not supported
    #[error("Unsupported output format '{0}' (expected text, json or html)")]
    UnsupportedFormat(String),
    /// JSON serialization failed
    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl FromStr for ReportFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "html" => Ok(Self::Html),
            other => Err(ReportError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Renders the findings in the requested format.
///
/// # Errors
/// Returns an error only when serialization fails.
pub fn render(vulnerabilities: &[Vulnerability], format: ReportFormat) -> Result<String, ReportError> {
    match format {
        ReportFormat::Text => Ok(render_text(vulnerabilities)),
        ReportFormat::Json => render_json(vulnerabilities),
        ReportFormat::Html => Ok(render_html(vulnerabilities)),
    }
}

fn count_by_severity(vulnerabilities: &[Vulnerability]) -> [(Severity, usize); 4] {
    Severity::ALL.map(|severity| {
        (
            severity,
            vulnerabilities
                .iter()
                .filter(|v| v.severity == severity)
                .count(),
        )
    })
}

fn colored_severity(severity: Severity) -> String {
    let label = severity.to_string();
    match severity {
        Severity::Critical => label.red().bold().to_string(),
        Severity::High => label.red().to_string(),
        Severity::Medium => label.yellow().to_string(),
        Severity::Low => label.cyan().to_string(),
    }
}

fn render_text(vulnerabilities: &[Vulnerability]) -> String {
    let mut out = String::new();

    if vulnerabilities.is_empty() {
        let _ = writeln!(out, "{}", "No vulnerabilities found.".green());
        return out;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Severity", "Count"]);
    for (severity, count) in count_by_severity(vulnerabilities) {
        if count > 0 {
            table.add_row(vec![Cell::new(severity), Cell::new(count)]);
        }
    }
    let _ = writeln!(
        out,
        "Found {} potential issue(s)\n\n{table}\n",
        vulnerabilities.len()
    );

    for severity in Severity::ALL {
        for vuln in vulnerabilities.iter().filter(|v| v.severity == severity) {
            let location = match (vuln.line, vuln.column) {
                (0, _) => vuln.file.display().to_string(),
                (line, None) => format!("{}:{line}", vuln.file.display()),
                (line, Some(column)) => format!("{}:{line}:{column}", vuln.file.display()),
            };
            let _ = writeln!(
                out,
                "[{}] {} at {}",
                colored_severity(vuln.severity),
                vuln.kind,
                location
            );
            let _ = writeln!(out, "  {}", vuln.description);
            if let Some(text) = &vuln.line_text {
                let _ = writeln!(out, "  | {text}");
                if let Some(column) = vuln.column {
                    // Caret under the offending column. The column is a
                    // byte offset, so count bytes; tabs kept aligned.
                    let pointer: String = text
                        .bytes()
                        .take(column.saturating_sub(1))
                        .map(|b| if b == b'\t' { '\t' } else { ' ' })
                        .collect();
                    let _ = writeln!(out, "  | {pointer}^--- {}", vuln.kind);
                }
            }
            if let Some(rec) = &vuln.recommendation {
                let _ = writeln!(out, "  Recommendation: {rec}");
            }
            for reference in &vuln.references {
                let _ = writeln!(out, "  See: {reference}");
            }
            out.push('\n');
        }
    }

    out
}

#[derive(Serialize)]
struct JsonSummary {
    total: usize,
    by_severity: Vec<JsonSeverityCount>,
}

#[derive(Serialize)]
struct JsonSeverityCount {
    severity: String,
    count: usize,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    summary: JsonSummary,
    vulnerabilities: &'a [Vulnerability],
}

fn render_json(vulnerabilities: &[Vulnerability]) -> Result<String, ReportError> {
    let report = JsonReport {
        summary: JsonSummary {
            total: vulnerabilities.len(),
            by_severity: count_by_severity(vulnerabilities)
                .into_iter()
                .map(|(severity, count)| JsonSeverityCount {
                    severity: severity.to_string(),
                    count,
                })
                .collect(),
        },
        vulnerabilities,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn render_html(vulnerabilities: &[Vulnerability]) -> String {
    let mut rows = String::new();
    for vuln in vulnerabilities {
        let _ = write!(
            rows,
            "<tr class=\"{sev}\"><td>{sev}</td><td>{kind}</td><td>{file}</td>\
             <td>{line}</td><td>{desc}</td></tr>\n",
            sev = vuln.severity,
            kind = escape_html(&vuln.kind.to_string()),
            file = escape_html(&vuln.file.display().to_string()),
            line = vuln.line,
            desc = escape_html(&vuln.description),
        );
    }

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>bashguard report</title>\n<style>\n\
         body {{ font-family: sans-serif; margin: 2em; }}\n\
         table {{ border-collapse: collapse; width: 100%; }}\n\
         th, td {{ border: 1px solid #ccc; padding: 6px 10px; text-align: left; }}\n\
         tr.CRITICAL td:first-child {{ color: #b00; font-weight: bold; }}\n\
         tr.HIGH td:first-child {{ color: #b00; }}\n\
         tr.MEDIUM td:first-child {{ color: #a60; }}\n\
         tr.LOW td:first-child {{ color: #06c; }}\n\
         </style>\n</head>\n<body>\n\
         <h1>bashguard report</h1>\n<p>{total} potential issue(s)</p>\n\
         <table>\n<tr><th>Severity</th><th>Type</th><th>File</th>\
         <th>Line</th><th>Description</th></tr>\n{rows}</table>\n\
         </body>\n</html>\n",
        total = vulnerabilities.len(),
    )
}
