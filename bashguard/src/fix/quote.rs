//! Line-oriented rewriting that wraps flagged expansions in double quotes.

use crate::constants::quote_token_re;
use crate::vulnerability::{Vulnerability, VulnerabilityType};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error during fixing.
#[derive(Debug, Error)]
pub enum FixError {
    /// A reported position has no `$` before it on the line. This is a
    /// detector bug, not a fixable condition; the fix must not guess.
    #[error("No '$' found before line {line}, column {column}; reported position is inconsistent")]
    InternalInconsistency {
        /// 1-based reported line
        line: usize,
        /// 1-based reported column
        column: usize,
    },
    /// Reading the input or writing the fixed file failed
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Applies quote fixes for all unquoted-expansion findings to the content
/// and returns the rewritten text.
///
/// Fixes are grouped by line and applied left-to-right; every applied fix
/// shifts later columns on the same line by +2 (one per inserted quote).
/// Line endings and tabs are preserved byte-for-byte outside the modified
/// spans. Findings whose token was already wrapped by an earlier fix on
/// the same line, or is already directly quoted, are skipped without
/// shifting columns.
///
/// # Errors
/// Returns [`FixError::InternalInconsistency`] when a reported position
/// cannot be traced back to a `$`.
pub fn fix_content(content: &str, vulnerabilities: &[Vulnerability]) -> Result<String, FixError> {
    let mut by_line: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for vuln in vulnerabilities {
        if vuln.kind != VulnerabilityType::UnquotedExpansion || vuln.line == 0 {
            continue;
        }
        if let Some(column) = vuln.column {
            by_line.entry(vuln.line).or_default().push(column);
        }
    }

    let mut lines: Vec<String> = content.split('\n').map(String::from).collect();

    for (line_number, mut columns) in by_line {
        columns.sort_unstable();
        columns.dedup();

        let Some(line) = lines.get_mut(line_number - 1) else {
            return Err(FixError::InternalInconsistency {
                line: line_number,
                column: columns.first().copied().unwrap_or(0),
            });
        };

        let mut offset = 0usize;
        let mut fixed_spans: Vec<(usize, usize)> = Vec::new();

        for reported in columns {
            let bytes = line.as_bytes();
            if bytes.is_empty() {
                return Err(FixError::InternalInconsistency {
                    line: line_number,
                    column: reported,
                });
            }
            let mut col = (reported + offset).saturating_sub(1).min(bytes.len() - 1);
            while col > 0 && bytes[col] != b'$' {
                col -= 1;
            }
            if bytes[col] != b'$' {
                return Err(FixError::InternalInconsistency {
                    line: line_number,
                    column: reported,
                });
            }

            if fixed_spans.iter().any(|&(s, e)| col >= s && col < e) {
                continue;
            }

            // The `$` itself is in the token class, so this always matches.
            let token_len = quote_token_re()
                .find(&line[col..])
                .map_or(1, |m| m.end());
            let token_end = col + token_len;

            let already_quoted = col > 0
                && matches!(bytes[col - 1], b'"' | b'\'')
                && bytes.get(token_end) == Some(&bytes[col - 1]);
            if already_quoted {
                continue;
            }

            let mut rebuilt = String::with_capacity(line.len() + 2);
            rebuilt.push_str(&line[..col]);
            rebuilt.push('"');
            rebuilt.push_str(&line[col..token_end]);
            rebuilt.push('"');
            rebuilt.push_str(&line[token_end..]);
            *line = rebuilt;

            fixed_spans.push((col, token_end + 2));
            offset += 2;
        }
    }

    Ok(lines.join("\n"))
}

/// Output path for the fixed copy: `<stem><suffix><ext>` next to the
/// original. The original file is never overwritten.
#[must_use]
pub fn fixed_output_path(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let name = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}{suffix}.{ext}"),
        None => format!("{stem}{suffix}"),
    };
    path.with_file_name(name)
}

/// Reads a script, applies quote fixes and writes the result to the
/// suffixed sibling path. Returns the path written.
///
/// # Errors
/// Returns an error on I/O failure or an inconsistent reported position.
pub fn fix_file(
    path: &Path,
    vulnerabilities: &[Vulnerability],
    suffix: &str,
) -> Result<PathBuf, FixError> {
    let content = std::fs::read_to_string(path)?;
    let fixed = fix_content(&content, vulnerabilities)?;
    let output = fixed_output_path(path, suffix);
    std::fs::write(&output, fixed)?;
    Ok(output)
}
