//! Per-script orchestration and batch driving.

use crate::config::Config;
use crate::cst::{ParseError, ShellParser};
use crate::facts::FactExtractor;
use crate::rules::{all_detectors, DetectorContext};
use crate::shellcheck::{self, ShellcheckOutcome};
use crate::taint::TaintEngine;
use crate::vulnerability::Vulnerability;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error analyzing one script.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// The script could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Offending path
        path: String,
        /// Underlying error
        source: std::io::Error,
    },
    /// The parser could not produce a usable tree
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// Shellcheck reported hard syntax errors; semantic analysis over a
    /// broken tree would produce meaningless results
    #[error("{path} has {count} syntax error(s); skipping semantic analysis")]
    SyntaxErrors {
        /// Offending path
        path: String,
        /// Number of hard errors
        count: usize,
        /// Shellcheck's own output blocks
        details: Vec<String>,
    },
}

/// Analyzes a single script: parse, extract facts, propagate taint, run
/// the detectors in registration order.
pub struct ScriptAnalyzer {
    path: PathBuf,
    content: String,
    config: Config,
}

impl ScriptAnalyzer {
    /// Builds an analyzer for already-loaded source.
    #[must_use]
    pub fn from_source(path: impl Into<PathBuf>, content: impl Into<String>, config: Config) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            config,
        }
    }

    /// Builds an analyzer by reading the script from disk, honoring the
    /// configured shellcheck gate.
    ///
    /// # Errors
    /// Returns an error when the file cannot be read or shellcheck finds
    /// hard syntax errors.
    pub fn from_path(path: &Path, config: Config) -> Result<Self, AnalyzeError> {
        if config.shellcheck {
            if let ShellcheckOutcome::HardErrors(details) = shellcheck::check(path) {
                return Err(AnalyzeError::SyntaxErrors {
                    path: path.display().to_string(),
                    count: details.len(),
                    details,
                });
            }
        }
        let content = std::fs::read_to_string(path).map_err(|source| AnalyzeError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::from_source(path, content, config))
    }

    /// Runs the full pipeline and returns findings in deterministic order
    /// (detector registration order, then line and column).
    ///
    /// # Errors
    /// Returns an error when the tree provider fails entirely; syntax
    /// errors inside the script do not fail the analysis.
    pub fn analyze(&self) -> Result<Vec<Vulnerability>, AnalyzeError> {
        let tree = ShellParser::new()?.parse(&self.content)?;
        let facts = FactExtractor::extract(&tree.root);
        let taint = TaintEngine::run(&tree.root);

        let lines: Vec<&str> = self.content.lines().collect();
        let ctx = DetectorContext {
            file: &self.path,
            lines: &lines,
        };

        let mut vulnerabilities = Vec::new();
        for detector in all_detectors(&self.config) {
            vulnerabilities.extend(detector.check(&facts, &taint, &ctx));
        }
        Ok(vulnerabilities)
    }
}

/// Outcome of analyzing a file tree: findings plus isolated per-file
/// failures. A malformed file never aborts the batch.
#[derive(Debug, Default)]
pub struct BatchResult {
    /// All findings, grouped by file in walk order
    pub vulnerabilities: Vec<Vulnerability>,
    /// Files that could not be analyzed, with the reason
    pub failures: Vec<(PathBuf, String)>,
    /// Number of files analyzed (including failed ones)
    pub files_seen: usize,
}

/// Analyzes a file, or every `.sh`/`.bash` file under a directory.
/// Files are processed in parallel; output order stays deterministic.
#[must_use]
pub fn analyze_path(path: &Path, config: &Config) -> BatchResult {
    let files = collect_scripts(path);
    let mut result = BatchResult {
        files_seen: files.len(),
        ..BatchResult::default()
    };

    let outcomes: Vec<(PathBuf, Result<Vec<Vulnerability>, AnalyzeError>)> = files
        .into_par_iter()
        .map(|file| {
            let outcome = ScriptAnalyzer::from_path(&file, config.clone())
                .and_then(|analyzer| analyzer.analyze());
            (file, outcome)
        })
        .collect();

    for (file, outcome) in outcomes {
        match outcome {
            Ok(vulns) => result.vulnerabilities.extend(vulns),
            Err(err) => result.failures.push((file, err.to_string())),
        }
    }
    result
}

/// Shell scripts under the path, gitignore-aware, sorted for determinism.
fn collect_scripts(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        return vec![path.to_path_buf()];
    }

    let mut files: Vec<PathBuf> = ignore::WalkBuilder::new(path)
        .build()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_some_and(|t| t.is_file()))
        .map(ignore::DirEntry::into_path)
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e == "sh" || e == "bash")
        })
        .collect();
    files.sort();
    files
}
