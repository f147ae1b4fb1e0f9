//! Helpers shared by unit and integration tests.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::analyzer::ScriptAnalyzer;
use crate::config::Config;
use crate::cst::{ShellParser, ShellTree};
use crate::facts::{FactExtractor, Facts};
use crate::taint::{TaintContext, TaintEngine};
use crate::vulnerability::Vulnerability;

/// Parses a source snippet, panicking on parser construction failure.
#[must_use]
pub fn parse_source(source: &str) -> ShellTree {
    ShellParser::new()
        .expect("parser construction")
        .parse(source)
        .expect("parse")
}

/// Facts extracted from a source snippet.
#[must_use]
pub fn facts_of(source: &str) -> Facts {
    FactExtractor::extract(&parse_source(source).root)
}

/// Final taint state of a source snippet.
#[must_use]
pub fn taint_of(source: &str) -> TaintContext {
    TaintEngine::run(&parse_source(source).root)
}

/// Full analysis with the semantic detectors only: shellcheck and the
/// whole-file environment check are disabled so tests can assert exact
/// finding counts.
#[must_use]
pub fn analyze_source(source: &str) -> Vec<Vulnerability> {
    let mut config = Config::default();
    config.shellcheck = false;
    config.detectors.environment = false;
    analyze_source_with_config(source, &config)
}

/// Full analysis with an explicit configuration.
#[must_use]
pub fn analyze_source_with_config(source: &str, config: &Config) -> Vec<Vulnerability> {
    let mut config = config.clone();
    config.shellcheck = false;
    ScriptAnalyzer::from_source("test.sh", source, config)
        .analyze()
        .expect("analysis")
}
