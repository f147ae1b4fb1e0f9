//! Core library for the bashguard static analysis tool.
//!
//! This library analyzes shell scripts for injection-class vulnerabilities
//! (command injection, unquoted expansions, array subscript attacks, unsafe
//! positional parameters) and can rewrite offending lines to quote unsafe
//! expansions.

// Allow common complexity warnings - these are intentional design choices
#![allow(
    clippy::type_complexity,
    clippy::too_many_arguments,
    clippy::similar_names,
    clippy::items_after_statements
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

/// Module containing the core analyzer logic.
/// This includes the `ScriptAnalyzer` struct and the batch driver.
pub mod analyzer;

/// Module defining the command-line interface arguments and structs.
pub mod cli;

/// Module for handling CLI commands and their execution logic.
pub mod commands;

/// Module for loading configuration.
pub mod config;

/// Module containing shared constants and regex patterns.
pub mod constants;

/// Module wrapping the tree-sitter bash parser.
/// Produces an owned syntax tree with exact source positions.
pub mod cst;

/// Module defining the entry point logic shared by all binaries.
pub mod entry_point;

/// Module containing the fact extractor and value classifier.
/// This is responsible for the first tree walk that collects assignments,
/// variable uses, commands and array subscripts.
pub mod facts;

/// Module containing the quote auto-fixer.
pub mod fix;

/// Module for generating vulnerability reports (text, JSON, HTML).
pub mod report;

/// Module containing the vulnerability detectors.
pub mod rules;

/// Module wrapping the external `shellcheck` syntax checker.
pub mod shellcheck;

/// Module for taint propagation (scope-aware data flow over the tree).
pub mod taint;

/// Module containing test utilities.
/// This helps in writing tests for the analyzer and detectors.
pub mod test_utils;

/// Module defining the vulnerability record types.
pub mod vulnerability;
