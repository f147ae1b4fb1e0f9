//! Vulnerability detectors.
//!
//! Each detector is a pure function of the extracted facts and the final
//! taint state. Detectors never mutate shared state and never fail on
//! absent constructs; no matches is an empty list. The combined report
//! order is registration order, then ascending (line, column) within each
//! detector.

pub mod array_index;
pub mod command_injection;
pub mod declared_pair;
pub mod environment;
pub mod eval_source;
pub mod interpreter;
pub mod parameter;
pub mod unquoted;

use crate::config::Config;
use crate::facts::Facts;
use crate::taint::TaintContext;
use crate::vulnerability::Vulnerability;
use std::path::Path;

/// Read-only per-file inputs shared by all detectors.
pub struct DetectorContext<'a> {
    /// Path of the analyzed script
    pub file: &'a Path,
    /// Source split into lines, 0-indexed
    pub lines: &'a [&'a str],
}

/// A single vulnerability detector.
pub trait Detector {
    /// Stable detector name, used in verbose output.
    fn name(&self) -> &'static str;

    /// Runs the detector over one file's facts and taint state.
    fn check(
        &self,
        facts: &Facts,
        taint: &TaintContext,
        ctx: &DetectorContext<'_>,
    ) -> Vec<Vulnerability>;
}

/// All enabled detectors in their fixed registration order.
#[must_use]
pub fn all_detectors(config: &Config) -> Vec<Box<dyn Detector>> {
    let toggles = &config.detectors;
    let mut detectors: Vec<Box<dyn Detector>> = Vec::new();
    if toggles.command_injection {
        detectors.push(Box::new(command_injection::CommandInjection));
    }
    if toggles.eval_source {
        detectors.push(Box::new(eval_source::EvalSourceInjection));
    }
    if toggles.interpreter {
        detectors.push(Box::new(interpreter::InterpreterInjection));
    }
    if toggles.array_index {
        detectors.push(Box::new(array_index::ArrayIndexInjection));
    }
    if toggles.unquoted {
        detectors.push(Box::new(unquoted::UnquotedExpansion));
    }
    if toggles.parameter {
        detectors.push(Box::new(parameter::ZerothParameter));
    }
    if toggles.declared_pair {
        detectors.push(Box::new(declared_pair::DeclaredPair));
    }
    if toggles.environment {
        detectors.push(Box::new(environment::PathDeclaration));
    }
    detectors
}

/// Deterministic within-detector ordering.
pub(crate) fn sort_findings(findings: &mut [Vulnerability]) {
    findings.sort_by_key(|v| (v.line, v.column.unwrap_or(0)));
}
