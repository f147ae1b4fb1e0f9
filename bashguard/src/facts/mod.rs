//! Fact extraction: normalized records collected from one tree walk.
//!
//! The extractor produces four lists (assignments, variable uses, commands,
//! array subscripts) that the taint engine and the detectors consume. It
//! never fails on a parsable tree; node kinds it does not recognize are
//! simply descended into.

pub mod extractor;
pub mod value;

pub use extractor::FactExtractor;
pub use value::{classify, SensitiveValue, Value, ValuePart};

use crate::cst::Point;

/// A variable assignment, with its name qualified by lexical function scope
/// (`scope1.scope2...name`; a bare `name` is global).
#[derive(Debug, Clone)]
pub struct AssignedVariable {
    /// Scope-qualified variable name
    pub qualified_name: String,
    /// Classified right-hand side
    pub value: Value,
    /// 0-based position of the assignment
    pub position: Point,
}

impl AssignedVariable {
    /// Bare name: the suffix after the last scope qualifier.
    #[must_use]
    pub fn bare_name(&self) -> &str {
        self.qualified_name
            .rsplit(crate::constants::SCOPE_QUALIFIER)
            .next()
            .unwrap_or(&self.qualified_name)
    }
}

/// An expansion occurrence in expression or argument position.
#[derive(Debug, Clone)]
pub struct UsedVariable {
    /// Bare variable or parameter name (`x`, `1`, `@`)
    pub name: String,
    /// Full expansion text as written (`$x`, `${arr[$i]}`)
    pub text: String,
    /// 0-based position of the leading `$`
    pub position: Point,
}

/// An invoked command with its raw argument texts.
#[derive(Debug, Clone)]
pub struct Command {
    /// Command head as written (may itself be an expansion like `$cmd`)
    pub name: String,
    /// Raw argument texts, in order
    pub arguments: Vec<String>,
    /// 0-based position of the command head
    pub position: Point,
}

/// An array subscript expression, from `arr[i]=` or `${arr[i]}`.
#[derive(Debug, Clone)]
pub struct Subscript {
    /// Array variable name
    pub array_name: String,
    /// Index expression text between the brackets
    pub index_expression: String,
    /// 0-based position of the subscript
    pub position: Point,
}

/// All facts extracted from one script.
#[derive(Debug, Default)]
pub struct Facts {
    /// Variable assignments in source order
    pub assignments: Vec<AssignedVariable>,
    /// Expansion occurrences in source order
    pub uses: Vec<UsedVariable>,
    /// Command invocations in source order (including inside `$(...)`)
    pub commands: Vec<Command>,
    /// Array subscripts in source order
    pub subscripts: Vec<Subscript>,
}
