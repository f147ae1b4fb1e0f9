//! Concrete syntax tree support built on tree-sitter.

pub mod parser;

pub use parser::{ParseError, Point, ShellNode, ShellParser, ShellTree};
