//! Tree-sitter based CST parser for shell source code.
//!
//! Produces an owned tree with exact source positions so the rest of the
//! analysis never needs to hold tree-sitter lifetimes.

use thiserror::Error;
use tree_sitter::{Node, Parser};

/// A point in source code (row, column).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    /// Zero-indexed row number
    pub row: usize,
    /// Zero-indexed column (byte offset within line)
    pub column: usize,
}

impl From<tree_sitter::Point> for Point {
    fn from(p: tree_sitter::Point) -> Self {
        Self {
            row: p.row,
            column: p.column,
        }
    }
}

/// A CST node with exact source location and owned text.
#[derive(Debug, Clone)]
pub struct ShellNode {
    /// Node kind (e.g., "variable_assignment", "command")
    pub kind: String,
    /// Source text covered by this node
    pub text: String,
    /// Start byte offset (inclusive)
    pub start_byte: usize,
    /// End byte offset (exclusive)
    pub end_byte: usize,
    /// Start point (row, column)
    pub start_point: Point,
    /// End point (row, column)
    pub end_point: Point,
    /// Whether this is a named node (vs anonymous like `;` or `then`)
    pub is_named: bool,
    /// Child nodes
    pub children: Vec<ShellNode>,
}

impl ShellNode {
    fn from_ts_node(node: Node<'_>, source: &str) -> Self {
        let children = (0..node.child_count())
            .filter_map(|i| node.child(i))
            .map(|c| Self::from_ts_node(c, source))
            .collect();

        Self {
            kind: node.kind().to_string(),
            text: source
                .get(node.start_byte()..node.end_byte())
                .unwrap_or_default()
                .to_string(),
            start_byte: node.start_byte(),
            end_byte: node.end_byte(),
            start_point: node.start_position().into(),
            end_point: node.end_position().into(),
            is_named: node.is_named(),
            children,
        }
    }

    /// First child of the given kind, if any.
    #[must_use]
    pub fn child_by_kind(&self, kind: &str) -> Option<&ShellNode> {
        self.children.iter().find(|c| c.kind == kind)
    }

    /// Named children only, in source order.
    pub fn named_children(&self) -> impl Iterator<Item = &ShellNode> {
        self.children.iter().filter(|c| c.is_named)
    }

    /// Find all descendant nodes of a specific kind (including self).
    #[must_use]
    pub fn find_by_kind(&self, kind: &str) -> Vec<&ShellNode> {
        let mut result = Vec::new();
        self.find_by_kind_recursive(kind, &mut result);
        result
    }

    fn find_by_kind_recursive<'a>(&'a self, kind: &str, result: &mut Vec<&'a ShellNode>) {
        if self.kind == kind {
            result.push(self);
        }
        for child in &self.children {
            child.find_by_kind_recursive(kind, result);
        }
    }
}

/// A parsed shell syntax tree.
#[derive(Debug)]
pub struct ShellTree {
    /// Root node ("program")
    pub root: ShellNode,
    /// Original source code
    pub source: String,
}

/// Error during CST parsing.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Failed to create parser
    #[error("Failed to create shell parser: {0}")]
    ParserCreation(String),
    /// Failed to parse source
    #[error("Failed to parse source as shell script")]
    ParseFailed,
}

/// Tree-sitter based shell parser.
pub struct ShellParser {
    parser: Parser,
}

impl ShellParser {
    /// Create a new shell parser.
    ///
    /// # Errors
    /// Returns error if the bash grammar cannot be loaded.
    pub fn new() -> Result<Self, ParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_bash::LANGUAGE.into())
            .map_err(|e| ParseError::ParserCreation(e.to_string()))?;

        Ok(Self { parser })
    }

    /// Parse source code into an owned tree.
    ///
    /// Syntax errors inside the script do not fail the parse; tree-sitter
    /// emits ERROR nodes and the fact extractor skips what it cannot read.
    ///
    /// # Errors
    /// Returns error if the parser gives up entirely.
    pub fn parse(&mut self, source: &str) -> Result<ShellTree, ParseError> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or(ParseError::ParseFailed)?;

        let root = ShellNode::from_ts_node(tree.root_node(), source);

        Ok(ShellTree {
            root,
            source: source.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> ShellTree {
        ShellParser::new().unwrap().parse(source).unwrap()
    }

    #[test]
    fn test_parse_simple_assignment() {
        let tree = parse("x=1\n");
        assert_eq!(tree.root.kind, "program");
        let assigns = tree.root.find_by_kind("variable_assignment");
        assert_eq!(assigns.len(), 1);
        assert_eq!(assigns[0].text, "x=1");
    }

    #[test]
    fn test_positions_are_zero_based() {
        let tree = parse("echo hi\nx=$1\n");
        let assigns = tree.root.find_by_kind("variable_assignment");
        assert_eq!(assigns[0].start_point.row, 1);
        assert_eq!(assigns[0].start_point.column, 0);
    }

    #[test]
    fn test_simple_expansion_text() {
        let tree = parse("echo $USER\n");
        let exps = tree.root.find_by_kind("simple_expansion");
        assert_eq!(exps.len(), 1);
        assert_eq!(exps[0].text, "$USER");
    }

    #[test]
    fn test_error_nodes_tolerated() {
        // Unterminated quote still yields a tree.
        let tree = parse("echo \"oops\n");
        assert_eq!(tree.root.kind, "program");
    }
}
