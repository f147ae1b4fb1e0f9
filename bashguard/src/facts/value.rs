//! Value classification for assignment right-hand sides and arguments.
//!
//! A `Value` keeps the raw source text plus the list of sensitive parts
//! found anywhere inside it. Literal text contributes a `Literal` part only
//! when nothing sensitive is present, so a purely literal value still
//! classifies to something exhaustively matchable.

use crate::cst::{Point, ShellNode};
use smallvec::SmallVec;

/// A classified fragment of a value that can carry taint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SensitiveValue {
    /// `$name` reference
    PlainVariable {
        /// Referenced variable or parameter name
        name: String,
    },
    /// `${prefix name ...}` expansion; `prefix` captures modifiers such as
    /// `!` (indirection) or `#` (length)
    ParameterExpansion {
        /// Referenced variable or parameter name
        name: String,
        /// Modifier characters preceding the name, if any
        prefix: String,
    },
    /// `$(...)` or backquoted command substitution
    CommandSubstitution,
    /// Interactive input sentinel (produced by `read`)
    UserInput,
    /// Literal text with no taint contribution
    Literal,
}

/// One sensitive part together with its source position.
#[derive(Debug, Clone)]
pub struct ValuePart {
    /// Classified fragment
    pub kind: SensitiveValue,
    /// 0-based position of the fragment
    pub position: Point,
}

/// A classified value: raw text plus its sensitive parts.
#[derive(Debug, Clone)]
pub struct Value {
    /// Source text of the whole value
    pub raw_text: String,
    /// Sensitive parts in source order
    pub parts: SmallVec<[ValuePart; 4]>,
}

impl Value {
    /// A value consisting of interactive user input (`read` target).
    #[must_use]
    pub fn user_input(position: Point) -> Self {
        Self {
            raw_text: String::new(),
            parts: smallvec::smallvec![ValuePart {
                kind: SensitiveValue::UserInput,
                position,
            }],
        }
    }

    /// Names referenced by plain-variable or parameter-expansion parts.
    pub fn referenced_names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().filter_map(|p| match &p.kind {
            SensitiveValue::PlainVariable { name }
            | SensitiveValue::ParameterExpansion { name, .. } => Some(name.as_str()),
            SensitiveValue::CommandSubstitution
            | SensitiveValue::UserInput
            | SensitiveValue::Literal => None,
        })
    }
}

/// Classifies a value subtree. Pure: the same subtree always yields the
/// same `Value` regardless of where it appeared.
#[must_use]
pub fn classify(node: &ShellNode) -> Value {
    let mut parts = SmallVec::new();
    collect_parts(node, &mut parts);

    if parts.is_empty() && !node.text.is_empty() {
        parts.push(ValuePart {
            kind: SensitiveValue::Literal,
            position: node.start_point,
        });
    }

    Value {
        raw_text: node.text.clone(),
        parts,
    }
}

fn collect_parts(node: &ShellNode, parts: &mut SmallVec<[ValuePart; 4]>) {
    match node.kind.as_str() {
        "simple_expansion" => {
            if let Some(name) = expansion_name(node) {
                parts.push(ValuePart {
                    kind: SensitiveValue::PlainVariable { name },
                    position: node.start_point,
                });
            }
        }
        "expansion" => {
            if let Some(name) = expansion_name(node) {
                parts.push(ValuePart {
                    kind: SensitiveValue::ParameterExpansion {
                        name,
                        prefix: expansion_prefix(node),
                    },
                    position: node.start_point,
                });
            }
        }
        "command_substitution" => {
            parts.push(ValuePart {
                kind: SensitiveValue::CommandSubstitution,
                position: node.start_point,
            });
            // Expansions inside `$(...)` still carry taint into the value,
            // e.g. `x=$(cat $1)` is tainted through `$1`.
            for child in &node.children {
                collect_parts(child, parts);
            }
        }
        // Single quotes suppress expansion entirely.
        "raw_string" => {}
        _ => {
            for child in &node.children {
                collect_parts(child, parts);
            }
        }
    }
}

/// The referenced name inside an expansion node: the first `variable_name`
/// or `special_variable_name` child, or the array name for `${arr[i]}`.
pub(crate) fn expansion_name(node: &ShellNode) -> Option<String> {
    for child in &node.children {
        match child.kind.as_str() {
            "variable_name" | "special_variable_name" => return Some(child.text.clone()),
            "subscript" => {
                return child
                    .child_by_kind("variable_name")
                    .map(|n| n.text.clone());
            }
            _ => {}
        }
    }
    None
}

/// Modifier tokens of a `${...}` expansion that precede the name (`!`, `#`).
fn expansion_prefix(node: &ShellNode) -> String {
    let mut prefix = String::new();
    for child in &node.children {
        match child.kind.as_str() {
            "${" => {}
            "variable_name" | "special_variable_name" | "subscript" => break,
            _ if !child.is_named => prefix.push_str(&child.text),
            _ => break,
        }
    }
    prefix
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::ShellParser;

    fn rhs_of_first_assignment(source: &str) -> Value {
        let tree = ShellParser::new().unwrap().parse(source).unwrap();
        let assigns = tree.root.find_by_kind("variable_assignment");
        let rhs = assigns[0].children.last().unwrap();
        classify(rhs)
    }

    #[test]
    fn plain_variable_reference() {
        let value = rhs_of_first_assignment("x=$1\n");
        assert_eq!(
            value.parts[0].kind,
            SensitiveValue::PlainVariable {
                name: "1".to_string()
            }
        );
    }

    #[test]
    fn braced_expansion_with_indirection_prefix() {
        let value = rhs_of_first_assignment("x=${!ref}\n");
        assert_eq!(
            value.parts[0].kind,
            SensitiveValue::ParameterExpansion {
                name: "ref".to_string(),
                prefix: "!".to_string(),
            }
        );
    }

    #[test]
    fn literal_value_has_single_literal_part() {
        let value = rhs_of_first_assignment("x=hello\n");
        assert_eq!(value.parts.len(), 1);
        assert_eq!(value.parts[0].kind, SensitiveValue::Literal);
    }

    #[test]
    fn single_quotes_suppress_expansion() {
        let value = rhs_of_first_assignment("x='$1'\n");
        assert_eq!(value.parts.len(), 1);
        assert_eq!(value.parts[0].kind, SensitiveValue::Literal);
    }

    #[test]
    fn command_substitution_exposes_inner_expansions() {
        let value = rhs_of_first_assignment("x=$(cat $1)\n");
        assert!(value
            .parts
            .iter()
            .any(|p| p.kind == SensitiveValue::CommandSubstitution));
        assert!(value.referenced_names().any(|n| n == "1"));
    }

    #[test]
    fn double_quoted_expansion_still_counts() {
        let value = rhs_of_first_assignment("x=\"$HOME/bin\"\n");
        assert!(value.referenced_names().any(|n| n == "HOME"));
    }
}
