//! Single pre-order tree walk collecting assignment, use, command and
//! subscript facts.

use crate::constants::{DEFAULT_READ_VARIABLE, SCOPE_QUALIFIER};
use crate::cst::ShellNode;
use crate::facts::{value, AssignedVariable, Command, Facts, Subscript, UsedVariable, Value};
use smallvec::SmallVec;

/// Walks a shell tree once and collects normalized facts.
///
/// Assignment names are qualified by the lexical function nesting at the
/// point of the assignment; the taint engine performs its own dynamic
/// resolution on top of these.
#[derive(Debug, Default)]
pub struct FactExtractor {
    facts: Facts,
    scope_stack: Vec<String>,
}

impl FactExtractor {
    /// Extracts all facts from the given tree root.
    #[must_use]
    pub fn extract(root: &ShellNode) -> Facts {
        let mut extractor = Self::default();
        extractor.walk(root);
        extractor.facts
    }

    fn qualify(&self, name: &str) -> String {
        if self.scope_stack.is_empty() {
            name.to_string()
        } else {
            let mut qualified = self.scope_stack.join(&SCOPE_QUALIFIER.to_string());
            qualified.push(SCOPE_QUALIFIER);
            qualified.push_str(name);
            qualified
        }
    }

    fn walk(&mut self, node: &ShellNode) {
        match node.kind.as_str() {
            "comment" | "raw_string" => {}
            "function_definition" => {
                let name = node
                    .child_by_kind("word")
                    .map(|n| n.text.clone())
                    .unwrap_or_default();
                self.scope_stack.push(name);
                for child in &node.children {
                    self.walk(child);
                }
                self.scope_stack.pop();
            }
            "variable_assignment" => self.handle_assignment(node),
            "variable_assignments" | "declaration_command" => {
                // `local x=1`, `declare -a arr`, `export FOO=$1`
                for child in &node.children {
                    if child.kind == "variable_assignment" {
                        self.handle_assignment(child);
                    } else if child.kind == "variable_name" {
                        self.facts.assignments.push(AssignedVariable {
                            qualified_name: self.qualify(&child.text),
                            value: Value {
                                raw_text: String::new(),
                                parts: SmallVec::new(),
                            },
                            position: child.start_point,
                        });
                    }
                }
            }
            "command" => {
                self.save_command(node);
                for child in &node.children {
                    self.walk(child);
                }
            }
            "simple_expansion" | "expansion" => self.handle_expansion(node),
            "subscript" => self.save_subscript(node),
            _ => {
                for child in &node.children {
                    self.walk(child);
                }
            }
        }
    }

    /// Records an expansion occurrence. The subtree is not descended into:
    /// one expansion yields exactly one `UsedVariable`, plus a `Subscript`
    /// fact for the `${arr[i]}` form.
    fn handle_expansion(&mut self, node: &ShellNode) {
        if let Some(name) = value::expansion_name(node) {
            self.facts.uses.push(UsedVariable {
                name,
                text: node.text.clone(),
                position: node.start_point,
            });
        }
        if let Some(subscript) = node.find_by_kind("subscript").first() {
            self.save_subscript(subscript);
        }
    }

    fn handle_assignment(&mut self, node: &ShellNode) {
        let Some(lhs) = node.children.first() else {
            return;
        };
        let name = match lhs.kind.as_str() {
            "variable_name" => lhs.text.clone(),
            "subscript" => {
                self.save_subscript(lhs);
                lhs.child_by_kind("variable_name")
                    .map(|n| n.text.clone())
                    .unwrap_or_default()
            }
            _ => return,
        };
        if name.is_empty() {
            return;
        }

        let operator = node
            .children
            .iter()
            .position(|c| c.kind == "=" || c.kind == "+=");
        let rhs = operator.and_then(|i| node.children.get(i + 1));

        let value = rhs.map_or_else(
            || Value {
                raw_text: String::new(),
                parts: SmallVec::new(),
            },
            value::classify,
        );

        self.facts.assignments.push(AssignedVariable {
            qualified_name: self.qualify(&name),
            value,
            position: node.start_point,
        });

        // The right-hand side is not a use site, but subscripts and nested
        // command substitutions inside it are still facts.
        if let Some(rhs) = rhs {
            self.walk_value_side(rhs);
        }
    }

    /// Registers subscripts and `$(...)` commands found inside an assignment
    /// value without treating its expansions as use occurrences.
    fn walk_value_side(&mut self, node: &ShellNode) {
        match node.kind.as_str() {
            "subscript" => self.save_subscript(node),
            "command" => {
                self.save_command(node);
                for child in &node.children {
                    self.walk_value_side(child);
                }
            }
            "raw_string" => {}
            _ => {
                for child in &node.children {
                    self.walk_value_side(child);
                }
            }
        }
    }

    /// Records a `Command` fact. `read` is specially recognized: non-flag
    /// word arguments become user-input assignments, and a bare `read`
    /// assigns the default reply variable.
    fn save_command(&mut self, node: &ShellNode) {
        let Some(name_node) = node.child_by_kind("command_name") else {
            return;
        };
        let name = name_node.text.clone();

        let arguments: Vec<String> = node
            .children
            .iter()
            .skip_while(|c| c.kind != "command_name")
            .skip(1)
            .filter(|c| c.is_named)
            .map(|c| c.text.clone())
            .collect();

        if name == "read" {
            let mut assigned_any = false;
            for arg in node
                .children
                .iter()
                .skip_while(|c| c.kind != "command_name")
                .skip(1)
            {
                if arg.kind == "word" && !arg.text.starts_with('-') {
                    assigned_any = true;
                    self.facts.assignments.push(AssignedVariable {
                        qualified_name: self.qualify(&arg.text),
                        value: Value::user_input(arg.start_point),
                        position: arg.start_point,
                    });
                }
            }
            if !assigned_any {
                self.facts.assignments.push(AssignedVariable {
                    qualified_name: self.qualify(DEFAULT_READ_VARIABLE),
                    value: Value::user_input(name_node.start_point),
                    position: name_node.start_point,
                });
            }
        }

        self.facts.commands.push(Command {
            name,
            arguments,
            position: name_node.start_point,
        });
    }

    fn save_subscript(&mut self, node: &ShellNode) {
        let Some(array) = node.child_by_kind("variable_name") else {
            return;
        };
        let open = node.text.find('[');
        let close = node.text.rfind(']');
        let index_expression = match (open, close) {
            (Some(o), Some(c)) if c > o => node.text[o + 1..c].to_string(),
            _ => String::new(),
        };
        self.facts.subscripts.push(Subscript {
            array_name: array.text.clone(),
            index_expression,
            position: node.start_point,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::ShellParser;
    use crate::facts::SensitiveValue;

    fn extract(source: &str) -> Facts {
        let tree = ShellParser::new().unwrap().parse(source).unwrap();
        FactExtractor::extract(&tree.root)
    }

    #[test]
    fn assignment_rhs_is_not_a_use_site() {
        let facts = extract("name=$1\n");
        assert_eq!(facts.assignments.len(), 1);
        assert_eq!(facts.assignments[0].qualified_name, "name");
        assert!(facts.uses.is_empty());
    }

    #[test]
    fn command_arguments_are_use_sites() {
        let facts = extract("eval $name\n");
        assert_eq!(facts.commands.len(), 1);
        assert_eq!(facts.commands[0].name, "eval");
        assert_eq!(facts.commands[0].arguments, vec!["$name"]);
        assert_eq!(facts.uses.len(), 1);
        assert_eq!(facts.uses[0].name, "name");
        assert_eq!(facts.uses[0].text, "$name");
    }

    #[test]
    fn function_scope_qualifies_assignments() {
        let facts = extract("f() {\n  local x=$1\n}\n");
        assert_eq!(facts.assignments.len(), 1);
        assert_eq!(facts.assignments[0].qualified_name, "f.x");
        assert_eq!(facts.assignments[0].bare_name(), "x");
    }

    #[test]
    fn bare_read_assigns_reply() {
        let facts = extract("read\n");
        assert_eq!(facts.assignments.len(), 1);
        assert_eq!(facts.assignments[0].qualified_name, "REPLY");
        assert_eq!(
            facts.assignments[0].value.parts[0].kind,
            SensitiveValue::UserInput
        );
    }

    #[test]
    fn read_with_prompt_assigns_only_word_arguments() {
        let facts = extract("read -p \"Enter: \" a b\n");
        let names: Vec<&str> = facts
            .assignments
            .iter()
            .map(|a| a.qualified_name.as_str())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn braced_array_access_yields_use_and_subscript() {
        let facts = extract("echo \"${arr[$USER]}\"\n");
        assert_eq!(facts.uses.len(), 1);
        assert_eq!(facts.uses[0].name, "arr");
        assert_eq!(facts.subscripts.len(), 1);
        assert_eq!(facts.subscripts[0].array_name, "arr");
        assert_eq!(facts.subscripts[0].index_expression, "$USER");
    }

    #[test]
    fn subscript_assignment_records_array_fact() {
        let facts = extract("arr[$i]=value\n");
        assert_eq!(facts.subscripts.len(), 1);
        assert_eq!(facts.subscripts[0].index_expression, "$i");
        assert_eq!(facts.assignments.len(), 1);
        assert_eq!(facts.assignments[0].qualified_name, "arr");
    }

    #[test]
    fn command_substitution_in_rhs_registers_inner_command() {
        let facts = extract("x=$(cat $1)\n");
        assert_eq!(facts.commands.len(), 1);
        assert_eq!(facts.commands[0].name, "cat");
        // Inner expansions of a substituted value are not use occurrences.
        assert!(facts.uses.is_empty());
    }

    #[test]
    fn single_quoted_text_produces_no_uses() {
        let facts = extract("echo '$name'\n");
        assert!(facts.uses.is_empty());
    }

    #[test]
    fn positional_parameter_use() {
        let facts = extract("echo $0\n");
        assert_eq!(facts.uses.len(), 1);
        assert_eq!(facts.uses[0].name, "0");
    }
}
