//! The taint traversal itself.

use crate::constants::DEFAULT_READ_VARIABLE;
use crate::cst::ShellNode;
use crate::facts::value;
use crate::taint::{sources, TaintContext};
use rustc_hash::FxHashMap;

/// Re-entry depth bound for recursive or mutually recursive shell
/// functions. Past this depth the fixpoint has long been reached for any
/// realistic script; further re-entry only repeats work.
const MAX_CALL_DEPTH: usize = 64;

/// Computes the set of tainted qualified names for one script.
///
/// Function bodies are registered at their definition (last definition
/// wins, matching shell semantics) and walked only when called, with the
/// callee's name pushed onto the scope stack so that `local` declarations
/// inside qualify as `function.name`.
#[derive(Debug, Default)]
pub struct TaintEngine {
    functions: FxHashMap<String, ShellNode>,
}

impl TaintEngine {
    /// Runs taint propagation over the tree and returns the final context.
    #[must_use]
    pub fn run(root: &ShellNode) -> TaintContext {
        let mut engine = Self::default();
        let mut ctx = TaintContext::new();
        engine.walk(root, &mut ctx);
        ctx
    }

    fn walk(&mut self, node: &ShellNode, ctx: &mut TaintContext) {
        match node.kind.as_str() {
            "comment" | "raw_string" => {}
            "function_definition" => {
                // Bodies execute only when called; register and move on.
                if let (Some(name), Some(body)) = (
                    node.child_by_kind("word"),
                    node.child_by_kind("compound_statement"),
                ) {
                    self.functions.insert(name.text.clone(), body.clone());
                }
            }
            "command" => self.handle_command(node, ctx),
            "variable_assignment" => self.handle_assignment(node, ctx, false),
            "declaration_command" => self.handle_declaration(node, ctx),
            "if_statement" => self.handle_if(node, ctx),
            "case_statement" => self.handle_case(node, ctx),
            _ => {
                for child in &node.children {
                    self.walk(child, ctx);
                }
            }
        }
    }

    /// `local`/`declare`/`typeset` bind at the current function scope;
    /// `export`/`readonly` behave like plain assignments.
    fn handle_declaration(&mut self, node: &ShellNode, ctx: &mut TaintContext) {
        let keyword = node.children.first().map_or("", |c| c.kind.as_str());
        let scope_local = matches!(keyword, "local" | "declare" | "typeset");

        for child in &node.children {
            match child.kind.as_str() {
                "variable_assignment" => self.handle_assignment(child, ctx, scope_local),
                "variable_name" => {
                    // Declared without a value: known, untainted.
                    let qualified = if scope_local {
                        ctx.qualify(&child.text)
                    } else {
                        ctx.resolve(&child.text)
                            .unwrap_or_else(|| child.text.clone())
                    };
                    ctx.set_taint(&qualified, false);
                }
                _ => {}
            }
        }
    }

    fn handle_assignment(&mut self, node: &ShellNode, ctx: &mut TaintContext, scope_local: bool) {
        let Some(lhs) = node.children.first() else {
            return;
        };
        let name = match lhs.kind.as_str() {
            "variable_name" => lhs.text.clone(),
            "subscript" => match lhs.child_by_kind("variable_name") {
                Some(n) => n.text.clone(),
                None => return,
            },
            _ => return,
        };

        let qualified = if scope_local {
            ctx.qualify(&name)
        } else {
            // Innermost declared scope, or a fresh global.
            ctx.resolve(&name).unwrap_or(name)
        };

        let operator = node
            .children
            .iter()
            .position(|c| c.kind == "=" || c.kind == "+=");
        let append = operator.is_some_and(|i| node.children[i].kind == "+=");
        let rhs = operator.and_then(|i| node.children.get(i + 1));

        // `+=` appends to the existing value, so a clean suffix never
        // clears taint; only `=` is a strong update.
        let mut tainted = rhs.is_some_and(|r| sources::value_is_tainted(&value::classify(r), ctx));
        if append {
            tainted = tainted || ctx.tainted.contains(&qualified);
        }
        ctx.set_taint(&qualified, tainted);

        // Substituted commands inside the value may call functions.
        if let Some(rhs) = rhs {
            for child in &rhs.children {
                self.walk(child, ctx);
            }
        }
    }

    fn handle_command(&mut self, node: &ShellNode, ctx: &mut TaintContext) {
        let name = node
            .child_by_kind("command_name")
            .map(|n| n.text.clone())
            .unwrap_or_default();

        if name == "read" {
            self.handle_read(node, ctx);
        }

        // Arguments and assignment prefixes evaluate before the call.
        for child in &node.children {
            self.walk(child, ctx);
        }

        if let Some(body) = self.functions.get(&name).cloned() {
            if ctx.call_depth < MAX_CALL_DEPTH {
                ctx.call_depth += 1;
                ctx.scope_stack.push(name);
                self.walk(&body, ctx);
                let scope = ctx.qualify("");
                let scope = scope.trim_end_matches(crate::constants::SCOPE_QUALIFIER);
                ctx.drop_scope_locals(scope);
                ctx.scope_stack.pop();
                ctx.call_depth -= 1;
            }
        }
    }

    /// `read` taints its non-flag word targets; a bare `read` taints the
    /// default reply variable.
    fn handle_read(&mut self, node: &ShellNode, ctx: &mut TaintContext) {
        let mut assigned_any = false;
        for arg in node
            .children
            .iter()
            .skip_while(|c| c.kind != "command_name")
            .skip(1)
        {
            if arg.kind == "word" && !arg.text.starts_with('-') {
                assigned_any = true;
                let qualified = ctx.resolve(&arg.text).unwrap_or_else(|| arg.text.clone());
                ctx.set_taint(&qualified, true);
            }
        }
        if !assigned_any {
            let qualified = ctx
                .resolve(DEFAULT_READ_VARIABLE)
                .unwrap_or_else(|| DEFAULT_READ_VARIABLE.to_string());
            ctx.set_taint(&qualified, true);
        }
    }

    /// Conditions run on the outer context; each branch body runs on its
    /// own clone, and every branch result is unioned back (may-taint).
    fn handle_if(&mut self, node: &ShellNode, ctx: &mut TaintContext) {
        let mut condition: Vec<&ShellNode> = Vec::new();
        let mut then_body: Vec<&ShellNode> = Vec::new();
        let mut clauses: Vec<&ShellNode> = Vec::new();
        let mut seen_then = false;

        for child in &node.children {
            match child.kind.as_str() {
                "if" | "fi" | ";" => {}
                "then" => seen_then = true,
                "elif_clause" | "else_clause" => clauses.push(child),
                _ if seen_then => then_body.push(child),
                _ => condition.push(child),
            }
        }

        for n in condition {
            self.walk(n, ctx);
        }

        let mut branches: Vec<TaintContext> = Vec::new();

        let mut branch = ctx.clone();
        for n in then_body {
            self.walk(n, &mut branch);
        }
        branches.push(branch);

        for clause in clauses {
            let mut branch = ctx.clone();
            let mut in_body = clause.kind == "else_clause";
            for n in &clause.children {
                match n.kind.as_str() {
                    "elif" | "else" | ";" => {}
                    "then" => in_body = true,
                    _ if in_body => self.walk(n, &mut branch),
                    // elif condition: always reached when earlier branches
                    // fall through, evaluate against the outer state.
                    _ => self.walk(n, ctx),
                }
            }
            branches.push(branch);
        }

        // The outer context itself stands in for the no-op path of an
        // if without else, so union never loses the pre-branch state.
        for branch in branches {
            ctx.merge(&branch);
        }
    }

    fn handle_case(&mut self, node: &ShellNode, ctx: &mut TaintContext) {
        let mut branches: Vec<TaintContext> = Vec::new();
        for child in &node.children {
            match child.kind.as_str() {
                "case_item" => {
                    let mut branch = ctx.clone();
                    let mut in_body = false;
                    for n in &child.children {
                        if n.kind == ")" {
                            in_body = true;
                        } else if in_body {
                            self.walk(n, &mut branch);
                        }
                    }
                    branches.push(branch);
                }
                "case" | "in" | "esac" => {}
                _ => self.walk(child, ctx),
            }
        }
        for branch in branches {
            ctx.merge(&branch);
        }
    }
}
