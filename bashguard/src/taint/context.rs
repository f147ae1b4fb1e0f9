//! The explicit state threaded through the taint traversal.

use crate::constants::SCOPE_QUALIFIER;
use rustc_hash::FxHashSet;

/// Taint state at one point of the traversal.
///
/// Cloned at branch points and merged back by union, so sibling branches
/// never observe each other's tentative taint.
#[derive(Debug, Clone, Default)]
pub struct TaintContext {
    /// Qualified names whose current value may be attacker-influenced.
    /// Membership reflects the last assignment on the path reaching this
    /// point (strong update), not "was ever tainted".
    pub tainted: FxHashSet<String>,
    /// All qualified names declared so far, for scope resolution.
    pub all_variables: FxHashSet<String>,
    /// Function scopes currently entered, outermost first.
    pub scope_stack: Vec<String>,
    /// Function re-entry depth, bounded to guard recursive scripts.
    pub call_depth: usize,
}

impl TaintContext {
    /// Empty context at global scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Qualifies a bare name with the current scope stack.
    #[must_use]
    pub fn qualify(&self, name: &str) -> String {
        if self.scope_stack.is_empty() {
            return name.to_string();
        }
        let mut qualified = String::new();
        for scope in &self.scope_stack {
            qualified.push_str(scope);
            qualified.push(SCOPE_QUALIFIER);
        }
        qualified.push_str(name);
        qualified
    }

    /// Resolves a bare name to its innermost declared qualified form.
    ///
    /// Among all declared names sharing the bare suffix, the one with the
    /// most scope segments wins. Returns `None` when the name was never
    /// declared.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<String> {
        self.all_variables
            .iter()
            .filter(|q| bare_suffix(q) == name)
            .max_by_key(|q| {
                (
                    q.matches(SCOPE_QUALIFIER).count(),
                    // Deterministic tie-break between same-depth scopes.
                    (*q).clone(),
                )
            })
            .cloned()
    }

    /// Strong update: records the name as declared and sets or clears its
    /// taint based on the latest assignment.
    pub fn set_taint(&mut self, qualified_name: &str, tainted: bool) {
        self.all_variables.insert(qualified_name.to_string());
        if tainted {
            self.tainted.insert(qualified_name.to_string());
        } else {
            self.tainted.remove(qualified_name);
        }
    }

    /// Whether a bare name is tainted from the current scope's view.
    ///
    /// Resolution wins when the name is declared somewhere visible; a name
    /// with no declaration at all falls back to matching any tainted
    /// qualified name by suffix, so taint observed inside finished function
    /// scopes is still reported.
    #[must_use]
    pub fn is_bare_tainted(&self, name: &str) -> bool {
        if let Some(qualified) = self.resolve(name) {
            return self.tainted.contains(&qualified);
        }
        self.tainted.iter().any(|q| bare_suffix(q) == name)
    }

    /// Union merge of a branch result back into this context (may-taint).
    pub fn merge(&mut self, branch: &TaintContext) {
        self.tainted.extend(branch.tainted.iter().cloned());
        self.all_variables
            .extend(branch.all_variables.iter().cloned());
    }

    /// Drops declarations local to a finished scope from resolution.
    /// Taint entries are kept so detectors still see what was tainted
    /// inside the function.
    pub fn drop_scope_locals(&mut self, scope_prefix: &str) {
        let mut prefix = scope_prefix.to_string();
        prefix.push(SCOPE_QUALIFIER);
        self.all_variables.retain(|q| !q.starts_with(&prefix));
    }
}

fn bare_suffix(qualified: &str) -> &str {
    qualified
        .rsplit(SCOPE_QUALIFIER)
        .next()
        .unwrap_or(qualified)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualify_joins_scope_stack() {
        let mut ctx = TaintContext::new();
        assert_eq!(ctx.qualify("x"), "x");
        ctx.scope_stack.push("f".to_string());
        ctx.scope_stack.push("g".to_string());
        assert_eq!(ctx.qualify("x"), "f.g.x");
    }

    #[test]
    fn resolve_prefers_innermost_scope() {
        let mut ctx = TaintContext::new();
        ctx.set_taint("x", false);
        ctx.set_taint("f.x", false);
        assert_eq!(ctx.resolve("x").as_deref(), Some("f.x"));
    }

    #[test]
    fn strong_update_clears_taint() {
        let mut ctx = TaintContext::new();
        ctx.set_taint("x", true);
        assert!(ctx.is_bare_tainted("x"));
        ctx.set_taint("x", false);
        assert!(!ctx.is_bare_tainted("x"));
        assert!(ctx.all_variables.contains("x"));
    }

    #[test]
    fn merge_is_union() {
        let mut outer = TaintContext::new();
        outer.set_taint("x", false);
        let mut branch = outer.clone();
        branch.set_taint("x", true);
        outer.merge(&branch);
        assert!(outer.is_bare_tainted("x"));
    }

    #[test]
    fn dropping_scope_keeps_taint_but_removes_resolution() {
        let mut ctx = TaintContext::new();
        ctx.set_taint("f.x", true);
        ctx.drop_scope_locals("f");
        assert!(ctx.is_bare_tainted("x"));
        assert_eq!(ctx.resolve("x"), None);
    }
}
