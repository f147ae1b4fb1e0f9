//! Judgment of whether an assigned value carries taint.

use crate::constants::{special_parameters, tainted_env_vars};
use crate::facts::{SensitiveValue, Value};
use crate::taint::TaintContext;

/// Whether a bare referenced name is a taint source or currently tainted.
///
/// Positional/special parameters and the fixed environment list are
/// unconditional sources; everything else is tainted only if the name
/// resolves to a tainted qualified variable.
#[must_use]
pub fn name_is_tainted(name: &str, ctx: &TaintContext) -> bool {
    if special_parameters().contains(name) || tainted_env_vars().contains(name) {
        return true;
    }
    ctx.is_bare_tainted(name)
}

/// Whether a classified value taints the variable it is assigned to.
#[must_use]
pub fn value_is_tainted(value: &Value, ctx: &TaintContext) -> bool {
    value.parts.iter().any(|part| match &part.kind {
        SensitiveValue::UserInput => true,
        SensitiveValue::PlainVariable { name }
        | SensitiveValue::ParameterExpansion { name, .. } => name_is_tainted(name, ctx),
        SensitiveValue::CommandSubstitution | SensitiveValue::Literal => false,
    })
}
