//! Maps parsed fixture values onto the resolved callable's parameters.

use serde_json::Value;

use crate::literal::ParsedInput;
use crate::signature::ResolvedCallable;

/// Produce the ordered argument list for one call.
///
/// Name correspondence wins: when every declared parameter name is
/// present in the parsed map, arguments are bound by name in parameter
/// order. Otherwise parsed values are taken in discovery order and
/// sliced to the declared parameter count (or to `fallback_arity` when
/// no names are known; zero fallback arity passes everything through).
/// The positional path is approximate: fixture authors and submitters
/// do not always agree on names, and reordered parameters bind wrong.
pub fn bind_arguments(callable: &ResolvedCallable, parsed: &ParsedInput) -> Vec<Value> {
    if !callable.arg_names.is_empty()
        && callable.arg_names.iter().all(|name| parsed.contains(name))
    {
        return callable
            .arg_names
            .iter()
            .map(|name| parsed.get(name).cloned().unwrap_or(Value::Null))
            .collect();
    }

    let mut values = parsed.values_in_order();
    let limit = if callable.arg_names.is_empty() {
        if callable.fallback_arity > 0 {
            callable.fallback_arity
        } else {
            values.len()
        }
    } else {
        callable.arg_names.len()
    };
    values.truncate(limit);
    values
}
