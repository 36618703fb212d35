//! Canonical value normalization for deep-equality comparison.
//!
//! Insensitive to object-key ordering, sensitive to array ordering and
//! type. Integral floats collapse to integers so `2` and `2.0` compare
//! equal regardless of which runtime produced them.

use serde_json::{Map, Number, Value};

/// Largest integer exactly representable in an f64.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Produce the canonical form of a value: arrays recurse element-wise
/// preserving order, objects recurse with keys sorted lexicographically,
/// scalars pass through (modulo integral-float collapse).
pub fn normalize(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(normalize).collect()),
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut out = Map::new();
            for key in keys {
                out.insert(key.clone(), normalize(&map[key]));
            }
            Value::Object(out)
        }
        Value::Number(n) => Value::Number(normalize_number(n)),
        other => other.clone(),
    }
}

fn normalize_number(n: &Number) -> Number {
    if n.is_f64() {
        if let Some(f) = n.as_f64() {
            if f.fract() == 0.0 && f.abs() < MAX_SAFE_INTEGER {
                return Number::from(f as i64);
            }
        }
    }
    n.clone()
}

/// Canonical string used both for comparison and for the
/// `expected`/`actual` fields of a case result.
pub fn canonical_string(value: &Value) -> String {
    normalize(value).to_string()
}

/// Deep equality under canonical normalization.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    canonical_string(a) == canonical_string(b)
}
