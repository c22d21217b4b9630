//! Field extraction from raw encoded text
//!
//! What a storage engine's JSON extraction function does: parse the stored
//! text, follow a `$.a.b` path, and return the scalar found there. It knows
//! nothing about schemas or registered types.
//!
//! Numbers written without a fraction or exponent come back as integers,
//! everything else numeric as floats (SQLite's `json_extract` behaves the
//! same way).

use serde_json::Value;
use tessera_core::{ExtractionExpression, FieldPath, Primitive};

/// Scalar at `path` in `text`
///
/// Returns `None` if `text` does not parse, the path is absent, or it ends
/// on something other than a scalar (`null`, an array, an object).
pub fn extract(text: &str, path: &FieldPath) -> Option<Primitive> {
    let root: Value = serde_json::from_str(text).ok()?;
    let mut current = &root;
    for segment in path.segments() {
        current = current.as_object()?.get(segment)?;
    }
    match current {
        Value::Bool(b) => Some(Primitive::Bool(*b)),
        Value::Number(n) => n
            .as_i64()
            .map(Primitive::Int)
            .or_else(|| n.as_f64().map(Primitive::Float)),
        Value::String(s) => Some(Primitive::Text(s.clone())),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Does the row `text` satisfy `expr`
///
/// Rows where the field cannot be extracted never match.
pub fn row_matches(text: &str, expr: &ExtractionExpression) -> bool {
    extract(text, expr.path()).map_or(false, |value| expr.test(&value))
}
