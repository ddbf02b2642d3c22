//! Helpers over the dynamic value model.
//!
//! Created values are plain `serde_json::Value` trees. These helpers give the
//! shape names and truthiness rules the fixture engine relies on.

use std::num::FpCategory;

use serde_json::Value;

/// Names the JSON kind of a value for error messages.
pub(crate) const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Applies loose truthiness: `null`, `false`, zero and `""` are falsy.
///
/// Arrays and objects are always truthy, even when empty.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number
            .as_f64()
            .is_some_and(|float| float.classify() != FpCategory::Zero),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
