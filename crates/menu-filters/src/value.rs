//! Loose conversions between template values, shared by the filter modules.

use std::collections::HashMap;

use tera::Value;

/// Truthiness as templates expect it: `null`, `false`, zero, and empty
/// strings, arrays or objects are falsy.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Convert a number, numeric string or boolean to `f64`.
pub(crate) fn as_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Convert to an integer the way a strict `int()` would: floats truncate
/// toward zero, strings must hold a base-10 integer. Values outside the
/// `i64` range have no conversion.
pub(crate) fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Some(i);
            }
            let f = n.as_f64()?;
            let truncated = f.trunc();
            if truncated.is_finite()
                && truncated >= i64::MIN as f64
                && truncated <= i64::MAX as f64
            {
                Some(truncated as i64)
            } else {
                None
            }
        }
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

/// Render a value as display text. `null` becomes the empty string and
/// containers become compact JSON.
pub(crate) fn display_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Wrap a float result. Non-finite results have no JSON form and become `null`.
pub(crate) fn float_value(f: f64) -> Value {
    Value::from(f)
}

/// Look up a named filter argument, treating an absent argument as `null`.
pub(crate) fn arg<'a>(args: &'a HashMap<String, Value>, name: &str) -> &'a Value {
    args.get(name).unwrap_or(&Value::Null)
}
