//! Type coercion filters.

use std::collections::HashMap;

use tera::{Result, Value};

use crate::value::{as_int, display_string};

/// `to_int`: integer, or `null` when the value has no integer form.
///
/// Integers up to `u64::MAX` are kept; anything wider is `null`.
pub fn to_int(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    if let Some(i) = as_int(value) {
        return Ok(Value::from(i));
    }
    let unsigned = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    match unsigned {
        Some(u) => Ok(Value::from(u)),
        None => {
            tracing::trace!(%value, "to_int: not convertible");
            Ok(Value::Null)
        }
    }
}

/// `to_str`: display text of the value; `null` becomes `""`.
pub fn to_str(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    Ok(Value::String(display_string(value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn apply(filter: fn(&Value, &HashMap<String, Value>) -> Result<Value>, input: Value) -> Value {
        filter(&input, &HashMap::new()).unwrap()
    }

    #[test]
    fn test_to_int() {
        assert_eq!(apply(to_int, json!(5)), json!(5));
        assert_eq!(apply(to_int, json!("12")), json!(12));
        assert_eq!(apply(to_int, json!(" -3 ")), json!(-3));
        assert_eq!(apply(to_int, json!(9.99)), json!(9));
        assert_eq!(apply(to_int, json!(true)), json!(1));
    }

    #[test]
    fn test_to_int_non_numeric_is_null() {
        for input in [json!("abc"), json!(""), json!("1.5"), json!("12abc"), json!(null), json!([1]), json!({})] {
            assert_eq!(apply(to_int, input.clone()), Value::Null, "input {input}");
        }
    }

    #[test]
    fn test_to_int_keeps_unsigned_beyond_i64() {
        assert_eq!(apply(to_int, json!(u64::MAX)), json!(u64::MAX));
        assert_eq!(apply(to_int, json!("18446744073709551615")), json!(u64::MAX));
        assert_eq!(apply(to_int, json!("18446744073709551616")), Value::Null);
    }

    #[test]
    fn test_to_str() {
        assert_eq!(apply(to_str, json!(42)), json!("42"));
        assert_eq!(apply(to_str, json!("already")), json!("already"));
        assert_eq!(apply(to_str, json!(2.5)), json!("2.5"));
        assert_eq!(apply(to_str, json!(null)), json!(""));
        assert_eq!(apply(to_str, json!(false)), json!("false"));
    }
}
