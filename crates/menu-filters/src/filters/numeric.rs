//! Arithmetic on template-bound numbers.
//!
//! Operands may be numbers, numeric strings or booleans. Apart from
//! `increment`, a non-numeric operand never fails the render: the filter
//! returns its fallback (`""` for the subtractions, `0` for the rest).

use std::collections::HashMap;

use tera::{Result, Value};

use crate::value::{arg, as_float, float_value, is_truthy};

fn operands(value: &Value, other: &Value) -> Option<(f64, f64)> {
    Some((as_float(value)?, as_float(other)?))
}

fn fallback(name: &str, value: &Value, other: &Value, result: Value) -> Result<Value> {
    tracing::trace!(filter = name, %value, %other, "non-numeric operand, using fallback");
    Ok(result)
}

/// `subtract(arg)`: `value - arg`, integral when both operands are integers.
pub fn subtract(value: &Value, args: &HashMap<String, Value>) -> Result<Value> {
    let other = arg(args, "arg");
    if let (Some(a), Some(b)) = (value.as_i64(), other.as_i64()) {
        if let Some(diff) = a.checked_sub(b) {
            return Ok(Value::from(diff));
        }
    }
    match operands(value, other) {
        Some((a, b)) => Ok(float_value(a - b)),
        None => fallback("subtract", value, other, Value::String(String::new())),
    }
}

/// `subtract1(arg)`: `value - arg` as floats.
pub fn subtract1(value: &Value, args: &HashMap<String, Value>) -> Result<Value> {
    let other = arg(args, "arg");
    match operands(value, other) {
        Some((a, b)) => Ok(float_value(a - b)),
        None => fallback("subtract1", value, other, Value::String(String::new())),
    }
}

/// `mul(arg)`: `value * arg` as floats.
pub fn mul(value: &Value, args: &HashMap<String, Value>) -> Result<Value> {
    product("mul", value, arg(args, "arg"))
}

/// `multiply(arg)`: same as `mul`.
pub fn multiply(value: &Value, args: &HashMap<String, Value>) -> Result<Value> {
    product("multiply", value, arg(args, "arg"))
}

/// `calculate_value(cost)`: line value of `quantity * cost`.
pub fn calculate_value(quantity: &Value, args: &HashMap<String, Value>) -> Result<Value> {
    product("calculate_value", quantity, arg(args, "cost"))
}

fn product(name: &str, value: &Value, other: &Value) -> Result<Value> {
    match operands(value, other) {
        Some((a, b)) => Ok(float_value(a * b)),
        None => fallback(name, value, other, Value::from(0)),
    }
}

/// `div(arg)`: `value / arg` as floats; `0` for a falsy or zero divisor.
pub fn div(value: &Value, args: &HashMap<String, Value>) -> Result<Value> {
    let other = arg(args, "arg");
    if !is_truthy(other) {
        return Ok(Value::from(0));
    }
    match operands(value, other) {
        Some((_, b)) if b == 0.0 => Ok(Value::from(0)),
        Some((a, b)) => Ok(float_value(a / b)),
        None => fallback("div", value, other, Value::from(0)),
    }
}

/// `increment`: `value + 1`. Non-numeric input fails the render.
pub fn increment(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return i
                    .checked_add(1)
                    .map(Value::from)
                    .ok_or_else(|| tera::Error::msg("increment filter overflowed"));
            }
            match n.as_f64() {
                Some(f) => Ok(float_value(f + 1.0)),
                None => Err(tera::Error::msg("increment filter expects a number")),
            }
        }
        other => Err(tera::Error::msg(format!(
            "increment filter expects a number, got {other}"
        ))),
    }
}
