//! Text shaping filters.

use std::collections::HashMap;

use tera::{Result, Value};

use crate::value::{as_int, display_string};

const DEFAULT_LONG_TEXT: i64 = 50;
const DEFAULT_TRUNCATE: i64 = 50;
const ELLIPSIS: &str = "...";

/// `is_long_text(length=50)`: whether the text (or list) is longer than
/// `length`. Values without a length are never long.
pub fn is_long_text(value: &Value, args: &HashMap<String, Value>) -> Result<Value> {
    let limit = args
        .get("length")
        .and_then(as_int)
        .unwrap_or(DEFAULT_LONG_TEXT);
    let len = match value {
        Value::String(s) => s.chars().count(),
        Value::Array(a) => a.len(),
        Value::Object(o) => o.len(),
        _ => return Ok(Value::Bool(false)),
    };
    Ok(Value::Bool(i64::try_from(len).unwrap_or(i64::MAX) > limit))
}

/// `replace_spaces`: drop every space character. Non-strings pass through.
pub fn replace_spaces(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    match value.as_str() {
        Some(s) => Ok(Value::String(s.replace(' ', ""))),
        None => Ok(value.clone()),
    }
}

/// `custom_truncate(arg=50)`: cut to `arg` characters and append `...` when
/// anything was cut.
///
/// `null` renders as `""`. When `arg` is not an integer the value is returned
/// untouched. A negative `arg` drops that many characters from the end.
pub fn custom_truncate(value: &Value, args: &HashMap<String, Value>) -> Result<Value> {
    if value.is_null() {
        return Ok(Value::String(String::new()));
    }

    let length = match args.get("arg") {
        None => DEFAULT_TRUNCATE,
        Some(raw) => match as_int(raw) {
            Some(length) => length,
            None => {
                tracing::trace!(%raw, "custom_truncate: length is not an integer");
                return Ok(value.clone());
            }
        },
    };

    let text = display_string(value);
    let count = text.chars().count();
    let keep = if length >= 0 {
        usize::try_from(length).unwrap_or(usize::MAX)
    } else {
        count.saturating_sub(usize::try_from(length.unsigned_abs()).unwrap_or(usize::MAX))
    };

    if i64::try_from(count).unwrap_or(i64::MAX) > length {
        let mut truncated: String = text.chars().take(keep).collect();
        truncated.push_str(ELLIPSIS);
        Ok(Value::String(truncated))
    } else {
        Ok(Value::String(text))
    }
}
