//! Filters that reshape or query lists.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde_json::Map;
use tera::{Result, Value};

use crate::value::{arg, as_float, display_string, is_truthy};

const CHUNK_SIZE: usize = 4;

/// `in_list(arg)`: whether the number is in a comma-separated list of
/// integers such as `"1,4,9"`. An unparseable list yields `false`.
pub fn in_list(value: &Value, args: &HashMap<String, Value>) -> Result<Value> {
    let list = match arg(args, "arg").as_str() {
        Some(s) => s,
        None => return Ok(Value::Bool(false)),
    };
    let members: Option<Vec<i64>> = list.split(',').map(|i| i.trim().parse().ok()).collect();
    let Some(members) = members else {
        tracing::trace!(list, "in_list: list is not all integers");
        return Ok(Value::Bool(false));
    };

    let found = match value {
        Value::Number(n) => n
            .as_f64()
            .is_some_and(|needle| members.iter().any(|&m| m as f64 == needle)),
        Value::Bool(b) => members.contains(&i64::from(*b)),
        _ => false,
    };
    Ok(Value::Bool(found))
}

/// `in_pairs`: split a list into consecutive groups of four (the last group
/// may be shorter). Strings split into four-character strings.
pub fn in_pairs(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    let groups = match value {
        Value::Array(items) => items
            .chunks(CHUNK_SIZE)
            .map(|chunk| Value::Array(chunk.to_vec()))
            .collect(),
        Value::String(s) => {
            let chars: Vec<char> = s.chars().collect();
            chars
                .chunks(CHUNK_SIZE)
                .map(|chunk| Value::String(chunk.iter().collect()))
                .collect()
        }
        _ => Vec::new(),
    };
    Ok(Value::Array(groups))
}

/// `zip_lists(list2)`: positional `[a, b]` pairs, as many as the shorter list.
pub fn zip_lists(value: &Value, args: &HashMap<String, Value>) -> Result<Value> {
    let pairs = match (value.as_array(), arg(args, "list2").as_array()) {
        (Some(left), Some(right)) => left
            .iter()
            .zip(right)
            .map(|(a, b)| Value::Array(vec![a.clone(), b.clone()]))
            .collect(),
        _ => Vec::new(),
    };
    Ok(Value::Array(pairs))
}

/// `index(position)`: the element at `position`, counting from the end when
/// negative; `null` when out of range.
pub fn index(sequence: &Value, args: &HashMap<String, Value>) -> Result<Value> {
    let Some(position) = arg(args, "position").as_i64() else {
        return Ok(Value::Null);
    };

    let resolve = |len: usize| -> Option<usize> {
        if position >= 0 {
            usize::try_from(position).ok().filter(|&p| p < len)
        } else {
            let back = usize::try_from(position.unsigned_abs()).ok()?;
            len.checked_sub(back)
        }
    };

    let item = match sequence {
        Value::Array(items) => resolve(items.len()).and_then(|i| items.get(i)).cloned(),
        Value::String(s) => {
            let chars: Vec<char> = s.chars().collect();
            resolve(chars.len()).map(|i| Value::String(chars[i].to_string()))
        }
        _ => None,
    };
    Ok(item.unwrap_or(Value::Null))
}

/// `map(key)`: the `key` of every object that has one.
pub fn map(attribute_list: &Value, args: &HashMap<String, Value>) -> Result<Value> {
    let key = display_string(arg(args, "key"));
    let values = attribute_list
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_object()?.get(&key).cloned())
                .collect()
        })
        .unwrap_or_default();
    Ok(Value::Array(values))
}

/// `filter_by_status(status)`: the objects whose `status` equals `status`.
pub fn filter_by_status(items: &Value, args: &HashMap<String, Value>) -> Result<Value> {
    let status = arg(args, "status");
    let kept = items
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter(|item| item.get("status") == Some(status))
                .cloned()
                .collect()
        })
        .unwrap_or_default();
    Ok(Value::Array(kept))
}

/// One dotted `sort_order` component, held as its decimal digits so
/// components of any length compare numerically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OrderPart {
    negative: bool,
    digits: String,
}

impl OrderPart {
    fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let (negative, unsigned) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };
        if unsigned.is_empty() || !unsigned.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let digits = unsigned.trim_start_matches('0').to_string();
        Some(Self {
            negative: negative && !digits.is_empty(),
            digits,
        })
    }
}

impl Ord for OrderPart {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.negative, other.negative) {
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
            (negative, _) => {
                let magnitude = self
                    .digits
                    .len()
                    .cmp(&other.digits.len())
                    .then_with(|| self.digits.cmp(&other.digits));
                if negative {
                    magnitude.reverse()
                } else {
                    magnitude
                }
            }
        }
    }
}

impl PartialOrd for OrderPart {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Version-like key from a dotted `sort_order` ("1.10.2" -> [1, 10, 2]).
/// Missing or malformed values map to the empty key.
pub(crate) fn sort_order_key(item: &Value) -> Vec<OrderPart> {
    item.get("sort_order")
        .and_then(Value::as_str)
        .and_then(|order| order.split('.').map(OrderPart::parse).collect())
        .unwrap_or_default()
}

/// `natural_sort`: stable sort by `sort_order`, comparing dotted components
/// as integers. Items without a valid `sort_order` come first.
pub fn natural_sort(items: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    let Some(items) = items.as_array() else {
        return Ok(items.clone());
    };
    let mut keyed: Vec<(Vec<OrderPart>, &Value)> =
        items.iter().map(|item| (sort_order_key(item), item)).collect();
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(Value::Array(
        keyed.into_iter().map(|(_, item)| item.clone()).collect(),
    ))
}

/// Total order over group keys: numbers (numerically) before strings
/// (lexically) before anything else (by JSON text).
fn compare_keys(a: &Value, b: &Value) -> Ordering {
    fn rank(v: &Value) -> u8 {
        match v {
            Value::Bool(_) | Value::Number(_) => 0,
            Value::String(_) => 1,
            _ => 2,
        }
    }
    match rank(a).cmp(&rank(b)) {
        Ordering::Equal => {}
        other => return other,
    }
    match (a, b) {
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ if rank(a) == 0 => {
            let x = as_float(a).unwrap_or(0.0);
            let y = as_float(b).unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        _ => a.to_string().cmp(&b.to_string()),
    }
}

/// Object key for a group. Integral floats print as integers so `1` and
/// `1.0` share a key.
fn group_key(kind: &Value) -> String {
    if let Value::Number(n) = kind {
        if !n.is_i64() && !n.is_u64() {
            if let Some(f) = n.as_f64() {
                if f.fract() == 0.0 && f.abs() < 9.0e15 {
                    return format!("{}", f as i64);
                }
            }
        }
    }
    display_string(kind)
}

/// `groupby_type`: items with a truthy `type`, grouped by it into an ordered
/// mapping `type -> [items]`, keys ascending.
///
/// Consecutive equal types (after sorting) form one group, so `1` and `1.0`
/// merge. A group whose key text is already taken by an unequal type (the
/// string `"1"` after the number `1`) is keyed by its JSON text instead.
///
/// Use as `{% for type, group in items | groupby_type %}`.
pub fn groupby_type(items: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    let Some(items) = items.as_array() else {
        return Ok(Value::Object(Map::new()));
    };

    let mut typed: Vec<(&Value, &Value)> = items
        .iter()
        .filter_map(|item| {
            let kind = item.get("type")?;
            is_truthy(kind).then_some((kind, item))
        })
        .collect();
    typed.sort_by(|a, b| compare_keys(a.0, b.0));

    let mut groups = Map::new();
    let mut current: Option<(&Value, String)> = None;
    for (kind, item) in typed {
        let same_group =
            matches!(&current, Some((first, _)) if compare_keys(first, kind) == Ordering::Equal);
        if !same_group {
            let mut key = group_key(kind);
            if groups.contains_key(&key) {
                key = kind.to_string();
            }
            groups.insert(key.clone(), Value::Array(Vec::new()));
            current = Some((kind, key));
        }
        if let Some((_, key)) = &current {
            if let Some(Value::Array(group)) = groups.get_mut(key) {
                group.push(item.clone());
            }
        }
    }
    Ok(Value::Object(groups))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    type Filter = fn(&Value, &HashMap<String, Value>) -> Result<Value>;

    fn apply(filter: Filter, value: Value) -> Value {
        filter(&value, &HashMap::new()).unwrap()
    }

    fn apply_with(filter: Filter, value: Value, name: &str, other: Value) -> Value {
        let mut args = HashMap::new();
        args.insert(name.to_string(), other);
        filter(&value, &args).unwrap()
    }

    #[test]
    fn test_in_list() {
        assert_eq!(apply_with(in_list, json!(3), "arg", json!("1,2,3")), json!(true));
        assert_eq!(apply_with(in_list, json!(4), "arg", json!("1, 2, 3")), json!(false));
        assert_eq!(apply_with(in_list, json!(2.0), "arg", json!("2")), json!(true));
        // The value is compared as a number, never as text.
        assert_eq!(apply_with(in_list, json!("3"), "arg", json!("3")), json!(false));
    }

    #[test]
    fn test_in_list_unparseable_is_false() {
        assert_eq!(apply_with(in_list, json!(1), "arg", json!("1,a")), json!(false));
        assert_eq!(apply_with(in_list, json!(1), "arg", json!("")), json!(false));
        assert_eq!(apply_with(in_list, json!(1), "arg", json!(1)), json!(false));
        assert_eq!(apply(in_list, json!(1)), json!(false));
    }

    #[test]
    fn test_in_pairs_groups_of_four() {
        assert_eq!(
            apply(in_pairs, json!([1, 2, 3, 4, 5, 6, 7])),
            json!([[1, 2, 3, 4], [5, 6, 7]])
        );
        assert_eq!(apply(in_pairs, json!([])), json!([]));
        assert_eq!(apply(in_pairs, json!("abcdef")), json!(["abcd", "ef"]));
        assert_eq!(apply(in_pairs, json!(null)), json!([]));
    }

    #[test]
    fn test_zip_lists_stops_at_shorter() {
        assert_eq!(
            apply_with(zip_lists, json!([1, 2]), "list2", json!([3, 4, 5])),
            json!([[1, 3], [2, 4]])
        );
        assert_eq!(
            apply_with(zip_lists, json!([1, 2, 3]), "list2", json!(["a"])),
            json!([[1, "a"]])
        );
        assert_eq!(apply_with(zip_lists, json!([1]), "list2", json!(null)), json!([]));
    }

    #[test]
    fn test_index() {
        let seq = json!(["a", "b", "c"]);
        assert_eq!(apply_with(index, seq.clone(), "position", json!(1)), json!("b"));
        assert_eq!(apply_with(index, seq.clone(), "position", json!(-1)), json!("c"));
        assert_eq!(apply_with(index, seq.clone(), "position", json!(3)), Value::Null);
        assert_eq!(apply_with(index, seq.clone(), "position", json!(-4)), Value::Null);
        assert_eq!(apply_with(index, seq, "position", json!("x")), Value::Null);
        assert_eq!(apply_with(index, json!("xyz"), "position", json!(0)), json!("x"));
        assert_eq!(apply_with(index, json!(5), "position", json!(0)), Value::Null);
    }

    #[test]
    fn test_map_skips_missing_keys() {
        let rows = json!([{"name": "a", "v": 1}, {"v": 2}, {"name": "c"}, 7]);
        assert_eq!(apply_with(map, rows, "key", json!("name")), json!(["a", "c"]));
        assert_eq!(apply_with(map, json!(null), "key", json!("name")), json!([]));
    }

    #[test]
    fn test_filter_by_status() {
        let items = json!([
            {"id": 1, "status": "active"},
            {"id": 2, "status": "retired"},
            {"id": 3},
            {"id": 4, "status": "active"}
        ]);
        assert_eq!(
            apply_with(filter_by_status, items, "status", json!("active")),
            json!([{"id": 1, "status": "active"}, {"id": 4, "status": "active"}])
        );
    }

    #[test]
    fn test_natural_sort_compares_components_numerically() {
        let items = json!([
            {"sort_order": "1.2"},
            {"sort_order": "1.10"},
            {"sort_order": "1.3"}
        ]);
        assert_eq!(
            apply(natural_sort, items),
            json!([{"sort_order": "1.2"}, {"sort_order": "1.3"}, {"sort_order": "1.10"}])
        );
    }

    #[test]
    fn test_natural_sort_puts_malformed_first_and_is_stable() {
        let items = json!([
            {"id": "a", "sort_order": "2"},
            {"id": "b", "sort_order": "x.1"},
            {"id": "c"},
            {"id": "d", "sort_order": "1.0.1"},
            {"id": "e", "sort_order": "1"}
        ]);
        let sorted = apply(natural_sort, items);
        let ids: Vec<_> = sorted
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, ["b", "c", "e", "d", "a"]);
    }

    #[test]
    fn test_groupby_type_materializes_ordered_groups() {
        let items = json!([
            {"name": "soup", "type": "starter"},
            {"name": "steak", "type": "main"},
            {"name": "water", "type": ""},
            {"name": "salad", "type": "starter"},
            {"name": "bread"},
            {"name": "fish", "type": "main"}
        ]);
        let grouped = apply(groupby_type, items);
        let obj = grouped.as_object().unwrap();
        let keys: Vec<_> = obj.keys().map(String::as_str).collect();
        assert_eq!(keys, ["main", "starter"]);
        assert_eq!(
            obj["main"],
            json!([{"name": "steak", "type": "main"}, {"name": "fish", "type": "main"}])
        );
        assert_eq!(obj["starter"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_groupby_type_orders_numeric_keys_numerically() {
        let items = json!([{"type": 10}, {"type": 9}, {"type": 0}, {"type": 10}]);
        let grouped = apply(groupby_type, items);
        let keys: Vec<_> = grouped.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["9", "10"]);
    }

    #[test]
    fn test_groupby_type_merges_equal_numbers_and_splits_strings() {
        let items = json!([
            {"id": "a", "type": 1},
            {"id": "b", "type": "b"},
            {"id": "c", "type": "1"},
            {"id": "d", "type": 1.0}
        ]);
        let grouped = apply(groupby_type, items);
        assert_eq!(
            grouped,
            json!({
                "1": [{"id": "a", "type": 1}, {"id": "d", "type": 1.0}],
                "\"1\"": [{"id": "c", "type": "1"}],
                "b": [{"id": "b", "type": "b"}]
            })
        );
        let keys: Vec<_> = grouped.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["1", "\"1\"", "b"]);
    }

    #[test]
    fn test_natural_sort_handles_components_beyond_i64() {
        let items = json!([
            {"id": "huge", "sort_order": "1.99999999999999999999"},
            {"id": "ten", "sort_order": "1.10"},
            {"id": "big", "sort_order": "99999999999999999999"},
            {"id": "two", "sort_order": "2"},
            {"id": "neg", "sort_order": "-1"},
            {"id": "padded", "sort_order": "1.009"}
        ]);
        let sorted = apply(natural_sort, items);
        let ids: Vec<_> = sorted
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, ["neg", "padded", "ten", "huge", "two", "big"]);
    }
}
