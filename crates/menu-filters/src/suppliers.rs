//! Supplier lookup backing the `get_lowest_cost_supplier` filter.
//!
//! A supplier record is a JSON object with at least `is_approved` and `cost`.
//! Among approved suppliers the lowest `cost` wins; ties keep the first record
//! in source order.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::RwLock;

use tera::Value;

use crate::value::{as_float, display_string};

/// Where the approved suppliers of a component come from.
pub trait SupplierSource: Send + Sync + std::fmt::Debug {
    /// The cheapest approved supplier for `component`, or `None`.
    fn lowest_cost_supplier(&self, component: &Value) -> Result<Option<Value>, SupplierError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SupplierError {
    #[error("component has no usable id: {0}")]
    MissingComponentId(String),
    #[error("supplier store unavailable: {0}")]
    Unavailable(String),
}

/// Pick the cheapest approved record. Records whose cost is missing or not
/// numeric rank after every priced record.
pub(crate) fn cheapest_approved<'a>(suppliers: impl IntoIterator<Item = &'a Value>) -> Option<&'a Value> {
    let mut best: Option<(&Value, Option<f64>)> = None;
    for supplier in suppliers {
        if supplier.get("is_approved") != Some(&Value::Bool(true)) {
            continue;
        }
        let cost = supplier.get("cost").and_then(as_float);
        let replace = match &best {
            None => true,
            Some((_, best_cost)) => compare_cost(cost, *best_cost) == Ordering::Less,
        };
        if replace {
            best = Some((supplier, cost));
        }
    }
    best.map(|(supplier, _)| supplier)
}

fn compare_cost(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Reads the suppliers embedded in the component itself (`component.suppliers`),
/// the shape a page context has when the relation was loaded up front.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddedSuppliers;

impl SupplierSource for EmbeddedSuppliers {
    fn lowest_cost_supplier(&self, component: &Value) -> Result<Option<Value>, SupplierError> {
        let suppliers = match component.get("suppliers").and_then(Value::as_array) {
            Some(s) => s,
            None => return Ok(None),
        };
        Ok(cheapest_approved(suppliers).cloned())
    }
}

/// Suppliers held in memory, keyed by component id.
///
/// The component passed to the filter may be the id itself or an object with
/// an `id` key.
#[derive(Debug, Default)]
pub struct InMemorySupplierStore {
    by_component: RwLock<HashMap<String, Vec<Value>>>,
}

impl InMemorySupplierStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a supplier record for a component.
    pub fn insert(&self, component_id: impl Into<String>, supplier: Value) {
        let mut map = self
            .by_component
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        map.entry(component_id.into()).or_default().push(supplier);
    }

    fn component_id(component: &Value) -> Result<String, SupplierError> {
        let id = match component {
            Value::Object(obj) => obj.get("id").unwrap_or(&Value::Null),
            other => other,
        };
        match id {
            Value::String(_) | Value::Number(_) => Ok(display_string(id)),
            other => Err(SupplierError::MissingComponentId(other.to_string())),
        }
    }
}

impl SupplierSource for InMemorySupplierStore {
    fn lowest_cost_supplier(&self, component: &Value) -> Result<Option<Value>, SupplierError> {
        let id = Self::component_id(component)?;
        let map = self
            .by_component
            .read()
            .map_err(|_| SupplierError::Unavailable("supplier map lock poisoned".to_string()))?;
        Ok(map
            .get(&id)
            .and_then(|suppliers| cheapest_approved(suppliers.iter()))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn component() -> Value {
        json!({
            "id": 7,
            "suppliers": [
                {"name": "Acme", "is_approved": true, "cost": 12.5},
                {"name": "Budget", "is_approved": false, "cost": 1.0},
                {"name": "Bulk", "is_approved": true, "cost": "9.75"},
                {"name": "Same", "is_approved": true, "cost": 9.75}
            ]
        })
    }

    #[test]
    fn test_embedded_picks_cheapest_approved() {
        let best = EmbeddedSuppliers
            .lowest_cost_supplier(&component())
            .unwrap()
            .unwrap();
        assert_eq!(best["name"], "Bulk");
    }

    #[test]
    fn test_embedded_without_approved_suppliers() {
        let c = json!({"suppliers": [{"name": "x", "is_approved": false, "cost": 1}]});
        assert!(EmbeddedSuppliers.lowest_cost_supplier(&c).unwrap().is_none());
        assert!(EmbeddedSuppliers
            .lowest_cost_supplier(&json!({"name": "bare"}))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_unpriced_suppliers_rank_last() {
        let records = [
            json!({"name": "unpriced", "is_approved": true}),
            json!({"name": "priced", "is_approved": true, "cost": 100}),
        ];
        assert_eq!(cheapest_approved(records.iter()).unwrap()["name"], "priced");
    }

    #[test]
    fn test_in_memory_store_by_id_or_object() {
        let store = InMemorySupplierStore::new();
        store.insert("7", json!({"name": "A", "is_approved": true, "cost": 3}));
        store.insert("7", json!({"name": "B", "is_approved": true, "cost": 2}));

        let by_object = store.lowest_cost_supplier(&json!({"id": 7})).unwrap();
        assert_eq!(by_object.unwrap()["name"], "B");

        let by_id = store.lowest_cost_supplier(&json!("7")).unwrap();
        assert_eq!(by_id.unwrap()["name"], "B");

        assert!(store.lowest_cost_supplier(&json!(8)).unwrap().is_none());
    }

    #[test]
    fn test_in_memory_store_rejects_component_without_id() {
        let store = InMemorySupplierStore::new();
        let err = store.lowest_cost_supplier(&json!({"name": "no id"})).unwrap_err();
        assert!(matches!(err, SupplierError::MissingComponentId(_)));
    }
}
