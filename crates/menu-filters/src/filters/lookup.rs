//! Filters that resolve a value through a mapping or an injected collaborator.

use std::collections::HashMap;

use tera::{Result, Value};

use crate::crypto::FieldCipher;
use crate::locale::LocaleRegistry;
use crate::suppliers::SupplierSource;
use crate::value::{arg, display_string};

/// `get_item(key)`: `dictionary[str(key)]`, or `null`.
pub fn get_item(dictionary: &Value, args: &HashMap<String, Value>) -> Result<Value> {
    let key = display_string(arg(args, "key"));
    Ok(dictionary
        .as_object()
        .and_then(|obj| obj.get(&key))
        .cloned()
        .unwrap_or(Value::Null))
}

pub(crate) fn enc(cipher: &FieldCipher, value: &Value) -> Result<Value> {
    let token = cipher
        .encrypt(&display_string(value))
        .map_err(|e| tera::Error::chain("enc filter failed", e))?;
    Ok(Value::String(token))
}

pub(crate) fn dec(cipher: &FieldCipher, value: &Value) -> Result<Value> {
    let token = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("dec filter expects a string"))?;
    let plaintext = cipher.decrypt(token).map_err(|e| {
        tracing::warn!(error = %e, "Rejected encrypted parameter");
        tera::Error::chain("dec filter failed", e)
    })?;
    Ok(Value::String(plaintext))
}

pub(crate) fn language_name(locales: &dyn LocaleRegistry, value: &Value) -> Value {
    value
        .as_str()
        .and_then(|code| locales.name_local(code))
        .map(Value::String)
        .unwrap_or_else(|| value.clone())
}

pub(crate) fn get_lowest_cost_supplier(
    suppliers: &dyn SupplierSource,
    component: &Value,
) -> Result<Value> {
    let supplier = suppliers
        .lowest_cost_supplier(component)
        .map_err(|e| tera::Error::chain("get_lowest_cost_supplier filter failed", e))?;
    Ok(supplier.unwrap_or(Value::Null))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::KEY_LEN;
    use crate::locale::BuiltinLocales;
    use crate::suppliers::{EmbeddedSuppliers, SupplierError};
    use serde_json::json;

    #[test]
    fn test_get_item_stringifies_key() {
        let dict = json!({"1": "one", "two": 2});
        let mut args = HashMap::new();
        args.insert("key".to_string(), json!(1));
        assert_eq!(get_item(&dict, &args).unwrap(), json!("one"));
        args.insert("key".to_string(), json!("two"));
        assert_eq!(get_item(&dict, &args).unwrap(), json!(2));
        args.insert("key".to_string(), json!("three"));
        assert_eq!(get_item(&dict, &args).unwrap(), Value::Null);
        assert_eq!(get_item(&json!([1]), &args).unwrap(), Value::Null);
    }

    #[test]
    fn test_enc_dec_filters() {
        let cipher = FieldCipher::new(&[3u8; KEY_LEN]);
        let token = enc(&cipher, &json!(42)).unwrap();
        assert_eq!(dec(&cipher, &token).unwrap(), json!("42"));
    }

    #[test]
    fn test_dec_propagates_errors() {
        let cipher = FieldCipher::new(&[3u8; KEY_LEN]);
        assert!(dec(&cipher, &json!("not-valid-base64")).is_err());
        assert!(dec(&cipher, &json!(5)).is_err());
    }

    #[test]
    fn test_language_name() {
        assert_eq!(language_name(&BuiltinLocales, &json!("it")), json!("italiano"));
        assert_eq!(language_name(&BuiltinLocales, &json!("qq")), json!("qq"));
        assert_eq!(language_name(&BuiltinLocales, &json!(null)), json!(null));
    }

    #[derive(Debug)]
    struct DownStore;

    impl SupplierSource for DownStore {
        fn lowest_cost_supplier(&self, _component: &Value) -> std::result::Result<Option<Value>, SupplierError> {
            Err(SupplierError::Unavailable("connection refused".to_string()))
        }
    }

    #[test]
    fn test_supplier_lookup() {
        let component = json!({"suppliers": [{"name": "A", "is_approved": true, "cost": 1}]});
        assert_eq!(
            get_lowest_cost_supplier(&EmbeddedSuppliers, &component).unwrap()["name"],
            "A"
        );
        assert_eq!(
            get_lowest_cost_supplier(&EmbeddedSuppliers, &json!({})).unwrap(),
            Value::Null
        );
        assert!(get_lowest_cost_supplier(&DownStore, &component).is_err());
    }
}
