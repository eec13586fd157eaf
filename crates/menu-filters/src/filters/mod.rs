//! The filter catalog.
//!
//! Stateless filters are plain functions with Tera's filter signature. The
//! filters that need a collaborator (`enc`, `dec`, `language_name`,
//! `get_lowest_cost_supplier`) are closures over the shared handles in
//! [`FilterContext`].

mod coerce;
mod lookup;
mod numeric;
mod sequence;
mod temporal;
mod text;

use std::collections::HashMap;
use std::sync::Arc;

use tera::{Tera, Value};

use crate::crypto::FieldCipher;
use crate::locale::{BuiltinLocales, LocaleRegistry};
use crate::suppliers::{EmbeddedSuppliers, SupplierSource};

pub use coerce::{to_int, to_str};
pub use lookup::get_item;
pub use numeric::{calculate_value, div, increment, mul, multiply, subtract, subtract1};
pub use sequence::{
    filter_by_status, groupby_type, in_list, in_pairs, index, map, natural_sort, zip_lists,
};
pub use temporal::{days_left, duration_format, format_hms};
pub use text::{custom_truncate, is_long_text, replace_spaces};

/// Every filter name [`register_filters`] installs.
pub const FILTER_NAMES: &[&str] = &[
    "to_int",
    "to_str",
    "in_list",
    "in_pairs",
    "replace_spaces",
    "is_long_text",
    "zip_lists",
    "index",
    "map",
    "enc",
    "dec",
    "subtract",
    "filter_by_status",
    "natural_sort",
    "subtract1",
    "duration_format",
    "mul",
    "get_lowest_cost_supplier",
    "calculate_value",
    "multiply",
    "language_name",
    "groupby_type",
    "increment",
    "custom_truncate",
    "days_left",
    "get_item",
    "div",
];

/// Collaborators for the filters that are not pure functions of their input.
#[derive(Debug, Clone)]
pub struct FilterContext {
    cipher: Option<Arc<FieldCipher>>,
    locales: Arc<dyn LocaleRegistry>,
    suppliers: Arc<dyn SupplierSource>,
}

impl Default for FilterContext {
    fn default() -> Self {
        Self {
            cipher: None,
            locales: Arc::new(BuiltinLocales),
            suppliers: Arc::new(EmbeddedSuppliers),
        }
    }
}

impl FilterContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key the `enc` / `dec` filters. Without a cipher both filters fail.
    pub fn with_cipher(mut self, cipher: FieldCipher) -> Self {
        self.cipher = Some(Arc::new(cipher));
        self
    }

    pub fn with_locales(mut self, locales: impl LocaleRegistry + 'static) -> Self {
        self.locales = Arc::new(locales);
        self
    }

    pub fn with_suppliers(mut self, suppliers: Arc<dyn SupplierSource>) -> Self {
        self.suppliers = suppliers;
        self
    }
}

/// Install the whole catalog on a Tera instance, replacing any built-in
/// filter of the same name (Tera's own `map` included).
pub fn register_filters(tera: &mut Tera, ctx: &FilterContext) {
    tera.register_filter("to_int", to_int);
    tera.register_filter("to_str", to_str);
    tera.register_filter("in_list", in_list);
    tera.register_filter("in_pairs", in_pairs);
    tera.register_filter("replace_spaces", replace_spaces);
    tera.register_filter("is_long_text", is_long_text);
    tera.register_filter("zip_lists", zip_lists);
    tera.register_filter("index", index);
    tera.register_filter("map", map);
    tera.register_filter("subtract", subtract);
    tera.register_filter("filter_by_status", filter_by_status);
    tera.register_filter("natural_sort", natural_sort);
    tera.register_filter("subtract1", subtract1);
    tera.register_filter("duration_format", duration_format);
    tera.register_filter("mul", mul);
    tera.register_filter("calculate_value", calculate_value);
    tera.register_filter("multiply", multiply);
    tera.register_filter("groupby_type", groupby_type);
    tera.register_filter("increment", increment);
    tera.register_filter("custom_truncate", custom_truncate);
    tera.register_filter("days_left", days_left);
    tera.register_filter("get_item", get_item);
    tera.register_filter("div", div);

    let cipher = ctx.cipher.clone();
    tera.register_filter(
        "enc",
        move |value: &Value, _args: &HashMap<String, Value>| match &cipher {
            Some(cipher) => lookup::enc(cipher, value),
            None => Err(tera::Error::msg("enc filter requires an encryption key")),
        },
    );

    let cipher = ctx.cipher.clone();
    tera.register_filter(
        "dec",
        move |value: &Value, _args: &HashMap<String, Value>| match &cipher {
            Some(cipher) => lookup::dec(cipher, value),
            None => Err(tera::Error::msg("dec filter requires an encryption key")),
        },
    );

    let locales = Arc::clone(&ctx.locales);
    tera.register_filter(
        "language_name",
        move |value: &Value, _args: &HashMap<String, Value>| {
            Ok(lookup::language_name(locales.as_ref(), value))
        },
    );

    let suppliers = Arc::clone(&ctx.suppliers);
    tera.register_filter(
        "get_lowest_cost_supplier",
        move |value: &Value, _args: &HashMap<String, Value>| {
            lookup::get_lowest_cost_supplier(suppliers.as_ref(), value)
        },
    );

    tracing::debug!(count = FILTER_NAMES.len(), "Registered template filters");
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(tera: &mut Tera, source: &str, ctx: Value) -> tera::Result<String> {
        let context = tera::Context::from_value(ctx)?;
        tera.render_str(source, &context)
    }

    fn error_chain(err: &tera::Error) -> String {
        let mut text = err.to_string();
        let mut source = std::error::Error::source(err);
        while let Some(inner) = source {
            text.push_str(": ");
            text.push_str(&inner.to_string());
            source = inner.source();
        }
        text
    }

    #[test]
    fn test_every_listed_filter_is_registered() {
        let mut tera = Tera::default();
        register_filters(&mut tera, &FilterContext::new());
        for name in FILTER_NAMES {
            let source = format!("{{{{ x | {name} }}}}");
            // Some filters reject this input; only a missing filter matters here.
            if let Err(e) = render(&mut tera, &source, json!({"x": 1})) {
                let chain = error_chain(&e);
                assert!(!chain.contains("not found"), "filter {name}: {chain}");
            }
        }
    }

    #[test]
    fn test_enc_without_cipher_fails_render() {
        let mut tera = Tera::default();
        register_filters(&mut tera, &FilterContext::new());
        assert!(render(&mut tera, "{{ id | enc }}", json!({"id": "5"})).is_err());
    }

    #[test]
    fn test_custom_map_replaces_builtin() {
        let mut tera = Tera::default();
        register_filters(&mut tera, &FilterContext::new());
        let out = render(
            &mut tera,
            "{{ rows | map(key='name') | join(sep=',') }}",
            json!({"rows": [{"name": "a"}, {"other": 1}, {"name": "b"}]}),
        )
        .unwrap();
        assert_eq!(out, "a,b");
    }
}
