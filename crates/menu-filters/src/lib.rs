//! Tera template filters for MenuManager pages.
//!
//! Every filter transforms one template-bound value for display and absorbs bad
//! input by returning a neutral fallback, with two exceptions: `dec` and
//! `increment` surface their failures so the render aborts instead of showing a
//! wrong value.
//!
//! # Modules
//!
//! - [`filters`]: The filter catalog and [`filters::register_filters`]
//! - [`crypto`]: URL-safe parameter encryption backing `enc` / `dec`
//! - [`locale`]: Language display names backing `language_name`
//! - [`suppliers`]: Supplier lookup backing `get_lowest_cost_supplier`
//! - [`config`]: `.menu-filters.toml` discovery and environment overrides
//! - [`engine`]: Tera engine wrapper with the catalog pre-registered

pub mod config;
pub mod crypto;
pub mod engine;
pub mod filters;
pub mod locale;
pub mod suppliers;

mod loader;
mod value;

pub use config::{ConfigError, FilterConfig};
pub use crypto::{CipherError, FieldCipher};
pub use engine::{EngineError, TemplateEngine};
pub use filters::{register_filters, FilterContext, FILTER_NAMES};
pub use loader::LoaderError;
pub use locale::{BuiltinLocales, LocaleRegistry};
pub use suppliers::{EmbeddedSuppliers, InMemorySupplierStore, SupplierError, SupplierSource};
