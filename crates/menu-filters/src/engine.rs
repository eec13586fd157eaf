//! Tera-based page rendering with the filter catalog registered.

use std::path::Path;

use tera::{Context, Tera, Value};

use crate::filters::{register_filters, FilterContext};
use crate::loader::{load_templates_from_dir, LoaderError};

const INLINE_TEMPLATE: &str = "__inline__";

/// Template engine wrapping Tera with every MenuManager filter installed.
#[derive(Debug)]
pub struct TemplateEngine {
    tera: Tera,
}

impl TemplateEngine {
    /// Load a template engine from a template directory.
    pub fn load(template_dir: &Path, filters: &FilterContext) -> Result<Self, EngineError> {
        let mut tera = load_templates_from_dir(template_dir)?;
        register_filters(&mut tera, filters);
        Ok(Self { tera })
    }

    /// An engine with no templates, for rendering inline sources.
    pub fn inline(filters: &FilterContext) -> Self {
        let mut tera = Tera::default();
        register_filters(&mut tera, filters);
        Self { tera }
    }

    /// Names of the loaded templates.
    pub fn template_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tera.get_template_names().collect();
        names.sort_unstable();
        names
    }

    /// Render a loaded template against a JSON object context.
    pub fn render(&self, template: &str, context: &Value) -> Result<String, EngineError> {
        let context = to_context(context)?;
        self.tera
            .render(template, &context)
            .map_err(|e| EngineError::Render {
                template: template.to_string(),
                source: e,
            })
    }

    /// Render a template source string against a JSON object context.
    pub fn render_str(&self, source: &str, context: &Value) -> Result<String, EngineError> {
        let context = to_context(context)?;
        // Use a cloned Tera instance so loaded templates stay available to
        // `include` / `extends` in the inline source.
        let mut inline = self.tera.clone();
        inline
            .add_raw_template(INLINE_TEMPLATE, source)
            .map_err(|e| EngineError::Render {
                template: source.to_string(),
                source: e,
            })?;
        inline
            .render(INLINE_TEMPLATE, &context)
            .map_err(|e| EngineError::Render {
                template: source.to_string(),
                source: e,
            })
    }
}

fn to_context(value: &Value) -> Result<Context, EngineError> {
    if !value.is_object() {
        return Err(EngineError::Context(format!(
            "context must be a JSON object, got {value}"
        )));
    }
    Context::from_value(value.clone()).map_err(|e| EngineError::Context(e.to_string()))
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("template load error: {0}")]
    Load(#[from] LoaderError),
    #[error("invalid render context: {0}")]
    Context(String),
    #[error("render error for '{template}': {source}")]
    Render {
        template: String,
        source: tera::Error,
    },
}
