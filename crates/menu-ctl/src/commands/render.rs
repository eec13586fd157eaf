//! Template rendering with the filter catalog.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use menu_filters::{FilterConfig, FilterContext, TemplateEngine};
use serde_json::Value;

use crate::output;

pub(crate) fn render(
    config: &FilterConfig,
    template: &str,
    context_file: Option<&Path>,
    template_dir: Option<&Path>,
) -> Result<()> {
    let dir: PathBuf = template_dir
        .map(Path::to_path_buf)
        .or_else(|| config.template_dir.clone())
        .ok_or_else(|| anyhow!("no template directory (pass --template-dir or set `template-dir`)"))?;

    let filters = build_filter_context(config);
    let engine = TemplateEngine::load(&dir, &filters)?;

    let context = match context_file {
        Some(path) => read_context(path)?,
        None => Value::Object(Default::default()),
    };

    let rendered = engine.render(template, &context)?;
    output::plain(rendered);
    output::success(format!("Rendered {template}"));
    Ok(())
}

/// Filters with the configured key when there is one. Pages that never call
/// `enc` / `dec` render without a key.
fn build_filter_context(config: &FilterConfig) -> FilterContext {
    let filters = FilterContext::new();
    match config.cipher() {
        Ok(cipher) => filters.with_cipher(cipher),
        Err(e) => {
            tracing::debug!(error = %e, "Rendering without an encryption key");
            filters
        }
    }
}

fn read_context(path: &Path) -> Result<Value> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read context file {}", path.display()))?;
    let value: Value = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse context file {}", path.display()))?;
    if !value.is_object() {
        return Err(anyhow!("context file {} must hold a JSON object", path.display()));
    }
    Ok(value)
}
