//! Load page templates from a template directory.

use std::path::Path;

use tera::Tera;

const TEMPLATE_GLOB: &str = "**/*.{html,tera}";

/// Load every `.html` and `.tera` file under `template_dir` into one Tera
/// instance. Templates are registered by their path relative to the directory
/// (e.g. `menus/detail.html`).
pub(crate) fn load_templates_from_dir(template_dir: &Path) -> Result<Tera, LoaderError> {
    if !template_dir.is_dir() {
        return Err(LoaderError::NotADirectory(template_dir.to_path_buf()));
    }

    let glob_pattern = template_dir.join(TEMPLATE_GLOB).to_string_lossy().to_string();
    let tera = Tera::new(&glob_pattern).map_err(|e| LoaderError::Tera {
        dir: template_dir.to_path_buf(),
        source: e,
    })?;

    tracing::debug!(
        dir = %template_dir.display(),
        count = tera.get_template_names().count(),
        "Loaded templates"
    );
    Ok(tera)
}

#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    #[error("template directory {0} does not exist")]
    NotADirectory(std::path::PathBuf),
    #[error("failed to load templates from {dir}: {source}")]
    Tera {
        dir: std::path::PathBuf,
        source: tera::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_templates() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("menu.html"), "{{ title }}").unwrap();
        fs::create_dir(dir.path().join("partials")).unwrap();
        fs::write(
            dir.path().join("partials").join("row.tera"),
            "{{ item.name }}",
        )
        .unwrap();

        let tera = load_templates_from_dir(dir.path()).unwrap();
        let mut names: Vec<_> = tera.get_template_names().collect();
        names.sort_unstable();
        assert_eq!(names, ["menu.html", "partials/row.tera"]);
    }

    #[test]
    fn test_load_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        let tera = load_templates_from_dir(dir.path()).unwrap();
        assert_eq!(tera.get_template_names().count(), 0);
    }

    #[test]
    fn test_ignores_other_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("menu.html"), "{{ name }}").unwrap();
        fs::write(dir.path().join("README.md"), "# Not a template").unwrap();
        fs::write(dir.path().join(".menu-filters.toml"), "").unwrap();

        let tera = load_templates_from_dir(dir.path()).unwrap();
        assert_eq!(tera.get_template_names().count(), 1);
    }

    #[test]
    fn test_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_templates_from_dir(&dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, LoaderError::NotADirectory(_)));
    }
}
