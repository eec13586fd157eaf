//! Filter configuration from `.menu-filters.toml` and the environment.
//!
//! Checks two locations in precedence order:
//! 1. `./.menu-filters.toml` (project-local)
//! 2. `~/.config/menu-filters.toml` (user-global)
//!
//! `ENCRYPTION_KEY` (from the process environment or a `.env` file) overrides
//! the file's `encryption-key`.

use std::path::{Path, PathBuf};

use secrecy::SecretString;
use serde::Deserialize;

use crate::crypto::{CipherError, FieldCipher};

const CONFIG_FILENAME: &str = ".menu-filters.toml";
const GLOBAL_CONFIG_DIR: &str = ".config";
const GLOBAL_CONFIG_FILENAME: &str = "menu-filters.toml";

pub const ENCRYPTION_KEY_ENV: &str = "ENCRYPTION_KEY";

/// Settings shared by the filter catalog and the CLI.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct FilterConfig {
    /// URL-safe base64 key for `enc` / `dec` (see `menu-ctl keygen`).
    #[serde(default, deserialize_with = "deserialize_secret")]
    pub encryption_key: Option<SecretString>,

    /// Directory of `.html` / `.tera` templates to render.
    pub template_dir: Option<PathBuf>,
}

impl FilterConfig {
    /// Load from the first discovered config file, falling back to defaults,
    /// then apply environment overrides.
    pub fn load() -> Self {
        let mut config = match find_config_file() {
            Some(path) => match Self::from_file(&path) {
                Ok(config) => {
                    tracing::debug!(?path, "Loaded filter config");
                    config
                }
                Err(e) => {
                    tracing::warn!(?path, error = %e, "Ignoring unreadable filter config, using defaults");
                    Self::default()
                }
            },
            None => Self::default(),
        };
        config.apply_env();
        config
    }

    /// Load from an explicit path. Unlike [`FilterConfig::load`], a missing or
    /// malformed file is an error.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(path)?;
        config.apply_env();
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    fn apply_env(&mut self) {
        // A missing .env file is the normal case.
        let _ = dotenvy::dotenv();
        if let Ok(key) = std::env::var(ENCRYPTION_KEY_ENV) {
            if !key.trim().is_empty() {
                tracing::debug!("Using encryption key from {ENCRYPTION_KEY_ENV}");
                self.encryption_key = Some(SecretString::from(key));
            }
        }
    }

    /// Build the field cipher from the configured key.
    pub fn cipher(&self) -> Result<FieldCipher, ConfigError> {
        let key = self.encryption_key.as_ref().ok_or(ConfigError::MissingKey)?;
        Ok(FieldCipher::from_encoded_key(key)?)
    }
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(SecretString::from))
}

/// Search for config file in precedence order.
fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILENAME);
    if local.is_file() {
        return Some(local);
    }

    if let Some(home) = home_dir() {
        let global = home.join(GLOBAL_CONFIG_DIR).join(GLOBAL_CONFIG_FILENAME);
        if global.is_file() {
            return Some(global);
        }
    }

    None
}

fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("no encryption key configured (set `encryption-key` or {ENCRYPTION_KEY_ENV})")]
    MissingKey,
    #[error("invalid encryption key: {0}")]
    InvalidKey(#[from] CipherError),
}
