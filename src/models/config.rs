//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Catalog document and query settings
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// CSV export settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.catalog.path.as_os_str().is_empty() {
            return Err(AppError::config("catalog.path is empty"));
        }
        if self.catalog.language.trim().is_empty() {
            return Err(AppError::config("catalog.language is empty"));
        }
        if self.catalog.id_prefix.is_empty() {
            return Err(AppError::config("catalog.id_prefix is empty"));
        }
        if self.export.dir.as_os_str().is_empty() {
            return Err(AppError::config("export.dir is empty"));
        }
        Ok(())
    }
}

/// Catalog document settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Path to the catalog JSON document
    #[serde(default = "defaults::catalog_path")]
    pub path: PathBuf,

    /// Language code used to resolve titles and tags
    #[serde(default = "defaults::language")]
    pub language: String,

    /// Prefix for generated course ids
    #[serde(default = "defaults::id_prefix")]
    pub id_prefix: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: defaults::catalog_path(),
            language: defaults::language(),
            id_prefix: defaults::id_prefix(),
        }
    }
}

/// Which columns a CSV export contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportColumns {
    /// title, category, subcategory, link
    #[default]
    Basic,
    /// id, title, category, subcategory, provider, link, tags
    Full,
}

/// CSV export settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory for timestamped exports
    #[serde(default = "defaults::export_dir")]
    pub dir: PathBuf,

    #[serde(default)]
    pub columns: ExportColumns,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: defaults::export_dir(),
            columns: ExportColumns::default(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default level filter when `RUST_LOG` is unset
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    pub fn catalog_path() -> PathBuf {
        PathBuf::from("assets/catalog.sample.json")
    }
    pub fn language() -> String {
        "en".into()
    }
    pub fn id_prefix() -> String {
        "c-".into()
    }
    pub fn export_dir() -> PathBuf {
        PathBuf::from("exports")
    }
    pub fn log_level() -> String {
        "info".into()
    }
}
