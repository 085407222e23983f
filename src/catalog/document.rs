//! On-disk catalog document.
//!
//! ```text
//! {
//!   "categories": [ { "name": "...", "subcategories": ["..."] }, ... ],
//!   "courses":    [ { "id": "...", "title": ..., ... }, ... ]
//! }
//! ```

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use crate::error::{AppError, LoadFailure, Result};
use crate::models::{Category, Item, ValidationError};
use crate::utils::fs::save_json;

/// The full catalog as stored in a JSON document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogDocument {
    pub categories: Vec<Category>,
    #[serde(rename = "courses")]
    pub items: Vec<Item>,
}

impl CatalogDocument {
    /// Read and validate a document from disk.
    ///
    /// Any failure is reported as [`AppError::CatalogLoad`].
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        Self::read_inner(path).map_err(|cause| AppError::load(path, cause))
    }

    fn read_inner(path: &Path) -> std::result::Result<Self, LoadFailure> {
        let bytes = fs::read(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => LoadFailure::NotFound,
            _ => LoadFailure::Io(e),
        })?;
        let value: Value = serde_json::from_slice(&bytes).map_err(LoadFailure::Malformed)?;
        Self::from_value(&value)
    }

    /// Build a document from decoded JSON, validating every entry.
    ///
    /// A single bad category or record fails the whole document.
    pub fn from_value(value: &Value) -> std::result::Result<Self, LoadFailure> {
        let root = value.as_object().ok_or_else(|| {
            LoadFailure::InvalidDocument("top level must be an object".to_string())
        })?;

        let categories = entries(root.get("categories"), "categories")?
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                Category::from_value(raw)
                    .map_err(|source| LoadFailure::InvalidCategory { index, source })
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let items = entries(root.get("courses"), "courses")?
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                Item::from_value(raw).map_err(|source| LoadFailure::InvalidRecord {
                    index,
                    id: raw.get("id").and_then(Value::as_str).map(str::to_string),
                    source,
                })
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let document = Self { categories, items };
        document.check_unique()?;
        Ok(document)
    }

    /// Category names and item ids must not repeat.
    fn check_unique(&self) -> std::result::Result<(), LoadFailure> {
        let mut names = HashSet::new();
        for (index, category) in self.categories.iter().enumerate() {
            if !names.insert(category.name.as_str()) {
                return Err(LoadFailure::InvalidCategory {
                    index,
                    source: ValidationError::Duplicate {
                        field: "name",
                        value: category.name.clone(),
                    },
                });
            }
        }

        let mut ids = HashSet::new();
        for (index, item) in self.items.iter().enumerate() {
            if !ids.insert(item.id.as_str()) {
                return Err(LoadFailure::InvalidRecord {
                    index,
                    id: Some(item.id.clone()),
                    source: ValidationError::Duplicate {
                        field: "id",
                        value: item.id.clone(),
                    },
                });
            }
        }
        Ok(())
    }

    /// Write the document as pretty-printed JSON.
    ///
    /// Any failure is reported as [`AppError::CatalogSave`].
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        save_json(path, self).map_err(|e| AppError::save(path, e))
    }

    /// Find a category by name.
    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Find an item by id.
    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }
}

/// A top-level array; missing or `null` means empty.
fn entries<'a>(
    value: Option<&'a Value>,
    key: &str,
) -> std::result::Result<&'a [Value], LoadFailure> {
    match value {
        None | Some(Value::Null) => Ok(&[][..]),
        Some(Value::Array(values)) => Ok(values.as_slice()),
        Some(_) => Err(LoadFailure::InvalidDocument(format!(
            "'{key}' must be an array"
        ))),
    }
}
