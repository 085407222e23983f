// src/models/category.rs

//! Category and subcategory structure.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::validation::{self, ValidationError};

/// A top-level category with its ordered subcategories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct Category {
    /// Category name, unique within a catalog
    pub name: String,

    /// Subcategory names in display order
    pub subcategories: Vec<String>,
}

impl Category {
    pub fn new(name: impl Into<String>, subcategories: Vec<String>) -> Self {
        Self {
            name: name.into(),
            subcategories,
        }
    }

    /// Check if a subcategory exists in this category.
    pub fn has_subcategory(&self, subcategory: &str) -> bool {
        self.subcategories.iter().any(|s| s == subcategory)
    }

    /// Parse a raw category entry.
    ///
    /// Accepts `{"name": .., "subcategories": [..]}` or a bare name string.
    pub fn from_value(value: &Value) -> Result<Self, ValidationError> {
        const EXPECTED: &str = "a list of strings";

        if let Value::String(name) = value {
            if name.trim().is_empty() {
                return Err(ValidationError::Empty { field: "name" });
            }
            return Ok(Self::new(name.clone(), Vec::new()));
        }

        let entry = validation::as_object(value, "category")?;
        let name = validation::required_str(entry, "name")?;
        let subcategories =
            validation::string_list(entry.get("subcategories"), "subcategories", EXPECTED)?;

        if subcategories.iter().any(|s| s.trim().is_empty()) {
            return Err(ValidationError::Empty {
                field: "subcategories",
            });
        }

        Ok(Self::new(name, subcategories))
    }
}

impl TryFrom<Value> for Category {
    type Error = ValidationError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Category::from_value(&value)
    }
}
