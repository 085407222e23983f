// src/models/mod.rs

//! Domain models for the catalog.
//!
//! Records and categories are plain data; parsing from raw JSON and the
//! multilingual resolution rules live next to the types.

mod category;
mod config;
mod item;
mod validation;

// Re-export all public types
pub use category::Category;
pub use config::{CatalogConfig, Config, ExportColumns, ExportConfig, LoggingConfig};
pub use item::{FALLBACK_LANGUAGE, Item, Tags, Title, UNKNOWN_TITLE};
pub use validation::ValidationError;
