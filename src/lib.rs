// src/lib.rs

//! Course Catalog Library
//!
//! Loads a JSON course catalog, resolves multilingual titles and tags,
//! and answers category/subcategory/text queries.

pub mod catalog;
pub mod error;
pub mod export;
pub mod models;
pub mod utils;

pub use catalog::{CatalogDocument, CatalogEditor, CatalogStore, NewItem, Query};
pub use error::{AppError, LoadFailure, Result};
pub use export::CsvExporter;
pub use models::{Category, Config, Item, Tags, Title};
