// src/error.rs

//! Unified error handling for the catalog library.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::models::ValidationError;

/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A single record or field failed validation
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Catalog document could not be loaded; the previous snapshot is kept
    #[error("Failed to load catalog from {}: {cause}", .path.display())]
    CatalogLoad {
        path: PathBuf,
        #[source]
        cause: LoadFailure,
    },

    /// Catalog document could not be written
    #[error("Failed to save catalog to {}: {source}", .path.display())]
    CatalogSave { path: PathBuf, source: io::Error },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A category or item referenced by name/id does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// A category or item with the same key already exists
    #[error("Already exists: {0}")]
    Conflict(String),
}

/// Why a catalog load failed.
///
/// Every variant is reported through [`AppError::CatalogLoad`], so callers
/// that only care whether the load worked can match on that one kind.
#[derive(Error, Debug)]
pub enum LoadFailure {
    #[error("file not found")]
    NotFound,

    #[error("unreadable file: {0}")]
    Io(#[source] io::Error),

    #[error("malformed JSON: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("invalid document: {0}")]
    InvalidDocument(String),

    #[error("category #{index}: {source}")]
    InvalidCategory {
        index: usize,
        #[source]
        source: ValidationError,
    },

    #[error("course #{index}{}: {source}", .id.as_deref().map(|id| format!(" ({id})")).unwrap_or_default())]
    InvalidRecord {
        index: usize,
        id: Option<String>,
        #[source]
        source: ValidationError,
    },
}

impl AppError {
    /// Create a catalog load error.
    pub fn load(path: impl Into<PathBuf>, cause: LoadFailure) -> Self {
        Self::CatalogLoad {
            path: path.into(),
            cause,
        }
    }

    /// Create a catalog save error.
    pub fn save(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::CatalogSave {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a not-found error.
    pub fn not_found(what: impl fmt::Display) -> Self {
        Self::NotFound(what.to_string())
    }

    /// Create a conflict error.
    pub fn conflict(what: impl fmt::Display) -> Self {
        Self::Conflict(what.to_string())
    }

    /// Whether this error is a failed catalog load, whatever the cause.
    pub fn is_load_error(&self) -> bool {
        matches!(self, Self::CatalogLoad { .. })
    }

    /// Whether this error is a failed catalog save.
    pub fn is_save_error(&self) -> bool {
        matches!(self, Self::CatalogSave { .. })
    }
}
