//! Field-level validation errors for catalog records.

use serde_json::Value;
use thiserror::Error;

/// A required field was missing or had the wrong shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required field '{field}'")]
    Missing { field: &'static str },

    #[error("field '{field}' must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("field '{field}' must not be empty")]
    Empty { field: &'static str },

    #[error("duplicate {field} '{value}'")]
    Duplicate { field: &'static str, value: String },

    #[error("field '{field}' is not a valid http(s) URL: {value}")]
    InvalidLink { field: &'static str, value: String },
}

impl ValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Missing { field }
            | Self::WrongType { field, .. }
            | Self::Empty { field }
            | Self::Duplicate { field, .. }
            | Self::InvalidLink { field, .. } => field,
        }
    }
}

pub(crate) type Object = serde_json::Map<String, Value>;

/// Require `value` to be a JSON object.
pub(crate) fn as_object<'a>(
    value: &'a Value,
    what: &'static str,
) -> Result<&'a Object, ValidationError> {
    value.as_object().ok_or(ValidationError::WrongType {
        field: what,
        expected: "an object",
    })
}

/// Required non-empty string field.
pub(crate) fn required_str<'a>(
    record: &'a Object,
    field: &'static str,
) -> Result<&'a str, ValidationError> {
    match record.get(field) {
        None | Some(Value::Null) => Err(ValidationError::Missing { field }),
        Some(Value::String(s)) if s.trim().is_empty() => Err(ValidationError::Empty { field }),
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(_) => Err(ValidationError::WrongType {
            field,
            expected: "a string",
        }),
    }
}

/// Optional string field. Missing, `null` and `""` are all `None`.
pub(crate) fn optional_str(
    record: &Object,
    field: &'static str,
) -> Result<Option<String>, ValidationError> {
    match record.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ValidationError::WrongType {
            field,
            expected: "a string",
        }),
    }
}

/// List of strings; missing or `null` is an empty list.
pub(crate) fn string_list(
    value: Option<&Value>,
    field: &'static str,
    expected: &'static str,
) -> Result<Vec<String>, ValidationError> {
    let wrong_type = ValidationError::WrongType { field, expected };

    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(values)) => values
            .iter()
            .map(|v| v.as_str().map(str::to_string).ok_or(wrong_type.clone()))
            .collect(),
        Some(_) => Err(wrong_type),
    }
}
