//! Error types for the Kolos engine

use thiserror::Error;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, KolosError>;

/// Errors that can occur in engine operations.
///
/// Validation errors (`NotFound`, `InvalidHierarchy`, `ReservedName`,
/// `InvalidValue`, `Duplicate`, `Conflict`) are raised before anything is
/// written. `Unavailable` covers the persistence layer.
#[derive(Debug, Error)]
pub enum KolosError {
    /// A referenced entity does not exist
    #[error("{resource} not found: {id}")]
    NotFound { resource: String, id: String },

    /// Nesting or column/board placement violation
    #[error("invalid hierarchy: {message}")]
    InvalidHierarchy { message: String },

    /// A custom column tried to take a reserved workflow name
    #[error("column name '{name}' is reserved")]
    ReservedName { name: String },

    /// Persistence layer unreachable or transaction aborted
    #[error("storage unavailable: {message}")]
    Unavailable { message: String },

    /// Malformed input
    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    /// Name already taken within its scope
    #[error("duplicate {resource}: {name}")]
    Duplicate { resource: String, name: String },

    /// The request is valid but the current state forbids it
    #[error("conflict: {message}")]
    Conflict { message: String },
}

impl KolosError {
    /// Create a not found error
    pub fn not_found(resource: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.to_string(),
        }
    }

    /// Create an invalid hierarchy error
    pub fn invalid_hierarchy(message: impl Into<String>) -> Self {
        Self::InvalidHierarchy {
            message: message.into(),
        }
    }

    /// Create an unavailable error
    pub fn unavailable(message: impl ToString) -> Self {
        Self::Unavailable {
            message: message.to_string(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a duplicate error
    pub fn duplicate(resource: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Duplicate {
            resource: resource.into(),
            name: name.into(),
        }
    }

    /// Create a conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Check if this is a retryable error. The engine never retries itself.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

/// Trim a user-supplied name, rejecting blanks
pub(crate) fn non_empty(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(KolosError::invalid_value(field, "must not be empty"));
    }
    Ok(trimmed.to_string())
}

impl From<std::io::Error> for KolosError {
    fn from(err: std::io::Error) -> Self {
        Self::unavailable(format!("IO error: {err}"))
    }
}

impl From<serde_json::Error> for KolosError {
    fn from(err: serde_json::Error) -> Self {
        Self::unavailable(format!("JSON error: {err}"))
    }
}
