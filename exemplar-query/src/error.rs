//! Error types for compiling and executing example queries.
//!
//! The compiler is deliberately tolerant: operator/value combinations it
//! cannot express are skipped with a debug note, not raised. Only two things
//! fail a compile — a structurally invalid filter value (an `IN` probe that
//! is not a collection) and a defective schema declaration. Backend failures
//! pass through unchanged.

use exemplar_schema::SchemaError;
use smol_str::SmolStr;
use thiserror::Error;

/// Result type for query operations.
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors raised while compiling or executing an example query.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    /// A filter value is structurally unusable for its declared operator.
    #[error("invalid filter on `{field}`: {message}")]
    InvalidFilter {
        /// Field carrying the offending value.
        field: SmolStr,
        /// What was wrong with it.
        message: String,
    },

    /// The entity's declared schema failed validation.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The storage backend failed; propagated unchanged from the backend.
    #[error("backend error: {message}")]
    Backend {
        /// Backend-supplied description of the failure.
        message: String,
    },
}

impl QueryError {
    /// Create an invalid-filter error for the given field.
    pub fn invalid_filter(field: &str, message: impl Into<String>) -> Self {
        QueryError::InvalidFilter {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a backend-failure error.
    pub fn backend(message: impl Into<String>) -> Self {
        QueryError::Backend {
            message: message.into(),
        }
    }

    /// Whether this is an invalid-filter error.
    pub fn is_invalid_filter(&self) -> bool {
        matches!(self, QueryError::InvalidFilter { .. })
    }

    /// Whether this is a backend failure.
    pub fn is_backend(&self) -> bool {
        matches!(self, QueryError::Backend { .. })
    }
}
