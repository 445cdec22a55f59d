//! Error types for schema declaration and validation.

use smol_str::SmolStr;
use thiserror::Error;

/// Errors raised while validating a declared entity model.
///
/// Raised once, when the metadata cache first sees a type; later lookups of
/// the same type never re-validate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    /// Two fields on one entity share a name.
    #[error("duplicate field `{field}` on entity `{entity}`")]
    DuplicateField { entity: SmolStr, field: SmolStr },

    /// A declared operator cannot apply to the field's declared kind.
    #[error("invalid condition on `{entity}.{field}`: {message}")]
    InvalidCondition {
        entity: SmolStr,
        field: SmolStr,
        message: String,
    },
}

impl SchemaError {
    pub(crate) fn duplicate_field(entity: &str, field: &str) -> Self {
        SchemaError::DuplicateField {
            entity: entity.into(),
            field: field.into(),
        }
    }

    pub(crate) fn invalid_condition(entity: &str, field: &str, message: impl Into<String>) -> Self {
        SchemaError::InvalidCondition {
            entity: entity.into(),
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;
