//! Declared comparison operators for custom-instruction fields.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Operator a field can declare instead of the default comparison rule.
///
/// A field carrying one of these is skipped by the default pass and compiled
/// by the condition pass, which dispatches exhaustively on the variant.
///
/// # Examples
///
/// ```rust
/// use exemplar_schema::Operator;
///
/// assert_eq!(Operator::Gte.as_str(), ">=");
/// assert_eq!(Operator::NotLike.as_str(), "NOT LIKE");
/// assert!(Operator::MemberOf.requires_collection());
/// assert!(!Operator::IsNull.consumes_value());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// Equality
    Eq,
    /// Inequality
    Neq,
    /// Less than
    Lt,
    /// Less than or equal
    Lte,
    /// Greater than
    Gt,
    /// Greater than or equal
    Gte,
    /// Case-insensitive pattern match; the stored value supplies wildcards
    Like,
    /// Negated case-insensitive pattern match
    NotLike,
    /// Membership of the field value in a literal set
    In,
    /// Membership of a literal value in the collection at the field path
    MemberOf,
    /// Field holds no value
    IsNull,
    /// Field holds a value
    IsNotNull,
    /// Collection at the field path is empty
    IsEmpty,
    /// Collection at the field path is non-empty
    IsNotEmpty,
}

impl Operator {
    /// Trace symbol for this operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Neq => "<>",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Like => "LIKE",
            Operator::NotLike => "NOT LIKE",
            Operator::In => "IN",
            Operator::MemberOf => "MEMBER OF",
            Operator::IsNull => "IS NULL",
            Operator::IsNotNull => "IS NOT NULL",
            Operator::IsEmpty => "IS EMPTY",
            Operator::IsNotEmpty => "IS NOT EMPTY",
        }
    }

    /// Operators that only make sense against a declared collection field.
    ///
    /// `In` is not among them: it constrains the runtime value (must be a
    /// collection of leaf values), not the declared field kind.
    pub fn requires_collection(&self) -> bool {
        matches!(self, Operator::MemberOf | Operator::IsEmpty | Operator::IsNotEmpty)
    }

    /// Whether the stored field value becomes the comparand. Null-checks and
    /// emptiness-checks ignore it; any non-null value merely activates them.
    pub fn consumes_value(&self) -> bool {
        !matches!(
            self,
            Operator::IsNull | Operator::IsNotNull | Operator::IsEmpty | Operator::IsNotEmpty
        )
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_symbols() {
        assert_eq!(Operator::Eq.to_string(), "=");
        assert_eq!(Operator::Neq.to_string(), "<>");
        assert_eq!(Operator::MemberOf.to_string(), "MEMBER OF");
        assert_eq!(Operator::IsNotEmpty.to_string(), "IS NOT EMPTY");
    }

    #[test]
    fn test_collection_operators() {
        assert!(Operator::MemberOf.requires_collection());
        assert!(Operator::IsEmpty.requires_collection());
        assert!(!Operator::In.requires_collection());
        assert!(!Operator::Gte.requires_collection());
    }

    #[test]
    fn test_sentinel_operators_ignore_value() {
        assert!(!Operator::IsNull.consumes_value());
        assert!(!Operator::IsNotNull.consumes_value());
        assert!(!Operator::IsEmpty.consumes_value());
        assert!(Operator::Like.consumes_value());
    }
}
