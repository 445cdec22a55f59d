//! Compiled filter conditions.
//!
//! A compile pass turns the populated fields of an example entity into a
//! sequence of [`Predicate`]s, all joined with logical AND. Predicates are
//! backend-opaque: they name a [`FieldPath`] relative to the query root and
//! carry literal [`Scalar`] comparands; how they execute is the backend's
//! concern.

use std::fmt;

use exemplar_schema::{Operator, Scalar};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use smol_str::SmolStr;

/// Dotted field path relative to the query root, e.g. `seller.name`.
///
/// Most paths are one or two segments deep, so segments live inline.
///
/// # Examples
///
/// ```rust
/// use exemplar_query::FieldPath;
///
/// let path = FieldPath::new("seller").child("name");
/// assert_eq!(path.to_string(), "seller.name");
/// assert_eq!(path.segments().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldPath {
    segments: SmallVec<[SmolStr; 2]>,
}

impl FieldPath {
    /// A single-segment path at the query root.
    pub fn new(field: impl Into<SmolStr>) -> Self {
        let mut segments = SmallVec::new();
        segments.push(field.into());
        FieldPath { segments }
    }

    /// An empty path denoting the query root itself.
    pub fn root() -> Self {
        FieldPath {
            segments: SmallVec::new(),
        }
    }

    /// Extend the path by one segment.
    pub fn child(&self, field: impl Into<SmolStr>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(field.into());
        FieldPath { segments }
    }

    /// Path segments from the root down.
    pub fn segments(&self) -> &[SmolStr] {
        &self.segments
    }

    /// Whether this is the root path.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

impl From<&str> for FieldPath {
    fn from(field: &str) -> Self {
        FieldPath::new(field)
    }
}

/// One atomic comparison contributed to the conjunctive filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Predicate {
    /// `path = value`
    Eq {
        /// Compared field.
        path: FieldPath,
        /// Literal comparand.
        value: Scalar,
    },
    /// `path <> value`
    Neq {
        /// Compared field.
        path: FieldPath,
        /// Literal comparand.
        value: Scalar,
    },
    /// `path < value`
    Lt {
        /// Compared field.
        path: FieldPath,
        /// Literal comparand.
        value: Scalar,
    },
    /// `path <= value`
    Lte {
        /// Compared field.
        path: FieldPath,
        /// Literal comparand.
        value: Scalar,
    },
    /// `path > value`
    Gt {
        /// Compared field.
        path: FieldPath,
        /// Literal comparand.
        value: Scalar,
    },
    /// `path >= value`
    Gte {
        /// Compared field.
        path: FieldPath,
        /// Literal comparand.
        value: Scalar,
    },
    /// Case-insensitive `path LIKE pattern`; the pattern supplies its own
    /// wildcards, none are injected.
    Like {
        /// Compared field.
        path: FieldPath,
        /// Trimmed, lower-cased pattern.
        pattern: String,
    },
    /// Negated case-insensitive pattern match.
    NotLike {
        /// Compared field.
        path: FieldPath,
        /// Trimmed, lower-cased pattern.
        pattern: String,
    },
    /// `path IN (values…)`
    In {
        /// Compared field.
        path: FieldPath,
        /// Literal probe set.
        values: Vec<Scalar>,
    },
    /// `value MEMBER OF path` — the literal is an element of the
    /// collection-valued field.
    MemberOf {
        /// Collection-valued field.
        path: FieldPath,
        /// Literal element to look for.
        value: Scalar,
    },
    /// `path IS NULL`
    IsNull {
        /// Checked field.
        path: FieldPath,
    },
    /// `path IS NOT NULL`
    IsNotNull {
        /// Checked field.
        path: FieldPath,
    },
    /// `path IS EMPTY` — the collection-valued field has no elements.
    IsEmpty {
        /// Checked collection field.
        path: FieldPath,
    },
    /// `path IS NOT EMPTY`
    IsNotEmpty {
        /// Checked collection field.
        path: FieldPath,
    },
}

impl Predicate {
    /// The field path this predicate constrains.
    pub fn path(&self) -> &FieldPath {
        match self {
            Predicate::Eq { path, .. }
            | Predicate::Neq { path, .. }
            | Predicate::Lt { path, .. }
            | Predicate::Lte { path, .. }
            | Predicate::Gt { path, .. }
            | Predicate::Gte { path, .. }
            | Predicate::Like { path, .. }
            | Predicate::NotLike { path, .. }
            | Predicate::In { path, .. }
            | Predicate::MemberOf { path, .. }
            | Predicate::IsNull { path }
            | Predicate::IsNotNull { path }
            | Predicate::IsEmpty { path }
            | Predicate::IsNotEmpty { path } => path,
        }
    }

    /// The operator this predicate applies.
    pub fn operator(&self) -> Operator {
        match self {
            Predicate::Eq { .. } => Operator::Eq,
            Predicate::Neq { .. } => Operator::Neq,
            Predicate::Lt { .. } => Operator::Lt,
            Predicate::Lte { .. } => Operator::Lte,
            Predicate::Gt { .. } => Operator::Gt,
            Predicate::Gte { .. } => Operator::Gte,
            Predicate::Like { .. } => Operator::Like,
            Predicate::NotLike { .. } => Operator::NotLike,
            Predicate::In { .. } => Operator::In,
            Predicate::MemberOf { .. } => Operator::MemberOf,
            Predicate::IsNull { .. } => Operator::IsNull,
            Predicate::IsNotNull { .. } => Operator::IsNotNull,
            Predicate::IsEmpty { .. } => Operator::IsEmpty,
            Predicate::IsNotEmpty { .. } => Operator::IsNotEmpty,
        }
    }
}

/// Output of one compile pass: the conjunctive predicate sequence plus the
/// human-readable trace of the equivalent clause list.
///
/// An empty predicate sequence means "match everything".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CompiledFilter {
    /// Emitted predicates, in emission order.
    pub predicates: Vec<Predicate>,
    /// Clause list joined with `" AND "`; diagnostic only.
    pub trace: String,
}

impl CompiledFilter {
    /// Number of emitted predicates.
    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    /// Whether no predicates were emitted (the filter matches everything).
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_path_display() {
        assert_eq!(FieldPath::new("name").to_string(), "name");
        assert_eq!(FieldPath::new("seller").child("address").child("city").to_string(), "seller.address.city");
        assert_eq!(FieldPath::root().to_string(), "");
        assert!(FieldPath::root().is_root());
    }

    #[test]
    fn test_child_does_not_mutate_parent() {
        let parent = FieldPath::new("seller");
        let child = parent.child("name");
        assert_eq!(parent.segments().len(), 1);
        assert_eq!(child.segments().len(), 2);
    }

    #[test]
    fn test_predicate_accessors() {
        let p = Predicate::Gte {
            path: "buy_now_price".into(),
            value: Scalar::Int(100),
        };
        assert_eq!(p.operator(), Operator::Gte);
        assert_eq!(p.path().to_string(), "buy_now_price");
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = CompiledFilter::default();
        assert!(filter.is_empty());
        assert_eq!(filter.len(), 0);
        assert_eq!(filter.trace, "");
    }

    #[test]
    fn test_predicate_serializes() {
        let p = Predicate::In {
            path: "qty".into(),
            values: vec![Scalar::Int(1), Scalar::Int(2)],
        };
        let json = serde_json::to_string(&p).unwrap();
        let back: Predicate = serde_json::from_str(&json).unwrap();
        assert_eq!(p, back);
    }
}
