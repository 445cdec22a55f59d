//! Sort specification attached to paged queries.
//!
//! Rendering the sort into query text is the backend's business; these types
//! only carry the caller's intent.

use std::fmt;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Direction of one sort field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortOrder {
    /// Ascending order (A-Z, 0-9, oldest first).
    #[default]
    Asc,
    /// Descending order (Z-A, 9-0, newest first).
    Desc,
}

impl SortOrder {
    /// Conventional keyword for this direction.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One field to sort by, with its direction.
///
/// The field may be a dotted path relative to the query root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderByField {
    /// Field name or dotted path.
    pub field: SmolStr,
    /// Sort direction.
    pub order: SortOrder,
}

impl OrderByField {
    /// Sort ascending by the given field.
    pub fn asc(field: impl Into<SmolStr>) -> Self {
        OrderByField {
            field: field.into(),
            order: SortOrder::Asc,
        }
    }

    /// Sort descending by the given field.
    pub fn desc(field: impl Into<SmolStr>) -> Self {
        OrderByField {
            field: field.into(),
            order: SortOrder::Desc,
        }
    }
}

/// Complete sort specification: nothing, one field, or several.
///
/// # Examples
///
/// ```rust
/// use exemplar_query::{OrderBy, OrderByField};
///
/// let order = OrderBy::Field(OrderByField::desc("created_on"))
///     .then(OrderByField::asc("name"));
/// assert_eq!(order.iter().count(), 2);
/// assert!(!order.is_empty());
/// assert!(OrderBy::None.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderBy {
    /// No ordering requested.
    #[default]
    None,
    /// Order by a single field.
    Field(OrderByField),
    /// Order by multiple fields, applied in sequence.
    Fields(Box<[OrderByField]>),
}

impl OrderBy {
    /// Whether no ordering is requested.
    pub fn is_empty(&self) -> bool {
        match self {
            OrderBy::None => true,
            OrderBy::Field(_) => false,
            OrderBy::Fields(fields) => fields.is_empty(),
        }
    }

    /// Append a sort field.
    pub fn then(self, field: OrderByField) -> Self {
        match self {
            OrderBy::None => OrderBy::Field(field),
            OrderBy::Field(existing) => OrderBy::Fields(vec![existing, field].into_boxed_slice()),
            OrderBy::Fields(existing) => {
                let mut fields = existing.into_vec();
                fields.push(field);
                OrderBy::Fields(fields.into_boxed_slice())
            }
        }
    }

    /// Build from any number of sort fields.
    pub fn from_fields(fields: impl IntoIterator<Item = OrderByField>) -> Self {
        let mut fields: Vec<_> = fields.into_iter().collect();
        match fields.len() {
            0 => OrderBy::None,
            1 => OrderBy::Field(fields.remove(0)),
            _ => OrderBy::Fields(fields.into_boxed_slice()),
        }
    }

    /// Sort fields in application order.
    pub fn iter(&self) -> impl Iterator<Item = &OrderByField> {
        match self {
            OrderBy::None => [].iter(),
            OrderBy::Field(field) => std::slice::from_ref(field).iter(),
            OrderBy::Fields(fields) => fields.iter(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_then_chains_fields() {
        let order = OrderBy::None
            .then(OrderByField::desc("amount"))
            .then(OrderByField::asc("id"));
        let fields: Vec<_> = order.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(fields, ["amount", "id"]);
    }

    #[test]
    fn test_from_fields_collapses_shapes() {
        assert_eq!(OrderBy::from_fields([]), OrderBy::None);
        assert_eq!(
            OrderBy::from_fields([OrderByField::asc("name")]),
            OrderBy::Field(OrderByField::asc("name"))
        );
        assert!(matches!(
            OrderBy::from_fields([OrderByField::asc("a"), OrderByField::asc("b")]),
            OrderBy::Fields(_)
        ));
    }

    #[test]
    fn test_sort_order_keywords() {
        assert_eq!(SortOrder::Asc.to_string(), "ASC");
        assert_eq!(SortOrder::Desc.to_string(), "DESC");
        assert_eq!(SortOrder::default(), SortOrder::Asc);
    }
}
