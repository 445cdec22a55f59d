//! Value classification: scalar leaf, nested entity, or collection thereof.
//!
//! The compiler branches on the shape of each field value exactly once, via
//! [`classify`]. A "value type" is anything compared directly as a column
//! value; an "entity type" is recursed into instead.

use exemplar_schema::Value;

/// Shape of one runtime field value, as seen by the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// No value set; never contributes a condition.
    Null,
    /// A scalar leaf compared directly.
    ValueType,
    /// A nested entity to recurse into.
    EntityType,
    /// A non-empty collection of scalar leaves; membership semantics.
    ValueCollection,
    /// A non-empty collection of entities; join semantics at the root.
    EntityCollection,
    /// A collection mixing entities with scalars or nulls; only the entity
    /// elements are recursed into.
    MixedCollection,
    /// A collection with no elements; contributes nothing.
    EmptyCollection,
}

/// Classify one field value.
pub fn classify(value: &Value<'_>) -> Classification {
    match value {
        Value::Null => Classification::Null,
        Value::Scalar(_) => Classification::ValueType,
        Value::Entity(_) => Classification::EntityType,
        Value::Collection(items) => {
            if items.is_empty() {
                return Classification::EmptyCollection;
            }
            if is_value_type_collection(items) {
                return Classification::ValueCollection;
            }
            if items.iter().all(|v| matches!(v, Value::Entity(_))) {
                return Classification::EntityCollection;
            }
            Classification::MixedCollection
        }
    }
}

/// Whether a value is a scalar leaf.
pub fn is_value_type(value: &Value<'_>) -> bool {
    matches!(value, Value::Scalar(_))
}

/// Whether every element of the slice is a non-null scalar leaf.
///
/// Empty slices are not value-type collections: with no elements there is
/// nothing to build membership conditions from. A single null or entity
/// element disqualifies the whole collection, which routes it to the
/// join-and-recurse strategy instead of membership.
pub fn is_value_type_collection(items: &[Value<'_>]) -> bool {
    !items.is_empty() && items.iter().all(|v| matches!(v, Value::Scalar(_)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use exemplar_schema::{Entity, EntityModel, Scalar};

    struct Stub;

    impl Entity for Stub {
        fn entity_name(&self) -> &'static str {
            "classify::tests::Stub"
        }
        fn model(&self) -> EntityModel {
            EntityModel::new()
        }
        fn field(&self, _name: &str) -> Value<'_> {
            Value::Null
        }
    }

    #[test]
    fn test_leaf_shapes() {
        assert_eq!(classify(&Value::Null), Classification::Null);
        assert_eq!(classify(&Value::scalar(1)), Classification::ValueType);
        assert_eq!(classify(&Value::entity(&Stub)), Classification::EntityType);
    }

    #[test]
    fn test_collection_shapes() {
        assert_eq!(classify(&Value::Collection(vec![])), Classification::EmptyCollection);
        assert_eq!(classify(&Value::scalars(["a", "b"])), Classification::ValueCollection);

        let stub = Stub;
        let entities = Value::Collection(vec![Value::entity(&stub)]);
        assert_eq!(classify(&entities), Classification::EntityCollection);

        let mixed = Value::Collection(vec![Value::entity(&stub), Value::scalar(1)]);
        assert_eq!(classify(&mixed), Classification::MixedCollection);
    }

    #[test]
    fn test_null_element_disqualifies_value_collection() {
        let items = vec![Value::Scalar(Scalar::Int(1)), Value::Null];
        assert!(!is_value_type_collection(&items));
        assert_eq!(classify(&Value::Collection(items)), Classification::MixedCollection);
    }

    #[test]
    fn test_empty_slice_is_not_a_value_collection() {
        assert!(!is_value_type_collection(&[]));
    }
}
