//! Declared entity schema: field kinds and filter annotations.
//!
//! An entity declares its filterable shape once, in declaration order, via
//! [`EntityModel`]. The declaration replaces runtime reflection: the engine
//! never asks a field for its concrete Rust type, only for the kind and
//! annotations recorded here and the current [`Value`](crate::Value) handed
//! over by [`Entity::field`](crate::Entity::field).

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::operator::Operator;

/// How a field relates to the owning entity, driving the compile strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    /// Leaf column compared directly
    Scalar,
    /// Single associated entity, recursed into
    ToOne,
    /// Embedded value object, recursed into
    Embedded,
    /// Collection of associated entities, joined at the query root
    ToMany,
    /// Collection of leaf values, tested for membership
    ElementCollection,
}

impl FieldKind {
    /// Collection-shaped kinds.
    pub fn is_collection(&self) -> bool {
        matches!(self, FieldKind::ToMany | FieldKind::ElementCollection)
    }
}

/// Scalar kinds whose Rust representation cannot encode "unset".
///
/// Only fields declared with one of these are subject to zero-value
/// suppression; everything else signals "unset" through `Value::Null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrimitiveKind {
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    F32,
    F64,
}

/// One declared field: name, kind, and filter annotations.
///
/// # Examples
///
/// ```rust
/// use exemplar_schema::{FieldDef, Operator, PrimitiveKind};
///
/// let name = FieldDef::scalar("name");
/// let approved = FieldDef::primitive("approved", PrimitiveKind::Bool);
/// let price = FieldDef::scalar("buy_now_price").operator(Operator::Gte);
/// let version = FieldDef::scalar("version").excluded();
///
/// assert!(version.excluded);
/// assert_eq!(price.operator, Some(Operator::Gte));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field name as exposed by `Entity::field`
    pub name: SmolStr,
    /// Relationship kind
    pub kind: FieldKind,
    /// Primitive kind for zero-value suppression, if any
    pub primitive: Option<PrimitiveKind>,
    /// Field never participates in filtering
    pub excluded: bool,
    /// Zero value is a real filter condition
    pub allow_zero: bool,
    /// Identifier field; strings compare by equality instead of LIKE
    pub identifier: bool,
    /// Custom instruction replacing the default comparison rule
    pub operator: Option<Operator>,
}

impl FieldDef {
    fn new(name: impl Into<SmolStr>, kind: FieldKind) -> Self {
        FieldDef {
            name: name.into(),
            kind,
            primitive: None,
            excluded: false,
            allow_zero: false,
            identifier: false,
            operator: None,
        }
    }

    /// A leaf column holding an optional value.
    pub fn scalar(name: impl Into<SmolStr>) -> Self {
        FieldDef::new(name, FieldKind::Scalar)
    }

    /// A leaf column whose Rust type always holds a value; its zero value is
    /// suppressed unless [`allow_zero`](FieldDef::allow_zero) is set.
    pub fn primitive(name: impl Into<SmolStr>, kind: PrimitiveKind) -> Self {
        let mut def = FieldDef::new(name, FieldKind::Scalar);
        def.primitive = Some(kind);
        def
    }

    /// A single associated entity.
    pub fn to_one(name: impl Into<SmolStr>) -> Self {
        FieldDef::new(name, FieldKind::ToOne)
    }

    /// An embedded value object.
    pub fn embedded(name: impl Into<SmolStr>) -> Self {
        FieldDef::new(name, FieldKind::Embedded)
    }

    /// A collection of associated entities.
    pub fn to_many(name: impl Into<SmolStr>) -> Self {
        FieldDef::new(name, FieldKind::ToMany)
    }

    /// A collection of leaf values.
    pub fn element_collection(name: impl Into<SmolStr>) -> Self {
        FieldDef::new(name, FieldKind::ElementCollection)
    }

    /// Exclude this field from filtering entirely.
    pub fn excluded(mut self) -> Self {
        self.excluded = true;
        self
    }

    /// Treat the primitive zero value as a real filter condition.
    pub fn allow_zero(mut self) -> Self {
        self.allow_zero = true;
        self
    }

    /// Mark as the entity identifier.
    pub fn identifier(mut self) -> Self {
        self.identifier = true;
        self
    }

    /// Replace the default comparison rule with a declared operator.
    pub fn operator(mut self, operator: Operator) -> Self {
        self.operator = Some(operator);
        self
    }
}

/// Declaration-order field list for one entity type.
///
/// Built once per type inside [`Entity::model`](crate::Entity::model); the
/// metadata cache validates it and derives the cached descriptor lists on
/// first sight of the type.
///
/// # Examples
///
/// ```rust
/// use exemplar_schema::{EntityModel, FieldDef, PrimitiveKind};
///
/// let model = EntityModel::new()
///     .field(FieldDef::scalar("id").identifier())
///     .field(FieldDef::scalar("name"))
///     .field(FieldDef::primitive("activated", PrimitiveKind::Bool))
///     .field(FieldDef::element_collection("login_names"));
///
/// assert_eq!(model.len(), 4);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityModel {
    fields: Vec<FieldDef>,
}

impl EntityModel {
    /// An empty model; an entity declaring no fields matches everything.
    pub fn new() -> Self {
        EntityModel::default()
    }

    /// Append a field declaration. Declaration order is compile order.
    pub fn field(mut self, def: FieldDef) -> Self {
        self.fields.push(def);
        self
    }

    /// Declared fields in declaration order.
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no fields are declared.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
