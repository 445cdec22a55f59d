//! The seam between domain types and the query engine.

use crate::model::EntityModel;
use crate::value::Value;

/// A domain type the engine can walk, both as a filter example and as a
/// stored row.
///
/// Implementations declare their filterable shape once ([`model`]) and hand
/// field values over on demand ([`field`]). The trait is object-safe: nested
/// associations surface as `&dyn Entity` and are recursed into without the
/// engine knowing the concrete type.
///
/// [`model`]: Entity::model
/// [`field`]: Entity::field
///
/// # Examples
///
/// ```rust
/// use exemplar_schema::{Entity, EntityModel, FieldDef, PrimitiveKind, Value};
///
/// #[derive(Default)]
/// struct Participator {
///     name: Option<String>,
///     activated: bool,
///     login_names: Vec<String>,
/// }
///
/// impl Entity for Participator {
///     fn entity_name(&self) -> &'static str {
///         "Participator"
///     }
///
///     fn model(&self) -> EntityModel {
///         EntityModel::new()
///             .field(FieldDef::scalar("name"))
///             .field(FieldDef::primitive("activated", PrimitiveKind::Bool))
///             .field(FieldDef::element_collection("login_names"))
///     }
///
///     fn field(&self, name: &str) -> Value<'_> {
///         match name {
///             "name" => self.name.as_deref().into(),
///             "activated" => Value::scalar(self.activated),
///             "login_names" => Value::scalars(self.login_names.iter().map(String::as_str)),
///             _ => Value::Null,
///         }
///     }
/// }
///
/// let example = Participator { name: Some("alice".into()), ..Default::default() };
/// assert!(example.field("name").as_scalar().is_some());
/// assert!(example.field("no_such_field").is_null());
/// ```
pub trait Entity {
    /// Unique logical name of this entity type.
    ///
    /// Doubles as the metadata cache key and the root label of compile
    /// traces, so it must be unique across the process.
    fn entity_name(&self) -> &'static str;

    /// Declared schema for this type.
    ///
    /// Must be a pure function of the type. Called once per type; the result
    /// is validated and cached process-wide.
    fn model(&self) -> EntityModel;

    /// Current value of the named field.
    ///
    /// Names not declared in [`model`](Entity::model) return `Value::Null`,
    /// which never contributes a filter condition.
    fn field(&self, name: &str) -> Value<'_>;
}
