//! # exemplar-schema
//!
//! Entity metadata for the exemplar query-by-example engine.
//!
//! This crate provides the statically declared schema layer the engine walks
//! instead of runtime reflection:
//! - The [`Entity`] trait: name, declared model, and field access by name
//! - [`EntityModel`]/[`FieldDef`]: declaration-order fields with kinds
//!   (scalar, to-one, embedded, to-many, element-collection) and filter
//!   annotations (exclude, allow-zero, identifier, custom operator)
//! - [`Value`]/[`Scalar`]: the runtime value model handed to the compiler
//! - [`Operator`]: the declared-instruction sum type
//! - [`MetadataCache`]: the process-wide read-through descriptor cache
//!
//! ## Declaring an entity
//!
//! ```rust
//! use exemplar_schema::{
//!     describe, Entity, EntityModel, FieldDef, Operator, PrimitiveKind, Value,
//! };
//! use rust_decimal::Decimal;
//!
//! #[derive(Default)]
//! struct Item {
//!     name: Option<String>,
//!     approved: bool,
//!     buy_now_price: Option<Decimal>,
//! }
//!
//! impl Entity for Item {
//!     fn entity_name(&self) -> &'static str {
//!         "Item"
//!     }
//!
//!     fn model(&self) -> EntityModel {
//!         EntityModel::new()
//!             .field(FieldDef::scalar("name"))
//!             .field(FieldDef::primitive("approved", PrimitiveKind::Bool))
//!             .field(FieldDef::scalar("buy_now_price").operator(Operator::Gte))
//!     }
//!
//!     fn field(&self, name: &str) -> Value<'_> {
//!         match name {
//!             "name" => self.name.as_deref().into(),
//!             "approved" => Value::scalar(self.approved),
//!             "buy_now_price" => self.buy_now_price.into(),
//!             _ => Value::Null,
//!         }
//!     }
//! }
//!
//! let meta = describe(&Item::default()).unwrap();
//! assert_eq!(meta.name(), "Item");
//! assert_eq!(meta.conditions().len(), 1);
//! ```

pub mod cache;
pub mod entity;
pub mod error;
pub mod model;
pub mod operator;
mod validate;
pub mod value;

pub use cache::{describe, CacheStats, ConditionDef, EntityMetadata, MetadataCache};
pub use entity::Entity;
pub use error::{SchemaError, SchemaResult};
pub use model::{EntityModel, FieldDef, FieldKind, PrimitiveKind};
pub use operator::Operator;
pub use value::{Scalar, Value};
