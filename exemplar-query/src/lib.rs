//! # exemplar-query
//!
//! The query-by-example core: a compiler that turns the populated fields of
//! an example entity into a conjunctive predicate filter, and an executor
//! that runs the compiled filter against a storage [`Backend`] as a count,
//! a list, or a page.
//!
//! The pipeline, leaf to root:
//! - [`classify`]: scalar leaf vs nested entity vs collection of either
//! - [`is_zero_value`]: primitive defaults read as "not filtering here"
//! - [`compile`]: the depth-first walk emitting [`Predicate`]s and a trace
//! - [`QueryExecutor`]: count / list / page over a [`Backend`]
//!
//! ## Example
//!
//! ```rust
//! use exemplar_query::{compile, Predicate};
//! use exemplar_schema::{Entity, EntityModel, FieldDef, Operator, Value};
//!
//! #[derive(Default)]
//! struct Item {
//!     name: Option<String>,
//!     min_price: Option<i64>,
//! }
//!
//! impl Entity for Item {
//!     fn entity_name(&self) -> &'static str {
//!         "Item"
//!     }
//!     fn model(&self) -> EntityModel {
//!         EntityModel::new()
//!             .field(FieldDef::scalar("name"))
//!             .field(FieldDef::scalar("min_price").operator(Operator::Gte))
//!     }
//!     fn field(&self, name: &str) -> Value<'_> {
//!         match name {
//!             "name" => self.name.as_deref().into(),
//!             "min_price" => self.min_price.into(),
//!             _ => Value::Null,
//!         }
//!     }
//! }
//!
//! let example = Item { name: Some("Chair".into()), min_price: Some(100) };
//! let filter = compile(&example).unwrap();
//! assert_eq!(filter.len(), 2);
//! assert_eq!(filter.trace, "Item.name LIKE 'chair' AND Item.min_price >= 100");
//! ```

pub mod backend;
pub mod classify;
pub mod compile;
pub mod error;
pub mod executor;
pub mod logging;
pub mod page;
pub mod predicate;
pub mod sort;
pub mod zero;

pub use backend::{Backend, BoxFuture, CountQuery, SelectQuery};
pub use classify::{classify, is_value_type, is_value_type_collection, Classification};
pub use compile::{compile, compile_with};
pub use error::{QueryError, QueryResult};
pub use executor::QueryExecutor;
pub use page::{Page, PageRequest};
pub use predicate::{CompiledFilter, FieldPath, Predicate};
pub use sort::{OrderBy, OrderByField, SortOrder};
pub use zero::is_zero_value;
