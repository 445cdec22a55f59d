//! # Exemplar
//!
//! A query-by-example engine for Rust: hand it a populated instance of an
//! entity and it derives the filter, so callers never hand-write per-entity
//! filter logic.
//!
//! Exemplar provides:
//! - A declarative entity schema ([`Entity`], [`EntityModel`]) with per-field
//!   filter annotations (exclude, allow-zero, identifier, custom operators)
//! - A predicate compiler that walks the example object graph and emits a
//!   conjunctive filter plus a readable trace of the equivalent clauses
//! - A paged/list executor over a pluggable storage [`Backend`]
//! - An in-memory reference backend (feature `memory`) for tests
//!
//! ## Quick Start
//!
//! ```rust
//! use exemplar::prelude::*;
//!
//! #[derive(Default, Clone)]
//! struct Item {
//!     name: Option<String>,
//!     approved: bool,
//! }
//!
//! impl Entity for Item {
//!     fn entity_name(&self) -> &'static str {
//!         "readme::Item"
//!     }
//!     fn model(&self) -> EntityModel {
//!         EntityModel::new()
//!             .field(FieldDef::scalar("name"))
//!             .field(FieldDef::primitive("approved", PrimitiveKind::Bool))
//!     }
//!     fn field(&self, name: &str) -> Value<'_> {
//!         match name {
//!             "name" => self.name.as_deref().into(),
//!             "approved" => Value::scalar(self.approved),
//!             _ => Value::Null,
//!         }
//!     }
//! }
//!
//! // Populated fields become filter conditions; everything else is ignored.
//! let example = Item { name: Some("  Chair  ".into()), approved: true };
//! let filter = exemplar::compile(&example).unwrap();
//! assert_eq!(filter.trace, "readme::Item.name LIKE 'chair' AND readme::Item.approved = true");
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// Entity metadata: the `Entity` trait, models, values, and the cache.
pub mod schema {
    pub use exemplar_schema::*;
}

/// The compiler and executor core.
pub mod query {
    pub use exemplar_query::*;
}

/// The in-memory reference backend.
#[cfg(feature = "memory")]
#[cfg_attr(docsrs, doc(cfg(feature = "memory")))]
pub mod memory {
    pub use exemplar_memory::*;
}

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::query::{
        compile, Backend, CompiledFilter, OrderBy, OrderByField, Page, PageRequest, Predicate,
        QueryError, QueryExecutor, QueryResult, SortOrder,
    };
    pub use crate::schema::{
        describe, Entity, EntityModel, FieldDef, FieldKind, Operator, PrimitiveKind, Scalar, Value,
    };
    #[cfg(feature = "memory")]
    pub use crate::memory::MemoryBackend;
}

// Re-export key types at the crate root
pub use query::{
    compile, compile_with, Backend, BoxFuture, CompiledFilter, CountQuery, FieldPath, OrderBy,
    OrderByField, Page, PageRequest, Predicate, QueryError, QueryExecutor, QueryResult,
    SelectQuery, SortOrder,
};
pub use schema::{
    describe, CacheStats, Entity, EntityModel, FieldDef, FieldKind, MetadataCache, Operator,
    PrimitiveKind, Scalar, SchemaError, Value,
};

#[cfg(feature = "memory")]
pub use memory::MemoryBackend;
