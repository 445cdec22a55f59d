//! # exemplar-memory
//!
//! An in-memory reference backend for the exemplar query-by-example engine.
//!
//! [`MemoryBackend`] holds entities in per-type stores and implements the
//! [`Backend`] seam by evaluating each compiled predicate directly against
//! each stored entity through the [`Entity`] trait. It is the executable
//! specification of predicate semantics and the test double for everything
//! built on the executor; it is not a database.
//!
//! ## Example
//!
//! ```rust
//! use exemplar_memory::MemoryBackend;
//! use exemplar_query::{PageRequest, QueryExecutor};
//! use exemplar_schema::{Entity, EntityModel, FieldDef, Value};
//!
//! #[derive(Default, Clone)]
//! struct Tag {
//!     label: Option<String>,
//! }
//!
//! impl Entity for Tag {
//!     fn entity_name(&self) -> &'static str {
//!         "memory_doc::Tag"
//!     }
//!     fn model(&self) -> EntityModel {
//!         EntityModel::new().field(FieldDef::scalar("label"))
//!     }
//!     fn field(&self, name: &str) -> Value<'_> {
//!         match name {
//!             "label" => self.label.as_deref().into(),
//!             _ => Value::Null,
//!         }
//!     }
//! }
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let backend = MemoryBackend::new();
//! backend.insert(Tag { label: Some("rust".into()) });
//! backend.insert(Tag { label: Some("query".into()) });
//!
//! let executor = QueryExecutor::new(backend);
//! let example = Tag { label: Some("rust".into()) };
//! let page = executor.query_for_page(&example, PageRequest::new(0, 10)).await.unwrap();
//! assert_eq!(page.total, 1);
//! # });
//! ```

mod eval;

use std::any::{Any, TypeId};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use exemplar_query::{
    Backend, BoxFuture, CountQuery, OrderBy, QueryResult, SelectQuery, SortOrder,
};
use exemplar_schema::Entity;
use parking_lot::RwLock;
use smol_str::SmolStr;
use tracing::debug;

/// A cheap-to-clone handle over shared in-memory entity stores.
///
/// Entities are kept in insertion order, one store per concrete type.
/// Clones share the same stores.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    stores: Arc<RwLock<HashMap<TypeId, Box<dyn Any + Send + Sync>>>>,
}

impl MemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        MemoryBackend::default()
    }

    /// Store one entity.
    pub fn insert<M>(&self, entity: M)
    where
        M: Entity + Clone + Send + Sync + 'static,
    {
        debug!(entity = entity.entity_name(), "storing entity");
        let mut stores = self.stores.write();
        let store = stores
            .entry(TypeId::of::<M>())
            .or_insert_with(|| Box::new(Vec::<M>::new()));
        if let Some(rows) = store.downcast_mut::<Vec<M>>() {
            rows.push(entity);
        }
    }

    /// Store a batch of entities, preserving iteration order.
    pub fn insert_all<M>(&self, entities: impl IntoIterator<Item = M>)
    where
        M: Entity + Clone + Send + Sync + 'static,
    {
        for entity in entities {
            self.insert(entity);
        }
    }

    /// Number of stored entities of type `M`.
    pub fn len<M: 'static>(&self) -> usize {
        self.with_store::<M, _>(|rows| rows.len(), 0)
    }

    /// Whether no entities of type `M` are stored.
    pub fn is_empty<M: 'static>(&self) -> bool {
        self.len::<M>() == 0
    }

    /// Drop every stored entity of every type.
    pub fn clear(&self) {
        self.stores.write().clear();
    }

    fn with_store<M: 'static, R>(&self, f: impl FnOnce(&[M]) -> R, default: R) -> R {
        let stores = self.stores.read();
        match stores
            .get(&TypeId::of::<M>())
            .and_then(|store| store.downcast_ref::<Vec<M>>())
        {
            Some(rows) => f(rows),
            None => default,
        }
    }
}

impl Backend for MemoryBackend {
    fn count<M>(&self, query: CountQuery) -> BoxFuture<'_, QueryResult<u64>>
    where
        M: Entity + Send + Sync + 'static,
    {
        let total = self.with_store::<M, _>(
            |rows| {
                rows.iter()
                    .filter(|row| satisfies(*row, &query))
                    .count() as u64
            },
            0,
        );
        debug!(entity = query.entity, total, "count query evaluated");
        Box::pin(async move { Ok(total) })
    }

    fn select<M>(&self, query: SelectQuery) -> BoxFuture<'_, QueryResult<Vec<M>>>
    where
        M: Entity + Clone + Send + Sync + 'static,
    {
        let mut rows = self.with_store::<M, _>(
            |rows| {
                rows.iter()
                    .filter(|row| {
                        query
                            .predicates
                            .iter()
                            .all(|p| eval::matches(*row, p))
                    })
                    .cloned()
                    .collect::<Vec<M>>()
            },
            Vec::new(),
        );

        apply_sort(&mut rows, &query.order);

        // Each stored entity appears exactly once, so `distinct` needs no
        // extra work here.
        let offset = query.offset.unwrap_or(0) as usize;
        if offset > 0 {
            rows.drain(..offset.min(rows.len()));
        }
        if let Some(limit) = query.limit {
            rows.truncate(limit as usize);
        }

        debug!(entity = query.entity, returned = rows.len(), "select query evaluated");
        Box::pin(async move { Ok(rows) })
    }
}

fn satisfies<M: Entity>(row: &M, query: &CountQuery) -> bool {
    query.predicates.iter().all(|p| eval::matches(row, p))
}

/// Apply sort fields in sequence; nulls order first in either direction.
fn apply_sort<M: Entity>(rows: &mut [M], order: &OrderBy) {
    if order.is_empty() {
        return;
    }
    let fields: Vec<(Vec<SmolStr>, SortOrder)> = order
        .iter()
        .map(|f| (f.field.split('.').map(SmolStr::from).collect(), f.order))
        .collect();

    rows.sort_by(|a, b| {
        for (segments, direction) in &fields {
            let ka = eval::sort_key(a, segments);
            let kb = eval::sort_key(b, segments);
            let ordering = match (&ka, &kb) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (Some(x), Some(y)) => x.compare(y).unwrap_or(Ordering::Equal),
            };
            let ordering = match direction {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use exemplar_query::{OrderByField, Predicate};
    use exemplar_schema::{EntityModel, FieldDef, Scalar, Value};
    use pretty_assertions::assert_eq;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Book {
        title: Option<String>,
        pages: Option<i64>,
    }

    impl Book {
        fn new(title: &str, pages: i64) -> Self {
            Book {
                title: Some(title.into()),
                pages: Some(pages),
            }
        }
    }

    impl Entity for Book {
        fn entity_name(&self) -> &'static str {
            "memory::tests::Book"
        }

        fn model(&self) -> EntityModel {
            EntityModel::new()
                .field(FieldDef::scalar("title"))
                .field(FieldDef::scalar("pages"))
        }

        fn field(&self, name: &str) -> Value<'_> {
            match name {
                "title" => self.title.as_deref().into(),
                "pages" => self.pages.into(),
                _ => Value::Null,
            }
        }
    }

    fn seeded() -> MemoryBackend {
        let backend = MemoryBackend::new();
        backend.insert_all([
            Book::new("The Rust Book", 500),
            Book::new("Query Compilers", 320),
            Book::new("Paging Deep Dive", 150),
        ]);
        backend
    }

    #[test]
    fn test_insert_and_len() {
        let backend = seeded();
        assert_eq!(backend.len::<Book>(), 3);
        assert!(!backend.is_empty::<Book>());
        backend.clear();
        assert!(backend.is_empty::<Book>());
    }

    #[test]
    fn test_clones_share_state() {
        let backend = seeded();
        let other = backend.clone();
        other.insert(Book::new("Fourth", 1));
        assert_eq!(backend.len::<Book>(), 4);
    }

    #[tokio::test]
    async fn test_count_applies_predicates() {
        let backend = seeded();
        let total = backend
            .count::<Book>(CountQuery {
                entity: "memory::tests::Book",
                predicates: vec![Predicate::Gte {
                    path: "pages".into(),
                    value: Scalar::Int(300),
                }],
            })
            .await
            .unwrap();
        assert_eq!(total, 2);
    }

    #[tokio::test]
    async fn test_count_on_unknown_type_is_zero() {
        let backend = MemoryBackend::new();
        let total = backend
            .count::<Book>(CountQuery {
                entity: "memory::tests::Book",
                predicates: vec![],
            })
            .await
            .unwrap();
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn test_select_sorts_and_windows() {
        let backend = seeded();
        let rows: Vec<Book> = backend
            .select(SelectQuery {
                entity: "memory::tests::Book",
                predicates: vec![],
                order: OrderBy::Field(OrderByField::desc("pages")),
                offset: Some(1),
                limit: Some(1),
                distinct: true,
            })
            .await
            .unwrap();
        assert_eq!(rows, vec![Book::new("Query Compilers", 320)]);
    }

    #[tokio::test]
    async fn test_select_like_is_case_insensitive() {
        let backend = seeded();
        let rows: Vec<Book> = backend
            .select(SelectQuery::unbounded(
                "memory::tests::Book",
                vec![Predicate::Like {
                    path: "title".into(),
                    pattern: "%rust%".into(),
                }],
            ))
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title.as_deref(), Some("The Rust Book"));
    }

    #[tokio::test]
    async fn test_nulls_sort_first() {
        let backend = MemoryBackend::new();
        backend.insert_all([
            Book::new("B", 2),
            Book {
                title: Some("A".into()),
                pages: None,
            },
        ]);
        let rows: Vec<Book> = backend
            .select(SelectQuery {
                entity: "memory::tests::Book",
                predicates: vec![],
                order: OrderBy::Field(OrderByField::asc("pages")),
                offset: None,
                limit: None,
                distinct: true,
            })
            .await
            .unwrap();
        assert_eq!(rows[0].pages, None);
        assert_eq!(rows[1].pages, Some(2));
    }
}
