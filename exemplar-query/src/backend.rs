//! The storage seam: compiled predicates in, rows out.
//!
//! The compiler knows nothing about storage; the executor hands a backend a
//! [`CountQuery`] or [`SelectQuery`] and awaits the result. Backends resolve
//! field paths through the [`Entity`] trait (or their own row mapping) and
//! are free to execute the predicates however they like.

use std::future::Future;
use std::pin::Pin;

use exemplar_schema::Entity;

use crate::error::QueryResult;
use crate::predicate::Predicate;
use crate::sort::OrderBy;

/// A pinned, boxed, sendable future; the return shape of backend calls.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A count query over one entity type.
#[derive(Debug, Clone, PartialEq)]
pub struct CountQuery {
    /// Entity type being counted.
    pub entity: &'static str,
    /// Conjunctive filter; empty means count everything.
    pub predicates: Vec<Predicate>,
}

/// A select query over one entity type.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    /// Entity type being selected.
    pub entity: &'static str,
    /// Conjunctive filter; empty means select everything.
    pub predicates: Vec<Predicate>,
    /// Requested ordering.
    pub order: OrderBy,
    /// Rows to skip before the first returned row.
    pub offset: Option<u64>,
    /// Maximum rows to return.
    pub limit: Option<u64>,
    /// Deduplicate result rows. Always set by the executor, because joins
    /// against to-many collections can multiply rows.
    pub distinct: bool,
}

impl SelectQuery {
    /// An unbounded, unsorted, distinct select.
    pub fn unbounded(entity: &'static str, predicates: Vec<Predicate>) -> Self {
        SelectQuery {
            entity,
            predicates,
            order: OrderBy::None,
            offset: None,
            limit: None,
            distinct: true,
        }
    }
}

/// A storage engine that can execute compiled filters.
///
/// Implementations are cheap-to-clone handles (connection pools, shared
/// stores). Failures are reported as [`QueryError::Backend`] values and
/// propagate to the caller unchanged.
///
/// [`QueryError::Backend`]: crate::QueryError::Backend
pub trait Backend: Clone + Send + Sync {
    /// Count the rows matching the query's filter.
    fn count<M>(&self, query: CountQuery) -> BoxFuture<'_, QueryResult<u64>>
    where
        M: Entity + Send + Sync + 'static;

    /// Fetch the rows matching the query's filter, sorted and windowed.
    fn select<M>(&self, query: SelectQuery) -> BoxFuture<'_, QueryResult<Vec<M>>>
    where
        M: Entity + Clone + Send + Sync + 'static;
}
