//! The paged/list query executor.
//!
//! Compiles an example once, then drives the backend: a count first, and —
//! only when something matched — the data select. Both legs run distinct
//! selects because joins against to-many collections can multiply rows.

use exemplar_schema::{Entity, MetadataCache};
use tracing::debug;

use crate::backend::{Backend, CountQuery, SelectQuery};
use crate::compile::compile_with;
use crate::error::QueryResult;
use crate::page::{Page, PageRequest};
use crate::predicate::CompiledFilter;

/// Executes example queries against a [`Backend`].
///
/// The executor is a thin, cheap-to-clone pairing of a backend handle and a
/// metadata cache; all per-call state lives on the stack of one call.
#[derive(Clone)]
pub struct QueryExecutor<B: Backend> {
    backend: B,
    cache: &'static MetadataCache,
}

impl<B: Backend> QueryExecutor<B> {
    /// Create an executor over the given backend, using the process-wide
    /// metadata cache.
    pub fn new(backend: B) -> Self {
        QueryExecutor {
            backend,
            cache: MetadataCache::global(),
        }
    }

    /// The underlying backend handle.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Compile an example without executing anything.
    pub fn compile(&self, example: &dyn Entity) -> QueryResult<CompiledFilter> {
        compile_with(self.cache, example)
    }

    /// Count the entities matching the example.
    pub async fn count_by_example<M>(&self, example: &M) -> QueryResult<u64>
    where
        M: Entity + Send + Sync + 'static,
    {
        let filter = self.compile(example)?;
        self.backend
            .count::<M>(CountQuery {
                entity: example.entity_name(),
                predicates: filter.predicates,
            })
            .await
    }

    /// Fetch every entity matching the example, unsorted and unbounded.
    pub async fn query_for_list<M>(&self, example: &M) -> QueryResult<Vec<M>>
    where
        M: Entity + Clone + Send + Sync + 'static,
    {
        let filter = self.compile(example)?;
        self.backend
            .select::<M>(SelectQuery::unbounded(example.entity_name(), filter.predicates))
            .await
    }

    /// Fetch one page of entities matching the example.
    ///
    /// Issues the count first; when nothing matches, returns an empty page
    /// without touching the backend again.
    pub async fn query_for_page<M>(&self, example: &M, request: PageRequest) -> QueryResult<Page<M>>
    where
        M: Entity + Clone + Send + Sync + 'static,
    {
        let entity = example.entity_name();
        let filter = self.compile(example)?;

        let total = self
            .backend
            .count::<M>(CountQuery {
                entity,
                predicates: filter.predicates.clone(),
            })
            .await?;
        if total == 0 {
            debug!(entity, "no rows match the example, skipping the select");
            return Ok(Page::empty(&request));
        }

        let items = self
            .backend
            .select::<M>(SelectQuery {
                entity,
                predicates: filter.predicates,
                order: request.sort.clone(),
                offset: Some(request.offset()),
                limit: Some(request.size),
                distinct: true,
            })
            .await?;
        Ok(Page::new(items, &request, total))
    }
}
