//! Process-wide metadata cache.
//!
//! Derives and memoizes, per entity type, the ordered field descriptors and
//! the ordered custom-condition descriptors. Descriptor derivation and
//! validation run once per type; every later compile of that type reads the
//! cached result.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use tracing::{debug, trace};

use crate::entity::Entity;
use crate::error::SchemaResult;
use crate::model::{EntityModel, FieldDef, FieldKind, PrimitiveKind};
use crate::operator::Operator;
use crate::validate::validate;

/// Descriptor of one custom-instruction field, derived once per type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionDef {
    /// Owning field name
    pub field: SmolStr,
    /// The declared operator
    pub operator: Operator,
    /// Declared kind of the owning field
    pub kind: FieldKind,
    /// Primitive kind of the owning field, if any
    pub primitive: Option<PrimitiveKind>,
    /// Owning field is excluded from filtering
    pub excluded: bool,
    /// Zero value of the owning field is a real condition
    pub allow_zero: bool,
}

/// Validated, cached shape of one entity type.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityMetadata {
    name: &'static str,
    fields: IndexMap<SmolStr, FieldDef>,
    conditions: Vec<ConditionDef>,
}

impl EntityMetadata {
    fn build(name: &'static str, model: EntityModel) -> SchemaResult<Self> {
        validate(name, &model)?;
        let mut fields = IndexMap::with_capacity(model.len());
        let mut conditions = Vec::new();
        for def in model.fields() {
            if let Some(operator) = def.operator {
                conditions.push(ConditionDef {
                    field: def.name.clone(),
                    operator,
                    kind: def.kind,
                    primitive: def.primitive,
                    excluded: def.excluded,
                    allow_zero: def.allow_zero,
                });
            }
            fields.insert(def.name.clone(), def.clone());
        }
        Ok(EntityMetadata {
            name,
            fields,
            conditions,
        })
    }

    /// Entity name this metadata describes.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// All declared fields, in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.values()
    }

    /// Look up one field descriptor by name.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.get(name)
    }

    /// Custom-instruction descriptors, in declaration order.
    pub fn conditions(&self) -> &[ConditionDef] {
        &self.conditions
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the entity declares no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Cache statistics for monitoring.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of entity types currently cached
    pub cached_count: usize,
}

impl CacheStats {
    /// Hit rate as a fraction between 0 and 1.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

static GLOBAL_METADATA: LazyLock<MetadataCache> = LazyLock::new(MetadataCache::new);

/// Read-through cache of [`EntityMetadata`], keyed by entity name.
///
/// First sight of a type pays the model build and validation; all later
/// callers clone the cached `Arc`. Population is not exactly-once: two
/// threads racing on the same new type may both derive the metadata, the
/// results are equal and the last write wins. That keeps the read path free
/// of per-key locks. No eviction; entity schemas are static for the process
/// lifetime.
///
/// # Examples
///
/// ```rust
/// use exemplar_schema::{Entity, EntityModel, FieldDef, MetadataCache, Value};
///
/// struct Tag {
///     label: Option<String>,
/// }
///
/// impl Entity for Tag {
///     fn entity_name(&self) -> &'static str {
///         "Tag"
///     }
///     fn model(&self) -> EntityModel {
///         EntityModel::new().field(FieldDef::scalar("label"))
///     }
///     fn field(&self, name: &str) -> Value<'_> {
///         match name {
///             "label" => self.label.as_deref().into(),
///             _ => Value::Null,
///         }
///     }
/// }
///
/// let cache = MetadataCache::new();
/// let tag = Tag { label: None };
/// let meta = cache.describe(&tag).unwrap();
/// assert_eq!(meta.name(), "Tag");
/// assert_eq!(cache.stats().misses, 1);
///
/// cache.describe(&tag).unwrap();
/// assert_eq!(cache.stats().hits, 1);
/// ```
pub struct MetadataCache {
    cache: RwLock<HashMap<&'static str, Arc<EntityMetadata>>>,
    stats: RwLock<CacheStats>,
}

impl MetadataCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        MetadataCache {
            cache: RwLock::new(HashMap::new()),
            stats: RwLock::new(CacheStats::default()),
        }
    }

    /// The process-wide cache instance.
    pub fn global() -> &'static MetadataCache {
        &GLOBAL_METADATA
    }

    /// Descriptors for the entity's type, derived on first sight.
    pub fn describe(&self, entity: &dyn Entity) -> SchemaResult<Arc<EntityMetadata>> {
        let name = entity.entity_name();
        {
            let cache = self.cache.read();
            if let Some(meta) = cache.get(name) {
                self.stats.write().hits += 1;
                trace!(entity = name, "metadata cache hit");
                return Ok(meta.clone());
            }
        }
        self.stats.write().misses += 1;

        debug!(entity = name, "deriving entity metadata");
        let meta = Arc::new(EntityMetadata::build(name, entity.model())?);

        let mut cache = self.cache.write();
        cache.insert(name, meta.clone());
        self.stats.write().cached_count = cache.len();
        Ok(meta)
    }

    /// Current statistics snapshot.
    pub fn stats(&self) -> CacheStats {
        self.stats.read().clone()
    }

    /// Whether a type has been described already.
    pub fn contains(&self, entity_name: &str) -> bool {
        self.cache.read().contains_key(entity_name)
    }

    /// Number of cached entity types.
    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.cache.read().is_empty()
    }

    /// Drop all cached metadata and reset statistics.
    pub fn clear(&self) {
        self.cache.write().clear();
        *self.stats.write() = CacheStats::default();
    }
}

impl Default for MetadataCache {
    fn default() -> Self {
        MetadataCache::new()
    }
}

/// Describe an entity through the process-wide cache.
pub fn describe(entity: &dyn Entity) -> SchemaResult<Arc<EntityMetadata>> {
    MetadataCache::global().describe(entity)
}
