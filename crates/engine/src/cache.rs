//! Schema cache
//!
//! Loaded type descriptions keyed by type name. Entries are
//! insert-only-if-absent: once a name is cached it is never overwritten, so
//! concurrent first-time loads agree on a single winner. The only way to
//! remove entries is [`SchemaCache::invalidate_all`], which clears the whole
//! cache; there is no per-entry eviction, because an index can depend on a
//! field renamed by the same alter.
//!
//! # Invalidation vs. in-flight loads
//!
//! A load that started before an invalidation must not repopulate the cache
//! with the description it read. Every load records the cache generation
//! before calling the loader and inserts only if the generation is unchanged.
//! Inserts hold the gate for reading and invalidation holds it for writing,
//! so the generation check and the insert are atomic with respect to
//! invalidation.

use dashmap::DashMap;
use parking_lot::RwLock;
use schemata_core::{SchemaResult, Type};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Concurrent type-name → description cache.
pub struct SchemaCache {
    enabled: bool,
    entries: DashMap<String, Arc<Type>>,
    gate: RwLock<()>,
    generation: AtomicU64,
}

impl SchemaCache {
    /// Empty cache. A disabled cache never stores anything.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            entries: DashMap::new(),
            gate: RwLock::new(()),
            generation: AtomicU64::new(0),
        }
    }

    /// Whether the cache stores entries.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Cached description of `name`.
    pub fn get(&self, name: &str) -> Option<Arc<Type>> {
        if !self.enabled {
            return None;
        }
        let hit = self.entries.get(name).map(|entry| entry.value().clone());
        debug!(target: "schemata::cache", type_name = name, hit = hit.is_some(), "Cache lookup");
        hit
    }

    /// Insert `schema` under its name unless an entry already exists.
    ///
    /// Returns the cached entry, which is the existing one when another
    /// caller got there first.
    pub fn insert_if_absent(&self, schema: Type) -> Arc<Type> {
        let generation = self.generation();
        self.insert_at(generation, Arc::new(schema))
    }

    /// Cached description of `name`, calling `loader` on a miss.
    ///
    /// Loader errors propagate and leave the cache untouched.
    pub fn get_or_load<F>(&self, name: &str, loader: F) -> SchemaResult<Arc<Type>>
    where
        F: FnOnce(&str) -> SchemaResult<Type>,
    {
        if let Some(hit) = self.get(name) {
            return Ok(hit);
        }
        let generation = self.generation();
        let loaded = Arc::new(loader(name)?);
        Ok(self.insert_at(generation, loaded))
    }

    fn insert_at(&self, generation: u64, schema: Arc<Type>) -> Arc<Type> {
        if !self.enabled {
            return schema;
        }
        let _gate = self.gate.read();
        if self.generation.load(Ordering::Acquire) != generation {
            debug!(
                target: "schemata::cache",
                type_name = schema.name(),
                "Skipping insert of description loaded before invalidation"
            );
            return schema;
        }
        let entry = self
            .entries
            .entry(schema.name().to_string())
            .or_insert_with(|| {
                debug!(target: "schemata::cache", type_name = schema.name(), "Cache insert");
                schema.clone()
            });
        entry.value().clone()
    }

    /// Drop every entry.
    pub fn invalidate_all(&self) {
        let _gate = self.gate.write();
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        let dropped = self.entries.len();
        self.entries.clear();
        info!(target: "schemata::cache", generation, dropped, "Schema cache invalidated");
    }

    /// Number of invalidations so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SchemaCache {
    fn default() -> Self {
        Self::new(true)
    }
}

impl std::fmt::Debug for SchemaCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaCache")
            .field("enabled", &self.enabled)
            .field("entries", &self.entries.len())
            .field("generation", &self.generation())
            .finish()
    }
}
