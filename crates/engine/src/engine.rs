//! Schema engine facade
//!
//! The storage layer calls into [`SchemaEngine`] for the two collaborator
//! operations of the schema model:
//!
//! - `(old type, new type) -> Alteration` via [`SchemaEngine::alter`], followed
//!   by [`SchemaEngine::commit`] once the storage transaction carrying the DDL
//!   commits. Alters of one type must be serialized by the caller.
//! - `(kind, raw value) -> Value` via [`SchemaEngine::coerce`] and its field
//!   and tuple variants, using the analyzer and options of this engine.
//!
//! Loaded descriptions are shared through the [`SchemaCache`].

use crate::cache::SchemaCache;
use crate::config::EngineConfig;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use schemata_core::tuple::parse_with;
use schemata_core::{
    alter, default_analyzer, naming, Alteration, ContentAnalyzer, ParseOptions, PrimitiveKind,
    RawValue, SchemaResult, Tuple, Type, Value,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Entry point for schema alteration and value coercion.
pub struct SchemaEngine {
    config: EngineConfig,
    cache: SchemaCache,
    options: ParseOptions,
}

impl SchemaEngine {
    /// Engine with `config` and the default content analyzer.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_analyzer(config, default_analyzer())
    }

    /// Engine with `config` and a custom content analyzer.
    pub fn with_analyzer(config: EngineConfig, analyzer: Arc<dyn ContentAnalyzer>) -> Self {
        let options = ParseOptions {
            analyzer,
            extract_document_text: config.extract_document_text,
        };
        Self {
            cache: SchemaCache::new(config.cache_enabled),
            config,
            options,
        }
    }

    /// Engine configured from `schemata.toml` in `dir`, creating the default
    /// file when missing.
    pub fn open(dir: &Path) -> SchemaResult<Self> {
        let config = EngineConfig::load_or_init(dir)?;
        Ok(Self::new(config))
    }

    /// Current configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The schema cache.
    pub fn cache(&self) -> &SchemaCache {
        &self.cache
    }

    /// Options used for every coercion of this engine.
    pub fn parse_options(&self) -> &ParseOptions {
        &self.options
    }

    // ========================================================================
    // Alteration
    // ========================================================================

    /// Diff `old` against `new` and compute the description to store.
    ///
    /// `at` defaults to now. Nothing is cached or invalidated until
    /// [`SchemaEngine::commit`].
    pub fn alter(&self, old: &Type, new: &Type, at: Option<DateTime<Utc>>) -> SchemaResult<Alteration> {
        let at = at.unwrap_or_else(Utc::now);
        match alter(old, new, at) {
            Ok(alteration) => {
                let result = &alteration.result;
                debug!(
                    target: "schemata::alter",
                    type_name = old.name(),
                    altered = result.is_altered(),
                    added_fields = result.added_fields().len(),
                    dropped_fields = result.dropped_fields().len(),
                    renamed_fields = result.renamed_fields().len(),
                    altered_fields = result.altered_fields().len(),
                    added_indexes = result.added_indexes().len(),
                    dropped_indexes = result.dropped_indexes().len(),
                    renamed_indexes = result.renamed_indexes().len(),
                    altered_indexes = result.altered_indexes().len(),
                    "Computed alter diff"
                );
                Ok(alteration)
            }
            Err(e) => {
                warn!(
                    target: "schemata::alter",
                    type_name = old.name(),
                    code = e.code(),
                    error = %e,
                    "Alter rejected"
                );
                Err(e)
            }
        }
    }

    /// Record that an alteration committed: the whole cache is invalidated.
    pub fn commit(&self, alteration: &Alteration) {
        info!(
            target: "schemata::alter",
            type_name = alteration.schema.name(),
            altered = alteration.result.is_altered(),
            "Alter committed"
        );
        self.cache.invalidate_all();
    }

    /// Description of `name`, from the cache or from `loader`.
    pub fn load_type<F>(&self, name: &str, loader: F) -> SchemaResult<Arc<Type>>
    where
        F: FnOnce(&str) -> SchemaResult<Type>,
    {
        naming::check_type_name(name)?;
        self.cache.get_or_load(name, loader)
    }

    // ========================================================================
    // Coercion
    // ========================================================================

    /// Coerce `raw` into the canonical value of `kind`.
    pub fn coerce(&self, kind: PrimitiveKind, raw: &RawValue) -> SchemaResult<Value> {
        parse_with(kind, raw, &self.options)
    }

    /// Coerce `raw` for `field` of `schema`, applying its range.
    pub fn coerce_field(&self, schema: &Type, field: &str, raw: &RawValue) -> SchemaResult<Option<Value>> {
        schema.coerce_with(field, raw, &self.options)
    }

    /// Coerce every entry of `tuple` for `schema`.
    pub fn coerce_tuple(&self, schema: &Type, tuple: &Tuple) -> SchemaResult<IndexMap<String, Value>> {
        schema.coerce_tuple(tuple, &self.options)
    }
}

impl Default for SchemaEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl std::fmt::Debug for SchemaEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaEngine")
            .field("config", &self.config)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
