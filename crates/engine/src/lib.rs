//! Schema engine for Schemata
//!
//! This crate wraps the pure schema model of `schemata-core` with the
//! pieces that need shared state or the filesystem:
//! - SchemaEngine: alter and coercion entry point used by the storage layer
//! - SchemaCache: insert-only-if-absent type cache with total invalidation
//! - EngineConfig: `schemata.toml` configuration
//!
//! The engine logs through `tracing` under the `schemata::alter`,
//! `schemata::cache` and `schemata::config` targets.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cache;
pub mod config;
pub mod engine;

pub use cache::SchemaCache;
pub use config::{EngineConfig, CONFIG_FILE_NAME};
pub use engine::SchemaEngine;
