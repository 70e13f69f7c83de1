//! Engine Integration Tests
//!
//! Configuration lifecycle, the schema cache under concurrent access, and the
//! alter/commit/coerce flow of the engine facade.

#[path = "../common/mod.rs"]
mod common;

mod cache_concurrency;
mod config;
