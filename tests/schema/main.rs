//! Schema Model Integration Tests
//!
//! Field construction, naming rules, type building, the schema description
//! format and the alter diff.

#[path = "../common/mod.rs"]
mod common;

mod alter;
mod construction;
