//! Coercion Integration Tests
//!
//! Raw driver values, byte buffers and text coerced into canonical values for
//! every kind family, plus the tuple helpers.

#[path = "../common/mod.rs"]
mod common;

mod files;
mod properties;
mod temporal;
mod tuples;
