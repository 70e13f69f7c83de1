//! Shared fixtures for all integration test suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from any suite's main.rs.

#![allow(dead_code)]
#![allow(unused_imports)]

pub use schemata::{
    AlterFieldResult, AlterIndexResult, AlterResult, Alteration, EngineConfig, FieldRange,
    IndexMode, PrimitiveKind, RawValue, SchemaEngine, SchemaError, Tuple, Type, TypeField,
    TypeIndex, Value,
};

use chrono::{DateTime, TimeZone, Utc};

// ============================================================================
// Field helpers
// ============================================================================

/// Field of `kind` with default parameters.
pub fn field(kind: PrimitiveKind) -> TypeField {
    TypeField::new(kind).unwrap()
}

/// Decimal field declared with a parameter string such as `"10,2"`.
pub fn decimal(parameters: &str) -> TypeField {
    TypeField::from_parameters(PrimitiveKind::Numeric, Some(parameters), false).unwrap()
}

/// Index over `fields`.
pub fn index(name: &str, mode: IndexMode, fields: &[&str]) -> TypeIndex {
    TypeIndex::new(name, mode, fields.iter().copied()).unwrap()
}

/// Fixed UTC instant.
pub fn instant(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
}

// ============================================================================
// Type fixtures
// ============================================================================

/// A product catalogue type exercising most field families.
pub fn product() -> Type {
    Type::builder("product")
        .created_at(instant(2023, 1, 1))
        .field("sku", field(PrimitiveKind::String))
        .field("title", TypeField::from_parameters(PrimitiveKind::String, Some("120"), true).unwrap())
        .field("price", decimal("10,2"))
        .field(
            "stock",
            field(PrimitiveKind::Int32).with_range(Some("0"), None).unwrap(),
        )
        .field("released", field(PrimitiveKind::Date))
        .field("description", field(PrimitiveKind::Html))
        .field("photo", field(PrimitiveKind::Image))
        .index("by_sku", index("by_sku", IndexMode::Unique, &["sku"]))
        .index("by_title", index("by_title", IndexMode::Fulltext, &["title", "description"]))
        .action(
            "restock",
            [("quantity", field(PrimitiveKind::Int32)), ("note", field(PrimitiveKind::Text))],
        )
        .build()
        .unwrap()
}

/// Assert `err` carries the error-kind tag `code`.
pub fn assert_code<T: std::fmt::Debug>(result: Result<T, SchemaError>, code: &str) {
    match result {
        Ok(value) => panic!("expected {} error, got Ok({:?})", code, value),
        Err(err) => assert_eq!(err.code(), code, "unexpected error: {}", err),
    }
}
