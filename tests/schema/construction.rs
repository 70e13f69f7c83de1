//! Field, index and type construction

use crate::common::*;
use bigdecimal::BigDecimal;
use chrono::{FixedOffset, TimeZone};
use schemata::{numeric_max, FieldParameters, Record, MAX_NUMERIC_PRECISION};
use std::str::FromStr;

#[test]
fn parameter_string_and_structured_paths_agree() {
    let cases: [(PrimitiveKind, Option<&str>, Option<u32>, Option<u32>, Option<u32>); 6] = [
        (PrimitiveKind::Numeric, Some("10,2"), None, Some(10), Some(2)),
        (PrimitiveKind::Numeric, Some("10"), None, Some(10), None),
        (PrimitiveKind::Numeric, None, None, None, None),
        (PrimitiveKind::String, Some("64"), Some(64), None, None),
        (PrimitiveKind::Email, None, None, None, None),
        (PrimitiveKind::Int64, None, None, None, None),
    ];
    for (kind, parameters, length, precision, scale) in cases {
        let text = TypeField::from_parameters(kind, parameters, true).unwrap();
        let structured = TypeField::structured(kind, length, precision, scale, true).unwrap();
        assert_eq!(text, structured, "{} {:?}", kind, parameters);
        assert_eq!(text.parameters_string(), structured.parameters_string());
        assert_eq!(text.precision(), structured.precision());
        assert_eq!(text.scale(), structured.scale());
        assert_eq!(text.range(), structured.range());
    }
}

#[test]
fn decimal_field_derives_all_nines_range() {
    let field = decimal("10,2");
    assert_eq!(
        field.parameters(),
        FieldParameters::Decimal {
            precision: 10,
            scale: 2
        }
    );
    let range = field.range().unwrap();
    assert_eq!(range.max().unwrap().to_string(), "99999999.99");
    assert_eq!(range.min().unwrap().to_string(), "-99999999.99");
}

#[test]
fn numeric_max_formula() {
    assert_eq!(numeric_max(5, 2), BigDecimal::from_str("999.99").unwrap());
    assert_eq!(numeric_max(3, 3), BigDecimal::from_str("0.999").unwrap());
    assert_eq!(numeric_max(4, 0), BigDecimal::from_str("9999").unwrap());
    assert_eq!(numeric_max(5, 2).to_string(), "999.99");
    assert_eq!(numeric_max(3, 3).to_string(), "0.999");
}

#[test]
fn string_fields_default_to_250() {
    for kind in [PrimitiveKind::String, PrimitiveKind::Url, PrimitiveKind::Email, PrimitiveKind::Tel] {
        assert_eq!(field(kind).length(), Some(250), "{}", kind);
    }
    assert_eq!(field(PrimitiveKind::Text).length(), None);
}

#[test]
fn parameter_syntax_is_checked() {
    assert_code(
        TypeField::from_parameters(PrimitiveKind::Numeric, Some("10;2"), false),
        "invalid_parameters",
    );
    assert_code(
        TypeField::from_parameters(PrimitiveKind::String, Some("-5"), false),
        "invalid_parameters",
    );
    assert_code(
        TypeField::from_parameters(PrimitiveKind::Boolean, Some("1"), false),
        "invalid_parameters",
    );
}

#[test]
fn numeric_precision_is_capped() {
    let widest = TypeField::from_parameters(PrimitiveKind::Numeric, Some("1000,1000"), false).unwrap();
    assert_eq!(widest.precision_scale(), Some((1000, 1000)));
    for parameters in ["1001", "2000000", "10,1001"] {
        assert_code(
            TypeField::from_parameters(PrimitiveKind::Numeric, Some(parameters), false),
            "invalid_parameters",
        );
    }
    assert_code(
        TypeField::structured(PrimitiveKind::Numeric, None, Some(2_000_000), None, false),
        "invalid_parameters",
    );
    assert_code(
        TypeField::structured(PrimitiveKind::Numeric, None, Some(10), Some(MAX_NUMERIC_PRECISION + 1), false),
        "invalid_parameters",
    );
}

#[test]
fn reserved_field_names_are_rejected_for_every_kind() {
    for name in ["id", "udate"] {
        for kind in PrimitiveKind::ALL {
            assert_code(Type::builder("thing").field(name, field(kind)).build(), "field_reserved_name");
        }
    }
}

#[test]
fn name_length_limits() {
    let long = "n".repeat(31);
    assert_code(Type::builder(long.as_str()).build(), "type_name_too_long");
    assert_code(
        Type::builder("thing").field(long.as_str(), field(PrimitiveKind::Int32)).build(),
        "field_name_too_long",
    );
    assert_code(
        Type::builder("thing")
            .field("a", field(PrimitiveKind::Int32))
            .index(long.as_str(), index("x", IndexMode::Index, &["a"]))
            .build(),
        "index_name_too_long",
    );
    assert_code(
        Type::builder("thing")
            .action(long.as_str(), Vec::<(String, TypeField)>::new())
            .build(),
        "action_name_too_long",
    );
    let ok = "n".repeat(30);
    assert!(Type::builder(ok.as_str()).build().is_ok());
}

#[test]
fn type_names_cannot_shadow_kinds() {
    assert_code(Type::builder("string").build(), "primitive_type_name_collision");
    assert_code(Type::builder("datetime").build(), "primitive_type_name_collision");
    assert_code(Type::builder("static").build(), "type_reserved_name");
    assert_code(Type::builder("").build(), "empty_type_name");
}

#[test]
fn duplicate_actions_are_rejected() {
    assert_code(
        Type::builder("thing")
            .action("go", [("a", field(PrimitiveKind::Int32))])
            .action("go", [("b", field(PrimitiveKind::Int32))])
            .build(),
        "duplicate_action",
    );
    assert_code(
        Type::builder("thing")
            .action("go", [("a", field(PrimitiveKind::Int32)), ("a", field(PrimitiveKind::Text))])
            .build(),
        "duplicate_field",
    );
}

#[test]
fn fixture_type_keeps_declaration_order() {
    let product = product();
    let fields: Vec<&str> = product.fields().keys().map(String::as_str).collect();
    assert_eq!(
        fields,
        ["sku", "title", "price", "stock", "released", "description", "photo"]
    );
    let indexes: Vec<&str> = product.indexes().keys().map(String::as_str).collect();
    assert_eq!(indexes, ["by_sku", "by_title"]);
    assert_eq!(product.created_at(), Some(instant(2023, 1, 1)));
}

#[test]
fn timestamps_must_be_utc() {
    let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
    let local = plus_two.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    assert_code(Type::builder("thing").created_at(local).build(), "invalid_timezone");
    assert_code(Record::new("thing", "t1").unwrap().with_udate(local), "invalid_timezone");

    let zero = FixedOffset::east_opt(0).unwrap();
    let utc = zero.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let record = Record::new("thing", "t1").unwrap().with_cdate(utc).unwrap();
    assert_eq!(record.cdate(), Some(instant(2024, 5, 1) + chrono::Duration::hours(12)));
}

#[test]
fn explicit_range_replaces_natural_bound() {
    let stock = product().field("stock").unwrap().clone();
    let range = stock.range().unwrap();
    assert_eq!(range.min(), Some(&Value::Int32(0)));
    assert_eq!(range.max(), Some(&Value::Int32(i32::MAX)));
    assert_code(stock.coerce(&RawValue::Int(-1)), "out_of_range_value");
}

#[test]
fn field_range_boundaries() {
    let range = FieldRange::new(Some(Value::Int32(10)), Some(Value::Int32(20))).unwrap();
    assert!(range.is_in_range(&Value::Int32(10)));
    assert!(!range.is_in_range(&Value::Int32(21)));
    assert!(!range.is_in_range(&Value::Int32(9)));
}
