//! Tuple helpers and schema-driven tuple coercion

use crate::common::*;
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use schemata::ParseOptions;
use std::str::FromStr;

fn order() -> Tuple {
    let mut tuple = Tuple::new();
    tuple.put("sku", "AB-1");
    tuple.put("price", "19.90");
    tuple.put("stock", 4i64);
    tuple.put("released", "2024-05-01");
    tuple.put("title", RawValue::Null);
    tuple
}

#[test]
fn typed_getters() {
    let tuple = order();
    assert_eq!(tuple.get_string("sku").unwrap(), Some("AB-1".to_string()));
    assert_eq!(tuple.get_int32("stock").unwrap(), Some(4));
    assert_eq!(tuple.get_numeric("price").unwrap(), Some(BigDecimal::from_str("19.90").unwrap()));
    assert_eq!(
        tuple.get_date("released").unwrap(),
        Some(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
    );
    assert_eq!(tuple.get_string("title").unwrap(), None);
    assert_eq!(tuple.get_string("missing").unwrap(), None);
    assert_eq!(tuple.get_boolean("sku").unwrap_err().code(), "invalid_boolean");
    assert_eq!(
        tuple.get_value("stock", PrimitiveKind::Int16).unwrap(),
        Some(Value::Int16(4))
    );
}

#[test]
fn numeric_getters_check_ranges() {
    let tuple = order();
    let price = decimal("3,2");
    let err = tuple.get_numeric_for("price", &price).unwrap_err();
    assert_eq!(err.code(), "out_of_range_value");
    assert!(err.to_string().contains("price"), "{}", err);
    let max = BigDecimal::from(20);
    assert!(tuple.get_numeric_in("price", None, Some(&max)).unwrap().is_some());
}

#[test]
fn put_if_null_only_fills_gaps() {
    let mut tuple = order();
    tuple.put_if_null("title", "Untitled");
    tuple.put_if_null("sku", "ignored");
    tuple.put_if_null("extra", "added");
    assert_eq!(tuple.get("title"), Some(&RawValue::from("Untitled")));
    assert_eq!(tuple.get("sku"), Some(&RawValue::from("AB-1")));
    let keys: Vec<&str> = tuple.keys().collect();
    assert_eq!(keys, ["sku", "price", "stock", "released", "title", "extra"]);

    tuple.remove("price");
    let keys: Vec<&str> = tuple.keys().collect();
    assert_eq!(keys, ["sku", "stock", "released", "title", "extra"]);
}

#[test]
fn nested_tuples() {
    let mut tuple = Tuple::new();
    tuple.put("address", "street: Main 1, city: Springfield");
    let nested = tuple.get_tuple("address").unwrap().unwrap();
    assert_eq!(nested.get_string("city").unwrap(), Some("Springfield".to_string()));
    tuple.put("broken", "street");
    assert_eq!(tuple.get_tuple("broken").unwrap_err().code(), "invalid_tuple");
}

#[test]
fn schema_coerces_whole_tuple_in_field_order() {
    let mut tuple = order();
    tuple.put("id", "ignored-system-column");
    let values = product().coerce_tuple(&tuple, &ParseOptions::default()).unwrap();
    let keys: Vec<&str> = values.keys().map(String::as_str).collect();
    assert_eq!(keys, ["sku", "price", "stock", "released"]);
    assert_eq!(values["stock"], Value::Int32(4));
    assert_eq!(values["price"], Value::Numeric(BigDecimal::from_str("19.90").unwrap()));
}

#[test]
fn schema_rejects_unknown_and_invalid_entries() {
    let mut tuple = order();
    tuple.put("colour", "red");
    assert_code(
        product().coerce_tuple(&tuple, &ParseOptions::default()),
        "field_not_found",
    );

    let mut tuple = order();
    tuple.put("stock", -1i64);
    assert_code(
        product().coerce_tuple(&tuple, &ParseOptions::default()),
        "out_of_range_value",
    );
    assert_code(product().coerce("colour", &RawValue::from("red")), "field_not_found");
}

#[test]
fn tuples_collect_from_pairs() {
    let tuple: Tuple = vec![("a", "1"), ("b", "2")].into_iter().collect();
    assert_eq!(tuple.len(), 2);
    assert!(tuple.contains_key("b"));
    let pairs: Vec<(String, RawValue)> = tuple.into_iter().collect();
    assert_eq!(pairs[0], ("a".to_string(), RawValue::from("1")));
}
