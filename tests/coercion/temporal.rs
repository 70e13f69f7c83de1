//! Temporal coercion

use crate::common::*;
use chrono::{FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use schemata::parse;
use schemata::tuple::{etag, parse_etag, parse_utc_datetime};

#[test]
fn textual_forms_round_trip() {
    let cases = [
        (PrimitiveKind::Date, "2024-02-29"),
        (PrimitiveKind::Time, "23:59:58"),
        (PrimitiveKind::Time, "08:30:15.125"),
        (PrimitiveKind::DateTime, "2024-02-29T08:05:03.250"),
        (PrimitiveKind::DateTime, "1999-12-31T23:59:59"),
    ];
    for (kind, text) in cases {
        let value = parse(kind, &RawValue::from(text)).unwrap();
        assert_eq!(value.to_string(), text, "{}", kind);
        assert_eq!(parse(kind, &RawValue::from(value.to_string())).unwrap(), value);
    }
}

#[test]
fn driver_objects_are_accepted() {
    let date = NaiveDate::from_ymd_opt(2024, 7, 4).unwrap();
    let ts = date.and_hms_opt(9, 15, 0).unwrap();
    assert_eq!(parse(PrimitiveKind::Date, &RawValue::Date(date)).unwrap(), Value::Date(date));
    assert_eq!(parse(PrimitiveKind::Date, &RawValue::Timestamp(ts)).unwrap(), Value::Date(date));
    assert_eq!(
        parse(PrimitiveKind::Time, &RawValue::Timestamp(ts)).unwrap(),
        Value::Time(NaiveTime::from_hms_opt(9, 15, 0).unwrap())
    );
    assert_eq!(parse(PrimitiveKind::DateTime, &RawValue::Timestamp(ts)).unwrap(), Value::DateTime(ts));
}

#[test]
fn malformed_text_uses_kind_specific_codes() {
    assert_code(parse(PrimitiveKind::Date, &RawValue::from("2023-02-29")), "invalid_date");
    assert_code(parse(PrimitiveKind::Time, &RawValue::from("24:01")), "invalid_time");
    assert_code(parse(PrimitiveKind::DateTime, &RawValue::from("yesterday")), "invalid_datetime");
    assert_code(parse(PrimitiveKind::Date, &RawValue::Bool(true)), "unexpected_value");
}

#[test]
fn utc_instants_reject_other_offsets() {
    let expected = Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap();
    for text in ["2024-03-01T08:30:00Z", "2024-03-01T08:30:00+00:00", "2024-03-01T08:30:00Z[UTC]"] {
        assert_eq!(parse_utc_datetime(&RawValue::from(text)).unwrap(), expected, "{}", text);
    }
    assert_code(parse_utc_datetime(&RawValue::from("2024-03-01T10:30:00+02:00")), "invalid_timezone");

    let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
    let ts = tokyo.with_ymd_and_hms(2024, 3, 1, 17, 30, 0).unwrap();
    assert_code(parse_utc_datetime(&RawValue::TimestampTz(ts)), "invalid_timezone");
}

#[test]
fn time_zones() {
    for zone in ["Europe/Madrid", "America/Argentina/Buenos_Aires", "UTC"] {
        let value = parse(PrimitiveKind::TimeZone, &RawValue::from(zone)).unwrap();
        assert_eq!(value.to_string(), zone);
    }
    assert_code(parse(PrimitiveKind::TimeZone, &RawValue::from("not a zone")), "invalid_timezone");
}

#[test]
fn etags_follow_update_instant() {
    let instant = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
    let tag = etag(&instant);
    assert!(tag.starts_with('"') && tag.ends_with('"'));
    assert_eq!(tag, format!("\"{:x}\"", 1_700_000_000_000i64));
    assert_eq!(parse_etag(&RawValue::from("2023-11-14T22:13:20Z")).unwrap(), tag);

    let record = schemata::Record::new("article", "a-1")
        .unwrap()
        .with_udate(instant)
        .unwrap();
    assert_eq!(record.etag(), Some(tag));
    assert_eq!(record.name(), "a-1");
}
