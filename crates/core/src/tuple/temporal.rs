//! Temporal coercion
//!
//! Dates, times and timestamps come from ISO text or from driver objects.
//! UTC timestamps must carry a zero offset; anything else is rejected with
//! `invalid_timezone` rather than silently converted.

use crate::error::{SchemaError, SchemaResult};
use crate::kind::PrimitiveKind;
use crate::scalar::TimeZone;
use crate::value::{RawValue, Value};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use super::text::bytes_to_string;

const TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M"];
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

fn unexpected(kind: PrimitiveKind, raw: &RawValue) -> SchemaError {
    SchemaError::UnexpectedValue {
        kind,
        found: raw.shape(),
    }
}

/// Text of a `Text` or `Bytes` input.
fn text_of(kind: PrimitiveKind, raw: &RawValue) -> SchemaResult<Option<String>> {
    match raw {
        RawValue::Text(s) => Ok(Some(s.trim().to_string())),
        RawValue::Bytes(b) => Ok(Some(bytes_to_string(kind, b)?.trim().to_string())),
        _ => Ok(None),
    }
}

/// Convert an offset timestamp to UTC, failing unless the offset is zero.
pub fn require_utc(value: DateTime<FixedOffset>) -> SchemaResult<DateTime<Utc>> {
    if value.offset().local_minus_utc() != 0 {
        return Err(SchemaError::InvalidTimezone {
            value: value.offset().to_string(),
        });
    }
    Ok(value.with_timezone(&Utc))
}

/// Coerce to a calendar date.
pub fn parse_date(raw: &RawValue) -> SchemaResult<NaiveDate> {
    let kind = PrimitiveKind::Date;
    if let Some(text) = text_of(kind, raw)? {
        return NaiveDate::parse_from_str(&text, "%Y-%m-%d")
            .map_err(|_| SchemaError::invalid_value(kind, text));
    }
    match raw {
        RawValue::Date(d) | RawValue::Typed(Value::Date(d)) => Ok(*d),
        RawValue::Timestamp(ts) => Ok(ts.date()),
        RawValue::TimestampTz(ts) => Ok(ts.date_naive()),
        _ => Err(unexpected(kind, raw)),
    }
}

/// Coerce to a time of day.
pub fn parse_time(raw: &RawValue) -> SchemaResult<NaiveTime> {
    let kind = PrimitiveKind::Time;
    if let Some(text) = text_of(kind, raw)? {
        return TIME_FORMATS
            .iter()
            .find_map(|format| NaiveTime::parse_from_str(&text, format).ok())
            .ok_or_else(|| SchemaError::invalid_value(kind, text));
    }
    match raw {
        RawValue::Time(t) | RawValue::Typed(Value::Time(t)) => Ok(*t),
        RawValue::Timestamp(ts) => Ok(ts.time()),
        RawValue::TimestampTz(ts) => Ok(ts.time()),
        _ => Err(unexpected(kind, raw)),
    }
}

/// Coerce to a date and time without offset.
pub fn parse_datetime(raw: &RawValue) -> SchemaResult<NaiveDateTime> {
    let kind = PrimitiveKind::DateTime;
    if let Some(text) = text_of(kind, raw)? {
        return DATETIME_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(&text, format).ok())
            .ok_or_else(|| SchemaError::invalid_value(kind, text));
    }
    match raw {
        RawValue::Timestamp(ts) | RawValue::Typed(Value::DateTime(ts)) => Ok(*ts),
        RawValue::TimestampTz(ts) => Ok(ts.naive_local()),
        RawValue::Typed(Value::UtcDateTime(ts)) => Ok(ts.naive_utc()),
        _ => Err(unexpected(kind, raw)),
    }
}

/// Coerce to an instant that is required to be UTC.
///
/// Text must be RFC 3339 with a `Z` or zero offset (a trailing `[UTC]` zone
/// tag is tolerated). Timestamps without offset are taken as UTC.
pub fn parse_utc_datetime(raw: &RawValue) -> SchemaResult<DateTime<Utc>> {
    let kind = PrimitiveKind::DateTime;
    if let Some(text) = text_of(kind, raw)? {
        let stripped = text.strip_suffix("[UTC]").unwrap_or(&text);
        let parsed = DateTime::parse_from_rfc3339(stripped)
            .map_err(|_| SchemaError::invalid_value(kind, &text))?;
        return require_utc(parsed);
    }
    match raw {
        RawValue::Timestamp(ts) | RawValue::Typed(Value::DateTime(ts)) => Ok(ts.and_utc()),
        RawValue::TimestampTz(ts) => require_utc(*ts),
        RawValue::Typed(Value::UtcDateTime(ts)) => Ok(*ts),
        _ => Err(unexpected(kind, raw)),
    }
}

/// Coerce to a time zone.
pub fn parse_timezone(raw: &RawValue) -> SchemaResult<TimeZone> {
    let kind = PrimitiveKind::TimeZone;
    if let Some(text) = text_of(kind, raw)? {
        return TimeZone::parse(&text);
    }
    match raw {
        RawValue::Typed(Value::TimeZone(zone)) => Ok(zone.clone()),
        _ => Err(unexpected(kind, raw)),
    }
}

/// Entity tag of a UTC instant: the quoted hex of its epoch milliseconds.
pub fn parse_etag(raw: &RawValue) -> SchemaResult<String> {
    parse_utc_datetime(raw).map(|instant| etag(&instant))
}

/// Entity tag of `instant`.
pub fn etag(instant: &DateTime<Utc>) -> String {
    format!("\"{:x}\"", instant.timestamp_millis())
}
