//! Typed values and raw driver representations
//!
//! [`Value`] is the canonical typed form of a field value: one variant per
//! primitive kind (plus a UTC timestamp used for system columns).
//! [`RawValue`] is whatever arrives from a driver, a form or an import file
//! before it is coerced by the parse functions in [`crate::tuple`].

use crate::file::{Document, File, Image};
use crate::hex;
use crate::kind::PrimitiveKind;
use crate::scalar::{Color, Email, TimeZone, Url, Xml};
use crate::tuple::Tuple;
use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Canonical typed field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// 16-bit integer
    Int16(i16),
    /// 32-bit integer
    Int32(i32),
    /// 64-bit integer
    Int64(i64),
    /// 32-bit float
    Float32(f32),
    /// 64-bit float
    Float64(f64),
    /// Decimal
    Numeric(BigDecimal),
    /// Boolean
    Boolean(bool),
    /// Short string
    String(String),
    /// Long text
    Text(String),
    /// Rich text
    Html(String),
    /// JSON document
    Json(serde_json::Value),
    /// XML document
    Xml(Xml),
    /// URL
    Url(Url),
    /// Email address
    Email(Email),
    /// Phone number
    Tel(String),
    /// Password
    Password(String),
    /// Date
    Date(NaiveDate),
    /// Time of day
    Time(NaiveTime),
    /// Date and time without offset
    DateTime(NaiveDateTime),
    /// Instant in UTC (system timestamps)
    UtcDateTime(DateTime<Utc>),
    /// Time zone
    TimeZone(TimeZone),
    /// Color
    Color(Color),
    /// Raw bytes
    Binary(Vec<u8>),
    /// Generic file
    File(File),
    /// Image
    Image(Image),
    /// Document
    Document(Document),
    /// Audio file
    Audio(File),
    /// Video file
    Video(File),
}

impl Value {
    /// Kind of this value. UTC timestamps report [`PrimitiveKind::DateTime`].
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Value::Int16(_) => PrimitiveKind::Int16,
            Value::Int32(_) => PrimitiveKind::Int32,
            Value::Int64(_) => PrimitiveKind::Int64,
            Value::Float32(_) => PrimitiveKind::Float32,
            Value::Float64(_) => PrimitiveKind::Float64,
            Value::Numeric(_) => PrimitiveKind::Numeric,
            Value::Boolean(_) => PrimitiveKind::Boolean,
            Value::String(_) => PrimitiveKind::String,
            Value::Text(_) => PrimitiveKind::Text,
            Value::Html(_) => PrimitiveKind::Html,
            Value::Json(_) => PrimitiveKind::Json,
            Value::Xml(_) => PrimitiveKind::Xml,
            Value::Url(_) => PrimitiveKind::Url,
            Value::Email(_) => PrimitiveKind::Email,
            Value::Tel(_) => PrimitiveKind::Tel,
            Value::Password(_) => PrimitiveKind::Password,
            Value::Date(_) => PrimitiveKind::Date,
            Value::Time(_) => PrimitiveKind::Time,
            Value::DateTime(_) | Value::UtcDateTime(_) => PrimitiveKind::DateTime,
            Value::TimeZone(_) => PrimitiveKind::TimeZone,
            Value::Color(_) => PrimitiveKind::Color,
            Value::Binary(_) => PrimitiveKind::Binary,
            Value::File(_) => PrimitiveKind::File,
            Value::Image(_) => PrimitiveKind::Image,
            Value::Document(_) => PrimitiveKind::Document,
            Value::Audio(_) => PrimitiveKind::Audio,
            Value::Video(_) => PrimitiveKind::Video,
        }
    }

    /// Numeric value as a decimal. Non-finite floats have none.
    pub fn to_decimal(&self) -> Option<BigDecimal> {
        match self {
            Value::Int16(v) => Some(BigDecimal::from(*v)),
            Value::Int32(v) => Some(BigDecimal::from(*v)),
            Value::Int64(v) => Some(BigDecimal::from(*v)),
            Value::Float32(v) if v.is_finite() => BigDecimal::from_str(&v.to_string()).ok(),
            Value::Float64(v) if v.is_finite() => BigDecimal::from_str(&v.to_string()).ok(),
            Value::Numeric(v) => Some(v.clone()),
            _ => None,
        }
    }

    /// String content of string-like and text-like values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::Text(s) | Value::Html(s) | Value::Tel(s) | Value::Password(s) => {
                Some(s)
            }
            Value::Xml(x) => Some(x.as_str()),
            Value::Url(u) => Some(u.as_str()),
            Value::Email(e) => Some(e.address()),
            Value::TimeZone(z) => Some(z.as_str()),
            _ => None,
        }
    }

    /// Bytes of binary and file-like values.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Binary(b) => Some(b),
            Value::File(f) | Value::Audio(f) | Value::Video(f) => Some(f.content()),
            Value::Image(i) => Some(i.content()),
            Value::Document(d) => Some(d.content()),
            _ => None,
        }
    }
}

/// Three-way comparison across runtime value types.
///
/// Numbers compare by value regardless of width (`Int16(3) < Numeric(3.5)`),
/// naive and UTC timestamps compare on the UTC wall clock, strings compare
/// lexicographically. Values without a common order yield `None`, as does a
/// NaN.
pub fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    use Value::*;
    match (a, b) {
        (Int16(x), Int16(y)) => Some(x.cmp(y)),
        (Int32(x), Int32(y)) => Some(x.cmp(y)),
        (Int64(x), Int64(y)) => Some(x.cmp(y)),
        (Float32(x), Float32(y)) => x.partial_cmp(y),
        (Float64(x), Float64(y)) => x.partial_cmp(y),
        (Numeric(x), Numeric(y)) => Some(x.cmp(y)),
        (Boolean(x), Boolean(y)) => Some(x.cmp(y)),
        (Date(x), Date(y)) => Some(x.cmp(y)),
        (Time(x), Time(y)) => Some(x.cmp(y)),
        (DateTime(x), DateTime(y)) => Some(x.cmp(y)),
        (UtcDateTime(x), UtcDateTime(y)) => Some(x.cmp(y)),
        (DateTime(x), UtcDateTime(y)) => Some(x.cmp(&y.naive_utc())),
        (UtcDateTime(x), DateTime(y)) => Some(x.naive_utc().cmp(y)),
        (Color(x), Color(y)) => Some(x.rgb().cmp(&y.rgb())),
        _ if a.kind().is_numeric() && b.kind().is_numeric() => {
            Some(a.to_decimal()?.cmp(&b.to_decimal()?))
        }
        _ => match (a.as_str(), b.as_str()) {
            (Some(x), Some(y)) => Some(x.cmp(y)),
            _ => None,
        },
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int16(v) => write!(f, "{}", v),
            Value::Int32(v) => write!(f, "{}", v),
            Value::Int64(v) => write!(f, "{}", v),
            Value::Float32(v) => write!(f, "{}", v),
            Value::Float64(v) => write!(f, "{}", v),
            Value::Numeric(v) => write!(f, "{}", v),
            Value::Boolean(v) => write!(f, "{}", v),
            Value::String(s) | Value::Text(s) | Value::Html(s) | Value::Tel(s) | Value::Password(s) => {
                f.write_str(s)
            }
            Value::Json(v) => write!(f, "{}", v),
            Value::Xml(v) => write!(f, "{}", v),
            Value::Url(v) => write!(f, "{}", v),
            Value::Email(v) => write!(f, "{}", v),
            Value::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
            Value::Time(v) => write!(f, "{}", v.format("%H:%M:%S%.f")),
            Value::DateTime(v) => write!(f, "{}", v.format("%Y-%m-%dT%H:%M:%S%.f")),
            Value::UtcDateTime(v) => f.write_str(&v.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Value::TimeZone(v) => write!(f, "{}", v),
            Value::Color(v) => write!(f, "{}", v),
            Value::Binary(b) => write!(f, "\\x{}", hex::encode(b)),
            Value::File(v) | Value::Audio(v) | Value::Video(v) => f.write_str(&v.encode()),
            Value::Image(v) => f.write_str(&v.encode()),
            Value::Document(v) => f.write_str(&v.encode()),
        }
    }
}

// ============================================================================
// RawValue
// ============================================================================

/// An incoming value before coercion.
///
/// Variants model what drivers and wire formats hand over: text, byte
/// buffers, native numbers, native temporal objects and JSON. `Typed` carries
/// an already canonical value and is accepted by the parser of its own kind.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// SQL NULL / missing
    Null,
    /// Textual form
    Text(String),
    /// Byte buffer (UTF-8 text or binary payload)
    Bytes(Vec<u8>),
    /// Driver integer
    Int(i64),
    /// Driver float
    Float(f64),
    /// Driver decimal
    Decimal(BigDecimal),
    /// Driver boolean
    Bool(bool),
    /// Driver date
    Date(NaiveDate),
    /// Driver time
    Time(NaiveTime),
    /// Driver timestamp without offset
    Timestamp(NaiveDateTime),
    /// Driver timestamp with offset
    TimestampTz(DateTime<FixedOffset>),
    /// Structured JSON
    Json(serde_json::Value),
    /// Nested tuple
    Tuple(Tuple),
    /// Canonical value
    Typed(Value),
}

impl RawValue {
    /// Short name of the input shape, used in `unexpected_value` errors.
    pub fn shape(&self) -> &'static str {
        match self {
            RawValue::Null => "null",
            RawValue::Text(_) => "text",
            RawValue::Bytes(_) => "bytes",
            RawValue::Int(_) => "integer",
            RawValue::Float(_) => "float",
            RawValue::Decimal(_) => "decimal",
            RawValue::Bool(_) => "boolean",
            RawValue::Date(_) => "date",
            RawValue::Time(_) => "time",
            RawValue::Timestamp(_) => "timestamp",
            RawValue::TimestampTz(_) => "timestamptz",
            RawValue::Json(_) => "json",
            RawValue::Tuple(_) => "tuple",
            RawValue::Typed(_) => "typed",
        }
    }

    /// True for [`RawValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, RawValue::Null)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

impl From<Vec<u8>> for RawValue {
    fn from(b: Vec<u8>) -> Self {
        RawValue::Bytes(b)
    }
}

impl From<&[u8]> for RawValue {
    fn from(b: &[u8]) -> Self {
        RawValue::Bytes(b.to_vec())
    }
}

impl From<i64> for RawValue {
    fn from(v: i64) -> Self {
        RawValue::Int(v)
    }
}

impl From<i32> for RawValue {
    fn from(v: i32) -> Self {
        RawValue::Int(i64::from(v))
    }
}

impl From<i16> for RawValue {
    fn from(v: i16) -> Self {
        RawValue::Int(i64::from(v))
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        RawValue::Float(v)
    }
}

impl From<f32> for RawValue {
    fn from(v: f32) -> Self {
        RawValue::Float(f64::from(v))
    }
}

impl From<bool> for RawValue {
    fn from(v: bool) -> Self {
        RawValue::Bool(v)
    }
}

impl From<BigDecimal> for RawValue {
    fn from(v: BigDecimal) -> Self {
        RawValue::Decimal(v)
    }
}

impl From<NaiveDate> for RawValue {
    fn from(v: NaiveDate) -> Self {
        RawValue::Date(v)
    }
}

impl From<NaiveTime> for RawValue {
    fn from(v: NaiveTime) -> Self {
        RawValue::Time(v)
    }
}

impl From<NaiveDateTime> for RawValue {
    fn from(v: NaiveDateTime) -> Self {
        RawValue::Timestamp(v)
    }
}

impl From<DateTime<FixedOffset>> for RawValue {
    fn from(v: DateTime<FixedOffset>) -> Self {
        RawValue::TimestampTz(v)
    }
}

impl From<DateTime<Utc>> for RawValue {
    fn from(v: DateTime<Utc>) -> Self {
        RawValue::TimestampTz(v.fixed_offset())
    }
}

impl From<serde_json::Value> for RawValue {
    fn from(v: serde_json::Value) -> Self {
        RawValue::Json(v)
    }
}

impl From<Tuple> for RawValue {
    fn from(v: Tuple) -> Self {
        RawValue::Tuple(v)
    }
}

impl From<Value> for RawValue {
    fn from(v: Value) -> Self {
        RawValue::Typed(v)
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(RawValue::Null, Into::into)
    }
}
