//! Tuple: ordered field/value carrier and the coercion library
//!
//! A [`Tuple`] holds [`RawValue`]s keyed by field name in insertion order. It
//! has no schema of its own; callers pick the expected kind per access and
//! the matching `parse_*` function coerces the raw value into its canonical
//! typed form.
//!
//! Every parse function accepts the kind's own typed form, the driver-native
//! representation, a UTF-8 byte buffer and a textual string, and rejects any
//! other input shape with `unexpected_value`. [`parse`] dispatches on
//! [`PrimitiveKind`] with an exhaustive match.

mod binary;
mod numeric;
mod temporal;
mod text;

pub use binary::{
    parse_audio, parse_binary, parse_document, parse_document_with, parse_file, parse_file_with,
    parse_image, parse_image_with, parse_video,
};
pub use numeric::{
    parse_boolean, parse_float32, parse_float64, parse_int16, parse_int32, parse_int64,
    parse_numeric, parse_numeric_for, parse_numeric_in,
};
pub use temporal::{
    etag, parse_date, parse_datetime, parse_etag, parse_time, parse_timezone, parse_utc_datetime,
    require_utc,
};
pub use text::{
    bytes_to_string, bytes_to_text, parse_color, parse_email, parse_html, parse_html_text,
    parse_json, parse_password, parse_string, parse_text, parse_tel, parse_tuple, parse_url,
    parse_xml,
};

use crate::content::{default_analyzer, ContentAnalyzer};
use crate::error::SchemaResult;
use crate::field::TypeField;
use crate::file::{Document, File, Image};
use crate::kind::PrimitiveKind;
use crate::scalar::{Color, Email, TimeZone, Url, Xml};
use crate::value::{RawValue, Value};
use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Knobs for coercing file-like values.
#[derive(Clone)]
pub struct ParseOptions {
    /// Analyzer used for wrappers built from raw bytes
    pub analyzer: Arc<dyn ContentAnalyzer>,
    /// Whether documents built from raw bytes extract their text
    pub extract_document_text: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            analyzer: default_analyzer(),
            extract_document_text: true,
        }
    }
}

impl fmt::Debug for ParseOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseOptions")
            .field("extract_document_text", &self.extract_document_text)
            .finish_non_exhaustive()
    }
}

/// Coerce `raw` into the canonical value of `kind`.
pub fn parse(kind: PrimitiveKind, raw: &RawValue) -> SchemaResult<Value> {
    parse_with(kind, raw, &ParseOptions::default())
}

/// [`parse`] with explicit file-handling options.
pub fn parse_with(kind: PrimitiveKind, raw: &RawValue, options: &ParseOptions) -> SchemaResult<Value> {
    Ok(match kind {
        PrimitiveKind::Int16 => Value::Int16(parse_int16(raw)?),
        PrimitiveKind::Int32 => Value::Int32(parse_int32(raw)?),
        PrimitiveKind::Int64 => Value::Int64(parse_int64(raw)?),
        PrimitiveKind::Float32 => Value::Float32(parse_float32(raw)?),
        PrimitiveKind::Float64 => Value::Float64(parse_float64(raw)?),
        PrimitiveKind::Numeric => Value::Numeric(parse_numeric(raw)?),
        PrimitiveKind::Boolean => Value::Boolean(parse_boolean(raw)?),
        PrimitiveKind::String => Value::String(parse_string(raw)?),
        PrimitiveKind::Text => Value::Text(parse_text(raw)?),
        PrimitiveKind::Html => Value::Html(parse_html(raw)?),
        PrimitiveKind::Json => Value::Json(parse_json(raw)?),
        PrimitiveKind::Xml => Value::Xml(parse_xml(raw)?),
        PrimitiveKind::Url => Value::Url(parse_url(raw)?),
        PrimitiveKind::Email => Value::Email(parse_email(raw)?),
        PrimitiveKind::Tel => Value::Tel(parse_tel(raw)?),
        PrimitiveKind::Password => Value::Password(parse_password(raw)?),
        PrimitiveKind::Date => Value::Date(parse_date(raw)?),
        PrimitiveKind::Time => Value::Time(parse_time(raw)?),
        PrimitiveKind::DateTime => Value::DateTime(parse_datetime(raw)?),
        PrimitiveKind::TimeZone => Value::TimeZone(parse_timezone(raw)?),
        PrimitiveKind::Color => Value::Color(parse_color(raw)?),
        PrimitiveKind::Binary => Value::Binary(parse_binary(raw)?),
        PrimitiveKind::File => Value::File(parse_file_with(raw, options)?),
        PrimitiveKind::Image => Value::Image(parse_image_with(raw, options)?),
        PrimitiveKind::Document => Value::Document(parse_document_with(raw, options)?),
        PrimitiveKind::Audio => Value::Audio(binary::parse_file_as(kind, raw, options)?),
        PrimitiveKind::Video => Value::Video(binary::parse_file_as(kind, raw, options)?),
    })
}

/// Ordered field → raw value container.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tuple {
    fields: IndexMap<String, RawValue>,
}

macro_rules! typed_getters {
    ($($(#[$doc:meta])* $name:ident => $parse:ident -> $ty:ty;)*) => {
        $(
            $(#[$doc])*
            pub fn $name(&self, field: &str) -> SchemaResult<Option<$ty>> {
                match self.fields.get(field) {
                    None | Some(RawValue::Null) => Ok(None),
                    Some(raw) => $parse(raw).map(Some),
                }
            }
        )*
    };
}

impl Tuple {
    /// Empty tuple.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, returning the previous value.
    pub fn put(&mut self, field: impl Into<String>, value: impl Into<RawValue>) -> Option<RawValue> {
        self.fields.insert(field.into(), value.into())
    }

    /// Set a field only when it is missing or null.
    pub fn put_if_null(&mut self, field: impl Into<String>, value: impl Into<RawValue>) {
        let slot = self.fields.entry(field.into()).or_insert(RawValue::Null);
        if slot.is_null() {
            *slot = value.into();
        }
    }

    /// Raw value of a field.
    pub fn get(&self, field: &str) -> Option<&RawValue> {
        self.fields.get(field)
    }

    /// Remove a field, keeping the order of the others.
    pub fn remove(&mut self, field: &str) -> Option<RawValue> {
        self.fields.shift_remove(field)
    }

    /// Whether the field is present (possibly null).
    pub fn contains_key(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when there are no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Coerce a field to `kind`. Missing and null fields yield `None`.
    pub fn get_value(&self, field: &str, kind: PrimitiveKind) -> SchemaResult<Option<Value>> {
        match self.fields.get(field) {
            None | Some(RawValue::Null) => Ok(None),
            Some(raw) => parse(kind, raw).map(Some),
        }
    }

    /// Decimal field checked against `[min, max]`.
    pub fn get_numeric_in(
        &self,
        field: &str,
        min: Option<&BigDecimal>,
        max: Option<&BigDecimal>,
    ) -> SchemaResult<Option<BigDecimal>> {
        match self.fields.get(field) {
            None | Some(RawValue::Null) => Ok(None),
            Some(raw) => parse_numeric_in(raw, min, max)
                .map(Some)
                .map_err(|e| e.with_field(field)),
        }
    }

    /// Decimal field checked against the range of `type_field`.
    pub fn get_numeric_for(&self, field: &str, type_field: &TypeField) -> SchemaResult<Option<BigDecimal>> {
        match self.fields.get(field) {
            None | Some(RawValue::Null) => Ok(None),
            Some(raw) => parse_numeric_for(raw, type_field)
                .map(Some)
                .map_err(|e| e.with_field(field)),
        }
    }

    typed_getters! {
        /// 16-bit integer field.
        get_int16 => parse_int16 -> i16;
        /// 32-bit integer field.
        get_int32 => parse_int32 -> i32;
        /// 64-bit integer field.
        get_int64 => parse_int64 -> i64;
        /// 32-bit float field.
        get_float32 => parse_float32 -> f32;
        /// 64-bit float field.
        get_float64 => parse_float64 -> f64;
        /// Decimal field.
        get_numeric => parse_numeric -> BigDecimal;
        /// Boolean field.
        get_boolean => parse_boolean -> bool;
        /// Short string field.
        get_string => parse_string -> String;
        /// Long text field.
        get_text => parse_text -> String;
        /// Rich text field.
        get_html => parse_html -> String;
        /// Plain text of a rich text field.
        get_html_text => parse_html_text -> String;
        /// JSON field.
        get_json => parse_json -> serde_json::Value;
        /// XML field.
        get_xml => parse_xml -> Xml;
        /// URL field.
        get_url => parse_url -> Url;
        /// Email field.
        get_email => parse_email -> Email;
        /// Phone field.
        get_tel => parse_tel -> String;
        /// Password field.
        get_password => parse_password -> String;
        /// Color field.
        get_color => parse_color -> Color;
        /// Date field.
        get_date => parse_date -> NaiveDate;
        /// Time field.
        get_time => parse_time -> NaiveTime;
        /// Date-time field.
        get_datetime => parse_datetime -> NaiveDateTime;
        /// UTC instant field.
        get_utc_datetime => parse_utc_datetime -> DateTime<Utc>;
        /// Time zone field.
        get_timezone => parse_timezone -> TimeZone;
        /// Entity tag of a UTC instant field.
        get_etag => parse_etag -> String;
        /// Binary field.
        get_binary => parse_binary -> Vec<u8>;
        /// File field.
        get_file => parse_file -> File;
        /// Image field.
        get_image => parse_image -> Image;
        /// Document field.
        get_document => parse_document -> Document;
        /// Audio field.
        get_audio => parse_audio -> File;
        /// Video field.
        get_video => parse_video -> File;
        /// Nested tuple field.
        get_tuple => parse_tuple -> Tuple;
    }
}

impl<K: Into<String>, V: Into<RawValue>> FromIterator<(K, V)> for Tuple {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Tuple {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl IntoIterator for Tuple {
    type Item = (String, RawValue);
    type IntoIter = indexmap::map::IntoIter<String, RawValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}
