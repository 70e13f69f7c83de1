//! String, text and structured-text coercion

use crate::content::strip_markup;
use crate::error::{SchemaError, SchemaResult};
use crate::kind::PrimitiveKind;
use crate::scalar::{Color, Email, Url, Xml};
use crate::value::{RawValue, Value};
use once_cell::sync::Lazy;
use regex::Regex;

use super::temporal::{parse_date, parse_datetime, parse_time};
use super::Tuple;

static TEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9(][0-9 ()\-./]*[0-9]$").expect("tel pattern compiles"));

fn unexpected(kind: PrimitiveKind, raw: &RawValue) -> SchemaError {
    SchemaError::UnexpectedValue {
        kind,
        found: raw.shape(),
    }
}

/// Decode a UTF-8 buffer as-is.
pub fn bytes_to_text(kind: PrimitiveKind, bytes: &[u8]) -> SchemaResult<String> {
    String::from_utf8(bytes.to_vec())
        .map_err(|_| SchemaError::invalid_value(kind, format!("<{} bytes of invalid UTF-8>", bytes.len())))
}

/// Decode a UTF-8 buffer holding a single-line value; newlines are dropped.
pub fn bytes_to_string(kind: PrimitiveKind, bytes: &[u8]) -> SchemaResult<String> {
    bytes_to_text(kind, bytes).map(|s| s.replace('\n', ""))
}

/// Single-line text from `Text` or `Bytes`.
fn line_of(kind: PrimitiveKind, raw: &RawValue) -> SchemaResult<Option<String>> {
    match raw {
        RawValue::Text(s) => Ok(Some(s.clone())),
        RawValue::Bytes(b) => bytes_to_string(kind, b).map(Some),
        _ => Ok(None),
    }
}

/// Multi-line text from `Text` or `Bytes`.
fn text_of(kind: PrimitiveKind, raw: &RawValue) -> SchemaResult<Option<String>> {
    match raw {
        RawValue::Text(s) => Ok(Some(s.clone())),
        RawValue::Bytes(b) => bytes_to_text(kind, b).map(Some),
        _ => Ok(None),
    }
}

/// Coerce to a short string.
///
/// Driver temporal objects become their ISO text.
pub fn parse_string(raw: &RawValue) -> SchemaResult<String> {
    let kind = PrimitiveKind::String;
    if let Some(line) = line_of(kind, raw)? {
        return Ok(line);
    }
    match raw {
        RawValue::Typed(Value::String(s)) => Ok(s.clone()),
        RawValue::Date(_) => Ok(Value::Date(parse_date(raw)?).to_string()),
        RawValue::Time(_) => Ok(Value::Time(parse_time(raw)?).to_string()),
        RawValue::Timestamp(_) => Ok(Value::DateTime(parse_datetime(raw)?).to_string()),
        _ => Err(unexpected(kind, raw)),
    }
}

/// Coerce to long text.
pub fn parse_text(raw: &RawValue) -> SchemaResult<String> {
    let kind = PrimitiveKind::Text;
    if let Some(text) = text_of(kind, raw)? {
        return Ok(text);
    }
    match raw {
        RawValue::Typed(Value::Text(s)) => Ok(s.clone()),
        _ => Err(unexpected(kind, raw)),
    }
}

/// Coerce to rich text.
pub fn parse_html(raw: &RawValue) -> SchemaResult<String> {
    let kind = PrimitiveKind::Html;
    if let Some(text) = text_of(kind, raw)? {
        return Ok(text);
    }
    match raw {
        RawValue::Typed(Value::Html(s)) => Ok(s.clone()),
        _ => Err(unexpected(kind, raw)),
    }
}

/// Plain text of a rich-text value.
pub fn parse_html_text(raw: &RawValue) -> SchemaResult<String> {
    parse_html(raw).map(|html| strip_markup(&html))
}

/// Coerce to a JSON document.
pub fn parse_json(raw: &RawValue) -> SchemaResult<serde_json::Value> {
    let kind = PrimitiveKind::Json;
    if let Some(text) = text_of(kind, raw)? {
        return serde_json::from_str(&text).map_err(|_| SchemaError::invalid_value(kind, text));
    }
    match raw {
        RawValue::Json(v) | RawValue::Typed(Value::Json(v)) => Ok(v.clone()),
        _ => Err(unexpected(kind, raw)),
    }
}

/// Coerce to an XML document.
pub fn parse_xml(raw: &RawValue) -> SchemaResult<Xml> {
    let kind = PrimitiveKind::Xml;
    if let Some(text) = text_of(kind, raw)? {
        return Xml::parse(&text);
    }
    match raw {
        RawValue::Typed(Value::Xml(x)) => Ok(x.clone()),
        _ => Err(unexpected(kind, raw)),
    }
}

/// Coerce to a URL.
pub fn parse_url(raw: &RawValue) -> SchemaResult<Url> {
    let kind = PrimitiveKind::Url;
    if let Some(line) = line_of(kind, raw)? {
        return Url::parse(&line);
    }
    match raw {
        RawValue::Typed(Value::Url(u)) => Ok(u.clone()),
        _ => Err(unexpected(kind, raw)),
    }
}

/// Coerce to an email address.
pub fn parse_email(raw: &RawValue) -> SchemaResult<Email> {
    let kind = PrimitiveKind::Email;
    if let Some(line) = line_of(kind, raw)? {
        return Email::parse(&line);
    }
    match raw {
        RawValue::Typed(Value::Email(e)) => Ok(e.clone()),
        _ => Err(unexpected(kind, raw)),
    }
}

/// Coerce to a phone number: digits with optional leading `+` and the usual
/// separators.
pub fn parse_tel(raw: &RawValue) -> SchemaResult<String> {
    let kind = PrimitiveKind::Tel;
    let tel = match line_of(kind, raw)? {
        Some(line) => line.trim().to_string(),
        None => match raw {
            RawValue::Typed(Value::Tel(t)) => return Ok(t.clone()),
            _ => return Err(unexpected(kind, raw)),
        },
    };
    let digits = tel.chars().filter(char::is_ascii_digit).count();
    if digits < 3 || digits > 15 || !TEL.is_match(&tel) {
        return Err(SchemaError::invalid_value(kind, tel));
    }
    Ok(tel)
}

/// Coerce to a password.
pub fn parse_password(raw: &RawValue) -> SchemaResult<String> {
    let kind = PrimitiveKind::Password;
    if let Some(line) = line_of(kind, raw)? {
        return Ok(line);
    }
    match raw {
        RawValue::Typed(Value::Password(p)) => Ok(p.clone()),
        _ => Err(unexpected(kind, raw)),
    }
}

/// Coerce to a color.
pub fn parse_color(raw: &RawValue) -> SchemaResult<Color> {
    let kind = PrimitiveKind::Color;
    if let Some(line) = line_of(kind, raw)? {
        return Color::parse(&line);
    }
    match raw {
        RawValue::Int(v) => u32::try_from(*v)
            .map_err(|_| SchemaError::invalid_value(kind, v))
            .and_then(Color::from_rgb),
        RawValue::Typed(Value::Color(c)) => Ok(*c),
        _ => Err(unexpected(kind, raw)),
    }
}

/// Coerce to a nested tuple.
///
/// Text uses the `key:value,key:value` form (entries and their parts are
/// trimmed, values stay textual). A JSON object maps its members; strings
/// become text and other members stay JSON.
pub fn parse_tuple(raw: &RawValue) -> SchemaResult<Tuple> {
    match raw {
        RawValue::Tuple(t) => Ok(t.clone()),
        RawValue::Text(s) => {
            let mut tuple = Tuple::new();
            if s.trim().is_empty() {
                return Ok(tuple);
            }
            for entry in s.split(',') {
                let (key, value) = entry
                    .split_once(':')
                    .ok_or_else(|| SchemaError::InvalidTuple { value: s.clone() })?;
                let key = key.trim();
                if key.is_empty() {
                    return Err(SchemaError::InvalidTuple { value: s.clone() });
                }
                tuple.put(key, value.trim());
            }
            Ok(tuple)
        }
        RawValue::Bytes(b) => parse_tuple(&RawValue::Text(bytes_to_string(PrimitiveKind::Text, b)?)),
        RawValue::Json(serde_json::Value::Object(members)) => Ok(members
            .iter()
            .map(|(key, value)| {
                let raw = match value {
                    serde_json::Value::Null => RawValue::Null,
                    serde_json::Value::String(s) => RawValue::Text(s.clone()),
                    serde_json::Value::Bool(b) => RawValue::Bool(*b),
                    other => RawValue::Json(other.clone()),
                };
                (key.clone(), raw)
            })
            .collect()),
        other => Err(SchemaError::InvalidTuple {
            value: other.shape().to_string(),
        }),
    }
}
