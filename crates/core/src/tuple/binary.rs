//! Binary and file-like coercion
//!
//! Raw byte buffers become wrappers whose metadata is derived lazily by the
//! analyzer in [`ParseOptions`]. Text input is the composite encoding of
//! [`crate::file`]; a JSON object carries base64 `content` plus the already
//! derived `content_type`, `thumbnail` (base64) or `text`.

use crate::error::{SchemaError, SchemaResult};
use crate::file::{Document, File, Image};
use crate::hex;
use crate::kind::PrimitiveKind;
use crate::value::{RawValue, Value};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde_json::{Map, Value as Json};

use super::ParseOptions;

fn unexpected(kind: PrimitiveKind, raw: &RawValue) -> SchemaError {
    SchemaError::UnexpectedValue {
        kind,
        found: raw.shape(),
    }
}

fn json_bytes(kind: PrimitiveKind, members: &Map<String, Json>, key: &str) -> SchemaResult<Option<Vec<u8>>> {
    match members.get(key) {
        None | Some(Json::Null) => Ok(None),
        Some(Json::String(encoded)) => BASE64
            .decode(encoded)
            .map(Some)
            .map_err(|_| SchemaError::invalid_value(kind, format!("{}: invalid base64", key))),
        Some(other) => Err(SchemaError::invalid_value(kind, format!("{}: {}", key, other))),
    }
}

fn json_string<'a>(kind: PrimitiveKind, members: &'a Map<String, Json>, key: &str) -> SchemaResult<Option<&'a str>> {
    match members.get(key) {
        None | Some(Json::Null) => Ok(None),
        Some(Json::String(s)) => Ok(Some(s)),
        Some(other) => Err(SchemaError::invalid_value(kind, format!("{}: {}", key, other))),
    }
}

/// File from a JSON object `{content, content_type?}`.
fn file_from_json(kind: PrimitiveKind, members: &Map<String, Json>, options: &ParseOptions) -> SchemaResult<File> {
    let content = json_bytes(kind, members, "content")?
        .ok_or_else(|| SchemaError::invalid_value(kind, "missing content"))?;
    let file = match json_string(kind, members, "content_type")? {
        Some(content_type) => File::from_parts(content, content_type),
        None => File::with_analyzer(content, options.analyzer.clone()),
    };
    Ok(match json_string(kind, members, "name")? {
        Some(name) => file.with_name(name),
        None => file,
    })
}

/// Coerce to raw bytes.
///
/// Text must be the `\x<hex>` (or `\\x<hex>`) form.
pub fn parse_binary(raw: &RawValue) -> SchemaResult<Vec<u8>> {
    let kind = PrimitiveKind::Binary;
    match raw {
        RawValue::Bytes(b) | RawValue::Typed(Value::Binary(b)) => Ok(b.clone()),
        RawValue::Text(s) => {
            let trimmed = s.trim();
            let digits = trimmed
                .strip_prefix("\\\\x")
                .or_else(|| trimmed.strip_prefix("\\x"))
                .ok_or_else(|| SchemaError::invalid_value(kind, s))?;
            hex::decode(digits).map_err(|e| SchemaError::invalid_value(kind, e))
        }
        RawValue::Typed(other) => other
            .as_bytes()
            .map(<[u8]>::to_vec)
            .ok_or_else(|| unexpected(kind, raw)),
        _ => Err(unexpected(kind, raw)),
    }
}

pub(crate) fn parse_file_as(kind: PrimitiveKind, raw: &RawValue, options: &ParseOptions) -> SchemaResult<File> {
    match raw {
        RawValue::Bytes(b) | RawValue::Typed(Value::Binary(b)) => {
            Ok(File::with_analyzer(b.clone(), options.analyzer.clone()))
        }
        RawValue::Text(s) => File::decode_as(kind, s),
        RawValue::Json(Json::Object(members)) => file_from_json(kind, members, options),
        RawValue::Typed(Value::File(f) | Value::Audio(f) | Value::Video(f)) => Ok(f.clone()),
        _ => Err(unexpected(kind, raw)),
    }
}

/// Coerce to a generic file.
pub fn parse_file(raw: &RawValue) -> SchemaResult<File> {
    parse_file_with(raw, &ParseOptions::default())
}

/// Coerce to a generic file, deriving metadata with `options`.
pub fn parse_file_with(raw: &RawValue, options: &ParseOptions) -> SchemaResult<File> {
    parse_file_as(PrimitiveKind::File, raw, options)
}

/// Coerce to an audio file.
pub fn parse_audio(raw: &RawValue) -> SchemaResult<File> {
    parse_file_as(PrimitiveKind::Audio, raw, &ParseOptions::default())
}

/// Coerce to a video file.
pub fn parse_video(raw: &RawValue) -> SchemaResult<File> {
    parse_file_as(PrimitiveKind::Video, raw, &ParseOptions::default())
}

/// Coerce to an image.
pub fn parse_image(raw: &RawValue) -> SchemaResult<Image> {
    parse_image_with(raw, &ParseOptions::default())
}

/// Coerce to an image, deriving metadata with `options`.
pub fn parse_image_with(raw: &RawValue, options: &ParseOptions) -> SchemaResult<Image> {
    let kind = PrimitiveKind::Image;
    match raw {
        RawValue::Bytes(b) | RawValue::Typed(Value::Binary(b)) => {
            Ok(Image::with_analyzer(b.clone(), options.analyzer.clone()))
        }
        RawValue::Text(s) => Image::decode(s),
        RawValue::Json(Json::Object(members)) => {
            let file = file_from_json(kind, members, options)?;
            Ok(match json_bytes(kind, members, "thumbnail")? {
                Some(thumbnail) => {
                    let content_type = file.content_type().to_string();
                    Image::from_parts(file.into_content(), thumbnail, content_type)
                }
                None => Image::from_file(file),
            })
        }
        RawValue::Typed(Value::Image(i)) => Ok(i.clone()),
        RawValue::Typed(Value::File(f)) => Ok(Image::from_file(f.clone())),
        _ => Err(unexpected(kind, raw)),
    }
}

/// Coerce to a document.
pub fn parse_document(raw: &RawValue) -> SchemaResult<Document> {
    parse_document_with(raw, &ParseOptions::default())
}

/// Coerce to a document, deriving metadata with `options`.
///
/// With text extraction disabled, documents built from bytes get empty text.
pub fn parse_document_with(raw: &RawValue, options: &ParseOptions) -> SchemaResult<Document> {
    let kind = PrimitiveKind::Document;
    let from_file = |file: File| {
        if options.extract_document_text {
            Document::from_file(file)
        } else {
            Document::with_text(file, String::new())
        }
    };
    match raw {
        RawValue::Bytes(b) | RawValue::Typed(Value::Binary(b)) => {
            Ok(from_file(File::with_analyzer(b.clone(), options.analyzer.clone())))
        }
        RawValue::Text(s) => Document::decode(s),
        RawValue::Json(Json::Object(members)) => {
            let file = file_from_json(kind, members, options)?;
            Ok(match json_string(kind, members, "text")? {
                Some(text) => Document::with_text(file, text),
                None => from_file(file),
            })
        }
        RawValue::Typed(Value::Document(d)) => Ok(d.clone()),
        RawValue::Typed(Value::File(f)) => Ok(from_file(f.clone())),
        _ => Err(unexpected(kind, raw)),
    }
}
