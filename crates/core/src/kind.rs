//! Primitive kind registry
//!
//! The closed set of field value kinds and the capability groups they belong
//! to. Everything here is a pure lookup: no state, no allocation.
//!
//! ## Groups
//!
//! | Group      | Kinds                                                        |
//! |------------|--------------------------------------------------------------|
//! | string     | string, url, email, tel                                      |
//! | text       | text, html, json, xml                                        |
//! | numeric    | int16, int32, int64, float32, float64, numeric               |
//! | binary     | binary, file, image, document, audio, video                  |
//! | file       | file, image, document, audio, video                          |
//! | temporal   | date, time, datetime                                         |
//! | filterable | numeric, boolean, string, text, temporal, timezone, color    |
//!
//! String kinds carry a length parameter, `numeric` carries precision and
//! scale. Numeric and temporal kinds are ordered and may carry a range.

use crate::error::SchemaError;
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A primitive field kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum PrimitiveKind {
    /// 16-bit signed integer
    Int16,
    /// 32-bit signed integer
    Int32,
    /// 64-bit signed integer
    Int64,
    /// 32-bit float
    Float32,
    /// 64-bit float
    Float64,
    /// Arbitrary-precision decimal with precision and scale
    Numeric,
    /// Boolean
    Boolean,
    /// Short string with a maximum length
    String,
    /// Long text
    Text,
    /// Rich text
    Html,
    /// Structured JSON
    Json,
    /// Structured XML
    Xml,
    /// URL
    Url,
    /// Email address
    Email,
    /// Phone number
    Tel,
    /// Calendar date
    Date,
    /// Time of day
    Time,
    /// Date and time without offset
    DateTime,
    /// Time zone identifier
    TimeZone,
    /// RGB color
    Color,
    /// Raw bytes
    Binary,
    /// Generic file with derived content type
    File,
    /// Image with derived thumbnail
    Image,
    /// Document with extracted text
    Document,
    /// Audio file
    Audio,
    /// Video file
    Video,
    /// Masked string
    Password,
}

impl PrimitiveKind {
    /// All kinds, in registry order.
    pub const ALL: [PrimitiveKind; 27] = [
        PrimitiveKind::Int16,
        PrimitiveKind::Int32,
        PrimitiveKind::Int64,
        PrimitiveKind::Float32,
        PrimitiveKind::Float64,
        PrimitiveKind::Numeric,
        PrimitiveKind::Boolean,
        PrimitiveKind::String,
        PrimitiveKind::Text,
        PrimitiveKind::Html,
        PrimitiveKind::Json,
        PrimitiveKind::Xml,
        PrimitiveKind::Url,
        PrimitiveKind::Email,
        PrimitiveKind::Tel,
        PrimitiveKind::Date,
        PrimitiveKind::Time,
        PrimitiveKind::DateTime,
        PrimitiveKind::TimeZone,
        PrimitiveKind::Color,
        PrimitiveKind::Binary,
        PrimitiveKind::File,
        PrimitiveKind::Image,
        PrimitiveKind::Document,
        PrimitiveKind::Audio,
        PrimitiveKind::Video,
        PrimitiveKind::Password,
    ];

    /// Canonical lowercase name.
    pub const fn name(&self) -> &'static str {
        match self {
            PrimitiveKind::Int16 => "int16",
            PrimitiveKind::Int32 => "int32",
            PrimitiveKind::Int64 => "int64",
            PrimitiveKind::Float32 => "float32",
            PrimitiveKind::Float64 => "float64",
            PrimitiveKind::Numeric => "numeric",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::String => "string",
            PrimitiveKind::Text => "text",
            PrimitiveKind::Html => "html",
            PrimitiveKind::Json => "json",
            PrimitiveKind::Xml => "xml",
            PrimitiveKind::Url => "url",
            PrimitiveKind::Email => "email",
            PrimitiveKind::Tel => "tel",
            PrimitiveKind::Date => "date",
            PrimitiveKind::Time => "time",
            PrimitiveKind::DateTime => "datetime",
            PrimitiveKind::TimeZone => "timezone",
            PrimitiveKind::Color => "color",
            PrimitiveKind::Binary => "binary",
            PrimitiveKind::File => "file",
            PrimitiveKind::Image => "image",
            PrimitiveKind::Document => "document",
            PrimitiveKind::Audio => "audio",
            PrimitiveKind::Video => "video",
            PrimitiveKind::Password => "password",
        }
    }

    /// Look up a kind by name, case-insensitively.
    pub fn from_name(name: &str) -> Option<PrimitiveKind> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }

    /// string, url, email, tel
    pub const fn is_string(&self) -> bool {
        matches!(
            self,
            PrimitiveKind::String | PrimitiveKind::Url | PrimitiveKind::Email | PrimitiveKind::Tel
        )
    }

    /// text, html, json, xml
    pub const fn is_text(&self) -> bool {
        matches!(
            self,
            PrimitiveKind::Text | PrimitiveKind::Html | PrimitiveKind::Json | PrimitiveKind::Xml
        )
    }

    /// Integer, float and decimal kinds.
    pub const fn is_numeric(&self) -> bool {
        self.is_integer() || self.is_float() || matches!(self, PrimitiveKind::Numeric)
    }

    /// int16, int32, int64
    pub const fn is_integer(&self) -> bool {
        matches!(
            self,
            PrimitiveKind::Int16 | PrimitiveKind::Int32 | PrimitiveKind::Int64
        )
    }

    /// float32, float64
    pub const fn is_float(&self) -> bool {
        matches!(self, PrimitiveKind::Float32 | PrimitiveKind::Float64)
    }

    /// Kinds whose storage is a byte buffer.
    pub const fn is_binary(&self) -> bool {
        matches!(self, PrimitiveKind::Binary) || self.is_file()
    }

    /// Binary kinds with derived metadata (content type, thumbnail, text).
    pub const fn is_file(&self) -> bool {
        matches!(
            self,
            PrimitiveKind::File
                | PrimitiveKind::Image
                | PrimitiveKind::Document
                | PrimitiveKind::Audio
                | PrimitiveKind::Video
        )
    }

    /// date, time, datetime
    pub const fn is_temporal(&self) -> bool {
        matches!(
            self,
            PrimitiveKind::Date | PrimitiveKind::Time | PrimitiveKind::DateTime
        )
    }

    /// Kinds that may appear in a query filter.
    pub const fn is_filterable(&self) -> bool {
        self.is_numeric()
            || self.is_string()
            || self.is_text()
            || self.is_temporal()
            || matches!(
                self,
                PrimitiveKind::Boolean | PrimitiveKind::TimeZone | PrimitiveKind::Color
            )
    }

    /// Kinds that carry an order and therefore may carry a range.
    pub const fn is_ordered(&self) -> bool {
        self.is_numeric() || self.is_temporal()
    }

    /// Kinds whose parameter is a maximum length.
    pub const fn has_length(&self) -> bool {
        self.is_string()
    }

    /// Kinds whose parameters are precision and scale.
    pub const fn has_precision(&self) -> bool {
        matches!(self, PrimitiveKind::Numeric)
    }
}

/// Largest precision or scale a `numeric` field may declare.
pub const MAX_NUMERIC_PRECISION: u32 = 1000;

/// Largest value representable with `precision` digits, `scale` of them
/// fractional.
///
/// `numeric_max(5, 2)` is `999.99`. When `precision <= scale` the integer part
/// is `0`, so `numeric_max(3, 3)` is `0.999`.
pub fn numeric_max(precision: u32, scale: u32) -> BigDecimal {
    let digits = precision.max(scale);
    let nines = BigInt::from(10u8).pow(digits) - 1u8;
    BigDecimal::new(nines, i64::from(scale))
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PrimitiveKind {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| SchemaError::UnknownPrimitiveType {
            name: s.to_string(),
        })
    }
}

impl TryFrom<String> for PrimitiveKind {
    type Error = SchemaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
