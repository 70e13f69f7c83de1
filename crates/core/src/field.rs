//! Field descriptions
//!
//! A [`TypeField`] is one column of a [`crate::schema::Type`]: a primitive
//! kind, the parameters meaningful to that kind, an optional range, a
//! nullability flag and, while an alter is in flight, the name the field had
//! before.
//!
//! ## Construction
//!
//! | Path            | Input                                  | Used by              |
//! |-----------------|----------------------------------------|----------------------|
//! | parameter string| `"250"`, `"10,2"`, `"10"`              | console / text input |
//! | structured      | `length`, `precision`, `scale`         | API / JSON input     |
//!
//! The structured path re-derives the canonical parameter string and goes
//! through the parameter-string path, so equivalent input always yields the
//! same field.

use crate::error::{SchemaError, SchemaResult};
use crate::kind::{PrimitiveKind, MAX_NUMERIC_PRECISION};
use crate::naming;
use crate::range::FieldRange;
use crate::tuple::{self, ParseOptions};
use crate::value::{RawValue, Value};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Length of string-like fields declared without one.
pub const DEFAULT_STRING_LENGTH: u32 = 250;

/// Kind-specific storage parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldParameters {
    /// Kind takes no parameters, or a decimal without declared precision
    None,
    /// Maximum length of a string-like kind
    Length(u32),
    /// Precision and scale of a decimal
    Decimal {
        /// Total number of digits
        precision: u32,
        /// Fractional digits
        scale: u32,
    },
}

impl FieldParameters {
    /// Canonical parameter string: `"250"`, `"10"` (scale 0) or `"10,2"`.
    pub fn to_parameter_string(&self) -> Option<String> {
        match *self {
            FieldParameters::None => None,
            FieldParameters::Length(length) => Some(length.to_string()),
            FieldParameters::Decimal { precision, scale: 0 } => Some(precision.to_string()),
            FieldParameters::Decimal { precision, scale } => Some(format!("{},{}", precision, scale)),
        }
    }
}

/// Bounds of a range as declared, before parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeDefinition {
    /// Lower bound text
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "bound_text")]
    pub min: Option<String>,
    /// Upper bound text
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "bound_text")]
    pub max: Option<String>,
}

/// Bounds may be written as JSON strings or numbers.
fn bound_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    use serde::de::Error;
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(D::Error::custom(format!("invalid range bound {}", other))),
    }
}

/// One field of a type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeField {
    kind: PrimitiveKind,
    parameters: FieldParameters,
    declared_range: Option<RangeDefinition>,
    range: Option<FieldRange>,
    not_null: bool,
    old_name: Option<String>,
}

impl TypeField {
    /// Field of `kind` with default parameters.
    pub fn new(kind: PrimitiveKind) -> SchemaResult<TypeField> {
        Self::from_parameters(kind, None, false)
    }

    /// Parameter-string path.
    ///
    /// String-like kinds read the string as a length (default
    /// [`DEFAULT_STRING_LENGTH`]); `numeric` reads `precision[,scale]`, scale
    /// defaulting to 0, neither above [`MAX_NUMERIC_PRECISION`]. Any other
    /// kind rejects parameters.
    pub fn from_parameters(kind: PrimitiveKind, parameters: Option<&str>, not_null: bool) -> SchemaResult<TypeField> {
        let parameters = parameters.map(str::trim).filter(|p| !p.is_empty());
        let invalid = |p: &str| SchemaError::InvalidParameters {
            kind,
            parameters: p.to_string(),
        };
        if let Some(p) = parameters {
            if !p.chars().all(|c| c.is_ascii_digit() || c == ',') {
                return Err(invalid(p));
            }
        }

        let parameters = if kind.has_length() {
            match parameters {
                None => FieldParameters::Length(DEFAULT_STRING_LENGTH),
                Some(p) => match p.parse::<u32>() {
                    Ok(length) if length > 0 => FieldParameters::Length(length),
                    _ => return Err(invalid(p)),
                },
            }
        } else if kind.has_precision() {
            match parameters {
                None => FieldParameters::None,
                Some(p) => {
                    let mut parts = p.split(',');
                    let precision = parts.next().and_then(|s| s.parse::<u32>().ok());
                    let scale = match parts.next() {
                        None => Some(0),
                        Some(s) => s.parse::<u32>().ok(),
                    };
                    match (precision, scale, parts.next()) {
                        (Some(precision), Some(scale), None)
                            if precision > 0
                                && precision <= MAX_NUMERIC_PRECISION
                                && scale <= MAX_NUMERIC_PRECISION =>
                        {
                            FieldParameters::Decimal { precision, scale }
                        }
                        _ => return Err(invalid(p)),
                    }
                }
            }
        } else {
            if let Some(p) = parameters {
                return Err(invalid(p));
            }
            FieldParameters::None
        };

        let mut field = TypeField {
            kind,
            parameters,
            declared_range: None,
            range: None,
            not_null,
            old_name: None,
        };
        field.range = field.resolve_range()?;
        Ok(field)
    }

    /// Structured path.
    pub fn structured(
        kind: PrimitiveKind,
        length: Option<u32>,
        precision: Option<u32>,
        scale: Option<u32>,
        not_null: bool,
    ) -> SchemaResult<TypeField> {
        let invalid = || SchemaError::InvalidParameters {
            kind,
            parameters: describe_structured(length, precision, scale),
        };
        let parameters = match (length, precision, scale) {
            (None, None, None) => None,
            (Some(length), None, None) if kind.has_length() => Some(length.to_string()),
            (None, Some(precision), scale) if kind.has_precision() => Some(
                FieldParameters::Decimal {
                    precision,
                    scale: scale.unwrap_or(0),
                }
                .to_parameter_string()
                .ok_or_else(invalid)?,
            ),
            _ => return Err(invalid()),
        };
        Self::from_parameters(kind, parameters.as_deref(), not_null)
    }

    /// Attach declared range bounds, parsed with the kind's parser.
    ///
    /// Fails with `invalid_parameters` on kinds that carry no order.
    pub fn with_range(mut self, min: Option<&str>, max: Option<&str>) -> SchemaResult<TypeField> {
        if min.is_none() && max.is_none() {
            self.declared_range = None;
        } else {
            if !self.kind.is_ordered() {
                return Err(SchemaError::InvalidParameters {
                    kind: self.kind,
                    parameters: format!("range [{}, {}]", min.unwrap_or(""), max.unwrap_or("")),
                });
            }
            self.declared_range = Some(RangeDefinition {
                min: min.map(str::to_string),
                max: max.map(str::to_string),
            });
        }
        self.range = self.resolve_range()?;
        Ok(self)
    }

    /// Attach a range read back from storage, stored as-is.
    pub fn with_field_range(mut self, range: FieldRange) -> TypeField {
        self.declared_range = Some(RangeDefinition {
            min: range.min().map(ToString::to_string),
            max: range.max().map(ToString::to_string),
        });
        self.range = Some(range);
        self
    }

    /// Mark the field as a rename of `old_name`.
    pub fn renamed_from(mut self, old_name: impl Into<String>) -> TypeField {
        self.old_name = Some(old_name.into());
        self
    }

    /// Same field without rename information.
    pub fn without_old_name(mut self) -> TypeField {
        self.old_name = None;
        self
    }

    /// Set nullability.
    pub fn with_not_null(mut self, not_null: bool) -> TypeField {
        self.not_null = not_null;
        self
    }

    fn resolve_range(&self) -> SchemaResult<Option<FieldRange>> {
        if !self.kind.is_ordered() {
            return Ok(None);
        }
        let declared = self.declared_range.as_ref();
        FieldRange::resolve(
            self.kind,
            self.precision_scale(),
            declared.and_then(|r| r.min.as_deref()),
            declared.and_then(|r| r.max.as_deref()),
        )
    }

    /// Primitive kind.
    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    /// Kind-specific parameters.
    pub fn parameters(&self) -> FieldParameters {
        self.parameters
    }

    /// Canonical parameter string.
    pub fn parameters_string(&self) -> Option<String> {
        self.parameters.to_parameter_string()
    }

    /// Maximum length of string-like fields.
    pub fn length(&self) -> Option<u32> {
        match self.parameters {
            FieldParameters::Length(length) => Some(length),
            _ => None,
        }
    }

    /// Declared precision of a decimal.
    pub fn precision(&self) -> Option<u32> {
        self.precision_scale().map(|(precision, _)| precision)
    }

    /// Declared scale of a decimal.
    pub fn scale(&self) -> Option<u32> {
        self.precision_scale().map(|(_, scale)| scale)
    }

    /// Precision and scale of a decimal.
    pub fn precision_scale(&self) -> Option<(u32, u32)> {
        match self.parameters {
            FieldParameters::Decimal { precision, scale } => Some((precision, scale)),
            _ => None,
        }
    }

    /// Resolved range, explicit or derived.
    pub fn range(&self) -> Option<&FieldRange> {
        self.range.as_ref()
    }

    /// Range bounds as declared.
    pub fn declared_range(&self) -> Option<&RangeDefinition> {
        self.declared_range.as_ref()
    }

    /// Whether null values are rejected.
    pub fn not_null(&self) -> bool {
        self.not_null
    }

    /// Name before an in-flight rename.
    pub fn old_name(&self) -> Option<&str> {
        self.old_name.as_deref()
    }

    /// Coerce a raw value for this field. Null gives `None`.
    pub fn coerce(&self, raw: &RawValue) -> SchemaResult<Option<Value>> {
        self.coerce_with(raw, &ParseOptions::default())
    }

    /// [`TypeField::coerce`] with explicit file-handling options.
    pub fn coerce_with(&self, raw: &RawValue, options: &ParseOptions) -> SchemaResult<Option<Value>> {
        if raw.is_null() {
            return Ok(None);
        }
        let value = tuple::parse_with(self.kind, raw, options)?;
        if let Some(range) = &self.range {
            range.check(&value)?;
        }
        Ok(Some(value))
    }
}

fn describe_structured(length: Option<u32>, precision: Option<u32>, scale: Option<u32>) -> String {
    let parts: Vec<String> = [("length", length), ("precision", precision), ("scale", scale)]
        .iter()
        .filter_map(|(key, value)| value.map(|v| format!("{}={}", key, v)))
        .collect();
    parts.join(",")
}

// =============================================================================
// Schema description format
// =============================================================================

/// Serialized shape of a field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct FieldDefinition {
    #[serde(alias = "type")]
    kind: PrimitiveKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    precision: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    scale: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    range: Option<RangeDefinition>,
    #[serde(default, rename = "notNull", alias = "not_null", skip_serializing_if = "is_false")]
    not_null: bool,
    #[serde(default, rename = "oldName", alias = "old_name", skip_serializing)]
    old_name: Option<String>,
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

impl TryFrom<FieldDefinition> for TypeField {
    type Error = SchemaError;

    fn try_from(def: FieldDefinition) -> SchemaResult<TypeField> {
        let field = TypeField::structured(def.kind, def.length, def.precision, def.scale, def.not_null)?;
        let field = match &def.range {
            Some(range) => field.with_range(range.min.as_deref(), range.max.as_deref())?,
            None => field,
        };
        match def.old_name {
            Some(old_name) => {
                naming::check_field_name(&old_name)?;
                Ok(field.renamed_from(old_name))
            }
            None => Ok(field),
        }
    }
}

impl From<&TypeField> for FieldDefinition {
    fn from(field: &TypeField) -> Self {
        let (precision, scale) = match field.precision_scale() {
            Some((precision, scale)) => (Some(precision), Some(scale)),
            None => (None, None),
        };
        FieldDefinition {
            kind: field.kind,
            length: field.length(),
            precision,
            scale,
            range: field.declared_range.clone(),
            not_null: field.not_null,
            old_name: None,
        }
    }
}

impl Serialize for TypeField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        FieldDefinition::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TypeField {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let def = FieldDefinition::deserialize(deserializer)?;
        TypeField::try_from(def).map_err(serde::de::Error::custom)
    }
}
