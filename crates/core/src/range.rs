//! Inclusive value ranges for ordered fields
//!
//! Numeric and temporal fields may carry a `[min, max]` range. A range is
//! built either from typed bounds read back from storage ([`FieldRange::new`])
//! or from a field declaration ([`FieldRange::resolve`]), where textual
//! bounds are parsed with the kind's parser and missing bounds fall back to
//! the kind's natural extremes:
//!
//! | Kind            | Default bounds                                  |
//! |-----------------|-------------------------------------------------|
//! | int16/32/64     | type minimum / maximum                          |
//! | float32/64      | most negative / most positive finite value      |
//! | numeric (p, s)  | `-numeric_max(p, s)` / `numeric_max(p, s)`      |
//! | numeric (no p)  | none                                            |
//! | temporal        | none                                            |

use crate::error::{SchemaError, SchemaResult};
use crate::kind::{numeric_max, PrimitiveKind};
use crate::tuple;
use crate::value::{compare, RawValue, Value};
use std::cmp::Ordering;

/// Inclusive range; an absent bound is unbounded on that side.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRange {
    min: Option<Value>,
    max: Option<Value>,
}

impl FieldRange {
    /// Range from already typed bounds.
    ///
    /// Fails with `invalid_range` when both bounds are present and
    /// `min > max`.
    pub fn new(min: Option<Value>, max: Option<Value>) -> SchemaResult<FieldRange> {
        if let (Some(lo), Some(hi)) = (&min, &max) {
            if compare(lo, hi) == Some(Ordering::Greater) {
                return Err(SchemaError::InvalidRange {
                    min: lo.to_string(),
                    max: hi.to_string(),
                });
            }
        }
        Ok(FieldRange { min, max })
    }

    /// Range of a declared field.
    ///
    /// `precision_scale` only matters for `numeric`. Returns `None` when the
    /// kind ends up with no bound at all. Asking for the range of an
    /// unordered kind is a programming error.
    pub fn resolve(
        kind: PrimitiveKind,
        precision_scale: Option<(u32, u32)>,
        min: Option<&str>,
        max: Option<&str>,
    ) -> SchemaResult<Option<FieldRange>> {
        debug_assert!(kind.is_ordered(), "range requested for unordered kind {}", kind);
        if !kind.is_ordered() {
            return Ok(None);
        }

        let (default_min, default_max) = natural_bounds(kind, precision_scale);
        // Explicit decimal bounds must themselves fit the declared precision
        let limits = match (&default_min, &default_max) {
            (Some(Value::Numeric(lo)), Some(Value::Numeric(hi))) => Some((lo, hi)),
            _ => None,
        };
        let bound = |text: Option<&str>| -> SchemaResult<Option<Value>> {
            text.map(|t| {
                let raw = RawValue::Text(t.to_string());
                match limits {
                    Some((lo, hi)) => tuple::parse_numeric_in(&raw, Some(lo), Some(hi)).map(Value::Numeric),
                    None => tuple::parse(kind, &raw),
                }
            })
            .transpose()
        };
        let explicit_min = bound(min)?;
        let explicit_max = bound(max)?;
        let min = explicit_min.or(default_min);
        let max = explicit_max.or(default_max);

        if min.is_none() && max.is_none() {
            return Ok(None);
        }
        FieldRange::new(min, max).map(Some)
    }

    /// Lower bound.
    pub fn min(&self) -> Option<&Value> {
        self.min.as_ref()
    }

    /// Upper bound.
    pub fn max(&self) -> Option<&Value> {
        self.max.as_ref()
    }

    /// `(min is absent or value >= min) and (max is absent or value <= max)`.
    ///
    /// Values that cannot be ordered against a bound are out of range.
    pub fn is_in_range(&self, value: &Value) -> bool {
        let above_min = self.min.as_ref().map_or(true, |min| {
            matches!(compare(value, min), Some(Ordering::Greater | Ordering::Equal))
        });
        let below_max = self.max.as_ref().map_or(true, |max| {
            matches!(compare(value, max), Some(Ordering::Less | Ordering::Equal))
        });
        above_min && below_max
    }

    /// Like [`FieldRange::is_in_range`], failing with `out_of_range_value`.
    pub fn check(&self, value: &Value) -> SchemaResult<()> {
        if self.is_in_range(value) {
            return Ok(());
        }
        Err(SchemaError::OutOfRange {
            field: None,
            value: value.to_string(),
            min: self.min.as_ref().map(ToString::to_string),
            max: self.max.as_ref().map(ToString::to_string),
        })
    }
}

fn natural_bounds(kind: PrimitiveKind, precision_scale: Option<(u32, u32)>) -> (Option<Value>, Option<Value>) {
    match kind {
        PrimitiveKind::Int16 => (Some(Value::Int16(i16::MIN)), Some(Value::Int16(i16::MAX))),
        PrimitiveKind::Int32 => (Some(Value::Int32(i32::MIN)), Some(Value::Int32(i32::MAX))),
        PrimitiveKind::Int64 => (Some(Value::Int64(i64::MIN)), Some(Value::Int64(i64::MAX))),
        PrimitiveKind::Float32 => (Some(Value::Float32(f32::MIN)), Some(Value::Float32(f32::MAX))),
        PrimitiveKind::Float64 => (Some(Value::Float64(f64::MIN)), Some(Value::Float64(f64::MAX))),
        PrimitiveKind::Numeric => match precision_scale {
            Some((precision, scale)) => {
                let max = numeric_max(precision, scale);
                (Some(Value::Numeric(-max.clone())), Some(Value::Numeric(max)))
            }
            None => (None, None),
        },
        _ => (None, None),
    }
}
