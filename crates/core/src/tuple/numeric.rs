//! Numeric and boolean coercion
//!
//! Integer kinds narrow exactly: `12.0` becomes `12`, `12.5` or a value
//! outside the target width fails. Decimals can be checked against a range.

use crate::error::{SchemaError, SchemaResult};
use crate::field::TypeField;
use crate::kind::PrimitiveKind;
use crate::value::{RawValue, Value};
use bigdecimal::BigDecimal;
use num_traits::{ToPrimitive, Zero};
use std::fmt;
use std::str::FromStr;

use super::text::bytes_to_string;

fn unexpected(kind: PrimitiveKind, raw: &RawValue) -> SchemaError {
    SchemaError::UnexpectedValue {
        kind,
        found: raw.shape(),
    }
}

/// Parse text as a decimal, tolerating surrounding whitespace.
fn decimal_from_text(kind: PrimitiveKind, text: &str) -> SchemaResult<BigDecimal> {
    BigDecimal::from_str(text.trim()).map_err(|_| SchemaError::invalid_value(kind, text))
}

/// Most integer digits an `i64` can carry.
const MAX_INTEGER_DIGITS: i64 = 19;

/// Exact `i64` value of a decimal; `shown` is what the caller sent.
///
/// The digit count is checked from the unscaled value and exponent before
/// anything is expanded, so `1e20000000` fails without materializing it.
fn exact_integer(kind: PrimitiveKind, d: &BigDecimal, shown: &dyn fmt::Display) -> SchemaResult<i64> {
    if d.is_zero() {
        return Ok(0);
    }
    let (_, scale) = d.as_bigint_and_exponent();
    let integer_digits = i64::try_from(d.digits())
        .ok()
        .and_then(|digits| digits.checked_sub(scale));
    match integer_digits {
        Some(n) if n > 0 && n <= MAX_INTEGER_DIGITS => {}
        _ => return Err(SchemaError::invalid_value(kind, shown)),
    }
    if !d.is_integer() {
        return Err(SchemaError::invalid_value(kind, shown));
    }
    d.to_i64().ok_or_else(|| SchemaError::invalid_value(kind, shown))
}

/// Exact integer value of any integral input.
fn integral(kind: PrimitiveKind, raw: &RawValue) -> SchemaResult<i64> {
    match raw {
        RawValue::Int(v) => Ok(*v),
        RawValue::Decimal(d) => exact_integer(kind, d, d),
        RawValue::Text(s) => match s.trim().parse::<i64>() {
            Ok(v) => Ok(v),
            Err(_) => exact_integer(kind, &decimal_from_text(kind, s)?, s),
        },
        RawValue::Bytes(b) => integral(kind, &RawValue::Text(bytes_to_string(kind, b)?)),
        RawValue::Typed(Value::Int16(v)) => Ok(i64::from(*v)),
        RawValue::Typed(Value::Int32(v)) => Ok(i64::from(*v)),
        RawValue::Typed(Value::Int64(v)) => Ok(*v),
        RawValue::Typed(Value::Numeric(d)) => exact_integer(kind, d, d),
        _ => Err(unexpected(kind, raw)),
    }
}

/// Coerce to a 16-bit integer.
pub fn parse_int16(raw: &RawValue) -> SchemaResult<i16> {
    let kind = PrimitiveKind::Int16;
    let v = integral(kind, raw)?;
    i16::try_from(v).map_err(|_| SchemaError::invalid_value(kind, v))
}

/// Coerce to a 32-bit integer.
pub fn parse_int32(raw: &RawValue) -> SchemaResult<i32> {
    let kind = PrimitiveKind::Int32;
    let v = integral(kind, raw)?;
    i32::try_from(v).map_err(|_| SchemaError::invalid_value(kind, v))
}

/// Coerce to a 64-bit integer.
pub fn parse_int64(raw: &RawValue) -> SchemaResult<i64> {
    integral(PrimitiveKind::Int64, raw)
}

/// Coerce to a 32-bit float.
///
/// A driver `f64` is accepted only when it is exactly representable.
pub fn parse_float32(raw: &RawValue) -> SchemaResult<f32> {
    let kind = PrimitiveKind::Float32;
    match raw {
        RawValue::Float(v) => {
            let narrowed = *v as f32;
            if f64::from(narrowed) == *v || v.is_nan() {
                Ok(narrowed)
            } else {
                Err(SchemaError::invalid_value(kind, v))
            }
        }
        RawValue::Text(s) => s
            .trim()
            .parse::<f32>()
            .map_err(|_| SchemaError::invalid_value(kind, s)),
        RawValue::Bytes(b) => parse_float32(&RawValue::Text(bytes_to_string(kind, b)?)),
        RawValue::Typed(Value::Float32(v)) => Ok(*v),
        _ => Err(unexpected(kind, raw)),
    }
}

/// Coerce to a 64-bit float.
pub fn parse_float64(raw: &RawValue) -> SchemaResult<f64> {
    let kind = PrimitiveKind::Float64;
    match raw {
        RawValue::Float(v) => Ok(*v),
        RawValue::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| SchemaError::invalid_value(kind, s)),
        RawValue::Bytes(b) => parse_float64(&RawValue::Text(bytes_to_string(kind, b)?)),
        RawValue::Typed(Value::Float32(v)) => Ok(f64::from(*v)),
        RawValue::Typed(Value::Float64(v)) => Ok(*v),
        _ => Err(unexpected(kind, raw)),
    }
}

/// Coerce to a decimal.
pub fn parse_numeric(raw: &RawValue) -> SchemaResult<BigDecimal> {
    let kind = PrimitiveKind::Numeric;
    let from_float = |v: f64| -> SchemaResult<BigDecimal> {
        if !v.is_finite() {
            return Err(SchemaError::invalid_value(kind, v));
        }
        decimal_from_text(kind, &v.to_string())
    };
    match raw {
        RawValue::Decimal(d) => Ok(d.clone()),
        RawValue::Int(v) => Ok(BigDecimal::from(*v)),
        RawValue::Float(v) => from_float(*v),
        RawValue::Text(s) => decimal_from_text(kind, s),
        RawValue::Bytes(b) => decimal_from_text(kind, &bytes_to_string(kind, b)?),
        RawValue::Typed(Value::Float32(v)) => from_float(f64::from(*v)),
        RawValue::Typed(Value::Float64(v)) => from_float(*v),
        RawValue::Typed(value @ (Value::Int16(_) | Value::Int32(_) | Value::Int64(_) | Value::Numeric(_))) => {
            value.to_decimal().ok_or_else(|| unexpected(kind, raw))
        }
        _ => Err(unexpected(kind, raw)),
    }
}

/// Coerce to a decimal within `[min, max]` (each bound optional).
pub fn parse_numeric_in(
    raw: &RawValue,
    min: Option<&BigDecimal>,
    max: Option<&BigDecimal>,
) -> SchemaResult<BigDecimal> {
    let value = parse_numeric(raw)?;
    let below = min.map_or(false, |min| &value < min);
    let above = max.map_or(false, |max| &value > max);
    if below || above {
        return Err(SchemaError::OutOfRange {
            field: None,
            value: value.to_string(),
            min: min.map(ToString::to_string),
            max: max.map(ToString::to_string),
        });
    }
    Ok(value)
}

/// Coerce to a decimal within the range of `field`.
///
/// Uses the field's range when it has one, otherwise the all-nines bound of
/// its precision and scale.
pub fn parse_numeric_for(raw: &RawValue, field: &TypeField) -> SchemaResult<BigDecimal> {
    match field.range() {
        Some(range) => {
            let min = range.min().and_then(Value::to_decimal);
            let max = range.max().and_then(Value::to_decimal);
            parse_numeric_in(raw, min.as_ref(), max.as_ref())
        }
        None => match field.precision_scale() {
            Some((precision, scale)) => {
                let max = crate::kind::numeric_max(precision, scale);
                let min = -max.clone();
                parse_numeric_in(raw, Some(&min), Some(&max))
            }
            None => parse_numeric(raw),
        },
    }
}

/// Coerce to a boolean.
///
/// Text must be `true` or `false` (any case); integers must be `0` or `1`.
pub fn parse_boolean(raw: &RawValue) -> SchemaResult<bool> {
    let kind = PrimitiveKind::Boolean;
    match raw {
        RawValue::Bool(v) => Ok(*v),
        RawValue::Typed(Value::Boolean(v)) => Ok(*v),
        RawValue::Int(0) => Ok(false),
        RawValue::Int(1) => Ok(true),
        RawValue::Int(v) => Err(SchemaError::invalid_value(kind, v)),
        RawValue::Text(s) => {
            let trimmed = s.trim();
            if trimmed.eq_ignore_ascii_case("true") {
                Ok(true)
            } else if trimmed.eq_ignore_ascii_case("false") {
                Ok(false)
            } else {
                Err(SchemaError::invalid_value(kind, s))
            }
        }
        RawValue::Bytes(b) => parse_boolean(&RawValue::Text(bytes_to_string(kind, b)?)),
        _ => Err(unexpected(kind, raw)),
    }
}
