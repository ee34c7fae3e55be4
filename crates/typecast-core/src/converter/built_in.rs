//! Built-in converters
//!
//! Each function returns a ready-to-register [`Converter`]; [`install`]
//! registers the whole set with its standard confidence weights.
//!
//! Copyright (c) 2025 Typecast Team
//! Licensed under the Apache-2.0 license

use super::types::Converter;
use super::ConverterRegistry;
use crate::detect::{parse_boolean_token, parse_number};
use crate::temporal::parse_calendar;
use crate::types::{SourceType, TargetType};
use crate::value::Value;
use anyhow::{anyhow, bail};

/// Locale-free integer parse. Decimal literals are accepted only when they
/// carry no fractional part (`"42.0"`).
pub fn string_to_integer() -> Converter {
    Converter::new(0.9, |value, _| {
        let s = expect_str(value)?;
        parse_integer(s)
            .map(Value::Integer)
            .ok_or_else(|| anyhow!("'{}' is not an integer", s))
    })
}

pub fn string_to_float() -> Converter {
    Converter::new(0.9, |value, _| {
        let s = expect_str(value)?;
        parse_number(s)
            .map(Value::Float)
            .ok_or_else(|| anyhow!("'{}' is not a number", s))
    })
}

pub fn string_to_boolean() -> Converter {
    Converter::new(0.8, |value, _| {
        let s = expect_str(value)?;
        parse_boolean_token(s)
            .map(Value::Bool)
            .ok_or_else(|| anyhow!("'{}' is not a recognized boolean token", s))
    })
}

/// Calendar parse. A time of day present in the input is kept, since
/// `DATETIME` columns normalize to DATE.
pub fn string_to_date() -> Converter {
    Converter::new(0.8, |value, _| {
        let s = expect_str(value)?;
        parse_calendar(s)
            .map(Value::DateTime)
            .ok_or_else(|| anyhow!("'{}' is not a calendar date", s))
    })
}

pub fn string_to_datetime() -> Converter {
    Converter::new(0.8, |value, _| {
        let s = expect_str(value)?;
        parse_calendar(s)
            .map(Value::DateTime)
            .ok_or_else(|| anyhow!("'{}' is not a date-time", s))
    })
}

/// Parse embedded JSON and store it compactly; plain text becomes a JSON
/// string literal
pub fn string_to_json() -> Converter {
    Converter::new(0.8, |value, _| {
        let s = expect_str(value)?;
        let document = serde_json::from_str::<serde_json::Value>(s)
            .unwrap_or_else(|_| serde_json::Value::String(s.to_string()));
        Ok(Value::String(serde_json::to_string(&document)?))
    })
}

/// Structural serialization of objects and arrays
pub fn structure_to_json() -> Converter {
    Converter::new(1.0, |value, _| match value {
        Value::Object(_) | Value::Array(_) => Ok(Value::String(serde_json::to_string(&value.to_json())?)),
        other => bail!("expected an object or array, got {}", other),
    })
}

pub fn structure_to_string() -> Converter {
    Converter::new(0.9, |value, _| Ok(Value::String(serde_json::to_string(&value.to_json())?)))
}

pub fn scalar_to_string() -> Converter {
    Converter::new(1.0, |value, _| Ok(Value::String(value.to_plain_string())))
}

pub fn integer_to_float() -> Converter {
    Converter::new(1.0, |value, _| {
        value
            .as_f64()
            .map(Value::Float)
            .ok_or_else(|| anyhow!("expected a number, got {}", value))
    })
}

/// Rounds to the nearest integer
pub fn float_to_integer() -> Converter {
    Converter::new(0.7, |value, _| {
        let f = value
            .as_f64()
            .ok_or_else(|| anyhow!("expected a number, got {}", value))?;
        let rounded = f.round();
        if !rounded.is_finite() || rounded < i64::MIN as f64 || rounded > i64::MAX as f64 {
            bail!("{} does not fit in a 64-bit integer", f);
        }
        Ok(Value::Integer(rounded as i64))
    })
}

pub fn boolean_to_integer() -> Converter {
    Converter::new(0.9, |value, _| match value {
        Value::Bool(b) => Ok(Value::Integer(i64::from(*b))),
        other => bail!("expected a boolean, got {}", other),
    })
}

/// Only 0 and 1 are accepted
pub fn integer_to_boolean() -> Converter {
    Converter::new(0.8, |value, _| match value.as_f64() {
        Some(n) if n == 0.0 => Ok(Value::Bool(false)),
        Some(n) if n == 1.0 => Ok(Value::Bool(true)),
        _ => bail!("{} is neither 0 nor 1", value),
    })
}

pub fn date_object_to_date() -> Converter {
    Converter::new(1.0, |value, _| match value {
        Value::DateTime(dt) => Ok(Value::DateTime(*dt)),
        other => bail!("expected a date-time, got {}", other),
    })
}

pub fn date_object_to_datetime() -> Converter {
    Converter::new(1.0, |value, _| match value {
        Value::DateTime(dt) => Ok(Value::DateTime(*dt)),
        other => bail!("expected a date-time, got {}", other),
    })
}

/// Register every built-in converter
pub fn install(registry: &ConverterRegistry) {
    use SourceType as S;
    use TargetType as T;

    let converters = [
        (S::String, T::Integer, string_to_integer()),
        (S::String, T::Float, string_to_float()),
        (S::String, T::Boolean, string_to_boolean()),
        (S::String, T::Date, string_to_date()),
        (S::String, T::DateTime, string_to_datetime()),
        (S::String, T::Json, string_to_json()),
        (S::Object, T::Json, structure_to_json()),
        (S::Array, T::Json, structure_to_json()),
        (S::Object, T::String, structure_to_string()),
        (S::Array, T::String, structure_to_string()),
        (S::Integer, T::String, scalar_to_string()),
        (S::Float, T::String, scalar_to_string()),
        (S::Boolean, T::String, scalar_to_string()),
        (S::Integer, T::Float, integer_to_float()),
        (S::Float, T::Integer, float_to_integer()),
        (S::Boolean, T::Integer, boolean_to_integer()),
        (S::Integer, T::Boolean, integer_to_boolean()),
        (S::DateObject, T::Date, date_object_to_date()),
        (S::DateObject, T::DateTime, date_object_to_datetime()),
    ];

    for (source, target, converter) in converters {
        registry.register_unchecked(source, target, converter);
    }
}

/// Integer parse shared with validation
pub fn parse_integer(s: &str) -> Option<i64> {
    let trimmed = s.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return Some(n);
    }
    let f = parse_number(trimmed)?;
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

fn expect_str(value: &Value) -> anyhow::Result<&str> {
    value
        .as_str()
        .ok_or_else(|| anyhow!("expected a string, got {}", value))
}
