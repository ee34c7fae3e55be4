//! Built-in validation rules
//!
//! Copyright (c) 2025 Typecast Team
//! Licensed under the Apache-2.0 license

use super::types::ValidationRule;
use super::RuleEngine;
use crate::converter::built_in::parse_integer;
use crate::detect::{is_json_document, is_uuid, parse_number};
use crate::error::Severity;
use crate::normalize::{declared_length, IntegerWidth};
use crate::types::TargetType;
use crate::value::Value;

/// Empty or whitespace-only strings
pub fn non_empty_string() -> ValidationRule {
    ValidationRule::new(
        "non_empty_string",
        "String value is empty",
        Severity::Warning,
        |value, _| Ok(!matches!(value, Value::String(s) if s.trim().is_empty())),
    )
}

/// Strings longer than the `VARCHAR(n)`/`CHAR(n)` declaration
pub fn declared_max_length() -> ValidationRule {
    ValidationRule::new(
        "max_length",
        "String value exceeds the declared column length",
        Severity::Warning,
        |value, context| {
            let (Value::String(s), Some(limit)) = (value, declared_length(context.declared_type())) else {
                return Ok(true);
            };
            Ok(s.chars().count() <= limit)
        },
    )
}

/// Integer values, including numeric strings, within the range of the
/// declared integer subtype. Non-numeric values pass; the converter
/// reports them.
pub fn integer_range() -> ValidationRule {
    ValidationRule::new(
        "integer_range",
        "Integer value is outside the range of the declared column type",
        Severity::Error,
        |value, context| {
            let (min, max) = IntegerWidth::of(context.declared_type()).bounds();
            let in_range = match value {
                Value::Integer(n) => (min..=max).contains(n),
                Value::Float(f) => *f >= min as f64 && *f <= max as f64,
                Value::String(s) => match parse_integer(s) {
                    Some(n) => (min..=max).contains(&n),
                    None => parse_number(s).map_or(true, |f| f >= min as f64 && f <= max as f64),
                },
                _ => true,
            };
            Ok(in_range)
        },
    )
}

/// Native floats must be finite
pub fn finite_number() -> ValidationRule {
    ValidationRule::new(
        "finite_number",
        "Numeric value is not finite",
        Severity::Error,
        |value, _| Ok(!matches!(value, Value::Float(f) if !f.is_finite())),
    )
}

/// `8-4-4-4-12` shape with a valid version and variant
pub fn uuid_format() -> ValidationRule {
    ValidationRule::new(
        "uuid_format",
        "Value is not a well-formed UUID",
        Severity::Error,
        |value, _| Ok(value.as_str().is_some_and(is_uuid)),
    )
}

/// Plain text bound for a JSON column is stored as a JSON string literal
pub fn json_document() -> ValidationRule {
    ValidationRule::new(
        "json_document",
        "String value is not a JSON document and will be stored as a JSON string",
        Severity::Info,
        |value, _| match value {
            Value::String(s) => Ok(is_json_document(s)),
            _ => Ok(true),
        },
    )
}

/// Register every built-in rule
pub fn install(engine: &RuleEngine) {
    let rules = [
        (TargetType::String, non_empty_string()),
        (TargetType::String, declared_max_length()),
        (TargetType::Integer, integer_range()),
        (TargetType::Float, finite_number()),
        (TargetType::Uuid, uuid_format()),
        (TargetType::Json, json_document()),
    ];

    for (target, rule) in rules {
        engine.register(target, rule);
    }
}
