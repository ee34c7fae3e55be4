//! Source type detection
//!
//! Classifies a raw value into a [`SourceType`]. Strings are probed in a
//! fixed priority order and the first matching probe wins, so a string of
//! ten digits is a `PHONE` before it is a `NUMERIC_STRING`.
//!
//! Copyright (c) 2025 Typecast Team
//! Licensed under the Apache-2.0 license

use crate::temporal::parse_calendar;
use crate::types::SourceType;
use crate::value::Value;
use regex::Regex;
use std::sync::OnceLock;

/// Tokens accepted as booleans, lower-case
pub const TRUE_TOKENS: &[&str] = &["true", "1", "yes", "y", "on"];
pub const FALSE_TOKENS: &[&str] = &["false", "0", "no", "n", "off"];

static UUID_REGEX: OnceLock<Regex> = OnceLock::new();
static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();
static TIME_REGEX: OnceLock<Regex> = OnceLock::new();

fn uuid_regex() -> &'static Regex {
    UUID_REGEX.get_or_init(|| {
        Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[1-5][0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$")
            .expect("uuid pattern is valid")
    })
}

fn email_regex() -> &'static Regex {
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
    })
}

fn phone_regex() -> &'static Regex {
    PHONE_REGEX.get_or_init(|| {
        Regex::new(r"^\+?[\d\s\-()]+$").expect("phone pattern is valid")
    })
}

fn time_regex() -> &'static Regex {
    TIME_REGEX.get_or_init(|| {
        Regex::new(r"(?i)^([01]?\d|2[0-3]):[0-5]\d(:[0-5]\d)?(\s?(AM|PM))?$")
            .expect("time pattern is valid")
    })
}

/// Classify a value. Total: never fails.
pub fn detect(value: &Value) -> SourceType {
    match value {
        Value::Integer(_) => SourceType::Integer,
        Value::Float(f) => {
            if f.is_finite() && f.fract() == 0.0 {
                SourceType::Integer
            } else {
                SourceType::Float
            }
        }
        Value::Bool(_) => SourceType::Boolean,
        Value::DateTime(_) => SourceType::DateObject,
        Value::Array(_) => SourceType::Array,
        Value::Object(_) => SourceType::Object,
        Value::String(s) => detect_string(s),
        Value::Null => SourceType::Unknown,
    }
}

/// Classify a string by probing each pattern in priority order
pub fn detect_string(s: &str) -> SourceType {
    if is_uuid(s) {
        SourceType::Uuid
    } else if is_email(s) {
        SourceType::Email
    } else if is_url(s) {
        SourceType::Url
    } else if is_phone(s) {
        SourceType::Phone
    } else if parse_calendar(s).is_some() {
        SourceType::DateString
    } else if is_time(s) {
        SourceType::TimeString
    } else if parse_number(s).is_some() {
        SourceType::NumericString
    } else if parse_boolean_token(s).is_some() {
        SourceType::BooleanString
    } else if is_json_document(s) {
        SourceType::JsonString
    } else {
        SourceType::String
    }
}

/// `8-4-4-4-12` hex groups with version 1-5 and an RFC 4122 variant
pub fn is_uuid(s: &str) -> bool {
    uuid_regex().is_match(s)
}

pub fn is_email(s: &str) -> bool {
    email_regex().is_match(s)
}

/// Absolute URI: must carry a scheme
pub fn is_url(s: &str) -> bool {
    url::Url::parse(s).is_ok()
}

/// Digits, spaces, hyphens and parentheses with an optional leading `+`;
/// at least ten digits
pub fn is_phone(s: &str) -> bool {
    phone_regex().is_match(s) && s.chars().filter(|c| c.is_ascii_digit()).count() >= 10
}

/// `H:MM[:SS][ AM|PM]`
pub fn is_time(s: &str) -> bool {
    time_regex().is_match(s.trim())
}

/// Parse the whole string as a finite number
pub fn parse_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    // f64::from_str also accepts "inf" and "nan"; only digits count here
    if !trimmed.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Case-insensitive membership in the boolean token sets
pub fn parse_boolean_token(s: &str) -> Option<bool> {
    let lowered = s.trim().to_lowercase();
    if TRUE_TOKENS.contains(&lowered.as_str()) {
        Some(true)
    } else if FALSE_TOKENS.contains(&lowered.as_str()) {
        Some(false)
    } else {
        None
    }
}

/// A string holding a JSON object or array.
///
/// JSON scalars (numbers, `true`, quoted strings) are reached by the
/// earlier probes or are not worth distinguishing from plain text.
pub fn is_json_document(s: &str) -> bool {
    matches!(
        serde_json::from_str::<serde_json::Value>(s),
        Ok(serde_json::Value::Object(_)) | Ok(serde_json::Value::Array(_))
    )
}
