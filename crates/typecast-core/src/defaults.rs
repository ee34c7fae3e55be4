//! Null and default-value resolution
//!
//! Absent values never reach detection. A nullable column keeps the null; a
//! non-nullable column gets a canonical default for its target type, which is
//! flagged with a warning and a halved confidence since it is a guess.

use crate::normalize::normalize;
use crate::types::{TargetType, TransformationContext, TransformationResult};
use crate::value::Value;
use chrono::Utc;
use tracing::debug;

pub const NULL_TO_DEFAULT: &str = "NULL_TO_DEFAULT";

/// Confidence of a synthesized default
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

pub const NIL_UUID: &str = "00000000-0000-0000-0000-000000000000";

/// Canonical default for a target type
pub fn default_for(target: TargetType) -> Value {
    match target {
        TargetType::Integer => Value::Integer(0),
        TargetType::Float => Value::Float(0.0),
        TargetType::String => Value::String(String::new()),
        TargetType::Boolean => Value::Bool(false),
        TargetType::Date | TargetType::DateTime => Value::DateTime(Utc::now()),
        TargetType::Uuid => Value::String(NIL_UUID.to_string()),
        TargetType::Json => Value::String(String::new()),
    }
}

/// Outcome for a null value bound for the context's column
pub fn resolve_null(context: &TransformationContext) -> TransformationResult {
    if context.column.nullable {
        return TransformationResult::passthrough(Value::Null);
    }

    let target = normalize(context.declared_type());
    let default = default_for(target);
    debug!(column = %context.column.name, %target, %default, "Substituting default for null");

    TransformationResult::passthrough(default.clone())
        .with_warning(format!(
            "Column '{}' is not nullable; null replaced with default {}",
            context.column.name, default
        ))
        .with_transformation(NULL_TO_DEFAULT)
        .with_confidence(DEFAULT_CONFIDENCE)
}
