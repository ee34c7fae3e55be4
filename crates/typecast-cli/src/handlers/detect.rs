//! Detect and normalize command handlers

use crate::cli::{DetectArgs, NormalizeArgs};
use crate::error::Result;
use crate::output::OutputWriter;
use serde::Serialize;
use typecast_core::normalize::IntegerWidth;
use typecast_core::{SourceType, TargetType, TransformationEngine, Value};

#[derive(Debug, Serialize)]
pub struct Detection {
    pub input: serde_json::Value,
    pub source_type: SourceType,
    /// Type used for converter lookup when no exact converter exists
    pub family: SourceType,
}

#[derive(Debug, Serialize)]
pub struct Normalization {
    pub declared_type: String,
    pub target_type: TargetType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub integer_range: Option<(i64, i64)>,
}

/// Parse the argument as JSON unless `raw`; anything unparseable is a string
pub fn parse_input(value: &str, raw: bool) -> serde_json::Value {
    if raw {
        return serde_json::Value::String(value.to_string());
    }
    serde_json::from_str(value).unwrap_or_else(|_| serde_json::Value::String(value.to_string()))
}

pub fn detect_value(input: serde_json::Value) -> Detection {
    let source_type = TransformationEngine::global().detect(&Value::from(&input));
    Detection {
        input,
        source_type,
        family: source_type.family(),
    }
}

pub fn normalize_declared(declared_type: &str) -> Normalization {
    let target_type = TransformationEngine::global().normalize(declared_type);
    Normalization {
        declared_type: declared_type.to_string(),
        target_type,
        integer_range: (target_type == TargetType::Integer).then(|| IntegerWidth::of(declared_type).bounds()),
    }
}

/// Handle the detect command
pub fn handle_detect(args: DetectArgs, output: &mut OutputWriter) -> Result<()> {
    let detection = detect_value(parse_input(&args.value, args.raw));

    if output.is_human() {
        output.section("Detection")?;
        output.table(
            &["value", "source type", "family"],
            vec![vec![
                detection.input.to_string(),
                detection.source_type.to_string(),
                detection.family.to_string(),
            ]],
        )
    } else {
        output.data(&detection)
    }
}

/// Handle the normalize command
pub fn handle_normalize(args: NormalizeArgs, output: &mut OutputWriter) -> Result<()> {
    let normalization = normalize_declared(&args.declared_type);

    if output.is_human() {
        let range = normalization
            .integer_range
            .map(|(min, max)| format!("{}..={}", min, max))
            .unwrap_or_default();
        output.section("Type Normalization")?;
        output.table(
            &["declared type", "target type", "range"],
            vec![vec![
                normalization.declared_type.clone(),
                normalization.target_type.to_string(),
                range,
            ]],
        )
    } else {
        output.data(&normalization)
    }
}
