//! Core types shared by every stage of the transformation pipeline
//!
//! Copyright (c) 2025 Typecast Team
//! Licensed under the Apache-2.0 license

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Semantic classification of a raw input value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceType {
    Uuid,
    Email,
    Url,
    Phone,
    DateString,
    TimeString,
    NumericString,
    BooleanString,
    JsonString,
    String,
    Integer,
    Float,
    Boolean,
    DateObject,
    Array,
    Object,
    Unknown,
}

impl SourceType {
    pub const ALL: [SourceType; 17] = [
        SourceType::Uuid,
        SourceType::Email,
        SourceType::Url,
        SourceType::Phone,
        SourceType::DateString,
        SourceType::TimeString,
        SourceType::NumericString,
        SourceType::BooleanString,
        SourceType::JsonString,
        SourceType::String,
        SourceType::Integer,
        SourceType::Float,
        SourceType::Boolean,
        SourceType::DateObject,
        SourceType::Array,
        SourceType::Object,
        SourceType::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Uuid => "UUID",
            SourceType::Email => "EMAIL",
            SourceType::Url => "URL",
            SourceType::Phone => "PHONE",
            SourceType::DateString => "DATE_STRING",
            SourceType::TimeString => "TIME_STRING",
            SourceType::NumericString => "NUMERIC_STRING",
            SourceType::BooleanString => "BOOLEAN_STRING",
            SourceType::JsonString => "JSON_STRING",
            SourceType::String => "STRING",
            SourceType::Integer => "INTEGER",
            SourceType::Float => "FLOAT",
            SourceType::Boolean => "BOOLEAN",
            SourceType::DateObject => "DATE_OBJECT",
            SourceType::Array => "ARRAY",
            SourceType::Object => "OBJECT",
            SourceType::Unknown => "UNKNOWN",
        }
    }

    /// Broader type a classification belongs to.
    ///
    /// Every string sub-classification collapses to `String`; all other
    /// tags are their own family.
    pub fn family(&self) -> SourceType {
        match self {
            SourceType::Uuid
            | SourceType::Email
            | SourceType::Url
            | SourceType::Phone
            | SourceType::DateString
            | SourceType::TimeString
            | SourceType::NumericString
            | SourceType::BooleanString
            | SourceType::JsonString
            | SourceType::String => SourceType::String,
            SourceType::Integer => SourceType::Integer,
            SourceType::Float => SourceType::Float,
            SourceType::Boolean => SourceType::Boolean,
            SourceType::DateObject => SourceType::DateObject,
            SourceType::Array => SourceType::Array,
            SourceType::Object => SourceType::Object,
            SourceType::Unknown => SourceType::Unknown,
        }
    }

    /// Whether a value of this type can be stored as `target` without conversion
    pub fn matches_target(&self, target: TargetType) -> bool {
        let same = |source: SourceType| match (source, target) {
            (SourceType::String, TargetType::String)
            | (SourceType::Integer, TargetType::Integer)
            | (SourceType::Float, TargetType::Float)
            | (SourceType::Boolean, TargetType::Boolean)
            | (SourceType::Uuid, TargetType::Uuid) => true,
            _ => false,
        };
        same(*self) || same(self.family())
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical classification of a destination column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetType {
    String,
    Integer,
    Float,
    Boolean,
    Date,
    DateTime,
    Uuid,
    Json,
}

impl TargetType {
    pub const ALL: [TargetType; 8] = [
        TargetType::String,
        TargetType::Integer,
        TargetType::Float,
        TargetType::Boolean,
        TargetType::Date,
        TargetType::DateTime,
        TargetType::Uuid,
        TargetType::Json,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetType::String => "STRING",
            TargetType::Integer => "INTEGER",
            TargetType::Float => "FLOAT",
            TargetType::Boolean => "BOOLEAN",
            TargetType::Date => "DATE",
            TargetType::DateTime => "DATETIME",
            TargetType::Uuid => "UUID",
            TargetType::Json => "JSON",
        }
    }

    pub fn is_temporal(&self) -> bool {
        matches!(self, TargetType::Date | TargetType::DateTime)
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Destination column as described by the schema subsystem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    /// Declared type, free-form (`VARCHAR(255)`, `SMALLINT`, ...)
    #[serde(rename = "type")]
    pub data_type: String,
    #[serde(default)]
    pub nullable: bool,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>, nullable: bool) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            nullable,
        }
    }
}

/// Destination system whose formatting conventions apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Dialect {
    #[default]
    PostgreSql,
    MySql,
    Sqlite,
    SqlServer,
    /// Any dialect tag the engine does not recognize
    Generic,
}

impl Dialect {
    /// Parse a dialect tag. Unrecognized tags map to `Generic`.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "postgresql" | "postgres" | "pg" => Dialect::PostgreSql,
            "mysql" | "mariadb" => Dialect::MySql,
            "sqlite" | "sqlite3" => Dialect::Sqlite,
            "mssql" | "sqlserver" | "sql_server" => Dialect::SqlServer,
            _ => Dialect::Generic,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::PostgreSql => "postgresql",
            Dialect::MySql => "mysql",
            Dialect::Sqlite => "sqlite",
            Dialect::SqlServer => "sqlserver",
            Dialect::Generic => "generic",
        }
    }
}

impl FromStr for Dialect {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Dialect::from_tag(s))
    }
}

impl From<String> for Dialect {
    fn from(tag: String) -> Self {
        Dialect::from_tag(&tag)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable per-invocation record supplied by the caller
#[derive(Debug, Clone)]
pub struct TransformationContext {
    /// Path of the field in the source document
    pub source_field: String,
    /// Destination column
    pub column: ColumnSpec,
    /// Destination dialect
    pub database_type: Dialect,
    /// The raw value before any transformation
    pub original_value: Value,
    /// Zero-based index of the record in its batch
    pub row_index: usize,
    /// Destination table name
    pub table_name: String,
}

impl TransformationContext {
    pub fn new(
        source_field: impl Into<String>,
        column: ColumnSpec,
        database_type: Dialect,
        original_value: Value,
        row_index: usize,
        table_name: impl Into<String>,
    ) -> Self {
        Self {
            source_field: source_field.into(),
            column,
            database_type,
            original_value,
            row_index,
            table_name: table_name.into(),
        }
    }

    /// Context for a field that maps one-to-one onto its column
    pub fn for_column(column: ColumnSpec, value: Value, database_type: Dialect) -> Self {
        Self::new(column.name.clone(), column, database_type, value, 0, "")
    }

    pub fn column_name(&self) -> &str {
        &self.column.name
    }

    pub fn declared_type(&self) -> &str {
        &self.column.data_type
    }
}

/// Outcome of a successful transformation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformationResult {
    pub value: Value,
    pub warnings: Vec<String>,
    pub transformations: Vec<String>,
    pub confidence: f64,
}

impl TransformationResult {
    /// Unmodified value at full confidence
    pub fn passthrough(value: Value) -> Self {
        Self {
            value,
            warnings: Vec::new(),
            transformations: Vec::new(),
            confidence: 1.0,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn with_transformation(mut self, tag: impl Into<String>) -> Self {
        self.transformations.push(tag.into());
        self
    }

    /// Lower the running confidence to `confidence` if it is smaller.
    /// Confidence never rises.
    pub fn degrade(&mut self, confidence: f64) {
        self.confidence = self.confidence.min(confidence.clamp(0.0, 1.0));
    }

    /// Fold a step's result into the running result. The step's value
    /// replaces the running value.
    pub fn merge_step(&mut self, step: TransformationResult) {
        self.value = step.value;
        self.warnings.extend(step.warnings);
        self.transformations.extend(step.transformations);
        self.degrade(step.confidence);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_family() {
        assert_eq!(SourceType::NumericString.family(), SourceType::String);
        assert_eq!(SourceType::Uuid.family(), SourceType::String);
        assert_eq!(SourceType::Integer.family(), SourceType::Integer);
        assert_eq!(SourceType::Object.family(), SourceType::Object);
    }

    #[test]
    fn test_matches_target() {
        assert!(SourceType::Uuid.matches_target(TargetType::Uuid));
        assert!(SourceType::Email.matches_target(TargetType::String));
        assert!(SourceType::Integer.matches_target(TargetType::Integer));
        assert!(!SourceType::NumericString.matches_target(TargetType::Integer));
        assert!(!SourceType::Object.matches_target(TargetType::Json));
        assert!(!SourceType::DateObject.matches_target(TargetType::Date));
    }

    #[test]
    fn test_tag_display() {
        assert_eq!(SourceType::NumericString.to_string(), "NUMERIC_STRING");
        assert_eq!(TargetType::DateTime.to_string(), "DATETIME");
        let json = serde_json::to_string(&SourceType::DateObject).unwrap();
        assert_eq!(json, "\"DATE_OBJECT\"");
    }

    #[test]
    fn test_dialect_parsing() {
        assert_eq!(Dialect::from_tag("PostgreSQL"), Dialect::PostgreSql);
        assert_eq!(Dialect::from_tag("mysql"), Dialect::MySql);
        assert_eq!(Dialect::from_tag("MSSQL"), Dialect::SqlServer);
        assert_eq!(Dialect::from_tag("oracle"), Dialect::Generic);
        assert_eq!("sqlite".parse::<Dialect>().unwrap(), Dialect::Sqlite);
        let parsed: Dialect = serde_json::from_str("\"Postgres\"").unwrap();
        assert_eq!(parsed, Dialect::PostgreSql);
    }

    #[test]
    fn test_column_spec_deserializes_type_field() {
        let column: ColumnSpec =
            serde_json::from_str(r#"{"name": "id", "type": "UUID", "nullable": false}"#).unwrap();
        assert_eq!(column.data_type, "UUID");
        assert!(!column.nullable);
    }

    #[test]
    fn test_merge_step_keeps_minimum_confidence() {
        let mut running = TransformationResult::passthrough(Value::from("1"));
        running.merge_step(
            TransformationResult::passthrough(Value::Integer(1))
                .with_confidence(0.9)
                .with_transformation("STRING_TO_INTEGER"),
        );
        running.merge_step(TransformationResult::passthrough(Value::Integer(1)));
        assert_eq!(running.confidence, 0.9);
        assert_eq!(running.value, Value::Integer(1));
        assert_eq!(running.transformations, vec!["STRING_TO_INTEGER"]);
    }
}
