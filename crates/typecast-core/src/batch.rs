//! Batch driver over JSON records
//!
//! Runs one [`TransformationEngine::transform`] call per (row, column) and
//! collects failures per value instead of aborting, unless fail-fast is
//! requested. A column missing from a row is treated as null.

use crate::defaults::NULL_TO_DEFAULT;
use crate::engine::TransformationEngine;
use crate::error::{Error, Result};
use crate::types::{ColumnSpec, Dialect, TransformationContext};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use serde_json::Map;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use tracing::{debug, info};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOptions {
    /// Stop at the first value that fails validation or conversion
    pub fail_fast: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    Validation,
    Conversion,
}

/// A value that could not be transformed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnFailure {
    pub column: String,
    pub kind: FailureKind,
    pub error: String,
}

/// Transformed values of one input row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowOutcome {
    pub row_index: usize,
    /// Successfully transformed columns, in schema order
    pub values: Map<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<ColumnFailure>,
}

impl RowOutcome {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Summary statistics for a batch run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub table: String,
    pub dialect: Dialect,
    pub rows: usize,
    /// Values attempted (rows x columns)
    pub values: usize,
    pub succeeded: usize,
    pub validation_failures: usize,
    pub conversion_failures: usize,
    pub warnings: usize,
    pub null_defaults: usize,
    pub min_confidence: Option<f64>,
    pub mean_confidence: Option<f64>,
    /// Applied transformation tags and how often each ran
    pub by_transformation: BTreeMap<String, usize>,
}

impl BatchReport {
    pub fn failures(&self) -> usize {
        self.validation_failures + self.conversion_failures
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Table:        {} ({})", self.table, self.dialect);
        let _ = writeln!(out, "Rows:         {}", self.rows);
        let _ = writeln!(out, "Values:       {} ({} succeeded)", self.values, self.succeeded);
        let _ = writeln!(
            out,
            "Failures:     {} ({} validation, {} conversion)",
            self.failures(),
            self.validation_failures,
            self.conversion_failures
        );
        let _ = writeln!(out, "Warnings:     {}", self.warnings);
        let _ = writeln!(out, "Null defaults: {}", self.null_defaults);
        if let (Some(min), Some(mean)) = (self.min_confidence, self.mean_confidence) {
            let _ = writeln!(out, "Confidence:   min {:.2}, mean {:.2}", min, mean);
        }
        if !self.by_transformation.is_empty() {
            let _ = writeln!(out, "Transformations:");
            for (tag, count) in &self.by_transformation {
                let _ = writeln!(out, "  {:<40} {}", tag, count);
            }
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchOutput {
    pub rows: Vec<RowOutcome>,
    pub report: BatchReport,
}

/// Transform every row against `columns`.
///
/// # Errors
///
/// A row that is not a JSON object is a [`Error::Configuration`]. With
/// `fail_fast` the first per-value failure is returned as is.
pub fn transform_rows(
    engine: &TransformationEngine,
    rows: &[serde_json::Value],
    columns: &[ColumnSpec],
    table: &str,
    dialect: Dialect,
    options: &BatchOptions,
) -> Result<BatchOutput> {
    info!(rows = rows.len(), columns = columns.len(), %table, %dialect, "Starting batch");

    let mut report = BatchReport {
        table: table.to_string(),
        dialect,
        rows: rows.len(),
        ..BatchReport::default()
    };
    let mut confidence_sum = 0.0;
    let mut outcomes = Vec::with_capacity(rows.len());

    for (row_index, row) in rows.iter().enumerate() {
        let record = row.as_object().ok_or_else(|| Error::Configuration {
            message: format!("Row {} is not a JSON object", row_index),
        })?;

        let mut outcome = RowOutcome {
            row_index,
            values: Map::new(),
            warnings: Vec::new(),
            failures: Vec::new(),
        };

        for column in columns {
            report.values += 1;
            let raw = record.get(&column.name).map(Value::from).unwrap_or(Value::Null);
            let context = TransformationContext::new(
                column.name.clone(),
                column.clone(),
                dialect,
                raw.clone(),
                row_index,
                table,
            );

            match engine.transform(&raw, &context) {
                Ok(result) => {
                    report.succeeded += 1;
                    report.warnings += result.warnings.len();
                    confidence_sum += result.confidence;
                    report.min_confidence = Some(
                        report
                            .min_confidence
                            .map_or(result.confidence, |min| min.min(result.confidence)),
                    );
                    for tag in &result.transformations {
                        if tag == NULL_TO_DEFAULT {
                            report.null_defaults += 1;
                        }
                        *report.by_transformation.entry(tag.clone()).or_insert(0) += 1;
                    }
                    outcome.warnings.extend(
                        result
                            .warnings
                            .into_iter()
                            .map(|warning| format!("{}: {}", column.name, warning)),
                    );
                    outcome.values.insert(column.name.clone(), result.value.to_json());
                }
                Err(e) if e.is_value_failure() => {
                    debug!(row = row_index, column = %column.name, error = %e, "Value rejected");
                    if options.fail_fast {
                        return Err(e);
                    }
                    let kind = match e {
                        Error::Validation { .. } => {
                            report.validation_failures += 1;
                            FailureKind::Validation
                        }
                        _ => {
                            report.conversion_failures += 1;
                            FailureKind::Conversion
                        }
                    };
                    outcome.failures.push(ColumnFailure {
                        column: column.name.clone(),
                        kind,
                        error: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        outcomes.push(outcome);
    }

    if report.succeeded > 0 {
        report.mean_confidence = Some(confidence_sum / report.succeeded as f64);
    }

    info!(
        succeeded = report.succeeded,
        failures = report.failures(),
        warnings = report.warnings,
        "Batch finished"
    );

    Ok(BatchOutput {
        rows: outcomes,
        report,
    })
}
