//! Output formatting and writing utilities
//!
//! This module provides utilities for formatting and writing output
//! in various formats (JSON, YAML, human-readable), with specialized
//! rendering for batch reports and progress indicators.

use crate::cli::OutputFormat;
use crate::error::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use is_terminal::IsTerminal;
use serde::Serialize;
use serde_json::Value;
use std::io::{self, Write};
use std::time::Duration;
use tracing::trace;
use typecast_core::{BatchOutput, BatchReport, RowOutcome};

/// Trait for formatting output with specialized support for batch results
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format a batch report
    fn format_batch_report(&self, report: &BatchReport) -> Result<String>;

    /// Format transformed rows together with their report
    fn format_batch_output(&self, output: &BatchOutput) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            OutputFormat::Human => Ok(serde_json::to_string_pretty(value)?),
        }
    }

    fn format_batch_report(&self, report: &BatchReport) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_batch_report_human(report)),
            _ => self.format(report),
        }
    }

    fn format_batch_output(&self, output: &BatchOutput) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_batch_output_human(output)),
            _ => self.format(output),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    show_progress: bool,
    quiet: bool,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer on stdout
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool, show_progress: bool) -> Self {
        Self {
            format,
            use_color,
            show_progress: show_progress && !quiet && io::stdout().is_terminal(),
            quiet,
            writer: Box::new(io::stdout()),
        }
    }

    /// Create an output writer with a custom writer. Progress indicators
    /// are never shown.
    pub fn with_writer(format: OutputFormat, use_color: bool, quiet: bool, writer: Box<dyn Write>) -> Self {
        Self {
            format,
            use_color,
            show_progress: false,
            quiet,
            writer,
        }
    }

    pub fn is_human(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Write raw output
    pub fn write(&mut self, content: &str) -> Result<()> {
        write!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write an info message (human format only)
    pub fn info(&mut self, message: &str) -> Result<()> {
        if self.quiet || !self.is_human() {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.writeln(&format!("INFO: {}", message))
        }
    }

    /// Write a success message (human format only)
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || !self.is_human() {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write a warning message (human format only)
    pub fn warning(&mut self, message: &str) -> Result<()> {
        if !self.is_human() {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.yellow().to_string())
        } else {
            self.writeln(&format!("WARNING: {}", message))
        }
    }

    /// Write a section header
    pub fn section(&mut self, title: &str) -> Result<()> {
        if self.quiet || !self.is_human() {
            return Ok(());
        }

        self.writeln("")?;
        if self.use_color {
            self.writeln(&format!("═══ {} ═══", title).bright_blue().to_string())
        } else {
            self.writeln(&format!("=== {} ===", title))
        }
    }

    /// Write data in the configured format
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let formatted = self.format.format(value)?;
        trace!(bytes = formatted.len(), "Outputting data");

        if self.is_human() {
            self.writeln(&formatted)
        } else {
            self.write(&formatted)?;
            if !formatted.ends_with('\n') {
                self.writeln("")?;
            }
            Ok(())
        }
    }

    /// Write a batch report with specialized formatting
    pub fn batch_report(&mut self, report: &BatchReport) -> Result<()> {
        let formatted = self.format.format_batch_report(report)?;
        self.write_block(&formatted)
    }

    /// Write transformed rows and their report
    pub fn batch_output(&mut self, output: &BatchOutput) -> Result<()> {
        let formatted = self.format.format_batch_output(output)?;
        self.write_block(&formatted)
    }

    fn write_block(&mut self, formatted: &str) -> Result<()> {
        if formatted.ends_with('\n') {
            self.write(formatted)
        } else {
            self.writeln(formatted)
        }
    }

    /// Create a spinner for indeterminate progress
    pub fn spinner(&self, message: &str) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(default_spinner_style());
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    }

    /// Write a table (human format only)
    pub fn table(&mut self, headers: &[&str], rows: Vec<Vec<String>>) -> Result<()> {
        if self.quiet || !self.is_human() {
            return Ok(());
        }

        let rendered = render_table(headers, &rows);
        let mut lines = rendered.lines();
        if let Some(header) = lines.next() {
            if self.use_color {
                self.writeln(&header.bold().to_string())?;
            } else {
                self.writeln(header)?;
            }
        }
        for line in lines {
            self.writeln(line)?;
        }
        Ok(())
    }
}

/// Spinner style used while a batch runs
pub fn default_spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

/// Render an aligned text table: header, separator, rows
fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths = headers.iter().map(|h| h.chars().count()).collect::<Vec<_>>();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    let mut out = String::new();
    out.push_str(&pad_cells(&widths, headers.iter().copied()));
    out.push('\n');
    out.push_str(
        &widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("─┼─"),
    );
    out.push('\n');
    for row in rows {
        out.push_str(&pad_cells(&widths, row.iter().map(String::as_str)));
        out.push('\n');
    }
    out
}

fn pad_cells<'a>(widths: &[usize], cells: impl Iterator<Item = &'a str>) -> String {
    cells
        .enumerate()
        .map(|(i, cell)| match widths.get(i) {
            Some(width) => format!("{:width$}", cell, width = width),
            None => cell.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" │ ")
        .trim_end()
        .to_string()
}

fn format_batch_report_human(report: &BatchReport) -> String {
    let mut output = String::from("═══ Batch Report ═══\n\n");
    output.push_str(&report.render_text());
    if report.failures() == 0 {
        output.push_str("\n✅ All values transformed\n");
    } else {
        output.push_str(&format!("\n❌ {} value(s) failed\n", report.failures()));
    }
    output
}

fn format_batch_output_human(output: &BatchOutput) -> String {
    let mut text = String::from("═══ Transformed Rows ═══\n\n");

    let columns: Vec<&str> = output
        .rows
        .first()
        .map(|row| row.values.keys().map(String::as_str).collect())
        .unwrap_or_default();
    let mut headers = vec!["#"];
    headers.extend(columns.iter().copied());

    let rows = output
        .rows
        .iter()
        .map(|row| {
            let mut cells = vec![row.row_index.to_string()];
            cells.extend(
                columns
                    .iter()
                    .map(|column| row.values.get(*column).map(format_value_compact).unwrap_or_else(|| "✗".to_string())),
            );
            cells
        })
        .collect::<Vec<_>>();
    text.push_str(&render_table(&headers, &rows));

    let issues = format_row_issues_human(&output.rows);
    if !issues.is_empty() {
        text.push('\n');
        text.push_str(&issues);
    }

    text.push('\n');
    text.push_str(&format_batch_report_human(&output.report));
    text
}

/// Failures and warnings, grouped per row
fn format_row_issues_human(rows: &[RowOutcome]) -> String {
    let mut output = String::new();
    for row in rows {
        if row.failures.is_empty() && row.warnings.is_empty() {
            continue;
        }
        output.push_str(&format!("Row {}:\n", row.row_index));
        for failure in &row.failures {
            output.push_str(&format!("  ❌ {} ({:?}): {}\n", failure.column, failure.kind, failure.error));
        }
        for warning in &row.warnings {
            output.push_str(&format!("  ⚠️  {}\n", warning));
        }
    }
    output
}

/// Format a JSON value in a compact, human-readable way
fn format_value_compact(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{}\"", s),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            if arr.len() <= 3 {
                format!(
                    "[{}]",
                    arr.iter().map(format_value_compact).collect::<Vec<_>>().join(", ")
                )
            } else {
                format!("[{} items]", arr.len())
            }
        }
        Value::Object(obj) => {
            if obj.len() <= 2 {
                let items: Vec<String> = obj
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k, format_value_compact(v)))
                    .collect();
                format!("{{{}}}", items.join(", "))
            } else {
                format!("{{{} fields}}", obj.len())
            }
        }
    }
}
