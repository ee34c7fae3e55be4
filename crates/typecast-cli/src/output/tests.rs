// Tests for output formatting of batch results
//
// Batches are produced by the real engine so the rendered report matches
// what `typecast transform` prints.

use super::*;
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;
use typecast_core::{transform_rows, BatchOptions, ColumnSpec, Dialect, TransformationEngine};

#[derive(Clone, Default)]
struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).unwrap()
    }
}

fn sample_batch() -> BatchOutput {
    let engine = TransformationEngine::new();
    let columns = vec![
        ColumnSpec::new("id", "INTEGER", false),
        ColumnSpec::new("age", "SMALLINT", true),
        ColumnSpec::new("active", "BOOLEAN", false),
    ];
    let rows = vec![
        json!({"id": "1", "age": "34", "active": "yes"}),
        json!({"id": "abc", "age": "99999", "active": true}),
    ];
    transform_rows(&engine, &rows, &columns, "users", Dialect::MySql, &BatchOptions::default()).unwrap()
}

#[test]
fn test_batch_report_human() {
    let batch = sample_batch();
    let formatted = OutputFormat::Human.format_batch_report(&batch.report).unwrap();

    assert!(formatted.contains("═══ Batch Report ═══"));
    assert!(formatted.contains("Table:        users (mysql)"));
    assert!(formatted.contains("Rows:         2"));
    assert!(formatted.contains("2 value(s) failed"));
}

#[test]
fn test_batch_report_machine_formats() {
    let batch = sample_batch();

    let json = OutputFormat::Json.format_batch_report(&batch.report).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["table"], "users");
    assert_eq!(parsed["validation_failures"], 1);
    assert_eq!(parsed["conversion_failures"], 1);

    let yaml = OutputFormat::Yaml.format_batch_report(&batch.report).unwrap();
    assert!(yaml.contains("table: users"));
}

#[test]
fn test_batch_output_human_lists_rows_and_failures() {
    let batch = sample_batch();
    let formatted = OutputFormat::Human.format_batch_output(&batch).unwrap();

    assert!(formatted.contains("═══ Transformed Rows ═══"));
    assert!(formatted.lines().any(|line| line.starts_with("# │ id │ age │ active")));
    assert!(formatted.contains("Row 1:"));
    assert!(formatted.contains("❌ id (Conversion)"));
    assert!(formatted.contains("❌ age (Validation)"));
    assert!(formatted.contains("✗"));
}

#[test]
fn test_render_table_alignment() {
    let table = render_table(
        &["column", "type"],
        &[
            vec!["id".to_string(), "INTEGER".to_string()],
            vec!["created_at".to_string(), "DATETIME".to_string()],
        ],
    );
    let lines: Vec<&str> = table.lines().collect();

    assert_eq!(lines[0], "column     │ type");
    assert_eq!(lines[1], "───────────┼─────────");
    assert_eq!(lines[2], "id         │ INTEGER");
    assert_eq!(lines[3], "created_at │ DATETIME");
}

#[test]
fn test_format_value_compact() {
    assert_eq!(format_value_compact(&json!("x")), "\"x\"");
    assert_eq!(format_value_compact(&json!([1, 2])), "[1, 2]");
    assert_eq!(format_value_compact(&json!([1, 2, 3, 4])), "[4 items]");
    assert_eq!(format_value_compact(&json!({"a": 1, "b": 2, "c": 3})), "{3 fields}");
}

#[test]
fn test_messages_suppressed_for_machine_formats() {
    let buffer = SharedBuffer::default();
    let mut writer = OutputWriter::with_writer(OutputFormat::Json, false, false, Box::new(buffer.clone()));

    writer.info("loading").unwrap();
    writer.warning("careful").unwrap();
    writer.section("Rows").unwrap();
    writer.data(&json!({"ok": true})).unwrap();

    assert_eq!(buffer.contents(), "{\"ok\":true}\n");
}

#[test]
fn test_quiet_human_writer_keeps_warnings() {
    let buffer = SharedBuffer::default();
    let mut writer = OutputWriter::with_writer(OutputFormat::Human, false, true, Box::new(buffer.clone()));

    writer.info("loading").unwrap();
    writer.success("done").unwrap();
    writer.warning("careful").unwrap();

    assert_eq!(buffer.contents(), "WARNING: careful\n");
}

#[test]
fn test_writer_has_no_spinner_for_custom_writers() {
    let writer = OutputWriter::with_writer(OutputFormat::Human, false, false, Box::new(SharedBuffer::default()));
    assert!(writer.spinner("working").is_none());
}
