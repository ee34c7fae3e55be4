//! Shared utilities for command handlers

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;
use typecast_core::ColumnSpec;

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s == "yaml" || s == "yml")
        .unwrap_or(false)
}

/// Read a JSON or YAML document, keyed on the file extension
fn read_document<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = fs::read_to_string(path)?;

    if is_yaml(path) {
        serde_yaml::from_str(&content).map_err(|e| Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: format!("YAML {}", what),
            reason: e.to_string(),
        })
    } else {
        serde_json::from_str(&content).map_err(|e| Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: format!("JSON {}", what),
            reason: e.to_string(),
        })
    }
}

/// Load the destination columns: a list of `{name, type, nullable}`
pub fn load_columns(path: &Path) -> Result<Vec<ColumnSpec>> {
    let columns: Vec<ColumnSpec> = read_document(path, "column list")?;
    if columns.is_empty() {
        return Err(Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: "column list".to_string(),
            reason: "schema declares no columns".to_string(),
        });
    }
    Ok(columns)
}

/// Load the input records: an array of JSON objects
pub fn load_records(path: &Path) -> Result<Vec<serde_json::Value>> {
    read_document(path, "array of records")
}

/// Write a value as JSON, or YAML for `.yaml`/`.yml` paths
pub fn save_document<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let content = if is_yaml(path) {
        serde_yaml::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, content)?;
    Ok(())
}
