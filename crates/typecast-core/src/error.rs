//! Error types for the Typecast core library
//!
//! Only two conditions abort the transformation of a value: a failed
//! ERROR-severity validation rule and a converter that cannot coerce its
//! input. Everything else degrades into a warning on the result, so it never
//! shows up here.

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use thiserror::Error;

/// Main error type for Typecast operations
#[derive(Error, Debug)]
pub enum Error {
    /// One or more ERROR-severity validation rules rejected the value
    #[error("Validation failed for column '{column}': {}", summarize(.violations))]
    Validation {
        column: String,
        violations: Vec<RuleViolation>,
    },

    /// The selected converter could not coerce the value
    #[error("Conversion failed: cannot convert {from} to {to} for value {value}: {message}")]
    Conversion {
        from: String,
        to: String,
        value: String,
        message: String,
    },

    /// Invalid engine or registration configuration
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// JSON parsing and serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// True for the per-value failures a batch caller is expected to absorb
    pub fn is_value_failure(&self) -> bool {
        matches!(self, Error::Validation { .. } | Error::Conversion { .. })
    }
}

/// Severity levels for validation outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Informational, no action required
    Info,
    /// Warning, value is still accepted
    Warning,
    /// Error, the value is rejected
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A single failed validation rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleViolation {
    pub rule: String,
    pub message: String,
    pub severity: Severity,
}

impl fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.rule)
    }
}

/// Run caller-supplied code (converters, rule predicates, hooks), reporting
/// a panic as an ordinary error
pub(crate) fn catch_panic<T>(f: impl FnOnce() -> anyhow::Result<T>) -> anyhow::Result<T> {
    panic::catch_unwind(AssertUnwindSafe(f))
        .unwrap_or_else(|payload| Err(anyhow::anyhow!("panicked: {}", panic_message(payload.as_ref()))))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    }
}

fn summarize(violations: &[RuleViolation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io {
            message: err.to_string(),
            source: err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catch_panic_reports_message() {
        let ok = catch_panic(|| Ok(5));
        assert_eq!(ok.unwrap(), 5);

        let err = catch_panic::<()>(|| panic!("column {} exploded", "age")).unwrap_err();
        assert_eq!(err.to_string(), "panicked: column age exploded");

        let err = catch_panic::<()>(|| std::panic::panic_any(42_u8)).unwrap_err();
        assert_eq!(err.to_string(), "panicked: unknown panic");
    }

    #[test]
    fn test_validation_error_display() {
        let err = Error::Validation {
            column: "age".to_string(),
            violations: vec![RuleViolation {
                rule: "integer_range".to_string(),
                message: "Value 99999 is outside SMALLINT range".to_string(),
                severity: Severity::Error,
            }],
        };
        assert_eq!(
            err.to_string(),
            "Validation failed for column 'age': Value 99999 is outside SMALLINT range (integer_range)"
        );
        assert!(err.is_value_failure());
    }

    #[test]
    fn test_conversion_error_display() {
        let err = Error::Conversion {
            from: "STRING".to_string(),
            to: "INTEGER".to_string(),
            value: "\"abc\"".to_string(),
            message: "not an integer".to_string(),
        };
        assert!(err.to_string().contains("cannot convert STRING to INTEGER"));
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
        assert_eq!(Severity::Warning.to_string(), "warning");
    }

    #[test]
    fn test_configuration_is_not_a_value_failure() {
        let err = Error::Configuration {
            message: "bad".to_string(),
        };
        assert!(!err.is_value_failure());
    }
}
