//! Typecast Core - typed data transformation engine
//!
//! Coerces loosely-typed values, as produced by a JSON parser, into values
//! suitable for strictly-typed destination columns.
//!
//! # Main Components
//!
//! - **Detection**: Classify raw values into source types ([`detect`])
//! - **Normalization**: Map declared column types onto target types ([`normalize`])
//! - **Validation**: Severity-tagged rules per target type ([`validator`])
//! - **Conversion**: Confidence-weighted converters per type pair ([`converter`])
//! - **Orchestration**: The per-value pipeline ([`TransformationEngine`])
//! - **Batches**: Row-by-row driver with summary statistics ([`batch`])
//!
//! # Example
//!
//! ```
//! use typecast_core::{ColumnSpec, Dialect, TransformationContext, TransformationEngine, Value};
//!
//! let engine = TransformationEngine::new();
//! let column = ColumnSpec::new("quantity", "INTEGER", false);
//! let context = TransformationContext::for_column(column, Value::from("42"), Dialect::PostgreSql);
//!
//! let result = engine.transform(&Value::from("42"), &context).unwrap();
//! assert_eq!(result.value, Value::Integer(42));
//! assert_eq!(result.transformations, vec!["STRING_TO_INTEGER"]);
//! assert_eq!(result.confidence, 0.9);
//! ```

pub mod batch;
pub mod config;
pub mod converter;
pub mod defaults;
pub mod detect;
pub mod dialect;
pub mod engine;
pub mod error;
pub mod hooks;
pub mod normalize;
pub mod registry;
pub mod temporal;
pub mod types;
pub mod validator;
pub mod value;

// Re-export main types for convenience
pub use error::{Error, Result, RuleViolation, Severity};
pub use types::{
    ColumnSpec, Dialect, SourceType, TargetType, TransformationContext, TransformationResult,
};
pub use value::Value;

pub use batch::{transform_rows, BatchOptions, BatchOutput, BatchReport, ColumnFailure, RowOutcome};
pub use config::EngineConfig;
pub use converter::Converter;
pub use engine::{RegistryStats, TransformationEngine};
pub use validator::{ValidationOutcome, ValidationRule};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
