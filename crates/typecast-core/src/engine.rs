//! The transformation orchestrator
//!
//! [`TransformationEngine::transform`] is the single per-value entry point.
//! A value moves through null resolution, type detection, validation,
//! conversion, custom hooks and dialect formatting, in that order. Only a
//! failed ERROR rule or a failing converter abort; everything else lands on
//! the result as a warning.
//!
//! The engine holds three append-only registries. Registration is allowed at
//! any time, including while other threads are transforming values.

use crate::config::EngineConfig;
use crate::converter::{Converter, ConverterRegistry};
use crate::defaults::resolve_null;
use crate::detect;
use crate::dialect;
use crate::error::{Error, Result};
use crate::hooks::{CustomTransformers, CUSTOM_TRANSFORM};
use crate::normalize;
use crate::types::{SourceType, TargetType, TransformationContext, TransformationResult};
use crate::validator::{RuleEngine, ValidationOutcome, ValidationRule};
use crate::value::Value;
use serde::Serialize;
use std::sync::{Arc, OnceLock};
use tracing::{debug, debug_span};

/// Entry counts of the engine's registries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegistryStats {
    pub converters: usize,
    pub validation_rules: usize,
    pub custom_transformers: usize,
}

#[derive(Debug)]
pub struct TransformationEngine {
    converters: ConverterRegistry,
    rules: RuleEngine,
    custom: CustomTransformers,
}

impl Default for TransformationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformationEngine {
    /// Engine with the built-in converters and validation rules
    pub fn new() -> Self {
        Self::with_config(&EngineConfig::default())
    }

    /// Engine with empty registries
    pub fn empty() -> Self {
        Self::with_config(&EngineConfig::bare())
    }

    pub fn with_config(config: &EngineConfig) -> Self {
        let converters = if config.install_builtin_converters {
            ConverterRegistry::with_builtins()
        } else {
            ConverterRegistry::new()
        };
        let rules = if config.install_builtin_rules {
            RuleEngine::with_builtins()
        } else {
            RuleEngine::new()
        };

        debug!(
            converters = converters.len(),
            rules = rules.len(),
            "Initialized transformation engine"
        );

        Self {
            converters,
            rules,
            custom: CustomTransformers::new(),
        }
    }

    /// Process-wide engine with the built-ins installed
    pub fn global() -> &'static TransformationEngine {
        static GLOBAL: OnceLock<TransformationEngine> = OnceLock::new();
        GLOBAL.get_or_init(TransformationEngine::new)
    }

    /// Add a converter for `(source, target)`. Converters already registered
    /// for the pair stay in place and compete by confidence.
    pub fn add_type_converter(&self, source: SourceType, target: TargetType, converter: Converter) -> Result<()> {
        self.converters.register(source, target, converter)
    }

    /// Add a rule for `target`, evaluated after every existing rule
    pub fn add_validation_rule(&self, target: TargetType, rule: ValidationRule) {
        debug!(%target, rule = %rule.name, severity = %rule.severity, "Registering validation rule");
        self.rules.register(target, rule);
    }

    pub fn add_custom_transformer<F>(&self, column: impl Into<String>, hook: F)
    where
        F: Fn(&Value, &TransformationContext) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        let column = column.into();
        debug!(%column, "Registering custom transformer");
        self.custom.register(column, hook);
    }

    pub fn converters_for(&self, source: SourceType, target: TargetType) -> Vec<Arc<Converter>> {
        self.converters.converters_for(source, target)
    }

    pub fn rules_for(&self, target: TargetType) -> Vec<Arc<ValidationRule>> {
        self.rules.rules_for(target)
    }

    pub fn registry_stats(&self) -> RegistryStats {
        RegistryStats {
            converters: self.converters.len(),
            validation_rules: self.rules.len(),
            custom_transformers: self.custom.len(),
        }
    }

    pub fn converters(&self) -> &ConverterRegistry {
        &self.converters
    }

    pub fn detect(&self, value: &Value) -> SourceType {
        detect::detect(value)
    }

    pub fn normalize(&self, declared_type: &str) -> TargetType {
        normalize::normalize(declared_type)
    }

    /// Run the validation rules for the context's column without transforming
    pub fn validate(&self, value: &Value, context: &TransformationContext) -> ValidationOutcome {
        self.rules.validate(value, context)
    }

    /// Transform one value for the column described by `context`.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] when an ERROR-severity rule rejects the value and
    /// [`Error::Conversion`] when the selected converter cannot coerce it.
    /// No partial result is produced in either case.
    pub fn transform(&self, value: &Value, context: &TransformationContext) -> Result<TransformationResult> {
        let span = debug_span!(
            "transform",
            table = %context.table_name,
            column = %context.column.name,
            row = context.row_index
        );
        let _guard = span.enter();

        if value.is_null() {
            return Ok(resolve_null(context));
        }

        let source = detect::detect(value);
        let target = normalize::normalize(context.declared_type());
        debug!(%source, %target, "Detected types");

        let outcome = self.rules.validate(value, context);
        if outcome.has_errors {
            debug!(violations = outcome.errors.len(), "Validation rejected value");
            return Err(Error::Validation {
                column: context.column.name.clone(),
                violations: outcome.errors,
            });
        }

        let mut result = TransformationResult::passthrough(value.clone());
        result
            .warnings
            .extend(outcome.warnings.iter().map(|violation| violation.to_string()));

        if source.matches_target(target) {
            debug!("Source matches target, skipping conversion");
            // JSON `3.0` detects as INTEGER but must reach the column as 3
            if target == TargetType::Integer {
                if let Some(n) = result.value.as_integral() {
                    result.value = Value::Integer(n);
                }
            }
        } else {
            let step = self.converters.convert(value, source, target, context)?;
            result.merge_step(step);
        }

        let hooked = self.custom.apply(result.value, context);
        result.value = hooked.value;
        result.warnings.extend(hooked.warnings);
        if hooked.applied > 0 {
            result.transformations.push(CUSTOM_TRANSFORM.to_string());
        }

        result.value = dialect::format(result.value, context.database_type);

        debug!(
            confidence = result.confidence,
            warnings = result.warnings.len(),
            "Transformed value"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Severity;
    use crate::types::{ColumnSpec, Dialect};

    fn context(declared_type: &str, dialect: Dialect) -> TransformationContext {
        TransformationContext::new(
            "$.field",
            ColumnSpec::new("field", declared_type, false),
            dialect,
            Value::Null,
            0,
            "items",
        )
    }

    #[test]
    fn test_numeric_string_into_integer() {
        let engine = TransformationEngine::new();
        let result = engine
            .transform(&Value::from("42"), &context("INTEGER", Dialect::PostgreSql))
            .unwrap();
        assert_eq!(result.value, Value::Integer(42));
        assert_eq!(result.transformations, vec!["STRING_TO_INTEGER"]);
        assert_eq!(result.confidence, 0.9);
    }

    #[test]
    fn test_validation_error_stops_pipeline() {
        let engine = TransformationEngine::new();
        engine.add_custom_transformer("field", |_, _| panic!("hook must not run"));

        let err = engine
            .transform(&Value::Integer(40_000), &context("SMALLINT", Dialect::PostgreSql))
            .unwrap_err();
        assert!(matches!(err, Error::Validation { ref column, .. } if column == "field"));
    }

    #[test]
    fn test_rule_warnings_travel_with_result() {
        let engine = TransformationEngine::new();
        let result = engine
            .transform(&Value::from("toolong"), &context("VARCHAR(3)", Dialect::PostgreSql))
            .unwrap();
        assert_eq!(result.value, Value::from("toolong"));
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("max_length"));
        assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn test_hook_runs_after_conversion_and_before_formatting() {
        let engine = TransformationEngine::new();
        engine.add_custom_transformer("field", |value, _| match value {
            Value::Integer(n) => Ok(Value::Bool(*n > 0)),
            other => Ok(other.clone()),
        });

        let result = engine
            .transform(&Value::from("7"), &context("INTEGER", Dialect::MySql))
            .unwrap();
        assert_eq!(result.value, Value::Integer(1));
        assert_eq!(result.transformations, vec!["STRING_TO_INTEGER", CUSTOM_TRANSFORM]);
    }

    #[test]
    fn test_empty_engine_falls_back_to_string() {
        let engine = TransformationEngine::empty();
        let result = engine
            .transform(&Value::from("42"), &context("INTEGER", Dialect::PostgreSql))
            .unwrap();
        assert_eq!(result.value, Value::from("42"));
        assert_eq!(result.confidence, 0.3);
        assert_eq!(result.transformations, vec!["TYPE_CONVERSION: NUMERIC_STRING -> INTEGER"]);
    }

    #[test]
    fn test_registry_stats() {
        let engine = TransformationEngine::empty();
        engine.add_validation_rule(
            TargetType::Float,
            ValidationRule::new("positive", "must be positive", Severity::Error, |v, _| {
                Ok(v.as_f64().map_or(true, |f| f > 0.0))
            }),
        );
        engine.add_custom_transformer("price", |v, _| Ok(v.clone()));
        engine
            .add_type_converter(
                SourceType::Boolean,
                TargetType::Float,
                Converter::new(0.6, |v, _| Ok(Value::Float(if v == &Value::Bool(true) { 1.0 } else { 0.0 }))),
            )
            .unwrap();

        assert_eq!(
            engine.registry_stats(),
            RegistryStats {
                converters: 1,
                validation_rules: 1,
                custom_transformers: 1,
            }
        );
        assert_eq!(engine.rules_for(TargetType::Float).len(), 1);
        assert_eq!(engine.converters_for(SourceType::Boolean, TargetType::Float).len(), 1);
    }

    #[test]
    fn test_global_is_shared() {
        let a = TransformationEngine::global() as *const _;
        let b = TransformationEngine::global() as *const _;
        assert_eq!(a, b);
        assert!(!TransformationEngine::global().converters().is_empty());
    }
}
