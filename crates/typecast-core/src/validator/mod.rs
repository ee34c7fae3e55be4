//! Validation rule engine
//!
//! Rules are registered per target type and evaluated in registration order
//! against the raw value, before any conversion. A failed ERROR rule rejects
//! the value; WARNING and INFO failures travel with the successful result.
//! A predicate that cannot be evaluated is reported as a warning and never
//! rejects the value.
//!
//! Copyright (c) 2025 Typecast Team
//! Licensed under the Apache-2.0 license

pub mod built_in;
pub mod types;


pub use types::{RulePredicate, ValidationOutcome, ValidationRule};

use crate::error::{RuleViolation, Severity};
use crate::normalize::normalize;
use crate::registry::AppendOnlyRegistry;
use crate::types::{TargetType, TransformationContext};
use crate::value::Value;
use std::sync::Arc;
use tracing::warn;

#[derive(Debug, Default)]
pub struct RuleEngine {
    rules: AppendOnlyRegistry<TargetType, ValidationRule>,
}

impl RuleEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtins() -> Self {
        let engine = Self::new();
        built_in::install(&engine);
        engine
    }

    /// Append a rule for `target`; it runs after every rule already registered
    pub fn register(&self, target: TargetType, rule: ValidationRule) {
        self.rules.append(target, rule);
    }

    pub fn rules_for(&self, target: TargetType) -> Vec<Arc<ValidationRule>> {
        self.rules.get(&target)
    }

    /// Evaluate the rules of the column's normalized target type
    pub fn validate(&self, value: &Value, context: &TransformationContext) -> ValidationOutcome {
        let target = normalize(context.declared_type());
        let mut outcome = ValidationOutcome::default();

        for rule in self.rules.get(&target) {
            match rule.check(value, context) {
                Ok(true) => {}
                Ok(false) => outcome.record(rule.violation()),
                Err(e) => {
                    warn!(
                        rule = %rule.name,
                        column = %context.column.name,
                        error = %e,
                        "Validation rule failed to evaluate"
                    );
                    outcome.record(RuleViolation {
                        rule: rule.name.clone(),
                        message: format!("Validation rule '{}' failed to evaluate: {}", rule.name, e),
                        severity: Severity::Warning,
                    });
                }
            }
        }

        outcome
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
