//! Core validation types
//!
//! Copyright (c) 2025 Typecast Team
//! Licensed under the Apache-2.0 license

use crate::error::{catch_panic, RuleViolation, Severity};
use crate::types::TransformationContext;
use crate::value::Value;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Predicate over a value; `Ok(true)` means the value satisfies the rule
pub type RulePredicate =
    Arc<dyn Fn(&Value, &TransformationContext) -> anyhow::Result<bool> + Send + Sync>;

/// A named, severity-tagged constraint on values for one target type
#[derive(Clone)]
pub struct ValidationRule {
    pub name: String,
    pub message: String,
    pub severity: Severity,
    predicate: RulePredicate,
}

impl ValidationRule {
    pub fn new<F>(name: impl Into<String>, message: impl Into<String>, severity: Severity, predicate: F) -> Self
    where
        F: Fn(&Value, &TransformationContext) -> anyhow::Result<bool> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            message: message.into(),
            severity,
            predicate: Arc::new(predicate),
        }
    }

    pub fn check(&self, value: &Value, context: &TransformationContext) -> anyhow::Result<bool> {
        catch_panic(|| (self.predicate)(value, context))
    }

    pub(crate) fn violation(&self) -> RuleViolation {
        RuleViolation {
            rule: self.name.clone(),
            message: self.message.clone(),
            severity: self.severity,
        }
    }
}

impl fmt::Debug for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationRule")
            .field("name", &self.name)
            .field("message", &self.message)
            .field("severity", &self.severity)
            .finish_non_exhaustive()
    }
}

/// Aggregate outcome of every rule registered for a target type
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationOutcome {
    pub has_errors: bool,
    /// Failed ERROR-severity rules
    pub errors: Vec<RuleViolation>,
    /// Failed WARNING/INFO rules and rules that could not be evaluated
    pub warnings: Vec<RuleViolation>,
}

impl ValidationOutcome {
    pub fn is_clean(&self) -> bool {
        !self.has_errors && self.warnings.is_empty()
    }

    pub(crate) fn record(&mut self, violation: RuleViolation) {
        if violation.severity == Severity::Error {
            self.has_errors = true;
            self.errors.push(violation);
        } else {
            self.warnings.push(violation);
        }
    }
}
