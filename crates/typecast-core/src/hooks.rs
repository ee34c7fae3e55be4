//! Per-column custom transformers
//!
//! Hooks run after conversion. A hook that fails or panics leaves the value
//! as it was and adds a warning; it can never abort the transformation.

use crate::error::catch_panic;
use crate::registry::AppendOnlyRegistry;
use crate::types::TransformationContext;
use crate::value::Value;
use std::sync::Arc;
use tracing::warn;

pub const CUSTOM_TRANSFORM: &str = "CUSTOM_TRANSFORM";

pub type CustomTransformer =
    Arc<dyn Fn(&Value, &TransformationContext) -> anyhow::Result<Value> + Send + Sync>;

/// Result of running the hooks of one column
#[derive(Debug, Clone, PartialEq)]
pub struct HookOutcome {
    pub value: Value,
    pub warnings: Vec<String>,
    /// Number of hooks that succeeded
    pub applied: usize,
}

#[derive(Default)]
pub struct CustomTransformers {
    hooks: AppendOnlyRegistry<String, CustomTransformer>,
}

impl CustomTransformers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hook for `column`. Several hooks for one column run in
    /// registration order, each receiving the previous hook's output.
    pub fn register<F>(&self, column: impl Into<String>, hook: F)
    where
        F: Fn(&Value, &TransformationContext) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.hooks.append(column.into(), Arc::new(hook));
    }

    pub fn has_hooks(&self, column: &str) -> bool {
        !self.hooks.get(&column.to_string()).is_empty()
    }

    pub fn apply(&self, value: Value, context: &TransformationContext) -> HookOutcome {
        let mut outcome = HookOutcome {
            value,
            warnings: Vec::new(),
            applied: 0,
        };

        for hook in self.hooks.get(&context.column.name) {
            match catch_panic(|| hook(&outcome.value, context)) {
                Ok(next) => {
                    outcome.value = next;
                    outcome.applied += 1;
                }
                Err(e) => {
                    warn!(column = %context.column.name, error = %e, "Custom transformer failed");
                    outcome.warnings.push(format!(
                        "Custom transformer for column '{}' failed: {}",
                        context.column.name, e
                    ));
                }
            }
        }

        outcome
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

impl std::fmt::Debug for CustomTransformers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomTransformers")
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ColumnSpec, Dialect};
    use anyhow::anyhow;

    fn context(column: &str) -> TransformationContext {
        TransformationContext::for_column(
            ColumnSpec::new(column, "TEXT", true),
            Value::Null,
            Dialect::PostgreSql,
        )
    }

    #[test]
    fn test_hook_transforms_value() {
        let hooks = CustomTransformers::new();
        hooks.register("email", |value, _| {
            Ok(Value::String(value.to_plain_string().to_lowercase()))
        });

        let outcome = hooks.apply(Value::from("Jane@Example.COM"), &context("email"));
        assert_eq!(outcome.value, Value::from("jane@example.com"));
        assert_eq!(outcome.applied, 1);
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_failing_hook_keeps_value() {
        let hooks = CustomTransformers::new();
        hooks.register("code", |_, _| Err(anyhow!("lookup service down")));

        let outcome = hooks.apply(Value::from("A1"), &context("code"));
        assert_eq!(outcome.value, Value::from("A1"));
        assert_eq!(outcome.applied, 0);
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].contains("'code'"));
        assert!(outcome.warnings[0].contains("lookup service down"));
    }

    #[test]
    fn test_panicking_hook_keeps_value() {
        let hooks = CustomTransformers::new();
        hooks.register("code", |value, _| {
            let s = value.to_plain_string();
            Ok(Value::String(s[0..100].to_string()))
        });
        hooks.register("code", |value, _| Ok(Value::String(value.to_plain_string().to_lowercase())));

        let outcome = hooks.apply(Value::from("X"), &context("code"));
        assert_eq!(outcome.value, Value::from("x"));
        assert_eq!(outcome.applied, 1);
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].contains("panicked"));
    }

    #[test]
    fn test_hooks_chain_in_order() {
        let hooks = CustomTransformers::new();
        hooks.register("name", |value, _| Ok(Value::String(value.to_plain_string().trim().to_string())));
        hooks.register("name", |value, _| Ok(Value::String(value.to_plain_string().to_uppercase())));

        let outcome = hooks.apply(Value::from("  ada "), &context("name"));
        assert_eq!(outcome.value, Value::from("ADA"));
        assert_eq!(outcome.applied, 2);
    }

    #[test]
    fn test_other_columns_untouched() {
        let hooks = CustomTransformers::new();
        hooks.register("a", |_, _| Ok(Value::Integer(1)));

        let outcome = hooks.apply(Value::from("x"), &context("b"));
        assert_eq!(outcome.value, Value::from("x"));
        assert!(!hooks.has_hooks("b"));
        assert!(hooks.has_hooks("a"));
    }
}
