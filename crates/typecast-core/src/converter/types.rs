//! Core types for the conversion system
//!
//! Copyright (c) 2025 Typecast Team
//! Licensed under the Apache-2.0 license

use crate::error::catch_panic;
use crate::types::{SourceType, TargetType, TransformationContext};
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// A function coercing a value from one source type into one target type
pub type ConvertFn =
    Arc<dyn Fn(&Value, &TransformationContext) -> anyhow::Result<Value> + Send + Sync>;

/// A registered conversion strategy
///
/// The confidence weight is static: it describes how trustworthy the
/// strategy's output is in general, not for a particular value.
#[derive(Clone)]
pub struct Converter {
    name: Option<String>,
    confidence: f64,
    func: ConvertFn,
}

impl Converter {
    pub fn new<F>(confidence: f64, func: F) -> Self
    where
        F: Fn(&Value, &TransformationContext) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        Self {
            name: None,
            confidence,
            func: Arc::new(func),
        }
    }

    /// Override the transformation tag reported when this converter runs
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Transformation tag for this converter registered under `(source, target)`
    pub fn tag(&self, source: SourceType, target: TargetType) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("{}_TO_{}", source, target),
        }
    }

    pub fn apply(&self, value: &Value, context: &TransformationContext) -> anyhow::Result<Value> {
        catch_panic(|| (self.func)(value, context))
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converter")
            .field("name", &self.name)
            .field("confidence", &self.confidence)
            .finish_non_exhaustive()
    }
}

/// Key a converter is registered under
pub type ConverterKey = (SourceType, TargetType);
