//! Converter registry and dispatch
//!
//! Converters are registered per `(SourceType, TargetType)` pair. Several
//! converters may compete for one pair; the one with the highest confidence
//! weight wins and ties go to the earliest registration.
//!
//! # Module Organization
//!
//! - [`types`] - the [`Converter`] strategy type
//! - [`built_in`] - the standard converter set
//!
//! # Examples
//!
//! ```
//! use typecast_core::converter::{Converter, ConverterRegistry};
//! use typecast_core::{SourceType, TargetType, Value};
//!
//! let registry = ConverterRegistry::with_builtins();
//! registry
//!     .register(SourceType::String, TargetType::Integer, Converter::new(0.95, |_, _| Ok(Value::Integer(0))))
//!     .unwrap();
//!
//! let (_, selected) = registry.select(SourceType::NumericString, TargetType::Integer).unwrap();
//! assert_eq!(selected.confidence(), 0.95);
//! ```
//!
//! Copyright (c) 2025 Typecast Team
//! Licensed under the Apache-2.0 license

pub mod built_in;
pub mod types;


pub use types::{ConvertFn, Converter, ConverterKey};

use crate::error::{Error, Result};
use crate::registry::AppendOnlyRegistry;
use crate::types::{SourceType, TargetType, TransformationContext, TransformationResult};
use crate::value::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Confidence assigned to the generic string fallback
pub const FALLBACK_CONFIDENCE: f64 = 0.3;

#[derive(Debug, Default)]
pub struct ConverterRegistry {
    converters: AppendOnlyRegistry<ConverterKey, Converter>,
}

impl ConverterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtins() -> Self {
        let registry = Self::new();
        built_in::install(&registry);
        registry
    }

    /// Register a converter for `(source, target)`. Existing converters for
    /// the pair are kept.
    pub fn register(&self, source: SourceType, target: TargetType, converter: Converter) -> Result<()> {
        let confidence = converter.confidence();
        if !(0.0..=1.0).contains(&confidence) {
            return Err(Error::Configuration {
                message: format!(
                    "Converter confidence for {} -> {} must be within [0, 1], got {}",
                    source, target, confidence
                ),
            });
        }
        self.register_unchecked(source, target, converter);
        Ok(())
    }

    pub(crate) fn register_unchecked(&self, source: SourceType, target: TargetType, converter: Converter) {
        debug!(%source, %target, confidence = converter.confidence(), "Registering converter");
        self.converters.append((source, target), converter);
    }

    /// Converters registered under exactly `(source, target)`, in registration order
    pub fn converters_for(&self, source: SourceType, target: TargetType) -> Vec<Arc<Converter>> {
        self.converters.get(&(source, target))
    }

    /// Select the converter for a pair.
    ///
    /// The exact pair is tried first, then the source type's family (every
    /// string sub-classification falls back to `STRING`). Returns the key the
    /// converter was found under together with the converter.
    pub fn select(&self, source: SourceType, target: TargetType) -> Option<(ConverterKey, Arc<Converter>)> {
        let mut keys = vec![(source, target)];
        if source.family() != source {
            keys.push((source.family(), target));
        }

        keys.into_iter().find_map(|key| {
            let mut best: Option<Arc<Converter>> = None;
            for candidate in self.converters.get(&key) {
                let better = best
                    .as_ref()
                    .map_or(true, |current| candidate.confidence() > current.confidence());
                if better {
                    best = Some(candidate);
                }
            }
            best.map(|converter| (key, converter))
        })
    }

    /// Convert `value` from `source` to `target`.
    ///
    /// With no converter for the pair the value is coerced to its plain
    /// string form at [`FALLBACK_CONFIDENCE`]. A converter that fails aborts
    /// with [`Error::Conversion`].
    pub fn convert(
        &self,
        value: &Value,
        source: SourceType,
        target: TargetType,
        context: &TransformationContext,
    ) -> Result<TransformationResult> {
        let Some(((key_source, key_target), converter)) = self.select(source, target) else {
            warn!(
                column = %context.column.name,
                %source,
                %target,
                "No converter registered, falling back to string coercion"
            );
            return Ok(TransformationResult::passthrough(Value::String(value.to_plain_string()))
                .with_warning(format!(
                    "No converter registered for {} -> {}; value coerced to string",
                    source, target
                ))
                .with_transformation(format!("TYPE_CONVERSION: {} -> {}", source, target))
                .with_confidence(FALLBACK_CONFIDENCE));
        };

        let converted = converter
            .apply(value, context)
            .map_err(|e| Error::Conversion {
                from: source.to_string(),
                to: target.to_string(),
                value: value.to_string(),
                message: e.to_string(),
            })?;

        debug!(
            column = %context.column.name,
            converter = %converter.tag(key_source, key_target),
            confidence = converter.confidence(),
            "Converted value"
        );

        Ok(TransformationResult::passthrough(converted)
            .with_transformation(converter.tag(key_source, key_target))
            .with_confidence(converter.confidence()))
    }

    /// Total number of registered converters
    pub fn len(&self) -> usize {
        self.converters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }
}
