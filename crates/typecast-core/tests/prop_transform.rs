//! Property-based tests for the transformation engine
//!
//! These tests verify invariants that should hold for all inputs to the
//! pipeline.


use proptest::prelude::*;
use test_support::{context, pg_column};
use typecast_core::converter::Converter;
use typecast_core::detect::detect;
use typecast_core::{Dialect, Error, SourceType, TargetType, TransformationEngine, Value};

/// Strategy for generating dialects, including an unrecognized one
fn dialect_strategy() -> impl Strategy<Value = Dialect> {
    prop_oneof![
        Just(Dialect::PostgreSql),
        Just(Dialect::MySql),
        Just(Dialect::Sqlite),
        Just(Dialect::SqlServer),
        Just(Dialect::Generic),
    ]
}

/// Strategy for generating declared column types
fn declared_type_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("INTEGER"),
        Just("SMALLINT"),
        Just("BIGINT"),
        Just("VARCHAR(32)"),
        Just("TEXT"),
        Just("DECIMAL(10,2)"),
        Just("BOOLEAN"),
        Just("DATE"),
        Just("TIMESTAMP"),
        Just("UUID"),
        Just("JSONB"),
    ]
}

/// Strategy for generating loosely-typed input values
fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Integer),
        (-1.0e9f64..1.0e9).prop_map(Value::Float),
        "[a-zA-Z0-9 @.:/-]{0,24}".prop_map(Value::String),
        (0i64..100_000).prop_map(|n| Value::String(n.to_string())),
        Just(Value::from(serde_json::json!({"k": [1, 2]}))),
    ]
}

proptest! {
    #[test]
    fn prop_confidence_stays_in_unit_interval(
        value in value_strategy(),
        declared in declared_type_strategy(),
        nullable in any::<bool>(),
        dialect in dialect_strategy(),
    ) {
        let engine = TransformationEngine::new();
        if let Ok(result) = engine.transform(&value, &context("col", declared, nullable, dialect)) {
            prop_assert!((0.0..=1.0).contains(&result.confidence));
        }
    }

    #[test]
    fn prop_only_value_failures_abort(
        value in value_strategy(),
        declared in declared_type_strategy(),
        dialect in dialect_strategy(),
    ) {
        let engine = TransformationEngine::new();
        if let Err(e) = engine.transform(&value, &context("col", declared, true, dialect)) {
            prop_assert!(e.is_value_failure());
        }
    }

    #[test]
    fn prop_result_carries_selected_converter_confidence(value in "[0-9]{1,6}", weight in 0.0f64..=1.0) {
        let engine = TransformationEngine::new();
        engine
            .add_type_converter(
                SourceType::String,
                TargetType::Float,
                Converter::new(weight, |v, _| Ok(Value::Float(v.to_plain_string().len() as f64))),
            )
            .unwrap();

        let result = engine.transform(&Value::String(value), &pg_column("amount", "FLOAT")).unwrap();
        // competes with the built-in STRING_TO_FLOAT at 0.9
        prop_assert_eq!(result.confidence, weight.max(0.9));
    }

    #[test]
    fn prop_generated_uuids_pass_untouched(dialect in dialect_strategy()) {
        let id = uuid::Uuid::new_v4().to_string();
        prop_assert_eq!(detect(&Value::from(id.as_str())), SourceType::Uuid);

        let engine = TransformationEngine::new();
        let result = engine.transform(&Value::from(id.as_str()), &context("id", "UUID", false, dialect)).unwrap();
        prop_assert_eq!(result.value, Value::from(id.as_str()));
        prop_assert!(result.transformations.is_empty());
        prop_assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn prop_smallint_range(n in -100_000i64..100_000) {
        let engine = TransformationEngine::new();
        let outcome = engine.transform(&Value::Integer(n), &pg_column("age", "SMALLINT"));
        let in_range = (-32768..=32767).contains(&n);
        match outcome {
            Ok(result) => {
                prop_assert!(in_range);
                prop_assert_eq!(result.value, Value::Integer(n));
            }
            Err(Error::Validation { .. }) => prop_assert!(!in_range),
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }

    #[test]
    fn prop_highest_confidence_converter_wins(low in 0.0f64..0.5, high in 0.5f64..=1.0) {
        let engine = TransformationEngine::empty();
        engine
            .add_type_converter(SourceType::Boolean, TargetType::Float, Converter::new(low, |_, _| Ok(Value::Float(1.0))))
            .unwrap();
        engine
            .add_type_converter(SourceType::Boolean, TargetType::Float, Converter::new(high, |_, _| Ok(Value::Float(2.0))))
            .unwrap();

        let result = engine.transform(&Value::Bool(true), &pg_column("score", "DOUBLE")).unwrap();
        prop_assert_eq!(result.value, Value::Float(2.0));
        prop_assert_eq!(result.confidence, high);
    }
}
