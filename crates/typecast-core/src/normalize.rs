//! Target type normalization
//!
//! Maps a column's free-form declared type onto a [`TargetType`] by
//! case-insensitive substring matching. The order of the checks is part of
//! the contract: `DATE` is tested before `TIME`/`TIMESTAMP`, so a declaration
//! such as `DATETIME` normalizes to `DATE`.

use crate::types::TargetType;

const STRING_MARKERS: &[&str] = &["VARCHAR", "TEXT", "CHAR"];
const INTEGER_MARKERS: &[&str] = &["INT", "BIGINT", "SMALLINT"];
const FLOAT_MARKERS: &[&str] = &["DECIMAL", "NUMERIC", "FLOAT", "DOUBLE"];
const BOOLEAN_MARKERS: &[&str] = &["BOOLEAN", "BIT"];
const DATE_MARKERS: &[&str] = &["DATE"];
const DATETIME_MARKERS: &[&str] = &["TIME", "TIMESTAMP"];
const UUID_MARKERS: &[&str] = &["UUID"];
const JSON_MARKERS: &[&str] = &["JSON"];

/// Normalize a declared column type. Total: unknown declarations are `STRING`.
pub fn normalize(declared_type: &str) -> TargetType {
    let upper = declared_type.to_uppercase();
    let contains_any = |markers: &[&str]| markers.iter().any(|m| upper.contains(m));

    if contains_any(STRING_MARKERS) {
        TargetType::String
    } else if contains_any(INTEGER_MARKERS) {
        TargetType::Integer
    } else if contains_any(FLOAT_MARKERS) {
        TargetType::Float
    } else if contains_any(BOOLEAN_MARKERS) {
        TargetType::Boolean
    } else if contains_any(DATE_MARKERS) {
        TargetType::Date
    } else if contains_any(DATETIME_MARKERS) {
        TargetType::DateTime
    } else if contains_any(UUID_MARKERS) {
        TargetType::Uuid
    } else if contains_any(JSON_MARKERS) {
        TargetType::Json
    } else {
        TargetType::String
    }
}

/// Integer subtype of a declared type, used by range validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegerWidth {
    Small,
    Regular,
    Big,
}

impl IntegerWidth {
    pub fn of(declared_type: &str) -> Self {
        let upper = declared_type.to_uppercase();
        if upper.contains("SMALLINT") {
            IntegerWidth::Small
        } else if upper.contains("BIGINT") {
            IntegerWidth::Big
        } else {
            IntegerWidth::Regular
        }
    }

    pub fn bounds(&self) -> (i64, i64) {
        match self {
            IntegerWidth::Small => (i16::MIN as i64, i16::MAX as i64),
            IntegerWidth::Regular => (i32::MIN as i64, i32::MAX as i64),
            IntegerWidth::Big => (i64::MIN, i64::MAX),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            IntegerWidth::Small => "SMALLINT",
            IntegerWidth::Regular => "INTEGER",
            IntegerWidth::Big => "BIGINT",
        }
    }
}

/// Declared maximum length of a `VARCHAR(n)`/`CHAR(n)` column
pub fn declared_length(declared_type: &str) -> Option<usize> {
    let upper = declared_type.to_uppercase();
    if !upper.contains("CHAR") {
        return None;
    }
    let open = upper.find('(')?;
    let close = upper[open..].find(')')? + open;
    upper[open + 1..close].trim().parse().ok()
}
