//! Destination-dialect formatting of temporal and boolean values
//!
//! Runs last, after conversion and custom hooks. Every other value passes
//! through untouched.

use crate::temporal::{to_iso_instant, to_space_separated};
use crate::types::Dialect;
use crate::value::Value;

pub fn format(value: Value, dialect: Dialect) -> Value {
    match value {
        Value::DateTime(dt) => Value::String(match dialect {
            Dialect::MySql => to_space_separated(&dt),
            Dialect::PostgreSql | Dialect::Sqlite | Dialect::SqlServer | Dialect::Generic => {
                to_iso_instant(&dt)
            }
        }),
        Value::Bool(b) => match dialect {
            Dialect::PostgreSql => Value::Bool(b),
            Dialect::MySql | Dialect::Sqlite | Dialect::SqlServer | Dialect::Generic => {
                Value::Integer(i64::from(b))
            }
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn midnight() -> Value {
        Value::DateTime(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
    }

    #[test]
    fn test_mysql_space_separated() {
        assert_eq!(format(midnight(), Dialect::MySql), Value::from("2024-01-01 00:00:00"));
    }

    #[test]
    fn test_mysql_drops_fraction_and_zone() {
        let dt = Utc.with_ymd_and_hms(2024, 6, 30, 23, 59, 58).unwrap()
            + chrono::Duration::milliseconds(250);
        assert_eq!(format(Value::DateTime(dt), Dialect::MySql), Value::from("2024-06-30 23:59:58"));
    }

    #[test]
    fn test_iso_instant_for_other_dialects() {
        for dialect in [Dialect::PostgreSql, Dialect::Sqlite, Dialect::SqlServer, Dialect::Generic] {
            assert_eq!(format(midnight(), dialect), Value::from("2024-01-01T00:00:00.000Z"));
        }
    }

    #[test]
    fn test_booleans() {
        assert_eq!(format(Value::Bool(true), Dialect::PostgreSql), Value::Bool(true));
        assert_eq!(format(Value::Bool(true), Dialect::MySql), Value::Integer(1));
        assert_eq!(format(Value::Bool(false), Dialect::Sqlite), Value::Integer(0));
        assert_eq!(format(Value::Bool(false), Dialect::Generic), Value::Integer(0));
    }

    #[test]
    fn test_other_values_untouched() {
        assert_eq!(format(Value::Integer(5), Dialect::MySql), Value::Integer(5));
        assert_eq!(format(Value::from("true"), Dialect::MySql), Value::from("true"));
    }
}
