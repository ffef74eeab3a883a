//! Date and time column handlers.

use crate::generate::statement::{Statement, Value};
use crate::schema::Column;

/// Map a date/year column (no precision argument).
pub fn plain(column: &Column, operation: &str) -> Statement {
    Statement::new(operation, &column.name).arg(Value::str(&column.name))
}

/// Map a time/datetime/timestamp column. Timezone-aware variants
/// ("timetz", "timestamptz") pick the `tz_operation`; a non-zero
/// fractional-seconds precision becomes an argument.
pub fn fractional(column: &Column, operation: &str, tz_operation: &str) -> Statement {
    let operation = if column.type_name.ends_with("tz") {
        tz_operation
    } else {
        operation
    };

    let mut stmt = Statement::new(operation, &column.name).arg(Value::str(&column.name));
    if column.precision > 0 {
        stmt = stmt.arg(Value::Int(column.precision as i64));
    }
    stmt
}
