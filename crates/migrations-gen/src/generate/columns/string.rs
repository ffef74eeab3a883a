//! Character, text and enumeration column handlers.

use crate::generate::statement::{Statement, Value};
use crate::schema::Column;

// Length the target DSL uses when a string/char column is declared
// without one.
const DEFAULT_LENGTH: i32 = 255;

/// Map a char/varchar column, omitting the length when the DSL would
/// infer it. A length of 0 means the driver reported none; -1 marks
/// unbounded types and also renders bare.
pub fn sized(column: &Column, operation: &str) -> Statement {
    let mut stmt = Statement::new(operation, &column.name).arg(Value::str(&column.name));
    if column.length > 0 && column.length != DEFAULT_LENGTH {
        stmt = stmt.arg(Value::Int(column.length as i64));
    }
    stmt
}

/// Map a text-family column to its size-specific operation.
pub fn text(column: &Column) -> Statement {
    let operation = match column.type_name.as_str() {
        "tinytext" => "tinyText",
        "mediumtext" => "mediumText",
        "longtext" => "longText",
        _ => "text",
    };

    Statement::new(operation, &column.name).arg(Value::str(&column.name))
}

/// Map an enum/set column; the member values become an array argument.
pub fn members(column: &Column, operation: &str) -> Statement {
    Statement::new(operation, &column.name)
        .arg(Value::str(&column.name))
        .arg(Value::str_array(&column.members))
}
