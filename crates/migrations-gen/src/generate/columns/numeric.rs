//! Integer, boolean and fixed-point column handlers.

use crate::generate::statement::{Statement, Value};
use crate::schema::Column;

// The target DSL infers (8, 2) when a decimal/float column is declared
// without arguments.
const DEFAULT_PRECISION: i32 = 8;
const DEFAULT_SCALE: i32 = 2;

const EMPTY_PRECISION: i32 = 0;
const EMPTY_SCALE: i32 = 0;

/// Map an integer column to its size-specific operation.
pub fn integer(column: &Column) -> Statement {
    let operation = match column.type_name.as_str() {
        "tinyint" => "tinyInteger",
        "smallint" | "int2" => "smallInteger",
        "mediumint" => "mediumInteger",
        "bigint" | "int8" => "bigInteger",
        _ => "integer",
    };

    Statement::new(operation, &column.name).arg(Value::str(&column.name))
}

/// Map a boolean column.
pub fn boolean(column: &Column) -> Statement {
    Statement::new("boolean", &column.name).arg(Value::str(&column.name))
}

/// Map a decimal/float/double column, applying the precision policy.
pub fn fixed_point(column: &Column, operation: &str) -> Statement {
    let mut stmt = Statement::new(operation, &column.name).arg(Value::str(&column.name));
    for p in get_precisions(column) {
        stmt = stmt.arg(Value::Int(p as i64));
    }
    stmt
}

/// Precision and scale arguments for the fixed-point families.
///
/// Returns empty if both are 0 (bare declaration), and also if they equal
/// the DSL's implicit default (8, 2) — omitting what would be inferred
/// anyway. When only the scale matches the default, the precision alone
/// is emitted.
pub fn get_precisions(column: &Column) -> Vec<i32> {
    if column.precision == EMPTY_PRECISION && column.scale == EMPTY_SCALE {
        return vec![];
    }

    if column.precision == DEFAULT_PRECISION && column.scale == DEFAULT_SCALE {
        return vec![];
    }

    if column.scale == DEFAULT_SCALE {
        return vec![column.precision];
    }

    vec![column.precision, column.scale]
}
