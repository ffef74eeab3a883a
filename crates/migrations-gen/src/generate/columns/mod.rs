//! The column type mapper.
//!
//! Maps one raw column descriptor to one declarative column statement plus
//! its modifier chain. Dispatch is a tagged-variant mapping from raw-type
//! category to a pure handler function; adding support for a new type means
//! adding a [`ColumnFamily`] entry, not a new type hierarchy.

mod datetime;
mod misc;
mod numeric;
mod string;

use crate::config::GeneratorConfig;
use crate::error::{GenerateError, Result};
use crate::schema::{Column, ColumnDefault, Table};

use super::statement::{Modifier, Statement, Value};

/// Raw-type category driving handler dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnFamily {
    Boolean,
    Integer,
    Decimal,
    Float,
    Double,
    Char,
    Varchar,
    Text,
    Date,
    Time,
    DateTime,
    Timestamp,
    Year,
    Binary,
    Uuid,
    Json,
    Jsonb,
    IpAddress,
    MacAddress,
    Enum,
    Set,
    Spatial,
    /// Anything unrecognized: degrades to a raw-type passthrough.
    Fallback,
}

/// Classify a raw type name into its family.
///
/// Covers both MySQL names and PostgreSQL `udt_name`s. Drivers normalize
/// boolean-shaped types (`tinyint(1)`, `bit(1)`, `bool`) to "boolean"
/// before the mapper sees them.
pub fn classify(type_name: &str) -> ColumnFamily {
    match type_name {
        "boolean" | "bool" => ColumnFamily::Boolean,
        "tinyint" | "smallint" | "mediumint" | "int" | "integer" | "bigint" | "int2" | "int4"
        | "int8" => ColumnFamily::Integer,
        "decimal" | "numeric" => ColumnFamily::Decimal,
        "float" | "real" | "float4" => ColumnFamily::Float,
        "double" | "double precision" | "float8" => ColumnFamily::Double,
        "char" | "bpchar" | "nchar" => ColumnFamily::Char,
        "varchar" | "character varying" | "nvarchar" => ColumnFamily::Varchar,
        "tinytext" | "text" | "mediumtext" | "longtext" => ColumnFamily::Text,
        "date" => ColumnFamily::Date,
        "time" | "timetz" => ColumnFamily::Time,
        "datetime" => ColumnFamily::DateTime,
        "timestamp" | "timestamptz" => ColumnFamily::Timestamp,
        "year" => ColumnFamily::Year,
        "binary" | "varbinary" | "tinyblob" | "blob" | "mediumblob" | "longblob" | "bytea" => {
            ColumnFamily::Binary
        }
        "uuid" | "uniqueidentifier" => ColumnFamily::Uuid,
        "json" => ColumnFamily::Json,
        "jsonb" => ColumnFamily::Jsonb,
        "inet" => ColumnFamily::IpAddress,
        "macaddr" => ColumnFamily::MacAddress,
        "enum" => ColumnFamily::Enum,
        "set" => ColumnFamily::Set,
        "geometry" | "point" | "linestring" | "polygon" | "multipoint" | "multilinestring"
        | "multipolygon" | "geomcollection" | "geometrycollection" => ColumnFamily::Spatial,
        _ => ColumnFamily::Fallback,
    }
}

/// Map one column to its declarative statement.
///
/// Unknown raw types never abort generation: they fall back to a raw-type
/// passthrough carrying the original type string verbatim. Malformed
/// precision/scale (negative values) are a driver bug and fail fast.
pub fn generate(table: &Table, column: &Column, config: &GeneratorConfig) -> Result<Statement> {
    if column.precision < 0 || column.scale < 0 {
        return Err(GenerateError::invalid_column(
            &table.name,
            &column.name,
            format!(
                "negative precision/scale ({}, {})",
                column.precision, column.scale
            ),
        ));
    }

    let family = classify(&column.type_name);

    let stmt = match family {
        ColumnFamily::Boolean => numeric::boolean(column),
        ColumnFamily::Integer => numeric::integer(column),
        ColumnFamily::Decimal => numeric::fixed_point(column, "decimal"),
        ColumnFamily::Float => numeric::fixed_point(column, "float"),
        ColumnFamily::Double => numeric::fixed_point(column, "double"),
        ColumnFamily::Char => string::sized(column, "char"),
        ColumnFamily::Varchar => string::sized(column, "string"),
        ColumnFamily::Text => string::text(column),
        ColumnFamily::Date => datetime::plain(column, "date"),
        ColumnFamily::Time => datetime::fractional(column, "time", "timeTz"),
        ColumnFamily::DateTime => datetime::fractional(column, "dateTime", "dateTimeTz"),
        ColumnFamily::Timestamp => datetime::fractional(column, "timestamp", "timestampTz"),
        ColumnFamily::Year => datetime::plain(column, "year"),
        ColumnFamily::Binary => misc::bare(column, "binary"),
        ColumnFamily::Uuid => misc::bare(column, "uuid"),
        ColumnFamily::Json => misc::bare(column, "json"),
        ColumnFamily::Jsonb => misc::bare(column, "jsonb"),
        ColumnFamily::IpAddress => misc::bare(column, "ipAddress"),
        ColumnFamily::MacAddress => misc::bare(column, "macAddress"),
        ColumnFamily::Enum => string::members(column, "enum"),
        ColumnFamily::Set => string::members(column, "set"),
        ColumnFamily::Spatial => misc::spatial(column),
        ColumnFamily::Fallback => misc::fallback(column),
    };

    Ok(apply_modifiers(stmt, table, column, family, config))
}

/// Append the modifier chain in its fixed order: nullable, default value,
/// unsigned, auto-increment, collation, comment.
fn apply_modifiers(
    mut stmt: Statement,
    table: &Table,
    column: &Column,
    family: ColumnFamily,
    config: &GeneratorConfig,
) -> Statement {
    if column.nullable {
        stmt = stmt.chain(Modifier::bare("nullable"));
    }

    if !column.auto_increment {
        if let Some(default) = &column.default {
            stmt = stmt.chain(default_modifier(default, family));
        }
        if column.on_update_current && is_datetime_family(family) {
            stmt = stmt.chain(Modifier::bare("useCurrentOnUpdate"));
        }
    }

    if column.unsigned && family != ColumnFamily::Boolean {
        stmt = stmt.chain(Modifier::bare("unsigned"));
    }

    if column.auto_increment {
        stmt = stmt.chain(Modifier::bare("autoIncrement"));
    }

    if config.use_db_collation {
        if let Some(collation) = &column.collation {
            if Some(collation) != table.collation.as_ref() {
                stmt = stmt.chain(Modifier::with_arg("collation", Value::str(collation)));
            }
        }
    }

    if let Some(comment) = &column.comment {
        if !comment.is_empty() {
            stmt = stmt.chain(Modifier::with_arg("comment", Value::str(comment)));
        }
    }

    stmt
}

fn default_modifier(default: &ColumnDefault, family: ColumnFamily) -> Modifier {
    match default {
        ColumnDefault::Int(v) => {
            if family == ColumnFamily::Boolean {
                Modifier::with_arg("default", Value::Bool(*v != 0))
            } else {
                Modifier::with_arg("default", Value::Int(*v))
            }
        }
        ColumnDefault::Real(v) => Modifier::with_arg("default", Value::Float(*v)),
        ColumnDefault::Str(v) => Modifier::with_arg("default", Value::str(v)),
        ColumnDefault::Bool(v) => Modifier::with_arg("default", Value::Bool(*v)),
        ColumnDefault::Expression(expr) => {
            if is_datetime_family(family) && is_current_timestamp(expr) {
                Modifier::bare("useCurrent")
            } else {
                Modifier::with_arg("default", Value::Expression(expr.clone()))
            }
        }
    }
}

fn is_datetime_family(family: ColumnFamily) -> bool {
    matches!(family, ColumnFamily::DateTime | ColumnFamily::Timestamp)
}

fn is_current_timestamp(expr: &str) -> bool {
    let upper = expr.trim().to_uppercase();
    upper == "CURRENT_TIMESTAMP"
        || upper.starts_with("CURRENT_TIMESTAMP(")
        || upper == "NOW()"
}
