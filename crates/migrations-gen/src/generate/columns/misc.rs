//! Binary, structured and spatial column handlers, plus the raw-type
//! passthrough fallback.

use crate::generate::statement::{Statement, Value};
use crate::schema::Column;

/// Map a column whose operation takes only the column name.
pub fn bare(column: &Column, operation: &str) -> Statement {
    Statement::new(operation, &column.name).arg(Value::str(&column.name))
}

/// Map a spatial column to its geometry-specific operation.
pub fn spatial(column: &Column) -> Statement {
    let operation = match column.type_name.as_str() {
        "point" => "point",
        "linestring" => "lineString",
        "polygon" => "polygon",
        "multipoint" => "multiPoint",
        "multilinestring" => "multiLineString",
        "multipolygon" => "multiPolygon",
        "geomcollection" | "geometrycollection" => "geometryCollection",
        _ => "geometry",
    };

    Statement::new(operation, &column.name).arg(Value::str(&column.name))
}

/// Raw-type passthrough for vendor types the DSL has no operation for.
/// Carries the original type string verbatim so the statement stays
/// syntactically valid even if semantically opaque.
pub fn fallback(column: &Column) -> Statement {
    Statement::new("addColumn", &column.name)
        .arg(Value::str(&column.type_name))
        .arg(Value::str(&column.name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spatial_operations() {
        assert_eq!(spatial(&Column::new("g", "geometry")).operation, "geometry");
        assert_eq!(spatial(&Column::new("g", "linestring")).operation, "lineString");
        assert_eq!(
            spatial(&Column::new("g", "geometrycollection")).operation,
            "geometryCollection"
        );
    }

    #[test]
    fn test_fallback_preserves_raw_type() {
        let stmt = fallback(&Column::new("shape", "geometry_custom_vendor"));
        assert_eq!(stmt.operation, "addColumn");
        assert_eq!(
            stmt.args,
            vec![Value::str("geometry_custom_vendor"), Value::str("shape")]
        );
    }
}
