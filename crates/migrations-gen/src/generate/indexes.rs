//! The index/key mapper.
//!
//! Emits one declarative statement per index, in the order the driver
//! reports them, with the primary key first. Composite column order is
//! preserved exactly (leftmost-prefix matching makes it semantically
//! significant).

use crate::config::GeneratorConfig;
use crate::naming;
use crate::schema::{Index, IndexKind, Table};

use super::statement::{Statement, Value};

/// Map all indexes on a table.
///
/// A primary key over a single auto-increment column is suppressed
/// entirely: the column's own declaration already implies it.
pub fn generate(table: &Table, config: &GeneratorConfig) -> Vec<Statement> {
    let mut statements = Vec::with_capacity(table.indexes.len());

    let (primaries, others): (Vec<&Index>, Vec<&Index>) = table
        .indexes
        .iter()
        .partition(|i| i.kind == IndexKind::Primary);

    for index in primaries.into_iter().chain(others) {
        if is_implicit_primary(table, index) {
            continue;
        }
        statements.push(generate_one(table, index, config));
    }

    statements
}

fn generate_one(table: &Table, index: &Index, config: &GeneratorConfig) -> Statement {
    let mut stmt = Statement::new(index.kind.operation(), &index.name)
        .arg(Value::columns(&index.columns));

    if !naming::should_skip_index_name(config, &table.name, index) {
        stmt = stmt.arg(Value::str(&index.name));
    }

    stmt
}

fn is_implicit_primary(table: &Table, index: &Index) -> bool {
    index.kind == IndexKind::Primary
        && index.columns.len() == 1
        && table
            .column(&index.columns[0])
            .is_some_and(|c| c.auto_increment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Column;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn index(name: &str, kind: IndexKind, columns: &[&str]) -> Index {
        Index {
            name: name.to_string(),
            kind,
            columns: cols(columns),
            algorithm: None,
        }
    }

    fn table(columns: Vec<Column>, indexes: Vec<Index>) -> Table {
        Table {
            name: "posts".to_string(),
            columns,
            indexes,
            collation: None,
            comment: None,
        }
    }

    #[test]
    fn test_primary_emitted_without_name() {
        let t = table(
            vec![Column::new("id", "int")],
            vec![index("PRIMARY", IndexKind::Primary, &["id"])],
        );
        let stmts = generate(&t, &GeneratorConfig::default());
        assert_eq!(stmts.len(), 1);
        assert_eq!(stmts[0].operation, "primary");
        // Primary keys are never explicitly named.
        assert_eq!(stmts[0].args, vec![Value::str("id")]);
    }

    #[test]
    fn test_implicit_primary_suppressed() {
        let mut id = Column::new("id", "bigint");
        id.auto_increment = true;
        let t = table(vec![id], vec![index("PRIMARY", IndexKind::Primary, &["id"])]);
        assert!(generate(&t, &GeneratorConfig::default()).is_empty());
    }

    #[test]
    fn test_primary_first_then_driver_order() {
        let t = table(
            vec![Column::new("id", "int"), Column::new("slug", "varchar")],
            vec![
                index("posts_slug_unique", IndexKind::Unique, &["slug"]),
                index("PRIMARY", IndexKind::Primary, &["id"]),
                index("posts_author_id_index", IndexKind::Index, &["author_id"]),
            ],
        );
        let stmts = generate(&t, &GeneratorConfig::default());
        let ops: Vec<&str> = stmts.iter().map(|s| s.operation.as_str()).collect();
        assert_eq!(ops, vec!["primary", "unique", "index"]);
    }

    #[test]
    fn test_default_name_skipped_custom_name_kept() {
        let t = table(
            vec![],
            vec![
                index("posts_slug_unique", IndexKind::Unique, &["slug"]),
                index("custom_idx", IndexKind::Unique, &["slug"]),
            ],
        );
        let stmts = generate(&t, &GeneratorConfig::default());

        assert_eq!(stmts[0].args, vec![Value::str("slug")]);
        assert_eq!(
            stmts[1].args,
            vec![Value::str("slug"), Value::str("custom_idx")]
        );
    }

    #[test]
    fn test_composite_order_preserved() {
        let t = table(
            vec![],
            vec![index("custom", IndexKind::Index, &["a", "b"])],
        );
        let stmts = generate(&t, &GeneratorConfig::default());
        assert_eq!(
            stmts[0].args[0],
            Value::Array(vec![Value::str("a"), Value::str("b")])
        );
    }

    #[test]
    fn test_fulltext_and_spatial_operations() {
        let t = table(
            vec![],
            vec![
                index("posts_body_fulltext", IndexKind::Fulltext, &["body"]),
                index("posts_location_spatialindex", IndexKind::Spatial, &["location"]),
            ],
        );
        let stmts = generate(&t, &GeneratorConfig::default());
        assert_eq!(stmts[0].operation, "fullText");
        assert_eq!(stmts[1].operation, "spatialIndex");
        // Both names match the default convention and are skipped.
        assert_eq!(stmts[0].args.len(), 1);
        assert_eq!(stmts[1].args.len(), 1);
    }
}
