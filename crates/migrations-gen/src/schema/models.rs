//! Schema metadata types for database tables, columns, indexes and constraints.
//!
//! These types are a database-agnostic snapshot of one schema at generation
//! time. Drivers construct them once from system-catalog queries; the mapping
//! engine consumes them read-only.

use serde::{Deserialize, Serialize};

/// Table metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    /// Table name.
    pub name: String,

    /// Column definitions, in ordinal order.
    pub columns: Vec<Column>,

    /// Index definitions, in the order the driver reports them.
    pub indexes: Vec<Index>,

    /// Table default collation, if the driver reports one.
    pub collation: Option<String>,

    /// Table comment, if any.
    pub comment: Option<String>,
}

impl Table {
    /// Check if the table contains a column with the given name.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// Find a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Find the primary key index, if the table has one.
    pub fn primary_index(&self) -> Option<&Index> {
        self.indexes.iter().find(|i| i.kind == IndexKind::Primary)
    }
}

/// A column default value, classified by the driver.
///
/// Numeric defaults keep their native representation so the generated
/// migration does not quote them; `Expression` covers anything the database
/// evaluates at insert time (`CURRENT_TIMESTAMP`, generated defaults).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnDefault {
    /// Integer literal default.
    Int(i64),
    /// Floating point literal default.
    Real(f64),
    /// String literal default.
    Str(String),
    /// Boolean literal default.
    Bool(bool),
    /// Database-evaluated expression, kept verbatim.
    Expression(String),
}

/// Column metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    /// Column name.
    pub name: String,

    /// Raw type name as reported by the driver, lowercase
    /// (e.g. "varchar", "int4", "decimal").
    pub type_name: String,

    /// Whether the column allows NULL.
    pub nullable: bool,

    /// Default value, if any.
    pub default: Option<ColumnDefault>,

    /// Numeric precision. 0 when the driver reports none.
    pub precision: i32,

    /// Numeric scale. 0 when the driver reports none.
    pub scale: i32,

    /// Maximum character length. 0 when absent, -1 for unbounded types.
    pub length: i32,

    /// Whether the column is unsigned (MySQL).
    pub unsigned: bool,

    /// Whether the column auto-increments (identity/serial).
    pub auto_increment: bool,

    /// Whether the column updates to CURRENT_TIMESTAMP on row update (MySQL).
    pub on_update_current: bool,

    /// Column collation, if the driver reports one.
    pub collation: Option<String>,

    /// Column comment. Empty comments are reported as None.
    pub comment: Option<String>,

    /// Member values for enum/set columns (MySQL).
    pub members: Vec<String>,

    /// Ordinal position (1-based).
    pub ordinal: i32,
}

impl Column {
    /// Minimal column for tests and defaults; real columns come from drivers.
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            nullable: false,
            default: None,
            precision: 0,
            scale: 0,
            length: 0,
            unsigned: false,
            auto_increment: false,
            on_update_current: false,
            collation: None,
            comment: None,
            members: Vec::new(),
            ordinal: 1,
        }
    }
}

/// Index classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexKind {
    /// Primary key.
    Primary,
    /// Unique index.
    Unique,
    /// Plain (non-unique) index.
    Index,
    /// Full-text index.
    Fulltext,
    /// Spatial index.
    Spatial,
}

impl IndexKind {
    /// The suffix the target DSL appends when auto-naming an index of this
    /// kind (`users_email_unique`, `posts_body_fulltext`, ...).
    pub fn type_tag(&self) -> &'static str {
        match self {
            IndexKind::Primary => "primary",
            IndexKind::Unique => "unique",
            IndexKind::Index => "index",
            IndexKind::Fulltext => "fulltext",
            IndexKind::Spatial => "spatialindex",
        }
    }

    /// The declarative operation used to create an index of this kind.
    pub fn operation(&self) -> &'static str {
        match self {
            IndexKind::Primary => "primary",
            IndexKind::Unique => "unique",
            IndexKind::Index => "index",
            IndexKind::Fulltext => "fullText",
            IndexKind::Spatial => "spatialIndex",
        }
    }
}

/// Index metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Index {
    /// Index name as stored in the database.
    pub name: String,

    /// Index classification.
    pub kind: IndexKind,

    /// Indexed column names. Order is semantically significant for
    /// composite indexes (leftmost-prefix matching) and must be preserved.
    pub columns: Vec<String>,

    /// Index algorithm (btree, hash, ...), if the driver reports one.
    pub algorithm: Option<String>,
}

/// Foreign key metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForeignKey {
    /// Constraint name.
    pub name: String,

    /// Local column names.
    pub columns: Vec<String>,

    /// Referenced table name.
    pub ref_table: String,

    /// Referenced column names.
    pub ref_columns: Vec<String>,

    /// ON UPDATE action, lowercase ("cascade", "set null", ...), if any.
    pub on_update: Option<String>,

    /// ON DELETE action, lowercase, if any.
    pub on_delete: Option<String>,
}

/// View metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct View {
    /// View name.
    pub name: String,

    /// Defining query text (the SELECT body, without CREATE VIEW).
    pub definition: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_table() -> Table {
        Table {
            name: "users".to_string(),
            columns: vec![Column::new("id", "int"), Column::new("email", "varchar")],
            indexes: vec![Index {
                name: "PRIMARY".to_string(),
                kind: IndexKind::Primary,
                columns: vec!["id".to_string()],
                algorithm: None,
            }],
            collation: None,
            comment: None,
        }
    }

    #[test]
    fn test_table_lookup() {
        let table = make_test_table();
        assert!(table.has_column("email"));
        assert!(!table.has_column("missing"));
        assert_eq!(table.column("id").unwrap().type_name, "int");
    }

    #[test]
    fn test_primary_index() {
        let table = make_test_table();
        let pk = table.primary_index().unwrap();
        assert_eq!(pk.columns, vec!["id"]);
    }

    #[test]
    fn test_index_kind_tags() {
        assert_eq!(IndexKind::Primary.type_tag(), "primary");
        assert_eq!(IndexKind::Unique.type_tag(), "unique");
        assert_eq!(IndexKind::Fulltext.type_tag(), "fulltext");
        assert_eq!(IndexKind::Spatial.type_tag(), "spatialindex");
        assert_eq!(IndexKind::Spatial.operation(), "spatialIndex");
        assert_eq!(IndexKind::Fulltext.operation(), "fullText");
    }
}
