//! The statement assembler.
//!
//! Composes mapper output into per-artifact blocks: one block per table,
//! per view, or per foreign-key set. The assembler is output-mode agnostic;
//! whether blocks become individual files or are buffered into one squashed
//! artifact is the writer's concern.

use std::collections::HashSet;

use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::schema::{ForeignKey, Table, View};

use super::statement::Statement;
use super::{columns, foreign_keys, indexes};

/// One generated migration block.
#[derive(Debug, Clone, PartialEq)]
pub enum Artifact {
    Table(TableArtifact),
    View(ViewArtifact),
    ForeignKeys(ForeignKeyArtifact),
}

impl Artifact {
    /// The table/view name this artifact is generated for.
    pub fn name(&self) -> &str {
        match self {
            Artifact::Table(a) => &a.name,
            Artifact::View(a) => &a.name,
            Artifact::ForeignKeys(a) => &a.table,
        }
    }

    /// Number of data-integrity warnings attached to the statements.
    pub fn warning_count(&self) -> usize {
        let stmts: &[Statement] = match self {
            Artifact::Table(a) => &a.statements,
            Artifact::View(_) => return 0,
            Artifact::ForeignKeys(a) => &a.up,
        };
        stmts.iter().filter(|s| s.warning.is_some()).count()
    }
}

/// A create-table block. The down body is an implicit drop-if-exists.
#[derive(Debug, Clone, PartialEq)]
pub struct TableArtifact {
    /// Table name.
    pub name: String,
    /// Table charset, derived from the collation, when collation output
    /// is enabled.
    pub charset: Option<String>,
    /// Table collation, when collation output is enabled.
    pub collation: Option<String>,
    /// Column statements in ordinal order, then index statements
    /// (primary key first).
    pub statements: Vec<Statement>,
}

/// A create-view block carrying raw SQL for both directions.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewArtifact {
    /// View name.
    pub name: String,
    /// CREATE VIEW statement.
    pub create_sql: String,
    /// DROP VIEW statement for the down body.
    pub drop_sql: String,
}

/// A foreign-key block for one table, applied after all tables exist.
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKeyArtifact {
    /// Owning table name.
    pub table: String,
    /// Constraint statements for the up body.
    pub up: Vec<Statement>,
    /// Drop statements for the down body.
    pub down: Vec<Statement>,
}

/// Assemble the create-table block for one table snapshot.
pub fn table_artifact(table: &Table, config: &GeneratorConfig) -> Result<Artifact> {
    let mut statements = Vec::with_capacity(table.columns.len() + table.indexes.len());

    let mut ordered: Vec<_> = table.columns.iter().collect();
    ordered.sort_by_key(|c| c.ordinal);
    for column in ordered {
        statements.push(columns::generate(table, column, config)?);
    }

    statements.extend(indexes::generate(table, config));

    let collation = if config.use_db_collation {
        table.collation.clone()
    } else {
        None
    };
    let charset = collation.as_deref().map(charset_of);

    Ok(Artifact::Table(TableArtifact {
        name: table.name.clone(),
        charset,
        collation,
        statements,
    }))
}

/// Assemble the block for one view.
pub fn view_artifact(view: &View) -> Artifact {
    Artifact::View(ViewArtifact {
        name: view.name.clone(),
        create_sql: format!("CREATE VIEW {} AS {}", view.name, view.definition),
        drop_sql: format!("DROP VIEW IF EXISTS {}", view.name),
    })
}

/// Assemble the foreign-key block for one table. Returns None when the
/// table declares no foreign keys (no artifact is written for it).
pub fn foreign_key_artifact(
    table: &str,
    fks: &[ForeignKey],
    known_tables: &HashSet<String>,
    config: &GeneratorConfig,
) -> Option<Artifact> {
    if fks.is_empty() {
        return None;
    }

    let (up, down) = foreign_keys::generate(table, fks, known_tables, config);
    Some(Artifact::ForeignKeys(ForeignKeyArtifact {
        table: table.to_string(),
        up,
        down,
    }))
}

/// Charset prefix of a collation name ("utf8mb4_unicode_ci" → "utf8mb4").
fn charset_of(collation: &str) -> String {
    collation
        .split('_')
        .next()
        .unwrap_or(collation)
        .to_string()
}
