//! The schema introspection boundary.
//!
//! [`SchemaReader`] is the seam between the database drivers and the mapping
//! engine: drivers answer these five queries from their system catalogs, and
//! everything downstream operates on the returned snapshots without knowing
//! which engine produced them.

use async_trait::async_trait;

use crate::error::Result;

use super::models::{ForeignKey, Table, View};

/// Read schema metadata from a source database.
///
/// Implementations exist per database engine (MySQL/MariaDB, PostgreSQL).
/// All methods take `&self`; connections are pooled internally.
///
/// Any error returned here is fatal for the whole run: generation never
/// produces partial output from a broken snapshot.
#[async_trait]
pub trait SchemaReader: Send + Sync {
    /// List base table names in the configured schema/database.
    async fn get_table_names(&self) -> Result<Vec<String>>;

    /// List view names in the configured schema/database.
    async fn get_view_names(&self) -> Result<Vec<String>>;

    /// Load the full snapshot for one table: columns in ordinal order,
    /// indexes in driver order, table collation.
    async fn get_table(&self, name: &str) -> Result<Table>;

    /// Load all views with their defining query text.
    async fn get_views(&self) -> Result<Vec<View>>;

    /// Load the foreign keys declared on one table.
    async fn get_table_foreign_keys(&self, table: &str) -> Result<Vec<ForeignKey>>;

    /// Get the database type identifier (e.g. "mysql", "postgres").
    fn db_type(&self) -> &str;

    /// Close the connection pool.
    async fn close(&self);
}
