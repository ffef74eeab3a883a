//! Database drivers: concrete [`SchemaReader`] implementations.

pub mod mysql;
pub mod postgres;

pub use mysql::MysqlSchemaReader;
pub use postgres::PostgresSchemaReader;

use std::sync::Arc;

use crate::config::ConnectionConfig;
use crate::error::Result;
use crate::schema::SchemaReader;

/// Create a schema reader for the configured database type.
pub async fn create_reader(config: &ConnectionConfig) -> Result<Arc<dyn SchemaReader>> {
    match config.normalized_type()? {
        "mysql" => Ok(Arc::new(MysqlSchemaReader::new(config).await?)),
        "postgres" => Ok(Arc::new(PostgresSchemaReader::new(config).await?)),
        _ => unreachable!(), // normalized_type rejects everything else
    }
}
