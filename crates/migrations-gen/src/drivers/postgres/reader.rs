//! PostgreSQL schema reader.
//!
//! Implements [`SchemaReader`] over `information_schema` and `pg_catalog`,
//! using deadpool-postgres for connection pooling. Identity and serial
//! columns both report as auto-increment; referential actions arrive as
//! single-character codes on `pg_constraint` and are decoded here.

use async_trait::async_trait;
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use tokio_postgres::Config as PgConfig;
use tracing::{debug, info};

use crate::config::ConnectionConfig;
use crate::error::{GenerateError, Result};
use crate::schema::{
    Column, ColumnDefault, ForeignKey, Index, IndexKind, SchemaReader, Table, View,
};

use super::tls::SslMode;

/// Introspection runs sequentially; a handful of connections covers it.
const POOL_SIZE: usize = 4;

/// PostgreSQL schema reader implementation.
pub struct PostgresSchemaReader {
    pool: Pool,
    schema: String,
}

impl PostgresSchemaReader {
    /// Create a new PostgreSQL reader from configuration.
    pub async fn new(config: &ConnectionConfig) -> Result<Self> {
        let mut pg_config = PgConfig::new();
        pg_config.host(&config.host);
        pg_config.port(config.effective_port());
        pg_config.dbname(&config.database);
        pg_config.user(&config.user);
        pg_config.password(&config.password);

        let mgr_config = ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        };

        let ssl_mode = SslMode::parse(&config.ssl_mode)?;
        let pool = match ssl_mode.connector()? {
            None => {
                let mgr = Manager::from_config(pg_config, tokio_postgres::NoTls, mgr_config);
                Pool::builder(mgr)
                    .max_size(POOL_SIZE)
                    .build()
                    .map_err(|e| GenerateError::pool(e, "creating PostgreSQL pool"))?
            }
            Some(tls) => {
                let mgr = Manager::from_config(pg_config, tls, mgr_config);
                Pool::builder(mgr)
                    .max_size(POOL_SIZE)
                    .build()
                    .map_err(|e| GenerateError::pool(e, "creating PostgreSQL pool"))?
            }
        };

        // Test connection
        let client = pool
            .get()
            .await
            .map_err(|e| GenerateError::pool(e, "testing PostgreSQL connection"))?;
        client.simple_query("SELECT 1").await?;

        info!(
            "Connected to PostgreSQL: {}:{}/{}",
            config.host,
            config.effective_port(),
            config.database
        );

        Ok(Self {
            pool,
            schema: config.effective_schema().to_string(),
        })
    }

    async fn client(&self, context: &str) -> Result<deadpool_postgres::Object> {
        self.pool
            .get()
            .await
            .map_err(|e| GenerateError::pool(e, format!("getting connection for {}", context)))
    }

    async fn load_columns(&self, table: &str) -> Result<Vec<Column>> {
        let client = self.client("load_columns").await?;

        let query = r#"
            SELECT
                c.column_name,
                c.udt_name,
                COALESCE(c.character_maximum_length, 0)::int4 AS max_length,
                COALESCE(c.numeric_precision, c.datetime_precision, 0)::int4 AS num_precision,
                COALESCE(c.numeric_scale, 0)::int4 AS num_scale,
                c.is_nullable = 'YES' AS is_nullable,
                c.column_default,
                COALESCE(c.is_identity = 'YES', false) AS is_identity,
                c.collation_name,
                COALESCE(
                    (SELECT d.description
                     FROM pg_catalog.pg_class cl
                     JOIN pg_catalog.pg_namespace ns ON ns.oid = cl.relnamespace
                     JOIN pg_catalog.pg_description d
                         ON d.objoid = cl.oid AND d.objsubid = c.ordinal_position
                     WHERE ns.nspname = c.table_schema AND cl.relname = c.table_name),
                    ''
                ) AS comment,
                c.ordinal_position::int4
            FROM information_schema.columns c
            WHERE c.table_schema = $1 AND c.table_name = $2
            ORDER BY c.ordinal_position
        "#;

        let rows = client.query(query, &[&self.schema, &table]).await?;

        let mut columns = Vec::with_capacity(rows.len());
        for row in rows {
            let type_name: String = row.get(1);
            let raw_default: Option<String> = row.get(6);
            let is_identity: bool = row.get(7);
            let comment: String = row.get(9);

            let is_serial = raw_default
                .as_deref()
                .is_some_and(|d| d.starts_with("nextval("));
            let (precision, scale) = effective_precision(
                &type_name,
                row.get::<_, i32>(3),
                row.get::<_, i32>(4),
            );

            columns.push(Column {
                name: row.get(0),
                nullable: row.get(5),
                default: if is_identity || is_serial {
                    None
                } else {
                    classify_default(raw_default.as_deref(), &type_name)
                },
                precision,
                scale,
                length: row.get(2),
                unsigned: false,
                auto_increment: is_identity || is_serial,
                on_update_current: false,
                collation: row.get(8),
                comment: if comment.is_empty() {
                    None
                } else {
                    Some(comment)
                },
                members: Vec::new(),
                ordinal: row.get(10),
                type_name,
            });
        }

        Ok(columns)
    }

    async fn load_indexes(&self, table: &str) -> Result<Vec<Index>> {
        let client = self.client("load_indexes").await?;

        let query = r#"
            SELECT
                i.relname AS index_name,
                ix.indisprimary,
                ix.indisunique,
                am.amname,
                array_agg(a.attname ORDER BY array_position(ix.indkey, a.attnum)) AS columns
            FROM pg_catalog.pg_index ix
            JOIN pg_catalog.pg_class i ON i.oid = ix.indexrelid
            JOIN pg_catalog.pg_class t ON t.oid = ix.indrelid
            JOIN pg_catalog.pg_namespace n ON n.oid = t.relnamespace
            JOIN pg_catalog.pg_am am ON am.oid = i.relam
            JOIN pg_catalog.pg_attribute a ON a.attrelid = t.oid AND a.attnum = ANY(ix.indkey)
            WHERE n.nspname = $1 AND t.relname = $2
            GROUP BY i.relname, ix.indisprimary, ix.indisunique, am.amname
            ORDER BY ix.indisprimary DESC, i.relname
        "#;

        let rows = client.query(query, &[&self.schema, &table]).await?;

        let mut indexes = Vec::with_capacity(rows.len());
        for row in rows {
            let is_primary: bool = row.get(1);
            let is_unique: bool = row.get(2);

            let kind = if is_primary {
                IndexKind::Primary
            } else if is_unique {
                IndexKind::Unique
            } else {
                IndexKind::Index
            };

            indexes.push(Index {
                name: row.get(0),
                kind,
                columns: row.get(4),
                algorithm: Some(row.get::<_, String>(3)),
            });
        }

        debug!("Loaded {} indexes for {}", indexes.len(), table);
        Ok(indexes)
    }

    async fn load_table_comment(&self, table: &str) -> Result<Option<String>> {
        let client = self.client("load_table_comment").await?;

        let query = r#"
            SELECT pg_catalog.obj_description(t.oid, 'pg_class')
            FROM pg_catalog.pg_class t
            JOIN pg_catalog.pg_namespace n ON n.oid = t.relnamespace
            WHERE n.nspname = $1 AND t.relname = $2
        "#;

        let row = client.query_one(query, &[&self.schema, &table]).await?;
        Ok(row.get(0))
    }
}

#[async_trait]
impl SchemaReader for PostgresSchemaReader {
    async fn get_table_names(&self) -> Result<Vec<String>> {
        let client = self.client("get_table_names").await?;

        let query = r#"
            SELECT table_name
            FROM information_schema.tables
            WHERE table_schema = $1 AND table_type = 'BASE TABLE'
            ORDER BY table_name
        "#;

        let rows = client.query(query, &[&self.schema]).await?;
        Ok(rows.iter().map(|r| r.get(0)).collect())
    }

    async fn get_view_names(&self) -> Result<Vec<String>> {
        let client = self.client("get_view_names").await?;

        let query = r#"
            SELECT table_name
            FROM information_schema.views
            WHERE table_schema = $1
            ORDER BY table_name
        "#;

        let rows = client.query(query, &[&self.schema]).await?;
        Ok(rows.iter().map(|r| r.get(0)).collect())
    }

    async fn get_table(&self, name: &str) -> Result<Table> {
        let columns = self.load_columns(name).await?;
        let indexes = self.load_indexes(name).await?;
        let comment = self.load_table_comment(name).await?;

        debug!("Loaded {} columns for {}", columns.len(), name);

        Ok(Table {
            name: name.to_string(),
            columns,
            indexes,
            // Collation is a database-level property in PostgreSQL.
            collation: None,
            comment,
        })
    }

    async fn get_views(&self) -> Result<Vec<View>> {
        let client = self.client("get_views").await?;

        let query = r#"
            SELECT table_name, COALESCE(view_definition, '')
            FROM information_schema.views
            WHERE table_schema = $1
            ORDER BY table_name
        "#;

        let rows = client.query(query, &[&self.schema]).await?;

        Ok(rows
            .iter()
            .map(|row| View {
                name: row.get(0),
                definition: row
                    .get::<_, String>(1)
                    .trim()
                    .trim_end_matches(';')
                    .to_string(),
            })
            .collect())
    }

    async fn get_table_foreign_keys(&self, table: &str) -> Result<Vec<ForeignKey>> {
        let client = self.client("get_table_foreign_keys").await?;

        let query = r#"
            SELECT
                c.conname AS fk_name,
                array_agg(a.attname ORDER BY array_position(c.conkey, a.attnum)) AS columns,
                rt.relname AS ref_table,
                array_agg(ra.attname ORDER BY array_position(c.confkey, ra.attnum)) AS ref_columns,
                c.confupdtype::text AS on_update,
                c.confdeltype::text AS on_delete
            FROM pg_catalog.pg_constraint c
            JOIN pg_catalog.pg_class t ON t.oid = c.conrelid
            JOIN pg_catalog.pg_namespace n ON n.oid = t.relnamespace
            JOIN pg_catalog.pg_class rt ON rt.oid = c.confrelid
            JOIN pg_catalog.pg_attribute a ON a.attrelid = t.oid AND a.attnum = ANY(c.conkey)
            JOIN pg_catalog.pg_attribute ra ON ra.attrelid = rt.oid AND ra.attnum = ANY(c.confkey)
            WHERE n.nspname = $1
              AND t.relname = $2
              AND c.contype = 'f'
            GROUP BY c.conname, rt.relname, c.confupdtype, c.confdeltype
            ORDER BY c.conname
        "#;

        let rows = client.query(query, &[&self.schema, &table]).await?;

        let mut fks = Vec::with_capacity(rows.len());
        for row in rows {
            fks.push(ForeignKey {
                name: row.get(0),
                columns: row.get(1),
                ref_table: row.get(2),
                ref_columns: row.get(3),
                on_update: decode_action(&row.get::<_, String>(4)),
                on_delete: decode_action(&row.get::<_, String>(5)),
            });
        }

        debug!("Loaded {} foreign keys for {}", fks.len(), table);
        Ok(fks)
    }

    fn db_type(&self) -> &str {
        "postgres"
    }

    async fn close(&self) {
        self.pool.close();
    }
}

/// Precision/scale as the mapper should see them.
///
/// `information_schema` reports storage precision for every numeric type
/// (32 for int4, 53 for float8); only `numeric` declarations carry user
/// intent. Fractional-seconds precision is kept for the time types.
fn effective_precision(type_name: &str, precision: i32, scale: i32) -> (i32, i32) {
    match type_name {
        "numeric" => (precision, scale),
        "time" | "timetz" | "timestamp" | "timestamptz" => (precision, 0),
        _ => (0, 0),
    }
}

/// Decode a `pg_constraint` referential action character.
fn decode_action(code: &str) -> Option<String> {
    let action = match code {
        "a" => "no action",
        "r" => "restrict",
        "c" => "cascade",
        "n" => "set null",
        "d" => "set default",
        _ => return None,
    };
    Some(action.to_string())
}

/// Classify a raw `column_default` expression.
///
/// PostgreSQL reports defaults with a cast suffix
/// (`'active'::character varying`, `0::smallint`); the suffix is
/// stripped before classification.
fn classify_default(raw: Option<&str>, type_name: &str) -> Option<ColumnDefault> {
    let raw = raw?.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("null") {
        return None;
    }

    let literal = strip_cast(raw);
    let upper = literal.to_uppercase();

    if upper.starts_with("CURRENT_TIMESTAMP") || upper == "NOW()" {
        return Some(ColumnDefault::Expression(literal.to_string()));
    }

    if let Some(inner) = literal
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
    {
        return Some(ColumnDefault::Str(inner.replace("''", "'")));
    }

    if type_name == "bool" {
        match upper.as_str() {
            "TRUE" => return Some(ColumnDefault::Bool(true)),
            "FALSE" => return Some(ColumnDefault::Bool(false)),
            _ => {}
        }
    }

    if let Ok(v) = literal.parse::<i64>() {
        return Some(ColumnDefault::Int(v));
    }
    if let Ok(v) = literal.parse::<f64>() {
        return Some(ColumnDefault::Real(v));
    }

    // Anything else is a database-evaluated expression.
    Some(ColumnDefault::Expression(literal.to_string()))
}

/// Strip a trailing `::type` cast, respecting quoted literals
/// (`'it''s'::text` keeps its embedded quotes).
fn strip_cast(raw: &str) -> &str {
    let mut in_quotes = false;
    let bytes = raw.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'\'' => in_quotes = !in_quotes,
            b':' if !in_quotes && bytes.get(i + 1) == Some(&b':') => {
                return raw[..i].trim();
            }
            _ => {}
        }
    }
    raw
}
