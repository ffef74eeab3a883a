//! MySQL/MariaDB schema reader.
//!
//! Implements [`SchemaReader`] over `information_schema`. Uses SQLx for
//! connection pooling and async query execution. `COLUMN_TYPE` carries
//! what `DATA_TYPE` drops: the display width that marks `tinyint(1)` as
//! a boolean, the `unsigned` attribute and enum/set member lists.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::Row;
use tracing::{debug, info};

use crate::config::ConnectionConfig;
use crate::error::{GenerateError, Result};
use crate::schema::{
    Column, ColumnDefault, ForeignKey, Index, IndexKind, SchemaReader, Table, View,
};

/// Connection pool timeout.
const POOL_CONNECTION_TIMEOUT: Duration = Duration::from_secs(30);

/// Introspection runs sequentially; a handful of connections covers it.
const POOL_SIZE: u32 = 4;

/// MySQL/MariaDB schema reader implementation.
pub struct MysqlSchemaReader {
    pool: MySqlPool,
    database: String,
}

impl MysqlSchemaReader {
    /// Create a new MySQL reader from configuration.
    pub async fn new(config: &ConnectionConfig) -> Result<Self> {
        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.effective_port())
            .database(&config.database)
            .username(&config.user)
            .password(&config.password);

        let pool = MySqlPoolOptions::new()
            .max_connections(POOL_SIZE)
            .acquire_timeout(POOL_CONNECTION_TIMEOUT)
            .connect_with(options)
            .await
            .map_err(|e| GenerateError::pool(e, "creating MySQL pool"))?;

        // Test connection
        sqlx::query("SELECT 1")
            .fetch_one(&pool)
            .await
            .map_err(|e| GenerateError::pool(e, "testing MySQL connection"))?;

        info!(
            "Connected to MySQL: {}:{}/{}",
            config.host,
            config.effective_port(),
            config.database
        );

        Ok(Self {
            pool,
            database: config.database.clone(),
        })
    }

    async fn load_columns(&self, table: &str) -> Result<Vec<Column>> {
        // CAST string columns to CHAR to handle collation differences where
        // information_schema may return VARBINARY instead of VARCHAR.
        let query = r#"
            SELECT
                CAST(COLUMN_NAME AS CHAR(255)) AS COLUMN_NAME,
                CAST(DATA_TYPE AS CHAR(255)) AS DATA_TYPE,
                CAST(COLUMN_TYPE AS CHAR(1024)) AS COLUMN_TYPE,
                CAST(CASE
                    WHEN CHARACTER_MAXIMUM_LENGTH IS NULL THEN 0
                    WHEN CHARACTER_MAXIMUM_LENGTH > 2147483647 THEN -1
                    ELSE CHARACTER_MAXIMUM_LENGTH
                END AS SIGNED) AS max_length,
                CAST(COALESCE(NUMERIC_PRECISION, DATETIME_PRECISION, 0) AS SIGNED) AS num_precision,
                CAST(COALESCE(NUMERIC_SCALE, 0) AS SIGNED) AS num_scale,
                IF(IS_NULLABLE = 'YES', 1, 0) AS is_nullable,
                CAST(COLUMN_DEFAULT AS CHAR(4096)) AS COLUMN_DEFAULT,
                CAST(EXTRA AS CHAR(255)) AS EXTRA,
                CAST(COLLATION_NAME AS CHAR(255)) AS COLLATION_NAME,
                CAST(COLUMN_COMMENT AS CHAR(2048)) AS COLUMN_COMMENT,
                CAST(ORDINAL_POSITION AS SIGNED) AS ORDINAL_POSITION
            FROM INFORMATION_SCHEMA.COLUMNS
            WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ?
            ORDER BY ORDINAL_POSITION
        "#;

        let rows: Vec<MySqlRow> = sqlx::query(query)
            .bind(&self.database)
            .bind(table)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| GenerateError::pool(e, "loading MySQL columns"))?;

        let mut columns = Vec::with_capacity(rows.len());
        for row in rows {
            let data_type: String = row.get("DATA_TYPE");
            let column_type: String = row.get("COLUMN_TYPE");
            let extra: String = row.get("EXTRA");
            let raw_default: Option<String> = row.get("COLUMN_DEFAULT");
            let comment: String = row.get("COLUMN_COMMENT");

            let type_name = normalize_type(&data_type, &column_type);
            let (precision, scale) = effective_precision(
                &type_name,
                &column_type,
                row.get::<i64, _>("num_precision") as i32,
                row.get::<i64, _>("num_scale") as i32,
            );
            let auto_increment = extra.to_lowercase().contains("auto_increment");

            columns.push(Column {
                name: row.get::<String, _>("COLUMN_NAME"),
                nullable: row.get::<i32, _>("is_nullable") == 1,
                default: classify_default(raw_default.as_deref(), &extra, &type_name),
                precision,
                scale,
                length: row.get::<i64, _>("max_length") as i32,
                unsigned: is_unsigned(&column_type),
                auto_increment,
                on_update_current: has_on_update_current(&extra),
                collation: row.get::<Option<String>, _>("COLLATION_NAME"),
                comment: if comment.is_empty() {
                    None
                } else {
                    Some(comment)
                },
                members: extract_members(&column_type),
                ordinal: row.get::<i64, _>("ORDINAL_POSITION") as i32,
                type_name,
            });
        }

        Ok(columns)
    }

    async fn load_indexes(&self, table: &str) -> Result<Vec<Index>> {
        let query = r#"
            SELECT
                CAST(INDEX_NAME AS CHAR(255)) AS INDEX_NAME,
                GROUP_CONCAT(CAST(COLUMN_NAME AS CHAR(255)) ORDER BY SEQ_IN_INDEX) AS columns,
                IF(NON_UNIQUE = 0, 1, 0) AS is_unique,
                CAST(INDEX_TYPE AS CHAR(64)) AS INDEX_TYPE
            FROM INFORMATION_SCHEMA.STATISTICS
            WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ?
            GROUP BY INDEX_NAME, NON_UNIQUE, INDEX_TYPE
            ORDER BY INDEX_NAME
        "#;

        let rows: Vec<MySqlRow> = sqlx::query(query)
            .bind(&self.database)
            .bind(table)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| GenerateError::pool(e, "loading MySQL indexes"))?;

        let mut indexes = Vec::with_capacity(rows.len());
        for row in rows {
            let name: String = row.get("INDEX_NAME");
            let columns_str: String = row.get("columns");
            let is_unique = row.get::<i32, _>("is_unique") == 1;
            let index_type: String = row.get("INDEX_TYPE");

            let kind = index_kind(&name, is_unique, &index_type);
            indexes.push(Index {
                name,
                kind,
                columns: columns_str.split(',').map(|s| s.to_string()).collect(),
                algorithm: index_algorithm(&index_type),
            });
        }

        debug!("Loaded {} indexes for {}", indexes.len(), table);
        Ok(indexes)
    }

    async fn load_table_meta(&self, table: &str) -> Result<(Option<String>, Option<String>)> {
        let query = r#"
            SELECT
                CAST(TABLE_COLLATION AS CHAR(255)) AS TABLE_COLLATION,
                CAST(TABLE_COMMENT AS CHAR(2048)) AS TABLE_COMMENT
            FROM INFORMATION_SCHEMA.TABLES
            WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ?
        "#;

        let row: MySqlRow = sqlx::query(query)
            .bind(&self.database)
            .bind(table)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| GenerateError::pool(e, "loading MySQL table metadata"))?;

        let collation: Option<String> = row.get("TABLE_COLLATION");
        let comment: String = row.get("TABLE_COMMENT");
        let comment = if comment.is_empty() {
            None
        } else {
            Some(comment)
        };

        Ok((collation, comment))
    }
}

#[async_trait]
impl SchemaReader for MysqlSchemaReader {
    async fn get_table_names(&self) -> Result<Vec<String>> {
        let query = r#"
            SELECT CAST(TABLE_NAME AS CHAR(255)) AS TABLE_NAME
            FROM INFORMATION_SCHEMA.TABLES
            WHERE TABLE_SCHEMA = ? AND TABLE_TYPE = 'BASE TABLE'
            ORDER BY TABLE_NAME
        "#;

        let rows: Vec<MySqlRow> = sqlx::query(query)
            .bind(&self.database)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| GenerateError::pool(e, "listing MySQL tables"))?;

        Ok(rows.iter().map(|r| r.get("TABLE_NAME")).collect())
    }

    async fn get_view_names(&self) -> Result<Vec<String>> {
        let query = r#"
            SELECT CAST(TABLE_NAME AS CHAR(255)) AS TABLE_NAME
            FROM INFORMATION_SCHEMA.VIEWS
            WHERE TABLE_SCHEMA = ?
            ORDER BY TABLE_NAME
        "#;

        let rows: Vec<MySqlRow> = sqlx::query(query)
            .bind(&self.database)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| GenerateError::pool(e, "listing MySQL views"))?;

        Ok(rows.iter().map(|r| r.get("TABLE_NAME")).collect())
    }

    async fn get_table(&self, name: &str) -> Result<Table> {
        let (collation, comment) = self.load_table_meta(name).await?;
        let columns = self.load_columns(name).await?;
        let indexes = self.load_indexes(name).await?;

        debug!("Loaded {} columns for {}", columns.len(), name);

        Ok(Table {
            name: name.to_string(),
            columns,
            indexes,
            collation,
            comment,
        })
    }

    async fn get_views(&self) -> Result<Vec<View>> {
        let query = r#"
            SELECT
                CAST(TABLE_NAME AS CHAR(255)) AS TABLE_NAME,
                CAST(VIEW_DEFINITION AS CHAR(65535)) AS VIEW_DEFINITION
            FROM INFORMATION_SCHEMA.VIEWS
            WHERE TABLE_SCHEMA = ?
            ORDER BY TABLE_NAME
        "#;

        let rows: Vec<MySqlRow> = sqlx::query(query)
            .bind(&self.database)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| GenerateError::pool(e, "loading MySQL views"))?;

        Ok(rows
            .iter()
            .map(|row| View {
                name: row.get("TABLE_NAME"),
                definition: row.get("VIEW_DEFINITION"),
            })
            .collect())
    }

    async fn get_table_foreign_keys(&self, table: &str) -> Result<Vec<ForeignKey>> {
        let query = r#"
            SELECT
                CAST(rc.CONSTRAINT_NAME AS CHAR(255)) AS CONSTRAINT_NAME,
                CAST(kcu.COLUMN_NAME AS CHAR(255)) AS COLUMN_NAME,
                CAST(kcu.REFERENCED_TABLE_NAME AS CHAR(255)) AS REFERENCED_TABLE_NAME,
                CAST(kcu.REFERENCED_COLUMN_NAME AS CHAR(255)) AS REFERENCED_COLUMN_NAME,
                CAST(rc.UPDATE_RULE AS CHAR(64)) AS UPDATE_RULE,
                CAST(rc.DELETE_RULE AS CHAR(64)) AS DELETE_RULE
            FROM INFORMATION_SCHEMA.REFERENTIAL_CONSTRAINTS rc
            JOIN INFORMATION_SCHEMA.KEY_COLUMN_USAGE kcu
                ON rc.CONSTRAINT_SCHEMA = kcu.CONSTRAINT_SCHEMA
                AND rc.CONSTRAINT_NAME = kcu.CONSTRAINT_NAME
                AND rc.TABLE_NAME = kcu.TABLE_NAME
            WHERE rc.CONSTRAINT_SCHEMA = ? AND rc.TABLE_NAME = ?
            ORDER BY rc.CONSTRAINT_NAME, kcu.ORDINAL_POSITION
        "#;

        let rows: Vec<MySqlRow> = sqlx::query(query)
            .bind(&self.database)
            .bind(table)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| GenerateError::pool(e, "loading MySQL foreign keys"))?;

        // Group composite keys by constraint name, preserving query order.
        let mut fks: Vec<ForeignKey> = Vec::new();
        for row in rows {
            let name: String = row.get("CONSTRAINT_NAME");
            let column: String = row.get("COLUMN_NAME");
            let ref_column: String = row.get("REFERENCED_COLUMN_NAME");

            if let Some(fk) = fks.iter_mut().find(|fk| fk.name == name) {
                fk.columns.push(column);
                fk.ref_columns.push(ref_column);
            } else {
                fks.push(ForeignKey {
                    name,
                    columns: vec![column],
                    ref_table: row.get("REFERENCED_TABLE_NAME"),
                    ref_columns: vec![ref_column],
                    on_update: normalize_rule(row.get("UPDATE_RULE")),
                    on_delete: normalize_rule(row.get("DELETE_RULE")),
                });
            }
        }

        debug!("Loaded {} foreign keys for {}", fks.len(), table);
        Ok(fks)
    }

    fn db_type(&self) -> &str {
        "mysql"
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

/// Canonical type name for the mapper. `DATA_TYPE` loses the display
/// width, so boolean-shaped columns are detected from `COLUMN_TYPE`.
fn normalize_type(data_type: &str, column_type: &str) -> String {
    let data_type = data_type.to_lowercase();
    let column_type = column_type.to_lowercase();

    match data_type.as_str() {
        "tinyint" if column_type.starts_with("tinyint(1)") => "boolean".to_string(),
        "bit" if column_type.starts_with("bit(1)") => "boolean".to_string(),
        _ => data_type,
    }
}

/// Precision/scale as the mapper should see them.
///
/// MySQL reports a storage precision for bare `float`/`double` columns
/// (12 and 22); only a declaration with explicit parentheses carries
/// user intent, so bare ones report (0, 0).
fn effective_precision(type_name: &str, column_type: &str, precision: i32, scale: i32) -> (i32, i32) {
    match type_name {
        "float" | "double" if !column_type.contains('(') => (0, 0),
        _ => (precision, scale),
    }
}

/// Whether `COLUMN_TYPE` carries the unsigned attribute.
fn is_unsigned(column_type: &str) -> bool {
    column_type.to_lowercase().contains(" unsigned")
}

/// Whether EXTRA marks an "on update CURRENT_TIMESTAMP" column.
fn has_on_update_current(extra: &str) -> bool {
    extra.to_lowercase().contains("on update current_timestamp")
}

/// Member values of an enum/set `COLUMN_TYPE` such as
/// `enum('draft','published')`. Embedded quotes arrive doubled.
fn extract_members(column_type: &str) -> Vec<String> {
    let lower = column_type.to_lowercase();
    if !lower.starts_with("enum(") && !lower.starts_with("set(") {
        return Vec::new();
    }

    let Some(open) = column_type.find('(') else {
        return Vec::new();
    };
    let Some(close) = column_type.rfind(')') else {
        return Vec::new();
    };

    let mut members = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = column_type[open + 1..close].chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\'' if in_quotes => {
                if chars.peek() == Some(&'\'') {
                    chars.next();
                    current.push('\'');
                } else {
                    in_quotes = false;
                    members.push(std::mem::take(&mut current));
                }
            }
            '\'' => in_quotes = true,
            _ if in_quotes => current.push(c),
            _ => {}
        }
    }

    members
}

/// Classify a raw `COLUMN_DEFAULT` value.
fn classify_default(raw: Option<&str>, extra: &str, type_name: &str) -> Option<ColumnDefault> {
    let raw = raw?;

    // MySQL 8 marks expression defaults in EXTRA.
    if extra.to_uppercase().contains("DEFAULT_GENERATED") {
        // A generated CURRENT_TIMESTAMP still classifies as an expression;
        // the mapper decides whether it becomes useCurrent.
        return Some(ColumnDefault::Expression(raw.to_string()));
    }

    let upper = raw.trim().to_uppercase();
    if upper == "NULL" {
        return None;
    }
    if upper.starts_with("CURRENT_TIMESTAMP") || upper == "NOW()" {
        return Some(ColumnDefault::Expression(raw.to_string()));
    }

    // Bit literals arrive as b'1'.
    let literal = raw
        .strip_prefix("b'")
        .and_then(|s| s.strip_suffix('\''))
        .unwrap_or(raw);

    if type_name == "boolean" {
        if let Ok(v) = literal.parse::<i64>() {
            return Some(ColumnDefault::Bool(v != 0));
        }
    }

    if let Ok(v) = literal.parse::<i64>() {
        return Some(ColumnDefault::Int(v));
    }
    if let Ok(v) = literal.parse::<f64>() {
        return Some(ColumnDefault::Real(v));
    }

    Some(ColumnDefault::Str(raw.trim_matches('\'').to_string()))
}

/// Classify an index from its STATISTICS row.
fn index_kind(name: &str, is_unique: bool, index_type: &str) -> IndexKind {
    if name == "PRIMARY" {
        return IndexKind::Primary;
    }
    match index_type.to_uppercase().as_str() {
        "FULLTEXT" => IndexKind::Fulltext,
        "SPATIAL" => IndexKind::Spatial,
        _ if is_unique => IndexKind::Unique,
        _ => IndexKind::Index,
    }
}

/// The index access method, for the kinds where it is meaningful.
fn index_algorithm(index_type: &str) -> Option<String> {
    match index_type.to_uppercase().as_str() {
        "BTREE" | "HASH" => Some(index_type.to_lowercase()),
        _ => None,
    }
}

/// Uppercase driver rules ("CASCADE", "SET NULL") become the lowercase
/// action vocabulary; "NO ACTION" and RESTRICT pass through for the
/// mapper to normalize.
fn normalize_rule(rule: Option<String>) -> Option<String> {
    let rule = rule?;
    let trimmed = rule.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_lowercase())
}
