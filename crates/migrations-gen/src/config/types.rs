//! Configuration type definitions.
//!
//! The configuration is an immutable value constructed once (from YAML
//! and/or CLI overrides) and threaded by reference into every mapper call.
//! There is no global settings object.

use std::path::PathBuf;

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{GenerateError, Result};

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Source database connection.
    pub connection: ConnectionConfig,

    /// Generation behavior.
    #[serde(default)]
    pub generator: GeneratorConfig,
}

/// Source database connection configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Database type: "mysql", "mariadb", "postgres", "postgresql", "pg".
    pub r#type: String,

    /// Database host.
    pub host: String,

    /// Database port. Defaults to the engine's standard port.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Database name.
    pub database: String,

    /// Username.
    pub user: String,

    /// Password.
    #[serde(default)]
    pub password: String,

    /// Schema to introspect (PostgreSQL only, default: "public").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// SSL mode (PostgreSQL): disable, require, verify-ca, verify-full.
    #[serde(default = "default_ssl_mode")]
    pub ssl_mode: String,
}

impl ConnectionConfig {
    /// Canonical database type string.
    ///
    /// Normalizes aliases: "mysql"/"mariadb" → "mysql",
    /// "postgres"/"postgresql"/"pg" → "postgres".
    pub fn normalized_type(&self) -> Result<&'static str> {
        match self.r#type.to_lowercase().as_str() {
            "mysql" | "mariadb" => Ok("mysql"),
            "postgres" | "postgresql" | "pg" => Ok("postgres"),
            other => Err(GenerateError::Config(format!(
                "Unknown database type: '{}'. Supported types: mysql, postgres",
                other
            ))),
        }
    }

    /// Effective port, falling back to the engine default.
    pub fn effective_port(&self) -> u16 {
        self.port.unwrap_or(match self.normalized_type() {
            Ok("postgres") => 5432,
            _ => 3306,
        })
    }

    /// Effective PostgreSQL schema.
    pub fn effective_schema(&self) -> &str {
        self.schema.as_deref().unwrap_or("public")
    }
}

// Manual Debug so connection details can be logged without leaking secrets.
impl std::fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("type", &self.r#type)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("schema", &self.schema)
            .field("ssl_mode", &self.ssl_mode)
            .finish()
    }
}

fn default_ssl_mode() -> String {
    "disable".to_string()
}

/// Generation behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Only generate these tables/views. None means all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tables: Option<Vec<String>>,

    /// Tables/views to exclude. The framework's own migration-log table
    /// is always excluded regardless of this list.
    #[serde(default)]
    pub ignore: Vec<String>,

    /// Output directory for migration files.
    #[serde(default = "default_path")]
    pub path: PathBuf,

    /// Fixed datetime for filename prefixes ("YYYY-MM-DD HH:MM:SS" or
    /// "YYYY-MM-DD"). None means now.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    /// Table migration filename pattern.
    #[serde(default = "default_table_filename")]
    pub table_filename: String,

    /// View migration filename pattern.
    #[serde(default = "default_view_filename")]
    pub view_filename: String,

    /// Foreign key migration filename pattern.
    #[serde(default = "default_fk_filename")]
    pub fk_filename: String,

    /// Never emit explicit index names; rely on the DSL's defaults.
    #[serde(default)]
    pub default_index_names: bool,

    /// Never emit explicit foreign key names; rely on the DSL's defaults.
    #[serde(default)]
    pub default_fk_names: bool,

    /// Emit collation/charset for tables and columns that differ from
    /// the connection default.
    #[serde(default)]
    pub use_db_collation: bool,

    /// Don't generate view migrations.
    #[serde(default)]
    pub skip_views: bool,

    /// Generate all migrations into a single file.
    #[serde(default)]
    pub squash: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            tables: None,
            ignore: Vec::new(),
            path: default_path(),
            date: None,
            table_filename: default_table_filename(),
            view_filename: default_view_filename(),
            fk_filename: default_fk_filename(),
            default_index_names: false,
            default_fk_names: false,
            use_db_collation: false,
            skip_views: false,
            squash: false,
        }
    }
}

impl GeneratorConfig {
    /// Resolve the migration datetime: the configured date, or now.
    pub fn migration_datetime(&self) -> Result<NaiveDateTime> {
        match &self.date {
            None => Ok(Local::now().naive_local()),
            Some(raw) => parse_datetime(raw),
        }
    }
}

fn parse_datetime(raw: &str) -> Result<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Ok(dt);
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(dt) = d.and_hms_opt(0, 0, 0) {
            return Ok(dt);
        }
    }
    Err(GenerateError::Config(format!(
        "Cannot parse date '{}'. Expected 'YYYY-MM-DD' or 'YYYY-MM-DD HH:MM:SS'",
        raw
    )))
}

fn default_path() -> PathBuf {
    PathBuf::from("migrations")
}

fn default_table_filename() -> String {
    "[datetime_prefix]_create_[name]_table.php".to_string()
}

fn default_view_filename() -> String {
    "[datetime_prefix]_create_[name]_view.php".to_string()
}

fn default_fk_filename() -> String {
    "[datetime_prefix]_add_foreign_keys_to_[name]_table.php".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_type_aliases() {
        let mut conn = ConnectionConfig {
            r#type: "mariadb".to_string(),
            host: "localhost".to_string(),
            port: None,
            database: "app".to_string(),
            user: "root".to_string(),
            password: String::new(),
            schema: None,
            ssl_mode: "disable".to_string(),
        };
        assert_eq!(conn.normalized_type().unwrap(), "mysql");
        assert_eq!(conn.effective_port(), 3306);

        conn.r#type = "pg".to_string();
        assert_eq!(conn.normalized_type().unwrap(), "postgres");
        assert_eq!(conn.effective_port(), 5432);
        assert_eq!(conn.effective_schema(), "public");

        conn.r#type = "oracle".to_string();
        assert!(conn.normalized_type().is_err());
    }

    #[test]
    fn test_debug_redacts_password() {
        let conn = ConnectionConfig {
            r#type: "mysql".to_string(),
            host: "localhost".to_string(),
            port: Some(3306),
            database: "app".to_string(),
            user: "root".to_string(),
            password: "super_secret_password_123".to_string(),
            schema: None,
            ssl_mode: "disable".to_string(),
        };
        let debug_output = format!("{:?}", conn);
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_password_123"));
    }

    #[test]
    fn test_migration_datetime_parsing() {
        let mut gen = GeneratorConfig {
            date: Some("2024-03-01 12:30:45".to_string()),
            ..Default::default()
        };
        let dt = gen.migration_datetime().unwrap();
        assert_eq!(dt.format("%Y_%m_%d_%H%M%S").to_string(), "2024_03_01_123045");

        gen.date = Some("2024-03-01".to_string());
        let dt = gen.migration_datetime().unwrap();
        assert_eq!(dt.format("%H%M%S").to_string(), "000000");

        gen.date = Some("not a date".to_string());
        assert!(gen.migration_datetime().is_err());
    }

    #[test]
    fn test_default_filename_patterns() {
        let gen = GeneratorConfig::default();
        assert!(gen.table_filename.contains("[datetime_prefix]"));
        assert!(gen.table_filename.contains("[name]"));
        assert!(gen.fk_filename.starts_with("[datetime_prefix]_add_foreign_keys_to_"));
    }
}
