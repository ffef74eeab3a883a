//! Generation orchestrator - the single-pass workflow coordinator.
//!
//! Iterates tables, then views, then foreign keys, sequentially and with
//! no shared mutable state beyond the read-only configuration. Foreign
//! keys are a separate pass because their migrations must replay only
//! once every referenced table exists.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::drivers::create_reader;
use crate::error::Result;
use crate::generate::{assembler, Artifact};
use crate::schema::SchemaReader;
use crate::writer::{MigrationWriter, SquashBuffer};

/// Generation workflow coordinator.
pub struct Generator {
    config: Config,
    reader: Arc<dyn SchemaReader>,
}

/// Result of a generation run.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateResult {
    /// Database type the schema was read from.
    pub db_type: String,

    /// Tables generated.
    pub tables: usize,

    /// Views generated.
    pub views: usize,

    /// Foreign-key migrations generated (one per table with foreign keys).
    pub foreign_key_sets: usize,

    /// Data-integrity warnings attached to statements.
    pub warnings: usize,

    /// Migration files written, in generation order.
    pub files: Vec<PathBuf>,
}

/// Result of a connection health check.
#[derive(Debug, Clone, Serialize)]
pub struct HealthCheckResult {
    /// Database type the reader connected to.
    pub db_type: String,

    /// Whether the catalog answered the probe queries.
    pub connected: bool,

    /// Base tables visible to the reader.
    pub tables: usize,

    /// Views visible to the reader.
    pub views: usize,

    /// Probe round-trip time in milliseconds.
    pub latency_ms: u64,
}

impl Generator {
    /// Create a generator, connecting to the configured database.
    ///
    /// Connection failure is fatal here: no statement is ever produced
    /// from a source that cannot be introspected.
    pub async fn new(config: Config) -> Result<Self> {
        let reader = create_reader(&config.connection).await?;
        Ok(Self { config, reader })
    }

    /// Create a generator over an existing reader.
    pub fn with_reader(config: Config, reader: Arc<dyn SchemaReader>) -> Self {
        Self { config, reader }
    }

    /// Probe the source connection and catalog visibility.
    pub async fn health_check(&self) -> Result<HealthCheckResult> {
        let start = Instant::now();
        let tables = self.reader.get_table_names().await?;
        let views = self.reader.get_view_names().await?;

        Ok(HealthCheckResult {
            db_type: self.reader.db_type().to_string(),
            connected: true,
            tables: tables.len(),
            views: views.len(),
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Run one generation pass: tables, views, foreign keys.
    pub async fn run(&self) -> Result<GenerateResult> {
        let gen_config = &self.config.generator;
        let writer = MigrationWriter::new(gen_config)?;
        let mut squash = SquashBuffer::new();

        let all_tables = self.reader.get_table_names().await?;
        let known_tables: HashSet<String> = all_tables.iter().cloned().collect();
        let table_names = self.filter_names(&all_tables);

        info!(
            "Generating migrations for {} of {} tables",
            table_names.len(),
            all_tables.len()
        );

        let mut result = GenerateResult {
            db_type: self.reader.db_type().to_string(),
            tables: 0,
            views: 0,
            foreign_key_sets: 0,
            warnings: 0,
            files: Vec::new(),
        };

        for name in &table_names {
            let table = self.reader.get_table(name).await?;
            let artifact = assembler::table_artifact(&table, gen_config)?;
            self.emit(&artifact, &writer, &mut squash, &mut result)?;
            result.tables += 1;
            debug!("Generated table migration for {}", name);
        }

        if gen_config.skip_views {
            info!("Skipping views (skip_views is set)");
        } else {
            let view_names: HashSet<String> = self
                .filter_names(&self.reader.get_view_names().await?)
                .into_iter()
                .collect();

            for view in self.reader.get_views().await? {
                if !view_names.contains(&view.name) {
                    continue;
                }
                let artifact = assembler::view_artifact(&view);
                self.emit(&artifact, &writer, &mut squash, &mut result)?;
                result.views += 1;
                debug!("Generated view migration for {}", view.name);
            }
        }

        // Separate pass: foreign keys replay after every table exists.
        for name in &table_names {
            let fks = self.reader.get_table_foreign_keys(name).await?;
            let Some(artifact) =
                assembler::foreign_key_artifact(name, &fks, &known_tables, gen_config)
            else {
                continue;
            };
            self.emit(&artifact, &writer, &mut squash, &mut result)?;
            result.foreign_key_sets += 1;
            debug!("Generated foreign key migration for {}", name);
        }

        if !squash.is_empty() {
            let path = squash.flush(gen_config, &self.config.connection.database)?;
            result.files.push(path);
        }

        if result.warnings > 0 {
            warn!(
                "Generation finished with {} data-integrity warnings",
                result.warnings
            );
        }
        info!(
            "Generated {} tables, {} views, {} foreign key sets into {} files",
            result.tables,
            result.views,
            result.foreign_key_sets,
            result.files.len()
        );

        Ok(result)
    }

    fn emit(
        &self,
        artifact: &Artifact,
        writer: &MigrationWriter,
        squash: &mut SquashBuffer,
        result: &mut GenerateResult,
    ) -> Result<()> {
        result.warnings += artifact.warning_count();

        if self.config.generator.squash {
            squash.push(artifact);
        } else {
            result.files.push(writer.write(artifact)?);
        }

        Ok(())
    }

    /// Apply the tables/ignore filters. The framework's own migration-log
    /// table is always excluded: generating a migration for it would
    /// collide with the migration runner itself.
    fn filter_names(&self, names: &[String]) -> Vec<String> {
        let gen_config = &self.config.generator;

        names
            .iter()
            .filter(|&name| name != "migrations")
            .filter(|&name| {
                gen_config
                    .tables
                    .as_ref()
                    .is_none_or(|only| only.contains(name))
            })
            .filter(|&name| !gen_config.ignore.contains(name))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConnectionConfig, GeneratorConfig};
    use crate::schema::{Column, ForeignKey, Index, IndexKind, Table, View};
    use async_trait::async_trait;

    /// In-memory reader over a fixed snapshot.
    struct StubReader {
        tables: Vec<Table>,
        views: Vec<View>,
        foreign_keys: Vec<(String, ForeignKey)>,
    }

    #[async_trait]
    impl SchemaReader for StubReader {
        async fn get_table_names(&self) -> Result<Vec<String>> {
            Ok(self.tables.iter().map(|t| t.name.clone()).collect())
        }

        async fn get_view_names(&self) -> Result<Vec<String>> {
            Ok(self.views.iter().map(|v| v.name.clone()).collect())
        }

        async fn get_table(&self, name: &str) -> Result<Table> {
            Ok(self
                .tables
                .iter()
                .find(|t| t.name == name)
                .cloned()
                .expect("unknown table requested"))
        }

        async fn get_views(&self) -> Result<Vec<View>> {
            Ok(self.views.clone())
        }

        async fn get_table_foreign_keys(&self, table: &str) -> Result<Vec<ForeignKey>> {
            Ok(self
                .foreign_keys
                .iter()
                .filter(|(t, _)| t == table)
                .map(|(_, fk)| fk.clone())
                .collect())
        }

        fn db_type(&self) -> &str {
            "stub"
        }

        async fn close(&self) {}
    }

    fn snapshot() -> StubReader {
        let mut id = Column::new("id", "bigint");
        id.auto_increment = true;
        id.unsigned = true;

        let mut user_id = Column::new("user_id", "bigint");
        user_id.unsigned = true;
        user_id.ordinal = 2;

        let users = Table {
            name: "users".to_string(),
            columns: vec![id.clone()],
            indexes: vec![Index {
                name: "PRIMARY".to_string(),
                kind: IndexKind::Primary,
                columns: vec!["id".to_string()],
                algorithm: None,
            }],
            collation: None,
            comment: None,
        };

        let posts = Table {
            name: "posts".to_string(),
            columns: vec![id, user_id],
            indexes: vec![],
            collation: None,
            comment: None,
        };

        // The runner's own bookkeeping table must never be generated.
        let migrations = Table {
            name: "migrations".to_string(),
            columns: vec![Column::new("id", "int")],
            indexes: vec![],
            collation: None,
            comment: None,
        };

        let fk = ForeignKey {
            name: "posts_user_id_foreign".to_string(),
            columns: vec!["user_id".to_string()],
            ref_table: "users".to_string(),
            ref_columns: vec!["id".to_string()],
            on_update: None,
            on_delete: Some("cascade".to_string()),
        };

        StubReader {
            tables: vec![users, posts, migrations],
            views: vec![View {
                name: "active_users".to_string(),
                definition: "select * from users".to_string(),
            }],
            foreign_keys: vec![("posts".to_string(), fk)],
        }
    }

    fn config_in(dir: &std::path::Path, generator: GeneratorConfig) -> Config {
        Config {
            connection: ConnectionConfig {
                r#type: "mysql".to_string(),
                host: "localhost".to_string(),
                port: None,
                database: "app".to_string(),
                user: "root".to_string(),
                password: String::new(),
                schema: None,
                ssl_mode: "disable".to_string(),
            },
            generator: GeneratorConfig {
                path: dir.to_path_buf(),
                date: Some("2024-03-01 12:30:45".to_string()),
                ..generator
            },
        }
    }

    #[tokio::test]
    async fn test_run_generates_all_artifact_kinds() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), GeneratorConfig::default());
        let generator = Generator::with_reader(config, Arc::new(snapshot()));

        let result = generator.run().await.unwrap();
        assert_eq!(result.tables, 2);
        assert_eq!(result.views, 1);
        assert_eq!(result.foreign_key_sets, 1);
        assert_eq!(result.warnings, 0);
        assert_eq!(result.files.len(), 4);

        let names: Vec<String> = result
            .files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert!(names.contains(&"2024_03_01_123045_create_users_table.php".to_string()));
        assert!(names.contains(&"2024_03_01_123046_add_foreign_keys_to_posts_table.php".to_string()));
        // The migrations table is always excluded.
        assert!(!names.iter().any(|n| n.contains("migrations")));
    }

    #[tokio::test]
    async fn test_run_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), GeneratorConfig::default());
        let generator = Generator::with_reader(config, Arc::new(snapshot()));

        let first = generator.run().await.unwrap();
        let second = generator.run().await.unwrap();
        assert_eq!(first.files, second.files);

        let content_first =
            std::fs::read_to_string(&first.files[0]).unwrap();
        let content_second =
            std::fs::read_to_string(&second.files[0]).unwrap();
        assert_eq!(content_first, content_second);
    }

    #[tokio::test]
    async fn test_skip_views_and_ignore_list() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(
            dir.path(),
            GeneratorConfig {
                skip_views: true,
                ignore: vec!["posts".to_string()],
                ..Default::default()
            },
        );
        let generator = Generator::with_reader(config, Arc::new(snapshot()));

        let result = generator.run().await.unwrap();
        assert_eq!(result.tables, 1);
        assert_eq!(result.views, 0);
        assert_eq!(result.foreign_key_sets, 0);
    }

    #[tokio::test]
    async fn test_explicit_table_list() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(
            dir.path(),
            GeneratorConfig {
                tables: Some(vec!["users".to_string()]),
                skip_views: true,
                ..Default::default()
            },
        );
        let generator = Generator::with_reader(config, Arc::new(snapshot()));

        let result = generator.run().await.unwrap();
        assert_eq!(result.tables, 1);
        assert_eq!(result.foreign_key_sets, 0);
    }

    #[tokio::test]
    async fn test_squash_writes_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(
            dir.path(),
            GeneratorConfig {
                squash: true,
                ..Default::default()
            },
        );
        let generator = Generator::with_reader(config, Arc::new(snapshot()));

        let result = generator.run().await.unwrap();
        assert_eq!(result.tables, 2);
        assert_eq!(result.files.len(), 1);

        // One combined file named after the database.
        let content = std::fs::read_to_string(&result.files[0]).unwrap();
        assert!(result.files[0]
            .file_name()
            .unwrap()
            .to_str()
            .unwrap()
            .contains("app"));
        assert!(content.contains("Schema::create('users'"));
        assert!(content.contains("Schema::create('posts'"));
        assert!(content.contains("CREATE VIEW active_users"));
    }

    #[tokio::test]
    async fn test_missing_reference_counts_as_warning() {
        let dir = tempfile::tempdir().unwrap();
        let mut reader = snapshot();
        reader.foreign_keys[0].1.ref_table = "archived_users".to_string();

        let config = config_in(dir.path(), GeneratorConfig::default());
        let generator = Generator::with_reader(config, Arc::new(reader));

        let result = generator.run().await.unwrap();
        assert_eq!(result.warnings, 1);
        assert_eq!(result.foreign_key_sets, 1);
    }

    #[tokio::test]
    async fn test_health_check_reports_counts() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), GeneratorConfig::default());
        let generator = Generator::with_reader(config, Arc::new(snapshot()));

        let health = generator.health_check().await.unwrap();
        assert!(health.connected);
        assert_eq!(health.db_type, "stub");
        assert_eq!(health.tables, 3);
        assert_eq!(health.views, 1);
    }
}
