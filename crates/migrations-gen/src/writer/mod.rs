//! Migration file output: filename templating, stub rendering and the
//! squash buffer.

mod filename;
mod render;
mod stub;

use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDateTime};
use tracing::debug;

use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::generate::Artifact;

/// Writes one migration file per artifact.
pub struct MigrationWriter {
    path: PathBuf,
    datetime: NaiveDateTime,
    table_pattern: String,
    view_pattern: String,
    fk_pattern: String,
}

impl MigrationWriter {
    /// Build a writer from the generator configuration, resolving the
    /// migration datetime once so every artifact of a run shares it.
    pub fn new(config: &GeneratorConfig) -> Result<Self> {
        Ok(Self {
            path: config.path.clone(),
            datetime: config.migration_datetime()?,
            table_pattern: config.table_filename.clone(),
            view_pattern: config.view_filename.clone(),
            fk_pattern: config.fk_filename.clone(),
        })
    }

    /// Write one artifact to its own migration file, returning the path.
    pub fn write(&self, artifact: &Artifact) -> Result<PathBuf> {
        let (up, down) = render_bodies(artifact);
        let content = stub::fill(stub_for(artifact), &up, &down);

        std::fs::create_dir_all(&self.path)?;
        let file = self.path.join(self.filename_for(artifact));
        std::fs::write(&file, content)?;

        debug!("Wrote {}", file.display());
        Ok(file)
    }

    fn filename_for(&self, artifact: &Artifact) -> String {
        // Views and foreign keys sort one second after tables so they are
        // replayed only once every table exists.
        let (pattern, datetime) = match artifact {
            Artifact::Table(_) => (&self.table_pattern, self.datetime),
            Artifact::View(_) => (&self.view_pattern, self.offset_datetime()),
            Artifact::ForeignKeys(_) => (&self.fk_pattern, self.offset_datetime()),
        };

        filename::compose(
            pattern,
            &filename::datetime_prefix(&datetime),
            artifact.name(),
        )
    }

    fn offset_datetime(&self) -> NaiveDateTime {
        self.datetime + Duration::seconds(1)
    }
}

/// Accumulates artifact bodies for squash mode; flushed once into a
/// single combined migration file. Down sections replay in reverse order
/// so constraints drop before the tables they reference.
#[derive(Default)]
pub struct SquashBuffer {
    up: Vec<String>,
    down: Vec<String>,
}

impl SquashBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer one artifact's rendered bodies.
    pub fn push(&mut self, artifact: &Artifact) {
        let (up, down) = render_bodies(artifact);
        self.up.push(up);
        self.down.push(down);
    }

    /// Whether anything has been buffered.
    pub fn is_empty(&self) -> bool {
        self.up.is_empty()
    }

    /// Write the combined migration file and return its path.
    pub fn flush(&self, config: &GeneratorConfig, name: &str) -> Result<PathBuf> {
        let datetime = config.migration_datetime()?;
        let up = self.up.join("\n");
        let down: Vec<&str> = self.down.iter().rev().map(String::as_str).collect();
        let content = stub::fill(stub::SQUASH_STUB, &up, &down.join("\n"));

        std::fs::create_dir_all(&config.path)?;
        let file = config.path.join(filename::compose(
            &config.table_filename,
            &filename::datetime_prefix(&datetime),
            name,
        ));
        std::fs::write(&file, content)?;

        debug!("Squashed migrations into {}", file.display());
        Ok(file)
    }
}

fn stub_for(artifact: &Artifact) -> &'static str {
    match artifact {
        Artifact::Table(_) | Artifact::ForeignKeys(_) => stub::BLUEPRINT_STUB,
        Artifact::View(_) => stub::RAW_STUB,
    }
}

fn render_bodies(artifact: &Artifact) -> (String, String) {
    match artifact {
        Artifact::Table(block) => (render::table_up(block), render::table_down(&block.name)),
        Artifact::View(block) => (render::view_up(block), render::view_down(block)),
        Artifact::ForeignKeys(block) => (
            render::foreign_keys_up(block),
            render::foreign_keys_down(block),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::{Statement, TableArtifact, Value, ViewArtifact};

    fn table_artifact(name: &str) -> Artifact {
        Artifact::Table(TableArtifact {
            name: name.to_string(),
            charset: None,
            collation: None,
            statements: vec![Statement::new("integer", "id").arg(Value::str("id"))],
        })
    }

    fn view_artifact(name: &str) -> Artifact {
        Artifact::View(ViewArtifact {
            name: name.to_string(),
            create_sql: format!("CREATE VIEW {} AS select 1", name),
            drop_sql: format!("DROP VIEW IF EXISTS {}", name),
        })
    }

    fn config_in(dir: &Path) -> GeneratorConfig {
        GeneratorConfig {
            path: dir.to_path_buf(),
            date: Some("2024-03-01 12:30:45".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_write_table_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let writer = MigrationWriter::new(&config).unwrap();

        let path = writer.write(&table_artifact("users")).unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "2024_03_01_123045_create_users_table.php"
        );

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("<?php"));
        assert!(content.contains("Schema::create('users'"));
        assert!(content.contains("Schema::dropIfExists('users');"));
    }

    #[test]
    fn test_view_and_fk_files_sort_after_tables() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let writer = MigrationWriter::new(&config).unwrap();

        let path = writer.write(&view_artifact("active_users")).unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "2024_03_01_123046_create_active_users_view.php"
        );
    }

    #[test]
    fn test_squash_buffer_reverses_down() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());

        let mut buffer = SquashBuffer::new();
        assert!(buffer.is_empty());
        buffer.push(&table_artifact("users"));
        buffer.push(&table_artifact("posts"));
        assert!(!buffer.is_empty());

        let path = buffer.flush(&config, "app").unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "2024_03_01_123045_create_app_table.php"
        );

        let content = std::fs::read_to_string(&path).unwrap();
        let create_users = content.find("Schema::create('users'").unwrap();
        let create_posts = content.find("Schema::create('posts'").unwrap();
        assert!(create_users < create_posts);

        let drop_posts = content.find("Schema::dropIfExists('posts');").unwrap();
        let drop_users = content.find("Schema::dropIfExists('users');").unwrap();
        assert!(drop_posts < drop_users);
    }
}
