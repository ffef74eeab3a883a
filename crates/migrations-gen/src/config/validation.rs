//! Configuration validation.

use super::Config;
use crate::error::{GenerateError, Result};

/// Validate the configuration.
pub fn validate(config: &Config) -> Result<()> {
    if config.connection.host.is_empty() {
        return Err(GenerateError::Config("connection.host is required".into()));
    }
    if config.connection.database.is_empty() {
        return Err(GenerateError::Config(
            "connection.database is required".into(),
        ));
    }
    if config.connection.user.is_empty() {
        return Err(GenerateError::Config("connection.user is required".into()));
    }

    // Rejects unsupported engines early, before any connection attempt.
    config.connection.normalized_type()?;

    if config.generator.path.as_os_str().is_empty() {
        return Err(GenerateError::Config("generator.path is required".into()));
    }

    for (key, pattern) in [
        ("table_filename", &config.generator.table_filename),
        ("view_filename", &config.generator.view_filename),
        ("fk_filename", &config.generator.fk_filename),
    ] {
        if !pattern.contains("[datetime_prefix]") || !pattern.contains("[name]") {
            return Err(GenerateError::Config(format!(
                "generator.{} must contain the [datetime_prefix] and [name] tokens, got '{}'",
                key, pattern
            )));
        }
    }

    if let Some(tables) = &config.generator.tables {
        if tables.is_empty() {
            return Err(GenerateError::Config(
                "generator.tables must not be an empty list; omit it to generate all tables".into(),
            ));
        }
    }

    Ok(())
}
