//! Error types for the generator library.

use thiserror::Error;

/// Main error type for migration generation.
#[derive(Error, Debug)]
pub enum GenerateError {
    /// Configuration error (invalid YAML, missing fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// MySQL connection or query error
    #[error("MySQL error: {0}")]
    Mysql(#[from] sqlx::Error),

    /// PostgreSQL connection or query error
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    /// Connection pool error with context
    #[error("Pool error: {message}\n  Context: {context}")]
    Pool { message: String, context: String },

    /// Schema introspection returned something the generator cannot consume
    #[error("Schema introspection failed: {0}")]
    Introspection(String),

    /// Driver reported malformed column metadata (e.g. negative precision)
    #[error("Invalid metadata for column {table}.{column}: {message}")]
    InvalidColumnMetadata {
        table: String,
        column: String,
        message: String,
    },

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GenerateError {
    /// Create a Pool error with context about where it occurred
    pub fn pool(message: impl ToString, context: impl Into<String>) -> Self {
        GenerateError::Pool {
            message: message.to_string(),
            context: context.into(),
        }
    }

    /// Create an InvalidColumnMetadata error
    pub fn invalid_column(
        table: impl Into<String>,
        column: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        GenerateError::InvalidColumnMetadata {
            table: table.into(),
            column: column.into(),
            message: message.into(),
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }

    /// Map error variants to process exit codes for the CLI.
    pub fn exit_code(&self) -> u8 {
        match self {
            GenerateError::Config(_) | GenerateError::Yaml(_) | GenerateError::Json(_) => 2,
            GenerateError::Mysql(_) | GenerateError::Postgres(_) | GenerateError::Pool { .. } => 3,
            GenerateError::Introspection(_) | GenerateError::InvalidColumnMetadata { .. } => 4,
            GenerateError::Io(_) => 5,
        }
    }
}

/// Result type alias for generation operations.
pub type Result<T> = std::result::Result<T, GenerateError>;
