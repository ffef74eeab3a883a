//! # migrations-gen
//!
//! Generate Laravel migration files from an existing database schema.
//!
//! The library introspects a MySQL/MariaDB or PostgreSQL database and
//! emits declarative migration files that, when replayed, reconstruct
//! the schema:
//!
//! - **Schema snapshot** read from the system catalogs (tables, columns,
//!   indexes, foreign keys, views)
//! - **Minimal output**: arguments and names the DSL would infer anyway
//!   are omitted (default lengths, default precision/scale, convention
//!   index and constraint names)
//! - **Foreign keys as a separate pass** so constraints replay only once
//!   every referenced table exists
//! - **Squash mode** combining the whole schema into one migration file
//!
//! ## Example
//!
//! ```rust,no_run
//! use migrations_gen::{Config, Generator};
//!
//! #[tokio::main]
//! async fn main() -> migrations_gen::Result<()> {
//!     let config = Config::load("config.yaml")?;
//!     let generator = Generator::new(config).await?;
//!     let result = generator.run().await?;
//!     println!("Wrote {} migration files", result.files.len());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod drivers;
pub mod error;
pub mod generate;
pub mod naming;
pub mod orchestrator;
pub mod schema;
pub mod writer;

// Re-exports for convenient access
pub use config::{Config, ConnectionConfig, GeneratorConfig};
pub use error::{GenerateError, Result};
pub use orchestrator::{GenerateResult, Generator, HealthCheckResult};
pub use schema::{Column, ForeignKey, Index, IndexKind, SchemaReader, Table, View};
