//! The schema-to-declaration mapping engine.
//!
//! Raw metadata snapshots flow in; DSL-agnostic declarative statements
//! flow out, assembled into per-table, per-view and per-foreign-key-set
//! blocks. Every mapper is a pure function of `(snapshot, config)`.

pub mod assembler;
pub mod columns;
pub mod foreign_keys;
pub mod indexes;
mod statement;

pub use assembler::{Artifact, ForeignKeyArtifact, TableArtifact, ViewArtifact};
pub use statement::{Modifier, Statement, Value};
