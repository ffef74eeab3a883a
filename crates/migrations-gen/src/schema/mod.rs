//! Schema snapshot model and the introspection trait.

mod models;
mod traits;

pub use models::{Column, ColumnDefault, ForeignKey, Index, IndexKind, Table, View};
pub use traits::SchemaReader;
