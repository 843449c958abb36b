//! Schema context for game catalog databases
//!
//! Describes which logical columns the browser can display and filter, the
//! database field behind each of them, and the `LEFT JOIN` graph needed to
//! reach every table from the base `Games` table.
//!
//! ```text
//! SchemaDefinition (JSON or built-in)
//!      |
//!   Schema::from_definition -> ColumnCatalog + JoinGraph (validated)
//!      |
//!   retain_existing_tables   (drop columns whose table is missing)
//!      |
//!   JoinGraph::resolver      (one per query build)
//! ```

pub mod builtin;
pub mod catalog;
pub mod column;
pub mod error;
pub mod join;
pub mod schema;

pub use catalog::ColumnCatalog;
pub use column::{ColumnDescriptor, EnumMapping, FieldRef, ValueType};
pub use error::{Result, SchemaError};
pub use join::{JoinGraph, JoinResolver, JoinSpec};
pub use schema::{Schema, SchemaDefinition};
