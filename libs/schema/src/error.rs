//! Error types for schema loading

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Errors raised while assembling a schema. All of them are configuration
/// defects detected at load time; none can occur once a `Schema` exists.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Duplicate column id: {0}")]
    DuplicateColumn(String),

    #[error("Field {table}.{field} is bound to more than one filterable column")]
    DuplicateField { table: String, field: String },

    #[error("Duplicate join declared for table: {0}")]
    DuplicateJoin(String),

    #[error("Join for {table} depends on undeclared table {dependency}")]
    UnknownDependency { table: String, dependency: String },

    #[error("Join dependency cycle through table: {0}")]
    DependencyCycle(String),

    #[error("Invalid schema file: {0}")]
    Parse(#[from] serde_json::Error),
}
