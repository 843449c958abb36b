//! Error types for query building and execution

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Query errors
#[derive(Error, Debug)]
pub enum Error {
    /// The database rejected a statement. Carries the statement so it can
    /// be shown next to the message.
    #[error("Database error: {message} (in: {sql})")]
    Database { sql: String, message: String },

    /// The database could not be opened or inspected
    #[error("Connection error: {0}")]
    Connection(String),

    #[error(transparent)]
    Parse(#[from] arcadex_filter::Error),

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error(transparent)]
    Schema(#[from] arcadex_schema::SchemaError),
}

impl Error {
    pub fn database(sql: impl Into<String>, message: impl ToString) -> Self {
        Self::Database {
            sql: sql.into(),
            message: message.to_string(),
        }
    }
}
