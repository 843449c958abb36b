//! Error types for filter expressions

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Filter expression errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Unterminated quoted, regex or delimited-identifier literal
    #[error("Lex error: {0}")]
    LexError(String),

    /// Blank input. Not a failure for callers: it means "no filter".
    #[error("Empty expression")]
    Empty,

    /// Malformed token sequence
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl Error {
    pub fn is_empty_input(&self) -> bool {
        matches!(self, Self::Empty)
    }
}
