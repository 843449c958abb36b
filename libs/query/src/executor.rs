//! Database executor contract and result rows

use crate::error::Result;
use arcadex_schema::ValueType;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// A single result value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Render for display in a column of the given type: enum values show
    /// their label, game references show as `#id`, NULL shows as nothing
    pub fn display(&self, value_type: &ValueType) -> String {
        match self {
            Self::Null => String::new(),
            Self::Integer(i) => value_type.display_integer(*i),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Integer(i) => write!(f, "{}", i),
            Self::Real(r) => write!(f, "{}", r),
            Self::Text(s) => f.write_str(s),
            Self::Blob(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

/// Result set of one statement
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Rows {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Rows {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Runs assembled SQL against a database
pub trait Executor {
    /// Execute one statement. Syntax and runtime failures are reported as
    /// [`Error::Database`](crate::Error::Database) carrying the statement.
    fn execute(&self, sql: &str) -> Result<Rows>;

    /// Names of the tables present in the database
    fn table_names(&self) -> Result<HashSet<String>>;
}

impl<E: Executor + ?Sized> Executor for &E {
    fn execute(&self, sql: &str) -> Result<Rows> {
        (**self).execute(sql)
    }

    fn table_names(&self) -> Result<HashSet<String>> {
        (**self).table_names()
    }
}
