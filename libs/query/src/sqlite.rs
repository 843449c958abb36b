//! SQLite executor backed by `rusqlite`.
//!
//! SQLite parses `x REGEXP y` but ships no implementation of it; the
//! connection gets a `regexp(pattern, text)` function backed by the `regex`
//! crate, with compiled patterns cached per statement.

use crate::error::{Error, Result};
use crate::executor::{Executor, Rows, Value};
use regex::Regex;
use rusqlite::functions::FunctionFlags;
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::Connection;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

impl From<SqlValue> for Value {
    fn from(value: SqlValue) -> Self {
        match value {
            SqlValue::Null => Self::Null,
            SqlValue::Integer(i) => Self::Integer(i),
            SqlValue::Real(r) => Self::Real(r),
            SqlValue::Text(s) => Self::Text(s),
            SqlValue::Blob(b) => Self::Blob(b),
        }
    }
}

/// Executor over one SQLite connection
#[derive(Debug)]
pub struct SqliteExecutor {
    connection: Connection,
}

impl SqliteExecutor {
    /// Open a database file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let connection = Connection::open(path)
            .map_err(|e| Error::Connection(format!("{}: {}", path.display(), e)))?;
        Self::from_connection(connection)
    }

    pub fn open_in_memory() -> Result<Self> {
        let connection =
            Connection::open_in_memory().map_err(|e| Error::Connection(e.to_string()))?;
        Self::from_connection(connection)
    }

    /// Wrap an existing connection, registering the REGEXP function on it
    pub fn from_connection(connection: Connection) -> Result<Self> {
        add_regexp_function(&connection).map_err(|e| Error::Connection(e.to_string()))?;
        Ok(Self { connection })
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Run a batch of statements (schema setup, fixtures)
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        self.connection
            .execute_batch(sql)
            .map_err(|e| Error::database(sql, e))
    }
}

fn add_regexp_function(connection: &Connection) -> rusqlite::Result<()> {
    connection.create_scalar_function(
        "regexp",
        2,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let regex: Arc<Regex> =
                ctx.get_or_create_aux(0, |pattern| -> std::result::Result<_, BoxError> {
                    Ok(Regex::new(pattern.as_str()?)?)
                })?;
            let text = match ctx.get_raw(1) {
                ValueRef::Null => return Ok(None),
                ValueRef::Integer(i) => i.to_string(),
                ValueRef::Real(r) => r.to_string(),
                ValueRef::Text(t) | ValueRef::Blob(t) => String::from_utf8_lossy(t).into_owned(),
            };
            Ok(Some(regex.is_match(&text)))
        },
    )
}

impl Executor for SqliteExecutor {
    fn execute(&self, sql: &str) -> Result<Rows> {
        let mut stmt = self
            .connection
            .prepare(sql)
            .map_err(|e| Error::database(sql, e))?;

        let columns: Vec<String> = stmt.column_names().iter().map(|&s| s.to_string()).collect();
        let width = columns.len();

        let mut rows = stmt.query([]).map_err(|e| Error::database(sql, e))?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().map_err(|e| Error::database(sql, e))? {
            let mut values = Vec::with_capacity(width);
            for idx in 0..width {
                let value: SqlValue = row.get(idx).map_err(|e| Error::database(sql, e))?;
                values.push(value.into());
            }
            out.push(values);
        }

        tracing::trace!(
            "Got {} row{}",
            out.len(),
            if out.len() == 1 { "" } else { "s" }
        );

        Ok(Rows { columns, rows: out })
    }

    fn table_names(&self) -> Result<HashSet<String>> {
        let sql = "SELECT name FROM sqlite_master \
                   WHERE type IN ('table', 'view') AND name NOT LIKE 'sqlite_%'";
        let rows = self.execute(sql)?;
        Ok(rows
            .rows
            .into_iter()
            .filter_map(|row| match row.into_iter().next() {
                Some(Value::Text(name)) => Some(name),
                _ => None,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regexp_function() {
        let db = SqliteExecutor::open_in_memory().unwrap();
        let rows = db
            .execute("SELECT 'Arkanoid' REGEXP '^Ar', 'Pac-Man' REGEXP '^Ar', NULL REGEXP 'x', 1984 REGEXP '^19'")
            .unwrap();
        assert_eq!(
            rows.rows,
            vec![vec![
                Value::Integer(1),
                Value::Integer(0),
                Value::Null,
                Value::Integer(1)
            ]]
        );
    }

    #[test]
    fn test_invalid_regexp_is_database_error() {
        let db = SqliteExecutor::open_in_memory().unwrap();
        let err = db.execute("SELECT 'a' REGEXP '('").unwrap_err();
        assert!(matches!(err, Error::Database { .. }));
    }

    #[test]
    fn test_table_names() {
        let db = SqliteExecutor::open_in_memory().unwrap();
        db.execute_batch("CREATE TABLE Games (id INTEGER); CREATE TABLE Drivers (game_id INTEGER);")
            .unwrap();
        let names = db.table_names().unwrap();
        assert!(names.contains("Games"));
        assert!(names.contains("Drivers"));
        assert_eq!(names.len(), 2);
    }
}
