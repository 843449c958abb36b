//! Query layer for game catalog databases
//!
//! - [`QueryBuilder`] assembles `SELECT ... FROM <base> <joins> [WHERE] [ORDER BY]`
//! - [`Executor`] is the database contract; [`SqliteExecutor`] implements it
//! - [`FilterSession`] ties both to the filter views and rolls back failed
//!   refilters

pub mod builder;
pub mod error;
pub mod executor;
pub mod session;
#[cfg(feature = "sqlite")]
pub mod sqlite;

// Re-export main types
pub use builder::{BuiltQuery, QueryBuilder, SortSpec};
pub use error::{Error, Result};
pub use executor::{Executor, Rows, Value};
pub use session::FilterSession;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteExecutor;
