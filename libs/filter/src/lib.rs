//! Filter expression engine
//!
//! A small WHERE-clause language and its two views:
//! 1. **Lexer / Parser** -> AST (precedence-correct tree of operators)
//! 2. **Translator** AST -> [`FilterSet`] (per-column criteria rows)
//! 3. **Serializer** [`FilterSet`] -> WHERE text
//!
//! ```text
//! WHERE text --tokenize--> tokens --parse--> AST --flatten--> AST
//!     ^                                                        |
//!     |                                                  interpret
//!     |                                                        v
//!     +---------------------- to_sql_where ---------------- FilterSet
//! ```
//!
//! The free text is always authoritative. Terms that have no per-column
//! form are left out of the criteria but never out of the SQL.

pub mod ast;
pub mod criteria;
pub mod error;
pub mod escape;
pub mod flatten;
pub mod lexer;
pub mod parser;
pub mod token;
pub mod translate;

// Re-export main types
pub use ast::{AstNode, LeafKind, Operator};
pub use criteria::{CompareOp, CriteriaRow, FilterSet, Predicate};
pub use error::{Error, Result};
pub use escape::{field_sql, quote_literal};
pub use flatten::{flatten, flatten_all};
pub use lexer::tokenize;
pub use parser::parse;
pub use token::{Keyword, LiteralKind, Token, TokenType};
pub use translate::{interpret_column_operation, interpret_expression};

use arcadex_schema::ColumnCatalog;

/// Parse, reporting any failure (including blank input) as `None`
pub fn try_parse(input: &str) -> Option<AstNode> {
    parse(input).ok()
}

/// Derive criteria from WHERE text. Blank text is an empty filter set;
/// lexical and syntax errors are returned so the caller can report them.
pub fn criteria_from_sql(input: &str, catalog: &ColumnCatalog) -> Result<FilterSet> {
    match parse(input) {
        Ok(ast) => Ok(interpret_expression(ast, catalog)),
        Err(e) if e.is_empty_input() => Ok(FilterSet::new()),
        Err(e) => Err(e),
    }
}
