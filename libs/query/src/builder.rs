//! SELECT statement builder.
//!
//! Builds one statement from:
//! - the visible columns (plus the schema's required fields)
//! - a WHERE expression, re-rendered as canonical SQL when it parses (so
//!   `/regex/` literals become quoted strings) and passed through otherwise
//! - sort specs
//!
//! Joins are resolved only for the tables actually referenced by the
//! selected and sorted columns, and by the WHERE text when it parses.

use arcadex_filter::{field_sql, try_parse};
use arcadex_schema::Schema;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// One ORDER BY entry, by logical column id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub column: String,
    pub ascending: bool,
}

impl SortSpec {
    pub fn ascending(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: true,
        }
    }

    pub fn descending(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: false,
        }
    }
}

/// Parses `column`, `column:asc` or `column:desc`
impl FromStr for SortSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (column, direction) = match s.split_once(':') {
            Some((column, direction)) => (column.trim(), Some(direction.trim())),
            None => (s.trim(), None),
        };
        if column.is_empty() {
            return Err(format!("missing column in sort spec '{}'", s));
        }
        let ascending = match direction.map(str::to_ascii_lowercase).as_deref() {
            None | Some("asc") => true,
            Some("desc") => false,
            Some(other) => return Err(format!("unknown sort direction '{}'", other)),
        };
        Ok(Self {
            column: column.to_string(),
            ascending,
        })
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dir = if self.ascending { "asc" } else { "desc" };
        write!(f, "{}:{}", self.column, dir)
    }
}

/// A generated statement and the shape of its result rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltQuery {
    pub sql: String,
    /// Number of leading required fields in each row
    pub required: usize,
    /// Visible column ids, in the order their values follow the required fields
    pub columns: Vec<String>,
}

impl BuiltQuery {
    /// Index of a visible column's value within a result row
    pub fn value_index(&self, column: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|idx| self.required + idx)
    }
}

/// Query builder over one schema
#[derive(Debug, Clone)]
pub struct QueryBuilder<'s> {
    schema: &'s Schema,
    columns: Vec<String>,
    where_text: String,
    sort: Vec<SortSpec>,
}

impl<'s> QueryBuilder<'s> {
    pub fn new(schema: &'s Schema) -> Self {
        Self {
            schema,
            columns: Vec::new(),
            where_text: String::new(),
            sort: Vec::new(),
        }
    }

    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// WHERE expression text, without the keyword. Blank means no filter.
    pub fn with_where(mut self, where_text: impl Into<String>) -> Self {
        self.where_text = where_text.into();
        self
    }

    pub fn with_sort(mut self, sort: Vec<SortSpec>) -> Self {
        self.sort = sort;
        self
    }

    pub fn build(&self) -> BuiltQuery {
        let catalog = self.schema.columns();
        let mut tables: Vec<&'s str> = Vec::new();

        let mut select: Vec<String> = self
            .schema
            .required_fields()
            .iter()
            .map(|field| {
                tables.push(&field.table);
                field_sql(field)
            })
            .collect();
        let required = select.len();

        let mut columns = Vec::with_capacity(self.columns.len());
        let mut seen = HashSet::new();
        for id in &self.columns {
            if !seen.insert(id.as_str()) {
                continue;
            }
            let Some(column) = catalog.get(id) else {
                tracing::warn!(column = %id, "unknown column requested; skipped");
                continue;
            };
            let Some(field) = column.filter_field() else {
                // UI-only columns have nothing to select
                continue;
            };
            tables.push(&field.table);
            select.push(field_sql(field));
            columns.push(id.clone());
        }

        let order_by = self.order_by(&mut tables);

        let mut where_sql = self.where_text.trim().to_string();
        if let Some(ast) = try_parse(&where_sql) {
            for ident in ast.identifiers() {
                let column = catalog.resolve_identifier(ident);
                if let Some(field) = column.and_then(|c| c.filter_field()) {
                    tables.push(&field.table);
                }
            }
            where_sql = ast.to_string();
        }

        let mut resolver = self.schema.joins().resolver();
        let joins = resolver.resolve_all(tables);

        let mut sql = format!(
            "SELECT {} FROM {}",
            select.join(", "),
            self.schema.base_table()
        );
        for clause in &joins {
            sql.push(' ');
            sql.push_str(clause);
        }
        if !where_sql.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&where_sql);
        }
        if !order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&order_by.join(", "));
        }

        tracing::debug!(sql = %sql, joins = joins.len(), "built query");

        BuiltQuery {
            sql,
            required,
            columns,
        }
    }

    fn order_by(&self, tables: &mut Vec<&'s str>) -> Vec<String> {
        let catalog = self.schema.columns();
        let mut order_by = Vec::with_capacity(self.sort.len());
        for s in &self.sort {
            let Some(field) = catalog.get(&s.column).and_then(|c| c.sort_field()) else {
                tracing::warn!(column = %s.column, "column is unknown or not sortable; skipped");
                continue;
            };
            let dir = if s.ascending { "ASC" } else { "DESC" };
            tables.push(&field.table);
            order_by.push(format!("{} {}", field_sql(field), dir));
        }
        order_by
    }
}
