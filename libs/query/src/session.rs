//! Filter session: the state behind one result view.
//!
//! The session keeps the two filter views in sync. Editing criteria
//! regenerates the WHERE text, and editing the WHERE text re-derives the
//! criteria. Every change is first run against the database and only
//! committed once it succeeds, so a failed refilter leaves the columns,
//! sort, criteria, WHERE text and displayed rows exactly as they were.

use crate::builder::{BuiltQuery, QueryBuilder, SortSpec};
use crate::error::{Error, Result};
use crate::executor::{Executor, Rows};
use arcadex_filter::{criteria_from_sql, FilterSet};
use arcadex_schema::Schema;

/// Pending or committed view state
#[derive(Debug, Clone, Default, PartialEq)]
struct ViewState {
    columns: Vec<String>,
    sort: Vec<SortSpec>,
    criteria: FilterSet,
    where_text: String,
}

/// One filtered, sorted result view over a database
#[derive(Debug)]
pub struct FilterSession<E> {
    schema: Schema,
    executor: E,
    state: ViewState,
    query: Option<BuiltQuery>,
    rows: Rows,
}

impl<E: Executor> FilterSession<E> {
    /// Start a session showing every database-backed column, unfiltered and
    /// unsorted. Nothing is queried until the first refresh or edit.
    pub fn new(schema: Schema, executor: E) -> Self {
        let columns = schema
            .columns()
            .filterable()
            .map(|c| c.id.clone())
            .collect();
        Self {
            schema,
            executor,
            state: ViewState {
                columns,
                ..ViewState::default()
            },
            query: None,
            rows: Rows::default(),
        }
    }

    /// Start a session on an opened database, keeping only the columns
    /// whose tables exist there
    pub fn open(mut schema: Schema, executor: E) -> Result<Self> {
        let tables = executor.table_names()?;
        schema.retain_existing_tables(&tables);
        tracing::debug!(
            tables = tables.len(),
            columns = schema.columns().len(),
            "opened database"
        );
        Ok(Self::new(schema, executor))
    }

    /// Set the initial visible columns without querying
    pub fn with_columns<I, S>(mut self, columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        for id in &columns {
            self.check_column(id)?;
        }
        self.state.columns = columns;
        Ok(self)
    }

    /// Set the initial sort without querying
    pub fn with_sort(mut self, sort: Vec<SortSpec>) -> Result<Self> {
        for spec in &sort {
            self.check_column(&spec.column)?;
        }
        self.state.sort = sort;
        Ok(self)
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn rows(&self) -> &Rows {
        &self.rows
    }

    /// The statement behind the current rows
    pub fn query(&self) -> Option<&BuiltQuery> {
        self.query.as_ref()
    }

    pub fn visible_columns(&self) -> &[String] {
        &self.state.columns
    }

    pub fn sort(&self) -> &[SortSpec] {
        &self.state.sort
    }

    pub fn criteria(&self) -> &FilterSet {
        &self.state.criteria
    }

    pub fn where_text(&self) -> &str {
        &self.state.where_text
    }

    /// Re-run the current view
    pub fn refresh(&mut self) -> Result<&Rows> {
        let next = self.state.clone();
        self.apply(next)
    }

    pub fn set_visible_columns<I, S>(&mut self, columns: I) -> Result<&Rows>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        for id in &columns {
            self.check_column(id)?;
        }
        let next = ViewState {
            columns,
            ..self.state.clone()
        };
        self.apply(next)
    }

    /// Show a hidden column (appended at the end) or hide a shown one
    pub fn toggle_column(&mut self, id: &str) -> Result<&Rows> {
        self.check_column(id)?;
        let mut next = self.state.clone();
        match next.columns.iter().position(|c| c == id) {
            Some(idx) => {
                next.columns.remove(idx);
            }
            None => next.columns.push(id.to_string()),
        }
        self.apply(next)
    }

    pub fn set_sort(&mut self, sort: Vec<SortSpec>) -> Result<&Rows> {
        for spec in &sort {
            self.check_column(&spec.column)?;
        }
        let next = ViewState {
            sort,
            ..self.state.clone()
        };
        self.apply(next)
    }

    /// Replace the criteria; the WHERE text is regenerated from them
    pub fn set_criteria(&mut self, criteria: FilterSet) -> Result<&Rows> {
        let where_text = criteria.to_sql_where(self.schema.columns());
        let next = ViewState {
            criteria,
            where_text,
            ..self.state.clone()
        };
        self.apply(next)
    }

    /// Replace the WHERE text; the criteria are re-derived from it.
    ///
    /// Text that does not lex or parse is rejected before anything runs.
    pub fn set_where_text(&mut self, text: &str) -> Result<&Rows> {
        let criteria = criteria_from_sql(text, self.schema.columns()).map_err(|e| {
            tracing::warn!(error = %e, text, "failed to parse filter");
            Error::from(e)
        })?;
        let next = ViewState {
            criteria,
            where_text: text.trim().to_string(),
            ..self.state.clone()
        };
        self.apply(next)
    }

    fn check_column(&self, id: &str) -> Result<()> {
        if self.schema.columns().get(id).is_none() {
            return Err(Error::UnknownColumn(id.to_string()));
        }
        Ok(())
    }

    /// Build and run `next`; commit it only if the database accepts it
    fn apply(&mut self, next: ViewState) -> Result<&Rows> {
        let query = QueryBuilder::new(&self.schema)
            .with_columns(next.columns.iter().cloned())
            .with_where(next.where_text.as_str())
            .with_sort(next.sort.clone())
            .build();

        let rows = match self.executor.execute(&query.sql) {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!(error = %e, "refilter failed; keeping previous results");
                return Err(e);
            }
        };

        tracing::info!(rows = rows.len(), "refiltered");
        self.state = next;
        self.query = Some(query);
        self.rows = rows;
        Ok(&self.rows)
    }
}
