//! Column catalog
//!
//! Maps logical column ids to descriptors and resolves the identifiers that
//! appear in filter expressions (`table.field` or a bare, unambiguous
//! `field`) back to columns.

use crate::column::ColumnDescriptor;
use crate::error::{Result, SchemaError};
use std::collections::{HashMap, HashSet};

/// Read-only set of column descriptors, in display order
#[derive(Debug, Clone, Default)]
pub struct ColumnCatalog {
    columns: Vec<ColumnDescriptor>,
    by_id: HashMap<String, usize>,
}

impl ColumnCatalog {
    /// Build a catalog, rejecting duplicate ids and filterable columns that
    /// share a backing field
    pub fn new(columns: Vec<ColumnDescriptor>) -> Result<Self> {
        let mut by_id = HashMap::with_capacity(columns.len());
        let mut fields = HashSet::new();

        for (idx, column) in columns.iter().enumerate() {
            if by_id.insert(column.id.clone(), idx).is_some() {
                return Err(SchemaError::DuplicateColumn(column.id.clone()));
            }
            if let Some(source) = column.filter_field() {
                let key = (
                    source.table.to_ascii_lowercase(),
                    source.field.to_ascii_lowercase(),
                );
                if !fields.insert(key) {
                    return Err(SchemaError::DuplicateField {
                        table: source.table.clone(),
                        field: source.field.clone(),
                    });
                }
            }
        }

        Ok(Self { columns, by_id })
    }

    pub fn get(&self, id: &str) -> Option<&ColumnDescriptor> {
        self.by_id.get(id).map(|&idx| &self.columns[idx])
    }

    /// Display position of a column
    pub fn position(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        self.columns.iter()
    }

    pub fn filterable(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        self.columns.iter().filter(|c| c.filter_field().is_some())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Resolve an expression identifier to a filterable column.
    ///
    /// `table.field` must match exactly one column's source. A bare `field`
    /// resolves only when a single filterable column uses that field name.
    pub fn resolve_identifier(&self, ident: &str) -> Option<&ColumnDescriptor> {
        let ident = ident.trim();
        if let Some((table, field)) = ident.rsplit_once('.') {
            return self
                .filterable()
                .find(|c| c.source.as_ref().is_some_and(|s| s.matches(table, field)));
        }

        let mut candidates = self.filterable().filter(|c| {
            c.source
                .as_ref()
                .is_some_and(|s| s.field.eq_ignore_ascii_case(ident))
        });
        let first = candidates.next()?;
        if candidates.next().is_some() {
            tracing::debug!(identifier = ident, "ambiguous bare field name");
            return None;
        }
        Some(first)
    }

    /// Drop database-backed columns whose table is not available.
    /// UI-only columns are always kept.
    pub fn retain<F>(&mut self, mut table_available: F)
    where
        F: FnMut(&str) -> bool,
    {
        let before = self.columns.len();
        self.columns.retain(|c| match &c.source {
            Some(source) => table_available(&source.table),
            None => true,
        });
        if self.columns.len() != before {
            tracing::debug!(
                dropped = before - self.columns.len(),
                "removed columns backed by missing tables"
            );
        }
        self.by_id = self
            .columns
            .iter()
            .enumerate()
            .map(|(idx, c)| (c.id.clone(), idx))
            .collect();
    }
}
