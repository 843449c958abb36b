//! Schema context: everything the filter engine needs to know about one
//! opened database

use crate::catalog::ColumnCatalog;
use crate::column::{ColumnDescriptor, FieldRef};
use crate::error::Result;
use crate::join::{JoinGraph, JoinSpec};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Serializable schema description, as stored in a schema file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDefinition {
    pub base_table: String,
    /// Structural fields selected by every query (primary key, screenshot
    /// path, run target)
    #[serde(default)]
    pub required_fields: Vec<FieldRef>,
    pub columns: Vec<ColumnDescriptor>,
    #[serde(default)]
    pub joins: Vec<JoinSpec>,
}

/// Validated, read-only schema context
#[derive(Debug, Clone)]
pub struct Schema {
    base_table: String,
    required_fields: Vec<FieldRef>,
    columns: ColumnCatalog,
    joins: JoinGraph,
}

impl Schema {
    pub fn from_definition(definition: SchemaDefinition) -> Result<Self> {
        Ok(Self {
            base_table: definition.base_table,
            required_fields: definition.required_fields,
            columns: ColumnCatalog::new(definition.columns)?,
            joins: JoinGraph::new(definition.joins)?,
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let definition: SchemaDefinition = serde_json::from_str(json)?;
        Self::from_definition(definition)
    }

    pub fn base_table(&self) -> &str {
        &self.base_table
    }

    pub fn required_fields(&self) -> &[FieldRef] {
        &self.required_fields
    }

    pub fn columns(&self) -> &ColumnCatalog {
        &self.columns
    }

    pub fn joins(&self) -> &JoinGraph {
        &self.joins
    }

    /// Keep only the columns whose backing table exists in the opened
    /// database, along with every table its join chain passes through.
    /// `tables` holds the physical table names reported by it.
    pub fn retain_existing_tables(&mut self, tables: &HashSet<String>) {
        let available: HashSet<String> = tables.iter().map(|t| t.to_ascii_lowercase()).collect();
        let joins = &self.joins;
        let base = self.base_table.to_ascii_lowercase();
        let exists = |table: &str| {
            let table = table.to_ascii_lowercase();
            table == base || available.contains(&table)
        };
        self.columns.retain(|table| {
            let chain = joins.physical_tables(table);
            if chain.is_empty() {
                exists(table)
            } else {
                chain.into_iter().all(exists)
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = r#"{
        "base_table": "Games",
        "required_fields": [{"table": "Games", "field": "id"}],
        "columns": [
            {"id": "name", "label": "Name", "source": {"table": "Games", "field": "name"}},
            {"id": "parent", "label": "Parent", "source": {"table": "Parents", "field": "name"}},
            {"id": "manufacturer", "label": "Manufacturer",
             "source": {"table": "Manufacturers", "field": "name"}}
        ],
        "joins": [
            {"table": "Parents", "alias_of": "Games",
             "clause": "LEFT JOIN Games AS Parents ON Parents.id = Games.clone_of"},
            {"table": "Manufacturers",
             "clause": "LEFT JOIN Manufacturers ON Manufacturers.id = Games.manufacturer_id"}
        ]
    }"#;

    #[test]
    fn test_from_json() {
        let schema = Schema::from_json(SCHEMA).unwrap();
        assert_eq!(schema.base_table(), "Games");
        assert_eq!(schema.required_fields().len(), 1);
        assert_eq!(schema.columns().len(), 3);
        assert!(schema.joins().get("Parents").is_some());
    }

    #[test]
    fn test_retain_existing_tables_follows_aliases() {
        let mut schema = Schema::from_json(SCHEMA).unwrap();
        let tables: HashSet<String> = ["games".to_string()].into_iter().collect();
        schema.retain_existing_tables(&tables);
        assert!(schema.columns().get("name").is_some());
        assert!(schema.columns().get("parent").is_some());
        assert!(schema.columns().get("manufacturer").is_none());
    }

    #[test]
    fn test_retain_existing_tables_requires_link_tables() {
        let mut schema = crate::builtin::schema().unwrap();
        let tables: HashSet<String> = ["Games", "Categories"].iter().map(|t| t.to_string()).collect();
        schema.retain_existing_tables(&tables);
        assert!(schema.columns().get("name").is_some());
        assert!(schema.columns().get("category").is_none());

        let mut schema = crate::builtin::schema().unwrap();
        let tables: HashSet<String> = ["Games", "Categories", "GameCategories"]
            .iter()
            .map(|t| t.to_string())
            .collect();
        schema.retain_existing_tables(&tables);
        assert!(schema.columns().get("category").is_some());
    }

    #[test]
    fn test_column_table_matches_join_regardless_of_case() {
        let json = SCHEMA.replace(
            r#"{"table": "Manufacturers", "field": "name"}"#,
            r#"{"table": "manufacturers", "field": "name"}"#,
        );
        let mut schema = Schema::from_json(&json).unwrap();
        assert!(schema.joins().get("manufacturers").is_some());

        let tables: HashSet<String> = ["Games", "Manufacturers"].iter().map(|t| t.to_string()).collect();
        schema.retain_existing_tables(&tables);
        assert!(schema.columns().get("manufacturer").is_some());
    }

    #[test]
    fn test_invalid_json() {
        assert!(Schema::from_json("{").is_err());
    }
}
