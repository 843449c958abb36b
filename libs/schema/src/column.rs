//! Column descriptors
//!
//! A column is identified by a stable logical id. Database-backed columns
//! carry the `(table, field)` pair they read from; UI-only columns such as
//! the details toggle carry none and are never filterable or sortable.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A `table.field` reference into the database
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldRef {
    pub table: String,
    pub field: String,
}

impl FieldRef {
    pub fn new(table: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            field: field.into(),
        }
    }

    /// Case-insensitive comparison, matching how SQLite treats identifiers
    pub fn matches(&self, table: &str, field: &str) -> bool {
        self.table.eq_ignore_ascii_case(table) && self.field.eq_ignore_ascii_case(field)
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table, self.field)
    }
}

/// Mapping from a stored integer to its display label
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<EnumEntry>", into = "Vec<EnumEntry>")]
pub struct EnumMapping(BTreeMap<i64, String>);

/// Serialized form of one enum mapping entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumEntry {
    pub value: i64,
    pub label: String,
}

impl From<Vec<EnumEntry>> for EnumMapping {
    fn from(entries: Vec<EnumEntry>) -> Self {
        Self(entries.into_iter().map(|e| (e.value, e.label)).collect())
    }
}

impl From<EnumMapping> for Vec<EnumEntry> {
    fn from(mapping: EnumMapping) -> Self {
        mapping
            .0
            .into_iter()
            .map(|(value, label)| EnumEntry { value, label })
            .collect()
    }
}

impl EnumMapping {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (i64, S)>,
        S: Into<String>,
    {
        Self(entries.into_iter().map(|(k, v)| (k, v.into())).collect())
    }

    pub fn label(&self, value: i64) -> Option<&str> {
        self.0.get(&value).map(String::as_str)
    }

    /// Reverse lookup; the first stored value carrying `label` wins
    pub fn value_of(&self, label: &str) -> Option<i64> {
        self.0
            .iter()
            .find(|(_, l)| l.eq_ignore_ascii_case(label))
            .map(|(v, _)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (i64, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

/// Value type of a column
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValueType {
    #[default]
    Text,
    Number,
    /// Stored as an integer, displayed through a label table
    Enum { labels: EnumMapping },
    /// Stores the id of another game
    GameId,
}

impl ValueType {
    /// Render a stored integer for display
    pub fn display_integer(&self, value: i64) -> String {
        match self {
            Self::Enum { labels } => labels
                .label(value)
                .map(str::to_string)
                .unwrap_or_else(|| value.to_string()),
            Self::GameId => format!("#{value}"),
            Self::Text | Self::Number => value.to_string(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Immutable description of one displayable column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub source: Option<FieldRef>,
    #[serde(default)]
    pub value_type: ValueType,
    #[serde(default = "default_true")]
    pub filterable: bool,
    #[serde(default = "default_true")]
    pub sortable: bool,
}

impl ColumnDescriptor {
    /// A database-backed text column
    pub fn field(
        id: impl Into<String>,
        label: impl Into<String>,
        table: impl Into<String>,
        field: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            source: Some(FieldRef::new(table, field)),
            value_type: ValueType::Text,
            filterable: true,
            sortable: true,
        }
    }

    /// A UI-only column with no backing field
    pub fn virtual_column(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            source: None,
            value_type: ValueType::Text,
            filterable: false,
            sortable: false,
        }
    }

    pub fn with_type(mut self, value_type: ValueType) -> Self {
        self.value_type = value_type;
        self
    }

    pub fn unsortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    /// Filterable columns always have a backing field
    pub fn filter_field(&self) -> Option<&FieldRef> {
        self.source.as_ref().filter(|_| self.filterable)
    }

    pub fn sort_field(&self) -> Option<&FieldRef> {
        self.source.as_ref().filter(|_| self.sortable)
    }

    pub fn enum_mapping(&self) -> Option<&EnumMapping> {
        match &self.value_type {
            ValueType::Enum { labels } => Some(labels),
            _ => None,
        }
    }
}
