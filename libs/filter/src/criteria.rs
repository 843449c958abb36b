//! Per-column criteria and their SQL rendering
//!
//! A [`FilterSet`] is what the column filter view edits: OR-combined rows of
//! AND-combined `column id -> criterion text` entries. Criterion text is a
//! small language of its own:
//!
//! | Text            | Predicate                          |
//! |-----------------|------------------------------------|
//! | `10~20`         | `field BETWEEN 10 AND 20`          |
//! | `/^Ar.*/`       | `field REGEXP '^Ar.*'`             |
//! | `>1990`, `<>x`  | `field > 1990`, `field <> 'x'`     |
//! | `=NULL`         | `field IS NULL`                    |
//! | `Pac%`          | `field LIKE 'Pac%'`                |
//! | `pac`           | `field LIKE '%pac%'`               |

use crate::escape::{
    criterion_parts, field_sql, has_unescaped_percent, is_numeric, like_sql, parse_like,
    parts_criterion, quote_literal, LikePart,
};
use arcadex_schema::{ColumnCatalog, FieldRef};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Comparison operators of the criterion language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    /// Prefixes in matching order; two character forms first
    const PREFIXES: [(&'static str, CompareOp); 6] = [
        ("<>", CompareOp::Ne),
        (">=", CompareOp::Ge),
        ("<=", CompareOp::Le),
        ("=", CompareOp::Eq),
        (">", CompareOp::Gt),
        ("<", CompareOp::Lt),
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "<>",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }

    /// The operator that keeps the meaning when the operands swap sides
    pub fn mirrored(self) -> Self {
        match self {
            Self::Lt => Self::Gt,
            Self::Le => Self::Ge,
            Self::Gt => Self::Lt,
            Self::Ge => Self::Le,
            other => other,
        }
    }

    fn strip_prefix(text: &str) -> Option<(Self, &str)> {
        Self::PREFIXES
            .iter()
            .find_map(|&(prefix, op)| text.strip_prefix(prefix).map(|rest| (op, rest)))
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A classified criterion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `lo~hi`, both numeric
    Between { low: String, high: String },
    /// `/pattern/`
    Regexp(String),
    /// `<op>value`
    Compare { op: CompareOp, value: String },
    /// `=NULL`
    IsNull,
    /// `<>NULL`
    IsNotNull,
    /// Text with an unescaped `%`, used as a LIKE pattern verbatim
    Like { pattern: String },
    /// Anything else: substring match
    Contains(String),
}

impl Predicate {
    /// Classify criterion text. Blank text is no criterion at all.
    pub fn classify(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        if let Some((low, high)) = text.split_once('~') {
            let (low, high) = (low.trim(), high.trim());
            if is_numeric(low) && is_numeric(high) {
                return Some(Self::Between {
                    low: low.to_string(),
                    high: high.to_string(),
                });
            }
        }

        if text.len() >= 2 && text.starts_with('/') && text.ends_with('/') {
            return Some(Self::Regexp(text[1..text.len() - 1].to_string()));
        }

        if let Some((op, value)) = CompareOp::strip_prefix(text) {
            let value = value.trim();
            return Some(match op {
                CompareOp::Eq if value.eq_ignore_ascii_case("NULL") => Self::IsNull,
                CompareOp::Ne if value.eq_ignore_ascii_case("NULL") => Self::IsNotNull,
                _ => Self::Compare {
                    op,
                    value: value.to_string(),
                },
            });
        }

        if has_unescaped_percent(text) {
            return Some(Self::Like {
                pattern: text.to_string(),
            });
        }

        Some(Self::Contains(text.to_string()))
    }

    /// Map a `LIKE pattern [ESCAPE esc]` back to a predicate.
    ///
    /// The escape character, when present, must be `\` and may only escape
    /// `\` or `%`. A pattern without wildcards has no criterion form.
    pub fn from_like(pattern: &str, escape: Option<&str>) -> Option<Self> {
        let parts = parse_like(pattern, escape)?;

        if let [LikePart::Wildcard, inner @ .., LikePart::Wildcard] = parts.as_slice() {
            if !inner.is_empty() && !inner.contains(&LikePart::Wildcard) {
                return parts_criterion(inner).map(Self::Contains);
            }
        }

        if parts.contains(&LikePart::Wildcard) {
            parts_criterion(&parts).map(|pattern| Self::Like { pattern })
        } else {
            None
        }
    }

    /// Render as one SQL term over `field`
    pub fn to_sql(&self, field: &FieldRef) -> String {
        let field = field_sql(field);
        match self {
            Self::Between { low, high } => format!("{} BETWEEN {} AND {}", field, low, high),
            Self::Regexp(pattern) => format!("{} REGEXP {}", field, quote_literal(pattern)),
            Self::Compare { op, value } if is_numeric(value) => {
                format!("{} {} {}", field, op, value)
            }
            Self::Compare { op, value } => {
                format!("{} {} {}", field, op, quote_literal(value))
            }
            Self::IsNull => format!("{} IS NULL", field),
            Self::IsNotNull => format!("{} IS NOT NULL", field),
            Self::Like { pattern } => like_sql(&field, &criterion_parts(pattern)),
            Self::Contains(value) => {
                let mut parts = vec![LikePart::Wildcard];
                parts.extend(criterion_parts(value));
                parts.push(LikePart::Wildcard);
                like_sql(&field, &parts)
            }
        }
    }

    /// Render as criterion text; the inverse of [`Predicate::classify`]
    pub fn to_criterion(&self) -> String {
        match self {
            Self::Between { low, high } => format!("{}~{}", low, high),
            Self::Regexp(pattern) => format!("/{}/", pattern),
            Self::Compare { op, value } => format!("{}{}", op, value),
            Self::IsNull => "=NULL".to_string(),
            Self::IsNotNull => "<>NULL".to_string(),
            Self::Like { pattern } => pattern.clone(),
            Self::Contains(value) => value.clone(),
        }
    }
}

/// One AND-combined row: column id -> criterion text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CriteriaRow(BTreeMap<String, String>);

impl CriteriaRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column's criterion, returning the previous one
    pub fn set(&mut self, column: impl Into<String>, criterion: impl Into<String>) -> Option<String> {
        self.0.insert(column.into(), criterion.into())
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.0.get(column).map(String::as_str)
    }

    pub fn remove(&mut self, column: &str) -> Option<String> {
        self.0.remove(column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.0.contains_key(column)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// No entry carries a non-blank criterion
    pub fn is_blank(&self) -> bool {
        self.0.values().all(|c| c.trim().is_empty())
    }

    /// SQL terms of this row in catalog order, skipping blank criteria and
    /// columns that cannot be filtered
    fn terms(&self, catalog: &ColumnCatalog) -> Vec<String> {
        let mut terms: Vec<(usize, String)> = Vec::with_capacity(self.0.len());
        for (id, criterion) in &self.0 {
            let Some(predicate) = Predicate::classify(criterion) else {
                continue;
            };
            let field = catalog.get(id).and_then(|c| c.filter_field());
            match (catalog.position(id), field) {
                (Some(position), Some(field)) => terms.push((position, predicate.to_sql(field))),
                _ => tracing::warn!(column = %id, "criterion on unknown or unfilterable column"),
            }
        }
        terms.sort_by_key(|(position, _)| *position);
        terms.into_iter().map(|(_, term)| term).collect()
    }
}

impl<K, V> FromIterator<(K, V)> for CriteriaRow
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// OR-combined criteria rows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSet {
    pub rows: Vec<CriteriaRow>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: CriteriaRow) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[CriteriaRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render as WHERE expression text (without the `WHERE` keyword).
    ///
    /// Each row becomes a parenthesized AND of its terms; rows are joined
    /// with `OR`. Rows without terms are skipped, so an empty or all-blank
    /// set renders as the empty string.
    pub fn to_sql_where(&self, catalog: &ColumnCatalog) -> String {
        self.rows
            .iter()
            .map(|row| row.terms(catalog))
            .filter(|terms| !terms.is_empty())
            .map(|terms| format!("({})", terms.join(" AND ")))
            .collect::<Vec<_>>()
            .join(" OR ")
    }
}

impl FromIterator<CriteriaRow> for FilterSet {
    fn from_iter<I: IntoIterator<Item = CriteriaRow>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}
