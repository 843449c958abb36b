//! Join graph and resolver
//!
//! The graph is an immutable adjacency map from table id to the `LEFT JOIN`
//! clause that brings it in and the tables that clause depends on. Each query
//! build creates its own [`JoinResolver`], which tracks which tables have
//! already been emitted so a join never appears twice in one statement.
//!
//! Table ids are matched case-insensitively, like SQLite table names.

use crate::error::{Result, SchemaError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One `LEFT JOIN` clause plus the joins that must precede it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinSpec {
    pub table: String,
    #[serde(default)]
    pub dependencies: Vec<String>,
    pub clause: String,
    /// Physical table behind an aliased join (`Games AS Parents`)
    #[serde(default)]
    pub alias_of: Option<String>,
}

impl JoinSpec {
    pub fn new(table: impl Into<String>, clause: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            dependencies: Vec::new(),
            clause: clause.into(),
            alias_of: None,
        }
    }

    pub fn depends_on(mut self, table: impl Into<String>) -> Self {
        self.dependencies.push(table.into());
        self
    }

    pub fn alias_of(mut self, table: impl Into<String>) -> Self {
        self.alias_of = Some(table.into());
        self
    }

    /// The table that must exist in the database for this join to work
    pub fn physical_table(&self) -> &str {
        self.alias_of.as_deref().unwrap_or(&self.table)
    }
}

/// Immutable, validated catalog of join specs
#[derive(Debug, Clone, Default)]
pub struct JoinGraph {
    specs: Vec<JoinSpec>,
    /// Lower-cased table id -> position in `specs`
    index: HashMap<String, usize>,
    /// Dependency positions, parallel to `specs`
    deps: Vec<Vec<usize>>,
}

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

impl JoinGraph {
    /// Build the graph. Dependencies must name declared tables and must not
    /// form a cycle.
    pub fn new(specs: Vec<JoinSpec>) -> Result<Self> {
        let mut index = HashMap::with_capacity(specs.len());
        for (idx, spec) in specs.iter().enumerate() {
            if index.insert(spec.table.to_ascii_lowercase(), idx).is_some() {
                return Err(SchemaError::DuplicateJoin(spec.table.clone()));
            }
        }

        let deps = specs
            .iter()
            .map(|spec| {
                spec.dependencies
                    .iter()
                    .map(|dep| {
                        index.get(&dep.to_ascii_lowercase()).copied().ok_or_else(|| {
                            SchemaError::UnknownDependency {
                                table: spec.table.clone(),
                                dependency: dep.clone(),
                            }
                        })
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        let graph = Self { specs, index, deps };
        graph.check_cycles()?;
        Ok(graph)
    }

    fn position(&self, table: &str) -> Option<usize> {
        self.index.get(&table.to_ascii_lowercase()).copied()
    }

    fn check_cycles(&self) -> Result<()> {
        let mut marks = vec![Mark::Unvisited; self.specs.len()];
        for idx in 0..self.specs.len() {
            self.visit(idx, &mut marks)?;
        }
        Ok(())
    }

    fn visit(&self, idx: usize, marks: &mut [Mark]) -> Result<()> {
        match marks[idx] {
            Mark::Done => return Ok(()),
            Mark::InProgress => {
                return Err(SchemaError::DependencyCycle(self.specs[idx].table.clone()))
            }
            Mark::Unvisited => {}
        }
        marks[idx] = Mark::InProgress;
        for &dep in &self.deps[idx] {
            self.visit(dep, marks)?;
        }
        marks[idx] = Mark::Done;
        Ok(())
    }

    pub fn get(&self, table: &str) -> Option<&JoinSpec> {
        self.position(table).map(|idx| &self.specs[idx])
    }

    /// Physical tables a join on `table` touches: its own and those of every
    /// join it transitively depends on. Empty when no join is declared.
    pub fn physical_tables(&self, table: &str) -> Vec<&str> {
        let mut out = Vec::new();
        let Some(start) = self.position(table) else {
            return out;
        };
        let mut visited = vec![false; self.specs.len()];
        let mut stack = vec![start];
        while let Some(idx) = stack.pop() {
            if std::mem::replace(&mut visited[idx], true) {
                continue;
            }
            out.push(self.specs[idx].physical_table());
            stack.extend(self.deps[idx].iter().copied());
        }
        out
    }

    pub fn iter(&self) -> impl Iterator<Item = &JoinSpec> {
        self.specs.iter()
    }

    /// Start a fresh resolution pass for one query build
    pub fn resolver(&self) -> JoinResolver<'_> {
        JoinResolver {
            graph: self,
            emitted: vec![false; self.specs.len()],
        }
    }
}

/// Per-query working set over a [`JoinGraph`]
#[derive(Debug)]
pub struct JoinResolver<'g> {
    graph: &'g JoinGraph,
    emitted: Vec<bool>,
}

impl<'g> JoinResolver<'g> {
    /// Join clauses needed to reference `table`, dependencies first.
    ///
    /// Tables already emitted by this resolver contribute nothing, and
    /// tables without a join spec (the base table) need no join.
    pub fn resolve(&mut self, table: &str) -> Vec<&'g str> {
        let mut out = Vec::new();
        match self.graph.position(table) {
            Some(idx) => self.resolve_index(idx, &mut out),
            None => tracing::trace!(table, "no join declared for table"),
        }
        out
    }

    /// Resolve several tables in order, accumulating one duplicate-free list
    pub fn resolve_all<'a, I>(&mut self, tables: I) -> Vec<&'g str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut out = Vec::new();
        for table in tables {
            out.extend(self.resolve(table));
        }
        out
    }

    fn resolve_index(&mut self, idx: usize, out: &mut Vec<&'g str>) {
        if self.emitted[idx] {
            return;
        }
        let graph = self.graph;
        for &dep in &graph.deps[idx] {
            self.resolve_index(dep, out);
        }
        out.push(graph.specs[idx].clause.as_str());
        self.emitted[idx] = true;
    }

    pub fn is_emitted(&self, table: &str) -> bool {
        self.graph
            .position(table)
            .is_some_and(|idx| self.emitted[idx])
    }
}
