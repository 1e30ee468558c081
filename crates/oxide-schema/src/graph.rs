//! Foreign key dependency graph.
//!
//! An edge runs from the table owning a foreign key to the table it
//! references. The graph may contain cycles; self references are never
//! recorded since they cannot block a drop.

use std::collections::{BTreeMap, BTreeSet};

use tracing::warn;

/// One step of a teardown plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeardownStep {
    /// Drop a foreign key constraint to break a cycle.
    DropForeignKey {
        /// Table owning the constraint.
        table: String,
        /// Constraint name, when the catalog reports one.
        constraint: Option<String>,
    },
    /// Drop a table.
    DropTable {
        /// Table name.
        table: String,
    },
}

/// Tables and the foreign keys between them.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    tables: BTreeSet<String>,
    // owner -> referenced -> constraint names
    edges: BTreeMap<String, BTreeMap<String, Vec<Option<String>>>>,
}

impl DependencyGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a table.
    pub fn add_table(&mut self, table: impl Into<String>) {
        self.tables.insert(table.into());
    }

    /// Records that `owner` references `referenced` through `constraint`.
    ///
    /// Returns false, recording nothing, for self references and for tables
    /// that were not added.
    pub fn add_edge(&mut self, owner: &str, referenced: &str, constraint: Option<String>) -> bool {
        if owner == referenced || !self.tables.contains(owner) || !self.tables.contains(referenced)
        {
            return false;
        }
        self.edges
            .entry(owner.to_string())
            .or_default()
            .entry(referenced.to_string())
            .or_default()
            .push(constraint);
        true
    }

    /// Returns the tables, sorted.
    pub fn tables(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(String::as_str)
    }

    /// Tables that `table` references.
    #[must_use]
    pub fn dependencies_of(&self, table: &str) -> Vec<&str> {
        self.edges
            .get(table)
            .map(|targets| targets.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Tables that reference `table`.
    #[must_use]
    pub fn dependents_of(&self, table: &str) -> Vec<&str> {
        self.edges
            .iter()
            .filter(|(_, targets)| targets.contains_key(table))
            .map(|(owner, _)| owner.as_str())
            .collect()
    }

    /// Returns true if the foreign keys form at least one cycle.
    #[must_use]
    pub fn has_cycle(&self) -> bool {
        // Kahn's algorithm: a cycle leaves tables that never reach in-degree 0
        let mut in_degree: BTreeMap<&str, usize> =
            self.tables.iter().map(|t| (t.as_str(), 0)).collect();
        for targets in self.edges.values() {
            for referenced in targets.keys() {
                if let Some(degree) = in_degree.get_mut(referenced.as_str()) {
                    *degree += 1;
                }
            }
        }

        let mut queue: Vec<&str> = in_degree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(table, _)| *table)
            .collect();
        let mut visited = 0;

        while let Some(table) = queue.pop() {
            visited += 1;
            for referenced in self.dependencies_of(table) {
                if let Some(degree) = in_degree.get_mut(referenced) {
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push(referenced);
                    }
                }
            }
        }

        visited != self.tables.len()
    }

    /// Orders the teardown of every table.
    ///
    /// Dependents are dropped before their dependencies. When only cycles
    /// remain, the incoming foreign keys of the lexicographically first
    /// remaining table are dropped first, which frees it.
    #[must_use]
    pub fn teardown_plan(&self) -> Vec<TeardownStep> {
        let mut remaining = self.tables.clone();
        let mut edges = self.edges.clone();
        let mut steps = Vec::with_capacity(self.tables.len());

        while !remaining.is_empty() {
            let ready: Vec<String> = remaining
                .iter()
                .filter(|table| {
                    !edges
                        .values()
                        .any(|targets| targets.contains_key(table.as_str()))
                })
                .cloned()
                .collect();

            if ready.is_empty() {
                let Some(victim) = remaining.iter().next().cloned() else {
                    break;
                };
                warn!(
                    table = %victim,
                    "Foreign keys form a cycle, dropping constraints that reference the table"
                );
                for (owner, targets) in &mut edges {
                    if let Some(constraints) = targets.remove(&victim) {
                        steps.extend(constraints.into_iter().map(|constraint| {
                            TeardownStep::DropForeignKey {
                                table: owner.clone(),
                                constraint,
                            }
                        }));
                    }
                }
                continue;
            }

            for table in ready {
                edges.remove(&table);
                remaining.remove(&table);
                steps.push(TeardownStep::DropTable { table });
            }
        }

        steps
    }
}
