//! Dependency-ordered teardown.
//!
//! Backends with a session-wide foreign key switch drop tables with
//! enforcement suspended. Others follow the [`DependencyGraph`] teardown
//! plan, dropping constraints first wherever foreign keys form a cycle.

use tracing::{info, warn};

use crate::adapter::SchemaAdapter;
use crate::blueprint::Blueprint;
use crate::builder::apply;
use crate::config::ConnectionConfig;
use crate::error::{Result, SchemaError};
use crate::grammar::SchemaGrammar;
use crate::graph::{DependencyGraph, TeardownStep};
use crate::operations::Operation;
use crate::predicates::check_columns_request;
use crate::resolver::IdentifierResolver;
use crate::schema::ColumnNames;

/// Drops tables and columns without tripping foreign keys.
pub struct Destroyer<'a, A: SchemaAdapter> {
    adapter: &'a mut A,
    config: &'a ConnectionConfig,
    resolver: IdentifierResolver,
}

impl<'a, A: SchemaAdapter> Destroyer<'a, A> {
    /// Creates a destroyer over a session's adapter.
    pub fn new(adapter: &'a mut A, config: &'a ConnectionConfig) -> Self {
        let case = adapter.grammar().identifier_case();
        Self {
            adapter,
            config,
            resolver: IdentifierResolver::new(config).with_case(case),
        }
    }

    /// Drops every table of the catalog, prefixed or not.
    ///
    /// Stops at the first failure. Returns the number of tables dropped.
    pub async fn drop_all_tables(&mut self) -> Result<usize> {
        let tables = self.adapter.list_tables().await?;
        if tables.is_empty() {
            return Ok(0);
        }

        info!(tables = tables.len(), "Dropping all tables");

        if self.adapter.supports_foreign_key_toggle() {
            self.drop_with_checks_disabled(&tables).await
        } else {
            self.drop_in_dependency_order(&tables).await
        }
    }

    async fn drop_with_checks_disabled(&mut self, tables: &[String]) -> Result<usize> {
        self.adapter.disable_foreign_key_checks().await?;

        let dropped = self.drop_tables(tables).await;
        let restored = self.adapter.enable_foreign_key_checks().await;

        // a failed drop is reported over a failed restore
        match (dropped, restored) {
            (Ok(count), Ok(())) => Ok(count),
            (Ok(_), Err(err)) => Err(err),
            (Err(err), Ok(())) => Err(err),
            (Err(err), Err(restore)) => {
                warn!(error = %restore, "Failed to re-enable foreign key checks");
                Err(err)
            }
        }
    }

    async fn drop_tables(&mut self, tables: &[String]) -> Result<usize> {
        for table in tables {
            let table = self.resolver.table_ref_from_physical(table);
            self.adapter.drop_table(&table).await?;
        }
        Ok(tables.len())
    }

    /// Loads the dependency graph of the given catalog tables.
    pub async fn dependency_graph(&mut self, tables: &[String]) -> Result<DependencyGraph> {
        let case = self.adapter.grammar().identifier_case();
        let mut graph = DependencyGraph::new();
        for table in tables {
            graph.add_table(table.as_str());
        }

        for table in tables {
            for foreign_key in self.adapter.list_foreign_keys(table).await? {
                // edges are keyed by the catalog spelling of the referenced table
                if let Some(referenced) = tables
                    .iter()
                    .find(|t| case.eq(t, &foreign_key.referenced_table))
                {
                    graph.add_edge(table, referenced, foreign_key.name);
                }
            }
        }

        Ok(graph)
    }

    async fn drop_in_dependency_order(&mut self, tables: &[String]) -> Result<usize> {
        let graph = self.dependency_graph(tables).await?;
        let mut dropped = 0;

        for step in graph.teardown_plan() {
            match step {
                TeardownStep::DropForeignKey { table, constraint } => {
                    let table = self.resolver.table_ref_from_physical(&table);
                    let Some(constraint) = constraint else {
                        return Err(SchemaError::SchemaConflict {
                            table: table.logical,
                            intent: "drop all tables".to_string(),
                            reason: "a foreign key cycle runs through an unnamed constraint"
                                .to_string(),
                        });
                    };
                    let name = self.resolver.index_ref_from_physical(&constraint);
                    self.adapter
                        .execute(&Operation::drop_foreign_key(table, name))
                        .await?;
                }
                TeardownStep::DropTable { table } => {
                    let table = self.resolver.table_ref_from_physical(&table);
                    self.adapter.drop_table(&table).await?;
                    dropped += 1;
                }
            }
        }

        Ok(dropped)
    }

    /// Drops one or more columns of a logical table.
    ///
    /// All columns go through a single structural operation; the grammar
    /// decides whether that is one statement or several.
    pub async fn drop_columns(&mut self, table: &str, columns: ColumnNames) -> Result<()> {
        check_columns_request(table, columns.len())?;

        let mut blueprint = Blueprint::alter(table);
        blueprint.drop_column(columns);
        apply(&mut *self.adapter, self.config, &self.resolver, &blueprint).await
    }
}
