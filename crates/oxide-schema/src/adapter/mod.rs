//! Backend adapters.
//!
//! An adapter owns the connection of one session. It executes what its
//! [`SchemaGrammar`] renders and reads the catalog back as physical-name
//! records. Everything above this layer is backend-agnostic.

mod postgres;
mod sqlite;

pub use postgres::PostgresAdapter;
pub use sqlite::SqliteAdapter;

use tracing::{debug, info};

use crate::catalog::{ColumnInfo, ForeignKeyInfo, IndexInfo};
use crate::config::Driver;
use crate::error::{Result, SchemaError};
use crate::grammar::SchemaGrammar;
use crate::operations::Operation;
use crate::resolver::TableRef;

/// Contract every backend implements.
///
/// Catalog listings take and return physical names. Methods take `&mut self`
/// because a session is used by one caller at a time.
#[allow(async_fn_in_trait)]
pub trait SchemaAdapter {
    /// Grammar used to render operations.
    type Grammar: SchemaGrammar;

    /// Driver implemented by this adapter.
    fn driver(&self) -> Driver;

    /// Returns the grammar.
    fn grammar(&self) -> &Self::Grammar;

    /// Executes one raw DDL statement.
    async fn execute_statement(&mut self, sql: &str) -> std::result::Result<(), sqlx::Error>;

    /// Compiles and executes a structural operation.
    ///
    /// Statements run in order and execution stops at the first failure.
    /// Database-reported failures become
    /// [`SchemaError::SchemaConflict`] naming the logical table.
    async fn execute(&mut self, operation: &Operation) -> Result<()> {
        let statements = self.grammar().compile(operation)?;

        info!(
            table = %operation.table().logical,
            operation = %operation.description(),
            grammar = self.grammar().name(),
            "Applying schema change"
        );

        for sql in statements {
            debug!(sql = %sql, "Executing SQL");
            self.execute_statement(&sql)
                .await
                .map_err(|e| SchemaError::from_statement(e, operation))?;
        }
        Ok(())
    }

    /// Drops a table.
    async fn drop_table(&mut self, table: &TableRef) -> Result<()> {
        self.execute(&Operation::drop_table(table.clone())).await
    }

    /// Lists every user table, excluding backend-internal ones.
    async fn list_tables(&mut self) -> Result<Vec<String>>;

    /// Lists the columns of a table in catalog order.
    ///
    /// Returns an empty list when the table does not exist.
    async fn list_columns(&mut self, table: &str) -> Result<Vec<ColumnInfo>>;

    /// Lists the indexes of a table, including the primary key.
    async fn list_indexes(&mut self, table: &str) -> Result<Vec<IndexInfo>>;

    /// Lists the foreign keys declared on a table.
    async fn list_foreign_keys(&mut self, table: &str) -> Result<Vec<ForeignKeyInfo>>;

    /// Whether the backend can suspend foreign key enforcement for the
    /// session.
    fn supports_foreign_key_toggle(&self) -> bool {
        false
    }

    /// Suspends foreign key enforcement. No-op without a toggle.
    async fn disable_foreign_key_checks(&mut self) -> Result<()> {
        Ok(())
    }

    /// Restores foreign key enforcement. No-op without a toggle.
    async fn enable_foreign_key_checks(&mut self) -> Result<()> {
        Ok(())
    }
}
