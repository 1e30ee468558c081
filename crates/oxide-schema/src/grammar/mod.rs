//! DDL generation per dialect.
//!
//! A grammar turns a resolved [`Operation`] into the statements a backend
//! understands. Grammars are pure: they never touch a connection, which keeps
//! every statement they produce testable as a plain string.

mod postgres;
mod sqlite;

pub use postgres::PostgresGrammar;
pub use sqlite::SqliteGrammar;

use crate::error::Result;
use crate::operations::{ColumnDefinition, ForeignKeyDefinition, Operation};
use crate::schema::{ColumnType, DefaultValue, IdentifierCase};

/// Trait for database-specific DDL generation.
pub trait SchemaGrammar: Send + Sync {
    /// Returns the grammar name.
    fn name(&self) -> &'static str;

    /// How the backend compares identifiers.
    fn identifier_case(&self) -> IdentifierCase;

    /// Returns the SQL type name for the given type.
    fn type_name(&self, column_type: &ColumnType) -> String;

    /// Generates the statements for an operation, in execution order.
    ///
    /// Operations the backend cannot express fail with
    /// [`SchemaError::SchemaConflict`](crate::error::SchemaError::SchemaConflict).
    fn compile(&self, operation: &Operation) -> Result<Vec<String>>;

    /// Renders a default value.
    fn render_default(&self, default: &DefaultValue) -> String {
        default.to_sql()
    }

    /// Generates column definition SQL.
    fn column_definition(&self, column: &ColumnDefinition) -> String {
        let mut parts = vec![
            self.quote_identifier(&column.name),
            self.type_name(&column.column_type),
        ];

        if !column.nullable {
            parts.push("NOT NULL".to_string());
        }

        if let Some(ref default) = column.default {
            parts.push(format!("DEFAULT {}", self.render_default(default)));
        }

        parts.join(" ")
    }

    /// Generates a table-level foreign key constraint clause.
    fn foreign_key_clause(&self, foreign_key: &ForeignKeyDefinition) -> String {
        let mut sql = format!(
            "CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({})",
            self.quote_identifier(&foreign_key.name.physical),
            self.column_list(&foreign_key.columns),
            self.quote_identifier(&foreign_key.references.physical),
            self.column_list(&foreign_key.referenced_columns),
        );
        if let Some(action) = foreign_key.on_delete {
            sql.push_str(" ON DELETE ");
            sql.push_str(action.to_sql());
        }
        if let Some(action) = foreign_key.on_update {
            sql.push_str(" ON UPDATE ");
            sql.push_str(action.to_sql());
        }
        sql
    }

    /// Quotes and joins a list of column names.
    fn column_list(&self, columns: &[String]) -> String {
        columns
            .iter()
            .map(|c| self.quote_identifier(c))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Quote an identifier (table name, column name, etc.).
    fn quote_identifier(&self, name: &str) -> String {
        format!("\"{}\"", name.replace('"', "\"\""))
    }
}
