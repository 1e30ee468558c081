//! Structural operations.
//!
//! A compiled [`Blueprint`](crate::blueprint::Blueprint) is a list of these.
//! All names inside an operation are already resolved to physical names;
//! [`TableRef`] and [`NameRef`] keep the logical names around for
//! diagnostics.

use serde::{Deserialize, Serialize};

use crate::resolver::{NameRef, TableRef};
use crate::schema::{ColumnType, DefaultValue, ForeignKeyAction, IndexKind};

/// Definition of a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    /// Column name.
    pub name: String,
    /// Data type.
    pub column_type: ColumnType,
    /// Whether the column allows NULL values.
    pub nullable: bool,
    /// Default value.
    pub default: Option<DefaultValue>,
    /// Whether this column auto-increments.
    pub auto_increment: bool,
}

impl ColumnDefinition {
    /// Creates a NOT NULL column without default.
    #[must_use]
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: false,
            default: None,
            auto_increment: false,
        }
    }
}

/// A resolved index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDefinition {
    /// Index name.
    pub name: NameRef,
    /// Indexed columns, in declaration order.
    pub columns: Vec<String>,
    /// Index kind.
    pub kind: IndexKind,
}

/// A resolved foreign key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyDefinition {
    /// Constraint name.
    pub name: NameRef,
    /// Local columns.
    pub columns: Vec<String>,
    /// Referenced table.
    pub references: TableRef,
    /// Referenced columns.
    pub referenced_columns: Vec<String>,
    /// ON DELETE action.
    pub on_delete: Option<ForeignKeyAction>,
    /// ON UPDATE action.
    pub on_update: Option<ForeignKeyAction>,
}

/// A single structural operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operation {
    /// Create a table.
    CreateTable {
        /// Table.
        table: TableRef,
        /// Columns in declaration order.
        columns: Vec<ColumnDefinition>,
        /// Primary key, if declared.
        primary_key: Option<IndexDefinition>,
        /// Foreign keys declared with the table.
        foreign_keys: Vec<ForeignKeyDefinition>,
    },

    /// Add a column to an existing table.
    AddColumn {
        /// Table.
        table: TableRef,
        /// Column definition.
        column: ColumnDefinition,
    },

    /// Drop one or more columns.
    DropColumns {
        /// Table.
        table: TableRef,
        /// Column names, in request order.
        columns: Vec<String>,
    },

    /// Create an index (or add a primary key) on an existing table.
    CreateIndex {
        /// Table.
        table: TableRef,
        /// Index definition.
        index: IndexDefinition,
    },

    /// Drop an index (or the primary key).
    DropIndex {
        /// Table.
        table: TableRef,
        /// Index name.
        name: NameRef,
        /// Kind of the index being dropped.
        kind: IndexKind,
    },

    /// Add a foreign key to an existing table.
    AddForeignKey {
        /// Table.
        table: TableRef,
        /// Foreign key definition.
        foreign_key: ForeignKeyDefinition,
    },

    /// Drop a foreign key constraint.
    DropForeignKey {
        /// Table.
        table: TableRef,
        /// Constraint name.
        name: NameRef,
    },

    /// Drop a table.
    DropTable {
        /// Table.
        table: TableRef,
        /// Whether to use IF EXISTS.
        if_exists: bool,
    },
}

fn kind_label(kind: IndexKind) -> &'static str {
    match kind {
        IndexKind::Primary => "primary key",
        IndexKind::Unique => "unique index",
        IndexKind::Index => "index",
    }
}

impl Operation {
    /// Creates a DropTable operation.
    #[must_use]
    pub fn drop_table(table: TableRef) -> Self {
        Self::DropTable {
            table,
            if_exists: false,
        }
    }

    /// Creates a DropForeignKey operation.
    #[must_use]
    pub fn drop_foreign_key(table: TableRef, name: NameRef) -> Self {
        Self::DropForeignKey { table, name }
    }

    /// Returns the table this operation changes.
    #[must_use]
    pub fn table(&self) -> &TableRef {
        match self {
            Self::CreateTable { table, .. }
            | Self::AddColumn { table, .. }
            | Self::DropColumns { table, .. }
            | Self::CreateIndex { table, .. }
            | Self::DropIndex { table, .. }
            | Self::AddForeignKey { table, .. }
            | Self::DropForeignKey { table, .. }
            | Self::DropTable { table, .. } => table,
        }
    }

    /// Returns a human-readable description using logical table names.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::CreateTable { table, .. } => format!("create table '{}'", table.logical),
            Self::AddColumn { table, column } => {
                format!("add column '{}' to table '{}'", column.name, table.logical)
            }
            Self::DropColumns { table, columns } => format!(
                "drop column(s) '{}' from table '{}'",
                columns.join("', '"),
                table.logical
            ),
            Self::CreateIndex { table, index } => format!(
                "create {} '{}' on ({}) of table '{}'",
                kind_label(index.kind),
                index.name.logical,
                index.columns.join(", "),
                table.logical
            ),
            Self::DropIndex { table, name, kind } => format!(
                "drop {} '{}' of table '{}'",
                kind_label(*kind),
                name.logical,
                table.logical
            ),
            Self::AddForeignKey { table, foreign_key } => format!(
                "add foreign key '{}' ({}) referencing '{}' to table '{}'",
                foreign_key.name.logical,
                foreign_key.columns.join(", "),
                foreign_key.references.logical,
                table.logical
            ),
            Self::DropForeignKey { table, name } => format!(
                "drop foreign key '{}' from table '{}'",
                name.logical, table.logical
            ),
            Self::DropTable { table, .. } => format!("drop table '{}'", table.logical),
        }
    }
}
