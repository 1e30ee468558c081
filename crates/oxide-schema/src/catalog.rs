//! Records read from a live catalog.
//!
//! Adapters return these keyed by physical names; the
//! [`Introspector`](crate::introspect::Introspector) turns them into
//! prefix-normalized snapshots.

use serde::{Deserialize, Serialize};

use crate::schema::{ForeignKeyAction, IndexKind};

/// A column as reported by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    /// Column name.
    pub name: String,
    /// Backend type name, verbatim.
    pub type_name: String,
    /// Whether the column accepts NULL.
    pub nullable: bool,
    /// Default expression, verbatim.
    pub default: Option<String>,
    /// Whether the column is part of the primary key.
    pub primary_key: bool,
}

/// An index as reported by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexInfo {
    /// Physical index name.
    pub name: String,
    /// Indexed columns, in index order.
    pub columns: Vec<String>,
    /// Index kind.
    pub kind: IndexKind,
}

/// A foreign key as reported by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyInfo {
    /// Physical constraint name, when the backend keeps one.
    pub name: Option<String>,
    /// Local columns, in key order.
    pub columns: Vec<String>,
    /// Physical name of the referenced table.
    pub referenced_table: String,
    /// Referenced columns, paired positionally with `columns`.
    pub referenced_columns: Vec<String>,
    /// ON DELETE action.
    pub on_delete: ForeignKeyAction,
    /// ON UPDATE action.
    pub on_update: ForeignKeyAction,
}
