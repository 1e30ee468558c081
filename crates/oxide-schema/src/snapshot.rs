//! Prefix-normalized schema snapshots.
//!
//! A snapshot is a point-in-time read of the catalog in which every name
//! that carried the connection prefix has been stripped back to its logical
//! form.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::ColumnInfo;
use crate::error::Result;
use crate::schema::{ForeignKeyAction, IndexKind};

/// A catalog name seen through the connection prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "scope", content = "name", rename_all = "lowercase")]
pub enum ScopedName {
    /// The name carried the prefix; this is the logical name.
    Managed(String),
    /// The name did not carry the prefix; this is the catalog name verbatim.
    External(String),
}

impl ScopedName {
    /// Returns the name, whatever its scope.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Managed(name) | Self::External(name) => name,
        }
    }

    /// Returns the logical name when the name is managed.
    #[must_use]
    pub fn managed(&self) -> Option<&str> {
        match self {
            Self::Managed(name) => Some(name),
            Self::External(_) => None,
        }
    }
}

impl fmt::Display for ScopedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A snapshot of an index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSnapshot {
    /// Index name.
    pub name: ScopedName,
    /// Indexed columns, in index order.
    pub columns: Vec<String>,
    /// Index kind.
    pub kind: IndexKind,
}

/// A snapshot of a foreign key constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeySnapshot {
    /// Constraint name, when the backend keeps one.
    pub name: Option<ScopedName>,
    /// Local columns.
    pub columns: Vec<String>,
    /// Referenced table.
    pub referenced_table: ScopedName,
    /// Referenced columns.
    pub referenced_columns: Vec<String>,
    /// ON DELETE action.
    pub on_delete: ForeignKeyAction,
    /// ON UPDATE action.
    pub on_update: ForeignKeyAction,
}

/// A snapshot of a single table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSnapshot {
    /// Logical table name.
    pub name: String,
    /// Columns in catalog order.
    pub columns: Vec<ColumnInfo>,
    /// Indexes, including the primary key.
    pub indexes: Vec<IndexSnapshot>,
    /// Foreign key constraints.
    pub foreign_keys: Vec<ForeignKeySnapshot>,
}

impl TableSnapshot {
    /// Looks up a column by exact name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Returns the column names in catalog order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Returns the primary key index, if any.
    #[must_use]
    pub fn primary_key(&self) -> Option<&IndexSnapshot> {
        self.indexes.iter().find(|i| i.kind == IndexKind::Primary)
    }
}

/// A snapshot of every managed table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaSnapshot {
    /// Tables keyed by logical name, sorted for deterministic iteration.
    pub tables: BTreeMap<String, TableSnapshot>,
}

impl SchemaSnapshot {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a table snapshot.
    pub fn add_table(&mut self, table: TableSnapshot) {
        self.tables.insert(table.name.clone(), table);
    }

    /// Gets a table by logical name.
    #[must_use]
    pub fn table(&self, name: &str) -> Option<&TableSnapshot> {
        self.tables.get(name)
    }

    /// Returns logical table names.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Serializes the snapshot as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users() -> TableSnapshot {
        TableSnapshot {
            name: "users".to_string(),
            columns: vec![ColumnInfo {
                name: "id".to_string(),
                type_name: "INTEGER".to_string(),
                nullable: false,
                default: None,
                primary_key: true,
            }],
            indexes: vec![IndexSnapshot {
                name: ScopedName::External("primary".to_string()),
                columns: vec!["id".to_string()],
                kind: IndexKind::Primary,
            }],
            foreign_keys: vec![],
        }
    }

    #[test]
    fn test_table_lookup() {
        let mut snapshot = SchemaSnapshot::new();
        snapshot.add_table(users());

        let table = snapshot.table("users").unwrap();
        assert!(table.column("id").is_some());
        assert!(table.column("email").is_none());
        assert_eq!(table.primary_key().unwrap().columns, vec!["id"]);
        assert_eq!(snapshot.table_names().collect::<Vec<_>>(), vec!["users"]);
    }

    #[test]
    fn test_json_export() {
        let mut snapshot = SchemaSnapshot::new();
        snapshot.add_table(users());

        let json = snapshot.to_json().unwrap();
        assert!(json.contains("\"scope\": \"external\""));
        let back: SchemaSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }

    #[test]
    fn test_scoped_name() {
        let managed = ScopedName::Managed("users".to_string());
        assert_eq!(managed.managed(), Some("users"));
        assert_eq!(ScopedName::External("x".to_string()).managed(), None);
        assert_eq!(managed.to_string(), "users");
    }
}
