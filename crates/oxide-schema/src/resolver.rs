//! Identifier resolution.
//!
//! Turns logical names (what callers write) into physical names (what the
//! catalog stores) and back. This is the only place where the connection
//! prefix is applied, so a name is never prefixed along two paths that could
//! disagree.

use serde::{Deserialize, Serialize};

use crate::config::ConnectionConfig;
use crate::schema::{IdentifierCase, IndexKind};
use crate::snapshot::ScopedName;

/// A table addressed by both of its names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableRef {
    /// Name as written by the caller.
    pub logical: String,
    /// Name as stored in the catalog.
    pub physical: String,
}

/// An index or constraint addressed by both of its names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NameRef {
    /// Name as written by the caller, or derived from logical names.
    pub logical: String,
    /// Name as stored in the catalog.
    pub physical: String,
}

impl NameRef {
    /// Pairs a logical name with its physical spelling.
    pub fn new(logical: impl Into<String>, physical: impl Into<String>) -> Self {
        Self {
            logical: logical.into(),
            physical: physical.into(),
        }
    }
}

fn strip_prefix<'a>(name: &'a str, prefix: &str, case: IdentifierCase) -> Option<&'a str> {
    let head = name.get(..prefix.len())?;
    case.eq(head, prefix)
        .then(|| &name[prefix.len()..])
        .filter(|rest| !rest.is_empty())
}

/// Applies and strips the connection prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierResolver {
    prefix: String,
    prefix_indexes: bool,
    case: IdentifierCase,
}

impl IdentifierResolver {
    /// Captures the naming settings of a configuration.
    #[must_use]
    pub fn new(config: &ConnectionConfig) -> Self {
        Self {
            prefix: config.prefix.clone(),
            prefix_indexes: config.prefix_indexes,
            case: IdentifierCase::Sensitive,
        }
    }

    /// Sets how catalog names are compared with the prefix when stripping it.
    #[must_use]
    pub fn with_case(mut self, case: IdentifierCase) -> Self {
        self.case = case;
        self
    }

    /// Returns the table prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the prefix applied to index and constraint names.
    #[must_use]
    pub fn index_prefix(&self) -> &str {
        if self.prefix_indexes {
            &self.prefix
        } else {
            ""
        }
    }

    /// Physical name of a logical table.
    #[must_use]
    pub fn table(&self, logical: &str) -> String {
        format!("{}{}", self.prefix, logical)
    }

    /// Both names of a logical table.
    #[must_use]
    pub fn table_ref(&self, logical: &str) -> TableRef {
        TableRef {
            logical: logical.to_string(),
            physical: self.table(logical),
        }
    }

    /// Builds a [`TableRef`] for a name read from the catalog.
    ///
    /// Tables outside the prefix keep their physical name as logical name.
    #[must_use]
    pub fn table_ref_from_physical(&self, physical: &str) -> TableRef {
        TableRef {
            logical: self.strip_table(physical).unwrap_or(physical).to_string(),
            physical: physical.to_string(),
        }
    }

    /// Logical name of a physical table, if the table is under the prefix.
    #[must_use]
    pub fn strip_table<'a>(&self, physical: &'a str) -> Option<&'a str> {
        strip_prefix(physical, &self.prefix, self.case)
    }

    /// Scopes a physical table name read from the catalog.
    #[must_use]
    pub fn scope_table(&self, physical: &str) -> ScopedName {
        match self.strip_table(physical) {
            Some(logical) => ScopedName::Managed(logical.to_string()),
            None => ScopedName::External(physical.to_string()),
        }
    }

    /// Physical name of a logical index or constraint name.
    #[must_use]
    pub fn index(&self, logical: &str) -> String {
        format!("{}{}", self.index_prefix(), logical)
    }

    /// Conventional, unprefixed name of an index on `columns` of a table.
    ///
    /// Always derived from the logical table name.
    #[must_use]
    pub fn derived_index_name(
        &self,
        logical_table: &str,
        columns: &[String],
        suffix: &str,
    ) -> String {
        let mut name = String::from(logical_table);
        for column in columns {
            name.push('_');
            name.push_str(column);
        }
        name.push('_');
        name.push_str(suffix);
        name.to_lowercase().replace(['-', '.'], "_")
    }

    /// Both names of a logical index or constraint name.
    #[must_use]
    pub fn index_ref(&self, logical: &str) -> NameRef {
        NameRef::new(logical, self.index(logical))
    }

    /// Both names of the conventional index on `columns` of a table.
    #[must_use]
    pub fn derived_index(
        &self,
        logical_table: &str,
        columns: &[String],
        kind: IndexKind,
    ) -> NameRef {
        self.index_ref(&self.derived_index_name(logical_table, columns, kind.suffix()))
    }

    /// Both names of the conventional foreign key on `columns` of a table.
    #[must_use]
    pub fn derived_foreign_key(&self, logical_table: &str, columns: &[String]) -> NameRef {
        self.index_ref(&self.derived_index_name(logical_table, columns, "foreign"))
    }

    /// Builds a [`NameRef`] for an index or constraint read from the catalog.
    ///
    /// Names outside the index prefix keep their physical name as logical
    /// name.
    #[must_use]
    pub fn index_ref_from_physical(&self, physical: &str) -> NameRef {
        NameRef::new(self.scope_index(physical).as_str(), physical)
    }

    /// Physical conventional name of an index on `columns` of a table.
    #[must_use]
    pub fn index_name(&self, logical_table: &str, columns: &[String], kind: IndexKind) -> String {
        self.derived_index(logical_table, columns, kind).physical
    }

    /// Physical conventional name of a foreign key on `columns` of a table.
    #[must_use]
    pub fn foreign_key_name(&self, logical_table: &str, columns: &[String]) -> String {
        self.derived_foreign_key(logical_table, columns).physical
    }

    /// Scopes a physical index or constraint name read from the catalog.
    #[must_use]
    pub fn scope_index(&self, physical: &str) -> ScopedName {
        match strip_prefix(physical, self.index_prefix(), self.case) {
            Some(logical) => ScopedName::Managed(logical.to_string()),
            None => ScopedName::External(physical.to_string()),
        }
    }
}
