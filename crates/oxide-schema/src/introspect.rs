//! Catalog introspection.
//!
//! The [`Introspector`] reads the live catalog through an adapter and
//! reports it in logical names. Every call re-queries the catalog; nothing is
//! cached between calls.

use tracing::debug;

use crate::adapter::SchemaAdapter;
use crate::catalog::{ForeignKeyInfo, IndexInfo};
use crate::error::Result;
use crate::grammar::SchemaGrammar;
use crate::resolver::IdentifierResolver;
use crate::schema::IdentifierCase;
use crate::snapshot::{ForeignKeySnapshot, IndexSnapshot, SchemaSnapshot, TableSnapshot};

/// Reads catalog state through the connection prefix.
pub struct Introspector<'a, A: SchemaAdapter> {
    adapter: &'a mut A,
    resolver: &'a IdentifierResolver,
}

impl<'a, A: SchemaAdapter> Introspector<'a, A> {
    /// Creates an introspector over a session's adapter.
    pub fn new(adapter: &'a mut A, resolver: &'a IdentifierResolver) -> Self {
        Self { adapter, resolver }
    }

    fn case(&self) -> IdentifierCase {
        self.adapter.grammar().identifier_case()
    }

    /// Catalog spelling of a logical table, if the table exists.
    pub async fn physical_table(&mut self, logical: &str) -> Result<Option<String>> {
        let physical = self.resolver.table(logical);
        let case = self.case();
        let tables = self.adapter.list_tables().await?;
        Ok(tables.into_iter().find(|t| case.eq(t, &physical)))
    }

    /// Returns true if the logical table exists.
    pub async fn has_table(&mut self, logical: &str) -> Result<bool> {
        Ok(self.physical_table(logical).await?.is_some())
    }

    /// Logical names of every table under the prefix, sorted.
    pub async fn table_names(&mut self) -> Result<Vec<String>> {
        let tables = self.adapter.list_tables().await?;
        let mut names: Vec<String> = tables
            .iter()
            .filter_map(|t| self.resolver.strip_table(t))
            .map(str::to_string)
            .collect();
        names.sort();
        Ok(names)
    }

    /// Column names of a logical table in catalog order.
    ///
    /// Empty when the table does not exist.
    pub async fn column_listing(&mut self, logical: &str) -> Result<Vec<String>> {
        let Some(physical) = self.physical_table(logical).await? else {
            return Ok(Vec::new());
        };
        let columns = self.adapter.list_columns(&physical).await?;
        Ok(columns.into_iter().map(|c| c.name).collect())
    }

    /// Snapshot of one logical table.
    pub async fn table(&mut self, logical: &str) -> Result<Option<TableSnapshot>> {
        match self.physical_table(logical).await? {
            Some(physical) => Ok(Some(self.read_table(logical, &physical).await?)),
            None => Ok(None),
        }
    }

    /// Snapshot of the managed tables.
    ///
    /// With `tables`, only those logical tables are read; names that do not
    /// exist are skipped.
    pub async fn snapshot(&mut self, tables: Option<&[&str]>) -> Result<SchemaSnapshot> {
        let case = self.case();
        let catalog = self.adapter.list_tables().await?;

        let mut snapshot = SchemaSnapshot::new();
        for physical in &catalog {
            let Some(logical) = self.resolver.strip_table(physical) else {
                continue;
            };
            if let Some(wanted) = tables {
                if !case.contains(wanted, logical) {
                    continue;
                }
            }
            let table = self.read_table(logical, physical).await?;
            snapshot.add_table(table);
        }

        debug!(
            tables = snapshot.tables.len(),
            prefix = %self.resolver.prefix(),
            "Read schema snapshot"
        );
        Ok(snapshot)
    }

    async fn read_table(&mut self, logical: &str, physical: &str) -> Result<TableSnapshot> {
        let columns = self.adapter.list_columns(physical).await?;
        let indexes = self.adapter.list_indexes(physical).await?;
        let foreign_keys = self.adapter.list_foreign_keys(physical).await?;

        Ok(TableSnapshot {
            name: logical.to_string(),
            columns,
            indexes: indexes.into_iter().map(|i| self.scope_index(i)).collect(),
            foreign_keys: foreign_keys
                .into_iter()
                .map(|fk| self.scope_foreign_key(fk))
                .collect(),
        })
    }

    fn scope_index(&self, index: IndexInfo) -> IndexSnapshot {
        IndexSnapshot {
            name: self.resolver.scope_index(&index.name),
            columns: index.columns,
            kind: index.kind,
        }
    }

    fn scope_foreign_key(&self, foreign_key: ForeignKeyInfo) -> ForeignKeySnapshot {
        ForeignKeySnapshot {
            name: foreign_key.name.map(|n| self.resolver.scope_index(&n)),
            columns: foreign_key.columns,
            referenced_table: self.resolver.scope_table(&foreign_key.referenced_table),
            referenced_columns: foreign_key.referenced_columns,
            on_delete: foreign_key.on_delete,
            on_update: foreign_key.on_update,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::SqliteAdapter;
    use crate::config::ConnectionConfig;
    use crate::snapshot::ScopedName;

    async fn adapter() -> SqliteAdapter {
        let mut adapter = SqliteAdapter::in_memory()
            .await
            .expect("Failed to create in-memory SQLite adapter");
        for sql in [
            "CREATE TABLE legacy (id INTEGER PRIMARY KEY)",
            "CREATE TABLE app_users (id INTEGER PRIMARY KEY, name TEXT)",
            "CREATE INDEX app_users_name_index ON app_users (name)",
            "CREATE TABLE app_posts (id INTEGER PRIMARY KEY, user_id INTEGER, legacy_id INTEGER, \
             FOREIGN KEY (user_id) REFERENCES app_users (id), \
             FOREIGN KEY (legacy_id) REFERENCES legacy (id))",
        ] {
            adapter.execute_statement(sql).await.unwrap();
        }
        adapter
    }

    fn resolver() -> IdentifierResolver {
        IdentifierResolver::new(&ConnectionConfig::sqlite().with_prefix("app_"))
            .with_case(IdentifierCase::Insensitive)
    }

    #[tokio::test]
    async fn test_snapshot_covers_managed_tables_only() {
        let mut adapter = adapter().await;
        let resolver = resolver();
        let mut introspector = Introspector::new(&mut adapter, &resolver);

        let snapshot = introspector.snapshot(None).await.unwrap();
        assert_eq!(
            snapshot.table_names().collect::<Vec<_>>(),
            vec!["posts", "users"]
        );

        let users = snapshot.table("users").unwrap();
        assert_eq!(
            users.indexes[1].name,
            ScopedName::Managed("users_name_index".to_string())
        );

        let posts = snapshot.table("posts").unwrap();
        let referenced: Vec<&ScopedName> = posts
            .foreign_keys
            .iter()
            .map(|fk| &fk.referenced_table)
            .collect();
        assert!(referenced.contains(&&ScopedName::Managed("users".to_string())));
        assert!(referenced.contains(&&ScopedName::External("legacy".to_string())));
    }

    #[tokio::test]
    async fn test_lookups_requery_the_catalog() {
        let mut adapter = adapter().await;
        let resolver = resolver();

        let mut introspector = Introspector::new(&mut adapter, &resolver);
        assert!(introspector.has_table("users").await.unwrap());
        assert!(!introspector.has_table("legacy").await.unwrap());
        assert_eq!(
            introspector.column_listing("users").await.unwrap(),
            vec!["id", "name"]
        );

        adapter
            .execute_statement("DROP TABLE app_posts")
            .await
            .unwrap();
        let mut introspector = Introspector::new(&mut adapter, &resolver);
        assert_eq!(introspector.table_names().await.unwrap(), vec!["users"]);
        assert!(introspector.table("posts").await.unwrap().is_none());
        assert!(introspector.column_listing("posts").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_filter() {
        let mut adapter = adapter().await;
        let resolver = resolver();
        let mut introspector = Introspector::new(&mut adapter, &resolver);

        let snapshot = introspector.snapshot(Some(&["users", "nope"])).await.unwrap();
        assert_eq!(snapshot.table_names().collect::<Vec<_>>(), vec!["users"]);
    }
}
