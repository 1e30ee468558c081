//! Schema session.
//!
//! A [`SchemaBuilder`] binds one adapter, and so one connection, to one
//! [`ConnectionConfig`]. Every public operation takes logical names.

use tracing::info;

use crate::adapter::SchemaAdapter;
use crate::blueprint::Blueprint;
use crate::config::ConnectionConfig;
use crate::destroy::Destroyer;
use crate::error::{Result, SchemaError};
use crate::grammar::SchemaGrammar;
use crate::introspect::Introspector;
use crate::operations::Operation;
use crate::predicates::{
    self, check_columns_request, check_foreign_key_request, check_index_request,
};
use crate::resolver::IdentifierResolver;
use crate::schema::ColumnNames;
use crate::snapshot::SchemaSnapshot;

/// Compiles a blueprint against the live table and executes it.
pub(crate) async fn apply<A: SchemaAdapter>(
    adapter: &mut A,
    config: &ConnectionConfig,
    resolver: &IdentifierResolver,
    blueprint: &Blueprint,
) -> Result<()> {
    let physical = Introspector::new(&mut *adapter, resolver)
        .physical_table(blueprint.table())
        .await?;
    let (columns, indexes) = match (blueprint.is_create(), physical) {
        (true, None) => (Vec::new(), Vec::new()),
        (true, Some(_)) => {
            return Err(SchemaError::SchemaConflict {
                table: blueprint.table().to_string(),
                intent: "create table".to_string(),
                reason: "table already exists".to_string(),
            });
        }
        (false, None) => {
            return Err(SchemaError::SchemaConflict {
                table: blueprint.table().to_string(),
                intent: "alter table".to_string(),
                reason: "table does not exist".to_string(),
            });
        }
        (false, Some(physical)) => {
            let columns: Vec<String> = adapter
                .list_columns(&physical)
                .await?
                .into_iter()
                .map(|c| c.name)
                .collect();
            (columns, adapter.list_indexes(&physical).await?)
        }
    };

    let case = adapter.grammar().identifier_case();
    let operations = blueprint.compile(config, &columns, &indexes, case)?;
    for operation in &operations {
        adapter.execute(operation).await?;
    }
    Ok(())
}

/// A schema session over one connection.
pub struct SchemaBuilder<A: SchemaAdapter> {
    adapter: A,
    config: ConnectionConfig,
    resolver: IdentifierResolver,
}

impl<A: SchemaAdapter> SchemaBuilder<A> {
    /// Opens a session.
    ///
    /// Fails with [`SchemaError::DriverMismatch`] when the configuration
    /// names another backend than the adapter's.
    pub fn new(adapter: A, config: ConnectionConfig) -> Result<Self> {
        if adapter.driver() != config.driver {
            return Err(SchemaError::DriverMismatch {
                expected: adapter.driver(),
                actual: config.driver,
            });
        }
        let resolver =
            IdentifierResolver::new(&config).with_case(adapter.grammar().identifier_case());
        Ok(Self {
            adapter,
            config,
            resolver,
        })
    }

    /// Returns the session configuration.
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Returns the identifier resolver.
    pub fn resolver(&self) -> &IdentifierResolver {
        &self.resolver
    }

    /// Returns the adapter.
    pub fn adapter(&mut self) -> &mut A {
        &mut self.adapter
    }

    /// Consumes the session, returning the adapter.
    pub fn into_adapter(self) -> A {
        self.adapter
    }

    fn introspector(&mut self) -> Introspector<'_, A> {
        Introspector::new(&mut self.adapter, &self.resolver)
    }

    fn destroyer(&mut self) -> Destroyer<'_, A> {
        Destroyer::new(&mut self.adapter, &self.config)
    }

    /// Creates a table.
    ///
    /// ```rust,ignore
    /// schema.create("users", |table| {
    ///     table.id();
    ///     table.string("email").unique();
    /// }).await?;
    /// ```
    pub async fn create<F>(&mut self, table: &str, define: F) -> Result<()>
    where
        F: FnOnce(&mut Blueprint),
    {
        let mut blueprint = Blueprint::create(table);
        define(&mut blueprint);
        apply(&mut self.adapter, &self.config, &self.resolver, &blueprint).await
    }

    /// Alters an existing table.
    pub async fn table<F>(&mut self, table: &str, define: F) -> Result<()>
    where
        F: FnOnce(&mut Blueprint),
    {
        let mut blueprint = Blueprint::alter(table);
        define(&mut blueprint);
        apply(&mut self.adapter, &self.config, &self.resolver, &blueprint).await
    }

    /// Drops a table; fails if it does not exist.
    pub async fn drop(&mut self, table: &str) -> Result<()> {
        let table = self.resolver.table_ref(table);
        self.adapter.drop_table(&table).await
    }

    /// Drops a table if it exists.
    pub async fn drop_if_exists(&mut self, table: &str) -> Result<()> {
        let operation = Operation::DropTable {
            table: self.resolver.table_ref(table),
            if_exists: true,
        };
        self.adapter.execute(&operation).await
    }

    /// Drops one or more columns of a table.
    pub async fn drop_columns(
        &mut self,
        table: &str,
        columns: impl Into<ColumnNames>,
    ) -> Result<()> {
        self.destroyer().drop_columns(table, columns.into()).await
    }

    /// Drops every table of the catalog. Returns how many were dropped.
    pub async fn drop_all_tables(&mut self) -> Result<usize> {
        let dropped = self.destroyer().drop_all_tables().await?;
        info!(dropped, "Dropped all tables");
        Ok(dropped)
    }

    /// Returns true if the table exists.
    pub async fn has_table(&mut self, table: &str) -> Result<bool> {
        self.introspector().has_table(table).await
    }

    /// Returns true if the table exists and has the column.
    pub async fn has_column(&mut self, table: &str, column: &str) -> Result<bool> {
        self.has_columns(table, &[column]).await
    }

    /// Returns true if the table exists and has every listed column.
    pub async fn has_columns<S: AsRef<str>>(&mut self, table: &str, columns: &[S]) -> Result<bool> {
        check_columns_request(table, columns.len())?;
        let case = self.adapter.grammar().identifier_case();
        let Some(snapshot) = self.introspector().table(table).await? else {
            return Ok(false);
        };
        Ok(columns
            .iter()
            .all(|c| predicates::has_column(&snapshot, c.as_ref(), case)))
    }

    /// Returns true if the table has an index on exactly `columns`.
    ///
    /// With `name`, the index must also carry that logical name; `"primary"`
    /// designates the primary key.
    pub async fn has_index<S: AsRef<str>>(
        &mut self,
        table: &str,
        columns: &[S],
        name: Option<&str>,
    ) -> Result<bool> {
        check_index_request(table, columns.len())?;
        let case = self.adapter.grammar().identifier_case();
        match self.introspector().table(table).await? {
            Some(snapshot) => predicates::has_index(&snapshot, columns, name, case),
            None => Ok(false),
        }
    }

    /// Returns true if `table` has a foreign key pairing `columns` with
    /// `referenced_columns` of `referenced_table`.
    pub async fn has_foreign_key<S: AsRef<str>, R: AsRef<str>>(
        &mut self,
        table: &str,
        columns: &[S],
        referenced_table: &str,
        referenced_columns: &[R],
    ) -> Result<bool> {
        check_foreign_key_request(table, columns.len(), referenced_columns.len())?;
        let case = self.adapter.grammar().identifier_case();
        match self.introspector().table(table).await? {
            Some(snapshot) => predicates::has_foreign_key(
                &snapshot,
                columns,
                referenced_table,
                referenced_columns,
                case,
            ),
            None => Ok(false),
        }
    }

    /// Column names of a table in catalog order; empty if it does not exist.
    pub async fn column_listing(&mut self, table: &str) -> Result<Vec<String>> {
        self.introspector().column_listing(table).await
    }

    /// Logical names of the tables under the prefix.
    pub async fn table_names(&mut self) -> Result<Vec<String>> {
        self.introspector().table_names().await
    }

    /// Snapshot of the managed tables, optionally restricted to `tables`.
    pub async fn snapshot(&mut self, tables: Option<&[&str]>) -> Result<SchemaSnapshot> {
        self.introspector().snapshot(tables).await
    }

    /// Restores foreign key enforcement for the session.
    ///
    /// A no-op on backends without a session toggle.
    pub async fn enable_foreign_key_constraints(&mut self) -> Result<()> {
        self.adapter.enable_foreign_key_checks().await
    }

    /// Suspends foreign key enforcement for the session.
    pub async fn disable_foreign_key_constraints(&mut self) -> Result<()> {
        self.adapter.disable_foreign_key_checks().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::SqliteAdapter;
    use crate::config::Driver;

    async fn builder(prefix: &str) -> SchemaBuilder<SqliteAdapter> {
        let adapter = SqliteAdapter::in_memory()
            .await
            .expect("Failed to create in-memory SQLite adapter");
        SchemaBuilder::new(adapter, ConnectionConfig::sqlite().with_prefix(prefix)).unwrap()
    }

    #[tokio::test]
    async fn test_driver_mismatch() {
        let adapter = SqliteAdapter::in_memory().await.unwrap();
        let err = SchemaBuilder::new(adapter, ConnectionConfig::postgres())
            .err()
            .unwrap();
        assert!(matches!(
            err,
            SchemaError::DriverMismatch {
                expected: Driver::Sqlite,
                actual: Driver::Postgres
            }
        ));
    }

    #[tokio::test]
    async fn test_create_and_alter() {
        let mut schema = builder("app_").await;
        schema
            .create("users", |table| {
                table.id();
                table.string("name");
            })
            .await
            .unwrap();
        assert!(schema.has_table("users").await.unwrap());
        assert!(schema.adapter().list_tables().await.unwrap().contains(&"app_users".to_string()));

        schema
            .table("users", |table| {
                table.string("email").nullable();
            })
            .await
            .unwrap();
        assert_eq!(
            schema.column_listing("users").await.unwrap(),
            vec!["id", "name", "email"]
        );
        assert!(schema.has_columns("users", &["name", "email"]).await.unwrap());
        assert!(!schema.has_columns("users", &["name", "age"]).await.unwrap());
    }

    #[tokio::test]
    async fn test_create_existing_table_conflicts() {
        let mut schema = builder("").await;
        schema
            .create("users", |t| {
                t.id();
            })
            .await
            .unwrap();
        let err = schema
            .create("users", |t| {
                t.id();
            })
            .await
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_alter_missing_table_conflicts() {
        let mut schema = builder("").await;
        let err = schema
            .table("ghosts", |t| {
                t.string("name");
            })
            .await
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_predicates_on_missing_table() {
        let mut schema = builder("").await;
        assert!(!schema.has_column("ghosts", "id").await.unwrap());
        assert!(!schema.has_index("ghosts", &["id"], None).await.unwrap());
        assert!(!schema
            .has_foreign_key("ghosts", &["a"], "others", &["id"])
            .await
            .unwrap());
        // malformed requests fail even when the table is missing
        assert!(matches!(
            schema.has_index::<&str>("ghosts", &[], None).await,
            Err(SchemaError::InvalidRequest(_))
        ));
        assert!(matches!(
            schema.has_columns::<&str>("ghosts", &[]).await,
            Err(SchemaError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_drop_and_drop_if_exists() {
        let mut schema = builder("").await;
        schema
            .create("users", |t| {
                t.id();
            })
            .await
            .unwrap();
        schema.drop("users").await.unwrap();
        assert!(!schema.has_table("users").await.unwrap());
        assert!(schema.drop("users").await.unwrap_err().is_conflict());
        schema.drop_if_exists("users").await.unwrap();
    }

    #[tokio::test]
    async fn test_prefix_match_follows_identifier_case() {
        let mut schema = builder("app_").await;
        schema
            .adapter()
            .execute_statement("CREATE TABLE APP_users (id INTEGER PRIMARY KEY, Name TEXT)")
            .await
            .unwrap();

        assert!(schema.has_table("users").await.unwrap());
        assert_eq!(schema.table_names().await.unwrap(), vec!["users"]);
        let snapshot = schema.snapshot(None).await.unwrap();
        assert!(snapshot.tables.contains_key("users"));
        assert_eq!(schema.column_listing("users").await.unwrap(), vec!["id", "Name"]);
    }
}
