//! SQLite adapter.
//!
//! The catalog is read through `sqlite_master` and the `pragma_*`
//! table-valued functions. Foreign key enforcement is a per-connection
//! setting, so the adapter keeps its pool at a single connection: a toggle
//! issued on one call is still in effect on the next.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::debug;

use crate::catalog::{ColumnInfo, ForeignKeyInfo, IndexInfo};
use crate::config::Driver;
use crate::error::Result;
use crate::grammar::SqliteGrammar;
use crate::schema::{ForeignKeyAction, IndexKind, PRIMARY_INDEX_NAME};

use super::SchemaAdapter;

#[derive(sqlx::FromRow)]
struct TableInfoRow {
    name: String,
    type_name: String,
    notnull: i64,
    dflt_value: Option<String>,
    pk: i64,
}

#[derive(sqlx::FromRow)]
struct IndexListRow {
    name: String,
    unique: i64,
    origin: String,
}

#[derive(sqlx::FromRow)]
struct ForeignKeyRow {
    id: i64,
    referenced_table: String,
    from_column: String,
    to_column: Option<String>,
    on_update: String,
    on_delete: String,
}

/// Schema adapter over a single SQLite connection.
#[derive(Debug, Clone)]
pub struct SqliteAdapter {
    pool: SqlitePool,
    grammar: SqliteGrammar,
}

impl SqliteAdapter {
    /// Wraps an existing pool.
    ///
    /// The pool should be limited to one connection, otherwise foreign key
    /// toggling and `:memory:` databases behave per connection.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            grammar: SqliteGrammar::new(),
        }
    }

    /// Opens a single-connection pool on `url`.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = Self::pool_options().connect(url).await?;
        Ok(Self::new(pool))
    }

    /// Opens a single-connection pool with explicit options.
    pub async fn connect_with(options: SqliteConnectOptions) -> Result<Self> {
        let pool = Self::pool_options().connect_with(options).await?;
        Ok(Self::new(pool))
    }

    /// Opens a private in-memory database.
    pub async fn in_memory() -> Result<Self> {
        Self::connect("sqlite::memory:").await
    }

    /// Returns the underlying pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn pool_options() -> SqlitePoolOptions {
        // an in-memory database lives as long as its only connection
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    }

    async fn table_info(&self, table: &str) -> Result<Vec<TableInfoRow>> {
        let rows = sqlx::query_as::<_, TableInfoRow>(
            "SELECT name, type AS type_name, \"notnull\", dflt_value, pk \
             FROM pragma_table_info(?) ORDER BY cid",
        )
        .bind(table)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn primary_key_columns(&self, table: &str) -> Result<Vec<String>> {
        let mut rows: Vec<TableInfoRow> = self
            .table_info(table)
            .await?
            .into_iter()
            .filter(|r| r.pk > 0)
            .collect();
        rows.sort_by_key(|r| r.pk);
        Ok(rows.into_iter().map(|r| r.name).collect())
    }

    async fn index_columns(&self, index: &str) -> Result<Vec<String>> {
        let names: Vec<(Option<String>,)> =
            sqlx::query_as("SELECT name FROM pragma_index_info(?) ORDER BY seqno")
                .bind(index)
                .fetch_all(&self.pool)
                .await?;
        // expression columns have no name
        Ok(names.into_iter().filter_map(|(name,)| name).collect())
    }

    async fn set_foreign_keys(&self, enabled: bool) -> Result<()> {
        let sql = if enabled {
            "PRAGMA foreign_keys = ON"
        } else {
            "PRAGMA foreign_keys = OFF"
        };
        debug!(sql = %sql, "Executing SQL");
        sqlx::query(sql).execute(&self.pool).await?;
        Ok(())
    }
}

impl SchemaAdapter for SqliteAdapter {
    type Grammar = SqliteGrammar;

    fn driver(&self) -> Driver {
        Driver::Sqlite
    }

    fn grammar(&self) -> &SqliteGrammar {
        &self.grammar
    }

    async fn execute_statement(&mut self, sql: &str) -> std::result::Result<(), sqlx::Error> {
        sqlx::query(sql).execute(&self.pool).await?;
        Ok(())
    }

    async fn list_tables(&mut self) -> Result<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite\\_%' ESCAPE '\\' \
             ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|(name,)| name).collect())
    }

    async fn list_columns(&mut self, table: &str) -> Result<Vec<ColumnInfo>> {
        let rows = self.table_info(table).await?;
        Ok(rows
            .into_iter()
            .map(|r| ColumnInfo {
                name: r.name,
                type_name: r.type_name,
                nullable: r.notnull == 0,
                default: r.dflt_value,
                primary_key: r.pk > 0,
            })
            .collect())
    }

    async fn list_indexes(&mut self, table: &str) -> Result<Vec<IndexInfo>> {
        let mut indexes = Vec::new();

        // INTEGER PRIMARY KEY columns have no backing index; the key is read
        // from the table info instead
        let primary = self.primary_key_columns(table).await?;
        if !primary.is_empty() {
            indexes.push(IndexInfo {
                name: PRIMARY_INDEX_NAME.to_string(),
                columns: primary,
                kind: IndexKind::Primary,
            });
        }

        let list: Vec<IndexListRow> = sqlx::query_as(
            "SELECT name, \"unique\", origin FROM pragma_index_list(?) ORDER BY name",
        )
        .bind(table)
        .fetch_all(&self.pool)
        .await?;

        for row in list.into_iter().filter(|r| r.origin != "pk") {
            let columns = self.index_columns(&row.name).await?;
            indexes.push(IndexInfo {
                name: row.name,
                columns,
                kind: if row.unique != 0 {
                    IndexKind::Unique
                } else {
                    IndexKind::Index
                },
            });
        }

        Ok(indexes)
    }

    async fn list_foreign_keys(&mut self, table: &str) -> Result<Vec<ForeignKeyInfo>> {
        let rows: Vec<ForeignKeyRow> = sqlx::query_as(
            "SELECT id, \"table\" AS referenced_table, \"from\" AS from_column, \
             \"to\" AS to_column, on_update, on_delete \
             FROM pragma_foreign_key_list(?) ORDER BY id, seq",
        )
        .bind(table)
        .fetch_all(&self.pool)
        .await?;

        // rows of one multi-column key share an id
        let mut grouped: Vec<(i64, Vec<ForeignKeyRow>)> = Vec::new();
        for row in rows {
            match grouped.last_mut() {
                Some((id, group)) if *id == row.id => group.push(row),
                _ => grouped.push((row.id, vec![row])),
            }
        }

        let mut foreign_keys = Vec::with_capacity(grouped.len());
        for (_, group) in grouped {
            let referenced_table = group[0].referenced_table.clone();
            let on_delete = ForeignKeyAction::from_sql(&group[0].on_delete).unwrap_or_default();
            let on_update = ForeignKeyAction::from_sql(&group[0].on_update).unwrap_or_default();
            let columns: Vec<String> = group.iter().map(|r| r.from_column.clone()).collect();

            // `REFERENCES parent` without a column list targets the primary key
            let referenced_columns = if group.iter().all(|r| r.to_column.is_some()) {
                group.into_iter().filter_map(|r| r.to_column).collect()
            } else {
                self.primary_key_columns(&referenced_table).await?
            };

            foreign_keys.push(ForeignKeyInfo {
                name: None,
                columns,
                referenced_table,
                referenced_columns,
                on_delete,
                on_update,
            });
        }

        Ok(foreign_keys)
    }

    fn supports_foreign_key_toggle(&self) -> bool {
        true
    }

    async fn disable_foreign_key_checks(&mut self) -> Result<()> {
        self.set_foreign_keys(false).await
    }

    async fn enable_foreign_key_checks(&mut self) -> Result<()> {
        self.set_foreign_keys(true).await
    }
}
