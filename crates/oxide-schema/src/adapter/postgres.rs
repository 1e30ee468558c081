//! PostgreSQL adapter.
//!
//! Reads `pg_catalog` for tables of `current_schema()`. PostgreSQL has no
//! session-wide switch for foreign key enforcement, so teardown goes through
//! the ordered plan instead.

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::catalog::{ColumnInfo, ForeignKeyInfo, IndexInfo};
use crate::config::Driver;
use crate::error::Result;
use crate::grammar::PostgresGrammar;
use crate::schema::{ForeignKeyAction, IndexKind};

use super::SchemaAdapter;

const TABLES_SQL: &str = "\
SELECT c.relname::text AS name
FROM pg_class c
JOIN pg_namespace n ON n.oid = c.relnamespace
WHERE c.relkind IN ('r', 'p') AND n.nspname = current_schema()
ORDER BY c.relname";

const COLUMNS_SQL: &str = "\
SELECT a.attname::text AS name,
       format_type(a.atttypid, a.atttypmod) AS type_name,
       NOT a.attnotnull AS nullable,
       pg_get_expr(d.adbin, d.adrelid) AS default_value,
       COALESCE(a.attnum = ANY(i.indkey::int2[]), false) AS primary_key
FROM pg_attribute a
LEFT JOIN pg_attrdef d ON d.adrelid = a.attrelid AND d.adnum = a.attnum
LEFT JOIN pg_index i ON i.indrelid = a.attrelid AND i.indisprimary
WHERE a.attrelid = to_regclass(quote_ident($1)) AND a.attnum > 0 AND NOT a.attisdropped
ORDER BY a.attnum";

const INDEXES_SQL: &str = "\
SELECT ic.relname::text AS name,
       i.indisprimary AS is_primary,
       i.indisunique AS is_unique,
       ARRAY(
           SELECT a.attname::text
           FROM unnest(i.indkey::int2[]) WITH ORDINALITY AS k(attnum, ord)
           JOIN pg_attribute a ON a.attrelid = i.indrelid AND a.attnum = k.attnum
           ORDER BY k.ord
       ) AS columns
FROM pg_index i
JOIN pg_class ic ON ic.oid = i.indexrelid
WHERE i.indrelid = to_regclass(quote_ident($1))
ORDER BY i.indisprimary DESC, ic.relname";

const FOREIGN_KEYS_SQL: &str = "\
SELECT con.conname::text AS name,
       ARRAY(
           SELECT a.attname::text
           FROM unnest(con.conkey) WITH ORDINALITY AS k(attnum, ord)
           JOIN pg_attribute a ON a.attrelid = con.conrelid AND a.attnum = k.attnum
           ORDER BY k.ord
       ) AS columns,
       ref.relname::text AS referenced_table,
       ARRAY(
           SELECT a.attname::text
           FROM unnest(con.confkey) WITH ORDINALITY AS k(attnum, ord)
           JOIN pg_attribute a ON a.attrelid = con.confrelid AND a.attnum = k.attnum
           ORDER BY k.ord
       ) AS referenced_columns,
       con.confdeltype::text AS on_delete,
       con.confupdtype::text AS on_update
FROM pg_constraint con
JOIN pg_class ref ON ref.oid = con.confrelid
WHERE con.contype = 'f' AND con.conrelid = to_regclass(quote_ident($1))
ORDER BY con.conname";

#[derive(sqlx::FromRow)]
struct ColumnRow {
    name: String,
    type_name: String,
    nullable: bool,
    default_value: Option<String>,
    primary_key: bool,
}

#[derive(sqlx::FromRow)]
struct IndexRow {
    name: String,
    is_primary: bool,
    is_unique: bool,
    columns: Vec<String>,
}

#[derive(sqlx::FromRow)]
struct ForeignKeyRow {
    name: String,
    columns: Vec<String>,
    referenced_table: String,
    referenced_columns: Vec<String>,
    on_delete: String,
    on_update: String,
}

/// Maps a `pg_constraint` action code.
fn action_from_code(code: &str) -> ForeignKeyAction {
    match code {
        "r" => ForeignKeyAction::Restrict,
        "c" => ForeignKeyAction::Cascade,
        "n" => ForeignKeyAction::SetNull,
        "d" => ForeignKeyAction::SetDefault,
        _ => ForeignKeyAction::NoAction,
    }
}

/// Schema adapter over a PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PostgresAdapter {
    pool: PgPool,
    grammar: PostgresGrammar,
}

impl PostgresAdapter {
    /// Wraps an existing pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            grammar: PostgresGrammar::new(),
        }
    }

    /// Connects to `url`.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new().max_connections(1).connect(url).await?;
        Ok(Self::new(pool))
    }

    /// Returns the underlying pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl SchemaAdapter for PostgresAdapter {
    type Grammar = PostgresGrammar;

    fn driver(&self) -> Driver {
        Driver::Postgres
    }

    fn grammar(&self) -> &PostgresGrammar {
        &self.grammar
    }

    async fn execute_statement(&mut self, sql: &str) -> std::result::Result<(), sqlx::Error> {
        sqlx::query(sql).execute(&self.pool).await?;
        Ok(())
    }

    async fn list_tables(&mut self) -> Result<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(TABLES_SQL).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(|(name,)| name).collect())
    }

    async fn list_columns(&mut self, table: &str) -> Result<Vec<ColumnInfo>> {
        let rows: Vec<ColumnRow> = sqlx::query_as(COLUMNS_SQL)
            .bind(table)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(|r| ColumnInfo {
                name: r.name,
                type_name: r.type_name,
                nullable: r.nullable,
                default: r.default_value,
                primary_key: r.primary_key,
            })
            .collect())
    }

    async fn list_indexes(&mut self, table: &str) -> Result<Vec<IndexInfo>> {
        let rows: Vec<IndexRow> = sqlx::query_as(INDEXES_SQL)
            .bind(table)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(|r| IndexInfo {
                name: r.name,
                columns: r.columns,
                kind: if r.is_primary {
                    IndexKind::Primary
                } else if r.is_unique {
                    IndexKind::Unique
                } else {
                    IndexKind::Index
                },
            })
            .collect())
    }

    async fn list_foreign_keys(&mut self, table: &str) -> Result<Vec<ForeignKeyInfo>> {
        let rows: Vec<ForeignKeyRow> = sqlx::query_as(FOREIGN_KEYS_SQL)
            .bind(table)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(|r| ForeignKeyInfo {
                name: Some(r.name),
                columns: r.columns,
                referenced_table: r.referenced_table,
                referenced_columns: r.referenced_columns,
                on_delete: action_from_code(&r.on_delete),
                on_update: action_from_code(&r.on_update),
            })
            .collect())
    }
}
