//! PostgreSQL grammar.

use crate::error::Result;
use crate::operations::{ColumnDefinition, IndexDefinition, Operation};
use crate::schema::{ColumnType, DefaultValue, IdentifierCase, IndexKind};

use super::SchemaGrammar;

/// PostgreSQL schema grammar.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresGrammar;

impl PostgresGrammar {
    /// Creates a new PostgreSQL grammar.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Name PostgreSQL gives an unnamed primary key constraint.
    fn primary_key_constraint(table: &str) -> String {
        format!("{table}_pkey")
    }

    fn create_index_sql(&self, table: &str, index: &IndexDefinition) -> String {
        match index.kind {
            IndexKind::Primary => format!(
                "ALTER TABLE {} ADD PRIMARY KEY ({})",
                self.quote_identifier(table),
                self.column_list(&index.columns)
            ),
            IndexKind::Unique => format!(
                "CREATE UNIQUE INDEX {} ON {} ({})",
                self.quote_identifier(&index.name.physical),
                self.quote_identifier(table),
                self.column_list(&index.columns)
            ),
            IndexKind::Index => format!(
                "CREATE INDEX {} ON {} ({})",
                self.quote_identifier(&index.name.physical),
                self.quote_identifier(table),
                self.column_list(&index.columns)
            ),
        }
    }
}

impl SchemaGrammar for PostgresGrammar {
    fn name(&self) -> &'static str {
        "postgresql"
    }

    fn identifier_case(&self) -> IdentifierCase {
        IdentifierCase::Sensitive
    }

    fn compile(&self, operation: &Operation) -> Result<Vec<String>> {
        let sql = match operation {
            Operation::CreateTable {
                table,
                columns,
                primary_key,
                foreign_keys,
            } => {
                let mut defs: Vec<String> =
                    columns.iter().map(|c| self.column_definition(c)).collect();
                if let Some(pk) = primary_key {
                    defs.push(format!("PRIMARY KEY ({})", self.column_list(&pk.columns)));
                }
                defs.extend(foreign_keys.iter().map(|fk| self.foreign_key_clause(fk)));
                vec![format!(
                    "CREATE TABLE {} (\n  {}\n)",
                    self.quote_identifier(&table.physical),
                    defs.join(",\n  ")
                )]
            }

            Operation::AddColumn { table, column } => vec![format!(
                "ALTER TABLE {} ADD COLUMN {}",
                self.quote_identifier(&table.physical),
                self.column_definition(column)
            )],

            Operation::DropColumns { table, columns } => {
                let drops: Vec<String> = columns
                    .iter()
                    .map(|c| format!("DROP COLUMN {}", self.quote_identifier(c)))
                    .collect();
                vec![format!(
                    "ALTER TABLE {} {}",
                    self.quote_identifier(&table.physical),
                    drops.join(", ")
                )]
            }

            Operation::CreateIndex { table, index } => {
                vec![self.create_index_sql(&table.physical, index)]
            }

            Operation::DropIndex { table, name, kind } => match kind {
                IndexKind::Primary => vec![format!(
                    "ALTER TABLE {} DROP CONSTRAINT {}",
                    self.quote_identifier(&table.physical),
                    self.quote_identifier(&Self::primary_key_constraint(&table.physical))
                )],
                IndexKind::Unique | IndexKind::Index => {
                    vec![format!(
                        "DROP INDEX {}",
                        self.quote_identifier(&name.physical)
                    )]
                }
            },

            Operation::AddForeignKey { table, foreign_key } => vec![format!(
                "ALTER TABLE {} ADD {}",
                self.quote_identifier(&table.physical),
                self.foreign_key_clause(foreign_key)
            )],

            Operation::DropForeignKey { table, name } => vec![format!(
                "ALTER TABLE {} DROP CONSTRAINT {}",
                self.quote_identifier(&table.physical),
                self.quote_identifier(&name.physical)
            )],

            Operation::DropTable { table, if_exists } => {
                let mut sql = String::from("DROP TABLE ");
                if *if_exists {
                    sql.push_str("IF EXISTS ");
                }
                sql.push_str(&self.quote_identifier(&table.physical));
                vec![sql]
            }
        };
        Ok(sql)
    }

    fn type_name(&self, column_type: &ColumnType) -> String {
        match column_type {
            ColumnType::SmallInt => "SMALLINT".to_string(),
            ColumnType::Integer => "INTEGER".to_string(),
            ColumnType::BigInt => "BIGINT".to_string(),
            ColumnType::Text => "TEXT".to_string(),
            ColumnType::Varchar(n) => format!("VARCHAR({n})"),
            ColumnType::Char(n) => format!("CHAR({n})"),
            ColumnType::Boolean => "BOOLEAN".to_string(),
            ColumnType::DateTime | ColumnType::Timestamp => "TIMESTAMP".to_string(),
            ColumnType::Date => "DATE".to_string(),
            ColumnType::Time => "TIME".to_string(),
            ColumnType::Real => "REAL".to_string(),
            ColumnType::Double => "DOUBLE PRECISION".to_string(),
            ColumnType::Decimal(p, s) => format!("DECIMAL({p}, {s})"),
            ColumnType::Blob => "BYTEA".to_string(),
            ColumnType::Json => "JSON".to_string(),
            ColumnType::Uuid => "UUID".to_string(),
        }
    }

    fn render_default(&self, default: &DefaultValue) -> String {
        match default {
            DefaultValue::Bool(true) => "TRUE".to_string(),
            DefaultValue::Bool(false) => "FALSE".to_string(),
            _ => default.to_sql(),
        }
    }

    fn column_definition(&self, column: &ColumnDefinition) -> String {
        // PostgreSQL uses SERIAL types for auto-increment
        let type_name = if column.auto_increment {
            match column.column_type {
                ColumnType::SmallInt => "SMALLSERIAL".to_string(),
                ColumnType::Integer => "SERIAL".to_string(),
                ColumnType::BigInt => "BIGSERIAL".to_string(),
                ref other => self.type_name(other),
            }
        } else {
            self.type_name(&column.column_type)
        };

        let mut sql = format!("{} {}", self.quote_identifier(&column.name), type_name);
        if !column.nullable {
            sql.push_str(" NOT NULL");
        }
        if let Some(ref default) = column.default {
            sql.push_str(" DEFAULT ");
            sql.push_str(&self.render_default(default));
        }
        sql
    }
}
