//! SQLite grammar.
//!
//! SQLite has limited ALTER TABLE support: foreign keys and primary keys can
//! only be declared when the table is created, and columns are dropped one
//! statement at a time (SQLite 3.35.0+).

use crate::error::{Result, SchemaError};
use crate::operations::{ColumnDefinition, ForeignKeyDefinition, IndexDefinition, Operation};
use crate::schema::{ColumnType, IdentifierCase, IndexKind};

use super::SchemaGrammar;

/// SQLite schema grammar.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteGrammar;

impl SqliteGrammar {
    /// Creates a new SQLite grammar.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Generates SQL for creating a table.
    ///
    /// A sole auto-incrementing primary key column is declared inline as
    /// `INTEGER PRIMARY KEY AUTOINCREMENT`, the only form SQLite accepts.
    fn create_table_sql(
        &self,
        name: &str,
        columns: &[ColumnDefinition],
        primary_key: Option<&IndexDefinition>,
        foreign_keys: &[ForeignKeyDefinition],
    ) -> String {
        let inline_pk = primary_key
            .filter(|pk| pk.columns.len() == 1)
            .and_then(|pk| columns.iter().find(|c| c.name == pk.columns[0]))
            .filter(|c| c.auto_increment)
            .map(|c| c.name.as_str());

        let mut defs: Vec<String> = columns
            .iter()
            .map(|c| {
                if Some(c.name.as_str()) == inline_pk {
                    format!(
                        "{} INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL",
                        self.quote_identifier(&c.name)
                    )
                } else {
                    self.column_definition(c)
                }
            })
            .collect();

        if let Some(pk) = primary_key.filter(|_| inline_pk.is_none()) {
            defs.push(format!("PRIMARY KEY ({})", self.column_list(&pk.columns)));
        }

        defs.extend(foreign_keys.iter().map(|fk| self.foreign_key_clause(fk)));

        format!(
            "CREATE TABLE {} (\n  {}\n)",
            self.quote_identifier(name),
            defs.join(",\n  ")
        )
    }

    /// Generates SQL for creating a secondary index.
    fn create_index_sql(&self, table: &str, index: &IndexDefinition) -> String {
        let unique = if index.kind == IndexKind::Unique {
            "UNIQUE "
        } else {
            ""
        };
        format!(
            "CREATE {}INDEX {} ON {} ({})",
            unique,
            self.quote_identifier(&index.name.physical),
            self.quote_identifier(table),
            self.column_list(&index.columns)
        )
    }
}

impl SchemaGrammar for SqliteGrammar {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn identifier_case(&self) -> IdentifierCase {
        IdentifierCase::Insensitive
    }

    fn compile(&self, operation: &Operation) -> Result<Vec<String>> {
        match operation {
            Operation::CreateTable {
                table,
                columns,
                primary_key,
                foreign_keys,
            } => Ok(vec![self.create_table_sql(
                &table.physical,
                columns,
                primary_key.as_ref(),
                foreign_keys,
            )]),

            Operation::AddColumn { table, column } => {
                if column.auto_increment {
                    return Err(SchemaError::conflict(
                        operation,
                        "SQLite cannot add an auto-incrementing column to an existing table",
                    ));
                }
                Ok(vec![format!(
                    "ALTER TABLE {} ADD COLUMN {}",
                    self.quote_identifier(&table.physical),
                    self.column_definition(column)
                )])
            }

            Operation::DropColumns { table, columns } => Ok(columns
                .iter()
                .map(|column| {
                    format!(
                        "ALTER TABLE {} DROP COLUMN {}",
                        self.quote_identifier(&table.physical),
                        self.quote_identifier(column)
                    )
                })
                .collect()),

            Operation::CreateIndex { table, index } => {
                if index.kind == IndexKind::Primary {
                    return Err(SchemaError::conflict(
                        operation,
                        "SQLite cannot add a primary key to an existing table",
                    ));
                }
                Ok(vec![self.create_index_sql(&table.physical, index)])
            }

            Operation::DropIndex { name, kind, .. } => {
                if *kind == IndexKind::Primary {
                    return Err(SchemaError::conflict(
                        operation,
                        "SQLite cannot drop the primary key of an existing table",
                    ));
                }
                Ok(vec![format!(
                    "DROP INDEX {}",
                    self.quote_identifier(&name.physical)
                )])
            }

            Operation::AddForeignKey { .. } => Err(SchemaError::conflict(
                operation,
                "SQLite cannot add a foreign key to an existing table",
            )),

            Operation::DropForeignKey { .. } => Err(SchemaError::conflict(
                operation,
                "SQLite cannot drop a foreign key from an existing table",
            )),

            Operation::DropTable { table, if_exists } => {
                let mut sql = String::from("DROP TABLE ");
                if *if_exists {
                    sql.push_str("IF EXISTS ");
                }
                sql.push_str(&self.quote_identifier(&table.physical));
                Ok(vec![sql])
            }
        }
    }

    fn type_name(&self, column_type: &ColumnType) -> String {
        match column_type {
            ColumnType::Integer | ColumnType::SmallInt | ColumnType::BigInt => {
                "INTEGER".to_string()
            }
            ColumnType::Varchar(n) => format!("VARCHAR({n})"),
            ColumnType::Char(n) => format!("CHAR({n})"),
            ColumnType::Text | ColumnType::Json | ColumnType::Uuid => "TEXT".to_string(),
            ColumnType::Boolean => "INTEGER".to_string(),
            ColumnType::DateTime | ColumnType::Timestamp => "DATETIME".to_string(),
            ColumnType::Date => "DATE".to_string(),
            ColumnType::Time => "TIME".to_string(),
            ColumnType::Real | ColumnType::Double => "REAL".to_string(),
            ColumnType::Decimal(_, _) => "NUMERIC".to_string(),
            ColumnType::Blob => "BLOB".to_string(),
        }
    }
}
