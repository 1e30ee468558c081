//! Table definitions.
//!
//! A [`Blueprint`] collects column, index and foreign key declarations for
//! one table, then compiles them into an ordered list of [`Operation`]s.
//! Compiling never touches the database.
//!
//! Columns are `NOT NULL` unless marked [`nullable`](ColumnHandle::nullable).
//! Index and foreign key declarations may name columns declared later in the
//! same blueprint; references are only checked when the blueprint compiles.
//!
//! ```rust,ignore
//! let mut table = Blueprint::create("posts");
//! table.id();
//! table.foreign_id("user_id").constrained("users").cascade_on_delete();
//! table.string("slug").unique();
//! table.index(["user_id", "created_at"]).name("posts_recent");
//! table.timestamps();
//! ```

use tracing::debug;

use crate::catalog::IndexInfo;
use crate::config::ConnectionConfig;
use crate::error::{Result, SchemaError};
use crate::operations::{ColumnDefinition, ForeignKeyDefinition, IndexDefinition, Operation};
use crate::resolver::{IdentifierResolver, TableRef};
use crate::schema::{
    ColumnNames, ColumnType, DefaultValue, ForeignKeyAction, IdentifierCase, IndexKind,
};

/// An index or foreign key to drop, by name or by the columns it covers.
///
/// A column list designates the conventionally named index on those
/// columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// Logical index or constraint name.
    Name(String),
    /// Columns from which the conventional name is derived.
    Columns(Vec<String>),
}

impl From<&str> for DropTarget {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for DropTarget {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<Vec<String>> for DropTarget {
    fn from(columns: Vec<String>) -> Self {
        Self::Columns(columns)
    }
}

impl From<Vec<&str>> for DropTarget {
    fn from(columns: Vec<&str>) -> Self {
        Self::Columns(columns.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for DropTarget {
    fn from(columns: [&str; N]) -> Self {
        Self::Columns(columns.iter().map(|c| (*c).to_string()).collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Create,
    Alter,
}

#[derive(Debug, Clone)]
struct IndexDeclaration {
    columns: Vec<String>,
    kind: IndexKind,
    name: Option<String>,
}

#[derive(Debug, Clone, Default)]
struct ForeignKeyDeclaration {
    columns: Vec<String>,
    references: Option<String>,
    referenced_columns: Vec<String>,
    on_delete: Option<ForeignKeyAction>,
    on_update: Option<ForeignKeyAction>,
    name: Option<String>,
}

/// Declarations for one table.
#[derive(Debug, Clone)]
pub struct Blueprint {
    table: String,
    mode: Mode,
    columns: Vec<ColumnDefinition>,
    indexes: Vec<IndexDeclaration>,
    foreign_keys: Vec<ForeignKeyDeclaration>,
    dropped_columns: Vec<ColumnNames>,
    dropped_indexes: Vec<(IndexKind, DropTarget)>,
    dropped_foreign_keys: Vec<DropTarget>,
}

impl Blueprint {
    fn new(table: impl Into<String>, mode: Mode) -> Self {
        Self {
            table: table.into(),
            mode,
            columns: Vec::new(),
            indexes: Vec::new(),
            foreign_keys: Vec::new(),
            dropped_columns: Vec::new(),
            dropped_indexes: Vec::new(),
            dropped_foreign_keys: Vec::new(),
        }
    }

    /// Starts the definition of a new table.
    #[must_use]
    pub fn create(table: impl Into<String>) -> Self {
        Self::new(table, Mode::Create)
    }

    /// Starts a change to an existing table.
    #[must_use]
    pub fn alter(table: impl Into<String>) -> Self {
        Self::new(table, Mode::Alter)
    }

    /// Logical name of the table.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Returns true if this blueprint creates its table.
    #[must_use]
    pub fn is_create(&self) -> bool {
        self.mode == Mode::Create
    }

    /// Declares a column of any type.
    pub fn column(&mut self, name: impl Into<String>, column_type: ColumnType) -> ColumnHandle<'_> {
        self.columns.push(ColumnDefinition::new(name, column_type));
        ColumnHandle {
            index: self.columns.len() - 1,
            blueprint: self,
        }
    }

    fn increments_column(&mut self, name: &str, column_type: ColumnType) -> ColumnHandle<'_> {
        self.column(name, column_type).auto_increment()
    }

    /// Auto-incrementing big integer primary key named `id`.
    pub fn id(&mut self) -> ColumnHandle<'_> {
        self.big_increments("id")
    }

    /// Auto-incrementing integer primary key.
    pub fn increments(&mut self, name: &str) -> ColumnHandle<'_> {
        self.increments_column(name, ColumnType::Integer)
    }

    /// Auto-incrementing big integer primary key.
    pub fn big_increments(&mut self, name: &str) -> ColumnHandle<'_> {
        self.increments_column(name, ColumnType::BigInt)
    }

    /// Integer column.
    pub fn integer(&mut self, name: &str) -> ColumnHandle<'_> {
        self.column(name, ColumnType::Integer)
    }

    /// 64-bit integer column.
    pub fn big_integer(&mut self, name: &str) -> ColumnHandle<'_> {
        self.column(name, ColumnType::BigInt)
    }

    /// Small integer column.
    pub fn small_integer(&mut self, name: &str) -> ColumnHandle<'_> {
        self.column(name, ColumnType::SmallInt)
    }

    /// `VARCHAR(255)` column.
    pub fn string(&mut self, name: &str) -> ColumnHandle<'_> {
        self.string_with_length(name, 255)
    }

    /// `VARCHAR(length)` column.
    pub fn string_with_length(&mut self, name: &str, length: usize) -> ColumnHandle<'_> {
        self.column(name, ColumnType::Varchar(length))
    }

    /// Fixed-length `CHAR(length)` column.
    pub fn char(&mut self, name: &str, length: usize) -> ColumnHandle<'_> {
        self.column(name, ColumnType::Char(length))
    }

    /// Unbounded text column.
    pub fn text(&mut self, name: &str) -> ColumnHandle<'_> {
        self.column(name, ColumnType::Text)
    }

    /// Boolean column. SQLite stores it as an integer.
    pub fn boolean(&mut self, name: &str) -> ColumnHandle<'_> {
        self.column(name, ColumnType::Boolean)
    }

    /// Calendar date column.
    pub fn date(&mut self, name: &str) -> ColumnHandle<'_> {
        self.column(name, ColumnType::Date)
    }

    /// Date and time column.
    pub fn date_time(&mut self, name: &str) -> ColumnHandle<'_> {
        self.column(name, ColumnType::DateTime)
    }

    /// Time of day column.
    pub fn time(&mut self, name: &str) -> ColumnHandle<'_> {
        self.column(name, ColumnType::Time)
    }

    /// Timestamp column, without time zone.
    pub fn timestamp(&mut self, name: &str) -> ColumnHandle<'_> {
        self.column(name, ColumnType::Timestamp)
    }

    /// Nullable `created_at` and `updated_at` timestamps.
    pub fn timestamps(&mut self) {
        self.timestamp("created_at").nullable();
        self.timestamp("updated_at").nullable();
    }

    /// Single precision floating point column.
    pub fn float(&mut self, name: &str) -> ColumnHandle<'_> {
        self.column(name, ColumnType::Real)
    }

    /// Double precision floating point column.
    pub fn double(&mut self, name: &str) -> ColumnHandle<'_> {
        self.column(name, ColumnType::Double)
    }

    /// Exact numeric column with `precision` digits, `scale` of them
    /// after the point.
    pub fn decimal(&mut self, name: &str, precision: u8, scale: u8) -> ColumnHandle<'_> {
        self.column(name, ColumnType::Decimal(precision, scale))
    }

    /// Binary column (`BLOB` on SQLite, `BYTEA` on PostgreSQL).
    pub fn binary(&mut self, name: &str) -> ColumnHandle<'_> {
        self.column(name, ColumnType::Blob)
    }

    /// JSON column. SQLite stores it as text.
    pub fn json(&mut self, name: &str) -> ColumnHandle<'_> {
        self.column(name, ColumnType::Json)
    }

    /// UUID column. SQLite stores it as text.
    pub fn uuid(&mut self, name: &str) -> ColumnHandle<'_> {
        self.column(name, ColumnType::Uuid)
    }

    /// Big integer column meant to hold a reference to another table.
    pub fn foreign_id(&mut self, name: &str) -> ForeignIdHandle<'_> {
        let handle = self.column(name, ColumnType::BigInt);
        ForeignIdHandle {
            index: handle.index,
            blueprint: handle.blueprint,
        }
    }

    fn add_index(&mut self, columns: ColumnNames, kind: IndexKind) -> IndexHandle<'_> {
        self.indexes.push(IndexDeclaration {
            columns: columns.into_vec(),
            kind,
            name: None,
        });
        let last = self.indexes.len() - 1;
        IndexHandle {
            declaration: &mut self.indexes[last],
        }
    }

    /// Declares a plain index.
    pub fn index(&mut self, columns: impl Into<ColumnNames>) -> IndexHandle<'_> {
        self.add_index(columns.into(), IndexKind::Index)
    }

    /// Declares a unique index.
    pub fn unique(&mut self, columns: impl Into<ColumnNames>) -> IndexHandle<'_> {
        self.add_index(columns.into(), IndexKind::Unique)
    }

    /// Declares the primary key.
    pub fn primary(&mut self, columns: impl Into<ColumnNames>) -> IndexHandle<'_> {
        self.add_index(columns.into(), IndexKind::Primary)
    }

    /// Declares a foreign key on `columns`.
    pub fn foreign(&mut self, columns: impl Into<ColumnNames>) -> ForeignKeyHandle<'_> {
        self.foreign_keys.push(ForeignKeyDeclaration {
            columns: columns.into().into_vec(),
            ..ForeignKeyDeclaration::default()
        });
        let last = self.foreign_keys.len() - 1;
        ForeignKeyHandle {
            declaration: &mut self.foreign_keys[last],
        }
    }

    /// Drops one or more columns.
    pub fn drop_column(&mut self, columns: impl Into<ColumnNames>) {
        self.dropped_columns.push(columns.into());
    }

    /// Drops a plain index.
    pub fn drop_index(&mut self, target: impl Into<DropTarget>) {
        self.dropped_indexes.push((IndexKind::Index, target.into()));
    }

    /// Drops a unique index.
    pub fn drop_unique(&mut self, target: impl Into<DropTarget>) {
        self.dropped_indexes.push((IndexKind::Unique, target.into()));
    }

    /// Drops the primary key.
    pub fn drop_primary(&mut self, target: impl Into<DropTarget>) {
        self.dropped_indexes.push((IndexKind::Primary, target.into()));
    }

    /// Drops a foreign key constraint.
    pub fn drop_foreign(&mut self, target: impl Into<DropTarget>) {
        self.dropped_foreign_keys.push(target.into());
    }

    /// Compiles the declarations into ordered operations.
    ///
    /// `existing_columns` and `existing_indexes` describe the table as it is
    /// now (both empty for a new table). Name comparisons follow `case`.
    ///
    /// Dropping a column also drops every secondary index covering it, ahead
    /// of the column drop.
    pub fn compile(
        &self,
        config: &ConnectionConfig,
        existing_columns: &[String],
        existing_indexes: &[IndexInfo],
        case: IdentifierCase,
    ) -> Result<Vec<Operation>> {
        let resolver = IdentifierResolver::new(config).with_case(case);
        let table = resolver.table_ref(&self.table);

        if self.mode == Mode::Create {
            if self.columns.is_empty() {
                return Err(self.definition_error("a new table needs at least one column"));
            }
            if !self.dropped_columns.is_empty()
                || !self.dropped_indexes.is_empty()
                || !self.dropped_foreign_keys.is_empty()
            {
                return Err(self.definition_error("a new table has nothing to drop"));
            }
        }

        self.check_added_columns(&table, existing_columns, case)?;
        let dropped = self.check_dropped_columns(&table, existing_columns, case)?;

        // columns an index or a foreign key may refer to
        let available: Vec<&str> = self
            .columns
            .iter()
            .map(|c| c.name.as_str())
            .chain(
                existing_columns
                    .iter()
                    .map(String::as_str)
                    .filter(|c| !case.contains(&dropped, c)),
            )
            .collect();

        let (primary_key, indexes) = self.resolve_indexes(&resolver, &available, case)?;
        let foreign_keys = self.resolve_foreign_keys(&resolver, &available, case)?;

        let mut operations = Vec::new();
        match self.mode {
            Mode::Create => {
                operations.push(Operation::CreateTable {
                    table: table.clone(),
                    columns: self.columns.clone(),
                    primary_key,
                    foreign_keys,
                });
                operations.extend(indexes.into_iter().map(|index| Operation::CreateIndex {
                    table: table.clone(),
                    index,
                }));
            }
            Mode::Alter => {
                for target in &self.dropped_foreign_keys {
                    let name = match target {
                        DropTarget::Name(name) => resolver.index_ref(name),
                        DropTarget::Columns(columns) => {
                            self.check_drop_columns(columns)?;
                            resolver.derived_foreign_key(&self.table, columns)
                        }
                    };
                    operations.push(Operation::drop_foreign_key(table.clone(), name));
                }
                for (kind, target) in &self.dropped_indexes {
                    let name = match target {
                        DropTarget::Name(name) => resolver.index_ref(name),
                        DropTarget::Columns(columns) => {
                            self.check_drop_columns(columns)?;
                            resolver.derived_index(&self.table, columns, *kind)
                        }
                    };
                    operations.push(Operation::DropIndex {
                        table: table.clone(),
                        name,
                        kind: *kind,
                    });
                }
                if !dropped.is_empty() {
                    for index in existing_indexes {
                        if index.kind == IndexKind::Primary
                            || !index.columns.iter().any(|c| case.contains(&dropped, c))
                        {
                            continue;
                        }
                        let already_dropped = operations.iter().any(|op| {
                            matches!(op, Operation::DropIndex { name, .. }
                                if case.eq(&name.physical, &index.name))
                        });
                        if !already_dropped {
                            operations.push(Operation::DropIndex {
                                table: table.clone(),
                                name: resolver.index_ref_from_physical(&index.name),
                                kind: index.kind,
                            });
                        }
                    }
                    operations.push(Operation::DropColumns {
                        table: table.clone(),
                        columns: dropped,
                    });
                }
                operations.extend(self.columns.iter().map(|column| Operation::AddColumn {
                    table: table.clone(),
                    column: column.clone(),
                }));
                operations.extend(primary_key.into_iter().chain(indexes).map(|index| {
                    Operation::CreateIndex {
                        table: table.clone(),
                        index,
                    }
                }));
                operations.extend(foreign_keys.into_iter().map(|foreign_key| {
                    Operation::AddForeignKey {
                        table: table.clone(),
                        foreign_key,
                    }
                }));
            }
        }

        debug!(
            table = %self.table,
            operations = operations.len(),
            "Compiled blueprint"
        );
        Ok(operations)
    }

    fn definition_error(&self, message: impl Into<String>) -> SchemaError {
        SchemaError::Definition {
            table: self.table.clone(),
            message: message.into(),
        }
    }

    fn check_drop_columns(&self, columns: &[String]) -> Result<()> {
        if columns.is_empty() {
            return Err(self.definition_error("cannot derive an index name from no columns"));
        }
        Ok(())
    }

    fn check_added_columns(
        &self,
        table: &TableRef,
        existing_columns: &[String],
        case: IdentifierCase,
    ) -> Result<()> {
        for (i, column) in self.columns.iter().enumerate() {
            let reason = if case.contains(existing_columns, &column.name) {
                "column already exists"
            } else if self.columns[..i]
                .iter()
                .any(|c| case.eq(&c.name, &column.name))
            {
                "column is declared more than once"
            } else {
                continue;
            };
            let operation = Operation::AddColumn {
                table: table.clone(),
                column: column.clone(),
            };
            return Err(SchemaError::conflict(&operation, reason));
        }
        Ok(())
    }

    /// Returns the dropped columns, flattened in request order.
    fn check_dropped_columns(
        &self,
        table: &TableRef,
        existing_columns: &[String],
        case: IdentifierCase,
    ) -> Result<Vec<String>> {
        let mut dropped: Vec<String> = Vec::new();
        for names in &self.dropped_columns {
            if names.is_empty() {
                return Err(self.definition_error("drop_column needs at least one column"));
            }
            for name in names.as_slice() {
                let reason = if !case.contains(existing_columns, name) {
                    "column does not exist"
                } else if case.contains(&dropped, name) {
                    "column is listed more than once"
                } else {
                    dropped.push(name.clone());
                    continue;
                };
                let operation = Operation::DropColumns {
                    table: table.clone(),
                    columns: vec![name.clone()],
                };
                return Err(SchemaError::conflict(&operation, reason));
            }
        }
        Ok(dropped)
    }

    fn check_columns_declared(
        &self,
        what: &str,
        columns: &[String],
        available: &[&str],
        case: IdentifierCase,
    ) -> Result<()> {
        if columns.is_empty() {
            return Err(self.definition_error(format!("{what} has no columns")));
        }
        match columns.iter().find(|c| !case.contains(available, c)) {
            Some(missing) => Err(self.definition_error(format!(
                "{what} on ({}) references undeclared column '{missing}'",
                columns.join(", ")
            ))),
            None => Ok(()),
        }
    }

    fn resolve_indexes(
        &self,
        resolver: &IdentifierResolver,
        available: &[&str],
        case: IdentifierCase,
    ) -> Result<(Option<IndexDefinition>, Vec<IndexDefinition>)> {
        let mut primary: Option<IndexDefinition> = None;
        let mut indexes = Vec::new();

        for declaration in &self.indexes {
            let what = format!("{} index", declaration.kind);
            self.check_columns_declared(&what, &declaration.columns, available, case)?;

            let name = match &declaration.name {
                Some(name) => resolver.index_ref(name),
                None => resolver.derived_index(&self.table, &declaration.columns, declaration.kind),
            };
            let index = IndexDefinition {
                name,
                columns: declaration.columns.clone(),
                kind: declaration.kind,
            };

            if index.kind == IndexKind::Primary {
                if primary.is_some() {
                    return Err(self.definition_error("more than one primary key is declared"));
                }
                primary = Some(index);
            } else {
                indexes.push(index);
            }
        }

        let mut auto_increment = self.columns.iter().filter(|c| c.auto_increment);
        if let Some(column) = auto_increment.next() {
            if auto_increment.next().is_some() {
                return Err(self.definition_error("only one column may auto-increment"));
            }
            let implied = match &primary {
                None => true,
                Some(pk) if pk.columns.len() == 1 && case.eq(&pk.columns[0], &column.name) => {
                    false
                }
                Some(_) => {
                    return Err(self.definition_error(format!(
                        "auto-incrementing column '{}' must be the primary key",
                        column.name
                    )));
                }
            };
            if implied {
                let columns = vec![column.name.clone()];
                primary = Some(IndexDefinition {
                    name: resolver.derived_index(&self.table, &columns, IndexKind::Primary),
                    columns,
                    kind: IndexKind::Primary,
                });
            }
        }

        Ok((primary, indexes))
    }

    fn resolve_foreign_keys(
        &self,
        resolver: &IdentifierResolver,
        available: &[&str],
        case: IdentifierCase,
    ) -> Result<Vec<ForeignKeyDefinition>> {
        let mut foreign_keys = Vec::with_capacity(self.foreign_keys.len());

        for declaration in &self.foreign_keys {
            self.check_columns_declared("foreign key", &declaration.columns, available, case)?;
            let columns = declaration.columns.join(", ");

            let Some(references) = declaration.references.as_deref() else {
                return Err(self.definition_error(format!(
                    "foreign key on ({columns}) has no referenced table"
                )));
            };
            if declaration.referenced_columns.is_empty() {
                return Err(self.definition_error(format!(
                    "foreign key on ({columns}) has no referenced columns"
                )));
            }
            if declaration.referenced_columns.len() != declaration.columns.len() {
                return Err(self.definition_error(format!(
                    "foreign key on ({columns}) references {} column(s) of '{references}'",
                    declaration.referenced_columns.len()
                )));
            }

            let name = match &declaration.name {
                Some(name) => resolver.index_ref(name),
                None => resolver.derived_foreign_key(&self.table, &declaration.columns),
            };
            foreign_keys.push(ForeignKeyDefinition {
                name,
                columns: declaration.columns.clone(),
                references: resolver.table_ref(references),
                referenced_columns: declaration.referenced_columns.clone(),
                on_delete: declaration.on_delete,
                on_update: declaration.on_update,
            });
        }

        Ok(foreign_keys)
    }
}

/// Modifiers for a freshly declared column.
pub struct ColumnHandle<'a> {
    blueprint: &'a mut Blueprint,
    index: usize,
}

impl ColumnHandle<'_> {
    fn definition(&mut self) -> &mut ColumnDefinition {
        &mut self.blueprint.columns[self.index]
    }

    /// Allows NULL values.
    pub fn nullable(mut self) -> Self {
        self.definition().nullable = true;
        self
    }

    /// Sets the default value.
    pub fn default(mut self, value: impl Into<DefaultValue>) -> Self {
        self.definition().default = Some(value.into());
        self
    }

    /// Makes the column auto-increment. Implies the primary key.
    pub fn auto_increment(mut self) -> Self {
        self.definition().auto_increment = true;
        self
    }

    fn add_index(self, kind: IndexKind) -> Self {
        let name = self.blueprint.columns[self.index].name.clone();
        self.blueprint.add_index(ColumnNames::from(name), kind);
        self
    }

    /// Adds a plain index on this column.
    pub fn index(self) -> Self {
        self.add_index(IndexKind::Index)
    }

    /// Adds a unique index on this column.
    pub fn unique(self) -> Self {
        self.add_index(IndexKind::Unique)
    }

    /// Makes this column the primary key.
    pub fn primary(self) -> Self {
        self.add_index(IndexKind::Primary)
    }
}

/// Modifiers for a column declared with [`Blueprint::foreign_id`].
pub struct ForeignIdHandle<'a> {
    blueprint: &'a mut Blueprint,
    index: usize,
}

impl<'a> ForeignIdHandle<'a> {
    /// Allows NULL values.
    pub fn nullable(self) -> Self {
        self.blueprint.columns[self.index].nullable = true;
        self
    }

    /// References `column` of a table given with [`ForeignKeyHandle::on`].
    pub fn references(self, column: &str) -> ForeignKeyHandle<'a> {
        let local = self.blueprint.columns[self.index].name.clone();
        let blueprint = self.blueprint;
        blueprint.foreign(local).references(column)
    }

    /// References the `id` column of `table`.
    pub fn constrained(self, table: &str) -> ForeignKeyHandle<'a> {
        self.references("id").on(table)
    }
}

/// Options of a declared index.
pub struct IndexHandle<'a> {
    declaration: &'a mut IndexDeclaration,
}

impl IndexHandle<'_> {
    /// Uses an explicit logical name instead of the conventional one.
    pub fn name(self, name: impl Into<String>) -> Self {
        self.declaration.name = Some(name.into());
        self
    }
}

/// Options of a declared foreign key.
pub struct ForeignKeyHandle<'a> {
    declaration: &'a mut ForeignKeyDeclaration,
}

impl ForeignKeyHandle<'_> {
    /// Sets the referenced columns.
    pub fn references(self, columns: impl Into<ColumnNames>) -> Self {
        self.declaration.referenced_columns = columns.into().into_vec();
        self
    }

    /// Sets the referenced table (logical name).
    pub fn on(self, table: impl Into<String>) -> Self {
        self.declaration.references = Some(table.into());
        self
    }

    /// Action taken on referencing rows when the referenced row is deleted.
    pub fn on_delete(self, action: ForeignKeyAction) -> Self {
        self.declaration.on_delete = Some(action);
        self
    }

    /// Action taken on referencing rows when the referenced key changes.
    pub fn on_update(self, action: ForeignKeyAction) -> Self {
        self.declaration.on_update = Some(action);
        self
    }

    /// Deletes referencing rows with the referenced row.
    pub fn cascade_on_delete(self) -> Self {
        self.on_delete(ForeignKeyAction::Cascade)
    }

    /// Propagates key updates to referencing rows.
    pub fn cascade_on_update(self) -> Self {
        self.on_update(ForeignKeyAction::Cascade)
    }

    /// Sets the referencing columns to NULL when the referenced row goes.
    pub fn null_on_delete(self) -> Self {
        self.on_delete(ForeignKeyAction::SetNull)
    }

    /// Refuses to delete a row that is still referenced.
    pub fn restrict_on_delete(self) -> Self {
        self.on_delete(ForeignKeyAction::Restrict)
    }

    /// Uses an explicit logical constraint name.
    pub fn name(self, name: impl Into<String>) -> Self {
        self.declaration.name = Some(name.into());
        self
    }
}
