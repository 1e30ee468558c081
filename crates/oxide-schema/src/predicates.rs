//! Existence predicates over table snapshots.
//!
//! Matching is set equality on column names (on column pairs for foreign
//! keys): declaration order never matters and duplicates collapse.

use std::collections::BTreeSet;

use crate::error::{Result, SchemaError};
use crate::schema::{IdentifierCase, IndexKind, PRIMARY_INDEX_NAME};
use crate::snapshot::{ScopedName, TableSnapshot};

fn column_set<S: AsRef<str>>(columns: &[S], case: IdentifierCase) -> BTreeSet<String> {
    columns.iter().map(|c| case.fold(c.as_ref())).collect()
}

fn is_managed(name: &ScopedName, logical: &str, case: IdentifierCase) -> bool {
    name.managed().is_some_and(|n| case.eq(n, logical))
}

/// Rejects a column lookup without columns.
pub(crate) fn check_columns_request(table: &str, columns: usize) -> Result<()> {
    if columns == 0 {
        return Err(SchemaError::InvalidRequest(format!(
            "column lookup on table '{table}' needs at least one column"
        )));
    }
    Ok(())
}

/// Rejects an index lookup without columns.
pub(crate) fn check_index_request(table: &str, columns: usize) -> Result<()> {
    if columns == 0 {
        return Err(SchemaError::InvalidRequest(format!(
            "index lookup on table '{table}' needs at least one column"
        )));
    }
    Ok(())
}

/// Rejects a foreign key lookup whose columns do not pair up.
pub(crate) fn check_foreign_key_request(
    table: &str,
    columns: usize,
    referenced_columns: usize,
) -> Result<()> {
    if columns == 0 {
        return Err(SchemaError::InvalidRequest(format!(
            "foreign key lookup on table '{table}' needs at least one column"
        )));
    }
    if columns != referenced_columns {
        return Err(SchemaError::InvalidRequest(format!(
            "foreign key lookup on table '{table}' pairs {columns} column(s) \
             with {referenced_columns} referenced column(s)"
        )));
    }
    Ok(())
}

/// Returns true if the table has the column.
#[must_use]
pub fn has_column(table: &TableSnapshot, column: &str, case: IdentifierCase) -> bool {
    case.contains(&table.column_names().collect::<Vec<_>>(), column)
}

/// Returns true if the table has an index on exactly `columns`.
///
/// Without `name`, any index kind matches. With a name, the index must also
/// carry that logical name; [`PRIMARY_INDEX_NAME`] designates the primary
/// key whatever the backend calls it.
pub fn has_index<S: AsRef<str>>(
    table: &TableSnapshot,
    columns: &[S],
    name: Option<&str>,
    case: IdentifierCase,
) -> Result<bool> {
    check_index_request(&table.name, columns.len())?;
    let wanted = column_set(columns, case);

    Ok(table.indexes.iter().any(|index| {
        let named = match name {
            None => true,
            Some(name) if name.eq_ignore_ascii_case(PRIMARY_INDEX_NAME) => {
                index.kind == IndexKind::Primary
            }
            Some(name) => is_managed(&index.name, name, case),
        };
        named && column_set(&index.columns, case) == wanted
    }))
}

/// Returns true if the table has a foreign key pairing `columns` with
/// `referenced_columns` of the logical table `referenced_table`.
pub fn has_foreign_key<S: AsRef<str>, R: AsRef<str>>(
    table: &TableSnapshot,
    columns: &[S],
    referenced_table: &str,
    referenced_columns: &[R],
    case: IdentifierCase,
) -> Result<bool> {
    check_foreign_key_request(&table.name, columns.len(), referenced_columns.len())?;

    let pairs = |local: &[String], foreign: &[String]| -> BTreeSet<(String, String)> {
        local
            .iter()
            .zip(foreign)
            .map(|(l, f)| (case.fold(l), case.fold(f)))
            .collect()
    };
    let wanted: BTreeSet<(String, String)> = columns
        .iter()
        .zip(referenced_columns)
        .map(|(l, f)| (case.fold(l.as_ref()), case.fold(f.as_ref())))
        .collect();

    Ok(table.foreign_keys.iter().any(|fk| {
        is_managed(&fk.referenced_table, referenced_table, case)
            && fk.columns.len() == fk.referenced_columns.len()
            && pairs(&fk.columns, &fk.referenced_columns) == wanted
    }))
}
