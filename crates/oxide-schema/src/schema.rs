//! Schema vocabulary shared by the blueprint, the grammars and the catalog.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Column data types understood by the grammars.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    /// Integer (32-bit).
    Integer,
    /// Big integer (64-bit).
    BigInt,
    /// Small integer (16-bit).
    SmallInt,
    /// Unbounded text.
    Text,
    /// Variable-length character string.
    Varchar(usize),
    /// Fixed-length character string.
    Char(usize),
    /// Boolean.
    Boolean,
    /// Date and time.
    DateTime,
    /// Date only.
    Date,
    /// Time only.
    Time,
    /// Timestamp.
    Timestamp,
    /// Floating point (single precision).
    Real,
    /// Floating point (double precision).
    Double,
    /// Decimal with precision and scale.
    Decimal(u8, u8),
    /// Binary large object.
    Blob,
    /// JSON data.
    Json,
    /// UUID.
    Uuid,
}

/// Default value for a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DefaultValue {
    /// NULL default.
    Null,
    /// Boolean default.
    Bool(bool),
    /// Integer default.
    Integer(i64),
    /// Float default.
    Float(f64),
    /// String default.
    String(String),
    /// SQL expression (e.g., "CURRENT_TIMESTAMP").
    Expression(String),
}

impl DefaultValue {
    /// Returns the SQL literal for this default, rendering booleans as 1/0.
    #[must_use]
    pub fn to_sql(&self) -> String {
        match self {
            Self::Null => "NULL".to_string(),
            Self::Bool(b) => if *b { "1" } else { "0" }.to_string(),
            Self::Integer(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::String(s) => format!("'{}'", s.replace('\'', "''")),
            Self::Expression(expr) => expr.clone(),
        }
    }
}

impl From<bool> for DefaultValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for DefaultValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for DefaultValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for DefaultValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for DefaultValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for DefaultValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// Foreign key action (ON DELETE, ON UPDATE).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ForeignKeyAction {
    /// No action (error if referenced row is deleted/updated).
    #[default]
    NoAction,
    /// Restrict (same as NoAction but checked immediately).
    Restrict,
    /// Cascade the delete/update to referencing rows.
    Cascade,
    /// Set the foreign key column to NULL.
    SetNull,
    /// Set the foreign key column to its default value.
    SetDefault,
}

impl ForeignKeyAction {
    /// Returns the SQL representation of this action.
    #[must_use]
    pub fn to_sql(&self) -> &'static str {
        match self {
            Self::NoAction => "NO ACTION",
            Self::Restrict => "RESTRICT",
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::SetDefault => "SET DEFAULT",
        }
    }

    /// Parses the action keyword reported by a catalog.
    #[must_use]
    pub fn from_sql(keyword: &str) -> Option<Self> {
        match keyword.trim().to_ascii_uppercase().as_str() {
            "NO ACTION" => Some(Self::NoAction),
            "RESTRICT" => Some(Self::Restrict),
            "CASCADE" => Some(Self::Cascade),
            "SET NULL" => Some(Self::SetNull),
            "SET DEFAULT" => Some(Self::SetDefault),
            _ => None,
        }
    }
}

/// Kind of an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexKind {
    /// The primary key.
    Primary,
    /// A unique index.
    Unique,
    /// A plain index.
    Index,
}

impl IndexKind {
    /// Suffix used when deriving an index name.
    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Unique => "unique",
            Self::Index => "index",
        }
    }
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Reserved index name that designates the primary key.
pub const PRIMARY_INDEX_NAME: &str = "primary";

/// How a backend compares identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierCase {
    /// `Name` and `name` are the same identifier.
    Insensitive,
    /// `Name` and `name` are different identifiers.
    Sensitive,
}

impl IdentifierCase {
    /// Compares two identifiers under this policy.
    #[must_use]
    pub fn eq(self, a: &str, b: &str) -> bool {
        match self {
            Self::Insensitive => a.eq_ignore_ascii_case(b),
            Self::Sensitive => a == b,
        }
    }

    /// Normalizes an identifier so that equal identifiers compare equal.
    #[must_use]
    pub fn fold(self, name: &str) -> String {
        match self {
            Self::Insensitive => name.to_ascii_lowercase(),
            Self::Sensitive => name.to_string(),
        }
    }

    /// Returns true if `names` contains `name`.
    #[must_use]
    pub fn contains<S: AsRef<str>>(self, names: &[S], name: &str) -> bool {
        names.iter().any(|n| self.eq(n.as_ref(), name))
    }
}

/// One column name or an ordered list of them.
///
/// Every API that accepts "a column or several columns" takes
/// `impl Into<ColumnNames>`, so both `"id"` and `["a", "b"]` work.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ColumnNames(Vec<String>);

impl ColumnNames {
    /// Returns the names in declaration order.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Consumes the list.
    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        self.0
    }

    /// Returns true if the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<&str> for ColumnNames {
    fn from(name: &str) -> Self {
        Self(vec![name.to_string()])
    }
}

impl From<String> for ColumnNames {
    fn from(name: String) -> Self {
        Self(vec![name])
    }
}

impl From<&String> for ColumnNames {
    fn from(name: &String) -> Self {
        Self(vec![name.clone()])
    }
}

impl From<Vec<String>> for ColumnNames {
    fn from(names: Vec<String>) -> Self {
        Self(names)
    }
}

impl From<Vec<&str>> for ColumnNames {
    fn from(names: Vec<&str>) -> Self {
        Self(names.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for ColumnNames {
    fn from(names: &[&str]) -> Self {
        Self(names.iter().map(|n| (*n).to_string()).collect())
    }
}

impl From<&[String]> for ColumnNames {
    fn from(names: &[String]) -> Self {
        Self(names.to_vec())
    }
}

impl<const N: usize> From<[&str; N]> for ColumnNames {
    fn from(names: [&str; N]) -> Self {
        Self(names.iter().map(|n| (*n).to_string()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_value_to_sql() {
        assert_eq!(DefaultValue::Null.to_sql(), "NULL");
        assert_eq!(DefaultValue::Bool(true).to_sql(), "1");
        assert_eq!(DefaultValue::Integer(42).to_sql(), "42");
        assert_eq!(DefaultValue::String("it's".to_string()).to_sql(), "'it''s'");
        assert_eq!(
            DefaultValue::Expression("CURRENT_TIMESTAMP".to_string()).to_sql(),
            "CURRENT_TIMESTAMP"
        );
    }

    #[test]
    fn test_foreign_key_action_parse() {
        assert_eq!(
            ForeignKeyAction::from_sql("cascade"),
            Some(ForeignKeyAction::Cascade)
        );
        assert_eq!(
            ForeignKeyAction::from_sql("SET NULL"),
            Some(ForeignKeyAction::SetNull)
        );
        assert_eq!(ForeignKeyAction::from_sql("NONE"), None);
    }

    #[test]
    fn test_column_names_conversions() {
        assert_eq!(ColumnNames::from("id").as_slice(), ["id"]);
        assert_eq!(ColumnNames::from(["a", "b"]).as_slice(), ["a", "b"]);
        assert_eq!(ColumnNames::from(vec!["a"]).len(), 1);
        assert!(ColumnNames::from(Vec::<String>::new()).is_empty());
    }

    #[test]
    fn test_identifier_case() {
        assert!(IdentifierCase::Insensitive.eq("Name", "name"));
        assert!(!IdentifierCase::Sensitive.eq("Name", "name"));
        assert!(IdentifierCase::Insensitive.contains(&["ID", "name"], "id"));
        assert_eq!(IdentifierCase::Insensitive.fold("MiXed"), "mixed");
    }
}
