//! Error types for the schema builder.

use crate::config::Driver;
use crate::operations::Operation;

/// Errors that can occur while defining, inspecting or tearing down a schema.
///
/// Every variant that concerns a table carries the *logical* table name, so
/// diagnostics read the same whatever prefix the connection uses.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The database could not be reached or the driver failed.
    #[error("Connection error: {0}")]
    Connection(#[from] sqlx::Error),

    /// A structural change conflicts with the catalog or with what the
    /// backend can express.
    #[error("Schema conflict on table '{table}' while trying to {intent}: {reason}")]
    SchemaConflict {
        /// Logical table name.
        table: String,
        /// Description of the intent that conflicted.
        intent: String,
        /// What the database (or the grammar) reported.
        reason: String,
    },

    /// A table definition is incomplete or references undeclared columns.
    #[error("Invalid definition for table '{table}': {message}")]
    Definition {
        /// Logical table name.
        table: String,
        /// What is wrong with the definition.
        message: String,
    },

    /// A predicate or drop request is malformed (e.g. an empty column list).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The configured driver does not match the adapter of the session.
    #[error("Configuration names driver '{actual}' but the session uses '{expected}'")]
    DriverMismatch {
        /// Driver implemented by the adapter.
        expected: Driver,
        /// Driver named by the configuration.
        actual: Driver,
    },

    /// The configuration names a driver that is not supported.
    #[error("Unknown driver: {0}")]
    UnknownDriver(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SchemaError {
    /// Builds a [`SchemaError::SchemaConflict`] for an operation.
    pub fn conflict(operation: &Operation, reason: impl Into<String>) -> Self {
        Self::SchemaConflict {
            table: operation.table().logical.clone(),
            intent: operation.description(),
            reason: reason.into(),
        }
    }

    /// Classifies a driver error raised while executing `operation`.
    ///
    /// Errors reported by the database itself mean the statement was
    /// rejected, which is a conflict with the catalog; everything else is a
    /// transport failure.
    pub fn from_statement(err: sqlx::Error, operation: &Operation) -> Self {
        match err {
            sqlx::Error::Database(db) => Self::conflict(operation, db.message()),
            other => Self::Connection(other),
        }
    }

    /// Returns true for [`SchemaError::SchemaConflict`].
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::SchemaConflict { .. })
    }

    /// Returns true for [`SchemaError::Definition`].
    #[must_use]
    pub fn is_definition(&self) -> bool {
        matches!(self, Self::Definition { .. })
    }
}

/// Result type for schema operations.
pub type Result<T> = std::result::Result<T, SchemaError>;
