//! Connection configuration.
//!
//! The configuration is supplied by whatever opens the connection. A
//! [`SchemaBuilder`](crate::builder::SchemaBuilder) captures it once and never
//! re-reads it; using another prefix means opening another session.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SchemaError};

/// Database backends supported by the schema builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Driver {
    /// SQLite.
    #[serde(rename = "sqlite")]
    Sqlite,
    /// PostgreSQL.
    #[serde(rename = "pgsql", alias = "postgres", alias = "postgresql")]
    Postgres,
}

impl Driver {
    /// Returns the canonical driver identifier.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Postgres => "pgsql",
        }
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Driver {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "pgsql" | "postgres" | "postgresql" => Ok(Self::Postgres),
            _ => Err(SchemaError::UnknownDriver(s.to_string())),
        }
    }
}

fn default_prefix_indexes() -> bool {
    true
}

/// Settings of one connection session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Backend driver.
    pub driver: Driver,
    /// Prefix prepended to every table name.
    #[serde(default)]
    pub prefix: String,
    /// Whether the prefix also applies to index and constraint names.
    #[serde(default = "default_prefix_indexes")]
    pub prefix_indexes: bool,
}

impl ConnectionConfig {
    /// Creates a configuration without prefix.
    #[must_use]
    pub fn new(driver: Driver) -> Self {
        Self {
            driver,
            prefix: String::new(),
            prefix_indexes: true,
        }
    }

    /// Shorthand for a SQLite configuration.
    #[must_use]
    pub fn sqlite() -> Self {
        Self::new(Driver::Sqlite)
    }

    /// Shorthand for a PostgreSQL configuration.
    #[must_use]
    pub fn postgres() -> Self {
        Self::new(Driver::Postgres)
    }

    /// Sets the table prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Sets whether index names are prefixed too.
    #[must_use]
    pub fn with_prefix_indexes(mut self, enabled: bool) -> Self {
        self.prefix_indexes = enabled;
        self
    }

    /// Parses a configuration from JSON.
    ///
    /// Missing `prefix` and `prefix_indexes` keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
