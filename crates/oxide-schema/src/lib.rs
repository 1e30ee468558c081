//! Cross-dialect relational schema builder.
//!
//! `oxide-schema` defines, inspects and tears down tables on SQLite and
//! PostgreSQL through one API:
//! - Tables are declared with a fluent [`Blueprint`](blueprint::Blueprint)
//!   and written in *logical* names; a per-connection prefix is applied in
//!   exactly one place, the [`IdentifierResolver`](resolver::IdentifierResolver)
//! - Structural predicates (`has_table`, `has_column`, `has_index`,
//!   `has_foreign_key`) read the live catalog on every call
//! - Dropping every table works whatever the foreign keys between them,
//!   cycles included
//!
//! # Architecture
//!
//! - **Blueprint** - Collects declarations and compiles them into
//!   [`Operation`](operations::Operation)s
//! - **Grammar** - Renders operations into backend-specific DDL
//! - **Adapter** - Owns the connection, executes DDL and reads the catalog
//! - **Introspector** - Turns catalog records into prefix-free snapshots
//! - **Destroyer** - Orders table and column drops around foreign keys
//!
//! # Example
//!
//! ```rust,ignore
//! use oxide_schema::prelude::*;
//!
//! let adapter = SqliteAdapter::connect("sqlite:app.db").await?;
//! let mut schema = SchemaBuilder::new(adapter, ConnectionConfig::sqlite().with_prefix("app_"))?;
//!
//! schema
//!     .create("users", |table| {
//!         table.id();
//!         table.string("email").unique();
//!         table.foreign_id("team_id").constrained("teams").cascade_on_delete();
//!         table.timestamps();
//!     })
//!     .await?;
//!
//! assert!(schema.has_table("users").await?);
//! assert!(schema.has_index("users", &["email"], None).await?);
//! assert!(schema.has_foreign_key("users", &["team_id"], "teams", &["id"]).await?);
//!
//! schema.drop_all_tables().await?;
//! ```

pub mod adapter;
pub mod blueprint;
pub mod builder;
pub mod catalog;
pub mod config;
pub mod destroy;
pub mod error;
pub mod grammar;
pub mod graph;
pub mod introspect;
pub mod operations;
pub mod predicates;
pub mod resolver;
pub mod schema;
pub mod snapshot;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::adapter::{PostgresAdapter, SchemaAdapter, SqliteAdapter};
    pub use crate::blueprint::Blueprint;
    pub use crate::builder::SchemaBuilder;
    pub use crate::config::{ConnectionConfig, Driver};
    pub use crate::error::{Result, SchemaError};
    pub use crate::graph::{DependencyGraph, TeardownStep};
    pub use crate::schema::{ColumnType, DefaultValue, ForeignKeyAction, IndexKind};
    pub use crate::snapshot::{SchemaSnapshot, TableSnapshot};
}
