//! Thin CRUD repository base over a SQL statement builder.
//!
//! Callers hand a [`db::Adapter`] to a [`BaseRepository`] and use the
//! [`Repository`] helpers, or build [`sql`] statements themselves and run them
//! through the `*_with` variants.

pub mod config;
pub mod db;
pub mod logging;
pub mod repo;
pub mod sql;

pub use config::{ConfigError, CoreConfig, DbConfig, LoggingConfig};
pub use db::{
    open_db, open_db_in_memory, open_db_with, Adapter, Connection, DbError, DbResult,
    SqliteAdapter, StatementResult,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use repo::base_repo::{BaseRepository, JoinSpec, RepoError, RepoResult, Repository};
pub use repo::condition::Condition;
pub use repo::result_set::{FromStatementResult, ResultRow, ResultSet};
pub use sql::{
    Delete, Filterable, Insert, JoinType, Order, Platform, PreparedStatement, Predicate, Select,
    Sql, SqlError, SqlObject, TableIdentifier, TableRef, Update, Where,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
