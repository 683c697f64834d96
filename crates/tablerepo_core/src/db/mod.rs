//! Database adapter contract and the SQLite driver behind it.
//!
//! # Responsibility
//! - Define the narrow driver surface the repository layer consumes.
//! - Open and configure SQLite connections.
//!
//! # Invariants
//! - Affected-row counts are reported exactly as the driver returns them.
//! - Driver errors are wrapped, never translated.

use crate::sql::{Platform, PreparedStatement};
use rusqlite::types::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
mod sqlite;

pub use open::{open_db, open_db_in_memory, open_db_with};
pub use sqlite::SqliteAdapter;

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Live connection details a repository may ask for after executing.
pub trait Connection {
    /// Identifier generated by the most recent insert on this connection.
    fn last_generated_value(&self) -> DbResult<i64>;
    fn driver_name(&self) -> &'static str;
}

/// Database handle capable of preparing and running statements.
pub trait Adapter {
    /// Dialect used when rendering statements for this adapter.
    fn platform(&self) -> Platform;
    fn execute(&self, statement: &PreparedStatement) -> DbResult<StatementResult>;
    fn connection(&self) -> &dyn Connection;
}

/// Outcome of one executed statement.
///
/// Row data is present only for statements that produce a result set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatementResult {
    affected_rows: usize,
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl StatementResult {
    pub fn affected(affected_rows: usize) -> Self {
        Self {
            affected_rows,
            ..Self::default()
        }
    }

    pub fn with_rows(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self {
            affected_rows: 0,
            columns,
            rows,
        }
    }

    pub fn affected_rows(&self) -> usize {
        self.affected_rows
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<Vec<Value>>) {
        (self.columns, self.rows)
    }
}
