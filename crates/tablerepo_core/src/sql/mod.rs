//! SQL statement objects and the factory that builds them.
//!
//! # Responsibility
//! - Provide mutable builders for one pending SELECT/INSERT/UPDATE/DELETE.
//! - Render builders into bound SQL text for a given [`Platform`].
//!
//! # Invariants
//! - Rendering never executes anything; drivers only see [`PreparedStatement`].
//! - Rendering a statement does not mutate it.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod delete;
pub mod insert;
pub mod join;
pub mod platform;
pub mod predicate;
mod prepared;
pub mod select;
pub mod table;
pub mod update;

pub use delete::Delete;
pub use insert::Insert;
pub use join::{Join, JoinType};
pub use platform::Platform;
pub use predicate::{Combinator, Filterable, Operator, Predicate, Where};
pub use prepared::PreparedStatement;
pub use select::{Order, Select, SQL_STAR};
pub use table::{TableIdentifier, TableRef};
pub use update::Update;

pub type SqlResult<T> = Result<T, SqlError>;

/// Statement rendering failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlError {
    MissingTable {
        statement: &'static str,
    },
    EmptyValues {
        statement: &'static str,
    },
    ParameterMismatch {
        expected: usize,
        actual: usize,
    },
}

impl Display for SqlError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingTable { statement } => {
                write!(f, "{statement} statement has no table")
            }
            Self::EmptyValues { statement } => {
                write!(f, "{statement} statement has no values to write")
            }
            Self::ParameterMismatch { expected, actual } => write!(
                f,
                "expression has {expected} placeholders but {actual} parameters"
            ),
        }
    }
}

impl Error for SqlError {}

/// Anything that renders to a prepared statement.
pub trait SqlObject {
    fn build(&self, platform: &Platform) -> SqlResult<PreparedStatement>;
}

/// Statement factory bound to one platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sql {
    platform: Platform,
}

impl Sql {
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    pub fn select(&self, table: impl Into<TableRef>) -> Select {
        Select::for_table(table)
    }

    pub fn insert(&self, table: impl Into<TableRef>) -> Insert {
        Insert::for_table(table)
    }

    pub fn update(&self, table: impl Into<TableRef>) -> Update {
        Update::for_table(table)
    }

    pub fn delete(&self, table: impl Into<TableRef>) -> Delete {
        Delete::for_table(table)
    }

    /// Renders any statement object for this factory's platform.
    pub fn prepare_statement(&self, object: &dyn SqlObject) -> SqlResult<PreparedStatement> {
        object.build(&self.platform)
    }
}
