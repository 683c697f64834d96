//! Generic CRUD repository over a borrowed adapter.
//!
//! # Responsibility
//! - Build statements through the lazily created factory and run them.
//! - Hide table aliases from INSERT/UPDATE execution, since most engines
//!   reject them there.
//! - Track the identifier generated by the most recent insert.
//!
//! # Invariants
//! - Every operation fails with [`RepoError::Setup`] until an adapter is set.
//! - `insert_with`/`update_with` leave the caller's statement with the table
//!   it had before the call, whether execution succeeded or not.
//! - Affected-row counts are returned as reported by the adapter.

use super::condition::Condition;
use super::result_set::{FromStatementResult, ResultSet};
use crate::db::{Adapter, Connection, DbError, StatementResult};
use crate::sql::{
    Delete, Insert, JoinType, PreparedStatement, Select, Sql, SqlError, SqlObject, TableRef,
    Update,
};
use log::{debug, error};
use rusqlite::types::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

const NO_ADAPTER_MESSAGE: &str = "This repository does not have an Adapter setup";

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug)]
pub enum RepoError {
    /// The repository has no adapter to work with.
    Setup(&'static str),
    Sql(SqlError),
    Db(DbError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Setup(message) => write!(f, "{message}"),
            Self::Sql(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Setup(_) => None,
            Self::Sql(err) => Some(err),
            Self::Db(err) => Some(err),
        }
    }
}

impl From<SqlError> for RepoError {
    fn from(value: SqlError) -> Self {
        Self::Sql(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Join to attach to an UPDATE. `kind = None` means INNER.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinSpec {
    pub name: TableRef,
    pub on: String,
    pub kind: Option<JoinType>,
}

impl JoinSpec {
    pub fn new(name: impl Into<TableRef>, on: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            on: on.into(),
            kind: None,
        }
    }

    pub fn with_kind(mut self, kind: JoinType) -> Self {
        self.kind = Some(kind);
        self
    }
}

/// Capability set that callers depend on instead of a concrete repository.
pub trait Repository {
    fn adapter(&self) -> Option<&dyn Adapter>;

    /// Selects rows wrapped as `R`.
    fn select_as<R: FromStatementResult>(
        &mut self,
        table: impl Into<TableRef>,
        condition: Option<Condition<'_, Select>>,
    ) -> RepoResult<R>;

    fn select(
        &mut self,
        table: impl Into<TableRef>,
        condition: Option<Condition<'_, Select>>,
    ) -> RepoResult<ResultSet> {
        self.select_as(table, condition)
    }

    fn insert<I, K, V>(&mut self, table: impl Into<TableRef>, values: I) -> RepoResult<usize>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>;

    fn update<I, K, V>(
        &mut self,
        table: impl Into<TableRef>,
        values: I,
        condition: Option<Condition<'_, Update>>,
        joins: &[JoinSpec],
    ) -> RepoResult<usize>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>;

    fn delete(
        &mut self,
        table: impl Into<TableRef>,
        condition: Condition<'_, Delete>,
    ) -> RepoResult<usize>;
}

/// Repository base holding a borrowed adapter and a statement factory.
#[derive(Default)]
pub struct BaseRepository<'a> {
    adapter: Option<&'a dyn Adapter>,
    sql: Option<Sql>,
    columns: Vec<String>,
    last_insert_value: Option<i64>,
    is_initialized: bool,
}

impl<'a> BaseRepository<'a> {
    /// Creates a ready repository whose factory matches the adapter platform.
    pub fn new(adapter: &'a dyn Adapter) -> Self {
        Self::with_sql(adapter, Sql::new(adapter.platform()))
    }

    /// Creates a ready repository around a caller-built factory.
    pub fn with_sql(adapter: &'a dyn Adapter, sql: Sql) -> Self {
        Self {
            adapter: Some(adapter),
            sql: Some(sql),
            is_initialized: true,
            ..Self::default()
        }
    }

    /// Creates a repository with no adapter; see [`Self::set_adapter`].
    pub fn unconfigured() -> Self {
        Self::default()
    }

    pub fn set_adapter(&mut self, adapter: &'a dyn Adapter) -> &mut Self {
        self.adapter = Some(adapter);
        self
    }

    /// Column list substituted for a wildcard select.
    pub fn with_columns<I, C>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_initialized(&self) -> bool {
        self.is_initialized
    }

    /// Creates the statement factory on first use. Idempotent.
    pub fn initialize(&mut self) -> RepoResult<()> {
        if self.is_initialized {
            return Ok(());
        }

        let Some(adapter) = self.adapter else {
            return Err(RepoError::Setup(NO_ADAPTER_MESSAGE));
        };
        if self.sql.is_none() {
            self.sql = Some(Sql::new(adapter.platform()));
        }
        self.is_initialized = true;

        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn sql(&self) -> Option<&Sql> {
        self.sql.as_ref()
    }

    pub fn connection(&self) -> RepoResult<&'a dyn Connection> {
        self.adapter
            .map(|adapter| adapter.connection())
            .ok_or(RepoError::Setup(NO_ADAPTER_MESSAGE))
    }

    /// Identifier generated by the last successful insert, if any.
    pub fn last_insert_value(&self) -> Option<i64> {
        self.last_insert_value
    }

    /// Runs a caller-built SELECT.
    pub fn select_with(&mut self, select: &mut Select) -> RepoResult<ResultSet> {
        self.select_with_as(select)
    }

    /// Runs a caller-built SELECT and wraps the rows as `R`.
    ///
    /// A wildcard column list is replaced on `select` by the configured
    /// columns, when there are any.
    pub fn select_with_as<R: FromStatementResult>(
        &mut self,
        select: &mut Select,
    ) -> RepoResult<R> {
        self.initialize()?;

        if select.selects_all_columns() && !self.columns.is_empty() {
            select.columns(self.columns.clone());
        }

        let (adapter, statement) = self.prepare(select)?;
        let result = run(adapter, "repo_select", select.table(), &statement)?;
        Ok(R::initialize(result))
    }

    /// Runs a caller-built INSERT and records the generated identifier.
    pub fn insert_with(&mut self, insert: &mut Insert) -> RepoResult<usize> {
        self.initialize()?;

        let aliased = insert.table().filter(|table| table.is_aliased()).cloned();
        if let Some(table) = &aliased {
            insert.set_table(table.unaliased());
        }

        let outcome = self.execute_insert(insert);

        if let Some(table) = aliased {
            insert.set_table(table);
        }
        outcome
    }

    /// Runs a caller-built UPDATE.
    pub fn update_with(&mut self, update: &mut Update) -> RepoResult<usize> {
        self.initialize()?;

        let aliased = update.table().filter(|table| table.is_aliased()).cloned();
        if let Some(table) = &aliased {
            update.set_table(table.unaliased());
        }

        let outcome = self
            .prepare(update)
            .and_then(|(adapter, statement)| {
                run(adapter, "repo_update", update.table(), &statement)
            })
            .map(|result| result.affected_rows());

        if let Some(table) = aliased {
            update.set_table(table);
        }
        outcome
    }

    /// Runs a caller-built DELETE.
    pub fn delete_with(&mut self, delete: &mut Delete) -> RepoResult<usize> {
        self.initialize()?;

        let (adapter, statement) = self.prepare(delete)?;
        let result = run(adapter, "repo_delete", delete.table(), &statement)?;
        Ok(result.affected_rows())
    }

    fn execute_insert(&mut self, insert: &Insert) -> RepoResult<usize> {
        let (adapter, statement) = self.prepare(insert)?;
        let result = run(adapter, "repo_insert", insert.table(), &statement)?;
        self.last_insert_value = Some(adapter.connection().last_generated_value()?);
        Ok(result.affected_rows())
    }

    fn factory(&self) -> RepoResult<&Sql> {
        self.sql.as_ref().ok_or(RepoError::Setup(NO_ADAPTER_MESSAGE))
    }

    fn prepare(&self, object: &dyn SqlObject) -> RepoResult<(&'a dyn Adapter, PreparedStatement)> {
        let adapter = self.adapter.ok_or(RepoError::Setup(NO_ADAPTER_MESSAGE))?;
        let statement = self.factory()?.prepare_statement(object)?;
        Ok((adapter, statement))
    }
}

impl Repository for BaseRepository<'_> {
    fn adapter(&self) -> Option<&dyn Adapter> {
        self.adapter
    }

    fn select_as<R: FromStatementResult>(
        &mut self,
        table: impl Into<TableRef>,
        condition: Option<Condition<'_, Select>>,
    ) -> RepoResult<R> {
        self.initialize()?;

        let mut select = self.factory()?.select(table);
        if let Some(condition) = condition {
            condition.apply(&mut select);
        }

        self.select_with_as(&mut select)
    }

    fn insert<I, K, V>(&mut self, table: impl Into<TableRef>, values: I) -> RepoResult<usize>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.initialize()?;

        let mut insert = self.factory()?.insert(table);
        insert.values(values);

        self.insert_with(&mut insert)
    }

    fn update<I, K, V>(
        &mut self,
        table: impl Into<TableRef>,
        values: I,
        condition: Option<Condition<'_, Update>>,
        joins: &[JoinSpec],
    ) -> RepoResult<usize>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.initialize()?;

        let mut update = self.factory()?.update(table);
        update.set(values);
        if let Some(condition) = condition {
            condition.apply(&mut update);
        }
        for join in joins {
            update.join(
                join.name.clone(),
                join.on.clone(),
                join.kind.unwrap_or_default(),
            );
        }

        self.update_with(&mut update)
    }

    fn delete(
        &mut self,
        table: impl Into<TableRef>,
        condition: Condition<'_, Delete>,
    ) -> RepoResult<usize> {
        self.initialize()?;

        let mut delete = self.factory()?.delete(table);
        condition.apply(&mut delete);

        self.delete_with(&mut delete)
    }
}

fn run(
    adapter: &dyn Adapter,
    event: &str,
    table: Option<&TableRef>,
    statement: &PreparedStatement,
) -> RepoResult<StatementResult> {
    let started_at = Instant::now();
    let table = table.map_or("-", |table| table.target().table());

    match adapter.execute(statement) {
        Ok(result) => {
            debug!(
                "event={event} module=repo status=ok table={table} affected_rows={} rows={} duration_ms={}",
                result.affected_rows(),
                result.rows().len(),
                started_at.elapsed().as_millis()
            );
            Ok(result)
        }
        Err(err) => {
            error!(
                "event={event} module=repo status=error table={table} duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err.into())
        }
    }
}
