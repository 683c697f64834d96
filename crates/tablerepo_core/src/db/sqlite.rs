//! rusqlite-backed adapter.

use super::{Adapter, Connection, DbResult, StatementResult};
use crate::sql::{Platform, PreparedStatement};
use rusqlite::params_from_iter;
use rusqlite::types::Value;

/// Adapter over one owned SQLite connection.
pub struct SqliteAdapter {
    conn: rusqlite::Connection,
}

impl SqliteAdapter {
    /// Wraps an already configured connection.
    pub fn new(conn: rusqlite::Connection) -> Self {
        Self { conn }
    }

    /// Underlying connection, for work outside the statement builders
    /// (schema setup, pragmas).
    pub fn handle(&self) -> &rusqlite::Connection {
        &self.conn
    }
}

impl Adapter for SqliteAdapter {
    fn platform(&self) -> Platform {
        Platform::sqlite()
    }

    fn execute(&self, statement: &PreparedStatement) -> DbResult<StatementResult> {
        let mut stmt = self.conn.prepare(statement.sql())?;
        let column_count = stmt.column_count();

        if column_count == 0 {
            let affected = stmt.execute(params_from_iter(statement.params()))?;
            return Ok(StatementResult::affected(affected));
        }

        let columns = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>();
        let mut rows = stmt.query(params_from_iter(statement.params()))?;
        let mut data = Vec::new();
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(column_count);
            for index in 0..column_count {
                values.push(row.get::<_, Value>(index)?);
            }
            data.push(values);
        }

        Ok(StatementResult::with_rows(columns, data))
    }

    fn connection(&self) -> &dyn Connection {
        &self.conn
    }
}

impl Connection for rusqlite::Connection {
    fn last_generated_value(&self) -> DbResult<i64> {
        Ok(self.last_insert_rowid())
    }

    fn driver_name(&self) -> &'static str {
        "sqlite"
    }
}
