#![allow(dead_code)]

use rusqlite::types::Value;
use std::cell::RefCell;
use tablerepo_core::{
    Adapter, Connection, DbError, DbResult, Platform, PreparedStatement, StatementResult,
};

/// Adapter that records every statement and answers with canned results.
pub struct RecordingAdapter {
    platform: Platform,
    affected_rows: usize,
    generated_value: i64,
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
    failing: bool,
    executed: RefCell<Vec<PreparedStatement>>,
}

impl RecordingAdapter {
    pub fn new(affected_rows: usize, generated_value: i64) -> Self {
        Self {
            platform: Platform::sqlite(),
            affected_rows,
            generated_value,
            columns: Vec::new(),
            rows: Vec::new(),
            failing: false,
            executed: RefCell::new(Vec::new()),
        }
    }

    pub fn with_rows(mut self, columns: &[&str], rows: Vec<Vec<Value>>) -> Self {
        self.columns = columns.iter().map(|name| name.to_string()).collect();
        self.rows = rows;
        self
    }

    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    pub fn executed(&self) -> Vec<PreparedStatement> {
        self.executed.borrow().clone()
    }

    pub fn last_sql(&self) -> String {
        self.executed
            .borrow()
            .last()
            .map(|statement| statement.sql().to_string())
            .expect("at least one statement should have been executed")
    }
}

impl Adapter for RecordingAdapter {
    fn platform(&self) -> Platform {
        self.platform
    }

    fn execute(&self, statement: &PreparedStatement) -> DbResult<StatementResult> {
        self.executed.borrow_mut().push(statement.clone());
        if self.failing {
            return Err(DbError::Sqlite(rusqlite::Error::InvalidQuery));
        }
        if statement.sql().starts_with("SELECT") {
            return Ok(StatementResult::with_rows(
                self.columns.clone(),
                self.rows.clone(),
            ));
        }
        Ok(StatementResult::affected(self.affected_rows))
    }

    fn connection(&self) -> &dyn Connection {
        self
    }
}

impl Connection for RecordingAdapter {
    fn last_generated_value(&self) -> DbResult<i64> {
        Ok(self.generated_value)
    }

    fn driver_name(&self) -> &'static str {
        "recording"
    }
}

pub fn text(value: &str) -> Value {
    Value::Text(value.to_string())
}
