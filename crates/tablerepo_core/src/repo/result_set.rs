//! Buffered row set returned by selects.

use crate::db::StatementResult;
use rusqlite::types::Value;
use std::collections::BTreeMap;

/// Rows of one executed SELECT, with their column names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

/// Row-set types a select can hand back.
///
/// `select_as`/`select_with_as` build the requested type from the executed
/// statement; [`ResultSet`] is the default.
pub trait FromStatementResult: Sized {
    fn initialize(result: StatementResult) -> Self;
}

impl FromStatementResult for ResultSet {
    fn initialize(result: StatementResult) -> Self {
        let (columns, rows) = result.into_parts();
        Self { columns, rows }
    }
}

impl ResultSet {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<ResultRow<'_>> {
        self.rows.get(index).map(|values| ResultRow {
            columns: &self.columns,
            values,
        })
    }

    pub fn first(&self) -> Option<ResultRow<'_>> {
        self.get(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = ResultRow<'_>> {
        self.rows.iter().map(|values| ResultRow {
            columns: &self.columns,
            values,
        })
    }

    /// Copies every row into a column-keyed map.
    pub fn to_maps(&self) -> Vec<BTreeMap<String, Value>> {
        self.iter().map(|row| row.to_map()).collect()
    }
}

/// Borrowed view of one row.
#[derive(Debug, Clone, Copy)]
pub struct ResultRow<'r> {
    columns: &'r [String],
    values: &'r [Value],
}

impl<'r> ResultRow<'r> {
    pub fn get(&self, column: &str) -> Option<&'r Value> {
        self.columns
            .iter()
            .position(|name| name == column)
            .and_then(|index| self.values.get(index))
    }

    pub fn get_i64(&self, column: &str) -> Option<i64> {
        match self.get(column)? {
            Value::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn get_text(&self, column: &str) -> Option<&'r str> {
        match self.get(column)? {
            Value::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn values(&self) -> &'r [Value] {
        self.values
    }

    pub fn to_map(&self) -> BTreeMap<String, Value> {
        self.columns
            .iter()
            .cloned()
            .zip(self.values.iter().cloned())
            .collect()
    }
}
