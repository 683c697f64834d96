//! INSERT statement builder.

use super::platform::Platform;
use super::prepared::{PreparedStatement, SqlWriter};
use super::table::TableRef;
use super::{SqlError, SqlObject, SqlResult};
use rusqlite::types::Value;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Insert {
    table: Option<TableRef>,
    values: Vec<(String, Value)>,
}

impl Insert {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_table(table: impl Into<TableRef>) -> Self {
        let mut insert = Self::new();
        insert.set_table(table);
        insert
    }

    /// Sets the target table.
    pub fn set_table(&mut self, table: impl Into<TableRef>) -> &mut Self {
        self.table = Some(table.into());
        self
    }

    /// Replaces all column/value pairs.
    pub fn values<I, K, V>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.values.clear();
        for (column, value) in values {
            self.value(column, value);
        }
        self
    }

    /// Sets one column, overwriting an earlier value for the same column.
    pub fn value(&mut self, column: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        let column = column.into();
        let value = value.into();
        match self.values.iter_mut().find(|(name, _)| *name == column) {
            Some(slot) => slot.1 = value,
            None => self.values.push((column, value)),
        }
        self
    }

    pub fn table(&self) -> Option<&TableRef> {
        self.table.as_ref()
    }

    pub fn field_values(&self) -> &[(String, Value)] {
        &self.values
    }
}

impl SqlObject for Insert {
    fn build(&self, platform: &Platform) -> SqlResult<PreparedStatement> {
        let table = self
            .table
            .as_ref()
            .ok_or(SqlError::MissingTable { statement: "insert" })?;
        if self.values.is_empty() {
            return Err(SqlError::EmptyValues { statement: "insert" });
        }

        let mut writer = SqlWriter::new(platform);
        writer.push("INSERT INTO ");
        table.render(&mut writer);
        writer.push(" (");
        for (index, (column, _)) in self.values.iter().enumerate() {
            if index > 0 {
                writer.push(", ");
            }
            writer.push_identifier(column);
        }
        writer.push(") VALUES (");
        for (index, (_, value)) in self.values.iter().enumerate() {
            if index > 0 {
                writer.push(", ");
            }
            writer.push_param(value.clone());
        }
        writer.push(")");

        Ok(writer.finish())
    }
}
