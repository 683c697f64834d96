//! UPDATE statement builder.

use super::join::{Join, JoinType};
use super::platform::Platform;
use super::predicate::{Combinator, Filterable, Where};
use super::prepared::{PreparedStatement, SqlWriter};
use super::table::TableRef;
use super::{SqlError, SqlObject, SqlResult};
use rusqlite::types::Value;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Update {
    table: Option<TableRef>,
    set: Vec<(String, Value)>,
    joins: Vec<Join>,
    where_clause: Where,
}

impl Update {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_table(table: impl Into<TableRef>) -> Self {
        let mut update = Self::new();
        update.set_table(table);
        update
    }

    pub fn set_table(&mut self, table: impl Into<TableRef>) -> &mut Self {
        self.table = Some(table.into());
        self
    }

    /// Replaces the SET assignments.
    pub fn set<I, K, V>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.set.clear();
        for (column, value) in values {
            self.value(column, value);
        }
        self
    }

    /// Assigns one column, overwriting an earlier assignment to it.
    pub fn value(&mut self, column: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        let column = column.into();
        let value = value.into();
        match self.set.iter_mut().find(|(name, _)| *name == column) {
            Some(slot) => slot.1 = value,
            None => self.set.push((column, value)),
        }
        self
    }

    pub fn join(
        &mut self,
        table: impl Into<TableRef>,
        on: impl Into<String>,
        kind: JoinType,
    ) -> &mut Self {
        self.joins.push(Join {
            table: table.into(),
            on: on.into(),
            kind,
        });
        self
    }

    pub fn table(&self) -> Option<&TableRef> {
        self.table.as_ref()
    }

    pub fn assignments(&self) -> &[(String, Value)] {
        &self.set
    }

    pub fn joins(&self) -> &[Join] {
        &self.joins
    }
}

impl Filterable for Update {
    fn and_where(&mut self, clause: impl Into<Where>) -> &mut Self {
        self.where_clause.merge(Combinator::And, clause.into());
        self
    }

    fn or_where(&mut self, clause: impl Into<Where>) -> &mut Self {
        self.where_clause.merge(Combinator::Or, clause.into());
        self
    }

    fn where_clause(&self) -> &Where {
        &self.where_clause
    }
}

impl SqlObject for Update {
    fn build(&self, platform: &Platform) -> SqlResult<PreparedStatement> {
        let table = self
            .table
            .as_ref()
            .ok_or(SqlError::MissingTable { statement: "update" })?;
        if self.set.is_empty() {
            return Err(SqlError::EmptyValues { statement: "update" });
        }

        let mut writer = SqlWriter::new(platform);
        writer.push("UPDATE ");
        table.render(&mut writer);
        for join in &self.joins {
            join.render(&mut writer);
        }
        writer.push(" SET ");
        for (index, (column, value)) in self.set.iter().enumerate() {
            if index > 0 {
                writer.push(", ");
            }
            writer.push_identifier(column);
            writer.push(" = ");
            writer.push_param(value.clone());
        }
        self.where_clause.render_clause(&mut writer)?;

        Ok(writer.finish())
    }
}
