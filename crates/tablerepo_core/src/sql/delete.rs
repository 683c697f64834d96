//! DELETE statement builder.

use super::platform::Platform;
use super::predicate::{Combinator, Filterable, Where};
use super::prepared::{PreparedStatement, SqlWriter};
use super::table::TableRef;
use super::{SqlError, SqlObject, SqlResult};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Delete {
    table: Option<TableRef>,
    where_clause: Where,
}

impl Delete {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_table(table: impl Into<TableRef>) -> Self {
        let mut delete = Self::new();
        delete.from(table);
        delete
    }

    pub fn from(&mut self, table: impl Into<TableRef>) -> &mut Self {
        self.table = Some(table.into());
        self
    }

    pub fn table(&self) -> Option<&TableRef> {
        self.table.as_ref()
    }
}

impl Filterable for Delete {
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

impl SqlObject for Delete {
    fn build(&self, platform: &Platform) -> SqlResult<PreparedStatement> {
        let table = self
            .table
            .as_ref()
            .ok_or(SqlError::MissingTable { statement: "delete" })?;

        let mut writer = SqlWriter::new(platform);
        writer.push("DELETE FROM ");
        table.render(&mut writer);
        self.where_clause.render_clause(&mut writer)?;

        Ok(writer.finish())
    }
}
