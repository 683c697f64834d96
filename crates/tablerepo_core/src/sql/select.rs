//! SELECT statement builder.

use super::join::{Join, JoinType};
use super::platform::Platform;
use super::predicate::{Combinator, Filterable, Where};
use super::prepared::{PreparedStatement, SqlWriter};
use super::table::TableRef;
use super::{SqlError, SqlObject, SqlResult};

/// Wildcard column list marker.
pub const SQL_STAR: &str = "*";

/// Sort direction for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    table: Option<TableRef>,
    columns: Vec<String>,
    joins: Vec<Join>,
    where_clause: Where,
    group_by: Vec<String>,
    order_by: Vec<(String, Order)>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl Select {
    /// Creates an unbound SELECT over all columns.
    pub fn new() -> Self {
        Self {
            table: None,
            columns: vec![SQL_STAR.to_string()],
            joins: Vec::new(),
            where_clause: Where::new(),
            group_by: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    pub fn for_table(table: impl Into<TableRef>) -> Self {
        let mut select = Self::new();
        select.from(table);
        select
    }

    pub fn from(&mut self, table: impl Into<TableRef>) -> &mut Self {
        self.table = Some(table.into());
        self
    }

    /// Replaces the column list.
    pub fn columns<I, C>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
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

    pub fn group_by(&mut self, column: impl Into<String>) -> &mut Self {
        self.group_by.push(column.into());
        self
    }

    pub fn order_by(&mut self, column: impl Into<String>, order: Order) -> &mut Self {
        self.order_by.push((column.into(), order));
        self
    }

    pub fn limit(&mut self, limit: u64) -> &mut Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(&mut self, offset: u64) -> &mut Self {
        self.offset = Some(offset);
        self
    }

    pub fn table(&self) -> Option<&TableRef> {
        self.table.as_ref()
    }

    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    pub fn limit_value(&self) -> Option<u64> {
        self.limit
    }

    pub fn offset_value(&self) -> Option<u64> {
        self.offset
    }

    /// True when the column list is exactly the wildcard.
    pub fn selects_all_columns(&self) -> bool {
        matches!(self.columns.as_slice(), [only] if only == SQL_STAR)
    }
}

impl Default for Select {
    fn default() -> Self {
        Self::new()
    }
}

impl Filterable for Select {
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

impl SqlObject for Select {
    fn build(&self, platform: &Platform) -> SqlResult<PreparedStatement> {
        let table = self
            .table
            .as_ref()
            .ok_or(SqlError::MissingTable { statement: "select" })?;
        let mut writer = SqlWriter::new(platform);

        writer.push("SELECT ");
        if self.columns.is_empty() {
            writer.push(SQL_STAR);
        }
        for (index, column) in self.columns.iter().enumerate() {
            if index > 0 {
                writer.push(", ");
            }
            if column == SQL_STAR {
                writer.push(SQL_STAR);
            } else {
                writer.push_identifier(column);
            }
        }

        writer.push(" FROM ");
        table.render(&mut writer);
        for join in &self.joins {
            join.render(&mut writer);
        }
        self.where_clause.render_clause(&mut writer)?;

        if !self.group_by.is_empty() {
            writer.push(" GROUP BY ");
            for (index, column) in self.group_by.iter().enumerate() {
                if index > 0 {
                    writer.push(", ");
                }
                writer.push_identifier(column);
            }
        }

        if !self.order_by.is_empty() {
            writer.push(" ORDER BY ");
            for (index, (column, order)) in self.order_by.iter().enumerate() {
                if index > 0 {
                    writer.push(", ");
                }
                writer.push_identifier(column);
                writer.push(match order {
                    Order::Asc => " ASC",
                    Order::Desc => " DESC",
                });
            }
        }

        match (self.limit, self.offset) {
            (Some(limit), offset) => {
                writer.push(" LIMIT ");
                writer.push_param(clamp_i64(limit).into());
                if let Some(offset) = offset {
                    writer.push(" OFFSET ");
                    writer.push_param(clamp_i64(offset).into());
                }
            }
            (None, Some(offset)) => {
                if let Some(unbounded) = platform.unbounded_limit() {
                    writer.push(" LIMIT ");
                    writer.push(unbounded);
                }
                writer.push(" OFFSET ");
                writer.push_param(clamp_i64(offset).into());
            }
            (None, None) => {}
        }

        Ok(writer.finish())
    }
}

fn clamp_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
