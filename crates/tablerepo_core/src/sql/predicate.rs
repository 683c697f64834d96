//! WHERE clause predicates.
//!
//! # Responsibility
//! - Model filter expressions as data that renders into bound SQL.
//! - Normalize the `column => value` pair form into equality predicates.
//!
//! # Invariants
//! - Values are always bound as parameters, never spliced into SQL text.
//! - The combinator of the first predicate is ignored when rendering.

use super::prepared::SqlWriter;
use super::SqlResult;
use rusqlite::types::Value;

/// Comparison operators usable in a [`Predicate::Compare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    NotEq,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl Operator {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Gt => ">",
            Self::Gte => ">=",
        }
    }
}

/// How a predicate joins the ones before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Combinator {
    #[default]
    And,
    Or,
}

impl Combinator {
    fn as_sql(self) -> &'static str {
        match self {
            Self::And => " AND ",
            Self::Or => " OR ",
        }
    }
}

/// One filter condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Raw SQL emitted verbatim.
    Literal(String),
    /// Raw SQL whose unquoted `?` markers bind `params` in order.
    Expression { sql: String, params: Vec<Value> },
    Compare {
        column: String,
        op: Operator,
        value: Value,
    },
    Like {
        column: String,
        pattern: String,
    },
    In {
        column: String,
        values: Vec<Value>,
    },
    IsNull(String),
    IsNotNull(String),
    /// Parenthesized group.
    Nest(Where),
}

impl Predicate {
    pub fn literal(sql: impl Into<String>) -> Self {
        Self::Literal(sql.into())
    }

    pub fn expression(sql: impl Into<String>, params: impl IntoIterator<Item = Value>) -> Self {
        Self::Expression {
            sql: sql.into(),
            params: params.into_iter().collect(),
        }
    }

    pub fn compare(column: impl Into<String>, op: Operator, value: impl Into<Value>) -> Self {
        Self::Compare {
            column: column.into(),
            op,
            value: value.into(),
        }
    }

    /// Equality, except that a null value becomes `IS NULL`.
    pub fn equal_to(column: impl Into<String>, value: impl Into<Value>) -> Self {
        match value.into() {
            Value::Null => Self::IsNull(column.into()),
            value => Self::compare(column, Operator::Eq, value),
        }
    }

    fn is_raw(&self) -> bool {
        matches!(self, Self::Literal(_) | Self::Expression { .. })
    }

    fn render(&self, writer: &mut SqlWriter<'_>) -> SqlResult<()> {
        match self {
            Self::Literal(sql) => writer.push(sql),
            Self::Expression { sql, params } => writer.push_expression(sql, params)?,
            Self::Compare { column, op, value } => {
                writer.push_identifier(column);
                writer.push(" ");
                writer.push(op.as_sql());
                writer.push(" ");
                writer.push_param(value.clone());
            }
            Self::Like { column, pattern } => {
                writer.push_identifier(column);
                writer.push(" LIKE ");
                writer.push_param(Value::Text(pattern.clone()));
            }
            Self::In { values, .. } if values.is_empty() => {
                // An empty IN list matches nothing.
                writer.push("1 = 0");
            }
            Self::In { column, values } => {
                writer.push_identifier(column);
                writer.push(" IN (");
                for (index, value) in values.iter().enumerate() {
                    if index > 0 {
                        writer.push(", ");
                    }
                    writer.push_param(value.clone());
                }
                writer.push(")");
            }
            Self::IsNull(column) => {
                writer.push_identifier(column);
                writer.push(" IS NULL");
            }
            Self::IsNotNull(column) => {
                writer.push_identifier(column);
                writer.push(" IS NOT NULL");
            }
            Self::Nest(inner) => {
                writer.push("(");
                inner.render(writer)?;
                writer.push(")");
            }
        }
        Ok(())
    }
}

/// Ordered set of predicates forming a WHERE clause.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Where {
    parts: Vec<(Combinator, Predicate)>,
}

impl Where {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the pair form: each `column => value` becomes an equality,
    /// null values become `IS NULL`.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        pairs
            .into_iter()
            .fold(Self::new(), |clause, (column, value)| {
                clause.and(Predicate::equal_to(column, value))
            })
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn predicates(&self) -> impl Iterator<Item = &Predicate> {
        self.parts.iter().map(|(_, predicate)| predicate)
    }

    pub fn add(&mut self, combinator: Combinator, predicate: Predicate) {
        self.parts.push((combinator, predicate));
    }

    /// Adds `other` joined with `combinator`.
    ///
    /// An empty clause simply takes over the predicates of `other`; otherwise
    /// a multi-predicate `other` is added as one parenthesized group.
    pub fn merge(&mut self, combinator: Combinator, mut other: Where) {
        if self.is_empty() {
            self.parts = other.parts;
            return;
        }
        match other.parts.len() {
            0 => {}
            1 => {
                if let Some((_, predicate)) = other.parts.pop() {
                    self.add(combinator, predicate);
                }
            }
            _ => self.add(combinator, Predicate::Nest(other)),
        }
    }

    pub fn and(mut self, predicate: Predicate) -> Self {
        self.add(Combinator::And, predicate);
        self
    }

    pub fn or(mut self, predicate: Predicate) -> Self {
        self.add(Combinator::Or, predicate);
        self
    }

    pub fn equal_to(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.and(Predicate::equal_to(column, value))
    }

    pub fn not_equal_to(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.and(Predicate::compare(column, Operator::NotEq, value))
    }

    pub fn less_than(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.and(Predicate::compare(column, Operator::Lt, value))
    }

    pub fn less_than_or_equal_to(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.and(Predicate::compare(column, Operator::Lte, value))
    }

    pub fn greater_than(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.and(Predicate::compare(column, Operator::Gt, value))
    }

    pub fn greater_than_or_equal_to(
        self,
        column: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.and(Predicate::compare(column, Operator::Gte, value))
    }

    pub fn like(self, column: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.and(Predicate::Like {
            column: column.into(),
            pattern: pattern.into(),
        })
    }

    pub fn in_list<V: Into<Value>>(
        self,
        column: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.and(Predicate::In {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
        })
    }

    pub fn is_null(self, column: impl Into<String>) -> Self {
        self.and(Predicate::IsNull(column.into()))
    }

    pub fn is_not_null(self, column: impl Into<String>) -> Self {
        self.and(Predicate::IsNotNull(column.into()))
    }

    pub fn nest(self, inner: Where) -> Self {
        self.and(Predicate::Nest(inner))
    }

    pub(crate) fn render(&self, writer: &mut SqlWriter<'_>) -> SqlResult<()> {
        let grouped = self.parts.len() > 1;
        for (index, (combinator, predicate)) in self.parts.iter().enumerate() {
            if index > 0 {
                writer.push(combinator.as_sql());
            }
            // Raw SQL may carry its own AND/OR.
            if grouped && predicate.is_raw() {
                writer.push("(");
                predicate.render(writer)?;
                writer.push(")");
            } else {
                predicate.render(writer)?;
            }
        }
        Ok(())
    }

    pub(crate) fn render_clause(&self, writer: &mut SqlWriter<'_>) -> SqlResult<()> {
        if self.is_empty() {
            return Ok(());
        }
        writer.push(" WHERE ");
        self.render(writer)
    }
}

impl From<Predicate> for Where {
    fn from(value: Predicate) -> Self {
        Self::new().and(value)
    }
}

/// A bare string is a literal SQL filter.
impl From<&str> for Where {
    fn from(value: &str) -> Self {
        Predicate::literal(value).into()
    }
}

impl From<String> for Where {
    fn from(value: String) -> Self {
        Predicate::literal(value).into()
    }
}

impl<K: Into<String>, V: Into<Value>> From<Vec<(K, V)>> for Where {
    fn from(value: Vec<(K, V)>) -> Self {
        Self::from_pairs(value)
    }
}

/// Statements that carry a WHERE clause.
pub trait Filterable {
    /// Adds `clause` to the statement, joined with AND.
    fn and_where(&mut self, clause: impl Into<Where>) -> &mut Self;
    /// Adds `clause` to the statement, joined with OR.
    fn or_where(&mut self, clause: impl Into<Where>) -> &mut Self;
    fn where_clause(&self) -> &Where;
}
