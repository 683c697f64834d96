//! Rendered SQL text with its bound parameters.

use super::platform::Platform;
use super::{SqlError, SqlResult};
use rusqlite::types::Value;

/// SQL text plus ordered bind values, ready for a driver.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedStatement {
    sql: String,
    params: Vec<Value>,
}

impl PreparedStatement {
    pub fn new(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }
}

/// Accumulates SQL text and parameters while a statement renders itself.
pub(crate) struct SqlWriter<'p> {
    platform: &'p Platform,
    sql: String,
    params: Vec<Value>,
}

impl<'p> SqlWriter<'p> {
    pub(crate) fn new(platform: &'p Platform) -> Self {
        Self {
            platform,
            sql: String::new(),
            params: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, fragment: &str) {
        self.sql.push_str(fragment);
    }

    pub(crate) fn push_identifier(&mut self, chain: &str) {
        let quoted = self.platform.quote_identifier_chain(chain);
        self.sql.push_str(&quoted);
    }

    pub(crate) fn push_param(&mut self, value: Value) {
        self.params.push(value);
        let marker = self.platform.placeholder(self.params.len());
        self.sql.push_str(&marker);
    }

    /// Appends a hand-written fragment whose `?` markers bind `params` in order.
    ///
    /// A `?` inside a quoted literal or identifier is plain text.
    pub(crate) fn push_expression(&mut self, expression: &str, params: &[Value]) -> SqlResult<()> {
        let markers = placeholder_offsets(expression);
        if markers.len() != params.len() {
            return Err(SqlError::ParameterMismatch {
                expected: markers.len(),
                actual: params.len(),
            });
        }

        let mut start = 0;
        for (offset, value) in markers.into_iter().zip(params) {
            self.sql.push_str(&expression[start..offset]);
            self.push_param(value.clone());
            start = offset + 1;
        }
        self.sql.push_str(&expression[start..]);
        Ok(())
    }

    pub(crate) fn finish(self) -> PreparedStatement {
        PreparedStatement {
            sql: self.sql,
            params: self.params,
        }
    }
}

/// Byte offsets of the `?` markers outside quotes.
fn placeholder_offsets(expression: &str) -> Vec<usize> {
    let mut quote = None;
    let mut offsets = Vec::new();
    for (offset, ch) in expression.char_indices() {
        match (quote, ch) {
            (None, '\'' | '"' | '`') => quote = Some(ch),
            (Some(open), _) if ch == open => quote = None,
            (None, '?') => offsets.push(offset),
            _ => {}
        }
    }
    offsets
}

#[cfg(test)]
mod tests {
    use super::SqlWriter;
    use crate::sql::platform::Platform;
    use crate::sql::SqlError;
    use rusqlite::types::Value;

    #[test]
    fn expression_markers_are_rewritten_for_numbered_platforms() {
        let platform = Platform::postgres();
        let mut writer = SqlWriter::new(&platform);
        writer.push_param(Value::Integer(1));
        writer.push(" AND ");
        writer
            .push_expression("age BETWEEN ? AND ?", &[Value::Integer(18), Value::Integer(30)])
            .expect("expression should render");

        let statement = writer.finish();
        assert_eq!(statement.sql(), "$1 AND age BETWEEN $2 AND $3");
        assert_eq!(statement.params().len(), 3);
    }

    #[test]
    fn expression_marker_count_must_match_params() {
        let platform = Platform::sqlite();
        let mut writer = SqlWriter::new(&platform);
        let err = writer
            .push_expression("a = ? AND b = ?", &[Value::Integer(1)])
            .expect_err("mismatch should fail");
        assert_eq!(
            err,
            SqlError::ParameterMismatch {
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn quoted_question_marks_are_not_placeholders() {
        let platform = Platform::postgres();
        let mut writer = SqlWriter::new(&platform);
        writer
            .push_expression("title = 'what?' AND \"who?\" = ?", &[Value::Integer(1)])
            .expect("quoted marker should be text");

        let statement = writer.finish();
        assert_eq!(statement.sql(), "title = 'what?' AND \"who?\" = $1");
        assert_eq!(statement.params(), &[Value::Integer(1)]);
    }
}
