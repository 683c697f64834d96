//! Table references, optionally schema-qualified or aliased.

use super::prepared::SqlWriter;

/// A table name with an optional schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableIdentifier {
    table: String,
    schema: Option<String>,
}

impl TableIdentifier {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            schema: None,
        }
    }

    pub fn with_schema(table: impl Into<String>, schema: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            schema: Some(schema.into()),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    pub(crate) fn render(&self, writer: &mut SqlWriter<'_>) {
        if let Some(schema) = &self.schema {
            writer.push_identifier(schema);
            writer.push(".");
        }
        writer.push_identifier(&self.table);
    }
}

/// Table target of a statement.
///
/// `Aliased` mirrors an `{alias: table}` mapping and renders as
/// `table AS alias`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TableRef {
    Plain(TableIdentifier),
    Aliased {
        alias: String,
        target: TableIdentifier,
    },
}

impl TableRef {
    pub fn aliased(alias: impl Into<String>, target: impl Into<TableIdentifier>) -> Self {
        Self::Aliased {
            alias: alias.into(),
            target: target.into(),
        }
    }

    pub fn is_aliased(&self) -> bool {
        matches!(self, Self::Aliased { .. })
    }

    pub fn alias(&self) -> Option<&str> {
        match self {
            Self::Plain(_) => None,
            Self::Aliased { alias, .. } => Some(alias),
        }
    }

    pub fn target(&self) -> &TableIdentifier {
        match self {
            Self::Plain(target) | Self::Aliased { target, .. } => target,
        }
    }

    /// Returns the same table without its alias.
    pub fn unaliased(&self) -> TableRef {
        Self::Plain(self.target().clone())
    }

    pub(crate) fn render(&self, writer: &mut SqlWriter<'_>) {
        self.target().render(writer);
        if let Some(alias) = self.alias() {
            writer.push(" AS ");
            writer.push_identifier(alias);
        }
    }
}

impl From<&str> for TableIdentifier {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TableIdentifier {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for TableRef {
    fn from(value: &str) -> Self {
        Self::Plain(value.into())
    }
}

impl From<String> for TableRef {
    fn from(value: String) -> Self {
        Self::Plain(value.into())
    }
}

impl From<TableIdentifier> for TableRef {
    fn from(value: TableIdentifier) -> Self {
        Self::Plain(value)
    }
}

/// `(alias, table)` pairs build an aliased reference.
impl<T: Into<TableIdentifier>> From<(&str, T)> for TableRef {
    fn from((alias, target): (&str, T)) -> Self {
        Self::aliased(alias, target)
    }
}
