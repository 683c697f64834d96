//! JOIN clauses shared by SELECT and UPDATE.

use super::prepared::SqlWriter;
use super::table::TableRef;

/// Join flavour. Defaults to `Inner`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinType {
    #[default]
    Inner,
    Left,
    Right,
    Outer,
    LeftOuter,
    RightOuter,
}

impl JoinType {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Inner => "INNER",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
            Self::Outer => "OUTER",
            Self::LeftOuter => "LEFT OUTER",
            Self::RightOuter => "RIGHT OUTER",
        }
    }
}

/// One attached join. `on` is emitted verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    pub table: TableRef,
    pub on: String,
    pub kind: JoinType,
}

impl Join {
    pub(crate) fn render(&self, writer: &mut SqlWriter<'_>) {
        writer.push(" ");
        writer.push(self.kind.as_sql());
        writer.push(" JOIN ");
        self.table.render(writer);
        writer.push(" ON ");
        writer.push(&self.on);
    }
}
