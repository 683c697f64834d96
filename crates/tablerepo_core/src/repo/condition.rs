//! WHERE argument accepted by repository operations.

use crate::sql::{Filterable, Predicate, Where};
use std::fmt::{Debug, Formatter};

/// Either a filter applied as a WHERE clause, or a callback that receives
/// the in-progress statement and mutates it freely.
pub enum Condition<'f, S> {
    Filter(Where),
    Customize(Box<dyn FnOnce(&mut S) + 'f>),
}

impl<'f, S> Condition<'f, S> {
    pub fn filter(clause: impl Into<Where>) -> Self {
        Self::Filter(clause.into())
    }

    pub fn customize(callback: impl FnOnce(&mut S) + 'f) -> Self {
        Self::Customize(Box::new(callback))
    }
}

impl<S: Filterable> Condition<'_, S> {
    pub(crate) fn apply(self, statement: &mut S) {
        match self {
            Self::Filter(clause) => {
                statement.and_where(clause);
            }
            Self::Customize(callback) => callback(statement),
        }
    }
}

impl<S> Debug for Condition<'_, S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Filter(clause) => f.debug_tuple("Filter").field(clause).finish(),
            Self::Customize(_) => f.write_str("Customize(..)"),
        }
    }
}

impl<S> From<Where> for Condition<'_, S> {
    fn from(value: Where) -> Self {
        Self::Filter(value)
    }
}

impl<S> From<Predicate> for Condition<'_, S> {
    fn from(value: Predicate) -> Self {
        Self::Filter(value.into())
    }
}

impl<S> From<&str> for Condition<'_, S> {
    fn from(value: &str) -> Self {
        Self::Filter(value.into())
    }
}

impl<S> From<String> for Condition<'_, S> {
    fn from(value: String) -> Self {
        Self::Filter(value.into())
    }
}
