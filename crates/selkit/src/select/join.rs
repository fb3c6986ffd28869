//! JOIN clauses and their ON conditions.

use crate::error::{QueryResult, UsageError};
use crate::fragment::{Binder, Connective, Fragment};
use crate::ident::Ident;

/// Kind of join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum JoinKind {
    #[default]
    Inner,
    Left,
    Right,
}

impl JoinKind {
    pub fn as_sql(self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER",
            JoinKind::Left => "LEFT",
            JoinKind::Right => "RIGHT",
        }
    }
}

/// A joined relation plus its ON conditions.
///
/// Obtained from [`Select::join`](crate::Select::join). The first ON
/// condition takes no connective; every later one must say how it combines
/// with what precedes it.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinClause {
    table: Ident,
    kind: JoinKind,
    conditions: Vec<(Fragment, Option<Connective>)>,
}

impl JoinClause {
    pub(crate) fn new(table: Ident, kind: JoinKind) -> Self {
        Self {
            table,
            kind,
            conditions: Vec::new(),
        }
    }

    /// Target relation identifier.
    pub fn table(&self) -> &Ident {
        &self.table
    }

    pub fn kind(&self) -> JoinKind {
        self.kind
    }

    pub fn conditions(&self) -> &[(Fragment, Option<Connective>)] {
        &self.conditions
    }

    /// Append an ON condition.
    ///
    /// `connective` must be `None` for the first condition and `Some` for
    /// every later one.
    pub fn on(
        &mut self,
        condition: Fragment,
        connective: Option<Connective>,
    ) -> QueryResult<&mut Self> {
        match (self.conditions.is_empty(), connective) {
            (true, Some(_)) => {
                return Err(UsageError::LeadingConnective {
                    relation: self.table.to_string(),
                }
                .into());
            }
            (false, None) => {
                debug_event!(relation = %self.table, "rejected ON condition without connective");
                return Err(UsageError::AmbiguousJoin {
                    relation: self.table.to_string(),
                }
                .into());
            }
            _ => {}
        }
        self.conditions.push((condition, connective));
        Ok(self)
    }

    /// Append `AND <condition>` after the first ON condition.
    pub fn and_on(&mut self, condition: Fragment) -> QueryResult<&mut Self> {
        self.on(condition, Some(Connective::And))
    }

    /// Append `OR <condition>` after the first ON condition.
    pub fn or_on(&mut self, condition: Fragment) -> QueryResult<&mut Self> {
        self.on(condition, Some(Connective::Or))
    }

    pub(crate) fn write_to(&self, out: &mut String, binder: &mut Binder) {
        out.push_str(self.kind.as_sql());
        out.push_str(" JOIN ");
        self.table.write_sql(out);
        for (i, (condition, connective)) in self.conditions.iter().enumerate() {
            match connective {
                Some(c) if i > 0 => {
                    out.push(' ');
                    out.push_str(c.as_sql());
                    out.push(' ');
                }
                _ => out.push_str(" ON "),
            }
            condition.write_to(out, binder);
        }
    }
}
