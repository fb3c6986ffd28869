//! Relations (tables) and the columns they own.

use crate::column::{Column, ColumnDef};
use crate::error::{QueryResult, UsageError};
use crate::ident::{Ident, IntoIdent};
use std::fmt;

/// A named table owning its columns.
///
/// # Example
///
/// ```rust
/// use selkit::{ColumnDef, Relation};
///
/// let mut persona = Relation::new("persona")?;
/// let nome = persona.register(ColumnDef::new("nome").size(45).sql_type("VARCHAR").nullable(true))?;
/// assert_eq!(nome.to_sql(), "`persona`.`nome`");
/// assert_eq!(persona.lookup("nome")?, nome);
/// # Ok::<(), selkit::QueryError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    ident: Ident,
    columns: Vec<Column>,
}

impl Relation {
    /// Create an empty relation. `name` may be dotted (`shop.persona`).
    pub fn new(name: &str) -> QueryResult<Self> {
        Ok(Self {
            ident: Ident::parse(name)?,
            columns: Vec::new(),
        })
    }

    /// Dotted, unquoted name.
    pub fn name(&self) -> String {
        self.ident.to_string()
    }

    pub fn ident(&self) -> &Ident {
        &self.ident
    }

    /// Quoted identifier, e.g. `` `persona` ``.
    pub fn to_sql(&self) -> String {
        self.ident.to_sql()
    }

    /// Register a column and return a handle to it.
    pub fn register(&mut self, def: ColumnDef) -> QueryResult<Column> {
        if self.find(def.name()).is_some() {
            return Err(UsageError::DuplicateColumn {
                relation: self.name(),
                column: def.name().to_string(),
            }
            .into());
        }
        let column = Column::owned(def, &self.ident)?;
        self.columns.push(column.clone());
        Ok(column)
    }

    /// Look up a registered column by name.
    pub fn lookup(&self, name: &str) -> QueryResult<Column> {
        self.find(name).cloned().ok_or_else(|| {
            UsageError::UnknownColumn {
                relation: self.name(),
                column: name.to_string(),
            }
            .into()
        })
    }

    /// Columns in registration order.
    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    fn find(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ident)
    }
}

impl IntoIdent for &Relation {
    fn into_ident(self) -> QueryResult<Ident> {
        Ok(self.ident.clone())
    }
}
