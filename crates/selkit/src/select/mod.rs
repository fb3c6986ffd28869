//! SELECT statement builder.
//!
//! [`Select`] accumulates the pieces of one statement through `&mut self`
//! calls and renders on demand. Rendering never mutates the builder, so the
//! same statement can be rendered any number of times, in any placeholder
//! style.
//!
//! # Example
//!
//! ```rust
//! use selkit::{ColumnDef, Relation, Select, Value};
//!
//! let mut persona = Relation::new("persona")?;
//! let nome = persona.register(ColumnDef::new("nome").size(45).sql_type("VARCHAR").nullable(true))?;
//! let eta = persona.register(ColumnDef::new("eta").size(3).sql_type("INT").nullable(true))?;
//!
//! let mut stmt = Select::new();
//! stmt.select([&nome], Some(&persona))
//!     .where_clause(nome.eq("Mario")?)
//!     .where_clause(eta.lt(3)?)
//!     .limit(5, None)?;
//!
//! let rendered = stmt.render();
//! assert_eq!(
//!     rendered.sql,
//!     "SELECT `persona`.`nome` FROM `persona` WHERE `persona`.`nome` = ? AND `persona`.`eta` < ? LIMIT 5;"
//! );
//! assert_eq!(rendered.params, vec![Value::from("Mario"), Value::from(3)]);
//! # Ok::<(), selkit::QueryError>(())
//! ```

mod join;
mod rendered;

pub use join::{JoinClause, JoinKind};
pub use rendered::Rendered;

use crate::column::Column;
use crate::config::RenderConfig;
use crate::error::{QueryResult, UsageError};
use crate::fragment::{BindMode, Binder, Condition};
use crate::ident::{Ident, IntoIdent, write_quoted};
use crate::relation::Relation;

/// A selected or ordered column: a registered [`Column`] or a bare name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnRef {
    Column(Column),
    /// Rendered as a single quoted identifier.
    Name(String),
}

impl ColumnRef {
    fn relation(&self) -> Option<&Ident> {
        match self {
            ColumnRef::Column(c) => c.relation(),
            ColumnRef::Name(_) => None,
        }
    }

    fn write_sql(&self, out: &mut String) {
        match self {
            ColumnRef::Column(c) => c.write_sql(out),
            ColumnRef::Name(name) => write_quoted(name, out),
        }
    }
}

impl From<Column> for ColumnRef {
    fn from(c: Column) -> Self {
        ColumnRef::Column(c)
    }
}

impl From<&Column> for ColumnRef {
    fn from(c: &Column) -> Self {
        ColumnRef::Column(c.clone())
    }
}

impl From<&str> for ColumnRef {
    fn from(name: &str) -> Self {
        ColumnRef::Name(name.to_string())
    }
}

impl From<String> for ColumnRef {
    fn from(name: String) -> Self {
        ColumnRef::Name(name)
    }
}

/// Sort direction for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_sql(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct OrderBy {
    column: ColumnRef,
    /// `None` leaves the direction to the database default.
    direction: Option<Direction>,
}

/// SELECT statement builder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Select {
    /// SELECT columns (empty renders `*`)
    columns: Vec<ColumnRef>,
    /// FROM relation, kept only when it owns the first selected column
    from: Option<Ident>,
    /// JOIN clauses, in insertion order
    joins: Vec<JoinClause>,
    /// WHERE conditions, ANDed
    where_group: Vec<Condition>,
    /// ORDER BY entries
    order_clauses: Vec<OrderBy>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl Select {
    /// Create an empty statement (`SELECT *;`).
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== SELECT columns ====================

    /// Set the output columns and the source relation.
    ///
    /// An empty column list selects `*`. FROM is emitted only when `from`
    /// is the relation owning the first selected column; otherwise it is
    /// left out. Replaces any earlier `select` call.
    pub fn select<I>(&mut self, columns: I, from: Option<&Relation>) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<ColumnRef>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        let owner = self.columns.first().and_then(ColumnRef::relation);
        self.from = match from {
            Some(relation) if owner == Some(relation.ident()) => Some(relation.ident().clone()),
            Some(relation) => {
                debug_event!(
                    relation = %relation,
                    "FROM omitted: relation does not own the first selected column"
                );
                None
            }
            None => None,
        };
        self
    }

    /// Selected columns, in order.
    pub fn columns(&self) -> &[ColumnRef] {
        &self.columns
    }

    /// Relation emitted in FROM, if any.
    pub fn from_relation(&self) -> Option<&Ident> {
        self.from.as_ref()
    }

    // ==================== JOIN ====================

    /// Add an INNER JOIN and return it for attaching ON conditions.
    ///
    /// Fails if `target` is already joined in this statement.
    pub fn join(&mut self, target: impl IntoIdent) -> QueryResult<&mut JoinClause> {
        self.join_with(target, JoinKind::Inner)
    }

    /// Add a LEFT JOIN.
    pub fn left_join(&mut self, target: impl IntoIdent) -> QueryResult<&mut JoinClause> {
        self.join_with(target, JoinKind::Left)
    }

    /// Add a RIGHT JOIN.
    pub fn right_join(&mut self, target: impl IntoIdent) -> QueryResult<&mut JoinClause> {
        self.join_with(target, JoinKind::Right)
    }

    /// Add a join of the given kind.
    pub fn join_with(
        &mut self,
        target: impl IntoIdent,
        kind: JoinKind,
    ) -> QueryResult<&mut JoinClause> {
        let table = target.into_ident()?;
        if self.joins.iter().any(|j| j.table() == &table) {
            debug_event!(relation = %table, "rejected duplicate join");
            return Err(UsageError::DuplicateJoin {
                relation: table.to_string(),
            }
            .into());
        }
        let idx = self.joins.len();
        self.joins.push(JoinClause::new(table, kind));
        Ok(&mut self.joins[idx])
    }

    /// Existing join clause for `target`, to add more ON conditions later.
    pub fn join_clause_mut(&mut self, target: impl IntoIdent) -> QueryResult<Option<&mut JoinClause>> {
        let table = target.into_ident()?;
        Ok(self.joins.iter_mut().find(|j| j.table() == &table))
    }

    /// Join clauses, in render order.
    pub fn joins(&self) -> &[JoinClause] {
        &self.joins
    }

    // ==================== WHERE ====================

    /// Add a WHERE condition, ANDed with the others.
    ///
    /// Accepts a [`Fragment`](crate::Fragment), raw SQL text (binds
    /// nothing), or `None`/blank text, which is ignored.
    pub fn where_clause(&mut self, condition: impl Into<Condition>) -> &mut Self {
        let condition = condition.into();
        if !condition.is_empty() {
            self.where_group.push(condition);
        }
        self
    }

    /// WHERE conditions, in order.
    pub fn conditions(&self) -> &[Condition] {
        &self.where_group
    }

    // ==================== ORDER BY ====================

    /// Add an ORDER BY column. Calls accumulate.
    pub fn order_by(&mut self, column: impl Into<ColumnRef>) -> &mut Self {
        self.push_order(column.into(), None)
    }

    /// Add several ORDER BY columns, in iteration order.
    pub fn order_by_all<I>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<ColumnRef>,
    {
        for column in columns {
            self.push_order(column.into(), None);
        }
        self
    }

    /// Add ORDER BY column ASC.
    pub fn order_by_asc(&mut self, column: impl Into<ColumnRef>) -> &mut Self {
        self.push_order(column.into(), Some(Direction::Asc))
    }

    /// Add ORDER BY column DESC.
    pub fn order_by_desc(&mut self, column: impl Into<ColumnRef>) -> &mut Self {
        self.push_order(column.into(), Some(Direction::Desc))
    }

    fn push_order(&mut self, column: ColumnRef, direction: Option<Direction>) -> &mut Self {
        self.order_clauses.push(OrderBy { column, direction });
        self
    }

    // ==================== Pagination ====================

    /// Set LIMIT and, when given, OFFSET (`None` leaves OFFSET unset).
    ///
    /// Both must be `>= 0`; nothing changes if either is negative.
    pub fn limit(&mut self, amount: i64, offset: Option<i64>) -> QueryResult<&mut Self> {
        let amount = u64::try_from(amount).map_err(|_| UsageError::NegativeLimit(amount))?;
        let offset = offset
            .map(|o| u64::try_from(o).map_err(|_| UsageError::NegativeOffset(o)))
            .transpose()?;
        self.limit = Some(amount);
        self.offset = offset;
        Ok(self)
    }

    pub fn limit_value(&self) -> Option<u64> {
        self.limit
    }

    pub fn offset_value(&self) -> Option<u64> {
        self.offset
    }

    // ==================== Rendering ====================

    /// Render with `?` placeholders and a `;` terminator.
    pub fn render(&self) -> Rendered {
        self.render_with(&RenderConfig::default())
    }

    /// Render with the given configuration.
    pub fn render_with(&self, config: &RenderConfig) -> Rendered {
        let mut binder = Binder::new(BindMode::Placeholder(config.placeholder));
        let sql = self.build_sql(&mut binder, config.terminator);
        let params = binder.into_params();
        trace_event!(sql = %sql, params = params.len(), "rendered SELECT");
        Rendered { sql, params }
    }

    /// Get the SQL text only.
    pub fn to_sql(&self) -> String {
        self.render().sql
    }

    /// SQL with values inlined as literals.
    ///
    /// For logs and debugging only; execute [`render`](Self::render) output.
    pub fn to_debug_sql(&self) -> String {
        let mut binder = Binder::new(BindMode::Inline);
        self.build_sql(&mut binder, true)
    }

    fn build_sql(&self, binder: &mut Binder, terminator: bool) -> String {
        let mut sql = String::from("SELECT ");

        if self.columns.is_empty() {
            sql.push('*');
        } else {
            for (i, column) in self.columns.iter().enumerate() {
                if i > 0 {
                    sql.push_str(", ");
                }
                column.write_sql(&mut sql);
            }
        }

        if let Some(ref from) = self.from {
            sql.push_str(" FROM ");
            from.write_sql(&mut sql);
        }

        // JOINs
        for join in &self.joins {
            sql.push(' ');
            join.write_to(&mut sql, binder);
        }

        // WHERE
        if !self.where_group.is_empty() {
            sql.push_str(" WHERE ");
            for (i, condition) in self.where_group.iter().enumerate() {
                if i > 0 {
                    sql.push_str(" AND ");
                }
                condition.write_to(&mut sql, binder);
            }
        }

        // ORDER BY
        if !self.order_clauses.is_empty() {
            sql.push_str(" ORDER BY ");
            for (i, order) in self.order_clauses.iter().enumerate() {
                if i > 0 {
                    sql.push_str(", ");
                }
                order.column.write_sql(&mut sql);
                if let Some(direction) = order.direction {
                    sql.push(' ');
                    sql.push_str(direction.as_sql());
                }
            }
        }

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        if let Some(offset) = self.offset {
            sql.push_str(&format!(" OFFSET {offset}"));
        }

        let trimmed_len = sql.trim_end().len();
        sql.truncate(trimmed_len);
        if terminator {
            sql.push(';');
        }
        sql
    }
}

#[cfg(test)]
mod tests;
