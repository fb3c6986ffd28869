//! Predicate fragments: the unit combined into WHERE and ON clauses.
//!
//! A [`Fragment`] is SQL text using `?` as its placeholder marker plus the
//! values bound to those markers, in order. Fragments are immutable; the
//! placeholder style of the final statement is chosen only at render time,
//! where each marker is numbered or replaced without touching quoted
//! identifiers or string literals.

use crate::config::Placeholder;
use crate::error::{QueryResult, UsageError};
use crate::value::Value;
use std::fmt;

/// Logical operator joining two conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Connective {
    And,
    Or,
    /// Conjoins the negation of the following condition (`AND NOT`).
    Not,
}

impl Connective {
    pub fn as_sql(self) -> &'static str {
        match self {
            Connective::And => "AND",
            Connective::Or => "OR",
            Connective::Not => "AND NOT",
        }
    }
}

impl fmt::Display for Connective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// An immutable (SQL text, bound values) pair representing one condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    sql: String,
    params: Vec<Value>,
}

impl Fragment {
    /// Create a fragment from a `?` template and its values.
    ///
    /// Fails unless the number of `?` markers outside quoted identifiers and
    /// string literals equals `params.len()`, or if a quote is left open.
    ///
    /// # Example
    /// ```
    /// use selkit::{Fragment, Value};
    ///
    /// let f = Fragment::new("`a` = ? OR `b` = ?", vec![Value::from(1), Value::from(2)])?;
    /// assert_eq!(f.params().len(), 2);
    /// assert!(Fragment::new("`a` = ?", vec![]).is_err());
    /// # Ok::<(), selkit::QueryError>(())
    /// ```
    pub fn new(sql: impl Into<String>, params: Vec<Value>) -> QueryResult<Self> {
        let sql = sql.into();
        let mut placeholders = 0;
        let open = scan(&sql, |piece| {
            if matches!(piece, Piece::Marker) {
                placeholders += 1;
            }
        });
        if let Some(quote) = open {
            return Err(UsageError::UnterminatedQuote { quote }.into());
        }
        if placeholders != params.len() {
            return Err(UsageError::PlaceholderMismatch {
                placeholders,
                params: params.len(),
            }
            .into());
        }
        Ok(Self { sql, params })
    }

    /// Internal constructor for fragments whose markers are known to match.
    pub(crate) fn bound(sql: String, params: Vec<Value>) -> Self {
        debug_assert_eq!(count_placeholders(&sql), params.len());
        Self { sql, params }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.sql, self.params)
    }

    /// Combine with another fragment: `(self <connective> other)`.
    pub fn combine(self, connective: Connective, other: Fragment) -> Fragment {
        let sql = format!("({} {} {})", self.sql, connective.as_sql(), other.sql);
        let mut params = self.params;
        params.extend(other.params);
        Fragment { sql, params }
    }

    pub fn and(self, other: Fragment) -> Fragment {
        self.combine(Connective::And, other)
    }

    pub fn or(self, other: Fragment) -> Fragment {
        self.combine(Connective::Or, other)
    }

    /// `NOT (self)`
    pub fn negate(self) -> Fragment {
        Fragment {
            sql: format!("NOT ({})", self.sql),
            params: self.params,
        }
    }

    pub(crate) fn write_to(&self, out: &mut String, binder: &mut Binder) {
        let mut values = self.params.iter();
        scan(&self.sql, |piece| match piece {
            Piece::Text(text) => out.push_str(text),
            Piece::Marker => match values.next() {
                Some(value) => binder.bind(value, out),
                None => out.push('?'),
            },
        });
    }
}

/// A WHERE condition as accepted by [`Select::where_clause`](crate::Select::where_clause).
///
/// `Raw` text is copied verbatim and binds nothing; keeping it free of
/// untrusted input is the caller's job. `Empty` is skipped.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Fragment(Fragment),
    Raw(String),
    Empty,
}

impl Condition {
    pub fn raw(sql: impl Into<String>) -> Self {
        Condition::Raw(sql.into())
    }

    /// Empty conditions are no-ops for `where_clause`. Whitespace-only raw
    /// text counts as empty as well, not just `""`.
    pub fn is_empty(&self) -> bool {
        match self {
            Condition::Empty => true,
            Condition::Raw(sql) => sql.trim().is_empty(),
            Condition::Fragment(_) => false,
        }
    }

    pub fn params(&self) -> &[Value] {
        match self {
            Condition::Fragment(f) => f.params(),
            Condition::Raw(_) | Condition::Empty => &[],
        }
    }

    pub(crate) fn write_to(&self, out: &mut String, binder: &mut Binder) {
        match self {
            Condition::Fragment(f) => f.write_to(out, binder),
            Condition::Raw(sql) => out.push_str(sql.trim()),
            Condition::Empty => {}
        }
    }
}

impl From<Fragment> for Condition {
    fn from(f: Fragment) -> Self {
        Condition::Fragment(f)
    }
}

impl From<&str> for Condition {
    fn from(sql: &str) -> Self {
        Condition::Raw(sql.to_string())
    }
}

impl From<String> for Condition {
    fn from(sql: String) -> Self {
        Condition::Raw(sql)
    }
}

impl<T: Into<Condition>> From<Option<T>> for Condition {
    fn from(cond: Option<T>) -> Self {
        cond.map_or(Condition::Empty, Into::into)
    }
}

/// How bound values reach the output while writing fragments.
#[derive(Debug, Clone, Copy)]
pub(crate) enum BindMode {
    Placeholder(Placeholder),
    /// Inline literals; debug output only.
    Inline,
}

/// Collects bound values in textual order while a statement is written.
#[derive(Debug)]
pub(crate) struct Binder {
    mode: BindMode,
    params: Vec<Value>,
}

impl Binder {
    pub(crate) fn new(mode: BindMode) -> Self {
        Self {
            mode,
            params: Vec::new(),
        }
    }

    fn bind(&mut self, value: &Value, out: &mut String) {
        match self.mode {
            BindMode::Placeholder(style) => {
                self.params.push(value.clone());
                style.write_marker(self.params.len(), out);
            }
            BindMode::Inline => out.push_str(&value.to_sql_literal()),
        }
    }

    pub(crate) fn into_params(self) -> Vec<Value> {
        self.params
    }
}

enum Piece<'a> {
    Text(&'a str),
    Marker,
}

/// Split `sql` around `?` markers that sit outside quotes.
///
/// Quotes are `` ` ``, `'` and `"`; an escaped quote must be doubled
/// (`'it''s'`). Backslash escapes (`'a\'?'`) are not understood and
/// leave the scanner inside the literal. Returns the quote still open at
/// the end of `sql`, if any.
fn scan<'a>(sql: &'a str, mut f: impl FnMut(Piece<'a>)) -> Option<char> {
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, ch) in sql.char_indices() {
        match quote {
            Some(q) => {
                if ch == q {
                    quote = None;
                }
            }
            None => match ch {
                '`' | '\'' | '"' => quote = Some(ch),
                '?' => {
                    f(Piece::Text(&sql[start..i]));
                    f(Piece::Marker);
                    start = i + 1;
                }
                _ => {}
            },
        }
    }
    f(Piece::Text(&sql[start..]));
    quote
}

fn count_placeholders(sql: &str) -> usize {
    let mut n = 0;
    scan(sql, |piece| {
        if matches!(piece, Piece::Marker) {
            n += 1;
        }
    });
    n
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(f: &Fragment, style: Placeholder) -> (String, Vec<Value>) {
        let mut out = String::new();
        let mut binder = Binder::new(BindMode::Placeholder(style));
        f.write_to(&mut out, &mut binder);
        (out, binder.into_params())
    }

    #[test]
    fn counts_markers_outside_quotes() {
        assert_eq!(count_placeholders("`a?` = ? AND b = '?'"), 1);
        assert_eq!(count_placeholders("\"x?\" = ?"), 1);
        assert_eq!(count_placeholders("`a``?` = ?"), 1);
        assert_eq!(count_placeholders("no markers"), 0);
    }

    #[test]
    fn new_rejects_mismatch() {
        let err = Fragment::new("`a` = ? AND `b` = ?", vec![Value::from(1)]).unwrap_err();
        assert_eq!(
            err.as_usage(),
            Some(&UsageError::PlaceholderMismatch {
                placeholders: 2,
                params: 1
            })
        );
    }

    #[test]
    fn numbered_markers() {
        let f = Fragment::new("`a` = ? OR `b` = ?", vec![Value::from(1), Value::from("x")]).unwrap();
        let (sql, params) = render(&f, Placeholder::Numbered);
        assert_eq!(sql, "`a` = $1 OR `b` = $2");
        assert_eq!(params, vec![Value::from(1), Value::from("x")]);
    }

    #[test]
    fn format_markers_skip_quoted_identifiers() {
        let f = Fragment::new("`odd?` = ?", vec![Value::from(1)]).unwrap();
        let (sql, _) = render(&f, Placeholder::Format);
        assert_eq!(sql, "`odd?` = %s");
    }

    #[test]
    fn combine_wraps_and_concatenates() {
        let a = Fragment::new("`a` = ?", vec![Value::from(1)]).unwrap();
        let b = Fragment::new("`b` = ?", vec![Value::from(2)]).unwrap();
        let f = a.or(b);
        assert_eq!(f.sql(), "(`a` = ? OR `b` = ?)");
        assert_eq!(f.params(), &[Value::from(1), Value::from(2)]);
    }

    #[test]
    fn new_rejects_open_quote() {
        for sql in ["`note` = 'it", "\"x = 1", "`unclosed = 1"] {
            let err = Fragment::new(sql, vec![]).unwrap_err();
            assert!(
                matches!(err.as_usage(), Some(UsageError::UnterminatedQuote { .. })),
                "{sql}"
            );
        }
        assert!(Fragment::new("`note` = 'it''s'", vec![]).is_ok());
    }

    #[test]
    fn backslash_escape_is_not_understood() {
        // The second quote closes the literal, leaving the last one open.
        let err = Fragment::new("`x` = 'a\\'?'", vec![]).unwrap_err();
        assert_eq!(
            err.as_usage(),
            Some(&UsageError::UnterminatedQuote { quote: '\'' })
        );
    }

    #[test]
    fn blank_raw_is_empty() {
        let mut stmt = crate::Select::new();
        stmt.where_clause(" \t").where_clause(Condition::raw("   "));
        assert!(stmt.conditions().is_empty());
    }

    #[test]
    fn balanced_fragment_keeps_later_markers_bound() {
        let note = Fragment::new("`note` = 'it''s ?'", vec![]).unwrap();
        let eta = Fragment::new("`eta` = ?", vec![Value::from(5)]).unwrap();
        let (sql, params) = render(&note.and(eta), Placeholder::Numbered);
        assert_eq!(sql, "(`note` = 'it''s ?' AND `eta` = $1)");
        assert_eq!(params, vec![Value::from(5)]);
    }

    #[test]
    fn combine_not_conjoins_negation() {
        let a = Fragment::new("`a` = ?", vec![Value::from(1)]).unwrap();
        let b = Fragment::new("`b` IS NULL", vec![]).unwrap();
        assert_eq!(a.combine(Connective::Not, b).sql(), "(`a` = ? AND NOT `b` IS NULL)");
    }

    #[test]
    fn negate() {
        let a = Fragment::new("`a` = ?", vec![Value::from(1)]).unwrap();
        assert_eq!(a.negate().sql(), "NOT (`a` = ?)");
    }

    #[test]
    fn inline_mode_writes_literals() {
        let f = Fragment::new("`nome` = ?", vec![Value::from("O'Hara")]).unwrap();
        let mut out = String::new();
        let mut binder = Binder::new(BindMode::Inline);
        f.write_to(&mut out, &mut binder);
        assert_eq!(out, "`nome` = 'O''Hara'");
        assert!(binder.into_params().is_empty());
    }

    #[test]
    fn condition_conversions() {
        assert!(Condition::from(None::<Fragment>).is_empty());
        assert!(Condition::from("  ").is_empty());
        assert!(!Condition::from("1 = 1").is_empty());
        let f = Fragment::new("`a` = ?", vec![Value::from(1)]).unwrap();
        assert_eq!(Condition::from(Some(f.clone())), Condition::Fragment(f));
    }
}
