//! Backtick-quoted SQL identifiers.
//!
//! [`Ident`] names a relation or column. Every part is rendered quoted, so
//! reserved words and unusual characters are always safe to emit:
//!
//! - Unquoted input parts are validated against: `[A-Za-z_][A-Za-z0-9_$]*`
//! - Backtick-quoted input parts allow any characters except NUL; a doubled
//!   backtick stands for a literal one
//! - Output doubles embedded backticks
//!
//! # Example
//! ```
//! use selkit::Ident;
//!
//! let t = Ident::parse("shop.persona")?;
//! assert_eq!(t.to_sql(), "`shop`.`persona`");
//!
//! let c = Ident::parse("`odd.name`")?;
//! assert_eq!(c.to_sql(), "`odd.name`");
//! # Ok::<(), selkit::QueryError>(())
//! ```

use crate::error::{QueryError, QueryResult};
use std::fmt;

/// A SQL identifier (relation or column name), possibly dotted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ident {
    parts: Vec<String>,
}

impl Ident {
    /// Create a single-part identifier from an arbitrary name.
    ///
    /// No character rules apply beyond non-empty and no NUL; the name is
    /// always emitted quoted.
    pub fn quoted(name: &str) -> QueryResult<Self> {
        if name.is_empty() {
            return Err(QueryError::invalid_ident("Identifier cannot be empty"));
        }
        if name.contains('\0') {
            return Err(QueryError::invalid_ident(
                "Identifier cannot contain NUL character",
            ));
        }
        Ok(Self {
            parts: vec![name.to_string()],
        })
    }

    /// Parse an identifier string, supporting dotted and quoted forms.
    ///
    /// - Dotted: `schema.table`
    /// - Quoted: `` `Odd Name`.`Table` ``
    /// - Mixed: `` shop.`Order Lines` ``
    ///
    /// Unquoted parts may hold any character but `.` and NUL
    /// (`order-items`, `2024_sales`); every part is quoted on output.
    pub fn parse(s: &str) -> QueryResult<Self> {
        if s.is_empty() {
            return Err(QueryError::invalid_ident("Identifier cannot be empty"));
        }
        if s.contains('\0') {
            return Err(QueryError::invalid_ident(
                "Identifier cannot contain NUL character",
            ));
        }

        let mut parts = Vec::new();
        let mut chars = s.chars().peekable();

        while chars.peek().is_some() {
            if !parts.is_empty() {
                match chars.next() {
                    Some('.') => {
                        if chars.peek().is_none() {
                            return Err(QueryError::invalid_ident("Trailing '.' in identifier"));
                        }
                    }
                    Some(c) => {
                        return Err(QueryError::invalid_ident(format!(
                            "Expected '.' between identifier parts, got '{c}'"
                        )));
                    }
                    None => break,
                }
            }

            if chars.peek() == Some(&'`') {
                chars.next();
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('`') => {
                            if chars.peek() == Some(&'`') {
                                chars.next();
                                name.push('`');
                            } else {
                                break;
                            }
                        }
                        Some(c) => name.push(c),
                        None => {
                            return Err(QueryError::invalid_ident("Unclosed quoted identifier"));
                        }
                    }
                }
                if name.is_empty() {
                    return Err(QueryError::invalid_ident("Empty quoted identifier"));
                }
                parts.push(name);
                continue;
            }

            // Unquoted parts run to the next dot; any other character is
            // kept and quoted on output.
            let mut name = String::new();
            while let Some(&c) = chars.peek() {
                if c == '.' {
                    break;
                }
                name.push(c);
                chars.next();
            }
            if name.is_empty() {
                return Err(QueryError::invalid_ident("Empty identifier segment"));
            }
            parts.push(name);
        }

        Ok(Self { parts })
    }

    /// The unquoted parts, outermost first.
    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// Extend this identifier with one more quoted part.
    pub(crate) fn child(&self, name: &Ident) -> Ident {
        let mut parts = self.parts.clone();
        parts.extend(name.parts.iter().cloned());
        Ident { parts }
    }

    /// Render the identifier as SQL.
    pub fn to_sql(&self) -> String {
        let cap = self.parts.iter().map(|p| p.len() + 3).sum();
        let mut out = String::with_capacity(cap);
        self.write_sql(&mut out);
        out
    }

    pub(crate) fn write_sql(&self, out: &mut String) {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            write_quoted(part, out);
        }
    }
}

/// Quote one identifier part, doubling embedded backticks.
pub(crate) fn write_quoted(part: &str, out: &mut String) {
    out.push('`');
    for ch in part.chars() {
        if ch == '`' {
            out.push_str("``");
        } else {
            out.push(ch);
        }
    }
    out.push('`');
}

impl fmt::Display for Ident {
    /// Dotted, unquoted form (`shop.persona`), used for keys and messages.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.parts.join("."))
    }
}

/// Convert an input into an [`Ident`].
///
/// This is mainly for ergonomics in builder APIs.
pub trait IntoIdent {
    fn into_ident(self) -> QueryResult<Ident>;
}

impl IntoIdent for Ident {
    fn into_ident(self) -> QueryResult<Ident> {
        Ok(self)
    }
}

impl IntoIdent for &Ident {
    fn into_ident(self) -> QueryResult<Ident> {
        Ok(self.clone())
    }
}

impl IntoIdent for &str {
    fn into_ident(self) -> QueryResult<Ident> {
        Ident::parse(self)
    }
}

impl IntoIdent for String {
    fn into_ident(self) -> QueryResult<Ident> {
        Ident::parse(&self)
    }
}
