//! # selkit
//!
//! A validating, parameterized SQL SELECT builder.
//!
//! ## Features
//!
//! - **Typed columns**: columns carry a size, a declared SQL type and a
//!   nullability flag; every compared value is checked against them
//! - **Parameters, not literals**: values travel as bound parameters, in the
//!   order their placeholders appear in the text
//! - **Placeholder styles**: `?` by default, `%s` or `$n` at render time
//! - **Quoted identifiers**: every relation and column name is backtick-quoted
//! - **Tracing**: optional `debug`/`trace` events (feature `tracing`)
//!
//! ## Example
//!
//! ```rust
//! use selkit::{ColumnDef, Relation, RenderConfig, Select, Value};
//!
//! let mut persona = Relation::new("persona")?;
//! let nome = persona.register(ColumnDef::new("nome").size(45).sql_type("VARCHAR").nullable(true))?;
//! let eta = persona.register(ColumnDef::new("eta").size(3).sql_type("INT").nullable(true))?;
//!
//! let mut stmt = Select::new();
//! stmt.select([&nome], Some(&persona))
//!     .where_clause(nome.eq("Mario")?)
//!     .where_clause(eta.lt(3)?)
//!     .where_clause(nome.ne(Value::Null)?);
//!
//! let rendered = stmt.render();
//! assert_eq!(
//!     rendered.sql,
//!     "SELECT `persona`.`nome` FROM `persona` WHERE `persona`.`nome` = ? \
//!      AND `persona`.`eta` < ? AND `persona`.`nome` IS NOT NULL;"
//! );
//! assert_eq!(rendered.params, vec![Value::from("Mario"), Value::from(3)]);
//!
//! let pg = stmt.render_with(&RenderConfig::postgres());
//! assert!(pg.sql.ends_with("`persona`.`eta` < $2 AND `persona`.`nome` IS NOT NULL"));
//! # Ok::<(), selkit::QueryError>(())
//! ```

macro_rules! debug_event {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        tracing::debug!($($arg)*);
    };
}

macro_rules! trace_event {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        tracing::trace!($($arg)*);
    };
}

pub mod column;
pub mod config;
pub mod error;
pub mod fragment;
pub mod ident;
pub mod prelude;
pub mod relation;
pub mod select;
pub mod types;
pub mod value;

pub use column::{Column, ColumnDef, CompareOp, Operand};
pub use config::{Placeholder, RenderConfig};
pub use error::{QueryError, QueryResult, UsageError, ValidationError};
pub use fragment::{Condition, Connective, Fragment};
pub use ident::{Ident, IntoIdent};
pub use relation::Relation;
pub use select::{ColumnRef, Direction, JoinClause, JoinKind, Rendered, Select};
pub use types::SqlType;
pub use value::{Value, ValueKind};
