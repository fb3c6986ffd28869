//! Convenient imports for typical `selkit` usage.
//!
//! ```rust
//! use selkit::prelude::*;
//! ```

pub use crate::{
    Column, ColumnDef, Connective, Fragment, QueryError, QueryResult, Relation, RenderConfig,
    Select, Value,
};
pub use crate::{Ident, IntoIdent, Placeholder};
