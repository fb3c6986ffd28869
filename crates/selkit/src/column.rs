//! Typed, size-bounded columns and the comparisons they build.

use crate::error::{QueryResult, UsageError, ValidationError};
use crate::fragment::Fragment;
use crate::ident::Ident;
use crate::types::SqlType;
use crate::value::Value;
use chrono::{NaiveDate, NaiveDateTime};
use std::fmt;
use std::sync::Arc;

/// Comparison operator for [`Column::compare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl CompareOp {
    pub fn as_sql(self) -> &'static str {
        match self {
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
            CompareOp::Eq => "=",
            CompareOp::Ne => "!=",
        }
    }

    /// `<`, `<=`, `>`, `>=`: always unknown against NULL.
    pub fn is_ordering(self) -> bool {
        !matches!(self, CompareOp::Eq | CompareOp::Ne)
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Definition of a column before it is registered on a relation.
///
/// # Example
/// ```
/// use selkit::ColumnDef;
///
/// let def = ColumnDef::new("nome").size(45).sql_type("varchar").nullable(true);
/// assert_eq!(def.max_len(), Some(45));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    name: String,
    size: Option<usize>,
    sql_type: Option<SqlType>,
    nullable: bool,
}

impl ColumnDef {
    /// Unbounded, untyped, non-nullable column named `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: None,
            sql_type: None,
            nullable: false,
        }
    }

    /// Maximum rendered length. Zero or negative means unbounded.
    pub fn size(mut self, size: i64) -> Self {
        self.size = usize::try_from(size).ok().filter(|n| *n > 0);
        self
    }

    /// Declared type by name; unrecognized names leave the column untyped.
    pub fn sql_type(mut self, ty: &str) -> Self {
        self.sql_type = SqlType::parse(ty);
        self
    }

    pub fn typed(mut self, ty: SqlType) -> Self {
        self.sql_type = Some(ty);
        self
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn max_len(&self) -> Option<usize> {
        self.size
    }
}

#[derive(Debug, PartialEq, Eq)]
struct ColumnInner {
    def: ColumnDef,
    /// Owning relation, by identity. Set at registration, never changed.
    relation: Option<Ident>,
    qualified: Ident,
}

/// A column handle.
///
/// Cloning is cheap: the definition is shared. A registered column refers
/// back to its relation by identifier only, so it never keeps the
/// [`Relation`](crate::Relation) alive and stays valid after the relation
/// value is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column(Arc<ColumnInner>);

impl Column {
    /// A column that belongs to no relation; renders as `` `name` ``.
    pub fn unbound(def: ColumnDef) -> QueryResult<Self> {
        let qualified = Ident::quoted(&def.name)?;
        Ok(Column(Arc::new(ColumnInner {
            def,
            relation: None,
            qualified,
        })))
    }

    pub(crate) fn owned(def: ColumnDef, relation: &Ident) -> QueryResult<Self> {
        let qualified = relation.child(&Ident::quoted(&def.name)?);
        Ok(Column(Arc::new(ColumnInner {
            def,
            relation: Some(relation.clone()),
            qualified,
        })))
    }

    pub fn name(&self) -> &str {
        &self.0.def.name
    }

    pub fn max_len(&self) -> Option<usize> {
        self.0.def.size
    }

    /// Declared type; `None` means untyped.
    pub fn sql_type(&self) -> Option<SqlType> {
        self.0.def.sql_type
    }

    pub fn is_nullable(&self) -> bool {
        self.0.def.nullable
    }

    /// Identifier of the owning relation.
    pub fn relation(&self) -> Option<&Ident> {
        self.0.relation.as_ref()
    }

    /// Qualified identifier: `` `relation`.`name` `` or `` `name` ``.
    pub fn to_sql(&self) -> String {
        self.0.qualified.to_sql()
    }

    pub(crate) fn write_sql(&self, out: &mut String) {
        self.0.qualified.write_sql(out);
    }

    // ==================== Comparisons ====================

    /// Build `<self> <op> <operand>`.
    ///
    /// - NULL with `=`/`!=` becomes `IS NULL`/`IS NOT NULL` and binds nothing.
    /// - NULL with an ordering operator is rejected.
    /// - Another column is rendered as its identifier and binds nothing.
    /// - Any other value is bound to a `?` marker.
    pub fn compare(&self, op: CompareOp, operand: impl Into<Operand>) -> QueryResult<Fragment> {
        match operand.into() {
            Operand::Column(other) => {
                self.check_compatible(&other)?;
                let sql = format!("{} {} {}", self.to_sql(), op.as_sql(), other.to_sql());
                Ok(Fragment::bound(sql, Vec::new()))
            }
            Operand::Value(value) => {
                self.validate_value(&value)?;
                if value.is_null() {
                    let sql = match op {
                        CompareOp::Eq => format!("{} IS NULL", self.to_sql()),
                        CompareOp::Ne => format!("{} IS NOT NULL", self.to_sql()),
                        _ => {
                            return Err(UsageError::NullOrdering {
                                column: self.name().to_string(),
                                op: op.as_sql(),
                            }
                            .into());
                        }
                    };
                    return Ok(Fragment::bound(sql, Vec::new()));
                }
                let sql = format!("{} {} ?", self.to_sql(), op.as_sql());
                Ok(Fragment::bound(sql, vec![value]))
            }
        }
    }

    /// `<self> = <operand>`
    pub fn eq(&self, operand: impl Into<Operand>) -> QueryResult<Fragment> {
        self.compare(CompareOp::Eq, operand)
    }

    /// `<self> != <operand>`
    pub fn ne(&self, operand: impl Into<Operand>) -> QueryResult<Fragment> {
        self.compare(CompareOp::Ne, operand)
    }

    /// `<self> < <operand>`
    pub fn lt(&self, operand: impl Into<Operand>) -> QueryResult<Fragment> {
        self.compare(CompareOp::Lt, operand)
    }

    /// `<self> <= <operand>`
    pub fn le(&self, operand: impl Into<Operand>) -> QueryResult<Fragment> {
        self.compare(CompareOp::Le, operand)
    }

    /// `<self> > <operand>`
    pub fn gt(&self, operand: impl Into<Operand>) -> QueryResult<Fragment> {
        self.compare(CompareOp::Gt, operand)
    }

    /// `<self> >= <operand>`
    pub fn ge(&self, operand: impl Into<Operand>) -> QueryResult<Fragment> {
        self.compare(CompareOp::Ge, operand)
    }

    /// `<self> IS NULL`; fails on non-nullable columns.
    pub fn is_null(&self) -> QueryResult<Fragment> {
        self.compare(CompareOp::Eq, Value::Null)
    }

    /// `<self> IS NOT NULL`; fails on non-nullable columns.
    pub fn is_not_null(&self) -> QueryResult<Fragment> {
        self.compare(CompareOp::Ne, Value::Null)
    }

    /// `<self> BETWEEN ? AND ?`, bound to `[low, high]`.
    pub fn between(&self, low: impl Into<Value>, high: impl Into<Value>) -> QueryResult<Fragment> {
        self.range("BETWEEN", low.into(), high.into())
    }

    /// `<self> NOT BETWEEN ? AND ?`, bound to `[low, high]`.
    pub fn not_between(
        &self,
        low: impl Into<Value>,
        high: impl Into<Value>,
    ) -> QueryResult<Fragment> {
        self.range("NOT BETWEEN", low.into(), high.into())
    }

    fn range(&self, op: &'static str, low: Value, high: Value) -> QueryResult<Fragment> {
        self.validate_value(&low)?;
        self.validate_value(&high)?;
        if low.is_null() || high.is_null() {
            return Err(UsageError::NullOrdering {
                column: self.name().to_string(),
                op,
            }
            .into());
        }
        let sql = format!("{} {} ? AND ?", self.to_sql(), op);
        Ok(Fragment::bound(sql, vec![low, high]))
    }

    // ==================== Validation ====================

    /// Check a value against this column's nullability, length and type.
    ///
    /// Checks run in that order; the first failure is returned.
    pub fn validate_value(&self, value: &Value) -> Result<(), ValidationError> {
        if value.is_null() {
            if !self.is_nullable() {
                return Err(ValidationError::NullNotAllowed {
                    column: self.name().to_string(),
                });
            }
            return Ok(());
        }

        if let Some(max) = self.max_len() {
            let length = value.rendered_len();
            if length > max {
                return Err(ValidationError::LengthExceeded {
                    column: self.name().to_string(),
                    value: value.to_string(),
                    length,
                    max,
                });
            }
        }

        if let Some(ty) = self.sql_type() {
            let kind = value.kind();
            if !ty.accepts(kind) {
                return Err(ValidationError::TypeMismatch {
                    column: self.name().to_string(),
                    expected: ty.to_string(),
                    found: format!("{value} ({kind})"),
                });
            }
        }

        Ok(())
    }

    fn check_compatible(&self, other: &Column) -> Result<(), ValidationError> {
        match (self.sql_type(), other.sql_type()) {
            (Some(mine), Some(theirs)) if mine != theirs => Err(ValidationError::TypeMismatch {
                column: self.name().to_string(),
                expected: mine.to_string(),
                found: format!("column {other} ({theirs})"),
            }),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.qualified)
    }
}

/// Right-hand side of a comparison: a bound value or another column.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Value(Value),
    Column(Column),
}

impl From<Value> for Operand {
    fn from(v: Value) -> Self {
        Operand::Value(v)
    }
}

impl From<Column> for Operand {
    fn from(c: Column) -> Self {
        Operand::Column(c)
    }
}

impl From<&Column> for Operand {
    fn from(c: &Column) -> Self {
        Operand::Column(c.clone())
    }
}

impl<T: Into<Value>> From<Option<T>> for Operand {
    fn from(v: Option<T>) -> Self {
        Operand::Value(v.into())
    }
}

macro_rules! impl_operand_from_value {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Operand {
                fn from(v: $t) -> Self {
                    Operand::Value(Value::from(v))
                }
            }
        )*
    };
}

impl_operand_from_value!(
    bool, i8, i16, i32, i64, u8, u16, u32, f32, f64, &str, String, &String, NaiveDateTime,
    NaiveDate
);
