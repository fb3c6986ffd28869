//! Bound values carried by fragments and handed to the driver.

use bytes::BytesMut;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::error::Error;
use std::fmt;
use tokio_postgres::types::{IsNull, ToSql, Type, to_sql_checked};

/// Runtime category of a [`Value`], checked against a column's declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Text,
    Integer,
    Float,
    Null,
    Temporal,
}

impl ValueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Text => "text",
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::Null => "null",
            ValueKind::Temporal => "temporal",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value bound to a placeholder.
///
/// Serializes untagged, so a parameter list becomes a plain JSON array
/// (`["Mario", 3, null]`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    DateTime(NaiveDateTime),
    Date(NaiveDate),
}

impl Value {
    /// The value's kind. Booleans count as integers.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) | Value::Int(_) => ValueKind::Integer,
            Value::Float(_) => ValueKind::Float,
            Value::Text(_) => ValueKind::Text,
            Value::DateTime(_) | Value::Date(_) => ValueKind::Temporal,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Length of the value's string rendering, in characters.
    pub fn rendered_len(&self) -> usize {
        match self {
            Value::Text(s) => s.chars().count(),
            other => other.to_string().chars().count(),
        }
    }

    /// Render as an inline SQL literal.
    ///
    /// Only for human-readable output such as logs. Statements meant for
    /// execution must bind values through placeholders.
    pub fn to_sql_literal(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Bool(true) => "TRUE".to_string(),
            Value::Bool(false) => "FALSE".to_string(),
            Value::Int(v) => v.to_string(),
            Value::Float(v) => v.to_string(),
            Value::Text(s) => quote_literal(s),
            Value::DateTime(_) | Value::Date(_) => quote_literal(&self.to_string()),
        }
    }
}

fn quote_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for ch in s.chars() {
        if ch == '\'' {
            out.push('\'');
        }
        out.push(ch);
    }
    out.push('\'');
    out
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Text(v) => f.write_str(v),
            Value::DateTime(v) => write!(f, "{v}"),
            Value::Date(v) => write!(f, "{v}"),
        }
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Int(i64::from(v))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::DateTime(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl ToSql for Value {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            Value::Null => Ok(IsNull::Yes),
            Value::Bool(v) => v.to_sql_checked(ty, out),
            Value::Int(v) => match *ty {
                Type::INT2 => i16::try_from(*v)?.to_sql_checked(ty, out),
                Type::INT4 => i32::try_from(*v)?.to_sql_checked(ty, out),
                _ => v.to_sql_checked(ty, out),
            },
            Value::Float(v) => {
                if *ty == Type::FLOAT4 {
                    // Rounds to the nearest f32; precision beyond that is lost.
                    (*v as f32).to_sql_checked(ty, out)
                } else {
                    v.to_sql_checked(ty, out)
                }
            }
            Value::Text(v) => v.to_sql_checked(ty, out),
            Value::DateTime(v) => v.to_sql_checked(ty, out),
            Value::Date(v) => v.to_sql_checked(ty, out),
        }
    }

    // Each variant checks the target type itself in `to_sql`.
    fn accepts(_ty: &Type) -> bool {
        true
    }

    to_sql_checked!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds() {
        assert_eq!(Value::from("x").kind(), ValueKind::Text);
        assert_eq!(Value::from(3).kind(), ValueKind::Integer);
        assert_eq!(Value::from(true).kind(), ValueKind::Integer);
        assert_eq!(Value::from(1.5).kind(), ValueKind::Float);
        assert_eq!(Value::from(None::<i32>).kind(), ValueKind::Null);
        let d = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(Value::from(d).kind(), ValueKind::Temporal);
    }

    #[test]
    fn rendered_len_counts_chars() {
        assert_eq!(Value::from("città").rendered_len(), 5);
        assert_eq!(Value::from(-120).rendered_len(), 4);
        let dt = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        assert_eq!(Value::from(dt).rendered_len(), "2024-05-01 08:30:00".len());
    }

    #[test]
    fn literal_escapes_quotes() {
        assert_eq!(Value::from("Mario' AND 1=1").to_sql_literal(), "'Mario'' AND 1=1'");
        assert_eq!(Value::Null.to_sql_literal(), "NULL");
        assert_eq!(Value::from(false).to_sql_literal(), "FALSE");
    }

    #[test]
    fn int_narrows_for_int4() {
        let mut buf = BytesMut::new();
        let res = Value::from(7i64).to_sql_checked(&Type::INT4, &mut buf);
        assert!(matches!(res, Ok(IsNull::No)));
        assert_eq!(buf.len(), 4);

        let mut buf = BytesMut::new();
        assert!(Value::from(i64::MAX).to_sql_checked(&Type::INT4, &mut buf).is_err());
    }

    #[test]
    fn float_rounds_for_float4() {
        let mut buf = BytesMut::new();
        let res = Value::from(0.1f64).to_sql_checked(&Type::FLOAT4, &mut buf);
        assert!(matches!(res, Ok(IsNull::No)));
        assert_eq!(&buf[..], &0.1f32.to_be_bytes()[..]);

        let mut buf = BytesMut::new();
        Value::from(0.1f64).to_sql_checked(&Type::FLOAT8, &mut buf).unwrap();
        assert_eq!(&buf[..], &0.1f64.to_be_bytes()[..]);
    }

    #[test]
    fn text_rejects_int_column() {
        let mut buf = BytesMut::new();
        assert!(Value::from("x").to_sql_checked(&Type::INT8, &mut buf).is_err());
    }

    #[test]
    fn null_is_sql_null() {
        let mut buf = BytesMut::new();
        let res = Value::Null.to_sql_checked(&Type::TEXT, &mut buf);
        assert!(matches!(res, Ok(IsNull::Yes)));
    }
}
