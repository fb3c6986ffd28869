//! Declared SQL column types and the value kinds each one accepts.

use crate::value::ValueKind;
use std::fmt;

use crate::value::ValueKind::{Float, Integer, Null, Temporal, Text};

const TEXTUAL: &[ValueKind] = &[Text, Integer, Float, Null, Temporal];
const NUMERIC: &[ValueKind] = &[Text, Integer, Float, Null];
const CALENDAR: &[ValueKind] = &[Text, Null, Temporal];
const NULL_ONLY: &[ValueKind] = &[Null];

/// A recognized declared column type.
///
/// Columns whose type string is not recognized are untyped and carry
/// `None` instead of an `SqlType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlType {
    Varchar,
    Char,
    Text,
    Int,
    TinyInt,
    BigInt,
    Float,
    Decimal,
    Double,
    DateTime,
    Date,
    Null,
}

impl SqlType {
    /// Parse a type name, ignoring case and surrounding whitespace.
    ///
    /// Returns `None` for anything unrecognized.
    pub fn parse(s: &str) -> Option<Self> {
        let ty = match s.trim().to_ascii_uppercase().as_str() {
            "VARCHAR" => SqlType::Varchar,
            "CHAR" => SqlType::Char,
            "TEXT" => SqlType::Text,
            "INT" => SqlType::Int,
            "TINYINT" => SqlType::TinyInt,
            "BIGINT" => SqlType::BigInt,
            "FLOAT" => SqlType::Float,
            "DECIMAL" => SqlType::Decimal,
            "DOUBLE" => SqlType::Double,
            "DATETIME" => SqlType::DateTime,
            "DATE" => SqlType::Date,
            "NULL" => SqlType::Null,
            _ => return None,
        };
        Some(ty)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SqlType::Varchar => "VARCHAR",
            SqlType::Char => "CHAR",
            SqlType::Text => "TEXT",
            SqlType::Int => "INT",
            SqlType::TinyInt => "TINYINT",
            SqlType::BigInt => "BIGINT",
            SqlType::Float => "FLOAT",
            SqlType::Decimal => "DECIMAL",
            SqlType::Double => "DOUBLE",
            SqlType::DateTime => "DATETIME",
            SqlType::Date => "DATE",
            SqlType::Null => "NULL",
        }
    }

    /// Value kinds a column of this type accepts.
    pub fn allowed_kinds(self) -> &'static [ValueKind] {
        match self {
            SqlType::Varchar | SqlType::Char | SqlType::Text => TEXTUAL,
            SqlType::Int
            | SqlType::TinyInt
            | SqlType::BigInt
            | SqlType::Float
            | SqlType::Decimal
            | SqlType::Double => NUMERIC,
            SqlType::DateTime | SqlType::Date => CALENDAR,
            SqlType::Null => NULL_ONLY,
        }
    }

    pub fn accepts(self, kind: ValueKind) -> bool {
        self.allowed_kinds().contains(&kind)
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
