//! Error types for selkit

use thiserror::Error;

/// Result type alias for selkit operations
pub type QueryResult<T> = Result<T, QueryError>;

/// A bound value was rejected by the column it is compared against.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// NULL compared against a non-nullable column
    #[error("Column '{column}' does not accept NULL")]
    NullNotAllowed { column: String },

    /// Rendered value is longer than the column's maximum length
    #[error("Value '{value}' exceeds maximum length of column '{column}' ({length} > {max})")]
    LengthExceeded {
        column: String,
        value: String,
        length: usize,
        max: usize,
    },

    /// Value kind (or other column's type) not accepted by the declared type
    #[error("'{found}' can't be converted to {expected} for column '{column}'")]
    TypeMismatch {
        column: String,
        expected: String,
        found: String,
    },
}

/// The builder API was called in a way its contract forbids.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageError {
    /// The same relation was joined twice in one statement
    #[error("Relation '{relation}' is already joined in this statement")]
    DuplicateJoin { relation: String },

    /// A second ON condition was added without AND/OR/NOT
    #[error("Ambiguous multi-condition join on '{relation}': a connective is required")]
    AmbiguousJoin { relation: String },

    /// The first ON condition was given a connective
    #[error("First ON condition of join on '{relation}' cannot take a connective")]
    LeadingConnective { relation: String },

    /// LIMIT below zero
    #[error("LIMIT must be >= 0, got {0}")]
    NegativeLimit(i64),

    /// OFFSET below zero
    #[error("OFFSET must be >= 0, got {0}")]
    NegativeOffset(i64),

    /// Column lookup on a relation that never registered it
    #[error("Relation '{relation}' has no column '{column}'")]
    UnknownColumn { relation: String, column: String },

    /// Column registered twice on one relation
    #[error("Column '{column}' is already registered on '{relation}'")]
    DuplicateColumn { relation: String, column: String },

    /// Ordering comparison (<, <=, >, >=, BETWEEN) against NULL
    #[error("Column '{column}' cannot be compared with '{op}' against NULL")]
    NullOrdering { column: String, op: &'static str },

    /// Fragment template whose `?` count differs from its bound values
    #[error("Fragment has {placeholders} placeholder(s) but {params} bound value(s)")]
    PlaceholderMismatch { placeholders: usize, params: usize },

    /// Fragment template ending inside a quoted identifier or literal
    #[error("Fragment text ends inside an unterminated {quote} quote")]
    UnterminatedQuote { quote: char },

    /// Identifier that cannot be quoted
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),
}

/// Error type for statement construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Value validation error
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Builder usage error
    #[error("Usage error: {0}")]
    Usage(#[from] UsageError),
}

impl QueryError {
    /// Create an invalid identifier error
    pub fn invalid_ident(message: impl Into<String>) -> Self {
        Self::Usage(UsageError::InvalidIdentifier(message.into()))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a usage error
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Usage(_))
    }

    /// Get the validation error, if any
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Usage(_) => None,
        }
    }

    /// Get the usage error, if any
    pub fn as_usage(&self) -> Option<&UsageError> {
        match self {
            Self::Usage(err) => Some(err),
            Self::Validation(_) => None,
        }
    }
}
