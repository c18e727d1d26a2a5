//! Error types for the equation model

use thiserror::Error;

/// Result type for parsing equations and solver-input documents
pub type ParseResult<T> = Result<T, ParseError>;

/// Errors produced while reading equation text or a solver-input document
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Document has no content at all
    #[error("document is empty")]
    EmptyDocument,

    /// First line is not an integer
    #[error("failed to parse variable count '{0}'")]
    InvalidVariableCount(String),

    /// First line is zero or negative
    #[error("variable count must be positive, got {0}")]
    NonPositiveVariableCount(i64),

    /// Equation line has no monomials
    #[error("equation has no monomials")]
    EmptyEquation,

    /// A `+`-separated token is not `1`, `x<i>` or `x<i>*x<j>`
    #[error("invalid monomial '{token}': {reason}")]
    InvalidMonomial { token: String, reason: String },

    /// Variable index exceeds the document's variable count
    #[error("variable x{index} is out of range for n = {n}")]
    VariableOutOfRange { index: usize, n: usize },

    /// Error located on a specific line of a document
    #[error("line {line}: {source}")]
    AtLine {
        line: usize,
        #[source]
        source: Box<ParseError>,
    },
}

impl ParseError {
    pub fn invalid_monomial(token: impl Into<String>, reason: impl Into<String>) -> Self {
        ParseError::InvalidMonomial {
            token: token.into(),
            reason: reason.into(),
        }
    }

    /// Attach a 1-based line number
    pub fn at_line(self, line: usize) -> Self {
        ParseError::AtLine {
            line,
            source: Box::new(self),
        }
    }

    /// Line number, if the error was located
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::AtLine { line, .. } => Some(*line),
            _ => None,
        }
    }
}

/// Errors produced when restarting an enumeration from a cursor
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnumerationError {
    /// Cursor length differs from the subset size
    #[error("cursor has {actual} entries, expected {expected}")]
    CursorLength { expected: usize, actual: usize },

    /// Cursor refers to an index outside the item list
    #[error("cursor index {index} is out of range for {len} items")]
    CursorOutOfRange { index: usize, len: usize },

    /// Cursor uses the same index twice
    #[error("cursor repeats index {0}")]
    CursorRepeats(usize),

    /// Position or count does not fit in 64 bits
    #[error("enumeration size overflows u64")]
    Overflow,
}
