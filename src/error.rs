//! Error types for styledown.

use std::fmt;

/// Result type alias for styledown operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for buffer and rule operations.
///
/// Malformed markup is never reported here: rules leave text they cannot
/// match untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// A character range reached past the end of the buffer, or ran backwards.
    OutOfBounds { start: usize, end: usize, len: usize },
    /// Invalid color format (e.g., malformed hex string).
    InvalidColor(String),
    /// A markup rule reported a failure of its own.
    Rule { rule: String, message: String },
}

impl Error {
    /// Build a rule failure, for use by custom rules.
    #[must_use]
    pub fn rule(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rule {
            rule: rule.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds { start, end, len } => {
                write!(f, "range {start}..{end} out of bounds for text of length {len}")
            }
            Self::InvalidColor(s) => write!(f, "invalid color format: {s}"),
            Self::Rule { rule, message } => write!(f, "rule `{rule}` failed: {message}"),
        }
    }
}

impl std::error::Error for Error {}
