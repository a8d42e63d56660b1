//! Error types for LLSD parsing and serialization.
//!
//! Only *structural* failures are errors: malformed grammar, mismatched
//! delimiters or elements, unsupported sub-encodings, truncated input,
//! nesting deeper than the configured limit and JSON writer state
//! violations. Type conversions on [`LlsdValue`](crate::LlsdValue) never
//! fail; they fall back to a documented default instead.
//!
//! ## Examples
//!
//! ```rust
//! use serde_llsd::{from_notation_str, Error};
//!
//! let result = from_notation_str("[i1, i2");
//! assert!(matches!(result, Err(Error::UnexpectedEof { .. })));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all structural errors raised by the LLSD codecs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// Grammar violation at a known position
    #[error("Syntax error at line {line}, column {col}: {msg}")]
    Syntax { line: usize, col: usize, msg: String },

    /// Input ended in the middle of a value
    #[error("Unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: String },

    /// A recognized but unsupported encoding (binary wire form, raw binary, base16)
    #[error("Unsupported encoding: {0}")]
    Unsupported(String),

    /// Structural nesting exceeded the configured bound
    #[error("Nesting depth exceeds the limit of {limit}")]
    DepthLimit { limit: usize },

    /// A JSON writer call that the current writer state does not allow
    #[error("Invalid JSON writer call: {0}")]
    WriterState(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a syntax error with line and column information.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_llsd::Error;
    ///
    /// let err = Error::syntax(3, 7, "expected ':'");
    /// assert!(err.to_string().contains("line 3"));
    /// ```
    pub fn syntax(line: usize, col: usize, msg: &str) -> Self {
        Error::Syntax {
            line,
            col,
            msg: msg.to_string(),
        }
    }

    /// Creates an unexpected end-of-input error.
    pub fn unexpected_eof(expected: &str) -> Self {
        Error::UnexpectedEof {
            expected: expected.to_string(),
        }
    }

    /// Creates an error for an encoding the codecs recognize but do not implement.
    pub fn unsupported(what: &str) -> Self {
        Error::Unsupported(what.to_string())
    }

    /// Creates a depth limit error.
    pub fn depth_limit(limit: usize) -> Self {
        Error::DepthLimit { limit }
    }

    /// Creates a JSON writer state violation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_llsd::Error;
    ///
    /// let err = Error::writer_state("object end without matching start");
    /// assert!(err.to_string().contains("object end"));
    /// ```
    pub fn writer_state(msg: &str) -> Self {
        Error::WriterState(msg.to_string())
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            Error::syntax(1, 4, "bad token").to_string(),
            "Syntax error at line 1, column 4: bad token"
        );
        assert_eq!(
            Error::depth_limit(8).to_string(),
            "Nesting depth exceeds the limit of 8"
        );
        assert!(Error::unsupported("binary").to_string().contains("binary"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "short read");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(ref m) if m.contains("short read")));
    }
}
