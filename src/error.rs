//! Error types for canonical serialization and guarded parsing.
//!
//! ## Error Categories
//!
//! - **Format Errors**: `parse_guarded` input failed the textual shape check and was
//!   never handed to the parser
//! - **Syntax Errors**: the parser could not build a value, with line/column information
//! - **Depth Errors**: nesting went beyond the configured `max_depth`
//! - **Data Errors**: conversions through the serde bridge failed
//!
//! Messages never contain the raw input text, so they are safe to log or display.
//!
//! ## Examples
//!
//! ```rust
//! use canon_json::{parse_guarded, ErrorKind};
//!
//! let err = parse_guarded("a;evilCall()").unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::Format);
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors that can occur while serializing or parsing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The guarded deserializer rejected the input before parsing it
    #[error("Error parsing JSON, source is not valid: {reason}")]
    Format { reason: String },

    /// Syntax error with position information
    #[error("Syntax error at line {line}, column {col}: {msg}")]
    Syntax { line: usize, col: usize, msg: String },

    /// Unexpected end of input
    #[error("Unexpected end of input at line {line}, column {col}: expected {expected}")]
    UnexpectedEof {
        line: usize,
        col: usize,
        expected: String,
    },

    /// Nesting exceeded the configured limit
    #[error("Nesting depth exceeds the limit of {limit}")]
    DepthExceeded { limit: usize },

    /// Unsupported type for conversion into a `Value`
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Format,
    Syntax,
    DepthExceeded,
    Data,
}

impl Error {
    /// Creates a format error for input rejected by the textual guard.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use canon_json::Error;
    ///
    /// let err = Error::format("unexpected tokens outside of literals");
    /// assert!(err.to_string().contains("source is not valid"));
    /// ```
    pub fn format(reason: &str) -> Self {
        Error::Format {
            reason: reason.to_string(),
        }
    }

    /// Creates a syntax error with line and column information.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use canon_json::Error;
    ///
    /// let err = Error::syntax(10, 5, "unexpected token");
    /// assert!(err.to_string().contains("line 10"));
    /// ```
    pub fn syntax(line: usize, col: usize, msg: &str) -> Self {
        Error::Syntax {
            line,
            col,
            msg: msg.to_string(),
        }
    }

    /// Creates an unexpected end-of-input error.
    pub fn unexpected_eof(line: usize, col: usize, expected: &str) -> Self {
        Error::UnexpectedEof {
            line,
            col,
            expected: expected.to_string(),
        }
    }

    /// Creates a depth error for nesting beyond `limit`.
    pub fn depth_exceeded(limit: usize) -> Self {
        Error::DepthExceeded { limit }
    }

    /// Creates an unsupported type error for values that have no `Value` form.
    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Returns the category of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Format { .. } => ErrorKind::Format,
            Error::Syntax { .. } | Error::UnexpectedEof { .. } => ErrorKind::Syntax,
            Error::DepthExceeded { .. } => ErrorKind::DepthExceeded,
            Error::UnsupportedType(_) | Error::Custom(_) => ErrorKind::Data,
        }
    }

    #[must_use]
    pub fn is_format(&self) -> bool {
        self.kind() == ErrorKind::Format
    }

    #[must_use]
    pub fn is_syntax(&self) -> bool {
        self.kind() == ErrorKind::Syntax
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        use serde_json::error::Category;

        // serde_json messages end with " at line L column C"; keep only the reason.
        let full = err.to_string();
        let msg = match full.rfind(" at line ") {
            Some(idx) => full[..idx].to_string(),
            None => full,
        };

        match err.classify() {
            Category::Eof => Error::UnexpectedEof {
                line: err.line(),
                col: err.column(),
                expected: msg,
            },
            Category::Syntax => Error::Syntax {
                line: err.line(),
                col: err.column(),
                msg,
            },
            Category::Data | Category::Io => Error::Custom(msg),
        }
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
