//! Error and diagnostic types for deck parsing and queries.
//!
//! Two severities exist, and they travel on different channels:
//!
//! - **Fatal errors** ([`Error`]): the source could not be opened or read, or
//!   a typed query asked for a key that is absent or a value that does not
//!   coerce. These propagate through `Result` and abort the operation.
//! - **Recoverable diagnostics** ([`Diagnostic`]): unmatched brackets,
//!   duplicate keys, empty values. Parsing never stops for these; they are
//!   collected into a list returned alongside the parsed store, and callers
//!   decide whether to print, ignore, or escalate them.
//!
//! ## Examples
//!
//! ```rust
//! use qsee::{parse_str, Error};
//!
//! let deck = parse_str("[QM]\nreference = RHF\n");
//! assert!(deck.diagnostics().is_empty());
//!
//! let missing = deck.store().get::<String>("QM.METHOD");
//! assert!(matches!(missing, Err(Error::KeyNotFound { .. })));
//! ```

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Fatal errors raised by deck parsing and typed queries.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The input deck could not be opened or read.
    #[error("IO error: {0}")]
    Io(String),

    /// A typed query named a key that is not in the store.
    #[error("data {key} not found")]
    KeyNotFound { key: String },

    /// A stored value failed to coerce to a boolean.
    ///
    /// Only the literal tokens `TRUE`/`ON` and `FALSE`/`OFF` are accepted.
    #[error("invalid boolean value for {key}: {value}")]
    InvalidBool { key: String, value: String },

    /// A stored value failed to coerce to the requested numeric type.
    #[error("invalid {expected} value for {key}: {value}")]
    InvalidNumber {
        key: String,
        value: String,
        expected: &'static str,
    },
}

impl Error {
    /// Creates an I/O error for deck reading failures.
    pub fn io<T: fmt::Display>(msg: T) -> Self {
        Error::Io(msg.to_string())
    }

    /// Creates a "not found" error for a typed query against an absent key.
    pub fn not_found(key: &str) -> Self {
        Error::KeyNotFound {
            key: key.to_string(),
        }
    }

    pub(crate) fn invalid_bool(key: &str, value: &str) -> Self {
        Error::InvalidBool {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    pub(crate) fn invalid_number(key: &str, value: &str, expected: &'static str) -> Self {
        Error::InvalidNumber {
            key: key.to_string(),
            value: value.to_string(),
            expected,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// The category of a recoverable parse condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiagnosticKind {
    /// A closing bracket with no matching opener, or a mismatched pair.
    UnmatchedBracket,
    /// A key was inserted twice; the later value overwrote the earlier one.
    DuplicateKey,
    /// A data entry ended up with no value and was skipped.
    EmptyValue,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::UnmatchedBracket => f.write_str("unmatched bracket"),
            DiagnosticKind::DuplicateKey => f.write_str("duplicate key"),
            DiagnosticKind::EmptyValue => f.write_str("empty value"),
        }
    }
}

/// A recoverable condition observed while parsing.
///
/// Diagnostics never interrupt the line scan; the parse result is still
/// usable on a best-effort basis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// 1-based source line the condition was observed on.
    pub line: usize,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub(crate) fn new(line: usize, kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Diagnostic {
            line,
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}: {}", self.line, self.kind, self.message)
    }
}
