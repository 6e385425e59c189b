//! Unified error handling for siftql.
//!
//! This module defines [`SiftError`], the single error type propagated
//! through the lexer, parser, and table-loading layers. Query evaluation
//! deliberately has no error domain: every query that parses evaluates to
//! a result for every row (see [`crate::execution`]).
//!
//! A convenience [`Result<T>`] type alias is re-exported so that callers
//! can write `Result<T>` instead of `std::result::Result<T, SiftError>`.

use std::io;

use thiserror::Error;

/// The canonical error type for all siftql operations.
#[derive(Debug, Error)]
pub enum SiftError {
    /// The query text could not be tokenized or parsed. Carries the line
    /// number the lexer was on when the error was raised.
    #[error("syntax error at line {line}: {message}")]
    Syntax { line: u32, message: String },

    /// A table file was structurally valid JSON but not a flat array of
    /// string-keyed objects with scalar values.
    #[error("bad table data: {0}")]
    BadTable(String),

    /// An I/O error while reading a table file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A table file could not be parsed as JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl SiftError {
    /// Construct a syntax error at the given source line.
    pub fn syntax(line: u32, message: impl Into<String>) -> Self {
        SiftError::Syntax {
            line,
            message: message.into(),
        }
    }
}

/// A specialised [`Result`] type for siftql operations.
pub type Result<T> = std::result::Result<T, SiftError>;
