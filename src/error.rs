//! # Error Types
//!
//! This module defines all error types for the funkconv transcoders.
//!
//! ## Error Types
//! - `ParseError` - Input text is not a well-formed JSON document, with line
//!   and column information from the underlying parser
//! - `MissingRequiredField` - A field with no sensible default (such as the
//!   document BPM) is absent after defaulting
//! - `MalformedNote` - A note carries a direction or time outside its domain
//! - `Serialize` - An output document could not be rendered to text
//!
//! A conversion either fully succeeds with a complete output document or
//! fails with one of these; no partial document is ever returned. The one
//! deliberate exception to "fail loudly" is the Lua prop-script parser, which
//! skips unrecognized lines instead of reporting them (see `script`).
//!
//! ## Usage
//! ```rust
//! use funkconv::{chart_to_vslice, ChartToVSliceOptions, ConvertError};
//!
//! match chart_to_vslice("{ not json", &ChartToVSliceOptions::default()) {
//!     Err(ConvertError::ParseError { line, column, message }) => {
//!         eprintln!("Bad chart JSON at {}:{}: {}", line, column, message);
//!     }
//!     other => panic!("expected a parse error, got {:?}", other.map(|_| ())),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    /// Input text could not be parsed as a JSON document.
    ///
    /// # Example
    /// ```
    /// # use funkconv::ConvertError;
    /// let err = ConvertError::ParseError {
    ///     line: 3,
    ///     column: 14,
    ///     message: "expected value".to_string(),
    /// };
    /// assert_eq!(err.to_string(), "Parse error at line 3, column 14: expected value");
    /// ```
    #[error("Parse error at line {line}, column {column}: {message}")]
    ParseError {
        line: usize,
        column: usize,
        message: String,
    },

    /// A structurally required field is absent and has no default.
    ///
    /// # Example
    /// ```
    /// # use funkconv::ConvertError;
    /// let err = ConvertError::MissingRequiredField("song.bpm".to_string());
    /// assert_eq!(err.to_string(), "Missing required field: song.bpm");
    /// ```
    #[error("Missing required field: {0}")]
    MissingRequiredField(String),

    /// A note's direction or time falls outside its domain.
    ///
    /// # Example
    /// ```
    /// # use funkconv::ConvertError;
    /// let err = ConvertError::MalformedNote {
    ///     message: "direction 9 outside 0-7 at 1520ms".to_string(),
    /// };
    /// assert_eq!(err.to_string(), "Malformed note: direction 9 outside 0-7 at 1520ms");
    /// ```
    #[error("Malformed note: {message}")]
    MalformedNote { message: String },

    /// An output document failed to serialize. Converted documents are plain
    /// trees of strings and numbers, so hitting this indicates a bug rather
    /// than bad input.
    #[error("Failed to serialize output document: {0}")]
    Serialize(String),
}

impl ConvertError {
    /// Wrap a JSON syntax error, preserving its source location.
    pub(crate) fn from_json(err: serde_json::Error) -> Self {
        ConvertError::ParseError {
            line: err.line(),
            column: err.column(),
            message: err.to_string(),
        }
    }
}
