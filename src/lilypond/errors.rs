//! Error types for LilyPond import
//!
//! Decoding distinguishes malformed input (ParseError) from well-formed
//! LilyPond that falls outside the supported subset
//! (UnsupportedConstructError). Both abort the import; the session keeps
//! its previous score. Export is total and has no error type.

use thiserror::Error;

/// Top-level import error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Malformed input; no recovery is attempted
    #[error("{0}")]
    Parse(#[from] ParseError),

    /// Recognizable LilyPond outside the supported subset; rejected
    /// explicitly so information loss is never silent
    #[error("{0}")]
    Unsupported(#[from] UnsupportedConstructError),
}

/// Malformed input at a specific position
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("parse error at line {line}, column {col}: expected {expected}, found {found}")]
pub struct ParseError {
    /// 1-based line of the offending token
    pub line: usize,
    /// 1-based column of the offending token
    pub col: usize,
    /// What the grammar required here
    pub expected: String,
    /// What was actually present
    pub found: String,
}

/// A construct the subset does not interpret
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported construct on line {line}: {construct}")]
pub struct UnsupportedConstructError {
    /// 1-based line of the construct
    pub line: usize,
    /// The rejected directive or delimiter
    pub construct: String,
}
