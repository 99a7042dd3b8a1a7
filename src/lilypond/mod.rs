//! LilyPond subset codec
//!
//! Bidirectional converter between the score model and a LilyPond subset:
//! `\version`, `\clef`, `\time`, `\key`, and measures of notes with Dutch
//! note names, octave marks, explicit durations, dots and `*n/d` factors.
//! The round-trip law holds for every representable score:
//! `decode(encode(score)) == score`.
//!
//! Directives outside the subset are rejected with a distinguishable error
//! kind rather than passed through, so an import can never silently drop
//! musical content.

pub mod errors;
pub mod export;
pub mod parser;
pub mod tokens;

use serde::{Deserialize, Serialize};

pub use errors::{DecodeError, ParseError, UnsupportedConstructError};
pub use export::encode;
pub use parser::decode;

/// Configuration options for export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSettings {
    /// Target LilyPond version written to the \version header
    pub lilypond_version: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            lilypond_version: "2.24.0".to_string(),
        }
    }
}
