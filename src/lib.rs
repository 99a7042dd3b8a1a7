//! Music Notation Editor for the terminal
//!
//! A keyboard-driven editor for musical note sheets. The score model,
//! notation mapping and LilyPond codec are plain library code; the UI is a
//! set of independent screen regions exchanging typed commands through a
//! dispatching interface.

pub mod commands;
pub mod components;
pub mod interface;
pub mod lilypond;
pub mod models;
pub mod notation;
pub mod terminal;

// Re-export commonly used types
pub use interface::{CommandLoopError, Interface};
pub use models::{Cursor, Duration, Note, Pitch, Score};
