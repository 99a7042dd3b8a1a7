//! Core data structures for the note sheet editor
//!
//! Everything in here is plain data plus validation helpers; rendering and
//! serialization to LilyPond live in their own modules.

pub mod attributes;
pub mod cursor;
pub mod duration;
pub mod pitch;
pub mod score;

// Re-export commonly used types
pub use attributes::{ClefType, KeySignature, Mode, TimeSignature};
pub use cursor::Cursor;
pub use duration::{Duration, Rational};
pub use pitch::Pitch;
pub use score::{AddressError, Measure, Note, Score};
