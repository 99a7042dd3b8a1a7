//! Pitch representation
//!
//! A pitch is a diatonic step plus an alteration and an octave. The editor
//! works with this spelling directly (rather than a chromatic number) so
//! that accidentals survive a round-trip through the LilyPond exporter.

use serde::{Deserialize, Serialize};

/// Diatonic letter names, used for display and status messages
const STEP_LETTERS: [char; 7] = ['C', 'D', 'E', 'F', 'G', 'A', 'B'];

/// Musical pitch representation
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pitch {
    /// Scale degree (0=C, 1=D, 2=E, 3=F, 4=G, 5=A, 6=B)
    pub step: u8,

    /// Accidental (-2=double flat, -1=flat, 0=natural, +1=sharp, +2=double sharp)
    pub alteration: i8,

    /// Octave number (4 = middle C octave)
    pub octave: i8,
}

impl Pitch {
    /// Lowest octave the editor will address
    pub const MIN_OCTAVE: i8 = -2;

    /// Highest octave the editor will address
    pub const MAX_OCTAVE: i8 = 8;

    /// Create a new pitch with validation
    pub fn new(step: u8, alteration: i8, octave: i8) -> Result<Self, String> {
        if step > 6 {
            return Err(format!("Invalid step: {} (must be 0-6)", step));
        }
        if !(-2..=2).contains(&alteration) {
            return Err(format!(
                "Invalid alteration: {} (must be -2 to +2)",
                alteration
            ));
        }
        if !(Self::MIN_OCTAVE..=Self::MAX_OCTAVE).contains(&octave) {
            return Err(format!(
                "Invalid octave: {} (must be {} to {})",
                octave,
                Self::MIN_OCTAVE,
                Self::MAX_OCTAVE
            ));
        }
        Ok(Self {
            step,
            alteration,
            octave,
        })
    }

    /// The letter name of this pitch (C, D, E, F, G, A, B)
    pub fn letter(&self) -> char {
        STEP_LETTERS[self.step as usize]
    }

    /// Absolute diatonic index (octave * 7 + step), used for staff placement
    pub fn diatonic_index(&self) -> i32 {
        self.octave as i32 * 7 + self.step as i32
    }

    /// Convert pitch to LilyPond notation (Dutch note names, absolute octaves)
    pub fn to_lilypond_string(&self) -> String {
        format!("{}{}", self.note_name(), self.octave_marks())
    }

    /// Dutch note name with accidental suffix (cis, ees, cisis, eeses)
    pub fn note_name(&self) -> String {
        let base = ["c", "d", "e", "f", "g", "a", "b"][self.step as usize];
        match self.alteration {
            -2 => format!("{}eses", base),
            -1 => format!("{}es", base),
            1 => format!("{}is", base),
            2 => format!("{}isis", base),
            _ => base.to_string(),
        }
    }

    fn octave_marks(&self) -> String {
        // LilyPond absolute octaves: c' is octave 4 (middle C), c is octave 3,
        // c, is octave 2
        if self.octave >= 4 {
            "'".repeat((self.octave - 3) as usize)
        } else {
            ",".repeat((3 - self.octave) as usize)
        }
    }

    /// Raise or lower the octave, clamped to the supported range
    pub fn shift_octave(&mut self, delta: i8) {
        self.octave = (self.octave + delta).clamp(Self::MIN_OCTAVE, Self::MAX_OCTAVE);
    }

    /// Raise or lower the alteration, clamped to double sharp/flat
    pub fn shift_alteration(&mut self, delta: i8) {
        self.alteration = (self.alteration + delta).clamp(-2, 2);
    }
}
