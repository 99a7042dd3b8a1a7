//! Score-level attributes: clef, time signature, key signature
//!
//! These are the metadata every score carries; the clef and time signature
//! are required for rendering, the key signature is optional.

use serde::{Deserialize, Serialize};

/// Clef types supported by the staff renderer
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClefType {
    Treble,
    Alto,
    Bass,
}

impl ClefType {
    /// LilyPond clef name
    pub fn lilypond_name(&self) -> &'static str {
        match self {
            ClefType::Treble => "treble",
            ClefType::Alto => "alto",
            ClefType::Bass => "bass",
        }
    }

    /// Parse a LilyPond clef name
    pub fn from_lilypond_name(name: &str) -> Option<Self> {
        match name {
            "treble" => Some(ClefType::Treble),
            "alto" => Some(ClefType::Alto),
            "bass" => Some(ClefType::Bass),
            _ => None,
        }
    }

    /// Diatonic index of the pitch sitting on the middle staff line
    pub fn middle_line_index(&self) -> i32 {
        match self {
            // B4 / C4 / D3
            ClefType::Treble => 4 * 7 + 6,
            ClefType::Alto => 4 * 7,
            ClefType::Bass => 3 * 7 + 1,
        }
    }
}

impl Default for ClefType {
    fn default() -> Self {
        ClefType::Treble
    }
}

/// Time signature
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSignature {
    /// Number of beats per measure
    pub beats: u8,
    /// Beat unit (2, 4, 8, 16, ...)
    pub beat_type: u8,
}

impl TimeSignature {
    /// Create a new time signature with validation
    pub fn new(beats: u8, beat_type: u8) -> Result<Self, String> {
        if beats == 0 {
            return Err("Beats must be greater than 0".to_string());
        }
        if !beat_type.is_power_of_two() {
            return Err(format!("Beat type must be power of 2, got {}", beat_type));
        }
        Ok(Self { beats, beat_type })
    }

    /// Common time (4/4)
    pub fn common() -> Self {
        Self {
            beats: 4,
            beat_type: 4,
        }
    }

    /// True for 4/4, which renders as the common-time glyph
    pub fn is_common(&self) -> bool {
        self.beats == 4 && self.beat_type == 4
    }

    /// Expected measure length as a fraction of a whole note
    pub fn measure_length(&self) -> super::duration::Rational {
        super::duration::Rational::new(self.beats as i32, self.beat_type as i32)
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self::common()
    }
}

/// Musical mode
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Major,
    Minor,
    Dorian,
    Phrygian,
    Lydian,
    Mixolydian,
    Aeolian,
    Locrian,
}

impl Mode {
    /// LilyPond mode command name (without the backslash)
    pub fn lilypond_name(&self) -> &'static str {
        match self {
            Mode::Major => "major",
            Mode::Minor => "minor",
            Mode::Dorian => "dorian",
            Mode::Phrygian => "phrygian",
            Mode::Lydian => "lydian",
            Mode::Mixolydian => "mixolydian",
            Mode::Aeolian => "aeolian",
            Mode::Locrian => "locrian",
        }
    }

    /// Parse a LilyPond mode command name
    pub fn from_lilypond_name(name: &str) -> Option<Self> {
        match name {
            "major" => Some(Mode::Major),
            "minor" => Some(Mode::Minor),
            "dorian" => Some(Mode::Dorian),
            "phrygian" => Some(Mode::Phrygian),
            "lydian" => Some(Mode::Lydian),
            "mixolydian" => Some(Mode::Mixolydian),
            "aeolian" => Some(Mode::Aeolian),
            "locrian" => Some(Mode::Locrian),
            _ => None,
        }
    }

    /// Offset between the tonic's position as a major key and the signature
    /// the mode actually carries (C minor has three flats, so -3)
    fn fifths_offset(&self) -> i8 {
        match self {
            Mode::Lydian => 1,
            Mode::Major => 0,
            Mode::Mixolydian => -1,
            Mode::Dorian => -2,
            Mode::Minor | Mode::Aeolian => -3,
            Mode::Phrygian => -4,
            Mode::Locrian => -5,
        }
    }
}

/// Tonic names on the circle of fifths, Dutch spelling, indexed by the
/// tonic's major-key fifths + 7
const TONIC_NAMES: [&str; 15] = [
    "ces", "ges", "des", "aes", "ees", "bes", "f", "c", "g", "d", "a", "e", "b", "fis", "cis",
];

/// Key signature
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeySignature {
    /// Position on the circle of fifths (-7 to +7, flats to sharps)
    pub fifths: i8,
    pub mode: Mode,
}

impl KeySignature {
    /// Create a new key signature with validation; the (fifths, mode) pair
    /// must have a tonic on the circle of fifths
    pub fn new(fifths: i8, mode: Mode) -> Result<Self, String> {
        if !(-7..=7).contains(&fifths) {
            return Err(format!("Invalid fifths: {} (must be -7 to +7)", fifths));
        }
        let tonic = fifths - mode.fifths_offset();
        if !(-7..=7).contains(&tonic) {
            return Err(format!(
                "No tonic on the circle of fifths for {} in {}",
                fifths,
                mode.lilypond_name()
            ));
        }
        Ok(Self { fifths, mode })
    }

    /// Dutch tonic name of this key; the mode's circle-of-fifths offset is
    /// folded out, so six flats is "ges" in major but "ees" in minor
    pub fn tonic_name(&self) -> &'static str {
        let tonic = self.fifths - self.mode.fifths_offset();
        TONIC_NAMES
            .get((tonic + 7) as usize)
            .copied()
            .unwrap_or("c")
    }

    /// Look up a key signature by Dutch tonic name
    pub fn from_tonic_name(name: &str, mode: Mode) -> Option<Self> {
        let index = TONIC_NAMES.iter().position(|n| *n == name)?;
        let fifths = index as i8 - 7 + mode.fifths_offset();
        Self::new(fifths, mode).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_signature_validation() {
        assert!(TimeSignature::new(0, 4).is_err());
        assert!(TimeSignature::new(3, 5).is_err());
        assert!(TimeSignature::new(7, 8).is_ok());
        assert!(TimeSignature::common().is_common());
    }

    #[test]
    fn test_measure_length() {
        use super::super::duration::Rational;
        assert_eq!(
            TimeSignature::new(3, 4).unwrap().measure_length(),
            Rational::new(3, 4)
        );
        assert_eq!(
            TimeSignature::new(6, 8).unwrap().measure_length(),
            Rational::new(3, 4)
        );
    }

    #[test]
    fn test_key_tonic_round_trip() {
        let modes = [
            Mode::Major,
            Mode::Minor,
            Mode::Dorian,
            Mode::Phrygian,
            Mode::Lydian,
            Mode::Mixolydian,
            Mode::Aeolian,
            Mode::Locrian,
        ];
        for fifths in -7..=7 {
            for mode in modes {
                let Ok(key) = KeySignature::new(fifths, mode) else {
                    continue;
                };
                let back = KeySignature::from_tonic_name(key.tonic_name(), mode).unwrap();
                assert_eq!(key, back);
            }
        }
    }

    #[test]
    fn test_modes_carry_their_own_signature() {
        // e-flat minor has six flats, shared with its relative g-flat major
        let ees_minor = KeySignature::from_tonic_name("ees", Mode::Minor).unwrap();
        assert_eq!(ees_minor.fifths, -6);
        assert_eq!(ees_minor.tonic_name(), "ees");
        let ges_major = KeySignature::from_tonic_name("ges", Mode::Major).unwrap();
        assert_eq!(ges_major.fifths, -6);

        // b lydian still fits the circle; c-sharp lydian would need eight sharps
        assert!(KeySignature::from_tonic_name("b", Mode::Lydian).is_some());
        assert!(KeySignature::from_tonic_name("cis", Mode::Lydian).is_none());
        assert!(KeySignature::new(7, Mode::Locrian).is_err());
    }

    #[test]
    fn test_middle_line_indices() {
        use crate::models::pitch::Pitch;
        // treble middle line is B4
        let b4 = Pitch::new(6, 0, 4).unwrap();
        assert_eq!(b4.diatonic_index(), ClefType::Treble.middle_line_index());
        // bass middle line is D3
        let d3 = Pitch::new(1, 0, 3).unwrap();
        assert_eq!(d3.diatonic_index(), ClefType::Bass.middle_line_index());
    }
}
