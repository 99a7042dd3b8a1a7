//! Notation mapping: music values to printable symbols
//!
//! Pure functions from the data model to sequences of Unicode musical
//! glyphs. No shared state, so a render call is deterministic and needs no
//! cache. Durations that fall outside the supported symbol set are reported
//! as errors, never rounded; the caller decides whether to approximate.

use thiserror::Error;

use crate::models::{ClefType, Note, Pitch, TimeSignature};

/// Note head glyphs indexed by logarithmic base length (whole..sixty-fourth)
const NOTE_GLYPHS: [&str; 7] = ["𝅝", "𝅗𝅥", "𝅘𝅥", "𝅘𝅥𝅮", "𝅘𝅥𝅯", "𝅘𝅥𝅰", "𝅘𝅥𝅱"];

/// Rest glyphs indexed by logarithmic base length (whole..sixty-fourth)
const REST_GLYPHS: [&str; 7] = ["𝄻", "𝄼", "𝄽", "𝄾", "𝄿", "𝅀", "𝅁"];

/// Augmentation dot, one per dot of the duration
const DOT_GLYPH: &str = "·";

/// Superscript digits for tuplet actual-counts 2..=9
const TUPLET_DIGITS: [&str; 8] = ["²", "³", "⁴", "⁵", "⁶", "⁷", "⁸", "⁹"];

/// Common time glyph, shown instead of 4/4
const COMMON_TIME_GLYPH: &str = "𝄴";

/// A duration that the symbol set cannot express
///
/// Recoverable: shown to the user, editing continues. Callers must not
/// substitute a rounded value on their own.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnsupportedDurationError {
    #[error("base length 1/{denominator} is shorter than a sixty-fourth")]
    BaseTooShort { denominator: u64 },

    #[error("{dots} augmentation dots exceed the supported maximum of 3")]
    TooManyDots { dots: u8 },

    #[error("tuplet factor {numer}/{denom} has no bracket digit")]
    TupletOutOfRange { numer: i32, denom: i32 },

    #[error("duration is not strictly positive")]
    NonPositive,
}

/// Render a note or rest as a sequence of printable symbols
///
/// The sequence is: accidental glyph (pitched notes with a non-natural
/// alteration only), head glyph, one dot glyph per augmentation dot, and a
/// superscript tuplet digit when a tuplet factor is present.
pub fn render(note: &Note) -> Result<Vec<String>, UnsupportedDurationError> {
    let duration = note.duration();

    if duration.log > 6 {
        return Err(UnsupportedDurationError::BaseTooShort {
            denominator: 1u64 << duration.log.min(63),
        });
    }
    if duration.dots > 3 {
        return Err(UnsupportedDurationError::TooManyDots {
            dots: duration.dots,
        });
    }
    let tuplet_digit = match duration.factor {
        Some(f) if *f.numer() <= 0 || *f.denom() <= 0 => {
            return Err(UnsupportedDurationError::NonPositive);
        }
        Some(f) => {
            let actual = *f.denom();
            if !(2..=9).contains(&actual) {
                return Err(UnsupportedDurationError::TupletOutOfRange {
                    numer: *f.numer(),
                    denom: *f.denom(),
                });
            }
            Some(TUPLET_DIGITS[(actual - 2) as usize])
        }
        None => None,
    };

    let mut symbols = Vec::new();
    if let Some(pitch) = note.pitch() {
        if let Some(glyph) = accidental_glyph(pitch.alteration) {
            symbols.push(glyph.to_string());
        }
    }
    let head = if note.is_rest() {
        REST_GLYPHS[duration.log as usize]
    } else {
        NOTE_GLYPHS[duration.log as usize]
    };
    symbols.push(head.to_string());
    for _ in 0..duration.dots {
        symbols.push(DOT_GLYPH.to_string());
    }
    if let Some(digit) = tuplet_digit {
        symbols.push(digit.to_string());
    }
    Ok(symbols)
}

/// Accidental glyph for an alteration; natural has no glyph
pub fn accidental_glyph(alteration: i8) -> Option<&'static str> {
    match alteration {
        -2 => Some("𝄫"),
        -1 => Some("♭"),
        1 => Some("♯"),
        2 => Some("𝄪"),
        _ => None,
    }
}

/// Clef glyph drawn at the start of the staff
pub fn clef_glyph(clef: ClefType) -> &'static str {
    match clef {
        ClefType::Treble => "𝄞",
        ClefType::Alto => "𝄡",
        ClefType::Bass => "𝄢",
    }
}

/// Time signature as stacked glyph lines; 4/4 collapses to common time
pub fn time_signature_glyphs(time: &TimeSignature) -> Vec<String> {
    if time.is_common() {
        vec![COMMON_TIME_GLYPH.to_string()]
    } else {
        vec![time.beats.to_string(), time.beat_type.to_string()]
    }
}

/// Diatonic steps between a pitch and the middle line of the staff
///
/// Positive values sit above the middle line. The terminal staff renderer
/// draws one text row per two diatonic steps.
pub fn staff_offset(pitch: &Pitch, clef: ClefType) -> i32 {
    pitch.diatonic_index() - clef.middle_line_index()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Duration, Rational};

    fn pitched(step: u8, alteration: i8, octave: i8, duration: Duration) -> Note {
        Note::Pitched {
            pitch: Pitch::new(step, alteration, octave).unwrap(),
            duration,
        }
    }

    #[test]
    fn test_whole_note_c4_renders_plain_head() {
        let note = pitched(0, 0, 4, Duration::new(0, 0, None));
        assert_eq!(render(&note).unwrap(), vec!["𝅝"]);
    }

    #[test]
    fn test_accidental_and_dots() {
        let note = pitched(3, 1, 5, Duration::new(2, 1, None));
        assert_eq!(render(&note).unwrap(), vec!["♯", "𝅘𝅥", "·"]);
    }

    #[test]
    fn test_rest_glyphs() {
        let rest = Note::Rest {
            duration: Duration::new(3, 0, None),
        };
        assert_eq!(render(&rest).unwrap(), vec!["𝄾"]);
    }

    #[test]
    fn test_tuplet_digit() {
        let note = pitched(0, 0, 4, Duration::new(3, 0, Some(Rational::new(2, 3))));
        assert_eq!(render(&note).unwrap(), vec!["𝅘𝅥𝅮", "³"]);
    }

    #[test]
    fn test_render_is_deterministic() {
        let note = pitched(4, -1, 3, Duration::new(1, 2, None));
        assert_eq!(render(&note).unwrap(), render(&note).unwrap());
    }

    #[test]
    fn test_unsupported_durations_are_reported() {
        // the constructor clamps, so a too-short base takes a struct literal
        let too_short = Note::Rest {
            duration: Duration {
                log: 7,
                dots: 0,
                factor: None,
            },
        };
        assert_eq!(
            render(&too_short),
            Err(UnsupportedDurationError::BaseTooShort { denominator: 128 })
        );

        let odd_tuplet = Note::Rest {
            duration: Duration::new(2, 0, Some(Rational::new(3, 10))),
        };
        assert!(matches!(
            render(&odd_tuplet),
            Err(UnsupportedDurationError::TupletOutOfRange { .. })
        ));

        let negative = Note::Rest {
            duration: Duration::new(2, 0, Some(Rational::new(-2, 3))),
        };
        assert_eq!(render(&negative), Err(UnsupportedDurationError::NonPositive));
    }

    #[test]
    fn test_staff_offsets() {
        // treble: B4 is the middle line, C5 one step above, A4 one below
        let b4 = Pitch::new(6, 0, 4).unwrap();
        let c5 = Pitch::new(0, 0, 5).unwrap();
        let a4 = Pitch::new(5, 0, 4).unwrap();
        assert_eq!(staff_offset(&b4, ClefType::Treble), 0);
        assert_eq!(staff_offset(&c5, ClefType::Treble), 1);
        assert_eq!(staff_offset(&a4, ClefType::Treble), -1);
    }

    #[test]
    fn test_time_signature_glyphs() {
        assert_eq!(time_signature_glyphs(&TimeSignature::common()), vec!["𝄴"]);
        assert_eq!(
            time_signature_glyphs(&TimeSignature::new(6, 8).unwrap()),
            vec!["6", "8"]
        );
    }
}
