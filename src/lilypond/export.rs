//! LilyPond export
//!
//! Converts a score to LilyPond subset source. Export is a total structural
//! traversal: every valid score has a textual representation, so there is
//! no error type here. The output is the canonical spelling that the parser
//! reads back to a structurally equal score.

use crate::models::{Note, Score};

use super::ExportSettings;

/// Generate LilyPond subset source for a score
pub fn encode(score: &Score, settings: &ExportSettings) -> String {
    let mut output = String::new();

    output.push_str(&format!("\\version \"{}\"\n", settings.lilypond_version));
    output.push_str(&format!("\\clef {}\n", score.clef.lilypond_name()));
    output.push_str(&format!(
        "\\time {}/{}\n",
        score.time.beats, score.time.beat_type
    ));
    if let Some(key) = &score.key {
        output.push_str(&format!(
            "\\key {} \\{}\n",
            key.tonic_name(),
            key.mode.lilypond_name()
        ));
    }

    // one measure per line, each closed by a bar check
    for measure in &score.measures {
        let notes: Vec<String> = measure.notes.iter().map(note_to_lilypond).collect();
        if notes.is_empty() {
            output.push_str("|\n");
        } else {
            output.push_str(&format!("{} |\n", notes.join(" ")));
        }
    }

    output
}

/// Convert a single note or rest to its LilyPond spelling
fn note_to_lilypond(note: &Note) -> String {
    match note {
        Note::Pitched { pitch, duration } => format!(
            "{}{}",
            pitch.to_lilypond_string(),
            duration.to_lilypond_string()
        ),
        Note::Rest { duration } => format!("r{}", duration.to_lilypond_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Duration, KeySignature, Measure, Mode, Pitch, Rational, TimeSignature};

    #[test]
    fn test_encode_minimal_score() {
        let mut score = Score::new();
        score
            .insert_note(
                0,
                0,
                Note::Pitched {
                    pitch: Pitch::new(0, 0, 4).unwrap(),
                    duration: Duration::new(0, 0, None),
                },
            )
            .unwrap();

        let text = encode(&score, &ExportSettings::default());
        assert!(text.starts_with("\\version \""));
        assert!(text.contains("\\clef treble\n"));
        assert!(text.contains("\\time 4/4\n"));
        assert!(text.contains("c'1 |\n"));
    }

    #[test]
    fn test_encode_key_and_accidentals() {
        let mut score = Score::new();
        score.time = TimeSignature::new(3, 4).unwrap();
        score.key = Some(KeySignature::from_tonic_name("d", Mode::Minor).unwrap());
        score
            .insert_note(
                0,
                0,
                Note::Pitched {
                    pitch: Pitch::new(3, 1, 5).unwrap(),
                    duration: Duration::new(2, 1, None),
                },
            )
            .unwrap();
        score
            .insert_note(
                0,
                1,
                Note::Rest {
                    duration: Duration::new(3, 0, Some(Rational::new(2, 3))),
                },
            )
            .unwrap();

        let text = encode(&score, &ExportSettings::default());
        assert!(text.contains("\\time 3/4\n"));
        assert!(text.contains("\\key d \\minor\n"));
        assert!(text.contains("fis''4. r8*2/3 |\n"));
    }

    #[test]
    fn test_empty_measures_emit_bare_bars() {
        let mut score = Score::new();
        score.measures.push(Measure::new());
        let text = encode(&score, &ExportSettings::default());
        assert!(text.ends_with("|\n|\n"));
    }
}
