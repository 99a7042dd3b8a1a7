// Round-trip law for the LilyPond codec: decode(encode(score)) must be
// structurally equal to the score, for every score the subset can express.

use pretty_assertions::assert_eq;

use editor_tui::lilypond::{decode, encode, DecodeError, ExportSettings};
use editor_tui::models::{
    ClefType, Duration, KeySignature, Measure, Mode, Note, Pitch, Rational, Score, TimeSignature,
};

fn pitched(step: u8, alteration: i8, octave: i8, duration: Duration) -> Note {
    Note::Pitched {
        pitch: Pitch::new(step, alteration, octave).unwrap(),
        duration,
    }
}

fn rest(duration: Duration) -> Note {
    Note::Rest { duration }
}

fn round_trip(score: &Score) -> Score {
    let text = encode(score, &ExportSettings::default());
    decode(&text).unwrap_or_else(|err| panic!("decode failed on:\n{}\nerror: {}", text, err))
}

#[test]
fn round_trips_single_whole_note() {
    let mut score = Score::new();
    score
        .insert_note(0, 0, pitched(0, 0, 4, Duration::new(0, 0, None)))
        .unwrap();
    assert_eq!(round_trip(&score), score);
}

#[test]
fn round_trips_accidentals_and_octaves() {
    let mut score = Score::new();
    let notes = [
        pitched(0, 1, 4, Duration::new(2, 0, None)),
        pitched(2, -1, 3, Duration::new(1, 0, None)),
        pitched(5, -2, 2, Duration::new(3, 0, None)),
        pitched(3, 2, 7, Duration::new(4, 0, None)),
        pitched(6, 0, -2, Duration::new(0, 0, None)),
        pitched(1, 0, 8, Duration::new(6, 0, None)),
    ];
    for (i, note) in notes.into_iter().enumerate() {
        score.insert_note(0, i, note).unwrap();
    }
    assert_eq!(round_trip(&score), score);
}

#[test]
fn round_trips_dots_and_tuplets() {
    let mut score = Score::new();
    let notes = [
        pitched(4, 0, 4, Duration::new(2, 1, None)),
        pitched(4, 0, 4, Duration::new(1, 2, None)),
        rest(Duration::new(3, 3, None)),
        pitched(0, 0, 5, Duration::new(3, 0, Some(Rational::new(2, 3)))),
        rest(Duration::new(4, 1, Some(Rational::new(4, 5)))),
    ];
    for (i, note) in notes.into_iter().enumerate() {
        score.insert_note(0, i, note).unwrap();
    }
    assert_eq!(round_trip(&score), score);
}

#[test]
fn round_trips_metadata() {
    for clef in [ClefType::Treble, ClefType::Alto, ClefType::Bass] {
        for fifths in -7..=7 {
            for mode in [Mode::Major, Mode::Minor, Mode::Dorian, Mode::Locrian] {
                // some (fifths, mode) pairs have no tonic on the circle
                let Ok(key) = KeySignature::new(fifths, mode) else {
                    continue;
                };
                let mut score = Score::new();
                score.clef = clef;
                score.time = TimeSignature::new(6, 8).unwrap();
                score.key = Some(key);
                score
                    .insert_note(0, 0, pitched(0, 0, 4, Duration::new(2, 0, None)))
                    .unwrap();
                assert_eq!(round_trip(&score), score);
            }
        }
    }
}

#[test]
fn round_trips_multiple_and_empty_measures() {
    let mut score = Score::new();
    score
        .insert_note(0, 0, pitched(0, 0, 4, Duration::new(2, 0, None)))
        .unwrap();
    score.measures.push(Measure::new());
    score.measures.push(Measure::new());
    let mut third = Measure::new();
    third.notes.push(rest(Duration::new(0, 0, None)));
    score.measures.push(third);

    assert_eq!(round_trip(&score), score);
}

#[test]
fn round_trips_empty_score() {
    let mut score = Score::new();
    score.measures.clear();
    assert_eq!(round_trip(&score), score);
}

// Scenario: a one-measure 4/4 score with a single whole note C4 imports
// cleanly and renders as a bare whole-note symbol.
#[test]
fn imports_whole_note_c4() {
    let text = "\\version \"2.24.0\"\n\\clef treble\n\\time 4/4\nc'1 |\n";
    let score = decode(text).unwrap();

    assert_eq!(score.time, TimeSignature::common());
    assert_eq!(score.measures.len(), 1);
    let note = &score.measures[0].notes[0];
    assert_eq!(
        *note,
        pitched(0, 0, 4, Duration::new(0, 0, None))
    );

    let symbols = editor_tui::notation::render(note).unwrap();
    assert_eq!(symbols, vec!["𝅝"]);
}

// Scenario: an unrecognized directive must be rejected with an error that
// carries the offending line, never silently dropped.
#[test]
fn rejects_unknown_directives_with_line() {
    let text = "\\clef treble\n\\time 4/4\n\\unknownThing 42\nc'1 |\n";
    match decode(text) {
        Err(DecodeError::Unsupported(err)) => {
            assert_eq!(err.line, 3);
            assert_eq!(err.construct, "\\unknownThing");
        }
        other => panic!("expected UnsupportedConstructError, got {:?}", other),
    }
}

#[test]
fn parse_errors_carry_position_and_expectation() {
    let text = "\\clef treble\nc'1 d'q |\n";
    match decode(text) {
        Err(DecodeError::Parse(err)) => {
            assert_eq!(err.line, 2);
            assert!(err.expected.contains("duration"));
        }
        other => panic!("expected ParseError, got {:?}", other),
    }
}

#[test]
fn encode_is_stable_under_repeated_round_trips() {
    let mut score = Score::new();
    score.key = Some(KeySignature::new(-3, Mode::Minor).unwrap());
    score
        .insert_note(0, 0, pitched(2, -1, 4, Duration::new(2, 1, None)))
        .unwrap();

    let settings = ExportSettings::default();
    let once = encode(&score, &settings);
    let twice = encode(&decode(&once).unwrap(), &settings);
    assert_eq!(once, twice);
}
