//! Recursive-descent parser for the LilyPond subset
//!
//! Grammar: an optional \version directive, then \clef, \time and an
//! optional \key, then measures of notes separated by '|'. A note is a
//! Dutch note name with octave marks, an explicit power-of-two duration,
//! dots and an optional *n/d factor; 'r' introduces a rest. Anything else
//! that is recognizable LilyPond is rejected as an unsupported construct.

use crate::models::{
    ClefType, Duration, KeySignature, Measure, Mode, Note, Pitch, Rational, Score, TimeSignature,
};

use super::errors::{DecodeError, ParseError, UnsupportedConstructError};
use super::tokens::{tokenize, Token, TokenKind};

/// Parse a complete score from LilyPond subset text
pub fn decode(input: &str) -> Result<Score, DecodeError> {
    let tokens = tokenize(input)?;
    Parser::new(tokens).parse_score()
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Position to report when the input ends too early
    fn end_position(&self) -> (usize, usize) {
        self.tokens
            .last()
            .map(|t| (t.line, t.col))
            .unwrap_or((1, 1))
    }

    fn error(&self, expected: &str, token: Option<&Token>) -> ParseError {
        match token {
            Some(t) => ParseError {
                line: t.line,
                col: t.col,
                expected: expected.to_string(),
                found: t.kind.describe(),
            },
            None => {
                let (line, col) = self.end_position();
                ParseError {
                    line,
                    col,
                    expected: expected.to_string(),
                    found: "end of input".to_string(),
                }
            }
        }
    }

    fn expect_number(&mut self, expected: &str) -> Result<(u32, usize), ParseError> {
        match self.next() {
            Some(Token {
                kind: TokenKind::Number(n),
                line,
                ..
            }) => Ok((n, line)),
            other => Err(self.error(expected, other.as_ref())),
        }
    }

    fn expect_word(&mut self, expected: &str) -> Result<(String, usize, usize), ParseError> {
        match self.next() {
            Some(Token {
                kind: TokenKind::Word(w),
                line,
                col,
            }) => Ok((w, line, col)),
            other => Err(self.error(expected, other.as_ref())),
        }
    }

    fn parse_score(mut self) -> Result<Score, DecodeError> {
        // defaults apply for any directive the input omits
        let mut score = Score::new();
        score.measures.clear();

        // leading directives
        while let Some(Token {
            kind: TokenKind::Directive(_),
            ..
        }) = self.peek()
        {
            let token = self.next().expect("peeked directive");
            let name = match &token.kind {
                TokenKind::Directive(name) => name.clone(),
                _ => unreachable!(),
            };
            match name.as_str() {
                "version" => match self.next() {
                    Some(Token {
                        kind: TokenKind::StrLit(_),
                        ..
                    }) => {}
                    other => {
                        return Err(self
                            .error("version string", other.as_ref())
                            .into())
                    }
                },
                "clef" => {
                    let (word, line, col) = self.expect_word("clef name")?;
                    score.clef = ClefType::from_lilypond_name(&word).ok_or(ParseError {
                        line,
                        col,
                        expected: "clef name (treble, alto, bass)".to_string(),
                        found: format!("'{}'", word),
                    })?;
                }
                "time" => {
                    let (beats, line) = self.expect_number("time signature beats")?;
                    match self.next() {
                        Some(Token {
                            kind: TokenKind::Slash,
                            ..
                        }) => {}
                        other => {
                            return Err(self
                                .error("'/' in time signature", other.as_ref())
                                .into())
                        }
                    }
                    let (beat_type, _) = self.expect_number("time signature beat type")?;
                    score.time = TimeSignature::new(
                        beats.min(u8::MAX as u32) as u8,
                        beat_type.min(u8::MAX as u32) as u8,
                    )
                    .map_err(|_| ParseError {
                        line,
                        col: 1,
                        expected: "a time signature with a power-of-two beat type".to_string(),
                        found: format!("{}/{}", beats, beat_type),
                    })?;
                }
                "key" => {
                    let (tonic, line, col) = self.expect_word("key tonic name")?;
                    let mode = match self.next() {
                        Some(Token {
                            kind: TokenKind::Directive(mode_name),
                            line,
                            ..
                        }) => Mode::from_lilypond_name(&mode_name).ok_or(
                            UnsupportedConstructError {
                                line,
                                construct: format!("\\{}", mode_name),
                            },
                        )?,
                        other => return Err(self.error("key mode directive", other.as_ref()).into()),
                    };
                    score.key =
                        Some(KeySignature::from_tonic_name(&tonic, mode).ok_or(ParseError {
                            line,
                            col,
                            expected: "key tonic on the circle of fifths".to_string(),
                            found: format!("'{}'", tonic),
                        })?);
                }
                other => {
                    return Err(UnsupportedConstructError {
                        line: token.line,
                        construct: format!("\\{}", other),
                    }
                    .into())
                }
            }
        }

        // measures
        let mut current = Measure::new();
        while let Some(token) = self.peek().cloned() {
            match token.kind {
                TokenKind::Bar => {
                    self.next();
                    score.measures.push(std::mem::take(&mut current));
                }
                TokenKind::Word(_) => {
                    let note = self.parse_note()?;
                    current.notes.push(note);
                }
                TokenKind::Directive(name) => {
                    // mid-score directives (time changes etc.) are outside
                    // the subset
                    return Err(UnsupportedConstructError {
                        line: token.line,
                        construct: format!("\\{}", name),
                    }
                    .into());
                }
                _ => {
                    return Err(self
                        .error("a note, rest or '|'", Some(&token))
                        .into())
                }
            }
        }
        if !current.notes.is_empty() {
            score.measures.push(current);
        }

        Ok(score)
    }

    fn parse_note(&mut self) -> Result<Note, DecodeError> {
        let (word, line, col) = self.expect_word("note name or rest")?;

        if word == "r" {
            let duration = self.parse_duration()?;
            return Ok(Note::Rest { duration });
        }

        let (step, alteration) = parse_dutch_name(&word).ok_or(ParseError {
            line,
            col,
            expected: "a Dutch note name or 'r'".to_string(),
            found: format!("'{}'", word),
        })?;

        // octave marks: either ticks or commas, never both
        let mut ticks = 0i8;
        let mut commas = 0i8;
        while let Some(token) = self.peek() {
            match token.kind {
                TokenKind::Tick => {
                    ticks += 1;
                    self.next();
                }
                TokenKind::Comma => {
                    commas += 1;
                    self.next();
                }
                _ => break,
            }
        }
        if ticks > 0 && commas > 0 {
            return Err(ParseError {
                line,
                col,
                expected: "octave marks in one direction only".to_string(),
                found: format!("'{}' with mixed marks", word),
            }
            .into());
        }
        let octave = 3 + ticks - commas;

        let pitch = Pitch::new(step, alteration, octave).map_err(|_| ParseError {
            line,
            col,
            expected: format!(
                "an octave between {} and {}",
                Pitch::MIN_OCTAVE,
                Pitch::MAX_OCTAVE
            ),
            found: format!("octave {}", octave),
        })?;

        let duration = self.parse_duration()?;
        Ok(Note::Pitched { pitch, duration })
    }

    fn parse_duration(&mut self) -> Result<Duration, DecodeError> {
        let (denominator, line) = self.expect_number("a duration (1, 2, 4, ..., 64)")?;
        if denominator == 0 || !denominator.is_power_of_two() || denominator > 64 {
            return Err(ParseError {
                line,
                col: 1,
                expected: "a power-of-two duration between 1 and 64".to_string(),
                found: format!("number {}", denominator),
            }
            .into());
        }
        let log = denominator.trailing_zeros() as u8;

        let mut dots = 0u8;
        while let Some(Token {
            kind: TokenKind::Dot,
            line,
            col,
        }) = self.peek().cloned()
        {
            if dots == Duration::MAX_DOTS {
                return Err(ParseError {
                    line,
                    col,
                    expected: format!("at most {} augmentation dots", Duration::MAX_DOTS),
                    found: "'.'".to_string(),
                }
                .into());
            }
            dots += 1;
            self.next();
        }

        let factor = if let Some(Token {
            kind: TokenKind::Star,
            ..
        }) = self.peek()
        {
            self.next();
            let (numer, line) = self.expect_number("a factor numerator")?;
            match self.next() {
                Some(Token {
                    kind: TokenKind::Slash,
                    ..
                }) => {}
                other => return Err(self.error("'/' in duration factor", other.as_ref()).into()),
            }
            let (denom, _) = self.expect_number("a factor denominator")?;
            if numer == 0 || denom == 0 {
                return Err(ParseError {
                    line,
                    col: 1,
                    expected: "a non-zero duration factor".to_string(),
                    found: format!("{}/{}", numer, denom),
                }
                .into());
            }
            Some(Rational::new(numer as i32, denom as i32))
        } else {
            None
        };

        Ok(Duration::new(log, dots, factor))
    }
}

/// Parse a Dutch note name into (step, alteration)
///
/// Accepts full spellings (ees, aes, eeses) and the customary shorthands
/// (es, as, eses, ases).
fn parse_dutch_name(word: &str) -> Option<(u8, i8)> {
    let mut chars = word.chars();
    let letter = chars.next()?;
    let step = match letter {
        'c' => 0,
        'd' => 1,
        'e' => 2,
        'f' => 3,
        'g' => 4,
        'a' => 5,
        'b' => 6,
        _ => return None,
    };
    let alteration = match chars.as_str() {
        "" => 0,
        "is" => 1,
        "isis" => 2,
        "es" => -1,
        "eses" => -2,
        // shorthands for a and e
        "s" if matches!(letter, 'a' | 'e') => -1,
        "ses" if matches!(letter, 'a' | 'e') => -2,
        _ => return None,
    };
    Some((step, alteration))
}
