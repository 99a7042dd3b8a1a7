//! Tokenizer for the LilyPond subset
//!
//! Splits input into positioned tokens; the parser never touches raw text.
//! `%` line comments are skipped. Brace and angle-bracket blocks are
//! recognizable LilyPond but outside the subset, so the lexer rejects them
//! as unsupported constructs rather than parse errors.

use super::errors::{DecodeError, ParseError, UnsupportedConstructError};

/// One lexical token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// A backslash command, e.g. \clef (name stored without the backslash)
    Directive(String),
    /// A bare word: note names, rests, clef names
    Word(String),
    /// An unsigned integer
    Number(u32),
    /// A double-quoted string literal (contents without quotes)
    StrLit(String),
    /// ' (octave up mark)
    Tick,
    /// , (octave down mark)
    Comma,
    /// . (augmentation dot)
    Dot,
    /// * (duration factor)
    Star,
    /// / (fraction separator)
    Slash,
    /// | (measure separator)
    Bar,
}

impl TokenKind {
    /// Human-readable description for error messages
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Directive(name) => format!("\\{}", name),
            TokenKind::Word(word) => format!("'{}'", word),
            TokenKind::Number(n) => format!("number {}", n),
            TokenKind::StrLit(s) => format!("\"{}\"", s),
            TokenKind::Tick => "\"'\"".to_string(),
            TokenKind::Comma => "','".to_string(),
            TokenKind::Dot => "'.'".to_string(),
            TokenKind::Star => "'*'".to_string(),
            TokenKind::Slash => "'/'".to_string(),
            TokenKind::Bar => "'|'".to_string(),
        }
    }
}

/// A token together with its 1-based source position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub col: usize,
}

/// Tokenize the whole input
pub fn tokenize(input: &str) -> Result<Vec<Token>, DecodeError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();
    let mut line = 1usize;
    let mut col = 1usize;

    while let Some(&c) = chars.peek() {
        let (tok_line, tok_col) = (line, col);
        match c {
            '\n' => {
                chars.next();
                line += 1;
                col = 1;
            }
            c if c.is_whitespace() => {
                chars.next();
                col += 1;
            }
            '%' => {
                // line comment
                while let Some(&c) = chars.peek() {
                    if c == '\n' {
                        break;
                    }
                    chars.next();
                    col += 1;
                }
            }
            '\\' => {
                chars.next();
                col += 1;
                let mut name = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_alphabetic() {
                        name.push(c);
                        chars.next();
                        col += 1;
                    } else {
                        break;
                    }
                }
                if name.is_empty() {
                    return Err(ParseError {
                        line: tok_line,
                        col: tok_col,
                        expected: "directive name after '\\'".to_string(),
                        found: "'\\'".to_string(),
                    }
                    .into());
                }
                tokens.push(Token {
                    kind: TokenKind::Directive(name),
                    line: tok_line,
                    col: tok_col,
                });
            }
            '"' => {
                chars.next();
                col += 1;
                let mut text = String::new();
                let mut closed = false;
                while let Some(c) = chars.next() {
                    col += 1;
                    match c {
                        '"' => {
                            closed = true;
                            break;
                        }
                        '\n' => break,
                        c => text.push(c),
                    }
                }
                if !closed {
                    return Err(ParseError {
                        line: tok_line,
                        col: tok_col,
                        expected: "closing '\"'".to_string(),
                        found: "end of line".to_string(),
                    }
                    .into());
                }
                tokens.push(Token {
                    kind: TokenKind::StrLit(text),
                    line: tok_line,
                    col: tok_col,
                });
            }
            c if c.is_ascii_alphabetic() => {
                let mut word = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_alphabetic() {
                        word.push(c);
                        chars.next();
                        col += 1;
                    } else {
                        break;
                    }
                }
                tokens.push(Token {
                    kind: TokenKind::Word(word),
                    line: tok_line,
                    col: tok_col,
                });
            }
            c if c.is_ascii_digit() => {
                let mut value: u32 = 0;
                while let Some(&c) = chars.peek() {
                    if let Some(digit) = c.to_digit(10) {
                        value = value.checked_mul(10).and_then(|v| v.checked_add(digit)).ok_or(
                            ParseError {
                                line: tok_line,
                                col: tok_col,
                                expected: "a smaller number".to_string(),
                                found: "numeric overflow".to_string(),
                            },
                        )?;
                        chars.next();
                        col += 1;
                    } else {
                        break;
                    }
                }
                tokens.push(Token {
                    kind: TokenKind::Number(value),
                    line: tok_line,
                    col: tok_col,
                });
            }
            '\'' | ',' | '.' | '*' | '/' | '|' => {
                chars.next();
                col += 1;
                let kind = match c {
                    '\'' => TokenKind::Tick,
                    ',' => TokenKind::Comma,
                    '.' => TokenKind::Dot,
                    '*' => TokenKind::Star,
                    '/' => TokenKind::Slash,
                    _ => TokenKind::Bar,
                };
                tokens.push(Token {
                    kind,
                    line: tok_line,
                    col: tok_col,
                });
            }
            '{' | '}' | '<' | '>' => {
                return Err(UnsupportedConstructError {
                    line: tok_line,
                    construct: format!("'{}' block", c),
                }
                .into());
            }
            c => {
                return Err(ParseError {
                    line: tok_line,
                    col: tok_col,
                    expected: "a note, directive or measure separator".to_string(),
                    found: format!("'{}'", c),
                }
                .into());
            }
        }
    }

    Ok(tokens)
}
