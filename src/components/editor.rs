//! Note sheet editor region
//!
//! The main region of the program. A small modal state machine drives
//! editing: `Navigating` moves the cursor, `EditingDuration` and
//! `EditingPitch` shape the note under the cursor in place. Every keypress
//! that actually mutates the score goes through the score model and emits
//! one `ScoreChanged` command, so dependent regions redraw.

use std::fs;
use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use tracing::{info, warn};
use unicode_width::UnicodeWidthStr;

use crate::commands::{Command, StatusSlot};
use crate::lilypond::{self, ExportSettings};
use crate::models::{
    ClefType, Cursor, Duration, KeySignature, Measure, Mode, Note, Pitch, Rational, Score,
    TimeSignature,
};
use crate::notation;

use super::{KeyOutcome, Region};

/// Total rows of the staff block; five staff lines with two rows of air
/// above and below
const STAFF_ROWS: usize = 9;
/// Row of the middle staff line
const MIDDLE_ROW: usize = 4;
/// First and last row drawn with the staff underline
const STAFF_TOP: usize = 2;
const STAFF_BOTTOM: usize = 6;
/// Columns left of the clef
const LEFT_MARGIN: usize = 3;

/// Editing sub-mode of the editor region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    /// Region unfocused
    Idle,
    /// Cursor movement between notes and measures
    Navigating,
    /// Base length, dots and tuplet of the note under the cursor
    EditingDuration,
    /// Letter, octave and accidental of the note under the cursor
    EditingPitch,
}

/// A region for working with the notes; the main region of the program
pub struct EditorRegion {
    score: Score,
    cursor: Cursor,
    mode: EditorMode,
    /// pending multi-key motion (the g of gg)
    pending_key: Option<char>,
    path: Option<PathBuf>,
    modified: bool,
    /// first measure drawn; adjusted so the cursor stays visible
    scroll: usize,
    /// octave given to the next pitched note
    last_octave: i8,
    settings: ExportSettings,
    changed: bool,
}

impl EditorRegion {
    pub fn new() -> Self {
        Self {
            score: Score::new(),
            cursor: Cursor::start(),
            mode: EditorMode::Idle,
            pending_key: None,
            path: None,
            modified: false,
            scroll: 0,
            last_octave: 4,
            settings: ExportSettings::default(),
            changed: true,
        }
    }

    /// Adopt a score read before the UI started
    pub fn load(&mut self, score: Score, path: Option<PathBuf>) {
        self.score = score;
        ensure_measure(&mut self.score);
        self.cursor = Cursor::start();
        self.path = path;
        self.modified = false;
        self.changed = true;
    }

    pub fn score(&self) -> &Score {
        &self.score
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    fn status_center(text: impl Into<String>) -> Command {
        Command::SetStatusText {
            slot: StatusSlot::Center,
            text: text.into(),
        }
    }

    /// Cursor address shown in the right status slot
    fn position_command(&self) -> Command {
        let text = if self.cursor.at_sentinel(&self.score) {
            format!("{}:-", self.cursor.measure + 1)
        } else {
            format!("{}:{}", self.cursor.measure + 1, self.cursor.index + 1)
        };
        Command::SetStatusText {
            slot: StatusSlot::Right,
            text,
        }
    }

    /// Mode indicator shown in the left status slot
    fn mode_command(&self) -> Command {
        let text = match self.mode {
            EditorMode::EditingDuration => "-- DURATION --",
            EditorMode::EditingPitch => "-- PITCH --",
            _ => "",
        };
        Command::SetStatusText {
            slot: StatusSlot::Left,
            text: text.to_string(),
        }
    }

    fn enter_mode(&mut self, mode: EditorMode) -> Command {
        self.mode = mode;
        self.changed = true;
        self.mode_command()
    }

    /// Apply an edit to the note under the cursor; emits ScoreChanged only
    /// when the note actually changed
    fn mutate_note(&mut self, edit: impl FnOnce(&mut Note, i8) -> Option<i8>) -> Vec<Command> {
        if self.cursor.at_sentinel(&self.score) {
            return Vec::new();
        }
        match self.score.note_mut(self.cursor.measure, self.cursor.index) {
            Ok(note) => {
                let before = *note;
                if let Some(octave) = edit(note, self.last_octave) {
                    self.last_octave = octave;
                }
                if *note != before {
                    self.modified = true;
                    self.changed = true;
                    vec![Command::ScoreChanged]
                } else {
                    Vec::new()
                }
            }
            Err(err) => {
                warn!(%err, "cursor out of sync with score");
                Vec::new()
            }
        }
    }

    fn handle_navigating_key(&mut self, key: KeyEvent) -> KeyOutcome {
        let pending = self.pending_key.take();
        let mut commands = Vec::new();
        match key.code {
            KeyCode::Char('h') | KeyCode::Left => self.cursor.previous(&self.score),
            KeyCode::Char('l') | KeyCode::Right => self.cursor.next(&self.score),
            KeyCode::Char('b') => self.cursor.previous_measure(&self.score),
            KeyCode::Char('w') => self.cursor.next_measure(&self.score),
            KeyCode::Char('G') => self.cursor.last(&self.score),
            KeyCode::Char('g') => {
                if pending == Some('g') {
                    self.cursor.first(&self.score);
                } else {
                    self.pending_key = Some('g');
                    return KeyOutcome::Consumed(Vec::new());
                }
            }
            KeyCode::Char('x') => {
                if self.cursor.at_sentinel(&self.score) {
                    return KeyOutcome::Consumed(vec![Self::status_center("Nothing to delete")]);
                }
                match self.score.remove_note(self.cursor.measure, self.cursor.index) {
                    Ok(_) => {
                        self.cursor.after_removal(&self.score);
                        self.modified = true;
                        commands.push(Command::ScoreChanged);
                    }
                    Err(err) => warn!(%err, "cursor out of sync with score"),
                }
            }
            KeyCode::Char('i') => {
                let index = self.cursor.insert_index(&self.score);
                match self.score.insert_note(
                    self.cursor.measure,
                    index,
                    Note::Rest {
                        duration: Duration::quarter(),
                    },
                ) {
                    Ok(()) => {
                        self.cursor.index = index;
                        self.modified = true;
                        commands.push(Command::ScoreChanged);
                        commands.push(self.enter_mode(EditorMode::EditingDuration));
                    }
                    Err(err) => warn!(%err, "cursor out of sync with score"),
                }
            }
            KeyCode::Char('o') => {
                // insert_measure only fails past the end, and measure + 1
                // is never past the end
                let _ = self.score.insert_measure(self.cursor.measure + 1);
                self.cursor.measure += 1;
                self.cursor.index = 0;
                self.modified = true;
                commands.push(Command::ScoreChanged);
            }
            KeyCode::Char('s') => {
                let at_sentinel = self.cursor.at_sentinel(&self.score);
                match self
                    .score
                    .split_measure(self.cursor.measure, self.cursor.index)
                {
                    Ok(()) => {
                        if !at_sentinel {
                            // the cursor's note now starts the new measure
                            self.cursor.measure += 1;
                            self.cursor.index = 0;
                        }
                        self.modified = true;
                        commands.push(Command::ScoreChanged);
                    }
                    Err(err) => warn!(%err, "cursor out of sync with score"),
                }
            }
            KeyCode::Char('J') => match self.score.merge_measures(self.cursor.measure) {
                Ok(()) => {
                    self.modified = true;
                    commands.push(Command::ScoreChanged);
                }
                Err(_) => {
                    return KeyOutcome::Consumed(vec![Self::status_center(
                        "No following measure to join",
                    )])
                }
            },
            KeyCode::Esc => {}
            _ => return KeyOutcome::Ignored,
        }
        self.changed = true;
        commands.push(self.position_command());
        KeyOutcome::Consumed(commands)
    }

    fn handle_duration_key(&mut self, key: KeyEvent) -> KeyOutcome {
        let mut commands = match key.code {
            KeyCode::Char(c @ ('1' | '2' | '4' | '8')) => {
                let log = match c {
                    '1' => 0,
                    '2' => 1,
                    '4' => 2,
                    _ => 3,
                };
                self.mutate_note(|note, _| {
                    note.duration_mut().log = log;
                    None
                })
            }
            KeyCode::Char('j') => self.mutate_note(|note, _| {
                note.duration_mut().halve();
                None
            }),
            KeyCode::Char('k') => self.mutate_note(|note, _| {
                note.duration_mut().double();
                None
            }),
            KeyCode::Char('.') => self.mutate_note(|note, _| {
                note.duration_mut().cycle_dots();
                None
            }),
            KeyCode::Char('t') => self.mutate_note(|note, _| {
                let duration = note.duration_mut();
                duration.factor = match duration.factor {
                    None => Some(Rational::new(2, 3)),
                    Some(f) if f == Rational::new(2, 3) => Some(Rational::new(4, 5)),
                    Some(_) => None,
                };
                None
            }),
            KeyCode::Enter => vec![self.enter_mode(EditorMode::EditingPitch)],
            KeyCode::Esc => vec![self.enter_mode(EditorMode::Navigating)],
            _ => return KeyOutcome::Ignored,
        };
        commands.push(self.position_command());
        KeyOutcome::Consumed(commands)
    }

    fn handle_pitch_key(&mut self, key: KeyEvent) -> KeyOutcome {
        let commands = match key.code {
            KeyCode::Char(c @ 'a'..='g') => {
                let step = match c {
                    'c' => 0,
                    'd' => 1,
                    'e' => 2,
                    'f' => 3,
                    'g' => 4,
                    'a' => 5,
                    _ => 6,
                };
                self.mutate_note(|note, last_octave| {
                    match note {
                        Note::Pitched { pitch, .. } => pitch.step = step,
                        Note::Rest { duration } => {
                            let duration = *duration;
                            *note = Note::Pitched {
                                // the remembered octave is already clamped
                                pitch: Pitch {
                                    step,
                                    alteration: 0,
                                    octave: last_octave,
                                },
                                duration,
                            };
                        }
                    }
                    None
                })
            }
            KeyCode::Char('\'') => self.mutate_note(|note, _| match note {
                Note::Pitched { pitch, .. } => {
                    pitch.shift_octave(1);
                    Some(pitch.octave)
                }
                Note::Rest { .. } => None,
            }),
            KeyCode::Char(',') => self.mutate_note(|note, _| match note {
                Note::Pitched { pitch, .. } => {
                    pitch.shift_octave(-1);
                    Some(pitch.octave)
                }
                Note::Rest { .. } => None,
            }),
            KeyCode::Char('+') | KeyCode::Char('=') => self.mutate_note(|note, _| {
                if let Note::Pitched { pitch, .. } = note {
                    pitch.shift_alteration(1);
                }
                None
            }),
            KeyCode::Char('-') => self.mutate_note(|note, _| {
                if let Note::Pitched { pitch, .. } = note {
                    pitch.shift_alteration(-1);
                }
                None
            }),
            KeyCode::Char('r') => self.mutate_note(|note, _| {
                if let Note::Pitched { duration, .. } = *note {
                    *note = Note::Rest { duration };
                }
                None
            }),
            KeyCode::Enter | KeyCode::Esc => vec![self.enter_mode(EditorMode::Navigating)],
            _ => return KeyOutcome::Ignored,
        };
        KeyOutcome::Consumed(commands)
    }

    fn handle_new_score(&mut self) -> Vec<Command> {
        self.score = Score::new();
        self.cursor = Cursor::start();
        self.path = None;
        self.modified = false;
        self.scroll = 0;
        self.changed = true;
        vec![Command::ScoreChanged, self.position_command()]
    }

    fn handle_open(&mut self, path: Option<&PathBuf>, forced: bool) -> Vec<Command> {
        let Some(target) = path.cloned().or_else(|| self.path.clone()) else {
            return vec![Self::status_center("No file name")];
        };
        if self.modified && !forced {
            return vec![Self::status_center(
                "No write since last change (add ! to override)",
            )];
        }
        let text = match fs::read_to_string(&target) {
            Ok(text) => text,
            Err(err) => {
                return vec![Self::status_center(format!(
                    "Cannot open {}: {}",
                    target.display(),
                    err
                ))]
            }
        };
        match lilypond::decode(&text) {
            // the previous score stays untouched on a failed import
            Err(err) => vec![Self::status_center(err.to_string())],
            Ok(score) => {
                info!(path = %target.display(), measures = score.measures.len(), "imported score");
                self.score = score;
                ensure_measure(&mut self.score);
                self.cursor = Cursor::start();
                self.scroll = 0;
                self.modified = false;
                self.changed = true;
                let message = format!("Opened {}", target.display());
                self.path = Some(target);
                vec![
                    Command::ScoreChanged,
                    Self::status_center(message),
                    self.position_command(),
                ]
            }
        }
    }

    fn handle_save(&mut self, path: Option<&PathBuf>, forced: bool) -> Vec<Command> {
        let Some(target) = path.cloned().or_else(|| self.path.clone()) else {
            return vec![Self::status_center("No file name")];
        };
        let is_new_target = Some(&target) != self.path.as_ref();
        if is_new_target && target.exists() && !forced {
            return vec![Self::status_center("File exists (add ! to override)")];
        }
        let text = lilypond::encode(&self.score, &self.settings);
        match fs::write(&target, text) {
            Err(err) => vec![Self::status_center(format!(
                "Cannot write {}: {}",
                target.display(),
                err
            ))],
            Ok(()) => {
                info!(path = %target.display(), "exported score");
                self.modified = false;
                let message = format!(
                    "Wrote {} ({} measures)",
                    target.display(),
                    self.score.measures.len()
                );
                self.path = Some(target);
                vec![Self::status_center(message)]
            }
        }
    }

    fn handle_set_option(&mut self, option: &str, value: &str) -> Vec<Command> {
        match option {
            "clef" => match ClefType::from_lilypond_name(value) {
                Some(clef) => self.score.clef = clef,
                None => return vec![Self::status_center(format!("Unknown clef: {}", value))],
            },
            "time" => {
                let parsed = value
                    .split_once('/')
                    .and_then(|(beats, beat_type)| {
                        Some((beats.parse::<u8>().ok()?, beat_type.parse::<u8>().ok()?))
                    })
                    .and_then(|(beats, beat_type)| TimeSignature::new(beats, beat_type).ok());
                match parsed {
                    Some(time) => self.score.time = time,
                    None => {
                        return vec![Self::status_center(format!(
                            "Invalid time signature: {}",
                            value
                        ))]
                    }
                }
            }
            "key" => {
                if value == "none" {
                    self.score.key = None;
                } else {
                    let mut words = value.split_whitespace();
                    let tonic = words.next().unwrap_or_default();
                    let mode = match words.next() {
                        None => Some(Mode::Major),
                        Some(name) => Mode::from_lilypond_name(name),
                    };
                    match mode.and_then(|mode| KeySignature::from_tonic_name(tonic, mode)) {
                        Some(key) => self.score.key = Some(key),
                        None => {
                            return vec![Self::status_center(format!("Unknown key: {}", value))]
                        }
                    }
                }
            }
            other => return vec![Self::status_center(format!("Unknown option: {}", other))],
        }
        self.modified = true;
        self.changed = true;
        vec![Command::ScoreChanged]
    }

    fn handle_quit(&mut self, forced: bool) -> Vec<Command> {
        if self.modified && !forced {
            vec![Self::status_center(
                "No write since last change (:q! overrides)",
            )]
        } else {
            vec![Command::QuitConfirmed]
        }
    }

    /// Printable text of one note, with a placeholder for durations the
    /// symbol set cannot express
    fn note_text(note: &Note) -> String {
        match notation::render(note) {
            Ok(symbols) => symbols.concat(),
            Err(_) => "?".to_string(),
        }
    }

    /// Width one measure takes on screen
    fn measure_width(measure: &Measure) -> usize {
        let notes: usize = measure
            .notes
            .iter()
            .map(|n| Self::note_text(n).width() + 1)
            .sum();
        // sentinel space in an empty measure, plus the closing bar
        notes.max(2) + 2
    }

    /// First visible measure, keeping the cursor on screen
    fn scroll_for(&self, available: usize) -> usize {
        let mut scroll = self.scroll.min(self.cursor.measure);
        loop {
            let used: usize = self
                .score
                .measures
                .iter()
                .skip(scroll)
                .take(self.cursor.measure + 1 - scroll)
                .map(Self::measure_width)
                .sum();
            if used <= available || scroll == self.cursor.measure {
                return scroll;
            }
            scroll += 1;
        }
    }
}

/// A decoded score may be empty; the cursor needs at least one measure
fn ensure_measure(score: &mut Score) {
    if score.measures.is_empty() {
        score.measures.push(Measure::new());
    }
}

impl Default for EditorRegion {
    fn default() -> Self {
        Self::new()
    }
}

/// One drawn column of the staff block: per-row texts plus a fixed width
struct StaffColumn {
    texts: Vec<(usize, String, Style)>,
    width: usize,
}

impl StaffColumn {
    fn text(row: usize, text: String, style: Style) -> Self {
        let width = text.width();
        Self {
            texts: vec![(row, text, style)],
            width,
        }
    }

    fn spacer(width: usize) -> Self {
        Self {
            texts: Vec::new(),
            width,
        }
    }

    /// A barline across the staff rows
    fn bar() -> Self {
        Self {
            texts: (STAFF_TOP..=STAFF_BOTTOM)
                .map(|row| (row, "|".to_string(), Style::default()))
                .collect(),
            width: 1,
        }
    }
}

impl Region for EditorRegion {
    fn handle_key(&mut self, key: KeyEvent, _area: Rect) -> KeyOutcome {
        match self.mode {
            EditorMode::Idle => KeyOutcome::Ignored,
            EditorMode::Navigating => self.handle_navigating_key(key),
            EditorMode::EditingDuration => self.handle_duration_key(key),
            EditorMode::EditingPitch => self.handle_pitch_key(key),
        }
    }

    fn handle_command(&mut self, command: &Command) -> Vec<Command> {
        match command {
            Command::ScoreChanged => {
                self.changed = true;
                Vec::new()
            }
            Command::NewScore => self.handle_new_score(),
            Command::Open { path, forced } => self.handle_open(path.as_ref(), *forced),
            Command::Save { path, forced } => self.handle_save(path.as_ref(), *forced),
            Command::SetOption { option, value } => self.handle_set_option(option, value),
            Command::Quit { forced } => self.handle_quit(*forced),
            _ => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let underline = Style::default().add_modifier(Modifier::UNDERLINED);
        let plain = Style::default();

        let mut columns = vec![StaffColumn::spacer(LEFT_MARGIN)];
        columns.push(StaffColumn::text(
            MIDDLE_ROW,
            notation::clef_glyph(self.score.clef).to_string(),
            plain,
        ));
        columns.push(StaffColumn::spacer(1));

        // time signature, stacked when it is not common time
        let time_glyphs = notation::time_signature_glyphs(&self.score.time);
        let time_width = time_glyphs.iter().map(|g| g.width()).max().unwrap_or(1);
        let stacked = time_glyphs.len() > 1;
        let time_rows: Vec<(usize, String, Style)> = time_glyphs
            .into_iter()
            .enumerate()
            .map(|(i, g)| {
                let row = if stacked {
                    MIDDLE_ROW - 1 + i * 2
                } else {
                    MIDDLE_ROW
                };
                (row, g, plain)
            })
            .collect();
        columns.push(StaffColumn {
            texts: time_rows,
            width: time_width,
        });
        columns.push(StaffColumn::spacer(1));
        columns.push(StaffColumn::bar());
        columns.push(StaffColumn::spacer(1));

        let fixed_width: usize = columns.iter().map(|c| c.width).sum();
        let available = (area.width as usize).saturating_sub(fixed_width + LEFT_MARGIN);
        self.scroll = self.scroll_for(available);

        let mut used = 0;
        for (m, measure) in self.score.measures.iter().enumerate().skip(self.scroll) {
            if used + Self::measure_width(measure) > available {
                break;
            }
            used += Self::measure_width(measure);

            if measure.is_empty() {
                // the sentinel position of an empty measure
                let style = if self.cursor.measure == m {
                    plain.add_modifier(Modifier::REVERSED)
                } else {
                    plain
                };
                columns.push(StaffColumn::text(MIDDLE_ROW, " ".to_string(), style));
                columns.push(StaffColumn::spacer(1));
            }
            for (i, note) in measure.notes.iter().enumerate() {
                let text = Self::note_text(note);
                let mut row = MIDDLE_ROW;
                let mut half_step = false;
                if let Some(pitch) = note.pitch() {
                    let offset = notation::staff_offset(&pitch, self.score.clef);
                    let line_offset = offset.div_euclid(2);
                    half_step = offset.rem_euclid(2) == 1;
                    row = (MIDDLE_ROW as i32 - line_offset)
                        .clamp(0, STAFF_ROWS as i32 - 1) as usize;
                }
                let text = if half_step { format!("{}*", text) } else { text };
                let style = if self.cursor.measure == m && self.cursor.index == i {
                    plain.add_modifier(Modifier::REVERSED)
                } else {
                    plain
                };
                columns.push(StaffColumn::text(row, text, style));
                columns.push(StaffColumn::spacer(1));
            }
            columns.push(StaffColumn::bar());
            columns.push(StaffColumn::spacer(1));
        }

        // assemble the rows; staff rows keep their underline through filler
        let y_off = super::center_offset(area.height, STAFF_ROWS);
        let mut lines = vec![Line::default(); y_off as usize];
        for row in 0..STAFF_ROWS {
            let row_style = if (STAFF_TOP..=STAFF_BOTTOM).contains(&row) {
                underline
            } else {
                plain
            };
            let mut spans = Vec::new();
            for column in &columns {
                match column.texts.iter().find(|(r, _, _)| *r == row) {
                    Some((_, text, style)) => {
                        let pad = column.width.saturating_sub(text.width());
                        spans.push(Span::styled(
                            text.clone(),
                            style.patch(row_style),
                        ));
                        if pad > 0 {
                            spans.push(Span::styled(" ".repeat(pad), row_style));
                        }
                    }
                    None => spans.push(Span::styled(" ".repeat(column.width), row_style)),
                }
            }
            lines.push(Line::from(spans));
        }
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn changed(&self) -> bool {
        self.changed
    }

    fn set_changed(&mut self, changed: bool) {
        self.changed = changed;
    }

    fn on_focus(&mut self) {
        self.mode = EditorMode::Navigating;
        self.changed = true;
    }

    fn on_blur(&mut self) {
        self.mode = EditorMode::Idle;
    }
}
