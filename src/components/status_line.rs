//! Status line region
//!
//! A one-line region with left/center/right text slots. When focused it
//! turns into a command editor: the input buffer supports full cursor
//! movement and is parsed into commands on enter. It never takes part in
//! the region stack; the interface draws it beneath the active region and
//! routes keys here while it holds focus.

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::commands::{Command, RegionId, StatusSlot};

use super::{center_offset, KeyOutcome, Region};

/// A region for displaying program state and entering commands
pub struct StatusLine {
    /// left, center, right text
    slots: [String; 3],
    input: String,
    cursor: usize,
    focused: bool,
    changed: bool,
}

impl StatusLine {
    pub fn new() -> Self {
        Self {
            slots: [String::new(), String::new(), String::new()],
            input: String::new(),
            cursor: 0,
            focused: false,
            changed: true,
        }
    }

    /// True while the status line owns the keyboard
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Current text of one slot
    pub fn slot(&self, slot: StatusSlot) -> &str {
        match slot {
            StatusSlot::Left => &self.slots[0],
            StatusSlot::Center => &self.slots[1],
            StatusSlot::Right => &self.slots[2],
        }
    }

    /// Take keyboard focus and seed the input buffer (without the colon)
    pub fn begin_input(&mut self, seed: &str) {
        self.focused = true;
        self.input = seed.to_string();
        self.cursor = self.input.chars().count();
        self.changed = true;
    }

    fn end_input(&mut self) {
        self.focused = false;
        self.input.clear();
        self.cursor = 0;
        self.changed = true;
    }

    /// Set text in one slot
    fn set_slot(&mut self, slot: StatusSlot, text: String) {
        let index = match slot {
            StatusSlot::Left => 0,
            StatusSlot::Center => 1,
            StatusSlot::Right => 2,
        };
        if self.slots[index] != text {
            self.slots[index] = text;
            self.changed = true;
        }
    }

    fn clear_slots(&mut self) {
        self.slots = [String::new(), String::new(), String::new()];
        self.changed = true;
    }

    /// Byte index of the character the cursor sits on
    fn byte_cursor(&self) -> usize {
        self.input
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }

    /// Parse the entered command into the commands it stands for
    fn parse_command(text: &str) -> Vec<Command> {
        let mut words = text.split_whitespace();
        let Some(head) = words.next() else {
            return Vec::new();
        };
        let (name, forced) = match head.strip_suffix('!') {
            Some(name) => (name, true),
            None => (head, false),
        };
        let rest: Vec<&str> = words.collect();

        match name {
            "q" | "quit" => vec![Command::Quit { forced }],
            "w" | "write" => vec![Command::Save {
                path: rest.first().map(PathBuf::from),
                forced,
            }],
            "o" | "open" => vec![Command::Open {
                path: rest.first().map(PathBuf::from),
                forced,
            }],
            "new" => vec![
                Command::NewScore,
                Command::PushRegion(RegionId::Editor),
            ],
            "help" => vec![Command::PushRegion(RegionId::Help)],
            "info" => vec![Command::PushRegion(RegionId::Info)],
            "set" => match rest.as_slice() {
                // :set option value, or :set option=value
                [pair] if pair.contains('=') => {
                    let (option, value) = pair.split_once('=').expect("checked for '='");
                    vec![Command::SetOption {
                        option: option.to_string(),
                        value: value.to_string(),
                    }]
                }
                [option, value @ ..] if !value.is_empty() => vec![Command::SetOption {
                    option: option.to_string(),
                    value: value.join(" "),
                }],
                _ => vec![Command::SetStatusText {
                    slot: StatusSlot::Center,
                    text: "Usage: :set <option> <value>".to_string(),
                }],
            },
            other => vec![Command::SetStatusText {
                slot: StatusSlot::Center,
                text: format!("Unknown command: {}", other),
            }],
        }
    }
}

impl Default for StatusLine {
    fn default() -> Self {
        Self::new()
    }
}

impl Region for StatusLine {
    fn handle_key(&mut self, key: KeyEvent, _area: Rect) -> KeyOutcome {
        if !self.focused {
            return KeyOutcome::Ignored;
        }
        self.changed = true;

        match key.code {
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let at = self.byte_cursor();
                    self.input.remove(at);
                } else if self.input.is_empty() {
                    // backspacing over the colon gives focus back
                    self.end_input();
                }
            }
            KeyCode::Delete => {
                let at = self.byte_cursor();
                if at < self.input.len() {
                    self.input.remove(at);
                }
            }
            KeyCode::Esc => self.end_input(),
            KeyCode::Left if key.modifiers.contains(KeyModifiers::CONTROL) => {
                // jump to the start of the previous word
                let chars: Vec<char> = self.input.chars().collect();
                let mut i = self.cursor;
                while i > 0 && chars[i - 1] == ' ' {
                    i -= 1;
                }
                while i > 0 && chars[i - 1] != ' ' {
                    i -= 1;
                }
                self.cursor = i;
            }
            KeyCode::Right if key.modifiers.contains(KeyModifiers::CONTROL) => {
                let chars: Vec<char> = self.input.chars().collect();
                let mut i = self.cursor;
                while i < chars.len() && chars[i] != ' ' {
                    i += 1;
                }
                while i < chars.len() && chars[i] == ' ' {
                    i += 1;
                }
                self.cursor = i;
            }
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.input.chars().count())
            }
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.input.chars().count(),
            KeyCode::Enter => {
                let text = std::mem::take(&mut self.input);
                self.end_input();
                return KeyOutcome::Consumed(Self::parse_command(&text));
            }
            KeyCode::Char(c)
                if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT =>
            {
                let at = self.byte_cursor();
                self.input.insert(at, c);
                self.cursor += 1;
            }
            _ => return KeyOutcome::Ignored,
        }
        KeyOutcome::Consumed(Vec::new())
    }

    fn handle_command(&mut self, command: &Command) -> Vec<Command> {
        match command {
            Command::SetStatusText { slot, text } => self.set_slot(*slot, text.clone()),
            Command::ClearStatusLine => self.clear_slots(),
            Command::ScoreChanged => self.changed = true,
            _ => {}
        }
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let line = if self.focused {
            Line::from(Span::raw(format!(":{}", self.input)))
        } else {
            let width = area.width as usize;
            let mut row: Vec<char> = vec![' '; width];
            let mut put = |offset: usize, text: &str| {
                for (i, c) in text.chars().enumerate() {
                    if offset + i < width {
                        row[offset + i] = c;
                    }
                }
            };
            put(0, &self.slots[0]);
            put(
                center_offset(area.width, self.slots[1].chars().count()) as usize,
                &self.slots[1],
            );
            put(
                width.saturating_sub(self.slots[2].chars().count() + 1),
                &self.slots[2],
            );
            Line::from(Span::raw(row.into_iter().collect::<String>()))
        };
        frame.render_widget(Paragraph::new(line), area);

        if self.focused {
            // hardware cursor sits after the colon, on the edit position
            frame.set_cursor_position(ratatui::layout::Position {
                x: area.x + 1 + self.cursor as u16,
                y: area.y,
            });
        }
    }

    fn changed(&self) -> bool {
        self.changed
    }

    fn set_changed(&mut self, changed: bool) {
        self.changed = changed;
    }
}
