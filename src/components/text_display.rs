//! Scrollable text display region
//!
//! Renders the help and info pages. Supports a small inline markup:
//! `#`-prefixed headings are colored by level, and `*bold*`, `/italic/`
//! and `_underline_` toggle styling; a backslash escapes the next
//! character. Lines wrap to the viewport width the dispatcher passes in.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::commands::Command;

use super::{KeyOutcome, Region};

/// Left/right and top/bottom margins of the text area
const SIDE_OFFSETS: (u16, u16) = (3, 1);

/// A region for displaying scrollable text
pub struct TextDisplay {
    text: Vec<String>,
    line_offset: usize,
    changed: bool,
}

impl TextDisplay {
    pub fn new<S: Into<String>>(lines: Vec<S>) -> Self {
        Self {
            text: lines.into_iter().map(Into::into).collect(),
            line_offset: 0,
            changed: true,
        }
    }

    /// Width and height of the area text can occupy
    fn content_space(area: Rect) -> (usize, usize) {
        (
            area.width.saturating_sub(2 * SIDE_OFFSETS.0) as usize,
            area.height.saturating_sub(2 * SIDE_OFFSETS.1) as usize,
        )
    }

    fn scroll_by(&mut self, delta: isize) {
        let offset = self.line_offset as isize + delta;
        self.line_offset = offset.max(0) as usize;
        self.changed = true;
    }

    /// Wrap a line to the given width, counting only visible characters
    /// (markup toggles and escapes take no space)
    fn wrap_line(line: &str, width: usize) -> Vec<(String, usize)> {
        let heading = line.chars().take_while(|&c| c == '#').count();
        if line.is_empty() || width == 0 {
            return vec![(String::new(), 0)];
        }

        let mut wrapped = Vec::new();
        let chars: Vec<char> = line.chars().collect();
        let mut start = 0;
        while start < chars.len() {
            let mut i = start;
            let mut visible = 0;
            let mut last_space = None;
            while i < chars.len() && visible < width {
                match chars[i] {
                    '*' | '/' | '_' => {}
                    '\\' => {
                        i += 1;
                        visible += 1;
                    }
                    c => {
                        if c == ' ' {
                            last_space = Some(i);
                        }
                        visible += 1;
                    }
                }
                i += 1;
            }
            // wrap on the last space when the line overflows mid-word
            if i < chars.len() && visible == width {
                if let Some(space) = last_space {
                    if space > start {
                        i = space;
                    }
                }
            }
            let chunk: String = chars[start..i].iter().collect();
            wrapped.push((chunk.trim_start().to_string(), heading));
            start = i;
            while start < chars.len() && chars[start] == ' ' {
                start += 1;
            }
        }
        wrapped
    }

    /// Render one wrapped line, interpreting the inline markup
    fn styled_line(text: &str, heading: usize) -> Line<'static> {
        let base = match heading {
            0 => Style::default(),
            1 => Style::default().fg(Color::Yellow),
            _ => Style::default().fg(Color::Cyan),
        };

        fn toggled(base: Style, bold: bool, italic: bool, underline: bool) -> Style {
            let mut style = base;
            if bold {
                style = style.add_modifier(Modifier::BOLD);
            }
            if italic {
                style = style.add_modifier(Modifier::ITALIC);
            }
            if underline {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
            style
        }

        let mut spans: Vec<Span<'static>> = Vec::new();
        let mut bold = false;
        let mut italic = false;
        let mut underline = false;
        let mut current = String::new();
        let mut chars = text.chars();
        while let Some(c) = chars.next() {
            match c {
                '*' | '/' | '_' => {
                    if !current.is_empty() {
                        let style = toggled(base, bold, italic, underline);
                        spans.push(Span::styled(std::mem::take(&mut current), style));
                    }
                    match c {
                        '*' => bold = !bold,
                        '/' => italic = !italic,
                        _ => underline = !underline,
                    }
                }
                '\\' => {
                    if let Some(next) = chars.next() {
                        current.push(next);
                    }
                }
                c => current.push(c),
            }
        }
        if !current.is_empty() {
            let style = toggled(base, bold, italic, underline);
            spans.push(Span::styled(current, style));
        }
        Line::from(spans)
    }
}

impl Region for TextDisplay {
    fn handle_key(&mut self, key: KeyEvent, area: Rect) -> KeyOutcome {
        let height = Self::content_space(area).1 as isize;
        match key.code {
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.scroll_by(height / 3)
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.scroll_by(-height / 3)
            }
            KeyCode::Char('j') | KeyCode::Down | KeyCode::Enter => self.scroll_by(1),
            KeyCode::Char('k') | KeyCode::Up => self.scroll_by(-1),
            KeyCode::Char('q') | KeyCode::Esc => {
                return KeyOutcome::Consumed(vec![Command::PopRegion]);
            }
            _ => return KeyOutcome::Ignored,
        }
        KeyOutcome::Consumed(Vec::new())
    }

    fn handle_command(&mut self, _command: &Command) -> Vec<Command> {
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let (width, height) = Self::content_space(area);

        let mut wrapped = Vec::new();
        for line in &self.text {
            wrapped.extend(Self::wrap_line(line, width));
        }

        // restrict the offset to valid values
        self.line_offset = self.line_offset.min(wrapped.len().saturating_sub(height));

        let mut lines = vec![Line::default(); SIDE_OFFSETS.1 as usize];
        for (text, heading) in wrapped.iter().skip(self.line_offset).take(height) {
            let mut line = Self::styled_line(text, *heading);
            line.spans.insert(
                0,
                Span::raw(" ".repeat(SIDE_OFFSETS.0 as usize)),
            );
            lines.push(line);
        }
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn changed(&self) -> bool {
        self.changed
    }

    fn set_changed(&mut self, changed: bool) {
        self.changed = changed;
    }
}

/// The built-in help page
pub fn help_text() -> Vec<&'static str> {
    vec![
        "# Help",
        "",
        "## General",
        "_:help_ shows this page, _:info_ the about page, _:q_ or _:quit_",
        "leaves the current screen; _:q!_ discards unsaved changes.",
        "",
        "## Files",
        "_:w [path]_ writes the score as LilyPond; _:open path_ imports one.",
        "Add _!_ to overwrite an existing file or discard unsaved changes.",
        "",
        "## Score editing",
        "Move with _h_ and _l_, between measures with _b_ and _w_, and to the",
        "ends with _gg_ and _G_. _x_ deletes the note under the cursor.",
        "_i_ inserts a note: choose the duration (_1 2 4 8_, _j_/_k_ to halve",
        "or double, _._ for dots, _t_ for tuplets), press enter, then choose",
        "the pitch (_a_-_g_, _'_ and _,_ for octaves, _+_ and _-_ for",
        "accidentals, _r_ for a rest). Enter or escape commits.",
        "_o_ opens a new measure, _s_ splits the measure at the cursor and",
        "_J_ joins the next measure into the current one.",
        "",
        "## Settings",
        "_:set clef treble|alto|bass_, _:set time 3/4_,",
        "_:set key ees major_ or _:set key none_.",
    ]
}

/// The built-in info page
pub fn info_text() -> Vec<&'static str> {
    vec![
        "# Info",
        "",
        "A keyboard-driven editor for musical note sheets. Scores are",
        "written and read as a LilyPond subset, so anything you save here",
        "can be engraved with the real thing.",
        "",
        "## Keys",
        "The editor borrows its movement and command language from vi:",
        "single-key motions, modal note entry and an ex-style command line.",
        "See *:help* for the full list.",
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_counts_visible_chars_only() {
        let wrapped = TextDisplay::wrap_line("*bold* and /italic/ words here", 12);
        // markup toggles take no width, so "bold and" fits in one chunk
        assert!(wrapped.len() >= 2);
        let total: String = wrapped.iter().map(|(t, _)| t.clone()).collect();
        assert!(total.contains("*bold*"));
    }

    #[test]
    fn test_heading_level() {
        let wrapped = TextDisplay::wrap_line("## Section", 40);
        assert_eq!(wrapped[0].1, 2);
    }

    #[test]
    fn test_q_pops_region() {
        let mut display = TextDisplay::new(help_text());
        let key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(
            display.handle_key(key, Rect::new(0, 0, 80, 24)),
            KeyOutcome::Consumed(vec![Command::PopRegion])
        );
    }

    #[test]
    fn test_scroll_clamps_at_top() {
        let mut display = TextDisplay::new(vec!["a", "b", "c"]);
        let key = KeyEvent::new(KeyCode::Char('k'), KeyModifiers::NONE);
        display.handle_key(key, Rect::new(0, 0, 80, 24));
        assert_eq!(display.line_offset, 0);
    }
}
