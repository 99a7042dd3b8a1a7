//! Splash screen region
//!
//! Shows the program logo until the user presses enter.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::commands::{Command, RegionId};

use super::{center_offset, KeyOutcome, Region};

const LOGO: &str = r"
        /\
       / /
      / /
     / /___      _ _ _
    / / __ \    | (_) |
   / / /  \ \ __| |_| |_ ___  _ __
  | | |   | |/ _` | | __/ _ \| '__|
   \ \ \__/ / (_| | | || (_) | |
    \ \____/ \__,_|_|\__\___/|_|
     \ \
  ____\ \
  \  __  |      press enter
   \ \_/ /
    \___/
";

/// A very simple region for displaying the logo
pub struct LogoRegion {
    changed: bool,
}

impl LogoRegion {
    pub fn new() -> Self {
        Self { changed: true }
    }
}

impl Default for LogoRegion {
    fn default() -> Self {
        Self::new()
    }
}

impl Region for LogoRegion {
    fn handle_key(&mut self, key: KeyEvent, _area: Rect) -> KeyOutcome {
        match key.code {
            KeyCode::Enter => {
                KeyOutcome::Consumed(vec![Command::ReplaceRegion(RegionId::Menu)])
            }
            _ => KeyOutcome::Ignored,
        }
    }

    fn handle_command(&mut self, _command: &Command) -> Vec<Command> {
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let art: Vec<&str> = LOGO.lines().skip(1).collect();
        let width = art.iter().map(|l| l.len()).max().unwrap_or(0);
        let y_off = center_offset(area.height, art.len());
        let x_off = center_offset(area.width, width);

        let mut lines = Vec::new();
        for _ in 0..y_off {
            lines.push(Line::default());
        }
        for row in &art {
            lines.push(Line::from(vec![
                Span::raw(" ".repeat(x_off as usize)),
                Span::styled(*row, Style::default().fg(Color::Yellow)),
            ]));
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
