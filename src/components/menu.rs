//! Menu region
//!
//! A vertical menu with wrap-around selection. Spacer entries are `None`
//! and are skipped when moving. Selecting an item publishes its tooltip to
//! the status line; activating it emits the item's commands.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::commands::{Command, RegionId, StatusSlot};

use super::{center_offset, KeyOutcome, Region};

const TITLE: [&str; 5] = [
    " __  __                  ",
    "|  \\/  | ___ _ __  _   _ ",
    "| |\\/| |/ _ \\ '_ \\| | | |",
    "| |  | |  __/ | | | |_| |",
    "|_|  |_|\\___|_| |_|\\__,_|",
];

/// An item of a menu
#[derive(Debug, Clone)]
pub struct MenuItem {
    pub label: &'static str,
    pub actions: Vec<Command>,
    pub tooltip: &'static str,
}

/// A region for working with a menu
pub struct MenuRegion {
    items: Vec<Option<MenuItem>>,
    index: usize,
    changed: bool,
}

impl MenuRegion {
    pub fn new(items: Vec<Option<MenuItem>>) -> Self {
        debug_assert!(items.iter().any(|i| i.is_some()));
        let mut menu = Self {
            items,
            index: 0,
            changed: true,
        };
        // start on the first real item
        if menu.items[0].is_none() {
            menu.move_index(1);
        }
        menu
    }

    /// The main menu of the program
    pub fn main_menu() -> Self {
        Self::new(vec![
            Some(MenuItem {
                label: "CREATE",
                actions: vec![Command::NewScore, Command::PushRegion(RegionId::Editor)],
                tooltip: "Creates a new score.",
            }),
            Some(MenuItem {
                label: "IMPORT",
                actions: vec![Command::FocusStatusLine {
                    seed: "open ".to_string(),
                }],
                tooltip: "Imports a score from a file.",
            }),
            None,
            Some(MenuItem {
                label: "HELP",
                actions: vec![Command::PushRegion(RegionId::Help)],
                tooltip: "Displays program documentation.",
            }),
            Some(MenuItem {
                label: "INFO",
                actions: vec![Command::PushRegion(RegionId::Info)],
                tooltip: "Shows information about the program.",
            }),
            None,
            Some(MenuItem {
                label: "QUIT",
                actions: vec![Command::Quit { forced: false }],
                tooltip: "Terminates the program.",
            }),
        ])
    }

    /// Move the selection by delta positions, skipping spacers
    fn move_index(&mut self, delta: isize) {
        let len = self.items.len() as isize;
        let mut index = (self.index as isize + delta).rem_euclid(len);
        while self.items[index as usize].is_none() {
            index = (index + delta.signum()).rem_euclid(len);
        }
        self.index = index as usize;
        self.changed = true;
    }

    fn selected(&self) -> &MenuItem {
        self.items[self.index]
            .as_ref()
            .expect("selection always sits on a real item")
    }

    fn tooltip_command(&self) -> Command {
        Command::SetStatusText {
            slot: StatusSlot::Center,
            text: self.selected().tooltip.to_string(),
        }
    }
}

impl Region for MenuRegion {
    fn handle_key(&mut self, key: KeyEvent, _area: Rect) -> KeyOutcome {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_index(1);
                KeyOutcome::Consumed(vec![self.tooltip_command()])
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_index(-1);
                KeyOutcome::Consumed(vec![self.tooltip_command()])
            }
            KeyCode::Enter | KeyCode::Char('l') => {
                KeyOutcome::Consumed(self.selected().actions.clone())
            }
            _ => KeyOutcome::Ignored,
        }
    }

    fn handle_command(&mut self, _command: &Command) -> Vec<Command> {
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block_height = TITLE.len() + 2 + self.items.len();
        let y_off = center_offset(area.height, block_height);

        let mut lines = vec![Line::default(); y_off as usize];
        for row in TITLE {
            lines.push(Line::from(Span::raw(row)).centered());
        }
        lines.push(Line::default());
        lines.push(Line::default());
        for (i, item) in self.items.iter().enumerate() {
            match item {
                None => lines.push(Line::default()),
                Some(item) => {
                    let (text, style) = if i == self.index {
                        (
                            format!("> {} <", item.label),
                            Style::default().add_modifier(Modifier::BOLD),
                        )
                    } else {
                        (item.label.to_string(), Style::default())
                    };
                    lines.push(Line::from(Span::styled(text, style)).centered());
                }
            }
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
        self.changed = true;
    }
}
