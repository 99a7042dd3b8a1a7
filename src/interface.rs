//! Interface: region stack and command dispatch
//!
//! Owns every region, routes keypresses to the focused one and resolves
//! the command cascade each keypress produces. Draw order is stack order
//! with the status line last; focus is the top of the stack, or the status
//! line while it holds the keyboard. Command propagation is capped, since
//! an unbounded cascade means the routing table has a cycle.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use ratatui::Frame;
use thiserror::Error;
use tracing::debug;

use crate::commands::{Command, RegionId, Route};
use crate::components::{
    text_display, EditorRegion, KeyOutcome, LogoRegion, MenuRegion, Region, StatusLine,
    TextDisplay,
};

/// Maximum command propagation rounds per keypress
pub const MAX_DISPATCH_ROUNDS: usize = 16;

/// The command cascade did not settle; the routing table has a cycle
///
/// This is a design defect, not bad user data, so it tears the session
/// down instead of being shown in the status line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("command cascade exceeded {MAX_DISPATCH_ROUNDS} rounds; routing table is cyclic")]
pub struct CommandLoopError;

/// All regions in creation order, used for broadcasts
const ALL_REGIONS: [RegionId; 5] = [
    RegionId::Logo,
    RegionId::Menu,
    RegionId::Help,
    RegionId::Info,
    RegionId::Editor,
];

/// A high-level type owning the regions and the dispatch loop state
pub struct Interface {
    logo: LogoRegion,
    menu: MenuRegion,
    help: TextDisplay,
    info: TextDisplay,
    editor: EditorRegion,
    status: StatusLine,
    stack: Vec<RegionId>,
    running: bool,
}

impl Interface {
    pub fn new() -> Self {
        let mut interface = Self {
            logo: LogoRegion::new(),
            menu: MenuRegion::main_menu(),
            help: TextDisplay::new(text_display::help_text()),
            info: TextDisplay::new(text_display::info_text()),
            editor: EditorRegion::new(),
            status: StatusLine::new(),
            stack: vec![RegionId::Logo],
            running: true,
        };
        interface.region_mut(RegionId::Logo).on_focus();
        interface
    }

    /// Skip the splash and open the editor on a preloaded score
    pub fn preload(&mut self, score: crate::models::Score, path: Option<std::path::PathBuf>) {
        self.editor.load(score, path);
        self.stack = vec![RegionId::Menu, RegionId::Editor];
        self.editor.on_focus();
    }

    /// False once a quit has been confirmed
    pub fn running(&self) -> bool {
        self.running
    }

    pub fn editor(&self) -> &EditorRegion {
        &self.editor
    }

    pub fn status(&self) -> &StatusLine {
        &self.status
    }

    pub fn status_focused(&self) -> bool {
        self.status.is_focused()
    }

    pub fn stack(&self) -> &[RegionId] {
        &self.stack
    }

    fn region(&self, id: RegionId) -> &dyn Region {
        match id {
            RegionId::Logo => &self.logo,
            RegionId::Menu => &self.menu,
            RegionId::Help => &self.help,
            RegionId::Info => &self.info,
            RegionId::Editor => &self.editor,
        }
    }

    fn region_mut(&mut self, id: RegionId) -> &mut dyn Region {
        match id {
            RegionId::Logo => &mut self.logo,
            RegionId::Menu => &mut self.menu,
            RegionId::Help => &mut self.help,
            RegionId::Info => &mut self.info,
            RegionId::Editor => &mut self.editor,
        }
    }

    /// Deliver one keypress and resolve the command cascade it produces
    pub fn handle_key(&mut self, key: KeyEvent, area: Rect) -> Result<(), CommandLoopError> {
        let commands = if self.status.is_focused() {
            match self.status.handle_key(key, area) {
                KeyOutcome::Consumed(commands) => commands,
                KeyOutcome::Ignored => Vec::new(),
            }
        } else {
            let Some(&top) = self.stack.last() else {
                return Ok(());
            };
            match self.region_mut(top).handle_key(key, area) {
                KeyOutcome::Consumed(commands) => commands,
                // unconsumed keys fall through to the global bindings
                KeyOutcome::Ignored => self.fallback_key(key),
            }
        };
        self.dispatch(commands)
    }

    /// Global keys offered when the focused region does not consume one
    fn fallback_key(&mut self, key: KeyEvent) -> Vec<Command> {
        match key.code {
            KeyCode::Char(':') => vec![Command::FocusStatusLine {
                seed: String::new(),
            }],
            _ => Vec::new(),
        }
    }

    /// Route commands wave by wave until the cascade settles
    pub fn dispatch(&mut self, commands: Vec<Command>) -> Result<(), CommandLoopError> {
        let mut queue = commands;
        let mut rounds = 0;
        while !queue.is_empty() {
            rounds += 1;
            if rounds > MAX_DISPATCH_ROUNDS {
                return Err(CommandLoopError);
            }
            let mut next = Vec::new();
            for command in queue.drain(..) {
                debug!(?command, round = rounds, "dispatch");
                match command.route() {
                    Route::Interface => self.handle_interface_command(command, &mut next),
                    Route::StatusLine => next.extend(self.status.handle_command(&command)),
                    Route::Region(id) => {
                        next.extend(self.region_mut(id).handle_command(&command))
                    }
                    Route::Broadcast => {
                        next.extend(self.status.handle_command(&command));
                        for id in ALL_REGIONS {
                            next.extend(self.region_mut(id).handle_command(&command));
                        }
                    }
                }
            }
            queue = next;
        }
        Ok(())
    }

    /// Stack, focus and shutdown commands handled by the interface itself
    fn handle_interface_command(&mut self, command: Command, next: &mut Vec<Command>) {
        match command {
            Command::PushRegion(id) => {
                if let Some(&top) = self.stack.last() {
                    self.region_mut(top).on_blur();
                }
                // a region appears at most once on the stack
                self.stack.retain(|&existing| existing != id);
                self.stack.push(id);
                self.region_mut(id).on_focus();
                next.push(Command::ClearStatusLine);
            }
            Command::PopRegion => {
                if let Some(top) = self.stack.pop() {
                    self.region_mut(top).on_blur();
                }
                match self.stack.last().copied() {
                    Some(top) => {
                        self.region_mut(top).on_focus();
                        next.push(Command::ClearStatusLine);
                    }
                    // nothing left to control
                    None => self.running = false,
                }
            }
            Command::ReplaceRegion(id) => {
                if let Some(top) = self.stack.pop() {
                    self.region_mut(top).on_blur();
                }
                self.stack.retain(|&existing| existing != id);
                self.stack.push(id);
                self.region_mut(id).on_focus();
                next.push(Command::ClearStatusLine);
            }
            Command::FocusStatusLine { seed } => {
                self.status.begin_input(&seed);
            }
            Command::QuitConfirmed => {
                self.running = false;
            }
            _ => {}
        }
    }

    /// True when any visible region needs a redraw
    pub fn any_changed(&self) -> bool {
        self.status.changed() || self.stack.iter().any(|&id| self.region(id).changed())
    }

    /// Force a full redraw, e.g. after a terminal resize
    pub fn mark_all_changed(&mut self) {
        for id in ALL_REGIONS {
            self.region_mut(id).set_changed(true);
        }
        self.status.set_changed(true);
    }

    /// Draw the visible regions bottom to top, status line last
    pub fn draw(&mut self, frame: &mut Frame) {
        let size = frame.area();
        let main = Rect {
            x: size.x,
            y: size.y,
            width: size.width,
            height: size.height.saturating_sub(1),
        };
        let status_area = Rect {
            x: size.x,
            y: size.y + main.height,
            width: size.width,
            height: size.height.min(1),
        };

        let stack = self.stack.clone();
        for id in stack {
            self.region_mut(id).render(frame, main);
        }
        self.status.render(frame, status_area);

        for id in ALL_REGIONS {
            self.region_mut(id).set_changed(false);
        }
        self.status.set_changed(false);
    }
}

impl Default for Interface {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn enter() -> KeyEvent {
        KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)
    }

    fn area() -> Rect {
        Rect::new(0, 0, 80, 24)
    }

    #[test]
    fn test_logo_enter_reaches_menu() {
        let mut interface = Interface::new();
        assert_eq!(interface.stack(), &[RegionId::Logo]);
        interface.handle_key(enter(), area()).unwrap();
        assert_eq!(interface.stack(), &[RegionId::Menu]);
    }

    #[test]
    fn test_help_is_pushed_and_popped() {
        let mut interface = Interface::new();
        interface.handle_key(enter(), area()).unwrap();
        interface
            .dispatch(vec![Command::PushRegion(RegionId::Help)])
            .unwrap();
        assert_eq!(interface.stack(), &[RegionId::Menu, RegionId::Help]);

        interface.handle_key(key('q'), area()).unwrap();
        assert_eq!(interface.stack(), &[RegionId::Menu]);
        assert!(interface.running());
    }

    #[test]
    fn test_popping_the_last_region_quits() {
        let mut interface = Interface::new();
        interface.dispatch(vec![Command::PopRegion]).unwrap();
        assert!(!interface.running());
    }

    #[test]
    fn test_colon_focuses_status_line_from_any_region() {
        let mut interface = Interface::new();
        interface.handle_key(enter(), area()).unwrap();
        assert!(!interface.status_focused());
        interface.handle_key(key(':'), area()).unwrap();
        assert!(interface.status_focused());
    }

    #[test]
    fn test_push_is_idempotent_on_the_stack() {
        let mut interface = Interface::new();
        interface
            .dispatch(vec![
                Command::PushRegion(RegionId::Help),
                Command::PushRegion(RegionId::Help),
            ])
            .unwrap();
        let help_count = interface
            .stack()
            .iter()
            .filter(|&&id| id == RegionId::Help)
            .count();
        assert_eq!(help_count, 1);
    }
}
