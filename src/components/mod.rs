//! Screen regions
//!
//! A region is an independently drawable, focus-eligible unit of the UI.
//! Regions communicate exclusively through the command system: a keypress
//! or inbound command produces a list of outbound commands, and the
//! interface routes them. No region holds a reference to another region.

pub mod editor;
pub mod logo;
pub mod menu;
pub mod status_line;
pub mod text_display;

use crossterm::event::KeyEvent;
use ratatui::layout::Rect;
use ratatui::Frame;

use crate::commands::Command;

pub use editor::EditorRegion;
pub use logo::LogoRegion;
pub use menu::{MenuItem, MenuRegion};
pub use status_line::StatusLine;
pub use text_display::TextDisplay;

/// Result of offering a keypress to a region
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The region handled the key, possibly emitting commands
    Consumed(Vec<Command>),
    /// The region does not recognize the key; the dispatcher may offer it
    /// to a fallback handler
    Ignored,
}

/// Contract implemented by every screen region
///
/// The current viewport bounds are passed into every keypress call, so a
/// region that scrolls can clamp against its visible size without any
/// privileged access to the terminal.
pub trait Region {
    /// Handle a keypress while this region is focused
    fn handle_key(&mut self, key: KeyEvent, area: Rect) -> KeyOutcome;

    /// Handle a command routed to this region, possibly emitting more
    fn handle_command(&mut self, command: &Command) -> Vec<Command>;

    /// Draw this region into the given area
    fn render(&mut self, frame: &mut Frame, area: Rect);

    /// True when this region needs to be redrawn
    fn changed(&self) -> bool;

    /// Set or clear the redraw flag
    fn set_changed(&mut self, changed: bool);

    /// Called when this region becomes the focused region
    fn on_focus(&mut self) {}

    /// Called when this region stops being the focused region
    fn on_blur(&mut self) {}
}

/// Offset that centers content of the given size inside a container
pub(crate) fn center_offset(container: u16, content: usize) -> u16 {
    (container as usize).saturating_sub(content) as u16 / 2
}
