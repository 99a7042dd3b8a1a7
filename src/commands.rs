//! Command system: typed messages between screen regions
//!
//! Regions never hold references to each other; a region reacts to a
//! keypress or an inbound command by returning a list of commands, and the
//! interface routes each command to its declared target. The variant set is
//! closed, so the routing table below covers every message that can exist.

use std::path::PathBuf;

/// Identifies a concrete region for stack operations and routing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionId {
    Logo,
    Menu,
    Help,
    Info,
    Editor,
}

/// Status line text slots (left, center, right)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusSlot {
    Left,
    Center,
    Right,
}

/// An immutable message exchanged between regions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // ---- region stack / focus ----
    /// Push a region onto the stack and give it focus
    PushRegion(RegionId),
    /// Pop the focused region; popping the last region quits
    PopRegion,
    /// Replace the focused region
    ReplaceRegion(RegionId),
    /// Give the status line key focus, seeding its input buffer
    FocusStatusLine { seed: String },

    // ---- status line ----
    /// Set one status line slot to the given text
    SetStatusText { slot: StatusSlot, text: String },
    /// Clear all status line slots
    ClearStatusLine,

    // ---- editor / score ----
    /// The score was mutated; dependent regions should redraw
    ScoreChanged,
    /// Replace the current score with a fresh one
    NewScore,
    /// Apply a `:set` option (clef, time, key)
    SetOption { option: String, value: String },
    /// Import a score from a file (editor's remembered path when None)
    Open { path: Option<PathBuf>, forced: bool },
    /// Export the score to a file (editor's remembered path when None)
    Save { path: Option<PathBuf>, forced: bool },

    // ---- session ----
    /// Request to quit; the editor vetoes unforced quits with unsaved work
    Quit { forced: bool },
    /// The quit request passed the unsaved-work guard; tear down now
    QuitConfirmed,
}

/// Where the dispatcher delivers a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Handled by the interface itself (stack, focus, shutdown)
    Interface,
    /// Delivered to one region's command handler
    Region(RegionId),
    /// Delivered to the status line
    StatusLine,
    /// Delivered to the status line and every region
    Broadcast,
}

impl Command {
    /// Static routing table: every variant has exactly one route
    pub fn route(&self) -> Route {
        match self {
            Command::PushRegion(_)
            | Command::PopRegion
            | Command::ReplaceRegion(_)
            | Command::FocusStatusLine { .. }
            | Command::QuitConfirmed => Route::Interface,

            Command::SetStatusText { .. } | Command::ClearStatusLine => Route::StatusLine,

            Command::NewScore
            | Command::SetOption { .. }
            | Command::Open { .. }
            | Command::Save { .. }
            | Command::Quit { .. } => Route::Region(RegionId::Editor),

            Command::ScoreChanged => Route::Broadcast,
        }
    }
}
