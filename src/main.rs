//! Entry point: CLI, logging and the event loop

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::layout::Rect;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use editor_tui::interface::CommandLoopError;
use editor_tui::models::Score;
use editor_tui::terminal::{self, TerminalGuard};
use editor_tui::{lilypond, Interface};

/// Music notation editor for the terminal
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// LilyPond file to open
    path: Option<PathBuf>,

    /// Write the log to this file instead of the default location
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Debug, Error)]
enum RunError {
    #[error("terminal error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    CommandLoop(#[from] CommandLoopError),
}

fn main() -> ExitCode {
    let args = Args::parse();
    let _log_guard = init_logging(args.log_file.as_deref());

    // read the score before touching the terminal, so a bad file is an
    // ordinary error message instead of a garbled screen
    let preloaded = match args.path {
        Some(path) => match load_score(&path) {
            Ok(score) => Some((score, path)),
            Err(message) => {
                eprintln!("{}", message);
                return ExitCode::FAILURE;
            }
        },
        None => None,
    };

    let mut interface = Interface::new();
    if let Some((score, path)) = preloaded {
        interface.preload(score, Some(path));
    }

    match run(interface) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn load_score(path: &std::path::Path) -> Result<Score, String> {
    let text = fs::read_to_string(path)
        .map_err(|err| format!("cannot read {}: {}", path.display(), err))?;
    lilypond::decode(&text).map_err(|err| format!("{}: {}", path.display(), err))
}

fn run(mut interface: Interface) -> Result<(), RunError> {
    let _guard = TerminalGuard::new()?;
    let mut terminal = terminal::init()?;

    terminal.draw(|frame| interface.draw(frame))?;

    while interface.running() {
        match event::read()? {
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                let size = terminal.size()?;
                let main_area = Rect::new(0, 0, size.width, size.height.saturating_sub(1));
                interface.handle_key(key, main_area)?;
            }
            Event::Resize(_, _) => interface.mark_all_changed(),
            _ => {}
        }
        if interface.running() && interface.any_changed() {
            terminal.draw(|frame| interface.draw(frame))?;
        }
    }

    info!("session ended");
    Ok(())
}

/// Set up file logging; the terminal owns stdout, so nothing may log there
fn init_logging(path: Option<&std::path::Path>) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let (dir, file) = match path {
        Some(path) => {
            let dir = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            };
            (dir, path.file_name()?.to_os_string())
        }
        None => (
            std::env::temp_dir(),
            std::ffi::OsString::from("editor-tui.log"),
        ),
    };

    let appender = tracing_appender::rolling::never(dir, file);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("editor_tui=info"));

    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init();

    if result.is_err() {
        return None;
    }

    info!("logging initialized");
    Some(guard)
}
