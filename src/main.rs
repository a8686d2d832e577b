//! snipbox - terminal snippet box
//!
//! Collect code snippets from the clipboard or an inline editor, browse them
//! with syntax highlighting, and copy them back out. Built with ratatui.
//!
//! Running without a subcommand starts the interactive interface; `list`,
//! `show` and `path` print to stdout and exit.

use crate::app::{App, Control, SessionEvent, Severity};
use crate::cli::Cli;
use crate::clipboard::{ClipboardBridge, SystemClipboard};
use crate::config::{ClipboardProbePolicy, Config};
use crate::models::StorageManager;
use crate::ui::highlight::{Highlighter, PlainHighlighter, SyntectHighlighter};
use clap::Parser;
use color_eyre::{Result, eyre::eyre};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    crossterm::{
        event::{self, Event},
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    },
};
use std::fs::{self, OpenOptions};
use std::io::{self, Stdout};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

mod app;
mod cli;
mod clipboard;
mod config;
mod error;
mod handlers;
mod models;
mod ui;

const LOG_FILE_NAME: &str = "snipbox.log";
const POLL_INTERVAL: Duration = Duration::from_millis(250);

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config_path = cli.config_path();
    let config = match &config_path {
        Some(path) => Config::load(path).map_err(|err| eyre!("{:#}", err))?,
        None => Config::default(),
    };
    let data_file = cli.data_file(&config).map_err(|err| eyre!("{:#}", err))?;

    if let Some(dir) = data_file.parent() {
        setup_tracing(&dir.join(LOG_FILE_NAME), cli.verbose);
    }
    tracing::info!(path = %data_file.display(), "snipbox starting");

    let storage = StorageManager::new(data_file);

    if let Some(command) = &cli.command {
        return cli::execute(command, &storage, config_path.as_deref())
            .map_err(|err| eyre!("{:#}", err));
    }

    let clipboard: Option<Box<dyn ClipboardBridge>> = match SystemClipboard::probe() {
        Ok(clipboard) => Some(Box::new(clipboard)),
        Err(err) => match config.clipboard_probe {
            ClipboardProbePolicy::Fatal => {
                return Err(eyre!("Clipboard is required but unavailable: {}", err));
            }
            ClipboardProbePolicy::Degrade => None,
        },
    };

    let highlighter: Box<dyn Highlighter> = if config.highlight {
        Box::new(SyntectHighlighter::new(config.syntax_theme.clone()))
    } else {
        Box::new(PlainHighlighter)
    };

    install_panic_hook();
    let mut terminal = setup_terminal()?;
    let size = terminal.size()?;

    let mut app = App::new(
        Box::new(storage),
        clipboard,
        highlighter,
        config.language(),
        (size.width, size.height),
    );

    let outcome = run(&mut terminal, &mut app);
    restore_terminal()?;
    terminal.show_cursor()?;
    outcome?;

    if let Some(status) = app.status()
        && status.severity == Severity::Error
    {
        eprintln!("snipbox: {}", status.text);
    }

    tracing::info!("snipbox exited");
    Ok(())
}

/// Main event loop. One event is fully handled before the next is read.
fn run(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|frame| app.render(frame))?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }

        let session_event = match event::read()? {
            Event::Key(key) => SessionEvent::Key(key),
            Event::Resize(width, height) => SessionEvent::Resize(width, height),
            _ => continue,
        };

        if app.handle_event(session_event) == Control::Quit {
            return Ok(());
        }
    }
}

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if let Err(err) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(err);
    }

    Terminal::new(CrosstermBackend::new(stdout))
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)
}

/// Leaves the alternate screen before the report is printed.
fn install_panic_hook() {
    let report = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        report(info);
    }));
}

/// Logs go to a file because the terminal belongs to the interface.
/// Failing to open the log only disables logging.
fn setup_tracing(log_path: &Path, verbose: bool) {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    if let Some(dir) = log_path.parent()
        && fs::create_dir_all(dir).is_err()
    {
        return;
    }

    let Ok(file) = OpenOptions::new().create(true).append(true).open(log_path) else {
        return;
    };

    let filter = EnvFilter::try_from_env("SNIPBOX_LOG").unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("snipbox=debug")
        } else {
            EnvFilter::new("snipbox=info")
        }
    });

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();
}
