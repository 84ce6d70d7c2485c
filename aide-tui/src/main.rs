//! aide-tui - Terminal UI for PokerAide
//!
//! Runs a poker table from the keyboard. Screen state goes through the UI
//! reducer; game state lives in the library store and reaches the screen
//! through a binding polled on every tick.

use std::path::PathBuf;

use aide_tui::{
    app::{event::EventSource, reduce, Action, UiState},
    error::Result,
    services::StoreHandle,
    terminal::{install_panic_hook, TerminalSession},
};
use libpokeraide::logging;

fn main() {
    init_logging();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

fn run() -> Result<()> {
    // Fail on a bad config before the terminal is taken over
    let store = StoreHandle::new()?;

    install_panic_hook();
    // Restored on drop, before any error reaches stderr
    let mut terminal = TerminalSession::enter()?;
    run_app(&mut terminal, store)
}

fn run_app(terminal: &mut TerminalSession, mut store: StoreHandle) -> Result<()> {
    let mut state = UiState::new();
    state = reduce(state, Action::TableChanged(store.table().clone()));

    let events = EventSource::new(state.config.tick_rate_ms);

    while !state.should_quit {
        terminal.draw(&state)?;

        for action in events.next_batch()? {
            state = reduce(state, action);
        }

        for command in state.drain_outbox() {
            store.execute(command);
        }

        if let Some(table) = store.poll_table() {
            state = reduce(state, Action::TableChanged(table));
        }
    }

    tracing::info!("Shutting down");
    Ok(())
}

/// Log to a file; stderr belongs to the terminal while the UI is up
fn init_logging() {
    let path = match std::env::var_os("POKERAIDE_TUI_LOG") {
        Some(path) => PathBuf::from(path),
        None => match dirs::data_local_dir() {
            Some(dir) => dir.join("pokeraide").join("aide-tui.log"),
            None => return,
        },
    };

    if let Some(parent) = path.parent() {
        if std::fs::create_dir_all(parent).is_err() {
            return;
        }
    }

    logging::from_env(false).with_file(path).init();
}
