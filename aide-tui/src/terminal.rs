//! Terminal ownership for the lifetime of the UI
//!
//! [`TerminalSession`] puts the terminal into raw mode on the alternate
//! screen and puts it back when dropped, so every exit path out of the
//! event loop (including `?`) leaves a usable shell behind. A panic skips
//! nothing either: the hook installed here restores the screen before the
//! panic message is printed.

use std::io::{self, Stdout};

use crossterm::{
    cursor::Show,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::app::UiState;
use crate::error::Result;
use crate::ui;

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

pub struct TerminalSession {
    terminal: Tui,
}

impl TerminalSession {
    /// Take over the terminal
    pub fn enter() -> Result<Self> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e.into());
        }

        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }

    pub fn draw(&mut self, state: &UiState) -> Result<()> {
        self.terminal.draw(|frame| ui::render(frame, state))?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if let Err(e) = leave(self.terminal.backend_mut()) {
            tracing::warn!(error = %e, "Failed to restore terminal");
        }
    }
}

fn leave<W: io::Write>(out: &mut W) -> io::Result<()> {
    execute!(out, LeaveAlternateScreen, Show)?;
    disable_raw_mode()
}

/// Restore the terminal before the default panic output is printed
pub fn install_panic_hook() {
    let previous = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |info| {
        let _ = leave(&mut io::stdout());
        previous(info);
    }));
}
