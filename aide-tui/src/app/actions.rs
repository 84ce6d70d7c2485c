//! Actions for the UI reducer
//!
//! UI actions only ever change the screen state. Anything that has to reach
//! the game server is queued as a [`Command`] and executed by the event loop
//! through the bound store actions.

use crossterm::event::KeyEvent;
use libpokeraide::types::{BalanceForm, CardsForm, GameStatus, PlayerForm, PlayerId};

use super::state::TableView;

#[derive(Debug, Clone)]
pub enum Action {
    // === UI Events ===
    /// Keyboard input event
    Key(KeyEvent),

    /// Periodic tick
    Tick,

    /// Terminal resize event
    Resize(u16, u16),

    // === Navigation ===
    Quit,
    ShowHelp,
    HideHelp,
    SelectNext,
    SelectPrevious,

    // === Prompt ===
    OpenPrompt(PromptKind),
    PromptInput(char),
    PromptBackspace,
    PromptSubmit,
    PromptCancel,

    // === Store ===
    /// The store's view of the table changed
    TableChanged(TableView),

    /// Ask the store to clear its request failure
    DismissError,

    // === Status Bar ===
    SetStatus(String),
    ClearStatus,
}

/// What a prompt is collecting input for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// "name balance"
    AddPlayer,
    /// New balance for the selected player
    Balance,
    /// New game status
    Status,
    /// "hold_1 hold_2" for the selected player
    Cards,
}

impl PromptKind {
    pub fn title(&self) -> &'static str {
        match self {
            PromptKind::AddPlayer => "Add player",
            PromptKind::Balance => "Set balance",
            PromptKind::Status => "Set status",
            PromptKind::Cards => "Set cards",
        }
    }

    pub fn hint(&self) -> &'static str {
        match self {
            PromptKind::AddPlayer => "name [balance]",
            PromptKind::Balance => "amount",
            PromptKind::Status => "setup, preflop, flop, turn, river, showdown",
            PromptKind::Cards => "card card (e.g. Ah Kd)",
        }
    }
}

/// Requests for the store, executed outside the reducer
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    StartGame,
    AddPlayer(PlayerForm),
    RemovePlayer(PlayerId),
    SetBalance(BalanceForm),
    SetSitOut(PlayerId, bool),
    SetStatus(GameStatus),
    SetCards(PlayerId, CardsForm),
    SetDealer(PlayerId),
    DismissError,
}
