//! Screen state
//!
//! All transitions happen through the reducer (see `reducer.rs`). The
//! table itself is owned by the library store; `TableView` is the slice of
//! it this screen is bound to.

use libpokeraide::store::state::{ErrorSlice, GameSlice, GamesSlice};
use libpokeraide::store::AppState as StoreState;
use libpokeraide::types::Player;

use super::actions::{Command, PromptKind};

/// Root screen state
#[derive(Debug, Clone)]
pub struct UiState {
    /// Should the application quit?
    pub should_quit: bool,

    /// Help overlay visible?
    pub help_visible: bool,

    /// Props selected from the store
    pub table: TableView,

    /// Index of the highlighted player
    pub selected: usize,

    /// Open input prompt
    pub prompt: Option<Prompt>,

    /// Status bar state
    pub status: StatusBarState,

    /// UI configuration
    pub config: UiConfig,

    /// Store requests produced by the last transitions, drained by the event loop
    pub outbox: Vec<Command>,
}

/// Store props the table screen renders
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableView {
    pub games: GamesSlice,
    pub game: GameSlice,
    pub error: ErrorSlice,
}

impl TableView {
    /// Selector handed to the binding layer
    pub fn select(state: &StoreState) -> Self {
        Self {
            games: state.games.clone(),
            game: state.game.clone(),
            error: state.error.clone(),
        }
    }

    pub fn players(&self) -> &[Player] {
        self.game
            .as_deref()
            .map(|g| g.players.as_slice())
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub input: String,
}

impl Prompt {
    pub fn new(kind: PromptKind) -> Self {
        Self {
            kind,
            input: String::new(),
        }
    }
}

/// Status bar state
#[derive(Debug, Clone, Default)]
pub struct StatusBarState {
    /// Current status message
    pub message: Option<String>,
}

/// UI configuration
#[derive(Debug, Clone)]
pub struct UiConfig {
    /// Use colors?
    pub colors_enabled: bool,

    /// Tick rate in milliseconds
    pub tick_rate_ms: u64,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            should_quit: false,
            help_visible: false,
            table: TableView::default(),
            selected: 0,
            prompt: None,
            status: StatusBarState::default(),
            config: UiConfig::default(),
            outbox: Vec::new(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        let colors_enabled =
            std::env::var("NO_COLOR").is_err() && std::env::var("AIDE_TUI_NO_COLOR").is_err();

        let tick_rate_ms = std::env::var("AIDE_TUI_TICK_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(100);

        Self {
            colors_enabled,
            tick_rate_ms,
        }
    }
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The highlighted player, if the table has any
    pub fn selected_player(&self) -> Option<&Player> {
        self.table.players().get(self.selected)
    }

    pub fn has_game(&self) -> bool {
        self.table.game.is_some()
    }

    /// Take the queued store requests
    pub fn drain_outbox(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.outbox)
    }
}
