//! The client state tree
//!
//! Every slice sits behind an `Arc` so a reducer that has nothing to do can
//! hand back the very same allocation. Change detection compares pointers,
//! never contents.

use serde::Serialize;
use std::sync::Arc;

use crate::store::action::RequestFailure;
use crate::types::{Game, GameId, GameSummary, Player};

/// Games seen during this session, in the order they were first seen
pub type GamesSlice = Arc<Vec<GameSummary>>;

/// The currently active game, if any
pub type GameSlice = Option<Arc<Game>>;

/// The most recent request failure, if not yet dismissed
pub type ErrorSlice = Option<Arc<RequestFailure>>;

#[derive(Debug, Clone, Default, Serialize)]
pub struct AppState {
    pub games: GamesSlice,
    pub game: GameSlice,
    pub error: ErrorSlice,
}

impl AppState {
    /// True when every slice is the same allocation as in `other`
    pub fn same_as(&self, other: &AppState) -> bool {
        Arc::ptr_eq(&self.games, &other.games)
            && same_option(&self.game, &other.game)
            && same_option(&self.error, &other.error)
    }

    /// Names of the slices that were replaced going from `self` to `next`
    pub fn changed_slices(&self, next: &AppState) -> Vec<&'static str> {
        let mut changed = Vec::new();
        if !Arc::ptr_eq(&self.games, &next.games) {
            changed.push("games");
        }
        if !same_option(&self.game, &next.game) {
            changed.push("game");
        }
        if !same_option(&self.error, &next.error) {
            changed.push("error");
        }
        changed
    }

    pub fn game_id(&self) -> Option<GameId> {
        self.game.as_ref().map(|g| g.id)
    }

    /// Players of the active game; empty when there is none
    pub fn players(&self) -> &[Player] {
        self.game.as_deref().map(|g| g.players.as_slice()).unwrap_or(&[])
    }
}

/// Pointer identity for optional slices; two `None`s are the same
pub fn same_option<T>(a: &Option<Arc<T>>, b: &Option<Arc<T>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}
