//! Pure state transitions
//!
//! One function per slice plus [`reduce`], which combines them. A reducer
//! never mutates its input: it either returns a clone of the incoming `Arc`
//! (nothing to do) or a freshly allocated slice.

use std::sync::Arc;

use crate::store::action::Action;
use crate::store::state::{AppState, ErrorSlice, GameSlice, GamesSlice};
use crate::types::{Game, GameSummary};

/// Combined reducer over the whole tree
pub fn reduce(state: &AppState, action: &Action) -> AppState {
    AppState {
        games: games(&state.games, action),
        game: game(&state.game, action),
        error: error(&state.error, action),
    }
}

/// Registers every game seen through `SET_GAME`
///
/// A game whose id is already listed leaves the slice untouched.
pub fn games(state: &GamesSlice, action: &Action) -> GamesSlice {
    match action {
        Action::SetGame { game } => {
            if state.iter().any(|g| g.id == game.id) {
                return Arc::clone(state);
            }
            let mut next = Vec::with_capacity(state.len() + 1);
            next.extend(state.iter().cloned());
            next.push(GameSummary::from(game));
            Arc::new(next)
        }
        _ => Arc::clone(state),
    }
}

pub fn game(state: &GameSlice, action: &Action) -> GameSlice {
    match action {
        Action::SetGame { game } => Some(Arc::new(game.clone())),
        Action::SetPlayers { players } => match state {
            Some(current) => Some(Arc::new(Game {
                players: players.clone(),
                ..Game::clone(current)
            })),
            // Nothing to attach the players to
            None => None,
        },
        _ => state.clone(),
    }
}

pub fn error(state: &ErrorSlice, action: &Action) -> ErrorSlice {
    match action {
        Action::RequestFailed { failure } => Some(Arc::new(failure.clone())),
        Action::DismissError if state.is_some() => None,
        _ => state.clone(),
    }
}
