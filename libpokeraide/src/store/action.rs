//! Descriptors consumed by the reducers
//!
//! A descriptor is a plain, serializable record naming what happened. It
//! carries no behavior; deferred work lives in [`super::Deferred`].

use serde::{Deserialize, Serialize};

use crate::api::RequestKind;
use crate::error::ApiError;
use crate::types::{Game, Player};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    /// Replace the active game record (and register it in the games list)
    SetGame { game: Game },

    /// Replace the active game's player list
    SetPlayers { players: Vec<Player> },

    /// A backend request failed
    RequestFailed { failure: RequestFailure },

    /// Clear the last request failure
    DismissError,

    /// Any descriptor type this client does not know; reducers ignore it
    #[serde(other)]
    Unknown,
}

impl Action {
    /// Descriptor type tag as it appears on the wire
    pub fn kind(&self) -> &'static str {
        match self {
            Action::SetGame { .. } => "SET_GAME",
            Action::SetPlayers { .. } => "SET_PLAYERS",
            Action::RequestFailed { .. } => "REQUEST_FAILED",
            Action::DismissError => "DISMISS_ERROR",
            Action::Unknown => "UNKNOWN",
        }
    }
}

/// Failure of one backend request, as stored in the `error` slice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestFailure {
    pub request: RequestKind,
    pub error: ApiError,
}

impl std::fmt::Display for RequestFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.request, self.error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GameId;
    use serde_json::json;

    #[test]
    fn test_descriptor_wire_shape() {
        let action = Action::SetGame {
            game: Game::new(42, "setup"),
        };
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["type"], "SET_GAME");
        assert_eq!(json["game"]["id"], 42);
        assert_eq!(action.kind(), "SET_GAME");
    }

    #[test]
    fn test_descriptor_from_json() {
        let action: Action = serde_json::from_value(json!({
            "type": "SET_PLAYERS",
            "players": [{"id": 9, "name": "A"}]
        }))
        .unwrap();

        match action {
            Action::SetPlayers { players } => {
                assert_eq!(players.len(), 1);
                assert_eq!(players[0].name, "A");
            }
            other => panic!("Expected SET_PLAYERS, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_descriptor_type() {
        let action: Action = serde_json::from_value(json!({"type": "ACTIVATE_GAME"})).unwrap();
        assert_eq!(action, Action::Unknown);
    }

    #[test]
    fn test_failure_display() {
        let failure = RequestFailure {
            request: RequestKind::SetBalance,
            error: ApiError::network("connection reset"),
        };
        assert_eq!(
            failure.to_string(),
            "set_balance failed: Network error: connection reset"
        );

        let game = Game::new(1, "flop");
        assert_eq!(game.id, GameId(1));
    }
}
