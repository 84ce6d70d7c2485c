//! Core data types mirrored from the game backend

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{AideError, Result};

/// Maximum length of a hole card string (e.g. "Ah", "10d")
pub const MAX_CARD_LEN: usize = 3;

/// Backend identifier of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(pub u64);

/// Backend identifier of a player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PlayerId {
    type Err = AideError;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<u64>()
            .map(PlayerId)
            .map_err(|_| AideError::InvalidInput(format!("'{}' is not a player id", s)))
    }
}

/// Game status tag
///
/// The backend owns the set of statuses and their transitions, so this is an
/// open string tag rather than a closed enum. The well-known values are
/// listed in [`GameStatus::KNOWN`] for display and completion purposes only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameStatus(String);

impl GameStatus {
    pub const SETUP: &'static str = "setup";
    pub const PREFLOP: &'static str = "preflop";
    pub const FLOP: &'static str = "flop";
    pub const TURN: &'static str = "turn";
    pub const RIVER: &'static str = "river";
    pub const SHOWDOWN: &'static str = "showdown";

    pub const KNOWN: [&'static str; 6] = [
        Self::SETUP,
        Self::PREFLOP,
        Self::FLOP,
        Self::TURN,
        Self::RIVER,
        Self::SHOWDOWN,
    ];

    pub fn new(status: impl Into<String>) -> Self {
        Self(status.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is one of the statuses the client knows by name
    pub fn is_known(&self) -> bool {
        Self::KNOWN.contains(&self.0.as_str())
    }
}

impl FromStr for GameStatus {
    type Err = AideError;

    fn from_str(s: &str) -> Result<Self> {
        let status = s.trim().to_lowercase();
        if status.is_empty() {
            return Err(AideError::InvalidInput(
                "Game status cannot be empty".to_string(),
            ));
        }
        Ok(Self(status))
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A player seated at the active game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    #[serde(default)]
    pub balance: i64,
    #[serde(default, deserialize_with = "flag")]
    pub dealer: bool,
    #[serde(default, deserialize_with = "flag")]
    pub sit_out: bool,
    #[serde(default)]
    pub hold_1: Option<String>,
    #[serde(default)]
    pub hold_2: Option<String>,
}

impl Player {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id: PlayerId(id),
            name: name.into(),
            balance: 0,
            dealer: false,
            sit_out: false,
            hold_1: None,
            hold_2: None,
        }
    }
}

/// The active game record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub status: GameStatus,
    #[serde(default)]
    pub players: Vec<Player>,
}

impl Game {
    pub fn new(id: u64, status: &str) -> Self {
        Self {
            id: GameId(id),
            status: GameStatus::new(status),
            players: Vec::new(),
        }
    }

    pub fn dealer(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.dealer)
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }
}

/// Entry of the games list
///
/// Captured when a game is first seen; the active `game` slice carries the
/// up-to-date record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSummary {
    pub id: GameId,
    pub status: GameStatus,
    pub player_count: usize,
}

impl From<&Game> for GameSummary {
    fn from(game: &Game) -> Self {
        Self {
            id: game.id,
            status: game.status.clone(),
            player_count: game.players.len(),
        }
    }
}

/// Form data for seating a new player
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerForm {
    pub name: String,
    pub balance: i64,
}

impl PlayerForm {
    pub fn new(name: &str, balance: i64) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AideError::InvalidInput(
                "Player name cannot be empty".to_string(),
            ));
        }
        Ok(Self {
            name: name.to_string(),
            balance,
        })
    }
}

/// Form data for changing a player's balance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceForm {
    pub id: PlayerId,
    pub balance: i64,
}

impl BalanceForm {
    pub fn new(id: PlayerId, balance: i64) -> Self {
        Self { id, balance }
    }
}

/// Form data for a player's two hole cards
///
/// Cards are opaque to the client; only their length is checked. A blank
/// card clears the slot on the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardsForm {
    pub hold_1: String,
    pub hold_2: String,
}

impl CardsForm {
    pub fn new(hold_1: &str, hold_2: &str) -> Result<Self> {
        Ok(Self {
            hold_1: card(hold_1)?,
            hold_2: card(hold_2)?,
        })
    }
}

fn card(raw: &str) -> Result<String> {
    let card = raw.trim();
    if card.chars().count() > MAX_CARD_LEN {
        return Err(AideError::InvalidInput(format!(
            "Card '{}' is longer than {} characters",
            card, MAX_CARD_LEN
        )));
    }
    Ok(card.to_string())
}

/// Accepts `true`/`false` as well as the `0`/`1` the form encoding uses
fn flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
        Null(()),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Int(i) => i != 0,
        Flag::Null(()) => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_player_deserializes_with_defaults() {
        let player: Player = serde_json::from_value(json!({"id": 9, "name": "A"})).unwrap();
        assert_eq!(player.id, PlayerId(9));
        assert_eq!(player.name, "A");
        assert_eq!(player.balance, 0);
        assert!(!player.dealer);
        assert!(!player.sit_out);
        assert!(player.hold_1.is_none());
    }

    #[test]
    fn test_player_flags_accept_integers() {
        let player: Player = serde_json::from_value(json!({
            "id": 1, "name": "hero", "balance": 123,
            "dealer": 1, "sit_out": 0, "hold_1": "Ah", "hold_2": null
        }))
        .unwrap();
        assert!(player.dealer);
        assert!(!player.sit_out);
        assert_eq!(player.hold_1.as_deref(), Some("Ah"));
        assert_eq!(player.hold_2, None);
    }

    #[test]
    fn test_game_deserializes_from_backend_shape() {
        let game: Game = serde_json::from_value(json!({
            "id": 42,
            "status": "setup",
            "players": [{"id": 1, "name": "hero", "balance": 123}]
        }))
        .unwrap();
        assert_eq!(game.id, GameId(42));
        assert_eq!(game.status.as_str(), "setup");
        assert_eq!(game.players.len(), 1);
    }

    #[test]
    fn test_unknown_status_is_preserved() {
        let game: Game =
            serde_json::from_value(json!({"id": 1, "status": "bomb_pot"})).unwrap();
        assert_eq!(game.status.as_str(), "bomb_pot");
        assert!(!game.status.is_known());
        assert!(GameStatus::new("flop").is_known());
    }

    #[test]
    fn test_status_parse_normalizes() {
        let status: GameStatus = "  PreFlop ".parse().unwrap();
        assert_eq!(status.as_str(), "preflop");
        assert!("   ".parse::<GameStatus>().is_err());
    }

    #[test]
    fn test_player_form_rejects_blank_name() {
        assert!(PlayerForm::new("   ", 100).is_err());
        let form = PlayerForm::new("  villain ", 250).unwrap();
        assert_eq!(form.name, "villain");
        assert_eq!(form.balance, 250);
    }

    #[test]
    fn test_cards_form_length_limit() {
        assert!(CardsForm::new("Ah", "10d").is_ok());
        assert!(CardsForm::new("", "").is_ok());

        let err = CardsForm::new("Ahhh", "Kd").unwrap_err();
        assert!(err.to_string().contains("longer than 3"));
    }

    #[test]
    fn test_summary_from_game() {
        let mut game = Game::new(7, "flop");
        game.players.push(Player::new(1, "a"));
        game.players.push(Player::new(2, "b"));

        let summary = GameSummary::from(&game);
        assert_eq!(summary.id, GameId(7));
        assert_eq!(summary.player_count, 2);
    }

    #[test]
    fn test_player_id_parse() {
        assert_eq!("12".parse::<PlayerId>().unwrap(), PlayerId(12));
        assert!("twelve".parse::<PlayerId>().is_err());
    }

    #[test]
    fn test_dealer_lookup() {
        let mut game = Game::new(1, "setup");
        game.players.push(Player::new(1, "a"));
        let mut b = Player::new(2, "b");
        b.dealer = true;
        game.players.push(b);

        assert_eq!(game.dealer().map(|p| p.id), Some(PlayerId(2)));
        assert!(game.player(PlayerId(3)).is_none());
    }
}
