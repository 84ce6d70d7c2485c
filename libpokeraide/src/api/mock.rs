//! In-memory backend for testing
//!
//! `MockApi` keeps a tiny game server in memory so action creators can be
//! exercised end to end without a network. Each call is applied to the
//! in-memory game when it arrives; the response snapshot is then held back
//! for the next queued delay, which lets tests make responses complete out
//! of issuance order.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::sleep;

use crate::api::{ApiRequest, GameApi, RequestKind};
use crate::error::ApiError;
use crate::types::{Game, GameId, GameStatus, Player, PlayerId};

#[derive(Debug, Default)]
struct Backend {
    next_game_id: u64,
    next_player_id: u64,
    game: Option<Game>,
}

/// Mock backend for testing
#[derive(Clone, Default)]
pub struct MockApi {
    backend: Arc<Mutex<Backend>>,
    failures: Arc<Mutex<HashMap<RequestKind, ApiError>>>,
    delays: Arc<Mutex<VecDeque<Duration>>>,
    calls: Arc<Mutex<Vec<ApiRequest>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an active game already in place
    pub fn with_game(game: Game) -> Self {
        let api = Self::new();
        {
            let mut backend = lock(&api.backend);
            backend.next_game_id = game.id.0;
            backend.next_player_id = game.players.iter().map(|p| p.id.0).max().unwrap_or(0);
            backend.game = Some(game);
        }
        api
    }

    /// Make every request of this kind fail with `error`
    pub fn fail_on(&self, kind: RequestKind, error: ApiError) {
        lock(&self.failures).insert(kind, error);
    }

    /// Stop failing requests of this kind
    pub fn recover(&self, kind: RequestKind) {
        lock(&self.failures).remove(&kind);
    }

    /// Queue a response delay; each call consumes one, in call order
    pub fn push_delay(&self, delay: Duration) {
        lock(&self.delays).push_back(delay);
    }

    /// Requests received so far, in arrival order
    pub fn calls(&self) -> Vec<ApiRequest> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Current server-side game record
    pub fn server_game(&self) -> Option<Game> {
        lock(&self.backend).game.clone()
    }

    fn apply(&self, request: &ApiRequest) -> Result<serde_json::Value, ApiError> {
        let mut guard = lock(&self.backend);
        let backend = &mut *guard;

        match request {
            ApiRequest::CreateGame => {
                backend.next_game_id += 1;
                let game = Game {
                    id: GameId(backend.next_game_id),
                    status: GameStatus::new(GameStatus::SETUP),
                    players: Vec::new(),
                };
                backend.game = Some(game.clone());
                to_json(&game)
            }
            ApiRequest::AddPlayer(form) => {
                let game = active(&mut backend.game)?;
                backend.next_player_id += 1;
                let mut player = Player::new(backend.next_player_id, form.name.clone());
                player.balance = form.balance;
                game.players.push(player);
                to_json(&game.players)
            }
            ApiRequest::RemovePlayer(id) => {
                let game = active(&mut backend.game)?;
                let before = game.players.len();
                game.players.retain(|p| p.id != *id);
                if game.players.len() == before {
                    return Err(not_found(*id));
                }
                to_json(&game.players)
            }
            ApiRequest::SetBalance(form) => {
                let game = active(&mut backend.game)?;
                player_mut(game, form.id)?.balance = form.balance;
                to_json(&game.players)
            }
            ApiRequest::SetSitOut { id, sit_out } => {
                let game = active(&mut backend.game)?;
                player_mut(game, *id)?.sit_out = *sit_out;
                to_json(&game.players)
            }
            ApiRequest::SetStatus(status) => {
                let game = active(&mut backend.game)?;
                game.status = status.clone();
                to_json(&*game)
            }
            ApiRequest::SetCards { id, cards } => {
                let game = active(&mut backend.game)?;
                let player = player_mut(game, *id)?;
                player.hold_1 = Some(cards.hold_1.clone()).filter(|c| !c.is_empty());
                player.hold_2 = Some(cards.hold_2.clone()).filter(|c| !c.is_empty());
                to_json(&game.players)
            }
            ApiRequest::SetDealer(id) => {
                let game = active(&mut backend.game)?;
                player_mut(game, *id)?;
                for player in game.players.iter_mut() {
                    player.dealer = player.id == *id;
                }
                to_json(&game.players)
            }
        }
    }
}

fn active(game: &mut Option<Game>) -> Result<&mut Game, ApiError> {
    game.as_mut().ok_or_else(|| ApiError::Status {
        status: 409,
        body: "no active game".to_string(),
    })
}

fn player_mut(game: &mut Game, id: PlayerId) -> Result<&mut Player, ApiError> {
    game.players
        .iter_mut()
        .find(|p| p.id == id)
        .ok_or_else(|| not_found(id))
}

fn not_found(id: PlayerId) -> ApiError {
    ApiError::Status {
        status: 404,
        body: format!("no player {}", id),
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::decode(e.to_string()))
}

#[async_trait]
impl GameApi for MockApi {
    async fn send(&self, request: &ApiRequest) -> Result<serde_json::Value, ApiError> {
        lock(&self.calls).push(request.clone());

        let failure = lock(&self.failures).get(&request.kind()).cloned();
        let result = match failure {
            Some(error) => Err(error),
            None => self.apply(request),
        };

        let delay = lock(&self.delays).pop_front();
        if let Some(delay) = delay {
            sleep(delay).await;
        }

        result
    }

    fn name(&self) -> &str {
        "mock"
    }
}
