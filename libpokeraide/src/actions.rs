//! Action creators
//!
//! Synchronous creators are free functions returning a descriptor.
//! Asynchronous creators live on [`ActionCreators`]; each returns a
//! [`Deferred`] that performs exactly one backend request and dispatches
//! exactly one descriptor: the success descriptor, or `REQUEST_FAILED`.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use libpokeraide::actions::ActionCreators;
//! use libpokeraide::api::mock::MockApi;
//! use libpokeraide::config::SequencingPolicy;
//! use libpokeraide::store::Store;
//!
//! # async fn example() -> libpokeraide::Result<()> {
//! let store = Store::new()?;
//! let actions = ActionCreators::new(Arc::new(MockApi::new()), SequencingPolicy::LatestIssued);
//!
//! store.dispatch(actions.start_game()).settled().await;
//! assert_eq!(store.state().games.len(), 1);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tracing::Instrument;
use uuid::Uuid;

use crate::api::{ApiRequest, GameApi, RequestKind};
use crate::config::SequencingPolicy;
use crate::error::ApiError;
use crate::sequencer::{RequestSequencer, Resource};
use crate::store::{Action, Deferred, Dispatcher, Outcome, RequestFailure, StateAccessor};
use crate::types::{BalanceForm, CardsForm, Game, GameStatus, Player, PlayerForm, PlayerId};

pub fn set_game(game: Game) -> Action {
    Action::SetGame { game }
}

pub fn set_players(players: Vec<Player>) -> Action {
    Action::SetPlayers { players }
}

pub fn request_failed(request: RequestKind, error: ApiError) -> Action {
    Action::RequestFailed {
        failure: RequestFailure { request, error },
    }
}

pub fn dismiss_error() -> Action {
    Action::DismissError
}

/// Factory for deferred backend actions
#[derive(Clone)]
pub struct ActionCreators {
    api: Arc<dyn GameApi>,
    sequencer: Arc<RequestSequencer>,
}

impl ActionCreators {
    pub fn new(api: Arc<dyn GameApi>, policy: SequencingPolicy) -> Self {
        Self {
            api,
            sequencer: Arc::new(RequestSequencer::new(policy)),
        }
    }

    /// Name of the backend in use, for logs
    pub fn backend(&self) -> &str {
        self.api.name()
    }

    pub fn sequencer(&self) -> &RequestSequencer {
        &self.sequencer
    }

    /// Create a new game and make it the active one
    pub fn start_game(&self) -> Deferred {
        self.request(ApiRequest::CreateGame)
    }

    pub fn add_player(&self, form: PlayerForm) -> Deferred {
        self.request(ApiRequest::AddPlayer(form))
    }

    pub fn remove_player(&self, id: PlayerId) -> Deferred {
        self.request(ApiRequest::RemovePlayer(id))
    }

    pub fn set_balance(&self, form: BalanceForm) -> Deferred {
        self.request(ApiRequest::SetBalance(form))
    }

    pub fn set_sit_out(&self, id: PlayerId, sit_out: bool) -> Deferred {
        self.request(ApiRequest::SetSitOut { id, sit_out })
    }

    /// Move the active game to `status`; the server decides if that is legal
    pub fn set_status(&self, status: GameStatus) -> Deferred {
        self.request(ApiRequest::SetStatus(status))
    }

    pub fn set_cards(&self, id: PlayerId, cards: CardsForm) -> Deferred {
        self.request(ApiRequest::SetCards { id, cards })
    }

    pub fn set_dealer(&self, id: PlayerId) -> Deferred {
        self.request(ApiRequest::SetDealer(id))
    }

    fn request(&self, request: ApiRequest) -> Deferred {
        let api = Arc::clone(&self.api);
        let sequencer = Arc::clone(&self.sequencer);
        let kind = request.kind();

        Deferred::new(kind.as_str(), move |dispatch, state| {
            // Issued now, while the store is still inside dispatch
            let ticket = sequencer.issue();
            let request_id = Uuid::new_v4();
            let span = tracing::info_span!(
                "request",
                id = %request_id,
                kind = %kind,
                seq = ticket.seq()
            );

            async move {
                tracing::debug!(backend = api.name(), request = %request, "Issuing request");

                let response = match kind {
                    RequestKind::StartGame => api.game(&request).await.map(Response::Started),
                    RequestKind::SetStatus => api.game(&request).await.map(Response::Game),
                    _ => api.players(&request).await.map(Response::Players),
                };

                match response {
                    Ok(response) => {
                        let outcome = sequencer.commit(ticket, |claims| {
                            response.apply(claims, &dispatch, &state)
                        });
                        if outcome == Outcome::Discarded {
                            tracing::debug!("Discarding response superseded by a later request");
                        }
                        outcome
                    }
                    Err(error) => {
                        tracing::warn!(error = %error, "Request failed");
                        dispatch.dispatch(request_failed(kind, error.clone()));
                        Outcome::Failed(error)
                    }
                }
            }
            .instrument(span)
        })
    }
}

enum Response {
    /// A game created by `start_game`
    Started(Game),
    /// The active game with a new status
    Game(Game),
    Players(Vec<Player>),
}

impl Response {
    fn apply(
        self,
        claims: &mut crate::sequencer::Claims<'_>,
        dispatch: &Dispatcher,
        state: &StateAccessor,
    ) -> Outcome {
        match self {
            Response::Players(players) => {
                if !claims.claim(Resource::Players) {
                    return Outcome::Discarded;
                }
                dispatch.dispatch(set_players(players));
            }
            Response::Started(game) => {
                // A new game always becomes active and fences off responses
                // still in flight for the previous one
                claims.force(Resource::Status);
                claims.force(Resource::Players);
                dispatch.dispatch(set_game(game));
            }
            Response::Game(mut game) => {
                if !claims.claim(Resource::Status) {
                    return Outcome::Discarded;
                }
                let current = state.get();
                if !claims.claim(Resource::Players) && current.game_id() == Some(game.id) {
                    // A later player update already landed; keep its list
                    game.players = current.players().to_vec();
                }
                dispatch.dispatch(set_game(game));
            }
        }
        Outcome::Applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockApi;
    use crate::store::Store;
    use crate::types::GameId;

    fn setup(api: MockApi) -> (Store, ActionCreators) {
        let store = Store::new().unwrap();
        let actions = ActionCreators::new(Arc::new(api), SequencingPolicy::LatestIssued);
        (store, actions)
    }

    #[test]
    fn test_sync_creators() {
        assert_eq!(dismiss_error(), Action::DismissError);
        assert_eq!(set_players(vec![]).kind(), "SET_PLAYERS");
        assert_eq!(set_game(Game::new(1, "setup")).kind(), "SET_GAME");
        assert_eq!(
            request_failed(RequestKind::SetDealer, ApiError::network("x")).kind(),
            "REQUEST_FAILED"
        );
    }

    #[test]
    fn test_deferred_labels() {
        let actions = ActionCreators::new(Arc::new(MockApi::new()), SequencingPolicy::default());
        assert_eq!(actions.start_game().label(), "start_game");
        assert_eq!(actions.set_dealer(PlayerId(1)).label(), "set_dealer");
        assert_eq!(actions.backend(), "mock");
    }

    #[tokio::test]
    async fn test_start_game_sets_game() {
        let api = MockApi::new();
        let (store, actions) = setup(api.clone());

        let outcome = store.dispatch(actions.start_game()).settled().await;

        assert_eq!(outcome, Outcome::Applied);
        let state = store.state();
        assert_eq!(state.game_id(), Some(GameId(1)));
        assert_eq!(state.games.len(), 1);
        assert_eq!(api.call_count(), 1);
    }

    #[tokio::test]
    async fn test_player_mutation_replaces_player_list() {
        let api = MockApi::with_game(Game::new(1, "setup"));
        let (store, actions) = setup(api.clone());
        store.dispatch(set_game(Game::new(1, "setup")));

        store
            .dispatch(actions.add_player(PlayerForm::new("hero", 123).unwrap()))
            .settled()
            .await;

        let state = store.state();
        assert_eq!(state.players().len(), 1);
        assert_eq!(state.players()[0].name, "hero");
        assert_eq!(state.players()[0].balance, 123);
        assert_eq!(state.game.as_ref().unwrap().status.as_str(), "setup");
    }

    #[tokio::test]
    async fn test_set_status_replaces_game() {
        let api = MockApi::with_game(Game::new(1, "setup"));
        let (store, actions) = setup(api);
        store.dispatch(set_game(Game::new(1, "setup")));

        store
            .dispatch(actions.set_status(GameStatus::new("preflop")))
            .settled()
            .await;

        assert_eq!(
            store.state().game.as_ref().unwrap().status.as_str(),
            "preflop"
        );
    }

    #[tokio::test]
    async fn test_failure_dispatches_request_failed() {
        let api = MockApi::new();
        api.fail_on(RequestKind::StartGame, ApiError::network("connection refused"));
        let (store, actions) = setup(api);

        let outcome = store.dispatch(actions.start_game()).settled().await;

        assert!(matches!(outcome, Outcome::Failed(ApiError::Network { .. })));
        let state = store.state();
        assert!(state.games.is_empty());
        assert!(state.game.is_none());
        assert_eq!(state.error.as_ref().unwrap().request, RequestKind::StartGame);

        store.dispatch(dismiss_error());
        assert!(store.state().error.is_none());
    }

    #[tokio::test]
    async fn test_ticket_taken_at_dispatch() {
        let (store, actions) = setup(MockApi::new());
        let before = actions.sequencer().issue().seq();

        let pending = store.dispatch(actions.start_game());
        let after = actions.sequencer().issue().seq();
        pending.settled().await;

        assert_eq!(after, before + 2);
    }
}
