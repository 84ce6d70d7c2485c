//! View-to-state binding
//!
//! A [`Binding`] runs a selector over every committed state and yields the
//! selected props only when they differ from the last props it yielded.
//! [`BoundActions`] pairs the action creators with the store so a view can
//! trigger them without ever seeing `dispatch`.

use std::sync::Arc;

use tokio::sync::watch;

use crate::actions::{self, ActionCreators};
use crate::store::state::{ErrorSlice, GameSlice, GamesSlice};
use crate::store::{AppState, Dispatched, Store};
use crate::types::{BalanceForm, CardsForm, GameStatus, Player, PlayerForm, PlayerId};

type Selector<P> = Box<dyn Fn(&AppState) -> P + Send + Sync>;

/// Selected props kept in sync with the store
pub struct Binding<P> {
    receiver: watch::Receiver<AppState>,
    selector: Selector<P>,
    props: P,
}

/// Bind `selector` to the store; the initial props are selected right away
pub fn connect<P, F>(store: &Store, selector: F) -> Binding<P>
where
    P: PartialEq,
    F: Fn(&AppState) -> P + Send + Sync + 'static,
{
    let mut receiver = store.subscribe();
    let props = selector(&*receiver.borrow_and_update());
    Binding {
        receiver,
        selector: Box::new(selector),
        props,
    }
}

impl<P: PartialEq + Clone> Binding<P> {
    /// Last props yielded
    pub fn props(&self) -> &P {
        &self.props
    }

    /// Non-blocking check for new props, for synchronous render loops
    pub fn poll(&mut self) -> Option<P> {
        match self.receiver.has_changed() {
            Ok(true) => self.reselect(),
            _ => None,
        }
    }

    /// Wait until the selected props change
    ///
    /// Returns `None` once the store has been dropped.
    pub async fn changed(&mut self) -> Option<P> {
        loop {
            self.receiver.changed().await.ok()?;
            if let Some(props) = self.reselect() {
                return Some(props);
            }
        }
    }

    fn reselect(&mut self) -> Option<P> {
        let next = (self.selector)(&*self.receiver.borrow_and_update());
        if next == self.props {
            return None;
        }
        self.props = next;
        Some(self.props.clone())
    }
}

pub fn select_games(state: &AppState) -> GamesSlice {
    Arc::clone(&state.games)
}

pub fn select_game(state: &AppState) -> GameSlice {
    state.game.clone()
}

pub fn select_players(state: &AppState) -> Vec<Player> {
    state.players().to_vec()
}

pub fn select_error(state: &AppState) -> ErrorSlice {
    state.error.clone()
}

/// Action creators bound to one store
#[derive(Clone)]
pub struct BoundActions {
    store: Store,
    creators: ActionCreators,
}

impl BoundActions {
    pub fn new(store: Store, creators: ActionCreators) -> Self {
        Self { store, creators }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn start_game(&self) -> Dispatched {
        self.store.dispatch(self.creators.start_game())
    }

    pub fn add_player(&self, form: PlayerForm) -> Dispatched {
        self.store.dispatch(self.creators.add_player(form))
    }

    pub fn remove_player(&self, id: PlayerId) -> Dispatched {
        self.store.dispatch(self.creators.remove_player(id))
    }

    pub fn set_balance(&self, form: BalanceForm) -> Dispatched {
        self.store.dispatch(self.creators.set_balance(form))
    }

    pub fn set_sit_out(&self, id: PlayerId, sit_out: bool) -> Dispatched {
        self.store.dispatch(self.creators.set_sit_out(id, sit_out))
    }

    pub fn set_status(&self, status: GameStatus) -> Dispatched {
        self.store.dispatch(self.creators.set_status(status))
    }

    pub fn set_cards(&self, id: PlayerId, cards: CardsForm) -> Dispatched {
        self.store.dispatch(self.creators.set_cards(id, cards))
    }

    pub fn set_dealer(&self, id: PlayerId) -> Dispatched {
        self.store.dispatch(self.creators.set_dealer(id))
    }

    pub fn dismiss_error(&self) -> Dispatched {
        self.store.dispatch(actions::dismiss_error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Action;
    use crate::types::Game;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn set_game(id: u64, status: &str) -> Action {
        Action::SetGame {
            game: Game::new(id, status),
        }
    }

    #[tokio::test]
    async fn test_initial_props_selected_on_connect() {
        let store = Store::new().unwrap();
        store.dispatch(set_game(1, "setup"));

        let binding = connect(&store, select_games);
        assert_eq!(binding.props().len(), 1);
    }

    #[tokio::test]
    async fn test_poll_yields_only_on_change() {
        let store = Store::new().unwrap();
        let mut binding = connect(&store, select_games);
        assert!(binding.poll().is_none());

        store.dispatch(set_game(1, "setup"));
        let games = binding.poll().unwrap();
        assert_eq!(games.len(), 1);
        assert!(binding.poll().is_none());
    }

    #[tokio::test]
    async fn test_selector_rerun_but_equal_props_not_yielded() {
        let store = Store::new().unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut binding = connect(&store, move |state: &AppState| {
            counter.fetch_add(1, Ordering::SeqCst);
            state.games.len()
        });

        store.dispatch(set_game(1, "setup"));
        assert_eq!(binding.poll(), Some(1));

        // Replaces `game` but leaves the games count alone
        store.dispatch(set_game(1, "flop"));
        assert_eq!(binding.poll(), None);

        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_changed_waits_for_new_props() {
        let store = Store::new().unwrap();
        let mut binding = connect(&store, select_game);

        let writer = store.clone();
        tokio::spawn(async move {
            writer.dispatch(set_game(4, "setup"));
        });

        let game = binding.changed().await.unwrap().unwrap();
        assert_eq!(game.id.0, 4);
    }

    #[tokio::test]
    async fn test_changed_ends_when_store_is_gone() {
        let store = Store::new().unwrap();
        let mut binding = connect(&store, select_error);
        drop(store);

        assert!(binding.changed().await.is_none());
    }

    #[tokio::test]
    async fn test_select_players() {
        let store = Store::new().unwrap();
        assert!(select_players(&store.state()).is_empty());

        store.dispatch(set_game(1, "setup"));
        store.dispatch(Action::SetPlayers {
            players: vec![Player::new(2, "B")],
        });
        assert_eq!(select_players(&store.state())[0].name, "B");
    }
}
