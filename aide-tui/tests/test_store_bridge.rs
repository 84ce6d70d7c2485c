//! Test the bridge between the synchronous event loop and the store
//!
//! Commands are executed without waiting; their results show up through
//! `poll_table` once the deferred work has dispatched.

use std::sync::Arc;
use std::time::{Duration, Instant};

use aide_tui::app::{reduce, Action, Command, TableView, UiState};
use aide_tui::services::StoreHandle;
use libpokeraide::api::mock::MockApi;
use libpokeraide::api::RequestKind;
use libpokeraide::config::SequencingPolicy;
use libpokeraide::types::{Game, Player, PlayerForm, PlayerId};
use libpokeraide::ApiError;

/// Poll until `done` holds for the latest props, or give up after two seconds
fn wait_for<F>(store: &mut StoreHandle, done: F) -> TableView
where
    F: Fn(&TableView) -> bool,
{
    let deadline = Instant::now() + Duration::from_secs(2);
    loop {
        if let Some(table) = store.poll_table() {
            if done(&table) {
                return table;
            }
        }
        assert!(Instant::now() < deadline, "store never produced the expected table");
        std::thread::sleep(Duration::from_millis(10));
    }
}

#[test]
fn test_start_game_reaches_the_screen() {
    let api = Arc::new(MockApi::new());
    let mut store = StoreHandle::with_api(api.clone(), SequencingPolicy::LatestIssued).unwrap();
    assert!(store.table().game.is_none());
    assert!(store.poll_table().is_none());

    store.execute(Command::StartGame);
    let table = wait_for(&mut store, |t| t.game.is_some());

    let state = reduce(UiState::new(), Action::TableChanged(table));
    assert!(state.has_game());
    assert_eq!(state.table.games.len(), 1);
    assert_eq!(api.call_count(), 1);
}

#[test]
fn test_add_player_updates_players() {
    let api = Arc::new(MockApi::with_game(Game::new(1, "setup")));
    let mut store = StoreHandle::with_api(api.clone(), SequencingPolicy::LatestIssued).unwrap();

    store.execute(Command::StartGame);
    wait_for(&mut store, |t| t.game.is_some());

    store.execute(Command::AddPlayer(PlayerForm::new("hero", 100).unwrap()));
    let table = wait_for(&mut store, |t| !t.players().is_empty());

    assert_eq!(table.players()[0].name, "hero");
    assert_eq!(table.players()[0].balance, 100);
}

#[test]
fn test_failure_shows_up_and_can_be_dismissed() {
    let mut game = Game::new(1, "setup");
    game.players.push(Player::new(1, "hero"));
    let api = Arc::new(MockApi::with_game(game));
    api.fail_on(RequestKind::SetDealer, ApiError::network("connection reset"));
    let mut store = StoreHandle::with_api(api, SequencingPolicy::LatestIssued).unwrap();

    store.execute(Command::SetDealer(PlayerId(1)));
    let table = wait_for(&mut store, |t| t.error.is_some());
    assert!(table
        .error
        .as_ref()
        .is_some_and(|f| f.to_string().contains("connection reset")));

    store.execute(Command::DismissError);
    let table = wait_for(&mut store, |t| t.error.is_none());
    assert!(table.game.is_none());
}

#[test]
fn test_block_on_runs_on_the_store_runtime() {
    let store = StoreHandle::with_api(Arc::new(MockApi::new()), SequencingPolicy::Unordered)
        .unwrap();
    let value = store.block_on(async {
        tokio::time::sleep(Duration::from_millis(1)).await;
        42
    });
    assert_eq!(value, 42);
}
