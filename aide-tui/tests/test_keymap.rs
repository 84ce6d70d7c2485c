//! Test keybinding mappings to actions
//!
//! Verifies that keyboard input is mapped through the reducer, and that
//! table keys queue store commands instead of touching the table.

use std::sync::Arc;

use aide_tui::app::{reduce, Action, Command, PromptKind, TableView, UiState};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use libpokeraide::api::RequestKind;
use libpokeraide::store::action::RequestFailure;
use libpokeraide::types::{Game, Player, PlayerId};
use libpokeraide::ApiError;

fn press(state: UiState, code: KeyCode) -> UiState {
    reduce(state, Action::Key(KeyEvent::new(code, KeyModifiers::NONE)))
}

fn with_players(players: Vec<Player>) -> UiState {
    let mut game = Game::new(7, "preflop");
    game.players = players;
    reduce(
        UiState::new(),
        Action::TableChanged(TableView {
            game: Some(Arc::new(game)),
            ..Default::default()
        }),
    )
}

#[test]
fn test_q_quits_application() {
    let state = press(UiState::new(), KeyCode::Char('q'));
    assert!(state.should_quit);
}

#[test]
fn test_ctrl_q_does_not_quit() {
    let state = reduce(
        UiState::new(),
        Action::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL)),
    );
    assert!(!state.should_quit);
}

#[test]
fn test_f1_toggles_help() {
    let state = press(UiState::new(), KeyCode::F(1));
    assert!(state.help_visible);

    let state = press(state, KeyCode::F(1));
    assert!(!state.help_visible);
}

#[test]
fn test_esc_closes_help_first() {
    let mut state = press(UiState::new(), KeyCode::F(1));
    state.status.message = Some("hello".to_string());

    let state = press(state, KeyCode::Esc);
    assert!(!state.help_visible);
    assert_eq!(state.status.message.as_deref(), Some("hello"));

    let state = press(state, KeyCode::Esc);
    assert!(state.status.message.is_none());
}

#[test]
fn test_esc_dismisses_request_failure() {
    let mut state = UiState::new();
    state.table.error = Some(Arc::new(RequestFailure {
        request: RequestKind::StartGame,
        error: ApiError::network("connection refused"),
    }));

    let mut state = press(state, KeyCode::Esc);
    assert_eq!(state.drain_outbox(), vec![Command::DismissError]);
}

#[test]
fn test_n_queues_start_game() {
    let mut state = press(UiState::new(), KeyCode::Char('n'));
    assert_eq!(state.drain_outbox(), vec![Command::StartGame]);
    assert!(state.drain_outbox().is_empty());
}

#[test]
fn test_a_without_game_sets_status() {
    let mut state = press(UiState::new(), KeyCode::Char('a'));
    assert!(state.prompt.is_none());
    assert!(state.drain_outbox().is_empty());
    assert_eq!(
        state.status.message.as_deref(),
        Some("Start a game first (n)")
    );
}

#[test]
fn test_a_with_game_opens_prompt() {
    let state = press(with_players(Vec::new()), KeyCode::Char('a'));
    assert_eq!(state.prompt.map(|p| p.kind), Some(PromptKind::AddPlayer));
}

#[test]
fn test_player_keys_need_a_player() {
    for key in ['x', 'b', 's', 'c', 'd'] {
        let mut state = press(with_players(Vec::new()), KeyCode::Char(key));
        assert!(state.drain_outbox().is_empty(), "key {}", key);
        assert_eq!(state.status.message.as_deref(), Some("No player selected"));
    }
}

#[test]
fn test_s_toggles_sit_out() {
    let mut sitting = Player::new(1, "hero");
    sitting.sit_out = true;

    let mut state = press(with_players(vec![sitting]), KeyCode::Char('s'));
    assert_eq!(
        state.drain_outbox(),
        vec![Command::SetSitOut(PlayerId(1), false)]
    );

    let mut state = press(with_players(vec![Player::new(1, "hero")]), KeyCode::Char('s'));
    assert_eq!(
        state.drain_outbox(),
        vec![Command::SetSitOut(PlayerId(1), true)]
    );
}

#[test]
fn test_selection_targets_commands() {
    let state = with_players(vec![Player::new(1, "hero"), Player::new(2, "villain")]);

    let state = press(state, KeyCode::Down);
    let mut state = press(state, KeyCode::Char('d'));
    assert_eq!(state.drain_outbox(), vec![Command::SetDealer(PlayerId(2))]);

    let state = press(state, KeyCode::Char('k'));
    let mut state = press(state, KeyCode::Char('x'));
    assert_eq!(state.drain_outbox(), vec![Command::RemovePlayer(PlayerId(1))]);
}

#[test]
fn test_table_keys_never_touch_the_table() {
    let state = with_players(vec![Player::new(1, "hero")]);
    let before = state.table.clone();

    let state = press(state, KeyCode::Char('n'));
    let state = press(state, KeyCode::Char('x'));
    assert_eq!(state.table, before);
    assert_eq!(state.outbox.len(), 2);
}
