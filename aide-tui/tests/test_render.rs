//! Test rendering against an in-memory backend

use std::sync::Arc;

use aide_tui::app::{reduce, Action, TableView, UiState};
use aide_tui::ui;
use libpokeraide::types::{Game, GameSummary, Player};
use ratatui::{backend::TestBackend, Terminal};

fn draw(state: &UiState) -> String {
    let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
    terminal.draw(|frame| ui::render(frame, state)).unwrap();

    let buffer = terminal.backend().buffer();
    let width = buffer.area.width as usize;
    let mut text = String::new();
    for (i, cell) in buffer.content.iter().enumerate() {
        text.push_str(cell.symbol());
        if (i + 1) % width == 0 {
            text.push('\n');
        }
    }
    text
}

#[test]
fn test_empty_table_hint() {
    let text = draw(&UiState::new());
    assert!(text.contains("No active game"));
    assert!(text.contains("Press n to start one"));
}

#[test]
fn test_players_are_listed() {
    let mut game = Game::new(9, "turn");
    let mut hero = Player::new(1, "hero");
    hero.balance = 250;
    hero.dealer = true;
    hero.hold_1 = Some("Ah".to_string());
    game.players.push(hero);

    let summary = GameSummary::from(&game);
    let state = reduce(
        UiState::new(),
        Action::TableChanged(TableView {
            games: Arc::new(vec![summary]),
            game: Some(Arc::new(game)),
            error: None,
        }),
    );

    let text = draw(&state);
    assert!(text.contains("Game #9 | turn | dealer hero"));
    assert!(text.contains("hero"));
    assert!(text.contains("250"));
    assert!(text.contains("Ah --"));
}

#[test]
fn test_help_overlay() {
    let state = reduce(UiState::new(), Action::ShowHelp);
    assert!(draw(&state).contains("Keyboard Shortcuts"));
}
