//! Test application initialization
//!
//! Verifies that the screen starts empty and picks its settings up from
//! environment variables.

use aide_tui::app::UiState;
use serial_test::serial;

#[test]
fn test_app_starts_without_a_game() {
    let state = UiState::new();

    assert!(!state.should_quit);
    assert!(!state.has_game());
    assert!(state.table.games.is_empty());
    assert!(state.selected_player().is_none());
}

#[test]
fn test_overlays_hidden_on_boot() {
    let state = UiState::new();

    assert!(!state.help_visible);
    assert!(state.prompt.is_none());
    assert!(state.table.error.is_none());
    assert!(state.status.message.is_none());
}

#[test]
fn test_outbox_empty_on_boot() {
    let mut state = UiState::new();
    assert!(state.drain_outbox().is_empty());
}

#[test]
#[serial]
fn test_colors_disabled_with_no_color_env() {
    std::env::set_var("NO_COLOR", "1");
    let state = UiState::new();
    std::env::remove_var("NO_COLOR");

    assert!(!state.config.colors_enabled);
}

#[test]
#[serial]
fn test_colors_disabled_with_tool_specific_env() {
    std::env::remove_var("NO_COLOR");
    std::env::set_var("AIDE_TUI_NO_COLOR", "1");
    let state = UiState::new();
    std::env::remove_var("AIDE_TUI_NO_COLOR");

    assert!(!state.config.colors_enabled);
}

#[test]
#[serial]
fn test_tick_rate_from_env() {
    std::env::set_var("AIDE_TUI_TICK_MS", "250");
    let state = UiState::new();
    std::env::remove_var("AIDE_TUI_TICK_MS");

    assert_eq!(state.config.tick_rate_ms, 250);
}

#[test]
#[serial]
fn test_tick_rate_ignores_garbage() {
    std::env::set_var("AIDE_TUI_TICK_MS", "fast");
    let state = UiState::new();
    std::env::remove_var("AIDE_TUI_TICK_MS");

    assert_eq!(state.config.tick_rate_ms, 100);
}
