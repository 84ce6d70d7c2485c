//! Pure reducer for screen state
//!
//! `(UiState, Action) -> UiState`. Requests for the game server are never
//! performed here; they are queued in `UiState::outbox` for the event loop.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use libpokeraide::types::{BalanceForm, CardsForm, GameStatus, PlayerForm};
use libpokeraide::{AideError, Result};

use super::actions::{Action, Command, PromptKind};
use super::state::{Prompt, StatusBarState, UiState};

pub fn reduce(state: UiState, action: Action) -> UiState {
    match action {
        // === UI Events ===
        Action::Key(key) => handle_key(state, key),
        Action::Tick => state,
        Action::Resize(_, _) => state,

        // === Navigation ===
        Action::Quit => UiState {
            should_quit: true,
            ..state
        },

        Action::ShowHelp => UiState {
            help_visible: true,
            ..state
        },

        Action::HideHelp => UiState {
            help_visible: false,
            ..state
        },

        Action::SelectNext => {
            let last = state.table.players().len().saturating_sub(1);
            UiState {
                selected: (state.selected + 1).min(last),
                ..state
            }
        }

        Action::SelectPrevious => UiState {
            selected: state.selected.saturating_sub(1),
            ..state
        },

        // === Prompt ===
        Action::OpenPrompt(kind) => UiState {
            prompt: Some(Prompt::new(kind)),
            status: StatusBarState::default(),
            ..state
        },

        Action::PromptInput(c) => match state.prompt {
            Some(mut prompt) => {
                prompt.input.push(c);
                UiState {
                    prompt: Some(prompt),
                    ..state
                }
            }
            None => state,
        },

        Action::PromptBackspace => match state.prompt {
            Some(mut prompt) => {
                prompt.input.pop();
                UiState {
                    prompt: Some(prompt),
                    ..state
                }
            }
            None => state,
        },

        Action::PromptCancel => UiState {
            prompt: None,
            ..state
        },

        Action::PromptSubmit => submit_prompt(state),

        // === Store ===
        Action::TableChanged(table) => {
            let last = table.players().len().saturating_sub(1);
            UiState {
                selected: state.selected.min(last),
                table,
                ..state
            }
        }

        Action::DismissError => queue(state, Command::DismissError),

        // === Status Bar ===
        Action::SetStatus(message) => UiState {
            status: StatusBarState {
                message: Some(message),
            },
            ..state
        },

        Action::ClearStatus => UiState {
            status: StatusBarState::default(),
            ..state
        },
    }
}

/// Map keys to actions. This is where keybindings are defined.
fn handle_key(state: UiState, key: KeyEvent) -> UiState {
    if state.prompt.is_some() {
        return match key.code {
            KeyCode::Esc => reduce(state, Action::PromptCancel),
            KeyCode::Enter => reduce(state, Action::PromptSubmit),
            KeyCode::Backspace => reduce(state, Action::PromptBackspace),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                reduce(state, Action::PromptInput(c))
            }
            _ => state,
        };
    }

    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), KeyModifiers::NONE) => reduce(state, Action::Quit),

        (KeyCode::F(1), _) => {
            let action = if state.help_visible {
                Action::HideHelp
            } else {
                Action::ShowHelp
            };
            reduce(state, action)
        }

        (KeyCode::Esc, _) if state.help_visible => reduce(state, Action::HideHelp),
        (KeyCode::Esc, _) if state.table.error.is_some() => reduce(state, Action::DismissError),
        (KeyCode::Esc, _) => reduce(state, Action::ClearStatus),

        (KeyCode::Down, _) | (KeyCode::Char('j'), KeyModifiers::NONE) => {
            reduce(state, Action::SelectNext)
        }
        (KeyCode::Up, _) | (KeyCode::Char('k'), KeyModifiers::NONE) => {
            reduce(state, Action::SelectPrevious)
        }

        (KeyCode::Char(c), KeyModifiers::NONE) | (KeyCode::Char(c), KeyModifiers::SHIFT) => {
            handle_table_key(state, c)
        }

        _ => state,
    }
}

/// Keys that act on the table
fn handle_table_key(state: UiState, c: char) -> UiState {
    match c {
        'n' => queue(state, Command::StartGame),
        'a' | 't' if !state.has_game() => {
            reduce(state, Action::SetStatus("Start a game first (n)".to_string()))
        }
        'a' => reduce(state, Action::OpenPrompt(PromptKind::AddPlayer)),
        't' => reduce(state, Action::OpenPrompt(PromptKind::Status)),
        'x' | 'b' | 's' | 'c' | 'd' => match state.selected_player().cloned() {
            None => reduce(state, Action::SetStatus("No player selected".to_string())),
            Some(player) => match c {
                'x' => queue(state, Command::RemovePlayer(player.id)),
                's' => queue(state, Command::SetSitOut(player.id, !player.sit_out)),
                'd' => queue(state, Command::SetDealer(player.id)),
                'b' => reduce(state, Action::OpenPrompt(PromptKind::Balance)),
                _ => reduce(state, Action::OpenPrompt(PromptKind::Cards)),
            },
        },
        _ => state,
    }
}

fn queue(mut state: UiState, command: Command) -> UiState {
    state.outbox.push(command);
    state
}

fn submit_prompt(state: UiState) -> UiState {
    let prompt = match &state.prompt {
        Some(prompt) => prompt.clone(),
        None => return state,
    };

    match parse_prompt(&state, prompt.kind, &prompt.input) {
        Ok(command) => {
            let state = queue(state, command);
            UiState {
                prompt: None,
                status: StatusBarState::default(),
                ..state
            }
        }
        // Keep the prompt open so the input can be fixed
        Err(e) => reduce(state, Action::SetStatus(e.to_string())),
    }
}

/// Turn prompt input into a store request
pub fn parse_prompt(state: &UiState, kind: PromptKind, input: &str) -> Result<Command> {
    let selected = || {
        state
            .selected_player()
            .map(|p| p.id)
            .ok_or_else(|| AideError::InvalidInput("No player selected".to_string()))
    };

    match kind {
        PromptKind::AddPlayer => {
            let words: Vec<&str> = input.split_whitespace().collect();
            let (name, balance) = match words.split_last() {
                Some((last, rest)) if !rest.is_empty() => match last.parse::<i64>() {
                    Ok(balance) => (rest.join(" "), balance),
                    Err(_) => (words.join(" "), 0),
                },
                _ => (words.join(" "), 0),
            };
            Ok(Command::AddPlayer(PlayerForm::new(&name, balance)?))
        }
        PromptKind::Balance => {
            let amount = input
                .trim()
                .parse::<i64>()
                .map_err(|_| AideError::InvalidInput(format!("'{}' is not a number", input.trim())))?;
            Ok(Command::SetBalance(BalanceForm::new(selected()?, amount)))
        }
        PromptKind::Status => Ok(Command::SetStatus(input.parse::<GameStatus>()?)),
        PromptKind::Cards => {
            let cards: Vec<&str> = input.split_whitespace().collect();
            if cards.len() > 2 {
                return Err(AideError::InvalidInput(
                    "Expected at most two cards".to_string(),
                ));
            }
            let hold_1 = cards.first().copied().unwrap_or("");
            let hold_2 = cards.get(1).copied().unwrap_or("");
            Ok(Command::SetCards(selected()?, CardsForm::new(hold_1, hold_2)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::TableView;
    use libpokeraide::types::{Game, Player, PlayerId};
    use std::sync::Arc;

    fn seated(names: &[&str]) -> UiState {
        let mut game = Game::new(1, "setup");
        for (i, name) in names.iter().enumerate() {
            game.players.push(Player::new(i as u64 + 1, *name));
        }
        reduce(
            UiState::new(),
            Action::TableChanged(TableView {
                game: Some(Arc::new(game)),
                ..Default::default()
            }),
        )
    }

    #[test]
    fn test_reducer_is_pure() {
        let state = UiState::new();
        let new_state = reduce(state.clone(), Action::SetStatus("Test".to_string()));

        assert!(state.status.message.is_none());
        assert_eq!(new_state.status.message, Some("Test".to_string()));
    }

    #[test]
    fn test_selection_is_clamped() {
        let mut state = seated(&["hero", "villain"]);
        state = reduce(state, Action::SelectNext);
        state = reduce(state, Action::SelectNext);
        assert_eq!(state.selected, 1);

        state = reduce(state, Action::SelectPrevious);
        state = reduce(state, Action::SelectPrevious);
        assert_eq!(state.selected, 0);
    }

    #[test]
    fn test_table_shrink_moves_selection() {
        let mut state = seated(&["a", "b", "c"]);
        state.selected = 2;

        let smaller = seated(&["a"]).table;
        let state = reduce(state, Action::TableChanged(smaller));
        assert_eq!(state.selected, 0);
    }

    #[test]
    fn test_parse_add_player() {
        let state = seated(&[]);
        assert_eq!(
            parse_prompt(&state, PromptKind::AddPlayer, "big slick 250").unwrap(),
            Command::AddPlayer(PlayerForm::new("big slick", 250).unwrap())
        );
        assert_eq!(
            parse_prompt(&state, PromptKind::AddPlayer, "250").unwrap(),
            Command::AddPlayer(PlayerForm::new("250", 0).unwrap())
        );
        assert!(parse_prompt(&state, PromptKind::AddPlayer, "   ").is_err());
    }

    #[test]
    fn test_parse_cards() {
        let state = seated(&["hero"]);
        assert_eq!(
            parse_prompt(&state, PromptKind::Cards, "Ah").unwrap(),
            Command::SetCards(PlayerId(1), CardsForm::new("Ah", "").unwrap())
        );
        assert!(parse_prompt(&state, PromptKind::Cards, "Ah Kd Qs").is_err());
        assert!(parse_prompt(&state, PromptKind::Cards, "Ahhh").is_err());
    }

    #[test]
    fn test_parse_balance_needs_player() {
        let state = seated(&[]);
        let err = parse_prompt(&state, PromptKind::Balance, "10").unwrap_err();
        assert!(err.to_string().contains("No player selected"));
    }
}
