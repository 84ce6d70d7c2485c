//! UI rendering
//!
//! Render functions only read state and draw to the frame.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use libpokeraide::types::Player;

use crate::app::{Prompt, PromptKind, UiState};

/// Main rendering entry point
pub fn render(frame: &mut Frame, state: &UiState) {
    let area = frame.area();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(3)])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(26), Constraint::Min(30)])
        .split(rows[0]);

    render_games(frame, columns[0], state);
    render_table(frame, columns[1], state);
    render_status_bar(frame, rows[1], state);

    if let Some(prompt) = &state.prompt {
        render_prompt(frame, area, prompt, state);
    }

    if state.help_visible {
        render_help_overlay(frame, area, state);
    }

    if let Some(failure) = &state.table.error {
        render_error_overlay(frame, area, &failure.to_string(), state);
    }
}

fn fg(state: &UiState, color: Color) -> Style {
    if state.config.colors_enabled {
        Style::default().fg(color)
    } else {
        Style::default()
    }
}

/// Games seen this session, the active one marked
fn render_games(frame: &mut Frame, area: Rect, state: &UiState) {
    let active = state.table.game.as_ref().map(|g| g.id);

    let items: Vec<ListItem> = state
        .table
        .games
        .iter()
        .map(|summary| {
            let marker = if Some(summary.id) == active { ">" } else { " " };
            let line = format!("{} #{} {}", marker, summary.id, summary.status);
            let style = if Some(summary.id) == active {
                fg(state, Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(line).style(style)
        })
        .collect();

    let list = List::new(items).block(Block::default().title(" Games ").borders(Borders::ALL));
    frame.render_widget(list, area);
}

/// Players of the active game
fn render_table(frame: &mut Frame, area: Rect, state: &UiState) {
    let game = match &state.table.game {
        Some(game) => game,
        None => {
            let text = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled("No active game", fg(state, Color::Yellow))),
                Line::from(""),
                Line::from("Press n to start one, F1 for help"),
            ])
            .block(Block::default().title(" Table ").borders(Borders::ALL))
            .alignment(Alignment::Center);
            frame.render_widget(text, area);
            return;
        }
    };

    let title = match game.dealer() {
        Some(dealer) => format!(" Game #{} | {} | dealer {} ", game.id, game.status, dealer.name),
        None => format!(" Game #{} | {} ", game.id, game.status),
    };
    let header = Row::new(vec!["#", "Name", "Balance", "Cards", ""])
        .style(Style::default().add_modifier(Modifier::BOLD));
    let rows: Vec<Row> = game.players.iter().map(player_row).collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Min(12),
            Constraint::Length(9),
            Constraint::Length(8),
            Constraint::Length(12),
        ],
    )
    .header(header)
    .block(Block::default().title(title).borders(Borders::ALL))
    .highlight_style(fg(state, Color::Yellow).add_modifier(Modifier::REVERSED))
    .highlight_symbol("> ");

    let mut table_state = TableState::default();
    if !game.players.is_empty() {
        table_state.select(Some(state.selected));
    }
    frame.render_stateful_widget(table, area, &mut table_state);
}

fn player_row(player: &Player) -> Row<'static> {
    let cards = format!(
        "{} {}",
        player.hold_1.as_deref().unwrap_or("--"),
        player.hold_2.as_deref().unwrap_or("--")
    );

    let mut flags = Vec::new();
    if player.dealer {
        flags.push("D");
    }
    if player.sit_out {
        flags.push("out");
    }

    Row::new(vec![
        player.id.to_string(),
        player.name.clone(),
        player.balance.to_string(),
        cards,
        flags.join(" "),
    ])
}

fn render_status_bar(frame: &mut Frame, area: Rect, state: &UiState) {
    let line = match &state.status.message {
        Some(message) => Line::from(Span::styled(message.clone(), fg(state, Color::Yellow))),
        None => Line::from(Span::styled(
            "n: New game | a: Add | b: Balance | t: Status | F1: Help | q: Quit",
            fg(state, Color::Gray),
        )),
    };

    let bar = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    frame.render_widget(bar, area);
}

fn render_prompt(frame: &mut Frame, area: Rect, prompt: &Prompt, state: &UiState) {
    let popup_area = centered_rect(60, 25, area);

    let mut title = format!(" {} ", prompt.kind.title());
    if let Some(player) = state.selected_player() {
        if matches!(prompt.kind, PromptKind::Balance | PromptKind::Cards) {
            title = format!(" {} for {} ", prompt.kind.title(), player.name);
        }
    }

    let text = vec![
        Line::from(Span::styled(prompt.kind.hint(), fg(state, Color::Gray))),
        Line::from(""),
        Line::from(format!("> {}_", prompt.input)),
        Line::from(""),
        Line::from("Enter to send, Esc to cancel"),
    ];

    let widget = Paragraph::new(text)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(fg(state, Color::Cyan)),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(Clear, popup_area);
    frame.render_widget(widget, popup_area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect, state: &UiState) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Table:"),
        Line::from("  n        - Start a new game"),
        Line::from("  a        - Add a player"),
        Line::from("  t        - Set game status"),
        Line::from(""),
        Line::from("Selected player:"),
        Line::from("  Up/Down  - Select player (also k/j)"),
        Line::from("  b        - Set balance"),
        Line::from("  c        - Set hole cards"),
        Line::from("  s        - Toggle sit-out"),
        Line::from("  d        - Give dealer button"),
        Line::from("  x        - Remove player"),
        Line::from(""),
        Line::from("Anywhere:"),
        Line::from("  F1       - Show or hide this help"),
        Line::from("  Esc      - Close help, dismiss a failure"),
        Line::from("  q        - Leave the table"),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(" Help ")
                .borders(Borders::ALL)
                .border_style(fg(state, Color::Cyan)),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(Clear, popup_area);
    frame.render_widget(help, popup_area);
}

fn render_error_overlay(frame: &mut Frame, area: Rect, error: &str, state: &UiState) {
    let popup_area = centered_rect(70, 30, area);

    let error_text = vec![
        Line::from(Span::styled(
            "Request failed",
            fg(state, Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(error.to_string()),
        Line::from(""),
        Line::from("Esc clears it; the table is unchanged"),
    ];

    let widget = Paragraph::new(error_text)
        .block(
            Block::default()
                .title(" Error ")
                .borders(Borders::ALL)
                .border_style(fg(state, Color::Red)),
        )
        .wrap(Wrap { trim: false })
        .alignment(Alignment::Center);

    frame.render_widget(Clear, popup_area);
    frame.render_widget(widget, popup_area);
}

/// A rect of the given percentage of `r`, centered in it
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let scale = |len: u16, pct: u16| (u32::from(len) * u32::from(pct.min(100)) / 100) as u16;
    let width = scale(r.width, percent_x);
    let height = scale(r.height, percent_y);
    Rect {
        x: r.x + (r.width - width) / 2,
        y: r.y + (r.height - height) / 2,
        width,
        height,
    }
}
