//! Terminal input
//!
//! The loop redraws once per batch: [`EventSource::next_batch`] waits up to
//! one tick for input, then drains whatever else is already queued so a
//! burst of keys (a paste into a prompt) is reduced before the next frame.

use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};

use super::Action;

/// Upper bound on events taken per batch, keeps a flood from starving redraws
const MAX_BATCH: usize = 64;

pub struct EventSource {
    tick: Duration,
}

impl EventSource {
    pub fn new(tick_rate_ms: u64) -> Self {
        Self {
            tick: Duration::from_millis(tick_rate_ms),
        }
    }

    pub fn tick(&self) -> Duration {
        self.tick
    }

    /// Actions for everything that arrived within one tick; `[Tick]` if nothing did
    pub fn next_batch(&self) -> std::io::Result<Vec<Action>> {
        let mut actions = Vec::new();

        if event::poll(self.tick)? {
            actions.extend(translate(event::read()?));
            while actions.len() < MAX_BATCH && event::poll(Duration::ZERO)? {
                actions.extend(translate(event::read()?));
            }
        }

        if actions.is_empty() {
            actions.push(Action::Tick);
        }
        Ok(actions)
    }
}

/// Map a terminal event to a UI action
///
/// Key releases and repeats are dropped; some platforms report them and the
/// key map reacts to presses only. Mouse, focus and paste events are ignored.
pub fn translate(event: Event) -> Option<Action> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(Action::Key(key)),
        Event::Resize(w, h) => Some(Action::Resize(w, h)),
        _ => None,
    }
}
