//! Middleware observing the dispatch pipeline

use std::time::Duration;

use crate::store::action::Action;
use crate::store::state::AppState;

/// Hooks run around dispatch
///
/// Middleware only observes: reducers stay the single place where state
/// changes. Hooks run on the dispatching thread after the state lock has
/// been released.
pub trait Middleware: Send + Sync {
    /// Called once per reduced descriptor
    fn after_reduce(&self, action: &Action, before: &AppState, after: &AppState, elapsed: Duration);

    /// Called when deferred work is handed to the runtime
    fn on_deferred(&self, _label: &str) {}
}

/// Logs every descriptor through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggerMiddleware;

impl Middleware for LoggerMiddleware {
    fn after_reduce(&self, action: &Action, before: &AppState, after: &AppState, elapsed: Duration) {
        let changed = before.changed_slices(after);
        if let Action::RequestFailed { failure } = action {
            tracing::debug!(
                action = action.kind(),
                request = %failure.request,
                error = %failure.error,
                "Dispatched"
            );
        }
        tracing::debug!(
            action = action.kind(),
            changed = ?changed,
            elapsed_us = elapsed.as_micros() as u64,
            games = after.games.len(),
            players = after.players().len(),
            "Reduced"
        );
        tracing::trace!(?action, "Descriptor");
    }

    fn on_deferred(&self, label: &str) {
        tracing::debug!(request = label, "Deferred work started");
    }
}
