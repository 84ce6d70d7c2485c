//! PokerAide - client state core for a poker game backend
//!
//! This library holds the client side of a poker table: a single store
//! with pure reducers, action creators that talk to the backend over HTTP,
//! and a binding layer that views use to follow state and trigger actions.
//! All game rules stay on the server.

pub mod actions;
pub mod api;
pub mod binding;
pub mod config;
pub mod error;
pub mod logging;
pub mod sequencer;
pub mod session;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use actions::ActionCreators;
pub use binding::{connect, Binding, BoundActions};
pub use config::Config;
pub use error::{AideError, ApiError, Result};
pub use session::Session;
pub use store::{Action, AppState, Dispatched, Outcome, Store};
pub use types::{Game, GameId, GameStatus, Player, PlayerId};
