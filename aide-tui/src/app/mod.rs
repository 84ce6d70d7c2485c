//! Application module
//!
//! - Actions: What can happen on screen
//! - State: What the screen shows right now
//! - Reducer: Pure function (State, Action) -> State
//!
//! Game state itself lives in the library store; the screen only holds the
//! props it is bound to.

pub mod actions;
pub mod event;
pub mod reducer;
pub mod state;

// Re-export commonly used types
pub use actions::{Action, Command, PromptKind};
pub use reducer::reduce;
pub use state::{Prompt, StatusBarState, TableView, UiConfig, UiState};
