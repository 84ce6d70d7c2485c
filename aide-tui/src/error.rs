//! Error types for aide-tui
//!
//! Wraps library errors and terminal/IO errors for unified handling.

use thiserror::Error;

/// TUI-specific errors
#[derive(Error, Debug)]
pub enum TuiError {
    /// State core error (config, backend, runtime)
    #[error("{0}")]
    Library(#[from] libpokeraide::AideError),

    /// Terminal/IO error
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

impl TuiError {
    pub fn exit_code(&self) -> i32 {
        match self {
            TuiError::Library(e) => e.exit_code(),
            TuiError::Terminal(_) => 1,
        }
    }
}

/// Result type for TUI operations
pub type Result<T> = std::result::Result<T, TuiError>;
