//! Error types for PokerAide

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AideError>;

#[derive(Error, Debug)]
pub enum AideError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl AideError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            AideError::InvalidInput(_) => 3,
            AideError::Api(_) => 1,
            AideError::Config(_) => 1,
            AideError::Runtime(_) => 1,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid base URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Failures of a single backend request
///
/// Kept cloneable and serializable because failures travel inside
/// `REQUEST_FAILED` descriptors and end up in the state tree.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ApiError {
    /// Transport failure: connection refused, DNS, timeout, reset
    #[error("Network error: {message}")]
    Network { message: String },

    /// The backend answered with a non-success status
    #[error("Server returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The body was not JSON or did not match the expected shape
    #[error("Malformed response: {message}")]
    Decode { message: String },

    /// A request URL could not be built from the base URL
    #[error("Invalid request URL: {message}")]
    InvalidUrl { message: String },
}

impl ApiError {
    pub fn network(message: impl Into<String>) -> Self {
        ApiError::Network {
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        ApiError::Decode {
            message: message.into(),
        }
    }
}
