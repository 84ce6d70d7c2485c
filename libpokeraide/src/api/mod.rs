//! Backend API abstraction
//!
//! Every action creator maps to exactly one [`ApiRequest`]. The request
//! knows its HTTP method, path and form body; a [`GameApi`] implementation
//! performs it and returns the decoded JSON body.
//!
//! # Examples
//!
//! ```no_run
//! use libpokeraide::api::{ApiRequest, GameApi, http::HttpApi};
//! use libpokeraide::config::ApiConfig;
//!
//! # async fn example() -> libpokeraide::Result<()> {
//! let api = HttpApi::new(&ApiConfig::default())?;
//! let game = api.game(&ApiRequest::CreateGame).await?;
//! println!("Created game {}", game.id);
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ApiError;
use crate::types::{BalanceForm, CardsForm, Game, GameStatus, Player, PlayerForm, PlayerId};

pub mod http;

// Mock backend is available for all builds (not just tests) to support integration tests
pub mod mock;

/// Which action creator a request (or its failure) belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    StartGame,
    AddPlayer,
    RemovePlayer,
    SetBalance,
    SetSitOut,
    SetStatus,
    SetCards,
    SetDealer,
}

impl RequestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::StartGame => "start_game",
            RequestKind::AddPlayer => "add_player",
            RequestKind::RemovePlayer => "remove_player",
            RequestKind::SetBalance => "set_balance",
            RequestKind::SetSitOut => "set_sit_out",
            RequestKind::SetStatus => "set_status",
            RequestKind::SetCards => "set_cards",
            RequestKind::SetDealer => "set_dealer",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Post,
    Patch,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Post => f.write_str("POST"),
            Method::Patch => f.write_str("PATCH"),
            Method::Delete => f.write_str("DELETE"),
        }
    }
}

/// A single backend call
#[derive(Debug, Clone, PartialEq)]
pub enum ApiRequest {
    CreateGame,
    AddPlayer(PlayerForm),
    RemovePlayer(PlayerId),
    SetBalance(BalanceForm),
    SetSitOut { id: PlayerId, sit_out: bool },
    SetStatus(GameStatus),
    SetCards { id: PlayerId, cards: CardsForm },
    SetDealer(PlayerId),
}

impl ApiRequest {
    pub fn kind(&self) -> RequestKind {
        match self {
            ApiRequest::CreateGame => RequestKind::StartGame,
            ApiRequest::AddPlayer(_) => RequestKind::AddPlayer,
            ApiRequest::RemovePlayer(_) => RequestKind::RemovePlayer,
            ApiRequest::SetBalance(_) => RequestKind::SetBalance,
            ApiRequest::SetSitOut { .. } => RequestKind::SetSitOut,
            ApiRequest::SetStatus(_) => RequestKind::SetStatus,
            ApiRequest::SetCards { .. } => RequestKind::SetCards,
            ApiRequest::SetDealer(_) => RequestKind::SetDealer,
        }
    }

    pub fn method(&self) -> Method {
        match self {
            ApiRequest::CreateGame
            | ApiRequest::AddPlayer(_)
            | ApiRequest::SetStatus(_)
            | ApiRequest::SetDealer(_) => Method::Post,
            ApiRequest::SetBalance(_)
            | ApiRequest::SetSitOut { .. }
            | ApiRequest::SetCards { .. } => Method::Patch,
            ApiRequest::RemovePlayer(_) => Method::Delete,
        }
    }

    /// Path relative to the configured base URL
    pub fn path(&self) -> String {
        match self {
            ApiRequest::CreateGame => "game".to_string(),
            ApiRequest::AddPlayer(_) => "game/player".to_string(),
            ApiRequest::RemovePlayer(id)
            | ApiRequest::SetSitOut { id, .. }
            | ApiRequest::SetCards { id, .. } => format!("game/player/{}", id),
            ApiRequest::SetBalance(form) => format!("game/player/{}", form.id),
            ApiRequest::SetStatus(_) => "game/status".to_string(),
            ApiRequest::SetDealer(id) => format!("game/player/dealer/{}", id),
        }
    }

    /// Form-encoded body fields; empty when the request has no body
    pub fn form(&self) -> Vec<(&'static str, String)> {
        match self {
            ApiRequest::AddPlayer(form) => vec![
                ("name", form.name.clone()),
                ("balance", form.balance.to_string()),
            ],
            ApiRequest::SetBalance(form) => vec![("balance", form.balance.to_string())],
            ApiRequest::SetSitOut { sit_out, .. } => {
                vec![("sit_out", if *sit_out { "1" } else { "0" }.to_string())]
            }
            ApiRequest::SetStatus(status) => vec![("status", status.to_string())],
            ApiRequest::SetCards { cards, .. } => vec![
                ("hold_1", cards.hold_1.clone()),
                ("hold_2", cards.hold_2.clone()),
            ],
            ApiRequest::CreateGame | ApiRequest::RemovePlayer(_) | ApiRequest::SetDealer(_) => {
                Vec::new()
            }
        }
    }
}

impl fmt::Display for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method(), self.path())
    }
}

/// Backend trait for game management calls
///
/// Implementations perform the request and hand back the parsed JSON body.
/// They never retry; every failure is reported as an [`ApiError`].
#[async_trait]
pub trait GameApi: Send + Sync {
    /// Perform one request and return its JSON body
    ///
    /// # Errors
    ///
    /// - `ApiError::Network` if the backend could not be reached
    /// - `ApiError::Status` for a non-success status code
    /// - `ApiError::Decode` if the body is not valid JSON
    async fn send(&self, request: &ApiRequest) -> Result<serde_json::Value, ApiError>;

    /// Short identifier for logs (e.g. "http", "mock")
    fn name(&self) -> &str;

    /// Perform a request that answers with a game record
    async fn game(&self, request: &ApiRequest) -> Result<Game, ApiError> {
        decode(self.send(request).await?)
    }

    /// Perform a request that answers with the full player list
    async fn players(&self, request: &ApiRequest) -> Result<Vec<Player>, ApiError> {
        decode(self.send(request).await?)
    }
}

/// Decode a JSON body into the expected shape
pub fn decode<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::decode(e.to_string()))
}
