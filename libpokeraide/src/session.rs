//! Session facade used by the front ends
//!
//! A `Session` wires one store, one backend and one set of action creators
//! together, so the CLI and the TUI share the exact same setup.
//!
//! # Example
//!
//! ```no_run
//! use libpokeraide::session::Session;
//!
//! # async fn example() -> libpokeraide::Result<()> {
//! let session = Session::new()?;
//! session.actions().start_game().settled().await;
//!
//! let state = session.store().state();
//! println!("{} game(s) seen", state.games.len());
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tokio::runtime::Handle;

use crate::actions::ActionCreators;
use crate::api::http::HttpApi;
use crate::api::GameApi;
use crate::binding::{connect, Binding, BoundActions};
use crate::config::{Config, SequencingPolicy};
use crate::store::{AppState, LoggerMiddleware, Store};
use crate::Result;

pub struct Session {
    store: Store,
    actions: BoundActions,
}

impl Session {
    /// Session for the configured HTTP backend on the current runtime
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration cannot be loaded
    /// - The base URL is invalid
    /// - No tokio runtime is running
    pub fn new() -> Result<Self> {
        let config = Config::load()?;
        Self::from_config(&config)
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let api = HttpApi::new(&config.api)?;
        tracing::debug!(base_url = %api.base_url(), "Using HTTP backend");
        Self::with_api(Arc::new(api), config.client.sequencing, None)
    }

    /// Session over any backend, optionally on an explicit runtime
    pub fn with_api(
        api: Arc<dyn GameApi>,
        policy: SequencingPolicy,
        runtime: Option<Handle>,
    ) -> Result<Self> {
        let mut builder = Store::builder().middleware(LoggerMiddleware);
        if let Some(handle) = runtime {
            builder = builder.runtime(handle);
        }
        let store = builder.build()?;
        let creators = ActionCreators::new(api, policy);

        Ok(Self {
            actions: BoundActions::new(store.clone(), creators),
            store,
        })
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn actions(&self) -> &BoundActions {
        &self.actions
    }

    /// Bind a selector to this session's store
    pub fn connect<P, F>(&self, selector: F) -> Binding<P>
    where
        P: PartialEq,
        F: Fn(&AppState) -> P + Send + Sync + 'static,
    {
        connect(&self.store, selector)
    }
}
