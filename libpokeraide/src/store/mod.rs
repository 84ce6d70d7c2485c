//! Single-owner state container
//!
//! The [`Store`] holds the [`AppState`] tree, serializes every reduction and
//! notifies subscribers. Descriptors ([`Action`]) are reduced synchronously;
//! deferred work ([`Deferred`]) is started immediately and runs on the tokio
//! runtime the store was built on.
//!
//! # Examples
//!
//! ```no_run
//! use libpokeraide::store::{Action, Store};
//! use libpokeraide::types::Game;
//!
//! # async fn example() -> libpokeraide::Result<()> {
//! let store = Store::new()?;
//! store.dispatch(Action::SetGame { game: Game::new(42, "setup") });
//! assert_eq!(store.state().games.len(), 1);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Instant;

use tokio::runtime::Handle;
use tokio::sync::watch;

use crate::error::{AideError, Result};

pub mod action;
pub mod deferred;
pub mod middleware;
pub mod reducer;
pub mod state;

pub use action::{Action, RequestFailure};
pub use deferred::{Deferred, Dispatcher, Outcome, StateAccessor, TaskHandle};
pub use middleware::{LoggerMiddleware, Middleware};
pub use state::AppState;

/// Signature of the root reducer
pub type Reducer = fn(&AppState, &Action) -> AppState;

/// Anything the store accepts
#[derive(Debug)]
pub enum Dispatch {
    Action(Action),
    Deferred(Deferred),
}

impl From<Action> for Dispatch {
    fn from(action: Action) -> Self {
        Dispatch::Action(action)
    }
}

impl From<Deferred> for Dispatch {
    fn from(deferred: Deferred) -> Self {
        Dispatch::Deferred(deferred)
    }
}

/// What a dispatch call produced
#[derive(Debug)]
pub enum Dispatched {
    /// The descriptor has been reduced
    Reduced,
    /// Deferred work is running
    Pending(TaskHandle),
}

impl Dispatched {
    /// Wait for the dispatch to settle
    pub async fn settled(self) -> Outcome {
        match self {
            Dispatched::Reduced => Outcome::Applied,
            Dispatched::Pending(handle) => handle.await,
        }
    }

    pub fn into_handle(self) -> Option<TaskHandle> {
        match self {
            Dispatched::Reduced => None,
            Dispatched::Pending(handle) => Some(handle),
        }
    }
}

struct Inner {
    state: watch::Sender<AppState>,
    reducer: Reducer,
    middleware: Vec<Arc<dyn Middleware>>,
    runtime: Handle,
}

/// Cloneable handle to the shared state container
#[derive(Clone)]
pub struct Store {
    inner: Arc<Inner>,
}

impl Store {
    /// Store with the default reducer and logging middleware on the current runtime
    ///
    /// # Errors
    ///
    /// Returns `AideError::Runtime` when called outside a tokio runtime.
    pub fn new() -> Result<Self> {
        Self::builder().middleware(LoggerMiddleware).build()
    }

    pub fn builder() -> StoreBuilder {
        StoreBuilder::default()
    }

    /// Snapshot of the current state
    pub fn state(&self) -> AppState {
        self.inner.state.borrow().clone()
    }

    /// Receiver notified after every reduction that replaced a slice
    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.inner.state.subscribe()
    }

    /// Reduce a descriptor, or start deferred work
    pub fn dispatch(&self, item: impl Into<Dispatch>) -> Dispatched {
        match item.into() {
            Dispatch::Action(action) => {
                self.reduce(action);
                Dispatched::Reduced
            }
            Dispatch::Deferred(deferred) => {
                let label = deferred.label();
                for middleware in &self.inner.middleware {
                    middleware.on_deferred(label);
                }
                let future = deferred.start(
                    Dispatcher::new(self.clone()),
                    StateAccessor::new(self.clone()),
                );
                let handle = self.inner.runtime.spawn(future);
                Dispatched::Pending(TaskHandle::new(label, handle))
            }
        }
    }

    fn reduce(&self, action: Action) {
        let started = Instant::now();
        let mut transition = None;

        // Subscribers are only woken when a slice was actually replaced
        self.inner.state.send_if_modified(|state| {
            let next = (self.inner.reducer)(state, &action);
            let changed = !next.same_as(state);
            let before = std::mem::replace(state, next);
            transition = Some((before, state.clone()));
            changed
        });

        let elapsed = started.elapsed();
        if let Some((before, after)) = transition {
            for middleware in &self.inner.middleware {
                middleware.after_reduce(&action, &before, &after, elapsed);
            }
        }
    }
}

#[derive(Default)]
pub struct StoreBuilder {
    reducer: Option<Reducer>,
    middleware: Vec<Arc<dyn Middleware>>,
    initial: Option<AppState>,
    runtime: Option<Handle>,
}

impl StoreBuilder {
    pub fn reducer(mut self, reducer: Reducer) -> Self {
        self.reducer = Some(reducer);
        self
    }

    pub fn middleware(mut self, middleware: impl Middleware + 'static) -> Self {
        self.middleware.push(Arc::new(middleware));
        self
    }

    pub fn initial_state(mut self, state: AppState) -> Self {
        self.initial = Some(state);
        self
    }

    /// Run deferred work on this runtime instead of the ambient one
    pub fn runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    pub fn build(self) -> Result<Store> {
        let runtime = match self.runtime {
            Some(handle) => handle,
            None => Handle::try_current().map_err(|e| {
                AideError::Runtime(format!("Store needs a tokio runtime: {}", e))
            })?,
        };

        let (state, _) = watch::channel(self.initial.unwrap_or_default());

        Ok(Store {
            inner: Arc::new(Inner {
                state,
                reducer: self.reducer.unwrap_or(reducer::reduce),
                middleware: self.middleware,
                runtime,
            }),
        })
    }
}
