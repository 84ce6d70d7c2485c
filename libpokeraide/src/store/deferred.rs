//! Deferred work: the async counterpart of a descriptor
//!
//! A [`Deferred`] is dispatched like a descriptor but carries a closure.
//! The store invokes the closure right away with a [`Dispatcher`] and a
//! [`StateAccessor`], then spawns the future it returns. Whatever happens
//! in that future reaches the state only through further dispatches.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::task::JoinHandle;

use crate::error::ApiError;
use crate::store::state::AppState;
use crate::store::{Dispatch, Dispatched, Store};

/// How a piece of deferred work ended
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A descriptor was reduced
    Applied,
    /// The response was superseded by a later request and dropped
    Discarded,
    /// The request failed; `REQUEST_FAILED` was dispatched
    Failed(ApiError),
    /// The task was cancelled or panicked before finishing
    Aborted,
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }
}

pub type DeferredFuture = Pin<Box<dyn Future<Output = Outcome> + Send + 'static>>;

type Work = Box<dyn FnOnce(Dispatcher, StateAccessor) -> DeferredFuture + Send + 'static>;

pub struct Deferred {
    label: &'static str,
    work: Work,
}

impl Deferred {
    pub fn new<F, Fut>(label: &'static str, work: F) -> Self
    where
        F: FnOnce(Dispatcher, StateAccessor) -> Fut + Send + 'static,
        Fut: Future<Output = Outcome> + Send + 'static,
    {
        Self {
            label,
            work: Box::new(move |dispatch, state| Box::pin(work(dispatch, state))),
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub(crate) fn start(self, dispatch: Dispatcher, state: StateAccessor) -> DeferredFuture {
        (self.work)(dispatch, state)
    }
}

impl fmt::Debug for Deferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred").field("label", &self.label).finish()
    }
}

/// Dispatch handle given to deferred work
#[derive(Clone)]
pub struct Dispatcher {
    store: Store,
}

impl Dispatcher {
    pub(crate) fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn dispatch(&self, item: impl Into<Dispatch>) -> Dispatched {
        self.store.dispatch(item)
    }
}

/// Read access to the current state for deferred work
#[derive(Clone)]
pub struct StateAccessor {
    store: Store,
}

impl StateAccessor {
    pub(crate) fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn get(&self) -> AppState {
        self.store.state()
    }
}

/// Handle to spawned deferred work
///
/// Awaiting it yields the [`Outcome`]. Dropping it detaches the task; it
/// keeps running and still dispatches its result.
pub struct TaskHandle {
    label: &'static str,
    inner: JoinHandle<Outcome>,
}

impl TaskHandle {
    pub(crate) fn new(label: &'static str, inner: JoinHandle<Outcome>) -> Self {
        Self { label, inner }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Cancel the task; a response that has not been dispatched yet is lost
    pub fn abort(&self) {
        self.inner.abort();
    }
}

impl Future for TaskHandle {
    type Output = Outcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Outcome> {
        let label = self.label;
        match Pin::new(&mut self.inner).poll(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Ok(outcome)) => Poll::Ready(outcome),
            Poll::Ready(Err(e)) => {
                if e.is_panic() {
                    tracing::error!(request = label, "Deferred work panicked");
                }
                Poll::Ready(Outcome::Aborted)
            }
        }
    }
}

impl fmt::Debug for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskHandle")
            .field("label", &self.label)
            .field("finished", &self.inner.is_finished())
            .finish()
    }
}
