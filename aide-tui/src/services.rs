//! Store adapter for the TUI
//!
//! The event loop is synchronous; the store runs deferred work on tokio.
//! `StoreHandle` owns a runtime, hands commands to the bound actions
//! without waiting for them, and lets the loop poll its binding for new
//! props on every tick.
//!
//! # Example
//!
//! ```no_run
//! use aide_tui::services::StoreHandle;
//! use aide_tui::Command;
//!
//! # fn example() -> aide_tui::Result<()> {
//! let mut store = StoreHandle::new()?;
//! store.execute(Command::StartGame);
//!
//! // Later, in the event loop
//! if let Some(table) = store.poll_table() {
//!     println!("{} game(s) seen", table.games.len());
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use libpokeraide::api::GameApi;
use libpokeraide::binding::Binding;
use libpokeraide::config::{Config, SequencingPolicy};
use libpokeraide::{AideError, Session};

use crate::app::{Command, TableView};
use crate::error::Result;

pub struct StoreHandle {
    session: Session,
    table: Binding<TableView>,
    // Declared last so the session's tasks are dropped before the runtime
    runtime: tokio::runtime::Runtime,
}

impl StoreHandle {
    /// Connect to the configured game server
    pub fn new() -> Result<Self> {
        let config = Config::load()?;
        Self::from_config(&config)
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let runtime = new_runtime()?;
        let session = {
            let _guard = runtime.enter();
            Session::from_config(config)?
        };
        Ok(Self::assemble(session, runtime))
    }

    /// Use any backend, e.g. the in-memory mock
    pub fn with_api(api: Arc<dyn GameApi>, policy: SequencingPolicy) -> Result<Self> {
        let runtime = new_runtime()?;
        let session = Session::with_api(api, policy, Some(runtime.handle().clone()))?;
        Ok(Self::assemble(session, runtime))
    }

    fn assemble(session: Session, runtime: tokio::runtime::Runtime) -> Self {
        let table = session.connect(TableView::select);
        Self {
            session,
            table,
            runtime,
        }
    }

    /// Start a store request; the result arrives through `poll_table`
    pub fn execute(&self, command: Command) {
        tracing::debug!(?command, "Executing");
        let actions = self.session.actions();

        // Handles are dropped: tasks keep running and dispatch on their own
        let _ = match command {
            Command::StartGame => actions.start_game(),
            Command::AddPlayer(form) => actions.add_player(form),
            Command::RemovePlayer(id) => actions.remove_player(id),
            Command::SetBalance(form) => actions.set_balance(form),
            Command::SetSitOut(id, sit_out) => actions.set_sit_out(id, sit_out),
            Command::SetStatus(status) => actions.set_status(status),
            Command::SetCards(id, cards) => actions.set_cards(id, cards),
            Command::SetDealer(id) => actions.set_dealer(id),
            Command::DismissError => actions.dismiss_error(),
        };
    }

    /// New props since the last call, if the bound slice changed
    pub fn poll_table(&mut self) -> Option<TableView> {
        self.table.poll()
    }

    pub fn table(&self) -> &TableView {
        self.table.props()
    }

    /// Run a future to completion on the handle's runtime
    pub fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}

fn new_runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .map_err(|e| AideError::Runtime(format!("Failed to start runtime: {}", e)).into())
}
